//! Integration catalogue and user integrations.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::payments::PaymentStatus;

/// A provider category (acquiring, cash registers, fiscal data operators, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntegrationCategory {
    pub id: i64,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub providers: Vec<IntegrationProvider>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntegrationProvider {
    pub id: i64,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub logo_url: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Per-status switches deciding which notifications are stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookSettings {
    #[serde(default = "enabled")]
    pub notify_on_authorized: bool,
    #[serde(default = "enabled")]
    pub notify_on_confirmed: bool,
    #[serde(default = "enabled")]
    pub notify_on_rejected: bool,
    #[serde(default = "enabled")]
    pub notify_on_refunded: bool,
}

const fn enabled() -> bool {
    true
}

impl Default for WebhookSettings {
    fn default() -> Self {
        Self {
            notify_on_authorized: true,
            notify_on_confirmed: true,
            notify_on_rejected: true,
            notify_on_refunded: true,
        }
    }
}

impl WebhookSettings {
    /// Whether a notification with `status` is kept. Statuses without a
    /// switch are always kept.
    pub fn notifies(&self, status: &PaymentStatus) -> bool {
        match status {
            PaymentStatus::Authorized => self.notify_on_authorized,
            PaymentStatus::Confirmed => self.notify_on_confirmed,
            PaymentStatus::Rejected => self.notify_on_rejected,
            PaymentStatus::Refunded => self.notify_on_refunded,
            PaymentStatus::Canceled | PaymentStatus::Other(_) => true,
        }
    }

    /// Flip the switch for `status`. Returns `false` when the status has no
    /// switch.
    pub fn set(&mut self, status: &PaymentStatus, enabled: bool) -> bool {
        let switch = match status {
            PaymentStatus::Authorized => &mut self.notify_on_authorized,
            PaymentStatus::Confirmed => &mut self.notify_on_confirmed,
            PaymentStatus::Rejected => &mut self.notify_on_rejected,
            PaymentStatus::Refunded => &mut self.notify_on_refunded,
            PaymentStatus::Canceled | PaymentStatus::Other(_) => return false,
        };
        *switch = enabled;
        true
    }
}

/// An integration configured by the owner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserIntegration {
    pub id: i64,
    #[serde(default)]
    pub integration_name: Option<String>,
    pub webhook_token: String,
    pub status: String,
    #[serde(default)]
    pub webhook_count: i64,
    #[serde(default)]
    pub last_webhook_at: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    pub provider_name: String,
    pub provider_slug: String,
    pub category_slug: String,
    pub provider_id: i64,
    /// Provider-specific settings (terminal key, password, INN, ...).
    #[serde(default)]
    pub config: Value,
    #[serde(default)]
    pub webhook_settings: Option<WebhookSettings>,
    #[serde(default)]
    pub forward_url: Option<String>,
}

impl UserIntegration {
    pub fn is_active(&self) -> bool {
        self.status == "active"
    }

    /// Display name, falling back to the provider name.
    pub fn display_name(&self) -> &str {
        match self.integration_name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => &self.provider_name,
        }
    }
}

/// Response of `integrations-list`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IntegrationsOverview {
    #[serde(default)]
    pub categories: Vec<IntegrationCategory>,
    #[serde(default)]
    pub user_integrations: Vec<UserIntegration>,
}

/// Request body for `integrations-create`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateIntegrationRequest {
    pub owner_id: i64,
    pub provider_slug: String,
    pub integration_name: String,
    #[serde(default)]
    pub config: serde_json::Map<String, Value>,
    #[serde(default)]
    pub webhook_settings: WebhookSettings,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub forward_url: Option<String>,
}

/// Response of `integrations-create`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateIntegrationResponse {
    #[serde(default)]
    pub success: bool,
    pub integration_id: i64,
    /// URL to configure at the provider as the notification endpoint.
    pub webhook_url: String,
    pub webhook_token: String,
}

/// Request body for `integrations-update`.
///
/// `None` keeps the stored name, config and settings. `forward_url` is
/// always sent: `None` clears the forwarding target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateIntegrationRequest {
    pub integration_id: i64,
    pub owner_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub integration_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<serde_json::Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub webhook_settings: Option<WebhookSettings>,
    #[serde(default)]
    pub forward_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateIntegrationResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_webhook_settings_defaults_and_switches() {
        let settings: WebhookSettings =
            serde_json::from_value(json!({"notify_on_rejected": false})).unwrap();
        assert!(settings.notifies(&PaymentStatus::Confirmed));
        assert!(!settings.notifies(&PaymentStatus::Rejected));
        assert!(settings.notifies(&PaymentStatus::from("DEADLINE_EXPIRED")));
    }

    #[test]
    fn test_webhook_settings_set() {
        let mut settings = WebhookSettings::default();
        assert!(settings.set(&PaymentStatus::Authorized, false));
        assert!(!settings.notifies(&PaymentStatus::Authorized));
        assert!(!settings.set(&PaymentStatus::Canceled, false));
        assert!(settings.notifies(&PaymentStatus::Canceled));
    }

    #[test]
    fn test_overview_parsing() {
        let body = json!({
            "categories": [{
                "id": 1, "name": "Acquiring", "slug": "acquiring", "icon": "CreditCard",
                "providers": [{
                    "id": 3, "name": "T-Bank", "slug": "tbank",
                    "logo_url": null, "description": null
                }]
            }],
            "user_integrations": [{
                "id": 10, "integration_name": "", "webhook_token": "tok", "status": "active",
                "webhook_count": 4, "last_webhook_at": null, "created_at": "2025-01-01T00:00:00",
                "provider_name": "T-Bank", "provider_slug": "tbank", "category_slug": "acquiring",
                "provider_id": 3, "config": {"terminal_key": "TBankTest"},
                "webhook_settings": null, "forward_url": null
            }]
        });
        let overview: IntegrationsOverview = serde_json::from_value(body).unwrap();
        assert_eq!(overview.categories[0].providers[0].slug, "tbank");
        let integration = &overview.user_integrations[0];
        assert!(integration.is_active());
        assert_eq!(integration.display_name(), "T-Bank");
    }

    #[test]
    fn test_update_request_always_sends_forward_url() {
        let request = UpdateIntegrationRequest {
            integration_id: 10,
            owner_id: 1,
            integration_name: None,
            config: None,
            webhook_settings: None,
            forward_url: None,
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"integration_id": 10, "owner_id": 1, "forward_url": null})
        );
    }
}
