//! Request and response types for the backend functions.
//!
//! The backend is a set of serverless functions returning JSON. Field names
//! follow the backend's snake_case columns; ids the backend passes through
//! from the payment provider may arrive as either strings or numbers.

pub mod integrations;
pub mod payments;
pub mod receipts;
pub mod webhook_logs;

pub use integrations::{
    CreateIntegrationRequest, CreateIntegrationResponse, IntegrationCategory,
    IntegrationProvider, IntegrationsOverview, UpdateIntegrationRequest,
    UpdateIntegrationResponse, UserIntegration, WebhookSettings,
};
pub use payments::{ListPaymentsQuery, PaymentRecord, PaymentStatus, PaymentsPage};
pub use receipts::{
    FetchOfdReceiptsRequest, FetchOfdReceiptsResponse, ListReceiptsQuery, ReceiptRecord,
    ReceiptSource, ReceiptsPage,
};
pub use webhook_logs::{ForwardLogRecord, ListWebhookLogsQuery, WebhookLogsPage};

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Error body returned by the backend on failures.
///
/// Most functions answer `{"error": "..."}`; a few answer
/// `{"error": true, "message": "..."}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub error: Option<Value>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ApiErrorBody {
    /// Best human-readable description of the failure, if any.
    pub fn describe(&self) -> Option<String> {
        match (&self.error, &self.message) {
            (Some(Value::String(e)), _) => Some(e.clone()),
            (_, Some(m)) => Some(m.clone()),
            (Some(Value::Bool(false)) | Some(Value::Null) | None, None) => None,
            (Some(other), None) => Some(other.to_string()),
        }
    }
}

pub(crate) const fn default_limit() -> i64 {
    100
}

/// Deserializers for ids that the backend emits as either strings or
/// numbers.
pub(crate) mod string_or_number {
    use serde::de::{Deserializer, Error};
    use serde::Deserialize;
    use serde_json::Value;

    fn render<E: Error>(value: Value) -> Result<Option<String>, E> {
        match value {
            Value::Null => Ok(None),
            Value::String(s) => Ok(Some(s)),
            Value::Number(n) => Ok(Some(n.to_string())),
            other => Err(E::custom(format!(
                "expected a string or a number, found {other}"
            ))),
        }
    }

    /// `null` and missing become the empty string.
    pub fn required<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
        Ok(render(Value::deserialize(d)?)?.unwrap_or_default())
    }

    pub fn optional<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
        render(Value::deserialize(d)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_error_body_shapes() {
        let plain: ApiErrorBody =
            serde_json::from_value(json!({"error": "owner_id required"})).unwrap();
        assert_eq!(plain.describe().as_deref(), Some("owner_id required"));

        let flagged: ApiErrorBody =
            serde_json::from_value(json!({"error": true, "message": "not supported"})).unwrap();
        assert_eq!(flagged.describe().as_deref(), Some("not supported"));

        let empty: ApiErrorBody = serde_json::from_value(json!({})).unwrap();
        assert_eq!(empty.describe(), None);
    }
}
