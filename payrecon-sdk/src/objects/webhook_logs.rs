//! Logs of notifications forwarded to the owner's own endpoint.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::payments::PaymentStatus;
use super::{default_limit, string_or_number};

/// One forwarding attempt.
///
/// `status_code` is `0` when the request never got an HTTP answer
/// (DNS failure, timeout, refused connection).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForwardLogRecord {
    pub id: i64,
    #[serde(default)]
    pub webhook_payment_id: Option<i64>,
    pub forward_url: String,
    #[serde(default)]
    pub status_code: Option<u16>,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub response_time_ms: Option<i64>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default, deserialize_with = "string_or_number::optional")]
    pub payment_id: Option<String>,
    #[serde(default, deserialize_with = "string_or_number::optional")]
    pub order_id: Option<String>,
    #[serde(default)]
    pub amount: Option<Decimal>,
    #[serde(default)]
    pub payment_status: Option<PaymentStatus>,
}

impl ForwardLogRecord {
    pub fn is_success(&self) -> bool {
        matches!(self.status_code, Some(200..=299))
    }
}

/// Query parameters for `webhook-logs`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListWebhookLogsQuery {
    pub owner_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub integration_id: Option<i64>,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WebhookLogsPage {
    #[serde(default)]
    pub logs: Vec<ForwardLogRecord>,
}
