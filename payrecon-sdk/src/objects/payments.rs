//! Payment webhook rows as listed by the `payments-list` function.

use compact_str::CompactString;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::{default_limit, string_or_number};

/// Status reported by the acquiring provider for one notification.
///
/// The provider's vocabulary is open; anything outside the well-known
/// statuses is kept verbatim in [`PaymentStatus::Other`]. Matching is exact
/// and case-sensitive, like the provider's own values.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PaymentStatus {
    Authorized,
    Confirmed,
    Rejected,
    Refunded,
    Canceled,
    Other(CompactString),
}

impl PaymentStatus {
    /// The well-known statuses, in the order the dashboard lists them.
    pub const KNOWN: [PaymentStatus; 5] = [
        PaymentStatus::Confirmed,
        PaymentStatus::Authorized,
        PaymentStatus::Rejected,
        PaymentStatus::Refunded,
        PaymentStatus::Canceled,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            PaymentStatus::Authorized => "AUTHORIZED",
            PaymentStatus::Confirmed => "CONFIRMED",
            PaymentStatus::Rejected => "REJECTED",
            PaymentStatus::Refunded => "REFUNDED",
            PaymentStatus::Canceled => "CANCELED",
            PaymentStatus::Other(s) => s.as_str(),
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, PaymentStatus::Other(_))
    }
}

impl Default for PaymentStatus {
    fn default() -> Self {
        PaymentStatus::Other(CompactString::const_new(""))
    }
}

impl From<&str> for PaymentStatus {
    fn from(value: &str) -> Self {
        match value {
            "AUTHORIZED" => PaymentStatus::Authorized,
            "CONFIRMED" => PaymentStatus::Confirmed,
            "REJECTED" => PaymentStatus::Rejected,
            "REFUNDED" => PaymentStatus::Refunded,
            "CANCELED" => PaymentStatus::Canceled,
            other => PaymentStatus::Other(CompactString::from(other)),
        }
    }
}

impl From<String> for PaymentStatus {
    fn from(value: String) -> Self {
        PaymentStatus::from(value.as_str())
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for PaymentStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for PaymentStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.map(PaymentStatus::from).unwrap_or_default())
    }
}

/// One received payment notification.
///
/// Rows are immutable once stored; several rows may share an `order_id`
/// when the provider reports successive status changes of one order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentRecord {
    pub id: i64,
    #[serde(default, deserialize_with = "string_or_number::required")]
    pub payment_id: String,
    #[serde(default)]
    pub amount: Decimal,
    #[serde(default, deserialize_with = "string_or_number::optional")]
    pub order_id: Option<String>,
    #[serde(default)]
    pub status: PaymentStatus,
    #[serde(default)]
    pub payment_status: Option<String>,
    #[serde(default)]
    pub error_code: Option<String>,
    #[serde(default)]
    pub customer_email: Option<String>,
    #[serde(default)]
    pub customer_phone: Option<String>,
    /// Masked card number.
    #[serde(default)]
    pub pan: Option<String>,
    #[serde(default)]
    pub card_type: Option<String>,
    #[serde(default)]
    pub exp_date: Option<String>,
    #[serde(default)]
    pub terminal_key: Option<String>,
    /// The notification body exactly as the provider sent it.
    #[serde(default)]
    pub raw_data: Option<serde_json::Value>,
    #[serde(default)]
    pub receipt_id: Option<i64>,
    /// ISO-8601 creation time assigned by the backend.
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub integration_name: Option<String>,
    #[serde(default)]
    pub provider_name: Option<String>,
}

impl PaymentRecord {
    /// Key under which this row is grouped into an order: the order id when
    /// present and non-empty, the provider payment id otherwise.
    pub fn group_key(&self) -> &str {
        match self.order_id.as_deref() {
            Some(order_id) if !order_id.is_empty() => order_id,
            _ => &self.payment_id,
        }
    }
}

/// Query parameters for `payments-list`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListPaymentsQuery {
    pub owner_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub integration_id: Option<i64>,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

impl ListPaymentsQuery {
    pub fn new(owner_id: i64) -> Self {
        Self {
            owner_id,
            integration_id: None,
            limit: default_limit(),
            offset: 0,
        }
    }
}

/// Response of `payments-list`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PaymentsPage {
    #[serde(default)]
    pub payments: Vec<PaymentRecord>,
    #[serde(default)]
    pub total: i64,
    #[serde(default)]
    pub limit: Option<i64>,
    #[serde(default)]
    pub offset: Option<i64>,
}
