//! Fiscal receipts from cash registers and the fiscal data operator (OFD).

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{default_limit, string_or_number};

/// Where a receipt came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReceiptSource {
    Ofd,
    CashRegister,
}

impl std::fmt::Display for ReceiptSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReceiptSource::Ofd => write!(f, "ofd"),
            ReceiptSource::CashRegister => write!(f, "cash_register"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReceiptRecord {
    pub source: ReceiptSource,
    pub id: i64,
    pub integration_id: i64,
    #[serde(default)]
    pub integration_name: Option<String>,
    #[serde(default, deserialize_with = "string_or_number::optional")]
    pub document_id: Option<String>,
    #[serde(default, deserialize_with = "string_or_number::optional")]
    pub operation_type: Option<String>,
    #[serde(default)]
    pub total_sum: Option<Decimal>,
    #[serde(default)]
    pub cash_sum: Option<Decimal>,
    #[serde(default)]
    pub ecash_sum: Option<Decimal>,
    #[serde(default, deserialize_with = "string_or_number::optional")]
    pub doc_number: Option<String>,
    #[serde(default)]
    pub document_datetime: Option<String>,
    /// Fiscal drive serial number.
    #[serde(default, deserialize_with = "string_or_number::optional")]
    pub fn_number: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub raw_data: Option<serde_json::Value>,
}

impl ReceiptRecord {
    /// Case-insensitive search over the identifying fields. An empty query
    /// matches everything.
    pub fn matches(&self, text: &str) -> bool {
        if text.is_empty() {
            return true;
        }
        let needle = text.to_lowercase();
        [
            self.document_id.as_deref(),
            self.doc_number.as_deref(),
            self.fn_number.as_deref(),
            self.integration_name.as_deref(),
        ]
        .into_iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(&needle))
    }
}

/// Query parameters for `receipts-list`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListReceiptsQuery {
    pub owner_id: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<ReceiptSource>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReceiptsPage {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub receipts: Vec<ReceiptRecord>,
    #[serde(default)]
    pub total: i64,
    #[serde(default)]
    pub limit: Option<i64>,
    #[serde(default)]
    pub offset: Option<i64>,
}

/// Request body for `ofd-fetch-receipts`: pull receipts of one OFD
/// integration for a date range into the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchOfdReceiptsRequest {
    pub integration_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_from: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_to: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchOfdReceiptsResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub total_receipts: i64,
    #[serde(default)]
    pub inserted: i64,
    #[serde(default)]
    pub date_from: Option<String>,
    #[serde(default)]
    pub date_to: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn receipt() -> ReceiptRecord {
        serde_json::from_value(json!({
            "source": "ofd",
            "id": 5,
            "integration_id": 2,
            "integration_name": "OFD Main",
            "document_id": 99812,
            "operation_type": 1,
            "total_sum": 1500.5,
            "cash_sum": 0,
            "ecash_sum": 1500.5,
            "doc_number": "118",
            "document_datetime": "2025-02-01T12:00:00",
            "fn_number": "7281440500000000",
            "created_at": "2025-02-01T12:05:00",
            "raw_data": null
        }))
        .unwrap()
    }

    #[test]
    fn test_parse_receipt() {
        let r = receipt();
        assert_eq!(r.source, ReceiptSource::Ofd);
        assert_eq!(r.document_id.as_deref(), Some("99812"));
        assert_eq!(r.total_sum, Some(Decimal::new(15005, 1)));
    }

    #[test]
    fn test_receipt_search() {
        let r = receipt();
        assert!(r.matches(""));
        assert!(r.matches("ofd main"));
        assert!(r.matches("7281440"));
        assert!(!r.matches("nothing"));
    }

    #[test]
    fn test_source_names() {
        assert_eq!(
            serde_json::to_value(ReceiptSource::CashRegister).unwrap(),
            json!("cash_register")
        );
        assert_eq!(ReceiptSource::Ofd.to_string(), "ofd");
    }
}
