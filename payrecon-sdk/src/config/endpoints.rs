//! Backend endpoint names and the resolved URL table.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use url::Url;

use super::ConfigError;

/// Logical name of a backend function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EndpointName {
    PaymentsList,
    IntegrationsList,
    IntegrationsCreate,
    IntegrationsUpdate,
    IntegrationsDelete,
    ReceiptsList,
    WebhookReceive,
    WebhookLogs,
    SendMessage,
    OfdFetchReceipts,
}

impl EndpointName {
    pub const ALL: [EndpointName; 10] = [
        EndpointName::PaymentsList,
        EndpointName::IntegrationsList,
        EndpointName::IntegrationsCreate,
        EndpointName::IntegrationsUpdate,
        EndpointName::IntegrationsDelete,
        EndpointName::ReceiptsList,
        EndpointName::WebhookReceive,
        EndpointName::WebhookLogs,
        EndpointName::SendMessage,
        EndpointName::OfdFetchReceipts,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EndpointName::PaymentsList => "payments-list",
            EndpointName::IntegrationsList => "integrations-list",
            EndpointName::IntegrationsCreate => "integrations-create",
            EndpointName::IntegrationsUpdate => "integrations-update",
            EndpointName::IntegrationsDelete => "integrations-delete",
            EndpointName::ReceiptsList => "receipts-list",
            EndpointName::WebhookReceive => "webhook-receive",
            EndpointName::WebhookLogs => "webhook-logs",
            EndpointName::SendMessage => "send-message",
            EndpointName::OfdFetchReceipts => "ofd-fetch-receipts",
        }
    }
}

impl std::str::FromStr for EndpointName {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EndpointName::ALL
            .into_iter()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| ConfigError::UnknownEndpoint(s.to_owned()))
    }
}

impl std::fmt::Display for EndpointName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pre-resolved mapping from endpoint name to URL.
///
/// Serialized as a flat map, e.g.
/// `{"payments-list": "https://functions.example/0c1f..."}`. Deserializing
/// rejects unknown names; [`EndpointTable::from_json`] skips them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EndpointTable {
    urls: HashMap<EndpointName, Url>,
}

impl EndpointTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a `func2url.json` document.
    ///
    /// The deployment lists every function it ships, including ones this
    /// client never calls; those entries are skipped.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let raw: HashMap<String, Url> = serde_json::from_str(json)?;
        let mut table = Self::new();
        for (name, url) in raw {
            match name.parse::<EndpointName>() {
                Ok(endpoint) => {
                    table.insert(endpoint, url);
                }
                Err(_) => tracing::debug!(endpoint = %name, "Skipping unused endpoint"),
            }
        }
        Ok(table)
    }

    /// Build a table from `(name, url)` string pairs, as found in config
    /// files keyed by function name.
    pub fn from_pairs<'a, I>(pairs: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (&'a str, Url)>,
    {
        let mut table = Self::new();
        for (name, url) in pairs {
            table.insert(name.parse()?, url);
        }
        Ok(table)
    }

    pub fn insert(&mut self, name: EndpointName, url: Url) -> Option<Url> {
        self.urls.insert(name, url)
    }

    /// Add every entry of `other`, replacing existing ones.
    pub fn merge(&mut self, other: EndpointTable) {
        self.urls.extend(other.urls);
    }

    pub fn with(mut self, name: EndpointName, url: Url) -> Self {
        self.urls.insert(name, url);
        self
    }

    /// Resolve the URL of `name`.
    pub fn get(&self, name: EndpointName) -> Result<&Url, ConfigError> {
        self.urls.get(&name).ok_or(ConfigError::MissingEndpoint(name))
    }

    pub fn contains(&self, name: EndpointName) -> bool {
        self.urls.contains_key(&name)
    }

    /// Endpoint names without a configured URL, in declaration order.
    pub fn missing(&self) -> Vec<EndpointName> {
        EndpointName::ALL
            .into_iter()
            .filter(|name| !self.urls.contains_key(name))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_func2url() {
        let table = EndpointTable::from_json(
            r#"{
                "payments-list": "https://functions.example/aaa",
                "webhook-receive": "https://functions.example/bbb"
            }"#,
        )
        .unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(
            table.get(EndpointName::PaymentsList).unwrap().as_str(),
            "https://functions.example/aaa"
        );
        assert!(matches!(
            table.get(EndpointName::ReceiptsList),
            Err(ConfigError::MissingEndpoint(EndpointName::ReceiptsList))
        ));
        assert_eq!(table.missing().len(), 8);
    }

    #[test]
    fn test_func2url_extra_functions_are_skipped() {
        let table = EndpointTable::from_json(
            r#"{
                "payments-list": "https://functions.example/aaa",
                "dashboard-stats": "https://functions.example/ddd",
                "ofd-receipt-details": "https://functions.example/eee"
            }"#,
        )
        .unwrap();
        assert_eq!(table.len(), 1);
        assert!(table.contains(EndpointName::PaymentsList));
    }

    #[test]
    fn test_func2url_bad_url_is_rejected() {
        assert!(matches!(
            EndpointTable::from_json(r#"{"payments-list": "not a url"}"#),
            Err(ConfigError::InvalidTable(_))
        ));
    }

    #[test]
    fn test_deserialize_rejects_unknown_names() {
        let parsed: Result<EndpointTable, _> =
            serde_json::from_str(r#"{"payments-lst": "https://x.example/"}"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_from_pairs() {
        let url = Url::parse("https://functions.example/ccc").unwrap();
        let table = EndpointTable::from_pairs([("webhook-logs", url.clone())]).unwrap();
        assert_eq!(table.get(EndpointName::WebhookLogs).unwrap(), &url);

        assert!(matches!(
            EndpointTable::from_pairs([("logs", url)]),
            Err(ConfigError::UnknownEndpoint(name)) if name == "logs"
        ));
    }

    #[test]
    fn test_merge_overrides() {
        let old = Url::parse("https://functions.example/old").unwrap();
        let new = Url::parse("https://functions.example/new").unwrap();
        let mut table = EndpointTable::new()
            .with(EndpointName::PaymentsList, old.clone())
            .with(EndpointName::WebhookLogs, old);
        table.merge(EndpointTable::new().with(EndpointName::PaymentsList, new.clone()));
        assert_eq!(table.len(), 2);
        assert_eq!(table.get(EndpointName::PaymentsList).unwrap(), &new);
    }

    #[test]
    fn test_names_round_trip_through_display() {
        for name in EndpointName::ALL {
            let json = serde_json::to_string(&name).unwrap();
            assert_eq!(json, format!("\"{name}\""));
        }
    }
}
