//! HTTP client for the backend functions.
//!
//! Gated behind the `client` cargo feature so downstream crates that only
//! need the shared types do not pull in `reqwest`.

mod backend;
mod webhook;

pub use backend::BackendClient;
pub use webhook::{TestWebhookResponse, send_test_webhook};

use reqwest::StatusCode;

use crate::config::ConfigError;
use crate::objects::ApiErrorBody;
use crate::signature::SignatureError;

/// Errors produced by the SDK HTTP client.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Transport-level failure (DNS, TLS, connection reset, …).
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The webhook token could not be computed.
    #[error("signature error: {0}")]
    Signature(#[from] SignatureError),

    /// The backend returned a non-2xx status code.
    #[error("api error: status {status}, body: {body}")]
    Api { status: StatusCode, body: String },

    /// The backend answered 2xx but flagged the request as failed.
    #[error("request rejected: {0}")]
    Rejected(String),

    /// Response body could not be deserialized.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// The endpoint table has no URL for the requested function.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}

impl ClientError {
    /// The backend's own error message, when the failure carried one.
    pub fn api_message(&self) -> Option<String> {
        match self {
            ClientError::Api { body, .. } => serde_json::from_str::<ApiErrorBody>(body)
                .ok()
                .and_then(|e| e.describe()),
            ClientError::Rejected(message) => Some(message.clone()),
            _ => None,
        }
    }
}

async fn parse_response<T: serde::de::DeserializeOwned>(
    resp: reqwest::Response,
) -> Result<T, ClientError> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(ClientError::Api { status, body });
    }
    let bytes = resp.bytes().await?;
    serde_json::from_slice(&bytes).map_err(ClientError::Json)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_message_extraction() {
        let err = ClientError::Api {
            status: StatusCode::BAD_REQUEST,
            body: r#"{"error": "owner_id required"}"#.to_owned(),
        };
        assert_eq!(err.api_message().as_deref(), Some("owner_id required"));

        let err = ClientError::Api {
            status: StatusCode::BAD_GATEWAY,
            body: "<html>bad gateway</html>".to_owned(),
        };
        assert_eq!(err.api_message(), None);

        let err = ClientError::Rejected("not supported".to_owned());
        assert_eq!(err.api_message().as_deref(), Some("not supported"));
    }
}
