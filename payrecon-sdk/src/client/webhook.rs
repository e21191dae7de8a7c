//! Sending signed test notifications to the ingestion endpoint.
//!
//! Used to exercise an integration end to end without waiting for a real
//! payment: the payload is signed with the terminal password exactly like
//! the provider would, then POSTed to the integration's webhook URL.

use reqwest::{Client, StatusCode};
use serde_json::{Map, Value};
use tracing::info;
use url::Url;

use super::ClientError;
use crate::signature::sign_payload;

/// What the ingestion endpoint answered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestWebhookResponse {
    pub status: StatusCode,
    pub body: String,
    /// The token that was placed in the payload.
    pub token: String,
}

impl TestWebhookResponse {
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

/// Sign `payload` with `secret` and POST it to `url`.
///
/// Non-2xx answers are returned as a [`TestWebhookResponse`] rather than an
/// error: seeing a `403 Invalid signature` is the point of a test send.
/// Only transport failures surface as [`ClientError`].
pub async fn send_test_webhook(
    http: &Client,
    url: Url,
    mut payload: Map<String, Value>,
    secret: &str,
) -> Result<TestWebhookResponse, ClientError> {
    let token = sign_payload(&mut payload, secret);

    let resp = http.post(url.clone()).json(&payload).send().await?;
    let status = resp.status();
    let body = resp.text().await?;

    info!(%url, status = status.as_u16(), "Test webhook sent");
    Ok(TestWebhookResponse {
        status,
        body,
        token,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_success_flag() {
        let ok = TestWebhookResponse {
            status: StatusCode::OK,
            body: "OK".to_owned(),
            token: String::new(),
        };
        let forbidden = TestWebhookResponse {
            status: StatusCode::FORBIDDEN,
            body: r#"{"error": "Invalid signature"}"#.to_owned(),
            token: String::new(),
        };
        assert!(ok.is_success());
        assert!(!forbidden.is_success());
    }
}
