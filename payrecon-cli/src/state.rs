//! State shared by the subcommands that talk to the backend.

use crate::config::LoadedConfig;
use payrecon_sdk::client::BackendClient;
use std::time::Duration;

/// Resolved configuration plus a ready HTTP client.
#[derive(Clone)]
pub struct AppState {
    pub config: LoadedConfig,
    pub client: BackendClient,
}

impl AppState {
    pub fn new(config: LoadedConfig) -> Self {
        let client = BackendClient::new(config.endpoints.clone())
            .with_http_client(http_client(config.timeout));
        Self { config, client }
    }

    pub fn owner_id(&self) -> i64 {
        self.config.owner_id
    }
}

/// Build the HTTP client used for every outgoing request.
pub fn http_client(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(concat!("payrecon/", env!("CARGO_PKG_VERSION")))
        .build()
        .unwrap_or_else(|e| {
            tracing::warn!("Failed to build HTTP client, using defaults: {}", e);
            reqwest::Client::new()
        })
}
