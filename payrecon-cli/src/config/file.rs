//! TOML file configuration structures.
//!
//! These structs directly map to the `payrecon.toml` file format.

use payrecon_core::aggregator::LatestStatusRule;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use url::Url;

/// Root configuration structure as read from the TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileConfig {
    pub backend: BackendConfig,
    /// Function name to URL, e.g. `payments-list = "https://..."`.
    /// Entries here override the ones from `backend.func2url`.
    #[serde(default)]
    pub endpoints: BTreeMap<String, Url>,
    #[serde(default)]
    pub webhook_test: WebhookTestConfig,
    #[serde(default)]
    pub payments: PaymentsConfig,
}

/// Backend access section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Account whose data is listed.
    pub owner_id: i64,
    /// Optional `func2url.json` produced by the deployment. Relative paths
    /// are resolved against the config file's directory.
    #[serde(default)]
    pub func2url: Option<PathBuf>,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    30
}

/// Settings for signing and sending test notifications.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WebhookTestConfig {
    /// Webhook URL of the integration under test.
    #[serde(default)]
    pub url: Option<Url>,
    /// Terminal password of the integration, used as the signing secret.
    #[serde(default)]
    pub terminal_password: Option<String>,
}

/// Payment list settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentsConfig {
    #[serde(default)]
    pub latest_status_rule: LatestStatusRule,
    /// Rows fetched per request.
    #[serde(default = "default_page_limit")]
    pub limit: i64,
}

impl Default for PaymentsConfig {
    fn default() -> Self {
        Self {
            latest_status_rule: LatestStatusRule::default(),
            limit: default_page_limit(),
        }
    }
}

fn default_page_limit() -> i64 {
    100
}
