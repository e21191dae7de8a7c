//! Configuration module for the payrecon CLI.
//!
//! Handles loading configuration from the TOML file, the optional
//! `func2url.json` endpoint table, CLI arguments and environment variables.

pub mod file;

use crate::config::file::FileConfig;
use payrecon_core::aggregator::LatestStatusRule;
use payrecon_sdk::config::{ConfigError as EndpointError, EndpointTable};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Largest page the backend functions are asked for.
const MAX_PAGE_LIMIT: i64 = 1000;

/// Errors that can occur during configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("endpoint table error: {0}")]
    EndpointError(#[from] EndpointError),

    #[error("validation error: {0}")]
    ValidationError(String),
}

/// Values given on the command line or through the environment. They win
/// over the file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub owner_id: Option<i64>,
    pub terminal_password: Option<String>,
}

/// Fully resolved configuration.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub owner_id: i64,
    pub endpoints: EndpointTable,
    pub timeout: Duration,
    pub webhook_url: Option<Url>,
    pub terminal_password: Option<String>,
    pub latest_status_rule: LatestStatusRule,
    pub page_limit: i64,
}

/// Configuration loader that handles the complete loading process.
pub struct ConfigLoader {
    config_path: PathBuf,
    overrides: Overrides,
}

impl ConfigLoader {
    /// Create a new config loader.
    pub fn new(config_path: impl AsRef<Path>, overrides: Overrides) -> Self {
        Self {
            config_path: config_path.as_ref().to_path_buf(),
            overrides,
        }
    }

    pub fn path(&self) -> &Path {
        &self.config_path
    }

    /// Load and process the configuration.
    ///
    /// This will:
    /// 1. Read the TOML file
    /// 2. Merge the `func2url.json` table and the `[endpoints]` section
    /// 3. Apply CLI overrides
    /// 4. Validate the result
    pub fn load(&self) -> Result<LoadedConfig, ConfigError> {
        let content = read(&self.config_path)?;
        let file_config: FileConfig = toml::from_str(&content)?;
        self.build(file_config)
    }

    /// Like [`load`](Self::load), for commands that can run without a
    /// config file. A missing or unparsable file yields `None`; a file that
    /// parses but fails validation is still an error.
    pub fn load_optional(&self) -> Result<Option<LoadedConfig>, ConfigError> {
        match self.load() {
            Ok(config) => Ok(Some(config)),
            Err(ConfigError::IoError { path, source }) => {
                tracing::debug!("No usable config at {:?}: {}", path, source);
                Ok(None)
            }
            Err(ConfigError::ParseError(e)) => {
                tracing::warn!("Ignoring unparsable config {:?}: {}", self.config_path, e);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    fn build(&self, file_config: FileConfig) -> Result<LoadedConfig, ConfigError> {
        let mut endpoints = match &file_config.backend.func2url {
            Some(path) => {
                let path = self.resolve_relative(path);
                tracing::debug!(path = %path.display(), "Reading endpoint table");
                EndpointTable::from_json(&read(&path)?)?
            }
            None => EndpointTable::new(),
        };
        endpoints.merge(EndpointTable::from_pairs(
            file_config
                .endpoints
                .iter()
                .map(|(name, url)| (name.as_str(), url.clone())),
        )?);

        let loaded = LoadedConfig {
            owner_id: self
                .overrides
                .owner_id
                .unwrap_or(file_config.backend.owner_id),
            endpoints,
            timeout: Duration::from_secs(file_config.backend.timeout_secs),
            webhook_url: file_config.webhook_test.url,
            terminal_password: self
                .overrides
                .terminal_password
                .clone()
                .or(file_config.webhook_test.terminal_password),
            latest_status_rule: file_config.payments.latest_status_rule,
            page_limit: file_config.payments.limit,
        };
        validate(&loaded)?;

        let missing = loaded.endpoints.missing();
        if !missing.is_empty() {
            tracing::debug!(?missing, "Endpoints without a configured URL");
        }
        Ok(loaded)
    }

    fn resolve_relative(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            return path.to_path_buf();
        }
        self.config_path
            .parent()
            .map(|dir| dir.join(path))
            .unwrap_or_else(|| path.to_path_buf())
    }
}

fn read(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|source| ConfigError::IoError {
        path: path.to_path_buf(),
        source,
    })
}

fn validate(config: &LoadedConfig) -> Result<(), ConfigError> {
    if config.owner_id <= 0 {
        return Err(ConfigError::ValidationError(format!(
            "owner_id must be positive, got {}",
            config.owner_id
        )));
    }
    if !(1..=MAX_PAGE_LIMIT).contains(&config.page_limit) {
        return Err(ConfigError::ValidationError(format!(
            "payments.limit must be between 1 and {MAX_PAGE_LIMIT}, got {}",
            config.page_limit
        )));
    }
    if config.timeout.is_zero() {
        return Err(ConfigError::ValidationError(
            "backend.timeout_secs must be at least 1".to_owned(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use payrecon_sdk::config::EndpointName;

    fn build(toml_str: &str, overrides: Overrides) -> Result<LoadedConfig, ConfigError> {
        let loader = ConfigLoader::new("./payrecon.toml", overrides);
        loader.build(toml::from_str(toml_str).unwrap())
    }

    #[test]
    fn test_endpoints_section() {
        let config = build(
            r#"
[backend]
owner_id = 1

[endpoints]
payments-list = "https://functions.example/0c1f"
"#,
            Overrides::default(),
        )
        .unwrap();
        assert!(config.endpoints.contains(EndpointName::PaymentsList));
        assert!(!config.endpoints.contains(EndpointName::ReceiptsList));
    }

    #[test]
    fn test_unknown_endpoint_name() {
        let err = build(
            "[backend]\nowner_id = 1\n[endpoints]\npayment-list = \"https://x.example/\"\n",
            Overrides::default(),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::EndpointError(_)));
    }

    #[test]
    fn test_overrides_win() {
        let config = build(
            "[backend]\nowner_id = 1\n[webhook_test]\nterminal_password = \"file\"\n",
            Overrides {
                owner_id: Some(42),
                terminal_password: Some("cli".to_owned()),
            },
        )
        .unwrap();
        assert_eq!(config.owner_id, 42);
        assert_eq!(config.terminal_password.as_deref(), Some("cli"));
    }

    #[test]
    fn test_validation() {
        let err = build("[backend]\nowner_id = 0\n", Overrides::default()).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));

        let err = build(
            "[backend]\nowner_id = 1\n[payments]\nlimit = 5000\n",
            Overrides::default(),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));

        let err = build(
            "[backend]\nowner_id = 1\ntimeout_secs = 0\n",
            Overrides::default(),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn test_missing_func2url_file() {
        let err = build(
            "[backend]\nowner_id = 1\nfunc2url = \"/nonexistent/func2url.json\"\n",
            Overrides::default(),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::IoError { .. }));
    }

    #[test]
    fn test_optional_load_tolerates_missing_and_partial_files() {
        let dir = std::env::temp_dir().join(format!("payrecon-config-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();

        let missing = ConfigLoader::new(dir.join("absent.toml"), Overrides::default());
        assert!(missing.load_optional().unwrap().is_none());

        let partial = dir.join("partial.toml");
        std::fs::write(&partial, "[webhook_test]\nterminal_password = \"pw\"\n").unwrap();
        let loader = ConfigLoader::new(&partial, Overrides::default());
        assert!(matches!(loader.load(), Err(ConfigError::ParseError(_))));
        assert!(loader.load_optional().unwrap().is_none());

        let invalid = dir.join("invalid.toml");
        std::fs::write(&invalid, "[backend]\nowner_id = 0\n").unwrap();
        let loader = ConfigLoader::new(&invalid, Overrides::default());
        assert!(matches!(
            loader.load_optional(),
            Err(ConfigError::ValidationError(_))
        ));

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_relative_paths_follow_config_dir() {
        let loader = ConfigLoader::new("/etc/payrecon/payrecon.toml", Overrides::default());
        assert_eq!(
            loader.resolve_relative(Path::new("func2url.json")),
            PathBuf::from("/etc/payrecon/func2url.json")
        );
        assert_eq!(
            loader.resolve_relative(Path::new("/opt/f.json")),
            PathBuf::from("/opt/f.json")
        );
    }
}
