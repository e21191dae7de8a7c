//! Configuration types shared between the client and the binary.
//!
//! The backend is reached through one URL per function. The table of URLs
//! is resolved up front (usually from a `func2url.json` produced by the
//! deployment) and handed to whoever performs requests; nothing else in
//! the workspace needs to know where the functions live.

mod endpoints;

pub use endpoints::{EndpointName, EndpointTable};

/// Errors raised while resolving configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("no URL configured for endpoint `{0}`")]
    MissingEndpoint(EndpointName),

    #[error("unknown endpoint name `{0}`")]
    UnknownEndpoint(String),

    #[error("invalid endpoint table: {0}")]
    InvalidTable(#[from] serde_json::Error),
}
