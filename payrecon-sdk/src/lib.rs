//! Shared types for the payrecon payment-reconciliation dashboard.
//!
//! * [`objects`] – request and response bodies of the backend functions.
//! * [`signature`] – provider webhook token calculation and verification.
//! * [`config`] – the endpoint URL table.
//! * `client` – async HTTP client for the backend (feature `client`).

#![forbid(unsafe_code)]

#[cfg(feature = "client")]
pub mod client;
pub mod config;
pub mod objects;
pub mod signature;
