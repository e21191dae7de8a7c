//! Offline token tools and test notifications: `sign`, `verify` and
//! `send-test-webhook`.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, bail};
use clap::Args;
use payrecon_sdk::client::send_test_webhook;
use payrecon_sdk::signature::{self, SignatureError};
use serde_json::{Map, Value};
use url::Url;

use crate::config::LoadedConfig;
use crate::output::print_json;
use crate::state::http_client;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Args)]
pub struct PayloadArgs {
    /// JSON payload file, `-` for stdin. Defaults to a sample T-Bank
    /// notification.
    #[arg(short, long)]
    payload: Option<PathBuf>,

    /// Terminal password (defaults to `webhook_test.terminal_password`)
    #[arg(short, long)]
    secret: Option<String>,
}

#[derive(Debug, Args)]
pub struct SignArgs {
    #[command(flatten)]
    input: PayloadArgs,

    /// Print the payload with its `Token` filled in
    #[arg(long)]
    write_token: bool,
}

#[derive(Debug, Args)]
pub struct VerifyArgs {
    #[command(flatten)]
    input: PayloadArgs,
}

#[derive(Debug, Args)]
pub struct SendArgs {
    #[command(flatten)]
    input: PayloadArgs,

    /// Webhook URL of the integration (defaults to `webhook_test.url`)
    #[arg(long)]
    url: Option<Url>,
}

pub fn sign(config: Option<&LoadedConfig>, args: SignArgs) -> anyhow::Result<()> {
    let mut payload = load_payload(args.input.payload.as_deref())?;
    let secret = resolve_secret(args.input.secret, config)?;

    let token = signature::sign_payload(&mut payload, &secret);
    if args.write_token {
        return print_json(&payload);
    }
    println!("{token}");
    Ok(())
}

pub fn verify(config: Option<&LoadedConfig>, args: VerifyArgs) -> anyhow::Result<()> {
    let payload = load_payload(args.input.payload.as_deref())?;
    let secret = resolve_secret(args.input.secret, config)?;

    match signature::verify_token(&payload, &secret) {
        Ok(()) => {
            println!("Token is valid");
            Ok(())
        }
        Err(SignatureError::SignatureMismatch) => {
            let expected = signature::compute_token(&payload, &secret);
            bail!("token mismatch, expected {expected}")
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn send(config: Option<&LoadedConfig>, args: SendArgs) -> anyhow::Result<()> {
    let payload = load_payload(args.input.payload.as_deref())?;
    let secret = resolve_secret(args.input.secret, config)?;
    let Some(url) = args.url.or_else(|| config.and_then(|c| c.webhook_url.clone())) else {
        bail!("no webhook URL: pass --url or set webhook_test.url");
    };

    let http = http_client(config.map_or(DEFAULT_TIMEOUT, |c| c.timeout));
    let response = send_test_webhook(&http, url, payload, &secret)
        .await
        .context("failed to send test webhook")?;

    println!("Token:  {}", response.token);
    println!("Status: {}", response.status);
    println!("{}", response.body);
    if !response.is_success() {
        bail!("webhook endpoint answered {}", response.status);
    }
    Ok(())
}

fn resolve_secret(
    secret: Option<String>,
    config: Option<&LoadedConfig>,
) -> anyhow::Result<String> {
    secret
        .or_else(|| config.and_then(|c| c.terminal_password.clone()))
        .context("no terminal password: pass --secret or set webhook_test.terminal_password")
}

fn load_payload(path: Option<&std::path::Path>) -> anyhow::Result<Map<String, Value>> {
    let Some(path) = path else {
        return Ok(signature::example_payload());
    };
    let raw = if path.as_os_str() == "-" {
        std::io::read_to_string(std::io::stdin()).context("failed to read payload from stdin")?
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("failed to read payload from {}", path.display()))?
    };
    parse_payload(&raw)
}

fn parse_payload(raw: &str) -> anyhow::Result<Map<String, Value>> {
    let value: Value = serde_json::from_str(raw).map_err(SignatureError::from)?;
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(SignatureError::NotAnObject.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_payload() {
        let map = parse_payload(r#"{"Amount": 100, "Token": "x"}"#).unwrap();
        assert_eq!(map.len(), 2);

        let err = parse_payload("[1, 2]").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SignatureError>(),
            Some(SignatureError::NotAnObject)
        ));
        assert!(parse_payload("{").is_err());
    }

    #[test]
    fn test_secret_precedence() {
        assert_eq!(resolve_secret(Some("cli".to_owned()), None).unwrap(), "cli");
        assert!(resolve_secret(None, None).is_err());
    }

    #[test]
    fn test_default_payload_is_sample() {
        let payload = load_payload(None).unwrap();
        assert_eq!(payload["OrderId"], Value::String("21050".to_owned()));
    }
}
