//! Webhook token calculation and verification.
//!
//! Payment notifications from the acquiring provider carry a `Token` field
//! that authenticates the rest of the body. The token is derived as:
//!
//! ```text
//! hex(SHA-256(value(k1) ++ value(k2) ++ ... ++ value(kn) ++ secret))
//! ```
//!
//! where `k1..kn` are the payload's top-level keys in lexicographic order,
//! excluding `Token` itself and any key whose value is an object or an
//! array. Booleans are rendered as `true`/`false`, `null` as `null`, numbers
//! as their plain decimal text and strings verbatim. The secret is the terminal
//! password shared with the provider.

use serde_json::{Map, Value};

/// Name of the payload field carrying the signature.
pub const TOKEN_FIELD: &str = "Token";

/// Errors produced by token operations.
#[derive(Debug, thiserror::Error)]
pub enum SignatureError {
    #[error("payload is not a JSON object")]
    NotAnObject,
    #[error("payload has no string `Token` field")]
    MissingToken,
    #[error("invalid token")]
    SignatureMismatch,
    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<ring::error::Unspecified> for SignatureError {
    fn from(_: ring::error::Unspecified) -> Self {
        Self::SignatureMismatch
    }
}

// ---------------------------------------------------------------------------
// Token calculation
// ---------------------------------------------------------------------------

/// Compute the token for `payload` signed with `secret`.
///
/// Any existing `Token` field is ignored, so re-signing an already signed
/// payload yields the same result. A payload without scalar fields hashes
/// the secret alone.
pub fn compute_token(payload: &Map<String, Value>, secret: &str) -> String {
    let digest = ring::digest::digest(
        &ring::digest::SHA256,
        signing_string(payload, secret).as_bytes(),
    );
    hex::encode(digest.as_ref())
}

/// Like [`compute_token`], for a payload that has not been checked to be an
/// object yet.
pub fn compute_token_for_value(payload: &Value, secret: &str) -> Result<String, SignatureError> {
    let object = payload.as_object().ok_or(SignatureError::NotAnObject)?;
    Ok(compute_token(object, secret))
}

/// Compute the token and store it in the payload's `Token` field.
///
/// Returns the token that was written.
pub fn sign_payload(payload: &mut Map<String, Value>, secret: &str) -> String {
    let token = compute_token(payload, secret);
    payload.insert(TOKEN_FIELD.to_owned(), Value::String(token.clone()));
    token
}

/// Verify the `Token` field of a received payload.
///
/// The comparison runs in constant time over the decoded digest bytes.
pub fn verify_token(payload: &Map<String, Value>, secret: &str) -> Result<(), SignatureError> {
    let received = payload
        .get(TOKEN_FIELD)
        .and_then(Value::as_str)
        .ok_or(SignatureError::MissingToken)?;
    let received = hex::decode(received.to_ascii_lowercase())
        .map_err(|_| SignatureError::SignatureMismatch)?;

    let expected = ring::digest::digest(
        &ring::digest::SHA256,
        signing_string(payload, secret).as_bytes(),
    );
    ring::constant_time::verify_slices_are_equal(expected.as_ref(), &received)?;
    Ok(())
}

/// Build the exact string that gets hashed.
fn signing_string(payload: &Map<String, Value>, secret: &str) -> String {
    let mut keys: Vec<&String> = payload.keys().filter(|k| *k != TOKEN_FIELD).collect();
    keys.sort_unstable();

    let mut out = String::new();
    for key in keys {
        match &payload[key.as_str()] {
            Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
            Value::Number(n) => out.push_str(&render_number(n)),
            Value::String(s) => out.push_str(s),
            Value::Null => out.push_str("null"),
            Value::Array(_) | Value::Object(_) => {}
        }
    }
    out.push_str(secret);
    out
}

/// Plain decimal rendering: integers as-is, whole floats without a
/// trailing `.0`.
fn render_number(n: &serde_json::Number) -> String {
    if let Some(i) = n.as_i64() {
        i.to_string()
    } else if let Some(u) = n.as_u64() {
        u.to_string()
    } else if let Some(f) = n.as_f64() {
        f.to_string()
    } else {
        n.to_string()
    }
}

// ---------------------------------------------------------------------------
// Sample payload
// ---------------------------------------------------------------------------

/// A sample payment notification, as the provider sends it for a confirmed
/// card payment. Its `Token` is a placeholder to be replaced by
/// [`sign_payload`].
pub fn example_payload() -> Map<String, Value> {
    let value = serde_json::json!({
        "TerminalKey": "TBankTest",
        "Amount": 100000,
        "OrderId": "21050",
        "Success": true,
        "Status": "CONFIRMED",
        "PaymentId": 13660,
        "ErrorCode": "0",
        "Message": "Платеж успешно обработан",
        "Details": "Тестовая оплата",
        "Pan": "430000******0777",
        "ExpDate": "0229",
        "Token": "placeholder_will_be_calculated"
    });
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}
