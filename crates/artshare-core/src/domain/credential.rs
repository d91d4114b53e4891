//! Login credential normalization.
//!
//! Backends hand the credential back in different places (a JSON field with
//! one of several names, or an `Authorization` response header) and with or
//! without an auth scheme. Everything is normalized to `<Scheme> <value>`.

use serde_json::Value;

use crate::domain::artist::Artist;

/// Body fields that may carry the credential, in lookup order.
pub const CREDENTIAL_FIELDS: [&str; 4] = ["token", "key", "access", "auth_token"];

/// Picks the credential out of a login response and normalizes its scheme.
pub fn extract_credential(body: &Value, authorization_header: Option<&str>) -> Option<String> {
  let from_body = CREDENTIAL_FIELDS
    .iter()
    .filter_map(|field| body.get(field).and_then(Value::as_str))
    .find(|v| !v.trim().is_empty());

  let raw = from_body.or(authorization_header.filter(|h| !h.trim().is_empty()))?;
  normalize_credential(raw)
}

/// Keeps an explicit `Bearer`/`Token` scheme; otherwise JWT-shaped values get
/// `Bearer` and everything else gets `Token`.
pub fn normalize_credential(raw: &str) -> Option<String> {
  let raw = raw.trim();
  if raw.is_empty() {
    return None;
  }

  if has_scheme(raw, "bearer") || has_scheme(raw, "token") {
    return Some(raw.to_string());
  }

  if looks_like_jwt(raw) {
    Some(format!("Bearer {raw}"))
  } else {
    Some(format!("Token {raw}"))
  }
}

/// Value for the `Authorization` request header built from a stored token.
pub fn authorization_header(token: &str) -> String {
  if has_scheme(token, "bearer") || has_scheme(token, "token") {
    token.to_string()
  } else {
    format!("Token {token}")
  }
}

/// The artist profile bundled with a login response, if any: `artist`, then
/// `user`, then the body itself.
pub fn extract_artist(body: &Value) -> Option<Artist> {
  ["artist", "user"]
    .iter()
    .filter_map(|field| body.get(field))
    .chain(std::iter::once(body))
    .find_map(|candidate| serde_json::from_value::<Artist>(candidate.clone()).ok())
}

/// Case-insensitive `<scheme><whitespace>` prefix check.
fn has_scheme(value: &str, scheme: &str) -> bool {
  let Some(prefix) = value.get(..scheme.len()) else {
    return false;
  };
  prefix.eq_ignore_ascii_case(scheme)
    && value[scheme.len()..].starts_with(|c: char| c.is_whitespace())
}

/// Three non-empty base64url segments separated by dots.
fn looks_like_jwt(value: &str) -> bool {
  let segments: Vec<&str> = value.split('.').collect();
  segments.len() == 3
    && segments.iter().all(|s| {
      !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    })
}
