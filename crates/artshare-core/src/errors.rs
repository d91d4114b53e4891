use std::collections::BTreeMap;
use std::fmt;

use serde_json::Value;
use thiserror::Error;

use crate::ports::StorageError;

/// Everything a screen can be told about a failed operation.
///
/// Front ends should show the `Display` text; `Fields` additionally carries
/// per-field messages for inline rendering.
#[derive(Debug, Error)]
pub enum ApiError {
  /// Rejected before any request was issued.
  #[error("{0}")]
  Validation(String),

  #[error("{}", .0.summary())]
  Fields(FieldErrors),

  /// 401 from the backend. The session token has already been cleared.
  #[error("{0}")]
  Unauthorized(String),

  #[error(
    "Network error: could not reach {base}. Check that the API is running and the URL is correct. Original error: {detail}"
  )]
  Network { base: String, detail: String },

  #[error("{0}")]
  NotFound(String),

  #[error("{message}")]
  Backend { status: u16, message: String },

  #[error(
    "Login succeeded but no token received. If your server uses session cookies, ensure the login endpoint sets them."
  )]
  MissingCredential,

  #[error("unexpected response: {0}")]
  Decode(String),

  #[error("request failed: {0}")]
  Transport(String),

  #[error("session storage error: {0}")]
  Storage(#[from] StorageError),
}

impl ApiError {
  /// Maps a non-2xx response to the matching error kind.
  pub fn from_response(status: u16, body: &[u8]) -> Self {
    let json: Option<Value> = serde_json::from_slice(body).ok();

    let detail = json
      .as_ref()
      .and_then(|v| v.get("detail"))
      .and_then(Value::as_str)
      .map(str::to_string);

    if status == 401 {
      return ApiError::Unauthorized(
        detail.unwrap_or_else(|| "Authentication credentials were not provided.".to_string()),
      );
    }

    if detail.is_none() {
      if let Some(fields) = json.as_ref().and_then(FieldErrors::from_json) {
        return ApiError::Fields(fields);
      }
    }

    let message = detail
      .or_else(|| json.as_ref().and_then(Value::as_str).map(str::to_string))
      .or_else(|| {
        let text = String::from_utf8_lossy(body).trim().to_string();
        (!text.is_empty() && json.is_none()).then_some(text)
      })
      .unwrap_or_else(|| {
        if status == 404 { "Not found.".to_string() } else { format!("request failed with status {status}") }
      });

    if status == 404 { ApiError::NotFound(message) } else { ApiError::Backend { status, message } }
  }

  pub fn is_unauthorized(&self) -> bool {
    matches!(self, ApiError::Unauthorized(_))
  }

  pub fn is_network(&self) -> bool {
    matches!(self, ApiError::Network { .. })
  }

  pub fn field_errors(&self) -> Option<&FieldErrors> {
    match self {
      ApiError::Fields(fields) => Some(fields),
      _ => None,
    }
  }
}

/// Per-field validation messages from the backend, e.g.
/// `{"username": ["A user with that username already exists."]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
  /// Accepts an object whose values are strings or arrays of strings.
  pub fn from_json(value: &Value) -> Option<Self> {
    let object = value.as_object()?;
    if object.is_empty() {
      return None;
    }

    let mut fields = BTreeMap::new();
    for (name, messages) in object {
      let messages: Vec<String> = match messages {
        Value::String(s) => vec![s.clone()],
        Value::Array(items) => {
          items.iter().map(|m| m.as_str().map(str::to_string)).collect::<Option<Vec<_>>>()?
        }
        _ => return None,
      };
      fields.insert(name.clone(), messages);
    }

    Some(FieldErrors(fields))
  }

  pub fn get(&self, field: &str) -> Option<&[String]> {
    self.0.get(field).map(Vec::as_slice)
  }

  pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
    self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }

  /// First message across all fields, used as the one-line summary.
  pub fn summary(&self) -> String {
    self
      .0
      .values()
      .flatten()
      .next()
      .cloned()
      .unwrap_or_else(|| "Request failed".to_string())
  }
}

impl fmt::Display for FieldErrors {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for (i, (field, messages)) in self.0.iter().enumerate() {
      if i > 0 {
        writeln!(f)?;
      }
      write!(f, "{field}: {}", messages.join(" "))?;
    }
    Ok(())
  }
}
