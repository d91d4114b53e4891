use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::domain::upload::UploadFile;
use crate::ports::progress::UploadProgress;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
  Get,
  Post,
  Patch,
  Delete,
}

impl Method {
  pub fn as_str(&self) -> &'static str {
    match self {
      Method::Get => "GET",
      Method::Post => "POST",
      Method::Patch => "PATCH",
      Method::Delete => "DELETE",
    }
  }
}

#[derive(Debug, Clone)]
pub enum FormValue {
  Text(String),
  File(UploadFile),
}

#[derive(Debug, Clone)]
pub struct FormField {
  pub name: String,
  pub value: FormValue,
}

impl FormField {
  pub fn text(name: &str, value: impl Into<String>) -> Self {
    Self { name: name.to_string(), value: FormValue::Text(value.into()) }
  }

  pub fn file(name: &str, file: UploadFile) -> Self {
    Self { name: name.to_string(), value: FormValue::File(file) }
  }
}

#[derive(Debug, Clone)]
pub enum RequestBody {
  Empty,
  Json(serde_json::Value),
  Multipart(Vec<FormField>),
}

/// A fully resolved request: absolute URL, auth header already derived.
#[derive(Debug, Clone)]
pub struct ApiRequest {
  pub method: Method,
  pub url: String,
  pub authorization: Option<String>,
  pub body: RequestBody,
  /// Told how much of the file parts of a multipart body has been sent.
  pub progress: Option<Arc<dyn UploadProgress>>,
}

/// Whatever the backend answered, success or not.
#[derive(Debug, Clone, Default)]
pub struct ApiResponse {
  pub status: u16,
  /// Header names are lowercased by the transport.
  pub headers: HashMap<String, String>,
  pub body: Vec<u8>,
}

impl ApiResponse {
  pub fn is_success(&self) -> bool {
    (200..300).contains(&self.status)
  }

  pub fn header(&self, name: &str) -> Option<&str> {
    self.headers.get(&name.to_ascii_lowercase()).map(String::as_str)
  }

  pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
    serde_json::from_slice(&self.body)
  }

  /// Body as JSON, or `Value::Null` when empty or not JSON.
  pub fn json_value(&self) -> serde_json::Value {
    serde_json::from_slice(&self.body).unwrap_or(serde_json::Value::Null)
  }

  pub fn text(&self) -> String {
    String::from_utf8_lossy(&self.body).into_owned()
  }
}

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
  /// The request went out (or tried to) and no response came back.
  #[error("{0}")]
  Unreachable(String),

  /// The request could not be built or the response could not be read.
  #[error("{0}")]
  Request(String),
}

/// Port for the HTTP exchange with the backend.
///
/// Implementations must return `Ok` for every response that arrived,
/// including 4xx/5xx; status handling belongs to the gateway.
#[async_trait]
pub trait HttpTransport: Send + Sync {
  async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError>;
}
