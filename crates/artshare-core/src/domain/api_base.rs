use std::fmt;

pub const DEFAULT_API_BASE: &str = "http://localhost:8000";

/// Normalized backend address.
///
/// Endpoint paths already start with `/api/...`, so a configured URL that ends
/// in `/api` has that segment stripped (case-insensitive), together with any
/// trailing slashes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiBase(String);

impl ApiBase {
  pub fn new(raw: &str) -> Self {
    let mut normalized = raw.trim().trim_end_matches('/').to_string();

    if normalized.to_ascii_lowercase().ends_with("/api") {
      normalized.truncate(normalized.len() - "/api".len());
    }

    ApiBase(normalized)
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }

  /// Label used in diagnostics when the base is empty.
  pub fn describe(&self) -> &str {
    if self.0.is_empty() { "(api base URL not configured)" } else { &self.0 }
  }

  /// Joins an endpoint path (`/api/...`) onto the base.
  pub fn endpoint(&self, path: &str) -> String {
    format!("{}/{}", self.0, path.trim_start_matches('/'))
  }

  /// Turns a media path returned by the backend into an absolute URL.
  ///
  /// Empty input yields `None`; `http://` and `https://` URLs pass through.
  pub fn resolve_media_url(&self, url: Option<&str>) -> Option<String> {
    let url = url.filter(|u| !u.is_empty())?;

    if is_absolute_http(url) {
      return Some(url.to_string());
    }

    let relative = url.strip_prefix('/').unwrap_or(url);
    Some(format!("{}/{}", self.0, relative))
  }
}

impl Default for ApiBase {
  fn default() -> Self {
    ApiBase::new(DEFAULT_API_BASE)
  }
}

impl fmt::Display for ApiBase {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.describe())
  }
}

fn is_absolute_http(url: &str) -> bool {
  let lower = url.get(..8).unwrap_or(url).to_ascii_lowercase();
  lower.starts_with("http://") || lower.starts_with("https://")
}
