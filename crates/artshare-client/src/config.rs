use artshare_config::{CONFIG_BACKEND, ConfigBackend, ConfigError, TomlConfigBackend};
use artshare_core::domain::ApiBase;
use artshare_core::domain::api_base::DEFAULT_API_BASE;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Overrides `base_url` for one run; never written to the config file.
pub const ENV_API_URL: &str = "ARTSHARE_API_URL";

const SECTION: &str = "api";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ApiConfig {
  pub base_url: String,
  /// Whole-request timeout. No timeout when absent.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub timeout_secs: Option<u64>,
}

impl Default for ApiConfig {
  fn default() -> Self {
    ApiConfig { base_url: DEFAULT_API_BASE.to_string(), timeout_secs: None }
  }
}

impl ApiConfig {
  pub fn load() -> Result<Self, ConfigError> {
    Self::load_from(&CONFIG_BACKEND)
  }

  /// File value with the `ARTSHARE_API_URL` override applied.
  pub fn load_from(backend: &TomlConfigBackend) -> Result<Self, ConfigError> {
    let mut cfg = Self::load_stored_from(backend)?;
    if let Some(url) = std::env::var(ENV_API_URL).ok().filter(|u| !u.trim().is_empty()) {
      debug!(url = %url, "api base overridden from {ENV_API_URL}");
      cfg.base_url = url;
    }
    Ok(cfg)
  }

  /// The persisted section only, without environment overrides.
  pub fn load_stored() -> Result<Self, ConfigError> {
    Self::load_stored_from(&CONFIG_BACKEND)
  }

  pub fn load_stored_from(backend: &TomlConfigBackend) -> Result<Self, ConfigError> {
    let cfg: ApiConfig = backend.load_section_with_default(SECTION)?;
    backend.save_section(SECTION, &cfg)?;
    Ok(cfg)
  }

  pub fn save(&self) -> Result<(), ConfigError> {
    CONFIG_BACKEND.save_section(SECTION, self)
  }

  pub fn save_to(&self, backend: &TomlConfigBackend) -> Result<(), ConfigError> {
    backend.save_section(SECTION, self)
  }

  pub fn api_base(&self) -> ApiBase {
    ApiBase::new(&self.base_url)
  }
}
