use artshare_config::{CONFIG_BACKEND, ConfigBackend, ConfigError, PATHS, TomlConfigBackend};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

const SECTION: &str = "storage";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct StorageConfig {
  pub session_file: PathBuf,
}

impl Default for StorageConfig {
  fn default() -> Self {
    StorageConfig { session_file: PATHS.session_file() }
  }
}

impl StorageConfig {
  pub fn load() -> Result<Self, ConfigError> {
    Self::load_from(&CONFIG_BACKEND)
  }

  /// Loads the section and writes it back so defaults show up in the file.
  pub fn load_from(backend: &TomlConfigBackend) -> Result<Self, ConfigError> {
    let cfg = backend.load_section_with_default(SECTION)?;
    backend.save_section(SECTION, &cfg)?;
    Ok(cfg)
  }

  pub fn save(&self) -> Result<(), ConfigError> {
    CONFIG_BACKEND.save_section(SECTION, self)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use tempfile::tempdir;

  #[test]
  fn explicit_session_file_is_kept() {
    let tmp = tempdir().unwrap();
    let path = tmp.path().join("artshare.toml");
    std::fs::write(&path, "# local\n[other]\nkeep = true\n\n[storage]\nsession_file = \"/tmp/s.json\"\n").unwrap();
    let backend = TomlConfigBackend::at(&path);

    let cfg = StorageConfig::load_from(&backend).unwrap();

    assert_eq!(cfg.session_file, PathBuf::from("/tmp/s.json"));
    let written = std::fs::read_to_string(&path).unwrap();
    assert!(written.starts_with("# local"));
    assert!(written.contains("keep = true"));
  }
}
