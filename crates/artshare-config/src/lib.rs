mod backend;
mod paths;

pub use backend::{ConfigBackend, TomlConfigBackend};
pub use paths::{ArtsharePaths, ConfigError, ENV_BASE_DIR};

use once_cell::sync::Lazy;

// Paths singleton (portable / system)
pub static PATHS: Lazy<ArtsharePaths> =
  Lazy::new(|| ArtsharePaths::detect().expect("failed to init ArtsharePaths"));

// Config backend singleton
pub static CONFIG_BACKEND: Lazy<TomlConfigBackend> =
  Lazy::new(|| TomlConfigBackend::new(PATHS.clone()));
