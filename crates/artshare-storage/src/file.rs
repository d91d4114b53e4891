use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use artshare_core::ports::{SessionStorage, StorageError};
use tracing::{debug, warn};

use crate::config::StorageConfig;

/// Session key-value pairs kept as one JSON object on disk.
///
/// The whole map is rewritten atomically on every mutation, so a crash never
/// leaves a half-written file behind. The file holds the auth token and is
/// written owner-only.
#[derive(Debug)]
pub struct FileSessionStorage {
  path: PathBuf,
  entries: Mutex<BTreeMap<String, String>>,
}

impl FileSessionStorage {
  /// Opens (or lazily creates) the file at `path`. An unreadable JSON body
  /// is logged and replaced on the next write.
  pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
    let path = path.into();
    let content =
      artshare_fs::read_optional(&path).map_err(|e| StorageError::Io(format!("{}: {e}", path.display())))?;

    let entries = match content.as_deref().map(str::trim) {
      None | Some("") => BTreeMap::new(),
      Some(raw) => serde_json::from_str(raw).unwrap_or_else(|e| {
        warn!(path = %path.display(), "discarding unreadable session file: {e}");
        BTreeMap::new()
      }),
    };

    debug!(path = %path.display(), keys = entries.len(), "session storage opened");
    Ok(Self { path, entries: Mutex::new(entries) })
  }

  pub fn from_config(cfg: &StorageConfig) -> Result<Self, StorageError> {
    Self::open(&cfg.session_file)
  }

  pub fn path(&self) -> &Path {
    &self.path
  }

  fn lock(&self) -> Result<MutexGuard<'_, BTreeMap<String, String>>, StorageError> {
    self.entries.lock().map_err(|_| StorageError::Unavailable("session file lock poisoned".into()))
  }

  fn persist(&self, entries: &BTreeMap<String, String>) -> Result<(), StorageError> {
    let json =
      serde_json::to_string_pretty(entries).map_err(|e| StorageError::Serialization(e.to_string()))?;
    artshare_fs::atomic_write_private(&self.path, &json)
      .map_err(|e| StorageError::Io(format!("{}: {e}", self.path.display())))
  }
}

impl SessionStorage for FileSessionStorage {
  fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
    Ok(self.lock()?.get(key).cloned())
  }

  fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
    let mut entries = self.lock()?;
    entries.insert(key.to_string(), value.to_string());
    self.persist(&entries)
  }

  fn remove(&self, key: &str) -> Result<(), StorageError> {
    let mut entries = self.lock()?;
    if entries.remove(key).is_none() {
      return Ok(());
    }
    self.persist(&entries)
  }
}
