use std::collections::HashMap;
use std::sync::Mutex;

/// Keys of the persisted session.
pub const TOKEN_KEY: &str = "token";
pub const ARTIST_KEY: &str = "artist";
pub const ARTIST_ID_KEY: &str = "artistId";
/// Set when the backend authenticated the login with a cookie, not a token.
pub const COOKIE_SESSION_KEY: &str = "cookieSession";
/// Cookies set by the backend, as a JSON object of name to value.
pub const COOKIES_KEY: &str = "cookies";

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
  #[error("io error: {0}")]
  Io(String),
  #[error("serialization error: {0}")]
  Serialization(String),
  #[error("storage unavailable: {0}")]
  Unavailable(String),
}

/// Persistent string key-value store backing the session.
pub trait SessionStorage: Send + Sync {
  fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
  fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
  fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Non-persistent storage for tests and one-shot sessions.
#[derive(Debug, Default)]
pub struct MemorySessionStorage {
  entries: Mutex<HashMap<String, String>>,
}

impl MemorySessionStorage {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_entries<'a>(entries: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
    let map = entries.into_iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
    Self { entries: Mutex::new(map) }
  }

  fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>, StorageError> {
    self.entries.lock().map_err(|_| StorageError::Unavailable("session storage mutex poisoned".into()))
  }
}

impl SessionStorage for MemorySessionStorage {
  fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
    Ok(self.lock()?.get(key).cloned())
  }

  fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
    self.lock()?.insert(key.to_string(), value.to_string());
    Ok(())
  }

  fn remove(&self, key: &str) -> Result<(), StorageError> {
    self.lock()?.remove(key);
    Ok(())
  }
}
