use std::collections::BTreeMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{debug, info, warn};

use crate::domain::artist::Artist;
use crate::domain::ids::ArtistId;
use crate::domain::route::Route;
use crate::ports::session_storage::{
  ARTIST_ID_KEY, ARTIST_KEY, COOKIE_SESSION_KEY, COOKIES_KEY, TOKEN_KEY,
};
use crate::ports::{Navigator, SessionStorage, StorageError};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
  pub token: Option<String>,
  pub artist: Option<Artist>,
  /// Signed in through the backend's session cookie rather than a token.
  pub cookie_session: bool,
  /// Backend cookies, name to value.
  pub cookies: BTreeMap<String, String>,
}

/// Process-wide authentication state mirrored into persistent storage.
///
/// Restored once by [`SessionStore::restore`]; every mutation updates memory
/// first and then re-synchronizes storage. Share it as `Arc<SessionStore>`.
pub struct SessionStore {
  state: RwLock<Session>,
  storage: Box<dyn SessionStorage>,
  navigator: Arc<dyn Navigator>,
}

impl SessionStore {
  /// Loads the persisted session from storage. Unreadable entries are logged
  /// and treated as absent so a corrupt file never blocks startup.
  pub fn restore(storage: Box<dyn SessionStorage>, navigator: Arc<dyn Navigator>) -> Self {
    let token = match storage.get(TOKEN_KEY) {
      Ok(token) => token.filter(|t| !t.is_empty()),
      Err(e) => {
        warn!("could not read stored token: {e}");
        None
      }
    };

    let artist = match storage.get(ARTIST_KEY) {
      Ok(Some(raw)) => match serde_json::from_str::<Artist>(&raw) {
        Ok(artist) => Some(artist),
        Err(e) => {
          warn!("ignoring unparsable stored artist: {e}");
          None
        }
      },
      Ok(None) => None,
      Err(e) => {
        warn!("could not read stored artist: {e}");
        None
      }
    };

    let cookie_session =
      matches!(storage.get(COOKIE_SESSION_KEY), Ok(Some(flag)) if flag == "true");

    let cookies = match storage.get(COOKIES_KEY) {
      Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|e| {
        warn!("ignoring unparsable stored cookies: {e}");
        BTreeMap::new()
      }),
      Ok(None) => BTreeMap::new(),
      Err(e) => {
        warn!("could not read stored cookies: {e}");
        BTreeMap::new()
      }
    };

    debug!(
      has_token = token.is_some(),
      has_artist = artist.is_some(),
      cookie_session,
      cookies = cookies.len(),
      "session restored"
    );

    let session = Session { token, artist, cookie_session, cookies };
    Self { state: RwLock::new(session), storage, navigator }
  }

  fn read(&self) -> RwLockReadGuard<'_, Session> {
    self.state.read().unwrap_or_else(|poisoned| poisoned.into_inner())
  }

  fn write(&self) -> RwLockWriteGuard<'_, Session> {
    self.state.write().unwrap_or_else(|poisoned| poisoned.into_inner())
  }

  pub fn snapshot(&self) -> Session {
    self.read().clone()
  }

  pub fn token(&self) -> Option<String> {
    self.read().token.clone()
  }

  /// A stored token, or a login the backend accepted through its cookie.
  pub fn is_authenticated(&self) -> bool {
    let state = self.read();
    state.token.is_some() || state.cookie_session
  }

  pub fn set_cookie_session(&self, enabled: bool) -> Result<(), StorageError> {
    self.write().cookie_session = enabled;

    let result = if enabled {
      self.storage.set(COOKIE_SESSION_KEY, "true")
    } else {
      self.storage.remove(COOKIE_SESSION_KEY)
    };
    log_storage_failure("cookie session flag", result)
  }

  pub fn cookies(&self) -> BTreeMap<String, String> {
    self.read().cookies.clone()
  }

  /// Applies `update` to the cookie map and persists the result, all under
  /// the write lock. Storage is untouched when nothing changed.
  pub fn update_cookies<F>(&self, update: F) -> Result<(), StorageError>
  where
    F: FnOnce(&mut BTreeMap<String, String>),
  {
    let mut state = self.write();
    let before = state.cookies.clone();
    update(&mut state.cookies);
    if state.cookies == before {
      return Ok(());
    }

    let result = if state.cookies.is_empty() {
      self.storage.remove(COOKIES_KEY)
    } else {
      serde_json::to_string(&state.cookies)
        .map_err(|e| StorageError::Serialization(e.to_string()))
        .and_then(|raw| self.storage.set(COOKIES_KEY, &raw))
    };
    log_storage_failure("cookies", result)
  }

  pub fn set_token(&self, token: Option<String>) -> Result<(), StorageError> {
    let token = token.filter(|t| !t.is_empty());
    self.write().token = token.clone();

    let result = match &token {
      Some(t) => self.storage.set(TOKEN_KEY, t),
      None => self.storage.remove(TOKEN_KEY),
    };
    log_storage_failure("token", result)
  }

  pub fn artist(&self) -> Option<Artist> {
    self.read().artist.clone()
  }

  pub fn set_artist(&self, artist: Option<Artist>) -> Result<(), StorageError> {
    self.write().artist = artist.clone();

    let result = match &artist {
      Some(a) => serde_json::to_string(a)
        .map_err(|e| StorageError::Serialization(e.to_string()))
        .and_then(|raw| self.storage.set(ARTIST_KEY, &raw))
        .and_then(|_| self.storage.set(ARTIST_ID_KEY, &a.id.to_string())),
      None => self.storage.remove(ARTIST_KEY).and_then(|_| self.storage.remove(ARTIST_ID_KEY)),
    };
    log_storage_failure("artist", result)
  }

  /// Cached artist's id, else the bare `artistId` left in storage.
  pub fn artist_id(&self) -> Option<ArtistId> {
    if let Some(artist) = self.read().artist.as_ref() {
      return Some(artist.id);
    }

    match self.storage.get(ARTIST_ID_KEY) {
      Ok(raw) => raw.and_then(|r| r.parse().ok()),
      Err(e) => {
        warn!("could not read stored artist id: {e}");
        None
      }
    }
  }

  /// Clears token, artist, artist id and backend cookies, then sends the
  /// user home.
  pub fn logout(&self) -> Result<(), StorageError> {
    *self.write() = Session::default();

    let result = [TOKEN_KEY, ARTIST_KEY, ARTIST_ID_KEY, COOKIE_SESSION_KEY, COOKIES_KEY]
      .into_iter()
      .try_for_each(|key| self.storage.remove(key));

    info!("logged out");
    self.navigator.navigate(Route::Home);
    log_storage_failure("logout", result)
  }

  /// Called when the backend rejects the credentials: drop the token and
  /// any cookie session, then ask for sign-in.
  pub fn expire(&self) {
    {
      let mut state = self.write();
      state.token = None;
      state.cookie_session = false;
      state.cookies.clear();
    }

    for key in [TOKEN_KEY, COOKIE_SESSION_KEY, COOKIES_KEY] {
      if let Err(e) = self.storage.remove(key) {
        warn!("could not remove expired {key} from storage: {e}");
      }
    }

    info!("session expired, redirecting to sign-in");
    self.navigator.navigate(Route::SignIn);
  }

  pub fn navigate(&self, route: Route) {
    self.navigator.navigate(route);
  }
}

fn log_storage_failure(what: &str, result: Result<(), StorageError>) -> Result<(), StorageError> {
  if let Err(e) = &result {
    warn!("failed to persist {what}: {e}");
  }
  result
}
