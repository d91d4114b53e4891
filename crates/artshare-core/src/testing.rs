//! In-crate fakes for the ports.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::domain::artist::Artist;
use crate::domain::ids::ArtistId;
use crate::domain::route::Route;
use crate::ports::{
  ApiRequest, ApiResponse, HttpTransport, MemorySessionStorage, Navigator, SessionStorage,
  StorageError, TransportError, UploadProgress,
};

pub fn sample_artist(id: i64, username: &str) -> Artist {
  Artist {
    id: ArtistId::new(id),
    username: username.to_string(),
    email: format!("{username}@example.com"),
    bio: None,
    profile_picture: None,
    created_at: Some("2024-05-01T10:00:00Z".to_string()),
  }
}

#[derive(Debug, Default)]
pub struct RecordingNavigator {
  routes: Mutex<Vec<Route>>,
}

impl RecordingNavigator {
  pub fn routes(&self) -> Vec<Route> {
    self.routes.lock().unwrap().clone()
  }
}

impl Navigator for RecordingNavigator {
  fn navigate(&self, route: Route) {
    self.routes.lock().unwrap().push(route);
  }
}

#[derive(Debug, Default)]
pub struct RecordingProgress {
  events: Mutex<Vec<String>>,
}

impl RecordingProgress {
  pub fn events(&self) -> Vec<String> {
    self.events.lock().unwrap().clone()
  }
}

impl UploadProgress for RecordingProgress {
  fn start(&self, total_bytes: u64) {
    self.events.lock().unwrap().push(format!("start {total_bytes}"));
  }

  fn advance(&self, sent_bytes: u64, total_bytes: u64) {
    self.events.lock().unwrap().push(format!("{sent_bytes}/{total_bytes}"));
  }

  fn finish(&self) {
    self.events.lock().unwrap().push("finish".to_string());
  }
}

/// Memory storage that the test keeps a handle to after handing it over.
#[derive(Debug, Clone, Default)]
pub struct SharedStorage(Arc<MemorySessionStorage>);

impl SharedStorage {
  pub fn value(&self, key: &str) -> Option<String> {
    self.0.get(key).unwrap()
  }
}

impl From<MemorySessionStorage> for SharedStorage {
  fn from(storage: MemorySessionStorage) -> Self {
    SharedStorage(Arc::new(storage))
  }
}

impl SessionStorage for SharedStorage {
  fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
    self.0.get(key)
  }

  fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
    self.0.set(key, value)
  }

  fn remove(&self, key: &str) -> Result<(), StorageError> {
    self.0.remove(key)
  }
}

/// Transport answering from a queue and recording what was sent.
#[derive(Debug, Clone, Default)]
pub struct ScriptedTransport {
  responses: Arc<Mutex<VecDeque<Result<ApiResponse, TransportError>>>>,
  sent: Arc<Mutex<Vec<ApiRequest>>>,
}

impl ScriptedTransport {
  pub fn respond(&self, status: u16, body: serde_json::Value) -> &Self {
    self.respond_with_headers(status, body, &[])
  }

  pub fn respond_with_headers(
    &self,
    status: u16,
    body: serde_json::Value,
    headers: &[(&str, &str)],
  ) -> &Self {
    let body = if body.is_null() { Vec::new() } else { serde_json::to_vec(&body).unwrap() };
    let headers: HashMap<String, String> =
      headers.iter().map(|(k, v)| (k.to_ascii_lowercase(), v.to_string())).collect();
    self.responses.lock().unwrap().push_back(Ok(ApiResponse { status, headers, body }));
    self
  }

  pub fn fail(&self, error: TransportError) -> &Self {
    self.responses.lock().unwrap().push_back(Err(error));
    self
  }

  pub fn sent(&self) -> Vec<ApiRequest> {
    self.sent.lock().unwrap().clone()
  }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
  async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
    self.sent.lock().unwrap().push(request);
    self
      .responses
      .lock()
      .unwrap()
      .pop_front()
      .unwrap_or_else(|| Err(TransportError::Request("no scripted response left".into())))
  }
}
