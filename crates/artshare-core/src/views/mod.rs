//! Headless screen state.
//!
//! Each view owns a [`ViewScope`]; async completions are routed through
//! [`ScopeHandle::guard`] so nothing is applied once the view is torn down.

pub mod artist_page;
pub mod edit_profile;
pub mod forms;
pub mod gallery;
pub mod guard;
pub mod profile;

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

pub use artist_page::{ArtistPage, ArtistPageView};
pub use edit_profile::EditProfileView;
pub use forms::{SignInForm, SignupForm, UploadForm};
pub use gallery::{ArtworkCard, GalleryView, Lightbox};
pub use guard::require_auth;
pub use profile::{ProfileCard, ProfileView};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Loadable<T> {
  Loading,
  Ready(T),
  Failed(String),
}

impl<T> Loadable<T> {
  pub fn is_loading(&self) -> bool {
    matches!(self, Loadable::Loading)
  }

  pub fn ready(&self) -> Option<&T> {
    match self {
      Loadable::Ready(value) => Some(value),
      _ => None,
    }
  }

  pub fn error(&self) -> Option<&str> {
    match self {
      Loadable::Failed(message) => Some(message),
      _ => None,
    }
  }
}

/// Liveness of one mounted view. Cleared on [`ViewScope::close`] or drop.
#[derive(Debug)]
pub struct ViewScope {
  alive: Arc<AtomicBool>,
}

impl ViewScope {
  pub fn new() -> Self {
    Self { alive: Arc::new(AtomicBool::new(true)) }
  }

  pub fn handle(&self) -> ScopeHandle {
    ScopeHandle { alive: self.alive.clone() }
  }

  pub fn is_alive(&self) -> bool {
    self.alive.load(Ordering::Acquire)
  }

  pub fn close(&self) {
    self.alive.store(false, Ordering::Release);
  }
}

impl Default for ViewScope {
  fn default() -> Self {
    Self::new()
  }
}

impl Drop for ViewScope {
  fn drop(&mut self) {
    self.close();
  }
}

/// Cloneable view of a [`ViewScope`], usable from spawned work.
#[derive(Debug, Clone)]
pub struct ScopeHandle {
  alive: Arc<AtomicBool>,
}

impl ScopeHandle {
  pub fn is_alive(&self) -> bool {
    self.alive.load(Ordering::Acquire)
  }

  /// Ends the scope from outside the owning view.
  pub fn close(&self) {
    self.alive.store(false, Ordering::Release);
  }

  /// Awaits `fut`; `None` if the scope ended while it was pending.
  pub async fn guard<F>(&self, fut: F) -> Option<F::Output>
  where
    F: Future,
  {
    let output = fut.await;
    self.is_alive().then_some(output)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test]
  async fn guard_passes_results_while_alive() {
    let scope = ViewScope::new();
    assert_eq!(scope.handle().guard(async { 5 }).await, Some(5));
  }

  #[tokio::test]
  async fn guard_drops_results_after_teardown() {
    let scope = ViewScope::new();
    let handle = scope.handle();
    let closer = handle.clone();

    let result = handle
      .guard(async move {
        closer.close();
        5
      })
      .await;

    assert_eq!(result, None);
    assert!(!scope.is_alive());
  }

  #[test]
  fn dropping_the_scope_ends_it() {
    let scope = ViewScope::new();
    let handle = scope.handle();
    drop(scope);
    assert!(!handle.is_alive());
  }

  #[test]
  fn loadable_accessors() {
    let ready: Loadable<u8> = Loadable::Ready(1);
    assert_eq!(ready.ready(), Some(&1));
    assert!(Loadable::<u8>::Loading.is_loading());
    assert_eq!(Loadable::<u8>::Failed("x".into()).error(), Some("x"));
  }
}
