use crate::domain::route::Route;
use crate::services::SessionStore;

/// Gate for protected screens. Without a token or cookie session the user is
/// sent to sign-in and `false` is returned.
pub fn require_auth(session: &SessionStore, route: &Route) -> bool {
  if !route.is_protected() || session.is_authenticated() {
    return true;
  }

  tracing::debug!(%route, "not signed in, redirecting to sign-in");
  session.navigate(Route::SignIn);
  false
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::testing::{RecordingNavigator, SharedStorage};
  use std::sync::Arc;

  fn store() -> (SessionStore, Arc<RecordingNavigator>) {
    let navigator = Arc::new(RecordingNavigator::default());
    (SessionStore::restore(Box::new(SharedStorage::default()), navigator.clone()), navigator)
  }

  #[test]
  fn public_routes_pass_without_token() {
    let (session, navigator) = store();
    assert!(require_auth(&session, &Route::Gallery));
    assert!(navigator.routes().is_empty());
  }

  #[test]
  fn protected_route_redirects_after_logout() {
    let (session, navigator) = store();
    session.set_token(Some("Token t".into())).unwrap();
    assert!(require_auth(&session, &Route::Upload));

    session.logout().unwrap();

    assert!(!require_auth(&session, &Route::Profile));
    assert_eq!(navigator.routes(), vec![Route::Home, Route::SignIn]);
  }

  #[test]
  fn cookie_session_passes_without_token() {
    let (session, navigator) = store();
    session.set_cookie_session(true).unwrap();

    assert!(require_auth(&session, &Route::Upload));
    assert!(navigator.routes().is_empty());
  }
}
