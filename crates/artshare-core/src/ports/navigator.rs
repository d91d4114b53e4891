use crate::domain::route::Route;

/// Port through which the core asks the front end to change screens.
///
/// Navigation is a signal, not a call into a router: the front end decides
/// how (or whether) to honor it.
pub trait Navigator: Send + Sync {
  fn navigate(&self, route: Route);
}

/// Drops every navigation request.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopNavigator;

impl Navigator for NoopNavigator {
  fn navigate(&self, _route: Route) {}
}
