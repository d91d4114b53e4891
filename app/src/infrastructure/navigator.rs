use artshare_core::domain::Route;
use artshare_core::ports::Navigator;
use tracing::debug;

/// A `Navigator` for the terminal: there are no screens to switch, so
/// routes that need user action are turned into hints on stderr.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalNavigator;

impl Navigator for TerminalNavigator {
  fn navigate(&self, route: Route) {
    debug!(%route, "navigate");
    match route {
      Route::SignIn => eprintln!("Sign in with `artshare login <username>`."),
      Route::SignUp => eprintln!("Create an account with `artshare register`."),
      _ => {}
    }
  }
}
