use std::fmt;

use crate::domain::authorship::NavTarget;

/// Screens the client can be sent to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
  Home,
  SignIn,
  SignUp,
  Profile,
  EditProfile,
  Upload,
  Gallery,
  Artist(NavTarget),
}

impl Route {
  pub fn path(&self) -> String {
    match self {
      Route::Home => "/".to_string(),
      Route::SignIn => "/signin".to_string(),
      Route::SignUp => "/signup".to_string(),
      Route::Profile => "/profile".to_string(),
      Route::EditProfile => "/profile/edit".to_string(),
      Route::Upload => "/upload".to_string(),
      Route::Gallery => "/gallery".to_string(),
      Route::Artist(target) => format!("/artists/{target}"),
    }
  }

  /// Routes that require a token.
  pub fn is_protected(&self) -> bool {
    matches!(self, Route::Profile | Route::EditProfile | Route::Upload)
  }
}

impl fmt::Display for Route {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.path())
  }
}
