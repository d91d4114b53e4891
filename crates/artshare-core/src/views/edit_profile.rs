use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::domain::artist::{Artist, ArtistKey, ArtistPatch};
use crate::domain::ids::ArtistId;
use crate::domain::route::Route;
use crate::domain::upload::UploadFile;
use crate::errors::ApiError;
use crate::ports::HttpTransport;
use crate::services::ApiGateway;
use crate::views::profile::{NO_PROFILE, signed_in_artist};
use crate::views::{Loadable, ViewScope};

pub const DELETE_CONFIRMATION: &str =
  "Are you sure you want to delete your account? This is irreversible.";

/// Profile editor. Form fields are public and edited in place by the front end.
pub struct EditProfileView<T>
where
  T: HttpTransport,
{
  gateway: Arc<ApiGateway<T>>,
  scope: ViewScope,
  artist: Loadable<Artist>,
  pub username: String,
  pub bio: String,
  pub picture: Option<UploadFile>,
  error: Option<String>,
}

impl<T> EditProfileView<T>
where
  T: HttpTransport,
{
  pub fn new(gateway: Arc<ApiGateway<T>>) -> Self {
    Self {
      gateway,
      scope: ViewScope::new(),
      artist: Loadable::Loading,
      username: String::new(),
      bio: String::new(),
      picture: None,
      error: None,
    }
  }

  pub fn scope(&self) -> &ViewScope {
    &self.scope
  }

  /// Prefills the form from the signed-in artist.
  pub async fn load(&mut self) -> &Loadable<Artist> {
    let handle = self.scope.handle();
    let Some(result) = handle.guard(signed_in_artist(self.gateway.as_ref())).await else {
      return &self.artist;
    };

    self.artist = match result {
      Ok(Some(artist)) => {
        self.username = artist.username.clone();
        self.bio = artist.bio.clone().unwrap_or_default();
        Loadable::Ready(artist)
      }
      Ok(None) => Loadable::Failed(NO_PROFILE.to_string()),
      Err(e) => {
        warn!("edit profile load failed: {e}");
        Loadable::Failed(e.to_string())
      }
    };
    &self.artist
  }

  pub fn artist(&self) -> &Loadable<Artist> {
    &self.artist
  }

  pub fn error(&self) -> Option<&str> {
    self.error.as_deref()
  }

  /// Sends the non-empty fields and returns to the profile. With nothing to
  /// send no request is made and the loaded artist is returned.
  pub async fn save(&mut self) -> Result<Artist, ApiError> {
    let id = self.loaded_id()?;
    let patch = ArtistPatch {
      username: Some(self.username.trim().to_string()),
      bio: Some(self.bio.clone()),
      profile_picture: self.picture.clone(),
      ..Default::default()
    };

    self.error = None;
    if patch.is_empty() {
      debug!(artist = %id, "nothing to save");
      let current = self
        .artist
        .ready()
        .cloned()
        .ok_or_else(|| ApiError::Validation(NO_PROFILE.to_string()))?;
      self.gateway.session().navigate(Route::Profile);
      return Ok(current);
    }

    let result = self.gateway.update_artist(id, &patch).await;
    match result {
      Ok(updated) => {
        self.artist = Loadable::Ready(updated.clone());
        self.picture = None;
        self.gateway.session().navigate(Route::Profile);
        Ok(updated)
      }
      Err(e) => Err(self.fail(e)),
    }
  }

  /// Deletes the account and logs out. Does nothing unless `confirmed`;
  /// front ends ask [`DELETE_CONFIRMATION`] first.
  pub async fn delete_account(&mut self, confirmed: bool) -> Result<bool, ApiError> {
    if !confirmed {
      return Ok(false);
    }
    let id = self.loaded_id()?;

    self.error = None;
    let result = self.gateway.delete_artist(&ArtistKey::Id(id)).await;
    if let Err(e) = result {
      return Err(self.fail(e));
    }

    info!(artist = %id, "account deleted");
    self.gateway.session().logout()?;
    Ok(true)
  }

  fn loaded_id(&self) -> Result<ArtistId, ApiError> {
    self.artist.ready().map(|a| a.id).ok_or_else(|| ApiError::Validation(NO_PROFILE.to_string()))
  }

  fn fail(&mut self, e: ApiError) -> ApiError {
    warn!("profile update failed: {e}");
    self.error = Some(e.to_string());
    e
  }
}
