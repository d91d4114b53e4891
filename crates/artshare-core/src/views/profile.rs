use std::sync::Arc;

use tracing::warn;

use crate::domain::artist::Artist;
use crate::errors::ApiError;
use crate::ports::HttpTransport;
use crate::services::ApiGateway;
use crate::views::{Loadable, ViewScope};

pub const NO_PROFILE: &str = "No profile available. Please sign in.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileCard {
  pub artist: Artist,
  pub avatar_url: Option<String>,
}

/// The signed-in artist: the session cache, else a fetch by the stored id.
/// `Ok(None)` when neither is available.
pub(crate) async fn signed_in_artist<T>(gateway: &ApiGateway<T>) -> Result<Option<Artist>, ApiError>
where
  T: HttpTransport,
{
  let session = gateway.session();
  if let Some(artist) = session.artist() {
    return Ok(Some(artist));
  }

  match session.artist_id() {
    Some(id) => gateway.get_artist(id).await.map(Some),
    None => Ok(None),
  }
}

pub struct ProfileView<T>
where
  T: HttpTransport,
{
  gateway: Arc<ApiGateway<T>>,
  scope: ViewScope,
  state: Loadable<ProfileCard>,
}

impl<T> ProfileView<T>
where
  T: HttpTransport,
{
  pub fn new(gateway: Arc<ApiGateway<T>>) -> Self {
    Self { gateway, scope: ViewScope::new(), state: Loadable::Loading }
  }

  pub fn scope(&self) -> &ViewScope {
    &self.scope
  }

  pub async fn load(&mut self) -> &Loadable<ProfileCard> {
    let handle = self.scope.handle();
    let Some(result) = handle.guard(signed_in_artist(self.gateway.as_ref())).await else {
      return &self.state;
    };

    self.state = match result {
      Ok(Some(artist)) => {
        let avatar_url = self.gateway.resolve_media_url(artist.profile_picture.as_deref());
        Loadable::Ready(ProfileCard { artist, avatar_url })
      }
      Ok(None) => Loadable::Failed(NO_PROFILE.to_string()),
      Err(e) => {
        warn!("profile load failed: {e}");
        Loadable::Failed(e.to_string())
      }
    };
    &self.state
  }

  pub fn state(&self) -> &Loadable<ProfileCard> {
    &self.state
  }
}
