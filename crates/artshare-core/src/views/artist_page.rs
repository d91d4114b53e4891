use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::artist::Artist;
use crate::domain::authorship::ArtistQuery;
use crate::ports::HttpTransport;
use crate::services::ApiGateway;
use crate::views::gallery::{ArtworkCard, Lightbox};
use crate::views::{Loadable, ViewScope};

pub const NO_ARTWORKS: &str = "No artworks found for this artist.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtistPage {
  pub query: ArtistQuery,
  pub heading: String,
  pub artist: Option<Artist>,
  pub avatar_url: Option<String>,
  pub artworks: Vec<ArtworkCard>,
}

impl ArtistPage {
  pub fn empty_message(&self) -> Option<&'static str> {
    self.artworks.is_empty().then_some(NO_ARTWORKS)
  }
}

/// All works by one artist, addressed by id or username.
pub struct ArtistPageView<T>
where
  T: HttpTransport,
{
  gateway: Arc<ApiGateway<T>>,
  param: String,
  scope: ViewScope,
  state: Loadable<ArtistPage>,
  lightbox: Lightbox,
}

impl<T> ArtistPageView<T>
where
  T: HttpTransport,
{
  pub fn new(gateway: Arc<ApiGateway<T>>, param: impl Into<String>) -> Self {
    Self {
      gateway,
      param: param.into(),
      scope: ViewScope::new(),
      state: Loadable::Loading,
      lightbox: Lightbox::default(),
    }
  }

  pub fn scope(&self) -> &ViewScope {
    &self.scope
  }

  /// Fetches the catalogue and, for numeric parameters, the artist record
  /// concurrently. Either failure degrades instead of failing the page.
  pub async fn load(&mut self) -> &Loadable<ArtistPage> {
    let query = ArtistQuery::parse(&self.param);
    let gateway = self.gateway.as_ref();

    let fetch_artist = async {
      let ArtistQuery::ById(id) = &query else {
        return None;
      };
      match gateway.get_artist(*id).await {
        Ok(artist) => Some(artist),
        Err(e) => {
          warn!(artist = %id, "artist record unavailable: {e}");
          None
        }
      }
    };

    let handle = self.scope.handle();
    let joined = handle.guard(async { futures::join!(gateway.list_artworks(), fetch_artist) }).await;
    let Some((artworks, artist)) = joined else {
      return &self.state;
    };

    let artworks = artworks.unwrap_or_else(|e| {
      warn!("artwork list unavailable: {e}");
      Vec::new()
    });

    let base = gateway.base();
    let cards: Vec<ArtworkCard> = query
      .filter(&artworks)
      .iter()
      .map(|aw| ArtworkCard::build(aw, artist.as_ref(), base))
      .collect();
    debug!(param = %self.param, matched = cards.len(), "artist page loaded");

    let heading = artist.as_ref().map(|a| a.username.clone()).unwrap_or_else(|| self.param.clone());
    let avatar_url = base.resolve_media_url(artist.as_ref().and_then(|a| a.profile_picture.as_deref()));

    self.lightbox = Lightbox::new(cards.len());
    self.state = Loadable::Ready(ArtistPage { query, heading, artist, avatar_url, artworks: cards });
    &self.state
  }

  pub fn state(&self) -> &Loadable<ArtistPage> {
    &self.state
  }

  pub fn lightbox(&mut self) -> &mut Lightbox {
    &mut self.lightbox
  }

  pub fn current_card(&self) -> Option<&ArtworkCard> {
    let page = self.state.ready()?;
    self.lightbox.current().and_then(|i| page.artworks.get(i))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::ApiBase;
  use crate::ports::TransportError;
  use crate::services::SessionStore;
  use crate::testing::{RecordingNavigator, ScriptedTransport, SharedStorage};
  use serde_json::json;

  fn view(transport: &ScriptedTransport, param: &str) -> ArtistPageView<ScriptedTransport> {
    let session = Arc::new(SessionStore::restore(
      Box::new(SharedStorage::default()),
      Arc::new(RecordingNavigator::default()),
    ));
    let gateway = ApiGateway::new(transport.clone(), session, ApiBase::new("http://h"));
    ArtistPageView::new(Arc::new(gateway), param)
  }

  fn catalogue() -> serde_json::Value {
    json!([
      { "id": 1, "title": "a", "artist": 7 },
      { "id": 2, "title": "b", "artist": "Mika" },
      { "id": 3, "title": "c", "artist": { "id": 7, "username": "mika" } },
      { "id": 4, "title": "d", "artist": { "pk": 8, "username": "rin" } },
    ])
  }

  fn ids(page: &ArtistPage) -> Vec<i64> {
    page.artworks.iter().map(|c| c.id.get()).collect()
  }

  #[tokio::test]
  async fn numeric_page_uses_fetched_artist_for_heading_and_names() {
    let transport = ScriptedTransport::default();
    // join! polls the list first, so it takes the first scripted response.
    transport
      .respond(200, catalogue())
      .respond(200, json!({ "id": 7, "username": "mika", "profile_picture": "/p.png" }));
    let mut page_view = view(&transport, "7");

    let page = page_view.load().await.ready().cloned().unwrap();

    assert_eq!(ids(&page), [1, 3]);
    assert_eq!(page.heading, "mika");
    assert_eq!(page.avatar_url.as_deref(), Some("http://h/p.png"));
    assert_eq!(page.artworks[0].artist.display_name, "mika");
    assert_eq!(page.empty_message(), None);
  }

  #[tokio::test]
  async fn username_page_matches_case_insensitively() {
    let transport = ScriptedTransport::default();
    transport.respond(200, catalogue());
    let mut page_view = view(&transport, "MIKA");

    let page = page_view.load().await.ready().cloned().unwrap();

    assert_eq!(ids(&page), [2, 3]);
    assert_eq!(page.heading, "MIKA");
    assert_eq!(transport.sent().len(), 1);
  }

  #[tokio::test]
  async fn failures_degrade_to_empty_page() {
    let transport = ScriptedTransport::default();
    transport
      .fail(TransportError::Unreachable("down".into()))
      .respond(404, json!({ "detail": "Not found." }));
    let mut page_view = view(&transport, "12");

    let page = page_view.load().await.ready().cloned().unwrap();

    assert!(page.artist.is_none());
    assert_eq!(page.heading, "12");
    assert_eq!(page.empty_message(), Some(NO_ARTWORKS));
  }
}
