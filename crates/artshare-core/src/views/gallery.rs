use std::sync::Arc;

use tracing::warn;

use crate::domain::artist::Artist;
use crate::domain::artwork::Artwork;
use crate::domain::authorship::{ArtistDisplay, resolve_artist_display};
use crate::domain::ids::ArtworkId;
use crate::domain::ApiBase;
use crate::ports::HttpTransport;
use crate::services::ApiGateway;
use crate::views::{Loadable, ViewScope};

/// One artwork ready for display, URLs already absolute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtworkCard {
  pub id: ArtworkId,
  pub title: String,
  pub image_url: Option<String>,
  pub description: Option<String>,
  pub artist: ArtistDisplay,
  pub avatar_url: Option<String>,
  pub created_at: Option<String>,
}

impl ArtworkCard {
  pub fn build(artwork: &Artwork, fetched: Option<&Artist>, base: &ApiBase) -> Self {
    let artist = resolve_artist_display(artwork, fetched);
    let avatar_url = base.resolve_media_url(artist.avatar.as_deref());

    Self {
      id: artwork.id,
      title: artwork.title.clone(),
      image_url: base.resolve_media_url(artwork.image.as_deref()),
      description: artwork.description.clone().filter(|d| !d.is_empty()),
      artist,
      avatar_url,
      created_at: artwork.created_at.clone(),
    }
  }
}

/// Full-size viewer over a list of `len` items.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Lightbox {
  len: usize,
  index: Option<usize>,
}

impl Lightbox {
  pub fn new(len: usize) -> Self {
    Self { len, index: None }
  }

  /// Out-of-range indices leave the lightbox unchanged.
  pub fn open(&mut self, index: usize) {
    if index < self.len {
      self.index = Some(index);
    }
  }

  pub fn close(&mut self) {
    self.index = None;
  }

  pub fn next(&mut self) {
    if let Some(i) = self.index {
      self.index = Some((i + 1) % self.len);
    }
  }

  pub fn prev(&mut self) {
    if let Some(i) = self.index {
      self.index = Some((i + self.len - 1) % self.len);
    }
  }

  pub fn current(&self) -> Option<usize> {
    self.index
  }

  pub fn is_open(&self) -> bool {
    self.index.is_some()
  }
}

pub struct GalleryView<T>
where
  T: HttpTransport,
{
  gateway: Arc<ApiGateway<T>>,
  scope: ViewScope,
  state: Loadable<Vec<ArtworkCard>>,
  lightbox: Lightbox,
}

impl<T> GalleryView<T>
where
  T: HttpTransport,
{
  pub fn new(gateway: Arc<ApiGateway<T>>) -> Self {
    Self { gateway, scope: ViewScope::new(), state: Loadable::Loading, lightbox: Lightbox::default() }
  }

  pub fn scope(&self) -> &ViewScope {
    &self.scope
  }

  pub async fn load(&mut self) -> &Loadable<Vec<ArtworkCard>> {
    let handle = self.scope.handle();
    let Some(result) = handle.guard(self.gateway.list_artworks()).await else {
      return &self.state;
    };

    self.state = match result {
      Ok(artworks) => {
        let base = self.gateway.base();
        let cards: Vec<ArtworkCard> =
          artworks.iter().map(|aw| ArtworkCard::build(aw, None, base)).collect();
        self.lightbox = Lightbox::new(cards.len());
        Loadable::Ready(cards)
      }
      Err(e) => {
        warn!("gallery load failed: {e}");
        Loadable::Failed(e.to_string())
      }
    };
    &self.state
  }

  pub fn state(&self) -> &Loadable<Vec<ArtworkCard>> {
    &self.state
  }

  pub fn cards(&self) -> &[ArtworkCard] {
    self.state.ready().map(Vec::as_slice).unwrap_or_default()
  }

  pub fn lightbox(&mut self) -> &mut Lightbox {
    &mut self.lightbox
  }

  pub fn current_card(&self) -> Option<&ArtworkCard> {
    self.lightbox.current().and_then(|i| self.cards().get(i))
  }
}
