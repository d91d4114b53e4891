//! Artist resolution for artworks.
//!
//! Every place that shows who made an artwork (gallery card, lightbox caption,
//! artist page) goes through [`resolve_artist_display`] or
//! [`resolve_identity`], so "by X" and "all works by X" never disagree.

use std::fmt;

use crate::domain::artist::Artist;
use crate::domain::artwork::{ArtistRef, Artwork};
use crate::domain::ids::ArtistId;

pub const UNKNOWN_ARTIST: &str = "Unknown";

/// Where a click on the artist name leads: `/artists/{target}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NavTarget {
  Id(ArtistId),
  Username(String),
}

impl fmt::Display for NavTarget {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      NavTarget::Id(id) => id.fmt(f),
      NavTarget::Username(name) => f.write_str(name),
    }
  }
}

/// What the UI needs to render an artwork's author.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtistDisplay {
  pub display_name: String,
  /// Raw avatar path; resolve it against the API base before use.
  pub avatar: Option<String>,
  /// `None` means the name is rendered without a link.
  pub navigation: Option<NavTarget>,
}

/// Resolved author identity, used for matching rather than display.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArtistIdentity {
  pub id: Option<ArtistId>,
  pub username: Option<String>,
}

fn non_empty(value: Option<&String>) -> Option<&str> {
  value.map(String::as_str).filter(|s| !s.is_empty())
}

/// Artwork-level author name, if the backend flattened one onto the record.
fn artwork_level_name(artwork: &Artwork) -> Option<&str> {
  non_empty(artwork.artist_username.as_ref())
    .or_else(|| non_empty(artwork.artist_name.as_ref()))
    .or_else(|| non_empty(artwork.artist_display_name.as_ref()))
}

/// Numeric id carried by the artist reference, whatever its shape.
fn reference_id(reference: &ArtistRef) -> Option<ArtistId> {
  match reference {
    ArtistRef::Id(id) => Some(*id),
    ArtistRef::Username(_) => None,
    ArtistRef::Object(obj) => obj.id.or(obj.pk).or_else(|| obj.artist.as_ref().and_then(|n| n.id)),
  }
}

/// Username carried by the artist reference (steps 3 and 4 of resolution).
fn reference_name(reference: &ArtistRef) -> Option<&str> {
  match reference {
    ArtistRef::Id(_) => None,
    ArtistRef::Username(name) => Some(name.as_str()).filter(|s| !s.is_empty()),
    ArtistRef::Object(obj) => non_empty(obj.username.as_ref())
      .or_else(|| non_empty(obj.artist_username.as_ref()))
      .or_else(|| obj.artist.as_ref().and_then(|n| non_empty(n.username.as_ref()))),
  }
}

fn reference_avatar(reference: &ArtistRef) -> Option<&str> {
  match reference {
    ArtistRef::Object(obj) => non_empty(obj.profile_picture.as_ref())
      .or_else(|| obj.artist.as_ref().and_then(|n| non_empty(n.profile_picture.as_ref()))),
    _ => None,
  }
}

/// Resolves display name, avatar and link target for an artwork's author.
///
/// Precedence, first match wins:
/// 1. artwork-level name (`artist_username`, `artist_name`, `artist_display_name`)
/// 2. numeric reference: link by id, name from `fetched` when it is that artist
/// 3. string reference: used as both name and link
/// 4. object reference: `username`, `artist_username`, nested `artist.username`;
///    link by numeric id, falling back to the name
/// 5. otherwise "Unknown" without a link
pub fn resolve_artist_display(artwork: &Artwork, fetched: Option<&Artist>) -> ArtistDisplay {
  let reference = artwork.artist.as_ref();
  let ref_id = reference.and_then(reference_id);

  // The fetched record only counts when it describes the referenced artist.
  let fetched = fetched.filter(|a| ref_id.is_none_or(|id| id == a.id));

  let avatar = reference
    .and_then(reference_avatar)
    .or_else(|| fetched.and_then(|a| non_empty(a.profile_picture.as_ref())))
    .map(str::to_string);

  if let Some(name) = artwork_level_name(artwork) {
    return ArtistDisplay {
      display_name: name.to_string(),
      avatar,
      navigation: Some(NavTarget::Username(name.to_string())),
    };
  }

  let (display_name, navigation) = match reference {
    Some(ArtistRef::Id(id)) => {
      let name = fetched
        .and_then(|a| Some(a.username.as_str()).filter(|s| !s.is_empty()))
        .unwrap_or(UNKNOWN_ARTIST);
      (name.to_string(), Some(NavTarget::Id(*id)))
    }
    Some(ArtistRef::Username(name)) if !name.is_empty() => {
      (name.clone(), Some(NavTarget::Username(name.clone())))
    }
    Some(r @ ArtistRef::Object(_)) => match (reference_name(r), ref_id) {
      (Some(name), Some(id)) => (name.to_string(), Some(NavTarget::Id(id))),
      (Some(name), None) => (name.to_string(), Some(NavTarget::Username(name.to_string()))),
      (None, id) => (UNKNOWN_ARTIST.to_string(), id.map(NavTarget::Id)),
    },
    _ => (UNKNOWN_ARTIST.to_string(), None),
  };

  ArtistDisplay { display_name, avatar, navigation }
}

/// The author's id and username as resolution sees them.
///
/// The username follows the same precedence as the displayed name; the id is
/// whatever numeric id the artist reference carries.
pub fn resolve_identity(artwork: &Artwork) -> ArtistIdentity {
  let reference = artwork.artist.as_ref();
  let username = artwork_level_name(artwork).or_else(|| reference.and_then(reference_name));

  ArtistIdentity { id: reference.and_then(reference_id), username: username.map(str::to_string) }
}

/// Route parameter of the artist page: a numeric id or a username.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArtistQuery {
  ById(ArtistId),
  /// Stored lowercased.
  ByUsername(String),
}

impl ArtistQuery {
  pub fn parse(param: &str) -> Self {
    let param = param.trim();
    match param.parse::<ArtistId>() {
      Ok(id) => ArtistQuery::ById(id),
      Err(_) => ArtistQuery::ByUsername(param.to_lowercase()),
    }
  }

  pub fn matches(&self, artwork: &Artwork) -> bool {
    let identity = resolve_identity(artwork);
    match self {
      ArtistQuery::ById(id) => identity.id == Some(*id),
      ArtistQuery::ByUsername(name) => {
        identity.username.is_some_and(|u| u.to_lowercase() == *name)
      }
    }
  }

  pub fn filter<'a, I>(&self, artworks: I) -> Vec<Artwork>
  where
    I: IntoIterator<Item = &'a Artwork>,
  {
    artworks.into_iter().filter(|aw| self.matches(aw)).cloned().collect()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::artwork::{ArtistObject, NestedArtist};
  use crate::domain::ids::ArtworkId;

  fn artwork(id: i64, artist: Option<ArtistRef>) -> Artwork {
    Artwork {
      id: ArtworkId::new(id),
      title: format!("work {id}"),
      image: Some(format!("/media/{id}.png")),
      description: None,
      artist,
      artist_username: None,
      artist_name: None,
      artist_display_name: None,
      created_at: None,
    }
  }

  fn object(obj: ArtistObject) -> Option<ArtistRef> {
    Some(ArtistRef::Object(Box::new(obj)))
  }

  fn fetched(id: i64, username: &str) -> Artist {
    Artist {
      id: ArtistId::new(id),
      username: username.into(),
      email: String::new(),
      bio: None,
      profile_picture: Some("/media/avatars/x.png".into()),
      created_at: None,
    }
  }

  #[test]
  fn numeric_reference_links_by_id() {
    for n in [0, 1, 42, 9_000] {
      let display = resolve_artist_display(&artwork(1, Some(ArtistRef::Id(n.into()))), None);
      assert_eq!(display.navigation, Some(NavTarget::Id(ArtistId::new(n))));
      assert_eq!(display.display_name, UNKNOWN_ARTIST);
    }
  }

  #[test]
  fn numeric_reference_takes_name_from_matching_fetched_artist() {
    let aw = artwork(1, Some(ArtistRef::Id(5.into())));

    let display = resolve_artist_display(&aw, Some(&fetched(5, "mika")));
    assert_eq!(display.display_name, "mika");
    assert_eq!(display.avatar.as_deref(), Some("/media/avatars/x.png"));

    let display = resolve_artist_display(&aw, Some(&fetched(6, "other")));
    assert_eq!(display.display_name, UNKNOWN_ARTIST);
    assert_eq!(display.avatar, None);
  }

  #[test]
  fn string_reference_is_name_and_target() {
    let display = resolve_artist_display(&artwork(1, Some(ArtistRef::Username("rin".into()))), None);
    assert_eq!(display.display_name, "rin");
    assert_eq!(display.navigation, Some(NavTarget::Username("rin".into())));
  }

  #[test]
  fn object_username_is_displayed() {
    let aw = artwork(1, object(ArtistObject { username: Some("u".into()), ..Default::default() }));
    let display = resolve_artist_display(&aw, None);

    assert_eq!(display.display_name, "u");
    assert_eq!(display.navigation, Some(NavTarget::Username("u".into())));
  }

  #[test]
  fn object_prefers_numeric_id_for_navigation() {
    let aw = artwork(
      1,
      object(ArtistObject {
        id: Some(3.into()),
        username: Some("u".into()),
        profile_picture: Some("/media/u.png".into()),
        ..Default::default()
      }),
    );
    let display = resolve_artist_display(&aw, None);

    assert_eq!(display.navigation, Some(NavTarget::Id(3.into())));
    assert_eq!(display.avatar.as_deref(), Some("/media/u.png"));
  }

  #[test]
  fn object_falls_back_to_artist_username_then_nested() {
    let aw = artwork(
      1,
      object(ArtistObject { artist_username: Some("alt".into()), ..Default::default() }),
    );
    assert_eq!(resolve_artist_display(&aw, None).display_name, "alt");

    let aw = artwork(
      1,
      object(ArtistObject {
        artist: Some(NestedArtist { id: Some(8.into()), username: Some("deep".into()), ..Default::default() }),
        ..Default::default()
      }),
    );
    let display = resolve_artist_display(&aw, None);
    assert_eq!(display.display_name, "deep");
    assert_eq!(display.navigation, Some(NavTarget::Id(8.into())));
  }

  #[test]
  fn artwork_level_name_wins_over_every_reference_shape() {
    let shapes = [
      None,
      Some(ArtistRef::Id(1.into())),
      Some(ArtistRef::Username("someone".into())),
      object(ArtistObject { id: Some(2.into()), username: Some("obj".into()), ..Default::default() }),
    ];

    for shape in shapes {
      let mut aw = artwork(1, shape);
      aw.artist_username = Some("flat".into());
      let display = resolve_artist_display(&aw, Some(&fetched(1, "fetched")));

      assert_eq!(display.display_name, "flat");
      assert_eq!(display.navigation, Some(NavTarget::Username("flat".into())));
    }
  }

  #[test]
  fn artist_name_and_display_name_are_secondary_flat_fields() {
    let mut aw = artwork(1, None);
    aw.artist_display_name = Some("display".into());
    assert_eq!(resolve_artist_display(&aw, None).display_name, "display");

    aw.artist_name = Some("name".into());
    assert_eq!(resolve_artist_display(&aw, None).display_name, "name");
  }

  #[test]
  fn nothing_resolves_to_unknown_without_link() {
    for shape in [None, Some(ArtistRef::Username(String::new())), object(ArtistObject::default())] {
      let display = resolve_artist_display(&artwork(1, shape), None);
      assert_eq!(display.display_name, UNKNOWN_ARTIST);
      assert_eq!(display.navigation, None);
    }
  }

  #[test]
  fn nameless_object_still_links_by_id() {
    let aw = artwork(1, object(ArtistObject { pk: Some(4.into()), ..Default::default() }));
    let display = resolve_artist_display(&aw, None);

    assert_eq!(display.display_name, UNKNOWN_ARTIST);
    assert_eq!(display.navigation, Some(NavTarget::Id(4.into())));
  }

  #[test]
  fn query_parses_numeric_or_username() {
    assert_eq!(ArtistQuery::parse("12"), ArtistQuery::ById(12.into()));
    assert_eq!(ArtistQuery::parse(" 12 "), ArtistQuery::ById(12.into()));
    assert_eq!(ArtistQuery::parse("Mika"), ArtistQuery::ByUsername("mika".into()));
    assert_eq!(ArtistQuery::parse(" Mika\n"), ArtistQuery::ByUsername("mika".into()));
    assert_eq!(ArtistQuery::parse("12a"), ArtistQuery::ByUsername("12a".into()));
  }

  fn mixed_catalogue() -> Vec<Artwork> {
    let mut flat = artwork(5, Some(ArtistRef::Id(7.into())));
    flat.artist_username = Some("Flat".into());

    vec![
      artwork(1, Some(ArtistRef::Id(7.into()))),
      artwork(2, Some(ArtistRef::Username("MIKA".into()))),
      artwork(3, object(ArtistObject { id: Some(7.into()), username: Some("mika".into()), ..Default::default() })),
      artwork(4, object(ArtistObject { pk: Some(9.into()), artist_username: Some("rin".into()), ..Default::default() })),
      flat,
      artwork(6, None),
      artwork(
        7,
        object(ArtistObject {
          artist: Some(NestedArtist { id: Some(7.into()), username: Some("Mika".into()), ..Default::default() }),
          ..Default::default()
        }),
      ),
    ]
  }

  fn ids(artworks: &[Artwork]) -> Vec<i64> {
    artworks.iter().map(|a| a.id.get()).collect()
  }

  #[test]
  fn filter_by_id_matches_every_reference_shape() {
    let all = mixed_catalogue();
    assert_eq!(ids(&ArtistQuery::parse("7").filter(&all)), vec![1, 3, 5, 7]);
    assert_eq!(ids(&ArtistQuery::parse("9").filter(&all)), vec![4]);
    assert!(ArtistQuery::parse("100").filter(&all).is_empty());
  }

  #[test]
  fn filter_by_username_is_case_insensitive_and_follows_display() {
    let all = mixed_catalogue();
    assert_eq!(ids(&ArtistQuery::parse("mika").filter(&all)), vec![2, 3, 7]);
    assert_eq!(ids(&ArtistQuery::parse("RIN").filter(&all)), vec![4]);
    assert_eq!(ids(&ArtistQuery::parse(" mika ").filter(&all)), vec![2, 3, 7]);
    assert_eq!(ids(&ArtistQuery::parse("flat").filter(&all)), vec![5]);
  }

  #[test]
  fn filter_and_display_agree_on_names() {
    let all = mixed_catalogue();
    for aw in &all {
      let display = resolve_artist_display(aw, None);
      if display.display_name == UNKNOWN_ARTIST {
        continue;
      }
      let query = ArtistQuery::ByUsername(display.display_name.to_lowercase());
      assert!(query.matches(aw), "artwork {} not matched by its own name", aw.id);
    }
  }
}
