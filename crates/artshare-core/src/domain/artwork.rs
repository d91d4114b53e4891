use crate::domain::ids::{ArtistId, ArtworkId};
use crate::domain::upload::UploadFile;
use serde::{Deserialize, Deserializer, Serialize};

/// An artwork record as returned by the backend.
///
/// The shape of `artist` depends on the backend version (nested object, bare
/// id or bare username), and some versions also flatten the author's name onto
/// the artwork itself. [`crate::domain::authorship`] resolves all of them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Artwork {
  pub id: ArtworkId,

  #[serde(default)]
  pub title: String,

  /// Absolute URL or a path relative to the API base.
  #[serde(default)]
  pub image: Option<String>,

  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,

  #[serde(default)]
  pub artist: Option<ArtistRef>,

  // --- Artwork-level author names ---
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub artist_username: Option<String>,

  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub artist_name: Option<String>,

  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub artist_display_name: Option<String>,

  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub created_at: Option<String>,
}

/// The `artist` field of an artwork in any of its wire shapes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ArtistRef {
  Id(ArtistId),
  Username(String),
  Object(Box<ArtistObject>),
}

/// Artist-like object embedded in an artwork. Every field is optional because
/// serializers differ between backend versions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArtistObject {
  #[serde(default, deserialize_with = "lenient_id", skip_serializing_if = "Option::is_none")]
  pub id: Option<ArtistId>,

  #[serde(default, deserialize_with = "lenient_id", skip_serializing_if = "Option::is_none")]
  pub pk: Option<ArtistId>,

  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub username: Option<String>,

  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub artist_username: Option<String>,

  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub profile_picture: Option<String>,

  /// Some serializers wrap the account one level deeper.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub artist: Option<NestedArtist>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NestedArtist {
  #[serde(default, deserialize_with = "lenient_id", skip_serializing_if = "Option::is_none")]
  pub id: Option<ArtistId>,

  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub username: Option<String>,

  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub profile_picture: Option<String>,
}

/// Accepts a JSON integer or a numeric string; anything else is treated as
/// "no id" instead of failing the whole record.
fn lenient_id<'de, D>(deserializer: D) -> Result<Option<ArtistId>, D::Error>
where
  D: Deserializer<'de>,
{
  let value = Option::<serde_json::Value>::deserialize(deserializer)?;
  Ok(match value {
    Some(serde_json::Value::Number(n)) => n.as_i64().map(ArtistId::new),
    Some(serde_json::Value::String(s)) => s.parse().ok(),
    _ => None,
  })
}

#[derive(Debug, Clone)]
pub struct NewArtwork {
  pub title: String,
  pub image: UploadFile,
  pub description: Option<String>,
}

/// Partial artwork update. Absent or empty fields are not sent.
#[derive(Debug, Clone, Default)]
pub struct ArtworkPatch {
  pub title: Option<String>,
  pub image: Option<UploadFile>,
  pub description: Option<String>,
}

#[cfg(test)]
mod tests {
  use super::*;

  fn parse(json: &str) -> Artwork {
    serde_json::from_str(json).unwrap()
  }

  #[test]
  fn numeric_artist_reference() {
    let aw = parse(r#"{"id": 1, "title": "t", "image": "/m/a.png", "artist": 12}"#);
    assert_eq!(aw.artist, Some(ArtistRef::Id(ArtistId::new(12))));
  }

  #[test]
  fn string_artist_reference() {
    let aw = parse(r#"{"id": 1, "title": "t", "image": "a.png", "artist": "mika"}"#);
    assert_eq!(aw.artist, Some(ArtistRef::Username("mika".into())));
  }

  #[test]
  fn object_artist_reference_with_nested_account() {
    let aw = parse(
      r#"{"id": 1, "title": "t", "image": "a.png",
          "artist": {"pk": "4", "artist": {"id": 4, "username": "mika"}}}"#,
    );

    let Some(ArtistRef::Object(obj)) = aw.artist else { panic!("expected object reference") };
    assert_eq!(obj.id, None);
    assert_eq!(obj.pk, Some(ArtistId::new(4)));
    assert_eq!(obj.artist.unwrap().username.as_deref(), Some("mika"));
  }

  #[test]
  fn null_or_missing_artist_is_none() {
    assert_eq!(parse(r#"{"id": 1, "artist": null}"#).artist, None);
    assert_eq!(parse(r#"{"id": 1}"#).artist, None);
  }

  #[test]
  fn non_numeric_object_id_does_not_fail_the_record() {
    let aw = parse(r#"{"id": 1, "artist": {"id": "abc", "username": "mika"}}"#);
    let Some(ArtistRef::Object(obj)) = aw.artist else { panic!("expected object reference") };
    assert_eq!(obj.id, None);
    assert_eq!(obj.username.as_deref(), Some("mika"));
  }
}
