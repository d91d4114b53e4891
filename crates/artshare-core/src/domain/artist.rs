use crate::domain::ids::ArtistId;
use crate::domain::upload::UploadFile;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An artist account as returned by the backend.
///
/// The client only ever holds a cached copy (the signed-in artist, or a record
/// fetched for an artist page); the backend owns the canonical one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artist {
  pub id: ArtistId,

  pub username: String,

  #[serde(default)]
  pub email: String,

  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub bio: Option<String>,

  /// Absolute URL or a path relative to the API base.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub profile_picture: Option<String>,

  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub created_at: Option<String>,
}

/// Address of an artist for endpoints that accept either form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArtistKey {
  Id(ArtistId),
  Username(String),
}

impl fmt::Display for ArtistKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ArtistKey::Id(id) => id.fmt(f),
      ArtistKey::Username(name) => f.write_str(name),
    }
  }
}

impl From<ArtistId> for ArtistKey {
  fn from(id: ArtistId) -> Self {
    ArtistKey::Id(id)
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Credentials {
  pub username: String,
  pub password: String,
}

#[derive(Debug, Clone, Default)]
pub struct RegisterData {
  pub username: String,
  pub email: String,
  pub password: String,
  pub bio: Option<String>,
  pub profile_picture: Option<UploadFile>,
}

/// Partial profile update. Absent or empty fields are not sent.
#[derive(Debug, Clone, Default)]
pub struct ArtistPatch {
  pub username: Option<String>,
  pub email: Option<String>,
  pub password: Option<String>,
  pub bio: Option<String>,
  pub profile_picture: Option<UploadFile>,
}

impl ArtistPatch {
  pub fn is_empty(&self) -> bool {
    let blank = |v: &Option<String>| v.as_deref().is_none_or(str::is_empty);
    blank(&self.username)
      && blank(&self.email)
      && blank(&self.password)
      && blank(&self.bio)
      && self.profile_picture.as_ref().is_none_or(UploadFile::is_empty)
  }
}
