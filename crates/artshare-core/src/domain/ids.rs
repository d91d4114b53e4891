use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Backend primary key of an artist account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArtistId(i64);

impl ArtistId {
  pub fn new(raw: i64) -> Self {
    ArtistId(raw)
  }

  pub fn get(&self) -> i64 {
    self.0
  }
}

impl From<i64> for ArtistId {
  fn from(raw: i64) -> Self {
    ArtistId(raw)
  }
}

impl From<ArtistId> for i64 {
  fn from(id: ArtistId) -> Self {
    id.0
  }
}

impl FromStr for ArtistId {
  type Err = std::num::ParseIntError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    s.trim().parse().map(ArtistId)
  }
}

impl fmt::Display for ArtistId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    self.0.fmt(f)
  }
}

/// Backend primary key of an artwork.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArtworkId(i64);

impl ArtworkId {
  pub fn new(raw: i64) -> Self {
    ArtworkId(raw)
  }

  pub fn get(&self) -> i64 {
    self.0
  }
}

impl From<i64> for ArtworkId {
  fn from(raw: i64) -> Self {
    ArtworkId(raw)
  }
}

impl From<ArtworkId> for i64 {
  fn from(id: ArtworkId) -> Self {
    id.0
  }
}

impl FromStr for ArtworkId {
  type Err = std::num::ParseIntError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    s.trim().parse().map(ArtworkId)
  }
}

impl fmt::Display for ArtworkId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    self.0.fmt(f)
  }
}
