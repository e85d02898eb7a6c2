//! Posts — the parent items that comments hang off.
//!
//! A post is immutable once published. Its comments are not embedded; they
//! live in a collection keyed by the post's id.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

// ─── PostId ──────────────────────────────────────────────────────────────────

/// Identifier of a post. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PostId(String);

impl PostId {
  pub fn new(id: impl Into<String>) -> Result<Self> {
    let id = id.into();
    if id.is_empty() {
      return Err(Error::EmptyPostId);
    }
    Ok(Self(id))
  }

  pub fn as_str(&self) -> &str { &self.0 }
}

impl TryFrom<String> for PostId {
  type Error = Error;

  fn try_from(id: String) -> Result<Self> { Self::new(id) }
}

impl From<PostId> for String {
  fn from(id: PostId) -> Self { id.0 }
}

impl std::str::FromStr for PostId {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> { Self::new(s) }
}

impl fmt::Display for PostId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

// ─── Post ────────────────────────────────────────────────────────────────────

/// A published post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
  pub post_id:           PostId,
  pub author_avatar_url: String,
  pub image_url:         Option<String>,
  pub text:              String,
  /// Server-assigned; `None` while the write has not been acknowledged.
  pub created_at:        Option<DateTime<Utc>>,
  pub author_name:       String,
}

/// Input to a backend's publish operation. `created_at` is always set by the
/// store.
#[derive(Debug, Clone)]
pub struct NewPost {
  pub author_avatar_url: String,
  pub image_url:         Option<String>,
  pub text:              String,
  pub author_name:       String,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn empty_post_id_is_rejected() {
    assert_eq!(PostId::new(""), Err(Error::EmptyPostId));
    assert_eq!("".parse::<PostId>(), Err(Error::EmptyPostId));
  }

  #[test]
  fn post_id_displays_raw_value() {
    let id = PostId::new("p-1").unwrap();
    assert_eq!(id.to_string(), "p-1");
    assert_eq!(id.as_str(), "p-1");
  }
}
