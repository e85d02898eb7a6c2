//! Comments — replies owned by exactly one post.
//!
//! A comment is never updated or deleted once written. The owning post is
//! implied by the collection a comment was read from, so [`Comment`] does not
//! carry its post id.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Error, Result, profile::Profile};

// ─── CommentId ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CommentId(String);

impl CommentId {
  pub fn new(id: impl Into<String>) -> Result<Self> {
    let id = id.into();
    if id.is_empty() {
      return Err(Error::EmptyCommentId);
    }
    Ok(Self(id))
  }

  pub fn as_str(&self) -> &str { &self.0 }
}

impl TryFrom<String> for CommentId {
  type Error = Error;

  fn try_from(id: String) -> Result<Self> { Self::new(id) }
}

impl From<CommentId> for String {
  fn from(id: CommentId) -> Self { id.0 }
}

impl fmt::Display for CommentId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

// ─── Comment ─────────────────────────────────────────────────────────────────

/// A comment as delivered in a snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
  pub comment_id:        CommentId,
  pub author_avatar_url: String,
  pub text:              String,
  /// Server-assigned; `None` in a snapshot built from a write the server has
  /// not acknowledged yet.
  pub created_at:        Option<DateTime<Utc>>,
  pub author_name:       String,
}

// ─── NewComment ──────────────────────────────────────────────────────────────

/// Validated input to [`crate::store::CommentStore::add_comment`].
///
/// The text is guaranteed non-empty; the author fields are a copy of the
/// viewer's profile at the time the comment was built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewComment {
  text:              String,
  author_name:       String,
  author_avatar_url: String,
}

impl NewComment {
  pub fn new(text: impl Into<String>, author: &Profile) -> Result<Self> {
    let text = text.into();
    if text.is_empty() {
      return Err(Error::EmptyComment);
    }
    Ok(Self {
      text,
      author_name: author.display_name.clone(),
      author_avatar_url: author.photo_url.clone(),
    })
  }

  pub fn text(&self) -> &str { &self.text }

  pub fn author_name(&self) -> &str { &self.author_name }

  pub fn author_avatar_url(&self) -> &str { &self.author_avatar_url }
}
