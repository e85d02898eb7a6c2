//! Error types for `murmur-core`.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
  #[error("post id must not be empty")]
  EmptyPostId,

  #[error("comment id must not be empty")]
  EmptyCommentId,

  #[error("comment text must not be empty")]
  EmptyComment,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
