//! Error type for `murmur-feed`.
//!
//! Backend errors arrive as the associated error types of the collaborator
//! traits and are boxed here so the models are not generic over them.

use thiserror::Error;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum Error {
  #[error(transparent)]
  Core(#[from] murmur_core::Error),

  /// The comment could not be written. Nothing reached the view state.
  #[error("comment write failed: {0}")]
  Write(#[source] BoxError),

  /// Sign-in, sign-up, reset or profile update failed; the message is the
  /// provider's.
  #[error("{0}")]
  Auth(#[source] BoxError),

  #[error("avatar upload failed: {0}")]
  Upload(#[source] BoxError),

  #[error("the form is incomplete")]
  IncompleteForm,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
