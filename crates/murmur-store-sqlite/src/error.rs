//! Error type for `murmur-store-sqlite`.
//!
//! The `Display` strings of the account variants are shown to users as-is.

use murmur_core::{auth::FederatedProvider, post::PostId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] murmur_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  #[error("post not found: {0}")]
  PostNotFound(PostId),

  // ── Accounts ──────────────────────────────────────────────────────────────

  #[error("The email address is badly formatted.")]
  InvalidEmail,

  #[error("Password should be at least 6 characters.")]
  WeakPassword,

  #[error("The email address {0} is already in use by another account.")]
  EmailTaken(String),

  #[error("There is no account for {0}.")]
  UnknownEmail(String),

  #[error("The password is invalid.")]
  WrongPassword,

  #[error("no account with uid {0}")]
  UnknownUser(String),

  #[error("{0} sign-in is not available with the local backend")]
  FederatedUnsupported(FederatedProvider),

  #[error("password hashing failed: {0}")]
  Hash(String),

  // ── Blobs ─────────────────────────────────────────────────────────────────

  #[error("invalid blob key: {0:?}")]
  InvalidBlobKey(String),

  #[error("blob i/o error: {0}")]
  Io(#[from] std::io::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
