//! The `AuthProvider` trait — the credential collaborator.
//!
//! Credential storage, verification, federated popups and reset-mail delivery
//! all live behind this trait. Errors carry a human-readable message through
//! their `Display` impl; the client shows it verbatim.

use std::{fmt, future::Future};

use serde::{Deserialize, Serialize};

use crate::profile::Profile;

/// Identity providers offered for federated sign-in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FederatedProvider {
  Google,
}

impl fmt::Display for FederatedProvider {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Google => f.write_str("google"),
    }
  }
}

pub trait AuthProvider: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Verify e-mail/password credentials and return the account's profile.
  fn sign_in<'a>(
    &'a self,
    email: &'a str,
    password: &'a str,
  ) -> impl Future<Output = Result<Profile, Self::Error>> + Send + 'a;

  /// Create an account. The returned profile has a `uid` but no display name
  /// or photo yet; see [`AuthProvider::update_profile`].
  fn sign_up<'a>(
    &'a self,
    email: &'a str,
    password: &'a str,
  ) -> impl Future<Output = Result<Profile, Self::Error>> + Send + 'a;

  fn sign_in_federated(
    &self,
    provider: FederatedProvider,
  ) -> impl Future<Output = Result<Profile, Self::Error>> + Send + '_;

  /// Ask the provider to mail a password-reset link to `email`.
  fn send_password_reset<'a>(
    &'a self,
    email: &'a str,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  fn update_profile<'a>(
    &'a self,
    uid: &'a str,
    display_name: &'a str,
    photo_url: &'a str,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  fn sign_out(&self) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;
}
