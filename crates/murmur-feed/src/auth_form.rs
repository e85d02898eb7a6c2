//! [`AuthForm`] — the sign-in / sign-up screen.
//!
//! The form keeps its own field state and talks to an [`AuthProvider`] and a
//! [`BlobStore`]. Credential errors land in `error_message` and leave the form
//! usable; federated sign-in errors land in `alert` instead.

use murmur_core::{
  auth::{AuthProvider, FederatedProvider},
  blob::BlobStore,
  profile::Profile,
  session::Session,
};
use rand_core::{OsRng, RngCore};

use crate::{Error, Result};

const MIN_PASSWORD_CHARS: usize = 6;

const KEY_ALPHABET: &[u8] =
  b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const KEY_PREFIX_LEN: usize = 16;

/// Storage key for an uploaded avatar: a random alphanumeric prefix keeps
/// two uploads of `me.png` apart.
pub fn avatar_key(file_name: &str) -> String {
  let prefix: String = (0..KEY_PREFIX_LEN)
    .map(|_| {
      let n = OsRng.next_u32() as usize;
      KEY_ALPHABET[n % KEY_ALPHABET.len()] as char
    })
    .collect();
  format!("avatars/{prefix}_{file_name}")
}

fn auth_error<E>(e: E) -> Error
where
  E: std::error::Error + Send + Sync + 'static,
{
  Error::Auth(Box::new(e))
}

// ─── Form state ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthMode {
  #[default]
  SignIn,
  SignUp,
}

/// An image picked for the new account's avatar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvatarFile {
  pub file_name: String,
  pub data:      Vec<u8>,
}

#[derive(Debug, Default)]
pub struct AuthForm {
  pub mode:          AuthMode,
  pub email:         String,
  pub password:      String,
  /// Display name; sign-up only.
  pub username:      String,
  /// Sign-up only.
  pub avatar:        Option<AvatarFile>,
  /// Last credential error, shown above the form.
  pub error_message: Option<String>,
  /// Whether the password-reset dialog is open.
  pub reset_open:    bool,
  pub reset_email:   String,
  /// Blocking alert raised by federated sign-in.
  pub alert:         Option<String>,
}

impl AuthForm {
  pub fn new() -> Self { Self::default() }

  /// Whether the submit button is enabled.
  pub fn can_submit(&self) -> bool {
    let credentials =
      !self.email.is_empty() && self.password.chars().count() >= MIN_PASSWORD_CHARS;
    match self.mode {
      AuthMode::SignIn => credentials,
      AuthMode::SignUp => credentials && !self.username.is_empty() && self.avatar.is_some(),
    }
  }

  pub fn toggle_mode(&mut self) {
    self.mode = match self.mode {
      AuthMode::SignIn => AuthMode::SignUp,
      AuthMode::SignUp => AuthMode::SignIn,
    };
  }

  pub fn open_reset(&mut self) { self.reset_open = true; }

  pub fn close_reset(&mut self) { self.reset_open = false; }

  pub fn dismiss_alert(&mut self) { self.alert = None; }

  // ── Submission ────────────────────────────────────────────────────────────

  /// Sign in or sign up depending on `mode`, then record the profile in
  /// `session`. On failure the message is kept in `error_message`.
  pub async fn submit<A, B>(&mut self, auth: &A, blobs: &B, session: &Session) -> Result<Profile>
  where
    A: AuthProvider,
    B: BlobStore,
  {
    if !self.can_submit() {
      return Err(Error::IncompleteForm);
    }

    let outcome = match self.mode {
      AuthMode::SignIn => self.sign_in(auth).await,
      AuthMode::SignUp => self.sign_up(auth, blobs).await,
    };

    match outcome {
      Ok(profile) => {
        self.error_message = None;
        session.sign_in(profile.clone());
        tracing::info!(uid = %profile.uid, mode = ?self.mode, "authenticated");
        Ok(profile)
      }
      Err(e) => {
        tracing::info!(error = %e, mode = ?self.mode, "authentication failed");
        self.error_message = Some(e.to_string());
        Err(e)
      }
    }
  }

  async fn sign_in<A: AuthProvider>(&self, auth: &A) -> Result<Profile> {
    auth.sign_in(&self.email, &self.password).await.map_err(auth_error)
  }

  /// Create the account, upload the avatar, then set the display name and
  /// photo on the account.
  async fn sign_up<A, B>(&self, auth: &A, blobs: &B) -> Result<Profile>
  where
    A: AuthProvider,
    B: BlobStore,
  {
    let account = auth.sign_up(&self.email, &self.password).await.map_err(auth_error)?;

    let photo_url = match &self.avatar {
      Some(avatar) => {
        let key = avatar_key(&avatar.file_name);
        blobs
          .put(&key, avatar.data.clone())
          .await
          .map_err(|e| Error::Upload(Box::new(e)))?
      }
      None => String::new(),
    };

    auth
      .update_profile(&account.uid, &self.username, &photo_url)
      .await
      .map_err(auth_error)?;

    Ok(Profile {
      uid: account.uid,
      display_name: self.username.clone(),
      photo_url,
    })
  }

  /// Federated popup sign-in. Errors are raised as `alert`.
  pub async fn sign_in_federated<A>(
    &mut self,
    auth: &A,
    session: &Session,
    provider: FederatedProvider,
  ) -> Result<Profile>
  where
    A: AuthProvider,
  {
    match auth.sign_in_federated(provider).await {
      Ok(profile) => {
        session.sign_in(profile.clone());
        tracing::info!(uid = %profile.uid, %provider, "authenticated");
        Ok(profile)
      }
      Err(e) => {
        self.alert = Some(e.to_string());
        Err(auth_error(e))
      }
    }
  }

  /// Ask for a reset mail to `reset_email`. The field is cleared either way;
  /// the dialog closes only on success.
  pub async fn send_reset_email<A: AuthProvider>(&mut self, auth: &A) -> Result<()> {
    let email = std::mem::take(&mut self.reset_email);
    auth.send_password_reset(&email).await.map_err(auth_error)?;
    self.reset_open = false;
    Ok(())
  }

  /// Sign out with the provider, then forget the profile.
  pub async fn sign_out<A: AuthProvider>(&self, auth: &A, session: &Session) -> Result<()> {
    auth.sign_out().await.map_err(auth_error)?;
    session.clear();
    Ok(())
  }
}
