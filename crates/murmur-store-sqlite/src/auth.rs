//! Local credential store: the [`AuthProvider`] impl for [`SqliteStore`].
//!
//! Passwords are kept as argon2 PHC strings. Password-reset requests are
//! recorded in `password_resets`; sending the mail is left to whatever
//! process drains that table.

use argon2::{
  Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString,
};
use murmur_core::{
  auth::{AuthProvider, FederatedProvider},
  profile::Profile,
};
use rand_core::{OsRng, RngCore};
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use crate::{
  Error, Result,
  encode::{encode_dt, now},
  store::SqliteStore,
};

const MIN_PASSWORD_CHARS: usize = 6;

// ─── Helpers ──────────────────────────────────────────────────────────────────

/// Trim and lowercase `email`, rejecting anything without a local part and a
/// domain.
fn normalize_email(email: &str) -> Result<String> {
  let email = email.trim().to_lowercase();
  match email.split_once('@') {
    Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(email),
    _ => Err(Error::InvalidEmail),
  }
}

async fn hash_password(password: &str) -> Result<String> {
  let password = password.to_owned();
  tokio::task::spawn_blocking(move || {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
      .hash_password(password.as_bytes(), &salt)
      .map(|hash| hash.to_string())
      .map_err(|e| Error::Hash(e.to_string()))
  })
  .await
  .map_err(|e| Error::Hash(e.to_string()))?
}

async fn verify_password(password: &str, phc: String) -> Result<()> {
  let password = password.to_owned();
  tokio::task::spawn_blocking(move || {
    let parsed = PasswordHash::new(&phc).map_err(|e| Error::Hash(e.to_string()))?;
    Argon2::default()
      .verify_password(password.as_bytes(), &parsed)
      .map_err(|_| Error::WrongPassword)
  })
  .await
  .map_err(|e| Error::Hash(e.to_string()))?
}

/// 128 random bits as lowercase hex.
fn reset_token() -> String {
  let mut bytes = [0u8; 16];
  OsRng.fill_bytes(&mut bytes);
  hex::encode(bytes)
}

struct RawAccount {
  uid:           String,
  password_hash: String,
  display_name:  String,
  photo_url:     String,
}

// ─── AuthProvider impl ────────────────────────────────────────────────────────

impl AuthProvider for SqliteStore {
  type Error = Error;

  async fn sign_in(&self, email: &str, password: &str) -> Result<Profile> {
    let email = normalize_email(email)?;
    let lookup = email.clone();

    let account: Option<RawAccount> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            "SELECT uid, password_hash, display_name, photo_url FROM users WHERE email = ?1",
            rusqlite::params![lookup],
            |row| {
              Ok(RawAccount {
                uid:           row.get(0)?,
                password_hash: row.get(1)?,
                display_name:  row.get(2)?,
                photo_url:     row.get(3)?,
              })
            },
          )
          .optional()?)
      })
      .await?;

    let account = account.ok_or_else(|| Error::UnknownEmail(email.clone()))?;
    verify_password(password, account.password_hash).await?;

    tracing::info!(uid = %account.uid, "signed in");
    Ok(Profile {
      uid:          account.uid,
      display_name: account.display_name,
      photo_url:    account.photo_url,
    })
  }

  async fn sign_up(&self, email: &str, password: &str) -> Result<Profile> {
    let email = normalize_email(email)?;
    if password.chars().count() < MIN_PASSWORD_CHARS {
      return Err(Error::WeakPassword);
    }

    let password_hash = hash_password(password).await?;
    let uid           = Uuid::new_v4().to_string();
    let uid_str       = uid.clone();
    let email_str     = email.clone();
    let at_str        = encode_dt(now());

    let created = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let taken = tx
          .query_row(
            "SELECT 1 FROM users WHERE email = ?1",
            rusqlite::params![email_str],
            |_| Ok(true),
          )
          .optional()?
          .unwrap_or(false);
        if taken {
          return Ok(false);
        }
        tx.execute(
          "INSERT INTO users (uid, email, password_hash, created_at) VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![uid_str, email_str, password_hash, at_str],
        )?;
        tx.commit()?;
        Ok(true)
      })
      .await?;

    if !created {
      return Err(Error::EmailTaken(email));
    }

    tracing::info!(%uid, "account created");
    Ok(Profile { uid, ..Profile::default() })
  }

  async fn sign_in_federated(&self, provider: FederatedProvider) -> Result<Profile> {
    Err(Error::FederatedUnsupported(provider))
  }

  async fn send_password_reset(&self, email: &str) -> Result<()> {
    let email  = normalize_email(email)?;
    let lookup = email.clone();
    let token  = reset_token();
    let at_str = encode_dt(now());

    let recorded = self
      .conn
      .call(move |conn| {
        let uid: Option<String> = conn
          .query_row(
            "SELECT uid FROM users WHERE email = ?1",
            rusqlite::params![lookup],
            |r| r.get(0),
          )
          .optional()?;
        let Some(uid) = uid else {
          return Ok(false);
        };
        conn.execute(
          "INSERT INTO password_resets (token, uid, requested_at) VALUES (?1, ?2, ?3)",
          rusqlite::params![token, uid, at_str],
        )?;
        Ok(true)
      })
      .await?;

    if !recorded {
      return Err(Error::UnknownEmail(email));
    }

    tracing::info!(%email, "password reset requested");
    Ok(())
  }

  async fn update_profile(&self, uid: &str, display_name: &str, photo_url: &str) -> Result<()> {
    let uid_str = uid.to_owned();
    let name    = display_name.to_owned();
    let photo   = photo_url.to_owned();

    let updated = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE users SET display_name = ?2, photo_url = ?3 WHERE uid = ?1",
          rusqlite::params![uid_str, name, photo],
        )?)
      })
      .await?;

    if updated == 0 {
      return Err(Error::UnknownUser(uid.to_owned()));
    }
    tracing::debug!(%uid, "profile updated");
    Ok(())
  }

  async fn sign_out(&self) -> Result<()> {
    // Sessions live client-side; there is nothing to revoke locally.
    tracing::debug!("signed out");
    Ok(())
  }
}
