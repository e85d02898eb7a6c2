//! [`Session`] — the in-process record of who is signed in.
//!
//! A session is an explicit context object: clone it into whatever needs the
//! viewer's profile. All clones share the same underlying value. There is a
//! single logical writer (the auth flow); readers never block each other.

use std::sync::Arc;

use tokio::sync::watch;

use crate::profile::Profile;

#[derive(Debug, Clone)]
pub struct Session {
  profile: Arc<watch::Sender<Profile>>,
}

impl Default for Session {
  fn default() -> Self { Self::new() }
}

impl Session {
  /// A session with the anonymous profile.
  pub fn new() -> Self {
    let (tx, _) = watch::channel(Profile::default());
    Self { profile: Arc::new(tx) }
  }

  /// Current profile snapshot.
  pub fn get(&self) -> Profile { self.profile.borrow().clone() }

  pub fn is_signed_in(&self) -> bool { !self.profile.borrow().is_anonymous() }

  /// Replace the whole profile, `uid` included.
  pub fn sign_in(&self, profile: Profile) { self.profile.send_replace(profile); }

  /// Replace the display name and photo URL, keeping the `uid`.
  pub fn set(&self, display_name: impl Into<String>, photo_url: impl Into<String>) {
    let display_name = display_name.into();
    let photo_url = photo_url.into();
    self.profile.send_modify(|p| {
      p.display_name = display_name;
      p.photo_url = photo_url;
    });
  }

  /// Reset to the anonymous profile.
  pub fn clear(&self) { self.profile.send_replace(Profile::default()); }

  /// Observe profile changes.
  pub fn watch(&self) -> watch::Receiver<Profile> { self.profile.subscribe() }
}
