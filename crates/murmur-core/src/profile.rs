//! The viewer's profile projection used to attribute writes.

use serde::{Deserialize, Serialize};

/// The signed-in user as seen by the rest of the client.
///
/// The default value is the anonymous profile: every field empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
  pub uid:          String,
  pub display_name: String,
  pub photo_url:    String,
}

impl Profile {
  pub fn is_anonymous(&self) -> bool { self.uid.is_empty() }
}
