//! Layered CLI configuration: defaults, then the TOML file, then `MURMUR_*`
//! environment variables. Flags are applied on top by `main`.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use murmur_feed::FeedConfig;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CliConfig {
  /// SQLite database holding posts, comments and accounts.
  pub store_path: PathBuf,
  /// Root directory for uploaded avatars and post images.
  pub blob_dir:   PathBuf,
  pub email:      Option<String>,
  pub password:   Option<String>,
  pub feed:       FeedConfig,
}

impl Default for CliConfig {
  fn default() -> Self {
    Self {
      store_path: PathBuf::from("~/.local/share/murmur/murmur.db"),
      blob_dir:   PathBuf::from("~/.local/share/murmur/blobs"),
      email:      None,
      password:   None,
      feed:       FeedConfig::default(),
    }
  }
}

impl CliConfig {
  /// Read `path` (if it exists) and the environment. Nested keys use a double
  /// underscore: `MURMUR_FEED__MAX_RECONNECT_ATTEMPTS=3`.
  pub fn load(path: &Path) -> anyhow::Result<Self> {
    let settings = config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(config::Environment::with_prefix("MURMUR").separator("__"))
      .build()
      .with_context(|| format!("failed to read config file {}", path.display()))?;

    let mut cfg: CliConfig = settings
      .try_deserialize()
      .context("failed to deserialise CliConfig")?;
    cfg.store_path = expand_tilde(&cfg.store_path);
    cfg.blob_dir = expand_tilde(&cfg.blob_dir);
    Ok(cfg)
  }
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
