//! [`FsBlobStore`] — blobs as plain files under a root directory.

use std::path::{Component, Path, PathBuf};

use murmur_core::blob::BlobStore;

use crate::{Error, Result};

/// Stores each blob at `<root>/<key>` and hands out `file://` URLs.
#[derive(Debug, Clone)]
pub struct FsBlobStore {
  root: PathBuf,
}

impl FsBlobStore {
  pub fn new(root: impl Into<PathBuf>) -> Self { Self { root: root.into() } }

  pub fn root(&self) -> &Path { &self.root }

  /// Map `key` to a path under the root. Keys are relative, `/`-separated,
  /// and may not climb out of the root.
  fn resolve(&self, key: &str) -> Result<PathBuf> {
    let relative = Path::new(key);
    let mut components = relative.components().peekable();
    if components.peek().is_none()
      || !components.all(|c| matches!(c, Component::Normal(_)))
    {
      return Err(Error::InvalidBlobKey(key.to_owned()));
    }
    Ok(self.root.join(relative))
  }
}

impl BlobStore for FsBlobStore {
  type Error = Error;

  async fn put(&self, key: &str, data: Vec<u8>) -> Result<String> {
    let path = self.resolve(key)?;
    if let Some(parent) = path.parent() {
      tokio::fs::create_dir_all(parent).await?;
    }
    let size = data.len();
    tokio::fs::write(&path, data).await?;

    let absolute = tokio::fs::canonicalize(&path).await?;
    tracing::debug!(%key, size, "blob stored");
    Ok(format!("file://{}", absolute.display()))
  }
}
