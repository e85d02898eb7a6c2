//! The `BlobStore` trait — named binary objects with retrievable URLs.

use std::future::Future;

pub trait BlobStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Store `data` under `key` and return a URL it can be fetched from.
  fn put<'a>(
    &'a self,
    key: &'a str,
    data: Vec<u8>,
  ) -> impl Future<Output = Result<String, Self::Error>> + Send + 'a;
}
