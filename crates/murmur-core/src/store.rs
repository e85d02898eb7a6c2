//! The `CommentStore` trait and supporting query types.
//!
//! The trait is implemented by document backends (e.g. `murmur-store-sqlite`).
//! Higher layers (`murmur-feed`, `murmur-cli`) depend on this abstraction, not
//! on any concrete backend.

use std::future::Future;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use crate::{
  comment::{Comment, CommentId, NewComment},
  post::PostId,
};

// ─── Query type ──────────────────────────────────────────────────────────────

/// Sort direction on `created_at`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
  Ascending,
  #[default]
  Descending,
}

/// Parameters for [`CommentStore::listen`]: the comments of one post, ordered
/// by `created_at`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentQuery {
  pub post_id:   PostId,
  pub direction: Direction,
}

impl CommentQuery {
  /// Newest comment first.
  pub fn newest_first(post_id: PostId) -> Self {
    Self { post_id, direction: Direction::Descending }
  }
}

// ─── Listener ────────────────────────────────────────────────────────────────

/// One delivery from a listener: the complete ordered collection, or the
/// reason the listener failed.
pub type Snapshot<E> = Result<Vec<Comment>, E>;

/// Receiving end of a standing query.
///
/// Every item is a full snapshot, never a delta. Dropping the listener closes
/// the channel, which tells the backend to stop delivering.
#[derive(Debug)]
pub struct Listener<E> {
  rx: mpsc::Receiver<Snapshot<E>>,
}

impl<E> Listener<E> {
  /// Create a listener and the sender a backend delivers into.
  pub fn channel(buffer: usize) -> (mpsc::Sender<Snapshot<E>>, Self) {
    let (tx, rx) = mpsc::channel(buffer);
    (tx, Self { rx })
  }

  /// Wait for the next snapshot. `None` once the backend has stopped.
  pub async fn next(&mut self) -> Option<Snapshot<E>> { self.rx.recv().await }
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over the document collection holding each post's comments.
pub trait CommentStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Append a comment to `post_id`'s collection and return its id. The
  /// `created_at` timestamp is assigned by the store, never by the client.
  fn add_comment<'a>(
    &'a self,
    post_id: &'a PostId,
    input: NewComment,
  ) -> impl Future<Output = Result<CommentId, Self::Error>> + Send + 'a;

  /// Start a standing query. The listener receives a snapshot soon after it
  /// is established and another each time the collection changes.
  fn listen<'a>(
    &'a self,
    query: &'a CommentQuery,
  ) -> impl Future<Output = Result<Listener<Self::Error>, Self::Error>> + Send + 'a;
}
