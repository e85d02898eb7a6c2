//! Appending comments.
//!
//! Submission is push-then-listen: nothing is inserted into any local view.
//! A comment becomes visible when a live subscription delivers a snapshot
//! that contains it.

use murmur_core::{
  comment::{CommentId, NewComment},
  post::PostId,
  session::Session,
  store::CommentStore,
};

use crate::{Error, Result};

/// Append `text` to `post_id`'s comments, attributed to whoever `session`
/// holds at the moment of the call.
///
/// Empty text is rejected with [`murmur_core::Error::EmptyComment`] before
/// the store is contacted.
pub async fn submit_comment<S>(
  store: &S,
  session: &Session,
  post_id: &PostId,
  text: &str,
) -> Result<CommentId>
where
  S: CommentStore,
{
  let input = NewComment::new(text, &session.get())?;

  let comment_id = store.add_comment(post_id, input).await.map_err(|e| {
    tracing::warn!(%post_id, error = %e, "comment write failed");
    Error::Write(Box::new(e))
  })?;

  tracing::debug!(%post_id, %comment_id, "comment submitted");
  Ok(comment_id)
}
