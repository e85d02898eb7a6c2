//! [`PostView`] — a post card with its collapsible comment panel.

use std::sync::Arc;

use murmur_core::{comment::CommentId, post::Post, session::Session, store::CommentStore};
use tokio::sync::watch;

use crate::{
  FeedConfig, Result,
  live::{LiveComments, ViewState},
  submit::submit_comment,
};

pub struct PostView<S> {
  post:     Post,
  store:    Arc<S>,
  session:  Session,
  config:   FeedConfig,
  comments: LiveComments<S>,
  /// Text in the comment input.
  draft:    String,
  /// Whether the comment panel is expanded.
  open:     bool,
}

impl<S> PostView<S>
where
  S: CommentStore + 'static,
{
  /// Build the card collapsed. The comment subscription starts right away
  /// unless the config ties it to the panel being open.
  pub fn new(post: Post, store: Arc<S>, session: Session, config: FeedConfig) -> Self {
    let mut comments = LiveComments::new(Arc::clone(&store), config.clone());
    if config.keep_alive_when_collapsed {
      comments.subscribe(post.post_id.clone());
    }
    Self {
      post,
      store,
      session,
      config,
      comments,
      draft: String::new(),
      open: false,
    }
  }

  pub fn post(&self) -> &Post { &self.post }

  /// Swap in another post. A different post id re-subscribes; the previous
  /// subscription is released first. With the panel collapsed and no
  /// keep-alive, the old post's comments are dropped instead.
  pub fn set_post(&mut self, post: Post) {
    let changed = post.post_id != self.post.post_id;
    self.post = post;
    if changed && (self.config.keep_alive_when_collapsed || self.open) {
      self.comments.subscribe(self.post.post_id.clone());
    } else if changed {
      self.comments.clear();
    }
  }

  pub fn comments(&self) -> watch::Receiver<ViewState> { self.comments.watch() }

  pub fn is_open(&self) -> bool { self.open }

  pub fn toggle_comments(&mut self) {
    self.open = !self.open;
    if self.config.keep_alive_when_collapsed {
      return;
    }
    if self.open {
      self.comments.subscribe(self.post.post_id.clone());
    } else {
      self.comments.release();
    }
  }

  pub fn draft(&self) -> &str { &self.draft }

  pub fn set_draft(&mut self, text: impl Into<String>) { self.draft = text.into(); }

  /// The send button is enabled only for a non-empty draft.
  pub fn can_submit(&self) -> bool { !self.draft.is_empty() }

  /// Send the draft as a new comment. The input is cleared immediately; if
  /// the write fails and the config says so, the draft is put back.
  pub async fn submit(&mut self) -> Result<CommentId> {
    let text = std::mem::take(&mut self.draft);
    let outcome =
      submit_comment(self.store.as_ref(), &self.session, &self.post.post_id, &text).await;

    if outcome.is_err() && self.config.restore_draft_on_failure && self.draft.is_empty() {
      self.draft = text;
    }
    outcome
  }
}
