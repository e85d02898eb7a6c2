//! [`LiveComments`] — a realtime mirror of one post's comment collection.
//!
//! The view owns at most one [`Subscription`]. Each subscription runs a task
//! that listens on the store and writes every snapshot it receives into a
//! shared [`ViewState`], replacing the previous comment list wholesale.
//! Observers read that state through [`LiveComments::watch`].
//!
//! A write is only accepted while the subscription is unreleased and the
//! state still belongs to its post, so a released or superseded subscription
//! can never touch the state again, even if its store keeps delivering.

use std::sync::{
  Arc,
  atomic::{AtomicBool, Ordering},
};

use murmur_core::{
  comment::Comment,
  post::PostId,
  store::{CommentQuery, CommentStore},
};
use tokio::{sync::watch, task::JoinHandle};

use crate::config::FeedConfig;

// ─── State ────────────────────────────────────────────────────────────────────

/// Health of the subscription feeding a [`ViewState`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FeedStatus {
  /// No subscription is running.
  #[default]
  Idle,
  /// Subscribed; no snapshot received yet.
  Connecting,
  /// At least one snapshot received on the current listener.
  Live,
  /// The listener failed; waiting before reconnect attempt `attempt`.
  Reconnecting { attempt: u32 },
  /// Reconnect attempts exhausted. Terminal until the next subscribe.
  Failed(String),
}

/// What a renderer sees: the post being mirrored and its comments, newest
/// first.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ViewState {
  pub post_id:  Option<PostId>,
  pub comments: Vec<Comment>,
  pub status:   FeedStatus,
}

// ─── Subscription ────────────────────────────────────────────────────────────

/// A running subscription. Dropping the handle releases it.
#[derive(Debug)]
pub struct Subscription {
  post_id:  PostId,
  released: Arc<AtomicBool>,
  task:     JoinHandle<()>,
}

impl Subscription {
  pub fn post_id(&self) -> &PostId { &self.post_id }

  /// `true` once the task has stopped on its own (terminal failure).
  pub fn is_finished(&self) -> bool { self.task.is_finished() }
}

impl Drop for Subscription {
  fn drop(&mut self) {
    self.released.store(true, Ordering::SeqCst);
    self.task.abort();
  }
}

// ─── LiveComments ─────────────────────────────────────────────────────────────

pub struct LiveComments<S> {
  store:  Arc<S>,
  config: FeedConfig,
  state:  Arc<watch::Sender<ViewState>>,
  active: Option<Subscription>,
}

impl<S> LiveComments<S>
where
  S: CommentStore + 'static,
{
  pub fn new(store: Arc<S>, config: FeedConfig) -> Self {
    let (state, _) = watch::channel(ViewState::default());
    Self { store, config, state: Arc::new(state), active: None }
  }

  /// Observe the view state. Every change replaces the whole value.
  pub fn watch(&self) -> watch::Receiver<ViewState> { self.state.subscribe() }

  /// Current view state.
  pub fn current(&self) -> ViewState { self.state.borrow().clone() }

  pub fn subscription(&self) -> Option<&Subscription> { self.active.as_ref() }

  /// Mirror `post_id`'s comments.
  ///
  /// Subscribing to the post that is already live is a no-op. Any other
  /// subscription is released first; the comment list is cleared when the
  /// post changes.
  pub fn subscribe(&mut self, post_id: PostId) {
    if let Some(active) = &self.active
      && active.post_id == post_id
      && !active.is_finished()
    {
      return;
    }
    self.active = None;

    let target = post_id.clone();
    self.state.send_modify(|s| {
      if s.post_id.as_ref() != Some(&target) {
        s.comments.clear();
      }
      s.post_id = Some(target);
      s.status = FeedStatus::Connecting;
    });

    let released = Arc::new(AtomicBool::new(false));
    let task = tokio::spawn(run_subscription(
      Arc::clone(&self.store),
      post_id.clone(),
      Arc::clone(&self.state),
      Arc::clone(&released),
      self.config.clone(),
    ));

    tracing::info!(%post_id, "subscribed to comments");
    self.active = Some(Subscription { post_id, released, task });
  }

  /// Stop mirroring. The last snapshot stays in the state; nothing mutates it
  /// afterwards until the next [`subscribe`](Self::subscribe).
  pub fn release(&mut self) {
    let Some(active) = self.active.take() else {
      return;
    };
    let post_id = active.post_id.clone();
    drop(active);

    self.state.send_if_modified(|s| {
      let changed = s.status != FeedStatus::Idle;
      s.status = FeedStatus::Idle;
      changed
    });
    tracing::info!(%post_id, "released comment subscription");
  }

  /// Release and forget the mirrored post and its comments.
  pub fn clear(&mut self) {
    self.release();
    self.state.send_if_modified(|s| {
      let changed = *s != ViewState::default();
      *s = ViewState::default();
      changed
    });
  }
}

// ─── Subscription task ────────────────────────────────────────────────────────

/// Apply `update` unless the subscription was released or the state moved on
/// to another post. Returns whether the subscription is still current.
fn publish(
  state: &watch::Sender<ViewState>,
  released: &AtomicBool,
  post_id: &PostId,
  update: impl FnOnce(&mut ViewState),
) -> bool {
  let mut current = true;
  state.send_if_modified(|s| {
    if released.load(Ordering::SeqCst) || s.post_id.as_ref() != Some(post_id) {
      current = false;
      return false;
    }
    update(s);
    true
  });
  current
}

async fn run_subscription<S>(
  store: Arc<S>,
  post_id: PostId,
  state: Arc<watch::Sender<ViewState>>,
  released: Arc<AtomicBool>,
  config: FeedConfig,
) where
  S: CommentStore,
{
  let query = CommentQuery::newest_first(post_id.clone());
  let mut failures = 0u32;

  loop {
    let reason = match store.listen(&query).await {
      Ok(mut listener) => loop {
        match listener.next().await {
          Some(Ok(comments)) => {
            failures = 0;
            let current = publish(&state, &released, &post_id, move |s| {
              s.comments = comments;
              s.status = FeedStatus::Live;
            });
            if !current {
              return;
            }
          }
          Some(Err(e)) => break e.to_string(),
          None => break "listener closed by the store".to_owned(),
        }
      },
      Err(e) => e.to_string(),
    };

    failures += 1;
    if failures > config.max_reconnect_attempts {
      tracing::error!(%post_id, error = %reason, "comment listener failed; giving up");
      publish(&state, &released, &post_id, move |s| {
        s.status = FeedStatus::Failed(reason);
      });
      return;
    }

    tracing::warn!(%post_id, attempt = failures, error = %reason, "comment listener failed; reconnecting");
    let current = publish(&state, &released, &post_id, |s| {
      s.status = FeedStatus::Reconnecting { attempt: failures };
    });
    if !current {
      return;
    }
    tokio::time::sleep(config.backoff(failures)).await;
  }
}
