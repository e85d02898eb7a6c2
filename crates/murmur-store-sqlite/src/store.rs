//! [`SqliteStore`] — the SQLite implementation of [`CommentStore`].

use std::path::Path;

use murmur_core::{
  comment::{Comment, CommentId, NewComment},
  post::{NewPost, Post, PostId},
  store::{CommentQuery, CommentStore, Listener, Snapshot},
};
use rusqlite::OptionalExtension as _;
use tokio::sync::{
  broadcast::{self, error::RecvError},
  mpsc,
};
use uuid::Uuid;

use crate::{
  Error, Result,
  encode::{RawComment, RawPost, encode_dt, now, order_clause},
  schema::SCHEMA,
};

/// Snapshots a listener may hold before the store waits on the consumer.
const LISTENER_BUFFER: usize = 16;

/// Change notifications buffered per listener before it is considered lagged.
const CHANGE_FEED_CAPACITY: usize = 256;

// ─── Store ───────────────────────────────────────────────────────────────────

/// A murmur store backed by a single SQLite file.
///
/// Cloning is cheap: the inner connection and the change feed are both
/// reference-counted, and clones observe each other's writes.
#[derive(Clone)]
pub struct SqliteStore {
  pub(crate) conn: tokio_rusqlite::Connection,
  /// Post ids whose comment collection changed.
  changes:         broadcast::Sender<PostId>,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    Self::init(conn).await
  }

  /// Open an in-memory store, for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    Self::init(conn).await
  }

  async fn init(conn: tokio_rusqlite::Connection) -> Result<Self> {
    let (changes, _) = broadcast::channel(CHANGE_FEED_CAPACITY);
    let store = Self { conn, changes };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  // ── Posts ─────────────────────────────────────────────────────────────────

  /// Publish a post. `created_at` is assigned here.
  pub async fn publish_post(&self, input: NewPost) -> Result<Post> {
    let post = Post {
      post_id:           PostId::new(Uuid::new_v4().to_string())?,
      author_avatar_url: input.author_avatar_url,
      image_url:         input.image_url,
      text:              input.text,
      created_at:        Some(now()),
      author_name:       input.author_name,
    };

    let id_str     = post.post_id.to_string();
    let avatar     = post.author_avatar_url.clone();
    let image      = post.image_url.clone();
    let text       = post.text.clone();
    let at_str     = post.created_at.map(encode_dt).unwrap_or_default();
    let author     = post.author_name.clone();

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO posts (post_id, author_avatar_url, image_url, text, created_at, author_name)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![id_str, avatar, image, text, at_str, author],
        )?;
        Ok(())
      })
      .await?;

    tracing::debug!(post_id = %post.post_id, "post published");
    Ok(post)
  }

  /// Retrieve a post by id. Returns `None` if not found.
  pub async fn get_post(&self, id: &PostId) -> Result<Option<Post>> {
    let id_str = id.to_string();

    let raw: Option<RawPost> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            "SELECT post_id, author_avatar_url, image_url, text, created_at, author_name
             FROM posts WHERE post_id = ?1",
            rusqlite::params![id_str],
            |row| {
              Ok(RawPost {
                post_id:           row.get(0)?,
                author_avatar_url: row.get(1)?,
                image_url:         row.get(2)?,
                text:              row.get(3)?,
                created_at:        row.get(4)?,
                author_name:       row.get(5)?,
              })
            },
          )
          .optional()?)
      })
      .await?;

    raw.map(RawPost::into_post).transpose()
  }

  /// All posts, newest first.
  pub async fn list_posts(&self) -> Result<Vec<Post>> {
    let raws: Vec<RawPost> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT post_id, author_avatar_url, image_url, text, created_at, author_name
           FROM posts ORDER BY created_at DESC, seq DESC",
        )?;
        let rows = stmt
          .query_map([], |row| {
            Ok(RawPost {
              post_id:           row.get(0)?,
              author_avatar_url: row.get(1)?,
              image_url:         row.get(2)?,
              text:              row.get(3)?,
              created_at:        row.get(4)?,
              author_name:       row.get(5)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawPost::into_post).collect()
  }

  // ── Comments ──────────────────────────────────────────────────────────────

  /// Read the full ordered comment collection for `query`.
  async fn query_comments(&self, query: &CommentQuery) -> Result<Vec<Comment>> {
    let post_id_str = query.post_id.to_string();
    let sql = format!(
      "SELECT comment_id, author_avatar_url, text, created_at, author_name
       FROM comments WHERE post_id = ?1 {}",
      order_clause(query.direction)
    );

    let raws: Vec<RawComment> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params![post_id_str], |row| {
            Ok(RawComment {
              comment_id:        row.get(0)?,
              author_avatar_url: row.get(1)?,
              text:              row.get(2)?,
              created_at:        row.get(3)?,
              author_name:       row.get(4)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawComment::into_comment).collect()
  }

  /// Deliver snapshots for `query` until the listener is dropped: one right
  /// away, then one after every change to the post's comments.
  async fn pump_snapshots(
    self,
    query: CommentQuery,
    mut changes: broadcast::Receiver<PostId>,
    tx: mpsc::Sender<Snapshot<Error>>,
  ) {
    tracing::debug!(post_id = %query.post_id, "comment listener started");

    loop {
      let snapshot = self.query_comments(&query).await;
      if tx.send(snapshot).await.is_err() {
        break;
      }

      let changed = loop {
        tokio::select! {
          _ = tx.closed() => break false,
          change = changes.recv() => match change {
            Ok(id) if id == query.post_id => break true,
            Ok(_) => continue,
            // Missed notifications may include ours; a fresh snapshot heals it.
            Err(RecvError::Lagged(skipped)) => {
              tracing::debug!(post_id = %query.post_id, skipped, "comment listener lagged");
              break true;
            }
            Err(RecvError::Closed) => break false,
          },
        }
      };
      if !changed {
        break;
      }
    }

    tracing::debug!(post_id = %query.post_id, "comment listener released");
  }
}

// ─── CommentStore impl ───────────────────────────────────────────────────────

impl CommentStore for SqliteStore {
  type Error = Error;

  async fn add_comment(&self, post_id: &PostId, input: NewComment) -> Result<CommentId> {
    let comment_id  = CommentId::new(Uuid::new_v4().to_string())?;
    let id_str      = comment_id.to_string();
    let post_id_str = post_id.to_string();
    let avatar      = input.author_avatar_url().to_owned();
    let text        = input.text().to_owned();
    let at_str      = encode_dt(now());
    let author      = input.author_name().to_owned();

    let inserted = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let exists = tx
          .query_row(
            "SELECT 1 FROM posts WHERE post_id = ?1",
            rusqlite::params![post_id_str],
            |_| Ok(true),
          )
          .optional()?
          .unwrap_or(false);
        if !exists {
          return Ok(false);
        }
        tx.execute(
          "INSERT INTO comments (comment_id, post_id, author_avatar_url, text, created_at, author_name)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![id_str, post_id_str, avatar, text, at_str, author],
        )?;
        tx.commit()?;
        Ok(true)
      })
      .await?;

    if !inserted {
      return Err(Error::PostNotFound(post_id.clone()));
    }

    tracing::debug!(%post_id, %comment_id, "comment added");
    // No receivers just means nobody is listening.
    let _ = self.changes.send(post_id.clone());
    Ok(comment_id)
  }

  async fn listen(&self, query: &CommentQuery) -> Result<Listener<Error>> {
    let (tx, listener) = Listener::channel(LISTENER_BUFFER);
    // Subscribe before the first read so no write can slip between them.
    let changes = self.changes.subscribe();
    tokio::spawn(self.clone().pump_snapshots(query.clone(), changes, tx));
    Ok(listener)
  }
}
