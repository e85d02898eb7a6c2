//! `murmur` — command-line client for a local murmur store.
//!
//! # Usage
//!
//! ```
//! murmur --email alice@example.com --password secret1 signup --username alice --avatar me.png
//! murmur post --text "first light"
//! murmur posts
//! murmur comment <POST_ID> "nice"
//! murmur watch <POST_ID>
//! ```
//!
//! Credentials and paths can also come from `murmur.toml` or `MURMUR_*`
//! environment variables.

mod config;
mod render;

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use anyhow::{Context as _, Result, bail};
use clap::{Parser, Subcommand};
use murmur_core::{
  auth::AuthProvider,
  blob::BlobStore,
  post::{NewPost, PostId},
  session::Session,
  store::CommentStore,
};
use murmur_feed::{
  auth_form::{AuthForm, AuthMode, AvatarFile, avatar_key},
  live::{FeedStatus, LiveComments, ViewState},
  submit::submit_comment,
};
use murmur_store_sqlite::{FsBlobStore, SqliteStore};
use tokio::sync::watch;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::config::CliConfig;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "murmur", version, about = "Post, comment and follow comment threads live")]
struct Args {
  /// Path to a TOML config file.
  #[arg(short, long, value_name = "FILE", default_value = "murmur.toml")]
  config: PathBuf,

  /// Account email (overrides the config file).
  #[arg(long, env = "MURMUR_EMAIL", global = true)]
  email: Option<String>,

  /// Account password (overrides the config file).
  #[arg(long, env = "MURMUR_PASSWORD", global = true, hide_env_values = true)]
  password: Option<String>,

  /// SQLite database path (overrides the config file).
  #[arg(long, global = true)]
  store: Option<PathBuf>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Create an account with a display name and avatar.
  Signup {
    #[arg(long)]
    username: String,
    /// Image file to upload as the avatar.
    #[arg(long)]
    avatar:   PathBuf,
  },
  /// Check the credentials and print the account's profile.
  Signin,
  /// Request a password reset mail for `--email`.
  ResetPassword,
  /// Change the display name and, optionally, the avatar.
  Profile {
    #[arg(long)]
    username: String,
    #[arg(long)]
    avatar:   Option<PathBuf>,
  },
  /// Publish a post.
  Post {
    #[arg(long)]
    text:  String,
    #[arg(long)]
    image: Option<PathBuf>,
  },
  /// List posts, newest first.
  Posts {
    #[arg(long)]
    json: bool,
  },
  /// Comment on a post as the signed-in account.
  Comment { post_id: PostId, text: String },
  /// Follow a post's comments until interrupted.
  Watch {
    post_id: PostId,
    /// Print each snapshot as a JSON array.
    #[arg(long)]
    json:    bool,
  },
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_writer(std::io::stderr)
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let args = Args::parse();

  // Flags override the config file, which overrides defaults.
  let mut cfg = CliConfig::load(&args.config)?;
  if let Some(store) = args.store {
    cfg.store_path = config::expand_tilde(&store);
  }
  if args.email.is_some() {
    cfg.email = args.email;
  }
  if args.password.is_some() {
    cfg.password = args.password;
  }

  if let Some(parent) = cfg.store_path.parent() {
    std::fs::create_dir_all(parent)
      .with_context(|| format!("failed to create {}", parent.display()))?;
  }
  let store = SqliteStore::open(&cfg.store_path)
    .await
    .with_context(|| format!("failed to open store at {:?}", cfg.store_path))?;
  let blobs = FsBlobStore::new(&cfg.blob_dir);
  let session = Session::new();

  match args.command {
    Command::Signup { username, avatar } => {
      let mut form = credentials_form(&cfg, AuthMode::SignUp)?;
      form.username = username;
      form.avatar = Some(read_avatar(&avatar).await?);
      let profile = submit_form(&mut form, &store, &blobs, &session).await?;
      println!("signed up as {} ({})", profile.display_name, profile.uid);
    }

    Command::Signin => {
      let profile = sign_in(&cfg, &store, &blobs, &session).await?;
      println!("{}", serde_json::to_string_pretty(&profile)?);
    }

    Command::ResetPassword => {
      let mut form = AuthForm::new();
      form.open_reset();
      form.reset_email = cfg.email.clone().context("--email is required")?;
      form.send_reset_email(&store).await?;
      println!("password reset requested");
    }

    Command::Profile { username, avatar } => {
      let current = sign_in(&cfg, &store, &blobs, &session).await?;
      let photo_url = match avatar {
        Some(path) => {
          let file = read_avatar(&path).await?;
          blobs
            .put(&avatar_key(&file.file_name), file.data)
            .await
            .context("avatar upload failed")?
        }
        None => current.photo_url,
      };
      store
        .update_profile(&current.uid, &username, &photo_url)
        .await
        .context("failed to update profile")?;
      session.set(username, photo_url);
      println!("{}", serde_json::to_string_pretty(&session.get())?);
    }

    Command::Post { text, image } => {
      let author = sign_in(&cfg, &store, &blobs, &session).await?;
      let image_url = match image {
        Some(path) => {
          let data = tokio::fs::read(&path)
            .await
            .with_context(|| format!("failed to read {}", path.display()))?;
          let key = format!("images/{}_{}", uuid::Uuid::new_v4(), file_name(&path)?);
          Some(blobs.put(&key, data).await.context("image upload failed")?)
        }
        None => None,
      };
      let post = store
        .publish_post(NewPost {
          author_avatar_url: author.photo_url,
          image_url,
          text,
          author_name: author.display_name,
        })
        .await
        .context("failed to publish post")?;
      println!("{}", post.post_id);
    }

    Command::Posts { json } => {
      let posts = store.list_posts().await.context("failed to list posts")?;
      if json {
        println!("{}", serde_json::to_string_pretty(&posts)?);
      } else {
        for post in &posts {
          println!("{}", render::post_line(post));
        }
      }
    }

    Command::Comment { post_id, text } => {
      sign_in(&cfg, &store, &blobs, &session).await?;
      let id = submit_comment(&store, &session, &post_id, &text).await?;
      println!("{id}");
    }

    Command::Watch { post_id, json } => {
      if store.get_post(&post_id).await?.is_none() {
        bail!("no post with id {post_id}");
      }
      watch_comments(Arc::new(store), post_id, &cfg, json).await?;
    }
  }

  Ok(())
}

// ─── Helpers ──────────────────────────────────────────────────────────────────

fn credentials_form(cfg: &CliConfig, mode: AuthMode) -> Result<AuthForm> {
  Ok(AuthForm {
    mode,
    email: cfg.email.clone().context("--email is required")?,
    password: cfg.password.clone().context("--password is required")?,
    ..AuthForm::default()
  })
}

/// Submit `form`, surfacing the form's error message on failure.
async fn submit_form<A, B>(
  form: &mut AuthForm,
  auth: &A,
  blobs: &B,
  session: &Session,
) -> Result<murmur_core::profile::Profile>
where
  A: AuthProvider,
  B: BlobStore,
{
  match form.submit(auth, blobs, session).await {
    Ok(profile) => Ok(profile),
    Err(e) => match form.error_message.take() {
      Some(message) => bail!("{message}"),
      None => Err(e.into()),
    },
  }
}

async fn sign_in(
  cfg: &CliConfig,
  store: &SqliteStore,
  blobs: &FsBlobStore,
  session: &Session,
) -> Result<murmur_core::profile::Profile> {
  let mut form = credentials_form(cfg, AuthMode::SignIn)?;
  submit_form(&mut form, store, blobs, session).await
}

fn file_name(path: &Path) -> Result<String> {
  path
    .file_name()
    .map(|n| n.to_string_lossy().into_owned())
    .with_context(|| format!("{} has no file name", path.display()))
}

async fn read_avatar(path: &Path) -> Result<AvatarFile> {
  let data = tokio::fs::read(path)
    .await
    .with_context(|| format!("failed to read {}", path.display()))?;
  Ok(AvatarFile { file_name: file_name(path)?, data })
}

/// Subscribe `live` to `post_id` and return a receiver that has not yet seen
/// any snapshot of it. The receiver exists before the listener task starts.
fn follow<S>(live: &mut LiveComments<S>, post_id: PostId) -> watch::Receiver<ViewState>
where
  S: CommentStore + 'static,
{
  let rx = live.watch();
  live.subscribe(post_id);
  rx
}

/// Print every snapshot of `post_id`'s comments until ctrl-c or a terminal
/// listener failure.
async fn watch_comments(store: Arc<SqliteStore>, post_id: PostId, cfg: &CliConfig, json: bool) -> Result<()> {
  let mut live = LiveComments::new(store, cfg.feed.clone());
  let mut rx = follow(&mut live, post_id);

  let ctrl_c = tokio::signal::ctrl_c();
  tokio::pin!(ctrl_c);

  loop {
    tokio::select! {
      _ = &mut ctrl_c => break,
      changed = rx.changed() => {
        if changed.is_err() {
          break;
        }
        let state = rx.borrow_and_update().clone();
        if let FeedStatus::Failed(reason) = &state.status {
          bail!("comment feed failed: {reason}");
        }
        match render::status_line(&state.status) {
          Some(line) => eprintln!("{line}"),
          None if json => println!("{}", serde_json::to_string(&state.comments)?),
          None => {
            println!("── {} comment(s) ──", state.comments.len());
            for comment in &state.comments {
              println!("{}", render::comment_line(comment));
            }
          }
        }
      }
    }
  }

  live.release();
  Ok(())
}

#[cfg(test)]
mod tests {
  use std::time::Duration;

  use murmur_core::{comment::NewComment, profile::Profile};
  use murmur_feed::FeedConfig;

  use super::*;

  #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
  async fn followed_post_delivers_its_first_snapshot() {
    let store = Arc::new(SqliteStore::open_in_memory().await.unwrap());
    let post = store
      .publish_post(NewPost {
        author_avatar_url: String::new(),
        image_url:         None,
        text:              "hello".into(),
        author_name:       "alice".into(),
      })
      .await
      .unwrap();
    let author = Profile { display_name: "bob".into(), ..Profile::default() };
    store
      .add_comment(&post.post_id, NewComment::new("first", &author).unwrap())
      .await
      .unwrap();

    let mut live = LiveComments::new(Arc::clone(&store), FeedConfig::default());
    let mut rx = follow(&mut live, post.post_id.clone());
    // Give the listener time to publish before we start waiting.
    tokio::time::sleep(Duration::from_millis(50)).await;

    let state = tokio::time::timeout(Duration::from_secs(2), async {
      loop {
        rx.changed().await.unwrap();
        let state = rx.borrow_and_update().clone();
        if state.status == FeedStatus::Live {
          return state;
        }
      }
    })
    .await
    .expect("first snapshot was seen");
    assert_eq!(state.comments.len(), 1);
    assert_eq!(state.comments[0].text, "first");
  }
}
