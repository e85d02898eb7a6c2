//! Client-side models for murmur.
//!
//! - [`live::LiveComments`] mirrors one post's comment collection in realtime
//!   and hands the latest snapshot to observers through a watch channel.
//! - [`submit::submit_comment`] appends a comment attributed to the current
//!   session; it never inserts locally, the next snapshot does.
//! - [`post_view::PostView`] is the post card: the post, its comment panel,
//!   and the draft input.
//! - [`auth_form::AuthForm`] is the sign-in / sign-up screen.

pub mod auth_form;
pub mod config;
pub mod error;
pub mod live;
pub mod post_view;
pub mod submit;

pub use config::FeedConfig;
pub use error::{Error, Result};
