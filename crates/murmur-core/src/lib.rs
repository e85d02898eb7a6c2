//! Core types and trait definitions for murmur.
//!
//! This crate is free of database and transport dependencies. It defines the
//! post and comment model, the collaborator traits implemented by backends
//! (documents, credentials, blobs), and the session store that attributes
//! writes to the signed-in viewer.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod auth;
pub mod blob;
pub mod comment;
pub mod error;
pub mod post;
pub mod profile;
pub mod session;
pub mod store;

pub use error::{Error, Result};
