//! Local backend for murmur.
//!
//! [`SqliteStore`] keeps posts, comments and accounts in one SQLite file via
//! [`tokio_rusqlite`], so all database access runs on a dedicated thread
//! without blocking the async runtime. Realtime comment listeners are driven
//! by an in-process change feed. [`FsBlobStore`] keeps blobs on disk.

mod auth;
mod blob;
mod encode;
mod schema;
mod store;

pub mod error;

pub use blob::FsBlobStore;
pub use error::{Error, Result};
pub use store::SqliteStore;
