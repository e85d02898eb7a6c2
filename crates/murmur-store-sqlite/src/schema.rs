//! SQL schema for the murmur SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

-- Posts are immutable once published.
CREATE TABLE IF NOT EXISTS posts (
    seq               INTEGER PRIMARY KEY AUTOINCREMENT,
    post_id           TEXT NOT NULL UNIQUE,
    author_avatar_url TEXT NOT NULL,
    image_url         TEXT,
    text              TEXT NOT NULL,
    created_at        TEXT NOT NULL,   -- RFC 3339 UTC, microseconds; server-assigned
    author_name       TEXT NOT NULL
);

-- Comments are append-only; no UPDATE or DELETE is ever issued.
-- `seq` breaks ties between comments written in the same microsecond.
CREATE TABLE IF NOT EXISTS comments (
    seq               INTEGER PRIMARY KEY AUTOINCREMENT,
    comment_id        TEXT NOT NULL UNIQUE,
    post_id           TEXT NOT NULL REFERENCES posts(post_id),
    author_avatar_url TEXT NOT NULL,
    text              TEXT NOT NULL,
    created_at        TEXT NOT NULL,
    author_name       TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS users (
    uid           TEXT PRIMARY KEY,
    email         TEXT NOT NULL UNIQUE,  -- trimmed, lowercased
    password_hash TEXT NOT NULL,         -- argon2 PHC string
    display_name  TEXT NOT NULL DEFAULT '',
    photo_url     TEXT NOT NULL DEFAULT '',
    created_at    TEXT NOT NULL
);

-- Reset requests awaiting delivery by an external mailer.
CREATE TABLE IF NOT EXISTS password_resets (
    token        TEXT PRIMARY KEY,
    uid          TEXT NOT NULL REFERENCES users(uid),
    requested_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS comments_post_idx ON comments(post_id, created_at);
CREATE INDEX IF NOT EXISTS posts_created_idx ON posts(created_at);

PRAGMA user_version = 1;
";
