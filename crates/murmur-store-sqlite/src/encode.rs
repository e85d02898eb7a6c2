//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as fixed-width RFC 3339 strings (always six
//! fractional digits, `Z` suffix) so that lexical order in SQL matches
//! chronological order.

use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use murmur_core::{
  comment::{Comment, CommentId},
  post::{Post, PostId},
  store::Direction,
};

use crate::{Error, Result};

// ─── DateTime<Utc> ────────────────────────────────────────────────────────────

/// Current time at the precision the columns keep, so a value handed back
/// to a caller equals the one read from the database later.
pub fn now() -> DateTime<Utc> { Utc::now().trunc_subsecs(6) }

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Direction ────────────────────────────────────────────────────────────────

/// SQL `ORDER BY` suffix; also orders by insertion sequence so equal
/// timestamps keep write order.
pub fn order_clause(direction: Direction) -> &'static str {
  match direction {
    Direction::Ascending => "ORDER BY created_at ASC, seq ASC",
    Direction::Descending => "ORDER BY created_at DESC, seq DESC",
  }
}

// ─── Raw row types ────────────────────────────────────────────────────────────

/// Raw column values read from the `posts` table.
pub struct RawPost {
  pub post_id:           String,
  pub author_avatar_url: String,
  pub image_url:         Option<String>,
  pub text:              String,
  pub created_at:        String,
  pub author_name:       String,
}

impl RawPost {
  pub fn into_post(self) -> Result<Post> {
    Ok(Post {
      post_id:           PostId::new(self.post_id)?,
      author_avatar_url: self.author_avatar_url,
      image_url:         self.image_url,
      text:              self.text,
      created_at:        Some(decode_dt(&self.created_at)?),
      author_name:       self.author_name,
    })
  }
}

/// Raw column values read from the `comments` table.
pub struct RawComment {
  pub comment_id:        String,
  pub author_avatar_url: String,
  pub text:              String,
  pub created_at:        String,
  pub author_name:       String,
}

impl RawComment {
  pub fn into_comment(self) -> Result<Comment> {
    Ok(Comment {
      comment_id:        CommentId::new(self.comment_id)?,
      author_avatar_url: self.author_avatar_url,
      text:              self.text,
      created_at:        Some(decode_dt(&self.created_at)?),
      author_name:       self.author_name,
    })
  }
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone;

  use super::*;

  #[test]
  fn timestamps_are_fixed_width() {
    let whole = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
    let encoded = encode_dt(whole);
    assert_eq!(encoded, "2024-05-01T12:00:00.000000Z");
    assert_eq!(decode_dt(&encoded).unwrap(), whole);
  }

  #[test]
  fn lexical_order_matches_time_order() {
    let a = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
    let b = a + chrono::Duration::microseconds(1500);
    assert!(encode_dt(a) < encode_dt(b));
  }

  #[test]
  fn now_survives_the_column_round_trip() {
    let at = now();
    assert_eq!(decode_dt(&encode_dt(at)).unwrap(), at);
  }

  #[test]
  fn bad_timestamp_is_a_parse_error() {
    assert!(matches!(decode_dt("yesterday"), Err(Error::DateParse(_))));
  }
}
