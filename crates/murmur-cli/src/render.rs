//! Plain-text rendering of posts, comments and feed status.

use chrono::{DateTime, Utc};
use murmur_core::{comment::Comment, post::Post};
use murmur_feed::live::FeedStatus;

/// `2024-05-01 12:00`, or `pending` while the server time is unresolved.
pub fn timestamp(at: Option<DateTime<Utc>>) -> String {
  match at {
    Some(at) => at.format("%Y-%m-%d %H:%M").to_string(),
    None => "pending".to_owned(),
  }
}

pub fn post_line(post: &Post) -> String {
  let image = match &post.image_url {
    Some(url) => format!(" [{url}]"),
    None => String::new(),
  };
  format!(
    "{}  {}  {}: {}{image}",
    post.post_id,
    timestamp(post.created_at),
    post.author_name,
    post.text,
  )
}

pub fn comment_line(comment: &Comment) -> String {
  format!(
    "  {}  {}: {}",
    timestamp(comment.created_at),
    comment.author_name,
    comment.text,
  )
}

/// One-line description of a status change, or `None` for `Live` (the
/// snapshot itself is printed instead).
pub fn status_line(status: &FeedStatus) -> Option<String> {
  match status {
    FeedStatus::Idle => Some("not subscribed".to_owned()),
    FeedStatus::Connecting => Some("connecting…".to_owned()),
    FeedStatus::Live => None,
    FeedStatus::Reconnecting { attempt } => Some(format!("connection lost; reconnect attempt {attempt}")),
    FeedStatus::Failed(reason) => Some(format!("giving up: {reason}")),
  }
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone;
  use murmur_core::{comment::CommentId, post::PostId};

  use super::*;

  fn comment(at: Option<DateTime<Utc>>) -> Comment {
    Comment {
      comment_id:        CommentId::new("c1").unwrap(),
      author_avatar_url: String::new(),
      text:              "nice shot".into(),
      created_at:        at,
      author_name:       "bob".into(),
    }
  }

  #[test]
  fn unresolved_timestamp_renders_pending() {
    assert_eq!(comment_line(&comment(None)), "  pending  bob: nice shot");
  }

  #[test]
  fn resolved_timestamp_renders_minutes() {
    let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 59).unwrap();
    assert_eq!(comment_line(&comment(Some(at))), "  2024-05-01 12:30  bob: nice shot");
  }

  #[test]
  fn post_line_includes_image() {
    let post = Post {
      post_id:           PostId::new("p1").unwrap(),
      author_avatar_url: String::new(),
      image_url:         Some("file:///img.png".into()),
      text:              "hello".into(),
      created_at:        None,
      author_name:       "alice".into(),
    };
    assert_eq!(post_line(&post), "p1  pending  alice: hello [file:///img.png]");
  }

  #[test]
  fn live_status_has_no_line() {
    assert!(status_line(&FeedStatus::Live).is_none());
    assert_eq!(
      status_line(&FeedStatus::Reconnecting { attempt: 2 }).unwrap(),
      "connection lost; reconnect attempt 2",
    );
  }
}
