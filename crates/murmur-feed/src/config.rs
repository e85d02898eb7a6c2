//! Tunables for the live comment view, deserialised from the CLI's
//! configuration (`[feed]` table).

use std::time::Duration;

use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
  /// Delay before the first reconnect attempt.
  pub initial_backoff_ms:        u64,
  /// Upper bound on the delay between reconnect attempts.
  pub max_backoff_ms:            u64,
  /// Reconnect attempts after the first failure before the view gives up.
  pub max_reconnect_attempts:    u32,
  /// Keep the comment subscription running while the panel is collapsed.
  pub keep_alive_when_collapsed: bool,
  /// Put the draft back into the input when a submit fails.
  pub restore_draft_on_failure:  bool,
}

impl Default for FeedConfig {
  fn default() -> Self {
    Self {
      initial_backoff_ms:        250,
      max_backoff_ms:            30_000,
      max_reconnect_attempts:    8,
      keep_alive_when_collapsed: true,
      restore_draft_on_failure:  true,
    }
  }
}

impl FeedConfig {
  /// Delay before reconnect attempt `attempt` (1-based): doubles each time,
  /// capped at `max_backoff_ms`.
  pub fn backoff(&self, attempt: u32) -> Duration {
    let exponent = attempt.saturating_sub(1).min(31);
    let millis = self
      .initial_backoff_ms
      .saturating_mul(1u64 << exponent)
      .min(self.max_backoff_ms);
    Duration::from_millis(millis)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn backoff_doubles_then_caps() {
    let cfg = FeedConfig {
      initial_backoff_ms: 100,
      max_backoff_ms: 1_000,
      ..FeedConfig::default()
    };
    let delays: Vec<u64> = (1..=6).map(|a| cfg.backoff(a).as_millis() as u64).collect();
    assert_eq!(delays, vec![100, 200, 400, 800, 1_000, 1_000]);
  }

  #[test]
  fn backoff_survives_huge_attempt_counts() {
    let cfg = FeedConfig::default();
    assert_eq!(cfg.backoff(u32::MAX), Duration::from_millis(cfg.max_backoff_ms));
  }
}
