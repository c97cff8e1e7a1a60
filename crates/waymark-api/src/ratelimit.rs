//! Per-caller attempt limiter for the access-code gateway.
//!
//! Each caller key owns a bucket holding an attempt count and the instant
//! its window closes. The window opens with the first attempt; once it has
//! closed the next attempt starts a fresh one. Expired buckets are pruned
//! lazily on access.

use std::{
  collections::HashMap,
  sync::{Mutex, PoisonError},
  time::{Duration, Instant},
};

/// Default number of attempts allowed per window.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;
/// Default window length.
pub const DEFAULT_WINDOW: Duration = Duration::from_secs(600);

#[derive(Debug, Clone, Copy)]
struct Bucket {
  count:     u32,
  resets_at: Instant,
}

/// Returned when a caller has used up its attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limited {
  /// Time until the caller's window closes.
  pub retry_after: Duration,
}

impl Limited {
  /// Whole seconds for the `Retry-After` header, never zero.
  pub fn retry_after_secs(&self) -> u64 {
    self.retry_after.as_secs_f64().ceil().max(1.0) as u64
  }
}

#[derive(Debug)]
pub struct RateLimiter {
  max_attempts: u32,
  window:       Duration,
  buckets:      Mutex<HashMap<String, Bucket>>,
}

impl Default for RateLimiter {
  fn default() -> Self { Self::new(DEFAULT_MAX_ATTEMPTS, DEFAULT_WINDOW) }
}

impl RateLimiter {
  pub fn new(max_attempts: u32, window: Duration) -> Self {
    Self { max_attempts, window, buckets: Mutex::new(HashMap::new()) }
  }

  /// Record one attempt for `key` now.
  pub fn try_consume(&self, key: &str) -> Result<(), Limited> {
    self.try_consume_at(key, Instant::now())
  }

  /// Record one attempt for `key` at `now`.
  pub fn try_consume_at(&self, key: &str, now: Instant) -> Result<(), Limited> {
    let mut buckets = self.buckets.lock().unwrap_or_else(PoisonError::into_inner);
    buckets.retain(|_, b| b.resets_at > now);

    match buckets.get_mut(key) {
      None => {
        buckets.insert(key.to_owned(), Bucket {
          count:     1,
          resets_at: now + self.window,
        });
        Ok(())
      }
      Some(bucket) if bucket.count >= self.max_attempts => Err(Limited {
        retry_after: bucket.resets_at.saturating_duration_since(now),
      }),
      Some(bucket) => {
        bucket.count += 1;
        Ok(())
      }
    }
  }

  /// Number of callers currently tracked.
  pub fn tracked(&self) -> usize {
    self
      .buckets
      .lock()
      .unwrap_or_else(PoisonError::into_inner)
      .len()
  }
}
