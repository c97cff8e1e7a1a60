//! Error type for `waymark-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] waymark_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  /// Every generated code collided with an existing one.
  #[error("no free access code after {0} attempts")]
  AccessCodeExhausted(usize),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
