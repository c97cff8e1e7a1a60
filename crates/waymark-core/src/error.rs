//! Error types for `waymark-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("access code must be exactly 6 digits")]
  InvalidAccessCode,

  #[error("unknown case status: {0:?}")]
  UnknownStatus(String),

  #[error("unknown locale: {0:?}")]
  UnknownLocale(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn messages_name_the_rejected_value() {
    assert_eq!(
      Error::UnknownStatus("refunded".into()).to_string(),
      "unknown case status: \"refunded\""
    );
    assert_eq!(
      Error::UnknownLocale("de".into()).to_string(),
      "unknown locale: \"de\""
    );
    assert_eq!(
      Error::InvalidAccessCode.to_string(),
      "access code must be exactly 6 digits"
    );
  }
}
