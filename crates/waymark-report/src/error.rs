//! Error type for `waymark-report`.

use thiserror::Error;
use waymark_core::case::CaseStatus;

#[derive(Debug, Error)]
pub enum Error {
  /// Reports are only issued for cases whose status is `paid`.
  #[error("case is {0}, not paid")]
  NotPaid(CaseStatus),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
