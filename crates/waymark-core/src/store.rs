//! The `CaseStore` trait and supporting query types.
//!
//! Implemented by storage backends (e.g. `waymark-store-sqlite`). The HTTP
//! layer depends on this abstraction, not on any concrete backend.

use std::future::Future;

use uuid::Uuid;

use crate::{
  answers::Answer,
  case::{Case, CaseStats, CaseStatus, CaseSummary, Locale},
  decision::{Decision, RecordedDecision},
};

/// Default row bound for [`CaseStore::list_cases`].
pub const LIST_LIMIT: usize = 200;
/// Hard row bound for any listing, including the CSV export.
pub const EXPORT_LIMIT: usize = 2000;

// ─── Query type ──────────────────────────────────────────────────────────────

/// Parameters for [`CaseStore::list_cases`].
#[derive(Debug, Clone, Default)]
pub struct CaseFilter {
  pub status:      Option<CaseStatus>,
  pub locale:      Option<Locale>,
  /// Case-insensitive substring of the case id or the decision pathway.
  pub text:        Option<String>,
  /// Exact access code.
  pub access_code: Option<String>,
  /// Defaults to [`LIST_LIMIT`]; never exceeds [`EXPORT_LIMIT`].
  pub limit:       Option<usize>,
}

impl CaseFilter {
  pub fn effective_limit(&self) -> usize {
    self.limit.unwrap_or(LIST_LIMIT).clamp(1, EXPORT_LIMIT)
  }
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a Waymark case store backend.
///
/// Lookups of a case that does not exist return `Ok(None)`; errors are
/// reserved for backend failures. Every write bumps the case's `updated_at`.
pub trait CaseStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Cases ─────────────────────────────────────────────────────────────

  /// Create a draft case with a fresh UUID and no access code.
  fn create_case(
    &self,
    locale: Locale,
  ) -> impl Future<Output = Result<Case, Self::Error>> + Send + '_;

  fn get_case(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Case>, Self::Error>> + Send + '_;

  /// Set the status unconditionally.
  fn update_status(
    &self,
    id: Uuid,
    status: CaseStatus,
  ) -> impl Future<Output = Result<Option<Case>, Self::Error>> + Send + '_;

  // ── Access codes ──────────────────────────────────────────────────────

  /// Assign a new unique access code, replacing any existing one.
  fn regenerate_access_code(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Case>, Self::Error>> + Send + '_;

  /// Assign an access code only if the case has none yet.
  fn ensure_access_code(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Case>, Self::Error>> + Send + '_;

  /// Look up a case by its exact access code.
  fn find_by_access_code<'a>(
    &'a self,
    code: &'a str,
  ) -> impl Future<Output = Result<Option<Case>, Self::Error>> + Send + 'a;

  // ── Answers ───────────────────────────────────────────────────────────

  /// Replace every stored answer for the case in one transaction. Rows keep
  /// the order of `answers`.
  ///
  /// Returns `false` if the case does not exist.
  fn replace_answers(
    &self,
    id: Uuid,
    answers: Vec<Answer>,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Stored answers in their persisted order.
  fn get_answers(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Vec<Answer>, Self::Error>> + Send + '_;

  // ── Decisions ─────────────────────────────────────────────────────────

  /// Record the decision for a case, replacing any previous one.
  fn save_decision(
    &self,
    id: Uuid,
    decision: Decision,
  ) -> impl Future<Output = Result<Option<RecordedDecision>, Self::Error>>
  + Send
  + '_;

  fn get_decision(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<RecordedDecision>, Self::Error>>
  + Send
  + '_;

  // ── Admin reads ───────────────────────────────────────────────────────

  /// Cases matching `filter`, newest first.
  fn list_cases<'a>(
    &'a self,
    filter: &'a CaseFilter,
  ) -> impl Future<Output = Result<Vec<CaseSummary>, Self::Error>> + Send + 'a;

  fn stats(
    &self,
  ) -> impl Future<Output = Result<CaseStats, Self::Error>> + Send + '_;
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn limit_defaults_and_caps() {
    assert_eq!(CaseFilter::default().effective_limit(), LIST_LIMIT);

    let huge = CaseFilter { limit: Some(1_000_000), ..Default::default() };
    assert_eq!(huge.effective_limit(), EXPORT_LIMIT);

    let zero = CaseFilter { limit: Some(0), ..Default::default() };
    assert_eq!(zero.effective_limit(), 1);
  }
}
