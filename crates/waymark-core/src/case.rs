//! Case: one applicant's session, identified by a UUID.
//!
//! A case holds identity metadata, its lifecycle status and the access code
//! that lets the applicant resume it. Answers and the decision are stored
//! separately and keyed by `case_id`.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};
use uuid::Uuid;

// ─── Enumerations ────────────────────────────────────────────────────────────

/// Where a case is in its lifecycle.
///
/// Normal operation only moves forward (`draft → paid → closed`); admin
/// tooling may set any value.
#[derive(
  Debug,
  Clone,
  Copy,
  Default,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum CaseStatus {
  #[default]
  Draft,
  Paid,
  Closed,
}

/// The interface language chosen when the case was opened.
#[derive(
  Debug,
  Clone,
  Copy,
  Default,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Locale {
  #[default]
  Fr,
  En,
  Ar,
}

impl Locale {
  /// Lenient parse used at the HTTP boundary: unknown or missing values fall
  /// back to the default locale.
  pub fn parse_or_default(raw: Option<&str>) -> Self {
    raw
      .and_then(|s| s.trim().parse().ok())
      .unwrap_or_default()
  }
}

// ─── Case ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Case {
  pub case_id:     Uuid,
  pub locale:      Locale,
  pub status:      CaseStatus,
  /// Six ASCII digits; unique across all cases once assigned.
  pub access_code: Option<String>,
  pub created_at:  DateTime<Utc>,
  pub updated_at:  DateTime<Utc>,
}

impl Case {
  pub fn is_paid(&self) -> bool { self.status == CaseStatus::Paid }
}

// ─── Admin read models ───────────────────────────────────────────────────────

/// One row of the administrative case listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseSummary {
  pub case_id:     Uuid,
  pub status:      CaseStatus,
  pub locale:      Locale,
  pub created_at:  DateTime<Utc>,
  pub updated_at:  DateTime<Utc>,
  pub access_code: Option<String>,
  /// Pathway of the last recorded decision, if any.
  pub pathway:     Option<String>,
}

/// Aggregate counts for the admin dashboard.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseStats {
  pub total:     u64,
  pub by_status: BTreeMap<String, u64>,
  pub by_locale: BTreeMap<String, u64>,
}
