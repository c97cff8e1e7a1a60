//! Encoding and decoding helpers between domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are fixed-width RFC 3339 strings (microseconds, `Z` suffix) so
//! that lexical order is chronological order. Citations are a JSON array.

use chrono::{DateTime, SecondsFormat, Utc};
use waymark_core::{
  answers::Answer,
  case::{Case, CaseStatus, CaseSummary, Locale},
  decision::{Decision, RecordedDecision},
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Enumerations ────────────────────────────────────────────────────────────

pub fn decode_status(s: &str) -> Result<CaseStatus> {
  s.parse()
    .map_err(|_| waymark_core::Error::UnknownStatus(s.to_owned()).into())
}

pub fn decode_locale(s: &str) -> Result<Locale> {
  s.parse()
    .map_err(|_| waymark_core::Error::UnknownLocale(s.to_owned()).into())
}

// ─── Citations ───────────────────────────────────────────────────────────────

pub fn encode_citations(citations: &[String]) -> Result<String> {
  Ok(serde_json::to_string(citations)?)
}

pub fn decode_citations(s: &str) -> Result<Vec<String>> {
  Ok(serde_json::from_str(s)?)
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Column list matching [`RawCase::from_row`].
pub const CASE_COLUMNS: &str =
  "case_id, locale, status, access_code, created_at, updated_at";

/// Raw strings read directly from a `cases` row.
pub struct RawCase {
  pub case_id:     String,
  pub locale:      String,
  pub status:      String,
  pub access_code: Option<String>,
  pub created_at:  String,
  pub updated_at:  String,
}

impl RawCase {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      case_id:     row.get(0)?,
      locale:      row.get(1)?,
      status:      row.get(2)?,
      access_code: row.get(3)?,
      created_at:  row.get(4)?,
      updated_at:  row.get(5)?,
    })
  }

  pub fn into_case(self) -> Result<Case> {
    Ok(Case {
      case_id:     decode_uuid(&self.case_id)?,
      locale:      decode_locale(&self.locale)?,
      status:      decode_status(&self.status)?,
      access_code: self.access_code,
      created_at:  decode_dt(&self.created_at)?,
      updated_at:  decode_dt(&self.updated_at)?,
    })
  }
}

/// A `cases` row left-joined with its decision pathway.
pub struct RawSummary {
  pub case:    RawCase,
  pub pathway: Option<String>,
}

impl RawSummary {
  pub fn into_summary(self) -> Result<CaseSummary> {
    let case = self.case.into_case()?;
    Ok(CaseSummary {
      case_id:     case.case_id,
      status:      case.status,
      locale:      case.locale,
      created_at:  case.created_at,
      updated_at:  case.updated_at,
      access_code: case.access_code,
      pathway:     self.pathway,
    })
  }
}

/// Raw strings read directly from a `decisions` row.
pub struct RawDecision {
  pub case_id:    String,
  pub pathway:    String,
  pub citations:  String,
  pub decided_at: String,
}

impl RawDecision {
  pub fn into_recorded(self) -> Result<RecordedDecision> {
    Ok(RecordedDecision {
      case_id:    decode_uuid(&self.case_id)?,
      decision:   Decision {
        pathway:   self.pathway,
        citations: decode_citations(&self.citations)?,
      },
      decided_at: decode_dt(&self.decided_at)?,
    })
  }
}

pub fn answer_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Answer> {
  Ok(Answer { question_id: row.get(0)?, value: row.get(1)? })
}
