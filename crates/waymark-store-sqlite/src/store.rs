//! [`SqliteStore`]: the SQLite implementation of [`CaseStore`].

use std::path::Path;

use chrono::{DateTime, SubsecRound as _, Utc};
use rand_core::OsRng;
use rusqlite::{ErrorCode, OptionalExtension as _};
use uuid::Uuid;

use waymark_core::{
  access::generate_code,
  answers::Answer,
  case::{Case, CaseStats, CaseStatus, CaseSummary, Locale},
  decision::{Decision, RecordedDecision},
  store::{CaseFilter, CaseStore},
};

use crate::{
  encode::{
    answer_from_row, encode_citations, encode_dt, encode_uuid, RawCase,
    RawDecision, RawSummary, CASE_COLUMNS,
  },
  schema::SCHEMA,
  Error, Result,
};

/// Attempts at drawing an unused access code before giving up.
const CODE_ATTEMPTS: usize = 32;

/// Current time at the precision the `TEXT` columns keep.
fn now() -> DateTime<Utc> { Utc::now().trunc_subsecs(6) }

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Waymark case store backed by a single SQLite file.
///
/// Cloning is cheap: the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store: useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Shared body of the two access-code operations.
  async fn assign_code(&self, id: Uuid, keep_existing: bool) -> Result<Option<Case>> {
    let id_str = encode_uuid(id);
    let now    = encode_dt(now());

    let outcome = self
      .conn
      .call(move |conn| {
        let Some(current) = select_case(conn, &id_str)? else {
          return Ok(CodeOutcome::Missing);
        };
        if keep_existing && current.access_code.is_some() {
          return Ok(CodeOutcome::Assigned(current));
        }

        for _ in 0..CODE_ATTEMPTS {
          let code = generate_code(&mut OsRng);
          if current.access_code.as_deref() == Some(code.as_str()) {
            continue;
          }
          let updated = conn.execute(
            "UPDATE cases SET access_code = ?2, updated_at = ?3 WHERE case_id = ?1",
            rusqlite::params![id_str, code, now],
          );
          match updated {
            Ok(_) => {
              return Ok(match select_case(conn, &id_str)? {
                Some(raw) => CodeOutcome::Assigned(raw),
                None => CodeOutcome::Missing,
              });
            }
            Err(rusqlite::Error::SqliteFailure(e, _))
              if e.code == ErrorCode::ConstraintViolation =>
            {
              continue;
            }
            Err(e) => return Err(e.into()),
          }
        }
        Ok(CodeOutcome::Exhausted)
      })
      .await?;

    match outcome {
      CodeOutcome::Assigned(raw) => raw.into_case().map(Some),
      CodeOutcome::Missing => Ok(None),
      CodeOutcome::Exhausted => {
        tracing::error!(case_id = %id, "access code space exhausted");
        Err(Error::AccessCodeExhausted(CODE_ATTEMPTS))
      }
    }
  }
}

enum CodeOutcome {
  Assigned(RawCase),
  Missing,
  Exhausted,
}

fn select_case(
  conn: &rusqlite::Connection,
  id: &str,
) -> rusqlite::Result<Option<RawCase>> {
  conn
    .query_row(
      &format!("SELECT {CASE_COLUMNS} FROM cases WHERE case_id = ?1"),
      rusqlite::params![id],
      RawCase::from_row,
    )
    .optional()
}

fn case_exists(conn: &rusqlite::Connection, id: &str) -> rusqlite::Result<bool> {
  Ok(
    conn
      .query_row(
        "SELECT 1 FROM cases WHERE case_id = ?1",
        rusqlite::params![id],
        |_| Ok(true),
      )
      .optional()?
      .unwrap_or(false),
  )
}

fn touch(conn: &rusqlite::Connection, id: &str, now: &str) -> rusqlite::Result<()> {
  conn.execute(
    "UPDATE cases SET updated_at = ?2 WHERE case_id = ?1",
    rusqlite::params![id, now],
  )?;
  Ok(())
}

/// Escape LIKE wildcards so user text matches literally (with `ESCAPE '\'`).
fn like_pattern(text: &str) -> String {
  let mut out = String::with_capacity(text.len() + 2);
  out.push('%');
  for c in text.chars() {
    if matches!(c, '%' | '_' | '\\') {
      out.push('\\');
    }
    out.push(c);
  }
  out.push('%');
  out
}

// ─── CaseStore impl ──────────────────────────────────────────────────────────

impl CaseStore for SqliteStore {
  type Error = Error;

  // ── Cases ─────────────────────────────────────────────────────────────────

  async fn create_case(&self, locale: Locale) -> Result<Case> {
    let now = now();
    let case = Case {
      case_id:     Uuid::new_v4(),
      locale,
      status:      CaseStatus::Draft,
      access_code: None,
      created_at:  now,
      updated_at:  now,
    };

    let id_str     = encode_uuid(case.case_id);
    let locale_str = locale.as_ref().to_owned();
    let status_str = case.status.as_ref().to_owned();
    let at_str     = encode_dt(now);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO cases (case_id, locale, status, access_code, created_at, updated_at)
           VALUES (?1, ?2, ?3, NULL, ?4, ?4)",
          rusqlite::params![id_str, locale_str, status_str, at_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(case)
  }

  async fn get_case(&self, id: Uuid) -> Result<Option<Case>> {
    let id_str = encode_uuid(id);

    let raw = self
      .conn
      .call(move |conn| Ok(select_case(conn, &id_str)?))
      .await?;

    raw.map(RawCase::into_case).transpose()
  }

  async fn update_status(&self, id: Uuid, status: CaseStatus) -> Result<Option<Case>> {
    let id_str     = encode_uuid(id);
    let status_str = status.as_ref().to_owned();
    let now        = encode_dt(now());

    let raw = self
      .conn
      .call(move |conn| {
        conn.execute(
          "UPDATE cases SET status = ?2, updated_at = ?3 WHERE case_id = ?1",
          rusqlite::params![id_str, status_str, now],
        )?;
        Ok(select_case(conn, &id_str)?)
      })
      .await?;

    raw.map(RawCase::into_case).transpose()
  }

  // ── Access codes ──────────────────────────────────────────────────────────

  async fn regenerate_access_code(&self, id: Uuid) -> Result<Option<Case>> {
    self.assign_code(id, false).await
  }

  async fn ensure_access_code(&self, id: Uuid) -> Result<Option<Case>> {
    self.assign_code(id, true).await
  }

  async fn find_by_access_code(&self, code: &str) -> Result<Option<Case>> {
    let code = code.to_owned();

    let raw = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {CASE_COLUMNS} FROM cases WHERE access_code = ?1"),
              rusqlite::params![code],
              RawCase::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawCase::into_case).transpose()
  }

  // ── Answers ───────────────────────────────────────────────────────────────

  async fn replace_answers(&self, id: Uuid, answers: Vec<Answer>) -> Result<bool> {
    let id_str = encode_uuid(id);
    let now    = encode_dt(now());

    let found = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        if !case_exists(&tx, &id_str)? {
          return Ok(false);
        }

        tx.execute("DELETE FROM answers WHERE case_id = ?1", rusqlite::params![id_str])?;
        {
          let mut stmt = tx.prepare(
            "INSERT INTO answers (case_id, question_id, value, position)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT (case_id, question_id) DO UPDATE SET value = excluded.value",
          )?;
          for (position, answer) in answers.iter().enumerate() {
            stmt.execute(rusqlite::params![
              id_str,
              answer.question_id,
              answer.value,
              position as i64,
            ])?;
          }
        }
        touch(&tx, &id_str, &now)?;
        tx.commit()?;
        Ok(true)
      })
      .await?;

    Ok(found)
  }

  async fn get_answers(&self, id: Uuid) -> Result<Vec<Answer>> {
    let id_str = encode_uuid(id);

    let answers = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT question_id, value FROM answers WHERE case_id = ?1 ORDER BY position",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![id_str], answer_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    Ok(answers)
  }

  // ── Decisions ─────────────────────────────────────────────────────────────

  async fn save_decision(
    &self,
    id: Uuid,
    decision: Decision,
  ) -> Result<Option<RecordedDecision>> {
    let decided_at    = now();
    let id_str        = encode_uuid(id);
    let pathway       = decision.pathway.clone();
    let citations_str = encode_citations(&decision.citations)?;
    let at_str        = encode_dt(decided_at);

    let found = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        if !case_exists(&tx, &id_str)? {
          return Ok(false);
        }
        tx.execute(
          "INSERT INTO decisions (case_id, pathway, citations, decided_at)
           VALUES (?1, ?2, ?3, ?4)
           ON CONFLICT (case_id) DO UPDATE SET
             pathway    = excluded.pathway,
             citations  = excluded.citations,
             decided_at = excluded.decided_at",
          rusqlite::params![id_str, pathway, citations_str, at_str],
        )?;
        touch(&tx, &id_str, &at_str)?;
        tx.commit()?;
        Ok(true)
      })
      .await?;

    Ok(found.then_some(RecordedDecision { case_id: id, decision, decided_at }))
  }

  async fn get_decision(&self, id: Uuid) -> Result<Option<RecordedDecision>> {
    let id_str = encode_uuid(id);

    let raw = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT case_id, pathway, citations, decided_at
               FROM decisions WHERE case_id = ?1",
              rusqlite::params![id_str],
              |row| {
                Ok(RawDecision {
                  case_id:    row.get(0)?,
                  pathway:    row.get(1)?,
                  citations:  row.get(2)?,
                  decided_at: row.get(3)?,
                })
              },
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawDecision::into_recorded).transpose()
  }

  // ── Admin reads ───────────────────────────────────────────────────────────

  async fn list_cases(&self, filter: &CaseFilter) -> Result<Vec<CaseSummary>> {
    let status_str   = filter.status.map(|s| s.as_ref().to_owned());
    let locale_str   = filter.locale.map(|l| l.as_ref().to_owned());
    let text_pattern = filter
      .text
      .as_deref()
      .map(str::trim)
      .filter(|t| !t.is_empty())
      .map(like_pattern);
    let code         = filter.access_code.clone();
    let limit_val    = filter.effective_limit() as i64;

    let raws: Vec<RawSummary> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT c.case_id, c.locale, c.status, c.access_code,
                  c.created_at, c.updated_at, d.pathway
           FROM cases c
           LEFT JOIN decisions d ON d.case_id = c.case_id
           WHERE (?1 IS NULL OR c.status = ?1)
             AND (?2 IS NULL OR c.locale = ?2)
             AND (?3 IS NULL
                  OR c.case_id LIKE ?3 ESCAPE '\\'
                  OR d.pathway LIKE ?3 ESCAPE '\\')
             AND (?4 IS NULL OR c.access_code = ?4)
           ORDER BY c.created_at DESC, c.rowid DESC
           LIMIT ?5",
        )?;
        let rows = stmt
          .query_map(
            rusqlite::params![
              status_str.as_deref(),
              locale_str.as_deref(),
              text_pattern.as_deref(),
              code.as_deref(),
              limit_val,
            ],
            |row| {
              Ok(RawSummary {
                case:    RawCase::from_row(row)?,
                pathway: row.get(6)?,
              })
            },
          )?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawSummary::into_summary).collect()
  }

  async fn stats(&self) -> Result<CaseStats> {
    let (by_status, by_locale): (Vec<(String, i64)>, Vec<(String, i64)>) = self
      .conn
      .call(|conn| {
        let grouped = |column: &str| -> rusqlite::Result<Vec<(String, i64)>> {
          let mut stmt = conn.prepare(&format!(
            "SELECT {column}, COUNT(*) FROM cases GROUP BY {column} ORDER BY {column}"
          ))?;
          let rows = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
          Ok(rows)
        };
        Ok((grouped("status")?, grouped("locale")?))
      })
      .await?;

    let by_status: std::collections::BTreeMap<String, u64> = by_status
      .into_iter()
      .map(|(k, n)| (k, n.max(0) as u64))
      .collect();
    let by_locale = by_locale
      .into_iter()
      .map(|(k, n)| (k, n.max(0) as u64))
      .collect();

    Ok(CaseStats {
      total: by_status.values().sum(),
      by_status,
      by_locale,
    })
  }
}
