//! Handlers for `/admin` endpoints. Every handler requires [`Admin`].
//!
//! | Method  | Path | Notes |
//! |---------|------|-------|
//! | `GET`   | `/admin/cases` | `?status&locale&q&code`, newest first |
//! | `GET`   | `/admin/export` | `?status&locale`, CSV attachment |
//! | `GET`   | `/admin/stats` | Counts by status and locale |
//! | `PATCH` | `/admin/cases/{id}/status` | Body: `{"status":"closed"}` |
//! | `POST`  | `/admin/cases/{id}/mark-paid` | |
//! | `POST`  | `/admin/cases/{id}/access-code` | Always issues a new code |

use axum::{
  Json,
  body::Body,
  extract::{Path, Query, State},
  http::{StatusCode, header},
  response::Response,
};
use chrono::SecondsFormat;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use waymark_core::{
  case::{Case, CaseStats, CaseStatus, CaseSummary, Locale},
  store::{CaseFilter, CaseStore, EXPORT_LIMIT, LIST_LIMIT},
};

use crate::{AppState, auth::Admin, error::ApiError};

// ─── Query parsing ───────────────────────────────────────────────────────────

/// Raw query parameters; blank values mean "no filter".
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
  pub status: Option<String>,
  pub locale: Option<String>,
  pub q:      Option<String>,
  pub code:   Option<String>,
}

fn non_blank(v: Option<&str>) -> Option<&str> {
  v.map(str::trim).filter(|s| !s.is_empty())
}

impl ListParams {
  fn into_filter(self, limit: usize) -> Result<CaseFilter, ApiError> {
    let status = non_blank(self.status.as_deref())
      .map(|s| s.parse::<CaseStatus>())
      .transpose()
      .map_err(|_| ApiError::BadRequest("unknown status".into()))?;
    let locale = non_blank(self.locale.as_deref())
      .map(|s| s.parse::<Locale>())
      .transpose()
      .map_err(|_| ApiError::BadRequest("unknown locale".into()))?;

    Ok(CaseFilter {
      status,
      locale,
      text: non_blank(self.q.as_deref()).map(str::to_owned),
      access_code: non_blank(self.code.as_deref()).map(str::to_owned),
      limit: Some(limit),
    })
  }
}

// ─── List ────────────────────────────────────────────────────────────────────

/// `GET /admin/cases`
pub async fn list<S>(
  _: Admin,
  State(state): State<AppState<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<CaseSummary>>, ApiError>
where
  S: CaseStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let filter = params.into_filter(LIST_LIMIT)?;
  let cases = state
    .store
    .list_cases(&filter)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(cases))
}

// ─── Export ──────────────────────────────────────────────────────────────────

const CSV_HEADER: [&str; 7] = [
  "id",
  "status",
  "locale",
  "created_at",
  "updated_at",
  "access_code",
  "pathway",
];

/// Serialise summaries as CSV with every field quoted.
pub fn to_csv(rows: &[CaseSummary]) -> Result<Vec<u8>, ApiError> {
  let csv_err = |e: csv::Error| ApiError::Internal(format!("csv: {e}"));

  let mut writer = csv::WriterBuilder::new()
    .quote_style(csv::QuoteStyle::Always)
    .from_writer(Vec::new());

  writer.write_record(CSV_HEADER).map_err(csv_err)?;
  for row in rows {
    writer
      .write_record([
        row.case_id.to_string(),
        row.status.to_string(),
        row.locale.to_string(),
        row.created_at.to_rfc3339_opts(SecondsFormat::Millis, true),
        row.updated_at.to_rfc3339_opts(SecondsFormat::Millis, true),
        row.access_code.clone().unwrap_or_default(),
        row.pathway.clone().unwrap_or_default(),
      ])
      .map_err(csv_err)?;
  }

  writer
    .into_inner()
    .map_err(|e| ApiError::Internal(format!("csv: {e}")))
}

/// `GET /admin/export`
pub async fn export<S>(
  _: Admin,
  State(state): State<AppState<S>>,
  Query(params): Query<ListParams>,
) -> Result<Response, ApiError>
where
  S: CaseStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  // Only status and locale narrow the export.
  let params = ListParams { q: None, code: None, ..params };
  let filter = params.into_filter(EXPORT_LIMIT)?;
  let rows = state
    .store
    .list_cases(&filter)
    .await
    .map_err(ApiError::store)?;

  let body = to_csv(&rows)?;
  tracing::info!(rows = rows.len(), "cases exported");

  Response::builder()
    .status(StatusCode::OK)
    .header(header::CONTENT_TYPE, "text/csv; charset=utf-8")
    .header(
      header::CONTENT_DISPOSITION,
      "attachment; filename=\"cases-export.csv\"",
    )
    .header(header::CACHE_CONTROL, "no-store")
    .body(Body::from(body))
    .map_err(|e| ApiError::Internal(e.to_string()))
}

// ─── Stats ───────────────────────────────────────────────────────────────────

/// `GET /admin/stats`
pub async fn stats<S>(
  _: Admin,
  State(state): State<AppState<S>>,
) -> Result<Json<CaseStats>, ApiError>
where
  S: CaseStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let stats = state.store.stats().await.map_err(ApiError::store)?;
  Ok(Json(stats))
}

// ─── Mutations ───────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct StatusBody {
  pub status: CaseStatus,
}

/// `PATCH /admin/cases/{id}/status`: any transition is allowed.
pub async fn set_status<S>(
  _: Admin,
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
  Json(body): Json<StatusBody>,
) -> Result<Json<Case>, ApiError>
where
  S: CaseStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let case = state
    .store
    .update_status(id, body.status)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("case {id} not found")))?;

  tracing::info!(case_id = %id, status = %case.status, "status set by admin");
  Ok(Json(case))
}

/// `POST /admin/cases/{id}/mark-paid`
pub async fn mark_paid<S>(
  _: Admin,
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Case>, ApiError>
where
  S: CaseStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let case = state
    .store
    .update_status(id, CaseStatus::Paid)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("case {id} not found")))?;

  tracing::info!(case_id = %id, "marked paid by admin");
  Ok(Json(case))
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CodeResponse {
  pub case_id: Uuid,
  pub code:    String,
}

/// `POST /admin/cases/{id}/access-code`
pub async fn regenerate_code<S>(
  _: Admin,
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<CodeResponse>, ApiError>
where
  S: CaseStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let case = state
    .store
    .regenerate_access_code(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("case {id} not found")))?;

  let code = case
    .access_code
    .ok_or_else(|| ApiError::Internal("access code not assigned".into()))?;

  tracing::info!(case_id = %id, "access code regenerated by admin");
  Ok(Json(CodeResponse { case_id: id, code }))
}
