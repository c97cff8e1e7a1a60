//! Handlers for `/cases` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/cases` | Body: `{"locale":"fr"}` (optional) |
//! | `GET`  | `/cases/{id}` | Case, ordered answers and decision |
//! | `PUT`  | `/cases/{id}/answers` | Body: `{"answers":{…}}`, replaces all |

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use waymark_core::{
  answers::{Answer, Answers},
  case::{Case, Locale},
  decision::RecordedDecision,
  flow,
  store::CaseStore,
};

use crate::{AppState, error::ApiError};

// ─── Create ──────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct CreateBody {
  pub locale: Option<String>,
}

/// `POST /cases`
pub async fn create<S>(
  State(state): State<AppState<S>>,
  body: Option<Json<CreateBody>>,
) -> Result<impl IntoResponse, ApiError>
where
  S: CaseStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let body = body.map(|Json(b)| b).unwrap_or_default();
  let locale = Locale::parse_or_default(body.locale.as_deref());

  let case = state
    .store
    .create_case(locale)
    .await
    .map_err(ApiError::store)?;

  tracing::info!(case_id = %case.case_id, %locale, "case created");
  Ok((StatusCode::CREATED, Json(case)))
}

// ─── Get one ─────────────────────────────────────────────────────────────────

/// Everything the recap view shows for one case.
#[derive(Debug, Serialize, Deserialize)]
pub struct CaseDetail {
  pub case:     Case,
  pub answers:  Vec<Answer>,
  pub decision: Option<RecordedDecision>,
}

/// `GET /cases/{id}`
pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<CaseDetail>, ApiError>
where
  S: CaseStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let case = state
    .store
    .get_case(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("case {id} not found")))?;

  let answers = state.store.get_answers(id).await.map_err(ApiError::store)?;
  let decision = state.store.get_decision(id).await.map_err(ApiError::store)?;

  Ok(Json(CaseDetail { case, answers, decision }))
}

// ─── Answers ─────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct AnswersBody {
  pub answers: Answers,
}

/// `PUT /cases/{id}/answers`
pub async fn put_answers<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
  Json(body): Json<AnswersBody>,
) -> Result<StatusCode, ApiError>
where
  S: CaseStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let rows = flow::ordered_answers(&body.answers);
  let count = rows.len();

  let found = state
    .store
    .replace_answers(id, rows)
    .await
    .map_err(ApiError::store)?;
  if !found {
    return Err(ApiError::NotFound(format!("case {id} not found")));
  }

  tracing::debug!(case_id = %id, count, "answers replaced");
  Ok(StatusCode::NO_CONTENT)
}
