//! `POST /cases/{id}/decision`: evaluate the stored answers and record the
//! outcome.

use axum::{
  Json,
  extract::{Path, State},
};
use uuid::Uuid;
use waymark_core::{
  answers::Answers,
  decision::RecordedDecision,
  rules,
  store::CaseStore,
};

use crate::{AppState, error::ApiError};

pub async fn evaluate<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<RecordedDecision>, ApiError>
where
  S: CaseStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let answers: Answers = state
    .store
    .get_answers(id)
    .await
    .map_err(ApiError::store)?
    .into_iter()
    .collect();

  let pathway = rules::select(&answers, &state.config.thresholds);

  let recorded = state
    .store
    .save_decision(id, pathway.into())
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("case {id} not found")))?;

  tracing::info!(case_id = %id, pathway = pathway.key(), "decision recorded");
  Ok(Json(recorded))
}
