//! `POST /cases/{id}/checkout`.
//!
//! Without a payment provider the only supported mode is fake payments:
//! the case is marked paid at once and gets an access code if it has none.

use axum::{
  Json,
  extract::{Path, State},
};
use uuid::Uuid;
use waymark_core::{
  case::{Case, CaseStatus},
  store::CaseStore,
};

use crate::{AppState, error::ApiError};

pub async fn handler<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Case>, ApiError>
where
  S: CaseStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  if !state.config.fake_payments {
    return Err(ApiError::PaymentsUnavailable);
  }

  let not_found = || ApiError::NotFound(format!("case {id} not found"));

  state
    .store
    .update_status(id, CaseStatus::Paid)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(not_found)?;

  let case = state
    .store
    .ensure_access_code(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(not_found)?;

  tracing::info!(case_id = %id, "checkout completed with fake payment");
  Ok(Json(case))
}
