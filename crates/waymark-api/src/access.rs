//! `POST /access`: resume a case from its six-digit access code.
//!
//! Checks run in a fixed order: the caller's attempt is counted first, then
//! the code format is validated, and only a well-formed code reaches the
//! store.

use axum::{
  Json,
  extract::{State, rejection::JsonRejection},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use waymark_core::{access, store::CaseStore};

use crate::{AppState, client::ClientKey, error::ApiError};

#[derive(Debug, Deserialize)]
pub struct AccessBody {
  #[serde(default)]
  pub code: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AccessResponse {
  pub case_id: Uuid,
}

pub async fn handler<S>(
  State(state): State<AppState<S>>,
  ClientKey(client): ClientKey,
  body: Result<Json<AccessBody>, JsonRejection>,
) -> Result<Json<AccessResponse>, ApiError>
where
  S: CaseStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  if let Err(limited) = state.limiter.try_consume(&client) {
    tracing::warn!(%client, "access attempts exhausted");
    return Err(ApiError::RateLimited {
      retry_after: limited.retry_after_secs(),
    });
  }

  // A malformed body counts as an empty code.
  let raw = body.map(|Json(b)| b.code).unwrap_or_default();
  let code = access::parse_code(&raw).map_err(|_| ApiError::InvalidCode)?;

  let case = state
    .store
    .find_by_access_code(code)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound("no case for this code".into()))?;

  Ok(Json(AccessResponse { case_id: case.case_id }))
}
