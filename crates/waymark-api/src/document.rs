//! `GET /cases/{id}/document`: the PDF report for a paid case.

use axum::{
  body::Body,
  extract::{Path, State},
  http::{StatusCode, header},
  response::Response,
};
use uuid::Uuid;
use waymark_core::store::CaseStore;
use waymark_report::{CaseDocument, ReportText};

use crate::{AppState, error::ApiError, etag::compute_etag};

pub async fn handler<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
) -> Result<Response, ApiError>
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
  let decision = state
    .store
    .get_decision(id)
    .await
    .map_err(ApiError::store)?
    .map(|r| r.decision);

  let etag = compute_etag(
    &case,
    decision.as_ref().map(|d| d.pathway.as_str()),
    &answers,
  );
  let text = ReportText::for_locale(case.locale);
  let doc = CaseDocument { case, decision, answers };

  let pdf = waymark_report::render(&doc, &text).map_err(|e| match e {
    waymark_report::Error::NotPaid(_) => ApiError::Forbidden(e.to_string()),
  })?;

  tracing::info!(case_id = %id, bytes = pdf.len(), "document rendered");

  Response::builder()
    .status(StatusCode::OK)
    .header(header::CONTENT_TYPE, "application/pdf")
    .header(
      header::CONTENT_DISPOSITION,
      format!("attachment; filename=\"case-{id}.pdf\""),
    )
    .header(header::CACHE_CONTROL, "no-store")
    .header(header::ETAG, etag)
    .header(header::CONTENT_LENGTH, pdf.len())
    .body(Body::from(pdf))
    .map_err(|e| ApiError::Internal(e.to_string()))
}
