//! Router-level tests against an in-memory SQLite store.

use std::sync::{
  Arc,
  atomic::{AtomicUsize, Ordering},
};

use argon2::{Argon2, PasswordHasher, password_hash::SaltString};
use axum::{
  body::Body,
  http::{Request, StatusCode, header},
  response::Response,
};
use rand_core::OsRng;
use serde_json::{Value, json};
use tower::ServiceExt;
use uuid::Uuid;
use waymark_core::{
  answers::Answer,
  case::{Case, CaseStats, CaseStatus, CaseSummary, Locale},
  decision::{Decision, RecordedDecision},
  store::{CaseFilter, CaseStore},
};
use waymark_store_sqlite::SqliteStore;

use crate::{AdminAuth, ApiConfig, AppState, api_router, auth::ADMIN_TOKEN_HEADER};

const TOKEN: &str = "let-me-in";

async fn make_state(fake_payments: bool) -> AppState<SqliteStore> {
  let store = SqliteStore::open_in_memory().await.unwrap();
  let salt  = SaltString::generate(&mut OsRng);
  let hash  = Argon2::default()
    .hash_password(TOKEN.as_bytes(), &salt)
    .unwrap()
    .to_string();

  let mut state = AppState::new(store, ApiConfig {
    fake_payments,
    ..Default::default()
  });
  state.admin = Arc::new(AdminAuth { token_hash: Some(hash) });
  state
}

async fn send<S>(
  state:   &AppState<S>,
  method:  &str,
  uri:     &str,
  headers: &[(&str, &str)],
  body:    Option<Value>,
) -> Response
where
  S: CaseStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let mut builder = Request::builder().method(method).uri(uri);
  for (k, v) in headers {
    builder = builder.header(*k, *v);
  }
  let body = match body {
    Some(v) => {
      builder = builder.header(header::CONTENT_TYPE, "application/json");
      Body::from(v.to_string())
    }
    None => Body::empty(),
  };
  api_router(state.clone())
    .oneshot(builder.body(body).unwrap())
    .await
    .unwrap()
}

async fn bytes(resp: Response) -> Vec<u8> {
  axum::body::to_bytes(resp.into_body(), usize::MAX)
    .await
    .unwrap()
    .to_vec()
}

async fn json_body(resp: Response) -> Value {
  serde_json::from_slice(&bytes(resp).await).unwrap()
}

async fn create_case(state: &AppState<SqliteStore>, locale: &str) -> String {
  let resp = send(state, "POST", "/cases", &[], Some(json!({ "locale": locale }))).await;
  assert_eq!(resp.status(), StatusCode::CREATED);
  json_body(resp).await["case_id"].as_str().unwrap().to_owned()
}

async fn checkout(state: &AppState<SqliteStore>, id: &str) -> Value {
  let resp = send(state, "POST", &format!("/cases/{id}/checkout"), &[], None).await;
  assert_eq!(resp.status(), StatusCode::OK);
  json_body(resp).await
}

// ── Cases ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_then_get_case() {
  let state = make_state(false).await;
  let id    = create_case(&state, "en").await;

  let resp = send(&state, "GET", &format!("/cases/{id}"), &[], None).await;
  assert_eq!(resp.status(), StatusCode::OK);
  let detail = json_body(resp).await;
  assert_eq!(detail["case"]["locale"], "en");
  assert_eq!(detail["case"]["status"], "draft");
  assert!(detail["case"]["access_code"].is_null());
  assert_eq!(detail["answers"], json!([]));
  assert!(detail["decision"].is_null());
}

#[tokio::test]
async fn create_without_body_defaults_to_french() {
  let state = make_state(false).await;
  let resp  = send(&state, "POST", "/cases", &[], None).await;
  assert_eq!(resp.status(), StatusCode::CREATED);
  assert_eq!(json_body(resp).await["locale"], "fr");
}

#[tokio::test]
async fn unknown_case_is_404() {
  let state = make_state(false).await;
  let uri   = format!("/cases/{}", uuid::Uuid::new_v4());
  let resp  = send(&state, "GET", &uri, &[], None).await;
  assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  assert!(json_body(resp).await["error"].is_string());
}

#[tokio::test]
async fn answers_come_back_in_flow_order() {
  let state = make_state(false).await;
  let id    = create_case(&state, "fr").await;

  let answers = json!({
    "answers": {
      "work_has_offer": "yes",
      "has_children": "no",
      "situation": "travail",
      "years_in_france": "6"
    }
  });
  let resp = send(&state, "PUT", &format!("/cases/{id}/answers"), &[], Some(answers)).await;
  assert_eq!(resp.status(), StatusCode::NO_CONTENT);

  let detail = json_body(send(&state, "GET", &format!("/cases/{id}"), &[], None).await).await;
  let ids: Vec<&str> = detail["answers"]
    .as_array()
    .unwrap()
    .iter()
    .map(|a| a["question_id"].as_str().unwrap())
    .collect();
  assert_eq!(ids, ["situation", "years_in_france", "has_children", "work_has_offer"]);
}

#[tokio::test]
async fn answers_for_unknown_case_are_404() {
  let state = make_state(false).await;
  let uri   = format!("/cases/{}/answers", uuid::Uuid::new_v4());
  let resp  = send(&state, "PUT", &uri, &[], Some(json!({ "answers": {} }))).await;
  assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// ── Flow and decision ────────────────────────────────────────────────────────

#[tokio::test]
async fn flow_starts_with_situation_and_ends_with_null() {
  let state = make_state(false).await;

  let resp = send(&state, "POST", "/flow/next", &[], Some(json!({ "locale": "en" }))).await;
  assert_eq!(resp.status(), StatusCode::OK);
  let body = json_body(resp).await;
  assert_eq!(body["question"]["id"], "situation");
  assert_eq!(body["question"]["options"].as_array().unwrap().len(), 3);

  let done = json!({
    "answers": { "situation": "vpf", "years_in_france": "7", "has_children": "yes" }
  });
  let body = json_body(send(&state, "POST", "/flow/next", &[], Some(done)).await).await;
  assert!(body["question"].is_null());
}

#[tokio::test]
async fn decision_is_evaluated_and_recorded() {
  let state = make_state(false).await;
  let id    = create_case(&state, "en").await;

  let answers = json!({
    "answers": {
      "situation": "travail",
      "years_in_france": "4",
      "has_children": "no",
      "work_has_offer": "yes",
      "work_tension_guess": "yes"
    }
  });
  send(&state, "PUT", &format!("/cases/{id}/answers"), &[], Some(answers)).await;

  let resp = send(&state, "POST", &format!("/cases/{id}/decision"), &[], None).await;
  assert_eq!(resp.status(), StatusCode::OK);
  let decision = json_body(resp).await;
  assert_eq!(
    decision["pathway"],
    "Employment: reinforced regularisation through work"
  );
  assert!(!decision["citations"].as_array().unwrap().is_empty());

  let detail = json_body(send(&state, "GET", &format!("/cases/{id}"), &[], None).await).await;
  assert_eq!(detail["decision"]["pathway"], decision["pathway"]);
}

#[tokio::test]
async fn decision_without_answers_is_incomplete() {
  let state = make_state(false).await;
  let id    = create_case(&state, "fr").await;

  let resp = send(&state, "POST", &format!("/cases/{id}/decision"), &[], None).await;
  assert_eq!(
    json_body(resp).await["pathway"],
    "General orientation: incomplete answers"
  );
}

// ── Checkout ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn checkout_without_fake_payments_is_501() {
  let state = make_state(false).await;
  let id    = create_case(&state, "fr").await;
  let resp  = send(&state, "POST", &format!("/cases/{id}/checkout"), &[], None).await;
  assert_eq!(resp.status(), StatusCode::NOT_IMPLEMENTED);
}

#[tokio::test]
async fn fake_checkout_marks_paid_and_issues_code() {
  let state = make_state(true).await;
  let id    = create_case(&state, "fr").await;

  let case = checkout(&state, &id).await;
  assert_eq!(case["status"], "paid");
  let code = case["access_code"].as_str().unwrap().to_owned();
  assert_eq!(code.len(), 6);

  // A second checkout keeps the code.
  let again = checkout(&state, &id).await;
  assert_eq!(again["access_code"], code.as_str());
}

// ── Access gateway ───────────────────────────────────────────────────────────

async fn access<S>(state: &AppState<S>, client: &str, code: &str) -> Response
where
  S: CaseStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  send(
    state,
    "POST",
    "/access",
    &[("x-forwarded-for", client)],
    Some(json!({ "code": code })),
  )
  .await
}

#[tokio::test]
async fn access_validates_then_looks_up() {
  let state = make_state(true).await;
  let id    = create_case(&state, "fr").await;
  let code  = checkout(&state, &id).await["access_code"]
    .as_str()
    .unwrap()
    .to_owned();

  assert_eq!(access(&state, "203.0.113.1", "12a").await.status(), StatusCode::BAD_REQUEST);

  let unknown = if code == "999999" { "100000" } else { "999999" };
  assert_eq!(access(&state, "203.0.113.1", unknown).await.status(), StatusCode::NOT_FOUND);

  let resp = access(&state, "203.0.113.1", &format!(" {code} ")).await;
  assert_eq!(resp.status(), StatusCode::OK);
  assert_eq!(json_body(resp).await["case_id"], id.as_str());
}

/// Delegates to SQLite and counts access-code lookups.
#[derive(Clone)]
struct CountingStore {
  inner:   SqliteStore,
  lookups: Arc<AtomicUsize>,
}

impl CaseStore for CountingStore {
  type Error = waymark_store_sqlite::Error;

  async fn create_case(&self, locale: Locale) -> Result<Case, Self::Error> {
    self.inner.create_case(locale).await
  }

  async fn get_case(&self, id: Uuid) -> Result<Option<Case>, Self::Error> {
    self.inner.get_case(id).await
  }

  async fn update_status(
    &self,
    id: Uuid,
    status: CaseStatus,
  ) -> Result<Option<Case>, Self::Error> {
    self.inner.update_status(id, status).await
  }

  async fn regenerate_access_code(&self, id: Uuid) -> Result<Option<Case>, Self::Error> {
    self.inner.regenerate_access_code(id).await
  }

  async fn ensure_access_code(&self, id: Uuid) -> Result<Option<Case>, Self::Error> {
    self.inner.ensure_access_code(id).await
  }

  async fn find_by_access_code(&self, code: &str) -> Result<Option<Case>, Self::Error> {
    self.lookups.fetch_add(1, Ordering::SeqCst);
    self.inner.find_by_access_code(code).await
  }

  async fn replace_answers(
    &self,
    id: Uuid,
    answers: Vec<Answer>,
  ) -> Result<bool, Self::Error> {
    self.inner.replace_answers(id, answers).await
  }

  async fn get_answers(&self, id: Uuid) -> Result<Vec<Answer>, Self::Error> {
    self.inner.get_answers(id).await
  }

  async fn save_decision(
    &self,
    id: Uuid,
    decision: Decision,
  ) -> Result<Option<RecordedDecision>, Self::Error> {
    self.inner.save_decision(id, decision).await
  }

  async fn get_decision(&self, id: Uuid) -> Result<Option<RecordedDecision>, Self::Error> {
    self.inner.get_decision(id).await
  }

  async fn list_cases(&self, filter: &CaseFilter) -> Result<Vec<CaseSummary>, Self::Error> {
    self.inner.list_cases(filter).await
  }

  async fn stats(&self) -> Result<CaseStats, Self::Error> { self.inner.stats().await }
}

#[tokio::test]
async fn malformed_codes_never_reach_the_store() {
  let lookups = Arc::new(AtomicUsize::new(0));
  let store = CountingStore {
    inner:   SqliteStore::open_in_memory().await.unwrap(),
    lookups: lookups.clone(),
  };
  let state = AppState::new(store, ApiConfig::default());

  for bad in ["12345", "1234567", "12a456", ""] {
    let resp = access(&state, "203.0.113.9", bad).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{bad:?}");
  }
  assert_eq!(lookups.load(Ordering::SeqCst), 0);

  let resp = access(&state, "203.0.113.9", "123456").await;
  assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  assert_eq!(lookups.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn sixth_attempt_is_rate_limited_even_with_valid_code() {
  let state = make_state(true).await;
  let id    = create_case(&state, "fr").await;
  let code  = checkout(&state, &id).await["access_code"]
    .as_str()
    .unwrap()
    .to_owned();

  for _ in 0..5 {
    access(&state, "198.51.100.4", "000").await;
  }

  let resp = access(&state, "198.51.100.4", &code).await;
  assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);
  let retry: u64 = resp.headers()[header::RETRY_AFTER]
    .to_str()
    .unwrap()
    .parse()
    .unwrap();
  assert!(retry >= 1 && retry <= 600);

  // Other callers are unaffected.
  assert_eq!(access(&state, "198.51.100.5", &code).await.status(), StatusCode::OK);
}

#[tokio::test]
async fn malformed_access_body_counts_as_invalid_code() {
  let state = make_state(false).await;
  let req = Request::builder()
    .method("POST")
    .uri("/access")
    .header(header::CONTENT_TYPE, "application/json")
    .body(Body::from("{not json"))
    .unwrap();
  let resp = api_router(state).oneshot(req).await.unwrap();
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// ── Document ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn document_requires_payment() {
  let state = make_state(true).await;
  let id    = create_case(&state, "fr").await;
  let resp  = send(&state, "GET", &format!("/cases/{id}/document"), &[], None).await;
  assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn paid_case_downloads_pdf_with_etag() {
  let state = make_state(true).await;
  let id    = create_case(&state, "en").await;
  send(
    &state,
    "PUT",
    &format!("/cases/{id}/answers"),
    &[],
    Some(json!({ "answers": { "situation": "vpf", "years_in_france": "6" } })),
  )
  .await;
  send(&state, "POST", &format!("/cases/{id}/decision"), &[], None).await;
  checkout(&state, &id).await;

  let resp = send(&state, "GET", &format!("/cases/{id}/document"), &[], None).await;
  assert_eq!(resp.status(), StatusCode::OK);
  assert_eq!(resp.headers()[header::CONTENT_TYPE], "application/pdf");
  let disposition = resp.headers()[header::CONTENT_DISPOSITION].to_str().unwrap();
  assert!(disposition.contains(&format!("case-{id}.pdf")), "{disposition}");
  let etag = resp.headers()[header::ETAG].to_str().unwrap().to_owned();
  assert!(etag.starts_with('"'));

  let pdf = bytes(resp).await;
  assert!(pdf.starts_with(b"%PDF-1.4"));

  let again = send(&state, "GET", &format!("/cases/{id}/document"), &[], None).await;
  assert_eq!(again.headers()[header::ETAG], etag.as_str());
}

// ── Admin ────────────────────────────────────────────────────────────────────

fn admin() -> [(&'static str, &'static str); 1] { [(ADMIN_TOKEN_HEADER, TOKEN)] }

#[tokio::test]
async fn admin_routes_require_token() {
  let state = make_state(false).await;

  let resp = send(&state, "GET", "/admin/cases", &[], None).await;
  assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

  let resp = send(&state, "GET", "/admin/stats", &[(ADMIN_TOKEN_HEADER, "nope")], None).await;
  assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

  let resp = send(&state, "GET", "/admin/stats", &admin(), None).await;
  assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn admin_is_closed_without_configured_hash() {
  let store = SqliteStore::open_in_memory().await.unwrap();
  let state = AppState::new(store, ApiConfig::default());
  let resp  = send(&state, "GET", "/admin/cases", &admin(), None).await;
  assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn admin_list_filters_by_status() {
  let state = make_state(true).await;
  let paid  = create_case(&state, "fr").await;
  create_case(&state, "en").await;
  checkout(&state, &paid).await;

  let resp = send(&state, "GET", "/admin/cases?status=paid", &admin(), None).await;
  assert_eq!(resp.status(), StatusCode::OK);
  let rows = json_body(resp).await;
  let rows = rows.as_array().unwrap();
  assert_eq!(rows.len(), 1);
  assert_eq!(rows[0]["case_id"], paid.as_str());

  let all = json_body(send(&state, "GET", "/admin/cases?status=", &admin(), None).await).await;
  assert_eq!(all.as_array().unwrap().len(), 2);

  let resp = send(&state, "GET", "/admin/cases?status=refunded", &admin(), None).await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn admin_export_is_quoted_csv() {
  let state = make_state(false).await;
  let id    = create_case(&state, "ar").await;

  let resp = send(&state, "GET", "/admin/export?locale=ar", &admin(), None).await;
  assert_eq!(resp.status(), StatusCode::OK);
  assert_eq!(resp.headers()[header::CONTENT_TYPE], "text/csv; charset=utf-8");
  assert!(
    resp.headers()[header::CONTENT_DISPOSITION]
      .to_str()
      .unwrap()
      .contains("cases-export.csv")
  );

  let csv = String::from_utf8(bytes(resp).await).unwrap();
  let lines: Vec<&str> = csv.lines().collect();
  assert_eq!(lines.len(), 2);
  assert!(lines[0].starts_with("\"id\",\"status\""));
  assert!(lines[1].starts_with(&format!("\"{id}\",\"draft\",\"ar\"")));
}

#[tokio::test]
async fn admin_stats_count_cases() {
  let state = make_state(true).await;
  let a     = create_case(&state, "fr").await;
  create_case(&state, "fr").await;
  create_case(&state, "en").await;
  checkout(&state, &a).await;

  let stats = json_body(send(&state, "GET", "/admin/stats", &admin(), None).await).await;
  assert_eq!(stats["total"], 3);
  assert_eq!(stats["by_status"]["draft"], 2);
  assert_eq!(stats["by_status"]["paid"], 1);
  assert_eq!(stats["by_locale"]["fr"], 2);
  assert_eq!(stats["by_locale"]["en"], 1);
}

#[tokio::test]
async fn admin_mutations() {
  let state = make_state(false).await;
  let id    = create_case(&state, "fr").await;

  let resp = send(&state, "POST", &format!("/admin/cases/{id}/mark-paid"), &admin(), None).await;
  assert_eq!(resp.status(), StatusCode::OK);
  assert_eq!(json_body(resp).await["status"], "paid");

  let resp = send(
    &state,
    "PATCH",
    &format!("/admin/cases/{id}/status"),
    &admin(),
    Some(json!({ "status": "closed" })),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::OK);
  assert_eq!(json_body(resp).await["status"], "closed");

  let first = json_body(
    send(&state, "POST", &format!("/admin/cases/{id}/access-code"), &admin(), None).await,
  )
  .await;
  assert_eq!(first["case_id"], id.as_str());
  assert_eq!(first["code"].as_str().unwrap().len(), 6);

  let resp = send(&state, "POST", &format!("/admin/cases/{id}/access-code"), &admin(), None).await;
  let second = json_body(resp).await;
  assert_ne!(first["code"], second["code"]);

  let missing = format!("/admin/cases/{}/mark-paid", uuid::Uuid::new_v4());
  assert_eq!(
    send(&state, "POST", &missing, &admin(), None).await.status(),
    StatusCode::NOT_FOUND
  );
}
