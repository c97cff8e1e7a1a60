//! Async HTTP client wrapping the Waymark admin API.

use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use reqwest::{Client, RequestBuilder, Response};
use serde::Deserialize;
use uuid::Uuid;
use waymark_core::case::{Case, CaseStats, CaseStatus, CaseSummary};

const ADMIN_TOKEN_HEADER: &str = "x-admin-token";

/// Connection settings for the Waymark API.
#[derive(Debug, Clone)]
pub struct ApiConfig {
  pub base_url:    String,
  pub admin_token: String,
}

/// Query filters accepted by the list and export routes.
#[derive(Debug, Clone, Default)]
pub struct ListQuery {
  pub status: Option<String>,
  pub locale: Option<String>,
  pub text:   Option<String>,
  pub code:   Option<String>,
}

impl ListQuery {
  fn pairs(&self) -> Vec<(&'static str, &str)> {
    [
      ("status", &self.status),
      ("locale", &self.locale),
      ("q", &self.text),
      ("code", &self.code),
    ]
    .into_iter()
    .filter_map(|(k, v)| v.as_deref().map(|v| (k, v)))
    .collect()
  }
}

#[derive(Debug, Deserialize)]
pub struct IssuedCode {
  pub case_id: Uuid,
  pub code:    String,
}

/// Async HTTP client for the admin routes.
#[derive(Clone)]
pub struct ApiClient {
  client: Client,
  config: ApiConfig,
}

impl ApiClient {
  pub fn new(config: ApiConfig) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(30))
      .build()
      .context("failed to build HTTP client")?;
    Ok(Self { client, config })
  }

  fn url(&self, path: &str) -> String {
    format!(
      "{}/api{}",
      self.config.base_url.trim_end_matches('/'),
      path
    )
  }

  fn auth(&self, req: RequestBuilder) -> RequestBuilder {
    req.header(ADMIN_TOKEN_HEADER, &self.config.admin_token)
  }

  async fn send(&self, req: RequestBuilder, what: &str) -> Result<Response> {
    let resp = self
      .auth(req)
      .send()
      .await
      .with_context(|| format!("{what} failed"))?;

    let status = resp.status();
    if status.is_success() {
      return Ok(resp);
    }

    tracing::debug!(%status, what, "request rejected");
    let message = resp
      .json::<serde_json::Value>()
      .await
      .ok()
      .and_then(|v| v["error"].as_str().map(str::to_owned))
      .unwrap_or_default();
    Err(anyhow!("{what} → {status} {message}"))
  }

  // ── Reads ─────────────────────────────────────────────────────────────────

  /// `GET /api/admin/cases`
  pub async fn list_cases(&self, query: &ListQuery) -> Result<Vec<CaseSummary>> {
    let req = self.client.get(self.url("/admin/cases")).query(&query.pairs());
    self
      .send(req, "GET /admin/cases")
      .await?
      .json()
      .await
      .context("deserialising cases")
  }

  /// `GET /api/admin/export`, returned as raw CSV text.
  pub async fn export(&self, query: &ListQuery) -> Result<String> {
    let narrowed = ListQuery { text: None, code: None, ..query.clone() };
    let req = self
      .client
      .get(self.url("/admin/export"))
      .query(&narrowed.pairs());
    self
      .send(req, "GET /admin/export")
      .await?
      .text()
      .await
      .context("reading export")
  }

  /// `GET /api/admin/stats`
  pub async fn stats(&self) -> Result<CaseStats> {
    let req = self.client.get(self.url("/admin/stats"));
    self
      .send(req, "GET /admin/stats")
      .await?
      .json()
      .await
      .context("deserialising stats")
  }

  // ── Mutations ─────────────────────────────────────────────────────────────

  /// `PATCH /api/admin/cases/{id}/status`
  pub async fn set_status(&self, id: Uuid, status: CaseStatus) -> Result<Case> {
    let req = self
      .client
      .patch(self.url(&format!("/admin/cases/{id}/status")))
      .json(&serde_json::json!({ "status": status }));
    self
      .send(req, "PATCH /admin/cases/{id}/status")
      .await?
      .json()
      .await
      .context("deserialising case")
  }

  /// `POST /api/admin/cases/{id}/mark-paid`
  pub async fn mark_paid(&self, id: Uuid) -> Result<Case> {
    let req = self
      .client
      .post(self.url(&format!("/admin/cases/{id}/mark-paid")));
    self
      .send(req, "POST /admin/cases/{id}/mark-paid")
      .await?
      .json()
      .await
      .context("deserialising case")
  }

  /// `POST /api/admin/cases/{id}/access-code`
  pub async fn regenerate_code(&self, id: Uuid) -> Result<IssuedCode> {
    let req = self
      .client
      .post(self.url(&format!("/admin/cases/{id}/access-code")));
    self
      .send(req, "POST /admin/cases/{id}/access-code")
      .await?
      .json()
      .await
      .context("deserialising access code")
  }
}
