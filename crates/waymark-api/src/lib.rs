//! JSON HTTP API for Waymark.
//!
//! Exposes an axum [`Router`] backed by any [`waymark_core::store::CaseStore`]:
//! the public intake routes, the access-code gateway and the admin routes.
//! TLS and transport concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", waymark_api::api_router(state))
//! ```

pub mod access;
pub mod admin;
pub mod auth;
pub mod cases;
pub mod checkout;
pub mod client;
pub mod decision;
pub mod document;
pub mod error;
pub mod etag;
pub mod flow;
pub mod ratelimit;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, patch, post, put},
};
use waymark_core::{rules::Thresholds, store::CaseStore};

pub use auth::AdminAuth;
pub use error::ApiError;
pub use ratelimit::RateLimiter;

// ─── Application state ───────────────────────────────────────────────────────

/// Behaviour switches for the API.
#[derive(Debug, Clone, Default)]
pub struct ApiConfig {
  /// Mark cases paid on checkout without a payment provider.
  pub fake_payments: bool,
  pub thresholds:    Thresholds,
}

/// Shared state threaded through all axum handlers.
#[derive(Clone)]
pub struct AppState<S: CaseStore> {
  pub store:   Arc<S>,
  pub config:  Arc<ApiConfig>,
  pub limiter: Arc<RateLimiter>,
  pub admin:   Arc<AdminAuth>,
}

impl<S: CaseStore> AppState<S> {
  /// State with a default limiter and no admin access.
  pub fn new(store: S, config: ApiConfig) -> Self {
    Self {
      store:   Arc::new(store),
      config:  Arc::new(config),
      limiter: Arc::new(RateLimiter::default()),
      admin:   Arc::new(AdminAuth::default()),
    }
  }
}

// ─── Router ──────────────────────────────────────────────────────────────────

/// Build a fully-materialised API router for `state`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(state: AppState<S>) -> Router<()>
where
  S: CaseStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  Router::new()
    // Intake
    .route("/cases", post(cases::create::<S>))
    .route("/cases/{id}", get(cases::get_one::<S>))
    .route("/cases/{id}/answers", put(cases::put_answers::<S>))
    .route("/cases/{id}/decision", post(decision::evaluate::<S>))
    .route("/cases/{id}/checkout", post(checkout::handler::<S>))
    .route("/cases/{id}/document", get(document::handler::<S>))
    .route("/flow/next", post(flow::next))
    .route("/access", post(access::handler::<S>))
    // Admin
    .route("/admin/cases", get(admin::list::<S>))
    .route("/admin/export", get(admin::export::<S>))
    .route("/admin/stats", get(admin::stats::<S>))
    .route("/admin/cases/{id}/status", patch(admin::set_status::<S>))
    .route("/admin/cases/{id}/mark-paid", post(admin::mark_paid::<S>))
    .route("/admin/cases/{id}/access-code", post(admin::regenerate_code::<S>))
    .with_state(state)
}

#[cfg(test)]
mod tests;
