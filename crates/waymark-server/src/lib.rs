//! Server assembly for Waymark: configuration, state and the top-level
//! router. The binary in `main.rs` only parses flags and serves.

use std::{
  path::{Path, PathBuf},
  sync::Arc,
  time::Duration,
};

use axum::Router;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use tower_http::trace::TraceLayer;
use waymark_api::{AdminAuth, ApiConfig, AppState, RateLimiter, api_router};
use waymark_core::{rules::Thresholds, store::CaseStore};

/// Prefix for environment overrides, e.g. `WAYMARK_PORT=9000` or
/// `WAYMARK_RATE_LIMIT__MAX_ATTEMPTS=10`.
pub const ENV_PREFIX: &str = "WAYMARK";

// ─── Configuration ───────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
  pub host:             String,
  pub port:             u16,
  pub store_path:       PathBuf,
  /// Argon2 PHC string for the admin token. Unset disables admin routes.
  pub admin_token_hash: Option<String>,
  pub fake_payments:    bool,
  pub rate_limit:       RateLimitConfig,
  pub rules:            Thresholds,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:             "127.0.0.1".to_string(),
      port:             8080,
      store_path:       PathBuf::from("waymark.db"),
      admin_token_hash: None,
      fake_payments:    false,
      rate_limit:       RateLimitConfig::default(),
      rules:            Thresholds::default(),
    }
  }
}

/// Access-code attempts allowed per caller per window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RateLimitConfig {
  pub max_attempts: u32,
  pub window_secs:  u64,
}

impl Default for RateLimitConfig {
  fn default() -> Self { Self { max_attempts: 5, window_secs: 600 } }
}

impl ServerConfig {
  /// Read `path` (optional) and apply `WAYMARK_*` overrides on top.
  pub fn load(path: &Path) -> Result<Self, ConfigError> {
    Config::builder()
      .add_source(File::from(path).required(false))
      .add_source(
        Environment::with_prefix(ENV_PREFIX)
          .prefix_separator("_")
          .separator("__")
          .try_parsing(true),
      )
      .build()?
      .try_deserialize()
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }

  pub fn api_config(&self) -> ApiConfig {
    ApiConfig {
      fake_payments: self.fake_payments,
      thresholds:    self.rules.clone(),
    }
  }
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

// ─── Assembly ────────────────────────────────────────────────────────────────

/// Build the shared handler state from configuration.
pub fn build_state<S: CaseStore>(cfg: &ServerConfig, store: S) -> AppState<S> {
  let mut state = AppState::new(store, cfg.api_config());
  state.limiter = Arc::new(RateLimiter::new(
    cfg.rate_limit.max_attempts,
    Duration::from_secs(cfg.rate_limit.window_secs),
  ));
  state.admin = Arc::new(AdminAuth {
    token_hash: cfg.admin_token_hash.clone(),
  });
  state
}

/// The complete application: the API under `/api`, with request tracing.
pub fn app<S>(state: AppState<S>) -> Router
where
  S: CaseStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  Router::new()
    .nest("/api", api_router(state))
    .layer(TraceLayer::new_for_http())
}
