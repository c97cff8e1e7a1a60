//! Admin token extractor and standalone verifier.

use argon2::{Argon2, PasswordHash, PasswordVerifier};
use axum::{
  extract::FromRequestParts,
  http::{HeaderMap, request::Parts},
};
use waymark_core::store::CaseStore;

use crate::{AppState, error::ApiError};

/// Header carrying the admin token.
pub const ADMIN_TOKEN_HEADER: &str = "x-admin-token";

/// Admin credentials accepted by this server instance.
#[derive(Clone, Default)]
pub struct AdminAuth {
  /// PHC string produced by argon2, e.g. `$argon2id$v=19$…`. With no hash
  /// configured every admin request is refused.
  pub token_hash: Option<String>,
}

/// Zero-size marker: present in the handler means the caller is an admin.
pub struct Admin;

/// Verify the admin token directly from headers.
pub fn verify_admin(headers: &HeaderMap, auth: &AdminAuth) -> Result<(), ApiError> {
  let hash = auth.token_hash.as_deref().ok_or(ApiError::Unauthorized)?;

  let token = headers
    .get(ADMIN_TOKEN_HEADER)
    .and_then(|v| v.to_str().ok())
    .filter(|t| !t.is_empty())
    .ok_or(ApiError::Unauthorized)?;

  let parsed_hash = PasswordHash::new(hash).map_err(|_| ApiError::Unauthorized)?;

  Argon2::default()
    .verify_password(token.as_bytes(), &parsed_hash)
    .map_err(|_| ApiError::Unauthorized)
}

impl<S> FromRequestParts<AppState<S>> for Admin
where
  S: CaseStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S>,
  ) -> Result<Self, Self::Rejection> {
    if let Err(e) = verify_admin(&parts.headers, &state.admin) {
      tracing::warn!(path = %parts.uri.path(), "rejected admin request");
      return Err(e);
    }
    Ok(Admin)
  }
}
