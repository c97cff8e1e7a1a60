//! Caller identity used as the rate-limit key.

use std::{convert::Infallible, net::SocketAddr};

use axum::{
  extract::{ConnectInfo, FromRequestParts},
  http::{HeaderMap, request::Parts},
};

/// Best-effort caller identity: the first `X-Forwarded-For` entry, then
/// `X-Real-IP`, then the socket peer, then `"unknown"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientKey(pub String);

fn header<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
  headers
    .get(name)
    .and_then(|v| v.to_str().ok())
    .map(str::trim)
    .filter(|v| !v.is_empty())
}

pub fn client_key(headers: &HeaderMap, peer: Option<SocketAddr>) -> String {
  let forwarded = header(headers, "x-forwarded-for")
    .and_then(|v| v.split(',').next())
    .map(str::trim)
    .filter(|v| !v.is_empty());

  forwarded
    .or_else(|| header(headers, "x-real-ip"))
    .map(str::to_owned)
    .or_else(|| peer.map(|p| p.ip().to_string()))
    .unwrap_or_else(|| "unknown".to_owned())
}

impl<S> FromRequestParts<S> for ClientKey
where
  S: Send + Sync,
{
  type Rejection = Infallible;

  async fn from_request_parts(
    parts: &mut Parts,
    _state: &S,
  ) -> Result<Self, Self::Rejection> {
    let peer = parts
      .extensions
      .get::<ConnectInfo<SocketAddr>>()
      .map(|ConnectInfo(addr)| *addr);
    Ok(ClientKey(client_key(&parts.headers, peer)))
  }
}
