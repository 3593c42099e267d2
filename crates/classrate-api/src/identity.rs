//! Caller identity extraction.
//!
//! The header named by [`AppState::identity_header`] carries the user id
//! resolved by the upstream auth proxy. A missing or blank header means an
//! anonymous caller; rejecting anonymous callers is left to each operation.

use std::convert::Infallible;

use axum::{extract::FromRequestParts, http::request::Parts};
use classrate_core::capability::Identity;

use crate::AppState;

/// The caller's identity, if any.
#[derive(Debug, Clone, Default)]
pub struct MaybeIdentity(pub Option<Identity>);

impl MaybeIdentity {
  pub fn identity(&self) -> Option<&Identity> {
    self.0.as_ref()
  }
}

impl<S> FromRequestParts<AppState<S>> for MaybeIdentity
where
  S: Send + Sync,
{
  type Rejection = Infallible;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S>,
  ) -> Result<Self, Self::Rejection> {
    let identity = parts
      .headers
      .get(&state.identity_header)
      .and_then(|v| v.to_str().ok())
      .map(str::trim)
      .filter(|id| !id.is_empty())
      .map(Identity::new);
    Ok(Self(identity))
  }
}
