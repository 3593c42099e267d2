//! Handler for `GET /me`: the caller's id and role.

use axum::{Json, extract::State};
use classrate_core::{
  Error,
  capability::{Role, role_of},
  store::CourseStore,
};
use serde::Serialize;

use crate::{AppState, error::ApiError, identity::MaybeIdentity};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeView {
  pub user_id: String,
  pub role:    Role,
}

/// `GET /me` — 401 for anonymous callers.
pub async fn handler<S>(
  State(state): State<AppState<S>>,
  identity: MaybeIdentity,
) -> Result<Json<MeView>, ApiError>
where
  S: CourseStore,
{
  let store = state.store()?;
  let identity = identity.0.ok_or(Error::Unauthenticated)?;
  let role = role_of(store, &identity.user_id).await?;
  Ok(Json(MeView { user_id: identity.user_id, role }))
}
