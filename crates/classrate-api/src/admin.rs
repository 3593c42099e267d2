//! Handlers for `/admin` endpoints. Every route requires admin capability.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/admin/users` | Profiles, newest first |
//! | `POST`   | `/admin/promote` | Body: `{"userId":"..."}` |
//! | `POST`   | `/admin/revoke` | Body: `{"userId":"..."}`; not yourself |
//! | `GET`    | `/admin/reviews` | All reviews with course names |
//! | `DELETE` | `/admin/reviews/{id}` | |
//! | `DELETE` | `/admin/courses/{id}` | Removes the course's reviews too |
//! | `GET`    | `/admin/stats` | |

use axum::{
  Json,
  extract::{State, rejection::JsonRejection},
};
use classrate_core::{admin, profile::Profile, store::CourseStore};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
  AppState,
  error::ApiError,
  extract::ApiPath,
  identity::MaybeIdentity,
  views::{Listing, ReviewView, StatsView, Success},
};

// ─── Users ────────────────────────────────────────────────────────────────────

/// `GET /admin/users`
pub async fn users<S>(
  State(state): State<AppState<S>>,
  identity: MaybeIdentity,
) -> Result<Json<Listing<Profile>>, ApiError>
where
  S: CourseStore,
{
  let profiles = admin::list_users(state.store()?, identity.identity()).await?;
  Ok(Json(Listing::new(profiles)))
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct UserIdBody {
  pub user_id: Option<String>,
}

/// The `userId` of a body that may be absent or malformed. Either case is
/// "missing", reported after the capability check.
fn user_id(body: Result<Json<UserIdBody>, JsonRejection>) -> Option<String> {
  body.ok().and_then(|Json(b)| b.user_id)
}

/// `POST /admin/promote`
pub async fn promote<S>(
  State(state): State<AppState<S>>,
  identity: MaybeIdentity,
  body: Result<Json<UserIdBody>, JsonRejection>,
) -> Result<Json<Success>, ApiError>
where
  S: CourseStore,
{
  admin::promote(state.store()?, identity.identity(), user_id(body).as_deref()).await?;
  Ok(Json(Success::OK))
}

/// `POST /admin/revoke`
pub async fn revoke<S>(
  State(state): State<AppState<S>>,
  identity: MaybeIdentity,
  body: Result<Json<UserIdBody>, JsonRejection>,
) -> Result<Json<Success>, ApiError>
where
  S: CourseStore,
{
  admin::revoke(state.store()?, identity.identity(), user_id(body).as_deref()).await?;
  Ok(Json(Success::OK))
}

// ─── Content ──────────────────────────────────────────────────────────────────

/// `GET /admin/reviews`
pub async fn reviews<S>(
  State(state): State<AppState<S>>,
  identity: MaybeIdentity,
) -> Result<Json<Listing<ReviewView>>, ApiError>
where
  S: CourseStore,
{
  let reviews = admin::list_reviews(state.store()?, identity.identity()).await?;
  Ok(Json(Listing::new(reviews.into_iter().map(Into::into).collect())))
}

/// `DELETE /admin/reviews/{id}`
pub async fn delete_review<S>(
  State(state): State<AppState<S>>,
  identity: MaybeIdentity,
  ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<Success>, ApiError>
where
  S: CourseStore,
{
  let store = state.store()?;
  admin::delete_review(store, state.revalidator.as_ref(), identity.identity(), id).await?;
  Ok(Json(Success::OK))
}

/// `DELETE /admin/courses/{id}`
pub async fn delete_course<S>(
  State(state): State<AppState<S>>,
  identity: MaybeIdentity,
  ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<Success>, ApiError>
where
  S: CourseStore,
{
  let store = state.store()?;
  admin::delete_course(store, state.revalidator.as_ref(), identity.identity(), id).await?;
  Ok(Json(Success::OK))
}

// ─── Stats ────────────────────────────────────────────────────────────────────

/// `GET /admin/stats`
pub async fn stats<S>(
  State(state): State<AppState<S>>,
  identity: MaybeIdentity,
) -> Result<Json<StatsView>, ApiError>
where
  S: CourseStore,
{
  let stats = admin::site_stats(state.store()?, identity.identity()).await?;
  Ok(Json(stats.into()))
}
