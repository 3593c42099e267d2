//! Handlers for `/courses` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/courses` | Optional `?q=<text>`; open to anonymous callers |
//! | `POST` | `/courses` | Form: `name`, `teacher`; requires identity |
//! | `GET`  | `/courses/{id}` | 404 if not found |

use axum::{
  Json,
  extract::{Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use classrate_core::{actions, admission::CourseForm, store::CourseStore};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
  AppState,
  error::ApiError,
  extract::{ApiForm, ApiPath},
  identity::MaybeIdentity,
  views::{CourseDetailView, CourseListing, CourseView, Listing},
};

// ─── Search ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, Default)]
pub struct SearchParams {
  pub q: Option<String>,
}

/// `GET /courses[?q=<text>]`
pub async fn search<S>(
  State(state): State<AppState<S>>,
  Query(params): Query<SearchParams>,
) -> Result<Json<Listing<CourseListing>>, ApiError>
where
  S: CourseStore,
{
  let store = state.store()?;
  let results = actions::search_courses(store, params.q.as_deref().unwrap_or_default())
    .await
    .map_err(ApiError::Search)?;
  Ok(Json(Listing::new(results.into_iter().map(Into::into).collect())))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /courses` — form: `name=...&teacher=...`
pub async fn create<S>(
  State(state): State<AppState<S>>,
  identity: MaybeIdentity,
  ApiForm(form): ApiForm<CourseForm>,
) -> Result<impl IntoResponse, ApiError>
where
  S: CourseStore,
{
  let store = state.store()?;
  let course =
    actions::add_course(store, state.revalidator.as_ref(), identity.identity(), &form).await?;
  Ok((StatusCode::CREATED, Json(CourseView::from(course))))
}

// ─── Detail ───────────────────────────────────────────────────────────────────

/// `GET /courses/{id}`
pub async fn detail<S>(
  State(state): State<AppState<S>>,
  ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<CourseDetailView>, ApiError>
where
  S: CourseStore,
{
  let store = state.store()?;
  let detail = actions::course_detail(store, id).await?;
  Ok(Json(detail.into()))
}
