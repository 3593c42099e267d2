//! Handler for `POST /reviews`, the review submission action.

use axum::{extract::State, http::StatusCode};
use classrate_core::{actions, admission::ReviewForm, store::CourseStore};

use crate::{AppState, error::ApiError, extract::ApiForm, identity::MaybeIdentity};

/// `POST /reviews` — form: `class_id=...&body=...&rating=...`
///
/// 204 on success. Admission failures are 400, an anonymous caller is 401.
/// A failed write reports the store's message.
pub async fn create<S>(
  State(state): State<AppState<S>>,
  identity: MaybeIdentity,
  ApiForm(form): ApiForm<ReviewForm>,
) -> Result<StatusCode, ApiError>
where
  S: CourseStore,
{
  let store = state.store()?;
  actions::add_review(store, state.revalidator.as_ref(), identity.identity(), &form)
    .await
    .map_err(ApiError::from_review_write)?;
  Ok(StatusCode::NO_CONTENT)
}
