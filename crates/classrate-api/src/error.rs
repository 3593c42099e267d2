//! API error type and [`axum::response::IntoResponse`] implementation.
//!
//! Every error body is `{"error": "<message>"}`. Upstream failures answer a
//! fixed message and log the cause; the review submission write is the one
//! path that reports the store's own message.

use axum::{
  Json,
  extract::rejection::{FormRejection, PathRejection},
  http::StatusCode,
  response::{IntoResponse, Response},
};
use classrate_core::Error as CoreError;
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  /// The server was started without a store.
  #[error("Server configuration error")]
  Configuration,

  /// A failed catalogue fetch on the search path.
  #[error("Failed to search classes")]
  Search(#[source] CoreError),

  /// A failed review submission. The upstream message is returned as-is.
  #[error("failed to save review: {0}")]
  ReviewWrite(#[source] CoreError),

  /// The request could not be decoded (form, JSON body, or path).
  #[error("{message}")]
  Rejected { status: StatusCode, message: String },

  #[error(transparent)]
  Core(#[from] CoreError),
}

impl ApiError {
  /// Classify an error from the review submission action.
  pub fn from_review_write(e: CoreError) -> Self {
    match e {
      CoreError::UpstreamWrite(_) => ApiError::ReviewWrite(e),
      other => ApiError::Core(other),
    }
  }

  fn status(&self) -> StatusCode {
    match self {
      ApiError::Configuration | ApiError::Search(_) | ApiError::ReviewWrite(_) => {
        StatusCode::INTERNAL_SERVER_ERROR
      }
      ApiError::Rejected { status, .. } => *status,
      ApiError::Core(e) => match e {
        CoreError::Validation(_) => StatusCode::BAD_REQUEST,
        CoreError::Unauthenticated => StatusCode::UNAUTHORIZED,
        CoreError::Forbidden => StatusCode::FORBIDDEN,
        CoreError::CourseNotFound(_)
        | CoreError::ReviewNotFound(_)
        | CoreError::ProfileNotFound(_) => StatusCode::NOT_FOUND,
        CoreError::UpstreamFetch(_) | CoreError::UpstreamWrite(_) => {
          StatusCode::INTERNAL_SERVER_ERROR
        }
      },
    }
  }

  fn message(&self) -> String {
    match self {
      ApiError::ReviewWrite(CoreError::UpstreamWrite(source)) => source.to_string(),
      ApiError::ReviewWrite(other) => other.to_string(),
      ApiError::Core(CoreError::UpstreamFetch(_)) => "Failed to load data".to_owned(),
      ApiError::Core(CoreError::UpstreamWrite(_)) => "Failed to save changes".to_owned(),
      other => other.to_string(),
    }
  }
}

impl From<FormRejection> for ApiError {
  fn from(rejection: FormRejection) -> Self {
    ApiError::Rejected { status: rejection.status(), message: rejection.body_text() }
  }
}

impl From<PathRejection> for ApiError {
  fn from(rejection: PathRejection) -> Self {
    ApiError::Rejected { status: rejection.status(), message: rejection.body_text() }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = self.status();
    if status.is_server_error() {
      match &self {
        ApiError::Search(source) => tracing::error!(error = %source, "search failed"),
        other => tracing::error!(error = %other, "request failed"),
      }
    }
    (status, Json(json!({ "error": self.message() }))).into_response()
  }
}
