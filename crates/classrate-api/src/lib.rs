//! JSON and form HTTP API for classrate.
//!
//! Exposes an axum [`Router`] backed by any [`CourseStore`]. Authentication is
//! the caller's responsibility: an upstream proxy resolves the session and
//! forwards the user id in a header (see [`identity`]).
//!
//! # Mounting
//!
//! ```rust,ignore
//! .merge(classrate_api::api_router(state))
//! ```

pub mod admin;
pub mod courses;
pub mod error;
pub mod extract;
pub mod identity;
pub mod me;
pub mod reviews;
pub mod views;

use std::sync::Arc;

use axum::{
  Router,
  http::HeaderName,
  routing::{delete, get, post},
};
use classrate_core::{revalidate::Revalidate, store::CourseStore};

pub use error::ApiError;

/// Default header carrying the authenticated user id.
pub const DEFAULT_IDENTITY_HEADER: &str = "x-user-id";

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all handlers.
///
/// `store` is `None` when the server was started without a store configured;
/// every data endpoint then answers with [`ApiError::Configuration`].
pub struct AppState<S> {
  pub store:           Option<Arc<S>>,
  pub revalidator:     Arc<dyn Revalidate>,
  pub identity_header: HeaderName,
}

impl<S> Clone for AppState<S> {
  fn clone(&self) -> Self {
    Self {
      store:           self.store.clone(),
      revalidator:     self.revalidator.clone(),
      identity_header: self.identity_header.clone(),
    }
  }
}

impl<S> AppState<S> {
  pub fn new(store: Option<Arc<S>>, revalidator: Arc<dyn Revalidate>) -> Self {
    Self {
      store,
      revalidator,
      identity_header: HeaderName::from_static(DEFAULT_IDENTITY_HEADER),
    }
  }

  pub fn with_identity_header(mut self, header: HeaderName) -> Self {
    self.identity_header = header;
    self
  }

  /// The configured store, or a configuration error.
  pub fn store(&self) -> Result<&S, ApiError> {
    self.store.as_deref().ok_or(ApiError::Configuration)
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build a fully-materialised API router.
pub fn api_router<S>(state: AppState<S>) -> Router<()>
where
  S: CourseStore + 'static,
{
  Router::new()
    // Catalogue
    .route("/courses", get(courses::search::<S>).post(courses::create::<S>))
    .route("/courses/{id}", get(courses::detail::<S>))
    // Submissions
    .route("/reviews", post(reviews::create::<S>))
    // Caller
    .route("/me", get(me::handler::<S>))
    // Moderation
    .route("/admin/users", get(admin::users::<S>))
    .route("/admin/promote", post(admin::promote::<S>))
    .route("/admin/revoke", post(admin::revoke::<S>))
    .route("/admin/reviews", get(admin::reviews::<S>))
    .route("/admin/reviews/{id}", delete(admin::delete_review::<S>))
    .route("/admin/courses/{id}", delete(admin::delete_course::<S>))
    .route("/admin/stats", get(admin::stats::<S>))
    .with_state(state)
}

#[cfg(test)]
mod tests;
