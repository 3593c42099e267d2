//! Error types for `classrate-core`.

use thiserror::Error;
use uuid::Uuid;

/// Boxed error produced by a [`CourseStore`](crate::store::CourseStore)
/// backend.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Caller input that cannot be accepted as-is. Never retried automatically.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
  // The course reference and body checks share one message on purpose: the
  // submission form reports both as "nothing to post".
  #[error("review content is required")]
  MissingCourseReference,

  #[error("review content is required")]
  EmptyBody,

  #[error("rating must be a whole number from 1 to 5, got {0:?}")]
  InvalidRating(String),

  #[error("class name is required")]
  EmptyCourseName,

  #[error("email is required")]
  EmptyEmail,

  #[error("email address must belong to @{0}")]
  ForeignEmailDomain(String),

  #[error("userId is required")]
  MissingUserId,

  #[error("admins cannot revoke their own rights")]
  SelfRevocation,
}

#[derive(Debug, Error)]
pub enum Error {
  #[error(transparent)]
  Validation(#[from] ValidationError),

  #[error("login required")]
  Unauthenticated,

  #[error("admin rights required")]
  Forbidden,

  #[error("course not found: {0}")]
  CourseNotFound(Uuid),

  #[error("review not found: {0}")]
  ReviewNotFound(Uuid),

  #[error("profile not found: {0}")]
  ProfileNotFound(String),

  /// Reading from the persistence collaborator failed.
  #[error("upstream fetch failed: {0}")]
  UpstreamFetch(#[source] BoxError),

  /// Writing to the persistence collaborator failed.
  #[error("upstream write failed: {0}")]
  UpstreamWrite(#[source] BoxError),
}

impl Error {
  pub fn fetch<E>(e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::UpstreamFetch(Box::new(e))
  }

  pub fn write<E>(e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::UpstreamWrite(Box::new(e))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
