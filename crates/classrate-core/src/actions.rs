//! User-facing operations: search, course detail, and the two submission
//! actions.
//!
//! Each function is one request's worth of work: validate, make the store
//! call, and notify the renderer after a successful write.

use serde::Serialize;
use uuid::Uuid;

use crate::{
  Error, Result,
  admission::{AdmissionError, CourseForm, ReviewForm, validate_course, validate_form},
  capability::Identity,
  course::Course,
  rating::{RatingSummary, summarize},
  revalidate::{Revalidate, RevalidateTarget},
  review::Review,
  search::{CourseResult, search},
  store::CourseStore,
};

impl From<AdmissionError> for Error {
  fn from(e: AdmissionError) -> Self {
    match e {
      AdmissionError::Validation(v) => Error::Validation(v),
      AdmissionError::Unauthenticated => Error::Unauthenticated,
    }
  }
}

// ─── Reads ───────────────────────────────────────────────────────────────────

/// Fetch the catalogue and run [`search`] over it.
///
/// A failed fetch is an [`Error::UpstreamFetch`], never an empty result.
pub async fn search_courses<S: CourseStore>(
  store: &S,
  query: &str,
) -> Result<Vec<CourseResult>> {
  let courses = store
    .list_courses_with_reviews()
    .await
    .map_err(Error::fetch)?;
  Ok(search(&courses, query))
}

/// Everything the course detail page shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CourseDetail {
  pub course:  Course,
  pub summary: RatingSummary,
  /// Newest first.
  pub reviews: Vec<Review>,
}

pub async fn course_detail<S: CourseStore>(store: &S, id: Uuid) -> Result<CourseDetail> {
  let course = store
    .get_course(id)
    .await
    .map_err(Error::fetch)?
    .ok_or(Error::CourseNotFound(id))?;

  let mut reviews = store.list_reviews(id).await.map_err(Error::fetch)?;
  reviews.sort_by(|a, b| b.created_at.cmp(&a.created_at));

  Ok(CourseDetail { summary: summarize(&reviews), course, reviews })
}

// ─── Writes ──────────────────────────────────────────────────────────────────

/// The review submission action.
///
/// On success the course detail view and the site layout are each revalidated
/// exactly once. On any failure nothing is written and nothing is revalidated.
pub async fn add_review<S: CourseStore>(
  store: &S,
  revalidator: &dyn Revalidate,
  identity: Option<&Identity>,
  form: &ReviewForm,
) -> Result<Review> {
  let submission = validate_form(form, identity.map(|i| i.user_id.as_str()))?;

  let review = store.add_review(submission).await.map_err(|e| {
    tracing::error!(error = %e, "failed to add review");
    Error::write(e)
  })?;

  tracing::info!(
    review_id = %review.review_id,
    course_id = %review.course_id,
    "review added"
  );
  revalidator.revalidate(RevalidateTarget::CourseDetail(review.course_id));
  revalidator.revalidate(RevalidateTarget::Layout);
  Ok(review)
}

/// The "add a class" action. Requires an identity.
pub async fn add_course<S: CourseStore>(
  store: &S,
  revalidator: &dyn Revalidate,
  identity: Option<&Identity>,
  form: &CourseForm,
) -> Result<Course> {
  let input = validate_course(form)?;
  if identity.is_none() {
    return Err(Error::Unauthenticated);
  }

  let course = store.add_course(input).await.map_err(|e| {
    tracing::error!(error = %e, "failed to add course");
    Error::write(e)
  })?;

  tracing::info!(course_id = %course.course_id, name = %course.name, "course added");
  revalidator.revalidate(RevalidateTarget::Layout);
  Ok(course)
}
