//! Admission gate for user-submitted reviews and courses.
//!
//! Untyped form input goes in, a typed record ready for persistence (or a
//! tagged error) comes out. Nothing reaches the store without passing here.

use serde::Deserialize;
use thiserror::Error;
use uuid::Uuid;

use crate::{course::NewCourse, error::ValidationError};

// ─── Forms ───────────────────────────────────────────────────────────────────

/// Raw fields of the review submission form. Every field is optional at the
/// wire; [`validate_submission`] decides what is required.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReviewForm {
  pub class_id: Option<String>,
  pub body:     Option<String>,
  pub rating:   Option<String>,
}

/// Raw fields of the "add a class" form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CourseForm {
  pub name:    Option<String>,
  pub teacher: Option<String>,
}

// ─── Results ─────────────────────────────────────────────────────────────────

/// A review that passed admission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedSubmission {
  pub course_id: Uuid,
  pub body:      String,
  /// `None` when the form carried no rating at all.
  pub rating:    Option<i32>,
  pub author_id: String,
}

/// Why a review was turned away.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AdmissionError {
  #[error(transparent)]
  Validation(#[from] ValidationError),

  #[error("login required")]
  Unauthenticated,
}

// ─── Review admission ────────────────────────────────────────────────────────

/// Validate a review submission.
///
/// Checks run in a fixed order and stop at the first failure: course
/// reference, body, author, rating.
pub fn validate_submission(
  course_id: Option<&str>,
  body: Option<&str>,
  rating: Option<&str>,
  author_id: Option<&str>,
) -> Result<ValidatedSubmission, AdmissionError> {
  let course_id = course_id
    .map(str::trim)
    .filter(|s| !s.is_empty())
    .and_then(|s| Uuid::parse_str(s).ok())
    .ok_or(ValidationError::MissingCourseReference)?;

  let body = body
    .filter(|b| !b.trim().is_empty())
    .ok_or(ValidationError::EmptyBody)?;

  let author_id = author_id
    .filter(|a| !a.trim().is_empty())
    .ok_or(AdmissionError::Unauthenticated)?;

  let rating = parse_rating(rating)?;

  Ok(ValidatedSubmission {
    course_id,
    body: body.to_owned(),
    rating,
    author_id: author_id.to_owned(),
  })
}

/// Convenience wrapper over [`validate_submission`] for a decoded form.
pub fn validate_form(
  form: &ReviewForm,
  author_id: Option<&str>,
) -> Result<ValidatedSubmission, AdmissionError> {
  validate_submission(
    form.class_id.as_deref(),
    form.body.as_deref(),
    form.rating.as_deref(),
    author_id,
  )
}

/// An absent or blank field means "no rating"; anything else must be an
/// integer in `1..=5`.
fn parse_rating(raw: Option<&str>) -> Result<Option<i32>, ValidationError> {
  let Some(text) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
    return Ok(None);
  };
  match text.parse::<i32>() {
    Ok(value) if (1..=5).contains(&value) => Ok(Some(value)),
    _ => Err(ValidationError::InvalidRating(text.to_owned())),
  }
}

// ─── Course admission ────────────────────────────────────────────────────────

/// Validate the "add a class" form. A blank teacher is stored as absent.
pub fn validate_course(form: &CourseForm) -> Result<NewCourse, ValidationError> {
  let name = form
    .name
    .as_deref()
    .map(str::trim)
    .filter(|n| !n.is_empty())
    .ok_or(ValidationError::EmptyCourseName)?;

  let instructor = form
    .teacher
    .as_deref()
    .map(str::trim)
    .filter(|t| !t.is_empty())
    .map(str::to_owned);

  Ok(NewCourse { name: name.to_owned(), instructor })
}
