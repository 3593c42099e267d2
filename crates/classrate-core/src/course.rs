//! A class offering that students review.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::review::Review;

/// A class as stored by the persistence collaborator.
///
/// `course_id` and `created_at` are assigned at creation and never change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
  pub course_id:  Uuid,
  pub name:       String,
  /// Teaching staff; absent when the submitter left it blank.
  pub instructor: Option<String>,
  pub created_at: DateTime<Utc>,
}

/// Input to [`CourseStore::add_course`](crate::store::CourseStore::add_course).
/// Build it through [`admission::validate_course`](crate::admission::validate_course).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCourse {
  pub name:       String,
  pub instructor: Option<String>,
}

/// A course bundled with every review submitted for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseWithReviews {
  pub course:  Course,
  pub reviews: Vec<Review>,
}
