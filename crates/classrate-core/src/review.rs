//! A single rating/comment submission for one course.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
  pub review_id:  Uuid,
  pub course_id:  Uuid,
  pub body:       String,
  /// `1..=5` when written through admission. Rows written by other tools
  /// may hold anything; see [`rating::summarize`](crate::rating::summarize)
  /// for how `0` is treated.
  pub rating:     Option<i32>,
  pub author_id:  String,
  pub created_at: DateTime<Utc>,
}

/// A review together with the name of the course it belongs to, for the
/// moderation listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewWithCourse {
  pub review:      Review,
  pub course_name: String,
}
