//! Wire representations.
//!
//! Field names follow the public JSON contract (`teacher`, `avgRating`,
//! `reviewCount`, `class_id`) rather than the domain names.

use chrono::{DateTime, Utc};
use classrate_core::{
  actions::CourseDetail,
  admin::SiteStats,
  course::Course,
  rating::RatingSummary,
  review::{Review, ReviewWithCourse},
  search::CourseResult,
};
use serde::Serialize;
use uuid::Uuid;

/// A course with its aggregated rating.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CourseListing {
  pub id:           Uuid,
  pub name:         String,
  pub teacher:      Option<String>,
  pub created_at:   DateTime<Utc>,
  /// One-decimal string, e.g. `"4.0"`.
  #[serde(rename = "avgRating")]
  pub avg_rating:   Option<String>,
  #[serde(rename = "reviewCount")]
  pub review_count: usize,
}

impl CourseListing {
  pub fn new(course: Course, summary: &RatingSummary) -> Self {
    Self {
      id:           course.course_id,
      name:         course.name,
      teacher:      course.instructor,
      created_at:   course.created_at,
      avg_rating:   summary.display_average(),
      review_count: summary.count,
    }
  }
}

impl From<CourseResult> for CourseListing {
  fn from(r: CourseResult) -> Self {
    Self::new(r.course, &r.summary)
  }
}

/// A bare course, as returned from creation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CourseView {
  pub id:         Uuid,
  pub name:       String,
  pub teacher:    Option<String>,
  pub created_at: DateTime<Utc>,
}

impl From<Course> for CourseView {
  fn from(c: Course) -> Self {
    Self {
      id:         c.course_id,
      name:       c.name,
      teacher:    c.instructor,
      created_at: c.created_at,
    }
  }
}

/// `{"data": [...], "count": N}`
#[derive(Debug, Clone, Serialize)]
pub struct Listing<T> {
  pub data:  Vec<T>,
  pub count: usize,
}

impl<T> Listing<T> {
  pub fn new(data: Vec<T>) -> Self {
    Self { count: data.len(), data }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReviewView {
  pub id:         Uuid,
  pub class_id:   Uuid,
  pub body:       String,
  pub rating:     Option<i32>,
  pub user_id:    String,
  pub created_at: DateTime<Utc>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub class_name: Option<String>,
}

impl From<Review> for ReviewView {
  fn from(r: Review) -> Self {
    Self {
      id:         r.review_id,
      class_id:   r.course_id,
      body:       r.body,
      rating:     r.rating,
      user_id:    r.author_id,
      created_at: r.created_at,
      class_name: None,
    }
  }
}

impl From<ReviewWithCourse> for ReviewView {
  fn from(r: ReviewWithCourse) -> Self {
    Self { class_name: Some(r.course_name), ..r.review.into() }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CourseDetailView {
  pub class:   CourseListing,
  pub reviews: Vec<ReviewView>,
}

impl From<CourseDetail> for CourseDetailView {
  fn from(d: CourseDetail) -> Self {
    Self {
      class:   CourseListing::new(d.course, &d.summary),
      reviews: d.reviews.into_iter().map(Into::into).collect(),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsView {
  pub total_users:   usize,
  pub admin_users:   usize,
  pub total_classes: usize,
  pub total_reviews: usize,
  pub avg_rating:    Option<String>,
}

impl From<SiteStats> for StatsView {
  fn from(s: SiteStats) -> Self {
    Self {
      total_users:   s.total_users,
      admin_users:   s.admin_users,
      total_classes: s.total_courses,
      total_reviews: s.total_reviews,
      avg_rating:    s.rating.display_average(),
    }
  }
}

/// `{"success": true}`
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Success {
  pub success: bool,
}

impl Success {
  pub const OK: Self = Self { success: true };
}
