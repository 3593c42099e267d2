//! The `CourseStore` trait: everything the core needs from the persistence
//! collaborator.
//!
//! The trait is implemented by storage backends (e.g.
//! `classrate-store-sqlite`). Higher layers (`classrate-api`, the maintenance
//! CLI) depend on this abstraction, not on any concrete backend. One store
//! value is constructed at process start and shared by reference.

use std::future::Future;

use uuid::Uuid;

use crate::{
  admission::ValidatedSubmission,
  course::{Course, CourseWithReviews, NewCourse},
  profile::{NewProfile, Profile},
  review::Review,
};

/// Row counts removed by [`CourseStore::clear_catalog`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClearedCounts {
  pub reviews: usize,
  pub courses: usize,
}

/// Abstraction over a classrate storage backend.
///
/// Every call is a single round trip; no method retries. All methods return
/// `Send` futures so the trait can be used in multi-threaded async runtimes
/// (e.g. tokio with `axum`).
pub trait CourseStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Courses ───────────────────────────────────────────────────────────

  /// Persist a new course. `course_id` and `created_at` are set by the store.
  fn add_course(
    &self,
    input: NewCourse,
  ) -> impl Future<Output = Result<Course, Self::Error>> + Send + '_;

  /// Retrieve a course by id. Returns `None` if not found.
  fn get_course(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Course>, Self::Error>> + Send + '_;

  /// Every course with all of its reviews attached. Order is unspecified.
  fn list_courses_with_reviews(
    &self,
  ) -> impl Future<Output = Result<Vec<CourseWithReviews>, Self::Error>> + Send + '_;

  /// Delete a course and its reviews. Returns `false` if it did not exist.
  fn delete_course(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Reviews ───────────────────────────────────────────────────────────

  /// Persist an admitted review. `review_id` and `created_at` are set by the
  /// store. Fails if the referenced course does not exist.
  fn add_review(
    &self,
    input: ValidatedSubmission,
  ) -> impl Future<Output = Result<Review, Self::Error>> + Send + '_;

  /// Reviews of one course, newest first.
  fn list_reviews(
    &self,
    course_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Review>, Self::Error>> + Send + '_;

  /// Delete a review, returning it. `None` if it did not exist.
  fn delete_review(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Review>, Self::Error>> + Send + '_;

  /// Delete every review, then every course.
  fn clear_catalog(
    &self,
  ) -> impl Future<Output = Result<ClearedCounts, Self::Error>> + Send + '_;

  // ── Profiles ──────────────────────────────────────────────────────────

  /// Register a profile. Fails if the id or e-mail is already taken.
  fn add_profile(
    &self,
    input: NewProfile,
  ) -> impl Future<Output = Result<Profile, Self::Error>> + Send + '_;

  fn get_profile<'a>(
    &'a self,
    user_id: &'a str,
  ) -> impl Future<Output = Result<Option<Profile>, Self::Error>> + Send + 'a;

  fn find_profile_by_email<'a>(
    &'a self,
    email: &'a str,
  ) -> impl Future<Output = Result<Option<Profile>, Self::Error>> + Send + 'a;

  /// All profiles, newest first.
  fn list_profiles(
    &self,
  ) -> impl Future<Output = Result<Vec<Profile>, Self::Error>> + Send + '_;

  /// Set the admin flag and return the updated profile, or `None` if no such
  /// profile exists.
  fn set_admin<'a>(
    &'a self,
    user_id: &'a str,
    is_admin: bool,
  ) -> impl Future<Output = Result<Option<Profile>, Self::Error>> + Send + 'a;
}
