//! Moderation and privilege management.
//!
//! Every public entry point that acts on behalf of a caller checks
//! [`require_admin`] first. [`collect_stats`] is the exception: it takes no
//! identity and is meant for operator tooling that already holds the store.

use serde::Serialize;
use uuid::Uuid;

use crate::{
  Error, Result, ValidationError,
  capability::{Identity, require_admin},
  profile::Profile,
  rating::{RatingSummary, summarize_ratings},
  revalidate::{Revalidate, RevalidateTarget},
  review::ReviewWithCourse,
  store::CourseStore,
};

// ─── Users ───────────────────────────────────────────────────────────────────

/// All profiles, newest first.
pub async fn list_users<S: CourseStore>(
  store: &S,
  identity: Option<&Identity>,
) -> Result<Vec<Profile>> {
  require_admin(store, identity).await?;
  store.list_profiles().await.map_err(Error::fetch)
}

pub async fn promote<S: CourseStore>(
  store: &S,
  identity: Option<&Identity>,
  user_id: Option<&str>,
) -> Result<Profile> {
  let admin = require_admin(store, identity).await?;
  let user_id = required_user_id(user_id)?;
  let profile = set_admin(store, user_id, true).await?;
  tracing::info!(by = %admin.id, user_id, "admin rights granted");
  Ok(profile)
}

/// Revoke admin rights. Admins cannot revoke themselves.
pub async fn revoke<S: CourseStore>(
  store: &S,
  identity: Option<&Identity>,
  user_id: Option<&str>,
) -> Result<Profile> {
  let admin = require_admin(store, identity).await?;
  let user_id = required_user_id(user_id)?;
  if user_id == admin.id {
    return Err(ValidationError::SelfRevocation.into());
  }
  let profile = set_admin(store, user_id, false).await?;
  tracing::info!(by = %admin.id, user_id, "admin rights revoked");
  Ok(profile)
}

fn required_user_id(user_id: Option<&str>) -> Result<&str> {
  user_id
    .map(str::trim)
    .filter(|id| !id.is_empty())
    .ok_or(Error::Validation(ValidationError::MissingUserId))
}

async fn set_admin<S: CourseStore>(store: &S, user_id: &str, is_admin: bool) -> Result<Profile> {
  store
    .set_admin(user_id, is_admin)
    .await
    .map_err(Error::write)?
    .ok_or_else(|| Error::ProfileNotFound(user_id.to_owned()))
}

// ─── Content ─────────────────────────────────────────────────────────────────

/// Every review with its course name, newest first.
pub async fn list_reviews<S: CourseStore>(
  store: &S,
  identity: Option<&Identity>,
) -> Result<Vec<ReviewWithCourse>> {
  require_admin(store, identity).await?;
  let courses = store
    .list_courses_with_reviews()
    .await
    .map_err(Error::fetch)?;

  let mut reviews: Vec<ReviewWithCourse> = courses
    .into_iter()
    .flat_map(|c| {
      let course_name = c.course.name;
      c.reviews.into_iter().map(move |review| ReviewWithCourse {
        review,
        course_name: course_name.clone(),
      })
    })
    .collect();
  reviews.sort_by(|a, b| b.review.created_at.cmp(&a.review.created_at));
  Ok(reviews)
}

pub async fn delete_review<S: CourseStore>(
  store: &S,
  revalidator: &dyn Revalidate,
  identity: Option<&Identity>,
  review_id: Uuid,
) -> Result<()> {
  let admin = require_admin(store, identity).await?;
  let review = store
    .delete_review(review_id)
    .await
    .map_err(Error::write)?
    .ok_or(Error::ReviewNotFound(review_id))?;

  tracing::info!(by = %admin.id, %review_id, "review deleted");
  revalidator.revalidate(RevalidateTarget::CourseDetail(review.course_id));
  revalidator.revalidate(RevalidateTarget::Layout);
  Ok(())
}

/// Delete a course together with its reviews.
pub async fn delete_course<S: CourseStore>(
  store: &S,
  revalidator: &dyn Revalidate,
  identity: Option<&Identity>,
  course_id: Uuid,
) -> Result<()> {
  let admin = require_admin(store, identity).await?;
  let existed = store.delete_course(course_id).await.map_err(Error::write)?;
  if !existed {
    return Err(Error::CourseNotFound(course_id));
  }

  tracing::info!(by = %admin.id, %course_id, "course deleted");
  revalidator.revalidate(RevalidateTarget::CourseDetail(course_id));
  revalidator.revalidate(RevalidateTarget::Layout);
  Ok(())
}

// ─── Statistics ──────────────────────────────────────────────────────────────

/// Site-wide counters for the admin dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SiteStats {
  pub total_users:   usize,
  pub admin_users:   usize,
  pub total_courses: usize,
  pub total_reviews: usize,
  /// Aggregate over every review on the site.
  pub rating:        RatingSummary,
}

pub async fn site_stats<S: CourseStore>(
  store: &S,
  identity: Option<&Identity>,
) -> Result<SiteStats> {
  require_admin(store, identity).await?;
  collect_stats(store).await
}

/// Compute [`SiteStats`] without a capability check.
pub async fn collect_stats<S: CourseStore>(store: &S) -> Result<SiteStats> {
  let profiles = store.list_profiles().await.map_err(Error::fetch)?;
  let courses = store
    .list_courses_with_reviews()
    .await
    .map_err(Error::fetch)?;

  let rating = summarize_ratings(
    courses
      .iter()
      .flat_map(|c| c.reviews.iter().map(|r| r.rating)),
  );

  Ok(SiteStats {
    total_users: profiles.len(),
    admin_users: profiles.iter().filter(|p| p.is_admin).count(),
    total_courses: courses.len(),
    total_reviews: rating.count,
    rating,
  })
}
