//! Operator commands run directly against the store.
//!
//! These bypass the capability check: whoever can run the binary against the
//! database file already owns the data.

use std::fmt::Write as _;

use classrate_core::{
  Error as CoreError,
  admin::SiteStats,
  profile::{NewProfile, Profile, normalize_email},
  store::{ClearedCounts, CourseStore},
};

use crate::error::{Error, Result};

/// Result of a privilege change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
  Applied(Profile),
  /// The profile was already in the requested state.
  Unchanged(Profile),
}

// ─── Users ────────────────────────────────────────────────────────────────────

/// Register a profile. A bare username gets `@domain` appended.
pub async fn add_user<S: CourseStore>(
  store: &S,
  id: &str,
  email_or_username: &str,
  domain: &str,
) -> Result<Profile> {
  let email = normalize_email(email_or_username, domain).map_err(CoreError::from)?;
  let profile = store
    .add_profile(NewProfile { id: id.trim().to_owned(), email })
    .await
    .map_err(CoreError::write)?;
  tracing::info!(id = %profile.id, email = %profile.email, "profile registered");
  Ok(profile)
}

/// Grant or revoke admin rights by e-mail. Accepts the same bare-username
/// form as [`add_user`].
pub async fn set_admin_by_email<S: CourseStore>(
  store: &S,
  email_or_username: &str,
  domain: &str,
  is_admin: bool,
) -> Result<Change> {
  let email = normalize_email(email_or_username, domain).map_err(CoreError::from)?;
  let profile = store
    .find_profile_by_email(&email)
    .await
    .map_err(CoreError::fetch)?
    .ok_or_else(|| CoreError::ProfileNotFound(email.clone()))?;

  if profile.is_admin == is_admin {
    return Ok(Change::Unchanged(profile));
  }

  let updated = store
    .set_admin(&profile.id, is_admin)
    .await
    .map_err(CoreError::write)?
    .ok_or_else(|| CoreError::ProfileNotFound(email.clone()))?;
  tracing::info!(%email, is_admin, "admin flag changed");
  Ok(Change::Applied(updated))
}

pub fn render_users(profiles: &[Profile]) -> String {
  if profiles.is_empty() {
    return "no users found\n".to_owned();
  }

  let mut out = String::new();
  for (i, p) in profiles.iter().enumerate() {
    let badge = if p.is_admin { "admin" } else { "user " };
    let _ = writeln!(
      out,
      "{:>3}. {badge} | {} ({}) [{}]",
      i + 1,
      p.email,
      p.created_at.format("%Y-%m-%d"),
      p.id,
    );
  }
  out
}

// ─── Catalogue ────────────────────────────────────────────────────────────────

/// Delete every review, then every course. Refuses unless `force` is set.
pub async fn clear_data<S: CourseStore>(store: &S, force: bool) -> Result<ClearedCounts> {
  if !force {
    return Err(Error::ForceRequired);
  }
  Ok(store.clear_catalog().await.map_err(CoreError::write)?)
}

pub fn render_stats(stats: &SiteStats) -> String {
  let mut out = String::new();
  let _ = writeln!(out, "users:          {}", stats.total_users);
  let _ = writeln!(out, "admins:         {}", stats.admin_users);
  let _ = writeln!(out, "classes:        {}", stats.total_courses);
  let _ = writeln!(out, "reviews:        {}", stats.total_reviews);
  let _ = writeln!(
    out,
    "average rating: {}",
    stats.rating.display_average().as_deref().unwrap_or("-")
  );
  out
}
