//! Identity and the one place that decides who is an administrator.

use serde::{Deserialize, Serialize};

use crate::{Error, Result, profile::Profile, store::CourseStore};

/// The caller, as resolved by the identity provider in front of this service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
  pub user_id: String,
}

impl Identity {
  pub fn new(user_id: impl Into<String>) -> Self {
    Self { user_id: user_id.into() }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
  Student,
  Admin,
}

impl Role {
  fn of(profile: Option<&Profile>) -> Self {
    match profile {
      Some(p) if p.is_admin => Role::Admin,
      _ => Role::Student,
    }
  }
}

/// Look up the role of `user_id`. Users without a profile are students.
pub async fn role_of<S: CourseStore>(store: &S, user_id: &str) -> Result<Role> {
  let profile = store.get_profile(user_id).await.map_err(Error::fetch)?;
  Ok(Role::of(profile.as_ref()))
}

/// Require `identity` to be an administrator and return their profile.
///
/// - no identity → [`Error::Unauthenticated`]
/// - not an admin (or no profile) → [`Error::Forbidden`]
pub async fn require_admin<S: CourseStore>(
  store: &S,
  identity: Option<&Identity>,
) -> Result<Profile> {
  let identity = identity.ok_or(Error::Unauthenticated)?;
  let profile = store
    .get_profile(&identity.user_id)
    .await
    .map_err(Error::fetch)?;

  match profile {
    Some(p) if Role::of(Some(&p)) == Role::Admin => Ok(p),
    _ => {
      tracing::warn!(user_id = %identity.user_id, "admin capability denied");
      Err(Error::Forbidden)
    }
  }
}
