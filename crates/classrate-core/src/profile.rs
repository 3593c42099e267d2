//! User profiles and the university e-mail policy.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Per-user record kept alongside the identity provider's own accounts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
  /// Opaque id issued by the identity provider.
  pub id:         String,
  pub email:      String,
  pub is_admin:   bool,
  pub created_at: DateTime<Utc>,
}

/// Input to [`CourseStore::add_profile`](crate::store::CourseStore::add_profile).
/// New profiles never start as admins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProfile {
  pub id:    String,
  pub email: String,
}

/// Scope an address to the university domain.
///
/// A bare username gets `@domain` appended. A full address must already be in
/// `domain` (compared case-insensitively).
pub fn normalize_email(input: &str, domain: &str) -> Result<String, ValidationError> {
  let input = input.trim();
  if input.is_empty() {
    return Err(ValidationError::EmptyEmail);
  }

  match input.split_once('@') {
    None => Ok(format!("{input}@{domain}")),
    Some((_, host)) if host.eq_ignore_ascii_case(domain) => Ok(input.to_owned()),
    Some(_) => Err(ValidationError::ForeignEmailDomain(domain.to_owned())),
  }
}
