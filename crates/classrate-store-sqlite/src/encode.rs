//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as fixed-width RFC 3339 strings (microsecond
//! precision, `Z` suffix) so that `ORDER BY created_at` sorts chronologically.
//! UUIDs are stored as hyphenated lowercase strings.

use chrono::{DateTime, SecondsFormat, Utc};
use classrate_core::{course::Course, profile::Profile, review::Review};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ────────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

/// The current time, truncated to what [`encode_dt`] keeps, so that a value
/// returned from a write compares equal to the same row read back later.
pub fn now() -> DateTime<Utc> {
  let now = Utc::now();
  decode_dt(&encode_dt(now)).unwrap_or(now)
}

// ─── Row types ───────────────────────────────────────────────────────────────

pub const COURSE_COLUMNS: &str = "course_id, name, instructor, created_at";
pub const REVIEW_COLUMNS: &str = "review_id, course_id, body, rating, author_id, created_at";
pub const PROFILE_COLUMNS: &str = "id, email, is_admin, created_at";

/// Raw values read directly from a `courses` row.
pub struct RawCourse {
  pub course_id:  String,
  pub name:       String,
  pub instructor: Option<String>,
  pub created_at: String,
}

impl RawCourse {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      course_id:  row.get(0)?,
      name:       row.get(1)?,
      instructor: row.get(2)?,
      created_at: row.get(3)?,
    })
  }

  pub fn into_course(self) -> Result<Course> {
    Ok(Course {
      course_id:  decode_uuid(&self.course_id)?,
      name:       self.name,
      instructor: self.instructor,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

/// Raw values read directly from a `reviews` row.
pub struct RawReview {
  pub review_id:  String,
  pub course_id:  String,
  pub body:       String,
  pub rating:     Option<i32>,
  pub author_id:  String,
  pub created_at: String,
}

impl RawReview {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      review_id:  row.get(0)?,
      course_id:  row.get(1)?,
      body:       row.get(2)?,
      rating:     row.get(3)?,
      author_id:  row.get(4)?,
      created_at: row.get(5)?,
    })
  }

  pub fn into_review(self) -> Result<Review> {
    Ok(Review {
      review_id:  decode_uuid(&self.review_id)?,
      course_id:  decode_uuid(&self.course_id)?,
      body:       self.body,
      rating:     self.rating,
      author_id:  self.author_id,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

/// Raw values read directly from a `profiles` row.
pub struct RawProfile {
  pub id:         String,
  pub email:      String,
  pub is_admin:   bool,
  pub created_at: String,
}

impl RawProfile {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:         row.get(0)?,
      email:      row.get(1)?,
      is_admin:   row.get(2)?,
      created_at: row.get(3)?,
    })
  }

  pub fn into_profile(self) -> Result<Profile> {
    Ok(Profile {
      id:         self.id,
      email:      self.email,
      is_admin:   self.is_admin,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}
