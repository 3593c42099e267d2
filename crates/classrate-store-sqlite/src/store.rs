//! [`SqliteStore`], the SQLite implementation of [`CourseStore`].

use std::{collections::HashMap, path::Path};

use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use classrate_core::{
  admission::ValidatedSubmission,
  course::{Course, CourseWithReviews, NewCourse},
  profile::{NewProfile, Profile},
  review::Review,
  store::{ClearedCounts, CourseStore},
};

use crate::{
  Error, Result,
  encode::{
    COURSE_COLUMNS, PROFILE_COLUMNS, REVIEW_COLUMNS, RawCourse, RawProfile, RawReview,
    encode_dt, encode_uuid, now,
  },
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A classrate store backed by a single SQLite file.
///
/// Clones share the same underlying connection.
#[derive(Clone, Debug)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Insert a review row verbatim, bypassing admission.
  ///
  /// Mirrors what an operator or migration script can do directly against
  /// the database; used to exercise the aggregator's handling of stray
  /// values such as a `0` rating.
  #[cfg(test)]
  pub(crate) async fn insert_raw_review(&self, review: &Review) -> Result<()> {
    let review_id  = encode_uuid(review.review_id);
    let course_id  = encode_uuid(review.course_id);
    let body       = review.body.clone();
    let rating     = review.rating;
    let author_id  = review.author_id.clone();
    let created_at = encode_dt(review.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO reviews (review_id, course_id, body, rating, author_id, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![review_id, course_id, body, rating, author_id, created_at],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn profile_where(&self, column: &'static str, value: &str) -> Result<Option<Profile>> {
    let value = value.to_owned();

    let raw: Option<RawProfile> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {PROFILE_COLUMNS} FROM profiles WHERE {column} = ?1"),
            rusqlite::params![value],
            RawProfile::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawProfile::into_profile).transpose()
  }
}

// ─── CourseStore impl ────────────────────────────────────────────────────────

impl CourseStore for SqliteStore {
  type Error = Error;

  // ── Courses ───────────────────────────────────────────────────────────────

  async fn add_course(&self, input: NewCourse) -> Result<Course> {
    let course = Course {
      course_id:  Uuid::new_v4(),
      name:       input.name,
      instructor: input.instructor,
      created_at: now(),
    };

    let id_str     = encode_uuid(course.course_id);
    let name       = course.name.clone();
    let instructor = course.instructor.clone();
    let at_str     = encode_dt(course.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO courses (course_id, name, instructor, created_at)
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![id_str, name, instructor, at_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(course)
  }

  async fn get_course(&self, id: Uuid) -> Result<Option<Course>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawCourse> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {COURSE_COLUMNS} FROM courses WHERE course_id = ?1"),
            rusqlite::params![id_str],
            RawCourse::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawCourse::into_course).transpose()
  }

  async fn list_courses_with_reviews(&self) -> Result<Vec<CourseWithReviews>> {
    let (raw_courses, raw_reviews): (Vec<RawCourse>, Vec<RawReview>) = self
      .conn
      .call(|conn| {
        let tx = conn.transaction()?;
        let courses = tx
          .prepare(&format!(
            "SELECT {COURSE_COLUMNS} FROM courses ORDER BY created_at DESC, rowid DESC"
          ))?
          .query_map([], RawCourse::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        let reviews = tx
          .prepare(&format!(
            "SELECT {REVIEW_COLUMNS} FROM reviews ORDER BY created_at DESC, rowid DESC"
          ))?
          .query_map([], RawReview::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        tx.commit()?;
        Ok((courses, reviews))
      })
      .await?;

    let mut by_course: HashMap<Uuid, Vec<Review>> = HashMap::new();
    for raw in raw_reviews {
      let review = raw.into_review()?;
      by_course.entry(review.course_id).or_default().push(review);
    }

    raw_courses
      .into_iter()
      .map(|raw| {
        let course = raw.into_course()?;
        let reviews = by_course.remove(&course.course_id).unwrap_or_default();
        Ok(CourseWithReviews { course, reviews })
      })
      .collect()
  }

  async fn delete_course(&self, id: Uuid) -> Result<bool> {
    let id_str = encode_uuid(id);

    let deleted = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM courses WHERE course_id = ?1",
          rusqlite::params![id_str],
        )?)
      })
      .await?;

    Ok(deleted > 0)
  }

  // ── Reviews ───────────────────────────────────────────────────────────────

  async fn add_review(&self, input: ValidatedSubmission) -> Result<Review> {
    let review = Review {
      review_id:  Uuid::new_v4(),
      course_id:  input.course_id,
      body:       input.body,
      rating:     input.rating,
      author_id:  input.author_id,
      created_at: now(),
    };

    let review_id  = encode_uuid(review.review_id);
    let course_id  = encode_uuid(review.course_id);
    let body       = review.body.clone();
    let rating     = review.rating;
    let author_id  = review.author_id.clone();
    let created_at = encode_dt(review.created_at);

    let inserted: bool = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let course_exists = tx
          .query_row(
            "SELECT 1 FROM courses WHERE course_id = ?1",
            rusqlite::params![course_id],
            |_| Ok(true),
          )
          .optional()?
          .unwrap_or(false);

        if !course_exists {
          return Ok(false);
        }

        tx.execute(
          "INSERT INTO reviews (review_id, course_id, body, rating, author_id, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![review_id, course_id, body, rating, author_id, created_at],
        )?;
        tx.commit()?;
        Ok(true)
      })
      .await?;

    if !inserted {
      return Err(Error::CourseNotFound(review.course_id));
    }
    Ok(review)
  }

  async fn list_reviews(&self, course_id: Uuid) -> Result<Vec<Review>> {
    let id_str = encode_uuid(course_id);

    let raws: Vec<RawReview> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {REVIEW_COLUMNS} FROM reviews
           WHERE course_id = ?1
           ORDER BY created_at DESC, rowid DESC"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![id_str], RawReview::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawReview::into_review).collect()
  }

  async fn delete_review(&self, id: Uuid) -> Result<Option<Review>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawReview> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let raw = tx
          .query_row(
            &format!("SELECT {REVIEW_COLUMNS} FROM reviews WHERE review_id = ?1"),
            rusqlite::params![id_str],
            RawReview::from_row,
          )
          .optional()?;
        if raw.is_some() {
          tx.execute("DELETE FROM reviews WHERE review_id = ?1", rusqlite::params![id_str])?;
        }
        tx.commit()?;
        Ok(raw)
      })
      .await?;

    raw.map(RawReview::into_review).transpose()
  }

  async fn clear_catalog(&self) -> Result<ClearedCounts> {
    let counts = self
      .conn
      .call(|conn| {
        let tx = conn.transaction()?;
        let reviews = tx.execute("DELETE FROM reviews", [])?;
        let courses = tx.execute("DELETE FROM courses", [])?;
        tx.commit()?;
        Ok(ClearedCounts { reviews, courses })
      })
      .await?;

    tracing::info!(
      reviews = counts.reviews,
      courses = counts.courses,
      "catalogue cleared"
    );
    Ok(counts)
  }

  // ── Profiles ──────────────────────────────────────────────────────────────

  async fn add_profile(&self, input: NewProfile) -> Result<Profile> {
    let profile = Profile {
      id:         input.id,
      email:      input.email,
      is_admin:   false,
      created_at: now(),
    };

    let id     = profile.id.clone();
    let email  = profile.email.clone();
    let at_str = encode_dt(profile.created_at);

    let inserted: bool = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let taken = tx
          .query_row(
            "SELECT 1 FROM profiles WHERE id = ?1 OR email = ?2",
            rusqlite::params![id, email],
            |_| Ok(true),
          )
          .optional()?
          .unwrap_or(false);

        if taken {
          return Ok(false);
        }

        tx.execute(
          "INSERT INTO profiles (id, email, is_admin, created_at) VALUES (?1, ?2, 0, ?3)",
          rusqlite::params![id, email, at_str],
        )?;
        tx.commit()?;
        Ok(true)
      })
      .await?;

    if !inserted {
      return Err(Error::DuplicateProfile(profile.email));
    }
    Ok(profile)
  }

  async fn get_profile(&self, user_id: &str) -> Result<Option<Profile>> {
    self.profile_where("id", user_id).await
  }

  async fn find_profile_by_email(&self, email: &str) -> Result<Option<Profile>> {
    self.profile_where("email", email).await
  }

  async fn list_profiles(&self) -> Result<Vec<Profile>> {
    let raws: Vec<RawProfile> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {PROFILE_COLUMNS} FROM profiles ORDER BY created_at DESC, rowid DESC"
        ))?;
        let rows = stmt
          .query_map([], RawProfile::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawProfile::into_profile).collect()
  }

  async fn set_admin(&self, user_id: &str, is_admin: bool) -> Result<Option<Profile>> {
    let id = user_id.to_owned();

    let updated = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE profiles SET is_admin = ?2 WHERE id = ?1",
          rusqlite::params![id, is_admin],
        )?)
      })
      .await?;

    if updated == 0 {
      return Ok(None);
    }
    self.get_profile(user_id).await
  }
}
