//! Course search: substring filtering, newest-first ordering, and rating
//! annotation.

use serde::{Deserialize, Serialize};

use crate::{
  course::{Course, CourseWithReviews},
  rating::{RatingSummary, summarize},
};

/// One row of a search result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseResult {
  pub course:  Course,
  pub summary: RatingSummary,
}

/// Filter `courses` by `query` and annotate each hit with its
/// [`RatingSummary`].
///
/// A query that is empty after trimming returns every course. Otherwise a
/// course matches when its name or instructor contains `query`,
/// case-insensitively. Results are ordered by `created_at`, newest first;
/// courses created at the same instant keep their input order.
pub fn search(courses: &[CourseWithReviews], query: &str) -> Vec<CourseResult> {
  let needle = (!query.trim().is_empty()).then(|| query.to_lowercase());

  let mut results: Vec<CourseResult> = courses
    .iter()
    .filter(|c| needle.as_deref().is_none_or(|n| matches(&c.course, n)))
    .map(|c| CourseResult {
      course:  c.course.clone(),
      summary: summarize(&c.reviews),
    })
    .collect();

  results.sort_by(|a, b| b.course.created_at.cmp(&a.course.created_at));
  results
}

fn matches(course: &Course, needle: &str) -> bool {
  course.name.to_lowercase().contains(needle)
    || course
      .instructor
      .as_deref()
      .is_some_and(|i| i.to_lowercase().contains(needle))
}

#[cfg(test)]
mod tests {
  use chrono::{DateTime, Duration, TimeZone, Utc};
  use uuid::Uuid;

  use super::*;
  use crate::review::Review;

  fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 2, 10, 9, 0, 0).unwrap()
  }

  fn course(name: &str, instructor: Option<&str>, day: i64) -> Course {
    Course {
      course_id:  Uuid::new_v4(),
      name:       name.into(),
      instructor: instructor.map(Into::into),
      created_at: base_time() + Duration::days(day),
    }
  }

  fn review(course: &Course, rating: Option<i32>) -> Review {
    Review {
      review_id:  Uuid::new_v4(),
      course_id:  course.course_id,
      body:       "fine".into(),
      rating,
      author_id:  "u1".into(),
      created_at: course.created_at,
    }
  }

  fn catalogue() -> Vec<CourseWithReviews> {
    let programming = course("Programming Basics", Some("Taro Teikyo"), 0);
    let databases = course("Database Design", Some("Jiro Yamada"), 1);
    let seminar = course("Seminar", None, 2);
    vec![
      CourseWithReviews {
        reviews: vec![review(&programming, Some(4)), review(&programming, Some(5))],
        course:  programming,
      },
      CourseWithReviews {
        reviews: vec![review(&databases, Some(3))],
        course:  databases,
      },
      CourseWithReviews { course: seminar, reviews: vec![] },
    ]
  }

  fn names(results: &[CourseResult]) -> Vec<&str> {
    results.iter().map(|r| r.course.name.as_str()).collect()
  }

  #[test]
  fn empty_query_returns_everything_newest_first() {
    let results = search(&catalogue(), "");
    assert_eq!(names(&results), ["Seminar", "Database Design", "Programming Basics"]);
  }

  #[test]
  fn whitespace_query_behaves_like_empty() {
    let c = catalogue();
    assert_eq!(search(&c, "   "), search(&c, ""));
  }

  #[test]
  fn name_match_is_case_insensitive() {
    let results = search(&catalogue(), "program");
    assert_eq!(names(&results), ["Programming Basics"]);

    let results = search(&catalogue(), "DATABASE");
    assert_eq!(names(&results), ["Database Design"]);
  }

  #[test]
  fn instructor_match() {
    let results = search(&catalogue(), "yamada");
    assert_eq!(names(&results), ["Database Design"]);
  }

  #[test]
  fn active_query_is_matched_untrimmed() {
    let results = search(&catalogue(), " design");
    assert_eq!(names(&results), ["Database Design"]);

    let results = search(&catalogue(), " programming");
    assert!(results.is_empty());
  }

  #[test]
  fn absent_instructor_never_matches() {
    let results = search(&catalogue(), "none");
    assert!(results.is_empty());
  }

  #[test]
  fn filtered_results_are_ordered_newest_first() {
    let results = search(&catalogue(), "e");
    let times: Vec<_> = results.iter().map(|r| r.course.created_at).collect();
    let mut sorted = times.clone();
    sorted.sort_by(|a, b| b.cmp(a));
    assert_eq!(times, sorted);
  }

  #[test]
  fn results_carry_rating_summaries() {
    let results = search(&catalogue(), "");
    let by_name = |n: &str| results.iter().find(|r| r.course.name == n).unwrap().summary;

    assert_eq!(by_name("Programming Basics").average, Some(4.5));
    assert_eq!(by_name("Programming Basics").count, 2);
    assert_eq!(by_name("Database Design").average, Some(3.0));
    assert_eq!(by_name("Seminar").average, None);
    assert_eq!(by_name("Seminar").count, 0);
  }

  #[test]
  fn input_is_left_untouched() {
    let c = catalogue();
    let before = c.clone();
    let _ = search(&c, "program");
    assert_eq!(c, before);
  }
}
