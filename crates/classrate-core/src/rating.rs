//! Rating aggregation over a course's reviews.

use serde::{Deserialize, Serialize};

use crate::review::Review;

/// Derived, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatingSummary {
  /// Mean of the rated submissions, rounded half-up to one decimal place.
  /// `None` when nothing was rated.
  pub average: Option<f64>,
  /// Every submission, rated or not.
  pub count:   usize,
}

impl RatingSummary {
  /// The average as a decimal string with exactly one fractional digit.
  pub fn display_average(&self) -> Option<String> {
    self.average.map(|avg| format!("{avg:.1}"))
  }
}

/// Summarise a set of reviews. See [`summarize_ratings`].
pub fn summarize(reviews: &[Review]) -> RatingSummary {
  summarize_ratings(reviews.iter().map(|r| r.rating))
}

/// Summarise raw rating values, one item per submission.
///
/// A rating of `0` counts as "not rated": it is dropped from the mean but the
/// submission still counts towards `count`.
pub fn summarize_ratings<I>(ratings: I) -> RatingSummary
where
  I: IntoIterator<Item = Option<i32>>,
{
  let mut count = 0usize;
  let mut rated = 0i64;
  let mut sum = 0i64;

  for rating in ratings {
    count += 1;
    if let Some(value) = rating.filter(|v| *v != 0) {
      rated += 1;
      sum += i64::from(value);
    }
  }

  let average = (rated > 0).then(|| round_tenths(sum, rated));
  RatingSummary { average, count }
}

/// `sum / n` rounded half-up to tenths, computed on integers so that e.g.
/// 89 / 20 lands on 4.5 rather than 4.4.
fn round_tenths(sum: i64, n: i64) -> f64 {
  let tenths = (20 * sum + n).div_euclid(2 * n);
  tenths as f64 / 10.0
}
