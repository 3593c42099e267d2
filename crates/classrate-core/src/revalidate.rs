//! Cache invalidation hooks for the page-rendering collaborator.

use std::sync::Mutex;

use uuid::Uuid;

/// A rendered view whose cached copy is stale after a write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevalidateTarget {
  /// The detail page of one course.
  CourseDetail(Uuid),
  /// The site-wide layout (course list, header counts).
  Layout,
}

impl RevalidateTarget {
  /// Path of the view as the renderer knows it.
  pub fn path(&self) -> String {
    match self {
      Self::CourseDetail(id) => format!("/classes/{id}"),
      Self::Layout => "/".to_owned(),
    }
  }
}

/// Receives invalidation notices. Called after a successful write, once per
/// affected view.
pub trait Revalidate: Send + Sync {
  fn revalidate(&self, target: RevalidateTarget);
}

/// Logs each notice; used when no renderer is attached.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingRevalidator;

impl Revalidate for TracingRevalidator {
  fn revalidate(&self, target: RevalidateTarget) {
    tracing::info!(path = %target.path(), "revalidate");
  }
}

/// Keeps every notice in memory. Used by tests.
#[derive(Debug, Default)]
pub struct RecordingRevalidator {
  seen: Mutex<Vec<RevalidateTarget>>,
}

impl RecordingRevalidator {
  pub fn new() -> Self { Self::default() }

  /// Notices received so far, in order.
  pub fn targets(&self) -> Vec<RevalidateTarget> {
    self.seen.lock().map(|s| s.clone()).unwrap_or_default()
  }
}

impl Revalidate for RecordingRevalidator {
  fn revalidate(&self, target: RevalidateTarget) {
    if let Ok(mut seen) = self.seen.lock() {
      seen.push(target);
    }
  }
}
