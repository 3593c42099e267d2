//! Core types and rules for the classrate course-review service.
//!
//! No HTTP or database dependencies live here.
//! Persistence is reached through the [`store::CourseStore`] trait and page
//! cache invalidation through [`revalidate::Revalidate`]; both are supplied by
//! the caller.

// Store traits declare `Send` futures explicitly; implementors use `async fn`.
#![allow(async_fn_in_trait)]

pub mod actions;
pub mod admin;
pub mod admission;
pub mod capability;
pub mod course;
pub mod error;
pub mod profile;
pub mod rating;
pub mod revalidate;
pub mod review;
pub mod search;
pub mod store;

pub use error::{Error, Result, ValidationError};
