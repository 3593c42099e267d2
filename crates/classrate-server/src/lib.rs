//! The classrate server: configuration, HTTP wiring and operator commands.
//!
//! The `classrate` binary in `main.rs` is a thin shell over this crate.

pub mod config;
pub mod error;
pub mod maintenance;

pub use error::Error;

use std::sync::Arc;

use axum::Router;
use classrate_api::{AppState, api_router};
use classrate_core::{revalidate::TracingRevalidator, store::CourseStore};
use classrate_store_sqlite::SqliteStore;
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;

/// Build the application state from configuration and an optional store.
pub fn app_state<S>(cfg: &ServerConfig, store: Option<Arc<S>>) -> Result<AppState<S>, Error> {
  Ok(
    AppState::new(store, Arc::new(TracingRevalidator))
      .with_identity_header(cfg.identity_header()?),
  )
}

/// Open the configured store. Fails when `store_path` is unset.
pub async fn open_store(cfg: &ServerConfig) -> Result<SqliteStore, Error> {
  let path = cfg.store_path().ok_or(Error::MissingStorePath)?;
  tracing::info!(path = %path.display(), "opening store");
  Ok(SqliteStore::open(&path).await?)
}

/// The full HTTP application with request tracing.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: CourseStore + 'static,
{
  api_router(state).layer(TraceLayer::new_for_http())
}
