//! Error type for server start-up and maintenance commands.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error(transparent)]
  Core(#[from] classrate_core::Error),

  #[error("store error: {0}")]
  Store(#[from] classrate_store_sqlite::Error),

  #[error("config error: {0}")]
  Config(#[from] config::ConfigError),

  #[error("invalid identity header name: {0:?}")]
  IdentityHeader(String),

  #[error("store_path is not configured")]
  MissingStorePath,

  #[error("refusing to delete every course and review without --force")]
  ForceRequired,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
