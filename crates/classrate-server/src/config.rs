//! Runtime configuration.
//!
//! Read from an optional TOML file, then overridden by `CLASSRATE_*`
//! environment variables (e.g. `CLASSRATE_STORE_PATH`, `CLASSRATE_PORT`).

use std::path::{Path, PathBuf};

use axum::http::HeaderName;
use serde::Deserialize;

use crate::error::{Error, Result};

/// Runtime server configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:            String,
  #[serde(default = "default_port")]
  pub port:            u16,
  /// SQLite file. When absent, `serve` still starts but data endpoints
  /// report a configuration error.
  #[serde(default)]
  pub store_path:      Option<PathBuf>,
  /// Header carrying the user id set by the upstream auth proxy.
  #[serde(default = "default_identity_header")]
  pub identity_header: String,
  /// University mail domain used by `users add`.
  #[serde(default = "default_email_domain")]
  pub email_domain:    String,
}

fn default_host() -> String { "127.0.0.1".to_owned() }
fn default_port() -> u16 { 3000 }
fn default_identity_header() -> String { classrate_api::DEFAULT_IDENTITY_HEADER.to_owned() }
fn default_email_domain() -> String { "stu.example-u.ac.jp".to_owned() }

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:            default_host(),
      port:            default_port(),
      store_path:      None,
      identity_header: default_identity_header(),
      email_domain:    default_email_domain(),
    }
  }
}

impl ServerConfig {
  /// Load from `path` (which may not exist) layered under the environment.
  pub fn load(path: &Path) -> Result<Self> {
    let settings = config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(config::Environment::with_prefix("CLASSRATE"))
      .build()?;
    Ok(settings.try_deserialize()?)
  }

  /// The store path with a leading `~` expanded.
  pub fn store_path(&self) -> Option<PathBuf> {
    self.store_path.as_deref().map(expand_tilde)
  }

  pub fn identity_header(&self) -> Result<HeaderName> {
    HeaderName::try_from(self.identity_header.as_str())
      .map_err(|_| Error::IdentityHeader(self.identity_header.clone()))
  }

  pub fn address(&self) -> String {
    format!("{}:{}", self.host, self.port)
  }
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn missing_file_yields_defaults() {
    let cfg = ServerConfig::load(Path::new("/nonexistent/classrate.toml")).unwrap();
    assert_eq!(cfg.port, 3000);
    assert_eq!(cfg.identity_header, "x-user-id");
    assert_eq!(cfg.address(), "127.0.0.1:3000");
  }

  #[test]
  fn identity_header_is_validated() {
    let cfg = ServerConfig { identity_header: "x user".into(), ..Default::default() };
    assert!(matches!(cfg.identity_header(), Err(Error::IdentityHeader(_))));

    let cfg = ServerConfig { identity_header: "X-Forwarded-User".into(), ..Default::default() };
    assert_eq!(cfg.identity_header().unwrap().as_str(), "x-forwarded-user");
  }

  #[test]
  fn absolute_store_path_is_untouched() {
    let cfg = ServerConfig {
      store_path: Some(PathBuf::from("/var/lib/classrate.db")),
      ..Default::default()
    };
    assert_eq!(cfg.store_path(), Some(PathBuf::from("/var/lib/classrate.db")));
  }

  #[test]
  fn tilde_expands_to_home() {
    let Ok(home) = std::env::var("HOME") else { return };
    assert_eq!(
      expand_tilde(Path::new("~/data/classrate.db")),
      PathBuf::from(home).join("data/classrate.db")
    );
  }
}
