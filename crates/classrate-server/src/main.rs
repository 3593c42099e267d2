//! classrate server binary.
//!
//! Reads `config.toml` (or the path given with `--config`), opens the SQLite
//! store, and either serves the HTTP API or runs a maintenance command.

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use classrate_core::{admin::collect_stats, store::CourseStore};
use classrate_server::{
  config::ServerConfig,
  maintenance::{self, Change},
};
use classrate_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "classrate course review server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand)]
enum Command {
  /// Serve the HTTP API.
  Serve,
  /// Manage user profiles and admin rights.
  #[command(subcommand)]
  Users(UsersCommand),
  /// Print site statistics.
  Stats,
  /// Delete every course and review.
  ClearData {
    /// Required; without it nothing is deleted.
    #[arg(long)]
    force: bool,
  },
}

#[derive(Subcommand)]
enum UsersCommand {
  /// List all profiles, newest first.
  List,
  /// Register a profile.
  Add {
    /// User id as issued by the auth provider.
    id:    String,
    /// E-mail address, or a bare username in the university domain.
    email: String,
  },
  /// Grant admin rights.
  Promote { email: String },
  /// Revoke admin rights.
  Revoke { email: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let cfg = ServerConfig::load(&cli.config)
    .with_context(|| format!("failed to load configuration from {:?}", cli.config))?;

  match cli.command {
    Command::Serve => serve(cfg).await,
    Command::Users(cmd) => users(&cfg, cmd).await,
    Command::Stats => {
      let store = open_store(&cfg).await?;
      let stats = collect_stats(&store).await.context("failed to collect stats")?;
      print!("{}", maintenance::render_stats(&stats));
      Ok(())
    }
    Command::ClearData { force } => {
      let store = open_store(&cfg).await?;
      if !force {
        eprintln!("warning: this deletes every class and review.");
        eprintln!("re-run with --force to proceed.");
      }
      let counts = maintenance::clear_data(&store, force).await?;
      println!("deleted {} reviews and {} classes", counts.reviews, counts.courses);
      Ok(())
    }
  }
}

async fn serve(cfg: ServerConfig) -> anyhow::Result<()> {
  let store = if cfg.store_path.is_some() {
    Some(Arc::new(open_store(&cfg).await?))
  } else {
    tracing::warn!("store_path is not configured; data endpoints will report an error");
    None
  };

  let state = classrate_server::app_state(&cfg, store)?;
  let app = classrate_server::router(state);
  let address = cfg.address();

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}

async fn users(cfg: &ServerConfig, cmd: UsersCommand) -> anyhow::Result<()> {
  let store = open_store(cfg).await?;

  match cmd {
    UsersCommand::List => {
      let profiles = store.list_profiles().await.context("failed to list profiles")?;
      print!("{}", maintenance::render_users(&profiles));
    }
    UsersCommand::Add { id, email } => {
      let profile = maintenance::add_user(&store, &id, &email, &cfg.email_domain).await?;
      println!("registered {} as {}", profile.email, profile.id);
    }
    UsersCommand::Promote { email } => {
      match maintenance::set_admin_by_email(&store, &email, &cfg.email_domain, true).await? {
        Change::Applied(_) => println!("{email} is now an admin"),
        Change::Unchanged(_) => println!("{email} is already an admin"),
      }
    }
    UsersCommand::Revoke { email } => {
      match maintenance::set_admin_by_email(&store, &email, &cfg.email_domain, false).await? {
        Change::Applied(_) => println!("{email} is no longer an admin"),
        Change::Unchanged(_) => println!("{email} is not an admin"),
      }
    }
  }

  Ok(())
}

async fn open_store(cfg: &ServerConfig) -> anyhow::Result<SqliteStore> {
  classrate_server::open_store(cfg)
    .await
    .with_context(|| format!("failed to open store at {:?}", cfg.store_path()))
}
