//! `kudosd` — the kudos platform server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`), opens an
//! in-process SQLite store, and serves the JSON API over HTTP.
//!
//! # Subcommands
//!
//! ```text
//! kudosd serve                  # default when no subcommand is given
//! kudosd report --demo          # print the derived views to the terminal
//! kudosd hash-password          # argon2 PHC string for roster seeding
//! ```
//!
//! Demo seeding (`seed_demo = true`, or `KUDOS_SEED_DEMO=true`) loads the
//! fixture roster into an empty store; every seeded account signs in with
//! the password `demo`.

mod report;

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use argon2::{Argon2, PasswordHasher, password_hash::SaltString};
use chrono::Utc;
use clap::{Parser, Subcommand};
use rand_core::OsRng;
use serde::Deserialize;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use kudos_api::AppState;
use kudos_core::{fixture, snapshot::MemoryProvider};
use kudos_store_sqlite::SqliteStore;

// ─── Configuration ───────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` with
/// `KUDOS_`-prefixed environment overrides.
#[derive(Debug, Clone, Deserialize)]
struct ServerConfig {
  #[serde(default = "default_host")]
  host:      String,
  #[serde(default = "default_port")]
  port:      u16,
  #[serde(default = "default_db_path")]
  db_path:   PathBuf,
  /// Load the fixture dataset into an empty store at startup.
  #[serde(default)]
  seed_demo: bool,
}

fn default_host() -> String { "127.0.0.1".to_string() }
fn default_port() -> u16 { 8087 }
fn default_db_path() -> PathBuf { PathBuf::from("kudos.db") }

// ─── CLI ─────────────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "kudosd", version, about = "Peer-recognition platform server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  #[command(subcommand)]
  command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
  /// Run the HTTP server (the default).
  Serve,

  /// Print the derived views (birthdays, highlights, DNA, graph) to the
  /// terminal.
  Report {
    /// Use the in-memory demo fixture instead of the configured database.
    #[arg(long)]
    demo: bool,

    /// Email of the user to scope individual views to; defaults to the
    /// first roster entry.
    #[arg(long)]
    focal: Option<String>,
  },

  /// Print the argon2 hash for a password entered on stdin and exit.
  HashPassword,
}

// ─── Entry point ─────────────────────────────────────────────────────────────

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

  match cli.command.unwrap_or(Command::Serve) {
    Command::Serve => serve(&cli.config).await,
    Command::Report { demo, focal } => {
      if demo {
        let provider = MemoryProvider::demo(Utc::now());
        report::print_report(&provider, focal.as_deref()).await
      } else {
        let config = load_config(&cli.config)?;
        let store = open_store(&config).await?;
        report::print_report(&store, focal.as_deref()).await
      }
    }
    Command::HashPassword => {
      let password = read_password()?;
      println!("{}", hash_password(&password)?);
      Ok(())
    }
  }
}

async fn serve(config_path: &Path) -> anyhow::Result<()> {
  let config = load_config(config_path)?;
  let store = open_store(&config).await?;

  let app = kudos_api::api_router(AppState::new(store))
    .layer(TraceLayer::new_for_http());
  let address = format!("{}:{}", config.host, config.port);

  tracing::info!("listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;
  Ok(())
}

fn load_config(path: &Path) -> anyhow::Result<ServerConfig> {
  let settings = config::Config::builder()
    .add_source(config::File::from(path.to_path_buf()).required(false))
    .add_source(config::Environment::with_prefix("KUDOS"))
    .build()
    .context("failed to read config file")?;

  settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")
}

async fn open_store(config: &ServerConfig) -> anyhow::Result<SqliteStore> {
  let store = SqliteStore::open(&config.db_path)
    .await
    .with_context(|| format!("failed to open store at {:?}", config.db_path))?;

  if config.seed_demo && store.is_empty().await? {
    tracing::info!("seeding demo fixture (password: demo)");
    let snapshot = fixture::demo_snapshot(Utc::now());
    store
      .import_snapshot(&snapshot, Some(hash_password("demo")?))
      .await
      .context("failed to seed demo data")?;
  }

  Ok(store)
}

// ─── Helpers ─────────────────────────────────────────────────────────────────

fn hash_password(password: &str) -> anyhow::Result<String> {
  let salt = SaltString::generate(&mut OsRng);
  Argon2::default()
    .hash_password(password.as_bytes(), &salt)
    .map(|hash| hash.to_string())
    .map_err(|e| anyhow::anyhow!("argon2 error: {e}"))
}

/// Read a password from stdin.
fn read_password() -> anyhow::Result<String> {
  use std::io::{self, BufRead, Write};
  let stdin = io::stdin();
  print!("Password: ");
  io::stdout().flush().ok();
  let mut line = String::new();
  stdin.lock().read_line(&mut line)?;
  Ok(
    line
      .trim_end_matches('\n')
      .trim_end_matches('\r')
      .to_string(),
  )
}
