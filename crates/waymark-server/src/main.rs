//! waymark-server binary.
//!
//! Reads `config.toml` (or the path given with `--config`) plus `WAYMARK_*`
//! environment overrides, opens the SQLite store and serves the API under
//! `/api`.
//!
//! # Admin token hash
//!
//! To generate the argon2 PHC string for `admin_token_hash`:
//!
//! ```text
//! cargo run -p waymark-server -- --hash-token
//! ```

use std::{net::SocketAddr, path::PathBuf};

use anyhow::Context as _;
use argon2::{Argon2, PasswordHasher, password_hash::SaltString};
use clap::Parser;
use rand_core::OsRng;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use waymark_server::{ServerConfig, app, build_state, expand_tilde};
use waymark_store_sqlite::SqliteStore;

#[derive(Parser)]
#[command(author, version, about = "Waymark intake server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// Print the argon2 hash for an admin token entered on stdin and exit.
  #[arg(long)]
  hash_token: bool,
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

  if cli.hash_token {
    let token = read_token()?;
    if token.is_empty() {
      anyhow::bail!("empty token");
    }
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
      .hash_password(token.as_bytes(), &salt)
      .map_err(|e| anyhow::anyhow!("argon2 error: {e}"))?
      .to_string();
    println!("{hash}");
    return Ok(());
  }

  let server_cfg = ServerConfig::load(&cli.config)
    .with_context(|| format!("failed to load config from {:?}", cli.config))?;

  if server_cfg.admin_token_hash.is_none() {
    tracing::warn!("no admin_token_hash configured; admin routes are disabled");
  }
  if server_cfg.fake_payments {
    tracing::warn!("fake payments enabled; checkout marks cases paid");
  }

  let store_path = expand_tilde(&server_cfg.store_path);
  if let Some(parent) = store_path.parent().filter(|p| !p.as_os_str().is_empty()) {
    std::fs::create_dir_all(parent)
      .with_context(|| format!("failed to create {parent:?}"))?;
  }
  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  let state = build_state(&server_cfg, store);
  let app = app(state);
  let address = server_cfg.address();

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(
    listener,
    app.into_make_service_with_connect_info::<SocketAddr>(),
  )
  .await
  .context("server error")?;

  Ok(())
}

/// Read the admin token from one line of stdin.
fn read_token() -> anyhow::Result<String> {
  use std::io::{self, BufRead, Write};
  print!("Admin token: ");
  io::stdout().flush().ok();
  let mut line = String::new();
  io::stdin().lock().read_line(&mut line)?;
  Ok(line.trim_end_matches(['\n', '\r']).to_string())
}
