//! `waymark-admin`: command-line client for the Waymark admin API.
//!
//! # Usage
//!
//! ```text
//! waymark-admin --url http://localhost:8080 --token s3cret list --status paid
//! waymark-admin --config ~/.config/waymark/admin.toml export -o cases.csv
//! ```

mod client;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use client::{ApiClient, ApiConfig, ListQuery};
use serde::Deserialize;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;
use waymark_core::case::{CaseStatus, CaseSummary};

const DEFAULT_URL: &str = "http://localhost:8080";

// ─── CLI args ────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "waymark-admin", about = "Admin client for the Waymark server")]
struct Args {
  /// Path to a TOML config file (url, admin_token).
  #[arg(short, long, value_name = "FILE")]
  config: Option<PathBuf>,

  /// Base URL of the server (default: http://localhost:8080).
  #[arg(long, env = "WAYMARK_URL")]
  url: Option<String>,

  /// Admin token (plaintext).
  #[arg(long, env = "WAYMARK_ADMIN_TOKEN", hide_env_values = true)]
  token: Option<String>,

  #[command(subcommand)]
  command: Command,
}

#[derive(clap::Args, Debug, Default)]
struct Filters {
  /// draft, paid or closed.
  #[arg(long)]
  status: Option<String>,
  /// fr, en or ar.
  #[arg(long)]
  locale: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// List cases, newest first.
  List {
    #[command(flatten)]
    filters: Filters,
    /// Case-insensitive search over case id and pathway.
    #[arg(short, long)]
    query:   Option<String>,
    /// Exact access code.
    #[arg(long)]
    code:    Option<String>,
    /// Print raw JSON instead of a table.
    #[arg(long)]
    json:    bool,
  },
  /// Download the CSV export.
  Export {
    #[command(flatten)]
    filters: Filters,
    /// Write to a file instead of stdout.
    #[arg(short, long, value_name = "FILE")]
    output:  Option<PathBuf>,
  },
  /// Show case counts by status and locale.
  Stats,
  /// Force a case into any status.
  SetStatus { id: Uuid, status: CaseStatus },
  /// Mark a case paid.
  MarkPaid { id: Uuid },
  /// Issue a new access code for a case.
  RegenCode { id: Uuid },
}

// ─── Config file ─────────────────────────────────────────────────────────────

/// Shape of the optional TOML config file.
#[derive(Deserialize, Default)]
struct ConfigFile {
  #[serde(default)]
  url:         String,
  #[serde(default)]
  admin_token: String,
}

fn non_empty(s: &str) -> Option<String> { (!s.is_empty()).then(|| s.to_string()) }

/// CLI flags override the config file, which overrides defaults.
fn resolve(args_url: Option<String>, args_token: Option<String>, file: &ConfigFile) -> ApiConfig {
  ApiConfig {
    base_url:    args_url
      .or_else(|| non_empty(&file.url))
      .unwrap_or_else(|| DEFAULT_URL.to_string()),
    admin_token: args_token
      .or_else(|| non_empty(&file.admin_token))
      .unwrap_or_default(),
  }
}

// ─── Output ──────────────────────────────────────────────────────────────────

fn summary_row(s: &CaseSummary) -> String {
  format!(
    "{}  {:<6}  {:<2}  {}  {:<6}  {}",
    s.case_id,
    s.status,
    s.locale,
    s.created_at.format("%Y-%m-%d %H:%M"),
    s.access_code.as_deref().unwrap_or("-"),
    s.pathway.as_deref().unwrap_or("-"),
  )
}

// ─── Entry point ─────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_writer(std::io::stderr)
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy(),
    )
    .init();

  let args = Args::parse();

  let file_cfg: ConfigFile = if let Some(path) = &args.config {
    let raw = std::fs::read_to_string(path)
      .with_context(|| format!("reading config file {}", path.display()))?;
    toml::from_str(&raw).context("parsing config file")?
  } else {
    ConfigFile::default()
  };

  let api_config = resolve(args.url, args.token, &file_cfg);
  if api_config.admin_token.is_empty() {
    anyhow::bail!("no admin token: pass --token or set WAYMARK_ADMIN_TOKEN");
  }
  let client = ApiClient::new(api_config)?;

  match args.command {
    Command::List { filters, query, code, json } => {
      let rows = client
        .list_cases(&ListQuery {
          status: filters.status,
          locale: filters.locale,
          text: query,
          code,
        })
        .await?;
      if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
      } else {
        for row in &rows {
          println!("{}", summary_row(row));
        }
        eprintln!("{} case(s)", rows.len());
      }
    }
    Command::Export { filters, output } => {
      let csv = client
        .export(&ListQuery {
          status: filters.status,
          locale: filters.locale,
          ..Default::default()
        })
        .await?;
      match output {
        Some(path) => std::fs::write(&path, csv)
          .with_context(|| format!("writing {}", path.display()))?,
        None => print!("{csv}"),
      }
    }
    Command::Stats => {
      let stats = client.stats().await?;
      println!("total  {}", stats.total);
      for (status, n) in &stats.by_status {
        println!("status {status:<8} {n}");
      }
      for (locale, n) in &stats.by_locale {
        println!("locale {locale:<8} {n}");
      }
    }
    Command::SetStatus { id, status } => {
      let case = client.set_status(id, status).await?;
      println!("{} → {}", case.case_id, case.status);
    }
    Command::MarkPaid { id } => {
      let case = client.mark_paid(id).await?;
      println!("{} → {}", case.case_id, case.status);
    }
    Command::RegenCode { id } => {
      let issued = client.regenerate_code(id).await?;
      println!("{}  {}", issued.case_id, issued.code);
    }
  }

  Ok(())
}
