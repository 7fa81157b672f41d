//! Playlist Annotator
//!
//! Walks every playlist owned by the authorized user and copies each item's
//! title into its note when the note is empty.
//!
//! 1. Resolves configuration (CLI > env > file > defaults)
//! 2. Authorizes the first credential set lazily on the first API call
//! 3. Rotates to the next credential set when the active one runs out of quota
//! 4. Prints progress per playlist and item, then a summary

mod annotate;
mod config;
mod connector;
mod fetch;
mod run;

#[cfg(test)]
mod test_support;

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use credential_rotor::{CredentialSet, Invoker, Rotor};
use google_auth::AuthorizeOptions;
use tokio::io::AsyncBufReadExt;
use tracing::info;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::connector::OAuthConnector;
use crate::run::RunOptions;

/// Annotate YouTube playlist items with their titles.
#[derive(Parser, Debug)]
#[command(name = "playlist-annotator")]
#[command(version)]
struct Cli {
    /// OAuth client-secret files, in rotation order.
    #[arg(value_name = "CREDENTIALS")]
    credentials: Vec<PathBuf>,

    /// Path to the TOML config file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory holding per-credential token caches.
    #[arg(long)]
    profile_dir: Option<PathBuf>,

    /// Exit without waiting for Enter.
    #[arg(long)]
    no_pause: bool,

    /// List everything and report pending updates, submit nothing.
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize tracing with LOG_LEVEL / RUST_LOG support; stdout carries progress
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_env("LOG_LEVEL")
                .or_else(|_| EnvFilter::try_from_default_env())
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let no_pause = cli.no_pause;

    let code = match run_cli(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("ERROR: {e:#}");
            ExitCode::FAILURE
        }
    };

    if !no_pause {
        pause().await;
    }
    code
}

async fn run_cli(cli: Cli) -> Result<()> {
    let mut config = Config::resolve(cli.config.as_deref()).context("failed to load config")?;
    config.apply_env();
    config.apply_cli(cli.credentials, cli.profile_dir);
    config.validate().context("invalid configuration")?;

    let profile_dir = config.profile_dir()?;
    info!(
        credentials = config.auth.credentials.len(),
        profile_dir = %profile_dir.display(),
        base_url = %config.api.base_url,
        "configuration loaded"
    );

    let credentials = config
        .auth
        .credentials
        .iter()
        .map(|source| CredentialSet::new(source, &profile_dir))
        .collect();

    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.api.timeout_secs))
        .build()
        .context("failed to build HTTP client")?;

    let options = AuthorizeOptions {
        consent_timeout: Duration::from_secs(config.auth.consent_timeout_secs),
        ..AuthorizeOptions::default()
    };
    let connector = OAuthConnector::new(http, config.api.base_url.clone(), options);
    let mut invoker = Invoker::new(Rotor::new(connector, credentials)?);

    let summary = run::run(
        &mut invoker,
        RunOptions {
            dry_run: cli.dry_run,
        },
    )
    .await?;

    println!("{summary}");
    Ok(())
}

async fn pause() {
    println!("Press Enter to continue...");
    let mut line = String::new();
    let mut stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let _ = stdin.read_line(&mut line).await;
}
