//! farcaster-follow - sign in with a Farcaster signer and follow a roster
//!
//! `sign-in` issues a signer through the signer service and waits for the
//! account owner to approve it. `follow` downloads the shared roster,
//! resolves every row to a fid and follows them all in one request.

mod commands;
mod config;
mod error;

use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{prelude::*, EnvFilter};

use crate::commands::App;
use crate::config::Config;
use crate::error::Result;

#[derive(Parser)]
#[command(name = "farcaster-follow", about = "Follow everyone on a Farcaster roster")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Issue a signer and wait until it is approved
    SignIn {
        /// Give up after this many seconds (0 waits until interrupted)
        #[arg(long)]
        timeout_secs: Option<u64>,
    },
    /// Show the stored session
    Status,
    /// Follow every account on the roster
    Follow {
        /// CSV roster to read instead of ROSTER_URL / ROSTER_SHEET_ID
        #[arg(long)]
        roster_url: Option<String>,
        /// Handle lookups to run at once
        #[arg(long)]
        concurrency: Option<usize>,
        /// Resolve and print the roster without following anyone
        #[arg(long)]
        dry_run: bool,
    },
    /// Forget the stored session
    SignOut,
}

#[tokio::main]
async fn main() -> Result<()> {
    let env_filter = EnvFilter::from_default_env()
        .add_directive("farcaster_follow=info".parse()?)
        .add_directive("farcaster_signer=info".parse()?)
        .add_directive("follow_roster=info".parse()?)
        .add_directive("follow_dispatcher=info".parse()?);

    // Use JSON format for GCP Cloud Logging when LOG_FORMAT=json
    if std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false)
    {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_stackdriver::layer())
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    };

    let cli = Cli::parse();
    let config = Config::from_env();
    info!(
        signer_service = %config.signer_service_url,
        session_dir = %config.session_dir.display(),
        "Loaded configuration"
    );

    let app = App::new(config)?;
    match cli.command {
        Command::SignIn { timeout_secs } => app.sign_in(timeout_secs.map(Duration::from_secs)).await,
        Command::Status => app.status().await,
        Command::Follow {
            roster_url,
            concurrency,
            dry_run,
        } => app.follow(roster_url.as_deref(), concurrency, dry_run).await,
        Command::SignOut => app.sign_out().await,
    }
}
