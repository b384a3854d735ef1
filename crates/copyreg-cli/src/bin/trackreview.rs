//! trackreview - Administrator review of submitted tracks
//!
//! Usage:
//!   trackreview seed-settings
//!   trackreview pending
//!   trackreview approve <track_id>
//!   trackreview reject <track_id> --reason "..."
//!   trackreview copyright <track_id> --tx <hash>
//!
//! Requires the PostgreSQL backend. Results are printed as JSON.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use copyreg_cli::output::{print_json, EXIT_REJECTED};
use copyreg_core::{
    AppConfig, HttpFingerprintClient, PostgresTrackStore, ReviewError, ReviewWorkflow, Thresholds,
    TrackReviewer,
};
use copyreg_core::app_config::StorageBackend;
use serde::Serialize;
use std::collections::HashMap;
use std::path::Path;
use uuid::Uuid;

#[derive(Parser, Debug)]
#[command(name = "trackreview")]
#[command(about = "Review submitted tracks", long_about = None)]
struct Args {
    /// Path to configuration file (TOML). If not provided, uses config.toml
    #[arg(short, long)]
    config: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create the schema and seed missing settings
    SeedSettings,

    /// List tracks awaiting review
    Pending,

    /// Run duplicate detection and approve the track if it is unique
    Approve { track_id: Uuid },

    /// Reject a pending track
    Reject {
        track_id: Uuid,
        #[arg(long)]
        reason: Option<String>,
    },

    /// Record the blockchain registration of an approved track
    Copyright {
        track_id: Uuid,
        #[arg(long)]
        tx: String,
    },
}

#[derive(Serialize)]
struct ErrorOutput {
    error: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logger
    let log_level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config_path = args.config.as_deref().unwrap_or("config.toml");
    let config = AppConfig::load_with_env(Path::new(config_path))
        .with_context(|| format!("Failed to load configuration {}", config_path))?;

    if config.storage.backend != StorageBackend::Postgresql {
        anyhow::bail!("trackreview requires the postgresql storage backend");
    }

    let store = PostgresTrackStore::new(&config.storage.postgresql)
        .await
        .context("Failed to connect to PostgreSQL")?;

    match args.command {
        Command::SeedSettings => {
            copyreg_db::ensure_schema(store.pool()).await?;
            let seeded =
                copyreg_db::seed_defaults(store.pool(), &config.thresholds.seed_settings()).await?;
            log::info!("Seeded {} settings", seeded);
            print_json(&copyreg_db::get_all_settings(store.pool()).await?);
        }
        Command::Pending => {
            let tracks = copyreg_db::get_pending_tracks_for_approval(store.pool()).await?;
            log::info!("{} tracks awaiting review", tracks.len());
            print_json(&tracks);
        }
        Command::Approve { track_id } => {
            let thresholds = load_thresholds(&store, &config.thresholds).await?;
            let client = HttpFingerprintClient::from_config(&config.fingerprint_service)?;
            let workflow =
                ReviewWorkflow::new(store, client, thresholds, config.review.tracks_dir.clone());

            let outcome = workflow.approve(track_id).await;
            match outcome {
                Ok(outcome) => {
                    print_json(&outcome);
                    if !outcome.approved {
                        std::process::exit(EXIT_REJECTED);
                    }
                }
                Err(e) => fail(e),
            }
        }
        Command::Reject { track_id, reason } => {
            let reviewer = TrackReviewer::new(store);
            match reviewer.reject(track_id, reason.as_deref()).await {
                Ok(track) => print_json(&track),
                Err(e) => fail(e),
            }
        }
        Command::Copyright { track_id, tx } => {
            let reviewer = TrackReviewer::new(store);
            match reviewer.mark_copyrighted(track_id, &tx).await {
                Ok(track) => print_json(&track),
                Err(e) => fail(e),
            }
        }
    }

    Ok(())
}

/// Seed missing threshold settings, then read the stored values
async fn load_thresholds(store: &PostgresTrackStore, fallback: &Thresholds) -> Result<Thresholds> {
    copyreg_db::seed_defaults(store.pool(), &fallback.seed_settings()).await?;

    let settings: HashMap<String, String> = copyreg_db::get_all_settings(store.pool())
        .await?
        .into_iter()
        .map(|s| (s.key, s.value))
        .collect();

    let thresholds = Thresholds::from_settings(|key| settings.get(key).cloned(), fallback);
    log::info!(
        "Thresholds: audio {:.2}, lyrics {:.2}",
        thresholds.audio,
        thresholds.lyrics
    );
    Ok(thresholds)
}

fn fail(error: ReviewError) -> ! {
    log::error!("{}", error);
    print_json(&ErrorOutput {
        error: error.to_string(),
    });
    std::process::exit(1);
}
