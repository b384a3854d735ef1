//! Export tool writing the registered corpus to a snapshot file
//!
//! Usage:
//!   corpusexport --output corpus.json
//!   corpusexport --config config.postgresql.toml --output corpus.bson
//!   corpusexport --output corpus.json --dry-run

use anyhow::{Context, Result};
use clap::Parser;
use copyreg_core::app_config::{AppConfig, StorageBackend};
use copyreg_core::PostgresTrackStore;
use copyreg_db::CorpusTrack;
use copyreg_fp::{CorpusFile, CorpusRecord};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "corpusexport")]
#[command(about = "Export registered tracks from PostgreSQL to a snapshot file", long_about = None)]
struct Args {
    /// Source configuration file (PostgreSQL backend)
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Destination snapshot; .json or .bson selects the format
    #[arg(short, long)]
    output: PathBuf,

    /// Dry run - show what would be exported without writing the file
    #[arg(long, default_value = "false")]
    dry_run: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logger
    let log_level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    log::info!("🚀 Starting corpus export");

    let config = AppConfig::load_with_env(Path::new(&args.config))
        .context("Failed to load source configuration")?;
    if config.storage.backend != StorageBackend::Postgresql {
        anyhow::bail!("Source backend must be PostgreSQL, not filesystem");
    }

    let pg = &config.storage.postgresql;
    log::info!("🗄️  Source: PostgreSQL {}@{}:{}/{}", pg.user, pg.host, pg.port, pg.database);
    let store = PostgresTrackStore::new(pg)
        .await
        .context("Failed to create PostgreSQL backend")?;

    let tracks = copyreg_db::get_corpus_tracks(store.pool())
        .await
        .context("Failed to load corpus from PostgreSQL")?;
    log::info!("Found {} registered tracks", tracks.len());

    let source = format!("postgresql://{}:{}/{}", pg.host, pg.port, pg.database);
    let snapshot = build_snapshot(source, tracks);
    log_summary(&snapshot);

    if args.dry_run {
        log::info!(
            "[DRY RUN] Would write {} tracks to {}",
            snapshot.tracks.len(),
            args.output.display()
        );
        return Ok(());
    }

    if let Some(parent) = args.output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create output directory: {}", parent.display()))?;
    }
    snapshot
        .save_auto(&args.output)
        .with_context(|| format!("Failed to write snapshot {}", args.output.display()))?;

    log::info!("✅ Exported {} tracks to {}", snapshot.tracks.len(), args.output.display());

    Ok(())
}

fn build_snapshot(source: String, tracks: Vec<CorpusTrack>) -> CorpusFile {
    let mut snapshot = CorpusFile::new(source);
    for track in tracks {
        snapshot.add_track(CorpusRecord {
            id: track.id.to_string(),
            title: track.title,
            fingerprint: track.fingerprint,
            lyrics: track.lyrics,
            status: Some(track.status.to_string()),
            duration: track.duration,
        });
    }
    snapshot
}

fn log_summary(snapshot: &CorpusFile) {
    let without_fingerprint = snapshot
        .tracks
        .iter()
        .filter(|t| t.fingerprint.as_deref().map_or(true, str::is_empty))
        .count();
    let without_lyrics = snapshot
        .tracks
        .iter()
        .filter(|t| t.lyrics.as_deref().map_or(true, str::is_empty))
        .count();

    if without_fingerprint > 0 {
        log::warn!(
            "⚠️  {} tracks have no fingerprint and will not take part in audio comparison",
            without_fingerprint
        );
    }
    log::debug!("{} tracks have no lyrics", without_lyrics);
}
