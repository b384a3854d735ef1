//! trackcheck - Duplicate check for a candidate track
//!
//! Usage:
//!   trackcheck <audio> --lyrics-file lyrics.txt              # Uses config.toml
//!   trackcheck --config <path> <audio>                       # Uses custom config
//!   trackcheck --corpus corpus.json <audio>                  # Snapshot file
//!   trackcheck --corpus corpus.json --digest <hash> --duration 180
//!
//! Prints the verdict as JSON. Exits with status 2 when the track is rejected.

use anyhow::{Context, Result};
use clap::Parser;
use copyreg_cli::output::{print_json, CheckOutput};
use copyreg_core::{
    evaluate_digest, open_corpus_source, AppConfig, Candidate, CorpusSource, DuplicateDetector,
    FilesystemCorpus, HttpFingerprintClient,
};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "trackcheck")]
#[command(about = "Check a track against the registered corpus", long_about = None)]
struct Args {
    /// Path to configuration file (TOML). If not provided, uses config.toml
    #[arg(short, long)]
    config: Option<String>,

    /// Corpus snapshot file (JSON/BSON), overrides the configured backend
    #[arg(long)]
    corpus: Option<PathBuf>,

    /// Audio file to fingerprint
    #[arg(required_unless_present = "digest")]
    audio: Option<PathBuf>,

    /// Plain-text lyrics of the candidate
    #[arg(short, long)]
    lyrics_file: Option<PathBuf>,

    /// Precomputed fingerprint digest; skips the fingerprinting service
    #[arg(long, conflicts_with = "audio")]
    digest: Option<String>,

    /// Duration in seconds reported with --digest
    #[arg(long, default_value_t = 0.0, requires = "digest")]
    duration: f64,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logger
    if args.verbose {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Debug)
            .init();
    } else {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Warn)
            .init();
    }

    let config = load_config(&args)?;
    log::info!("Storage backend: {:?}", config.storage.backend);
    log::info!(
        "Thresholds: audio {:.2}, lyrics {:.2}",
        config.thresholds.audio,
        config.thresholds.lyrics
    );

    let source: Box<dyn CorpusSource> = match &args.corpus {
        Some(path) => Box::new(FilesystemCorpus::from_path(path)),
        None => open_corpus_source(&config).await?,
    };
    let corpus = source.load_corpus().await?;
    log::info!("Corpus has {} registered tracks", corpus.len());

    let lyrics = match &args.lyrics_file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read lyrics file {}", path.display()))?,
        None => String::new(),
    };

    let (candidate_name, verdict) = match (&args.digest, &args.audio) {
        (Some(digest), _) => {
            log::info!("Checking precomputed digest ({} chars)", digest.len());
            let verdict =
                evaluate_digest(digest, args.duration, &lyrics, &corpus, &config.thresholds);
            (format!("digest:{}", digest), verdict)
        }
        (None, Some(audio)) => {
            if !audio.exists() {
                anyhow::bail!("Audio file not found: {}", audio.display());
            }
            let client = HttpFingerprintClient::from_config(&config.fingerprint_service)?;
            log::info!("Fingerprinting service: {}", client.endpoint());
            let detector = DuplicateDetector::new(client);
            let candidate = Candidate {
                lyrics,
                audio_path: audio.clone(),
            };
            let verdict = detector
                .evaluate(&candidate, &corpus, &config.thresholds)
                .await;
            (audio.display().to_string(), verdict)
        }
        (None, None) => anyhow::bail!("Either an audio file or --digest is required"),
    };

    let output = CheckOutput::new(candidate_name, corpus.len(), config.thresholds, verdict);
    print_json(&output);

    let code = output.exit_code();
    if code != 0 {
        std::process::exit(code);
    }
    Ok(())
}

/// Config file when present; a snapshot-only run needs none
fn load_config(args: &Args) -> Result<AppConfig> {
    let config_path = args.config.as_deref().unwrap_or("config.toml");
    let path = Path::new(config_path);

    if path.exists() || args.config.is_some() {
        let config = AppConfig::load_with_env(path)?;
        log::info!("Loaded configuration from: {}", config_path);
        return Ok(config);
    }

    if args.corpus.is_none() {
        anyhow::bail!(
            "Configuration file {} not found; pass --config or --corpus",
            config_path
        );
    }

    log::info!("No configuration file, using defaults");
    let mut config = AppConfig::default_filesystem();
    config.apply_env();
    config.validate()?;
    Ok(config)
}
