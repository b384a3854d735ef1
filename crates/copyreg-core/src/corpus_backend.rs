//! Corpus backends
//!
//! Where the registered tracks come from: a snapshot file (JSON or BSON)
//! for offline checks, or the PostgreSQL track table.

use anyhow::{Context, Result};
use async_trait::async_trait;
use copyreg_db::{TrackRecord, TrackStatus};
use copyreg_fp::{CorpusFile, CorpusRecord};
use std::path::PathBuf;
use uuid::Uuid;

use crate::app_config::{AppConfig, FilesystemConfig, PostgresqlConfig, StorageBackend};
use crate::engine::CorpusEntry;
use crate::review::TrackStore;

/// Source of the registered corpus
#[async_trait]
pub trait CorpusSource: Send + Sync {
    /// Load every approved or copyrighted track, in registration order
    async fn load_corpus(&self) -> Result<Vec<CorpusEntry>>;
}

/// Snapshot file backend
pub struct FilesystemCorpus {
    snapshot_path: PathBuf,
}

impl FilesystemCorpus {
    pub fn new(config: &FilesystemConfig) -> Self {
        Self::from_path(&config.snapshot_path)
    }

    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self {
            snapshot_path: path.into(),
        }
    }
}

#[async_trait]
impl CorpusSource for FilesystemCorpus {
    async fn load_corpus(&self) -> Result<Vec<CorpusEntry>> {
        let snapshot = CorpusFile::load_auto(&self.snapshot_path).with_context(|| {
            format!(
                "Failed to load corpus snapshot {}",
                self.snapshot_path.display()
            )
        })?;

        log::debug!(
            "Loaded {} tracks from snapshot {} (exported {} from {})",
            snapshot.tracks.len(),
            self.snapshot_path.display(),
            snapshot.metadata.exported_at,
            snapshot.metadata.source
        );

        let total = snapshot.tracks.len();
        let corpus: Vec<CorpusEntry> = snapshot
            .tracks
            .into_iter()
            .filter(is_registered_record)
            .map(CorpusEntry::from)
            .collect();
        if corpus.len() < total {
            log::info!(
                "Skipped {} snapshot tracks that are not approved or copyrighted",
                total - corpus.len()
            );
        }

        Ok(corpus)
    }
}

/// Snapshot records count as registered unless their status says otherwise
///
/// A record without a status is taken as registered: snapshots only hold
/// corpus tracks. Unknown statuses are skipped.
fn is_registered_record(record: &CorpusRecord) -> bool {
    match record.status.as_deref() {
        None => true,
        Some(raw) => match raw.trim().parse::<TrackStatus>() {
            Ok(status) => status.is_registered(),
            Err(e) => {
                log::warn!("Skipping snapshot track {}: {}", record.id, e);
                false
            }
        },
    }
}

/// PostgreSQL backend over the track table
pub struct PostgresTrackStore {
    pool: deadpool_postgres::Pool,
}

impl PostgresTrackStore {
    /// Create a pool and check the connection
    pub async fn new(config: &PostgresqlConfig) -> Result<Self> {
        let pool = copyreg_db::create_pool(
            &config.host,
            config.port,
            &config.database,
            &config.user,
            &config.password,
            config.max_connections,
        )?;

        copyreg_db::test_connection(&pool)
            .await
            .context("PostgreSQL connection test failed")?;

        Ok(Self { pool })
    }

    pub fn from_pool(pool: deadpool_postgres::Pool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &deadpool_postgres::Pool {
        &self.pool
    }
}

#[async_trait]
impl CorpusSource for PostgresTrackStore {
    async fn load_corpus(&self) -> Result<Vec<CorpusEntry>> {
        let tracks = copyreg_db::get_corpus_tracks(&self.pool).await?;
        log::debug!("Loaded {} registered tracks from PostgreSQL", tracks.len());
        Ok(tracks.into_iter().map(CorpusEntry::from).collect())
    }
}

#[async_trait]
impl TrackStore for PostgresTrackStore {
    async fn get_track(&self, id: Uuid) -> Result<Option<TrackRecord>> {
        copyreg_db::get_track_by_id(&self.pool, id).await
    }

    async fn has_approved_payment(&self, id: Uuid) -> Result<bool> {
        copyreg_db::has_approved_payment(&self.pool, id).await
    }

    async fn mark_approved(&self, id: Uuid, fingerprint: &str, duration: f64) -> Result<bool> {
        copyreg_db::approve_pending_track(&self.pool, id, fingerprint, duration).await
    }

    async fn mark_rejected(&self, id: Uuid, reason: Option<&str>) -> Result<bool> {
        copyreg_db::reject_pending_track(&self.pool, id, reason).await
    }

    async fn mark_copyrighted(&self, id: Uuid, blockchain_tx: &str) -> Result<bool> {
        copyreg_db::mark_track_copyrighted(&self.pool, id, blockchain_tx).await
    }
}

/// Open the corpus source selected by the configuration
pub async fn open_corpus_source(config: &AppConfig) -> Result<Box<dyn CorpusSource>> {
    match config.storage.backend {
        StorageBackend::Filesystem => {
            log::info!(
                "Using snapshot corpus {}",
                config.storage.filesystem.snapshot_path
            );
            Ok(Box::new(FilesystemCorpus::new(&config.storage.filesystem)))
        }
        StorageBackend::Postgresql => {
            let pg = &config.storage.postgresql;
            log::info!("Using PostgreSQL corpus {}@{}:{}/{}", pg.user, pg.host, pg.port, pg.database);
            Ok(Box::new(PostgresTrackStore::new(pg).await?))
        }
    }
}
