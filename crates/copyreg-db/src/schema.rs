//! Table definitions
//!
//! Only the tables the review workflow touches are defined here. Users,
//! licences and ownership transfers live in the wider back office schema.

use anyhow::Context;
use deadpool_postgres::Pool;

pub struct Table {
    pub name: &'static str,
    pub schema: &'static str,
    pub indices: &'static [&'static str],
}

const TRACKS_TABLE: Table = Table {
    name: "tracks",
    schema: "CREATE TABLE IF NOT EXISTS tracks (
        id UUID PRIMARY KEY,
        title TEXT NOT NULL,
        artist_id UUID NOT NULL,
        filename TEXT NOT NULL,
        genre TEXT NOT NULL,
        release_year TEXT NOT NULL,
        description TEXT,
        lyrics TEXT NOT NULL,
        duration DOUBLE PRECISION,
        fingerprint TEXT,
        status TEXT NOT NULL DEFAULT 'pending'
            CHECK (status IN ('pending', 'approved', 'rejected', 'copyrighted')),
        rejection_reason TEXT,
        blockchain_tx TEXT,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        CONSTRAINT fingerprint_iff_registered CHECK (
            (status IN ('approved', 'copyrighted')) = (fingerprint IS NOT NULL)
        )
    )",
    indices: &["CREATE INDEX IF NOT EXISTS tracks_status_index ON tracks (status)"],
};

const PAYMENTS_TABLE: Table = Table {
    name: "payments",
    schema: "CREATE TABLE IF NOT EXISTS payments (
        id UUID PRIMARY KEY,
        track_id UUID REFERENCES tracks (id) ON DELETE CASCADE,
        artist_id UUID NOT NULL,
        amount BIGINT NOT NULL,
        payment_type TEXT NOT NULL,
        status TEXT NOT NULL DEFAULT 'initial'
            CHECK (status IN ('initial', 'pending', 'approved', 'rejected')),
        created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )",
    indices: &["CREATE INDEX IF NOT EXISTS payments_track_index ON payments (track_id, status)"],
};

const SYSTEM_SETTINGS_TABLE: Table = Table {
    name: "system_settings",
    schema: "CREATE TABLE IF NOT EXISTS system_settings (
        id UUID PRIMARY KEY,
        key TEXT NOT NULL UNIQUE,
        value TEXT NOT NULL,
        description TEXT,
        type TEXT NOT NULL CHECK (type IN ('string', 'number', 'boolean'))
    )",
    indices: &[],
};

pub const TABLES: &[Table] = &[TRACKS_TABLE, PAYMENTS_TABLE, SYSTEM_SETTINGS_TABLE];

/// Create missing tables and indices
pub async fn ensure_schema(pool: &Pool) -> anyhow::Result<()> {
    let client = pool.get().await?;

    for table in TABLES {
        client
            .batch_execute(table.schema)
            .await
            .with_context(|| format!("Failed to create table {}", table.name))?;
        for index in table.indices {
            client
                .batch_execute(index)
                .await
                .with_context(|| format!("Failed to create index on {}", table.name))?;
        }
        log::debug!("Ensured table {}", table.name);
    }

    Ok(())
}
