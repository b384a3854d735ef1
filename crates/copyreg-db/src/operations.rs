use anyhow::{Context, Result};
use deadpool_postgres::Pool;
use tokio_postgres::Row;
use uuid::Uuid;

use crate::models::*;

const TRACK_COLUMNS: &str = "id, title, artist_id, filename, genre, release_year, description, \
     lyrics, duration, fingerprint, status, rejection_reason, blockchain_tx, created_at, updated_at";

fn track_from_row(r: &Row) -> Result<TrackRecord> {
    let status: String = r.get(10);
    Ok(TrackRecord {
        id: r.get(0),
        title: r.get(1),
        artist_id: r.get(2),
        filename: r.get(3),
        genre: r.get(4),
        release_year: r.get(5),
        description: r.get(6),
        lyrics: r.get(7),
        duration: r.get(8),
        fingerprint: r.get(9),
        status: status.parse()?,
        rejection_reason: r.get(11),
        blockchain_tx: r.get(12),
        created_at: r.get(13),
        updated_at: r.get(14),
    })
}

/// Insert a new pending track
pub async fn insert_track(pool: &Pool, track: &NewTrack) -> Result<Uuid> {
    let client = pool.get().await?;
    let id = Uuid::new_v4();

    client
        .execute(
            "INSERT INTO tracks
             (id, title, artist_id, filename, genre, release_year, description, lyrics, status)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, 'pending')",
            &[
                &id,
                &track.title,
                &track.artist_id,
                &track.filename,
                &track.genre,
                &track.release_year,
                &track.description,
                &track.lyrics,
            ],
        )
        .await
        .context("Failed to insert track")?;

    Ok(id)
}

/// Get track by ID
pub async fn get_track_by_id(pool: &Pool, id: Uuid) -> Result<Option<TrackRecord>> {
    let client = pool.get().await?;

    let row = client
        .query_opt(
            &format!("SELECT {} FROM tracks WHERE id = $1", TRACK_COLUMNS),
            &[&id],
        )
        .await
        .context("Failed to get track")?;

    row.as_ref().map(track_from_row).transpose()
}

/// Pending tracks whose registration payment was approved
pub async fn get_pending_tracks_for_approval(pool: &Pool) -> Result<Vec<TrackRecord>> {
    let client = pool.get().await?;

    let rows = client
        .query(
            &format!(
                "SELECT {} FROM tracks t
                 WHERE t.status = 'pending'
                   AND EXISTS (SELECT 1 FROM payments p
                               WHERE p.track_id = t.id AND p.status = 'approved')
                 ORDER BY t.created_at",
                TRACK_COLUMNS
            ),
            &[],
        )
        .await
        .context("Failed to get pending tracks")?;

    rows.iter().map(track_from_row).collect()
}

/// All approved and copyrighted tracks, oldest first
///
/// The ordering is what breaks score ties during duplicate detection.
pub async fn get_corpus_tracks(pool: &Pool) -> Result<Vec<CorpusTrack>> {
    let client = pool.get().await?;

    let rows = client
        .query(
            "SELECT id, title, fingerprint, lyrics, duration, status
             FROM tracks
             WHERE status IN ('approved', 'copyrighted')
             ORDER BY created_at, id",
            &[],
        )
        .await
        .context("Failed to get corpus tracks")?;

    rows.iter()
        .map(|r| {
            let status: String = r.get(5);
            Ok(CorpusTrack {
                id: r.get(0),
                title: r.get(1),
                fingerprint: r.get(2),
                lyrics: r.get(3),
                duration: r.get(4),
                status: status.parse()?,
            })
        })
        .collect()
}

/// Whether the track has an approved payment
pub async fn has_approved_payment(pool: &Pool, track_id: Uuid) -> Result<bool> {
    let client = pool.get().await?;

    let row = client
        .query_one(
            "SELECT EXISTS (SELECT 1 FROM payments WHERE track_id = $1 AND status = 'approved')",
            &[&track_id],
        )
        .await
        .context("Failed to check payment status")?;

    Ok(row.get(0))
}

/// Approve a pending track, recording its fingerprint and duration
///
/// Returns false when the track was not pending any more.
pub async fn approve_pending_track(
    pool: &Pool,
    id: Uuid,
    fingerprint: &str,
    duration: f64,
) -> Result<bool> {
    let client = pool.get().await?;

    let updated = client
        .execute(
            "UPDATE tracks
             SET status = 'approved', fingerprint = $2, duration = $3, updated_at = now()
             WHERE id = $1 AND status = 'pending'",
            &[&id, &fingerprint, &duration],
        )
        .await
        .context("Failed to approve track")?;

    Ok(updated == 1)
}

/// Reject a pending track
///
/// Returns false when the track was not pending any more.
pub async fn reject_pending_track(pool: &Pool, id: Uuid, reason: Option<&str>) -> Result<bool> {
    let client = pool.get().await?;

    let updated = client
        .execute(
            "UPDATE tracks
             SET status = 'rejected', rejection_reason = $2, updated_at = now()
             WHERE id = $1 AND status = 'pending'",
            &[&id, &reason],
        )
        .await
        .context("Failed to reject track")?;

    Ok(updated == 1)
}

/// Mark an approved track as copyrighted with its blockchain transaction
///
/// Returns false when the track was not approved.
pub async fn mark_track_copyrighted(pool: &Pool, id: Uuid, blockchain_tx: &str) -> Result<bool> {
    let client = pool.get().await?;

    let updated = client
        .execute(
            "UPDATE tracks
             SET status = 'copyrighted', blockchain_tx = $2, updated_at = now()
             WHERE id = $1 AND status = 'approved' AND fingerprint IS NOT NULL",
            &[&id, &blockchain_tx],
        )
        .await
        .context("Failed to mark track copyrighted")?;

    Ok(updated == 1)
}
