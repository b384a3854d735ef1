//! Track review workflow
//!
//! Status transitions an administrator drives on a submitted track:
//! approval (which runs duplicate detection), rejection, and recording the
//! blockchain registration of an approved track.
//!
//! The store applies each transition with a conditional update, so a verdict
//! is persisted at most once even when two reviewers act on the same track.

use async_trait::async_trait;
use copyreg_db::{TrackRecord, TrackStatus};
use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;
use uuid::Uuid;

use crate::config::Thresholds;
use crate::corpus_backend::CorpusSource;
use crate::engine::{Candidate, DuplicateDetector, SimilarityMatch, Verdict};
use crate::fingerprint_client::AudioFingerprinter;

/// Track persistence used by the review workflow
///
/// The `mark_*` methods return false when the track was not in the
/// expected source status, in which case nothing was written.
#[async_trait]
pub trait TrackStore: CorpusSource {
    async fn get_track(&self, id: Uuid) -> anyhow::Result<Option<TrackRecord>>;

    async fn has_approved_payment(&self, id: Uuid) -> anyhow::Result<bool>;

    /// pending -> approved
    async fn mark_approved(&self, id: Uuid, fingerprint: &str, duration: f64)
        -> anyhow::Result<bool>;

    /// pending -> rejected
    async fn mark_rejected(&self, id: Uuid, reason: Option<&str>) -> anyhow::Result<bool>;

    /// approved -> copyrighted
    async fn mark_copyrighted(&self, id: Uuid, blockchain_tx: &str) -> anyhow::Result<bool>;
}

/// Errors from review operations
#[derive(Debug, Error)]
pub enum ReviewError {
    #[error("payment not approved for track {0}")]
    PaymentNotApproved(Uuid),

    #[error("track {0} not found")]
    TrackNotFound(Uuid),

    #[error("track {id} is {status}, not pending")]
    NotPending { id: Uuid, status: TrackStatus },

    #[error("track {0} was updated concurrently")]
    ConcurrentUpdate(Uuid),

    #[error("blockchain transaction hash is required")]
    MissingTxHash,

    #[error("track {0} has no fingerprint")]
    MissingFingerprint(Uuid),

    #[error("track {0} is already copyrighted")]
    AlreadyCopyrighted(Uuid),

    #[error("track {id} is {status}, only approved tracks can be copyrighted")]
    NotApproved { id: Uuid, status: TrackStatus },

    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    Success,
    Error,
}

/// One entry of the approval progress log
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReviewStep {
    pub step: &'static str,
    pub status: StepStatus,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matches: Option<Vec<SimilarityMatch>>,
}

impl ReviewStep {
    fn success(step: &'static str, message: impl Into<String>) -> Self {
        Self {
            step,
            status: StepStatus::Success,
            message: message.into(),
            matches: None,
        }
    }

    fn error(step: &'static str, message: impl Into<String>) -> Self {
        Self {
            step,
            status: StepStatus::Error,
            message: message.into(),
            matches: None,
        }
    }

    fn with_matches(mut self, matches: &[SimilarityMatch]) -> Self {
        self.matches = Some(matches.to_vec());
        self
    }
}

/// Result of an approval attempt that reached duplicate detection
#[derive(Debug, Clone, Serialize)]
pub struct ReviewOutcome {
    pub track_id: Uuid,
    /// True when the track is now approved
    pub approved: bool,
    pub verdict: Verdict,
    pub progress: Vec<ReviewStep>,
}

/// Status transitions that need no duplicate detection
pub struct TrackReviewer<S> {
    store: S,
}

impl<S: TrackStore> TrackReviewer<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Reject a pending track
    pub async fn reject(
        &self,
        track_id: Uuid,
        reason: Option<&str>,
    ) -> Result<TrackRecord, ReviewError> {
        self.check_reviewable(track_id).await?;

        let reason = reason.map(str::trim).filter(|r| !r.is_empty());
        if !self.store.mark_rejected(track_id, reason).await? {
            return Err(ReviewError::ConcurrentUpdate(track_id));
        }
        log::info!("Rejected track {}", track_id);

        self.store
            .get_track(track_id)
            .await?
            .ok_or(ReviewError::TrackNotFound(track_id))
    }

    /// Record the blockchain registration of an approved track
    pub async fn mark_copyrighted(
        &self,
        track_id: Uuid,
        blockchain_tx: &str,
    ) -> Result<TrackRecord, ReviewError> {
        let blockchain_tx = blockchain_tx.trim();
        if blockchain_tx.is_empty() {
            return Err(ReviewError::MissingTxHash);
        }

        let track = self
            .store
            .get_track(track_id)
            .await?
            .ok_or(ReviewError::TrackNotFound(track_id))?;

        match track.status {
            TrackStatus::Copyrighted => return Err(ReviewError::AlreadyCopyrighted(track_id)),
            TrackStatus::Approved => {}
            status => return Err(ReviewError::NotApproved { id: track_id, status }),
        }
        if track.fingerprint.as_deref().map_or(true, str::is_empty) {
            return Err(ReviewError::MissingFingerprint(track_id));
        }

        if !self.store.mark_copyrighted(track_id, blockchain_tx).await? {
            return Err(ReviewError::ConcurrentUpdate(track_id));
        }
        log::info!("Track {} copyrighted in tx {}", track_id, blockchain_tx);

        self.store
            .get_track(track_id)
            .await?
            .ok_or(ReviewError::TrackNotFound(track_id))
    }

    /// Payment approved and track pending
    async fn check_reviewable(&self, track_id: Uuid) -> Result<TrackRecord, ReviewError> {
        if !self.store.has_approved_payment(track_id).await? {
            return Err(ReviewError::PaymentNotApproved(track_id));
        }

        let track = self
            .store
            .get_track(track_id)
            .await?
            .ok_or(ReviewError::TrackNotFound(track_id))?;

        if track.status != TrackStatus::Pending {
            return Err(ReviewError::NotPending {
                id: track_id,
                status: track.status,
            });
        }
        Ok(track)
    }
}

/// Review operations over a track store and a fingerprinter
pub struct ReviewWorkflow<S, F> {
    reviewer: TrackReviewer<S>,
    detector: DuplicateDetector<F>,
    thresholds: Thresholds,
    tracks_dir: PathBuf,
}

impl<S: TrackStore, F: AudioFingerprinter> ReviewWorkflow<S, F> {
    pub fn new(store: S, fingerprinter: F, thresholds: Thresholds, tracks_dir: PathBuf) -> Self {
        Self {
            reviewer: TrackReviewer::new(store),
            detector: DuplicateDetector::new(fingerprinter),
            thresholds,
            tracks_dir,
        }
    }

    pub fn store(&self) -> &S {
        self.reviewer.store()
    }

    pub fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    /// Approve a pending track unless it duplicates a registered one
    ///
    /// A rejecting verdict is returned with `approved == false` and leaves
    /// the track pending.
    pub async fn approve(&self, track_id: Uuid) -> Result<ReviewOutcome, ReviewError> {
        let track = self.reviewer.check_reviewable(track_id).await?;
        let mut progress = vec![
            ReviewStep::success("payment_check", "Payment verified"),
            ReviewStep::success("track_check", "Track is ready for approval"),
        ];

        let candidate = Candidate {
            lyrics: track.lyrics.clone(),
            audio_path: self.tracks_dir.join(&track.filename),
        };
        let corpus = self.store().load_corpus().await?;

        let verdict = self
            .detector
            .evaluate(&candidate, &corpus, &self.thresholds)
            .await;
        record_verdict(&mut progress, &verdict);

        let approved = match &verdict {
            Verdict::Accepted {
                fingerprint_digest,
                duration_seconds,
            } => {
                let updated = self
                    .store()
                    .mark_approved(track_id, fingerprint_digest, *duration_seconds)
                    .await?;
                if !updated {
                    log::warn!("Track {} left pending state during review", track_id);
                    return Err(ReviewError::ConcurrentUpdate(track_id));
                }
                progress.push(ReviewStep::success("approve", "Track approved"));
                log::info!("Approved track {} ({})", track_id, track.title);
                true
            }
            _ => {
                log::info!("Track {} not approved: {}", track_id, verdict.summary());
                false
            }
        };

        Ok(ReviewOutcome {
            track_id,
            approved,
            verdict,
            progress,
        })
    }

    pub async fn reject(
        &self,
        track_id: Uuid,
        reason: Option<&str>,
    ) -> Result<TrackRecord, ReviewError> {
        self.reviewer.reject(track_id, reason).await
    }

    pub async fn mark_copyrighted(
        &self,
        track_id: Uuid,
        blockchain_tx: &str,
    ) -> Result<TrackRecord, ReviewError> {
        self.reviewer.mark_copyrighted(track_id, blockchain_tx).await
    }
}

fn record_verdict(progress: &mut Vec<ReviewStep>, verdict: &Verdict) {
    match verdict {
        Verdict::RejectedFingerprintingFailed { message } => {
            progress.push(ReviewStep::error(
                "fingerprint",
                format!("Fingerprinting failed: {}", message),
            ));
        }
        Verdict::RejectedAudioTooSimilar { top_matches, .. } => {
            progress.push(ReviewStep::success("fingerprint", "Audio fingerprint generated"));
            progress.push(
                ReviewStep::error("audio_similarity", verdict.summary()).with_matches(top_matches),
            );
        }
        Verdict::RejectedLyricsTooSimilar { top_matches, .. } => {
            progress.push(ReviewStep::success("fingerprint", "Audio fingerprint generated"));
            progress.push(ReviewStep::success("audio_similarity", "No similar audio found"));
            progress.push(
                ReviewStep::error("lyrics_similarity", verdict.summary()).with_matches(top_matches),
            );
        }
        Verdict::Accepted { .. } => {
            progress.push(ReviewStep::success("fingerprint", "Audio fingerprint generated"));
            progress.push(ReviewStep::success("audio_similarity", "No similar audio found"));
            progress.push(ReviewStep::success("lyrics_similarity", "No similar lyrics found"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::CorpusEntry;
    use crate::fingerprint_client::FingerprintResult;
    use chrono::Utc;
    use std::collections::{HashMap, HashSet};
    use std::path::Path;
    use std::sync::Mutex;

    /// In-memory track store
    #[derive(Default)]
    struct MemoryStore {
        tracks: Mutex<Vec<TrackRecord>>,
        paid: HashSet<Uuid>,
        /// Status forced onto a track right before a conditional update
        race: Mutex<HashMap<Uuid, TrackStatus>>,
    }

    impl MemoryStore {
        fn with_track(mut self, track: TrackRecord, paid: bool) -> Self {
            if paid {
                self.paid.insert(track.id);
            }
            self.tracks.lock().unwrap().push(track);
            self
        }

        fn status_of(&self, id: Uuid) -> TrackStatus {
            self.find(id).map(|t| t.status).unwrap()
        }

        fn find(&self, id: Uuid) -> Option<TrackRecord> {
            self.tracks.lock().unwrap().iter().find(|t| t.id == id).cloned()
        }

        fn transition<U>(&self, id: Uuid, from: TrackStatus, update: U) -> bool
        where
            U: FnOnce(&mut TrackRecord),
        {
            let mut tracks = self.tracks.lock().unwrap();
            let Some(track) = tracks.iter_mut().find(|t| t.id == id) else {
                return false;
            };
            if let Some(status) = self.race.lock().unwrap().remove(&id) {
                track.status = status;
            }
            if track.status != from {
                return false;
            }
            update(track);
            true
        }
    }

    #[async_trait]
    impl CorpusSource for MemoryStore {
        async fn load_corpus(&self) -> anyhow::Result<Vec<CorpusEntry>> {
            Ok(self
                .tracks
                .lock()
                .unwrap()
                .iter()
                .filter(|t| t.status.is_registered())
                .map(|t| CorpusEntry {
                    id: t.id.to_string(),
                    title: t.title.clone(),
                    fingerprint: t.fingerprint.clone(),
                    lyrics: Some(t.lyrics.clone()),
                })
                .collect())
        }
    }

    #[async_trait]
    impl TrackStore for MemoryStore {
        async fn get_track(&self, id: Uuid) -> anyhow::Result<Option<TrackRecord>> {
            Ok(self.find(id))
        }

        async fn has_approved_payment(&self, id: Uuid) -> anyhow::Result<bool> {
            Ok(self.paid.contains(&id))
        }

        async fn mark_approved(
            &self,
            id: Uuid,
            fingerprint: &str,
            duration: f64,
        ) -> anyhow::Result<bool> {
            Ok(self.transition(id, TrackStatus::Pending, |t| {
                t.status = TrackStatus::Approved;
                t.fingerprint = Some(fingerprint.to_string());
                t.duration = Some(duration);
            }))
        }

        async fn mark_rejected(&self, id: Uuid, reason: Option<&str>) -> anyhow::Result<bool> {
            Ok(self.transition(id, TrackStatus::Pending, |t| {
                t.status = TrackStatus::Rejected;
                t.rejection_reason = reason.map(str::to_string);
            }))
        }

        async fn mark_copyrighted(&self, id: Uuid, blockchain_tx: &str) -> anyhow::Result<bool> {
            Ok(self.transition(id, TrackStatus::Approved, |t| {
                t.status = TrackStatus::Copyrighted;
                t.blockchain_tx = Some(blockchain_tx.to_string());
            }))
        }
    }

    struct StubFingerprinter(FingerprintResult);

    #[async_trait]
    impl AudioFingerprinter for StubFingerprinter {
        async fn fingerprint(&self, _audio_path: &Path) -> FingerprintResult {
            self.0.clone()
        }
    }

    fn track(title: &str, lyrics: &str, status: TrackStatus, fingerprint: Option<&str>) -> TrackRecord {
        let now = Utc::now();
        TrackRecord {
            id: Uuid::new_v4(),
            title: title.to_string(),
            artist_id: Uuid::new_v4(),
            filename: format!("{}.mp3", title),
            genre: "pop".to_string(),
            release_year: "2024".to_string(),
            description: None,
            lyrics: lyrics.to_string(),
            duration: None,
            fingerprint: fingerprint.map(str::to_string),
            status,
            rejection_reason: None,
            blockchain_tx: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn workflow(
        store: MemoryStore,
        result: FingerprintResult,
    ) -> ReviewWorkflow<MemoryStore, StubFingerprinter> {
        ReviewWorkflow::new(
            store,
            StubFingerprinter(result),
            Thresholds {
                audio: 0.9,
                lyrics: 0.8,
            },
            PathBuf::from("/srv/tracks"),
        )
    }

    fn steps(outcome: &ReviewOutcome) -> Vec<(&'static str, StepStatus)> {
        outcome.progress.iter().map(|s| (s.step, s.status)).collect()
    }

    #[tokio::test]
    async fn test_approve_requires_payment() {
        let pending = track("new", "fresh words", TrackStatus::Pending, None);
        let id = pending.id;
        let review = workflow(
            MemoryStore::default().with_track(pending, false),
            FingerprintResult::success("abcd", 1.0),
        );

        let err = review.approve(id).await.unwrap_err();
        assert!(matches!(err, ReviewError::PaymentNotApproved(e) if e == id));
        assert_eq!(review.store().status_of(id), TrackStatus::Pending);
    }

    #[tokio::test]
    async fn test_approve_requires_pending_track() {
        let done = track("old", "words", TrackStatus::Approved, Some("abcd"));
        let id = done.id;
        let review = workflow(
            MemoryStore::default().with_track(done, true),
            FingerprintResult::success("abcd", 1.0),
        );

        let err = review.approve(id).await.unwrap_err();
        assert!(matches!(
            err,
            ReviewError::NotPending {
                status: TrackStatus::Approved,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_approve_unknown_track() {
        let mut store = MemoryStore::default();
        let id = Uuid::new_v4();
        store.paid.insert(id);
        let review = workflow(store, FingerprintResult::success("abcd", 1.0));

        let err = review.approve(id).await.unwrap_err();
        assert!(matches!(err, ReviewError::TrackNotFound(_)));
    }

    #[tokio::test]
    async fn test_accepted_track_is_persisted() {
        let registered = track("old", "an old ballad", TrackStatus::Copyrighted, Some("ffff0000"));
        let pending = track("new", "a brand new tune", TrackStatus::Pending, None);
        let id = pending.id;
        let review = workflow(
            MemoryStore::default()
                .with_track(registered, true)
                .with_track(pending, true),
            FingerprintResult::success("0000ffff", 201.5),
        );

        let outcome = review.approve(id).await.unwrap();
        assert!(outcome.approved);
        assert!(outcome.verdict.is_accepted());
        assert_eq!(
            steps(&outcome),
            vec![
                ("payment_check", StepStatus::Success),
                ("track_check", StepStatus::Success),
                ("fingerprint", StepStatus::Success),
                ("audio_similarity", StepStatus::Success),
                ("lyrics_similarity", StepStatus::Success),
                ("approve", StepStatus::Success),
            ]
        );

        let stored = review.store().find(id).unwrap();
        assert_eq!(stored.status, TrackStatus::Approved);
        assert_eq!(stored.fingerprint.as_deref(), Some("0000ffff"));
        assert_eq!(stored.duration, Some(201.5));
    }

    #[tokio::test]
    async fn test_duplicate_audio_is_not_persisted() {
        let registered = track("old", "an old ballad", TrackStatus::Approved, Some("abcdabcd"));
        let registered_id = registered.id;
        let pending = track("new", "a brand new tune", TrackStatus::Pending, None);
        let id = pending.id;
        let review = workflow(
            MemoryStore::default()
                .with_track(registered, true)
                .with_track(pending, true),
            FingerprintResult::success("abcdabcd", 180.0),
        );

        let outcome = review.approve(id).await.unwrap();
        assert!(!outcome.approved);
        match &outcome.verdict {
            Verdict::RejectedAudioTooSimilar { top_matches, .. } => {
                assert_eq!(top_matches[0].track_id, registered_id.to_string());
            }
            other => panic!("expected audio rejection, got {:?}", other),
        }
        let last = outcome.progress.last().unwrap();
        assert_eq!(last.step, "audio_similarity");
        assert_eq!(last.status, StepStatus::Error);
        assert_eq!(last.matches.as_ref().map(Vec::len), Some(1));

        let stored = review.store().find(id).unwrap();
        assert_eq!(stored.status, TrackStatus::Pending);
        assert!(stored.fingerprint.is_none());
    }

    #[tokio::test]
    async fn test_duplicate_lyrics_is_not_persisted() {
        let lyrics = "Hello darkness my old friend";
        let registered = track("old", lyrics, TrackStatus::Approved, Some("ffffffff"));
        let pending = track("new", lyrics, TrackStatus::Pending, None);
        let id = pending.id;
        let review = workflow(
            MemoryStore::default()
                .with_track(registered, true)
                .with_track(pending, true),
            FingerprintResult::success("00000000", 180.0),
        );

        let outcome = review.approve(id).await.unwrap();
        assert!(matches!(
            outcome.verdict,
            Verdict::RejectedLyricsTooSimilar { .. }
        ));
        assert_eq!(
            outcome.progress.last().map(|s| s.step),
            Some("lyrics_similarity")
        );
        assert_eq!(review.store().status_of(id), TrackStatus::Pending);
    }

    #[tokio::test]
    async fn test_fingerprint_failure_is_reported() {
        let pending = track("new", "words", TrackStatus::Pending, None);
        let id = pending.id;
        let review = workflow(
            MemoryStore::default().with_track(pending, true),
            FingerprintResult::failure("service unavailable"),
        );

        let outcome = review.approve(id).await.unwrap();
        assert!(!outcome.approved);
        let last = outcome.progress.last().unwrap();
        assert_eq!(last.step, "fingerprint");
        assert_eq!(last.status, StepStatus::Error);
        assert!(last.message.contains("service unavailable"));
        assert_eq!(review.store().status_of(id), TrackStatus::Pending);
    }

    #[tokio::test]
    async fn test_lost_race_on_approval() {
        let pending = track("new", "words", TrackStatus::Pending, None);
        let id = pending.id;
        let store = MemoryStore::default().with_track(pending, true);
        store
            .race
            .lock()
            .unwrap()
            .insert(id, TrackStatus::Rejected);
        let review = workflow(store, FingerprintResult::success("abcd", 1.0));

        let err = review.approve(id).await.unwrap_err();
        assert!(matches!(err, ReviewError::ConcurrentUpdate(e) if e == id));
        assert_eq!(review.store().status_of(id), TrackStatus::Rejected);
    }

    #[tokio::test]
    async fn test_reject_stores_reason() {
        let pending = track("new", "words", TrackStatus::Pending, None);
        let id = pending.id;
        let review = workflow(
            MemoryStore::default().with_track(pending, true),
            FingerprintResult::success("abcd", 1.0),
        );

        let rejected = review.reject(id, Some("  poor quality ")).await.unwrap();
        assert_eq!(rejected.status, TrackStatus::Rejected);
        assert_eq!(rejected.rejection_reason.as_deref(), Some("poor quality"));
        assert!(rejected.fingerprint.is_none());

        // Second rejection finds the track no longer pending
        let err = review.reject(id, None).await.unwrap_err();
        assert!(matches!(err, ReviewError::NotPending { .. }));
    }

    #[tokio::test]
    async fn test_reject_requires_payment() {
        let pending = track("new", "words", TrackStatus::Pending, None);
        let id = pending.id;
        let review = workflow(
            MemoryStore::default().with_track(pending, false),
            FingerprintResult::success("abcd", 1.0),
        );

        let err = review.reject(id, None).await.unwrap_err();
        assert!(matches!(err, ReviewError::PaymentNotApproved(_)));
    }

    #[tokio::test]
    async fn test_mark_copyrighted() {
        let approved = track("song", "words", TrackStatus::Approved, Some("abcd"));
        let id = approved.id;
        let review = workflow(
            MemoryStore::default().with_track(approved, true),
            FingerprintResult::success("abcd", 1.0),
        );

        let err = review.mark_copyrighted(id, "   ").await.unwrap_err();
        assert!(matches!(err, ReviewError::MissingTxHash));

        let copyrighted = review.mark_copyrighted(id, "0xdeadbeef").await.unwrap();
        assert_eq!(copyrighted.status, TrackStatus::Copyrighted);
        assert_eq!(copyrighted.blockchain_tx.as_deref(), Some("0xdeadbeef"));
        assert_eq!(copyrighted.fingerprint.as_deref(), Some("abcd"));

        let err = review.mark_copyrighted(id, "0xdeadbeef").await.unwrap_err();
        assert!(matches!(err, ReviewError::AlreadyCopyrighted(_)));
    }

    #[tokio::test]
    async fn test_mark_copyrighted_requires_approved_track() {
        let pending = track("a", "words", TrackStatus::Pending, None);
        let pending_id = pending.id;
        let mut broken = track("b", "words", TrackStatus::Approved, None);
        broken.fingerprint = Some(String::new());
        let broken_id = broken.id;
        let review = workflow(
            MemoryStore::default()
                .with_track(pending, true)
                .with_track(broken, true),
            FingerprintResult::success("abcd", 1.0),
        );

        let err = review.mark_copyrighted(pending_id, "0x1").await.unwrap_err();
        assert!(matches!(
            err,
            ReviewError::NotApproved {
                status: TrackStatus::Pending,
                ..
            }
        ));

        let err = review.mark_copyrighted(broken_id, "0x1").await.unwrap_err();
        assert!(matches!(err, ReviewError::MissingFingerprint(_)));

        let err = review
            .mark_copyrighted(Uuid::new_v4(), "0x1")
            .await
            .unwrap_err();
        assert!(matches!(err, ReviewError::TrackNotFound(_)));
    }

    #[tokio::test]
    async fn test_reviewer_needs_no_fingerprinter() {
        let pending = track("a", "words", TrackStatus::Pending, None);
        let pending_id = pending.id;
        let approved = track("b", "words", TrackStatus::Approved, Some("abcd"));
        let approved_id = approved.id;
        let reviewer = TrackReviewer::new(
            MemoryStore::default()
                .with_track(pending, true)
                .with_track(approved, true),
        );

        let rejected = reviewer.reject(pending_id, Some("duplicate")).await.unwrap();
        assert_eq!(rejected.status, TrackStatus::Rejected);

        let copyrighted = reviewer.mark_copyrighted(approved_id, "0xabc").await.unwrap();
        assert_eq!(copyrighted.status, TrackStatus::Copyrighted);
        assert_eq!(reviewer.store().status_of(pending_id), TrackStatus::Rejected);
    }

    #[test]
    fn test_outcome_serializes_progress() {
        let outcome = ReviewOutcome {
            track_id: Uuid::nil(),
            approved: false,
            verdict: Verdict::RejectedFingerprintingFailed {
                message: "down".to_string(),
            },
            progress: vec![ReviewStep::error("fingerprint", "down")],
        };
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["verdict"]["verdict"], "rejected_fingerprinting_failed");
        assert_eq!(json["progress"][0]["status"], "error");
        assert!(json["progress"][0].get("matches").is_none());
    }
}
