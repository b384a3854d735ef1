//! Duplicate-detection engine
//!
//! Decides whether a candidate track may be registered. The candidate audio
//! is fingerprinted first, then its digest is compared with every registered
//! fingerprint and its lyrics with every registered lyric sheet. The first
//! stage whose best score reaches its threshold rejects the candidate.

use copyreg_db::CorpusTrack;
use copyreg_fp::CorpusRecord;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::config::Thresholds;
use crate::fingerprint_client::AudioFingerprinter;
use crate::similarity::{fingerprint_similarity, text_similarity};


/// Maximum number of matches reported with a rejection
pub const MAX_REPORTED_MATCHES: usize = 3;

/// A track submitted for registration
#[derive(Debug, Clone)]
pub struct Candidate {
    pub lyrics: String,
    pub audio_path: PathBuf,
}

/// A registered track the candidate is compared against
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorpusEntry {
    pub id: String,
    pub title: String,
    pub fingerprint: Option<String>,
    pub lyrics: Option<String>,
}

impl From<CorpusRecord> for CorpusEntry {
    fn from(record: CorpusRecord) -> Self {
        Self {
            id: record.id,
            title: record.title,
            fingerprint: record.fingerprint,
            lyrics: record.lyrics,
        }
    }
}

impl From<CorpusTrack> for CorpusEntry {
    fn from(track: CorpusTrack) -> Self {
        Self {
            id: track.id.to_string(),
            title: track.title,
            fingerprint: track.fingerprint,
            lyrics: track.lyrics,
        }
    }
}

/// One scored corpus entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarityMatch {
    pub track_id: String,
    pub title: String,
    pub score: f64,
}

/// Outcome of a duplicate check
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "verdict", rename_all = "snake_case")]
pub enum Verdict {
    Accepted {
        fingerprint_digest: String,
        duration_seconds: f64,
    },
    RejectedFingerprintingFailed {
        message: String,
    },
    RejectedAudioTooSimilar {
        top_matches: Vec<SimilarityMatch>,
        best_score: f64,
    },
    RejectedLyricsTooSimilar {
        top_matches: Vec<SimilarityMatch>,
        best_score: f64,
    },
}

impl Verdict {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Verdict::Accepted { .. })
    }

    /// Human-readable summary used in logs and review progress
    pub fn summary(&self) -> String {
        match self {
            Verdict::Accepted { .. } => "No similar tracks found".to_string(),
            Verdict::RejectedFingerprintingFailed { message } => {
                format!("Audio fingerprinting failed: {}", message)
            }
            Verdict::RejectedAudioTooSimilar { best_score, .. } => format!(
                "Track rejected: audio similarity {:.1}%",
                best_score * 100.0
            ),
            Verdict::RejectedLyricsTooSimilar { best_score, .. } => format!(
                "Track rejected: lyrics similarity {:.1}%",
                best_score * 100.0
            ),
        }
    }
}

/// Score every corpus entry that has a fingerprint against `digest`
///
/// Sorted by descending score; equal scores keep corpus order.
pub fn rank_by_fingerprint(digest: &str, corpus: &[CorpusEntry]) -> Vec<SimilarityMatch> {
    rank(corpus, |entry| {
        entry
            .fingerprint
            .as_deref()
            .filter(|fp| !fp.is_empty())
            .map(|fp| fingerprint_similarity(digest, fp))
    })
}

/// Score every corpus entry that has lyrics against `lyrics`
pub fn rank_by_lyrics(lyrics: &str, corpus: &[CorpusEntry]) -> Vec<SimilarityMatch> {
    rank(corpus, |entry| {
        entry
            .lyrics
            .as_deref()
            .filter(|l| !l.is_empty())
            .map(|l| text_similarity(lyrics, l))
    })
}

fn rank<S>(corpus: &[CorpusEntry], score: S) -> Vec<SimilarityMatch>
where
    S: Fn(&CorpusEntry) -> Option<f64>,
{
    let mut matches: Vec<SimilarityMatch> = corpus
        .iter()
        .filter_map(|entry| {
            score(entry).map(|score| SimilarityMatch {
                track_id: entry.id.clone(),
                title: entry.title.clone(),
                score,
            })
        })
        .collect();

    // sort_by is stable
    matches.sort_by(|a, b| b.score.total_cmp(&a.score));
    matches
}

/// Run the corpus comparison stages for an already fingerprinted candidate
///
/// An empty digest cannot identify any audio and is treated as a failed
/// fingerprint.
pub fn evaluate_digest(
    digest: &str,
    duration_seconds: f64,
    lyrics: &str,
    corpus: &[CorpusEntry],
    thresholds: &Thresholds,
) -> Verdict {
    if digest.trim().is_empty() {
        return Verdict::RejectedFingerprintingFailed {
            message: "empty fingerprint digest".to_string(),
        };
    }

    let audio_matches = rank_by_fingerprint(digest, corpus);
    log::debug!(
        "Compared fingerprint with {} registered tracks",
        audio_matches.len()
    );
    if let Some(best) = audio_matches.first() {
        log::debug!(
            "Best audio match {} ({}) score {:.4}",
            best.track_id,
            best.title,
            best.score
        );
        if best.score >= thresholds.audio {
            let best_score = best.score;
            log::info!(
                "Audio too similar: {:.4} >= {:.4}",
                best_score,
                thresholds.audio
            );
            return Verdict::RejectedAudioTooSimilar {
                top_matches: top(audio_matches),
                best_score,
            };
        }
    }

    if lyrics.trim().is_empty() {
        log::debug!("Candidate has no lyrics, skipping lyrics comparison");
    } else {
        let lyrics_matches = rank_by_lyrics(lyrics, corpus);
        log::debug!(
            "Compared lyrics with {} registered tracks",
            lyrics_matches.len()
        );
        if let Some(best) = lyrics_matches.first() {
            if best.score >= thresholds.lyrics {
                let best_score = best.score;
                log::info!(
                    "Lyrics too similar: {:.4} >= {:.4}",
                    best_score,
                    thresholds.lyrics
                );
                return Verdict::RejectedLyricsTooSimilar {
                    top_matches: top(lyrics_matches),
                    best_score,
                };
            }
        }
    }

    Verdict::Accepted {
        fingerprint_digest: digest.to_string(),
        duration_seconds,
    }
}

fn top(mut matches: Vec<SimilarityMatch>) -> Vec<SimilarityMatch> {
    matches.truncate(MAX_REPORTED_MATCHES);
    matches
}

/// Duplicate detector over an audio fingerprinter
///
/// Holds no mutable state; the corpus and thresholds are supplied per call.
pub struct DuplicateDetector<F> {
    fingerprinter: F,
}

impl<F: AudioFingerprinter> DuplicateDetector<F> {
    pub fn new(fingerprinter: F) -> Self {
        Self { fingerprinter }
    }

    pub fn fingerprinter(&self) -> &F {
        &self.fingerprinter
    }

    /// Evaluate a candidate against the corpus
    pub async fn evaluate(
        &self,
        candidate: &Candidate,
        corpus: &[CorpusEntry],
        thresholds: &Thresholds,
    ) -> Verdict {
        log::info!(
            "Fingerprinting {} against {} registered tracks",
            candidate.audio_path.display(),
            corpus.len()
        );

        let result = self.fingerprinter.fingerprint(&candidate.audio_path).await;
        if !result.success {
            log::info!("Fingerprinting failed: {}", result.message);
            return Verdict::RejectedFingerprintingFailed {
                message: result.message,
            };
        }

        let verdict = evaluate_digest(
            &result.digest,
            result.duration_seconds,
            &candidate.lyrics,
            corpus,
            thresholds,
        );
        log::info!("{}", verdict.summary());
        verdict
    }
}
