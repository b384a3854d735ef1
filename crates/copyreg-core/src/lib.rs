//! copyreg core - duplicate detection for track registration
//!
//! Fingerprints candidate audio through an external service, scores it and
//! its lyrics against the registered corpus, and drives the review
//! transitions of submitted tracks.

pub mod app_config;
pub mod config;
pub mod corpus_backend;
pub mod engine;
pub mod fingerprint_client;
pub mod review;
pub mod similarity;

pub use app_config::AppConfig;
pub use config::Thresholds;
pub use corpus_backend::{open_corpus_source, CorpusSource, FilesystemCorpus, PostgresTrackStore};
pub use engine::{
    evaluate_digest, rank_by_fingerprint, rank_by_lyrics, Candidate, CorpusEntry,
    DuplicateDetector, SimilarityMatch, Verdict,
};
pub use fingerprint_client::{AudioFingerprinter, FingerprintResult, HttpFingerprintClient};
pub use review::{ReviewError, ReviewOutcome, ReviewStep, ReviewWorkflow, TrackReviewer, TrackStore};
pub use similarity::{fingerprint_similarity, text_similarity};
