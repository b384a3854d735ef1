//! copyreg database layer
//!
//! PostgreSQL persistence for tracks, registration payments and
//! administrative settings

pub mod connection;
pub mod models;
pub mod operations;
pub mod schema;
pub mod settings;

// Re-export commonly used types
pub use connection::{create_pool, test_connection, DbPool};
pub use models::{
    CorpusTrack, NewSystemSetting, NewTrack, SettingType, SystemSetting, TrackRecord,
    TrackStatus, UnknownVariant,
};
pub use operations::{
    approve_pending_track, get_corpus_tracks, get_pending_tracks_for_approval, get_track_by_id,
    has_approved_payment, insert_track, mark_track_copyrighted, reject_pending_track,
};
pub use schema::ensure_schema;
pub use settings::{get_all_settings, get_setting, seed_defaults, update_setting};
