//! Corpus snapshot files
//!
//! A snapshot holds the approved and copyrighted tracks that a candidate is
//! compared against, so duplicate checks can run without database access.
//! Snapshots are stored as JSON or BSON; the format is picked from the file
//! extension.

use crate::FormatError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Current snapshot format version
pub const SNAPSHOT_VERSION: &str = "1.0";

/// Complete snapshot file structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorpusFile {
    pub version: String,
    pub metadata: CorpusFileMetadata,
    pub tracks: Vec<CorpusRecord>,
}

/// Where and when the snapshot was taken
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorpusFileMetadata {
    /// Human readable source, e.g. `postgresql://host/db`
    pub source: String,
    pub exported_at: String,
    pub num_tracks: usize,
}

/// One previously registered track
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorpusRecord {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fingerprint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lyrics: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
}

impl CorpusFile {
    /// Create an empty snapshot
    pub fn new(source: String) -> Self {
        Self {
            version: SNAPSHOT_VERSION.to_string(),
            metadata: CorpusFileMetadata {
                source,
                exported_at: chrono::Utc::now().to_rfc3339(),
                num_tracks: 0,
            },
            tracks: Vec::new(),
        }
    }

    /// Add a track
    pub fn add_track(&mut self, record: CorpusRecord) {
        self.tracks.push(record);
        self.metadata.num_tracks = self.tracks.len();
    }

    /// Save to JSON file
    pub fn save(&self, path: &Path) -> Result<(), FormatError> {
        let json_str = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json_str).map_err(|e| FormatError::io(path, e))?;
        Ok(())
    }

    /// Save to BSON file
    pub fn save_bson(&self, path: &Path) -> Result<(), FormatError> {
        let bytes = bson::to_vec(self)?;
        std::fs::write(path, bytes).map_err(|e| FormatError::io(path, e))?;
        Ok(())
    }

    /// Load from JSON file
    pub fn load(path: &Path) -> Result<Self, FormatError> {
        let json_str = std::fs::read_to_string(path).map_err(|e| FormatError::io(path, e))?;
        let file: CorpusFile = serde_json::from_str(&json_str)?;
        file.check_version()?;
        Ok(file)
    }

    /// Load from BSON file
    pub fn load_bson(path: &Path) -> Result<Self, FormatError> {
        let bytes = std::fs::read(path).map_err(|e| FormatError::io(path, e))?;
        let file: CorpusFile = bson::from_slice(&bytes)?;
        file.check_version()?;
        Ok(file)
    }

    /// Load choosing JSON or BSON from the extension
    pub fn load_auto(path: &Path) -> Result<Self, FormatError> {
        match extension(path).as_str() {
            "json" => Self::load(path),
            "bson" => Self::load_bson(path),
            other => Err(FormatError::UnsupportedExtension(other.to_string())),
        }
    }

    /// Save choosing JSON or BSON from the extension
    pub fn save_auto(&self, path: &Path) -> Result<(), FormatError> {
        match extension(path).as_str() {
            "json" => self.save(path),
            "bson" => self.save_bson(path),
            other => Err(FormatError::UnsupportedExtension(other.to_string())),
        }
    }

    fn check_version(&self) -> Result<(), FormatError> {
        // Minor bumps only add optional fields
        let major = |v: &str| v.split('.').next().unwrap_or_default().to_string();
        if major(&self.version) != major(SNAPSHOT_VERSION) {
            return Err(FormatError::UnsupportedVersion {
                found: self.version.clone(),
                expected: SNAPSHOT_VERSION.to_string(),
            });
        }
        Ok(())
    }
}

fn extension(path: &Path) -> String {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_ascii_lowercase())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> CorpusFile {
        let mut file = CorpusFile::new("test".to_string());
        file.add_track(CorpusRecord {
            id: "t1".to_string(),
            title: "Bongo Flava".to_string(),
            fingerprint: Some("abcd1234".to_string()),
            lyrics: Some("nakupenda sana".to_string()),
            status: Some("approved".to_string()),
            duration: Some(201.0),
        });
        file.add_track(CorpusRecord {
            id: "t2".to_string(),
            title: "Instrumental".to_string(),
            fingerprint: Some("ffff0000".to_string()),
            lyrics: None,
            status: Some("copyrighted".to_string()),
            duration: None,
        });
        file
    }

    #[test]
    fn test_add_track_updates_count() {
        let file = sample();
        assert_eq!(file.metadata.num_tracks, 2);
        assert_eq!(file.version, SNAPSHOT_VERSION);
    }

    #[test]
    fn test_json_and_bson_files_load_back() {
        let dir = tempfile::tempdir().unwrap();
        let file = sample();

        let json_path = dir.path().join("corpus.json");
        file.save_auto(&json_path).unwrap();
        let from_json = CorpusFile::load_auto(&json_path).unwrap();
        assert_eq!(from_json.tracks, file.tracks);

        let bson_path = dir.path().join("corpus.bson");
        file.save_auto(&bson_path).unwrap();
        let from_bson = CorpusFile::load_auto(&bson_path).unwrap();
        assert_eq!(from_bson.tracks, file.tracks);
    }

    #[test]
    fn test_unknown_extension_is_rejected() {
        let err = CorpusFile::load_auto(Path::new("corpus.csv")).unwrap_err();
        assert!(matches!(err, FormatError::UnsupportedExtension(ext) if ext == "csv"));
    }

    #[test]
    fn test_newer_major_version_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("corpus.json");
        let mut file = sample();
        file.version = "2.0".to_string();
        file.save(&path).unwrap();

        let err = CorpusFile::load(&path).unwrap_err();
        assert!(matches!(err, FormatError::UnsupportedVersion { .. }));
    }

    #[test]
    fn test_missing_optional_fields_default_to_none() {
        let json = r#"{
            "version": "1.0",
            "metadata": {"source": "x", "exported_at": "2025-06-14T00:00:00Z", "num_tracks": 1},
            "tracks": [{"id": "a", "title": "A"}]
        }"#;
        let file: CorpusFile = serde_json::from_str(json).unwrap();
        assert_eq!(file.tracks[0].fingerprint, None);
        assert_eq!(file.tracks[0].lyrics, None);
    }
}
