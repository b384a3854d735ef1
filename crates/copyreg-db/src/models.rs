use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// Review status of a track
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackStatus {
    Pending,
    Approved,
    Rejected,
    Copyrighted,
}

impl TrackStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrackStatus::Pending => "pending",
            TrackStatus::Approved => "approved",
            TrackStatus::Rejected => "rejected",
            TrackStatus::Copyrighted => "copyrighted",
        }
    }

    /// Statuses whose tracks form the duplicate-detection corpus
    pub fn is_registered(&self) -> bool {
        matches!(self, TrackStatus::Approved | TrackStatus::Copyrighted)
    }
}

impl fmt::Display for TrackStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("unknown value '{value}' for {kind}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

impl FromStr for TrackStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(TrackStatus::Pending),
            "approved" => Ok(TrackStatus::Approved),
            "rejected" => Ok(TrackStatus::Rejected),
            "copyrighted" => Ok(TrackStatus::Copyrighted),
            other => Err(UnknownVariant {
                kind: "track status",
                value: other.to_string(),
            }),
        }
    }
}

/// A track row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackRecord {
    pub id: Uuid,
    pub title: String,
    pub artist_id: Uuid,
    /// Stored audio file name, relative to the tracks directory
    pub filename: String,
    pub genre: String,
    pub release_year: String,
    pub description: Option<String>,
    pub lyrics: String,
    pub duration: Option<f64>,
    /// Set iff status is approved or copyrighted
    pub fingerprint: Option<String>,
    pub status: TrackStatus,
    pub rejection_reason: Option<String>,
    pub blockchain_tx: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input structure for creating a new pending track
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTrack {
    pub title: String,
    pub artist_id: Uuid,
    pub filename: String,
    pub genre: String,
    pub release_year: String,
    pub description: Option<String>,
    pub lyrics: String,
}

/// The subset of a registered track used for duplicate detection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorpusTrack {
    pub id: Uuid,
    pub title: String,
    pub fingerprint: Option<String>,
    pub lyrics: Option<String>,
    /// Seconds, recorded at approval
    pub duration: Option<f64>,
    pub status: TrackStatus,
}

/// Value type of a system setting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SettingType {
    String,
    Number,
    Boolean,
}

impl SettingType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SettingType::String => "string",
            SettingType::Number => "number",
            SettingType::Boolean => "boolean",
        }
    }
}

impl FromStr for SettingType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "string" => Ok(SettingType::String),
            "number" => Ok(SettingType::Number),
            "boolean" => Ok(SettingType::Boolean),
            other => Err(UnknownVariant {
                kind: "setting type",
                value: other.to_string(),
            }),
        }
    }
}

/// Administrative key/value setting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemSetting {
    pub id: Uuid,
    pub key: String,
    pub value: String,
    pub description: Option<String>,
    pub setting_type: SettingType,
}

/// Input structure for seeding a setting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSystemSetting {
    pub key: String,
    pub value: String,
    pub description: Option<String>,
    pub setting_type: SettingType,
}
