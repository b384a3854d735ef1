//! Similarity thresholds and settings defaults
//!
//! The default values live here and nowhere else: the TOML config, the
//! environment overrides and the settings seeder all start from them.

use copyreg_db::{NewSystemSetting, SettingType};
use serde::{Deserialize, Serialize};

/// Default audio similarity threshold
pub const DEFAULT_AUDIO_THRESHOLD: f64 = 0.98;
/// Default lyrics similarity threshold
pub const DEFAULT_LYRICS_THRESHOLD: f64 = 0.8;

pub const AUDIO_THRESHOLD_KEY: &str = "AUDIO_SIMILARITY_THRESHOLD";
pub const LYRICS_THRESHOLD_KEY: &str = "LYRICS_SIMILARITY_THRESHOLD";

/// Scores at or above a threshold reject the candidate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    #[serde(default = "default_audio")]
    pub audio: f64,
    #[serde(default = "default_lyrics")]
    pub lyrics: f64,
}

fn default_audio() -> f64 {
    DEFAULT_AUDIO_THRESHOLD
}
fn default_lyrics() -> f64 {
    DEFAULT_LYRICS_THRESHOLD
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            audio: DEFAULT_AUDIO_THRESHOLD,
            lyrics: DEFAULT_LYRICS_THRESHOLD,
        }
    }
}

impl Thresholds {
    /// Validate that both thresholds are in [0, 1]
    pub fn validate(&self) -> anyhow::Result<()> {
        if parse_threshold(self.audio).is_none() {
            anyhow::bail!("audio threshold must be within [0, 1], got {}", self.audio);
        }
        if parse_threshold(self.lyrics).is_none() {
            anyhow::bail!("lyrics threshold must be within [0, 1], got {}", self.lyrics);
        }
        Ok(())
    }

    /// Resolve thresholds from a settings lookup
    ///
    /// Missing, unparseable or out-of-range values keep the fallback.
    pub fn from_settings<L>(lookup: L, fallback: &Thresholds) -> Self
    where
        L: Fn(&str) -> Option<String>,
    {
        let resolve = |key: &str, fallback: f64| match lookup(key) {
            None => fallback,
            Some(raw) => match raw.trim().parse::<f64>().ok().and_then(parse_threshold) {
                Some(value) => value,
                None => {
                    log::warn!(
                        "Ignoring invalid {} value '{}', using {}",
                        key,
                        raw,
                        fallback
                    );
                    fallback
                }
            },
        };

        Self {
            audio: resolve(AUDIO_THRESHOLD_KEY, fallback.audio),
            lyrics: resolve(LYRICS_THRESHOLD_KEY, fallback.lyrics),
        }
    }

    /// Settings rows the seeder creates when missing
    pub fn seed_settings(&self) -> Vec<NewSystemSetting> {
        vec![
            NewSystemSetting {
                key: AUDIO_THRESHOLD_KEY.to_string(),
                value: self.audio.to_string(),
                description: Some("Audio similarity threshold (0.0-1.0)".to_string()),
                setting_type: SettingType::Number,
            },
            NewSystemSetting {
                key: LYRICS_THRESHOLD_KEY.to_string(),
                value: self.lyrics.to_string(),
                description: Some("Lyrics similarity threshold (0.0-1.0)".to_string()),
                setting_type: SettingType::Number,
            },
        ]
    }
}

fn parse_threshold(value: f64) -> Option<f64> {
    (value.is_finite() && (0.0..=1.0).contains(&value)).then_some(value)
}
