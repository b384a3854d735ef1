//! Fingerprinting service response body
//!
//! The service answers a multipart upload with a JSON document. Only the
//! digest, duration, success flag and message drive duplicate detection; the
//! remaining fields are kept for logging and auditing.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// JSON body returned by the fingerprinting endpoint
///
/// Fields that only feed logs are kept as raw JSON so that a type change on
/// the service side cannot make a usable digest unparseable. `null` reads as
/// the default everywhere.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FingerprintResponse {
    /// Opaque digest used as the audio identity
    #[serde(default, deserialize_with = "null_as_default")]
    pub fingerprint_hash: String,
    /// Duration of the analysed audio (seconds)
    #[serde(default, deserialize_with = "null_as_default")]
    pub duration: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sample_rate: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_version: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_hashes: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash_map: Option<Value>,
    /// `false` when the service could not analyse the audio
    #[serde(default, deserialize_with = "null_as_default")]
    pub success: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub message: String,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl FingerprintResponse {
    /// Parse a response body
    pub fn from_json(body: &str) -> Result<Self, crate::FormatError> {
        Ok(serde_json::from_str(body)?)
    }

    /// True when the service reported success and produced a digest
    pub fn is_usable(&self) -> bool {
        self.success && !self.fingerprint_hash.is_empty()
    }
}
