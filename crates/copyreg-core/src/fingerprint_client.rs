//! Audio fingerprinting client
//!
//! Uploads an audio file to the external fingerprinting service and turns
//! whatever comes back (digest, service-side failure, HTTP error, transport
//! error) into a single `FingerprintResult`.

use async_trait::async_trait;
use copyreg_fp::FingerprintResponse;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Serialize;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

use crate::app_config::FingerprintServiceConfig;

/// Multipart form field carrying the audio bytes
const AUDIO_FIELD: &str = "audio_file";

/// Outcome of fingerprinting one audio file
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FingerprintResult {
    pub digest: String,
    pub duration_seconds: f64,
    pub success: bool,
    pub message: String,
}

impl FingerprintResult {
    pub fn success(digest: impl Into<String>, duration_seconds: f64) -> Self {
        Self {
            digest: digest.into(),
            duration_seconds,
            success: true,
            message: String::new(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            digest: String::new(),
            duration_seconds: 0.0,
            success: false,
            message: message.into(),
        }
    }
}

impl From<FingerprintResponse> for FingerprintResult {
    fn from(response: FingerprintResponse) -> Self {
        if response.is_usable() {
            Self {
                digest: response.fingerprint_hash,
                duration_seconds: response.duration,
                success: true,
                message: response.message,
            }
        } else if response.message.is_empty() {
            Self::failure("fingerprinting service returned no fingerprint")
        } else {
            Self::failure(response.message)
        }
    }
}

/// Produces a fingerprint for an audio file
#[async_trait]
pub trait AudioFingerprinter: Send + Sync {
    /// Fingerprint the audio at `audio_path`
    ///
    /// Never fails: every problem is reported through a failure result.
    async fn fingerprint(&self, audio_path: &Path) -> FingerprintResult;
}

/// Errors from a single request to the fingerprinting service
#[derive(Debug, Error)]
pub enum FingerprintError {
    #[error("failed to read audio file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("fingerprinting service unreachable: {0}")]
    Network(#[from] reqwest::Error),

    #[error("fingerprinting service returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("invalid response from fingerprinting service: {0}")]
    Parse(#[from] copyreg_fp::FormatError),
}

/// HTTP client for the fingerprinting service
pub struct HttpFingerprintClient {
    http_client: Client,
    endpoint: String,
}

impl HttpFingerprintClient {
    /// Create a client; without a timeout the transport default applies
    pub fn new(endpoint: impl Into<String>, timeout: Option<Duration>) -> anyhow::Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            http_client: builder.build()?,
            endpoint: endpoint.into(),
        })
    }

    pub fn from_config(config: &FingerprintServiceConfig) -> anyhow::Result<Self> {
        Self::new(
            config.url.clone(),
            config.timeout_secs.map(Duration::from_secs),
        )
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Upload the file and parse the response body
    pub async fn request(&self, audio_path: &Path) -> Result<FingerprintResponse, FingerprintError> {
        let bytes = tokio::fs::read(audio_path)
            .await
            .map_err(|source| FingerprintError::Io {
                path: audio_path.display().to_string(),
                source,
            })?;

        let file_name = audio_path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("audio")
            .to_string();

        log::debug!(
            "Uploading {} ({} bytes) to {}",
            audio_path.display(),
            bytes.len(),
            self.endpoint
        );

        let form = Form::new().part(AUDIO_FIELD, Part::bytes(bytes).file_name(file_name));
        let response = self
            .http_client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            // Prefer the service's own explanation when the body carries one
            let message = FingerprintResponse::from_json(&body)
                .ok()
                .map(|r| r.message)
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| truncate(&body, 200));
            return Err(FingerprintError::Status {
                status: status.as_u16(),
                message,
            });
        }

        Ok(FingerprintResponse::from_json(&body)?)
    }
}

#[async_trait]
impl AudioFingerprinter for HttpFingerprintClient {
    async fn fingerprint(&self, audio_path: &Path) -> FingerprintResult {
        match self.request(audio_path).await {
            Ok(response) => {
                log::debug!(
                    "Fingerprint service answered success={} model={:?} hashes={:?} duration={:.1}s",
                    response.success,
                    response.model_version,
                    response.total_hashes,
                    response.duration
                );
                FingerprintResult::from(response)
            }
            Err(e) => {
                log::warn!("Fingerprinting {} failed: {}", audio_path.display(), e);
                FingerprintResult::failure(e.to_string())
            }
        }
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    let trimmed = text.trim();
    if trimmed.chars().count() <= max_chars {
        trimmed.to_string()
    } else {
        let mut out: String = trimmed.chars().take(max_chars).collect();
        out.push('…');
        out
    }
}
