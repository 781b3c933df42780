//! Model adapters
//!
//! Image classification and speech transcription are served by external
//! model backends reached over HTTP. Fraud scoring runs in process on a
//! small Isolation Forest.
//!
//! ```text
//!   handler ──► ImageClassifier ──► HTTP image model (label/score list)
//!          ──► SpeechTranscriber ──► HTTP Whisper server (verbose_json)
//!          ──► FraudDetector ──► StandardScaler ──► IsolationForest
//! ```

pub mod fraud;
pub mod image;
pub mod isolation_forest;
pub mod scaler;
pub mod voice;

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{Prediction, Transcription};

pub use fraud::{FraudDetector, FraudModelError};
pub use image::HttpImageClassifier;
pub use voice::HttpSpeechTranscriber;

/// Errors raised by model adapters
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("Invalid model input: {0}")]
    InvalidInput(String),

    #[error("Model backend unreachable: {0}")]
    Transport(String),

    #[error("Model backend returned {status}: {body}")]
    Backend { status: u16, body: String },

    #[error("Unexpected model response: {0}")]
    InvalidResponse(String),

    #[error("Failed to read input file: {0}")]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for ModelError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ModelError::InvalidResponse(err.to_string())
        } else {
            ModelError::Transport(err.to_string())
        }
    }
}

/// Top-5 image classification
#[async_trait]
pub trait ImageClassifier: Send + Sync {
    /// Labels sorted by descending confidence, at most five
    async fn classify(&self, image: &[u8]) -> Result<Vec<Prediction>, ModelError>;
}

/// Audio-file transcription
#[async_trait]
pub trait SpeechTranscriber: Send + Sync {
    async fn transcribe(&self, audio_path: &Path) -> Result<Transcription, ModelError>;
}

/// Connection settings shared by the HTTP model adapters
#[derive(Debug, Clone)]
pub struct BackendConfig {
    pub url: String,
    pub api_token: Option<String>,
    pub timeout: Duration,
}

impl BackendConfig {
    fn build_client(&self) -> Result<reqwest::Client, ModelError> {
        reqwest::Client::builder()
            .user_agent(concat!("analysis-server/", env!("CARGO_PKG_VERSION")))
            .timeout(self.timeout)
            .build()
            .map_err(|e| ModelError::Transport(e.to_string()))
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

/// Turn a non-2xx backend response into `ModelError::Backend`
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ModelError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(ModelError::Backend { status: status.as_u16(), body })
}
