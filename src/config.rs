//! Configuration module

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::inference::BackendConfig;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,

    /// Directory for transient audio uploads
    pub upload_dir: PathBuf,

    /// Request body cap for uploads, in bytes
    pub max_upload_bytes: usize,

    /// Image classification backend endpoint
    pub image_model_url: String,

    /// Whisper transcription backend endpoint
    pub voice_model_url: String,

    /// Bearer token sent to model backends
    pub model_api_token: Option<String>,

    /// Per-request timeout for model backends, in seconds
    pub model_timeout_secs: u64,

    /// Environment (development, production)
    pub environment: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 5000,
            upload_dir: PathBuf::from("uploads"),
            max_upload_bytes: 16 * 1024 * 1024,
            image_model_url: "http://localhost:8501/classify".to_string(),
            voice_model_url: "http://localhost:8502/v1/audio/transcriptions".to_string(),
            model_api_token: None,
            model_timeout_secs: 60,
            environment: "development".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),

            upload_dir: env::var("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.upload_dir),

            max_upload_bytes: env::var("MAX_UPLOAD_BYTES")
                .ok()
                .and_then(|b| b.parse().ok())
                .unwrap_or(defaults.max_upload_bytes),

            image_model_url: env::var("IMAGE_MODEL_URL")
                .unwrap_or(defaults.image_model_url),

            voice_model_url: env::var("VOICE_MODEL_URL")
                .unwrap_or(defaults.voice_model_url),

            model_api_token: env::var("MODEL_API_TOKEN")
                .ok()
                .filter(|t| !t.is_empty()),

            model_timeout_secs: env::var("MODEL_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.model_timeout_secs),

            environment: env::var("ENVIRONMENT")
                .unwrap_or(defaults.environment),
        }
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn image_backend(&self) -> BackendConfig {
        self.backend(&self.image_model_url)
    }

    pub fn voice_backend(&self) -> BackendConfig {
        self.backend(&self.voice_model_url)
    }

    fn backend(&self, url: &str) -> BackendConfig {
        BackendConfig {
            url: url.to_string(),
            api_token: self.model_api_token.clone(),
            timeout: Duration::from_secs(self.model_timeout_secs),
        }
    }
}
