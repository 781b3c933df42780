//! AI for Social Good - Analysis API Server
//!
//! Exposes image classification, speech transcription and transaction
//! fraud scoring over REST, keeping every result in an in-memory history.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    ANALYSIS SERVER                          │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ┌───────────┐  ┌───────────────┐  ┌─────────────────────┐ │
//! │  │  API      │  │  Model        │  │  Analysis History   │ │
//! │  │  Gateway  │─►│  Adapters     │─►│  (append-only log,  │ │
//! │  │  (Axum)   │  │  image/voice/ │  │   query + stats)    │ │
//! │  │           │  │  fraud        │  │                     │ │
//! │  └───────────┘  └──────┬────────┘  └─────────────────────┘ │
//! │                        ▼                                    │
//! │         external model servers (HTTP) / in-process forest   │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod handlers;
pub mod history;
pub mod inference;
pub mod models;
pub mod upload;

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub use error::{AppError, AppResult};

use config::Config;
use history::AnalysisStore;
use inference::{FraudDetector, HttpImageClassifier, HttpSpeechTranscriber, ImageClassifier, SpeechTranscriber};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub store: Arc<AnalysisStore>,
    pub image_model: Arc<dyn ImageClassifier>,
    pub voice_model: Arc<dyn SpeechTranscriber>,
    pub fraud_model: Arc<FraudDetector>,
}

impl AppState {
    pub fn new(
        config: Config,
        image_model: Arc<dyn ImageClassifier>,
        voice_model: Arc<dyn SpeechTranscriber>,
        fraud_model: Arc<FraudDetector>,
    ) -> Self {
        Self {
            config,
            store: Arc::new(AnalysisStore::new()),
            image_model,
            voice_model,
            fraud_model,
        }
    }

    /// Wire the HTTP model adapters and train the fraud model
    pub fn from_config(config: Config) -> anyhow::Result<Self> {
        let image_model = HttpImageClassifier::new(config.image_backend())?;
        let voice_model = HttpSpeechTranscriber::new(config.voice_backend())?;
        let fraud_model = FraudDetector::with_default_baseline()?;

        Ok(Self::new(
            config,
            Arc::new(image_model),
            Arc::new(voice_model),
            Arc::new(fraud_model),
        ))
    }
}

/// Create the main router with all routes
pub fn create_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/api/health", get(handlers::health::check))
        .route("/api/analyze/voice", post(handlers::analyze::voice))
        .route("/api/analyze/image", post(handlers::analyze::image))
        .route("/api/analyses", get(handlers::analyses::list))
        .route("/api/detect/fraud", post(handlers::fraud::detect))
        .layer(DefaultBodyLimit::max(state.config.max_upload_bytes));

    Router::new()
        .merge(api_routes)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        )
        .with_state(state)
}
