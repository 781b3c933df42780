//! Speech transcription over an OpenAI-compatible Whisper server

use std::path::Path;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;

use super::{check_status, BackendConfig, ModelError, SpeechTranscriber};
use crate::models::Transcription;

#[derive(Debug, Deserialize)]
struct VerboseTranscription {
    text: String,
    #[serde(default)]
    language: Option<String>,
    #[serde(default)]
    segments: Vec<Segment>,
}

#[derive(Debug, Deserialize)]
struct Segment {
    avg_logprob: f64,
}

pub struct HttpSpeechTranscriber {
    config: BackendConfig,
    http_client: reqwest::Client,
}

impl HttpSpeechTranscriber {
    pub fn new(config: BackendConfig) -> Result<Self, ModelError> {
        let http_client = config.build_client()?;
        Ok(Self { config, http_client })
    }
}

#[async_trait]
impl SpeechTranscriber for HttpSpeechTranscriber {
    async fn transcribe(&self, audio_path: &Path) -> Result<Transcription, ModelError> {
        let audio = tokio::fs::read(audio_path).await?;
        let file_name = audio_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "audio".to_string());

        tracing::debug!(bytes = audio.len(), file = %file_name, "Transcribing audio");

        let form = Form::new()
            .part("file", Part::bytes(audio).file_name(file_name))
            .text("response_format", "verbose_json");

        let request = self.http_client.post(&self.config.url).multipart(form);
        let response = check_status(self.config.authorize(request).send().await?).await?;
        let result: VerboseTranscription = response.json().await?;

        Ok(Transcription {
            confidence: mean_confidence(&result.segments),
            language: result.language.unwrap_or_else(|| "unknown".to_string()),
            text: result.text,
        })
    }
}

/// Mean per-segment confidence, where a segment's confidence is its
/// average token probability. No segments means no confidence.
fn mean_confidence(segments: &[Segment]) -> f32 {
    if segments.is_empty() {
        return 0.0;
    }
    let sum: f64 = segments
        .iter()
        .map(|s| s.avg_logprob.exp().clamp(0.0, 1.0))
        .sum();
    (sum / segments.len() as f64) as f32
}
