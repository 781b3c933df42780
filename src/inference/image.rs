//! Image classification over an HTTP model server
//!
//! The backend takes raw image bytes and answers with a list of
//! `{"label", "score"}` pairs (Hugging Face image-classification format).

use async_trait::async_trait;
use serde::Deserialize;

use super::{check_status, BackendConfig, ImageClassifier, ModelError};
use crate::models::Prediction;

pub const TOP_K: usize = 5;

#[derive(Debug, Deserialize)]
struct LabelScore {
    label: String,
    score: f32,
}

pub struct HttpImageClassifier {
    config: BackendConfig,
    http_client: reqwest::Client,
}

impl HttpImageClassifier {
    pub fn new(config: BackendConfig) -> Result<Self, ModelError> {
        let http_client = config.build_client()?;
        Ok(Self { config, http_client })
    }
}

#[async_trait]
impl ImageClassifier for HttpImageClassifier {
    async fn classify(&self, image: &[u8]) -> Result<Vec<Prediction>, ModelError> {
        if image.is_empty() {
            return Err(ModelError::InvalidInput("empty image".to_string()));
        }

        tracing::debug!(bytes = image.len(), url = %self.config.url, "Classifying image");

        let request = self
            .http_client
            .post(&self.config.url)
            .header(reqwest::header::CONTENT_TYPE, "application/octet-stream")
            .body(image.to_vec());

        let response = check_status(self.config.authorize(request).send().await?).await?;
        let scores: Vec<LabelScore> = response.json().await?;

        Ok(top_predictions(scores))
    }
}

/// Clamp scores into [0, 1], sort descending and keep the top five
fn top_predictions(scores: Vec<LabelScore>) -> Vec<Prediction> {
    let mut predictions: Vec<Prediction> = scores
        .into_iter()
        .filter(|s| s.score.is_finite())
        .map(|s| Prediction {
            label: s.label,
            confidence: s.score.clamp(0.0, 1.0),
        })
        .collect();

    predictions.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
    predictions.truncate(TOP_K);
    predictions
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn score(label: &str, score: f32) -> LabelScore {
        LabelScore { label: label.to_string(), score }
    }

    #[test]
    fn keeps_top_five_descending() {
        let predictions = top_predictions(vec![
            score("a", 0.01),
            score("b", 0.40),
            score("c", 0.05),
            score("d", 0.30),
            score("e", 0.02),
            score("f", 0.22),
        ]);

        let labels: Vec<&str> = predictions.iter().map(|p| p.label.as_str()).collect();
        assert_eq!(labels, vec!["b", "d", "f", "c", "e"]);
    }

    #[test]
    fn clamps_and_drops_bad_scores() {
        let predictions = top_predictions(vec![score("x", 1.3), score("y", f32::NAN), score("z", -0.2)]);

        assert_eq!(predictions.len(), 2);
        assert_eq!(predictions[0].confidence, 1.0);
        assert_eq!(predictions[1].confidence, 0.0);
    }

    #[test]
    fn parses_backend_payload() {
        let body = r#"[{"label": "tabby, tabby cat", "score": 0.83}, {"label": "tiger cat", "score": 0.11}]"#;
        let scores: Vec<LabelScore> = serde_json::from_str(body).unwrap();
        let predictions = top_predictions(scores);
        assert_eq!(predictions[0].label, "tabby, tabby cat");
    }

    #[tokio::test]
    async fn empty_image_is_rejected_before_any_request() {
        let classifier = HttpImageClassifier::new(BackendConfig {
            url: "http://127.0.0.1:9/unused".to_string(),
            api_token: None,
            timeout: Duration::from_secs(1),
        })
        .unwrap();

        let err = classifier.classify(&[]).await.unwrap_err();
        assert!(matches!(err, ModelError::InvalidInput(_)));
    }
}
