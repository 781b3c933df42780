//! Analysis record model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Discriminator for the three analysis shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisKind {
    Image,
    Voice,
    Fraud,
}

impl AnalysisKind {
    pub const ALL: [AnalysisKind; 3] = [AnalysisKind::Image, AnalysisKind::Voice, AnalysisKind::Fraud];

    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisKind::Image => "image",
            AnalysisKind::Voice => "voice",
            AnalysisKind::Fraud => "fraud",
        }
    }

    /// Parse a `type` query value. Unknown values yield `None`.
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == value)
    }
}

impl std::fmt::Display for AnalysisKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One image classification label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub label: String,
    pub confidence: f32,
}

/// A named feature ranked by its contribution to a fraud score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskFactor {
    pub factor: String,
    pub importance: f64,
}

/// Fraud scorer output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FraudAssessment {
    pub fraud_probability: f64,
    pub is_fraudulent: bool,
    pub risk_factors: Vec<RiskFactor>,
    pub confidence: f64,
}

/// Speech transcription output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transcription {
    pub text: String,
    pub language: String,
    pub confidence: f32,
}

/// Per-kind payload. Serialized inline next to `id` and `timestamp`,
/// tagged by `type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum AnalysisDetails {
    Image {
        predictions: Vec<Prediction>,
    },
    Voice {
        text: String,
        confidence: f32,
        language: String,
    },
    Fraud(FraudAssessment),
}

impl AnalysisDetails {
    pub fn kind(&self) -> AnalysisKind {
        match self {
            AnalysisDetails::Image { .. } => AnalysisKind::Image,
            AnalysisDetails::Voice { .. } => AnalysisKind::Voice,
            AnalysisDetails::Fraud(_) => AnalysisKind::Fraud,
        }
    }
}

impl From<Transcription> for AnalysisDetails {
    fn from(t: Transcription) -> Self {
        AnalysisDetails::Voice {
            text: t.text,
            confidence: t.confidence,
            language: t.language,
        }
    }
}

impl From<FraudAssessment> for AnalysisDetails {
    fn from(a: FraudAssessment) -> Self {
        AnalysisDetails::Fraud(a)
    }
}

/// A completed analysis, as stored and as returned by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRecord {
    pub id: u64,
    pub timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub details: AnalysisDetails,
}

impl AnalysisRecord {
    pub fn kind(&self) -> AnalysisKind {
        self.details.kind()
    }
}

/// A record before the store has assigned its id
#[derive(Debug, Clone)]
pub struct NewAnalysis {
    pub timestamp: DateTime<Utc>,
    pub details: AnalysisDetails,
}

impl NewAnalysis {
    /// Stamp `details` with the current time
    pub fn now(details: impl Into<AnalysisDetails>) -> Self {
        Self {
            timestamp: Utc::now(),
            details: details.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn record_serializes_flat_with_type_tag() {
        let record = AnalysisRecord {
            id: 7,
            timestamp: Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
            details: AnalysisDetails::Voice {
                text: "hello".to_string(),
                confidence: 0.5,
                language: "en".to_string(),
            },
        };

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["type"], "voice");
        assert_eq!(json["text"], "hello");
        assert_eq!(json["language"], "en");
        assert_eq!(json["timestamp"], "2024-03-01T12:00:00Z");
    }

    #[test]
    fn fraud_record_inlines_assessment() {
        let record = AnalysisRecord {
            id: 1,
            timestamp: Utc::now(),
            details: FraudAssessment {
                fraud_probability: 1.0,
                is_fraudulent: true,
                risk_factors: vec![RiskFactor { factor: "amount".to_string(), importance: 3.2 }],
                confidence: 1.0,
            }
            .into(),
        };

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["type"], "fraud");
        assert_eq!(json["is_fraudulent"], true);
        assert_eq!(json["risk_factors"][0]["factor"], "amount");
    }

    #[test]
    fn kind_parse_rejects_unknown_values() {
        assert_eq!(AnalysisKind::parse("image"), Some(AnalysisKind::Image));
        assert_eq!(AnalysisKind::parse("fraud"), Some(AnalysisKind::Fraud));
        assert_eq!(AnalysisKind::parse("Image"), None);
        assert_eq!(AnalysisKind::parse("video"), None);
    }
}
