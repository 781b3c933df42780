//! Fraud detection request model

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Feature names in model input order
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "amount",
    "frequency",
    "time_of_day",
    "location_risk_score",
    "previous_activity",
    "device_risk_score",
];

pub const FEATURE_COUNT: usize = 6;

/// Transaction features posted to `/api/detect/fraud`.
/// Missing fields count as zero.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct TransactionFeatures {
    #[serde(default)]
    pub amount: Option<f64>,
    #[serde(default)]
    pub frequency: Option<f64>,
    /// Hour of day, 0-24
    #[serde(default)]
    #[validate(range(min = 0.0, max = 24.0))]
    pub time_of_day: Option<f64>,
    #[serde(default)]
    pub location_risk_score: Option<f64>,
    #[serde(default)]
    pub previous_activity: Option<f64>,
    #[serde(default)]
    pub device_risk_score: Option<f64>,
}

impl TransactionFeatures {
    /// Raw feature vector with `time_of_day` mapped onto [0, 1]
    pub fn to_vector(&self) -> [f64; FEATURE_COUNT] {
        [
            self.amount.unwrap_or(0.0),
            self.frequency.unwrap_or(0.0),
            self.time_of_day.unwrap_or(0.0) / 24.0,
            self.location_risk_score.unwrap_or(0.0),
            self.previous_activity.unwrap_or(0.0),
            self.device_risk_score.unwrap_or(0.0),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_default_to_zero() {
        let features: TransactionFeatures = serde_json::from_str(r#"{"amount": 12.5}"#).unwrap();
        assert_eq!(features.to_vector(), [12.5, 0.0, 0.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn time_of_day_is_scaled_to_unit_interval() {
        let features = TransactionFeatures {
            time_of_day: Some(18.0),
            ..Default::default()
        };
        assert_eq!(features.to_vector()[2], 0.75);
    }

    #[test]
    fn time_of_day_out_of_range_fails_validation() {
        let features = TransactionFeatures {
            time_of_day: Some(25.0),
            ..Default::default()
        };
        assert!(features.validate().is_err());

        let features = TransactionFeatures {
            time_of_day: Some(23.5),
            ..Default::default()
        };
        assert!(features.validate().is_ok());
    }
}
