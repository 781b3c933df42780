//! Transaction fraud scoring

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;

use super::isolation_forest::{ForestParams, IsolationForest};
use super::scaler::StandardScaler;
use crate::models::{FraudAssessment, RiskFactor, TransactionFeatures, FEATURE_COUNT, FEATURE_NAMES};

/// Number of features reported as risk factors
pub const TOP_RISK_FACTORS: usize = 3;

const BASELINE_SIZE: usize = 1000;
const BASELINE_SEED: u64 = 2024;

#[derive(Debug, Error)]
pub enum FraudModelError {
    #[error("Baseline is empty")]
    EmptyBaseline,

    #[error("Baseline row has {got} features, expected {expected}")]
    DimensionMismatch { expected: usize, got: usize },
}

/// Scales transaction features and runs them through an Isolation Forest
#[derive(Debug, Clone)]
pub struct FraudDetector {
    scaler: StandardScaler,
    forest: IsolationForest,
}

impl FraudDetector {
    /// Fit scaler and forest on raw (unscaled) baseline rows
    pub fn train(baseline: &[Vec<f64>], params: ForestParams) -> Result<Self, FraudModelError> {
        if let Some(row) = baseline.iter().find(|r| r.len() != FEATURE_COUNT) {
            return Err(FraudModelError::DimensionMismatch { expected: FEATURE_COUNT, got: row.len() });
        }

        let scaler = StandardScaler::fit(baseline).ok_or(FraudModelError::EmptyBaseline)?;
        let scaled: Vec<Vec<f64>> = baseline.iter().map(|r| scaler.transform(r)).collect();
        let forest = IsolationForest::fit(&scaled, params).ok_or(FraudModelError::EmptyBaseline)?;

        tracing::info!(
            samples = baseline.len(),
            trees = params.n_estimators,
            contamination = params.contamination,
            "Fraud model trained"
        );

        Ok(Self { scaler, forest })
    }

    /// Train on the built-in synthetic baseline of ordinary transactions
    pub fn with_default_baseline() -> Result<Self, FraudModelError> {
        Self::train(&synthetic_baseline(BASELINE_SIZE, BASELINE_SEED), ForestParams::default())
    }

    pub fn assess(&self, features: &TransactionFeatures) -> FraudAssessment {
        let normalized = self.scaler.transform(&features.to_vector());
        let anomaly_score = f64::from(self.forest.predict(&normalized));

        let fraud_probability = (1.0 - anomaly_score) / 2.0;

        FraudAssessment {
            fraud_probability,
            is_fraudulent: anomaly_score < 0.0,
            risk_factors: rank_risk_factors(&normalized),
            confidence: ((fraud_probability - 0.5).abs() * 2.0).min(1.0),
        }
    }
}

/// Features ordered by absolute normalized magnitude, top three
fn rank_risk_factors(normalized: &[f64]) -> Vec<RiskFactor> {
    let mut factors: Vec<RiskFactor> = FEATURE_NAMES
        .iter()
        .zip(normalized)
        .map(|(name, value)| RiskFactor {
            factor: (*name).to_string(),
            importance: value.abs(),
        })
        .collect();

    factors.sort_by(|a, b| b.importance.total_cmp(&a.importance));
    factors.truncate(TOP_RISK_FACTORS);
    factors
}

/// Seeded set of ordinary daytime card transactions
fn synthetic_baseline(size: usize, seed: u64) -> Vec<Vec<f64>> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..size)
        .map(|_| {
            TransactionFeatures {
                amount: Some(rng.gen_range(5.0..250.0)),
                frequency: Some(rng.gen_range(1.0..10.0)),
                time_of_day: Some(rng.gen_range(7.0..22.0)),
                location_risk_score: Some(rng.gen_range(0.0..0.3)),
                previous_activity: Some(rng.gen_range(5.0..100.0)),
                device_risk_score: Some(rng.gen_range(0.0..0.3)),
            }
            .to_vector()
            .to_vec()
        })
        .collect()
}
