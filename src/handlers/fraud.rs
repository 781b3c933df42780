//! Fraud detection handler

use axum::{extract::{rejection::JsonRejection, State}, Json};
use validator::Validate;

use crate::models::{AnalysisRecord, NewAnalysis, TransactionFeatures};
use crate::{AppResult, AppState};

/// Score a transaction and record the assessment
pub async fn detect(
    State(state): State<AppState>,
    payload: Result<Json<TransactionFeatures>, JsonRejection>,
) -> AppResult<Json<AnalysisRecord>> {
    let Json(features) = payload?;
    features.validate()?;

    let assessment = state.fraud_model.assess(&features);
    if assessment.is_fraudulent {
        tracing::warn!(risk_factors = ?assessment.risk_factors, "Transaction flagged as fraudulent");
    }

    let record = state.store.append(NewAnalysis::now(assessment));
    tracing::info!(id = record.id, "Fraud check recorded");

    Ok(Json(record))
}
