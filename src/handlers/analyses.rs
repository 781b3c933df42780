//! Analysis history handler

use axum::{extract::{State, Query}, Json};
use serde::Deserialize;

use crate::AppState;
use crate::history::{AnalysesResponse, AnalysisQuery};

/// Raw query string. `limit` stays a string so that junk values fall back
/// to the default instead of rejecting the request.
#[derive(Debug, Deserialize, Default)]
pub struct AnalysesParams {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub limit: Option<String>,
}

/// List recent analyses with global statistics
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<AnalysesParams>,
) -> Json<AnalysesResponse> {
    let query = AnalysisQuery::from_params(params.kind, params.limit.as_deref());
    Json(state.store.query(&query))
}
