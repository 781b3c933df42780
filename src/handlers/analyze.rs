//! Upload analysis handlers

use axum::{
    extract::{Multipart, State},
    Json,
};

use crate::models::{AnalysisDetails, AnalysisRecord, NewAnalysis};
use crate::upload::{read_upload, TempUpload};
use crate::{AppResult, AppState};

/// Classify an uploaded image and record the top predictions
pub async fn image(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<Json<AnalysisRecord>> {
    let upload = read_upload(&mut multipart).await?;

    let predictions = state.image_model.classify(&upload.bytes).await?;

    let record = state
        .store
        .append(NewAnalysis::now(AnalysisDetails::Image { predictions }));

    tracing::info!(id = record.id, file = %upload.file_name, "Image analyzed");

    Ok(Json(record))
}

/// Transcribe an uploaded audio clip and record the result
pub async fn voice(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<Json<AnalysisRecord>> {
    let upload = read_upload(&mut multipart).await?;

    // removed on drop, whichever way this handler exits
    let temp = TempUpload::write(&state.config.upload_dir, &upload.file_name, &upload.bytes).await?;

    let transcription = state.voice_model.transcribe(temp.path()).await?;

    let record = state.store.append(NewAnalysis::now(transcription));

    tracing::info!(
        id = record.id,
        file = %upload.file_name,
        "Voice analyzed"
    );

    Ok(Json(record))
}
