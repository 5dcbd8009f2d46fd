use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
};
use std::io::ErrorKind;
use std::sync::Arc;

use crate::error::{AppError, AppResult};
use crate::infrastructure::config::Config;

/// GET /api/audio-mock - Static test audio used by mock mode
pub async fn audio_mock(State(config): State<Arc<Config>>) -> AppResult<impl IntoResponse> {
    let audio = tokio::fs::read(&config.mock_audio_path)
        .await
        .map_err(|e| match e.kind() {
            ErrorKind::NotFound => {
                tracing::warn!(path = %config.mock_audio_path.display(), "Mock audio file missing");
                AppError::NotFound("Mock audio file does not exist".to_string())
            }
            _ => AppError::Internal(format!("Failed to read mock audio: {}", e)),
        })?;

    Ok((StatusCode::OK, [(header::CONTENT_TYPE, "audio/mpeg")], audio))
}
