use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use chrono::Utc;
use std::sync::Arc;

use crate::{
    domain::tts::{
        result::encode_base64, AudioPayload, SynthesisRequest, SynthesisResult,
        SynthesizeRequest, SynthesizeResponse, TtsServiceApi,
    },
    error::{AppError, AppResult},
};

pub struct SynthesizeController {
    tts_service: Arc<dyn TtsServiceApi>,
}

impl SynthesizeController {
    pub fn new(tts_service: Arc<dyn TtsServiceApi>) -> Self {
        Self { tts_service }
    }

    /// POST /api/synthesize - Forward text to the vendor and return the audio
    pub async fn synthesize(
        State(controller): State<Arc<SynthesizeController>>,
        payload: Result<Json<SynthesizeRequest>, JsonRejection>,
    ) -> AppResult<Json<SynthesizeResponse>> {
        let Json(body) = payload.map_err(|e| AppError::BadRequest(e.body_text()))?;

        let request = SynthesisRequest::try_from(body)?;
        let outcome = controller.tts_service.synthesize(request).await?;

        let mut data = AudioPayload {
            format: Some(outcome.format.as_str().to_string()),
            duration: outcome.duration,
            created_at: Some(Utc::now()),
            ..Default::default()
        };

        match outcome.result {
            SynthesisResult::Inline { bytes, mime_type } => {
                data.audio_content = Some(encode_base64(&bytes));
                data.mime_type = Some(mime_type);
            }
            SynthesisResult::Url { url } => {
                data.audio_url = Some(url);
            }
        }

        Ok(Json(SynthesizeResponse {
            success: true,
            message: Some("Speech synthesized successfully".to_string()),
            data: Some(data),
            error: None,
        }))
    }

    /// Any other method on /api/synthesize
    pub async fn method_not_allowed() -> AppError {
        AppError::MethodNotAllowed
    }
}
