use super::error::SynthesisError;
use super::request::SynthesisRequest;
use super::result::SynthesisResult;
use crate::domain::catalog::AudioFormat;
use crate::infrastructure::repositories::TtsRepository;
use async_trait::async_trait;
use std::sync::Arc;

/// Path of the development audio served instead of calling the vendor
pub const MOCK_AUDIO_URL: &str = "/api/audio-mock";

/// Seconds of speech assumed per character for mock audio
const MOCK_SECONDS_PER_CHAR: f32 = 0.1;

/// How the proxy produces audio
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SynthesisMode {
    /// Forward to the vendor API
    Live,
    /// Answer with the locally cached mock resource
    Mock,
}

#[derive(Debug, Clone)]
pub struct ProxySynthesis {
    pub result: SynthesisResult,
    pub format: AudioFormat,
    /// Estimated duration in seconds, mock mode only
    pub duration: Option<f32>,
}

pub struct TtsService {
    tts_repo: Arc<dyn TtsRepository>,
    mode: SynthesisMode,
}

impl TtsService {
    pub fn new(tts_repo: Arc<dyn TtsRepository>, mode: SynthesisMode) -> Self {
        Self { tts_repo, mode }
    }
}

#[async_trait]
pub trait TtsServiceApi: Send + Sync {
    /// Forward a validated request to the vendor
    ///
    /// This operation:
    /// - Fails with `Configuration` when the server holds no credential
    /// - Returns mock audio by URL in mock mode
    /// - Otherwise forwards once, without retries, and returns the bytes inline
    async fn synthesize(&self, request: SynthesisRequest) -> Result<ProxySynthesis, SynthesisError>;
}

#[async_trait]
impl TtsServiceApi for TtsService {
    async fn synthesize(&self, request: SynthesisRequest) -> Result<ProxySynthesis, SynthesisError> {
        tracing::info!(
            text_preview = %request.preview(),
            model = %request.model,
            voice = %request.voice,
            speed = request.speed,
            gain = request.gain,
            response_format = %request.format,
            sample_rate = ?request.sample_rate,
            "TTS synthesis request"
        );

        // Credential is required even when answering with mock audio
        if !self.tts_repo.has_credential() {
            tracing::error!("TTS API key is not configured");
            return Err(SynthesisError::Configuration(
                "TTS API key is not configured".to_string(),
            ));
        }

        if self.mode == SynthesisMode::Mock {
            let duration = request.text.chars().count() as f32 * MOCK_SECONDS_PER_CHAR;
            tracing::info!(duration, "Returning mock audio");
            return Ok(ProxySynthesis {
                result: SynthesisResult::url(MOCK_AUDIO_URL),
                format: request.format,
                duration: Some(duration),
            });
        }

        let audio_data = self.tts_repo.synthesize(&request).await?;

        tracing::info!(audio_size = audio_data.len(), "Audio received from vendor");

        Ok(ProxySynthesis {
            result: SynthesisResult::inline(audio_data, request.format.mime_type()),
            format: request.format,
            duration: None,
        })
    }
}
