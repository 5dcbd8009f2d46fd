use super::tts_repository::TtsRepository;
use crate::domain::catalog::AudioFormat;
use crate::domain::tts::{SynthesisError, SynthesisRequest};
use async_trait::async_trait;
use serde::Serialize;

pub const DEFAULT_ENDPOINT: &str = "https://api.siliconflow.cn/v1/audio/speech";

/// Marker the CosyVoice2 model expects ahead of the text to speak
const END_OF_PROMPT: &str = "<|endofprompt|>";

/// Request body of the SiliconFlow speech endpoint
#[derive(Debug, Serialize)]
pub struct VendorSpeechRequest<'a> {
    pub model: &'a str,
    pub input: String,
    pub voice: &'a str,
    pub speed: f32,
    pub gain: f32,
    pub response_format: AudioFormat,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sample_rate: Option<u32>,
    pub stream: bool,
}

impl<'a> VendorSpeechRequest<'a> {
    pub fn from_request(request: &'a SynthesisRequest) -> Self {
        let input = if request.text.contains(END_OF_PROMPT) {
            request.text.clone()
        } else {
            format!("{}{}", END_OF_PROMPT, request.text)
        };

        Self {
            model: &request.model,
            input,
            voice: &request.voice,
            speed: request.speed,
            gain: request.gain,
            response_format: request.format,
            sample_rate: request.sample_rate,
            stream: false,
        }
    }
}

/// SiliconFlow implementation of TTS repository
pub struct SiliconFlowTtsRepository {
    endpoint: String,
    api_key: Option<String>,
    http_client: reqwest::Client,
}

impl SiliconFlowTtsRepository {
    pub fn new(endpoint: String, api_key: Option<String>) -> Self {
        Self {
            endpoint,
            api_key: api_key.filter(|key| !key.trim().is_empty()),
            http_client: reqwest::Client::new(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl TtsRepository for SiliconFlowTtsRepository {
    async fn synthesize(&self, request: &SynthesisRequest) -> Result<Vec<u8>, SynthesisError> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            SynthesisError::Configuration("SiliconFlow API key is not configured".to_string())
        })?;

        let start_time = std::time::Instant::now();
        let body = VendorSpeechRequest::from_request(request);

        tracing::info!(
            endpoint = %self.endpoint,
            model = %body.model,
            voice = %body.voice,
            speed = body.speed,
            gain = body.gain,
            response_format = %body.response_format,
            sample_rate = ?body.sample_rate,
            text_preview = %request.preview(),
            "Calling SiliconFlow TTS API"
        );

        let response = self
            .http_client
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, endpoint = %self.endpoint, "SiliconFlow request failed");
                SynthesisError::Remote(format!("API request failed: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!(
                status = status.as_u16(),
                body = %error_text,
                "SiliconFlow API returned an error"
            );
            return Err(SynthesisError::Remote(vendor_error_message(
                status.as_u16(),
                &error_text,
            )));
        }

        let audio_bytes = response
            .bytes()
            .await
            .map_err(|e| SynthesisError::Remote(format!("Failed to read audio body: {}", e)))?
            .to_vec();

        tracing::info!(
            provider = "siliconflow",
            latency_ms = start_time.elapsed().as_millis(),
            audio_size_bytes = audio_bytes.len(),
            "TTS synthesis completed"
        );

        Ok(audio_bytes)
    }

    fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }
}

/// Message for a failed vendor call: the `error` string of a JSON body when
/// present, otherwise a generic message carrying the status code
pub fn vendor_error_message(status: u16, body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            value
                .get("error")
                .and_then(|e| e.as_str())
                .map(str::to_string)
        })
        .unwrap_or_else(|| format!("API request failed: {}", status))
}
