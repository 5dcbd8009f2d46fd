//! Synthesis client used by front ends.
//!
//! The client validates text locally, then performs exactly one network call:
//! either to the local proxy or straight to the vendor, depending on the
//! configured [`ClientStrategy`]. Whatever shape the answer takes (JSON with
//! inline Base64, a data URL, a plain URL or raw audio bytes) it is normalized
//! into a [`SynthesisResult`].

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Url;

use crate::domain::catalog::mime_type_for;
use crate::domain::tts::{
    result::{decode_base64, is_data_url, parse_data_url},
    SynthesisError, SynthesisOptions, SynthesisRequest, SynthesisResult, SynthesizeResponse,
};
use crate::infrastructure::repositories::siliconflow_tts_repository::vendor_error_message;
use crate::infrastructure::repositories::{SiliconFlowTtsRepository, TtsRepository};

pub const SYNTHESIZE_PATH: &str = "/api/synthesize";

/// Where synthesis requests are sent
pub enum ClientStrategy {
    /// Through the proxy endpoint, which holds the vendor credential
    Proxy { base_url: Url },
    /// Directly to the vendor with a credential supplied at runtime
    Direct { vendor: SiliconFlowTtsRepository },
}

impl ClientStrategy {
    pub fn proxy(base_url: &str) -> Result<Self, SynthesisError> {
        let base_url = Url::parse(base_url).map_err(|e| {
            SynthesisError::Configuration(format!("Invalid proxy URL '{}': {}", base_url, e))
        })?;
        Ok(ClientStrategy::Proxy { base_url })
    }

    pub fn direct(endpoint: String, api_key: String) -> Result<Self, SynthesisError> {
        let vendor = SiliconFlowTtsRepository::new(endpoint, Some(api_key));
        if !vendor.has_credential() {
            return Err(SynthesisError::Configuration(
                "Direct mode requires a vendor API key".to_string(),
            ));
        }
        Ok(ClientStrategy::Direct { vendor })
    }
}

#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Turn `text` into audio using `options`
    ///
    /// # Errors
    /// `Validation` for blank or oversized text (no network call is made),
    /// `Remote` for any unsuccessful or unusable upstream answer
    async fn synthesize(
        &self,
        text: &str,
        options: &SynthesisOptions,
    ) -> Result<SynthesisResult, SynthesisError>;
}

pub struct SynthesisClient {
    strategy: ClientStrategy,
    http_client: reqwest::Client,
}

impl SynthesisClient {
    pub fn new(strategy: ClientStrategy) -> Self {
        Self {
            strategy,
            http_client: reqwest::Client::new(),
        }
    }

    /// Download the audio behind a `Url` result. Relative URLs are resolved
    /// against the proxy base.
    pub async fn fetch_audio(&self, url: &str) -> Result<(Vec<u8>, String), SynthesisError> {
        let url = self.resolve_url(url)?;
        tracing::debug!(url = %url, "Fetching audio");

        let response = self
            .http_client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| SynthesisError::Remote(format!("Failed to fetch audio: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SynthesisError::Remote(vendor_error_message(
                status.as_u16(),
                &body,
            )));
        }

        let mime_type = content_type(&response).unwrap_or_else(|| "audio/mpeg".to_string());
        let bytes = response
            .bytes()
            .await
            .map_err(|e| SynthesisError::Remote(format!("Failed to read audio: {}", e)))?;

        Ok((bytes.to_vec(), mime_type))
    }

    fn resolve_url(&self, url: &str) -> Result<Url, SynthesisError> {
        let resolved = match &self.strategy {
            ClientStrategy::Proxy { base_url } => base_url.join(url),
            ClientStrategy::Direct { .. } => Url::parse(url),
        };
        resolved.map_err(|e| SynthesisError::Remote(format!("Invalid audio URL '{}': {}", url, e)))
    }

    async fn synthesize_via_proxy(
        &self,
        base_url: &Url,
        request: &SynthesisRequest,
    ) -> Result<SynthesisResult, SynthesisError> {
        let endpoint = base_url
            .join(SYNTHESIZE_PATH)
            .map_err(|e| SynthesisError::Configuration(format!("Invalid proxy URL: {}", e)))?;

        tracing::info!(
            endpoint = %endpoint,
            text_preview = %request.preview(),
            response_format = %request.format,
            sample_rate = ?request.sample_rate,
            "Sending synthesis request to proxy"
        );

        let response = self
            .http_client
            .post(endpoint)
            .json(&request.to_dto())
            .send()
            .await
            .map_err(|e| SynthesisError::Remote(format!("Speech synthesis request failed: {}", e)))?;

        let status = response.status();
        tracing::debug!(status = status.as_u16(), "Proxy responded");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SynthesisError::Remote(proxy_error_message(&body)));
        }

        // Some deployments answer with the audio itself
        if let Some(mime_type) = content_type(&response).filter(|ct| ct.starts_with("audio/")) {
            let bytes = response
                .bytes()
                .await
                .map_err(|e| SynthesisError::Remote(format!("Failed to read audio: {}", e)))?;
            return Ok(SynthesisResult::inline(bytes.to_vec(), mime_type));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| SynthesisError::Remote(format!("Failed to read response: {}", e)))?;
        let envelope: SynthesizeResponse = serde_json::from_slice(&body)
            .map_err(|e| SynthesisError::Remote(format!("Malformed synthesis response: {}", e)))?;

        normalize_envelope(envelope, request)
    }

    async fn synthesize_direct(
        &self,
        vendor: &SiliconFlowTtsRepository,
        request: &SynthesisRequest,
    ) -> Result<SynthesisResult, SynthesisError> {
        tracing::info!(
            endpoint = %vendor.endpoint(),
            text_preview = %request.preview(),
            "Sending synthesis request directly to vendor"
        );

        let bytes = vendor.synthesize(request).await?;
        if bytes.is_empty() {
            return Err(SynthesisError::Remote("Vendor returned no audio".to_string()));
        }
        Ok(SynthesisResult::inline(bytes, request.format.mime_type()))
    }
}

#[async_trait]
impl SpeechSynthesizer for SynthesisClient {
    async fn synthesize(
        &self,
        text: &str,
        options: &SynthesisOptions,
    ) -> Result<SynthesisResult, SynthesisError> {
        let request = SynthesisRequest::new(text, options)?;

        match &self.strategy {
            ClientStrategy::Proxy { base_url } => self.synthesize_via_proxy(base_url, &request).await,
            ClientStrategy::Direct { vendor } => self.synthesize_direct(vendor, &request).await,
        }
    }
}

fn content_type(response: &reqwest::Response) -> Option<String> {
    response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.split(';').next().unwrap_or(v).trim().to_string())
}

fn proxy_error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(str::to_string))
        .unwrap_or_else(|| "Speech synthesis request failed".to_string())
}

/// Collapse a proxy JSON envelope into a [`SynthesisResult`]
fn normalize_envelope(
    envelope: SynthesizeResponse,
    request: &SynthesisRequest,
) -> Result<SynthesisResult, SynthesisError> {
    if !envelope.success {
        return Err(SynthesisError::Remote(
            envelope
                .error
                .or(envelope.message)
                .unwrap_or_else(|| "Speech synthesis failed".to_string()),
        ));
    }

    let data = envelope
        .data
        .ok_or_else(|| SynthesisError::Remote("Response contained no audio".to_string()))?;

    if let Some(content) = data.audio_content {
        let decoded = if is_data_url(&content) {
            parse_data_url(&content)
        } else {
            let mime_type = data.mime_type.clone().unwrap_or_else(|| {
                mime_type_for(data.format.as_deref().unwrap_or(request.format.as_str())).to_string()
            });
            decode_base64(&content).map(|bytes| (mime_type, bytes))
        };
        let (mime_type, bytes) = decoded
            .map_err(|e| SynthesisError::Remote(format!("Malformed audio payload: {}", e)))?;

        tracing::debug!(audio_size = bytes.len(), mime_type = %mime_type, "Inline audio received");
        return Ok(SynthesisResult::Inline { bytes, mime_type });
    }

    if let Some(url) = data.audio_url {
        tracing::debug!(url = %url, "Audio URL received");
        return Ok(SynthesisResult::Url { url });
    }

    Err(SynthesisError::Remote("Response contained no audio".to_string()))
}
