use crate::domain::tts::{SynthesisError, SynthesisRequest};
use async_trait::async_trait;

/// Repository for TTS synthesis operations.
/// Abstracts the vendor speech API behind a single forward call.
///
/// Implementations are responsible for:
/// - Building the provider-specific request body
/// - Attaching the provider credential
/// - Translating provider errors into a user-facing message
#[async_trait]
pub trait TtsRepository: Send + Sync {
    /// Synthesize the request and return the raw audio bytes
    ///
    /// # Errors
    /// `Configuration` when no credential is available, `Remote` when the
    /// provider call fails or answers with a non-success status
    async fn synthesize(&self, request: &SynthesisRequest) -> Result<Vec<u8>, SynthesisError>;

    /// Whether a credential is configured for the provider
    fn has_credential(&self) -> bool;
}
