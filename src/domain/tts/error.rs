use crate::error::AppError;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SynthesisError {
    /// Bad, missing or oversized input; never retried
    #[error("{0}")]
    Validation(String),
    /// Server-side credential or endpoint missing
    #[error("{0}")]
    Configuration(String),
    /// Upstream call failed or returned something unusable
    #[error("{0}")]
    Remote(String),
    /// Inline audio payload could not be decoded
    #[error("{0}")]
    Decode(String),
}

impl From<SynthesisError> for AppError {
    fn from(err: SynthesisError) -> Self {
        match err {
            SynthesisError::Validation(msg) => AppError::BadRequest(msg),
            SynthesisError::Configuration(msg) => AppError::Configuration(msg),
            SynthesisError::Remote(msg) => AppError::ExternalService(msg),
            SynthesisError::Decode(msg) => AppError::Internal(msg),
        }
    }
}
