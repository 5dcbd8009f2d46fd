pub mod dto;
pub mod error;
pub mod request;
pub mod result;
pub mod service;

pub use dto::{AudioPayload, SynthesizeRequest, SynthesizeResponse};
pub use error::SynthesisError;
pub use request::{validate_text, SynthesisOptions, SynthesisRequest};
pub use result::SynthesisResult;
pub use service::{ProxySynthesis, SynthesisMode, TtsService, TtsServiceApi, MOCK_AUDIO_URL};
