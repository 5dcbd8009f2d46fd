pub mod siliconflow_tts_repository;
pub mod tts_repository;

pub use siliconflow_tts_repository::SiliconFlowTtsRepository;
pub use tts_repository::TtsRepository;
