pub mod audio_mock;
pub mod health;
pub mod synthesize;
