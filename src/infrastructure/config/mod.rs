use serde::Deserialize;
use std::env;
use std::path::PathBuf;

use crate::domain::tts::SynthesisMode;
use crate::infrastructure::repositories::siliconflow_tts_repository::DEFAULT_ENDPOINT;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub environment: Environment,
    pub log_format: LogFormat,
    // Vendor API
    pub tts_api_endpoint: String,
    pub tts_api_key: Option<String>,
    pub use_real_api: bool,
    // Development audio
    pub mock_audio_path: PathBuf,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Production,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

impl Config {
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        dotenvy::dotenv().ok();

        let config = Config {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()?,
            environment: match env::var("ENVIRONMENT")
                .unwrap_or_else(|_| "development".to_string())
                .as_str()
            {
                "production" => Environment::Production,
                _ => Environment::Development,
            },
            log_format: match env::var("LOG_FORMAT")
                .unwrap_or_else(|_| "pretty".to_string())
                .as_str()
            {
                "json" => LogFormat::Json,
                _ => LogFormat::Pretty,
            },
            tts_api_endpoint: env::var("TTS_API_ENDPOINT")
                .unwrap_or_else(|_| DEFAULT_ENDPOINT.to_string()),
            tts_api_key: env::var("TTS_API_KEY")
                .ok()
                .filter(|key| !key.trim().is_empty()),
            use_real_api: env::var("USE_REAL_API")
                .map(|s| s.to_lowercase() == "true")
                .unwrap_or(false),
            mock_audio_path: env::var("MOCK_AUDIO_PATH")
                .unwrap_or_else(|_| "public/test-audio.mp3".to_string())
                .into(),
        };

        Ok(config)
    }

    pub fn is_development(&self) -> bool {
        self.environment == Environment::Development
    }

    /// Mock audio is served in development unless the real API is enabled
    pub fn synthesis_mode(&self) -> SynthesisMode {
        if self.is_development() && !self.use_real_api {
            SynthesisMode::Mock
        } else {
            SynthesisMode::Live
        }
    }
}
