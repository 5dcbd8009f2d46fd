pub mod voices;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;

pub use voices::{default_voice, find_voice, voices_for, Gender, Language, Voice};

/// Model used when a request does not name one
pub const DEFAULT_MODEL: &str = "FunAudioLLM/CosyVoice2-0.5B";

pub const DEFAULT_SPEED: f32 = 1.0;
pub const SPEED_RANGE: RangeInclusive<f32> = 0.25..=4.0;

/// Audio gain in dB
pub const DEFAULT_GAIN: f32 = 0.0;
pub const GAIN_RANGE: RangeInclusive<f32> = -10.0..=10.0;

/// Maximum text length, counted in characters
pub const MAX_TEXT_LENGTH: usize = 5000;

/// Output formats accepted by the vendor API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioFormat {
    #[default]
    Mp3,
    Wav,
    Opus,
    Pcm,
}

impl AudioFormat {
    pub const ALL: [AudioFormat; 4] = [
        AudioFormat::Mp3,
        AudioFormat::Wav,
        AudioFormat::Opus,
        AudioFormat::Pcm,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AudioFormat::Mp3 => "mp3",
            AudioFormat::Wav => "wav",
            AudioFormat::Opus => "opus",
            AudioFormat::Pcm => "pcm",
        }
    }

    /// Parse a format name, falling back to mp3 for anything unknown
    pub fn from_str_or_default(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "wav" => AudioFormat::Wav,
            "opus" => AudioFormat::Opus,
            "pcm" => AudioFormat::Pcm,
            _ => AudioFormat::Mp3,
        }
    }

    pub fn sample_rates(&self) -> &'static [u32] {
        match self {
            AudioFormat::Mp3 => &[32000, 44100],
            AudioFormat::Wav | AudioFormat::Pcm => &[8000, 16000, 24000, 32000, 44100],
            AudioFormat::Opus => &[48000],
        }
    }

    pub fn default_sample_rate(&self) -> u32 {
        match self {
            AudioFormat::Opus => 48000,
            _ => 44100,
        }
    }

    pub fn supports_sample_rate(&self, rate: u32) -> bool {
        self.sample_rates().contains(&rate)
    }

    /// Returns `rate` when the format allows it, otherwise the format default
    pub fn normalize_sample_rate(&self, rate: Option<u32>) -> u32 {
        match rate {
            Some(rate) if self.supports_sample_rate(rate) => rate,
            _ => self.default_sample_rate(),
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            AudioFormat::Mp3 => "audio/mpeg",
            AudioFormat::Wav => "audio/wav",
            AudioFormat::Opus => "audio/opus",
            AudioFormat::Pcm => "audio/pcm",
        }
    }
}

impl fmt::Display for AudioFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Mime type for a format name; unknown names resolve to `audio/mpeg`
pub fn mime_type_for(format: &str) -> &'static str {
    AudioFormat::from_str_or_default(format).mime_type()
}

pub fn clamp_speed(speed: f32) -> f32 {
    if speed.is_nan() {
        return DEFAULT_SPEED;
    }
    speed.clamp(*SPEED_RANGE.start(), *SPEED_RANGE.end())
}

pub fn clamp_gain(gain: f32) -> f32 {
    if gain.is_nan() {
        return DEFAULT_GAIN;
    }
    gain.clamp(*GAIN_RANGE.start(), *GAIN_RANGE.end())
}
