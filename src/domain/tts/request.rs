use super::dto::SynthesizeRequest;
use super::error::SynthesisError;
use crate::domain::catalog::{
    self, clamp_gain, clamp_speed, AudioFormat, Language, DEFAULT_GAIN, DEFAULT_MODEL,
    DEFAULT_SPEED, MAX_TEXT_LENGTH,
};

/// Parameters picked by the user before submitting text
#[derive(Debug, Clone, PartialEq)]
pub struct SynthesisOptions {
    pub model: String,
    pub voice: String,
    pub speed: f32,
    pub gain: f32,
    pub format: AudioFormat,
    pub sample_rate: Option<u32>,
}

impl Default for SynthesisOptions {
    fn default() -> Self {
        Self::for_language(Language::default())
    }
}

impl SynthesisOptions {
    pub fn for_language(language: Language) -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            voice: catalog::default_voice(language).value.clone(),
            speed: DEFAULT_SPEED,
            gain: DEFAULT_GAIN,
            format: AudioFormat::default(),
            sample_rate: None,
        }
    }
}

/// A validated request, ready to be dispatched to the proxy or the vendor.
///
/// `speed` and `gain` are clamped to their ranges and `sample_rate`, when
/// present, always belongs to the rates allowed for `format`.
#[derive(Debug, Clone, PartialEq)]
pub struct SynthesisRequest {
    pub text: String,
    pub model: String,
    pub voice: String,
    pub speed: f32,
    pub gain: f32,
    pub format: AudioFormat,
    pub sample_rate: Option<u32>,
}

impl SynthesisRequest {
    /// Build a request from user options. The sample rate is always filled in,
    /// falling back to the format default.
    pub fn new(text: impl Into<String>, options: &SynthesisOptions) -> Result<Self, SynthesisError> {
        let text = text.into();
        validate_text(&text)?;

        let sample_rate = options.format.normalize_sample_rate(options.sample_rate);
        if options.sample_rate.is_some_and(|rate| rate != sample_rate) {
            tracing::debug!(
                format = %options.format,
                requested = ?options.sample_rate,
                substituted = sample_rate,
                "Sample rate not supported by format, using default"
            );
        }

        Ok(Self {
            text,
            model: options.model.clone(),
            voice: options.voice.clone(),
            speed: clamp_speed(options.speed),
            gain: clamp_gain(options.gain),
            format: options.format,
            sample_rate: Some(sample_rate),
        })
    }

    pub fn to_dto(&self) -> SynthesizeRequest {
        SynthesizeRequest {
            input: Some(self.text.clone()),
            model: Some(self.model.clone()),
            voice: Some(self.voice.clone()),
            speed: Some(self.speed),
            gain: Some(self.gain),
            response_format: Some(self.format.as_str().to_string()),
            sample_rate: self.sample_rate,
        }
    }

    /// Text preview safe to put in logs
    pub fn preview(&self) -> String {
        preview(&self.text)
    }
}

/// Proxy-side conversion: defaults fill missing fields and an absent sample
/// rate stays absent so the vendor picks its own.
impl TryFrom<SynthesizeRequest> for SynthesisRequest {
    type Error = SynthesisError;

    fn try_from(dto: SynthesizeRequest) -> Result<Self, Self::Error> {
        let text = dto.input.unwrap_or_default();
        validate_text(&text)?;

        let format = dto
            .response_format
            .as_deref()
            .map(AudioFormat::from_str_or_default)
            .unwrap_or_default();

        Ok(Self {
            text,
            model: dto.model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            voice: dto
                .voice
                .unwrap_or_else(|| catalog::default_voice(Language::default()).value.clone()),
            speed: clamp_speed(dto.speed.unwrap_or(DEFAULT_SPEED)),
            gain: clamp_gain(dto.gain.unwrap_or(DEFAULT_GAIN)),
            format,
            sample_rate: dto
                .sample_rate
                .map(|rate| format.normalize_sample_rate(Some(rate))),
        })
    }
}

/// Reject blank text and text longer than [`MAX_TEXT_LENGTH`] characters
pub fn validate_text(text: &str) -> Result<(), SynthesisError> {
    if text.trim().is_empty() {
        return Err(SynthesisError::Validation(
            "Please provide valid text content".to_string(),
        ));
    }

    if text.chars().count() > MAX_TEXT_LENGTH {
        return Err(SynthesisError::Validation(format!(
            "Text exceeds the maximum length of {} characters",
            MAX_TEXT_LENGTH
        )));
    }

    Ok(())
}

pub(crate) fn preview(text: &str) -> String {
    if text.chars().count() > 50 {
        format!("{}...", text.chars().take(50).collect::<String>())
    } else {
        text.to_string()
    }
}
