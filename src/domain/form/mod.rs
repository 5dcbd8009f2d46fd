use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::client::SpeechSynthesizer;
use crate::domain::catalog::{self, clamp_gain, clamp_speed, AudioFormat, Language};
use crate::domain::playback::{AudioSource, ObjectUrlStore, Player};
use crate::domain::tts::SynthesisOptions;

/// How long the success notification stays visible
pub const NOTIFICATION_DURATION: Duration = Duration::from_secs(3);

const EMPTY_TEXT_MESSAGE: &str = "Please enter text to convert";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormStatus {
    Idle,
    Processing,
    Success,
    Error(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Audio produced and loaded into the player
    Completed,
    /// The submission failed; the message is also in the form status
    Failed(String),
    /// Another request was already in flight, nothing was sent
    Ignored,
}

struct FormState {
    language: Language,
    text: String,
    options: SynthesisOptions,
    status: FormStatus,
    notification: Option<u64>,
    notification_seq: u64,
}

/// Resets the in-flight flag however the submission ends
struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Text-to-speech form: input fields, submission state and the player
pub struct SpeechForm {
    synthesizer: Arc<dyn SpeechSynthesizer>,
    state: Arc<Mutex<FormState>>,
    in_flight: AtomicBool,
    player: Mutex<Player>,
    notification_duration: Duration,
}

impl SpeechForm {
    pub fn new(synthesizer: Arc<dyn SpeechSynthesizer>, store: ObjectUrlStore) -> Self {
        let language = Language::default();
        Self {
            synthesizer,
            state: Arc::new(Mutex::new(FormState {
                language,
                text: String::new(),
                options: SynthesisOptions::for_language(language),
                status: FormStatus::Idle,
                notification: None,
                notification_seq: 0,
            })),
            in_flight: AtomicBool::new(false),
            player: Mutex::new(Player::new(store)),
            notification_duration: NOTIFICATION_DURATION,
        }
    }

    pub fn with_notification_duration(mut self, duration: Duration) -> Self {
        self.notification_duration = duration;
        self
    }

    pub fn status(&self) -> FormStatus {
        self.state.lock().status.clone()
    }

    pub fn language(&self) -> Language {
        self.state.lock().language
    }

    pub fn text(&self) -> String {
        self.state.lock().text.clone()
    }

    pub fn options(&self) -> SynthesisOptions {
        self.state.lock().options.clone()
    }

    /// Inputs and the submit action are disabled while a request is in flight
    pub fn is_input_disabled(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    pub fn notification_visible(&self) -> bool {
        self.state.lock().notification.is_some()
    }

    /// Field setters are no-ops while a request is in flight
    pub fn set_text(&self, text: impl Into<String>) {
        self.update(|state| state.text = text.into());
    }

    /// Switch language and reset the voice to that language's default
    pub fn set_language(&self, language: Language) {
        self.update(|state| {
            state.language = language;
            state.options.voice = catalog::default_voice(language).value.clone();
        });
    }

    pub fn set_voice(&self, voice: impl Into<String>) {
        self.update(|state| state.options.voice = voice.into());
    }

    pub fn set_speed(&self, speed: f32) {
        self.update(|state| state.options.speed = clamp_speed(speed));
    }

    pub fn set_gain(&self, gain: f32) {
        self.update(|state| state.options.gain = clamp_gain(gain));
    }

    /// Keep the selected sample rate when the new format allows it
    pub fn set_format(&self, format: AudioFormat) {
        self.update(|state| {
            state.options.format = format;
            state.options.sample_rate =
                Some(format.normalize_sample_rate(state.options.sample_rate));
        });
    }

    pub fn set_sample_rate(&self, sample_rate: u32) {
        self.update(|state| {
            state.options.sample_rate =
                Some(state.options.format.normalize_sample_rate(Some(sample_rate)));
        });
    }

    fn update(&self, f: impl FnOnce(&mut FormState)) {
        if self.is_input_disabled() {
            tracing::debug!("Input disabled while synthesis is in progress");
            return;
        }
        f(&mut self.state.lock());
    }

    /// Run `f` against the player
    pub fn with_player<R>(&self, f: impl FnOnce(&mut Player) -> R) -> R {
        f(&mut self.player.lock())
    }

    /// Submit the current text. At most one submission runs at a time; a
    /// failure keeps the previously loaded audio.
    pub async fn submit(&self) -> SubmitOutcome {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            tracing::warn!("Synthesis already in progress, ignoring submit");
            return SubmitOutcome::Ignored;
        }
        let _guard = InFlightGuard(&self.in_flight);

        let (text, options) = {
            let mut state = self.state.lock();
            if state.text.trim().is_empty() {
                state.status = FormStatus::Error(EMPTY_TEXT_MESSAGE.to_string());
                return SubmitOutcome::Failed(EMPTY_TEXT_MESSAGE.to_string());
            }
            (state.text.clone(), state.options.clone())
        };

        self.state.lock().status = FormStatus::Processing;
        tracing::info!(
            text_length = text.chars().count(),
            voice = %options.voice,
            format = %options.format,
            "Submitting synthesis request"
        );

        let result = self.synthesizer.synthesize(&text, &options).await;

        let loaded = result.and_then(|audio| self.player.lock().load(AudioSource::from(audio)));

        match loaded {
            Ok(_) => {
                self.state.lock().status = FormStatus::Success;
                self.show_notification();
                SubmitOutcome::Completed
            }
            Err(e) => {
                let message = e.to_string();
                tracing::error!(error = %message, "Speech synthesis failed");
                self.state.lock().status = FormStatus::Error(message.clone());
                SubmitOutcome::Failed(message)
            }
        }
    }

    fn show_notification(&self) {
        let id = {
            let mut state = self.state.lock();
            state.notification_seq += 1;
            state.notification = Some(state.notification_seq);
            state.notification_seq
        };

        let state = Arc::clone(&self.state);
        let delay = self.notification_duration;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let mut state = state.lock();
            // A newer notification owns the slot now
            if state.notification == Some(id) {
                state.notification = None;
            }
        });
    }
}
