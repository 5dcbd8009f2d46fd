pub mod object_url;

use chrono::Utc;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::domain::tts::{
    result::{decode_base64, is_data_url, parse_data_url},
    SynthesisError, SynthesisResult,
};

pub use object_url::{ObjectUrl, ObjectUrlStore};

/// Audio handed to the player
#[derive(Debug, Clone, PartialEq)]
pub enum AudioSource {
    /// Remote or relative URL, played as is
    Url(String),
    /// Base64 text or a Base64 data URL
    Encoded { payload: String, mime_type: String },
    /// Already decoded bytes
    Bytes { bytes: Vec<u8>, mime_type: String },
}

impl From<SynthesisResult> for AudioSource {
    fn from(result: SynthesisResult) -> Self {
        match result {
            SynthesisResult::Url { url } => AudioSource::Url(url),
            SynthesisResult::Inline { bytes, mime_type } => AudioSource::Bytes { bytes, mime_type },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    Empty,
    Loading,
    Ready,
    Playing,
    Paused,
    Ended,
}

impl fmt::Display for PlaybackState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PlaybackState::Empty => "empty",
            PlaybackState::Loading => "loading",
            PlaybackState::Ready => "ready",
            PlaybackState::Playing => "playing",
            PlaybackState::Paused => "paused",
            PlaybackState::Ended => "ended",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PlaybackError {
    #[error("no audio loaded")]
    NothingLoaded,
    #[error("audio is still loading")]
    NotReady,
    #[error("audio is hosted at {0} and must be fetched before saving")]
    RemoteSource(String),
    #[error("failed to write audio: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug)]
enum PlayableResource {
    Remote { url: String },
    Local { handle: ObjectUrl, mime_type: String },
}

impl PlayableResource {
    fn url(&self) -> &str {
        match self {
            PlayableResource::Remote { url } => url,
            PlayableResource::Local { handle, .. } => handle.as_str(),
        }
    }
}

/// The currently loaded audio. Dropping the session releases its resource.
#[derive(Debug)]
pub struct PlaybackSession {
    resource: PlayableResource,
    state: PlaybackState,
    position: f64,
    duration: f64,
}

/// Transport state machine over a single playback session.
///
/// Host media callbacks map onto methods:
/// `load` → Loading, `metadata_loaded` → Ready, `toggle` flips
/// Playing/Paused, `time_update` tracks position, `ended` → Ended with the
/// position reset to zero.
pub struct Player {
    store: ObjectUrlStore,
    session: Option<PlaybackSession>,
}

impl Player {
    pub fn new(store: ObjectUrlStore) -> Self {
        Self {
            store,
            session: None,
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.session
            .as_ref()
            .map(|s| s.state)
            .unwrap_or(PlaybackState::Empty)
    }

    pub fn position(&self) -> f64 {
        self.session.as_ref().map(|s| s.position).unwrap_or(0.0)
    }

    pub fn duration(&self) -> f64 {
        self.session.as_ref().map(|s| s.duration).unwrap_or(0.0)
    }

    /// URL the host should play: the remote URL or the transient object URL
    pub fn url(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.resource.url())
    }

    pub fn mime_type(&self) -> Option<&str> {
        match self.session.as_ref().map(|s| &s.resource) {
            Some(PlayableResource::Local { mime_type, .. }) => Some(mime_type),
            _ => None,
        }
    }

    /// Decoded audio, when the session holds local bytes
    pub fn bytes(&self) -> Option<&[u8]> {
        match self.session.as_ref().map(|s| &s.resource) {
            Some(PlayableResource::Local { handle, .. }) => Some(handle.bytes()),
            _ => None,
        }
    }

    /// Controls are usable once metadata arrived
    pub fn controls_enabled(&self) -> bool {
        !matches!(self.state(), PlaybackState::Empty | PlaybackState::Loading)
    }

    /// Replace the current session with `source`.
    ///
    /// The source is decoded before anything is released: when it cannot be
    /// decoded the current session, or the empty state, is left untouched.
    pub fn load(&mut self, source: AudioSource) -> Result<PlaybackState, SynthesisError> {
        let resource = match source {
            AudioSource::Url(url) if is_data_url(&url) => {
                let (mime_type, bytes) = parse_data_url(&url).map_err(log_decode_error)?;
                self.local_resource(bytes, mime_type)
            }
            AudioSource::Url(url) => PlayableResource::Remote { url },
            AudioSource::Encoded { payload, mime_type } => {
                let (mime_type, bytes) = if is_data_url(&payload) {
                    parse_data_url(&payload).map_err(log_decode_error)?
                } else {
                    (mime_type, decode_base64(&payload).map_err(log_decode_error)?)
                };
                self.local_resource(bytes, mime_type)
            }
            AudioSource::Bytes { bytes, mime_type } => self.local_resource(bytes, mime_type),
        };

        self.unload();
        tracing::debug!(url = %resource.url(), "Audio source loaded");
        self.session = Some(PlaybackSession {
            resource,
            state: PlaybackState::Loading,
            position: 0.0,
            duration: 0.0,
        });

        Ok(PlaybackState::Loading)
    }

    /// Drop the current session, releasing its resource
    pub fn unload(&mut self) {
        if let Some(session) = self.session.take() {
            tracing::debug!(url = %session.resource.url(), "Releasing playback session");
        }
    }

    pub fn metadata_loaded(&mut self, duration: f64) -> PlaybackState {
        if let Some(session) = self.session.as_mut() {
            if session.state == PlaybackState::Loading {
                session.duration = if duration.is_finite() && duration > 0.0 {
                    duration
                } else {
                    0.0
                };
                session.state = PlaybackState::Ready;
            }
        }
        self.state()
    }

    /// Play when stopped, pause when playing. Ignored until metadata arrived.
    pub fn toggle(&mut self) -> PlaybackState {
        if let Some(session) = self.session.as_mut() {
            session.state = match session.state {
                PlaybackState::Ready | PlaybackState::Paused | PlaybackState::Ended => {
                    PlaybackState::Playing
                }
                PlaybackState::Playing => PlaybackState::Paused,
                other => other,
            };
        }
        self.state()
    }

    pub fn time_update(&mut self, position: f64) {
        if let Some(session) = self.session.as_mut() {
            if session.state == PlaybackState::Playing {
                session.position = clamp_position(position, session.duration);
            }
        }
    }

    pub fn ended(&mut self) -> PlaybackState {
        if let Some(session) = self.session.as_mut() {
            if session.state == PlaybackState::Playing {
                session.state = PlaybackState::Ended;
                session.position = 0.0;
            }
        }
        self.state()
    }

    /// Move to `position`, clamped to `[0, duration]`. Returns the new
    /// position, or `None` while nothing seekable is loaded.
    pub fn seek(&mut self, position: f64) -> Option<f64> {
        if !self.controls_enabled() {
            return None;
        }
        let session = self.session.as_mut()?;
        session.position = clamp_position(position, session.duration);
        Some(session.position)
    }

    /// Snapshot the decoded audio for saving, under `file_name` or a
    /// timestamped default name
    pub fn download(&self, file_name: Option<&str>) -> Result<Download, PlaybackError> {
        let session = self.session.as_ref().ok_or(PlaybackError::NothingLoaded)?;
        if session.state == PlaybackState::Loading {
            return Err(PlaybackError::NotReady);
        }

        match &session.resource {
            PlayableResource::Remote { url } => Err(PlaybackError::RemoteSource(url.clone())),
            PlayableResource::Local { handle, mime_type } => Ok(Download {
                file_name: file_name
                    .map(str::to_string)
                    .unwrap_or_else(|| default_file_name(mime_type)),
                bytes: handle.shared_bytes(),
            }),
        }
    }

    fn local_resource(&self, bytes: Vec<u8>, mime_type: String) -> PlayableResource {
        let handle = self.store.create(bytes, mime_type.clone());
        PlayableResource::Local { handle, mime_type }
    }
}

/// Audio ready to be written out, detached from the player
#[derive(Debug, Clone)]
pub struct Download {
    pub file_name: String,
    bytes: Arc<[u8]>,
}

impl Download {
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub async fn save_to(&self, dir: &Path) -> Result<PathBuf, PlaybackError> {
        let path = dir.join(&self.file_name);
        tokio::fs::write(&path, &self.bytes[..]).await?;
        tracing::info!(path = %path.display(), size = self.bytes.len(), "Audio saved");
        Ok(path)
    }
}

fn log_decode_error(err: SynthesisError) -> SynthesisError {
    tracing::error!(error = %err, "Failed to decode audio, keeping current session");
    match err {
        SynthesisError::Decode(_) => err,
        other => SynthesisError::Decode(other.to_string()),
    }
}

fn clamp_position(position: f64, duration: f64) -> f64 {
    if position.is_nan() {
        return 0.0;
    }
    position.clamp(0.0, duration.max(0.0))
}

/// `mm:ss`, or `--:--` when the duration is unknown
pub fn format_duration(seconds: Option<f64>) -> String {
    match seconds {
        Some(secs) if secs.is_finite() && secs >= 0.0 => {
            let total = secs.floor() as u64;
            format!("{:02}:{:02}", total / 60, total % 60)
        }
        _ => "--:--".to_string(),
    }
}

/// `tts-audio-<unix millis>.<mime subtype>`
pub fn default_file_name(mime_type: &str) -> String {
    let extension = mime_type.split('/').nth(1).unwrap_or("mpeg");
    format!("tts-audio-{}.{}", Utc::now().timestamp_millis(), extension)
}
