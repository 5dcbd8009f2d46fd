pub mod catalog;
pub mod form;
pub mod playback;
pub mod tts;
