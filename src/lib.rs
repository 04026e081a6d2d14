// Public API for the tts-speak library

pub mod audio;
pub mod config;
pub mod errors;
pub mod storage;
pub mod trace;
pub mod tts;

// Re-export commonly used types
pub use config::{Config, OutputLocation};
pub use errors::{Result, TTSError};
pub use tts::synthesizer::{SpeechSynthesizer, SynthesisResult};
