use serde::{Deserialize, Serialize};

/// Example:
/// ```rust
/// use tts_speak::tts::gcp_tts::structs::audio_config::AudioConfig;
///
/// let config = AudioConfig::mp3();
/// assert_eq!(config.audioEncoding, "MP3");
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[allow(non_snake_case)]
pub struct AudioConfig {
    pub audioEncoding: String,
}

impl AudioConfig {
    pub fn mp3() -> Self {
        Self {
            audioEncoding: String::from("MP3"),
        }
    }
}
