use serde::{Deserialize, Serialize};

use crate::errors::constants::DEFAULT_LANGUAGE_CODE;

/// Example:
/// ```rust
/// use tts_speak::tts::gcp_tts::structs::voice_selection_params::VoiceSelectionParams;
///
/// let voice = VoiceSelectionParams::default();
/// assert_eq!(voice.languageCode, "en-US");
/// assert_eq!(voice.ssmlGender, "FEMALE");
/// ```
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq, Hash)]
#[allow(non_snake_case)]
pub struct VoiceSelectionParams {
    pub languageCode: String,
    pub ssmlGender: String,
}

impl Default for VoiceSelectionParams {
    fn default() -> Self {
        Self {
            languageCode: String::from(DEFAULT_LANGUAGE_CODE),
            ssmlGender: String::from("FEMALE"),
        }
    }
}
