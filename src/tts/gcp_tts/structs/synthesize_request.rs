use crate::tts::gcp_tts::structs::{
    audio_config::AudioConfig, synthesis_input::SynthesisInput,
    voice_selection_params::VoiceSelectionParams,
};
use serde::{Deserialize, Serialize};

/// Example:
/// ```rust
/// use tts_speak::tts::gcp_tts::structs::synthesize_request::SynthesizeRequest;
///
/// let request = SynthesizeRequest::for_text("Hello world");
/// assert_eq!(request.input.text, "Hello world");
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[allow(non_snake_case)]
pub struct SynthesizeRequest {
    pub input: SynthesisInput,
    pub voice: VoiceSelectionParams,
    pub audioConfig: AudioConfig,
}

impl SynthesizeRequest {
    /// en-US, female voice, MP3 output.
    pub fn for_text(text: impl Into<String>) -> Self {
        Self {
            input: SynthesisInput::text(text),
            voice: VoiceSelectionParams::default(),
            audioConfig: AudioConfig::mp3(),
        }
    }
}
