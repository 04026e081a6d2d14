pub mod gcp_tts;
pub mod synthesizer;
