pub mod gcp_tts;
pub mod structs;
