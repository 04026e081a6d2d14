/// Custom error types for the tts-speak application
#[derive(Debug, thiserror::Error)]
pub enum TTSError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("TTS API returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Malformed TTS response: {0}")]
    MalformedResponse(String),

    #[error("GCP authentication error: {0}")]
    GCPAuth(#[from] gcp_auth::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Base64 decode error: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Playback error: {0}")]
    Playback(String),

    #[error("A synthesis is already in flight")]
    SynthesisInFlight,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Text too long (max {max_length} bytes)")]
    TextTooLong { max_length: usize },

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl TTSError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    pub fn status(status: u16, body: impl Into<String>) -> Self {
        Self::Status {
            status,
            body: body.into(),
        }
    }

    pub fn malformed_response(message: impl Into<String>) -> Self {
        Self::MalformedResponse(message.into())
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage(message.into())
    }

    pub fn playback(message: impl Into<String>) -> Self {
        Self::Playback(message.into())
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    pub fn text_too_long(max_length: usize) -> Self {
        Self::TextTooLong { max_length }
    }

    /// Failures that happened before any audio reached storage.
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            Self::Http(_)
                | Self::Status { .. }
                | Self::MalformedResponse(_)
                | Self::Json(_)
                | Self::Base64(_)
                | Self::GCPAuth(_)
        )
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, TTSError>;

/// Input validation functions
pub mod validation {
    use super::*;

    /// Validate text before handing it to the synthesizer.
    ///
    /// The synthesizer itself sends whatever it is given; callers that face
    /// users run this first.
    pub fn validate_tts_text(text: &str) -> Result<()> {
        if text.trim().is_empty() {
            return Err(TTSError::invalid_input(constants::EMPTY_TEXT_MESSAGE));
        }

        if text.len() > constants::MAX_TTS_TEXT_LENGTH {
            return Err(TTSError::text_too_long(constants::MAX_TTS_TEXT_LENGTH));
        }

        Ok(())
    }
}

/// Constants used throughout the application
pub mod constants {
    // Configuration constants
    pub const DEFAULT_CONFIG_PATH: &str = "config.toml";
    pub const APP_DIR_NAME: &str = "tts-speak";

    // Environment variables
    pub const ENV_API_KEY: &str = "GOOGLE_TTS_KEY";
    pub const ENV_CREDENTIALS_PATH: &str = "GOOGLE_APPLICATION_CREDENTIALS";
    pub const ENV_ENDPOINT: &str = "TTS_ENDPOINT";
    pub const ENV_OUTPUT_DIR: &str = "TTS_OUTPUT_DIR";
    pub const ENV_OTEL_HTTP_URL: &str = "TTS_OTEL_HTTP_URL";

    // TTS constants
    pub const DEFAULT_ENDPOINT: &str = "https://texttospeech.googleapis.com/v1/text:synthesize";
    pub const GCP_SCOPE: &str = "https://www.googleapis.com/auth/cloud-platform";
    pub const DEFAULT_LANGUAGE_CODE: &str = "en-US";
    pub const DEFAULT_OUTPUT_FILE_NAME: &str = "tts-output.mp3";
    pub const OUTPUT_FILE_PREFIX: &str = "tts-";
    pub const OUTPUT_FILE_EXTENSION: &str = "mp3";
    // The REST API rejects inputs over 5000 bytes.
    pub const MAX_TTS_TEXT_LENGTH: usize = 5000;

    // Message constants
    pub const EMPTY_TEXT_MESSAGE: &str = "Please enter text to convert.";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tts_error_creation() {
        let config_error = TTSError::config("Test config error");
        assert!(matches!(config_error, TTSError::Config(_)));
        assert_eq!(
            config_error.to_string(),
            "Configuration error: Test config error"
        );

        let storage_error = TTSError::storage("disk full");
        assert!(matches!(storage_error, TTSError::Storage(_)));
        assert_eq!(storage_error.to_string(), "Storage error: disk full");

        let playback_error = TTSError::playback("no device");
        assert_eq!(playback_error.to_string(), "Playback error: no device");
    }

    #[test]
    fn test_status_error() {
        let error = TTSError::status(403, "API key not valid");
        assert!(matches!(error, TTSError::Status { status: 403, .. }));
        assert_eq!(error.to_string(), "TTS API returned 403: API key not valid");
        assert!(error.is_remote());
    }

    #[test]
    fn test_is_remote() {
        assert!(TTSError::malformed_response("missing audioContent").is_remote());
        assert!(!TTSError::storage("denied").is_remote());
        assert!(!TTSError::playback("denied").is_remote());
        assert!(!TTSError::SynthesisInFlight.is_remote());
    }

    mod validation_tests {
        use super::super::constants;
        use super::super::validation::*;
        use super::super::TTSError;

        #[test]
        fn test_validate_tts_text_valid() {
            assert!(validate_tts_text("Hello world").is_ok());
            assert!(validate_tts_text("こんにちは").is_ok());
            assert!(validate_tts_text("Test with numbers 123").is_ok());
        }

        #[test]
        fn test_validate_tts_text_empty() {
            assert!(validate_tts_text("").is_err());
            assert!(validate_tts_text("   ").is_err());
            assert!(validate_tts_text("\n\t").is_err());

            match validate_tts_text("") {
                Err(TTSError::InvalidInput(msg)) => {
                    assert_eq!(msg, constants::EMPTY_TEXT_MESSAGE)
                }
                other => panic!("Expected InvalidInput error, got {:?}", other),
            }
        }

        #[test]
        fn test_validate_tts_text_too_long() {
            let long_text = "a".repeat(constants::MAX_TTS_TEXT_LENGTH + 1);
            assert!(matches!(
                validate_tts_text(&long_text),
                Err(TTSError::TextTooLong { max_length: 5000 })
            ));

            let exact = "a".repeat(constants::MAX_TTS_TEXT_LENGTH);
            assert!(validate_tts_text(&exact).is_ok());
        }
    }
}
