use std::path::PathBuf;

use tokio::sync::Mutex;
use tracing::{error, info, warn};

use crate::{
    audio::{rodio_output::RodioOutput, AudioMode, AudioOutput, PermissionStatus, PlaybackHandle},
    config::{Config, OutputLocation},
    errors::{Result, TTSError},
    storage::{file_storage::FileStorage, AudioStorage, Encoding},
    tts::gcp_tts::{
        gcp_tts::{Credential, GCPTTS},
        structs::synthesize_request::SynthesizeRequest,
    },
};

/// Outcome of one successful synthesis.
#[derive(Debug)]
pub struct SynthesisResult {
    /// Decoded audio bytes.
    pub audio: Vec<u8>,
    /// The base64 payload as returned by the API and handed to storage.
    pub audio_content: String,
    pub path: PathBuf,
    pub playback: PlaybackHandle,
}

/// Converts text into audible speech: configure audio, call the API, decode,
/// persist, play.
#[derive(Debug)]
pub struct SpeechSynthesizer<S, A> {
    gcp_tts_client: GCPTTS,
    storage: S,
    audio: A,
    output_dir: PathBuf,
    output: OutputLocation,
    in_flight: Option<Mutex<()>>,
}

impl SpeechSynthesizer<FileStorage, RodioOutput> {
    /// Wire the production collaborators from `config`.
    #[tracing::instrument(skip(config))]
    pub async fn from_config(config: &Config) -> Result<Self> {
        let credential = match (&config.api_key, &config.credentials_path) {
            (Some(key), _) => Credential::ApiKey(key.clone()),
            (None, Some(path)) => Credential::service_account(path.clone()).await?,
            (None, None) => {
                warn!("No API credential configured; requests will be rejected");
                Credential::None
            }
        };

        let gcp_tts_client =
            GCPTTS::new(credential, config.endpoint.clone(), config.request_timeout())?;
        Ok(Self::new(config, gcp_tts_client, FileStorage, RodioOutput::new()))
    }
}

fn output_dir_for(config: &Config) -> PathBuf {
    config
        .output_dir
        .clone()
        .unwrap_or_else(FileStorage::default_root)
}

impl<S, A> SpeechSynthesizer<S, A>
where
    S: AudioStorage,
    A: AudioOutput,
{
    pub fn new(config: &Config, gcp_tts_client: GCPTTS, storage: S, audio: A) -> Self {
        Self {
            gcp_tts_client,
            storage,
            audio,
            output_dir: output_dir_for(config),
            output: config.output.clone(),
            in_flight: config.single_flight.then(|| Mutex::new(())),
        }
    }

    /// Synthesize `text` and start playing it. Failures are logged and
    /// swallowed; use [`Self::try_synthesize_and_play`] to observe them.
    #[tracing::instrument(skip(self))]
    pub async fn synthesize_and_play(&self, text: &str) {
        match self.try_synthesize_and_play(text).await {
            Ok(_) => {}
            Err(e) if e.is_remote() => error!(error = %e, "Error using Google TTS API"),
            Err(e) => error!(error = %e, "Speech synthesis failed"),
        }
    }

    /// Synthesize `text`, persist the audio, and start playback.
    ///
    /// Returns once playback has started. `text` is sent as-is, empty or not.
    #[tracing::instrument(skip(self))]
    pub async fn try_synthesize_and_play(&self, text: &str) -> Result<SynthesisResult> {
        let _guard = match &self.in_flight {
            Some(lock) => Some(lock.try_lock().map_err(|_| TTSError::SynthesisInFlight)?),
            None => None,
        };

        info!("Generating speech");

        self.prepare_audio().await?;

        let request = SynthesizeRequest::for_text(text);
        let response = self.gcp_tts_client.synthesize(&request).await?;

        let audio = response.decode_audio().map_err(|e| {
            TTSError::malformed_response(format!("audioContent is not valid base64: {}", e))
        })?;

        let path = self.output_dir.join(self.output.next_file_name());
        let path = self
            .storage
            .write(&path, &response.audioContent, Encoding::Base64)
            .await?;

        let playback = self.audio.play_file(&path).await?;

        info!(path = %path.display(), bytes = audio.len(), "Speech playback started");

        Ok(SynthesisResult {
            audio,
            audio_content: response.audioContent,
            path,
            playback,
        })
    }

    async fn prepare_audio(&self) -> Result<()> {
        match self.audio.request_permission().await? {
            PermissionStatus::Granted => {}
            status => warn!(?status, "Audio permission not granted, playing anyway"),
        }

        self.audio
            .set_audio_mode(AudioMode {
                plays_in_silent_mode: true,
            })
            .await
    }
}
