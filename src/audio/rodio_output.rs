use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
    sync::Mutex,
};

use async_trait::async_trait;
use rodio::{cpal::traits::HostTrait, Decoder, OutputStream, OutputStreamBuilder, Sink};
use tokio::sync::oneshot;
use tracing::{debug, info, warn};

use super::{AudioMode, AudioOutput, PermissionStatus, PlaybackHandle};
use crate::errors::{Result, TTSError};

/// Plays files on the default output device.
///
/// Each playback runs on its own thread which owns the output stream until
/// the sink drains.
#[derive(Debug, Default)]
pub struct RodioOutput {
    mode: Mutex<AudioMode>,
}

impl RodioOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> AudioMode {
        match self.mode.lock() {
            Ok(mode) => *mode,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }
}

fn decode_file(path: &Path) -> Result<Decoder<BufReader<File>>> {
    let file = File::open(path)
        .map_err(|e| TTSError::playback(format!("cannot open {}: {}", path.display(), e)))?;
    Decoder::new(BufReader::new(file))
        .map_err(|e| TTSError::playback(format!("cannot decode {}: {}", path.display(), e)))
}

/// Decode before touching the device so a bad file fails fast.
fn start_sink(path: &Path) -> Result<(OutputStream, Sink)> {
    let source = decode_file(path)?;

    let mut stream = OutputStreamBuilder::open_default_stream()
        .map_err(|e| TTSError::playback(format!("cannot open output stream: {}", e)))?;
    // The stream is dropped after every playback; keep stderr quiet.
    stream.log_on_drop(false);
    let sink = Sink::connect_new(stream.mixer());
    sink.append(source);

    Ok((stream, sink))
}

#[async_trait]
impl AudioOutput for RodioOutput {
    #[tracing::instrument(skip(self))]
    async fn request_permission(&self) -> Result<PermissionStatus> {
        let has_device = tokio::task::spawn_blocking(|| {
            rodio::cpal::default_host()
                .default_output_device()
                .is_some()
        })
        .await
        .map_err(|e| TTSError::playback(e.to_string()))?;

        if has_device {
            Ok(PermissionStatus::Granted)
        } else {
            warn!("No default audio output device");
            Ok(PermissionStatus::Denied)
        }
    }

    #[tracing::instrument(skip(self))]
    async fn set_audio_mode(&self, mode: AudioMode) -> Result<()> {
        // Desktop outputs have no silent switch, so the mode is only recorded.
        match self.mode.lock() {
            Ok(mut current) => *current = mode,
            Err(poisoned) => *poisoned.into_inner() = mode,
        }
        debug!(plays_in_silent_mode = mode.plays_in_silent_mode, "Audio mode set");
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn play_file(&self, source: &Path) -> Result<PlaybackHandle> {
        let (started_tx, started_rx) = oneshot::channel::<Result<()>>();
        let (finished_tx, finished_rx) = oneshot::channel();
        let path: PathBuf = source.to_path_buf();

        std::thread::Builder::new()
            .name(String::from("tts-playback"))
            .spawn(move || {
                match start_sink(&path) {
                    Ok((stream, sink)) => {
                        let _ = started_tx.send(Ok(()));
                        sink.sleep_until_end();
                        drop(stream);
                    }
                    Err(e) => {
                        let _ = started_tx.send(Err(e));
                    }
                }
                let _ = finished_tx.send(());
            })
            .map_err(|e| TTSError::playback(format!("cannot spawn playback thread: {}", e)))?;

        started_rx
            .await
            .map_err(|_| TTSError::playback("playback thread exited before starting"))??;

        info!(source = %source.display(), "Playback started");

        Ok(PlaybackHandle::new(source.to_path_buf(), finished_rx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 16-bit mono PCM WAV of silence.
    fn silent_wav(samples: u32) -> Vec<u8> {
        let data_len = samples * 2;
        let mut wav = Vec::new();
        wav.extend_from_slice(b"RIFF");
        wav.extend_from_slice(&(36 + data_len).to_le_bytes());
        wav.extend_from_slice(b"WAVE");
        wav.extend_from_slice(b"fmt ");
        wav.extend_from_slice(&16u32.to_le_bytes());
        wav.extend_from_slice(&1u16.to_le_bytes());
        wav.extend_from_slice(&1u16.to_le_bytes());
        wav.extend_from_slice(&8000u32.to_le_bytes());
        wav.extend_from_slice(&16000u32.to_le_bytes());
        wav.extend_from_slice(&2u16.to_le_bytes());
        wav.extend_from_slice(&16u16.to_le_bytes());
        wav.extend_from_slice(b"data");
        wav.extend_from_slice(&data_len.to_le_bytes());
        wav.resize(wav.len() + data_len as usize, 0);
        wav
    }

    #[test]
    fn test_decode_valid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("silence.wav");
        std::fs::write(&path, silent_wav(800)).unwrap();

        assert!(decode_file(&path).is_ok());
    }

    #[test]
    fn test_start_sink_valid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("silence.wav");
        std::fs::write(&path, silent_wav(80)).unwrap();

        // Machines without an output device stop at the stream, after decoding.
        match start_sink(&path) {
            Ok((stream, sink)) => {
                assert_eq!(sink.len(), 1);
                sink.stop();
                drop(stream);
            }
            Err(TTSError::Playback(message)) => {
                assert!(message.starts_with("cannot open output stream"), "{}", message)
            }
            Err(other) => panic!("Expected Playback error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_set_audio_mode_is_recorded() {
        let output = RodioOutput::new();
        output
            .set_audio_mode(AudioMode {
                plays_in_silent_mode: false,
            })
            .await
            .unwrap();
        assert!(!output.mode().plays_in_silent_mode);

        output.set_audio_mode(AudioMode::default()).await.unwrap();
        assert!(output.mode().plays_in_silent_mode);
    }

    #[tokio::test]
    async fn test_play_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let output = RodioOutput::new();

        let result = output.play_file(&dir.path().join("missing.mp3")).await;

        assert!(matches!(result, Err(TTSError::Playback(_))));
    }

    #[tokio::test]
    async fn test_play_undecodable_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tts-output.mp3");
        std::fs::write(&path, b"Hello").unwrap();
        let output = RodioOutput::new();

        let result = output.play_file(&path).await;

        assert!(matches!(result, Err(TTSError::Playback(_))));
    }
}
