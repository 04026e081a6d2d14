use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::oneshot;

use crate::errors::Result;

pub mod rodio_output;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionStatus {
    Granted,
    Denied,
    Undetermined,
}

/// Global output configuration applied before playback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudioMode {
    /// Keep playback audible when the device is switched to silent.
    pub plays_in_silent_mode: bool,
}

impl Default for AudioMode {
    fn default() -> Self {
        Self {
            plays_in_silent_mode: true,
        }
    }
}

/// A playback session that has started.
#[derive(Debug)]
pub struct PlaybackHandle {
    source: PathBuf,
    finished: Option<oneshot::Receiver<()>>,
}

impl PlaybackHandle {
    pub fn new(source: PathBuf, finished: oneshot::Receiver<()>) -> Self {
        Self {
            source,
            finished: Some(finished),
        }
    }

    /// A handle with no completion signal; `wait` returns immediately.
    pub fn detached(source: PathBuf) -> Self {
        Self {
            source,
            finished: None,
        }
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Resolve once playback has ended.
    pub async fn wait(self) {
        if let Some(finished) = self.finished {
            let _ = finished.await;
        }
    }
}

/// Audio-playback capability.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AudioOutput: Send + Sync {
    async fn request_permission(&self) -> Result<PermissionStatus>;

    async fn set_audio_mode(&self, mode: AudioMode) -> Result<()>;

    /// Load `source` into a new playback session and start it. Returns once
    /// playback has started, not when it ends.
    async fn play_file(&self, source: &Path) -> Result<PlaybackHandle>;
}
