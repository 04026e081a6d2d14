use std::path::{Path, PathBuf};

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use tracing::debug;

use super::{AudioStorage, Encoding};
use crate::errors::{constants::APP_DIR_NAME, Result, TTSError};

/// Writes audio files to the local filesystem, creating parent directories
/// on demand.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileStorage;

impl FileStorage {
    /// `<data local dir>/tts-speak`, falling back to the working directory.
    pub fn default_root() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR_NAME)
    }
}

#[async_trait]
impl AudioStorage for FileStorage {
    #[tracing::instrument(skip(self, content))]
    async fn write(&self, path: &Path, content: &str, encoding: Encoding) -> Result<PathBuf> {
        let bytes = match encoding {
            Encoding::Utf8 => content.as_bytes().to_vec(),
            Encoding::Base64 => STANDARD
                .decode(content)
                .map_err(|e| TTSError::storage(format!("invalid base64 content: {}", e)))?,
        };

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                TTSError::storage(format!("cannot create {}: {}", parent.display(), e))
            })?;
        }

        tokio::fs::write(path, &bytes)
            .await
            .map_err(|e| TTSError::storage(format!("cannot write {}: {}", path.display(), e)))?;

        debug!(path = %path.display(), bytes = bytes.len(), "Wrote audio file");

        Ok(path.to_path_buf())
    }
}
