use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::errors::Result;

pub mod file_storage;

/// How the string handed to [`AudioStorage::write`] maps to file bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    Utf8,
    /// The content is base64 text; the decoded bytes are written.
    Base64,
}

/// File-storage capability used to hand audio to the player.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AudioStorage: Send + Sync {
    /// Write `content` to `path`, replacing anything already there, and
    /// return the reference to hand to the player.
    async fn write(&self, path: &Path, content: &str, encoding: Encoding) -> Result<PathBuf>;
}
