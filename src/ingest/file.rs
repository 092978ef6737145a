//! # Raw File Sources
//!
//! Abstract interface for the binary content a host's file picker hands over.
//! The handle is ephemeral: it lives for one ingestion call and stays owned
//! by the caller.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::io::AsyncReadExt;

use crate::ingest::MAX_FILE_BYTES;

/// Abstract interface for user-selected binary content.
/// Enables pluggable sources (in-memory uploads, files on disk, test doubles).
#[async_trait]
pub trait RawFile: Send + Sync {
    /// Declared size in bytes, known before any content is read.
    fn byte_len(&self) -> u64;

    /// MIME type hint from the host; may be empty.
    fn mime_hint(&self) -> &str;

    /// Display name used in log fields.
    fn name(&self) -> &str {
        ""
    }

    /// Read the full content. Suspends until every byte is in memory.
    async fn read_all(&self) -> std::io::Result<Vec<u8>>;
}

/// File content already held in memory (e.g. a multipart upload body).
#[derive(Debug, Clone)]
pub struct MemoryFile {
    name: String,
    mime: String,
    bytes: Vec<u8>,
}

impl MemoryFile {
    pub fn new(name: impl Into<String>, mime: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime: mime.into(),
            bytes,
        }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

#[async_trait]
impl RawFile for MemoryFile {
    fn byte_len(&self) -> u64 {
        self.bytes.len() as u64
    }

    fn mime_hint(&self) -> &str {
        &self.mime
    }

    fn name(&self) -> &str {
        &self.name
    }

    async fn read_all(&self) -> std::io::Result<Vec<u8>> {
        Ok(self.bytes.clone())
    }
}

/// A file on the local filesystem, read through tokio.
///
/// The MIME hint is derived from the file extension, mirroring what a
/// browser file picker reports; unknown extensions give an empty hint.
#[derive(Debug, Clone)]
pub struct DiskFile {
    path: PathBuf,
    name: String,
    mime: String,
    len: u64,
}

impl DiskFile {
    /// Stat the file. Content is not read until [`RawFile::read_all`].
    pub async fn open(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let metadata = tokio::fs::metadata(&path).await?;
        if !metadata.is_file() {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("'{}' is not a regular file", path.display()),
            ));
        }

        let mime = image::ImageFormat::from_path(&path)
            .map(|format| format.to_mime_type().to_string())
            .unwrap_or_default();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        Ok(Self {
            path,
            name,
            mime,
            len: metadata.len(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl RawFile for DiskFile {
    fn byte_len(&self) -> u64 {
        self.len
    }

    fn mime_hint(&self) -> &str {
        &self.mime
    }

    fn name(&self) -> &str {
        &self.name
    }

    /// Reads at most one byte past [`MAX_FILE_BYTES`], so a file that grew
    /// since `open` is caught by the size re-check without being loaded whole.
    async fn read_all(&self) -> std::io::Result<Vec<u8>> {
        let file = tokio::fs::File::open(&self.path).await?;
        let mut bytes = Vec::with_capacity(self.len.min(MAX_FILE_BYTES) as usize);
        file.take(MAX_FILE_BYTES + 1).read_to_end(&mut bytes).await?;
        Ok(bytes)
    }
}
