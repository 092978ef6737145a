//! # Image Ingestor
//!
//! `ingest(file) -> Result<PortableImage, IngestError>`.
//!
//! The ingestor answers two questions only: are the bytes within the size
//! policy, and did we get all of them. Pixel-level validation belongs to the
//! classifier. The ingestor holds no state and mutates nothing shared.

use tracing::debug;

use crate::error::IngestError;
use crate::ingest::{PortableImage, RawFile};

/// Size ceiling for a single upload: 5 MiB exactly.
pub const MAX_FILE_BYTES: u64 = 5 * 1024 * 1024;

/// Stateless file-to-data-URI converter.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageIngestor;

impl ImageIngestor {
    pub fn new() -> Self {
        Self
    }

    /// Read `file` and encode it as a [`PortableImage`].
    ///
    /// # Errors
    ///
    /// - [`IngestError::TooLarge`] when the declared size exceeds
    ///   [`MAX_FILE_BYTES`]. Checked before any read, so nothing is read.
    /// - [`IngestError::Read`] when the read fails, or returns fewer bytes
    ///   than declared.
    pub async fn ingest(&self, file: &dyn RawFile) -> Result<PortableImage, IngestError> {
        let declared = file.byte_len();
        check_size(declared)?;

        let bytes = file.read_all().await.map_err(IngestError::read)?;
        let actual = bytes.len() as u64;

        // The declared size can be stale; re-apply the ceiling to what arrived.
        check_size(actual)?;
        if actual < declared {
            return Err(IngestError::truncated(declared, actual));
        }

        let image = PortableImage::encode(file.mime_hint(), &bytes);
        debug!(
            file = file.name(),
            bytes = actual,
            encoded = image.encoded_len(),
            "ingested file"
        );
        Ok(image)
    }
}

fn check_size(size: u64) -> Result<(), IngestError> {
    if size > MAX_FILE_BYTES {
        return Err(IngestError::TooLarge {
            size,
            limit: MAX_FILE_BYTES,
        });
    }
    Ok(())
}
