//! Decoded bitmaps and the byte-to-pixel decode step.

use image::ImageFormat;
use qr_luma::{LumaCounts, PixelLayout};

use crate::error::DecodeError;

/// Width x height plus tightly packed RGB8 or RGBA8 samples.
///
/// Transient: produced from a portable image, scored, then dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedBitmap {
    width: u32,
    height: u32,
    layout: PixelLayout,
    samples: Vec<u8>,
}

impl DecodedBitmap {
    /// Wrap an RGBA8 buffer. The buffer is checked when counted, not here.
    pub fn from_rgba(width: u32, height: u32, rgba: Vec<u8>) -> Self {
        Self {
            width,
            height,
            layout: PixelLayout::Rgba8,
            samples: rgba,
        }
    }

    /// Wrap an RGB8 buffer.
    pub fn from_rgb(width: u32, height: u32, rgb: Vec<u8>) -> Self {
        Self {
            width,
            height,
            layout: PixelLayout::Rgb8,
            samples: rgb,
        }
    }

    /// Decode encoded image bytes.
    ///
    /// The format named by `mime` is tried first, then the format sniffed from
    /// the bytes. A mislabeled upload (PNG bytes tagged `image/jpeg`) still
    /// decodes. Images without an alpha channel are kept as RGB8 rather than
    /// widened to RGBA8.
    pub fn decode(bytes: &[u8], mime: &str) -> Result<Self, DecodeError> {
        let declared = ImageFormat::from_mime_type(mime);
        let sniffed = image::guess_format(bytes).ok();

        let mut candidates = Vec::with_capacity(2);
        candidates.extend(declared);
        if sniffed != declared {
            candidates.extend(sniffed);
        }

        let mut last_error = None;
        for format in candidates {
            match image::load_from_memory_with_format(bytes, format) {
                Ok(img) if img.color().has_alpha() => {
                    let rgba = img.into_rgba8();
                    let (width, height) = rgba.dimensions();
                    return Ok(Self::from_rgba(width, height, rgba.into_raw()));
                }
                Ok(img) => {
                    let rgb = img.into_rgb8();
                    let (width, height) = rgb.dimensions();
                    return Ok(Self::from_rgb(width, height, rgb.into_raw()));
                }
                Err(err) => last_error = Some(err),
            }
        }

        match last_error {
            Some(err) => Err(DecodeError::Image(err)),
            None => Err(DecodeError::UnsupportedFormat {
                mime: mime.to_string(),
            }),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixel_count(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    pub fn layout(&self) -> PixelLayout {
        self.layout
    }

    pub fn samples(&self) -> &[u8] {
        &self.samples
    }

    /// Black/white tallies over every pixel.
    pub fn luma_counts(&self) -> Result<LumaCounts, DecodeError> {
        Ok(qr_luma::count_pixels(
            &self.samples,
            self.width,
            self.height,
            self.layout,
        )?)
    }
}
