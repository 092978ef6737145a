// SPDX-License-Identifier: MIT
// Full-resolution black/white pixel counting.
// Channel samples in, LumaCounts out. No subsampling: QR modules can be a
// small fraction of the image.

use crate::band::LumaCounts;

/// Pixels whose mean RGB brightness is below this value count as black.
pub const BLACK_BRIGHTNESS_THRESHOLD: u16 = 128;

/// Channel layout of a flat 8-bit sample buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PixelLayout {
    /// red, green, blue, alpha
    Rgba8,
    /// red, green, blue (decoders emit this for images without alpha)
    Rgb8,
}

impl PixelLayout {
    /// Bytes per pixel for this layout.
    pub fn channels(self) -> usize {
        match self {
            PixelLayout::Rgba8 => 4,
            PixelLayout::Rgb8 => 3,
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum LumaError {
    /// Sample buffer shorter than `width * height * channels`.
    BufferTooSmall { expected: usize, actual: usize },
    /// `width * height * channels` does not fit in usize.
    DimensionsOverflow { width: u32, height: u32 },
}

impl std::fmt::Display for LumaError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LumaError::BufferTooSmall { expected, actual } => write!(
                f,
                "Sample buffer too small: expected {} bytes, got {}",
                expected, actual
            ),
            LumaError::DimensionsOverflow { width, height } => {
                write!(f, "Bitmap dimensions overflow: {}x{}", width, height)
            }
        }
    }
}

impl std::error::Error for LumaError {}

/// Mean brightness `(r + g + b) / 3` below 128, evaluated on the integer
/// channel sum. Alpha is ignored.
///
/// `(r + g + b) / 3 < 128` holds exactly when `r + g + b < 384`, so no
/// floating point is needed in the hot loop.
#[inline]
pub fn is_black(r: u8, g: u8, b: u8) -> bool {
    (r as u16 + g as u16 + b as u16) < BLACK_BRIGHTNESS_THRESHOLD * 3
}

/// Count black and white pixels over the whole bitmap.
///
/// `samples` must hold at least `width * height` pixels in `layout`; trailing
/// bytes past that are ignored. A zero-area bitmap yields empty counts.
pub fn count_pixels(
    samples: &[u8],
    width: u32,
    height: u32,
    layout: PixelLayout,
) -> Result<LumaCounts, LumaError> {
    let channels = layout.channels();
    let expected = (width as usize)
        .checked_mul(height as usize)
        .and_then(|n| n.checked_mul(channels))
        .ok_or(LumaError::DimensionsOverflow { width, height })?;

    if samples.len() < expected {
        return Err(LumaError::BufferTooSmall {
            expected,
            actual: samples.len(),
        });
    }

    let mut counts = LumaCounts::default();
    for px in samples[..expected].chunks_exact(channels) {
        if is_black(px[0], px[1], px[2]) {
            counts.black += 1;
        } else {
            counts.white += 1;
        }
    }
    Ok(counts)
}
