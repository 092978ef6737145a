//! # QR Plausibility Classifier
//!
//! `classify(image) -> Result<ClassificationVerdict, DecodeError>`.
//!
//! 1. **Decode**: base64 payload to bytes to RGBA pixels, on tokio's blocking
//!    pool so the caller's task is never stalled by a large image.
//! 2. **Sample**: every pixel, brightness `(R + G + B) / 3`, black below 128.
//! 3. **Score**: `ratio = black / (black + white)`, 0 for a zero-pixel bitmap.
//! 4. **Decide**: plausible when `0.2 < ratio < 0.8`.
//!
//! A decode failure or an implausible verdict is terminal for that call. The
//! classifier never retries; the caller decides what to do.

use async_trait::async_trait;
use qr_luma::LumaCounts;
use serde::Serialize;
use tracing::{debug, warn};

use crate::classify::DecodedBitmap;
use crate::error::DecodeError;
use crate::ingest::PortableImage;

/// Outcome of scoring one bitmap. Derived, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationVerdict {
    pub black_pixel_count: u64,
    pub white_pixel_count: u64,
    /// In `[0, 1]`; 0 for a zero-pixel bitmap.
    pub ratio: f64,
    pub is_plausible_qr: bool,
}

impl ClassificationVerdict {
    pub fn from_counts(counts: LumaCounts) -> Self {
        Self {
            black_pixel_count: counts.black,
            white_pixel_count: counts.white,
            ratio: counts.ratio(),
            is_plausible_qr: counts.is_plausible_qr(),
        }
    }

    /// Score an already decoded bitmap.
    pub fn from_bitmap(bitmap: &DecodedBitmap) -> Result<Self, DecodeError> {
        Ok(Self::from_counts(bitmap.luma_counts()?))
    }
}

/// Abstract plausibility check used by the upload slot.
/// Enables swapping the decoder or wrapping it (call counting, latency).
#[async_trait]
pub trait PlausibilityCheck: Send + Sync {
    /// Decode `image` and score it. Suspends until the decode completes.
    async fn classify(&self, image: &PortableImage) -> Result<ClassificationVerdict, DecodeError>;
}

/// Black/white ratio heuristic over the fully decoded image.
///
/// Not a QR decoder: it never extracts a payload. Balanced non-QR images pass
/// and heavily padded real codes can fail; the goal is to catch obviously
/// wrong uploads cheaply.
#[derive(Debug, Clone, Copy, Default)]
pub struct QrPlausibilityClassifier;

impl QrPlausibilityClassifier {
    pub fn new() -> Self {
        Self
    }

    /// Decode a portable image into pixels on the blocking pool.
    pub async fn decode(&self, image: &PortableImage) -> Result<DecodedBitmap, DecodeError> {
        let image = image.clone();
        tokio::task::spawn_blocking(move || {
            let bytes = image.decode_payload()?;
            DecodedBitmap::decode(&bytes, image.mime().unwrap_or_default())
        })
        .await?
    }
}

#[async_trait]
impl PlausibilityCheck for QrPlausibilityClassifier {
    async fn classify(&self, image: &PortableImage) -> Result<ClassificationVerdict, DecodeError> {
        let bitmap = match self.decode(image).await {
            Ok(bitmap) => bitmap,
            Err(err) => {
                warn!(error = %err, "qr classification: decode failed");
                return Err(err);
            }
        };

        let verdict = ClassificationVerdict::from_bitmap(&bitmap)?;
        debug!(
            width = bitmap.width(),
            height = bitmap.height(),
            black = verdict.black_pixel_count,
            white = verdict.white_pixel_count,
            ratio = verdict.ratio,
            plausible = verdict.is_plausible_qr,
            "qr classification scored"
        );
        Ok(verdict)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_pixel_bitmap_scores_zero() {
        let verdict = ClassificationVerdict::from_bitmap(&DecodedBitmap::from_rgba(0, 0, vec![]))
            .unwrap();
        assert_eq!(verdict.black_pixel_count, 0);
        assert_eq!(verdict.white_pixel_count, 0);
        assert_eq!(verdict.ratio, 0.0);
        assert!(!verdict.is_plausible_qr);

        let wide = DecodedBitmap::from_rgba(100, 0, vec![]);
        assert!(!ClassificationVerdict::from_bitmap(&wide).unwrap().is_plausible_qr);
    }

    #[test]
    fn verdict_serializes_camel_case() {
        let verdict = ClassificationVerdict::from_counts(LumaCounts::new(1, 3));
        let json = serde_json::to_value(verdict).unwrap();
        assert_eq!(json["blackPixelCount"], 1);
        assert_eq!(json["whitePixelCount"], 3);
        assert_eq!(json["ratio"], 0.25);
        assert_eq!(json["isPlausibleQr"], true);
    }

    #[tokio::test]
    async fn garbage_payload_is_a_decode_error() {
        let image = PortableImage::parse("data:image/png;base64,AAAA").unwrap();
        let err = QrPlausibilityClassifier::new()
            .classify(&image)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DecodeError::UnsupportedFormat { .. } | DecodeError::Image(_)
        ));
    }
}
