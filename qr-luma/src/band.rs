// SPDX-License-Identifier: MIT
//! # Black Ratio and the Plausibility Band
//!
//! A genuine QR code has a substantial but not overwhelming share of dark
//! modules. Near-uniform images (a photo of sky, a solid fill) fall outside
//! the band and read as implausible.
//!
//! Known blind spots: balanced non-QR images are accepted, and real codes with
//! a very wide quiet zone or unusual module density can be rejected.

/// Lower edge of the plausibility band (exclusive).
pub const MIN_BLACK_RATIO: f64 = 0.2;

/// Upper edge of the plausibility band (exclusive).
pub const MAX_BLACK_RATIO: f64 = 0.8;

/// Black and white pixel tallies for one bitmap.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LumaCounts {
    pub black: u64,
    pub white: u64,
}

impl LumaCounts {
    pub fn new(black: u64, white: u64) -> Self {
        Self { black, white }
    }

    /// Total pixels counted.
    pub fn total(&self) -> u64 {
        self.black + self.white
    }

    /// `black / (black + white)`, or 0.0 for a zero-pixel bitmap.
    pub fn ratio(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        self.black as f64 / total as f64
    }

    /// True when the ratio lies strictly inside the band. Always false for a
    /// zero-pixel bitmap.
    pub fn is_plausible_qr(&self) -> bool {
        self.total() > 0 && in_band(self.ratio())
    }
}

/// `MIN_BLACK_RATIO < ratio < MAX_BLACK_RATIO`.
#[inline]
pub fn in_band(ratio: f64) -> bool {
    ratio > MIN_BLACK_RATIO && ratio < MAX_BLACK_RATIO
}
