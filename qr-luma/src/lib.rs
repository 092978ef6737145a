// SPDX-License-Identifier: MIT
//! # qr-luma: Black/White Pixel Statistics for QR Plausibility
//!
//! This crate holds the CPU-only half of the QR plausibility check: given a
//! decoded bitmap, count how many pixels read as "black" and how many read as
//! "white", then decide whether that balance looks like a QR code.
//!
//! ## Key Components
//!
//! - [`luma`]: Per-pixel brightness and the full-resolution black/white count
//! - [`band`]: The black-ratio computation and the plausibility band
//!
//! ## Policy Constants
//!
//! The thresholds are fixed and intentionally not configurable, because moving
//! them changes which uploads an operator sees accepted:
//! - brightness below [`luma::BLACK_BRIGHTNESS_THRESHOLD`] (128) is black
//! - a bitmap is plausible when `0.2 < ratio < 0.8`, strict on both sides
//!
//! ## Usage Example
//!
//! ```rust
//! use qr_luma::luma::{count_pixels, PixelLayout};
//!
//! // 2x1 RGBA bitmap: one black pixel, one white pixel
//! let rgba = [0, 0, 0, 255, 255, 255, 255, 255];
//! let counts = count_pixels(&rgba, 2, 1, PixelLayout::Rgba8).unwrap();
//!
//! assert_eq!(counts.black, 1);
//! assert_eq!(counts.white, 1);
//! assert_eq!(counts.ratio(), 0.5);
//! assert!(counts.is_plausible_qr());
//! ```
//!
//! This is a heuristic, not a QR detector. It never locates finder patterns
//! and never decodes a payload.

pub mod band;
pub mod luma;

pub use band::{LumaCounts, MAX_BLACK_RATIO, MIN_BLACK_RATIO};
pub use luma::{BLACK_BRIGHTNESS_THRESHOLD, LumaError, PixelLayout, count_pixels};
