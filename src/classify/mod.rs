//! # Classify Module
//!
//! QR plausibility classification: decode a [`PortableImage`](crate::ingest::PortableImage)
//! off the caller's task, count black and white pixels at full resolution,
//! and score the balance against the plausibility band.

pub mod bitmap;
pub mod classifier;

pub use bitmap::DecodedBitmap;
pub use classifier::{ClassificationVerdict, PlausibilityCheck, QrPlausibilityClassifier};
