//! # Business-Card Image Intake Library
//!
//! Accepts user-selected image files for a profile card's avatar and contact
//! QR slots, turns them into portable data URIs, and screens QR uploads with a
//! cheap black/white balance heuristic before they reach the form.
//!
//! ## Architecture
//!
//! The library is organized into several key modules:
//! - `ingest`: Raw file sources and the size-checked data URI encoder
//! - `classify`: Pixel decoding and the QR plausibility heuristic
//! - `slot`: Per-slot state machine with supersession of stale selections
//! - `profile`: Profile records and the draft form slots write into
//! - `share`: Share targets and share text
//! - `config`: Configuration management and validation
//!
//! ## Example
//!
//! ```rust,no_run
//! use card_intake::config::{IntakeConfig, SlotKind};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = IntakeConfig::new("contact-qr.png", SlotKind::QrCode);
//! let report = card_intake::run_intake(&config).await?;
//! println!("{}: {}", report.phase, report.error.as_deref().unwrap_or("ok"));
//! # Ok(())
//! # }
//! ```

use std::sync::{Arc, Mutex, PoisonError};

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Serialize;

pub mod classify;
pub mod config;
pub mod error;
pub mod ingest;
pub mod profile;
pub mod share;
pub mod slot;

/// Re-export error types for convenience
pub use error::{
    DecodeError, HasRecoverySuggestion, HasSeverity, IngestError, ProfileError, Recoverable,
    SlotRejection,
};

pub use classify::{ClassificationVerdict, PlausibilityCheck, QrPlausibilityClassifier};
pub use config::{IntakeConfig, SlotKind};
pub use ingest::{DiskFile, ImageIngestor, MAX_FILE_BYTES, MemoryFile, PortableImage, RawFile};
pub use profile::{ProfileDraft, UserProfile};
pub use share::{ShareTarget, build_share_text};
pub use slot::{SelectOutcome, SlotPhase, UploadSlotController, UploadSlotState};

/// Result of running one file through a slot.
#[derive(Debug, Clone, Serialize)]
pub struct IntakeReport {
    pub slot: String,
    pub phase: SlotPhase,
    /// Advisory message when rejected.
    pub error: Option<String>,
    /// Rejection category, e.g. `too_large` or `implausible_qr`.
    pub reason: Option<&'static str>,
    /// MIME tag of the accepted image.
    pub mime: Option<String>,
    /// Size of the input file as reported by the filesystem.
    pub bytes: u64,
    /// Length of the accepted data URI.
    pub encoded_len: Option<usize>,
    /// Present when the slot is QR-constrained and the image decoded.
    pub verdict: Option<ClassificationVerdict>,
    #[serde(skip)]
    pub image: Option<PortableImage>,
}

impl IntakeReport {
    pub fn is_accepted(&self) -> bool {
        self.phase == SlotPhase::Accepted
    }
}

/// Run the file named by `config` through a freshly built slot.
///
/// Rejections are not errors here; they come back in the report. Errors are
/// reserved for a configuration that does not validate or a path that cannot
/// be opened.
pub async fn run_intake(config: &IntakeConfig) -> Result<IntakeReport> {
    config.validate().map_err(anyhow::Error::msg)?;

    let file = DiskFile::open(&config.path)
        .await
        .with_context(|| format!("cannot open {}", config.path.display()))?;

    let recorder = Arc::new(VerdictRecorder::new(QrPlausibilityClassifier::new()));
    let slot = config
        .slot_builder()
        .with_classifier(recorder.clone())
        .build();

    let outcome = slot.select(&file).await;
    let state = slot.state();
    let mut report = IntakeReport {
        slot: slot.label().to_string(),
        phase: slot.phase(),
        error: state.error_message,
        reason: None,
        mime: None,
        bytes: file.byte_len(),
        encoded_len: None,
        verdict: recorder.last(),
        image: None,
    };

    match outcome {
        SelectOutcome::Accepted(image) => {
            report.mime = image.mime().map(str::to_string);
            report.encoded_len = Some(image.encoded_len());
            report.image = Some(image);
        }
        SelectOutcome::Rejected(rejection) => {
            report.reason = Some(rejection.category());
        }
        // Nothing else holds this slot.
        SelectOutcome::Superseded => {}
    }

    Ok(report)
}

/// Passes through to an inner check and keeps the last verdict it produced.
struct VerdictRecorder<C> {
    inner: C,
    last: Mutex<Option<ClassificationVerdict>>,
}

impl<C> VerdictRecorder<C> {
    fn new(inner: C) -> Self {
        Self {
            inner,
            last: Mutex::new(None),
        }
    }

    fn last(&self) -> Option<ClassificationVerdict> {
        *self.last.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl<C: PlausibilityCheck> PlausibilityCheck for VerdictRecorder<C> {
    async fn classify(&self, image: &PortableImage) -> Result<ClassificationVerdict, DecodeError> {
        let verdict = self.inner.classify(image).await?;
        *self.last.lock().unwrap_or_else(PoisonError::into_inner) = Some(verdict);
        Ok(verdict)
    }
}
