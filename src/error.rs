//! # Intake Error Taxonomy
//!
//! Typed failures for the image intake pipeline plus the classification traits
//! the upload slot uses to turn them into advisory text.
//!
//! ## Taxonomy
//!
//! | Failure | Raised by | Meaning |
//! |---------|-----------|---------|
//! | [`IngestError::TooLarge`] | ingestor | input exceeds the size ceiling |
//! | [`IngestError::Read`] | ingestor | byte stream could not be read in full |
//! | [`DecodeError`] | classifier | data URI or image payload is malformed/unsupported |
//! | [`SlotRejection::NotQr`] | slot | image decoded but is not a plausible QR code |
//!
//! None of these is fatal. Every one is caught at the upload slot, reported as
//! an advisory message, and leaves previously accepted state intact. There is
//! no automatic retry; re-entering the pipeline takes a new file selection.
//!
//! ## Usage
//!
//! ```rust
//! use card_intake::error::{IngestError, Recoverable, SlotRejection};
//!
//! let err = IngestError::TooLarge { size: 6 * 1024 * 1024, limit: 5 * 1024 * 1024 };
//! assert!(err.is_recoverable());
//!
//! let rejection = SlotRejection::from(err);
//! assert_eq!(rejection.user_message(), "file exceeds size limit");
//! ```

use thiserror::Error;

use crate::classify::ClassificationVerdict;

/// Advisory text shown when the input exceeds the size ceiling.
pub const MSG_TOO_LARGE: &str = "file exceeds size limit";

/// Advisory text shown when a QR-constrained slot rejects an image.
pub const MSG_NOT_QR: &str = "not a valid QR code image";

/// Advisory text shown when the file bytes could not be read.
pub const MSG_READ_FAILED: &str = "could not read file";

/// Severity levels for intake failures
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    /// Informational, nothing went wrong
    Info,
    /// Business-rule rejection of otherwise valid input
    Warning,
    /// System-level failure (I/O, decode)
    Error,
    /// Unrecoverable; no intake failure is ever classified here
    Fatal,
}

/// Failures raised while turning a raw file into a [`PortableImage`](crate::ingest::PortableImage).
#[derive(Debug, Error)]
pub enum IngestError {
    /// File is larger than the size ceiling; nothing was read.
    #[error("file is {size} bytes, exceeding the {limit} byte limit")]
    TooLarge { size: u64, limit: u64 },

    /// Reading the byte stream failed or came back short.
    #[error("failed to read file: {reason}")]
    Read {
        reason: String,
        #[source]
        source: Option<std::io::Error>,
    },
}

impl IngestError {
    pub(crate) fn read(source: std::io::Error) -> Self {
        Self::Read {
            reason: source.to_string(),
            source: Some(source),
        }
    }

    pub(crate) fn truncated(expected: u64, actual: u64) -> Self {
        Self::Read {
            reason: format!("stream ended after {actual} of {expected} bytes"),
            source: None,
        }
    }
}

/// Failures raised while decoding a portable image into pixels.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// Not of the form `data:<mime>;base64,<payload>`.
    #[error("malformed data URI: {0}")]
    MalformedUri(String),

    #[error("invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),

    /// Bytes are not in an image format the decoder understands.
    #[error("unsupported image format (mime: {mime})")]
    UnsupportedFormat { mime: String },

    #[error("image decode failed: {0}")]
    Image(#[from] image::ImageError),

    /// Pixel buffer did not match the decoded dimensions.
    #[error("pixel buffer error: {0}")]
    Pixels(#[from] qr_luma::LumaError),

    /// The blocking decode task panicked or was cancelled.
    #[error("decode task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Why a slot refused a selection. This is what the slot records; the form
/// only ever sees [`user_message`](SlotRejection::user_message).
#[derive(Debug, Error)]
pub enum SlotRejection {
    #[error("{}", MSG_TOO_LARGE)]
    TooLarge(#[source] IngestError),

    #[error("{}", MSG_READ_FAILED)]
    ReadFailed(#[source] IngestError),

    /// Decode failed, or the verdict fell outside the plausibility band.
    #[error("{}", MSG_NOT_QR)]
    NotQr {
        verdict: Option<ClassificationVerdict>,
        #[source]
        source: Option<DecodeError>,
    },
}

impl SlotRejection {
    /// Verbatim advisory text for the operator.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::TooLarge(_) => MSG_TOO_LARGE,
            Self::ReadFailed(_) => MSG_READ_FAILED,
            Self::NotQr { .. } => MSG_NOT_QR,
        }
    }

    pub fn implausible(verdict: ClassificationVerdict) -> Self {
        Self::NotQr {
            verdict: Some(verdict),
            source: None,
        }
    }

    pub fn undecodable(source: DecodeError) -> Self {
        Self::NotQr {
            verdict: None,
            source: Some(source),
        }
    }

    /// Get the rejection category as a string
    pub fn category(&self) -> &'static str {
        match self {
            Self::TooLarge(_) => "too_large",
            Self::ReadFailed(_) => "read_error",
            Self::NotQr { source: Some(_), .. } => "decode_error",
            Self::NotQr { .. } => "implausible_qr",
        }
    }
}

impl From<IngestError> for SlotRejection {
    fn from(error: IngestError) -> Self {
        match error {
            IngestError::TooLarge { .. } => Self::TooLarge(error),
            IngestError::Read { .. } => Self::ReadFailed(error),
        }
    }
}

/// Failures raised when submitting a profile draft.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProfileError {
    /// A required text field is empty or whitespace.
    #[error("{0} is required")]
    MissingField(&'static str),
}

/// Trait for errors that can be recovered from
pub trait Recoverable {
    /// Check if this error can be recovered from
    fn is_recoverable(&self) -> bool;
}

/// Trait for errors with severity levels
pub trait HasSeverity {
    /// Get the severity level of this error
    fn severity(&self) -> ErrorSeverity;
}

/// Trait for errors that provide recovery suggestions
pub trait HasRecoverySuggestion {
    /// Get recovery suggestion for this error
    fn recovery_suggestion(&self) -> Option<&str>;
}

impl Recoverable for IngestError {
    fn is_recoverable(&self) -> bool {
        true
    }
}

impl Recoverable for DecodeError {
    fn is_recoverable(&self) -> bool {
        true
    }
}

impl Recoverable for SlotRejection {
    fn is_recoverable(&self) -> bool {
        true
    }
}

impl HasSeverity for IngestError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::TooLarge { .. } => ErrorSeverity::Warning,
            Self::Read { .. } => ErrorSeverity::Error,
        }
    }
}

impl HasSeverity for DecodeError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Error
    }
}

impl HasSeverity for SlotRejection {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::TooLarge(e) | Self::ReadFailed(e) => e.severity(),
            Self::NotQr { source: Some(e), .. } => e.severity(),
            Self::NotQr { .. } => ErrorSeverity::Warning,
        }
    }
}

impl HasRecoverySuggestion for IngestError {
    fn recovery_suggestion(&self) -> Option<&str> {
        match self {
            Self::TooLarge { .. } => Some("Select a file of 5 MiB or less"),
            Self::Read { .. } => Some("Select the file again"),
        }
    }
}

impl HasRecoverySuggestion for DecodeError {
    fn recovery_suggestion(&self) -> Option<&str> {
        Some("Select a PNG, JPEG, GIF, BMP or WebP image")
    }
}

impl HasRecoverySuggestion for SlotRejection {
    fn recovery_suggestion(&self) -> Option<&str> {
        match self {
            Self::TooLarge(e) | Self::ReadFailed(e) => e.recovery_suggestion(),
            Self::NotQr { source: Some(e), .. } => e.recovery_suggestion(),
            Self::NotQr { .. } => Some("Upload a cropped image of the QR code itself"),
        }
    }
}

/// Error classification utilities
pub mod classify {
    use super::*;

    /// Rejections caused by policy (size ceiling, QR heuristic) rather than a
    /// system fault.
    pub fn is_policy_rejection(rejection: &SlotRejection) -> bool {
        matches!(
            rejection,
            SlotRejection::TooLarge(_) | SlotRejection::NotQr { source: None, .. }
        )
    }

    /// Whether selecting the same file again cannot succeed.
    pub fn requires_new_file(rejection: &SlotRejection) -> bool {
        !matches!(rejection, SlotRejection::ReadFailed(_))
    }

    /// Get error priority (higher numbers = higher priority)
    pub fn priority(rejection: &SlotRejection) -> u8 {
        match rejection.severity() {
            ErrorSeverity::Info => 0,
            ErrorSeverity::Warning => 1,
            ErrorSeverity::Error => 2,
            ErrorSeverity::Fatal => 3,
        }
    }
}
