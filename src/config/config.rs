//! # Intake Configuration
//!
//! Options for one intake run: which file, which kind of slot, and how to
//! report the result. This is the common interface between the `intake` CLI
//! and the library.
//!
//! ## Configuration Parameters
//!
//! | Parameter | Type | Default | Description |
//! |-----------|------|---------|-------------|
//! | `path` | `PathBuf` | none | File to ingest |
//! | `kind` | `SlotKind` | `avatar` | Slot kind; `qr-code` enables the plausibility check |
//! | `label` | `Option<String>` | kind's label | Slot label used in logs and output |
//! | `json` | `bool` | `false` | Emit a JSON report instead of text |
//! | `share` | `Option<ShareTarget>` | `None` | Also print share text for this platform |
//! | `share_url` | `String` | empty | Link appended to share text |
//! | `name` | `String` | empty | Profile name for share text |
//! | `title` | `String` | empty | Profile title for share text |
//! | `description` | `String` | empty | Profile description for share text |
//! | `log_level` | `String` | `warn` | `tracing` filter directive |
//!
//! ## Fixed Policy
//!
//! The size ceiling (5 MiB), brightness threshold (128) and plausibility band
//! (0.2, 0.8) are not configuration. Changing them changes which uploads an
//! operator sees accepted, so they live as constants next to the code that
//! applies them.
//!
//! ## Examples
//!
//! ```rust
//! use card_intake::config::{IntakeConfig, SlotKind};
//!
//! let mut config = IntakeConfig::default();
//! config.path = "qr.png".into();
//! config.kind = SlotKind::QrCode;
//!
//! assert!(config.validate().is_ok());
//! assert_eq!(config.effective_label(), "qr code");
//!
//! let slot = config.slot_builder().build();
//! assert!(slot.is_qr_constrained());
//! ```

use std::path::PathBuf;

use serde::Serialize;

use crate::error::ProfileError;
use crate::profile::{ProfileDraft, UserProfile};
use crate::share::ShareTarget;
use crate::slot::UploadSlotControllerBuilder;

/// Which profile field an upload slot feeds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, clap::ValueEnum)]
#[serde(rename_all = "camelCase")]
pub enum SlotKind {
    /// Profile photo; any decodable upload within the size ceiling.
    #[default]
    Avatar,
    /// Contact QR image; must pass the plausibility check.
    QrCode,
}

impl SlotKind {
    pub fn is_qr_constrained(self) -> bool {
        matches!(self, SlotKind::QrCode)
    }

    /// Default slot label.
    pub fn label(self) -> &'static str {
        match self {
            SlotKind::Avatar => "avatar",
            SlotKind::QrCode => "qr code",
        }
    }
}

/// Configuration for one intake run.
#[derive(Debug, Clone)]
pub struct IntakeConfig {
    /// File to run through the slot.
    pub path: PathBuf,

    /// Slot kind. `QrCode` makes the slot QR-constrained.
    pub kind: SlotKind,

    /// Overrides the kind's default label.
    pub label: Option<String>,

    /// Emit a JSON report on stdout.
    pub json: bool,

    /// Also print share text for this platform once the image is accepted.
    pub share: Option<ShareTarget>,

    /// Link appended to share text. Required when `share` is set.
    pub share_url: String,

    /// Profile fields the share text is built from. Required when `share` is set.
    pub name: String,
    pub title: String,
    pub description: String,

    /// `tracing` filter directive, e.g. `info` or `card_intake=debug`.
    pub log_level: String,
}

impl Default for IntakeConfig {
    /// Default values:
    /// - `path`: empty (must be set)
    /// - `kind`: `Avatar`
    /// - `label`: `None`
    /// - `json`: `false`
    /// - `share`: `None`
    /// - `share_url`: empty
    /// - `name`, `title`, `description`: empty
    /// - `log_level`: `"warn"`
    fn default() -> Self {
        Self {
            path: PathBuf::new(),
            kind: SlotKind::Avatar,
            label: None,
            json: false,
            share: None,
            share_url: String::new(),
            name: String::new(),
            title: String::new(),
            description: String::new(),
            log_level: "warn".to_string(),
        }
    }
}

impl IntakeConfig {
    /// Creates a new configuration for `path` with the given slot kind.
    pub fn new(path: impl Into<PathBuf>, kind: SlotKind) -> Self {
        Self {
            path: path.into(),
            kind,
            ..Self::default()
        }
    }

    /// Validates the configuration parameters.
    pub fn validate(&self) -> Result<(), String> {
        if self.path.as_os_str().is_empty() {
            return Err("An input file path is required".to_string());
        }
        if let Some(label) = &self.label {
            if label.trim().is_empty() {
                return Err("Slot label must not be blank".to_string());
            }
        }
        if self.share.is_some() {
            let url = self.share_url.trim();
            if url.is_empty() {
                return Err("--share-url is required when --share is set".to_string());
            }
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(format!("Share URL must be http(s): {}", url));
            }
            self.share_profile().map_err(|ProfileError::MissingField(field)| {
                format!("--{} is required when --share is set", field)
            })?;
        }
        Ok(())
    }

    /// Profile the share text is built from.
    pub fn share_profile(&self) -> Result<UserProfile, ProfileError> {
        let draft = ProfileDraft::new();
        draft.set_name(self.name.as_str());
        draft.set_title(self.title.as_str());
        draft.set_description(self.description.as_str());
        draft.submit()
    }

    /// The label the slot is built with.
    pub fn effective_label(&self) -> &str {
        self.label
            .as_deref()
            .map(str::trim)
            .unwrap_or_else(|| self.kind.label())
    }

    /// Slot builder preconfigured with this run's label and QR constraint.
    pub fn slot_builder(&self) -> UploadSlotControllerBuilder {
        UploadSlotControllerBuilder::new(self.effective_label())
            .qr_constrained(self.kind.is_qr_constrained())
    }
}
