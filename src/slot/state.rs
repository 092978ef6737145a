//! Slot phases, observable slot state, and per-selection outcomes.

use std::fmt;

use serde::Serialize;

use crate::error::SlotRejection;
use crate::ingest::PortableImage;

/// `Empty -> Ingesting -> (Accepted | Rejected)`, and back to `Empty` on removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotPhase {
    Empty,
    Ingesting,
    Accepted,
    Rejected,
}

impl fmt::Display for SlotPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SlotPhase::Empty => "empty",
            SlotPhase::Ingesting => "ingesting",
            SlotPhase::Accepted => "accepted",
            SlotPhase::Rejected => "rejected",
        };
        f.write_str(name)
    }
}

/// What the slot shows: the last accepted image and the current advisory text.
///
/// A rejection sets `error_message` but leaves `preview` as it was.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadSlotState {
    pub preview: Option<PortableImage>,
    pub error_message: Option<String>,
}

/// Result of one `select` call.
#[derive(Debug)]
pub enum SelectOutcome {
    /// Image committed to the slot; the completion callback has fired.
    Accepted(PortableImage),
    /// Image refused; prior preview untouched.
    Rejected(SlotRejection),
    /// A newer `select` or a `remove` overtook this one; its result was discarded.
    Superseded,
}

impl SelectOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, SelectOutcome::Accepted(_))
    }

    pub fn is_superseded(&self) -> bool {
        matches!(self, SelectOutcome::Superseded)
    }

    pub fn rejection(&self) -> Option<&SlotRejection> {
        match self {
            SelectOutcome::Rejected(rejection) => Some(rejection),
            _ => None,
        }
    }
}
