//! # Slot Module
//!
//! One labeled upload slot (avatar or QR code): runs the ingest/classify
//! chain for each selection, keeps preview and advisory state, and reports
//! accepted images to the owning form.

pub mod controller;
pub mod state;

pub use controller::{CompletionCallback, UploadSlotController, UploadSlotControllerBuilder};
pub use state::{SelectOutcome, SlotPhase, UploadSlotState};
