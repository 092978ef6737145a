//! # Upload Slot Controller
//!
//! Orchestrates [`ImageIngestor`] and a [`PlausibilityCheck`] for a single
//! labeled slot.
//!
//! ## Selection flow
//!
//! ```text
//! select(file) ──▶ Ingesting ──▶ ingest ──TooLarge/Read──────────────▶ Rejected
//!                                   │
//!                                   ├─ unconstrained ─────────────────▶ Accepted ──▶ callback(image)
//!                                   │
//!                                   └─ QR-constrained ─▶ classify ─┬─ plausible ─▶ Accepted ──▶ callback(image)
//!                                                                  └─ otherwise ─▶ Rejected
//! remove() ──▶ Empty ──▶ callback(empty)
//! ```
//!
//! ## Supersession
//!
//! Every `select` and `remove` takes a new ticket. When a selection finishes,
//! its result is applied only if its ticket is still the latest; otherwise it
//! is dropped as stale. Nothing is cancelled in the read or decode itself.
//!
//! The state lock is held only for bookkeeping, never across an await, and
//! the completion callback runs after it is released. A separate notify lock
//! is held from the ticket check through the callback, so callbacks reach the
//! form in ticket order: once `remove` or a newer selection has settled, no
//! older result can be delivered after it. The callback must not call
//! `remove` on its own slot.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, info};

use crate::classify::{PlausibilityCheck, QrPlausibilityClassifier};
use crate::error::SlotRejection;
use crate::ingest::{ImageIngestor, PortableImage, RawFile};
use crate::slot::{SelectOutcome, SlotPhase, UploadSlotState};

/// Receives each accepted image, or [`PortableImage::empty`] on removal.
pub type CompletionCallback = Box<dyn Fn(&PortableImage) + Send + Sync>;

struct SlotInner {
    phase: SlotPhase,
    state: UploadSlotState,
    ticket: u64,
}

/// Controller for one upload slot. Owns its state exclusively.
pub struct UploadSlotController {
    label: String,
    qr_constrained: bool,
    ingestor: ImageIngestor,
    classifier: Arc<dyn PlausibilityCheck>,
    on_complete: CompletionCallback,
    // Lock order: notify, then inner.
    notify: Mutex<()>,
    inner: Mutex<SlotInner>,
}

impl UploadSlotController {
    /// Create a new controller using the builder pattern.
    pub fn builder(label: impl Into<String>) -> UploadSlotControllerBuilder {
        UploadSlotControllerBuilder::new(label)
    }

    /// Controller with the default classifier and no seed image.
    pub fn new<F>(label: impl Into<String>, qr_constrained: bool, on_complete: F) -> Self
    where
        F: Fn(&PortableImage) + Send + Sync + 'static,
    {
        Self::builder(label)
            .qr_constrained(qr_constrained)
            .on_complete(on_complete)
            .build()
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn is_qr_constrained(&self) -> bool {
        self.qr_constrained
    }

    pub fn phase(&self) -> SlotPhase {
        self.lock().phase
    }

    /// Snapshot of the preview and advisory message.
    pub fn state(&self) -> UploadSlotState {
        self.lock().state.clone()
    }

    /// Run a file selection through the pipeline.
    ///
    /// Clears any previous advisory message and enters `Ingesting`. The prior
    /// preview stays visible until this selection is accepted. If another
    /// `select` or `remove` happens before this one finishes, the result is
    /// discarded and [`SelectOutcome::Superseded`] is returned.
    pub async fn select(&self, file: &dyn RawFile) -> SelectOutcome {
        let ticket = self.begin();
        debug!(
            slot = %self.label,
            ticket,
            file = file.name(),
            bytes = file.byte_len(),
            "selection started"
        );

        let result = self.evaluate(file).await;
        self.settle(ticket, result)
    }

    /// Clear the slot from any phase and tell the form the field is unset.
    ///
    /// Also invalidates any in-flight selection. Safe to call on an empty
    /// slot; a stale advisory message is still cleared.
    pub fn remove(&self) {
        let _notify = self.notify_lock();
        {
            let mut inner = self.lock();
            inner.ticket += 1;
            inner.phase = SlotPhase::Empty;
            inner.state = UploadSlotState::default();
            debug!(slot = %self.label, ticket = inner.ticket, "slot cleared");
        }
        (self.on_complete)(&PortableImage::empty());
    }

    async fn evaluate(&self, file: &dyn RawFile) -> Result<PortableImage, SlotRejection> {
        let image = self.ingestor.ingest(file).await?;
        if !self.qr_constrained {
            return Ok(image);
        }

        match self.classifier.classify(&image).await {
            Ok(verdict) if verdict.is_plausible_qr => Ok(image),
            Ok(verdict) => Err(SlotRejection::implausible(verdict)),
            Err(err) => Err(SlotRejection::undecodable(err)),
        }
    }

    fn begin(&self) -> u64 {
        let mut inner = self.lock();
        inner.ticket += 1;
        inner.phase = SlotPhase::Ingesting;
        inner.state.error_message = None;
        inner.ticket
    }

    fn settle(&self, ticket: u64, result: Result<PortableImage, SlotRejection>) -> SelectOutcome {
        let _notify = self.notify_lock();
        let mut inner = self.lock();
        if inner.ticket != ticket {
            debug!(
                slot = %self.label,
                ticket,
                latest = inner.ticket,
                "discarding stale selection result"
            );
            return SelectOutcome::Superseded;
        }

        match result {
            Ok(image) => {
                inner.phase = SlotPhase::Accepted;
                inner.state.preview = Some(image.clone());
                inner.state.error_message = None;
                drop(inner);

                info!(
                    slot = %self.label,
                    ticket,
                    mime = image.mime().unwrap_or_default(),
                    "image accepted"
                );
                (self.on_complete)(&image);
                SelectOutcome::Accepted(image)
            }
            Err(rejection) => {
                inner.phase = SlotPhase::Rejected;
                inner.state.error_message = Some(rejection.user_message().to_string());
                drop(inner);

                info!(
                    slot = %self.label,
                    ticket,
                    reason = rejection.category(),
                    detail = %DetailChain(&rejection),
                    "image rejected"
                );
                SelectOutcome::Rejected(rejection)
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, SlotInner> {
        // A panicking callback never holds this lock, so a poisoned guard
        // still carries consistent state.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn notify_lock(&self) -> MutexGuard<'_, ()> {
        self.notify.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Renders an error followed by its source chain, `a: b: c`.
struct DetailChain<'a>(&'a (dyn std::error::Error + 'static));

impl std::fmt::Display for DetailChain<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)?;
        let mut source = self.0.source();
        while let Some(err) = source {
            write!(f, ": {}", err)?;
            source = err.source();
        }
        Ok(())
    }
}

/// Builder for upload slots with fluent API.
pub struct UploadSlotControllerBuilder {
    label: String,
    qr_constrained: bool,
    classifier: Option<Arc<dyn PlausibilityCheck>>,
    initial: Option<PortableImage>,
    on_complete: Option<CompletionCallback>,
}

impl UploadSlotControllerBuilder {
    /// Create a new slot builder.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            qr_constrained: false,
            classifier: None,
            initial: None,
            on_complete: None,
        }
    }

    /// Require every accepted image to pass the QR plausibility check.
    pub fn qr_constrained(mut self, qr_constrained: bool) -> Self {
        self.qr_constrained = qr_constrained;
        self
    }

    /// Replace the default [`QrPlausibilityClassifier`].
    pub fn with_classifier(mut self, classifier: Arc<dyn PlausibilityCheck>) -> Self {
        self.classifier = Some(classifier);
        self
    }

    /// Start `Accepted` with an image the form already holds. An empty image
    /// leaves the slot `Empty`. The callback is not fired for the seed.
    pub fn with_initial_image(mut self, image: PortableImage) -> Self {
        self.initial = (!image.is_empty()).then_some(image);
        self
    }

    pub fn on_complete<F>(mut self, callback: F) -> Self
    where
        F: Fn(&PortableImage) + Send + Sync + 'static,
    {
        self.on_complete = Some(Box::new(callback));
        self
    }

    /// Build the slot. Without a callback, accepted images are only kept in
    /// the slot's own state.
    pub fn build(self) -> UploadSlotController {
        let phase = if self.initial.is_some() {
            SlotPhase::Accepted
        } else {
            SlotPhase::Empty
        };

        UploadSlotController {
            label: self.label,
            qr_constrained: self.qr_constrained,
            ingestor: ImageIngestor::new(),
            classifier: self
                .classifier
                .unwrap_or_else(|| Arc::new(QrPlausibilityClassifier::new())),
            on_complete: self
                .on_complete
                .unwrap_or_else(|| Box::new(|_: &PortableImage| {})),
            notify: Mutex::new(()),
            inner: Mutex::new(SlotInner {
                phase,
                state: UploadSlotState {
                    preview: self.initial,
                    error_message: None,
                },
                ticket: 0,
            }),
        }
    }
}
