//! # Profile Records and Drafts
//!
//! [`UserProfile`] is the business-card record. [`ProfileDraft`] is the form
//! side of an edit: it owns the field values and is the receiver of each
//! upload slot's completion callback, so the `avatar` and `qr_code` fields
//! only ever hold images a slot accepted (or the empty string).

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::config::SlotKind;
use crate::error::ProfileError;
use crate::ingest::PortableImage;
use crate::slot::{UploadSlotController, UploadSlotControllerBuilder};

/// One business-card profile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    pub title: String,
    pub description: String,
    /// Data URI, or empty when unset.
    pub avatar: String,
    /// Data URI, or empty when unset.
    pub qr_code: String,
}

/// Shared, editable form state for one profile.
///
/// Cloning yields another handle to the same draft; slot callbacks hold one.
#[derive(Debug, Clone, Default)]
pub struct ProfileDraft {
    fields: Arc<Mutex<UserProfile>>,
}

impl ProfileDraft {
    /// Blank draft for a new profile.
    pub fn new() -> Self {
        Self::default()
    }

    /// Draft pre-filled from an existing profile; its id is kept on submit.
    pub fn editing(profile: UserProfile) -> Self {
        Self {
            fields: Arc::new(Mutex::new(profile)),
        }
    }

    pub fn set_name(&self, name: impl Into<String>) {
        self.lock().name = name.into();
    }

    pub fn set_title(&self, title: impl Into<String>) {
        self.lock().title = title.into();
    }

    pub fn set_description(&self, description: impl Into<String>) {
        self.lock().description = description.into();
    }

    /// Current field values.
    pub fn snapshot(&self) -> UserProfile {
        self.lock().clone()
    }

    /// Slot builder wired to the field `kind` feeds.
    ///
    /// The slot is seeded with the field's current image and writes every
    /// accepted image (or the empty string on removal) back into the draft.
    pub fn slot_builder(&self, kind: SlotKind) -> UploadSlotControllerBuilder {
        let current = {
            let fields = self.lock();
            match kind {
                SlotKind::Avatar => fields.avatar.clone(),
                SlotKind::QrCode => fields.qr_code.clone(),
            }
        };
        // Stored values that are not data URIs (hosted image URLs) stay in the
        // field untouched but do not seed the preview.
        let seed = PortableImage::parse(current).unwrap_or_default();

        let draft = self.clone();
        UploadSlotController::builder(kind.label())
            .qr_constrained(kind.is_qr_constrained())
            .with_initial_image(seed)
            .on_complete(move |image| {
                let mut fields = draft.lock();
                let value = image.as_str().to_string();
                match kind {
                    SlotKind::Avatar => fields.avatar = value,
                    SlotKind::QrCode => fields.qr_code = value,
                }
            })
    }

    /// Unconstrained avatar slot with the default classifier.
    pub fn avatar_slot(&self) -> UploadSlotController {
        self.slot_builder(SlotKind::Avatar).build()
    }

    /// QR-constrained slot with the default classifier.
    pub fn qr_slot(&self) -> UploadSlotController {
        self.slot_builder(SlotKind::QrCode).build()
    }

    /// Validate required fields and produce the record.
    ///
    /// A new profile gets a millisecond-timestamp id; an edited one keeps its id.
    pub fn submit(&self) -> Result<UserProfile, ProfileError> {
        let mut profile = self.snapshot();
        for (field, value) in [
            ("name", &profile.name),
            ("title", &profile.title),
            ("description", &profile.description),
        ] {
            if value.trim().is_empty() {
                return Err(ProfileError::MissingField(field));
            }
        }

        if profile.id.is_empty() {
            profile.id = timestamp_id();
        }
        Ok(profile)
    }

    fn lock(&self) -> MutexGuard<'_, UserProfile> {
        self.fields.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn timestamp_id() -> String {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn submit_requires_text_fields() {
        let draft = ProfileDraft::new();
        draft.set_name("Zhang");
        assert_eq!(
            draft.submit().unwrap_err(),
            ProfileError::MissingField("title")
        );
        draft.set_title("Engineer");
        draft.set_description("   ");
        assert_eq!(
            draft.submit().unwrap_err(),
            ProfileError::MissingField("description")
        );
    }

    #[test]
    fn new_profiles_get_an_id_edits_keep_theirs() {
        let draft = ProfileDraft::new();
        draft.set_name("a");
        draft.set_title("b");
        draft.set_description("c");
        let created = draft.submit().unwrap();
        assert!(!created.id.is_empty());
        assert!(created.id.chars().all(|c| c.is_ascii_digit()));

        let edited = ProfileDraft::editing(UserProfile {
            id: "42".to_string(),
            ..created
        });
        assert_eq!(edited.submit().unwrap().id, "42");
    }

    #[test]
    fn removing_a_seeded_image_clears_the_field() {
        let image = PortableImage::encode("image/png", b"png");
        let draft = ProfileDraft::editing(UserProfile {
            avatar: image.as_str().to_string(),
            ..UserProfile::default()
        });

        let slot = draft.avatar_slot();
        assert_eq!(slot.state().preview, Some(image));

        slot.remove();
        assert_eq!(draft.snapshot().avatar, "");
    }

    #[test]
    fn hosted_urls_are_kept_but_not_previewed() {
        let draft = ProfileDraft::editing(UserProfile {
            qr_code: "https://images.example.com/qr.png".to_string(),
            ..UserProfile::default()
        });
        let slot = draft.qr_slot();
        assert_eq!(slot.phase(), crate::slot::SlotPhase::Empty);
        assert!(slot.state().preview.is_none());
        assert_eq!(draft.snapshot().qr_code, "https://images.example.com/qr.png");
    }

    #[test]
    fn profile_serializes_camel_case() {
        let json = serde_json::to_value(UserProfile {
            qr_code: "data:image/png;base64,AA==".to_string(),
            ..UserProfile::default()
        })
        .unwrap();
        assert_eq!(json["qrCode"], "data:image/png;base64,AA==");
    }
}
