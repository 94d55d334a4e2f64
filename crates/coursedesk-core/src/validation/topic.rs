//! Draft validation
//!
//! Runs on the client before any request is built. A draft that fails here
//! never reaches the storage gateway.

use crate::error::ValidationError;
use crate::models::{Attachment, AttachmentSlot, NewTopic, UploadDraft};

pub const MAX_VIDEO_SIZE_BYTES: usize = 500 * 1024 * 1024;
pub const MAX_NOTES_SIZE_BYTES: usize = 50 * 1024 * 1024;

/// Per-slot attachment size limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadLimits {
    pub max_video_bytes: usize,
    pub max_notes_bytes: usize,
}

impl Default for UploadLimits {
    fn default() -> Self {
        UploadLimits {
            max_video_bytes: MAX_VIDEO_SIZE_BYTES,
            max_notes_bytes: MAX_NOTES_SIZE_BYTES,
        }
    }
}

impl UploadLimits {
    pub fn max_bytes(&self, slot: AttachmentSlot) -> usize {
        match slot {
            AttachmentSlot::Video => self.max_video_bytes,
            AttachmentSlot::Notes => self.max_notes_bytes,
        }
    }
}

/// Validate a draft with the default upload limits.
pub fn validate(draft: &UploadDraft) -> Result<NewTopic, ValidationError> {
    validate_with_limits(draft, &UploadLimits::default())
}

/// Validate a draft and produce the fields to submit.
///
/// The title is trimmed and must be non-empty. Description is passed through
/// as typed; empty unit and class names become `None`.
pub fn validate_with_limits(
    draft: &UploadDraft,
    limits: &UploadLimits,
) -> Result<NewTopic, ValidationError> {
    let title = draft.title.trim();
    if title.is_empty() {
        return Err(ValidationError::EmptyTitle);
    }

    for (slot, attachment) in draft.attachments.iter() {
        validate_attachment(slot, attachment, limits)?;
    }

    Ok(NewTopic {
        title: title.to_string(),
        description: draft.description.clone(),
        unit_name: non_empty(&draft.unit_name),
        class_name: non_empty(&draft.class_name),
    })
}

/// Check one attachment against its slot's MIME category and size limit.
pub fn validate_attachment(
    slot: AttachmentSlot,
    attachment: &Attachment,
    limits: &UploadLimits,
) -> Result<(), ValidationError> {
    if !slot.accepts(&attachment.content_type) {
        return Err(ValidationError::InvalidAttachmentType {
            slot,
            content_type: attachment.content_type.clone(),
        });
    }
    if attachment.is_empty() {
        return Err(ValidationError::EmptyAttachment { slot });
    }
    let max = limits.max_bytes(slot);
    if attachment.len() > max {
        return Err(ValidationError::AttachmentTooLarge {
            slot,
            size: attachment.len(),
            max,
        });
    }
    Ok(())
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}
