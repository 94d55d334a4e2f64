use bytes::Bytes;
use std::fmt;

/// Content types accepted in the notes slot.
pub const NOTES_CONTENT_TYPES: &[&str] = &[
    "application/pdf",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
];

/// One of the two fixed upload positions of a draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttachmentSlot {
    Video,
    Notes,
}

impl AttachmentSlot {
    pub const ALL: [AttachmentSlot; 2] = [AttachmentSlot::Video, AttachmentSlot::Notes];

    /// Multipart part name used when the attachment is sent to the store.
    pub fn part_name(self) -> &'static str {
        match self {
            AttachmentSlot::Video => "video",
            AttachmentSlot::Notes => "notes",
        }
    }

    /// Whether `content_type` belongs to this slot's MIME category.
    pub fn accepts(self, content_type: &str) -> bool {
        let normalized = normalize_mime_type(content_type);
        match self {
            AttachmentSlot::Video => normalized
                .strip_prefix("video/")
                .is_some_and(|subtype| !subtype.is_empty()),
            AttachmentSlot::Notes => NOTES_CONTENT_TYPES.contains(&normalized.as_str()),
        }
    }

    /// Human-readable description of what the slot accepts.
    pub fn accepted_description(self) -> &'static str {
        match self {
            AttachmentSlot::Video => "video/*",
            AttachmentSlot::Notes => "PDF or Word document",
        }
    }
}

impl fmt::Display for AttachmentSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.part_name())
    }
}

/// Normalize MIME type by stripping parameters and lower-casing
/// (e.g. "Application/PDF; name=x" -> "application/pdf").
pub fn normalize_mime_type(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or(content_type)
        .trim()
        .to_lowercase()
}

/// Binary file selected for an attachment slot.
#[derive(Clone, PartialEq, Eq)]
pub struct Attachment {
    pub file_name: String,
    pub content_type: String,
    pub data: Bytes,
}

impl Attachment {
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        data: impl Into<Bytes>,
    ) -> Self {
        Attachment {
            file_name: file_name.into(),
            content_type: content_type.into(),
            data: data.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

// Keep file contents out of logs.
impl fmt::Debug for Attachment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Attachment")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.data.len())
            .finish()
    }
}

/// Attachments of a submission, at most one per slot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TopicAttachments {
    pub video: Option<Attachment>,
    pub notes: Option<Attachment>,
}

impl TopicAttachments {
    pub fn get(&self, slot: AttachmentSlot) -> Option<&Attachment> {
        match slot {
            AttachmentSlot::Video => self.video.as_ref(),
            AttachmentSlot::Notes => self.notes.as_ref(),
        }
    }

    fn slot_mut(&mut self, slot: AttachmentSlot) -> &mut Option<Attachment> {
        match slot {
            AttachmentSlot::Video => &mut self.video,
            AttachmentSlot::Notes => &mut self.notes,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.video.is_none() && self.notes.is_none()
    }

    /// Present attachments with their slot, video first.
    pub fn iter(&self) -> impl Iterator<Item = (AttachmentSlot, &Attachment)> {
        AttachmentSlot::ALL
            .into_iter()
            .filter_map(move |slot| self.get(slot).map(|a| (slot, a)))
    }
}

/// Text fields of an upload draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftField {
    Title,
    Description,
    UnitName,
    ClassName,
}

/// Unsaved form state for a topic being created.
///
/// Built empty, edited field by field, and consumed by a single submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadDraft {
    pub title: String,
    pub description: String,
    pub unit_name: String,
    pub class_name: String,
    pub attachments: TopicAttachments,
}

impl UploadDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, field: DraftField, value: impl Into<String>) {
        *self.field_mut(field) = value.into();
    }

    pub fn field(&self, field: DraftField) -> &str {
        match field {
            DraftField::Title => &self.title,
            DraftField::Description => &self.description,
            DraftField::UnitName => &self.unit_name,
            DraftField::ClassName => &self.class_name,
        }
    }

    fn field_mut(&mut self, field: DraftField) -> &mut String {
        match field {
            DraftField::Title => &mut self.title,
            DraftField::Description => &mut self.description,
            DraftField::UnitName => &mut self.unit_name,
            DraftField::ClassName => &mut self.class_name,
        }
    }

    /// Put `attachment` in `slot`, returning whatever it replaced.
    pub fn attach(&mut self, slot: AttachmentSlot, attachment: Attachment) -> Option<Attachment> {
        self.attachments.slot_mut(slot).replace(attachment)
    }

    pub fn detach(&mut self, slot: AttachmentSlot) -> Option<Attachment> {
        self.attachments.slot_mut(slot).take()
    }

    pub fn attachment(&self, slot: AttachmentSlot) -> Option<&Attachment> {
        self.attachments.get(slot)
    }

    /// Split into the text-only draft and its attachments.
    pub fn into_parts(mut self) -> (UploadDraft, TopicAttachments) {
        let attachments = std::mem::take(&mut self.attachments);
        (self, attachments)
    }
}
