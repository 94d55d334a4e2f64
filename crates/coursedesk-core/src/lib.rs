//! Coursedesk Core Library
//!
//! This crate provides the topic catalog's domain models, validation rules,
//! the local query engine, error types and configuration shared by every
//! Coursedesk component.

pub mod config;
pub mod error;
pub mod models;
pub mod query;
pub mod store_types;
pub mod validation;

// Re-export commonly used types
pub use config::Config;
pub use error::{ErrorMetadata, LogLevel, StoreError, StoreResult, ValidationError};
pub use models::{
    Attachment, AttachmentSlot, DraftField, NewTopic, TopicAttachments, TopicId, TopicRecord,
    UploadDraft,
};
pub use store_types::StoreBackend;
pub use validation::{validate, validate_with_limits, UploadLimits};
