//! Validation modules

pub mod topic;

pub use topic::{
    validate, validate_attachment, validate_with_limits, UploadLimits, MAX_NOTES_SIZE_BYTES,
    MAX_VIDEO_SIZE_BYTES,
};
