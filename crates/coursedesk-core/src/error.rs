//! Error types module
//!
//! Two families of errors exist in the catalog: `ValidationError`, raised
//! locally before any network call, and `StoreError`, raised by the storage
//! gateway when a call to the remote catalog store fails. Both self-describe
//! through `ErrorMetadata` so front ends can present them uniformly.

use crate::models::AttachmentSlot;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for recoverable issues like an unreachable store
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata for presenting an error to the user.
pub trait ErrorMetadata {
    /// Machine-readable error code (e.g., "STORE_UNAVAILABLE")
    fn error_code(&self) -> &'static str;

    /// Whether the user can recover by retrying or correcting input
    fn is_recoverable(&self) -> bool;

    /// Suggested action for the user
    fn suggested_action(&self) -> Option<&'static str>;

    /// User-facing message (may differ from the internal error message)
    fn client_message(&self) -> String;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

/// Rejection of a draft before it reaches the store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Title is required")]
    EmptyTitle,

    #[error("Invalid attachment type for {slot}: {content_type} (expected {})", .slot.accepted_description())]
    InvalidAttachmentType {
        slot: AttachmentSlot,
        content_type: String,
    },

    #[error("Attachment for {slot} is too large: {size} bytes exceeds {max} bytes")]
    AttachmentTooLarge {
        slot: AttachmentSlot,
        size: usize,
        max: usize,
    },

    #[error("Attachment for {slot} is empty")]
    EmptyAttachment { slot: AttachmentSlot },
}

impl ErrorMetadata for ValidationError {
    fn error_code(&self) -> &'static str {
        match self {
            ValidationError::EmptyTitle => "EMPTY_TITLE",
            ValidationError::InvalidAttachmentType { .. } => "INVALID_ATTACHMENT_TYPE",
            ValidationError::AttachmentTooLarge { .. } => "ATTACHMENT_TOO_LARGE",
            ValidationError::EmptyAttachment { .. } => "EMPTY_ATTACHMENT",
        }
    }

    fn is_recoverable(&self) -> bool {
        true
    }

    fn suggested_action(&self) -> Option<&'static str> {
        Some(match self {
            ValidationError::EmptyTitle => "Enter a title for the topic",
            ValidationError::InvalidAttachmentType { slot, .. } => match slot {
                AttachmentSlot::Video => "Select a video file",
                AttachmentSlot::Notes => "Select a PDF or Word document",
            },
            ValidationError::AttachmentTooLarge { .. } => "Select a smaller file",
            ValidationError::EmptyAttachment { .. } => "Select a non-empty file",
        })
    }

    fn client_message(&self) -> String {
        self.to_string()
    }

    fn log_level(&self) -> LogLevel {
        LogLevel::Debug
    }
}

/// Failure of a storage gateway operation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// Transport failure: connection refused, DNS, TLS, timeout.
    #[error("Catalog store unavailable: {0}")]
    NetworkUnavailable(String),

    /// 4xx: the payload or identifier was refused.
    #[error("Catalog store rejected the request ({status}): {message}")]
    ServerRejected { status: u16, message: String },

    /// 5xx: the store failed while handling the request.
    #[error("Catalog store failed ({status}): {message}")]
    ServerFault { status: u16, message: String },

    /// Delete target is missing.
    #[error("Topic not found: {0}")]
    NotFound(String),

    /// Success status with a body that could not be decoded.
    #[error("Invalid response from catalog store: {0}")]
    InvalidResponse(String),

    /// The request could not be built on the client side.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Store configuration error: {0}")]
    Config(String),
}

/// Result type for storage gateway operations
pub type StoreResult<T> = Result<T, StoreError>;

impl StoreError {
    /// Classify a non-success HTTP status.
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            400..=499 => StoreError::ServerRejected { status, message },
            _ => StoreError::ServerFault { status, message },
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound(_))
    }
}

/// Static metadata for each variant: (error_code, recoverable, suggested_action, log_level).
fn store_error_static_metadata(
    err: &StoreError,
) -> (&'static str, bool, Option<&'static str>, LogLevel) {
    match err {
        StoreError::NetworkUnavailable(_) => (
            "STORE_UNAVAILABLE",
            true,
            Some("Check the connection and retry"),
            LogLevel::Warn,
        ),
        StoreError::ServerRejected { .. } => (
            "STORE_REJECTED",
            true,
            Some("Check the topic details and try again"),
            LogLevel::Warn,
        ),
        StoreError::ServerFault { .. } => (
            "STORE_FAULT",
            true,
            Some("Retry after a short delay"),
            LogLevel::Error,
        ),
        StoreError::NotFound(_) => (
            "NOT_FOUND",
            true,
            Some("Reload the catalog"),
            LogLevel::Debug,
        ),
        StoreError::InvalidResponse(_) => (
            "INVALID_RESPONSE",
            true,
            Some("Retry after a short delay"),
            LogLevel::Error,
        ),
        StoreError::InvalidRequest(_) => (
            "INVALID_REQUEST",
            true,
            Some("Check the selected files and try again"),
            LogLevel::Debug,
        ),
        StoreError::Config(_) => (
            "STORE_CONFIG",
            true,
            Some("Check COURSEDESK_API_URL and related settings"),
            LogLevel::Error,
        ),
    }
}

impl ErrorMetadata for StoreError {
    fn error_code(&self) -> &'static str {
        store_error_static_metadata(self).0
    }

    fn is_recoverable(&self) -> bool {
        store_error_static_metadata(self).1
    }

    fn suggested_action(&self) -> Option<&'static str> {
        store_error_static_metadata(self).2
    }

    fn client_message(&self) -> String {
        match self {
            StoreError::NetworkUnavailable(_) => "Could not reach the catalog".to_string(),
            StoreError::ServerRejected { message, .. } if !message.is_empty() => {
                format!("The catalog rejected the request: {}", message)
            }
            StoreError::ServerRejected { .. } => "The catalog rejected the request".to_string(),
            StoreError::ServerFault { .. } => "The catalog failed to process the request".to_string(),
            StoreError::NotFound(id) => format!("Topic {} no longer exists", id),
            StoreError::InvalidResponse(_) => "The catalog sent an unreadable response".to_string(),
            StoreError::InvalidRequest(msg) => format!("The request could not be sent: {}", msg),
            StoreError::Config(msg) => format!("Catalog is not configured: {}", msg),
        }
    }

    fn log_level(&self) -> LogLevel {
        store_error_static_metadata(self).3
    }
}
