//! Coursedesk Services Layer
//!
//! Orchestration on top of the storage gateway: the catalog view controller
//! that owns the authoritative topic list, the staged upload workflow, and
//! the confirmation capability used before deletes. Front ends drive these
//! services; they never talk to a `TopicStore` directly.

pub mod catalog;
pub mod confirm;
pub mod upload;

pub use catalog::{Banner, CatalogController, CatalogOperation, DeleteOutcome, LoadOutcome};
pub use confirm::{AutoConfirm, Confirm};
pub use coursedesk_storage::{StoreError, StoreResult, TopicStore};
pub use upload::{SubmitOutcome, UploadError, UploadObserver, UploadPhase, UploadWorkflow};
