//! Data models for the topic catalog
//!
//! `topic` holds the persisted record and the validated fields sent to the
//! store; `draft` holds the transient client-side upload form.

mod draft;
mod topic;

pub use draft::*;
pub use topic::*;
