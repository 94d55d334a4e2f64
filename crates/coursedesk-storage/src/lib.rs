//! Coursedesk Storage Library
//!
//! This crate provides the storage gateway for the topic catalog: the
//! `TopicStore` trait and its implementations.
//!
//! - `HttpTopicStore` talks to the remote catalog store and is what
//!   production code uses.
//! - `InMemoryTopicStore` holds an explicitly injected catalog and is meant
//!   for tests and offline demos. It is never a process-wide singleton.

pub mod factory;
#[cfg(feature = "store-http")]
pub mod http;
#[cfg(feature = "store-memory")]
pub mod memory;
pub mod traits;

// Re-export commonly used types
pub use coursedesk_core::{StoreBackend, StoreError, StoreResult};
pub use factory::create_store;
#[cfg(feature = "store-http")]
pub use http::HttpTopicStore;
#[cfg(feature = "store-memory")]
pub use memory::{InMemoryTopicStore, StoreOperation};
pub use traits::TopicStore;
