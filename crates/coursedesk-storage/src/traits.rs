//! Storage gateway trait
//!
//! Every operation crosses a process boundary and may fail independently;
//! there is no transactional grouping across create, list and remove.

use async_trait::async_trait;
use coursedesk_core::{
    NewTopic, StoreBackend, StoreResult, TopicAttachments, TopicId, TopicRecord,
};

/// Storage gateway for the topic catalog.
#[async_trait]
pub trait TopicStore: Send + Sync {
    /// Persist a new topic and its attachments in a single request.
    ///
    /// Returns the store-assigned record, including any media URLs produced
    /// from the attachments. On error nothing is considered created.
    async fn create(
        &self,
        topic: NewTopic,
        attachments: TopicAttachments,
    ) -> StoreResult<TopicRecord>;

    /// Fetch the full current catalog in store order.
    async fn list(&self) -> StoreResult<Vec<TopicRecord>>;

    /// Delete a topic. Not idempotent: an unknown id yields `StoreError::NotFound`.
    async fn remove(&self, id: &TopicId) -> StoreResult<()>;

    /// Get the store backend type
    fn backend_type(&self) -> StoreBackend;
}
