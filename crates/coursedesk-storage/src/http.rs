use crate::traits::TopicStore;
use async_trait::async_trait;
use coursedesk_api_client::ApiClient;
use coursedesk_core::{
    Config, ErrorMetadata, LogLevel, NewTopic, StoreBackend, StoreError, StoreResult,
    TopicAttachments, TopicId, TopicRecord,
};

/// Remote catalog store reached over HTTP
#[derive(Clone, Debug)]
pub struct HttpTopicStore {
    client: ApiClient,
}

impl HttpTopicStore {
    pub fn new(client: ApiClient) -> Self {
        HttpTopicStore { client }
    }

    pub fn from_config(config: &Config) -> StoreResult<Self> {
        Ok(Self::new(ApiClient::from_config(config)?))
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }
}

fn log_failure(operation: &str, err: &StoreError) {
    match err.log_level() {
        LogLevel::Error => tracing::error!(operation, error = %err, "Catalog store call failed"),
        LogLevel::Warn => tracing::warn!(operation, error = %err, "Catalog store call failed"),
        LogLevel::Debug => tracing::debug!(operation, error = %err, "Catalog store call failed"),
    }
}

/// Clear media links the store returned that cannot be fetched as-is.
fn sanitize_links(mut record: TopicRecord) -> TopicRecord {
    if !record.has_valid_links() {
        let cleared = record.strip_invalid_links();
        tracing::warn!(
            topic_id = %record.id,
            ?cleared,
            "Store returned media links that are not absolute http(s) URLs"
        );
    }
    record
}

#[async_trait]
impl TopicStore for HttpTopicStore {
    async fn create(
        &self,
        topic: NewTopic,
        attachments: TopicAttachments,
    ) -> StoreResult<TopicRecord> {
        tracing::debug!(
            title = %topic.title,
            has_video = attachments.video.is_some(),
            has_notes = attachments.notes.is_some(),
            "Creating topic"
        );
        let record = self
            .client
            .create_topic(&topic, &attachments)
            .await
            .inspect_err(|e| log_failure("create", e))?;
        let record = sanitize_links(record);
        tracing::info!(topic_id = %record.id, "Topic created");
        Ok(record)
    }

    async fn list(&self) -> StoreResult<Vec<TopicRecord>> {
        let topics = self
            .client
            .list_topics()
            .await
            .inspect_err(|e| log_failure("list", e))?;
        tracing::debug!(count = topics.len(), "Listed topics");
        Ok(topics.into_iter().map(sanitize_links).collect())
    }

    async fn remove(&self, id: &TopicId) -> StoreResult<()> {
        self.client
            .delete_topic(id)
            .await
            .inspect_err(|e| log_failure("remove", e))?;
        tracing::info!(topic_id = %id, "Topic deleted");
        Ok(())
    }

    fn backend_type(&self) -> StoreBackend {
        StoreBackend::Http
    }
}
