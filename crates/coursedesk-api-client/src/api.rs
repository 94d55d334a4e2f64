//! Topic endpoints of the catalog store.

use crate::ApiClient;
use coursedesk_core::models::normalize_mime_type;
use coursedesk_core::{NewTopic, StoreError, StoreResult, TopicAttachments, TopicId, TopicRecord};
use reqwest::multipart::{Form, Part};

const TOPICS_PATH: &str = "/topics";

impl ApiClient {
    /// Fetch the whole catalog in store order.
    pub async fn list_topics(&self) -> StoreResult<Vec<TopicRecord>> {
        self.get(TOPICS_PATH).await
    }

    /// Create a topic with one multipart request carrying the text fields
    /// and any attachments.
    pub async fn create_topic(
        &self,
        topic: &NewTopic,
        attachments: &TopicAttachments,
    ) -> StoreResult<TopicRecord> {
        let form = build_topic_form(topic, attachments)?;
        self.post_multipart(TOPICS_PATH, form).await
    }

    /// Delete a topic by id. A 404 becomes `StoreError::NotFound`.
    pub async fn delete_topic(&self, id: &TopicId) -> StoreResult<()> {
        let path = format!("{}/{}", TOPICS_PATH, urlencoding::encode(id.as_str()));
        match self.delete(&path).await {
            Err(StoreError::ServerRejected { status: 404, .. }) => {
                Err(StoreError::NotFound(id.to_string()))
            }
            other => other,
        }
    }
}

/// Build the multipart body: `title, description, unitName, className`
/// text parts, then `video` and `notes` file parts when present.
pub fn build_topic_form(topic: &NewTopic, attachments: &TopicAttachments) -> StoreResult<Form> {
    let mut form = Form::new();
    for (name, value) in topic.form_fields() {
        form = form.text(name, value.to_string());
    }

    for (slot, attachment) in attachments.iter() {
        let part = Part::bytes(attachment.data.to_vec())
            .file_name(attachment.file_name.clone())
            .mime_str(&normalize_mime_type(&attachment.content_type))
            .map_err(|e| {
                StoreError::InvalidRequest(format!(
                    "Invalid content type '{}' for {}: {}",
                    attachment.content_type, slot, e
                ))
            })?;
        form = form.part(slot.part_name(), part);
    }

    Ok(form)
}
