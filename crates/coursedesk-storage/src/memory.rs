use crate::traits::TopicStore;
use async_trait::async_trait;
use coursedesk_core::{
    NewTopic, StoreBackend, StoreError, StoreResult, TopicAttachments, TopicId, TopicRecord,
};
use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard};

/// Gateway operation, used to target injected failures and read call counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOperation {
    Create,
    List,
    Remove,
}

#[derive(Debug, Default)]
struct MemoryState {
    topics: Vec<TopicRecord>,
    next_id: u64,
    failures: HashMap<StoreOperation, VecDeque<StoreError>>,
    calls: HashMap<StoreOperation, usize>,
}

impl MemoryState {
    /// Record a call and pop an injected failure for it, if any.
    fn begin(&mut self, op: StoreOperation) -> StoreResult<()> {
        *self.calls.entry(op).or_default() += 1;
        match self.failures.get_mut(&op).and_then(VecDeque::pop_front) {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

/// In-memory catalog store
///
/// Seeded explicitly through [`InMemoryTopicStore::with_topics`]. Ids are
/// allocated from a counter that only moves forward, so a deleted id is
/// never handed out again. Failures can be queued per operation.
#[derive(Debug)]
pub struct InMemoryTopicStore {
    state: Mutex<MemoryState>,
    media_base_url: String,
}

impl Default for InMemoryTopicStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryTopicStore {
    pub fn new() -> Self {
        Self::with_topics(Vec::new())
    }

    pub fn with_topics(topics: Vec<TopicRecord>) -> Self {
        let highest_numeric = topics
            .iter()
            .filter_map(|t| t.id.as_str().parse::<u64>().ok())
            .max()
            .unwrap_or(0);
        let next_id = highest_numeric.max(topics.len() as u64) + 1;

        InMemoryTopicStore {
            state: Mutex::new(MemoryState {
                topics,
                next_id,
                ..MemoryState::default()
            }),
            media_base_url: "http://localhost:5000/uploads".to_string(),
        }
    }

    /// Base URL used to synthesize media links for uploaded attachments.
    pub fn with_media_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.media_base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// The three-topic catalog the dashboard was prototyped with.
    pub fn sample_catalog() -> Vec<TopicRecord> {
        let mut intro = TopicRecord::new("1", "Introduction to AI");
        intro.description = "Basics of Artificial Intelligence and its applications.".to_string();
        intro.unit_name = Some("Unit 1".to_string());
        intro.class_name = Some("AIML - II Year".to_string());
        intro.video_url = Some("https://www.youtube.com/watch?v=1t2zzv8sLxM".to_string());
        intro.notes_url = Some("https://example.com/ai-notes.pdf".to_string());

        let mut dsa = TopicRecord::new("2", "Data Structures");
        dsa.description = "Understanding arrays, linked lists, and stacks.".to_string();
        dsa.unit_name = Some("Unit 2".to_string());
        dsa.class_name = Some("CSE - II Year".to_string());
        dsa.video_url = Some("https://www.youtube.com/watch?v=RBSGKlAvoiM".to_string());
        dsa.notes_url = Some("https://example.com/dsa-notes.pdf".to_string());

        let mut react = TopicRecord::new("3", "ReactJS Basics");
        react.description = "Learn components, props, and state management.".to_string();
        react.unit_name = Some("Unit 3".to_string());
        react.class_name = Some("Web Development".to_string());
        react.video_url = Some("https://www.youtube.com/watch?v=Ke90Tje7VS0".to_string());

        vec![intro, dsa, react]
    }

    /// Make the next call to `op` fail with `error`. Queued failures are
    /// consumed in order.
    pub fn fail_next(&self, op: StoreOperation, error: StoreError) {
        self.lock().failures.entry(op).or_default().push_back(error);
    }

    /// Current stored catalog.
    pub fn snapshot(&self) -> Vec<TopicRecord> {
        self.lock().topics.clone()
    }

    /// Number of times `op` was invoked, including failed calls.
    pub fn call_count(&self, op: StoreOperation) -> usize {
        self.lock().calls.get(&op).copied().unwrap_or(0)
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn media_url(&self, kind: &str, id: &TopicId, file_name: &str) -> String {
        format!(
            "{}/{}/{}/{}",
            self.media_base_url,
            kind,
            id,
            urlencoding::encode(file_name)
        )
    }
}

#[async_trait]
impl TopicStore for InMemoryTopicStore {
    async fn create(
        &self,
        topic: NewTopic,
        attachments: TopicAttachments,
    ) -> StoreResult<TopicRecord> {
        let mut state = self.lock();
        state.begin(StoreOperation::Create)?;

        if topic.title.trim().is_empty() {
            return Err(StoreError::from_status(400, "title is required"));
        }

        let id = TopicId::new(state.next_id.to_string());
        state.next_id += 1;

        let record = TopicRecord {
            video_url: attachments
                .video
                .as_ref()
                .map(|a| self.media_url("videos", &id, &a.file_name)),
            notes_url: attachments
                .notes
                .as_ref()
                .map(|a| self.media_url("notes", &id, &a.file_name)),
            id,
            title: topic.title,
            description: topic.description,
            unit_name: topic.unit_name,
            class_name: topic.class_name,
        };
        state.topics.push(record.clone());

        tracing::debug!(topic_id = %record.id, "Created topic in memory store");
        Ok(record)
    }

    async fn list(&self) -> StoreResult<Vec<TopicRecord>> {
        let mut state = self.lock();
        state.begin(StoreOperation::List)?;
        Ok(state.topics.clone())
    }

    async fn remove(&self, id: &TopicId) -> StoreResult<()> {
        let mut state = self.lock();
        state.begin(StoreOperation::Remove)?;

        let before = state.topics.len();
        state.topics.retain(|t| &t.id != id);
        if state.topics.len() == before {
            return Err(StoreError::NotFound(id.to_string()));
        }

        tracing::debug!(topic_id = %id, "Removed topic from memory store");
        Ok(())
    }

    fn backend_type(&self) -> StoreBackend {
        StoreBackend::Memory
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coursedesk_core::Attachment;

    fn new_topic(title: &str) -> NewTopic {
        NewTopic {
            title: title.to_string(),
            description: String::new(),
            unit_name: None,
            class_name: None,
        }
    }

    #[tokio::test]
    async fn test_list_returns_injected_state_in_order() {
        let store = InMemoryTopicStore::with_topics(InMemoryTopicStore::sample_catalog());
        let titles: Vec<_> = store
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.title)
            .collect();
        assert_eq!(
            titles,
            vec!["Introduction to AI", "Data Structures", "ReactJS Basics"]
        );
    }

    #[tokio::test]
    async fn test_create_assigns_fresh_id_and_media_urls() {
        let store = InMemoryTopicStore::with_topics(InMemoryTopicStore::sample_catalog())
            .with_media_base_url("https://cdn.example.edu/");
        let attachments = TopicAttachments {
            video: Some(Attachment::new("intro clip.mp4", "video/mp4", vec![1u8])),
            notes: None,
        };

        let record = store.create(new_topic("Graphs"), attachments).await.unwrap();
        assert_eq!(record.id, TopicId::new("4"));
        assert_eq!(
            record.video_url.as_deref(),
            Some("https://cdn.example.edu/videos/4/intro%20clip.mp4")
        );
        assert!(record.notes_url.is_none());
        assert!(record.has_valid_links());
        assert_eq!(store.snapshot().last(), Some(&record));
    }

    #[tokio::test]
    async fn test_media_urls_encode_reserved_characters() {
        let store = InMemoryTopicStore::new();
        let attachments = TopicAttachments {
            video: Some(Attachment::new("a?b.mp4", "video/mp4", vec![1u8])),
            notes: Some(Attachment::new("notes#1.pdf", "application/pdf", vec![1u8])),
        };

        let record = store.create(new_topic("Graphs"), attachments).await.unwrap();
        assert_eq!(
            record.video_url.as_deref(),
            Some("http://localhost:5000/uploads/videos/1/a%3Fb.mp4")
        );
        assert_eq!(
            record.notes_url.as_deref(),
            Some("http://localhost:5000/uploads/notes/1/notes%231.pdf")
        );
        assert!(record.has_valid_links());
    }

    #[tokio::test]
    async fn test_ids_are_not_reused_after_delete() {
        let store = InMemoryTopicStore::new();
        let first = store
            .create(new_topic("A"), TopicAttachments::default())
            .await
            .unwrap();
        store.remove(&first.id).await.unwrap();
        let second = store
            .create(new_topic("B"), TopicAttachments::default())
            .await
            .unwrap();
        assert_ne!(first.id, second.id);
    }

    #[tokio::test]
    async fn test_remove_unknown_id_is_not_found() {
        let store = InMemoryTopicStore::with_topics(InMemoryTopicStore::sample_catalog());
        store.remove(&TopicId::new("2")).await.unwrap();
        let err = store.remove(&TopicId::new("2")).await.unwrap_err();
        assert_eq!(err, StoreError::NotFound("2".to_string()));
        assert_eq!(store.snapshot().len(), 2);
    }

    #[tokio::test]
    async fn test_injected_failures_are_consumed_in_order() {
        let store = InMemoryTopicStore::new();
        store.fail_next(
            StoreOperation::List,
            StoreError::NetworkUnavailable("offline".to_string()),
        );

        assert!(matches!(
            store.list().await,
            Err(StoreError::NetworkUnavailable(_))
        ));
        assert!(store.list().await.is_ok());
        assert_eq!(store.call_count(StoreOperation::List), 2);
        assert_eq!(store.call_count(StoreOperation::Create), 0);
    }

    #[tokio::test]
    async fn test_failed_create_stores_nothing() {
        let store = InMemoryTopicStore::new();
        store.fail_next(
            StoreOperation::Create,
            StoreError::from_status(500, "disk full"),
        );
        assert!(store
            .create(new_topic("A"), TopicAttachments::default())
            .await
            .is_err());
        assert!(store.snapshot().is_empty());
    }

    #[test]
    fn test_backend_type() {
        assert_eq!(InMemoryTopicStore::new().backend_type(), StoreBackend::Memory);
    }
}
