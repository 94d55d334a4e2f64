//! Shared test doubles for the services integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use coursedesk_core::{
    NewTopic, StoreBackend, StoreResult, TopicAttachments, TopicId, TopicRecord,
};
use coursedesk_services::Confirm;
use coursedesk_storage::{InMemoryTopicStore, TopicStore};
use std::sync::{Arc, Mutex};
use tokio::sync::oneshot;

/// Memory store whose next call to an operation can be held open until the
/// test releases it.
///
/// A held `list` reads the catalog before waiting, so it returns data that
/// may be stale by the time it resolves. Held `create` and `remove` wait
/// first and then apply.
pub struct GatedStore {
    pub inner: InMemoryTopicStore,
    list_gate: Mutex<Option<oneshot::Receiver<()>>>,
    create_gate: Mutex<Option<oneshot::Receiver<()>>>,
    remove_gate: Mutex<Option<oneshot::Receiver<()>>>,
}

impl GatedStore {
    pub fn seeded() -> Arc<Self> {
        Arc::new(GatedStore {
            inner: InMemoryTopicStore::with_topics(InMemoryTopicStore::sample_catalog()),
            list_gate: Mutex::new(None),
            create_gate: Mutex::new(None),
            remove_gate: Mutex::new(None),
        })
    }

    pub fn hold_list(&self) -> oneshot::Sender<()> {
        hold(&self.list_gate)
    }

    pub fn hold_create(&self) -> oneshot::Sender<()> {
        hold(&self.create_gate)
    }

    pub fn hold_remove(&self) -> oneshot::Sender<()> {
        hold(&self.remove_gate)
    }
}

fn hold(gate: &Mutex<Option<oneshot::Receiver<()>>>) -> oneshot::Sender<()> {
    let (tx, rx) = oneshot::channel();
    *gate.lock().unwrap() = Some(rx);
    tx
}

async fn pass(gate: &Mutex<Option<oneshot::Receiver<()>>>) {
    let rx = gate.lock().unwrap().take();
    if let Some(rx) = rx {
        let _ = rx.await;
    }
}

#[async_trait]
impl TopicStore for GatedStore {
    async fn create(
        &self,
        topic: NewTopic,
        attachments: TopicAttachments,
    ) -> StoreResult<TopicRecord> {
        pass(&self.create_gate).await;
        self.inner.create(topic, attachments).await
    }

    async fn list(&self) -> StoreResult<Vec<TopicRecord>> {
        let topics = self.inner.list().await;
        pass(&self.list_gate).await;
        topics
    }

    async fn remove(&self, id: &TopicId) -> StoreResult<()> {
        pass(&self.remove_gate).await;
        self.inner.remove(id).await
    }

    fn backend_type(&self) -> StoreBackend {
        StoreBackend::Memory
    }
}

/// Confirmation that records every prompt and answers with a fixed value.
pub struct RecordingConfirm {
    pub answer: bool,
    pub prompts: Mutex<Vec<String>>,
}

impl RecordingConfirm {
    pub fn answering(answer: bool) -> Arc<Self> {
        Arc::new(RecordingConfirm {
            answer,
            prompts: Mutex::new(Vec::new()),
        })
    }
}

impl Confirm for RecordingConfirm {
    fn confirm(&self, message: &str) -> bool {
        self.prompts.lock().unwrap().push(message.to_string());
        self.answer
    }
}

pub fn ids(topics: &[TopicRecord]) -> Vec<String> {
    topics.iter().map(|t| t.id.to_string()).collect()
}
