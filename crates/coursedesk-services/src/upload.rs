//! Staged topic upload
//!
//! A workflow moves through `Editing -> Submitting -> Succeeded`. A failed
//! submission drops back to `Editing` with the text fields intact and the
//! attachments cleared, so files must be re-selected before retrying.
//! Only one submission can be in flight per workflow. Dropping a pending
//! `submit` future reopens the form the same way a failure does.

use coursedesk_core::{
    validate_with_limits, Attachment, AttachmentSlot, DraftField, ErrorMetadata, StoreError,
    TopicRecord, UploadDraft, UploadLimits, ValidationError,
};
use coursedesk_storage::TopicStore;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio_util::sync::CancellationToken;

/// Receives records created by a successful upload.
pub trait UploadObserver: Send + Sync {
    fn topic_created(&self, record: &TopicRecord);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadPhase {
    Editing,
    Submitting,
    Succeeded,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UploadError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("An upload is already in progress")]
    Busy,

    #[error("Upload already completed; reset the form to start another")]
    Completed,

    #[error("Upload form has been closed")]
    Closed,

    #[error("Upload was interrupted before the catalog answered")]
    Interrupted,
}

impl UploadError {
    /// Message suitable for showing next to the form.
    pub fn client_message(&self) -> String {
        match self {
            UploadError::Validation(e) => e.client_message(),
            UploadError::Store(e) => e.client_message(),
            other => other.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Created(TopicRecord),
    /// The workflow was closed while the request was in flight. The store
    /// call still ran to completion; its result was dropped.
    Detached,
}

#[derive(Debug)]
struct UploadState {
    phase: UploadPhase,
    draft: UploadDraft,
    last_error: Option<UploadError>,
    created: Option<TopicRecord>,
}

impl UploadState {
    fn editable(&self) -> Result<(), UploadError> {
        match self.phase {
            UploadPhase::Editing => Ok(()),
            UploadPhase::Submitting => Err(UploadError::Busy),
            UploadPhase::Succeeded => Err(UploadError::Completed),
        }
    }
}

pub struct UploadWorkflow {
    store: Arc<dyn TopicStore>,
    observer: Arc<dyn UploadObserver>,
    limits: UploadLimits,
    state: Mutex<UploadState>,
    closed: CancellationToken,
}

impl UploadWorkflow {
    pub fn new(store: Arc<dyn TopicStore>, observer: Arc<dyn UploadObserver>) -> Self {
        UploadWorkflow {
            store,
            observer,
            limits: UploadLimits::default(),
            state: Mutex::new(UploadState {
                phase: UploadPhase::Editing,
                draft: UploadDraft::new(),
                last_error: None,
                created: None,
            }),
            closed: CancellationToken::new(),
        }
    }

    pub fn with_limits(mut self, limits: UploadLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn phase(&self) -> UploadPhase {
        self.lock().phase
    }

    /// Copy of the current draft.
    pub fn draft(&self) -> UploadDraft {
        self.lock().draft.clone()
    }

    pub fn last_error(&self) -> Option<UploadError> {
        self.lock().last_error.clone()
    }

    /// Record returned by the last successful submission.
    pub fn created(&self) -> Option<TopicRecord> {
        self.lock().created.clone()
    }

    pub fn is_closed(&self) -> bool {
        self.closed.is_cancelled()
    }

    pub fn set_field(&self, field: DraftField, value: impl Into<String>) -> Result<(), UploadError> {
        let mut state = self.editable_state()?;
        state.draft.set(field, value);
        Ok(())
    }

    /// Stage a file. Returns the attachment it replaced, if any.
    pub fn attach(
        &self,
        slot: AttachmentSlot,
        attachment: Attachment,
    ) -> Result<Option<Attachment>, UploadError> {
        let mut state = self.editable_state()?;
        tracing::debug!(
            %slot,
            file_name = %attachment.file_name,
            size = attachment.len(),
            "Attachment staged"
        );
        Ok(state.draft.attach(slot, attachment))
    }

    pub fn detach(&self, slot: AttachmentSlot) -> Result<Option<Attachment>, UploadError> {
        let mut state = self.editable_state()?;
        Ok(state.draft.detach(slot))
    }

    /// Validate the draft and create the topic.
    ///
    /// Validation failures never reach the store and leave the draft as it
    /// was. On success the observer is told about the new record and the
    /// draft is discarded.
    pub async fn submit(&self) -> Result<SubmitOutcome, UploadError> {
        let (topic, attachments, retained) = {
            let mut state = self.editable_state()?;
            let topic = match validate_with_limits(&state.draft, &self.limits) {
                Ok(topic) => topic,
                Err(e) => {
                    tracing::debug!(error = %e, "Upload draft rejected");
                    let err = UploadError::from(e);
                    state.last_error = Some(err.clone());
                    return Err(err);
                }
            };
            let (retained, attachments) = std::mem::take(&mut state.draft).into_parts();
            state.phase = UploadPhase::Submitting;
            state.last_error = None;
            (topic, attachments, retained)
        };

        tracing::info!(title = %topic.title, "Submitting topic upload");
        let pending = PendingSubmit {
            workflow: self,
            retained: Some(retained),
        };
        let result = self.store.create(topic, attachments).await;
        let retained = pending.settle();

        if self.closed.is_cancelled() {
            tracing::debug!(
                succeeded = result.is_ok(),
                "Upload finished after the form was closed"
            );
            return Ok(SubmitOutcome::Detached);
        }

        let mut state = self.lock();
        match result {
            Ok(record) => {
                state.phase = UploadPhase::Succeeded;
                state.created = Some(record.clone());
                drop(state);
                self.observer.topic_created(&record);
                tracing::info!(topic_id = %record.id, "Topic uploaded");
                Ok(SubmitOutcome::Created(record))
            }
            Err(e) => {
                tracing::warn!(error = %e, "Topic upload failed");
                let err = UploadError::from(e);
                state.phase = UploadPhase::Editing;
                state.draft = retained;
                state.last_error = Some(err.clone());
                Err(err)
            }
        }
    }

    /// Start over with an empty draft. Not allowed mid-submission.
    pub fn reset(&self) -> Result<(), UploadError> {
        if self.closed.is_cancelled() {
            return Err(UploadError::Closed);
        }
        let mut state = self.lock();
        if state.phase == UploadPhase::Submitting {
            return Err(UploadError::Busy);
        }
        state.phase = UploadPhase::Editing;
        state.draft = UploadDraft::new();
        state.last_error = None;
        state.created = None;
        Ok(())
    }

    /// Tear the form down. An in-flight submission completes against the
    /// store but its outcome is no longer applied or reported.
    pub fn close(&self) {
        self.closed.cancel();
    }

    fn editable_state(&self) -> Result<MutexGuard<'_, UploadState>, UploadError> {
        if self.closed.is_cancelled() {
            return Err(UploadError::Closed);
        }
        let state = self.lock();
        state.editable()?;
        Ok(state)
    }

    fn lock(&self) -> MutexGuard<'_, UploadState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Held while a submission awaits the store. If the `submit` future is
/// dropped first, the text fields are put back and the form reopens.
struct PendingSubmit<'a> {
    workflow: &'a UploadWorkflow,
    retained: Option<UploadDraft>,
}

impl PendingSubmit<'_> {
    /// The store answered; hand the retained draft back to `submit`.
    fn settle(mut self) -> UploadDraft {
        self.retained.take().unwrap_or_default()
    }
}

impl Drop for PendingSubmit<'_> {
    fn drop(&mut self) {
        let Some(draft) = self.retained.take() else {
            return;
        };
        let mut state = self.workflow.lock();
        if state.phase == UploadPhase::Submitting {
            state.phase = UploadPhase::Editing;
            state.draft = draft;
            state.last_error = Some(UploadError::Interrupted);
        }
        tracing::warn!("Upload abandoned before the store answered");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coursedesk_storage::{InMemoryTopicStore, StoreOperation};

    #[derive(Default)]
    struct Recorder(Mutex<Vec<TopicRecord>>);

    impl UploadObserver for Recorder {
        fn topic_created(&self, record: &TopicRecord) {
            self.0.lock().unwrap().push(record.clone());
        }
    }

    fn setup() -> (Arc<InMemoryTopicStore>, Arc<Recorder>, UploadWorkflow) {
        let store = Arc::new(InMemoryTopicStore::new());
        let recorder = Arc::new(Recorder::default());
        let workflow = UploadWorkflow::new(store.clone(), recorder.clone());
        (store, recorder, workflow)
    }

    fn pdf(name: &str) -> Attachment {
        Attachment::new(name, "application/pdf", b"%PDF".to_vec())
    }

    #[tokio::test]
    async fn test_successful_submit_notifies_and_discards_draft() {
        let (store, recorder, workflow) = setup();
        workflow.set_field(DraftField::Title, "Graphs").unwrap();
        workflow.set_field(DraftField::UnitName, "Unit 4").unwrap();
        workflow.attach(AttachmentSlot::Notes, pdf("graphs.pdf")).unwrap();

        let outcome = workflow.submit().await.unwrap();
        let SubmitOutcome::Created(record) = outcome else {
            panic!("expected a created record");
        };

        assert_eq!(record.title, "Graphs");
        assert_eq!(record.unit_name.as_deref(), Some("Unit 4"));
        assert!(record.notes_url.is_some());
        assert_eq!(workflow.phase(), UploadPhase::Succeeded);
        assert_eq!(workflow.draft(), UploadDraft::new());
        assert_eq!(recorder.0.lock().unwrap().as_slice(), [record.clone()]);
        assert_eq!(store.snapshot(), vec![record]);
    }

    #[tokio::test]
    async fn test_blank_title_never_reaches_store() {
        let (store, recorder, workflow) = setup();
        workflow.set_field(DraftField::Title, "   ").unwrap();
        workflow.set_field(DraftField::Description, "kept").unwrap();

        let err = workflow.submit().await.unwrap_err();
        assert_eq!(err, UploadError::Validation(ValidationError::EmptyTitle));
        assert_eq!(workflow.phase(), UploadPhase::Editing);
        assert_eq!(workflow.draft().description, "kept");
        assert_eq!(workflow.last_error(), Some(err));
        assert_eq!(store.call_count(StoreOperation::Create), 0);
        assert!(recorder.0.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_wrong_attachment_type_is_rejected_before_submit() {
        let (store, _, workflow) = setup();
        workflow.set_field(DraftField::Title, "Graphs").unwrap();
        workflow
            .attach(
                AttachmentSlot::Video,
                Attachment::new("notes.pdf", "application/pdf", vec![1u8]),
            )
            .unwrap();

        let err = workflow.submit().await.unwrap_err();
        assert!(matches!(
            err,
            UploadError::Validation(ValidationError::InvalidAttachmentType { .. })
        ));
        assert!(workflow.draft().attachment(AttachmentSlot::Video).is_some());
        assert_eq!(store.call_count(StoreOperation::Create), 0);
    }

    #[tokio::test]
    async fn test_store_failure_keeps_text_and_clears_files() {
        let (store, recorder, workflow) = setup();
        store.fail_next(
            StoreOperation::Create,
            StoreError::NetworkUnavailable("offline".to_string()),
        );
        workflow.set_field(DraftField::Title, "Graphs").unwrap();
        workflow.set_field(DraftField::ClassName, "CSE - II Year").unwrap();
        workflow.attach(AttachmentSlot::Notes, pdf("graphs.pdf")).unwrap();

        let err = workflow.submit().await.unwrap_err();
        assert!(matches!(
            err,
            UploadError::Store(StoreError::NetworkUnavailable(_))
        ));
        assert_eq!(workflow.phase(), UploadPhase::Editing);

        let draft = workflow.draft();
        assert_eq!(draft.title, "Graphs");
        assert_eq!(draft.class_name, "CSE - II Year");
        assert!(draft.attachments.is_empty());
        assert!(workflow.last_error().is_some());
        assert!(recorder.0.lock().unwrap().is_empty());

        // retry without files goes through
        assert!(workflow.submit().await.is_ok());
        assert!(workflow.last_error().is_none());
    }

    #[tokio::test]
    async fn test_edits_refused_after_success_until_reset() {
        let (_, _, workflow) = setup();
        workflow.set_field(DraftField::Title, "Graphs").unwrap();
        workflow.submit().await.unwrap();

        assert_eq!(
            workflow.set_field(DraftField::Title, "Again"),
            Err(UploadError::Completed)
        );
        assert_eq!(workflow.submit().await, Err(UploadError::Completed));

        workflow.reset().unwrap();
        assert_eq!(workflow.phase(), UploadPhase::Editing);
        assert!(workflow.created().is_none());
        workflow.set_field(DraftField::Title, "Again").unwrap();
    }

    #[tokio::test]
    async fn test_closed_workflow_refuses_everything() {
        let (store, _, workflow) = setup();
        workflow.set_field(DraftField::Title, "Graphs").unwrap();
        workflow.close();

        assert!(workflow.is_closed());
        assert_eq!(workflow.submit().await, Err(UploadError::Closed));
        assert_eq!(workflow.detach(AttachmentSlot::Video), Err(UploadError::Closed));
        assert_eq!(workflow.reset(), Err(UploadError::Closed));
        assert_eq!(store.call_count(StoreOperation::Create), 0);
    }

    /// Store whose `create` never answers.
    struct StalledStore;

    #[async_trait::async_trait]
    impl TopicStore for StalledStore {
        async fn create(
            &self,
            _topic: coursedesk_core::NewTopic,
            _attachments: coursedesk_core::TopicAttachments,
        ) -> coursedesk_core::StoreResult<TopicRecord> {
            std::future::pending::<coursedesk_core::StoreResult<TopicRecord>>().await
        }

        async fn list(&self) -> coursedesk_core::StoreResult<Vec<TopicRecord>> {
            Ok(Vec::new())
        }

        async fn remove(&self, _id: &coursedesk_core::TopicId) -> coursedesk_core::StoreResult<()> {
            Ok(())
        }

        fn backend_type(&self) -> coursedesk_core::StoreBackend {
            coursedesk_core::StoreBackend::Memory
        }
    }

    #[tokio::test]
    async fn test_dropped_submit_reopens_form_with_text_fields() {
        let recorder = Arc::new(Recorder::default());
        let workflow = UploadWorkflow::new(Arc::new(StalledStore), recorder.clone());
        workflow.set_field(DraftField::Title, "Graphs").unwrap();
        workflow.set_field(DraftField::Description, "BFS and DFS").unwrap();
        workflow.attach(AttachmentSlot::Notes, pdf("graphs.pdf")).unwrap();

        let timed_out =
            tokio::time::timeout(std::time::Duration::from_millis(20), workflow.submit()).await;
        assert!(timed_out.is_err());

        assert_eq!(workflow.phase(), UploadPhase::Editing);
        let draft = workflow.draft();
        assert_eq!(draft.title, "Graphs");
        assert_eq!(draft.description, "BFS and DFS");
        assert!(draft.attachments.is_empty());
        assert_eq!(workflow.last_error(), Some(UploadError::Interrupted));
        assert!(recorder.0.lock().unwrap().is_empty());

        workflow.set_field(DraftField::Title, "Graph traversal").unwrap();
        workflow.reset().unwrap();
        assert_eq!(workflow.draft(), UploadDraft::new());
    }

    #[test]
    fn test_attach_returns_replaced_file() {
        let (_, _, workflow) = setup();
        assert!(workflow
            .attach(AttachmentSlot::Notes, pdf("a.pdf"))
            .unwrap()
            .is_none());
        let replaced = workflow
            .attach(AttachmentSlot::Notes, pdf("b.pdf"))
            .unwrap()
            .unwrap();
        assert_eq!(replaced.file_name, "a.pdf");
        assert_eq!(
            workflow.detach(AttachmentSlot::Notes).unwrap().unwrap().file_name,
            "b.pdf"
        );
    }

    #[test]
    fn test_client_message_uses_error_metadata() {
        let err = UploadError::Store(StoreError::NotFound("7".to_string()));
        assert_eq!(err.client_message(), "Topic 7 no longer exists");
        assert_eq!(UploadError::Busy.client_message(), "An upload is already in progress");
    }
}
