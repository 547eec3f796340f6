//! Chat session
//!
//! A [`ChatSession`] ties together the current [`ConversationStore`]
//! snapshot, the input draft and the [`SendPipeline`]. Every state change
//! publishes a new snapshot on a `tokio::sync::watch` channel; renderers
//! subscribe with [`ChatSession::subscribe`] and redraw from what they
//! receive. All intents take `&self`, so a session can be shared between
//! the input loop and an in-flight send.

use crate::conversation::{Conversation, ConversationId, ConversationStore};
use crate::pipeline::{lock, PipelineState, SendOutcome, SendPipeline};
use crate::service::AnsweringService;

use std::sync::{Arc, Mutex};
use tokio::sync::watch;

/// Conversation state plus the pipeline that mutates it
pub struct ChatSession {
    store: watch::Sender<ConversationStore>,
    draft: Mutex<String>,
    pipeline: SendPipeline,
}

impl ChatSession {
    /// Start a session with one default conversation
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use medai::config::ServiceConfig;
    /// use medai::service::create_service;
    /// use medai::session::ChatSession;
    ///
    /// # async fn example() -> medai::error::Result<()> {
    /// let session = ChatSession::new(create_service(&ServiceConfig::default())?);
    /// let outcome = session.send("How is pneumonia diagnosed?").await;
    /// println!("{:?}", outcome);
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(service: Arc<dyn AnsweringService>) -> Self {
        Self::with_store(service, ConversationStore::new())
    }

    /// Start a session from an existing snapshot
    pub fn with_store(service: Arc<dyn AnsweringService>, store: ConversationStore) -> Self {
        let (store, _) = watch::channel(store);
        Self {
            store,
            draft: Mutex::new(String::new()),
            pipeline: SendPipeline::new(service),
        }
    }

    /// Current snapshot
    pub fn snapshot(&self) -> ConversationStore {
        self.store.borrow().clone()
    }

    /// Receive every snapshot published from now on
    pub fn subscribe(&self) -> watch::Receiver<ConversationStore> {
        self.store.subscribe()
    }

    /// Create a conversation, make it active and return its id
    pub fn create_conversation(&self) -> ConversationId {
        let conversation = Conversation::new();
        let id = conversation.id.clone();
        self.store
            .send_modify(|current| *current = current.insert_conversation(conversation));
        id
    }

    /// Select a conversation; unknown ids leave nothing selected
    pub fn select_conversation(&self, id: &ConversationId) {
        self.store
            .send_modify(|current| *current = current.select_conversation(id));
    }

    /// Dismiss the banner error
    pub fn dismiss_error(&self) {
        self.store.send_if_modified(|current| {
            if current.error().is_none() {
                return false;
            }
            *current = current.clear_error();
            true
        });
    }

    /// Replace the input draft
    pub fn set_draft(&self, text: impl Into<String>) {
        *lock(&self.draft) = text.into();
    }

    /// Current input draft
    pub fn draft(&self) -> String {
        lock(&self.draft).clone()
    }

    /// Pipeline state
    pub fn pipeline_state(&self) -> PipelineState {
        self.pipeline.state()
    }

    /// Whether an exchange is in flight
    pub fn is_sending(&self) -> bool {
        self.pipeline.is_sending()
    }

    /// Send the current draft
    pub async fn submit(&self) -> SendOutcome {
        self.pipeline.send(&self.store, &self.draft).await
    }

    /// Send `text` directly, leaving the draft alone
    ///
    /// A send dropped by the guard does not disturb what the user has typed.
    pub async fn send(&self, text: &str) -> SendOutcome {
        let draft = Mutex::new(text.to_string());
        self.pipeline.send(&self.store, &draft).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversation::{MessageStatus, DEFAULT_TITLE, FAILED_REPLY};
    use crate::pipeline::IgnoreReason;
    use crate::test_utils::ScriptedService;
    use tokio::sync::Notify;

    #[tokio::test]
    async fn test_end_to_end_first_question() {
        let session = ChatSession::new(Arc::new(ScriptedService::answering(&[
            "Pneumonia is diagnosed with a chest X-ray and a physical exam.",
        ])));

        let before = session.snapshot();
        let conversation = before.active_conversation().unwrap();
        assert_eq!(conversation.title, DEFAULT_TITLE);
        assert!(conversation.messages.is_empty());

        let outcome = session.send("How is pneumonia diagnosed?").await;
        assert!(matches!(outcome, SendOutcome::Answered { .. }));

        let after = session.snapshot();
        let conversation = after.active_conversation().unwrap();
        assert_eq!(conversation.messages.len(), 2);
        assert_eq!(conversation.title, "How is pneumonia diagnosed?");
        assert!(!conversation.messages[1].is_pending());
        assert!(after.error().is_none());
        assert!(session.draft().is_empty());
    }

    #[tokio::test]
    async fn test_failure_then_dismiss_keeps_transcript() {
        let session = ChatSession::new(Arc::new(ScriptedService::failing("timeout")));

        session.send("What is acne?").await;
        assert!(session.snapshot().error().is_some());

        session.dismiss_error();

        let snapshot = session.snapshot();
        assert!(snapshot.error().is_none());
        let reply = &snapshot.active_conversation().unwrap().messages[1];
        assert_eq!(reply.status, MessageStatus::Failed(FAILED_REPLY.to_string()));
    }

    #[tokio::test]
    async fn test_new_conversation_is_active_and_empty() {
        let session = ChatSession::new(Arc::new(ScriptedService::answering(&["a"])));
        session.send("first").await;

        let id = session.create_conversation();

        let snapshot = session.snapshot();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot.active_id(), Some(&id));
        assert!(snapshot.active_conversation().unwrap().messages.is_empty());
    }

    #[tokio::test]
    async fn test_select_missing_conversation_blocks_send() {
        let session = ChatSession::new(Arc::new(ScriptedService::answering(&["a"])));
        session.select_conversation(&ConversationId::from("conv-does-not-exist"));

        assert!(session.snapshot().active_conversation().is_none());

        session.set_draft("half typed");
        let outcome = session.send("hello").await;
        assert_eq!(outcome, SendOutcome::Ignored(IgnoreReason::NoActiveConversation));
        assert_eq!(session.draft(), "half typed");
    }

    #[tokio::test]
    async fn test_submit_clears_draft_once_sent() {
        let session = ChatSession::new(Arc::new(ScriptedService::answering(&["ok"])));
        session.set_draft("  What is acne?  ");

        let outcome = session.submit().await;

        assert!(matches!(outcome, SendOutcome::Answered { .. }));
        assert!(session.draft().is_empty());
        let snapshot = session.snapshot();
        assert_eq!(
            snapshot.active_conversation().unwrap().messages[0].content(),
            "What is acne?"
        );
    }

    #[tokio::test]
    async fn test_dismiss_without_error_does_not_notify() {
        let session = ChatSession::new(Arc::new(ScriptedService::answering(&[])));
        let updates = session.subscribe();

        session.dismiss_error();

        assert!(!updates.has_changed().unwrap());
    }

    #[test]
    fn test_send_while_sending_leaves_store_identical() {
        let gate = Arc::new(Notify::new());
        let service = ScriptedService::answering(&["slow"]).gated(gate.clone());
        let session = ChatSession::new(Arc::new(service));

        let mut first = tokio_test::task::spawn(session.send("first"));
        tokio_test::assert_pending!(first.poll());
        assert_eq!(session.pipeline_state(), PipelineState::Sending);

        let before = session.snapshot();
        session.set_draft("still typing");
        let second = tokio_test::block_on(session.send("second"));
        assert_eq!(second, SendOutcome::Ignored(IgnoreReason::AlreadySending));
        assert_eq!(session.snapshot(), before);
        assert_eq!(session.draft(), "still typing");
        assert_eq!(
            session.snapshot().active_conversation().unwrap().messages.len(),
            2
        );

        gate.notify_one();
        tokio_test::assert_ready!(first.poll());
        assert_eq!(session.pipeline_state(), PipelineState::Idle);

        gate.notify_one();
        let third = tokio_test::block_on(session.send("third"));
        assert!(matches!(third, SendOutcome::Answered { .. }));
    }
}
