//! Send pipeline
//!
//! One invocation of [`SendPipeline::send`] runs a full question/answer
//! exchange:
//!
//! 1. guard: empty input, no active conversation, or a send already in
//!    flight turn the call into a silent no-op
//! 2. take the draft, clear the banner error, capture a timestamp
//! 3. append the user message
//! 4. derive the title if the conversation still has the default one
//! 5. append a pending assistant placeholder
//! 6. ask the answering service, then resolve or fail the placeholder
//! 7. return to [`PipelineState::Idle`]
//!
//! Steps 2-5 are published as one snapshot before the request is issued,
//! so subscribers see the placeholder while the answer is outstanding.
//! Service failures are converted into state here and never returned as
//! errors.

use crate::conversation::{
    capture_timestamp, derive_title, ConversationId, ConversationStore, Message, MessageId,
    MessagePatch, BANNER_ERROR, FAILED_REPLY, FALLBACK_ANSWER,
};
use crate::service::AnsweringService;

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::watch;

/// Whether an exchange is in flight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PipelineState {
    /// Ready to accept a send
    #[default]
    Idle,
    /// Waiting on the answering service
    Sending,
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Sending => write!(f, "sending"),
        }
    }
}

/// Why a send was dropped without touching any state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// Input was empty after trimming
    EmptyInput,
    /// No conversation is selected
    NoActiveConversation,
    /// Another exchange is still outstanding
    AlreadySending,
}

/// Result of one call to [`SendPipeline::send`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    /// The guard rejected the send; nothing changed
    Ignored(IgnoreReason),
    /// The placeholder was resolved with the answer (or the fallback)
    Answered {
        /// Conversation the exchange ran in
        conversation_id: ConversationId,
        /// The resolved assistant message
        message_id: MessageId,
        /// Text written into the placeholder
        answer: String,
    },
    /// The exchange failed; placeholder and banner carry the error
    Failed {
        /// Conversation the exchange ran in
        conversation_id: ConversationId,
        /// The failed assistant message
        message_id: MessageId,
        /// Underlying cause, for logs and one-shot callers
        error: String,
    },
}

impl SendOutcome {
    /// Whether the guard dropped the send
    pub fn is_ignored(&self) -> bool {
        matches!(self, Self::Ignored(_))
    }
}

/// Resets the pipeline to `Idle` when dropped, whatever the outcome
struct SendingGuard<'a> {
    state: &'a Mutex<PipelineState>,
}

impl Drop for SendingGuard<'_> {
    fn drop(&mut self) {
        *lock(self.state) = PipelineState::Idle;
        tracing::trace!("Pipeline released");
    }
}

/// Orchestrates question/answer exchanges against an [`AnsweringService`]
pub struct SendPipeline {
    service: Arc<dyn AnsweringService>,
    state: Mutex<PipelineState>,
}

impl SendPipeline {
    /// Create an idle pipeline
    pub fn new(service: Arc<dyn AnsweringService>) -> Self {
        Self {
            service,
            state: Mutex::new(PipelineState::Idle),
        }
    }

    /// Current pipeline state
    pub fn state(&self) -> PipelineState {
        *lock(&self.state)
    }

    /// Whether an exchange is in flight
    pub fn is_sending(&self) -> bool {
        self.state() == PipelineState::Sending
    }

    fn try_begin(&self) -> Option<SendingGuard<'_>> {
        let mut state = lock(&self.state);
        match *state {
            PipelineState::Sending => None,
            PipelineState::Idle => {
                *state = PipelineState::Sending;
                Some(SendingGuard { state: &self.state })
            }
        }
    }

    /// Run one exchange using the current draft
    ///
    /// `store` receives every new snapshot; `draft` is the pending input
    /// text and is cleared once the guard passes.
    pub async fn send(
        &self,
        store: &watch::Sender<ConversationStore>,
        draft: &Mutex<String>,
    ) -> SendOutcome {
        let question = lock(draft).trim().to_string();
        if question.is_empty() {
            tracing::debug!("Ignoring send: empty input");
            return SendOutcome::Ignored(IgnoreReason::EmptyInput);
        }

        let conversation_id = match store.borrow().active_id().cloned() {
            Some(id) => id,
            None => {
                tracing::debug!("Ignoring send: no active conversation");
                return SendOutcome::Ignored(IgnoreReason::NoActiveConversation);
            }
        };

        let _guard = match self.try_begin() {
            Some(guard) => guard,
            None => {
                tracing::debug!("Ignoring send: exchange already in flight");
                return SendOutcome::Ignored(IgnoreReason::AlreadySending);
            }
        };

        lock(draft).clear();
        let timestamp = capture_timestamp();
        let user_message = Message::user(question.clone(), timestamp.clone());
        let placeholder = Message::pending_assistant(timestamp);
        let placeholder_id = placeholder.id.clone();
        let title = derive_title(&question);

        store.send_modify(|current| {
            *current = current
                .clear_error()
                .append_message(&conversation_id, user_message)
                .rename_if_default(&conversation_id, &title)
                .append_message(&conversation_id, placeholder);
        });

        tracing::info!(
            "Sending question in {} ({} chars)",
            conversation_id,
            question.chars().count()
        );

        match self.service.ask(&question).await {
            Ok(answer) => {
                let answer = if answer.is_empty() {
                    tracing::warn!("Answering service returned an empty answer, using fallback");
                    FALLBACK_ANSWER.to_string()
                } else {
                    answer
                };

                let patch = MessagePatch::resolved(answer.clone());
                store.send_modify(|current| {
                    *current = current.update_message(&conversation_id, &placeholder_id, &patch);
                });

                SendOutcome::Answered {
                    conversation_id,
                    message_id: placeholder_id,
                    answer,
                }
            }
            Err(e) => {
                tracing::error!("Exchange in {} failed: {:#}", conversation_id, e);

                let patch = MessagePatch::failed(FAILED_REPLY);
                store.send_modify(|current| {
                    *current = current
                        .set_error(BANNER_ERROR)
                        .update_message(&conversation_id, &placeholder_id, &patch);
                });

                SendOutcome::Failed {
                    conversation_id,
                    message_id: placeholder_id,
                    error: format!("{:#}", e),
                }
            }
        }
    }
}

/// Lock a mutex, recovering the data if a previous holder panicked
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}
