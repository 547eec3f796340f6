//! Snapshot-based conversation store
//!
//! [`ConversationStore`] is the single source of truth for all
//! conversations, the active selection and the banner error. Every
//! mutation borrows the current snapshot and returns a new one. Untouched
//! conversations are shared between snapshots through `Arc`, so a renderer
//! can tell what changed with [`Arc::ptr_eq`] instead of deep comparison.

use super::{Conversation, ConversationId, Message, MessageId, MessagePatch};
use std::sync::Arc;

/// Immutable snapshot of every conversation plus selection and error state
#[derive(Debug, Clone, PartialEq)]
pub struct ConversationStore {
    conversations: Vec<Arc<Conversation>>,
    active_id: Option<ConversationId>,
    error: Option<String>,
}

impl ConversationStore {
    /// Create a store holding one default conversation, which is active
    ///
    /// # Examples
    ///
    /// ```
    /// use medai::conversation::{ConversationStore, DEFAULT_TITLE};
    ///
    /// let store = ConversationStore::new();
    /// assert_eq!(store.len(), 1);
    /// assert_eq!(store.active_conversation().unwrap().title, DEFAULT_TITLE);
    /// ```
    pub fn new() -> Self {
        let conversation = Conversation::new();
        Self {
            active_id: Some(conversation.id.clone()),
            conversations: vec![Arc::new(conversation)],
            error: None,
        }
    }

    /// Create a store with no conversations and no selection
    pub fn empty() -> Self {
        Self {
            conversations: Vec::new(),
            active_id: None,
            error: None,
        }
    }

    /// Insert a fresh conversation at the front and make it active
    ///
    /// Clears the banner error. Returns the new snapshot and the new id.
    pub fn create_conversation(&self) -> (Self, ConversationId) {
        let conversation = Conversation::new();
        let id = conversation.id.clone();
        (self.insert_conversation(conversation), id)
    }

    /// Insert `conversation` at the front and make it active
    ///
    /// Clears the banner error. An existing conversation with the same id
    /// is left in place and simply selected.
    pub fn insert_conversation(&self, conversation: Conversation) -> Self {
        let id = conversation.id.clone();
        if self.conversation(&id).is_some() {
            return self.select_conversation(&id);
        }

        let mut conversations = Vec::with_capacity(self.conversations.len() + 1);
        conversations.push(Arc::new(conversation));
        conversations.extend(self.conversations.iter().cloned());

        tracing::debug!("Created conversation {}", id);
        Self {
            conversations,
            active_id: Some(id),
            error: None,
        }
    }

    /// Make `id` the active conversation and clear the banner error
    ///
    /// An unknown id leaves no conversation active; this is the empty-state
    /// case, not an error.
    pub fn select_conversation(&self, id: &ConversationId) -> Self {
        let active_id = if self.conversation(id).is_some() {
            Some(id.clone())
        } else {
            tracing::debug!("Selected unknown conversation {}, clearing selection", id);
            None
        };

        Self {
            conversations: self.conversations.clone(),
            active_id,
            error: None,
        }
    }

    /// Append `message` to the end of a conversation
    ///
    /// Unknown conversation ids leave the store unchanged.
    pub fn append_message(&self, conversation_id: &ConversationId, message: Message) -> Self {
        self.map_conversation(conversation_id, |conversation| {
            conversation.messages.push(message);
            true
        })
    }

    /// Merge `patch` into a message in place, keeping its position
    ///
    /// Unknown conversation or message ids leave the store unchanged.
    pub fn update_message(
        &self,
        conversation_id: &ConversationId,
        message_id: &MessageId,
        patch: &MessagePatch,
    ) -> Self {
        self.map_conversation(conversation_id, |conversation| {
            match conversation
                .messages
                .iter_mut()
                .find(|m| &m.id == message_id)
            {
                Some(message) => {
                    message.apply(patch);
                    true
                }
                None => false,
            }
        })
    }

    /// Set the title only while it is still the default sentinel
    pub fn rename_if_default(&self, conversation_id: &ConversationId, new_title: &str) -> Self {
        self.map_conversation(conversation_id, |conversation| {
            if conversation.has_default_title() {
                conversation.title = new_title.to_string();
                true
            } else {
                false
            }
        })
    }

    /// Raise the banner error
    pub fn set_error(&self, message: impl Into<String>) -> Self {
        Self {
            conversations: self.conversations.clone(),
            active_id: self.active_id.clone(),
            error: Some(message.into()),
        }
    }

    /// Dismiss the banner error
    pub fn clear_error(&self) -> Self {
        Self {
            conversations: self.conversations.clone(),
            active_id: self.active_id.clone(),
            error: None,
        }
    }

    /// All conversations, most recently created first
    pub fn conversations(&self) -> &[Arc<Conversation>] {
        &self.conversations
    }

    /// Look up a conversation by id
    pub fn conversation(&self, id: &ConversationId) -> Option<&Arc<Conversation>> {
        self.conversations.iter().find(|c| &c.id == id)
    }

    /// Id of the active conversation, if any
    pub fn active_id(&self) -> Option<&ConversationId> {
        self.active_id.as_ref()
    }

    /// The active conversation, if the selection points at one
    pub fn active_conversation(&self) -> Option<&Arc<Conversation>> {
        self.active_id.as_ref().and_then(|id| self.conversation(id))
    }

    /// Current banner error
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Number of conversations
    pub fn len(&self) -> usize {
        self.conversations.len()
    }

    /// Whether the store holds no conversations
    pub fn is_empty(&self) -> bool {
        self.conversations.is_empty()
    }

    /// Copy-on-write edit of a single conversation
    ///
    /// `edit` returns whether it changed anything; when it did not (or the
    /// id is unknown) the original `Arc` is kept so identity is preserved.
    fn map_conversation<F>(&self, id: &ConversationId, edit: F) -> Self
    where
        F: FnOnce(&mut Conversation) -> bool,
    {
        let mut conversations = self.conversations.clone();
        if let Some(slot) = conversations.iter_mut().find(|c| &c.id == id) {
            let mut edited = (**slot).clone();
            if edit(&mut edited) {
                *slot = Arc::new(edited);
            }
        }

        Self {
            conversations,
            active_id: self.active_id.clone(),
            error: self.error.clone(),
        }
    }
}

impl Default for ConversationStore {
    fn default() -> Self {
        Self::new()
    }
}
