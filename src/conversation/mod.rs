//! Conversation data model
//!
//! Conversations are named, ordered threads of messages. Messages are only
//! ever appended; the one mutation a message sees is the resolution of an
//! assistant placeholder, which happens in place and exactly once.
//!
//! The [`store`] submodule holds the snapshot-based store that owns all
//! conversations and the active selection.

pub mod store;

pub use store::ConversationStore;

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Title every conversation carries until its first user message is sent
pub const DEFAULT_TITLE: &str = "New chat";

/// Transient content shown for an assistant message awaiting its answer
pub const PENDING_PLACEHOLDER: &str = "Thinking...";

/// Reply used when the service answers successfully but with no text
pub const FALLBACK_ANSWER: &str = "I'm sorry, I couldn't generate an answer right now.";

/// Reply written into the transcript when the exchange fails
pub const FAILED_REPLY: &str = "⚠️ Error contacting server. Please try again in a moment.";

/// Banner-level error raised alongside [`FAILED_REPLY`]
pub const BANNER_ERROR: &str = "Something went wrong while talking to the assistant.";

/// Titles up to this many characters are kept verbatim
const TITLE_MAX_CHARS: usize = 30;

/// Number of characters kept before the ellipsis when a title is truncated
const TITLE_TRUNCATED_CHARS: usize = 27;

/// Opaque conversation identifier, unique for the lifetime of the process
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConversationId(String);

impl ConversationId {
    /// Generate a fresh identifier
    pub fn generate() -> Self {
        Self(format!("conv-{}", Uuid::new_v4()))
    }

    /// Borrow the identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ConversationId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for ConversationId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for ConversationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Message identifier, unique within its conversation
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(String);

impl MessageId {
    /// Generate a fresh identifier
    pub fn generate() -> Self {
        Self(format!("msg-{}", Uuid::new_v4()))
    }

    /// Borrow the identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for MessageId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Author of a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The person typing questions
    User,
    /// The answering service
    Assistant,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User => write!(f, "user"),
            Self::Assistant => write!(f, "assistant"),
        }
    }
}

/// Lifecycle of a message's content
///
/// User messages are created `Resolved`. Assistant placeholders start
/// `Pending` and move to `Resolved` or `Failed` exactly once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "content", rename_all = "lowercase")]
pub enum MessageStatus {
    /// Awaiting the answering service
    Pending,
    /// Final content: the user's text, the service's answer, or the fallback
    Resolved(String),
    /// The exchange failed; content is the fixed failure reply
    Failed(String),
}

impl MessageStatus {
    /// Whether the message is still awaiting its result
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    /// Display text for this status
    pub fn content(&self) -> &str {
        match self {
            Self::Pending => PENDING_PLACEHOLDER,
            Self::Resolved(content) | Self::Failed(content) => content,
        }
    }
}

/// A single entry in a conversation transcript
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Identifier, unique within the conversation
    pub id: MessageId,
    /// Author of the message
    pub role: Role,
    /// Content lifecycle
    pub status: MessageStatus,
    /// Human-readable capture time, never updated after creation
    pub timestamp: String,
}

impl Message {
    /// Create a user message with a fresh id
    ///
    /// # Examples
    ///
    /// ```
    /// use medai::conversation::{Message, Role};
    ///
    /// let message = Message::user("How is pneumonia diagnosed?", "10:02:11 AM");
    /// assert_eq!(message.role, Role::User);
    /// assert_eq!(message.content(), "How is pneumonia diagnosed?");
    /// assert!(!message.is_pending());
    /// ```
    pub fn user(content: impl Into<String>, timestamp: impl Into<String>) -> Self {
        Self {
            id: MessageId::generate(),
            role: Role::User,
            status: MessageStatus::Resolved(content.into()),
            timestamp: timestamp.into(),
        }
    }

    /// Create an assistant placeholder awaiting the service's answer
    ///
    /// # Examples
    ///
    /// ```
    /// use medai::conversation::{Message, PENDING_PLACEHOLDER};
    ///
    /// let message = Message::pending_assistant("10:02:11 AM");
    /// assert!(message.is_pending());
    /// assert_eq!(message.content(), PENDING_PLACEHOLDER);
    /// ```
    pub fn pending_assistant(timestamp: impl Into<String>) -> Self {
        Self {
            id: MessageId::generate(),
            role: Role::Assistant,
            status: MessageStatus::Pending,
            timestamp: timestamp.into(),
        }
    }

    /// Display text of the message
    pub fn content(&self) -> &str {
        self.status.content()
    }

    /// Whether the message is an unresolved placeholder
    pub fn is_pending(&self) -> bool {
        self.status.is_pending()
    }

    /// Apply a patch, leaving id, role and timestamp untouched
    pub(crate) fn apply(&mut self, patch: &MessagePatch) {
        if let Some(status) = &patch.status {
            self.status = status.clone();
        }
    }
}

/// Partial update merged into an existing message
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessagePatch {
    /// Replacement status, if any
    pub status: Option<MessageStatus>,
}

impl MessagePatch {
    /// Patch that resolves a placeholder with final content
    pub fn resolved(content: impl Into<String>) -> Self {
        Self {
            status: Some(MessageStatus::Resolved(content.into())),
        }
    }

    /// Patch that marks a placeholder as failed
    pub fn failed(content: impl Into<String>) -> Self {
        Self {
            status: Some(MessageStatus::Failed(content.into())),
        }
    }
}

/// A named, ordered thread of messages
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversation {
    /// Stable identifier
    pub id: ConversationId,
    /// Display title, [`DEFAULT_TITLE`] until the first message is sent
    pub title: String,
    /// Messages in chronological order
    pub messages: Vec<Message>,
}

impl Conversation {
    /// Create an empty conversation with a fresh id and the default title
    pub fn new() -> Self {
        Self {
            id: ConversationId::generate(),
            title: DEFAULT_TITLE.to_string(),
            messages: Vec::new(),
        }
    }

    /// Whether the title is still the default sentinel
    pub fn has_default_title(&self) -> bool {
        self.title == DEFAULT_TITLE
    }

    /// Find a message by id
    pub fn message(&self, id: &MessageId) -> Option<&Message> {
        self.messages.iter().find(|m| &m.id == id)
    }

    /// Number of messages awaiting their result
    pub fn pending_count(&self) -> usize {
        self.messages.iter().filter(|m| m.is_pending()).count()
    }
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new()
    }
}

/// Derive a conversation title from the first user message
///
/// The text is trimmed; up to 30 characters are kept verbatim, longer text
/// is cut to 27 characters followed by `...`. Empty text yields the default
/// title.
///
/// # Examples
///
/// ```
/// use medai::conversation::derive_title;
///
/// assert_eq!(
///     derive_title("What is Acromegaly and gigantism?"),
///     "What is Acromegaly and giga..."
/// );
/// assert_eq!(derive_title("How is pneumonia diagnosed?"), "How is pneumonia diagnosed?");
/// ```
pub fn derive_title(text: &str) -> String {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return DEFAULT_TITLE.to_string();
    }

    if trimmed.chars().count() <= TITLE_MAX_CHARS {
        trimmed.to_string()
    } else {
        let head: String = trimmed.chars().take(TITLE_TRUNCATED_CHARS).collect();
        format!("{}...", head)
    }
}

/// Capture the current local time in the format shown next to messages
pub fn capture_timestamp() -> String {
    chrono::Local::now().format("%-I:%M:%S %p").to_string()
}
