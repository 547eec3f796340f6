//! Terminal rendering of conversation snapshots
//!
//! [`TranscriptView`] draws the active conversation incrementally. A
//! terminal cannot rewrite earlier lines, so instead of redrawing the whole
//! transcript on every snapshot it prints:
//!
//! - the header and full transcript when the active conversation changes
//! - messages appended since the previous render
//! - placeholders that moved out of the pending state
//! - the banner error, once per distinct value
//!
//! Everything writes to an `io::Write` so the output can be captured.

use crate::config::ChatConfig;
use crate::conversation::{
    Conversation, ConversationId, ConversationStore, Message, MessageId, MessageStatus, Role,
};

use colored::Colorize;
use prettytable::{format, Table};
use std::io::{self, Write};

/// Questions suggested when a conversation has no messages yet
pub const EXAMPLE_QUESTIONS: [&str; 3] = [
    "What is Acromegaly and gigantism?",
    "What is the treatment of acne?",
    "How is pneumonia diagnosed?",
];

/// Shown when no conversation is selected
pub const EMPTY_SELECTION: &str = "Select or create a conversation to begin.";

/// Educational-use disclaimer
pub const DISCLAIMER: &str = "⚕️ Educational only — not a replacement for a doctor.";

/// Incremental renderer for the active conversation
#[derive(Debug)]
pub struct TranscriptView {
    show_examples: bool,
    show_timestamps: bool,
    // Outer None: nothing rendered yet. Inner None: empty selection.
    active: Option<Option<ConversationId>>,
    rendered: Vec<(MessageId, bool)>,
    last_error: Option<String>,
}

impl TranscriptView {
    /// Create a view using the chat presentation settings
    pub fn new(config: &ChatConfig) -> Self {
        Self {
            show_examples: config.show_examples,
            show_timestamps: config.show_timestamps,
            active: None,
            rendered: Vec::new(),
            last_error: None,
        }
    }

    /// Forget what has been drawn so the next render starts over
    pub fn reset(&mut self) {
        self.active = None;
        self.rendered.clear();
        self.last_error = None;
    }

    /// Draw whatever changed since the previous call
    ///
    /// # Errors
    ///
    /// Returns error if writing to `out` fails
    pub fn render<W: Write>(&mut self, store: &ConversationStore, out: &mut W) -> io::Result<()> {
        let active = store.active_conversation();
        let active_id = active.map(|c| c.id.clone());

        if self.active.as_ref() != Some(&active_id) {
            self.active = Some(active_id);
            self.rendered.clear();
            match active {
                Some(conversation) => self.write_header(conversation, out)?,
                None => writeln!(out, "\n{}\n", EMPTY_SELECTION.dimmed())?,
            }
        }

        if let Some(conversation) = active {
            for (index, message) in conversation.messages.iter().enumerate() {
                let changed = match self.rendered.get(index) {
                    None => true,
                    Some((id, was_pending)) => {
                        *was_pending && !message.is_pending() && *id == message.id
                    }
                };
                if !changed {
                    continue;
                }

                self.write_message(message, out)?;
                let entry = (message.id.clone(), message.is_pending());
                if index < self.rendered.len() {
                    self.rendered[index] = entry;
                } else {
                    self.rendered.push(entry);
                }
            }
        }

        match store.error() {
            Some(error) if self.last_error.as_deref() != Some(error) => {
                writeln!(
                    out,
                    "{} {}",
                    format!("⚠ {}", error).red().bold(),
                    "(/dismiss to hide)".dimmed()
                )?;
                self.last_error = Some(error.to_string());
            }
            Some(_) => {}
            None => self.last_error = None,
        }

        out.flush()
    }

    fn write_header<W: Write>(&self, conversation: &Conversation, out: &mut W) -> io::Result<()> {
        writeln!(out)?;
        writeln!(out, "{}", format!("── {} ──", conversation.title).bold())?;

        if conversation.messages.is_empty() && self.show_examples {
            writeln!(out, "{}", "Start by asking something like:".dimmed())?;
            for question in EXAMPLE_QUESTIONS {
                writeln!(out, "  • “{}”", question)?;
            }
        }
        writeln!(out)
    }

    fn write_message<W: Write>(&self, message: &Message, out: &mut W) -> io::Result<()> {
        let label = match message.role {
            Role::User => "You".cyan().bold(),
            Role::Assistant => "AI".green().bold(),
        };

        if self.show_timestamps {
            writeln!(out, "{} {}", label, format!("· {}", message.timestamp).dimmed())?;
        } else {
            writeln!(out, "{}", label)?;
        }

        match &message.status {
            MessageStatus::Pending => {
                writeln!(out, "  {} {}", message.content().italic().dimmed(), "•••".dimmed())?;
            }
            MessageStatus::Resolved(content) => {
                for line in content.lines() {
                    writeln!(out, "  {}", line)?;
                }
            }
            MessageStatus::Failed(content) => {
                writeln!(out, "  {}", content.red())?;
            }
        }
        writeln!(out)
    }
}

/// Message count label as shown in the conversation list
///
/// # Examples
///
/// ```
/// use medai::view::message_count_label;
///
/// assert_eq!(message_count_label(1), "1 message");
/// assert_eq!(message_count_label(0), "0 messages");
/// ```
pub fn message_count_label(count: usize) -> String {
    if count == 1 {
        "1 message".to_string()
    } else {
        format!("{} messages", count)
    }
}

/// Print all conversations as a table, most recent first
///
/// # Errors
///
/// Returns error if writing to `out` fails
pub fn render_conversation_list<W: Write>(store: &ConversationStore, out: &mut W) -> io::Result<()> {
    if store.is_empty() {
        writeln!(out, "{}", "No conversations yet.".yellow())?;
        return Ok(());
    }

    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_BORDERS_ONLY);
    table.add_row(prettytable::row![
        "#".bold(),
        "Title".bold(),
        "Messages".bold(),
        ""
    ]);

    for (index, conversation) in store.conversations().iter().enumerate() {
        let marker = if store.active_id() == Some(&conversation.id) {
            "●".green().to_string()
        } else {
            String::new()
        };
        let number = (index + 1).to_string();
        table.add_row(prettytable::row![
            number.cyan(),
            conversation.title,
            message_count_label(conversation.messages.len()),
            marker
        ]);
    }

    table.print(out)?;
    writeln!(out, "Use {} to switch conversations.", "/select <#>".cyan())?;
    Ok(())
}
