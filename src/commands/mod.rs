/*!
Command handlers for the CLI

This module provides command handlers invoked by the CLI entrypoint.

It exposes three top-level command modules:

- `chat`: Interactive chat session
- `ask`: Send a single question and print the answer
- `status`: Health check of the answering service

Each handler builds the answering service from configuration and drives a
`ChatSession`; none of them talk to the network directly.
*/

use crate::commands::special_commands::{parse_special_command, print_help, SpecialCommand};
use crate::config::Config;
use crate::conversation::ConversationStore;
use crate::error::{MedaiError, Result};
use crate::pipeline::SendOutcome;
use crate::service::{create_service, AnsweringService};
use crate::session::ChatSession;
use crate::view::{render_conversation_list, TranscriptView, DISCLAIMER};

use colored::Colorize;
use std::io::{self, Write};
use std::sync::Arc;
use tokio::sync::watch;

// Special commands parser for the chat session
pub mod special_commands;

// Chat command handler
pub mod chat {
    //! Interactive chat mode handler.
    //!
    //! Builds the answering service, starts a `ChatSession` and runs a
    //! readline-based loop. Plain input is sent as a question; `/` commands
    //! manage conversations. While an answer is outstanding the loop keeps
    //! rendering published snapshots so the placeholder is visible.

    use super::*;
    use rustyline::error::ReadlineError;
    use rustyline::DefaultEditor;

    /// Start interactive chat mode
    ///
    /// # Arguments
    ///
    /// * `config` - Global configuration (consumed)
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use medai::commands::chat;
    /// use medai::config::Config;
    ///
    /// # async fn example() -> medai::error::Result<()> {
    /// chat::run_chat(Config::default()).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn run_chat(config: Config) -> Result<()> {
        tracing::info!("Starting interactive chat mode");

        let service = create_service(&config.service)?;
        let session = ChatSession::new(service);
        let mut updates = session.subscribe();
        let mut view = TranscriptView::new(&config.chat);
        let mut stdout = io::stdout();

        let mut rl = DefaultEditor::new()?;

        print_welcome_banner(&config);
        render_latest(&mut updates, &mut view, &mut stdout)?;

        loop {
            let prompt = format_prompt(&session.snapshot());
            match rl.readline(&prompt) {
                Ok(line) => {
                    let trimmed = line.trim();
                    if trimmed.is_empty() {
                        continue;
                    }

                    rl.add_history_entry(trimmed)?;

                    match parse_special_command(trimmed) {
                        Ok(SpecialCommand::None) => {
                            let outcome =
                                send_and_render(&session, trimmed, &mut updates, &mut view)
                                    .await?;
                            log_outcome(&outcome);
                        }
                        Ok(SpecialCommand::NewConversation) => {
                            let id = session.create_conversation();
                            tracing::debug!("Created conversation {}", id);
                        }
                        Ok(SpecialCommand::ListConversations) => {
                            render_conversation_list(&session.snapshot(), &mut stdout)?;
                        }
                        Ok(SpecialCommand::Select(selector)) => {
                            match selector.resolve(&session.snapshot()) {
                                Some(id) => session.select_conversation(&id),
                                None => println!(
                                    "{} Use {} to see conversation numbers.",
                                    "No conversation at that position.".yellow(),
                                    "/list".cyan()
                                ),
                            }
                        }
                        Ok(SpecialCommand::DismissError) => session.dismiss_error(),
                        Ok(SpecialCommand::ShowStatus) => {
                            print_status_display(&session, &config);
                        }
                        Ok(SpecialCommand::Help) => print_help(),
                        Ok(SpecialCommand::Exit) => break,
                        Err(e) => {
                            eprintln!("{}", e.to_string().red());
                        }
                    }

                    render_latest(&mut updates, &mut view, &mut stdout)?;
                }
                Err(ReadlineError::Interrupted) => {
                    println!("CTRL-C");
                    break;
                }
                Err(ReadlineError::Eof) => {
                    println!("CTRL-D");
                    break;
                }
                Err(err) => {
                    return Err(MedaiError::from(err).into());
                }
            }
        }

        tracing::info!("Chat session ended");
        Ok(())
    }

    /// Send `text` and keep rendering snapshots until the exchange settles
    async fn send_and_render(
        session: &ChatSession,
        text: &str,
        updates: &mut watch::Receiver<ConversationStore>,
        view: &mut TranscriptView,
    ) -> Result<SendOutcome> {
        let mut stdout = io::stdout();
        let send = session.send(text);
        tokio::pin!(send);

        loop {
            tokio::select! {
                outcome = &mut send => {
                    render_latest(updates, view, &mut stdout)?;
                    return Ok(outcome);
                }
                changed = updates.changed() => {
                    if changed.is_ok() {
                        render_latest(updates, view, &mut stdout)?;
                    }
                }
            }
        }
    }

    fn log_outcome(outcome: &SendOutcome) {
        match outcome {
            SendOutcome::Ignored(reason) => tracing::debug!("Send ignored: {:?}", reason),
            SendOutcome::Answered {
                conversation_id, ..
            } => tracing::debug!("Answer received for {}", conversation_id),
            SendOutcome::Failed {
                conversation_id,
                error,
                ..
            } => tracing::warn!("Exchange failed in {}: {}", conversation_id, error),
        }
    }

    /// Prompt showing the active conversation title
    pub(crate) fn format_prompt(store: &ConversationStore) -> String {
        match store.active_conversation() {
            Some(conversation) => format!("[{}] >> ", conversation.title.cyan()),
            None => format!("[{}] >> ", "no conversation".dimmed()),
        }
    }

    fn print_welcome_banner(config: &Config) {
        println!();
        println!("{}", "MedAI".bold().green());
        println!("Ask medical questions. Answers come from {}", config.service.endpoint);
        println!("Type {} for commands, {} to leave.", "/help".cyan(), "exit".cyan());
        if config.chat.show_disclaimer {
            println!("{}", DISCLAIMER.dimmed());
        }
    }

    fn print_status_display(session: &ChatSession, config: &Config) {
        let snapshot = session.snapshot();
        let active = snapshot
            .active_conversation()
            .map(|c| c.title.clone())
            .unwrap_or_else(|| "(none)".to_string());

        println!();
        println!("{}", "Session Status".bold());
        println!("  Endpoint:       {}", config.service.endpoint);
        println!("  Pipeline:       {}", session.pipeline_state());
        println!("  Conversations:  {}", snapshot.len());
        println!("  Active:         {}", active);
        if let Some(error) = snapshot.error() {
            println!("  Error:          {}", error.red());
        }
        println!();
    }

}

// One-shot question handler
pub mod ask {
    //! Send a single question through the same pipeline the chat session
    //! uses and print the answer.

    use super::*;

    /// Ask one question and print the answer
    ///
    /// With `json` set, the whole conversation is printed as JSON instead.
    ///
    /// # Errors
    ///
    /// Returns `MedaiError::Command` when the exchange fails, so the process
    /// exits non-zero. The conversation is still printed first.
    pub async fn run_ask(config: Config, question: String, json: bool) -> Result<()> {
        tracing::info!("Asking a single question");
        let service = create_service(&config.service)?;
        let mut stdout = io::stdout();
        ask_with_service(service, &question, json, &mut stdout).await
    }

    /// Run one exchange against `service` and write the result to `out`
    pub async fn ask_with_service<W: Write>(
        service: Arc<dyn AnsweringService>,
        question: &str,
        json: bool,
        out: &mut W,
    ) -> Result<()> {
        let session = ChatSession::new(service);
        let outcome = session.send(question).await;

        if json {
            let snapshot = session.snapshot();
            if let Some(conversation) = snapshot.active_conversation() {
                serde_json::to_writer_pretty(&mut *out, &**conversation)
                    .map_err(MedaiError::from)?;
                writeln!(out)?;
            }
        }

        match outcome {
            SendOutcome::Answered { answer, .. } => {
                if !json {
                    writeln!(out, "{}", answer)?;
                }
                Ok(())
            }
            SendOutcome::Failed { error, .. } => {
                tracing::error!("Exchange failed: {}", error);
                Err(MedaiError::Command(format!("Exchange failed: {}", error)).into())
            }
            SendOutcome::Ignored(reason) => Err(MedaiError::Command(format!(
                "Question was not sent: {:?}",
                reason
            ))
            .into()),
        }
    }

}

// Health check handler
pub mod status {
    //! Report whether the answering service is reachable.

    use super::*;

    /// Query the service health endpoint and print the reported status
    ///
    /// # Errors
    ///
    /// Returns error if the service cannot be reached or reports a failure
    pub async fn run_status(config: Config) -> Result<()> {
        tracing::info!("Checking answering service health");
        let service = create_service(&config.service)?;
        let mut stdout = io::stdout();
        check_with_service(service.as_ref(), &config.service.endpoint, &mut stdout).await
    }

    /// Run the health check against `service` and write a one-line report
    pub async fn check_with_service<W: Write>(
        service: &dyn AnsweringService,
        endpoint: &str,
        out: &mut W,
    ) -> Result<()> {
        match service.health().await {
            Ok(status) => {
                writeln!(out, "{} {} ({})", "✓".green(), status, endpoint)?;
                Ok(())
            }
            Err(e) => {
                writeln!(out, "{} {} unreachable", "✗".red(), endpoint)?;
                Err(e)
            }
        }
    }

}

/// Render everything published since the previous render
fn render_latest<W: Write>(
    updates: &mut watch::Receiver<ConversationStore>,
    view: &mut TranscriptView,
    out: &mut W,
) -> Result<()> {
    let snapshot = updates.borrow_and_update().clone();
    view.render(&snapshot, out)?;
    Ok(())
}
