//! Test utilities for MedAI
//!
//! Provides a scripted [`AnsweringService`] so the pipeline and session can
//! be exercised without a network.

use crate::error::{MedaiError, Result};
use crate::service::AnsweringService;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

/// Answering service that replays a fixed list of replies
///
/// Each call pops the next reply; once the script is exhausted every call
/// answers `"Done"`. An optional gate holds each request until the test
/// calls `notify_one`.
pub struct ScriptedService {
    replies: Mutex<VecDeque<std::result::Result<String, String>>>,
    questions: Mutex<Vec<String>>,
    gate: Option<Arc<Notify>>,
}

impl ScriptedService {
    /// Service that answers with each of `answers` in turn
    pub fn answering(answers: &[&str]) -> Self {
        Self::with_replies(answers.iter().map(|a| Ok(a.to_string())).collect())
    }

    /// Service whose first call fails with `message`
    pub fn failing(message: &str) -> Self {
        Self::with_replies(vec![Err(message.to_string())])
    }

    /// Service with an explicit mix of answers and failures
    pub fn with_replies(replies: Vec<std::result::Result<String, String>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            questions: Mutex::new(Vec::new()),
            gate: None,
        }
    }

    /// Hold every request until `gate` is notified
    pub fn gated(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }

    /// Questions received so far, in order
    pub fn questions(&self) -> Vec<String> {
        self.questions.lock().unwrap().clone()
    }

    /// Number of requests received
    pub fn call_count(&self) -> usize {
        self.questions.lock().unwrap().len()
    }
}

#[async_trait]
impl AnsweringService for ScriptedService {
    async fn ask(&self, question: &str) -> Result<String> {
        self.questions.lock().unwrap().push(question.to_string());

        if let Some(gate) = &self.gate {
            gate.notified().await;
        }

        let reply = self.replies.lock().unwrap().pop_front();
        match reply {
            Some(Ok(answer)) => Ok(answer),
            Some(Err(message)) => Err(MedaiError::Service(message).into()),
            None => Ok("Done".to_string()),
        }
    }

    async fn health(&self) -> Result<String> {
        Ok("scripted".to_string())
    }
}
