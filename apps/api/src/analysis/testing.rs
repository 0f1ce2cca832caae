//! Scripted `CompletionClient` for tests: replays canned replies in order and
//! records every prompt it receives.

use std::collections::VecDeque;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::llm_client::{CompletionClient, LlmError};

#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub prompt: String,
    pub temperature: f32,
}

#[derive(Default)]
pub struct ScriptedClient {
    replies: Mutex<VecDeque<String>>,
    calls: Mutex<Vec<RecordedCall>>,
    fail_at: Option<usize>,
}

impl ScriptedClient {
    pub fn new<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            replies: Mutex::new(replies.into_iter().map(Into::into).collect()),
            ..Default::default()
        }
    }

    /// A client whose `index`-th call (0-based) is rejected with an auth error.
    pub fn failing_at(index: usize) -> Self {
        Self {
            fail_at: Some(index),
            ..Default::default()
        }
    }

    pub fn with_failure_at(mut self, index: usize) -> Self {
        self.fail_at = Some(index);
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }
}

#[async_trait]
impl CompletionClient for ScriptedClient {
    async fn complete(&self, prompt: &str, temperature: f32) -> Result<String, LlmError> {
        let index = {
            let mut calls = self.calls.lock();
            calls.push(RecordedCall {
                prompt: prompt.to_string(),
                temperature,
            });
            calls.len() - 1
        };

        if self.fail_at == Some(index) {
            return Err(LlmError::Auth {
                status: 401,
                message: "Incorrect API key provided".to_string(),
            });
        }

        self.replies
            .lock()
            .pop_front()
            .ok_or(LlmError::EmptyContent)
    }
}
