//! Mock provider for testing routing and facade behavior.
//!
//! Allows scripting replies and failures in order, enabling end-to-end
//! testing of selection and fallback without real API calls.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use knotable_core::{Error, GenerationParams, ProviderReply, Result, TextProvider};

/// Scripted outcomes, consumed front to back.
type Script = Mutex<VecDeque<Result<String>>>;

/// Mock provider that replays a script of replies and failures.
pub struct MockProvider {
    /// Registry name reported by this mock.
    name: String,
    /// Model identifier reported by this mock.
    model: String,
    /// Scripted outcomes; each call consumes one.
    script: Script,
    /// Reply used when the script is exhausted.
    default_reply: Option<String>,
    /// Prompts received, in call order.
    calls: Mutex<Vec<String>>,
    /// Parameters received, in call order.
    params_seen: Mutex<Vec<GenerationParams>>,
}

/// Latency reported by every mock reply, in milliseconds.
pub const MOCK_LATENCY_MS: u64 = 5;

/// Locks a mutex, ignoring poisoning from a panicked test thread.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MockProvider {
    /// Creates a mock provider with the given registry name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            model: "mock-model".to_owned(),
            script: Mutex::new(VecDeque::new()),
            default_reply: None,
            calls: Mutex::new(Vec::new()),
            params_seen: Mutex::new(Vec::new()),
        }
    }

    /// Queues a successful reply.
    #[must_use]
    pub fn with_reply(self, text: impl Into<String>) -> Self {
        lock(&self.script).push_back(Ok(text.into()));
        self
    }

    /// Queues a failure.
    #[must_use]
    pub fn with_failure(self, error: Error) -> Self {
        lock(&self.script).push_back(Err(error));
        self
    }

    /// Sets the reply used once the script is exhausted.
    #[must_use]
    pub fn with_default_reply(mut self, text: impl Into<String>) -> Self {
        self.default_reply = Some(text.into());
        self
    }

    /// Returns the prompts received so far, in call order.
    #[must_use]
    pub fn calls(&self) -> Vec<String> {
        lock(&self.calls).clone()
    }

    /// Returns the number of calls made.
    #[must_use]
    pub fn call_count(&self) -> usize {
        lock(&self.calls).len()
    }

    /// Returns the parameters received so far, in call order.
    #[must_use]
    pub fn received_params(&self) -> Vec<GenerationParams> {
        lock(&self.params_seen).clone()
    }
}

#[async_trait]
impl TextProvider for MockProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn generate(&self, prompt: &str, params: &GenerationParams) -> Result<ProviderReply> {
        lock(&self.calls).push(prompt.to_owned());
        lock(&self.params_seen).push(params.clone());

        let scripted = lock(&self.script).pop_front();
        let text = match scripted {
            Some(Ok(text)) => text,
            Some(Err(error)) => return Err(error),
            None => self
                .default_reply
                .clone()
                .unwrap_or_else(|| format!("mock reply for: {prompt}")),
        };

        Ok(ProviderReply {
            text,
            model: self.model.clone(),
            tokens_used: Some(42),
            latency_ms: MOCK_LATENCY_MS,
        })
    }
}
