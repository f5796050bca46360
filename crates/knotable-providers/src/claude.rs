use std::time::Instant;

use async_trait::async_trait;
use knotable_core::{Error, GenerationParams, ProviderReply, Result, TextProvider};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::classify::{classify_decode, classify_status, classify_transport};

/// Anthropic messages endpoint URL.
const CLAUDE_API_URL: &str = "https://api.anthropic.com/v1/messages";
/// API version header required by Anthropic.
const ANTHROPIC_VERSION: &str = "2023-06-01";
/// Default model for Claude.
const DEFAULT_MODEL: &str = "claude-3-5-haiku-latest";
/// Env var key for the Anthropic API key.
const ENV_ANTHROPIC_API_KEY: &str = "ANTHROPIC_API_KEY";
/// Registry name of this provider.
const PROVIDER_NAME: &str = "claude";

/// Anthropic Claude provider.
pub struct ClaudeProvider {
    /// HTTP client for API requests.
    client: Client,
    /// Anthropic API key.
    api_key: String,
    /// Model name to use.
    model: String,
}

impl ClaudeProvider {
    /// Creates a new `ClaudeProvider` with the given API key.
    ///
    /// # Errors
    /// Returns an error if the provided API key is empty.
    pub fn new(api_key: String) -> Result<Self> {
        if api_key.is_empty() {
            return Err(Error::MissingApiKey(ENV_ANTHROPIC_API_KEY.to_owned()));
        }

        Ok(Self {
            client: Client::default(),
            api_key,
            model: DEFAULT_MODEL.to_owned(),
        })
    }

    /// Sets the model to use for generation.
    #[must_use]
    pub fn with_model(mut self, model: String) -> Self {
        self.model = model;
        self
    }
}

/// Request payload sent to the Anthropic messages API.
#[derive(Debug, Serialize)]
struct ClaudeRequest {
    /// Model identifier.
    model: String,
    /// Maximum number of tokens allowed in the completion.
    max_tokens: u32,
    /// Sampling temperature controlling response randomness.
    temperature: f32,
    /// Conversation messages.
    messages: Vec<ClaudeMessage>,
}

/// Message delivered to the Anthropic API.
#[derive(Debug, Serialize)]
struct ClaudeMessage {
    /// Role of the message author.
    role: String,
    /// Textual content of the message.
    content: String,
}

/// Response payload returned by Anthropic.
#[derive(Debug, Deserialize)]
struct ClaudeResponse {
    /// Content blocks of the reply.
    #[serde(default)]
    content: Vec<ContentBlock>,
    /// Token accounting information for the request.
    usage: Option<ClaudeUsage>,
}

/// One content block of a Claude reply.
#[derive(Debug, Deserialize)]
struct ContentBlock {
    /// Text of the block, absent for non-text block types.
    #[serde(default)]
    text: String,
}

/// Token usage metrics for a Claude response.
#[derive(Debug, Deserialize)]
struct ClaudeUsage {
    /// Number of input tokens billed.
    #[serde(default)]
    input_tokens: u64,
    /// Number of output tokens billed.
    #[serde(default)]
    output_tokens: u64,
}

#[async_trait]
impl TextProvider for ClaudeProvider {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn generate(&self, prompt: &str, params: &GenerationParams) -> Result<ProviderReply> {
        let start = Instant::now();

        let request = ClaudeRequest {
            model: self.model.clone(),
            max_tokens: params.max_tokens,
            temperature: params.temperature,
            messages: vec![ClaudeMessage {
                role: "user".to_owned(),
                content: prompt.to_owned(),
            }],
        };

        let response = self
            .client
            .post(CLAUDE_API_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("Content-Type", "application/json")
            .timeout(params.timeout)
            .json(&request)
            .send()
            .await
            .map_err(|err| classify_transport(PROVIDER_NAME, &err))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(classify_status(PROVIDER_NAME, &self.model, status, error_text));
        }

        let api_response: ClaudeResponse = response
            .json()
            .await
            .map_err(|err| classify_decode(PROVIDER_NAME, &err))?;

        let text = api_response
            .content
            .iter()
            .map(|block| block.text.as_str())
            .collect::<String>();

        let tokens_used = api_response
            .usage
            .map(|usage| usage.input_tokens + usage.output_tokens);

        Ok(ProviderReply {
            text,
            model: self.model.clone(),
            tokens_used,
            latency_ms: start.elapsed().as_millis() as u64,
        })
    }
}
