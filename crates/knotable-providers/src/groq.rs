use std::time::Instant;

use async_trait::async_trait;
use knotable_core::{Error, GenerationParams, ProviderReply, Result, TextProvider};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::classify::{classify_decode, classify_status, classify_transport};

/// Groq API endpoint URL.
const GROQ_API_URL: &str = "https://api.groq.com/openai/v1/chat/completions";
/// Default model for Groq.
const DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";
/// Env var key for the Groq API key.
const ENV_GROQ_API_KEY: &str = "GROQ_API_KEY";
/// Registry name of this provider.
const PROVIDER_NAME: &str = "groq";

/// Groq API provider (fast inference, generous free tier).
pub struct GroqProvider {
    /// HTTP client for API requests.
    client: Client,
    /// Groq API key.
    api_key: String,
    /// Model name to use.
    model: String,
}

impl GroqProvider {
    /// Creates a new `GroqProvider` with the given API key.
    ///
    /// # Errors
    /// Returns an error if the provided API key is empty.
    pub fn new(api_key: String) -> Result<Self> {
        if api_key.is_empty() {
            return Err(Error::MissingApiKey(ENV_GROQ_API_KEY.to_owned()));
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

/// Request payload sent to the Groq chat completion API.
#[derive(Debug, Serialize)]
struct GroqRequest {
    /// Model identifier provided by the Groq service.
    model: String,
    /// Messages that form the conversation context for the request.
    messages: Vec<GroqMessage>,
    /// Sampling temperature controlling response randomness.
    temperature: f32,
    /// Maximum number of tokens allowed in the completion.
    max_tokens: u32,
}

/// Message delivered to the Groq API.
#[derive(Debug, Serialize)]
struct GroqMessage {
    /// Role of the message author.
    role: String,
    /// Textual content of the message.
    content: String,
}

/// Response payload returned by Groq.
#[derive(Debug, Deserialize)]
struct GroqResponse {
    /// List of candidate completions.
    #[serde(default)]
    choices: Vec<GroqChoice>,
    /// Token accounting information for the request.
    usage: Option<GroqUsage>,
}

/// A single completion choice returned by Groq.
#[derive(Debug, Deserialize)]
struct GroqChoice {
    /// Message generated for the choice.
    message: GroqResponseMessage,
}

/// Response message containing the generated text.
#[derive(Debug, Deserialize)]
struct GroqResponseMessage {
    /// Generated text content.
    content: String,
}

/// Token usage metrics for a Groq response.
#[derive(Debug, Deserialize)]
struct GroqUsage {
    /// Total tokens billed for the request.
    total_tokens: u64,
}

#[async_trait]
impl TextProvider for GroqProvider {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn generate(&self, prompt: &str, params: &GenerationParams) -> Result<ProviderReply> {
        let start = Instant::now();

        let request = GroqRequest {
            model: self.model.clone(),
            messages: vec![GroqMessage {
                role: "user".to_owned(),
                content: prompt.to_owned(),
            }],
            temperature: params.temperature,
            max_tokens: params.max_tokens,
        };

        let response = self
            .client
            .post(GROQ_API_URL)
            .header("Authorization", format!("Bearer {}", self.api_key))
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

        let api_response: GroqResponse = response
            .json()
            .await
            .map_err(|err| classify_decode(PROVIDER_NAME, &err))?;

        let text = api_response
            .choices
            .first()
            .map_or_else(String::new, |choice| choice.message.content.clone());

        Ok(ProviderReply {
            text,
            model: self.model.clone(),
            tokens_used: api_response.usage.map(|usage| usage.total_tokens),
            latency_ms: start.elapsed().as_millis() as u64,
        })
    }
}
