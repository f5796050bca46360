use std::time::Instant;

use async_trait::async_trait;
use knotable_core::{Error, GenerationParams, ProviderReply, Result, TextProvider};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::classify::{classify_decode, classify_status, classify_transport};

/// OpenAI chat completions endpoint URL.
const OPENAI_API_URL: &str = "https://api.openai.com/v1/chat/completions";
/// Default model for OpenAI.
const DEFAULT_MODEL: &str = "gpt-4o-mini";
/// Env var key for the OpenAI API key.
const ENV_OPENAI_API_KEY: &str = "OPENAI_API_KEY";
/// Registry name of this provider.
const PROVIDER_NAME: &str = "openai";

/// OpenAI chat completions provider.
pub struct OpenAiProvider {
    /// HTTP client for API requests.
    client: Client,
    /// OpenAI API key.
    api_key: String,
    /// Model name to use.
    model: String,
}

impl OpenAiProvider {
    /// Creates a new `OpenAiProvider` with the given API key.
    ///
    /// # Errors
    /// Returns an error if the provided API key is empty.
    pub fn new(api_key: String) -> Result<Self> {
        if api_key.is_empty() {
            return Err(Error::MissingApiKey(ENV_OPENAI_API_KEY.to_owned()));
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

/// Request payload sent to the OpenAI chat completion API.
#[derive(Debug, Serialize)]
struct OpenAiRequest {
    /// Model identifier.
    model: String,
    /// Conversation messages.
    messages: Vec<OpenAiMessage>,
    /// Sampling temperature controlling response randomness.
    temperature: f32,
    /// Maximum number of tokens allowed in the completion.
    max_tokens: u32,
}

/// Message delivered to the OpenAI API.
#[derive(Debug, Serialize)]
struct OpenAiMessage {
    /// Role of the message author.
    role: String,
    /// Textual content of the message.
    content: String,
}

/// Response payload returned by OpenAI.
#[derive(Debug, Deserialize)]
struct OpenAiResponse {
    /// List of candidate completions.
    #[serde(default)]
    choices: Vec<OpenAiChoice>,
    /// Token accounting information for the request.
    usage: Option<OpenAiUsage>,
}

/// A single completion choice.
#[derive(Debug, Deserialize)]
struct OpenAiChoice {
    /// Message generated for the choice.
    message: OpenAiResponseMessage,
}

/// Response message containing the generated text.
#[derive(Debug, Deserialize)]
struct OpenAiResponseMessage {
    /// Generated text content.
    content: String,
}

/// Token usage metrics for an OpenAI response.
#[derive(Debug, Deserialize)]
struct OpenAiUsage {
    /// Total tokens billed for the request.
    total_tokens: u64,
}

#[async_trait]
impl TextProvider for OpenAiProvider {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn generate(&self, prompt: &str, params: &GenerationParams) -> Result<ProviderReply> {
        let start = Instant::now();

        let request = OpenAiRequest {
            model: self.model.clone(),
            messages: vec![OpenAiMessage {
                role: "user".to_owned(),
                content: prompt.to_owned(),
            }],
            temperature: params.temperature,
            max_tokens: params.max_tokens,
        };

        let response = self
            .client
            .post(OPENAI_API_URL)
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

        let api_response: OpenAiResponse = response
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_with_empty_api_key() {
        let result = OpenAiProvider::new(String::new());
        assert!(result.is_err(), "Empty API key should return an error");
    }

    #[test]
    fn test_provider_name_and_default_model() {
        let result = OpenAiProvider::new("test_key".to_owned());
        assert!(result.is_ok());
        if let Ok(provider) = result {
            assert_eq!(provider.name(), "openai");
            assert_eq!(provider.model(), DEFAULT_MODEL);
        }
    }

    #[test]
    fn test_empty_choices_is_not_an_error() {
        let payload = r#"{"choices":[],"usage":{"total_tokens":3}}"#;
        let response: OpenAiResponse = match serde_json::from_str(payload) {
            Ok(value) => value,
            Err(error) => panic!("response should parse: {error}"),
        };
        assert!(response.choices.is_empty());
        assert_eq!(response.usage.map(|usage| usage.total_tokens), Some(3));
    }
}
