use std::time::Instant;

use async_trait::async_trait;
use knotable_core::{Error, GenerationParams, ProviderReply, Result, TextProvider};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::classify::{classify_decode, classify_status, classify_transport};

/// Gemini API base URL.
const GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";
/// Default model for Gemini.
const DEFAULT_MODEL: &str = "gemini-2.0-flash";
/// Env var key for the Gemini API key.
const ENV_GEMINI_API_KEY: &str = "GEMINI_API_KEY";
/// Registry name of this provider.
const PROVIDER_NAME: &str = "gemini";

/// Google Gemini provider.
pub struct GeminiProvider {
    /// HTTP client for API requests.
    client: Client,
    /// Gemini API key.
    api_key: String,
    /// Model name to use.
    model: String,
}

impl GeminiProvider {
    /// Creates a new `GeminiProvider` with the given API key.
    ///
    /// # Errors
    /// Returns an error if the provided API key is empty.
    pub fn new(api_key: String) -> Result<Self> {
        if api_key.is_empty() {
            return Err(Error::MissingApiKey(ENV_GEMINI_API_KEY.to_owned()));
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

/// Request payload sent to the Gemini `generateContent` endpoint.
#[derive(Debug, Serialize)]
struct GeminiRequest {
    /// Conversation turns; a single user turn for our use.
    contents: Vec<Content>,
    /// Sampling configuration for the request.
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

/// A single conversation turn.
#[derive(Debug, Serialize)]
struct Content {
    /// Text parts of the turn.
    parts: Vec<Part>,
}

/// One text fragment inside a turn.
#[derive(Debug, Serialize, Deserialize, Default)]
struct Part {
    /// Text content.
    #[serde(default)]
    text: String,
}

/// Sampling configuration for Gemini.
#[derive(Debug, Serialize)]
struct GenerationConfig {
    /// Sampling temperature.
    temperature: f32,
    /// Maximum completion tokens.
    #[serde(rename = "maxOutputTokens")]
    max_output_tokens: u32,
}

/// Response payload returned by Gemini.
#[derive(Debug, Deserialize)]
struct GeminiResponse {
    /// Candidate completions; may be empty when everything was filtered.
    #[serde(default)]
    candidates: Vec<Candidate>,
    /// Token accounting, when reported.
    #[serde(rename = "usageMetadata")]
    usage_metadata: Option<UsageMetadata>,
}

/// One candidate completion.
#[derive(Debug, Deserialize)]
struct Candidate {
    /// Generated content for the candidate.
    content: CandidateContent,
}

/// Content block of a candidate.
#[derive(Debug, Deserialize)]
struct CandidateContent {
    /// Text parts of the candidate.
    #[serde(default)]
    parts: Vec<Part>,
}

/// Token usage metrics for a Gemini response.
#[derive(Debug, Deserialize)]
struct UsageMetadata {
    /// Total tokens billed for the request.
    #[serde(rename = "totalTokenCount", default)]
    total_token_count: u64,
}

#[async_trait]
impl TextProvider for GeminiProvider {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn generate(&self, prompt: &str, params: &GenerationParams) -> Result<ProviderReply> {
        let start = Instant::now();

        let request = GeminiRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_owned(),
                }],
            }],
            generation_config: GenerationConfig {
                temperature: params.temperature,
                max_output_tokens: params.max_tokens,
            },
        };

        let url = format!(
            "{GEMINI_API_URL}/{}:generateContent?key={}",
            self.model, self.api_key
        );

        let response = self
            .client
            .post(&url)
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

        let api_response: GeminiResponse = response
            .json()
            .await
            .map_err(|err| classify_decode(PROVIDER_NAME, &err))?;

        // An empty candidate list is a valid (empty) reply, not an error.
        let text = api_response.candidates.first().map_or_else(String::new, |candidate| {
            candidate
                .content
                .parts
                .iter()
                .map(|part| part.text.as_str())
                .collect::<String>()
        });

        let tokens_used = api_response
            .usage_metadata
            .map(|usage| usage.total_token_count);

        Ok(ProviderReply {
            text,
            model: self.model.clone(),
            tokens_used,
            latency_ms: start.elapsed().as_millis() as u64,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_with_empty_api_key() {
        let result = GeminiProvider::new(String::new());
        assert!(result.is_err(), "Empty API key should return an error");

        if let Err(err) = result {
            assert!(
                matches!(err, Error::MissingApiKey(_)),
                "Should be a MissingApiKey error"
            );
        }
    }

    #[test]
    fn test_provider_name_and_default_model() {
        let result = GeminiProvider::new("test_key".to_owned());
        assert!(result.is_ok());
        if let Ok(provider) = result {
            assert_eq!(provider.name(), "gemini");
            assert_eq!(provider.model(), DEFAULT_MODEL);
        }
    }

    #[test]
    fn test_with_model() {
        let result = GeminiProvider::new("test_key".to_owned());
        assert!(result.is_ok());
        if let Ok(provider) = result {
            let provider = provider.with_model("gemini-2.5-pro".to_owned());
            assert_eq!(provider.model(), "gemini-2.5-pro");
        }
    }

    #[test]
    fn test_empty_candidate_list_yields_empty_text() {
        let payload = r#"{"usageMetadata": {"totalTokenCount": 12}}"#;
        let response: GeminiResponse = match serde_json::from_str(payload) {
            Ok(value) => value,
            Err(error) => panic!("response should parse: {error}"),
        };
        assert!(response.candidates.is_empty());
        assert_eq!(
            response.usage_metadata.map(|usage| usage.total_token_count),
            Some(12)
        );
    }
}
