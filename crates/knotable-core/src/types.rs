use core::time::Duration;

use serde::{Deserialize, Serialize};

/// Default sampling temperature for generation requests.
pub const DEFAULT_TEMPERATURE: f32 = 0.7;
/// Default completion token limit for generation requests.
pub const DEFAULT_MAX_TOKENS: u32 = 2048;
/// Default per-call timeout for vendor requests.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Which provider a caller wants a request routed to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderPreference {
    /// Pick the best enabled provider by priority order.
    #[default]
    Auto,
    /// Route to a specific provider by registry name.
    #[serde(untagged)]
    Named(String),
}

impl ProviderPreference {
    /// Creates a preference for a specific provider name.
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }
}

/// Tunable parameters for one vendor round trip.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationParams {
    /// Sampling temperature controlling response randomness.
    pub temperature: f32,
    /// Maximum number of tokens allowed in the completion.
    pub max_tokens: u32,
    /// Wall-clock budget for the vendor HTTP call. Adapters must surface a
    /// timeout error rather than hang past this.
    pub timeout: Duration,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// A single content-generation request. Created per call, never persisted.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    /// Prompt text sent verbatim to the selected provider.
    pub prompt: String,
    /// Generation parameters forwarded to the adapter.
    pub params: GenerationParams,
    /// Requested provider, or auto-selection.
    pub preference: ProviderPreference,
}

impl GenerationRequest {
    /// Creates a request with default parameters and auto provider selection.
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            params: GenerationParams::default(),
            preference: ProviderPreference::Auto,
        }
    }

    /// Sets the sampling temperature.
    #[must_use]
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.params.temperature = temperature;
        self
    }

    /// Sets the completion token limit.
    #[must_use]
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.params.max_tokens = max_tokens;
        self
    }

    /// Sets the per-call timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.params.timeout = timeout;
        self
    }

    /// Sets the provider preference.
    #[must_use]
    pub fn with_preference(mut self, preference: ProviderPreference) -> Self {
        self.preference = preference;
        self
    }
}

/// Normalized output of one adapter round trip.
#[derive(Debug, Clone)]
pub struct ProviderReply {
    /// Generated text. Empty when the vendor returned no candidates.
    pub text: String,
    /// Model that produced the text.
    pub model: String,
    /// Total tokens billed, when the vendor reports usage.
    pub tokens_used: Option<u64>,
    /// Wall-clock duration of the vendor call in milliseconds.
    pub latency_ms: u64,
}

/// Result of a routed generation call, tagged with provenance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationResult {
    /// Generated text content.
    pub content: String,
    /// Registry name of the provider that produced the content. Always an
    /// enabled provider at the time of the call.
    pub provider: String,
    /// Model identifier used for the call.
    pub model: String,
    /// Total tokens billed, when reported by the vendor.
    pub tokens_used: Option<u64>,
    /// `tokens_used * cost_per_token` for the provider used, when tokens
    /// were reported.
    pub estimated_cost: Option<f64>,
    /// Wall-clock duration of the successful vendor call in milliseconds,
    /// as measured by the adapter.
    pub elapsed_ms: u64,
}
