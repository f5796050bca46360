use core::result::Result as CoreResult;

use serde_json::Error as SerdeJsonError;
use thiserror::Error;

/// Result type for core operations.
pub type Result<T> = CoreResult<T, Error>;

/// Errors that can occur while generating content.
///
/// The four adapter-level kinds (`InvalidCredentials`, `QuotaExceeded`,
/// `ModelNotFound`, `NetworkOrTimeout`) are caught by the routing policy and
/// converted into a fallback attempt; callers only ever see them embedded in
/// [`Error::AllProvidersFailed`]. The remaining kinds are fatal for the call
/// and propagate unmodified.
#[derive(Debug, Error)]
pub enum Error {
    /// Vendor rejected the request's credentials.
    #[error("{provider}: invalid credentials: {detail}")]
    InvalidCredentials {
        /// Provider that rejected the request.
        provider: String,
        /// Vendor-reported detail.
        detail: String,
    },

    /// Vendor reported quota or rate-limit exhaustion.
    #[error("{provider}: quota exceeded: {detail}")]
    QuotaExceeded {
        /// Provider that reported exhaustion.
        provider: String,
        /// Vendor-reported detail.
        detail: String,
    },

    /// Requested model is unknown to the vendor.
    #[error("{provider}: model not found: {model}")]
    ModelNotFound {
        /// Provider that was asked for the model.
        provider: String,
        /// Model identifier the vendor did not recognize.
        model: String,
    },

    /// Transport-level failure or request timeout.
    #[error("{provider}: network or timeout failure: {detail}")]
    NetworkOrTimeout {
        /// Provider the request was sent to.
        provider: String,
        /// Transport error detail.
        detail: String,
    },

    /// Generated text contained no parseable JSON object.
    #[error("malformed generation response: no parseable JSON object in output")]
    MalformedResponse {
        /// Raw text returned by the provider, kept for diagnosis.
        raw: String,
    },

    /// No provider is enabled; nothing was attempted.
    #[error("no providers available for generation")]
    NoProvidersAvailable,

    /// Every attempted provider failed.
    #[error("all providers failed: {}", summarize(.0))]
    AllProvidersFailed(
        /// Per-provider failures in attempt order.
        Vec<ProviderFailure>,
    ),

    /// Name does not match any configured provider.
    #[error("unknown provider: {0}")]
    UnknownProvider(String),

    /// Configuration is invalid or missing.
    #[error("configuration error: {0}")]
    Config(String),

    /// Required API key was not found.
    #[error("API key not found: {0}")]
    MissingApiKey(String),

    /// JSON serialization or deserialization failed.
    #[error("JSON serialization error: {0}")]
    Json(#[from] SerdeJsonError),

    /// A general error not covered by other variants.
    #[error("{0}")]
    Other(String),
}

/// One provider's failure within an [`Error::AllProvidersFailed`].
#[derive(Debug, Error)]
#[error("{provider}: {error}")]
pub struct ProviderFailure {
    /// Registry name of the provider that failed.
    pub provider: String,
    /// The underlying adapter error.
    #[source]
    pub error: Box<Error>,
}

impl ProviderFailure {
    /// Creates a failure record for the given provider.
    pub fn new(provider: impl Into<String>, error: Error) -> Self {
        Self {
            provider: provider.into(),
            error: Box::new(error),
        }
    }
}

/// Joins per-provider failure messages for display.
fn summarize(failures: &[ProviderFailure]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl Error {
    /// Determines whether retrying with a different provider may succeed.
    ///
    /// True exactly for the adapter-level kinds. Classification does not
    /// change the single-fallback decision; it exists for observability.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::InvalidCredentials { .. }
                | Self::QuotaExceeded { .. }
                | Self::ModelNotFound { .. }
                | Self::NetworkOrTimeout { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value as JsonValue, from_str};

    #[test]
    fn test_error_display() {
        let error1 = Error::QuotaExceeded {
            provider: "groq".to_owned(),
            detail: "rate limited".to_owned(),
        };
        assert_eq!(error1.to_string(), "groq: quota exceeded: rate limited");

        let error2 = Error::UnknownProvider("mistral".to_owned());
        assert_eq!(error2.to_string(), "unknown provider: mistral");

        let error3 = Error::MissingApiKey("GROQ_API_KEY".to_owned());
        assert_eq!(error3.to_string(), "API key not found: GROQ_API_KEY");
    }

    #[test]
    fn test_all_providers_failed_carries_both_messages() {
        let failures = vec![
            ProviderFailure::new(
                "groq",
                Error::QuotaExceeded {
                    provider: "groq".to_owned(),
                    detail: "out of tokens".to_owned(),
                },
            ),
            ProviderFailure::new(
                "gemini",
                Error::NetworkOrTimeout {
                    provider: "gemini".to_owned(),
                    detail: "connection reset".to_owned(),
                },
            ),
        ];
        let error = Error::AllProvidersFailed(failures);
        let message = error.to_string();
        assert!(message.contains("out of tokens"));
        assert!(message.contains("connection reset"));
    }

    #[test]
    fn test_error_is_retryable() {
        let retryable = Error::NetworkOrTimeout {
            provider: "openai".to_owned(),
            detail: "timed out".to_owned(),
        };
        assert!(retryable.is_retryable());

        let credentials = Error::InvalidCredentials {
            provider: "claude".to_owned(),
            detail: "bad key".to_owned(),
        };
        assert!(credentials.is_retryable());

        assert!(!Error::NoProvidersAvailable.is_retryable());
        assert!(!Error::UnknownProvider("x".to_owned()).is_retryable());
        assert!(
            !Error::MalformedResponse {
                raw: "prose".to_owned()
            }
            .is_retryable()
        );
    }

    #[test]
    fn test_error_from_json() {
        let json_error = from_str::<JsonValue>("invalid json").unwrap_err();
        let error: Error = json_error.into();
        assert!(matches!(error, Error::Json(_)));
    }
}
