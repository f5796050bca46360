//! Maps vendor transport and HTTP failures onto the shared error taxonomy.
//!
//! Every adapter funnels its failures through here so the routing policy
//! receives one of the four adapter-level kinds instead of an opaque
//! vendor exception.

use knotable_core::Error;
use reqwest::{Error as ReqwestError, StatusCode};

/// Classifies a non-success HTTP status from a vendor endpoint.
pub(crate) fn classify_status(
    provider: &str,
    model: &str,
    status: StatusCode,
    body: String,
) -> Error {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Error::InvalidCredentials {
            provider: provider.to_owned(),
            detail: body,
        },
        StatusCode::TOO_MANY_REQUESTS | StatusCode::PAYMENT_REQUIRED => Error::QuotaExceeded {
            provider: provider.to_owned(),
            detail: body,
        },
        StatusCode::NOT_FOUND => Error::ModelNotFound {
            provider: provider.to_owned(),
            model: model.to_owned(),
        },
        _ => Error::NetworkOrTimeout {
            provider: provider.to_owned(),
            detail: format!("HTTP {status}: {body}"),
        },
    }
}

/// Classifies a transport-level `reqwest` failure, including timeouts.
pub(crate) fn classify_transport(provider: &str, error: &ReqwestError) -> Error {
    let detail = if error.is_timeout() {
        format!("request timed out: {error}")
    } else {
        error.to_string()
    };
    Error::NetworkOrTimeout {
        provider: provider.to_owned(),
        detail,
    }
}

/// Classifies a response body that could not be decoded as vendor JSON.
pub(crate) fn classify_decode(provider: &str, error: &ReqwestError) -> Error {
    Error::NetworkOrTimeout {
        provider: provider.to_owned(),
        detail: format!("failed to decode response body: {error}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credential_statuses() {
        let unauthorized = classify_status(
            "openai",
            "gpt-4o-mini",
            StatusCode::UNAUTHORIZED,
            "bad key".to_owned(),
        );
        assert!(matches!(unauthorized, Error::InvalidCredentials { .. }));

        let forbidden = classify_status(
            "openai",
            "gpt-4o-mini",
            StatusCode::FORBIDDEN,
            "no access".to_owned(),
        );
        assert!(matches!(forbidden, Error::InvalidCredentials { .. }));
    }

    #[test]
    fn test_quota_status() {
        let error = classify_status(
            "groq",
            "llama-3.3-70b-versatile",
            StatusCode::TOO_MANY_REQUESTS,
            "rate limited".to_owned(),
        );
        assert!(matches!(error, Error::QuotaExceeded { .. }));
        assert!(error.is_retryable());
    }

    #[test]
    fn test_model_not_found_status() {
        let error = classify_status(
            "gemini",
            "gemini-nonexistent",
            StatusCode::NOT_FOUND,
            "unknown model".to_owned(),
        );
        if let Error::ModelNotFound { provider, model } = error {
            assert_eq!(provider, "gemini");
            assert_eq!(model, "gemini-nonexistent");
        } else {
            panic!("expected ModelNotFound");
        }
    }

    #[test]
    fn test_server_error_maps_to_network() {
        let error = classify_status(
            "claude",
            "claude-3-5-haiku-latest",
            StatusCode::INTERNAL_SERVER_ERROR,
            "overloaded".to_owned(),
        );
        assert!(matches!(error, Error::NetworkOrTimeout { .. }));
    }
}
