//! Core types and traits for the Knotable content-generation service.
//!
//! This crate provides the error taxonomy, request/response types, the
//! provider trait, and configuration loading shared by the provider
//! adapters, the routing policy, and the content facade.

/// Configuration loading and provider enablement.
pub mod config;
/// Error types and result definitions.
pub mod error;
/// Trait definition for text-generation providers.
pub mod traits;
/// Request, parameter, and result types for generation calls.
pub mod types;

pub use config::{GenerationDefaults, KnotableConfig, ProviderSettings};
pub use error::{Error, ProviderFailure, Result};
pub use traits::TextProvider;
pub use types::{GenerationParams, GenerationRequest, GenerationResult, ProviderPreference, ProviderReply};
