//! Provider registry and request routing for Knotable content generation.
//!
//! The registry derives immutable provider descriptors from configuration
//! at construction time; the policy selects one enabled provider per
//! request and falls back exactly once on failure.

/// Selection and fallback policy.
pub mod policy;
/// Provider descriptors and adapter registry.
pub mod registry;

pub use policy::GenerationPolicy;
pub use registry::{DisabledOverrides, ProviderDescriptor, ProviderRegistry};
