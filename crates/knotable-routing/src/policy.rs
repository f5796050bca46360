//! Selection and fallback policy for generation requests.
//!
//! Each call is independent: select one enabled provider, invoke it, and
//! on failure retry exactly once against the first other enabled provider
//! in configuration order. The single bounded fallback keeps worst-case
//! latency at roughly two provider calls even when several vendors are
//! degraded at once; with three or more providers enabled, only two
//! attempts are ever made. No state is carried across calls.

use std::sync::Arc;

use knotable_core::{
    Error, GenerationRequest, GenerationResult, ProviderFailure, ProviderPreference, Result,
};

use crate::registry::{DisabledOverrides, ProviderDescriptor, ProviderRegistry};

/// Routes generation requests across the registry's enabled providers.
pub struct GenerationPolicy {
    /// Registry of descriptors and adapter instances.
    registry: Arc<ProviderRegistry>,
}

impl GenerationPolicy {
    /// Creates a policy over the given registry.
    #[must_use]
    pub fn new(registry: Arc<ProviderRegistry>) -> Self {
        Self { registry }
    }

    /// The underlying registry.
    #[must_use]
    pub fn registry(&self) -> &Arc<ProviderRegistry> {
        &self.registry
    }

    /// Resolves which provider a request should be routed to first.
    ///
    /// A specific name must be configured; if it is configured but
    /// currently disabled, selection falls back to the auto priority order
    /// rather than failing the request. Auto picks the first enabled
    /// provider in priority order.
    ///
    /// # Errors
    /// Returns [`Error::NoProvidersAvailable`] when nothing is enabled and
    /// [`Error::UnknownProvider`] for names that are not configured at all.
    pub fn select_provider(
        &self,
        preference: &ProviderPreference,
        overrides: Option<&DisabledOverrides>,
    ) -> Result<&ProviderDescriptor> {
        let enabled = self.registry.enabled_providers(overrides);
        if enabled.is_empty() {
            return Err(Error::NoProvidersAvailable);
        }

        if let ProviderPreference::Named(name) = preference {
            let descriptor = self.registry.describe(name)?;
            if enabled.iter().any(|candidate| candidate.name == descriptor.name) {
                return Ok(descriptor);
            }
            tracing::debug!(
                provider = %name,
                "requested provider is disabled, falling back to auto selection"
            );
        }

        for name in self.registry.priority() {
            if let Some(descriptor) = enabled.iter().find(|candidate| &candidate.name == name) {
                return Ok(descriptor);
            }
        }

        // Enabled providers outside the priority list still count.
        Ok(enabled[0])
    }

    /// Generates content for the request, with a single bounded fallback.
    ///
    /// # Errors
    /// Returns [`Error::NoProvidersAvailable`] or
    /// [`Error::UnknownProvider`] from selection, and
    /// [`Error::AllProvidersFailed`] carrying every attempt's error when
    /// both the primary and the fallback fail (or the primary fails with no
    /// fallback candidate).
    pub async fn generate(
        &self,
        request: &GenerationRequest,
        overrides: Option<&DisabledOverrides>,
    ) -> Result<GenerationResult> {
        let primary = self.select_provider(&request.preference, overrides)?;
        tracing::info!(
            provider = %primary.name,
            model = %primary.default_model,
            "routing generation request"
        );

        let primary_error = match self.attempt(primary, request).await {
            Ok(result) => return Ok(result),
            Err(error) => error,
        };
        tracing::warn!(
            provider = %primary.name,
            error = %primary_error,
            "primary provider failed, attempting fallback"
        );

        let enabled = self.registry.enabled_providers(overrides);
        let Some(fallback) = enabled
            .iter()
            .find(|candidate| candidate.name != primary.name)
            .copied()
        else {
            return Err(Error::AllProvidersFailed(vec![ProviderFailure::new(
                primary.name.as_str(),
                primary_error,
            )]));
        };

        match self.attempt(fallback, request).await {
            Ok(result) => {
                tracing::info!(provider = %fallback.name, "fallback provider succeeded");
                Ok(result)
            }
            Err(fallback_error) => Err(Error::AllProvidersFailed(vec![
                ProviderFailure::new(primary.name.as_str(), primary_error),
                ProviderFailure::new(fallback.name.as_str(), fallback_error),
            ])),
        }
    }

    /// One adapter round trip, tagged with provenance and cost.
    async fn attempt(
        &self,
        descriptor: &ProviderDescriptor,
        request: &GenerationRequest,
    ) -> Result<GenerationResult> {
        let adapter = self.registry.adapter(&descriptor.name)?;
        let reply = adapter.generate(&request.prompt, &request.params).await?;

        let estimated_cost = reply
            .tokens_used
            .map(|tokens| tokens as f64 * descriptor.cost_per_token);

        Ok(GenerationResult {
            content: reply.text,
            provider: descriptor.name.clone(),
            model: reply.model,
            tokens_used: reply.tokens_used,
            estimated_cost,
            elapsed_ms: reply.latency_ms,
        })
    }
}
