use async_trait::async_trait;

use crate::{GenerationParams, ProviderReply, Result};

/// Trait for vendor adapters that can turn a prompt into text.
///
/// An implementation performs exactly one request/response round trip per
/// [`TextProvider::generate`] call. Retry across providers belongs to the
/// routing policy, never to the adapter.
#[async_trait]
pub trait TextProvider: Send + Sync {
    /// Returns the registry name of this provider.
    fn name(&self) -> &str;

    /// Returns the model identifier this adapter will call.
    fn model(&self) -> &str;

    /// Generates text for the given prompt.
    ///
    /// Implementations must honor `params.timeout` and classify failures
    /// into the adapter-level error kinds rather than passing vendor
    /// exceptions through opaquely.
    ///
    /// # Errors
    ///
    /// Returns an adapter-level error when the vendor call fails, times
    /// out, or reports invalid credentials, quota exhaustion, or an unknown
    /// model.
    async fn generate(&self, prompt: &str, params: &GenerationParams) -> Result<ProviderReply>;
}
