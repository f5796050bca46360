//! Provider registry: immutable descriptors plus adapter instances.
//!
//! Descriptors are derived from [`KnotableConfig`] once, when the registry
//! is constructed, and never mutated afterwards. Per-request disable
//! overrides (e.g. an admin-settings lookup) are passed into
//! [`ProviderRegistry::enabled_providers`] instead of being read from
//! global state, which keeps the registry testable.

use std::collections::HashMap;
use std::sync::Arc;

use knotable_core::config::VENDOR_NAMES;
use knotable_core::{Error, KnotableConfig, Result, TextProvider};
use knotable_providers::{ClaudeProvider, GeminiProvider, GroqProvider, OpenAiProvider};
use serde::Serialize;

/// Per-request disable overrides keyed by provider name; `true` disables.
pub type DisabledOverrides = HashMap<String, bool>;

/// Immutable description of one configured provider.
#[derive(Debug, Clone, Serialize)]
pub struct ProviderDescriptor {
    /// Registry name, e.g. `groq`.
    pub name: String,
    /// Human-readable vendor name.
    pub display_name: String,
    /// Models this adapter can be pointed at, in preference order.
    pub supported_models: Vec<String>,
    /// Model used when the configuration does not override it.
    pub default_model: String,
    /// Approximate blended cost per token in USD.
    pub cost_per_token: f64,
    /// Whether the provider was enabled at registry construction.
    pub enabled: bool,
}

/// Static vendor metadata backing the descriptors.
struct VendorInfo {
    /// Human-readable vendor name.
    display_name: &'static str,
    /// Known models, preferred first.
    models: &'static [&'static str],
    /// Approximate blended cost per token in USD.
    cost_per_token: f64,
}

/// Looks up static metadata for a supported vendor.
fn vendor_info(name: &str) -> Option<VendorInfo> {
    match name {
        "gemini" => Some(VendorInfo {
            display_name: "Google Gemini",
            models: &["gemini-2.0-flash", "gemini-2.5-pro", "gemini-1.5-flash"],
            cost_per_token: 0.000_000_075,
        }),
        "openai" => Some(VendorInfo {
            display_name: "OpenAI",
            models: &["gpt-4o-mini", "gpt-4o", "gpt-4.1-mini"],
            cost_per_token: 0.000_000_15,
        }),
        "groq" => Some(VendorInfo {
            display_name: "Groq",
            models: &["llama-3.3-70b-versatile", "llama-3.1-8b-instant"],
            cost_per_token: 0.000_000_059,
        }),
        "claude" => Some(VendorInfo {
            display_name: "Anthropic Claude",
            models: &["claude-3-5-haiku-latest", "claude-sonnet-4-20250514"],
            cost_per_token: 0.000_000_8,
        }),
        _ => None,
    }
}

/// Registry mapping provider names to descriptors and adapter instances.
///
/// Adapters are instantiated once during initialization and reused for all
/// requests.
pub struct ProviderRegistry {
    /// Descriptors in configuration order.
    descriptors: Vec<ProviderDescriptor>,
    /// Adapter instances for enabled providers.
    adapters: HashMap<String, Arc<dyn TextProvider>>,
    /// Auto-selection priority order.
    priority: Vec<String>,
}

impl ProviderRegistry {
    /// Builds the registry from configuration.
    ///
    /// Enablement is derived here, once: a provider is enabled when it is
    /// administratively on, has an API key, and is not killed by
    /// environment. Adapters are only constructed for enabled providers.
    ///
    /// # Errors
    /// Returns an error if an enabled provider's adapter cannot be built.
    pub fn from_config(config: &KnotableConfig) -> Result<Self> {
        let mut descriptors = Vec::new();
        let mut adapters: HashMap<String, Arc<dyn TextProvider>> = HashMap::new();

        for name in VENDOR_NAMES {
            let info = vendor_info(name)
                .ok_or_else(|| Error::UnknownProvider(name.to_owned()))?;
            let enabled = config.is_enabled(name);
            let model = config
                .settings(name)
                .and_then(|settings| settings.model.clone())
                .unwrap_or_else(|| info.models[0].to_owned());

            if enabled {
                let api_key = config
                    .api_key(name)
                    .ok_or_else(|| Error::MissingApiKey(name.to_owned()))?;
                adapters.insert(name.to_owned(), build_adapter(name, api_key, &model)?);
            }

            descriptors.push(ProviderDescriptor {
                name: name.to_owned(),
                display_name: info.display_name.to_owned(),
                supported_models: info.models.iter().map(|&model_id| model_id.to_owned()).collect(),
                default_model: model,
                cost_per_token: info.cost_per_token,
                enabled,
            });
        }

        tracing::debug!(
            enabled = ?descriptors
                .iter()
                .filter(|descriptor| descriptor.enabled)
                .map(|descriptor| descriptor.name.as_str())
                .collect::<Vec<_>>(),
            "provider registry initialized"
        );

        Ok(Self {
            descriptors,
            adapters,
            priority: config.priority.clone(),
        })
    }

    /// Creates an empty registry with the given priority order (testing).
    #[must_use]
    pub fn empty(priority: Vec<String>) -> Self {
        Self {
            descriptors: Vec::new(),
            adapters: HashMap::new(),
            priority,
        }
    }

    /// Registers a descriptor with its adapter (testing and injection).
    pub fn register(&mut self, descriptor: ProviderDescriptor, adapter: Arc<dyn TextProvider>) {
        self.adapters.insert(descriptor.name.clone(), adapter);
        self.descriptors.push(descriptor);
    }

    /// Descriptors of currently enabled providers, in configuration order.
    ///
    /// `overrides` carries per-request disables from an external
    /// admin-settings lookup; `true` disables the named provider for this
    /// call only.
    pub fn enabled_providers(&self, overrides: Option<&DisabledOverrides>) -> Vec<&ProviderDescriptor> {
        self.descriptors
            .iter()
            .filter(|descriptor| descriptor.enabled)
            .filter(|descriptor| {
                !overrides
                    .and_then(|map| map.get(&descriptor.name))
                    .copied()
                    .unwrap_or(false)
            })
            .collect()
    }

    /// Descriptor for the named provider.
    ///
    /// # Errors
    /// Returns [`Error::UnknownProvider`] if the name is not configured.
    pub fn describe(&self, name: &str) -> Result<&ProviderDescriptor> {
        self.descriptors
            .iter()
            .find(|descriptor| descriptor.name == name)
            .ok_or_else(|| Error::UnknownProvider(name.to_owned()))
    }

    /// Adapter instance for the named provider.
    ///
    /// # Errors
    /// Returns an error if no adapter is registered for the name, which
    /// happens for disabled or unknown providers.
    pub fn adapter(&self, name: &str) -> Result<Arc<dyn TextProvider>> {
        self.adapters.get(name).cloned().ok_or_else(|| {
            Error::Other(format!("no adapter registered for provider: {name}"))
        })
    }

    /// All descriptors, in configuration order.
    #[must_use]
    pub fn descriptors(&self) -> &[ProviderDescriptor] {
        &self.descriptors
    }

    /// Auto-selection priority order.
    #[must_use]
    pub fn priority(&self) -> &[String] {
        &self.priority
    }
}

/// Constructs the adapter for a vendor name.
fn build_adapter(name: &str, api_key: String, model: &str) -> Result<Arc<dyn TextProvider>> {
    let adapter: Arc<dyn TextProvider> = match name {
        "gemini" => Arc::new(GeminiProvider::new(api_key)?.with_model(model.to_owned())),
        "openai" => Arc::new(OpenAiProvider::new(api_key)?.with_model(model.to_owned())),
        "groq" => Arc::new(GroqProvider::new(api_key)?.with_model(model.to_owned())),
        "claude" => Arc::new(ClaudeProvider::new(api_key)?.with_model(model.to_owned())),
        _ => return Err(Error::UnknownProvider(name.to_owned())),
    };
    Ok(adapter)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_keys(names: &[&str]) -> KnotableConfig {
        let mut config = KnotableConfig::default();
        for &name in names {
            match name {
                "gemini" => config.providers.gemini.api_key = Some("key".to_owned()),
                "openai" => config.providers.openai.api_key = Some("key".to_owned()),
                "groq" => config.providers.groq.api_key = Some("key".to_owned()),
                "claude" => config.providers.claude.api_key = Some("key".to_owned()),
                _ => {}
            }
        }
        config
    }

    #[test]
    fn test_descriptors_cover_all_vendors_in_config_order() {
        let config = config_with_keys(&["gemini", "groq"]);
        let registry = match ProviderRegistry::from_config(&config) {
            Ok(registry) => registry,
            Err(error) => panic!("registry should build: {error}"),
        };

        let names: Vec<&str> = registry
            .descriptors()
            .iter()
            .map(|descriptor| descriptor.name.as_str())
            .collect();
        assert_eq!(names, vec!["gemini", "openai", "groq", "claude"]);
    }

    #[test]
    fn test_enabled_requires_key() {
        let config = config_with_keys(&["groq"]);
        let registry = match ProviderRegistry::from_config(&config) {
            Ok(registry) => registry,
            Err(error) => panic!("registry should build: {error}"),
        };

        let enabled = registry.enabled_providers(None);
        assert!(enabled.iter().any(|descriptor| descriptor.name == "groq"));
        // openai has no key in the config; it may still be enabled via the
        // process environment, so only assert the keyed provider here.
        assert!(registry.adapter("groq").is_ok());
    }

    #[test]
    fn test_describe_unknown_provider() {
        let config = KnotableConfig::default();
        let registry = match ProviderRegistry::from_config(&config) {
            Ok(registry) => registry,
            Err(error) => panic!("registry should build: {error}"),
        };

        let result = registry.describe("mistral");
        assert!(result.is_err());
        if let Err(error) = result {
            assert!(matches!(error, Error::UnknownProvider(_)));
        }
    }

    #[test]
    fn test_overrides_disable_per_request() {
        let config = config_with_keys(&["gemini", "groq"]);
        let registry = match ProviderRegistry::from_config(&config) {
            Ok(registry) => registry,
            Err(error) => panic!("registry should build: {error}"),
        };

        let mut overrides = DisabledOverrides::new();
        overrides.insert("groq".to_owned(), true);

        let enabled = registry.enabled_providers(Some(&overrides));
        assert!(!enabled.iter().any(|descriptor| descriptor.name == "groq"));

        // The registry itself is untouched; the next call without
        // overrides sees groq again.
        let enabled_again = registry.enabled_providers(None);
        assert!(enabled_again.iter().any(|descriptor| descriptor.name == "groq"));
    }

    #[test]
    fn test_model_override_flows_into_descriptor() {
        let mut config = config_with_keys(&["gemini"]);
        config.providers.gemini.model = Some("gemini-2.5-pro".to_owned());
        let registry = match ProviderRegistry::from_config(&config) {
            Ok(registry) => registry,
            Err(error) => panic!("registry should build: {error}"),
        };

        let descriptor = match registry.describe("gemini") {
            Ok(descriptor) => descriptor,
            Err(error) => panic!("gemini should be configured: {error}"),
        };
        assert_eq!(descriptor.default_model, "gemini-2.5-pro");
    }
}
