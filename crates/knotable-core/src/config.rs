//! Configuration for provider enablement, API keys, and generation defaults.
//!
//! Enablement is derived from this struct once, when the registry is
//! constructed. Nothing in the core reads process environment after that
//! point; per-request disable overrides are passed explicitly instead.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::{DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE, GenerationParams};
use core::time::Duration;

/// Registry names of the supported vendors, in configuration order.
pub const VENDOR_NAMES: [&str; 4] = ["gemini", "openai", "groq", "claude"];

/// Complete Knotable configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnotableConfig {
    /// Per-vendor settings.
    #[serde(default)]
    pub providers: ProviderTable,
    /// Default generation parameters.
    #[serde(default)]
    pub generation: GenerationDefaults,
    /// Priority order applied when a request asks for auto selection.
    /// Priority is data, not code; reorder here to change auto routing.
    #[serde(default = "default_priority")]
    pub priority: Vec<String>,
}

impl Default for KnotableConfig {
    fn default() -> Self {
        Self {
            providers: ProviderTable::default(),
            generation: GenerationDefaults::default(),
            priority: default_priority(),
        }
    }
}

/// Default auto-selection priority: fastest and cheapest first.
fn default_priority() -> Vec<String> {
    vec![
        "groq".to_owned(),
        "gemini".to_owned(),
        "openai".to_owned(),
        "claude".to_owned(),
    ]
}

/// Settings for every supported vendor.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProviderTable {
    /// Google Gemini settings.
    #[serde(default)]
    pub gemini: ProviderSettings,
    /// OpenAI settings.
    #[serde(default)]
    pub openai: ProviderSettings,
    /// Groq settings.
    #[serde(default)]
    pub groq: ProviderSettings,
    /// Anthropic Claude settings.
    #[serde(default)]
    pub claude: ProviderSettings,
}

/// Settings for a single vendor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderSettings {
    /// API key. Falls back to the vendor's environment variable when unset.
    pub api_key: Option<String>,
    /// Model override. Falls back to the vendor's default model when unset.
    pub model: Option<String>,
    /// Administrative enable flag for this vendor.
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            model: None,
            enabled: true,
        }
    }
}

/// Serde default for provider enablement.
fn default_true() -> bool {
    true
}

/// Default generation parameters applied when a request does not override.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationDefaults {
    /// Sampling temperature.
    pub temperature: f32,
    /// Completion token limit.
    pub max_tokens: u32,
    /// Per-call timeout in seconds.
    pub timeout_seconds: u64,
}

impl Default for GenerationDefaults {
    fn default() -> Self {
        Self {
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            timeout_seconds: 60,
        }
    }
}

impl GenerationDefaults {
    /// Converts the defaults into adapter parameters.
    pub fn params(&self) -> GenerationParams {
        GenerationParams {
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            timeout: Duration::from_secs(self.timeout_seconds),
        }
    }
}

impl KnotableConfig {
    /// Get the default config directory path (`~/.knotable`)
    ///
    /// # Errors
    /// Returns an error if the home directory cannot be determined
    pub fn config_dir() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| Error::Config("Could not determine home directory".to_owned()))?;
        Ok(home.join(".knotable"))
    }

    /// Get the default config file path (`~/.knotable/config.toml`)
    ///
    /// # Errors
    /// Returns an error if the home directory cannot be determined
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Load config from the default location (`~/.knotable/config.toml`)
    /// If the config doesn't exist, creates it with default values
    ///
    /// # Errors
    /// Returns an error if the config cannot be read or created
    pub fn load_or_create() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            Self::load_from_file(&config_path)
        } else {
            let config = Self::default();
            config.save_to_file(&config_path)?;
            Ok(config)
        }
    }

    /// Load config from a specific file
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|error| Error::Config(format!("Failed to read config: {error}")))?;
        let config: Self = toml::from_str(&contents)
            .map_err(|error| Error::Config(format!("Failed to parse config: {error}")))?;

        tracing::debug!(
            "Loaded config from {:?}: keys present for [{}]",
            path,
            VENDOR_NAMES
                .iter()
                .filter(|name| config.api_key(name).is_some())
                .copied()
                .collect::<Vec<_>>()
                .join(", ")
        );

        Ok(config)
    }

    /// Save config to a specific file
    ///
    /// # Errors
    /// Returns an error if the file cannot be written
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|error| {
                Error::Config(format!("Failed to create config directory: {error}"))
            })?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|error| Error::Config(format!("Failed to serialize config: {error}")))?;

        let header = "# Knotable Configuration File\n\
                      # This file is automatically generated on first run\n\
                      # Edit this file to customize your settings\n\n";

        fs::write(path, format!("{header}{contents}"))
            .map_err(|error| Error::Config(format!("Failed to write config: {error}")))?;

        Ok(())
    }

    /// Settings for the named vendor, if it is one we support.
    pub fn settings(&self, name: &str) -> Option<&ProviderSettings> {
        match name {
            "gemini" => Some(&self.providers.gemini),
            "openai" => Some(&self.providers.openai),
            "groq" => Some(&self.providers.groq),
            "claude" => Some(&self.providers.claude),
            _ => None,
        }
    }

    /// Get API key for a provider, checking config first, then environment variables
    pub fn api_key(&self, name: &str) -> Option<String> {
        let settings = self.settings(name)?;
        settings
            .api_key
            .clone()
            .or_else(|| env::var(api_key_env(name)?).ok())
    }

    /// Whether the vendor's kill-switch environment variable is set.
    pub fn kill_switch_set(name: &str) -> bool {
        kill_switch_env(name)
            .and_then(|var| env::var(var).ok())
            .is_some_and(|value| kill_switch_active(&value))
    }

    /// Whether the named vendor is enabled: administratively on, key
    /// present, and not killed by environment.
    pub fn is_enabled(&self, name: &str) -> bool {
        self.settings(name).is_some_and(|settings| settings.enabled)
            && self.api_key(name).is_some()
            && !Self::kill_switch_set(name)
    }
}

/// Environment variable holding the vendor's API key.
fn api_key_env(name: &str) -> Option<&'static str> {
    match name {
        "gemini" => Some("GEMINI_API_KEY"),
        "openai" => Some("OPENAI_API_KEY"),
        "groq" => Some("GROQ_API_KEY"),
        "claude" => Some("ANTHROPIC_API_KEY"),
        _ => None,
    }
}

/// Environment variable that disables the vendor entirely.
fn kill_switch_env(name: &str) -> Option<&'static str> {
    match name {
        "gemini" => Some("DISABLE_GEMINI"),
        "openai" => Some("DISABLE_OPENAI"),
        "groq" => Some("DISABLE_GROQ"),
        "claude" => Some("DISABLE_CLAUDE"),
        _ => None,
    }
}

/// A kill switch counts as active for any value except empty and `0`.
fn kill_switch_active(value: &str) -> bool {
    !value.is_empty() && value != "0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = KnotableConfig::default();
        assert!(config.providers.gemini.enabled);
        assert!(config.providers.claude.enabled);
        assert_eq!(config.priority, vec!["groq", "gemini", "openai", "claude"]);
        assert_eq!(config.generation.max_tokens, DEFAULT_MAX_TOKENS);
    }

    #[test]
    fn test_enabled_requires_api_key() {
        let config = KnotableConfig::default();
        // No key in config; enablement depends on environment, so only
        // assert the administratively-disabled case which is key-independent.
        let mut disabled = config;
        disabled.providers.groq.enabled = false;
        disabled.providers.groq.api_key = Some("key".to_owned());
        assert!(!disabled.is_enabled("groq"));

        let mut enabled = KnotableConfig::default();
        enabled.providers.groq.api_key = Some("key".to_owned());
        assert!(enabled.settings("groq").is_some());
        assert_eq!(enabled.api_key("groq"), Some("key".to_owned()));
    }

    #[test]
    fn test_settings_unknown_vendor() {
        let config = KnotableConfig::default();
        assert!(config.settings("mistral").is_none());
        assert!(config.api_key("mistral").is_none());
    }

    #[test]
    fn test_kill_switch_values() {
        assert!(kill_switch_active("1"));
        assert!(kill_switch_active("true"));
        assert!(!kill_switch_active("0"));
        assert!(!kill_switch_active(""));
    }

    #[test]
    fn test_config_loading_from_toml() {
        use std::io::Write as _;
        use tempfile::NamedTempFile;

        let toml_content = r#"
priority = ["gemini", "groq"]

[providers.gemini]
api_key = "test_gemini_key_123"
model = "gemini-2.0-flash"

[providers.groq]
api_key = "test_groq_key_456"
enabled = false

[generation]
temperature = 0.4
max_tokens = 1024
timeout_seconds = 30
"#;

        let mut temp_file = NamedTempFile::new().expect("Failed to create temp file");
        temp_file
            .write_all(toml_content.as_bytes())
            .expect("Failed to write to temp file");

        let config = KnotableConfig::load_from_file(temp_file.path())
            .expect("Failed to load config from temp file");

        assert_eq!(
            config.providers.gemini.api_key,
            Some("test_gemini_key_123".to_owned())
        );
        assert_eq!(
            config.providers.gemini.model,
            Some("gemini-2.0-flash".to_owned())
        );
        assert!(!config.providers.groq.enabled);
        assert!(config.providers.openai.enabled, "defaults apply to absent vendors");
        assert_eq!(config.generation.max_tokens, 1024);
        assert_eq!(config.priority, vec!["gemini", "groq"]);
    }

    #[test]
    fn test_invalid_toml_is_a_config_error() {
        use std::io::Write as _;
        use tempfile::NamedTempFile;

        let mut temp_file = NamedTempFile::new().expect("Failed to create temp file");
        temp_file
            .write_all(b"providers = not valid toml [")
            .expect("Failed to write to temp file");

        let result = KnotableConfig::load_from_file(temp_file.path());
        assert!(result.is_err());
        if let Err(error) = result {
            assert!(matches!(error, Error::Config(_)));
            assert!(error.to_string().contains("Failed to parse config"));
        }
    }

    #[test]
    fn test_save_and_reload_round_trip() {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = temp_dir.path().join("config.toml");

        let mut config = KnotableConfig::default();
        config.providers.claude.api_key = Some("sk-test".to_owned());
        config.generation.timeout_seconds = 15;

        config.save_to_file(&path).expect("Failed to save config");
        let reloaded = KnotableConfig::load_from_file(&path).expect("Failed to reload config");

        assert_eq!(reloaded.providers.claude.api_key, Some("sk-test".to_owned()));
        assert_eq!(reloaded.generation.timeout_seconds, 15);
    }
}
