//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use knotable_core::ProviderPreference;
use knotable_routing::DisabledOverrides;

/// Knotable content generator: campaign outlines, quizzes, learning
/// objectives, and resource lists via multi-provider LLM routing.
#[derive(Debug, Parser)]
#[command(name = "knotable", version, about)]
pub struct Cli {
    /// Config file path. Defaults to `~/.knotable/config.toml`,
    /// created on first run.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Provider to use instead of auto selection, e.g. `groq`.
    #[arg(long, global = true)]
    pub provider: Option<String>,

    /// Disable a provider for this invocation only. Repeatable.
    #[arg(long = "disable", global = true, value_name = "PROVIDER")]
    pub disabled: Vec<String>,

    /// What to generate.
    #[command(subcommand)]
    pub command: Command,
}

/// Generation subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate a campaign outline laddering Bloom's Taxonomy.
    Campaign {
        /// Subject the campaign teaches.
        #[arg(long)]
        topic: String,
        /// Who the campaign is for.
        #[arg(long, default_value = "motivated self-learners")]
        audience: String,
        /// Number of milestones to generate.
        #[arg(long, default_value_t = 5)]
        milestones: u8,
    },
    /// Generate a multiple-choice quiz.
    Quiz {
        /// Subject the quiz covers.
        #[arg(long)]
        topic: String,
        /// Bloom tier to target, 1 through 6.
        #[arg(long, default_value_t = 2)]
        bloom_level: u8,
        /// Number of questions to generate.
        #[arg(long, default_value_t = 5)]
        questions: u8,
    },
    /// Generate one measurable learning objective.
    Objective {
        /// Subject the objective addresses.
        #[arg(long)]
        topic: String,
        /// Bloom tier to target, 1 through 6.
        #[arg(long, default_value_t = 3)]
        bloom_level: u8,
    },
    /// Suggest learning resources for a topic.
    Resources {
        /// Subject to find resources for.
        #[arg(long)]
        topic: String,
        /// Number of resources to suggest.
        #[arg(long, default_value_t = 5)]
        count: u8,
    },
    /// List configured providers and their status.
    Providers,
}

impl Cli {
    /// Provider preference derived from `--provider`.
    #[must_use]
    pub fn preference(&self) -> ProviderPreference {
        self.provider
            .clone()
            .map_or(ProviderPreference::Auto, ProviderPreference::Named)
    }

    /// Per-request disable overrides derived from `--disable` flags.
    #[must_use]
    pub fn overrides(&self) -> Option<DisabledOverrides> {
        if self.disabled.is_empty() {
            return None;
        }
        Some(
            self.disabled
                .iter()
                .map(|name| (name.clone(), true))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_campaign_args_parse() {
        let cli = Cli::try_parse_from([
            "knotable",
            "campaign",
            "--topic",
            "rust ownership",
            "--milestones",
            "3",
        ]);
        assert!(cli.is_ok(), "campaign args should parse");
        if let Ok(parsed) = cli {
            assert!(matches!(
                parsed.command,
                Command::Campaign { milestones: 3, .. }
            ));
            assert!(matches!(parsed.preference(), ProviderPreference::Auto));
        }
    }

    #[test]
    fn test_provider_flag_becomes_named_preference() {
        let cli = Cli::try_parse_from([
            "knotable",
            "--provider",
            "claude",
            "objective",
            "--topic",
            "sql joins",
        ]);
        assert!(cli.is_ok());
        if let Ok(parsed) = cli {
            assert_eq!(
                parsed.preference(),
                ProviderPreference::Named("claude".to_owned())
            );
        }
    }

    #[test]
    fn test_disable_flags_collect_into_overrides() {
        let cli = Cli::try_parse_from([
            "knotable",
            "--disable",
            "groq",
            "--disable",
            "gemini",
            "providers",
        ]);
        assert!(cli.is_ok());
        if let Ok(parsed) = cli {
            let overrides = parsed.overrides();
            assert!(overrides.is_some());
            if let Some(map) = overrides {
                assert_eq!(map.get("groq"), Some(&true));
                assert_eq!(map.get("gemini"), Some(&true));
            }
        }
    }

    #[test]
    fn test_no_disable_flags_is_none() {
        let cli = Cli::try_parse_from(["knotable", "providers"]);
        assert!(cli.is_ok());
        if let Ok(parsed) = cli {
            assert!(parsed.overrides().is_none());
        }
    }
}
