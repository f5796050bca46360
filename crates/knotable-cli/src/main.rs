//! Knotable CLI - campaign content generation from the command line.

use std::sync::Arc;

use anyhow::{Context as _, Result};
use clap::Parser as _;
use knotable_content::{
    BloomLevel, CampaignBrief, ContentGenerator, Generated, ObjectiveBrief, QuizBrief,
    ResourceBrief,
};
use knotable_core::KnotableConfig;
use knotable_routing::{GenerationPolicy, ProviderRegistry};
use serde::Serialize;
use tracing_subscriber::{EnvFilter, fmt};

use cli::{Cli, Command};

mod cli;

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let config = load_config(&cli)?;

    let registry = Arc::new(
        ProviderRegistry::from_config(&config)
            .context("failed to initialize provider registry")?,
    );

    if matches!(cli.command, Command::Providers) {
        return print_providers(&registry);
    }

    let generator = ContentGenerator::new(GenerationPolicy::new(registry))
        .with_defaults(config.generation.params());
    let preference = cli.preference();
    let overrides = cli.overrides();

    match cli.command {
        Command::Campaign {
            topic,
            audience,
            milestones,
        } => {
            let brief = CampaignBrief {
                topic,
                audience,
                milestone_count: milestones,
            };
            let generated = generator
                .campaign_outline(&brief, preference, overrides.as_ref())
                .await?;
            print_generated(&generated)
        }
        Command::Quiz {
            topic,
            bloom_level,
            questions,
        } => {
            let brief = QuizBrief {
                topic,
                bloom_level: parse_bloom(bloom_level)?,
                question_count: questions,
            };
            let generated = generator.quiz(&brief, preference, overrides.as_ref()).await?;
            print_generated(&generated)
        }
        Command::Objective { topic, bloom_level } => {
            let brief = ObjectiveBrief {
                topic,
                bloom_level: parse_bloom(bloom_level)?,
            };
            let generated = generator
                .learning_objective(&brief, preference, overrides.as_ref())
                .await?;
            print_generated(&generated)
        }
        Command::Resources { topic, count } => {
            let brief = ResourceBrief {
                topic,
                resource_count: count,
            };
            let generated = generator
                .resource_list(&brief, preference, overrides.as_ref())
                .await?;
            print_generated(&generated)
        }
        Command::Providers => Ok(()),
    }
}

/// Initializes tracing to stderr so stdout stays clean JSON.
fn init_tracing() {
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            "knotable_routing=info,knotable_content=info,knotable_cli=info".into()
        }))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Loads configuration from `--config` or the default location.
fn load_config(cli: &Cli) -> Result<KnotableConfig> {
    match &cli.config {
        Some(path) => KnotableConfig::load_from_file(path)
            .with_context(|| format!("failed to load config from {}", path.display())),
        None => KnotableConfig::load_or_create()
            .context("failed to load config from ~/.knotable/config.toml"),
    }
}

/// Converts a numeric tier from the command line into a Bloom level.
fn parse_bloom(tier: u8) -> Result<BloomLevel> {
    BloomLevel::try_from(tier).map_err(|message| anyhow::anyhow!(message))
}

/// Prints the parsed value and a routing summary.
fn print_generated<T: Serialize>(generated: &Generated<T>) -> Result<()> {
    let json = serde_json::to_string_pretty(&generated.value)?;
    #[allow(clippy::print_stdout, reason = "Generated content output")]
    {
        println!("{json}");
    }
    tracing::info!(
        provider = generated.outcome.provider,
        model = generated.outcome.model,
        tokens = generated.outcome.tokens_used,
        cost = generated.outcome.estimated_cost,
        elapsed_ms = generated.outcome.elapsed_ms,
        "generation complete"
    );
    Ok(())
}

/// Prints the provider roster with enablement status.
fn print_providers(registry: &ProviderRegistry) -> Result<()> {
    let json = serde_json::to_string_pretty(registry.descriptors())?;
    #[allow(clippy::print_stdout, reason = "Provider roster output")]
    {
        println!("{json}");
    }
    Ok(())
}
