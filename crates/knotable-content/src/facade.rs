//! Facade entry points for campaign content generation.
//!
//! Each operation builds its deterministic prompt, routes the request
//! through the policy with that operation's fixed parameters, and parses
//! the embedded JSON object into a typed model.

use knotable_core::{
    GenerationParams, GenerationRequest, GenerationResult, ProviderPreference, Result,
};
use knotable_routing::{DisabledOverrides, GenerationPolicy};

use crate::json::parse_embedded;
use crate::models::{
    CampaignOutline, LearningObjective, Quiz, RawResourceList, ResourceList,
};
use crate::prompts::{
    CampaignBrief, ObjectiveBrief, QuizBrief, ResourceBrief, campaign_prompt, objective_prompt,
    quiz_prompt, resource_prompt,
};

/// Campaign outlines want some creative range.
const CAMPAIGN_TEMPERATURE: f32 = 0.7;
/// Token budget for a full campaign outline.
const CAMPAIGN_MAX_TOKENS: u32 = 2048;
/// Quizzes need tight, well-formed output.
const QUIZ_TEMPERATURE: f32 = 0.4;
/// Token budget for a quiz.
const QUIZ_MAX_TOKENS: u32 = 1024;
/// Objectives are short, single statements.
const OBJECTIVE_TEMPERATURE: f32 = 0.5;
/// Token budget for a learning objective.
const OBJECTIVE_MAX_TOKENS: u32 = 512;
/// Resource lists tolerate a little variety.
const RESOURCE_TEMPERATURE: f32 = 0.6;
/// Token budget for a resource list.
const RESOURCE_MAX_TOKENS: u32 = 1024;

/// A parsed generation outcome with its provenance.
#[derive(Debug, Clone)]
pub struct Generated<T> {
    /// The parsed, typed value.
    pub value: T,
    /// The exact prompt that was sent, for display and reproduction.
    pub prompt: String,
    /// Routing outcome: provider, model, tokens, cost, latency.
    pub outcome: GenerationResult,
}

/// Generates Knotable campaign content through the routing policy.
pub struct ContentGenerator {
    /// Selection and fallback policy handling every request.
    policy: GenerationPolicy,
    /// Baseline parameters from configuration. Each operation overrides
    /// temperature and token budget; the timeout is taken from here.
    defaults: GenerationParams,
}

impl ContentGenerator {
    /// Creates a generator over the given policy.
    #[must_use]
    pub fn new(policy: GenerationPolicy) -> Self {
        Self {
            policy,
            defaults: GenerationParams::default(),
        }
    }

    /// Sets the baseline parameters, usually `config.generation.params()`.
    #[must_use]
    pub fn with_defaults(mut self, defaults: GenerationParams) -> Self {
        self.defaults = defaults;
        self
    }

    /// The underlying policy.
    #[must_use]
    pub fn policy(&self) -> &GenerationPolicy {
        &self.policy
    }

    /// Generates a campaign outline laddering Bloom's Taxonomy.
    ///
    /// # Errors
    /// Propagates routing errors and returns a malformed-response error
    /// when the reply contains no parseable outline.
    pub async fn campaign_outline(
        &self,
        brief: &CampaignBrief,
        preference: ProviderPreference,
        overrides: Option<&DisabledOverrides>,
    ) -> Result<Generated<CampaignOutline>> {
        let prompt = campaign_prompt(brief);
        let request = GenerationRequest::new(prompt.clone())
            .with_temperature(CAMPAIGN_TEMPERATURE)
            .with_max_tokens(CAMPAIGN_MAX_TOKENS)
            .with_timeout(self.defaults.timeout)
            .with_preference(preference);

        let outcome = self.policy.generate(&request, overrides).await?;
        let value = parse_embedded(&outcome.content)?;
        Ok(Generated {
            value,
            prompt,
            outcome,
        })
    }

    /// Generates a multiple-choice quiz.
    ///
    /// # Errors
    /// Propagates routing errors and returns a malformed-response error
    /// when the reply contains no parseable quiz.
    pub async fn quiz(
        &self,
        brief: &QuizBrief,
        preference: ProviderPreference,
        overrides: Option<&DisabledOverrides>,
    ) -> Result<Generated<Quiz>> {
        let prompt = quiz_prompt(brief);
        let request = GenerationRequest::new(prompt.clone())
            .with_temperature(QUIZ_TEMPERATURE)
            .with_max_tokens(QUIZ_MAX_TOKENS)
            .with_timeout(self.defaults.timeout)
            .with_preference(preference);

        let outcome = self.policy.generate(&request, overrides).await?;
        let value = parse_embedded(&outcome.content)?;
        Ok(Generated {
            value,
            prompt,
            outcome,
        })
    }

    /// Generates a single measurable learning objective.
    ///
    /// # Errors
    /// Propagates routing errors and returns a malformed-response error
    /// when the reply contains no parseable objective.
    pub async fn learning_objective(
        &self,
        brief: &ObjectiveBrief,
        preference: ProviderPreference,
        overrides: Option<&DisabledOverrides>,
    ) -> Result<Generated<LearningObjective>> {
        let prompt = objective_prompt(brief);
        let request = GenerationRequest::new(prompt.clone())
            .with_temperature(OBJECTIVE_TEMPERATURE)
            .with_max_tokens(OBJECTIVE_MAX_TOKENS)
            .with_timeout(self.defaults.timeout)
            .with_preference(preference);

        let outcome = self.policy.generate(&request, overrides).await?;
        let value = parse_embedded(&outcome.content)?;
        Ok(Generated {
            value,
            prompt,
            outcome,
        })
    }

    /// Generates a list of learning resources, normalized to one shape.
    ///
    /// # Errors
    /// Propagates routing errors and returns a malformed-response error
    /// when the reply contains no parseable resource list.
    pub async fn resource_list(
        &self,
        brief: &ResourceBrief,
        preference: ProviderPreference,
        overrides: Option<&DisabledOverrides>,
    ) -> Result<Generated<ResourceList>> {
        let prompt = resource_prompt(brief);
        let request = GenerationRequest::new(prompt.clone())
            .with_temperature(RESOURCE_TEMPERATURE)
            .with_max_tokens(RESOURCE_MAX_TOKENS)
            .with_timeout(self.defaults.timeout)
            .with_preference(preference);

        let outcome = self.policy.generate(&request, overrides).await?;
        let raw: RawResourceList = parse_embedded(&outcome.content)?;
        Ok(Generated {
            value: ResourceList::from(raw),
            prompt,
            outcome,
        })
    }
}
