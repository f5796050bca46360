//! Deterministic prompt templates for campaign content.
//!
//! Campaign authors can inspect and reproduce the exact prompt that was
//! sent, so every template must be a pure function of its brief:
//! identical inputs yield byte-identical prompt strings. No timestamps,
//! no randomness.

use crate::bloom::BloomLevel;

/// Inputs for a campaign outline prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CampaignBrief {
    /// Subject the campaign teaches.
    pub topic: String,
    /// Who the campaign is for.
    pub audience: String,
    /// Number of milestones to generate.
    pub milestone_count: u8,
}

/// Inputs for a quiz prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizBrief {
    /// Subject the quiz covers.
    pub topic: String,
    /// Bloom tier the questions should target.
    pub bloom_level: BloomLevel,
    /// Number of questions to generate.
    pub question_count: u8,
}

/// Inputs for a learning-objective prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectiveBrief {
    /// Subject the objective addresses.
    pub topic: String,
    /// Bloom tier the objective should target.
    pub bloom_level: BloomLevel,
}

/// Inputs for a resource-list prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceBrief {
    /// Subject to find resources for.
    pub topic: String,
    /// Number of resources to suggest.
    pub resource_count: u8,
}

/// Renders the Bloom ladder section shared by several templates.
fn bloom_ladder() -> String {
    BloomLevel::ALL
        .iter()
        .map(|level| format!("{}. {}", level.tier(), level.label()))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Builds the campaign outline prompt.
#[must_use]
pub fn campaign_prompt(brief: &CampaignBrief) -> String {
    format!(
        "You are designing a gamified learning campaign.\n\
         Topic: {topic}\n\
         Audience: {audience}\n\
         \n\
         Create exactly {count} milestones that climb Bloom's Taxonomy:\n\
         {ladder}\n\
         \n\
         Respond with a single JSON object, no surrounding commentary:\n\
         {{\"title\": string, \"description\": string, \"milestones\": \
         [{{\"title\": string, \"description\": string, \"bloom_level\": number, \"points\": number}}]}}",
        topic = brief.topic,
        audience = brief.audience,
        count = brief.milestone_count,
        ladder = bloom_ladder(),
    )
}

/// Builds the quiz prompt.
#[must_use]
pub fn quiz_prompt(brief: &QuizBrief) -> String {
    format!(
        "Write a multiple-choice quiz about: {topic}\n\
         Target Bloom's Taxonomy level: {level}\n\
         Number of questions: {count}\n\
         Each question has exactly 4 choices and one correct answer.\n\
         \n\
         Respond with a single JSON object, no surrounding commentary:\n\
         {{\"questions\": [{{\"prompt\": string, \"choices\": [string], \
         \"answer_index\": number, \"explanation\": string}}]}}",
        topic = brief.topic,
        level = brief.bloom_level,
        count = brief.question_count,
    )
}

/// Builds the learning-objective prompt.
#[must_use]
pub fn objective_prompt(brief: &ObjectiveBrief) -> String {
    format!(
        "Write one measurable learning objective about: {topic}\n\
         Target Bloom's Taxonomy level: {level}\n\
         Use an action verb appropriate to that level.\n\
         \n\
         Respond with a single JSON object, no surrounding commentary:\n\
         {{\"statement\": string, \"bloom_level\": number}}",
        topic = brief.topic,
        level = brief.bloom_level,
    )
}

/// Builds the resource-list prompt.
#[must_use]
pub fn resource_prompt(brief: &ResourceBrief) -> String {
    format!(
        "Suggest {count} high-quality learning resources about: {topic}\n\
         Prefer a mix of articles, videos, courses, and books.\n\
         \n\
         Respond with a single JSON object, no surrounding commentary:\n\
         {{\"resources\": [{{\"title\": string, \"url\": string, \
         \"kind\": \"article\"|\"video\"|\"course\"|\"book\"}}]}}",
        count = brief.resource_count,
        topic = brief.topic,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn campaign_brief() -> CampaignBrief {
        CampaignBrief {
            topic: "Rust ownership".to_owned(),
            audience: "junior backend engineers".to_owned(),
            milestone_count: 5,
        }
    }

    #[test]
    fn test_campaign_prompt_is_deterministic() {
        let brief = campaign_brief();
        assert_eq!(campaign_prompt(&brief), campaign_prompt(&brief));
    }

    #[test]
    fn test_campaign_prompt_embeds_brief_fields() {
        let prompt = campaign_prompt(&campaign_brief());
        assert!(prompt.contains("Rust ownership"));
        assert!(prompt.contains("junior backend engineers"));
        assert!(prompt.contains("exactly 5 milestones"));
        assert!(prompt.contains("6. Create"), "Bloom ladder should be listed");
    }

    #[test]
    fn test_quiz_prompt_is_deterministic() {
        let brief = QuizBrief {
            topic: "HTTP caching".to_owned(),
            bloom_level: BloomLevel::Analyze,
            question_count: 3,
        };
        assert_eq!(quiz_prompt(&brief), quiz_prompt(&brief));
        assert!(quiz_prompt(&brief).contains("Analyze (4)"));
    }

    #[test]
    fn test_objective_prompt_mentions_level() {
        let brief = ObjectiveBrief {
            topic: "SQL joins".to_owned(),
            bloom_level: BloomLevel::Apply,
        };
        let prompt = objective_prompt(&brief);
        assert!(prompt.contains("SQL joins"));
        assert!(prompt.contains("Apply (3)"));
    }

    #[test]
    fn test_resource_prompt_mentions_count() {
        let brief = ResourceBrief {
            topic: "distributed consensus".to_owned(),
            resource_count: 7,
        };
        let prompt = resource_prompt(&brief);
        assert!(prompt.contains("Suggest 7"));
        assert!(prompt.contains("distributed consensus"));
    }
}
