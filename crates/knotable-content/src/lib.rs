//! Content-generation facade for Knotable learning campaigns.
//!
//! Translates domain needs (campaign outlines, quizzes, learning
//! objectives, resource lists) into deterministic prompts, routes them
//! through the generation policy, and parses the JSON object embedded in
//! the reply into typed models.

/// Bloom's Taxonomy levels threaded through prompts.
pub mod bloom;
/// Facade entry points.
pub mod facade;
/// Balanced JSON object extraction from generated text.
pub mod json;
/// Typed models parsed from generated JSON.
pub mod models;
/// Deterministic prompt templates.
pub mod prompts;

pub use bloom::BloomLevel;
pub use facade::{ContentGenerator, Generated};
pub use json::{extract_json_object, parse_embedded};
pub use models::{
    CampaignOutline, DiscoveredResource, LearningObjective, MilestoneDraft, Quiz, QuizQuestion,
    ResourceKind, ResourceList,
};
pub use prompts::{CampaignBrief, ObjectiveBrief, QuizBrief, ResourceBrief};
