//! Typed models parsed from generated JSON.
//!
//! Vendors are inconsistent about resource shapes: sometimes an array of
//! plain strings, sometimes an array of objects. That variance is
//! normalized here, at the parse boundary, into one
//! [`DiscoveredResource`] shape; callers never see the raw variants.

use serde::{Deserialize, Serialize};

/// A generated campaign outline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CampaignOutline {
    /// Campaign title.
    pub title: String,
    /// Short pitch shown on the campaign card.
    pub description: String,
    /// Ordered milestones laddering up the Bloom tiers.
    pub milestones: Vec<MilestoneDraft>,
}

/// One generated milestone.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MilestoneDraft {
    /// Milestone title.
    pub title: String,
    /// What the learner does in this milestone.
    pub description: String,
    /// Bloom tier, 1 through 6.
    pub bloom_level: u8,
    /// Points awarded on completion.
    #[serde(default)]
    pub points: u32,
}

/// A generated quiz.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quiz {
    /// Questions in presentation order.
    pub questions: Vec<QuizQuestion>,
}

/// One multiple-choice quiz question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizQuestion {
    /// Question text.
    pub prompt: String,
    /// Answer choices in presentation order.
    pub choices: Vec<String>,
    /// Index into `choices` of the correct answer.
    pub answer_index: usize,
    /// Optional explanation shown after answering.
    #[serde(default)]
    pub explanation: Option<String>,
}

/// A generated learning objective.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LearningObjective {
    /// The objective statement, learner-facing.
    pub statement: String,
    /// Bloom tier the statement targets, 1 through 6.
    pub bloom_level: u8,
}

/// Category of a discovered learning resource.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    /// Written article or tutorial.
    Article,
    /// Video content.
    Video,
    /// Structured course.
    Course,
    /// Book or long-form text.
    Book,
    /// Anything else the model suggested.
    #[default]
    #[serde(other)]
    Other,
}

/// One learning resource, normalized from whatever shape the vendor used.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoveredResource {
    /// Resource title or free-text description.
    pub title: String,
    /// Link, when the model provided one.
    #[serde(default)]
    pub url: Option<String>,
    /// Resource category.
    #[serde(default)]
    pub kind: ResourceKind,
}

/// A normalized list of discovered resources.
#[derive(Debug, Clone, Serialize)]
pub struct ResourceList {
    /// Resources in suggestion order.
    pub resources: Vec<DiscoveredResource>,
}

/// Wire shape of a resource list: items may be strings or objects.
#[derive(Debug, Deserialize)]
pub(crate) struct RawResourceList {
    /// Raw items as returned by the model.
    resources: Vec<RawResource>,
}

/// Tagged-variant parse of one raw resource item.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum RawResource {
    /// Fully structured resource object.
    Detailed(DiscoveredResource),
    /// Bare string title.
    Text(String),
}

impl From<RawResource> for DiscoveredResource {
    fn from(raw: RawResource) -> Self {
        match raw {
            RawResource::Detailed(resource) => resource,
            RawResource::Text(title) => Self {
                title,
                url: None,
                kind: ResourceKind::Other,
            },
        }
    }
}

impl From<RawResourceList> for ResourceList {
    fn from(raw: RawResourceList) -> Self {
        Self {
            resources: raw.resources.into_iter().map(Into::into).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mixed_resource_shapes_normalize() {
        let payload = r#"{"resources": [
            "Plain string suggestion",
            {"title": "Intro video", "url": "https://example.com/v", "kind": "video"}
        ]}"#;
        let raw: RawResourceList = match serde_json::from_str(payload) {
            Ok(value) => value,
            Err(error) => panic!("raw list should parse: {error}"),
        };
        let list = ResourceList::from(raw);

        assert_eq!(list.resources.len(), 2);
        assert_eq!(list.resources[0].title, "Plain string suggestion");
        assert_eq!(list.resources[0].kind, ResourceKind::Other);
        assert!(list.resources[0].url.is_none());
        assert_eq!(list.resources[1].kind, ResourceKind::Video);
        assert_eq!(list.resources[1].url.as_deref(), Some("https://example.com/v"));
    }

    #[test]
    fn test_unknown_resource_kind_maps_to_other() {
        let payload = r#"{"title": "Odd thing", "kind": "podcast"}"#;
        let resource: DiscoveredResource = match serde_json::from_str(payload) {
            Ok(value) => value,
            Err(error) => panic!("resource should parse: {error}"),
        };
        assert_eq!(resource.kind, ResourceKind::Other);
    }

    #[test]
    fn test_milestone_points_default_to_zero() {
        let payload = r#"{"title": "t", "description": "d", "bloom_level": 2}"#;
        let milestone: MilestoneDraft = match serde_json::from_str(payload) {
            Ok(value) => value,
            Err(error) => panic!("milestone should parse: {error}"),
        };
        assert_eq!(milestone.points, 0);
    }
}
