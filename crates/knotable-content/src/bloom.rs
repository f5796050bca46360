//! Bloom's Taxonomy levels.
//!
//! Campaigns ladder milestones across these six tiers. The core only
//! embeds them as text in prompts; nothing else interprets them.

use core::fmt::{Display, Formatter, Result as FmtResult};

use serde::{Deserialize, Serialize};

/// One of the six Bloom's Taxonomy tiers, lowest complexity first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum BloomLevel {
    /// Recall facts and basic concepts.
    Remember,
    /// Explain ideas or concepts.
    Understand,
    /// Use information in new situations.
    Apply,
    /// Draw connections among ideas.
    Analyze,
    /// Justify a stand or decision.
    Evaluate,
    /// Produce new or original work.
    Create,
}

impl BloomLevel {
    /// All levels in ascending order.
    pub const ALL: [Self; 6] = [
        Self::Remember,
        Self::Understand,
        Self::Apply,
        Self::Analyze,
        Self::Evaluate,
        Self::Create,
    ];

    /// Numeric tier, 1 through 6.
    #[must_use]
    pub fn tier(self) -> u8 {
        match self {
            Self::Remember => 1,
            Self::Understand => 2,
            Self::Apply => 3,
            Self::Analyze => 4,
            Self::Evaluate => 5,
            Self::Create => 6,
        }
    }

    /// Human-readable label used in prompts.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Remember => "Remember",
            Self::Understand => "Understand",
            Self::Apply => "Apply",
            Self::Analyze => "Analyze",
            Self::Evaluate => "Evaluate",
            Self::Create => "Create",
        }
    }
}

impl Display for BloomLevel {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> FmtResult {
        write!(formatter, "{} ({})", self.label(), self.tier())
    }
}

impl TryFrom<u8> for BloomLevel {
    type Error = String;

    fn try_from(tier: u8) -> Result<Self, Self::Error> {
        match tier {
            1 => Ok(Self::Remember),
            2 => Ok(Self::Understand),
            3 => Ok(Self::Apply),
            4 => Ok(Self::Analyze),
            5 => Ok(Self::Evaluate),
            6 => Ok(Self::Create),
            other => Err(format!("Bloom level out of range 1-6: {other}")),
        }
    }
}

impl From<BloomLevel> for u8 {
    fn from(level: BloomLevel) -> Self {
        level.tier()
    }
}
