use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::CoreError;

/// The five SDQ scales. The first four measure difficulties; `Prosocial`
/// measures a strength and never contributes to the difficulty total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Category {
    Emotional,
    Conduct,
    Hyperactivity,
    Peer,
    Prosocial,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Emotional,
        Category::Conduct,
        Category::Hyperactivity,
        Category::Peer,
        Category::Prosocial,
    ];

    pub const DIFFICULTIES: [Category; 4] = [
        Category::Emotional,
        Category::Conduct,
        Category::Hyperactivity,
        Category::Peer,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Emotional => "emotional",
            Category::Conduct => "conduct",
            Category::Hyperactivity => "hyperactivity",
            Category::Peer => "peer",
            Category::Prosocial => "prosocial",
        }
    }

    /// Human-readable scale name (e.g., "Emotional Symptoms").
    pub fn label(&self) -> &'static str {
        match self {
            Category::Emotional => "Emotional Symptoms",
            Category::Conduct => "Conduct Problems",
            Category::Hyperactivity => "Hyperactivity/Inattention",
            Category::Peer => "Peer Relationship Issues",
            Category::Prosocial => "Prosocial Behavior",
        }
    }

    /// One-line summary of what the scale covers, for display.
    pub fn description(&self) -> &'static str {
        match self {
            Category::Emotional => "Worries, fears, unhappiness and somatic complaints",
            Category::Conduct => "Temper, arguing, dishonesty and rule-following",
            Category::Hyperactivity => "Restlessness, distractibility and impulsivity",
            Category::Peer => "Friendships and how the child gets on with other children",
            Category::Prosocial => "Kindness, sharing and helping others",
        }
    }

    pub fn is_difficulty(&self) -> bool {
        !matches!(self, Category::Prosocial)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "emotional" => Ok(Category::Emotional),
            "conduct" => Ok(Category::Conduct),
            "hyperactivity" => Ok(Category::Hyperactivity),
            "peer" => Ok(Category::Peer),
            "prosocial" => Ok(Category::Prosocial),
            other => Err(CoreError::InvalidCategory(other.to_string())),
        }
    }
}

/// Per-scale concern shown next to each difficulty score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum ConcernLevel {
    Low,
    Moderate,
    High,
}

impl ConcernLevel {
    pub const LOW_MAX: u8 = 2;
    pub const MODERATE_MAX: u8 = 5;

    pub fn for_score(score: u8) -> Self {
        if score <= Self::LOW_MAX {
            ConcernLevel::Low
        } else if score <= Self::MODERATE_MAX {
            ConcernLevel::Moderate
        } else {
            ConcernLevel::High
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ConcernLevel::Low => "Low concern",
            ConcernLevel::Moderate => "Moderate concern",
            ConcernLevel::High => "High concern",
        }
    }
}
