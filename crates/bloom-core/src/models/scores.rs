use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::category::{Category, ConcernLevel};
use crate::error::CoreError;

/// Five items per scale, at most 2 points each.
pub const MAX_CATEGORY_SCORE: u8 = 10;

/// Four difficulty scales at [`MAX_CATEGORY_SCORE`] each.
pub const MAX_TOTAL_DIFFICULTY: u8 = 40;

/// Lowest difficulty percentage that reads as borderline.
pub const BORDERLINE_THRESHOLD: f64 = 15.0;

/// Lowest difficulty percentage that reads as clinical.
pub const CLINICAL_THRESHOLD: f64 = 20.0;

/// Tolerance used when comparing a supplied percentage against recomputation.
pub const PERCENTAGE_TOLERANCE: f64 = 1e-9;

/// Per-scale sums after reverse scoring.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CategoryScores {
    pub emotional: u8,
    pub conduct: u8,
    pub hyperactivity: u8,
    pub peer: u8,
    pub prosocial: u8,
}

impl CategoryScores {
    pub fn get(&self, category: Category) -> u8 {
        match category {
            Category::Emotional => self.emotional,
            Category::Conduct => self.conduct,
            Category::Hyperactivity => self.hyperactivity,
            Category::Peer => self.peer,
            Category::Prosocial => self.prosocial,
        }
    }

    fn slot(&mut self, category: Category) -> &mut u8 {
        match category {
            Category::Emotional => &mut self.emotional,
            Category::Conduct => &mut self.conduct,
            Category::Hyperactivity => &mut self.hyperactivity,
            Category::Peer => &mut self.peer,
            Category::Prosocial => &mut self.prosocial,
        }
    }

    pub fn set(&mut self, category: Category, value: u8) {
        *self.slot(category) = value;
    }

    /// Add points to a scale. Saturates rather than wrapping; range checks
    /// belong to [`CategoryScores::first_out_of_range`].
    pub fn add(&mut self, category: Category, points: u8) {
        let slot = self.slot(category);
        *slot = slot.saturating_add(points);
    }

    /// Sum of the four difficulty scales. Prosocial is never included.
    pub fn total_difficulty(&self) -> u8 {
        Category::DIFFICULTIES
            .iter()
            .map(|c| self.get(*c))
            .fold(0u8, u8::saturating_add)
    }

    /// The first scale whose value exceeds [`MAX_CATEGORY_SCORE`], if any.
    pub fn first_out_of_range(&self) -> Option<(Category, u8)> {
        Category::ALL
            .iter()
            .map(|c| (*c, self.get(*c)))
            .find(|(_, v)| *v > MAX_CATEGORY_SCORE)
    }

    /// Concern band for a difficulty scale; `None` for prosocial.
    pub fn concern(&self, category: Category) -> Option<ConcernLevel> {
        category
            .is_difficulty()
            .then(|| ConcernLevel::for_score(self.get(category)))
    }

    /// Prosocial strength as a percentage of its maximum.
    pub fn prosocial_percentage(&self) -> f64 {
        f64::from(self.prosocial) / f64::from(MAX_CATEGORY_SCORE) * 100.0
    }

    pub fn iter(&self) -> impl Iterator<Item = (Category, u8)> + '_ {
        Category::ALL.iter().map(move |c| (*c, self.get(*c)))
    }
}

/// Clinical-risk band derived from the difficulty percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum Interpretation {
    #[serde(rename = "Within Normal Range")]
    WithinNormalRange,
    #[serde(rename = "Borderline Range")]
    BorderlineRange,
    #[serde(rename = "Clinical Range")]
    ClinicalRange,
}

impl Interpretation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Interpretation::WithinNormalRange => "Within Normal Range",
            Interpretation::BorderlineRange => "Borderline Range",
            Interpretation::ClinicalRange => "Clinical Range",
        }
    }
}

impl std::fmt::Display for Interpretation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Band boundaries, as difficulty percentages. Each band includes its lower
/// bound and excludes its upper bound.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InterpretationThresholds {
    pub borderline: f64,
    pub clinical: f64,
}

impl Default for InterpretationThresholds {
    fn default() -> Self {
        Self {
            borderline: BORDERLINE_THRESHOLD,
            clinical: CLINICAL_THRESHOLD,
        }
    }
}

impl InterpretationThresholds {
    pub fn new(borderline: f64, clinical: f64) -> Result<Self, CoreError> {
        let thresholds = Self {
            borderline,
            clinical,
        };
        thresholds.validate()?;
        Ok(thresholds)
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        let in_range = |v: f64| (0.0..=100.0).contains(&v);
        if in_range(self.borderline) && in_range(self.clinical) && self.borderline < self.clinical
        {
            Ok(())
        } else {
            Err(CoreError::InvalidThresholds {
                borderline: self.borderline,
                clinical: self.clinical,
            })
        }
    }

    pub fn classify(&self, percentage: f64) -> Interpretation {
        if percentage < self.borderline {
            Interpretation::WithinNormalRange
        } else if percentage < self.clinical {
            Interpretation::BorderlineRange
        } else {
            Interpretation::ClinicalRange
        }
    }
}

/// Classify a difficulty percentage with the standard 15% / 20% boundaries.
pub fn classify(percentage: f64) -> Interpretation {
    InterpretationThresholds::default().classify(percentage)
}

/// Classify a difficulty percentage with custom boundaries.
pub fn classify_with(thresholds: &InterpretationThresholds, percentage: f64) -> Interpretation {
    thresholds.classify(percentage)
}

/// `total / 40 * 100`, unrounded.
pub fn difficulty_percentage(total_difficulty: u8) -> f64 {
    f64::from(total_difficulty) / f64::from(MAX_TOTAL_DIFFICULTY) * 100.0
}

/// Output of the scoring engine. Every field after `category_scores` is
/// derived from it; build through [`ScoringResult::from_category_scores`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ScoringResult {
    pub category_scores: CategoryScores,
    pub total_difficulty: u8,
    pub percentage: f64,
    pub interpretation: Interpretation,
}

impl ScoringResult {
    pub fn from_category_scores(
        category_scores: CategoryScores,
        thresholds: &InterpretationThresholds,
    ) -> Self {
        let total_difficulty = category_scores.total_difficulty();
        let percentage = difficulty_percentage(total_difficulty);
        Self {
            category_scores,
            total_difficulty,
            percentage,
            interpretation: thresholds.classify(percentage),
        }
    }

    /// Recompute the derived fields from `category_scores`.
    pub fn recomputed(&self, thresholds: &InterpretationThresholds) -> Self {
        Self::from_category_scores(self.category_scores, thresholds)
    }
}
