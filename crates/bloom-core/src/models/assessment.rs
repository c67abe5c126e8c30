use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use super::scores::{CategoryScores, Interpretation, ScoringResult};
use crate::error::CoreError;

/// Which analysis produced the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum AnalysisType {
    Facial,
    Sdq,
    Combined,
}

impl AnalysisType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisType::Facial => "facial",
            AnalysisType::Sdq => "sdq",
            AnalysisType::Combined => "combined",
        }
    }
}

impl fmt::Display for AnalysisType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnalysisType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "facial" => Ok(AnalysisType::Facial),
            "sdq" => Ok(AnalysisType::Sdq),
            "combined" => Ok(AnalysisType::Combined),
            other => Err(CoreError::InvalidAnalysisType(other.to_string())),
        }
    }
}

/// A persisted screening result for one child.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AssessmentResult {
    pub id: Uuid,
    pub child_id: String,
    /// Opaque reference to a facial image (URL or storage key).
    pub image_ref: Option<String>,
    pub category_scores: CategoryScores,
    pub total_difficulty: u8,
    pub percentage: f64,
    pub interpretation: Interpretation,
    pub analysis_type: AnalysisType,
    pub notes: Option<String>,
    /// Model confidence in [0, 1] for facial or combined analyses.
    #[serde(default)]
    pub confidence: Option<f64>,
    pub created_at: jiff::Timestamp,
    pub updated_at: jiff::Timestamp,
}

impl AssessmentResult {
    /// The scoring fields of this record, as stored.
    pub fn scoring_result(&self) -> ScoringResult {
        ScoringResult {
            category_scores: self.category_scores,
            total_difficulty: self.total_difficulty,
            percentage: self.percentage,
            interpretation: self.interpretation,
        }
    }

    pub fn was_corrected(&self) -> bool {
        self.updated_at != self.created_at
    }
}
