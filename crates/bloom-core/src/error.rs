use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("unknown questionnaire category: {0}")]
    InvalidCategory(String),

    #[error("unknown analysis type: {0}")]
    InvalidAnalysisType(String),

    #[error(
        "invalid interpretation thresholds: borderline {borderline} must be below clinical {clinical}, both within [0, 100]"
    )]
    InvalidThresholds { borderline: f64, clinical: f64 },
}
