use thiserror::Error;

use bloom_core::error::CoreError;

use crate::scoring::ValidationError;

#[derive(Debug, Error)]
pub enum ScoringError {
    #[error("unknown questionnaire: {0}")]
    UnknownQuestionnaire(String),

    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("answer key {0:?} is not an item id")]
    InvalidAnswerKey(String),

    #[error("incomplete answers: items {missing:?} are unanswered")]
    IncompleteAnswers { missing: Vec<u32> },

    #[error("invalid questionnaire definition: {0}")]
    Definition(String),

    #[error("invalid configuration: {0}")]
    Config(#[from] CoreError),

    #[error("invalid JSON: {0}")]
    Parse(#[from] serde_json::Error),
}
