use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use ts_rs::TS;

use bloom_core::models::category::Category;
use bloom_core::models::scores::{
    CategoryScores, InterpretationThresholds, ScoringResult, MAX_CATEGORY_SCORE,
};

use crate::error::ScoringError;

/// Highest raw response ("Certainly True").
pub const MAX_RESPONSE: u8 = 2;

/// Response labels indexed by raw value.
pub const RESPONSE_LABELS: [&str; 3] = ["Not True", "Somewhat True", "Certainly True"];

/// Items each scale must have.
pub const ITEMS_PER_CATEGORY: usize = 5;

pub fn response_label(value: u8) -> Option<&'static str> {
    RESPONSE_LABELS.get(usize::from(value)).copied()
}

/// Invert a raw response for a positively phrased item: 0↔2, 1 stays 1.
pub fn reverse(raw: u8) -> u8 {
    MAX_RESPONSE.saturating_sub(raw)
}

/// A single questionnaire statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct QuestionnaireItem {
    pub id: u32,
    pub text: String,
    pub category: Category,
    #[serde(default)]
    pub reverse: bool,
}

impl QuestionnaireItem {
    /// Build an item from a textual category tag. Unknown tags are a
    /// definition error.
    pub fn from_tag(id: u32, text: &str, tag: &str, reverse: bool) -> Result<Self, ScoringError> {
        Ok(Self {
            id,
            text: text.to_string(),
            category: tag.parse()?,
            reverse,
        })
    }

    /// Points this item contributes for a raw response.
    pub fn effective_value(&self, raw: u8) -> u8 {
        if self.reverse { reverse(raw) } else { raw }
    }
}

/// Raw responses keyed by item id. Partial sets are allowed while the
/// questionnaire is being filled in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AnswerSet(BTreeMap<u32, u8>);

impl AnswerSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_answer(mut self, item_id: u32, value: u8) -> Self {
        self.0.insert(item_id, value);
        self
    }

    /// Record a response, returning the previous one for that item.
    pub fn insert(&mut self, item_id: u32, value: u8) -> Option<u8> {
        self.0.insert(item_id, value)
    }

    pub fn get(&self, item_id: u32) -> Option<u8> {
        self.0.get(&item_id).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, u8)> + '_ {
        self.0.iter().map(|(id, v)| (*id, *v))
    }

    /// Ids of `items` that have no response yet, in ascending order.
    pub fn missing(&self, items: &[QuestionnaireItem]) -> Vec<u32> {
        let mut missing: Vec<u32> = items
            .iter()
            .filter(|item| !self.0.contains_key(&item.id))
            .map(|item| item.id)
            .collect();
        missing.sort_unstable();
        missing
    }

    pub fn is_complete(&self, items: &[QuestionnaireItem]) -> bool {
        items.iter().all(|item| self.0.contains_key(&item.id))
    }

    /// Parse a JSON object of item id to response, e.g. `{"1": 2, "7": 0}`.
    ///
    /// Responses that are not small non-negative integers (`256`, `-1`,
    /// `1.5`, `"2"`) are rejected as [`ScoringError::Validation`] naming
    /// the lowest offending item. Integers above 2 are accepted here and
    /// rejected by [`validate_answers`] when scoring.
    pub fn from_json(json: &str) -> Result<Self, ScoringError> {
        let raw: serde_json::Map<String, Value> = serde_json::from_str(json)?;

        let mut entries = Vec::with_capacity(raw.len());
        for (key, value) in raw {
            let item_id: u32 = key
                .parse()
                .map_err(|_| ScoringError::InvalidAnswerKey(key.clone()))?;
            entries.push((item_id, value));
        }
        entries.sort_by_key(|(item_id, _)| *item_id);

        let mut answers = Self::new();
        for (item_id, value) in entries {
            match value.as_u64().and_then(|v| u8::try_from(v).ok()) {
                Some(v) => {
                    answers.insert(item_id, v);
                }
                None => return Err(out_of_range(item_id, value).into()),
            }
        }
        Ok(answers)
    }
}

impl FromIterator<(u32, u8)> for AnswerSet {
    fn from_iter<T: IntoIterator<Item = (u32, u8)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// How unanswered items are treated when scoring.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum MissingAnswerPolicy {
    /// Refuse to score and name the unanswered items.
    #[default]
    Reject,
    /// Score unanswered items as "Not True" (raw 0). Unanswered reverse
    /// items therefore contribute 2 points.
    TreatAsNotTrue,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringOptions {
    pub thresholds: InterpretationThresholds,
    pub missing_answers: MissingAnswerPolicy,
}

/// A rejected response. `value` is the response as supplied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS, Error)]
#[ts(export)]
#[error("{message}")]
pub struct ValidationError {
    pub item_id: u32,
    pub value: Value,
    pub message: String,
}

fn out_of_range(item_id: u32, value: Value) -> ValidationError {
    ValidationError {
        message: format!("item {item_id}: response {value} is outside [0, {MAX_RESPONSE}]"),
        item_id,
        value,
    }
}

/// Check every response against `items`: the id must be defined and the
/// value must be 0, 1 or 2. Returns all problems, ordered by item id.
pub fn validate_answers(answers: &AnswerSet, items: &[QuestionnaireItem]) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    for (item_id, value) in answers.iter() {
        if !items.iter().any(|item| item.id == item_id) {
            errors.push(ValidationError {
                item_id,
                value: Value::from(value),
                message: format!("item {item_id} is not part of this questionnaire"),
            });
        } else if value > MAX_RESPONSE {
            errors.push(out_of_range(item_id, Value::from(value)));
        }
    }
    errors
}

/// Check that a set of items forms a scorable questionnaire: unique ids and
/// exactly [`ITEMS_PER_CATEGORY`] items on every scale.
pub fn validate_definition(items: &[QuestionnaireItem]) -> Result<(), ScoringError> {
    let mut seen = HashSet::new();
    for item in items {
        if !seen.insert(item.id) {
            return Err(ScoringError::Definition(format!(
                "duplicate item id {}",
                item.id
            )));
        }
    }

    for category in Category::ALL {
        let count = items.iter().filter(|i| i.category == category).count();
        if count != ITEMS_PER_CATEGORY {
            return Err(ScoringError::Definition(format!(
                "{} has {count} items, expected {ITEMS_PER_CATEGORY}",
                category.label()
            )));
        }
    }
    Ok(())
}

/// Score a set of answers.
///
/// Thresholds are checked first, then responses; the first invalid response
/// is returned as [`ScoringError::Validation`]. Unanswered items are then handled per
/// `options.missing_answers`. Reverse items contribute `2 - raw`.
pub fn score(
    answers: &AnswerSet,
    items: &[QuestionnaireItem],
    options: &ScoringOptions,
) -> Result<ScoringResult, ScoringError> {
    options.thresholds.validate()?;

    if let Some(error) = validate_answers(answers, items).into_iter().next() {
        return Err(error.into());
    }

    let missing = answers.missing(items);
    if !missing.is_empty() && options.missing_answers == MissingAnswerPolicy::Reject {
        return Err(ScoringError::IncompleteAnswers { missing });
    }

    let mut category_scores = CategoryScores::default();
    for item in items {
        let raw = answers.get(item.id).unwrap_or(0);
        category_scores.add(item.category, item.effective_value(raw));
    }

    if let Some((category, value)) = category_scores.first_out_of_range() {
        return Err(ScoringError::Definition(format!(
            "{} scored {value}, above the maximum of {MAX_CATEGORY_SCORE}",
            category.label()
        )));
    }

    Ok(ScoringResult::from_category_scores(
        category_scores,
        &options.thresholds,
    ))
}
