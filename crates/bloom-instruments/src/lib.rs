//! bloom-instruments
//!
//! Behavioral screening questionnaires and the scoring engine. Pure data and
//! pure functions with no storage dependency.

pub mod definition;
pub mod error;
pub mod instruments;
pub mod scoring;

use bloom_core::models::category::Category;
use bloom_core::models::scores::{ScoringResult, MAX_CATEGORY_SCORE, MAX_TOTAL_DIFFICULTY};

use error::ScoringError;
use scoring::{AnswerSet, QuestionnaireItem, ScoringOptions, ValidationError};

/// Trait implemented by each screening questionnaire.
pub trait Questionnaire: Send + Sync {
    /// Unique identifier for this questionnaire (e.g., "sdq").
    fn id(&self) -> &str;

    /// Human-readable name (e.g., "SDQ").
    fn name(&self) -> &str;

    /// The items, in presentation order.
    fn items(&self) -> &[QuestionnaireItem];

    /// Items belonging to one scale, in presentation order.
    fn items_in(&self, category: Category) -> Vec<&QuestionnaireItem> {
        self.items()
            .iter()
            .filter(|i| i.category == category)
            .collect()
    }

    /// Validate a (possibly partial) answer set against this questionnaire.
    fn validate_answers(&self, answers: &AnswerSet) -> Vec<ValidationError> {
        scoring::validate_answers(answers, self.items())
    }

    /// Score a complete answer set.
    fn score(
        &self,
        answers: &AnswerSet,
        options: &ScoringOptions,
    ) -> Result<ScoringResult, ScoringError> {
        scoring::score(answers, self.items(), options)
    }

    /// Format a result as structured text for inclusion in a report.
    fn to_structured_input(&self, result: &ScoringResult) -> String {
        let scores = &result.category_scores;
        let mut output = format!("## {}\n\n", self.name());
        for category in Category::ALL {
            output.push_str(&format!("### {}\n", category.label()));
            let value = scores.get(category);
            match scores.concern(category) {
                Some(concern) => output.push_str(&format!(
                    "- Score: {value} / {MAX_CATEGORY_SCORE} ({})\n",
                    concern.label()
                )),
                None => output.push_str(&format!(
                    "- Score: {value} / {MAX_CATEGORY_SCORE} ({:.0}%)\n",
                    scores.prosocial_percentage()
                )),
            }
            output.push('\n');
        }
        output.push_str(&format!(
            "Total difficulty: {} / {MAX_TOTAL_DIFFICULTY} ({:.1}%)\n",
            result.total_difficulty, result.percentage
        ));
        output.push_str(&format!("Interpretation: {}\n", result.interpretation));
        output
    }
}

/// Return all built-in questionnaires.
pub fn all_questionnaires() -> Vec<Box<dyn Questionnaire>> {
    vec![Box::new(instruments::sdq::Sdq)]
}

/// Look up a built-in questionnaire by ID.
pub fn get_questionnaire(id: &str) -> Result<Box<dyn Questionnaire>, ScoringError> {
    all_questionnaires()
        .into_iter()
        .find(|q| q.id() == id)
        .ok_or_else(|| ScoringError::UnknownQuestionnaire(id.to_string()))
}
