use bloom_core::models::scores::{
    InterpretationThresholds, ScoringResult, MAX_CATEGORY_SCORE, PERCENTAGE_TOLERANCE,
};

use crate::error::RecordError;

/// Reject a result whose scales are out of range or whose derived fields
/// differ from recomputation.
pub fn check_scoring_result(
    result: &ScoringResult,
    thresholds: &InterpretationThresholds,
) -> Result<(), RecordError> {
    check_scores_and_totals(result)?;

    let expected = result.recomputed(thresholds);
    if expected.interpretation != result.interpretation {
        return Err(RecordError::InconsistentResult {
            field: "interpretation",
            expected: expected.interpretation.to_string(),
            actual: result.interpretation.to_string(),
        });
    }
    Ok(())
}

/// The threshold-independent part of [`check_scoring_result`]: scale ranges,
/// total difficulty and percentage.
pub fn check_scores_and_totals(result: &ScoringResult) -> Result<(), RecordError> {
    if let Some((category, value)) = result.category_scores.first_out_of_range() {
        return Err(RecordError::validation(
            "category_scores",
            format!("{category} score {value} is outside [0, {MAX_CATEGORY_SCORE}]"),
        ));
    }

    let expected = result.recomputed(&InterpretationThresholds::default());
    if expected.total_difficulty != result.total_difficulty {
        return Err(RecordError::InconsistentResult {
            field: "total_difficulty",
            expected: expected.total_difficulty.to_string(),
            actual: result.total_difficulty.to_string(),
        });
    }
    if (expected.percentage - result.percentage).abs() > PERCENTAGE_TOLERANCE
        || !result.percentage.is_finite()
    {
        return Err(RecordError::InconsistentResult {
            field: "percentage",
            expected: expected.percentage.to_string(),
            actual: result.percentage.to_string(),
        });
    }
    Ok(())
}

/// Confidence must be a finite value in [0, 1].
pub fn check_confidence(confidence: Option<f64>) -> Result<(), RecordError> {
    match confidence {
        Some(c) if !(0.0..=1.0).contains(&c) => Err(RecordError::validation(
            "confidence",
            format!("{c} is outside [0, 1]"),
        )),
        _ => Ok(()),
    }
}
