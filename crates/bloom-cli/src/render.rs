use bloom_core::models::assessment::AssessmentResult;
use bloom_core::models::scores::{ScoringResult, MAX_TOTAL_DIFFICULTY};
use bloom_instruments::Questionnaire;

use crate::cli::OutputFormat;

pub fn scoring_result(
    questionnaire: &dyn Questionnaire,
    result: &ScoringResult,
    format: OutputFormat,
) -> eyre::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(result)?),
        OutputFormat::Text => Ok(questionnaire.to_structured_input(result)),
    }
}

pub fn record(
    questionnaire: &dyn Questionnaire,
    record: &AssessmentResult,
    format: OutputFormat,
) -> eyre::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(record)?),
        OutputFormat::Text => {
            let mut out = format!(
                "Assessment {}\nChild: {}\nType: {}\nRecorded: {}\n",
                record.id, record.child_id, record.analysis_type, record.created_at
            );
            if record.was_corrected() {
                out.push_str(&format!("Corrected: {}\n", record.updated_at));
            }
            if let Some(notes) = &record.notes {
                out.push_str(&format!("Notes: {notes}\n"));
            }
            out.push('\n');
            out.push_str(&questionnaire.to_structured_input(&record.scoring_result()));
            Ok(out)
        }
    }
}

pub fn history(records: &[AssessmentResult], format: OutputFormat) -> eyre::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(records)?),
        OutputFormat::Text => Ok(records
            .iter()
            .map(|r| {
                format!(
                    "{}  {}  {:<8}  {:>2}/{MAX_TOTAL_DIFFICULTY}  {:>5.1}%  {}\n",
                    r.created_at,
                    r.id,
                    r.analysis_type.as_str(),
                    r.total_difficulty,
                    r.percentage,
                    r.interpretation
                )
            })
            .collect()),
    }
}
