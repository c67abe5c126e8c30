use std::fmt;

use serde::Serialize;
use serde_json::Value;
use tracing::info;
use uuid::Uuid;

use bloom_core::models::assessment::AssessmentResult;

/// Changes to the assessment history that are audited. Reads are not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AuditAction {
    #[serde(rename = "assessment.create")]
    Create,
    #[serde(rename = "assessment.correct")]
    Correct,
    #[serde(rename = "assessment.delete")]
    Delete,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::Create => "assessment.create",
            AuditAction::Correct => "assessment.correct",
            AuditAction::Delete => "assessment.delete",
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One audited change to a child's history, emitted through `tracing`
/// under the `audit` target.
#[derive(Debug, Clone, Serialize)]
pub struct AuditEvent {
    pub action: AuditAction,
    pub assessment_id: Uuid,
    pub child_id: String,
    /// Action-specific context, e.g. the band before and after a correction.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl AuditEvent {
    pub fn new(action: AuditAction, assessment_id: Uuid, child_id: impl Into<String>) -> Self {
        Self {
            action,
            assessment_id,
            child_id: child_id.into(),
            details: None,
        }
    }

    pub fn for_record(action: AuditAction, record: &AssessmentResult) -> Self {
        Self::new(action, record.id, record.child_id.as_str())
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    pub fn emit(&self) {
        let details = self.details.as_ref().map(Value::to_string);
        info!(
            target: "audit",
            action = %self.action,
            assessment_id = %self.assessment_id,
            child_id = %self.child_id,
            details = details.as_deref().unwrap_or(""),
            "assessment history changed"
        );
    }
}
