use std::sync::Arc;

use jiff::Timestamp;
use serde_json::{json, Value};
use tracing::{debug, info, warn};
use uuid::Uuid;

use bloom_core::doc_keys;
use bloom_core::models::assessment::{AnalysisType, AssessmentResult};
use bloom_core::models::scores::{CategoryScores, InterpretationThresholds, ScoringResult};
use bloom_storage::error::StorageError;
use bloom_storage::DocumentStore;

use crate::audit::{AuditAction, AuditEvent};
use crate::consistency::{check_confidence, check_scores_and_totals, check_scoring_result};
use crate::error::RecordError;

/// Source of creation and correction timestamps.
pub type Clock = Arc<dyn Fn() -> Timestamp + Send + Sync>;

/// A scored result the caller is ready to commit.
#[derive(Debug, Clone)]
pub struct NewAssessment {
    pub child_id: String,
    pub scoring: ScoringResult,
    pub analysis_type: AnalysisType,
    pub notes: Option<String>,
    pub image_ref: Option<String>,
    pub confidence: Option<f64>,
}

impl NewAssessment {
    pub fn new(child_id: impl Into<String>, scoring: ScoringResult, analysis_type: AnalysisType) -> Self {
        Self {
            child_id: child_id.into(),
            scoring,
            analysis_type,
            notes: None,
            image_ref: None,
            confidence: None,
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn with_image_ref(mut self, image_ref: impl Into<String>) -> Self {
        self.image_ref = Some(image_ref.into());
        self
    }

    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = Some(confidence);
        self
    }
}

/// Fields a correction may replace. `None` keeps the stored value.
/// Derived fields are not listed: they are always recomputed.
#[derive(Debug, Clone, Default)]
pub struct Correction {
    pub category_scores: Option<CategoryScores>,
    pub notes: Option<String>,
    pub image_ref: Option<String>,
    pub confidence: Option<f64>,
}

/// Assessment history backed by a document store.
#[derive(Clone)]
pub struct AssessmentStore {
    store: Arc<dyn DocumentStore>,
    collection: String,
    thresholds: InterpretationThresholds,
    clock: Clock,
}

impl AssessmentStore {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            collection: doc_keys::ASSESSMENTS.to_string(),
            thresholds: InterpretationThresholds::default(),
            clock: Arc::new(Timestamp::now),
        }
    }

    /// Use custom band boundaries. Rejects boundaries that are out of
    /// order or outside [0, 100].
    pub fn with_thresholds(
        mut self,
        thresholds: InterpretationThresholds,
    ) -> Result<Self, RecordError> {
        thresholds.validate()?;
        self.thresholds = thresholds;
        Ok(self)
    }

    pub fn with_collection(mut self, collection: impl Into<String>) -> Self {
        self.collection = collection.into();
        self
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn thresholds(&self) -> &InterpretationThresholds {
        &self.thresholds
    }

    /// Persist a scored result. Rejects results whose derived fields do not
    /// match recomputation; assigns the id and timestamps.
    pub async fn create(&self, new: NewAssessment) -> Result<AssessmentResult, RecordError> {
        check_child_id(&new.child_id)?;
        check_image_ref(new.image_ref.as_deref())?;
        check_confidence(new.confidence)?;
        check_scoring_result(&new.scoring, &self.thresholds)?;

        let now = (self.clock)();
        let record = AssessmentResult {
            id: Uuid::new_v4(),
            child_id: new.child_id,
            image_ref: new.image_ref,
            category_scores: new.scoring.category_scores,
            total_difficulty: new.scoring.total_difficulty,
            percentage: new.scoring.percentage,
            interpretation: new.scoring.interpretation,
            analysis_type: new.analysis_type,
            notes: new.notes,
            confidence: new.confidence,
            created_at: now,
            updated_at: now,
        };

        let document = serde_json::to_value(&record)?;
        self.store
            .insert(&self.collection, record.id, document)
            .await
            .map_err(storage_failure("create"))?;

        info!(id = %record.id, child_id = %record.child_id, "assessment created");
        AuditEvent::for_record(AuditAction::Create, &record)
            .with_details(json!({
                "analysis_type": record.analysis_type,
                "interpretation": record.interpretation,
            }))
            .emit();

        Ok(record)
    }

    /// Every record for `child_id`, newest first. Empty when there are none.
    pub async fn list_by_child(&self, child_id: &str) -> Result<Vec<AssessmentResult>, RecordError> {
        self.history("list_by_child", child_id).await
    }

    /// The newest record for `child_id`, if any.
    pub async fn get_most_recent(
        &self,
        child_id: &str,
    ) -> Result<Option<AssessmentResult>, RecordError> {
        Ok(self
            .history("get_most_recent", child_id)
            .await?
            .into_iter()
            .next())
    }

    /// Records of one analysis type for `child_id`, newest first.
    pub async fn list_by_type(
        &self,
        child_id: &str,
        analysis_type: AnalysisType,
    ) -> Result<Vec<AssessmentResult>, RecordError> {
        let mut records = self.history("list_by_type", child_id).await?;
        records.retain(|r| r.analysis_type == analysis_type);
        Ok(records)
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<AssessmentResult>, RecordError> {
        self.store
            .get(&self.collection, id)
            .await
            .map_err(storage_failure("get"))?
            .map(|doc| self.decode(doc))
            .transpose()
    }

    /// Apply a correction. Total, percentage and interpretation are
    /// recomputed from the resulting category scores; id, child, analysis
    /// type and creation time are kept.
    pub async fn correct(
        &self,
        id: Uuid,
        correction: Correction,
    ) -> Result<AssessmentResult, RecordError> {
        let doc = self
            .store
            .get(&self.collection, id)
            .await
            .map_err(storage_failure("correct"))?
            .ok_or(RecordError::NotFound { id })?;
        let mut record = self.decode(doc)?;

        check_image_ref(correction.image_ref.as_deref())?;
        check_confidence(correction.confidence)?;

        let scores = correction.category_scores.unwrap_or(record.category_scores);
        let scoring = ScoringResult::from_category_scores(scores, &self.thresholds);
        check_scores_and_totals(&scoring)?;

        let previous = record.interpretation;
        record.category_scores = scoring.category_scores;
        record.total_difficulty = scoring.total_difficulty;
        record.percentage = scoring.percentage;
        record.interpretation = scoring.interpretation;
        if let Some(notes) = correction.notes {
            record.notes = Some(notes);
        }
        if let Some(image_ref) = correction.image_ref {
            record.image_ref = Some(image_ref);
        }
        if let Some(confidence) = correction.confidence {
            record.confidence = Some(confidence);
        }
        record.updated_at = (self.clock)();

        let document = serde_json::to_value(&record)?;
        self.store
            .replace(&self.collection, id, document)
            .await
            .map_err(|e| match e {
                StorageError::NotFound { .. } => RecordError::NotFound { id },
                other => storage_failure("correct")(other),
            })?;

        info!(id = %id, child_id = %record.child_id, "assessment corrected");
        AuditEvent::for_record(AuditAction::Correct, &record)
            .with_details(json!({
                "previous_interpretation": previous,
                "interpretation": record.interpretation,
                "scores_changed": correction.category_scores.is_some(),
            }))
            .emit();

        Ok(record)
    }

    /// Remove a record. Only ever caller-initiated. A corrupt document can
    /// still be removed; its audit event then has an empty child id.
    pub async fn delete(&self, id: Uuid) -> Result<(), RecordError> {
        let child_id = match self.store.get(&self.collection, id).await {
            Ok(Some(doc)) => doc
                .get(doc_keys::CHILD_ID_FIELD)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            Ok(None) => return Err(RecordError::NotFound { id }),
            Err(StorageError::Corrupt { key, source }) => {
                warn!(id = %id, key = %key, error = %source, "deleting unreadable assessment document");
                String::new()
            }
            Err(e) => return Err(storage_failure("delete")(e)),
        };

        self.store
            .remove(&self.collection, id)
            .await
            .map_err(|e| match e {
                StorageError::NotFound { .. } => RecordError::NotFound { id },
                other => storage_failure("delete")(other),
            })?;

        info!(id = %id, child_id = %child_id, "assessment deleted");
        AuditEvent::new(AuditAction::Delete, id, child_id).emit();
        Ok(())
    }

    async fn history(
        &self,
        operation: &'static str,
        child_id: &str,
    ) -> Result<Vec<AssessmentResult>, RecordError> {
        check_child_id(child_id)?;

        let key = Value::String(child_id.to_string());
        let docs = self
            .store
            .query_by_field(&self.collection, doc_keys::CHILD_ID_FIELD, &key)
            .await
            .map_err(storage_failure(operation))?;

        let mut records = docs
            .into_iter()
            .map(|doc| self.decode(doc))
            .collect::<Result<Vec<_>, _>>()?;
        records.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });

        debug!(child_id, operation, count = records.len(), "loaded assessment history");
        Ok(records)
    }

    /// Deserialize a stored record and re-derive what must not be trusted:
    /// total and percentage must match the scores, and the band is
    /// reclassified under the current thresholds.
    fn decode(&self, doc: Value) -> Result<AssessmentResult, RecordError> {
        let mut record: AssessmentResult = serde_json::from_value(doc)?;
        check_scores_and_totals(&record.scoring_result())?;

        let band = self.thresholds.classify(record.percentage);
        if band != record.interpretation {
            warn!(
                id = %record.id,
                stored = %record.interpretation,
                derived = %band,
                "stored interpretation differs from current thresholds"
            );
            record.interpretation = band;
        }
        Ok(record)
    }
}

/// Corrupt documents are [`RecordError::Malformed`]; every other backend
/// failure is passed through unchanged as `StorageUnavailable`.
fn storage_failure(operation: &'static str) -> impl FnOnce(StorageError) -> RecordError {
    move |error| match error {
        StorageError::Corrupt { source, .. } => RecordError::Malformed(source),
        source => RecordError::StorageUnavailable { operation, source },
    }
}

fn check_child_id(child_id: &str) -> Result<(), RecordError> {
    if child_id.trim().is_empty() {
        return Err(RecordError::validation("child_id", "must not be empty"));
    }
    Ok(())
}

fn check_image_ref(image_ref: Option<&str>) -> Result<(), RecordError> {
    match image_ref {
        Some(r) if r.trim().is_empty() => {
            Err(RecordError::validation("image_ref", "must not be blank when present"))
        }
        _ => Ok(()),
    }
}
