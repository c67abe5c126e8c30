//! Questionnaire definitions loaded at runtime from JSON.
//!
//! Lets a deployment revise item wording or ordering without a rebuild.
//! Definitions are validated once, on load; a bad category tag or a scale
//! with the wrong number of items never reaches the scoring engine.

use serde::{Deserialize, Serialize};

use crate::error::ScoringError;
use crate::scoring::{validate_definition, QuestionnaireItem};
use crate::Questionnaire;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawItem {
    id: u32,
    text: String,
    category: String,
    #[serde(default)]
    reverse: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawDefinition {
    id: String,
    name: String,
    items: Vec<RawItem>,
}

/// A validated questionnaire read from a definition file.
#[derive(Debug, Clone)]
pub struct DefinedQuestionnaire {
    id: String,
    name: String,
    items: Vec<QuestionnaireItem>,
}

impl DefinedQuestionnaire {
    pub fn from_json(json: &str) -> Result<Self, ScoringError> {
        let raw: RawDefinition = serde_json::from_str(json)?;

        let items = raw
            .items
            .iter()
            .map(|i| QuestionnaireItem::from_tag(i.id, &i.text, &i.category, i.reverse))
            .collect::<Result<Vec<_>, _>>()?;
        validate_definition(&items)?;

        Ok(Self {
            id: raw.id,
            name: raw.name,
            items,
        })
    }
}

impl Questionnaire for DefinedQuestionnaire {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn items(&self) -> &[QuestionnaireItem] {
        &self.items
    }
}
