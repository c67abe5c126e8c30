use bloom_core::error::CoreError;
use bloom_instruments::definition::DefinedQuestionnaire;
use bloom_instruments::error::ScoringError;
use bloom_instruments::instruments::sdq::Sdq;
use bloom_instruments::scoring::{AnswerSet, ScoringOptions};
use bloom_instruments::Questionnaire;
use serde_json::{json, Value};

fn sdq_definition() -> Value {
    let items: Vec<Value> = Sdq
        .items()
        .iter()
        .map(|i| {
            json!({
                "id": i.id,
                "text": i.text,
                "category": i.category.as_str(),
                "reverse": i.reverse,
            })
        })
        .collect();
    json!({ "id": "sdq-local", "name": "SDQ (local wording)", "items": items })
}

#[test]
fn loads_a_valid_definition() {
    let questionnaire = DefinedQuestionnaire::from_json(&sdq_definition().to_string()).unwrap();
    assert_eq!(questionnaire.id(), "sdq-local");
    assert_eq!(questionnaire.items().len(), 25);

    let answers: AnswerSet = questionnaire.items().iter().map(|i| (i.id, 1)).collect();
    let defined = questionnaire.score(&answers, &ScoringOptions::default()).unwrap();
    let builtin = Sdq.score(&answers, &ScoringOptions::default()).unwrap();
    assert_eq!(defined, builtin);
}

#[test]
fn unknown_category_tag_fails_to_load() {
    let mut definition = sdq_definition();
    definition["items"][0]["category"] = json!("anxiety");
    let err = DefinedQuestionnaire::from_json(&definition.to_string()).unwrap_err();
    assert!(matches!(
        err,
        ScoringError::Config(CoreError::InvalidCategory(tag)) if tag == "anxiety"
    ));
}

#[test]
fn wrong_scale_size_fails_to_load() {
    let mut definition = sdq_definition();
    // Item 1 is prosocial; moving it leaves prosocial with four and peer with six.
    definition["items"][0]["category"] = json!("peer");
    let err = DefinedQuestionnaire::from_json(&definition.to_string()).unwrap_err();
    assert!(matches!(err, ScoringError::Definition(_)), "{err}");
}

#[test]
fn duplicate_item_ids_fail_to_load() {
    let mut definition = sdq_definition();
    definition["items"][1]["id"] = json!(1);
    let err = DefinedQuestionnaire::from_json(&definition.to_string()).unwrap_err();
    assert!(err.to_string().contains("duplicate item id 1"), "{err}");
}

#[test]
fn malformed_json_is_a_parse_error() {
    assert!(matches!(
        DefinedQuestionnaire::from_json("{\"id\": \"x\""),
        Err(ScoringError::Parse(_))
    ));
}
