use bloom_core::error::CoreError;
use bloom_core::models::category::Category;
use bloom_core::models::scores::{Interpretation, InterpretationThresholds};
use bloom_instruments::error::ScoringError;
use bloom_instruments::instruments::sdq::Sdq;
use bloom_instruments::scoring::{
    reverse, response_label, validate_definition, AnswerSet, MissingAnswerPolicy,
    ScoringOptions, ITEMS_PER_CATEGORY,
};
use bloom_instruments::{get_questionnaire, Questionnaire};

/// Answer every SDQ item, choosing the value from the item's reverse flag.
fn answer_all(normal: u8, reversed: u8) -> AnswerSet {
    Sdq.items()
        .iter()
        .map(|i| (i.id, if i.reverse { reversed } else { normal }))
        .collect()
}

#[test]
fn definition_has_five_items_per_scale() {
    assert_eq!(Sdq.items().len(), 25);
    validate_definition(Sdq.items()).unwrap();
    for category in Category::ALL {
        assert_eq!(Sdq.items_in(category).len(), ITEMS_PER_CATEGORY);
    }
}

#[test]
fn reverse_items_sit_on_difficulty_scales() {
    let reversed: Vec<u32> = Sdq.items().iter().filter(|i| i.reverse).map(|i| i.id).collect();
    assert_eq!(reversed, vec![7, 11, 14, 21, 25]);
    assert!(Sdq.items_in(Category::Prosocial).iter().all(|i| !i.reverse));
    assert!(Sdq.items_in(Category::Emotional).iter().all(|i| !i.reverse));
}

#[test]
fn reverse_swaps_extremes_and_fixes_middle() {
    assert_eq!(reverse(0), 2);
    assert_eq!(reverse(1), 1);
    assert_eq!(reverse(2), 0);
    for x in 0..=2 {
        assert_eq!(reverse(reverse(x)), x);
    }
}

#[test]
fn response_labels() {
    assert_eq!(response_label(0), Some("Not True"));
    assert_eq!(response_label(2), Some("Certainly True"));
    assert_eq!(response_label(3), None);
}

#[test]
fn maximum_difficulty_scores_clinical() {
    let result = Sdq.score(&answer_all(2, 0), &ScoringOptions::default()).unwrap();
    for category in Category::ALL {
        assert_eq!(result.category_scores.get(category), 10, "{category}");
    }
    assert_eq!(result.total_difficulty, 40);
    assert_eq!(result.percentage, 100.0);
    assert_eq!(result.interpretation, Interpretation::ClinicalRange);
}

#[test]
fn all_somewhat_true_scores_five_per_scale() {
    let result = Sdq.score(&answer_all(1, 1), &ScoringOptions::default()).unwrap();
    for category in Category::ALL {
        assert_eq!(result.category_scores.get(category), 5, "{category}");
    }
    assert_eq!(result.total_difficulty, 20);
    assert_eq!(result.percentage, 50.0);
    assert_eq!(result.interpretation, Interpretation::ClinicalRange);
}

#[test]
fn no_difficulties_scores_within_normal_range() {
    let result = Sdq.score(&answer_all(0, 2), &ScoringOptions::default()).unwrap();
    assert_eq!(result.total_difficulty, 0);
    assert_eq!(result.percentage, 0.0);
    assert_eq!(result.category_scores.prosocial, 0);
    assert_eq!(result.interpretation, Interpretation::WithinNormalRange);
}

#[test]
fn prosocial_does_not_count_toward_difficulty() {
    let mut answers = answer_all(0, 2);
    for item in Sdq.items_in(Category::Prosocial) {
        answers.insert(item.id, 2);
    }
    let result = Sdq.score(&answers, &ScoringOptions::default()).unwrap();
    assert_eq!(result.category_scores.prosocial, 10);
    assert_eq!(result.total_difficulty, 0);
}

#[test]
fn borderline_band_from_six_points() {
    let mut answers = answer_all(0, 2);
    // Three emotional items at "Certainly True" = 6 points = 15%.
    for id in [3, 8, 13] {
        answers.insert(id, 2);
    }
    let result = Sdq.score(&answers, &ScoringOptions::default()).unwrap();
    assert_eq!(result.category_scores.emotional, 6);
    assert_eq!(result.percentage, 15.0);
    assert_eq!(result.interpretation, Interpretation::BorderlineRange);
}

#[test]
fn scores_stay_in_range_for_varied_answers() {
    for seed in 0..50u32 {
        let answers: AnswerSet = Sdq
            .items()
            .iter()
            .map(|i| (i.id, ((i.id * 7 + seed * 13) % 3) as u8))
            .collect();
        let result = Sdq.score(&answers, &ScoringOptions::default()).unwrap();
        for (_, value) in result.category_scores.iter() {
            assert!(value <= 10);
        }
        assert!(result.total_difficulty <= 40);
        assert!((0.0..=100.0).contains(&result.percentage));
    }
}

#[test]
fn scoring_is_deterministic() {
    let answers = answer_all(1, 2);
    let options = ScoringOptions::default();
    let first = Sdq.score(&answers, &options).unwrap();
    let second = Sdq.score(&answers, &options).unwrap();
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_vec(&first).unwrap(),
        serde_json::to_vec(&second).unwrap()
    );
}

#[test]
fn incomplete_answers_are_rejected_by_default() {
    let mut answers = AnswerSet::new();
    for item in Sdq.items().iter().filter(|i| i.id != 7 && i.id != 19) {
        answers.insert(item.id, 1);
    }
    assert!(!answers.is_complete(Sdq.items()));

    let err = Sdq.score(&answers, &ScoringOptions::default()).unwrap_err();
    match err {
        ScoringError::IncompleteAnswers { missing } => assert_eq!(missing, vec![7, 19]),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn missing_answers_can_default_to_not_true() {
    let mut answers = AnswerSet::new();
    for item in Sdq.items().iter().filter(|i| i.id != 7) {
        answers.insert(item.id, 1);
    }
    let options = ScoringOptions {
        missing_answers: MissingAnswerPolicy::TreatAsNotTrue,
        ..Default::default()
    };
    let result = Sdq.score(&answers, &options).unwrap();
    // Item 7 is reverse scored, so an unanswered "Not True" counts 2.
    assert_eq!(result.category_scores.conduct, 6);
    assert_eq!(result.total_difficulty, 21);
}

#[test]
fn out_of_range_response_is_rejected() {
    let answers = answer_all(1, 1).with_answer(3, 3);
    let err = Sdq.score(&answers, &ScoringOptions::default()).unwrap_err();
    match err {
        ScoringError::Validation(e) => {
            assert_eq!(e.item_id, 3);
            assert_eq!(e.value, 3);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn unknown_item_is_rejected() {
    let answers = answer_all(1, 1).with_answer(26, 1);
    let errors = Sdq.validate_answers(&answers);
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].item_id, 26);
    assert!(matches!(
        Sdq.score(&answers, &ScoringOptions::default()),
        Err(ScoringError::Validation(_))
    ));
}

#[test]
fn validation_runs_before_completeness() {
    let answers = AnswerSet::new().with_answer(1, 9);
    assert!(matches!(
        Sdq.score(&answers, &ScoringOptions::default()),
        Err(ScoringError::Validation(_))
    ));
}

#[test]
fn custom_thresholds_are_applied() {
    let options = ScoringOptions {
        thresholds: InterpretationThresholds::new(60.0, 80.0).unwrap(),
        ..Default::default()
    };
    let result = Sdq.score(&answer_all(1, 1), &options).unwrap();
    assert_eq!(result.percentage, 50.0);
    assert_eq!(result.interpretation, Interpretation::WithinNormalRange);
}

#[test]
fn structured_input_lists_every_scale() {
    let result = Sdq.score(&answer_all(1, 1), &ScoringOptions::default()).unwrap();
    let text = Sdq.to_structured_input(&result);
    assert!(text.starts_with("## SDQ"));
    assert!(text.contains("### Emotional Symptoms\n- Score: 5 / 10 (Moderate concern)"));
    assert!(text.contains("### Prosocial Behavior\n- Score: 5 / 10 (50%)"));
    assert!(text.contains("Total difficulty: 20 / 40 (50.0%)"));
    assert!(text.contains("Interpretation: Clinical Range"));
}

#[test]
fn registry_lookup() {
    assert_eq!(get_questionnaire("sdq").unwrap().name(), "SDQ");
    assert!(matches!(
        get_questionnaire("cbcl"),
        Err(ScoringError::UnknownQuestionnaire(id)) if id == "cbcl"
    ));
}

#[test]
fn answer_sets_deserialize_from_json_objects() {
    let answers: AnswerSet = serde_json::from_str(r#"{"1": 2, "7": 0}"#).unwrap();
    assert_eq!(answers.get(1), Some(2));
    assert_eq!(answers.get(7), Some(0));
    assert_eq!(answers.len(), 2);
}

#[test]
fn answer_values_outside_u8_name_the_item() {
    for (json, bad) in [
        (r#"{"1": 1, "3": 256}"#, serde_json::json!(256)),
        (r#"{"3": -1, "12": 1}"#, serde_json::json!(-1)),
        (r#"{"3": 1.5}"#, serde_json::json!(1.5)),
        (r#"{"3": "2"}"#, serde_json::json!("2")),
    ] {
        match AnswerSet::from_json(json) {
            Err(ScoringError::Validation(e)) => {
                assert_eq!(e.item_id, 3, "{json}");
                assert_eq!(e.value, bad, "{json}");
                assert!(e.message.contains("item 3"), "{}", e.message);
            }
            other => panic!("unexpected result for {json}: {other:?}"),
        }
    }
}

#[test]
fn answer_json_is_ordered_by_item_id() {
    // "10" sorts before "9" as text; the report names item 9.
    match AnswerSet::from_json(r#"{"10": 300, "9": 300}"#) {
        Err(ScoringError::Validation(e)) => assert_eq!(e.item_id, 9),
        other => panic!("unexpected result: {other:?}"),
    }

    let answers = AnswerSet::from_json(r#"{"1": 2, "7": 3}"#).unwrap();
    assert_eq!(answers.get(7), Some(3));
    assert!(matches!(
        AnswerSet::from_json(r#"{"one": 2}"#),
        Err(ScoringError::InvalidAnswerKey(key)) if key == "one"
    ));
    assert!(matches!(
        AnswerSet::from_json("[1, 2]"),
        Err(ScoringError::Parse(_))
    ));
}

#[test]
fn inverted_thresholds_are_refused_when_scoring() {
    let options = ScoringOptions {
        thresholds: InterpretationThresholds {
            borderline: 25.0,
            clinical: 20.0,
        },
        ..Default::default()
    };
    assert!(matches!(
        Sdq.score(&answer_all(1, 1), &options),
        Err(ScoringError::Config(CoreError::InvalidThresholds { .. }))
    ));
}
