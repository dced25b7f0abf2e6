use crate::{Engine, EngineConfig, EngineError, Shape, Status, TieBreak};

const TARGET: &str = "1. Q(id:100)(id:101)(id:102) 2. R(id:200)(id:201)";
const SOURCE: &str = "1. Q(id:101) 2. R(id:201)";

const CONFLICT_TARGET: &str = "1. A(id:100) 2. B(id:200)";
const CONFLICT_SOURCE: &str = "1. A(id:150)(id:100)(id:200) 2. B(id:151)(id:100)";

fn rich_target(questions: usize) -> String {
    (1..=questions)
        .map(|n| {
            let main = n * 100;
            format!("{n}. Question {n} (id:{main}) (id:{}) (id:{})", main + 1, main + 2)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn alternatives_map_back_to_target_mains() {
    let outcome = Engine::default().reconcile(TARGET, SOURCE).unwrap();

    assert_eq!(outcome.mapping.pairs(), vec![("101", "100"), ("201", "200")]);
    assert!(outcome.unresolved.is_empty());
    assert_eq!(outcome.changed, vec![1, 2]);
    assert!(outcome.uncovered_targets.is_empty());
}

#[test]
fn alternatives_map_the_same_under_either_shape() {
    for shape in [Shape::Rich, Shape::Poor] {
        let engine = Engine::new(EngineConfig::standard().with_shape(shape)).unwrap();
        let outcome = engine.reconcile(TARGET, SOURCE).unwrap();
        assert_eq!(outcome.mapping.pairs(), vec![("101", "100"), ("201", "200")]);
    }
}

#[test]
fn rich_conflict_loser_is_reported() {
    let engine = Engine::new(EngineConfig::standard().with_shape(Shape::Rich)).unwrap();
    let outcome = engine.reconcile(CONFLICT_TARGET, CONFLICT_SOURCE).unwrap();

    assert_eq!(outcome.mapping.get("150"), Some("100"));
    assert_eq!(outcome.mapping.get("151"), None);
    assert_eq!(outcome.unresolved, vec![2]);
    assert_eq!(outcome.positions[1].status, Status::Unresolved);
}

#[test]
fn poor_scheduling_avoids_the_conflict() {
    let engine = Engine::new(EngineConfig::standard().with_shape(Shape::Poor)).unwrap();
    let outcome = engine.reconcile(CONFLICT_TARGET, CONFLICT_SOURCE).unwrap();

    assert_eq!(outcome.mapping.pairs(), vec![("150", "200"), ("151", "100")]);
    assert!(outcome.unresolved.is_empty());
}

#[test]
fn later_position_policy_flips_the_winner() {
    let config = EngineConfig::standard()
        .with_shape(Shape::Rich)
        .with_tie_break(TieBreak::LaterPosition);
    let outcome = Engine::new(config)
        .unwrap()
        .reconcile(CONFLICT_TARGET, CONFLICT_SOURCE)
        .unwrap();

    assert_eq!(outcome.mapping.pairs(), vec![("150", "200"), ("151", "100")]);
}

#[test]
fn pinned_policy_from_toml() {
    let config = EngineConfig::from_toml_str(
        r#"
shape_override = "rich"

[tie_break]
policy = "pinned"
source_ids = ["151"]
"#,
    )
    .unwrap();
    let outcome = Engine::new(config)
        .unwrap()
        .reconcile(CONFLICT_TARGET, CONFLICT_SOURCE)
        .unwrap();

    assert_eq!(outcome.mapping.get("151"), Some("100"));
    assert_eq!(outcome.mapping.get("150"), Some("200"));
}

#[test]
fn exhausted_pass_cap_is_a_conflict_error() {
    let config = EngineConfig::standard()
        .with_shape(Shape::Rich)
        .with_max_passes(0);
    let err = Engine::new(config)
        .unwrap()
        .reconcile(CONFLICT_TARGET, CONFLICT_SOURCE)
        .unwrap_err();

    assert_eq!(err, EngineError::Conflict { unresolved: vec![2] });
}

#[test]
fn rich_document_is_classified_rich() {
    let target = rich_target(6);
    let source = "1. Question 1 (id:101)\n2. Question 2 (id:200)\n3. Question 3 (id:302)";
    let outcome = Engine::default().reconcile(&target, source).unwrap();

    assert_eq!(outcome.classification.shape, Shape::Rich);
    assert_eq!(outcome.correct, vec![2]);
    assert_eq!(outcome.mapping.pairs(), vec![("101", "100"), ("302", "300")]);
    assert_eq!(
        outcome.uncovered_targets,
        vec!["400".to_string(), "500".to_string(), "600".to_string()]
    );
}

#[test]
fn missing_structure_is_a_parse_error() {
    let err = Engine::default()
        .reconcile("no numbered questions here (id:1)", SOURCE)
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::Parse {
            message: "no numbered questions found".to_string()
        }
    );
}

#[test]
fn html_entities_are_decoded_before_segmenting() {
    let target = "1. Q&nbsp;&#40;id:100&#41; (id:101) 2. R (id:200)";
    let outcome = Engine::default().reconcile(target, SOURCE).unwrap();
    assert_eq!(outcome.mapping.get("101"), Some("100"));
}

#[test]
fn out_of_order_source_keeps_alternatives_with_their_question() {
    let outcome = Engine::default()
        .reconcile("1. A(id:11) 2. B(id:20)", "2. B(id:29) 1. A(id:19)(id:11)")
        .unwrap();

    assert_eq!(outcome.mapping.pairs(), vec![("19", "11")]);
    assert_eq!(outcome.unresolved, vec![2]);
    assert_eq!(outcome.positions[1].status, Status::Unresolved);
    assert_eq!(outcome.uncovered_targets, vec!["20".to_string()]);
}

#[test]
fn correct_position_names_the_matching_target_question() {
    let outcome = Engine::default()
        .reconcile("1. A(id:1) 2. B(id:2)", "1. B(id:2) 2. A(id:1)")
        .unwrap();

    assert_eq!(outcome.correct, vec![1, 2]);
    assert_eq!(
        outcome.positions[0].status,
        Status::Correct { target_position: 2 }
    );
    assert_eq!(
        outcome.positions[1].status,
        Status::Correct { target_position: 1 }
    );
    assert!(outcome
        .report()
        .to_string()
        .contains("Question #1: Already correct (ID:2) - matches target Q2"));
}
