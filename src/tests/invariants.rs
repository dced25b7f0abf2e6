use std::collections::HashSet;

use crate::{Engine, EngineConfig, NullSink, Shape, Status};

/// Target/source pairs with overlapping alternatives, single ids and
/// unmatched questions.
fn cases() -> Vec<(&'static str, &'static str)> {
    vec![
        (
            "1. A(id:100)(id:101)(id:102) 2. B(id:200)(id:201)",
            "1. A(id:101) 2. B(id:201)",
        ),
        (
            "1. A(id:100) 2. B(id:200)",
            "1. A(id:150)(id:100)(id:200) 2. B(id:151)(id:100)",
        ),
        (
            "1. A(id:1) 2. B(id:2) 3. C(id:3) 4. D(id:4) 5. E(id:5) 6. F(id:6)",
            "1. A(id:9)(id:1)(id:2) 2. B(id:8)(id:1) 3. C(id:7)(id:1)(id:2)(id:3) 4. D(id:4) 5. E(id:6)(id:5)",
        ),
        (
            "1. A(id:10)(id:11)(id:12) 2. B(id:20)(id:11)(id:21) 3. C(id:30)(id:31)(id:32) 4. D(id:40)(id:41)(id:42) 5. E(id:50)(id:51)(id:52)",
            "1. A(id:11) 2. B(id:21)(id:11) 3. C(id:99) 4. D(id:42)(id:31) 5. E(id:50)",
        ),
    ]
}

#[test]
fn final_mapping_is_injective() {
    for shape in [Shape::Rich, Shape::Poor] {
        let engine = Engine::new(EngineConfig::standard().with_shape(shape)).unwrap();
        for (target, source) in cases() {
            let outcome = engine.reconcile(target, source).unwrap();
            let targets: Vec<&str> = outcome
                .mapping
                .entries()
                .iter()
                .map(|e| e.target_id.as_str())
                .collect();
            let distinct: HashSet<&str> = targets.iter().copied().collect();
            assert_eq!(targets.len(), distinct.len(), "{shape}: {target} / {source}");
        }
    }
}

#[test]
fn every_position_lands_in_exactly_one_partition() {
    let engine = Engine::default();
    for (target, source) in cases() {
        let outcome = engine.reconcile(target, source).unwrap();
        for line in &outcome.positions {
            let p = line.position;
            let memberships = [
                outcome.correct.contains(&p),
                outcome.changed.contains(&p),
                outcome.unresolved.contains(&p),
            ];
            assert_eq!(
                memberships.iter().filter(|m| **m).count(),
                1,
                "position {p} in {target} / {source}"
            );
        }
    }
}

#[test]
fn correct_ids_never_move() {
    let engine = Engine::default();
    for (target, source) in cases() {
        let outcome = engine.reconcile(target, source).unwrap();
        for line in &outcome.positions {
            if matches!(line.status, Status::Correct { .. }) {
                assert_eq!(outcome.mapping.entry_at(line.position), None);
                assert_eq!(outcome.mapping.get(&line.current_id), None);
            }
        }
        // No change points at an id a correct question still holds.
        let kept: HashSet<&str> = outcome
            .positions
            .iter()
            .filter(|l| matches!(l.status, Status::Correct { .. }))
            .map(|l| l.current_id.as_str())
            .collect();
        assert!(outcome
            .mapping
            .entries()
            .iter()
            .all(|e| !kept.contains(e.target_id.as_str())));
    }
}

#[test]
fn identical_documents_need_no_changes() {
    let text = "1. A(id:1)(id:11) 2. B(id:2)(id:22) 3. C(id:3)";
    let outcome = Engine::default().reconcile(text, text).unwrap();

    assert!(outcome.mapping.is_empty());
    assert_eq!(outcome.correct, vec![1, 2, 3]);
    assert_eq!(outcome.summary().success_percent, 100.0);
}

#[test]
fn reconcile_is_deterministic() {
    let engine = Engine::default();
    for (target, source) in cases() {
        let first = serde_json::to_string(&engine.reconcile(target, source).unwrap()).unwrap();
        let second = serde_json::to_string(&engine.reconcile(target, source).unwrap()).unwrap();
        assert_eq!(first, second);
    }
}

#[test]
fn sink_choice_does_not_change_the_result() {
    let engine = Engine::default();
    for (target, source) in cases() {
        let collected = engine.reconcile(target, source).unwrap();
        let silent = engine.reconcile_with_sink(target, source, &mut NullSink).unwrap();
        assert_eq!(collected.mapping, silent.mapping);
        assert_eq!(collected.unresolved, silent.unresolved);
    }
}

#[test]
fn classification_threshold_is_exclusive() {
    // Five questions, two ids each: exactly 2.0 on average stays poor.
    let two_each = "1. A(id:1)(id:2) 2. B(id:3)(id:4) 3. C(id:5)(id:6) 4. D(id:7)(id:8) 5. E(id:9)(id:10)";
    let outcome = Engine::default().reconcile(two_each, "1. A(id:1)").unwrap();
    assert_eq!(outcome.classification.shape, Shape::Poor);

    // One extra id tips it over.
    let tipped = "1. A(id:1)(id:2)(id:0) 2. B(id:3)(id:4) 3. C(id:5)(id:6) 4. D(id:7)(id:8) 5. E(id:9)(id:10)";
    let outcome = Engine::default().reconcile(tipped, "1. A(id:1)").unwrap();
    assert_eq!(outcome.classification.shape, Shape::Rich);
}

#[test]
fn short_documents_are_unknown_unless_id_heavy() {
    let short = "1. A(id:1) 2. B(id:2)";
    let outcome = Engine::default().reconcile(short, short).unwrap();
    assert_eq!(outcome.classification.shape, Shape::Unknown);

    let id_heavy = "1. A(id:1)(id:2)(id:3)(id:4)(id:5) 2. B(id:6)(id:7)(id:8)(id:9)(id:10)";
    let outcome = Engine::default().reconcile(id_heavy, short).unwrap();
    assert_eq!(outcome.classification.shape, Shape::Poor);
}
