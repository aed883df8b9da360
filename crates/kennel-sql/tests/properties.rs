//! Invariants that hold across any sequence of submissions.

use std::collections::{BTreeMap, BTreeSet};

use kennel_common::{RowId, BREED_COLUMN, DOG_ID_COLUMN};
use kennel_index::{IndexConfig, SplitPolicy, StepKind};
use kennel_sql::{Engine, EngineConfig, ErrorKind, Store, TableName};

const BREEDS: [&str; 7] = [
    "Labrador", "Beagle", "Bulldog", "Poodle", "Akita", "Boxer", "Dachshund",
];

/// Runs `sql` and returns the new snapshots, keeping the old ones if nothing changed.
fn apply(
    engine: &Engine,
    sql: &str,
    store: Store,
    index: kennel_index::BPlusTree,
) -> (Store, kennel_index::BPlusTree, kennel_sql::ExecutionResult) {
    let result = engine.execute(sql, &store, &index);
    let store = result.store.clone().unwrap_or(store);
    let index = result.index.clone().unwrap_or(index);
    (store, index, result)
}

fn ids_by_breed(store: &Store) -> BTreeMap<String, BTreeSet<RowId>> {
    let mut expected: BTreeMap<String, BTreeSet<RowId>> = BTreeMap::new();
    for row in store.table(TableName::Dogs).rows() {
        let id: RowId = row[DOG_ID_COLUMN].parse().unwrap();
        expected
            .entry(row[BREED_COLUMN].clone())
            .or_default()
            .insert(id);
    }
    expected
}

fn bulk_statement(start: usize, count: usize) -> String {
    let tuples: Vec<String> = (start..start + count)
        .map(|i| format!("('{}', 'Dog{i}', '{}')", BREEDS[i % BREEDS.len()], i % 3 + 1))
        .collect();
    format!("INSERT INTO perros VALUES {};", tuples.join(", "))
}

#[test]
fn test_index_matches_store_after_inserts() {
    let engine = Engine::new();
    let (mut store, mut index) = engine.initial_state();

    for batch in 0..6 {
        let (s, i, result) = apply(&engine, &bulk_statement(batch * 5, 5), store, index);
        assert_eq!(result.success_count(), 5);
        store = s;
        index = i;

        for (breed, ids) in ids_by_breed(&store) {
            let found: BTreeSet<RowId> = index.search(&breed).row_ids.into_iter().collect();
            assert_eq!(found, ids, "breed {breed} after batch {batch}");
        }
    }

    assert_eq!(index.len(), BREEDS.len());
    assert!(index.check_invariants().is_ok());
}

#[test]
fn test_index_matches_store_in_strict_mode() {
    let config = EngineConfig::new().with_index(
        IndexConfig::new()
            .with_order(3)
            .with_split_policy(SplitPolicy::Recursive),
    );
    let engine = Engine::with_config(config).unwrap();
    let (store, index) = engine.initial_state();

    let sql: Vec<String> = (0..40)
        .map(|i| format!("INSERT INTO dogs VALUES ('Breed{:02}', 'Dog{i}', '1')", (i * 7) % 40))
        .collect();
    let (store, index, result) = apply(&engine, &sql.join(";\n"), store, index);
    assert_eq!(result.success_count(), 40);

    for (breed, ids) in ids_by_breed(&store) {
        let found: BTreeSet<RowId> = index.search(&breed).row_ids.into_iter().collect();
        assert_eq!(found, ids, "breed {breed}");
    }
    assert!(index.check_invariants().is_ok());
}

#[test]
fn test_assigned_ids_strictly_increase() {
    let engine = Engine::new();
    let (store, index) = engine.initial_state();

    let sql = format!(
        "{} INSERT INTO owners VALUES (4, 'Ana'); {} INSERT INTO dogs VALUES ('Pug');",
        bulk_statement(0, 3),
        bulk_statement(3, 4)
    );
    let (_, _, result) = apply(&engine, &sql, store, index);

    let ids: Vec<u64> = result.assigned_ids().iter().map(|id| id.as_u64()).collect();
    assert_eq!(ids, (104..=110).collect::<Vec<_>>());
    assert_eq!(result.failure_count(), 1);
}

#[test]
fn test_assigned_ids_continue_across_submissions() {
    let engine = Engine::new();
    let (store, index) = engine.initial_state();

    let (store, index, first) = apply(&engine, &bulk_statement(0, 2), store, index);
    let (_, _, second) = apply(&engine, &bulk_statement(2, 2), store, index);

    assert_eq!(first.assigned_ids(), vec![RowId::new(104), RowId::new(105)]);
    assert_eq!(second.assigned_ids(), vec![RowId::new(106), RowId::new(107)]);
}

#[test]
fn test_uniqueness_within_one_submission() {
    let engine = Engine::new();
    let (store, index) = engine.initial_state();

    let (store, _, result) = apply(
        &engine,
        "INSERT INTO dogs VALUES ('Boxer','Rex','1'); INSERT INTO dogs VALUES ('Akita','rex','1');",
        store,
        index,
    );

    assert!(result.records[0].success);
    assert_eq!(result.records[1].error, Some(ErrorKind::Uniqueness));
    let rex = store
        .table(TableName::Dogs)
        .rows()
        .iter()
        .filter(|row| row[2].eq_ignore_ascii_case("rex") && row[3] == "1")
        .count();
    assert_eq!(rex, 1);
}

#[test]
fn test_uniqueness_across_submissions() {
    let engine = Engine::new();
    let (store, index) = engine.initial_state();
    let sql = "INSERT INTO dogs VALUES ('Boxer','Rex','1')";

    let (store, index, first) = apply(&engine, sql, store, index);
    let (store, _, second) = apply(&engine, sql, store, index);

    assert!(first.records[0].success);
    assert!(!second.records[0].success);
    assert_eq!(second.records[0].error, Some(ErrorKind::Uniqueness));
    assert!(second.store.is_none());
    assert_eq!(store.table(TableName::Dogs).len(), 4);
}

#[test]
fn test_partial_bulk_success() {
    let engine = Engine::new();
    let (store, index) = engine.initial_state();

    let result = engine.execute(
        "INSERT INTO Perros VALUES ('Labrador','A','1'), ('Labrador','A','1'), ('Beagle','C','2');",
        &store,
        &index,
    );

    let outcome: Vec<(bool, Option<u64>, Option<ErrorKind>)> = result
        .records
        .iter()
        .map(|r| (r.success, r.assigned_id.map(RowId::as_u64), r.error))
        .collect();
    assert_eq!(
        outcome,
        vec![
            (true, Some(104), None),
            (false, None, Some(ErrorKind::Uniqueness)),
            (true, Some(105), None),
        ]
    );

    let new_store = result.store.unwrap();
    assert_eq!(
        new_store.table(TableName::Dogs).len(),
        store.table(TableName::Dogs).len() + 2
    );
}

#[test]
fn test_mixed_submission_keeps_only_valid_rows() {
    let engine = Engine::new();
    let (store, index) = engine.initial_state();

    let result = engine.execute(
        "INSERT INTO dogs VALUES ('Pug','Max','3'), ('bad'); \
         UPDATE dogs SET x = 1; \
         INSERT INTO cats VALUES (1); \
         INSERT INTO owners VALUES (4, 'Ana'), (5); \
         INSERT INTO dogs VALUES ('Pug','Max','3'), ('Akita','Hana','2')",
        &store,
        &index,
    );

    let kinds: Vec<Option<ErrorKind>> = result.records.iter().map(|r| r.error).collect();
    assert_eq!(
        kinds,
        vec![
            None,
            Some(ErrorKind::Arity),
            Some(ErrorKind::Syntax),
            Some(ErrorKind::Schema),
            None,
            Some(ErrorKind::Arity),
            Some(ErrorKind::Uniqueness),
            None,
        ]
    );

    let new_store = result.store.unwrap();
    assert_eq!(new_store.table(TableName::Dogs).len(), 5);
    assert_eq!(new_store.table(TableName::Owners).len(), 4);
}

#[test]
fn test_trace_shape() {
    let engine = Engine::new();
    let (store, index) = engine.initial_state();
    let (store, index, _) = apply(&engine, &bulk_statement(0, 12), store, index);
    assert!(index.height() >= 2);

    let mut terms: Vec<String> = ids_by_breed(&store).into_keys().collect();
    terms.push("Missing".to_string());

    for term in terms {
        let trace = engine.search(&term, &index, &store).trace;
        let kinds: Vec<StepKind> = trace.iter().map(|s| s.kind).collect();

        assert_eq!(kinds[0], StepKind::Root, "{term}");
        assert_eq!(trace.count(StepKind::Root), 1);
        let first_leaf = kinds.iter().position(|k| *k == StepKind::Leaf).unwrap();
        assert!(kinds[first_leaf..].iter().all(|k| *k == StepKind::Leaf));
        assert!(kinds[1..first_leaf].iter().all(|k| *k == StepKind::Internal));
        assert_eq!(trace.count(StepKind::Internal), index.height() - 1);
    }
}

#[test]
fn test_rebuild_is_idempotent() {
    let engine = Engine::new();
    let (store, index) = engine.initial_state();
    let (store, _, _) = apply(&engine, &bulk_statement(0, 20), store, index);

    let first = engine.rebuild_index(&store);
    let second = engine.rebuild_index(&store);

    for breed in ids_by_breed(&store).keys() {
        assert_eq!(first.search(breed).row_ids, second.search(breed).row_ids);
    }
    assert_eq!(first.keys(), second.keys());
}
