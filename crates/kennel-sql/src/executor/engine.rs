//! Statement interpreter.
//!
//! The engine never mutates the snapshots it is given. [`Engine::execute`]
//! clones the store (cheap, tables are shared until written), threads the
//! working copy through every statement, and hands the result back.

use std::time::Instant;

use kennel_common::RowId;
use kennel_index::{BPlusTree, IndexBuilder, IndexConfig, IndexResult};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::error::{StatementError, StatementResult};
use super::result::{ExecutionRecord, ExecutionResult, RowMap, SearchResult, StatementOutcome};
use crate::parser::Parser;
use crate::storage::{Catalog, Store, TableInfo, UniqueConstraint};

/// Engine configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Settings for every index rebuild.
    pub index: IndexConfig,
}

impl EngineConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the index configuration.
    pub fn with_index(mut self, index: IndexConfig) -> Self {
        self.index = index;
        self
    }
}

/// Interpreter for INSERT statements over the owners and dogs tables.
#[derive(Debug, Clone, Default)]
pub struct Engine {
    catalog: Catalog,
    builder: IndexBuilder,
}

impl Engine {
    /// Creates an engine with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an engine, validating the index configuration.
    pub fn with_config(config: EngineConfig) -> IndexResult<Self> {
        Ok(Self {
            catalog: Catalog::new(),
            builder: IndexBuilder::new(config.index)?,
        })
    }

    /// Returns the catalog.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Returns the index configuration used for rebuilds.
    pub fn index_config(&self) -> &IndexConfig {
        self.builder.config()
    }

    /// Returns the seed store and its index.
    pub fn initial_state(&self) -> (Store, BPlusTree) {
        let store = Store::seed();
        let index = self.rebuild_index(&store);
        (store, index)
    }

    /// Executes every statement in `sql` in order.
    ///
    /// Statements are independent: a rejected statement or tuple never undoes
    /// rows stored before it. The returned store and index are present only
    /// if at least one row was stored.
    pub fn execute(&self, sql: &str, store: &Store, index: &BPlusTree) -> ExecutionResult {
        let start = Instant::now();
        let mut working = store.clone();
        let mut rebuilt = None;
        let mut records = Vec::new();
        let mut applied = 0;

        let statements = Parser::split_statements(sql);
        for stmt in &statements {
            let outcome = self.execute_statement(stmt, &mut working);
            applied += outcome.applied;
            if outcome.index.is_some() {
                rebuilt = outcome.index;
            }
            records.extend(outcome.records);
        }

        debug!(
            statements = statements.len(),
            records = records.len(),
            applied,
            "executed submission"
        );

        let mutated = applied > 0;
        ExecutionResult {
            records,
            store: mutated.then_some(working),
            index: mutated.then(|| rebuilt.unwrap_or_else(|| index.clone())),
            elapsed: start.elapsed(),
        }
    }

    /// Executes one statement against a working store.
    ///
    /// Every tuple is validated and stored on its own, and later tuples see
    /// the rows stored by earlier ones. When the indexed table gains a row
    /// the index is rebuilt from the table's full content.
    pub fn execute_statement(&self, stmt: &str, store: &mut Store) -> StatementOutcome {
        let stmt = stmt.trim();

        let insert = match Parser::parse_insert(stmt) {
            Ok(insert) => insert,
            Err(e) => {
                let err = StatementError::from(e);
                debug!(error = %err, "rejected statement");
                return StatementOutcome::rejected(stmt, &err);
            }
        };

        let Some(info) = self.catalog.resolve(&insert.table) else {
            let err = StatementError::Schema(insert.table);
            debug!(error = %err, "rejected statement");
            return StatementOutcome::rejected(stmt, &err);
        };

        let mut outcome = StatementOutcome::default();
        for values in insert.tuples {
            let command = format!("INSERT INTO {} VALUES ({})", info.name, values.join(", "));

            match self.insert_tuple(info, values, store) {
                Ok(assigned_id) => {
                    debug!(table = %info.name, id = ?assigned_id, "stored row");
                    let message = match assigned_id {
                        Some(id) => {
                            format!("inserted into {} with {} {id}", info.name, info.columns[0])
                        }
                        None => format!("inserted into {}", info.name),
                    };
                    outcome
                        .records
                        .push(ExecutionRecord::success(command, message, assigned_id));
                    outcome.applied += 1;

                    if info.index_column.is_some() {
                        outcome.index = Some(self.rebuild_index(store));
                    }
                }
                Err(err) => {
                    debug!(table = %info.name, error = %err, "rejected tuple");
                    outcome.records.push(ExecutionRecord::failure(command, &err));
                }
            }
        }

        outcome
    }

    /// Validates one tuple and appends it to its table.
    ///
    /// Returns the assigned ID for auto-increment tables.
    fn insert_tuple(
        &self,
        info: &TableInfo,
        values: Vec<String>,
        store: &mut Store,
    ) -> StatementResult<Option<RowId>> {
        let table = store.table(info.name);

        // Auto-increment tables take a fixed column list; others are checked
        // against the stored header.
        let columns = if info.auto_increment {
            info.input_columns()
        } else {
            table.header()
        };
        if values.len() != columns.len() {
            return Err(StatementError::Arity {
                table: info.name,
                expected: columns.len(),
                received: values.len(),
                columns: columns.join(", "),
            });
        }

        let mut row = Vec::with_capacity(values.len() + 1);
        if info.auto_increment {
            row.push(String::new());
        }
        row.extend(values);

        for constraint in &info.unique {
            if table.rows().iter().any(|existing| constraint.conflicts(existing, &row)) {
                return Err(StatementError::Uniqueness {
                    table: info.name,
                    conflict: describe_conflict(constraint, info, &row),
                });
            }
        }

        let assigned_id = if info.auto_increment {
            let id = table.next_row_id().ok_or_else(|| StatementError::IdExhausted {
                table: info.name,
                column: info.columns[0].clone(),
                last: RowId::new(u64::MAX),
            })?;
            row[0] = id.to_string();
            Some(id)
        } else {
            None
        };

        store.table_mut(info.name).push_row(row);
        Ok(assigned_id)
    }

    /// Builds a fresh index over the indexed table.
    pub fn rebuild_index(&self, store: &Store) -> BPlusTree {
        let info = self.catalog.indexed_table();
        let table = store.table(info.name);
        let Some(column) = info.index_column else {
            return self.builder.build_from_rows(std::iter::empty());
        };

        self.builder.build_from_rows(
            table
                .rows()
                .iter()
                .filter_map(|row| Some((row.first()?.as_str(), row.get(column)?.as_str()))),
        )
    }

    /// Looks up `term` in the index and materializes the matching rows.
    ///
    /// Rows are returned in table order, each keyed by the table header.
    pub fn search(&self, term: &str, index: &BPlusTree, store: &Store) -> SearchResult {
        let term = term.trim();
        let outcome = index.search(term);
        let table = store.table(self.catalog.indexed_table().name);

        let rows: Vec<RowMap> = table
            .rows()
            .iter()
            .filter(|row| {
                row.first()
                    .and_then(|cell| cell.parse::<RowId>().ok())
                    .is_some_and(|id| outcome.row_ids.contains(&id))
            })
            .map(|row| RowMap::from_row(table.header(), row))
            .collect();

        debug!(term, ids = outcome.row_ids.len(), rows = rows.len(), "searched index");

        SearchResult {
            row_ids: outcome.row_ids,
            rows,
            trace: outcome.trace,
        }
    }
}

/// Names the values that collide, e.g. `dog_name 'Rex' already exists for owner_id 1`.
fn describe_conflict(constraint: &UniqueConstraint, info: &TableInfo, row: &[String]) -> String {
    let mut parts = constraint.columns.iter().map(|column| {
        let name = info.columns.get(column.index).map_or("?", String::as_str);
        let value = row.get(column.index).map_or("", String::as_str);
        (name, value)
    });

    let mut description = match parts.next() {
        Some((name, value)) => format!("{name} '{value}' already exists"),
        None => return "duplicate row".to_string(),
    };
    let rest: Vec<String> = parts.map(|(name, value)| format!("{name} {value}")).collect();
    if !rest.is_empty() {
        description.push_str(" for ");
        description.push_str(&rest.join(" and "));
    }
    description
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::ErrorKind;
    use crate::storage::TableName;
    use kennel_index::{SplitPolicy, StepKind};

    fn seeded() -> (Engine, Store, BPlusTree) {
        let engine = Engine::new();
        let (store, index) = engine.initial_state();
        (engine, store, index)
    }

    #[test]
    fn test_seed_scenario() {
        let (engine, store, index) = seeded();

        let result = engine.execute(
            "INSERT INTO Perros VALUES ('Labrador','Buddy2','1');",
            &store,
            &index,
        );

        assert_eq!(result.records.len(), 1);
        let record = &result.records[0];
        assert!(record.success, "{}", record.message);
        assert_eq!(record.assigned_id, Some(RowId::new(104)));
        assert_eq!(record.command, "INSERT INTO dogs VALUES (Labrador, Buddy2, 1)");

        let store = result.store.unwrap();
        let index = result.index.unwrap();
        let found = engine.search("Labrador", &index, &store);
        assert_eq!(found.row_ids, vec![RowId::new(101), RowId::new(104)]);
        assert_eq!(found.rows.len(), 2);
        assert_eq!(found.rows[1].get("dog_name"), Some("Buddy2"));
        assert_eq!(found.rows[1].get("dog_id"), Some("104"));
    }

    #[test]
    fn test_input_snapshot_untouched() {
        let (engine, store, index) = seeded();
        let before_store = store.clone();
        let before_index = index.clone();

        let result = engine.execute(
            "INSERT INTO dogs VALUES ('Pug','Max','3'); INSERT INTO owners VALUES (4, 'Ana')",
            &store,
            &index,
        );

        assert!(result.is_mutated());
        assert_eq!(store, before_store);
        assert_eq!(index, before_index);
    }

    #[test]
    fn test_no_mutation_returns_no_snapshots() {
        let (engine, store, index) = seeded();
        let result = engine.execute("INSERT INTO cats VALUES ('x')", &store, &index);

        assert!(!result.is_mutated());
        assert!(result.index.is_none());
        assert_eq!(result.records[0].error, Some(ErrorKind::Schema));
        assert_eq!(result.records[0].command, "INSERT INTO cats VALUES ('x')");
    }

    #[test]
    fn test_empty_submission() {
        let (engine, store, index) = seeded();
        let result = engine.execute("  ;; ", &store, &index);
        assert!(result.records.is_empty());
        assert!(!result.is_mutated());
    }

    #[test]
    fn test_owner_insert_keeps_index() {
        let (engine, store, index) = seeded();
        let result = engine.execute("INSERT INTO duenos VALUES (4, 'Ana Ruiz')", &store, &index);

        assert_eq!(result.success_count(), 1);
        assert_eq!(result.records[0].assigned_id, None);
        let new_store = result.store.unwrap();
        assert_eq!(
            new_store.table(TableName::Owners).rows()[3],
            vec!["4", "Ana Ruiz"]
        );
        assert_eq!(result.index.unwrap(), index);
    }

    #[test]
    fn test_owner_arity() {
        let (engine, store, index) = seeded();
        let result = engine.execute("INSERT INTO owners VALUES ('Ana Ruiz')", &store, &index);

        assert_eq!(result.records[0].error, Some(ErrorKind::Arity));
        assert_eq!(
            result.records[0].message,
            "column count mismatch for owners: expected 2 values (owner_id, owner_name), received 1"
        );
    }

    #[test]
    fn test_dog_arity() {
        let (engine, store, index) = seeded();
        let result = engine.execute(
            "INSERT INTO dogs VALUES ('105', 'Pug', 'Max', '3'), ('Pug')",
            &store,
            &index,
        );

        assert_eq!(result.failure_count(), 2);
        assert!(result
            .records
            .iter()
            .all(|r| r.error == Some(ErrorKind::Arity)));
    }

    #[test]
    fn test_uniqueness_message() {
        let (engine, store, index) = seeded();
        let sql = "INSERT INTO dogs VALUES ('Poodle','BUDDY','1')";
        let result = engine.execute(sql, &store, &index);

        let record = &result.records[0];
        assert_eq!(record.error, Some(ErrorKind::Uniqueness));
        assert_eq!(
            record.message,
            "uniqueness violation in dogs: dog_name 'BUDDY' already exists for owner_id 1"
        );
    }

    #[test]
    fn test_same_name_other_owner_allowed() {
        let (engine, store, index) = seeded();
        let sql = "INSERT INTO dogs VALUES ('Poodle','Buddy','2')";
        let result = engine.execute(sql, &store, &index);
        assert!(result.records[0].success);
    }

    #[test]
    fn test_syntax_errors() {
        let (engine, store, index) = seeded();
        let result = engine.execute(
            "DELETE FROM dogs; INSERT INTO dogs ('a','b','1'); INSERT INTO dogs VALUES nothing",
            &store,
            &index,
        );

        assert_eq!(result.records.len(), 3);
        assert!(result
            .records
            .iter()
            .all(|r| r.error == Some(ErrorKind::Syntax)));
        assert_eq!(result.records[0].command, "DELETE FROM dogs");
    }

    #[test]
    fn test_auto_increment_on_empty_table() {
        let engine = Engine::new();
        let store = Store::new(engine.catalog());
        let index = engine.rebuild_index(&store);

        let result = engine.execute(
            "INSERT INTO dogs VALUES ('Pug','Max','1'), ('Akita','Hana','1')",
            &store,
            &index,
        );
        assert_eq!(result.assigned_ids(), vec![RowId::new(1), RowId::new(2)]);
    }

    #[test]
    fn test_auto_increment_unparsable_last_id() {
        let engine = Engine::new();
        let store = Store::from_texts([
            ("owners", "owner_id,owner_name"),
            ("dogs", "dog_id,breed,dog_name,owner_id\nabc,Pug,Max,1"),
        ])
        .unwrap();
        let index = engine.rebuild_index(&store);
        assert!(index.is_empty());

        let sql = "INSERT INTO dogs VALUES ('Akita','Hana','1')";
        let result = engine.execute(sql, &store, &index);
        assert_eq!(result.assigned_ids(), vec![RowId::FIRST]);
    }

    #[test]
    fn test_auto_increment_stops_at_max_id() {
        let engine = Engine::new();
        let dogs = format!("dog_id,breed,dog_name,owner_id\n{},Pug,Max,1", u64::MAX);
        let store = Store::from_texts([("owners", "owner_id,owner_name"), ("dogs", dogs.as_str())])
            .unwrap();
        let index = engine.rebuild_index(&store);

        let sql = "INSERT INTO dogs VALUES ('Pug','Rex','1'); INSERT INTO owners VALUES (1, 'Ana')";
        let result = engine.execute(sql, &store, &index);

        assert_eq!(result.records.len(), 2);
        assert!(!result.records[0].success);
        assert_eq!(result.records[0].error, Some(ErrorKind::IdExhausted));
        assert!(result.records[0].assigned_id.is_none());
        assert!(result.records[1].success);

        let store = result.store.unwrap();
        assert_eq!(store.table(TableName::Dogs).len(), 1);
        assert_eq!(result.index.unwrap().get("Pug"), Some(&[RowId::new(u64::MAX)][..]));
    }

    #[test]
    fn test_search_missing_breed() {
        let (engine, store, index) = seeded();
        let found = engine.search("  Poodle ", &index, &store);

        assert!(found.row_ids.is_empty());
        assert!(found.rows.is_empty());
        assert_eq!(found.trace.count(StepKind::Root), 1);
    }

    #[test]
    fn test_strict_engine() {
        let config = EngineConfig::new().with_index(
            IndexConfig::new()
                .with_order(3)
                .with_split_policy(SplitPolicy::Recursive),
        );
        let engine = Engine::with_config(config).unwrap();
        let (store, index) = engine.initial_state();

        let sql: Vec<String> = (0..20)
            .map(|i| format!("INSERT INTO dogs VALUES ('Breed{i:02}','Dog{i}','2')"))
            .collect();
        let result = engine.execute(&sql.join(";"), &store, &index);

        assert_eq!(result.success_count(), 20);
        let index = result.index.unwrap();
        assert_eq!(index.order(), 3);
        assert!(index.height() > 2);
        assert!(index.check_invariants().is_ok());
    }

    #[test]
    fn test_with_config_rejects_bad_order() {
        let config = EngineConfig::new().with_index(IndexConfig::new().with_order(0));
        assert!(Engine::with_config(config).is_err());
    }

    #[test]
    fn test_engine_config_serde() {
        let config: EngineConfig =
            serde_json::from_str(r#"{"index": {"order": 5, "split_policy": "recursive"}}"#).unwrap();
        assert_eq!(config.index.order, 5);
        assert_eq!(config.index.split_policy, SplitPolicy::Recursive);

        let config: EngineConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, EngineConfig::default());
    }
}
