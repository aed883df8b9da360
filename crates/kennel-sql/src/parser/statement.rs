//! INSERT statement representation and value-tuple extraction.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A parsed `INSERT INTO <table> ... VALUES (...), (...)` statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsertStatement {
    /// Table identifier as written, not yet resolved against the catalog.
    pub table: String,
    /// Value tuples in source order.
    pub tuples: Vec<Vec<String>>,
}

impl InsertStatement {
    /// Returns the number of value tuples.
    pub fn tuple_count(&self) -> usize {
        self.tuples.len()
    }
}

impl fmt::Display for InsertStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "INSERT INTO {} VALUES ", self.table)?;
        for (i, tuple) in self.tuples.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "({})", tuple.join(", "))?;
        }
        Ok(())
    }
}

/// Extracts every parenthesized group from `section`.
///
/// A group runs from an opening parenthesis to the next closing one and must
/// be non-empty. Nested opening parentheses are kept as part of the content.
/// Each group is split on commas; see [`parse_value`] for value cleanup.
pub fn extract_tuples(section: &str) -> Vec<Vec<String>> {
    let mut tuples = Vec::new();
    let mut cursor = 0;

    while let Some(open) = section[cursor..].find('(').map(|i| cursor + i) {
        let body_start = open + 1;
        let Some(close) = section[body_start..].find(')').map(|i| body_start + i) else {
            break;
        };

        if close == body_start {
            // "()" is not a tuple; retry from the next character.
            cursor = body_start;
            continue;
        }

        tuples.push(
            section[body_start..close]
                .split(',')
                .map(parse_value)
                .collect(),
        );
        cursor = close + 1;
    }

    tuples
}

/// Trims a raw value and strips one layer of matching quotes.
pub fn parse_value(raw: &str) -> String {
    let value = raw.trim();
    let quoted = value.len() >= 2
        && ((value.starts_with('\'') && value.ends_with('\''))
            || (value.starts_with('"') && value.ends_with('"')));
    if quoted {
        value[1..value.len() - 1].to_string()
    } else {
        value.to_string()
    }
}
