//! Statement splitting and the INSERT grammar.
//!
//! Parsing happens in two stages. [`Parser::split_statements`] cuts the
//! submission on `;` without regard to quoting. [`Parser::parse_insert`] then
//! tokenizes the header of one statement and scans the value tuples.
//!
//! # Grammar
//!
//! ```text
//! statement := INSERT INTO <identifier> <anything>* VALUES <tuples>
//! tuples    := text containing one or more "(" <values> ")" groups
//! values    := <value> ("," <value>)*
//! ```
//!
//! Keywords are case-insensitive. Anything between the table name and the
//! first `VALUES` keyword (a column list, a constraint clause) is ignored.
//! Values are plain strings: they are trimmed and one layer of matching
//! quotes is removed. There is no escaping, so a comma or closing
//! parenthesis inside a quoted value still ends it.
//!
//! # Usage
//!
//! ```
//! use kennel_sql::parser::Parser;
//!
//! let stmts = Parser::split_statements("INSERT INTO dogs VALUES ('Pug','Max','3');;");
//! assert_eq!(stmts.len(), 1);
//!
//! let insert = Parser::parse_insert(stmts[0]).unwrap();
//! assert_eq!(insert.table, "dogs");
//! assert_eq!(insert.tuples, vec![vec!["Pug", "Max", "3"]]);
//! ```

use kennel_common::STATEMENT_SEPARATOR;
use thiserror::Error;

mod lexer;
mod statement;

pub use lexer::{is_word_char, Lexer, Token, TokenKind};
pub use statement::{extract_tuples, parse_value, InsertStatement};

/// Errors that can occur while parsing a statement.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseError {
    /// The statement does not begin with `INSERT INTO`.
    #[error("statement must begin with INSERT INTO")]
    NotAnInsert,

    /// The header is not `INSERT INTO <table> ... VALUES`.
    #[error("malformed statement, expected INSERT INTO <table> VALUES (...)")]
    Malformed,

    /// No parenthesized tuple follows `VALUES`.
    #[error("no value tuples found, expected (value1, value2, ...)")]
    NoTuples,
}

/// Result type for parsing operations.
pub type ParseResult<T> = Result<T, ParseError>;

/// Parser for the INSERT-only statement language.
pub struct Parser;

impl Parser {
    /// Splits a submission on `;`, trimming each piece and dropping empty ones.
    pub fn split_statements(sql: &str) -> Vec<&str> {
        sql.split(STATEMENT_SEPARATOR)
            .map(str::trim)
            .filter(|stmt| !stmt.is_empty())
            .collect()
    }

    /// Parses one statement.
    pub fn parse_insert(stmt: &str) -> ParseResult<InsertStatement> {
        let stmt = stmt.trim();
        if !starts_with_ignore_case(stmt, "INSERT INTO") {
            return Err(ParseError::NotAnInsert);
        }

        let mut tokens = Lexer::new(stmt);
        let table = match (tokens.next(), tokens.next(), tokens.next()) {
            (Some(insert), Some(into), Some(table))
                if insert.is_keyword("INSERT")
                    && into.is_keyword("INTO")
                    && table.kind == TokenKind::Word =>
            {
                table.text.to_string()
            }
            _ => return Err(ParseError::Malformed),
        };

        let values = tokens
            .find(|token| token.is_keyword("VALUES"))
            .ok_or(ParseError::Malformed)?;

        let tuples = extract_tuples(&stmt[values.end..]);
        if tuples.is_empty() {
            return Err(ParseError::NoTuples);
        }

        Ok(InsertStatement { table, tuples })
    }
}

fn starts_with_ignore_case(text: &str, prefix: &str) -> bool {
    text.get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}
