//! Special backslash commands for the REPL.
//!
//! Provides commands like `\dt`, `\search`, `\tree`, `\q`, etc.

use std::path::Path;

use anyhow::Result;
use kennel_sql::TableName;

use crate::formatter::{self, OutputFormat};
use crate::repl::Repl;

/// Result of executing a command.
#[derive(Debug)]
pub enum CommandResult {
    /// Continue the REPL.
    Continue,
    /// Exit the REPL.
    Exit,
    /// Output a message.
    Output(String),
    /// Toggle timing mode.
    ToggleTiming,
    /// Set output format.
    SetFormat(OutputFormat),
}

/// A parsed command.
#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    /// Quit the REPL.
    Quit,
    /// Show help.
    Help,
    /// List tables.
    ListTables,
    /// Show a table's rows.
    Describe(Option<String>),
    /// Search the breed index.
    Search(String),
    /// Show the index structure.
    Tree,
    /// Return to the seed tables.
    Reset,
    /// Write the snapshot file.
    Save,
    /// Write a table's text to a file.
    Export(Option<(String, String)>),
    /// Toggle timing.
    Timing,
    /// Set output format.
    Format(String),
    /// Execute a file.
    Include(String),
    /// Unknown command.
    Unknown(String),
}

impl Command {
    /// Parses a command string.
    pub fn parse(input: &str) -> Self {
        let input = input.trim();
        let cmd = input.strip_prefix('\\').unwrap_or(input);

        let (name, args) = match cmd.split_once(char::is_whitespace) {
            Some((name, args)) => (name, args.trim()),
            None => (cmd, ""),
        };
        let name = name.to_lowercase();
        let arg = (!args.is_empty()).then(|| args.to_string());

        match name.as_str() {
            "q" | "quit" | "exit" => Command::Quit,
            "?" | "h" | "help" => Command::Help,
            "dt" | "tables" => Command::ListTables,
            "d" => Command::Describe(arg),
            "search" | "s" => Command::Search(args.to_string()),
            "tree" => Command::Tree,
            "reset" => Command::Reset,
            "save" => Command::Save,
            "export" => Command::Export(
                args.split_once(char::is_whitespace)
                    .map(|(table, path)| (table.to_string(), path.trim().to_string())),
            ),
            "timing" | "t" => Command::Timing,
            "format" | "f" => Command::Format(arg.unwrap_or_else(|| "table".to_string())),
            "i" | "include" => Command::Include(args.to_string()),
            _ => Command::Unknown(name),
        }
    }

    /// Executes the command.
    pub fn execute(&self, repl: &mut Repl) -> Result<CommandResult> {
        match self {
            Command::Quit => Ok(CommandResult::Exit),

            Command::Help => Ok(CommandResult::Output(Self::help_text())),

            Command::ListTables => Ok(CommandResult::Output(Self::list_tables(repl))),

            Command::Describe(None) => Ok(CommandResult::Output(
                "Usage: \\d <table>. Use \\dt to list tables.".to_string(),
            )),

            Command::Describe(Some(name)) => {
                let Some(table) = TableName::resolve(name) else {
                    return Ok(CommandResult::Output(format!("Table '{name}' does not exist.")));
                };
                let data = repl.session().store().table(table);
                let mut output = formatter::format_grid(data.header(), data.rows(), repl.format());
                if repl.format() == OutputFormat::Table {
                    output.push_str(&format!("\n({})", plural(data.len(), "row")));
                }
                Ok(CommandResult::Output(output))
            }

            Command::Search(term) => {
                if term.is_empty() {
                    return Ok(CommandResult::Output("Usage: \\search <breed>".to_string()));
                }
                repl.print_search(term);
                Ok(CommandResult::Continue)
            }

            Command::Tree => Ok(CommandResult::Output(formatter::format_tree(
                repl.session().index(),
                repl.format(),
            ))),

            Command::Reset => {
                repl.session_mut().reset()?;
                Ok(CommandResult::Output("Tables reset to seed data.".to_string()))
            }

            Command::Save => {
                let path = repl.session().save()?;
                Ok(CommandResult::Output(format!("Saved to {}.", path.display())))
            }

            Command::Export(None) => Ok(CommandResult::Output(
                "Usage: \\export <table> <path>".to_string(),
            )),

            Command::Export(Some((name, path))) => {
                let Some(table) = TableName::resolve(name) else {
                    return Ok(CommandResult::Output(format!("Table '{name}' does not exist.")));
                };
                repl.session().export(table, Path::new(path))?;
                Ok(CommandResult::Output(format!("Exported {table} to {path}.")))
            }

            Command::Timing => Ok(CommandResult::ToggleTiming),

            Command::Format(format) => match format.parse::<OutputFormat>() {
                Ok(fmt) => Ok(CommandResult::SetFormat(fmt)),
                Err(msg) => Ok(CommandResult::Output(msg)),
            },

            Command::Include(path) => {
                if path.is_empty() {
                    Ok(CommandResult::Output("Usage: \\i <filename>".to_string()))
                } else {
                    let content = std::fs::read_to_string(path)?;
                    repl.execute_and_print(&strip_comments(&content));
                    Ok(CommandResult::Continue)
                }
            }

            Command::Unknown(cmd) => Ok(CommandResult::Output(format!(
                "Unknown command '\\{cmd}'. Type \\? for help."
            ))),
        }
    }

    /// Returns help text.
    fn help_text() -> String {
        r#"KennelDB CLI Commands
=====================

General:
  \q, \quit             Exit the CLI
  \?, \help             Show this help

Tables:
  \dt, \tables          List tables
  \d TABLE              Show a table's rows
  \reset                Discard changes and reload the seed data
  \save                 Write the snapshot file
  \export TABLE PATH    Write a table's text to a file

Index:
  \s, \search BREED     Search dogs by breed, showing each step
  \tree                 Show the breed index structure

Display:
  \t, \timing           Toggle timing display
  \f FORMAT             Set output format (table, json, csv)

Files:
  \i FILE               Execute statements from file

Statements:
  INSERT INTO owners VALUES (4, 'Ana Ruiz');
  INSERT INTO dogs VALUES ('Labrador', 'Buddy2', '1'), ('Beagle', 'Kira', '2');

Input ending with a semicolon is executed; otherwise input continues on the next line.
"#
        .to_string()
    }

    fn list_tables(repl: &Repl) -> String {
        let session = repl.session();
        let header: Vec<String> = ["table", "columns", "rows", "index"]
            .iter()
            .map(|c| c.to_string())
            .collect();

        let rows: Vec<Vec<String>> = session
            .engine()
            .catalog()
            .tables()
            .map(|info| {
                let index = info
                    .index_column
                    .and_then(|i| info.columns.get(i))
                    .map(|column| format!("{column} (B+ tree)"))
                    .unwrap_or_default();
                vec![
                    info.name.to_string(),
                    info.columns.join(", "),
                    session.store().table(info.name).len().to_string(),
                    index,
                ]
            })
            .collect();

        formatter::format_grid(&header, &rows, repl.format())
    }
}

/// Drops lines that are `--` comments.
pub fn strip_comments(content: &str) -> String {
    content
        .lines()
        .filter(|line| !line.trim_start().starts_with("--"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Formats a count with a noun, pluralized.
pub fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("1 {noun}")
    } else {
        format!("{count} {noun}s")
    }
}
