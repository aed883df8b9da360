//! Interactive REPL (Read-Eval-Print-Loop) for KennelDB.
//!
//! Provides an interactive statement shell with command history, line
//! editing, and multi-line input support.

use std::borrow::Cow;
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use anyhow::Result;
use kennel_index::SearchTrace;
use kennel_sql::{ExecutionResult, RowMap, TableName};
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::history::DefaultHistory;
use rustyline::validate::{ValidationContext, ValidationResult, Validator};
use rustyline::{CompletionType, Config, EditMode, Editor, Helper};
use serde::Serialize;
use tracing::{debug, error};

use crate::commands::{plural, Command, CommandResult};
use crate::config::CliConfig;
use crate::formatter::{self, OutputFormat};
use crate::session::Session;

/// The REPL prompt shown when waiting for input.
const PROMPT: &str = "kennel> ";

/// REPL helper for rustyline.
struct ReplHelper {
    /// Keywords and table names for completion.
    keywords: Vec<String>,
}

impl ReplHelper {
    fn new() -> Self {
        let mut keywords: Vec<String> = ["INSERT", "INTO", "VALUES"]
            .iter()
            .map(|kw| kw.to_string())
            .collect();
        keywords.extend(TableName::ALL.iter().map(|t| t.as_str().to_uppercase()));
        keywords.extend(["DUENOS", "PERROS"].iter().map(|t| t.to_string()));
        Self { keywords }
    }
}

impl Completer for ReplHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &rustyline::Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let start = line[..pos]
            .rfind(|c: char| c.is_whitespace() || c == '(' || c == ',')
            .map(|i| i + 1)
            .unwrap_or(0);

        let word_upper = line[start..pos].to_uppercase();

        let matches: Vec<Pair> = self
            .keywords
            .iter()
            .filter(|kw| kw.starts_with(&word_upper))
            .map(|kw| Pair {
                display: kw.clone(),
                replacement: kw.clone(),
            })
            .collect();

        Ok((start, matches))
    }
}

impl Hinter for ReplHelper {
    type Hint = String;

    fn hint(&self, _line: &str, _pos: usize, _ctx: &rustyline::Context<'_>) -> Option<Self::Hint> {
        None
    }
}

impl Highlighter for ReplHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        Cow::Borrowed(line)
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        false
    }
}

impl Validator for ReplHelper {
    fn validate(&self, ctx: &mut ValidationContext) -> rustyline::Result<ValidationResult> {
        let trimmed = ctx.input().trim();

        if trimmed.is_empty() || trimmed.starts_with('\\') || trimmed.ends_with(';') {
            return Ok(ValidationResult::Valid(None));
        }

        Ok(ValidationResult::Incomplete)
    }
}

impl Helper for ReplHelper {}

#[derive(Serialize)]
struct SearchOutput<'a> {
    term: &'a str,
    trace: &'a SearchTrace,
    rows: &'a [RowMap],
}

/// Interactive REPL for KennelDB.
pub struct Repl {
    /// The store and index being edited.
    session: Session,
    /// The rustyline editor.
    editor: Editor<ReplHelper, DefaultHistory>,
    /// Output format.
    format: OutputFormat,
    /// History file path.
    history_file: Option<PathBuf>,
    /// Timing mode enabled.
    timing: bool,
    /// Pause between trace steps during a search.
    trace_delay: Duration,
}

impl Repl {
    /// Creates a new REPL instance, opening a session from `config`.
    pub fn new(config: &CliConfig, format: OutputFormat) -> Result<Self> {
        let rl_config = Config::builder()
            .history_ignore_space(true)
            .completion_type(CompletionType::List)
            .edit_mode(EditMode::Emacs)
            .max_history_size(config.history_size)?
            .build();

        let mut editor = Editor::with_config(rl_config)?;
        editor.set_helper(Some(ReplHelper::new()));

        let history_file = config.history_path();
        if let Some(ref path) = history_file {
            if path.exists() {
                let _ = editor.load_history(path);
            }
        }

        Ok(Self {
            session: Session::open(config)?,
            editor,
            format,
            history_file,
            timing: config.timing,
            trace_delay: Duration::from_millis(config.trace_delay_ms),
        })
    }

    /// Prints the welcome banner.
    pub fn print_banner(&self) {
        println!("KennelDB CLI v{}", env!("CARGO_PKG_VERSION"));
        match self.session.data_file() {
            Some(path) => println!("Data file: {}", path.display()),
            None => println!("Working on the seed tables (not saved)."),
        }
        println!("Type \\? for help, \\q to quit.\n");
    }

    /// Runs the main REPL loop.
    pub fn run(&mut self) -> Result<()> {
        loop {
            match self.editor.readline(PROMPT) {
                Ok(line) => {
                    let line = line.trim();

                    if line.is_empty() {
                        continue;
                    }

                    let _ = self.editor.add_history_entry(line);

                    match self.process_line(line) {
                        Ok(true) => break,
                        Ok(false) => {}
                        Err(e) => eprintln!("Error: {e:#}"),
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    println!("\\q");
                    break;
                }
                Err(e) => {
                    error!("Readline error: {}", e);
                    break;
                }
            }
        }

        self.save_history();

        println!("Goodbye!");
        Ok(())
    }

    /// Processes a single line of input. Returns `true` when the REPL
    /// should exit.
    pub fn process_line(&mut self, line: &str) -> Result<bool> {
        if line.starts_with('\\') {
            return self.process_command(line);
        }

        self.execute_and_print(line);
        Ok(false)
    }

    /// Processes a backslash command.
    fn process_command(&mut self, line: &str) -> Result<bool> {
        let cmd = Command::parse(line);

        match cmd.execute(self)? {
            CommandResult::Continue => Ok(false),
            CommandResult::Exit => Ok(true),
            CommandResult::Output(msg) => {
                println!("{}", msg);
                Ok(false)
            }
            CommandResult::ToggleTiming => {
                self.timing = !self.timing;
                if self.timing {
                    println!("Timing is on.");
                } else {
                    println!("Timing is off.");
                }
                Ok(false)
            }
            CommandResult::SetFormat(format) => {
                self.format = format;
                println!("Output format set to {}.", format.as_str());
                Ok(false)
            }
        }
    }

    /// Executes a submission and prints one line per attempted insert.
    pub fn execute_and_print(&mut self, sql: &str) {
        let submission = self.session.execute(sql);
        self.print_result(&submission.result);
        if let Some(e) = submission.save_error {
            eprintln!("Warning: changes are kept in memory but were not saved: {e:#}");
        }
    }

    fn print_result(&self, result: &ExecutionResult) {
        if result.records.is_empty() {
            println!("No statements to execute.");
        } else {
            println!("{}", formatter::format_records(&result.records, self.format));
            if self.format == OutputFormat::Table {
                println!(
                    "{} succeeded, {} failed",
                    result.success_count(),
                    result.failure_count()
                );
            }
        }

        if self.timing {
            println!("Time: {:.3}ms", result.elapsed.as_secs_f64() * 1000.0);
        }
    }

    /// Searches the breed index, playing back each trace step before
    /// printing the matching rows.
    pub fn print_search(&self, term: &str) {
        let result = self.session.search(term);

        if self.format == OutputFormat::Json {
            let output = SearchOutput {
                term: term.trim(),
                trace: &result.trace,
                rows: &result.rows,
            };
            match serde_json::to_string_pretty(&output) {
                Ok(json) => println!("{json}"),
                Err(e) => eprintln!("Error: {e}"),
            }
            return;
        }

        for (i, step) in result.trace.iter().enumerate() {
            if i > 0 && !self.trace_delay.is_zero() {
                thread::sleep(self.trace_delay);
            }
            println!("{}", formatter::format_trace_step(i + 1, step));
        }

        if result.rows.is_empty() {
            println!("No dogs found for breed '{}'.", term.trim());
        } else {
            println!("{}", formatter::format_rows(&result.rows, self.format));
            println!("({})", plural(result.rows.len(), "row"));
        }
    }

    /// Saves command history.
    fn save_history(&mut self) {
        if let Some(ref path) = self.history_file {
            if let Some(parent) = path.parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            if let Err(e) = self.editor.save_history(path) {
                debug!("Failed to save history: {}", e);
            }
        }
    }

    /// Returns the session.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Returns the session mutably.
    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    /// Returns the current output format.
    pub fn format(&self) -> OutputFormat {
        self.format
    }
}
