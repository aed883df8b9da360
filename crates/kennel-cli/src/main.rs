//! KennelDB Command-Line Interface
//!
//! An interactive shell over the owners and dogs tables and their breed index.
//!
//! # Usage
//!
//! ```bash
//! # Start interactive REPL on the seed tables
//! kennel
//!
//! # Keep changes in a snapshot file
//! kennel --data kennel.json
//!
//! # Execute a single submission
//! kennel -c "INSERT INTO dogs VALUES ('Labrador', 'Max', '3')"
//!
//! # Execute a statement file
//! kennel -f dogs.sql
//!
//! # Write the current settings to ~/.config/kenneldb/config.toml
//! kennel --init-config --order 5
//!
//! # Output as JSON
//! kennel -o json -c "\search Labrador"
//! ```

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use kennel_index::SplitPolicy;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;
mod formatter;
mod persist;
mod repl;
mod session;

use commands::strip_comments;
use config::CliConfig;
use formatter::OutputFormat;
use repl::Repl;

/// KennelDB command-line interface
#[derive(Parser, Debug)]
#[command(
    name = "kennel",
    author = "KennelDB Team",
    version,
    about = "Command-line interface for KennelDB",
    long_about = "An interactive shell for the KennelDB owners and dogs tables.\n\n\
                  Run INSERT statements, search dogs by breed through the B+ tree\n\
                  index step by step, and keep the tables in a snapshot file."
)]
struct Args {
    /// Execute a single submission (or backslash command) and exit
    #[arg(short = 'c', long)]
    command: Option<String>,

    /// Execute statements from file as one submission and exit
    #[arg(short = 'f', long, value_name = "FILE")]
    file: Option<PathBuf>,

    /// Snapshot file to load from and save to
    #[arg(long = "data", value_name = "FILE", env = "KENNEL_DATA")]
    data_file: Option<PathBuf>,

    /// Configuration file path
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Output format (defaults to the configured one)
    #[arg(short = 'o', long, value_enum)]
    output: Option<OutputFormatArg>,

    /// Breed index order
    #[arg(long, value_name = "N")]
    order: Option<usize>,

    /// Split full nodes at every level instead of only at the root
    #[arg(long)]
    strict_splits: bool,

    /// Enable verbose output
    #[arg(short = 'v', long)]
    verbose: bool,

    /// Suppress banner and prompts (for scripting)
    #[arg(short = 'q', long)]
    quiet: bool,

    /// Write the effective settings to the config file and exit
    #[arg(long)]
    init_config: bool,
}

/// Output format argument
#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormatArg {
    /// Display results in a formatted table
    Table,
    /// Display results as JSON
    Json,
    /// Display results as CSV
    Csv,
}

impl From<OutputFormatArg> for OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Table => OutputFormat::Table,
            OutputFormatArg::Json => OutputFormat::Json,
            OutputFormatArg::Csv => OutputFormat::Csv,
        }
    }
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    let args = Args::parse();

    init_logging(args.verbose);

    let config = load_config(&args)?;
    if args.init_config {
        return write_config(&config, &args);
    }

    let format = match args.output {
        Some(arg) => arg.into(),
        None => config
            .output_format
            .parse::<OutputFormat>()
            .map_err(anyhow::Error::msg)?,
    };

    if let Some(command) = &args.command {
        execute_command(&config, command, format)
    } else if let Some(file) = &args.file {
        execute_file(&config, file, format)
    } else {
        run_repl(&config, format, args.quiet)
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("kennel_cli=debug,kennel_sql=debug,kennel_index=debug")
    } else {
        EnvFilter::new("kennel_cli=warn,kennel_sql=warn,kennel_index=warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();
}

fn load_config(args: &Args) -> Result<CliConfig> {
    let config = match &args.config {
        // --init-config may name a file that does not exist yet
        Some(path) if args.init_config && !path.exists() => CliConfig::default(),
        Some(path) => CliConfig::from_file(path)?,
        None => CliConfig::load_default()?,
    };

    Ok(apply_overrides(config, args))
}

/// Applies command-line flags on top of the file configuration.
fn apply_overrides(config: CliConfig, args: &Args) -> CliConfig {
    let mut builder = config.into_builder();
    if let Some(path) = &args.data_file {
        builder = builder.data_file(path);
    }
    if let Some(order) = args.order {
        builder = builder.index_order(order);
    }
    if args.strict_splits {
        builder = builder.split_policy(SplitPolicy::Recursive);
    }
    builder.build()
}

/// Writes the effective settings to `--config` or the default location.
fn write_config(config: &CliConfig, args: &Args) -> Result<()> {
    let path = args
        .config
        .clone()
        .or_else(CliConfig::default_config_path)
        .context("no config directory available; pass --config")?;
    config.save(&path)?;
    println!("Wrote {}", path.display());
    Ok(())
}

fn execute_command(config: &CliConfig, input: &str, format: OutputFormat) -> Result<()> {
    info!("Executing command: {}", input);

    let mut repl = Repl::new(config, format)?;
    repl.process_line(input.trim())?;

    Ok(())
}

fn execute_file(config: &CliConfig, path: &Path, format: OutputFormat) -> Result<()> {
    info!("Executing file: {}", path.display());

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let mut repl = Repl::new(config, format)?;
    repl.execute_and_print(&strip_comments(&content));

    Ok(())
}

fn run_repl(config: &CliConfig, format: OutputFormat, quiet: bool) -> Result<()> {
    let mut repl = Repl::new(config, format)?;

    if !quiet {
        repl.print_banner();
    }

    repl.run()
}
