//! Output formatting for results, tables, traces, and the index.
//!
//! Supports table, JSON, and CSV output formats.

use std::fmt::Write as _;
use std::str::FromStr;

use comfy_table::{Cell, Color, ContentArrangement, Table};
use kennel_index::{BPlusTree, Node, TraceStep};
use kennel_sql::{ExecutionRecord, RowMap};

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Formatted table output.
    Table,
    /// JSON output.
    Json,
    /// CSV output.
    Csv,
}

impl OutputFormat {
    /// Returns the format name.
    pub fn as_str(self) -> &'static str {
        match self {
            OutputFormat::Table => "table",
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            other => Err(format!(
                "unknown format '{other}', available: table, json, csv"
            )),
        }
    }
}

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .set_content_arrangement(ContentArrangement::Dynamic)
        .load_preset(comfy_table::presets::UTF8_FULL)
        .apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);
    table
}

/// Formats the result log of a submission.
pub fn format_records(records: &[ExecutionRecord], format: OutputFormat) -> String {
    match format {
        OutputFormat::Table => {
            let mut table = new_table();
            table.set_header(vec!["#", "status", "command", "message", "id"]);
            for (i, record) in records.iter().enumerate() {
                let status = if record.success {
                    Cell::new("OK").fg(Color::Green)
                } else {
                    Cell::new("FAILED").fg(Color::Red)
                };
                table.add_row(vec![
                    Cell::new(i + 1),
                    status,
                    Cell::new(&record.command),
                    Cell::new(&record.message),
                    Cell::new(record.assigned_id.map(|id| id.to_string()).unwrap_or_default()),
                ]);
            }
            table.to_string()
        }
        OutputFormat::Json => {
            serde_json::to_string_pretty(records).unwrap_or_else(|_| "[]".to_string())
        }
        OutputFormat::Csv => {
            let mut output = String::from("command,success,message,assigned_id,error\n");
            for record in records {
                let fields = [
                    escape_csv(&record.command),
                    record.success.to_string(),
                    escape_csv(&record.message),
                    record.assigned_id.map(|id| id.to_string()).unwrap_or_default(),
                    record.error.map(|kind| kind.to_string()).unwrap_or_default(),
                ];
                output.push_str(&fields.join(","));
                output.push('\n');
            }
            output
        }
    }
}

/// Formats rows under a header.
pub fn format_grid(header: &[String], rows: &[Vec<String>], format: OutputFormat) -> String {
    match format {
        OutputFormat::Table => {
            let mut table = new_table();
            table.set_header(header.iter().map(Cell::new));
            for row in rows {
                table.add_row(row.iter().map(Cell::new));
            }
            table.to_string()
        }
        OutputFormat::Json => {
            let maps: Vec<RowMap> = rows.iter().map(|row| RowMap::from_row(header, row)).collect();
            format_row_maps_json(&maps)
        }
        OutputFormat::Csv => {
            let mut output = String::new();
            for cells in std::iter::once(header).chain(rows.iter().map(Vec::as_slice)) {
                let escaped: Vec<String> = cells.iter().map(|c| escape_csv(c)).collect();
                output.push_str(&escaped.join(","));
                output.push('\n');
            }
            output
        }
    }
}

/// Formats materialized search rows.
pub fn format_rows(rows: &[RowMap], format: OutputFormat) -> String {
    if format == OutputFormat::Json {
        return format_row_maps_json(rows);
    }
    let header: Vec<String> = rows
        .first()
        .map(|row| row.columns().map(str::to_string).collect())
        .unwrap_or_default();
    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|row| row.values().map(str::to_string).collect())
        .collect();
    format_grid(&header, &cells, format)
}

fn format_row_maps_json(rows: &[RowMap]) -> String {
    serde_json::to_string_pretty(rows).unwrap_or_else(|_| "[]".to_string())
}

/// Formats one trace step as a numbered line, with its detail indented below.
pub fn format_trace_step(number: usize, step: &TraceStep) -> String {
    let mut line = format!("{number:>3}. [{}] {}", step.kind, step.message);
    if let Some(detail) = &step.detail {
        let _ = write!(line, "\n       {detail}");
    }
    line
}

/// Formats the index as an outline, or as JSON.
pub fn format_tree(tree: &BPlusTree, format: OutputFormat) -> String {
    if format == OutputFormat::Json {
        return serde_json::to_string_pretty(tree).unwrap_or_else(|_| "{}".to_string());
    }

    let stats = tree.stats();
    let mut output = format!(
        "B+ tree: order {}, {} split, height {}, {} keys, {} row IDs\n",
        tree.order(),
        tree.config().split_policy,
        stats.height,
        stats.key_count,
        stats.entry_count
    );
    write_node(&mut output, tree.root(), 0);
    output
}

fn write_node(output: &mut String, node: &Node, depth: usize) {
    let indent = "  ".repeat(depth);
    match node {
        Node::Internal(internal) => {
            let _ = writeln!(output, "{indent}internal [{}]", internal.keys.join(", "));
            for child in &internal.children {
                write_node(output, child, depth + 1);
            }
        }
        Node::Leaf(leaf) => {
            if leaf.is_empty() {
                let _ = writeln!(output, "{indent}leaf (empty)");
                return;
            }
            let _ = writeln!(output, "{indent}leaf");
            for (key, ids) in leaf.keys.iter().zip(&leaf.values) {
                let ids: Vec<String> = ids.iter().map(ToString::to_string).collect();
                let _ = writeln!(output, "{indent}  {key} -> [{}]", ids.join(", "));
            }
        }
    }
}

/// Escapes a value for CSV output.
fn escape_csv(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') || value.contains('\r') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
