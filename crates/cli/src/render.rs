//! Text rendering of a finished check.

use csvgate_core::validation::ValidationOutcome;

use crate::config::OutputFormat;

const COLUMN_SEPARATOR: &str = " | ";

/// Render an outcome in the requested format.
pub fn render_outcome(
    outcome: &ValidationOutcome,
    format: OutputFormat,
) -> Result<String, serde_json::Error> {
    match format {
        OutputFormat::Table => Ok(render_text(outcome)),
        OutputFormat::Json => serde_json::to_string_pretty(outcome),
    }
}

/// Table plus success banner for a valid outcome, error list otherwise.
pub fn render_text(outcome: &ValidationOutcome) -> String {
    if !outcome.is_valid {
        return render_errors(&outcome.errors);
    }
    if outcome.rows.is_empty() {
        return "CSV data is valid! (no data rows)\n".to_string();
    }
    let mut out = String::from("Parsed CSV Data:\n");
    out.push_str(&render_table(outcome));
    out.push_str("\nCSV data is valid!\n");
    out
}

/// One line per error, in order.
pub fn render_errors(errors: &[String]) -> String {
    let mut out = String::from("Validation Errors:\n");
    for error in errors {
        out.push_str("  - ");
        out.push_str(error);
        out.push('\n');
    }
    out
}

/// Aligned table: header row from the first record's keys, then one line
/// per record. Cells a record lacks render empty.
pub fn render_table(outcome: &ValidationOutcome) -> String {
    let columns = outcome.columns();
    if columns.is_empty() {
        return String::new();
    }

    let body: Vec<Vec<&str>> = outcome
        .rows
        .iter()
        .map(|row| {
            columns
                .iter()
                .map(|c| row.get(*c).map(String::as_str).unwrap_or(""))
                .collect()
        })
        .collect();

    let widths: Vec<usize> = columns
        .iter()
        .enumerate()
        .map(|(i, header)| {
            body.iter()
                .map(|cells| display_width(cells[i]))
                .chain(std::iter::once(display_width(header)))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();
    out.push_str(&render_line(&columns, &widths));
    out.push_str(
        &widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("-+-"),
    );
    out.push('\n');
    for cells in &body {
        out.push_str(&render_line(cells, &widths));
    }
    out
}

fn render_line(cells: &[&str], widths: &[usize]) -> String {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| {
            let pad = width.saturating_sub(display_width(cell));
            format!("{cell}{}", " ".repeat(pad))
        })
        .collect();
    let mut line = padded.join(COLUMN_SEPARATOR).trim_end().to_string();
    line.push('\n');
    line
}

fn display_width(s: &str) -> usize {
    s.chars().count()
}
