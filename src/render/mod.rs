//! Plain-text rendering of paged report results.

use serde_json::Value;

use crate::report::Pager;
use crate::service::ReportRow;

/// Message shown for a successful run that returned no rows.
pub const NO_DATA_MESSAGE: &str = "No data found for the selected criteria";

const COLUMN_GAP: &str = "  ";

/// Render rows as an aligned text table.
///
/// Columns are taken from the keys of the first row; rows are assumed
/// homogeneous. An empty slice renders as an empty string.
pub fn render_table(rows: &[ReportRow]) -> String {
    let Some(first) = rows.first() else {
        return String::new();
    };
    let columns: Vec<&str> = first.keys().map(String::as_str).collect();

    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|row| columns.iter().map(|c| cell_text(row.get(*c))).collect())
        .collect();

    let mut widths: Vec<usize> = columns.iter().map(|c| c.len()).collect();
    for row in &cells {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.len());
        }
    }

    let mut out = String::new();
    push_line(&mut out, &columns, &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    let rule_refs: Vec<&str> = rule.iter().map(String::as_str).collect();
    push_line(&mut out, &rule_refs, &widths);
    for row in &cells {
        let refs: Vec<&str> = row.iter().map(String::as_str).collect();
        push_line(&mut out, &refs, &widths);
    }
    out
}

/// Render the visible page of a result set plus a one-line page footer.
pub fn render_page(rows: &[ReportRow], pager: &Pager) -> String {
    if rows.is_empty() {
        return NO_DATA_MESSAGE.to_string();
    }
    let table = render_table(pager.visible(rows));
    format!(
        "{table}Page {page} of {total} ({count} rows)",
        page = pager.page_index() + 1,
        total = pager.total_pages(rows.len()),
        count = rows.len(),
    )
}

fn push_line(out: &mut String, cells: &[&str], widths: &[usize]) {
    let mut line = String::new();
    for (i, cell) in cells.iter().enumerate() {
        if i > 0 {
            line.push_str(COLUMN_GAP);
        }
        line.push_str(cell);
        if i + 1 < cells.len() {
            for _ in cell.len()..widths[i] {
                line.push(' ');
            }
        }
    }
    out.push_str(line.trim_end());
    out.push('\n');
}

fn cell_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}
