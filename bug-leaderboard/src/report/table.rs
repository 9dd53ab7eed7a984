//! Markdown table rendering.

use super::row::LeaderboardRow;
use comfy_table::presets::ASCII_MARKDOWN;
use comfy_table::{ContentArrangement, Table};

/// Fixed column header of every partition table.
pub const HEADER: [&str; 5] = ["issue", "priority", "assignee", "pr", "hint"];

/// Renders rows as a markdown table with a header and separator row.
///
/// Cells are never wrapped, so long assignee or PR lists stay on one line.
#[must_use]
pub fn render_table(rows: &[LeaderboardRow]) -> String {
    let mut table = Table::new();
    table
        .load_preset(ASCII_MARKDOWN)
        .set_content_arrangement(ContentArrangement::Disabled)
        .set_header(HEADER);

    for row in rows {
        table.add_row(row.cells());
    }

    table.to_string()
}
