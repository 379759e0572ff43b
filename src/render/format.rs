//! Text output for rendered rows and node status.

use crate::controller::NodeState;
use crate::render::{NodeStatusEntry, Row, RowMarker};
use crate::tree::NodeKind;
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use owo_colors::OwoColorize;

/// Spaces of indentation per tree level
pub const INDENT_WIDTH: usize = 2;

fn glyph(marker: &RowMarker) -> &'static str {
    match marker {
        RowMarker::Chevron { open: true } => "▾",
        RowMarker::Chevron { open: false } => "▸",
        RowMarker::Spinner => "⟳",
        RowMarker::Error { .. } => "✗",
        RowMarker::None => " ",
    }
}

fn styled_label(row: &Row, color: bool) -> String {
    let label = if row.kind.is_directory() {
        format!("{}/", row.label)
    } else {
        row.label.clone()
    };
    if !color {
        return label;
    }
    match row.kind {
        NodeKind::Directory => format!("{}", label.blue().bold()),
        NodeKind::Png => format!("{}", label.magenta()),
        NodeKind::Jpg => format!("{}", label.yellow()),
        NodeKind::Doc => format!("{}", label.purple()),
    }
}

/// One line of text for a row
pub fn format_row(row: &Row, color: bool) -> String {
    let indent = " ".repeat(row.level * INDENT_WIDTH);
    let marker = glyph(&row.marker);
    let marker = match (&row.marker, color) {
        (RowMarker::Spinner, true) => format!("{}", marker.cyan()),
        (RowMarker::Error { .. }, true) => format!("{}", marker.red()),
        _ => marker.to_string(),
    };
    let mut line = format!("{}{} {}", indent, marker, styled_label(row, color));
    if let Some(size) = &row.size {
        if color {
            line.push_str(&format!(" {}", format!("({})", size).dimmed()));
        } else {
            line.push_str(&format!(" ({})", size));
        }
    }
    if let RowMarker::Error { reason } = &row.marker {
        let note = format!("[failed: {}]", reason);
        if color {
            line.push_str(&format!(" {}", note.red()));
        } else {
            line.push_str(&format!(" {}", note));
        }
    }
    line
}

/// Rows joined by newlines
pub fn format_rows(rows: &[Row], color: bool) -> String {
    rows.iter()
        .map(|row| format_row(row, color))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Status table for every node of the tree
pub fn format_status_table(entries: &[NodeStatusEntry]) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Id", "Label", "Type", "State", "Children", "Error"]);
    for entry in entries {
        let label = format!("{}{}", " ".repeat(entry.level * INDENT_WIDTH), entry.label);
        let kind = serde_json::to_value(entry.kind)
            .ok()
            .and_then(|v| v.as_str().map(str::to_string))
            .unwrap_or_default();
        let children = if entry.state == NodeState::Leaf {
            "-".to_string()
        } else {
            entry.children.to_string()
        };
        table.add_row(vec![
            entry.id.clone(),
            label,
            kind,
            entry.state.as_str().to_string(),
            children,
            entry.error.clone().unwrap_or_default(),
        ]);
    }
    format!("{}", table)
}
