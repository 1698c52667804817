//! Aligned text table for console output
//!
//! Layout:
//! - `=` rules above and below the table
//! - `-` rules between the header and each row
//! - `|` between columns, one space of padding inside each cell
//!
//! Column widths are computed from unstyled text, so the table stays aligned
//! when the header is colored and remains identical once ANSI codes are
//! stripped.

use super::{Alignment, Column, OutputFormat};
use crate::domain::CompareModel;
use colored::Colorize;

/// Cell padding on each side
const PADDING: usize = 1;

fn width_of(text: &str) -> usize {
    text.chars().count()
}

/// Pad `text` to `width` characters. Centered text puts the odd space on
/// the right.
fn align(text: &str, width: usize, alignment: Alignment) -> (String, String) {
    let pad = width.saturating_sub(width_of(text));
    let (left, right) = match alignment {
        Alignment::Left => (0, pad),
        Alignment::Center => (pad / 2, pad - pad / 2),
    };
    (" ".repeat(left), " ".repeat(right))
}

/// Render records as an aligned text table. `color` bolds the header row.
pub fn render_text(columns: &[Column], models: &[CompareModel], color: bool) -> String {
    let header: Vec<String> = columns.iter().map(|c| c.title().to_string()).collect();
    let rows: Vec<Vec<String>> = models
        .iter()
        .map(|m| columns.iter().map(|c| c.render(m, OutputFormat::Text)).collect())
        .collect();

    let widths: Vec<usize> = (0..columns.len())
        .map(|i| {
            rows.iter()
                .map(|row| width_of(&row[i]))
                .chain(std::iter::once(width_of(&header[i])))
                .max()
                .unwrap_or(0)
                + PADDING * 2
        })
        .collect();

    let inner: usize = widths.iter().sum::<usize>() + columns.len().saturating_sub(1);
    let outer_rule = "=".repeat(inner + 1);
    let row_rule = "-".repeat(inner);

    let format_row = |cells: &[String], bold: bool| -> String {
        let formatted: Vec<String> = cells
            .iter()
            .zip(columns)
            .zip(&widths)
            .map(|((cell, column), width)| {
                let (left, right) = align(cell, width - PADDING * 2, column.alignment());
                let content = if bold {
                    cell.bold().to_string()
                } else {
                    cell.clone()
                };
                let pad = " ".repeat(PADDING);
                format!("{}{}{}{}{}", pad, left, content, right, pad)
            })
            .collect();
        format!("|{}|", formatted.join("|"))
    };

    let mut lines = vec![outer_rule.clone(), format_row(&header, color)];
    for row in &rows {
        lines.push(row_rule.clone());
        lines.push(format_row(row, false));
    }
    lines.push(outer_rule);
    lines.join("\n")
}
