//! Markdown table rendering for pull request bodies

use super::{Column, OutputFormat};
use crate::domain::CompareModel;

/// Heading placed above the tables in a pull request body
const HEADING: &str = "## Updating Dependencies";

/// One project directory's rendered table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectSection {
    /// Project directory relative to the workspace
    pub directory: String,
    /// Rendered Markdown table
    pub table: String,
}

fn line<I: IntoIterator<Item = String>>(cells: I) -> String {
    format!("| {} |", cells.into_iter().collect::<Vec<_>>().join(" | "))
}

/// Render a GitHub-flavored pipe table
pub fn render_markdown(columns: &[Column], models: &[CompareModel]) -> String {
    let mut lines = Vec::with_capacity(models.len() + 2);
    lines.push(line(columns.iter().map(|c| c.title().to_string())));
    lines.push(line(columns.iter().map(|c| c.markdown_layout().to_string())));
    for model in models {
        lines.push(line(
            columns
                .iter()
                .map(|c| c.render(model, OutputFormat::Markdown)),
        ));
    }
    lines.join("\n")
}

/// Wrap rendered tables into a complete pull request description.
///
/// A single section is rendered without a sub-heading.
pub fn pull_request_body(sections: &[ProjectSection]) -> String {
    let mut body = String::from(HEADING);
    body.push('\n');

    if let [only] = sections {
        body.push_str(&only.table);
        body.push('\n');
    } else {
        for section in sections {
            body.push_str(&format!("### {}\n{}\n", section.directory, section.table));
        }
    }

    body.push_str(&format!(
        "\nPowered by {} {}",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION")
    ));
    body
}
