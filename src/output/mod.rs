//! Output formatting for comparison records
//!
//! This module provides:
//! - A column model shared by every render target
//! - Markdown tables for pull request bodies
//! - Aligned text tables for console output

mod markdown;
mod text;

pub use markdown::{pull_request_body, render_markdown, ProjectSection};
pub use text::render_text;

use crate::domain::{build_compare_models, CompareModel, DependencyCategory, Manifest, ManifestsByName};

/// Render target of a column cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Markdown with links
    #[default]
    Markdown,
    /// Plain text for the terminal, never linked
    Text,
}

/// Horizontal alignment of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    Left,
    Center,
}

/// What a column shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// Dependency name, linked to its homepage in Markdown
    Name,
    /// Version range, linked to the comparison view in Markdown
    Updating,
    /// Presence marker for one dependency category
    Category(DependencyCategory),
}

/// A named rendering rule applied to every record in one table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    kind: ColumnKind,
}

impl Column {
    pub fn new(kind: ColumnKind) -> Self {
        Self { kind }
    }

    pub fn kind(&self) -> ColumnKind {
        self.kind
    }

    /// Header text
    pub fn title(&self) -> &'static str {
        match self.kind {
            ColumnKind::Name => "Name",
            ColumnKind::Updating => "Updating",
            ColumnKind::Category(category) => category.as_str(),
        }
    }

    pub fn alignment(&self) -> Alignment {
        match self.kind {
            ColumnKind::Name => Alignment::Left,
            ColumnKind::Updating | ColumnKind::Category(_) => Alignment::Center,
        }
    }

    /// Markdown separator cell encoding the alignment
    pub fn markdown_layout(&self) -> &'static str {
        match self.kind {
            ColumnKind::Name => ":----",
            ColumnKind::Updating => ":--------:",
            ColumnKind::Category(_) => ":-:",
        }
    }

    /// Cell content for one record
    pub fn render(&self, model: &CompareModel, format: OutputFormat) -> String {
        match (self.kind, format) {
            (ColumnKind::Name, OutputFormat::Markdown) => match model.homepage() {
                Some(homepage) => format!("[{}]({})", model.name(), homepage),
                None => format!("`{}`", model.name()),
            },
            (ColumnKind::Name, OutputFormat::Text) => model.name().to_string(),
            (ColumnKind::Updating, OutputFormat::Markdown) => match model.diff_wanted_url() {
                Some(url) => format!("[{}]({})", model.range_wanted(), url),
                None => model.range_wanted(),
            },
            (ColumnKind::Updating, OutputFormat::Text) => model.range_wanted(),
            (ColumnKind::Category(category), _) => {
                if model.category() == category {
                    "*".to_string()
                } else {
                    " ".to_string()
                }
            }
        }
    }
}

/// Columns for a set of records: Name, Updating, then one column per
/// category that occurs in `models`, in canonical category order
pub fn columns_for(models: &[CompareModel]) -> Vec<Column> {
    let mut columns = vec![Column::new(ColumnKind::Name), Column::new(ColumnKind::Updating)];
    columns.extend(
        DependencyCategory::ALL
            .into_iter()
            .filter(|category| models.iter().any(|m| m.category() == *category))
            .map(|category| Column::new(ColumnKind::Category(category))),
    );
    columns
}

/// Build the comparison records and render them as a Markdown table
pub fn to_markdown(project: &Manifest, old: &ManifestsByName, new: &ManifestsByName) -> String {
    let models = build_compare_models(project, old, new);
    render_markdown(&columns_for(&models), &models)
}

/// Build the comparison records and render them as an aligned text table
pub fn to_text_table(
    project: &Manifest,
    old: &ManifestsByName,
    new: &ManifestsByName,
    color: bool,
) -> String {
    let models = build_compare_models(project, old, new);
    render_text(&columns_for(&models), &models, color)
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;

    fn titles(columns: &[Column]) -> Vec<&'static str> {
        columns.iter().map(|c| c.title()).collect()
    }

    #[test]
    fn test_output_format_default() {
        assert_eq!(OutputFormat::default(), OutputFormat::Markdown);
    }

    #[test]
    fn test_columns_for_empty() {
        assert_eq!(titles(&columns_for(&[])), vec!["Name", "Updating"]);
    }

    #[test]
    fn test_columns_follow_present_categories() {
        let models = vec![
            model("loose-envify", "1.0.0", "1.4.0"),
            model("react", "15.0.0", "16.8.6"),
        ];
        assert_eq!(
            titles(&columns_for(&models)),
            vec!["Name", "Updating", "dependencies", "shadow"]
        );
    }

    #[test]
    fn test_columns_use_canonical_order() {
        let models = vec![
            model("jest", "23.0.0", "24.0.0"),
            model("react", "15.0.0", "16.8.6"),
        ];
        assert_eq!(
            titles(&columns_for(&models)),
            vec!["Name", "Updating", "dependencies", "devDependencies"]
        );
    }

    #[test]
    fn test_category_cells_are_exclusive() {
        let models = vec![
            model("jest", "23.0.0", "24.0.0"),
            model("react", "15.0.0", "16.8.6"),
            model("loose-envify", "1.0.0", "1.4.0"),
        ];
        let columns = columns_for(&models);
        for m in &models {
            let marks = columns
                .iter()
                .filter(|c| matches!(c.kind(), ColumnKind::Category(_)))
                .filter(|c| c.render(m, OutputFormat::Text) == "*")
                .count();
            assert_eq!(marks, 1, "{}", m.name());
        }
    }

    #[test]
    fn test_name_cell() {
        let column = Column::new(ColumnKind::Name);
        let plain = model("react", "15.0.0", "16.8.6");
        assert_eq!(column.render(&plain, OutputFormat::Markdown), "`react`");
        assert_eq!(column.render(&plain, OutputFormat::Text), "react");

        let linked = linked_model();
        assert_eq!(
            column.render(&linked, OutputFormat::Markdown),
            "[react](https://reactjs.org/)"
        );
        assert_eq!(column.render(&linked, OutputFormat::Text), "react");
    }

    #[test]
    fn test_updating_cell() {
        let column = Column::new(ColumnKind::Updating);
        let linked = linked_model();
        assert_eq!(
            column.render(&linked, OutputFormat::Markdown),
            "[15.0.0...16.8.6](https://github.com/facebook/react/compare/v15.0.0...v16.8.6)"
        );
        assert_eq!(column.render(&linked, OutputFormat::Text), "15.0.0...16.8.6");
    }

    #[test]
    fn test_alignment_and_layout() {
        let name = Column::new(ColumnKind::Name);
        let updating = Column::new(ColumnKind::Updating);
        let shadow = Column::new(ColumnKind::Category(DependencyCategory::Shadow));
        assert_eq!(name.alignment(), Alignment::Left);
        assert_eq!(updating.alignment(), Alignment::Center);
        assert_eq!(shadow.alignment(), Alignment::Center);
        assert_eq!(name.markdown_layout(), ":----");
        assert_eq!(updating.markdown_layout(), ":--------:");
        assert_eq!(shadow.markdown_layout(), ":-:");
    }
}
