//! Integration tests for package-update
//!
//! These tests verify:
//! - Installed manifest collection from a node_modules tree
//! - Comparison tables built from before/after snapshots
//! - Pull request body assembly

use package_update::domain::{build_compare_models, DependencyCategory};
use package_update::manifest::collect_installed;
use package_update::output::{pull_request_body, to_markdown, to_text_table, ProjectSection};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Test fixture directory creation helper
fn create_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp directory")
}

fn write_package(root: &Path, name: &str, body: &str) {
    let dir = root.join("node_modules").join(name);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("package.json"), body).unwrap();
}

/// Project with one runtime, one dev and one transitive dependency
fn create_test_project() -> TempDir {
    let temp_dir = create_test_dir();
    fs::write(
        temp_dir.path().join("package.json"),
        r#"{
  "name": "test-project",
  "version": "1.0.0",
  "dependencies": { "react": "^15.0.0" },
  "devDependencies": { "typescript": "~3.4.0" }
}"#,
    )
    .unwrap();

    write_package(
        temp_dir.path(),
        "react",
        r#"{
  "name": "react",
  "version": "15.0.0",
  "homepage": "https://reactjs.org/",
  "repository": { "type": "git", "url": "git+https://github.com/facebook/react.git" }
}"#,
    );
    write_package(
        temp_dir.path(),
        "typescript",
        r#"{"name": "typescript", "version": "3.4.1", "repository": "Microsoft/TypeScript"}"#,
    );
    write_package(
        temp_dir.path(),
        "loose-envify",
        r#"{"name": "loose-envify", "version": "1.3.1"}"#,
    );
    temp_dir
}

fn upgrade(root: &Path) {
    write_package(
        root,
        "react",
        r#"{"name": "react", "version": "16.8.6", "homepage": "https://reactjs.org/"}"#,
    );
    write_package(
        root,
        "loose-envify",
        r#"{"name": "loose-envify", "version": "1.4.0"}"#,
    );
}

mod snapshots {
    use super::*;

    #[test]
    fn test_declared_only_by_default() {
        let temp_dir = create_test_project();
        let (project, installed) = collect_installed(temp_dir.path(), false).unwrap();

        assert_eq!(project.name, "test-project");
        let names: Vec<_> = installed.keys().cloned().collect();
        assert_eq!(names, vec!["react", "typescript"]);
    }

    #[test]
    fn test_with_shadows_includes_transitive() {
        let temp_dir = create_test_project();
        let (_, installed) = collect_installed(temp_dir.path(), true).unwrap();
        assert!(installed.contains_key("loose-envify"));
    }

    #[test]
    fn test_compare_models_after_upgrade() {
        let temp_dir = create_test_project();
        let (project, old) = collect_installed(temp_dir.path(), true).unwrap();
        upgrade(temp_dir.path());
        let (_, new) = collect_installed(temp_dir.path(), true).unwrap();

        let models = build_compare_models(&project, &old, &new);
        let summary: Vec<_> = models
            .iter()
            .map(|m| (m.name(), m.range_wanted(), m.category()))
            .collect();
        assert_eq!(
            summary,
            vec![
                (
                    "loose-envify",
                    "1.3.1...1.4.0".to_string(),
                    DependencyCategory::Shadow
                ),
                (
                    "react",
                    "15.0.0...16.8.6".to_string(),
                    DependencyCategory::Dependencies
                ),
            ]
        );
        assert_eq!(
            models[1].repo(),
            Some("https://github.com/facebook/react")
        );
    }
}

mod rendering {
    use super::*;

    #[test]
    fn test_markdown_table() {
        let temp_dir = create_test_project();
        let (project, old) = collect_installed(temp_dir.path(), false).unwrap();
        upgrade(temp_dir.path());
        let (_, new) = collect_installed(temp_dir.path(), false).unwrap();

        let table = to_markdown(&project, &old, &new);
        assert_eq!(
            table,
            [
                "| Name | Updating | dependencies |",
                "| :---- | :--------: | :-: |",
                "| [react](https://reactjs.org/) | 15.0.0...16.8.6 | * |",
            ]
            .join("\n")
        );
    }

    #[test]
    fn test_text_table_without_changes() {
        let temp_dir = create_test_project();
        let (project, old) = collect_installed(temp_dir.path(), false).unwrap();

        let table = to_text_table(&project, &old, &old, false);
        assert_eq!(
            table,
            [
                "==================",
                "| Name | Updating |",
                "==================",
            ]
            .join("\n")
        );
    }

    #[test]
    fn test_pull_request_body_for_two_projects() {
        let sections = vec![
            ProjectSection {
                directory: "web".to_string(),
                table: "| a |".to_string(),
            },
            ProjectSection {
                directory: "api".to_string(),
                table: "| b |".to_string(),
            },
        ];
        let body = pull_request_body(&sections);

        assert!(body.starts_with("## Updating Dependencies\n"));
        assert!(body.contains("### web\n| a |\n"));
        assert!(body.contains("### api\n| b |\n"));
        assert!(body.ends_with(&format!(
            "Powered by package-update {}",
            env!("CARGO_PKG_VERSION")
        )));
    }
}
