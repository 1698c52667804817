//! Installed package discovery under node_modules
//!
//! Features:
//! - Reads every `node_modules/<name>/package.json`
//! - Descends one level into `@scope` directories
//! - Skips dot-directories such as `.bin` and `.cache`
//! - Filters out shadow (undeclared) packages unless requested

use super::read_manifest;
use crate::domain::{Manifest, ManifestsByName};
use crate::error::ManifestError;
use log::*;
use std::fs;
use std::path::{Path, PathBuf};

/// Directory holding installed packages
const MODULES_DIR: &str = "node_modules";

/// List installed package directories in a stable order
pub fn module_dirs(project_dir: &Path) -> Vec<PathBuf> {
    let modules = project_dir.join(MODULES_DIR);
    let mut dirs = Vec::new();

    for entry in sorted_subdirs(&modules) {
        let Some(file_name) = entry.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if file_name.starts_with('.') {
            continue;
        }
        if file_name.starts_with('@') {
            dirs.extend(
                sorted_subdirs(&entry)
                    .into_iter()
                    .filter(|d| !is_hidden(d)),
            );
        } else {
            dirs.push(entry);
        }
    }

    dirs
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with('.'))
}

fn sorted_subdirs(dir: &Path) -> Vec<PathBuf> {
    let Ok(entries) = fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut dirs: Vec<PathBuf> = entries
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_dir())
        .collect();
    dirs.sort();
    dirs
}

/// Collect installed manifests for a project directory.
///
/// Returns the project's own manifest together with the installed
/// manifests keyed by package name. Packages the project does not declare
/// in `dependencies`, `devDependencies` or `optionalDependencies` are left
/// out unless `with_shadows` is set.
pub fn collect_installed(
    project_dir: &Path,
    with_shadows: bool,
) -> Result<(Manifest, ManifestsByName), ManifestError> {
    let project = read_manifest(&project_dir.join("package.json"))?;
    debug!("project manifest {} {}", project.name, project.version);

    let mut installed = ManifestsByName::new();
    for dir in module_dirs(project_dir) {
        let path = dir.join("package.json");
        if !path.exists() {
            continue;
        }
        let manifest = match read_manifest(&path) {
            Ok(m) => m,
            Err(e) => {
                warn!("skipping {}: {}", dir.display(), e);
                continue;
            }
        };
        if manifest.name.is_empty() {
            continue;
        }
        if !with_shadows && !project.declares_directly(&manifest.name) {
            continue;
        }
        installed.insert(manifest.name.clone(), manifest);
    }

    info!(
        "collected {} installed packages in {}",
        installed.len(),
        project_dir.display()
    );
    Ok((project, installed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_package(root: &Path, rel: &str, content: &str) {
        let dir = root.join(rel);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("package.json"), content).unwrap();
    }

    fn fixture() -> TempDir {
        let temp = tempfile::tempdir().unwrap();
        let root = temp.path();
        fs::write(
            root.join("package.json"),
            r#"{
                "name": "app",
                "version": "1.0.0",
                "dependencies": { "react": "^16.0.0", "@babel/core": "^7.0.0" },
                "devDependencies": { "jest": "^24.0.0" }
            }"#,
        )
        .unwrap();
        write_package(root, "node_modules/react", r#"{"name": "react", "version": "16.8.6"}"#);
        write_package(root, "node_modules/jest", r#"{"name": "jest", "version": "24.8.0"}"#);
        write_package(
            root,
            "node_modules/loose-envify",
            r#"{"name": "loose-envify", "version": "1.4.0"}"#,
        );
        write_package(
            root,
            "node_modules/@babel/core",
            r#"{"name": "@babel/core", "version": "7.4.5"}"#,
        );
        fs::create_dir_all(root.join("node_modules/.bin")).unwrap();
        temp
    }

    #[test]
    fn test_module_dirs_sorted_with_scopes() {
        let temp = fixture();
        let names: Vec<_> = module_dirs(temp.path())
            .iter()
            .map(|p| {
                p.strip_prefix(temp.path().join("node_modules"))
                    .unwrap()
                    .to_string_lossy()
                    .replace('\\', "/")
            })
            .collect();
        assert_eq!(names, vec!["@babel/core", "jest", "loose-envify", "react"]);
    }

    #[test]
    fn test_collect_without_shadows() {
        let temp = fixture();
        let (project, installed) = collect_installed(temp.path(), false).unwrap();

        assert_eq!(project.name, "app");
        let names: Vec<_> = installed.keys().cloned().collect();
        assert_eq!(names, vec!["@babel/core", "jest", "react"]);
        assert_eq!(installed["react"].version, "16.8.6");
    }

    #[test]
    fn test_collect_with_shadows() {
        let temp = fixture();
        let (_, installed) = collect_installed(temp.path(), true).unwrap();
        assert!(installed.contains_key("loose-envify"));
        assert_eq!(installed.len(), 4);
    }

    #[test]
    fn test_collect_without_node_modules() {
        let temp = tempfile::tempdir().unwrap();
        fs::write(temp.path().join("package.json"), r#"{"name": "app"}"#).unwrap();

        let (_, installed) = collect_installed(temp.path(), true).unwrap();
        assert!(installed.is_empty());
    }

    #[test]
    fn test_collect_skips_broken_manifest() {
        let temp = fixture();
        write_package(temp.path(), "node_modules/broken", "{ not json");

        let (_, installed) = collect_installed(temp.path(), true).unwrap();
        assert!(!installed.contains_key("broken"));
        assert_eq!(installed.len(), 4);
    }

    #[test]
    fn test_collect_requires_project_manifest() {
        let temp = tempfile::tempdir().unwrap();
        let err = collect_installed(temp.path(), false).unwrap_err();
        assert!(matches!(err, ManifestError::ReadError { .. }));
    }
}
