//! package.json reading and installed dependency collection
//!
//! This module provides functionality to:
//! - Read and parse a single package.json
//! - Snapshot the installed dependency tree of a project directory

mod installed;

pub use installed::{collect_installed, module_dirs};

use crate::domain::Manifest;
use crate::error::ManifestError;
use std::fs;
use std::path::Path;

/// Read and parse a package.json file
pub fn read_manifest(path: &Path) -> Result<Manifest, ManifestError> {
    let content = fs::read_to_string(path).map_err(|e| ManifestError::read_error(path, e))?;
    Manifest::from_json(&content).map_err(|e| ManifestError::json_parse_error(path, e.to_string()))
}
