//! Core domain models for package-update
//!
//! This module contains the fundamental types used throughout the application:
//! - package.json manifests and their repository references
//! - Dependency declaration categories
//! - Comparison records for changed dependencies

mod category;
mod compare;
mod manifest;

pub use category::DependencyCategory;
pub use compare::{build_compare_models, repository_url, CompareModel};
pub use manifest::{Dependencies, Manifest, ManifestsByName, Repository};
