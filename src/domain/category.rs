//! Dependency declaration categories

use super::manifest::{contains, lists, Manifest};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The group a dependency is declared in by the project
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DependencyCategory {
    Dependencies,
    DevDependencies,
    PeerDependencies,
    OptionalDependencies,
    BundledDependencies,
    BundleDependencies,
    /// Installed, but not declared by the project in any other group
    Shadow,
}

impl DependencyCategory {
    /// All categories in canonical order. Classification and column
    /// derivation both follow this order.
    pub const ALL: [DependencyCategory; 7] = [
        DependencyCategory::Dependencies,
        DependencyCategory::DevDependencies,
        DependencyCategory::PeerDependencies,
        DependencyCategory::OptionalDependencies,
        DependencyCategory::BundledDependencies,
        DependencyCategory::BundleDependencies,
        DependencyCategory::Shadow,
    ];

    /// The package.json field name of this category
    pub fn as_str(&self) -> &'static str {
        match self {
            DependencyCategory::Dependencies => "dependencies",
            DependencyCategory::DevDependencies => "devDependencies",
            DependencyCategory::PeerDependencies => "peerDependencies",
            DependencyCategory::OptionalDependencies => "optionalDependencies",
            DependencyCategory::BundledDependencies => "bundledDependencies",
            DependencyCategory::BundleDependencies => "bundleDependencies",
            DependencyCategory::Shadow => "shadow",
        }
    }

    /// Classify `name` against the project manifest.
    ///
    /// The first group in [`DependencyCategory::ALL`] that declares the name
    /// wins, so a package listed in both `dependencies` and
    /// `devDependencies` is reported as `dependencies`.
    pub fn classify(name: &str, project: &Manifest) -> Self {
        Self::ALL
            .into_iter()
            .find(|category| category.declares(name, project))
            .unwrap_or(DependencyCategory::Shadow)
    }

    fn declares(&self, name: &str, project: &Manifest) -> bool {
        match self {
            DependencyCategory::Dependencies => contains(&project.dependencies, name),
            DependencyCategory::DevDependencies => contains(&project.dev_dependencies, name),
            DependencyCategory::PeerDependencies => contains(&project.peer_dependencies, name),
            DependencyCategory::OptionalDependencies => {
                contains(&project.optional_dependencies, name)
            }
            DependencyCategory::BundledDependencies => {
                lists(&project.bundled_dependencies, name)
            }
            DependencyCategory::BundleDependencies => lists(&project.bundle_dependencies, name),
            DependencyCategory::Shadow => false,
        }
    }
}

impl fmt::Display for DependencyCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
