//! package.json manifest model
//!
//! Only the fields needed for comparison and classification are modelled;
//! everything else in a package.json is ignored on deserialization.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Dependency name → version constraint, as declared in a dependency group
pub type Dependencies = BTreeMap<String, String>;

/// Installed manifests keyed by package name, in collection order
pub type ManifestsByName = IndexMap<String, Manifest>;

/// The `repository` field of a package.json
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Repository {
    /// Shorthand form such as `"facebook/react"`
    Shorthand(String),
    /// Structured form such as `{ "type": "git", "url": "..." }`
    Structured {
        #[serde(rename = "type", default)]
        kind: Option<String>,
        #[serde(default)]
        url: Option<String>,
    },
}

/// A package descriptor (package.json)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    /// Package name
    #[serde(default)]
    pub name: String,
    /// Declared version
    #[serde(default)]
    pub version: String,
    /// Project homepage
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub homepage: Option<String>,
    /// Source repository reference
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository: Option<Repository>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependencies: Option<Dependencies>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dev_dependencies: Option<Dependencies>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub peer_dependencies: Option<Dependencies>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub optional_dependencies: Option<Dependencies>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bundled_dependencies: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bundle_dependencies: Option<Vec<String>>,
}

impl Manifest {
    /// Create a manifest with just a name and version
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            ..Self::default()
        }
    }

    /// Set the homepage (builder pattern)
    pub fn with_homepage(mut self, homepage: impl Into<String>) -> Self {
        self.homepage = Some(homepage.into());
        self
    }

    /// Set the repository reference (builder pattern)
    pub fn with_repository(mut self, repository: Repository) -> Self {
        self.repository = Some(repository);
        self
    }

    /// Parse a manifest from package.json content
    pub fn from_json(content: &str) -> serde_json::Result<Self> {
        serde_json::from_str(content)
    }

    /// Returns true if `name` is declared in `dependencies`, `devDependencies`
    /// or `optionalDependencies`
    pub fn declares_directly(&self, name: &str) -> bool {
        [
            &self.dependencies,
            &self.dev_dependencies,
            &self.optional_dependencies,
        ]
        .into_iter()
        .any(|group| contains(group, name))
    }
}

pub(crate) fn contains(group: &Option<Dependencies>, name: &str) -> bool {
    group.as_ref().is_some_and(|deps| deps.contains_key(name))
}

pub(crate) fn lists(group: &Option<Vec<String>>, name: &str) -> bool {
    group.as_ref().is_some_and(|names| names.iter().any(|n| n == name))
}
