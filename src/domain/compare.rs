//! Comparison records for dependencies whose installed version changed
//!
//! This module provides:
//! - `CompareModel`: one dependency's old → new version change
//! - Classification against the project manifest
//! - Repository URL derivation and tag-based comparison links
//! - `build_compare_models`: selection of changed dependencies

use super::category::DependencyCategory;
use super::manifest::{Manifest, ManifestsByName, Repository};
use crate::error::CompareError;
use git_url_parse::{GitUrl, Scheme};
use std::collections::BTreeSet;

/// One dependency's version change, ready for rendering
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompareModel {
    name: String,
    current: String,
    wanted: String,
    category: DependencyCategory,
    repo: Option<String>,
    homepage: Option<String>,
    tags: BTreeSet<String>,
}

impl CompareModel {
    /// Build a record from the project manifest and the old/new manifests
    /// of one dependency.
    ///
    /// Fails if the new manifest carries no version, which means the caller
    /// paired manifests that were never selected for comparison.
    pub fn new(project: &Manifest, old: &Manifest, new: &Manifest) -> Result<Self, CompareError> {
        if new.version.is_empty() {
            return Err(CompareError::MissingWantedVersion {
                name: old.name.clone(),
            });
        }

        Ok(Self {
            name: old.name.clone(),
            current: old.version.clone(),
            wanted: new.version.clone(),
            category: DependencyCategory::classify(&old.name, project),
            repo: old.repository.as_ref().and_then(repository_url),
            homepage: old.homepage.clone(),
            tags: BTreeSet::new(),
        })
    }

    /// Attach known version-control tags (builder pattern)
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags.extend(tags.into_iter().map(Into::into));
        self
    }

    /// Record a tag known to exist in the dependency's repository
    pub fn add_tag(&mut self, tag: impl Into<String>) {
        self.tags.insert(tag.into());
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn current(&self) -> &str {
        &self.current
    }

    pub fn wanted(&self) -> &str {
        &self.wanted
    }

    pub fn category(&self) -> DependencyCategory {
        self.category
    }

    /// Base URL of the source repository, without a `.git` suffix
    pub fn repo(&self) -> Option<&str> {
        self.repo.as_deref()
    }

    pub fn homepage(&self) -> Option<&str> {
        self.homepage.as_deref()
    }

    pub fn tags(&self) -> &BTreeSet<String> {
        &self.tags
    }

    /// `current...wanted`, or a single version if they are equal
    pub fn range_wanted(&self) -> String {
        if self.current == self.wanted {
            self.current.clone()
        } else {
            format!("{}...{}", self.current, self.wanted)
        }
    }

    /// Link to the tree or comparison view for the version change.
    ///
    /// Returns `None` unless the repository is known and every tag the link
    /// needs is in the known tag set.
    pub fn diff_wanted_url(&self) -> Option<String> {
        let repo = self.repo.as_deref()?;
        if self.current == self.wanted {
            let tag = self.resolve_tag(&self.current)?;
            return Some(format!("{}/tree/{}", repo, tag));
        }
        let from = self.resolve_tag(&self.current)?;
        let to = self.resolve_tag(&self.wanted)?;
        Some(format!("{}/compare/{}...{}", repo, from, to))
    }

    /// Map a version to a known tag, preferring the `v`-prefixed form
    fn resolve_tag(&self, version: &str) -> Option<String> {
        let prefixed = format!("v{}", version);
        if self.tags.contains(&prefixed) {
            Some(prefixed)
        } else if self.tags.contains(version) {
            Some(version.to_string())
        } else {
            None
        }
    }
}

/// Select every dependency whose version changed and build its record.
///
/// Output order follows the iteration order of `old`. Names missing from
/// `new`, or whose new version is empty or unchanged, are skipped.
pub fn build_compare_models(
    project: &Manifest,
    old: &ManifestsByName,
    new: &ManifestsByName,
) -> Vec<CompareModel> {
    old.iter()
        .filter_map(|(name, o)| {
            let n = new.get(name)?;
            if n.version.is_empty() || n.version == o.version {
                return None;
            }
            CompareModel::new(project, o, n).ok()
        })
        .collect()
}

/// Derive an https repository URL from a package.json `repository` field
pub fn repository_url(repository: &Repository) -> Option<String> {
    match repository {
        Repository::Shorthand(shorthand) => shorthand_url(shorthand),
        Repository::Structured { url, .. } => url.as_deref().and_then(git_url),
    }
}

/// Hosts behind npm's `host:owner/name` repository shorthands
const HOSTED_SHORTHANDS: [(&str, &str); 3] = [
    ("github", "github.com"),
    ("gitlab", "gitlab.com"),
    ("bitbucket", "bitbucket.org"),
];

/// `owner/name` → `https://github.com/owner/name`
fn shorthand_url(shorthand: &str) -> Option<String> {
    hosted_url("github.com", shorthand)
}

fn hosted_url(host: &str, path: &str) -> Option<String> {
    let segments: Vec<&str> = path.split('/').collect();
    match segments.as_slice() {
        [owner, name] if !owner.is_empty() && !name.is_empty() => {
            Some(format!("https://{}/{}/{}", host, owner, name))
        }
        _ => None,
    }
}

/// `github:owner/name` and friends. `Some(None)` for a prefixed form that
/// names no repository (e.g. `gist:`).
fn prefixed_shorthand_url(raw: &str) -> Option<Option<String>> {
    let (prefix, rest) = raw.split_once(':')?;
    if rest.starts_with("//") || prefix.contains(['@', '/', '.']) {
        return None;
    }
    if prefix == "gist" {
        return Some(None);
    }
    HOSTED_SHORTHANDS
        .iter()
        .find(|(name, _)| *name == prefix)
        .map(|(_, host)| hosted_url(host, rest.trim_end_matches(".git")))
}

fn git_url(raw: &str) -> Option<String> {
    let raw = raw.trim();
    if let Some(url) = prefixed_shorthand_url(raw) {
        return url;
    }

    // npm writes `git+https://` and `git+ssh://`; the parser only knows the
    // bare schemes
    let normalized = raw.strip_prefix("git+").unwrap_or(raw);
    let parsed = GitUrl::parse(normalized).ok()?;

    let url = match parsed.host.as_deref() {
        Some(host) if !host.is_empty() => {
            let path = parsed.path.trim_start_matches([':', '/']);
            if path.is_empty() {
                return None;
            }
            // an ssh port says nothing about the web server
            match parsed.port {
                Some(port) if matches!(parsed.scheme, Scheme::Http | Scheme::Https) => {
                    format!("https://{}:{}/{}", host, port, path)
                }
                _ => format!("https://{}/{}", host, path),
            }
        }
        _ => shorthand_url(normalized.trim_end_matches(".git"))?,
    };

    let url = url.trim_end_matches('/');
    Some(url.strip_suffix(".git").unwrap_or(url).to_string())
}
