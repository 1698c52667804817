//! Repository hosting integration
//!
//! This module provides:
//! - Repository coordinates derived from the `origin` remote
//! - The `Forge` trait used by the orchestrator
//! - A GitHub / GitHub Enterprise implementation backed by octocrab

use crate::error::{ForgeError, GitError};
use async_trait::async_trait;
use git_url_parse::GitUrl;
use log::*;
use octocrab::Octocrab;

/// Public GitHub host
pub const GITHUB_HOST: &str = "github.com";

/// Where the repository lives on its hosting service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoCoordinates {
    pub host: String,
    pub owner: String,
    pub name: String,
}

impl RepoCoordinates {
    /// Parse a remote URL (https, ssh or scp-like)
    pub fn from_remote_url(url: &str) -> Result<Self, GitError> {
        let invalid = |message: &str| GitError::InvalidRemote {
            url: url.to_string(),
            message: message.to_string(),
        };

        let parsed = GitUrl::parse(url.trim()).map_err(|e| invalid(&e.to_string()))?;
        let host = parsed
            .host
            .filter(|h| !h.is_empty())
            .ok_or_else(|| invalid("remote has no host"))?;
        let owner = parsed
            .owner
            .filter(|o| !o.is_empty())
            .ok_or_else(|| invalid("remote has no owner"))?;

        Ok(Self {
            host,
            owner,
            name: parsed.name,
        })
    }

    /// REST API root for this host
    pub fn api_base_uri(&self) -> String {
        if self.host == GITHUB_HOST {
            "https://api.github.com".to_string()
        } else {
            format!("https://{}/api/v3", self.host)
        }
    }
}

/// A branch on the remote
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteBranch {
    pub name: String,
    pub sha: String,
}

/// Request to open a pull request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatePrRequest {
    pub title: String,
    pub head_branch: String,
    pub base_branch: String,
    pub body: String,
}

/// A created pull request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequest {
    pub number: u64,
    pub url: Option<String>,
}

/// Repository hosting operations the update workflow needs
#[async_trait]
pub trait Forge: Send + Sync {
    /// All branches of the repository
    async fn list_branches(&self) -> Result<Vec<RemoteBranch>, ForgeError>;

    /// Open a pull request
    async fn create_pull_request(&self, req: CreatePrRequest) -> Result<PullRequest, ForgeError>;
}

/// GitHub implementation of [`Forge`]
pub struct GitHub {
    repo: RepoCoordinates,
    instance: Octocrab,
}

impl GitHub {
    /// Create a GitHub client, authenticated with a personal access token
    /// unless `token` is empty
    pub fn new(repo: RepoCoordinates, token: &str) -> Result<Self, ForgeError> {
        let client_error = |e: octocrab::Error| ForgeError::Client {
            host: repo.host.clone(),
            message: e.to_string(),
        };
        let mut builder = Octocrab::builder();
        if !token.is_empty() {
            builder = builder.personal_token(token.to_string());
        }
        let instance = builder
            .base_uri(repo.api_base_uri())
            .map_err(client_error)?
            .build()
            .map_err(client_error)?;

        debug!("github client for {}", repo.api_base_uri());
        Ok(Self { repo, instance })
    }
}

#[async_trait]
impl Forge for GitHub {
    async fn list_branches(&self) -> Result<Vec<RemoteBranch>, ForgeError> {
        let page = self
            .instance
            .repos(&self.repo.owner, &self.repo.name)
            .list_branches()
            .per_page(100)
            .send()
            .await
            .map_err(|e| ForgeError::api("list branches", e))?;

        let branches = self
            .instance
            .all_pages(page)
            .await
            .map_err(|e| ForgeError::api("list branches", e))?;

        Ok(branches
            .into_iter()
            .map(|b| RemoteBranch {
                name: b.name,
                sha: b.commit.sha,
            })
            .collect())
    }

    async fn create_pull_request(&self, req: CreatePrRequest) -> Result<PullRequest, ForgeError> {
        info!(
            "creating pull request {} -> {}",
            req.head_branch, req.base_branch
        );
        let pr = self
            .instance
            .pulls(&self.repo.owner, &self.repo.name)
            .create(req.title, req.head_branch, req.base_branch)
            .body(req.body)
            .send()
            .await
            .map_err(|e| ForgeError::api("create pull request", e))?;

        Ok(PullRequest {
            number: pr.number,
            url: pr.html_url.map(|u| u.to_string()),
        })
    }
}
