//! Update orchestrator for coordinating one unattended run
//!
//! This module provides:
//! - Workflow coordination: branch → install → snapshot → update → snapshot →
//!   commit → push → pull request
//! - Detection of a previous run through a hash of the project manifests
//! - Dry-run mode that prints the comparison table instead of pushing
//! - Cleanup of the working branch unless asked to keep it

use crate::cli::CliArgs;
use crate::domain::{Manifest, ManifestsByName};
use crate::error::{AppError, ManifestError};
use crate::forge::{CreatePrRequest, Forge, GitHub, RepoCoordinates};
use crate::git::Git;
use crate::manifest::collect_installed;
use crate::output::{pull_request_body, to_markdown, to_text_table, ProjectSection};
use crate::package_manager::{run_installs, run_update, CommandRunner, SystemCommandRunner};
use crate::progress::{step_message, Progress};
use log::*;
use sha2::{Digest, Sha256};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Remote that receives the working branch
const REMOTE: &str = "origin";

/// Before and after state of one project directory
#[derive(Debug, Clone)]
pub struct Snapshot {
    /// Directory as configured, relative to the workspace
    pub directory: String,
    /// The project's own manifest before the update
    pub project: Manifest,
    pub old: ManifestsByName,
    pub new: ManifestsByName,
}

impl Snapshot {
    /// Markdown table for this project
    pub fn markdown(&self) -> String {
        to_markdown(&self.project, &self.old, &self.new)
    }

    /// Aligned text table for this project
    pub fn text(&self, color: bool) -> String {
        to_text_table(&self.project, &self.old, &self.new, color)
    }
}

/// How a run ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// A branch for the same manifests already exists on the remote
    ExistingBranch { name: String, sha: String },
    /// The update command changed nothing
    NoUpdates,
    /// Not executing: the console report that would have been proposed
    DryRun { report: String },
    /// The pull request was opened
    PullRequestCreated { number: u64, url: Option<String> },
}

impl fmt::Display for RunOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunOutcome::ExistingBranch { name, sha } => {
                write!(f, "Found existing branch {} {}", name, sha)
            }
            RunOutcome::NoUpdates => write!(f, "Did not find outdated dependencies."),
            RunOutcome::DryRun { report } => write!(f, "{}", report),
            RunOutcome::PullRequestCreated { number, url } => match url {
                Some(url) => write!(f, "Created pull request #{} {}", number, url),
                None => write!(f, "Created pull request #{}", number),
            },
        }
    }
}

/// SHA-256 hex digest identifying the current set of project manifests
pub fn manifest_hash(contents: &[String]) -> String {
    let mut hasher = Sha256::new();
    for content in contents {
        hasher.update(content.as_bytes());
    }
    hex::encode(hasher.finalize())
}

/// Working branch name: `{prefix}{timestamp}/{hash}`
pub fn branch_name(prefix: &str, timestamp: &str, hash: &str) -> String {
    format!("{}{}/{}", prefix, timestamp, hash)
}

/// Orchestrator for one update run
pub struct Orchestrator {
    /// CLI arguments for configuration
    args: CliArgs,
    runner: Arc<dyn CommandRunner>,
    git: Git,
    forge: Box<dyn Forge>,
    /// Timestamp used in the branch name and pull request title
    timestamp: String,
    /// Whether the console table may use ANSI styling
    color: bool,
    progress: Progress,
}

impl Orchestrator {
    /// Create an orchestrator talking to the real git binary and GitHub
    pub fn new(args: CliArgs, color: bool, progress: Progress) -> Result<Self, AppError> {
        let runner: Arc<dyn CommandRunner> = Arc::new(SystemCommandRunner::new());
        let git = Git::new(runner.clone(), &args.workspace);
        let repo = RepoCoordinates::from_remote_url(&git.remote_url(REMOTE)?)?;
        info!("repository {}/{} on {}", repo.owner, repo.name, repo.host);
        let forge = Box::new(GitHub::new(repo, &args.token)?);
        let timestamp = chrono::Local::now().format("%Y%m%d%H%M").to_string();

        Ok(Self {
            args,
            runner,
            git,
            forge,
            timestamp,
            color,
            progress,
        })
    }

    /// Create an orchestrator with injected collaborators (for testing)
    pub fn with_parts(
        args: CliArgs,
        runner: Arc<dyn CommandRunner>,
        forge: Box<dyn Forge>,
        timestamp: impl Into<String>,
    ) -> Self {
        let git = Git::new(runner.clone(), &args.workspace);
        Self {
            args,
            runner,
            git,
            forge,
            timestamp: timestamp.into(),
            color: false,
            progress: Progress::disabled(),
        }
    }

    /// Run the update workflow
    pub async fn run(&self) -> Result<RunOutcome, AppError> {
        let original = self.git.current_ref()?;

        info!("START makeBranch");
        let hash = manifest_hash(&self.read_project_manifests()?);
        let branches = self.forge.list_branches().await?;
        if let Some(found) = branches.into_iter().find(|b| b.name.ends_with(&hash)) {
            info!("found branch is {}", found.name);
            return Ok(RunOutcome::ExistingBranch {
                name: found.name,
                sha: found.sha,
            });
        }
        let branch = branch_name(&self.args.prefix, &self.timestamp, &hash);
        self.git.checkout_new(&branch)?;
        info!("END   makeBranch");

        let outcome = self.process(&branch).await;

        if !self.args.keep {
            self.cleanup(&original, &branch);
        }

        outcome
    }

    async fn process(&self, branch: &str) -> Result<RunOutcome, AppError> {
        let snapshots = self.upgrade()?;

        if !self.commit()? {
            return Ok(RunOutcome::NoUpdates);
        }

        if !self.args.execute {
            info!("git push is skipped. Because --execute is not specified.");
            return Ok(RunOutcome::DryRun {
                report: self.text_report(&snapshots),
            });
        }

        self.pull_request(branch, &snapshots).await
    }

    fn read_project_manifests(&self) -> Result<Vec<String>, ManifestError> {
        self.args
            .project_dirs()
            .into_iter()
            .map(|(_, dir)| {
                let path = dir.join("package.json");
                std::fs::read_to_string(&path).map_err(|e| ManifestError::read_error(path, e))
            })
            .collect()
    }

    fn upgrade(&self) -> Result<Vec<Snapshot>, AppError> {
        info!("START upgrade");
        let dirs = self.args.project_dirs();
        let total = dirs.len();

        let mut before: Vec<(String, PathBuf, Manifest, ManifestsByName)> = Vec::new();
        for (index, (name, dir)) in dirs.into_iter().enumerate() {
            self.install(&dir, &step_message("install", &name, index, total))?;
            let (project, old) = collect_installed(&dir, self.args.with_shadows)?;
            before.push((name, dir, project, old));
        }

        let mut snapshots = Vec::new();
        for (index, (directory, dir, project, old)) in before.into_iter().enumerate() {
            let updated = self.progress.while_running(
                step_message(&self.args.update, &directory, index, total),
                || run_update(self.runner.as_ref(), &self.args.update, &dir),
            );
            if let Err(e) = updated {
                info!("FAILED upgrade");
                return Err(e.into());
            }

            self.install(&dir, &step_message("reinstall", &directory, index, total))?;
            let (_, new) = collect_installed(&dir, self.args.with_shadows)?;
            snapshots.push(Snapshot {
                directory,
                project,
                old,
                new,
            });
        }
        info!("END   upgrade");
        Ok(snapshots)
    }

    fn install(&self, dir: &Path, label: &str) -> Result<(), AppError> {
        info!("START install");
        let result = self
            .progress
            .while_running(label, || run_installs(self.runner.as_ref(), dir));
        info!("END   install");
        Ok(result?)
    }

    /// Commit every change; false if the work tree is clean
    fn commit(&self) -> Result<bool, AppError> {
        info!("START commit");
        let status = self.git.status()?;
        if status.is_empty() {
            info!("END   commit");
            return Ok(false);
        }
        info!("files are changed");
        debug!("changed files are {:?}", status);

        self.git.setup(&self.args.username, &self.args.useremail)?;
        self.git.add_all()?;
        self.git.commit(&self.args.message)?;
        info!("END   commit");
        Ok(true)
    }

    async fn pull_request(&self, branch: &str, snapshots: &[Snapshot]) -> Result<RunOutcome, AppError> {
        info!("START pullRequest");
        self.git.push(REMOTE, branch)?;

        let sections: Vec<ProjectSection> = snapshots
            .iter()
            .map(|s| ProjectSection {
                directory: s.directory.clone(),
                table: s.markdown(),
            })
            .collect();
        let req = CreatePrRequest {
            title: format!("{} at {}", crate::cli::DEFAULT_MESSAGE, self.timestamp),
            head_branch: branch.to_string(),
            base_branch: self.args.target_branch().to_string(),
            body: pull_request_body(&sections),
        };
        debug!("{:?}", req);

        let pr = self.forge.create_pull_request(req).await?;
        info!("END   pullRequest");
        Ok(RunOutcome::PullRequestCreated {
            number: pr.number,
            url: pr.url,
        })
    }

    fn text_report(&self, snapshots: &[Snapshot]) -> String {
        if let [only] = snapshots {
            return only.text(self.color);
        }
        snapshots
            .iter()
            .map(|s| format!("{}\n{}", s.directory, s.text(self.color)))
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    fn cleanup(&self, original: &str, branch: &str) {
        if let Err(e) = self
            .git
            .checkout(original)
            .and_then(|_| self.git.delete_branch(branch))
        {
            warn!("failed to remove working branch {}: {}", branch, e);
        }
    }
}
