//! Local git operations
//!
//! Shells out to the `git` binary in the workspace through a
//! [`CommandRunner`], so the same mock runner drives orchestration tests.

use crate::error::GitError;
use crate::package_manager::CommandRunner;
use log::*;
use std::path::PathBuf;
use std::sync::Arc;

/// One entry of `git status --porcelain=v1`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileStatus {
    /// Index status
    pub x: char,
    /// Work tree status
    pub y: char,
    pub path: String,
}

/// Parse porcelain v1 status output
pub fn parse_status(output: &str) -> Vec<FileStatus> {
    output
        .lines()
        .filter(|line| line.len() > 3)
        .filter_map(|line| {
            let mut chars = line.chars();
            let x = chars.next()?;
            let y = chars.next()?;
            Some(FileStatus {
                x,
                y,
                path: line.get(3..)?.to_string(),
            })
        })
        .collect()
}

/// git wrapper bound to one working directory
#[derive(Clone)]
pub struct Git {
    runner: Arc<dyn CommandRunner>,
    dir: PathBuf,
}

impl Git {
    pub fn new(runner: Arc<dyn CommandRunner>, dir: impl Into<PathBuf>) -> Self {
        Self {
            runner,
            dir: dir.into(),
        }
    }

    /// Run `git <args>` and return its trimmed stdout
    pub fn run(&self, args: &[&str]) -> Result<String, GitError> {
        let owned: Vec<String> = args.iter().map(|a| a.to_string()).collect();
        let output = self
            .runner
            .run("git", &owned, &self.dir)
            .map_err(|e| GitError::command_failed(args, e.to_string()))?;
        if !output.success {
            return Err(GitError::command_failed(args, output.stderr.trim()));
        }
        Ok(output.stdout.trim_end().to_string())
    }

    /// Configure the commit author for this repository
    pub fn setup(&self, name: &str, email: &str) -> Result<(), GitError> {
        if !name.is_empty() {
            self.run(&["config", "user.name", name])?;
        }
        if !email.is_empty() {
            self.run(&["config", "user.email", email])?;
        }
        Ok(())
    }

    pub fn current_branch(&self) -> Result<String, GitError> {
        self.run(&["rev-parse", "--abbrev-ref", "HEAD"])
            .map(|s| s.trim().to_string())
    }

    /// Full sha of the checked-out commit
    pub fn head_commit(&self) -> Result<String, GitError> {
        self.run(&["rev-parse", "HEAD"]).map(|s| s.trim().to_string())
    }

    /// Branch name, or the commit sha when HEAD is detached
    pub fn current_ref(&self) -> Result<String, GitError> {
        let branch = self.current_branch()?;
        if branch == "HEAD" {
            debug!("detached HEAD");
            return self.head_commit();
        }
        Ok(branch)
    }

    pub fn checkout(&self, branch: &str) -> Result<(), GitError> {
        self.run(&["checkout", branch]).map(|_| ())
    }

    /// Create `branch` and switch to it
    pub fn checkout_new(&self, branch: &str) -> Result<(), GitError> {
        info!("creating branch {}", branch);
        self.run(&["checkout", "-b", branch]).map(|_| ())
    }

    pub fn status(&self) -> Result<Vec<FileStatus>, GitError> {
        self.run(&["status", "--porcelain=v1"])
            .map(|out| parse_status(&out))
    }

    pub fn add_all(&self) -> Result<(), GitError> {
        self.run(&["add", "--all"]).map(|_| ())
    }

    pub fn commit(&self, message: &str) -> Result<(), GitError> {
        self.run(&["commit", "-m", message]).map(|_| ())
    }

    pub fn push(&self, remote: &str, branch: &str) -> Result<(), GitError> {
        info!("pushing {} to {}", branch, remote);
        self.run(&["push", remote, branch]).map(|_| ())
    }

    pub fn remote_url(&self, remote: &str) -> Result<String, GitError> {
        self.run(&["remote", "get-url", "--push", remote])
            .map(|s| s.trim().to_string())
    }

    pub fn delete_branch(&self, branch: &str) -> Result<(), GitError> {
        self.run(&["branch", "-D", branch]).map(|_| ())
    }
}
