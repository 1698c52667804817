//! CLI argument parsing module for package-update
//!
//! Every option can also be supplied through an environment variable so the
//! tool can be configured entirely from a CI job definition.

use crate::error::ConfigError;
use clap::builder::BoolishValueParser;
use clap::Parser;
use log::LevelFilter;
use regex::Regex;
use std::path::PathBuf;
use std::str::FromStr;

/// Default working branch prefix
pub const DEFAULT_PREFIX: &str = "package-update/";

/// Default commit message
pub const DEFAULT_MESSAGE: &str = "update dependencies";

/// Open a pull request that updates npm dependencies
#[derive(Parser, Debug, Clone)]
#[command(
    name = "package-update",
    version,
    about = "Update npm dependencies and open a pull request with a version comparison table"
)]
pub struct CliArgs {
    /// Repository checkout to work in
    #[arg(long, env = "GITHUB_WORKSPACE", default_value = "./")]
    pub workspace: PathBuf,

    /// Access token for the repository hosting API
    #[arg(long, env = "GITHUB_TOKEN", default_value = "", hide_env_values = true)]
    pub token: String,

    /// Commit author name
    #[arg(long, env = "AUTHOR_NAME", default_value = "")]
    pub username: String,

    /// Commit author email
    #[arg(long, env = "AUTHOR_EMAIL", default_value = "")]
    pub useremail: String,

    /// Working branch prefix
    #[arg(long, env = "BRANCH_PREFIX", default_value = DEFAULT_PREFIX)]
    pub prefix: String,

    /// Commit message
    #[arg(long, env = "COMMIT_MESSAGE", default_value = DEFAULT_MESSAGE)]
    pub message: String,

    /// Pull request target branch
    #[arg(long, env = "BASE_BRANCH", default_value = "master")]
    pub target: String,

    /// Command that rewrites package.json with newer versions
    #[arg(long, env = "UPDATE_COMMAND", default_value = "npm-check-updates -u")]
    pub update: String,

    /// Project directory relative to the workspace (can be specified multiple times)
    #[arg(long = "project", default_value = ".")]
    pub projects: Vec<PathBuf>,

    /// Include changes of installed packages the project does not declare
    #[arg(long, env = "WITH_SHADOWS", value_parser = BoolishValueParser::new())]
    pub with_shadows: bool,

    /// Push and open the pull request; without it the run only prints a table
    #[arg(long, env = "EXECUTE", value_parser = BoolishValueParser::new())]
    pub execute: bool,

    /// Keep the working branch after the run
    #[arg(long, env = "KEEP", value_parser = BoolishValueParser::new())]
    pub keep: bool,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, env = "LOG_LEVEL", default_value = "warn")]
    pub log_level: String,
}

impl CliArgs {
    /// Check option combinations clap cannot express
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.level_filter()?;

        if !self.useremail.is_empty() && !is_email(&self.useremail) {
            return Err(ConfigError::InvalidEmail {
                value: self.useremail.clone(),
            });
        }

        if self.execute && self.token.is_empty() {
            return Err(ConfigError::MissingForExecute { name: "token" });
        }

        if !self.workspace.is_dir() {
            return Err(ConfigError::InvalidPath {
                path: self.workspace.clone(),
                message: "not a directory".to_string(),
            });
        }

        Ok(())
    }

    /// Parsed log level
    pub fn level_filter(&self) -> Result<LevelFilter, ConfigError> {
        LevelFilter::from_str(&self.log_level).map_err(|_| ConfigError::InvalidLogLevel {
            value: self.log_level.clone(),
        })
    }

    /// Target branch name without a `refs/heads/` prefix
    pub fn target_branch(&self) -> &str {
        self.target
            .strip_prefix("refs/heads/")
            .unwrap_or(&self.target)
    }

    /// Project directories resolved against the workspace
    pub fn project_dirs(&self) -> Vec<(String, PathBuf)> {
        self.projects
            .iter()
            .map(|p| (p.display().to_string(), self.workspace.join(p)))
            .collect()
    }
}

fn is_email(value: &str) -> bool {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$")
        .map(|re| re.is_match(value))
        .unwrap_or(false)
}
