//! Application error types using thiserror
//!
//! Error hierarchy:
//! - ManifestError: Issues reading or parsing package.json files
//! - CompareError: Comparison records assembled from inconsistent input
//!   (returned by `CompareModel::new`; the run itself skips such pairs)
//! - CommandError: External commands (installers, update command) failing
//! - GitError: Local git operations failing
//! - ForgeError: Repository hosting API failures
//! - ConfigError: Invalid CLI / environment configuration

use std::path::PathBuf;
use thiserror::Error;

/// Application-level error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Manifest file related errors
    #[error(transparent)]
    Manifest(#[from] ManifestError),

    /// External command errors
    #[error(transparent)]
    Command(#[from] CommandError),

    /// Git errors
    #[error(transparent)]
    Git(#[from] GitError),

    /// Repository hosting errors
    #[error(transparent)]
    Forge(#[from] ForgeError),

    /// Configuration related errors
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Errors related to manifest file operations
#[derive(Error, Debug)]
pub enum ManifestError {
    /// Failed to read manifest file
    #[error("failed to read manifest file {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON parsing error
    #[error("failed to parse JSON in {path}: {message}")]
    JsonParseError { path: PathBuf, message: String },
}

/// Errors raised when comparison records are built from broken input
#[derive(Error, Debug, PartialEq, Eq)]
pub enum CompareError {
    /// The new manifest of a compared dependency has no version
    #[error("no wanted version for '{name}': the new manifest is missing or has an empty version")]
    MissingWantedVersion { name: String },
}

/// Errors related to running external commands
#[derive(Error, Debug)]
pub enum CommandError {
    /// Command could not be started
    #[error("failed to execute '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// Command exited with a non-zero status
    #[error("'{command}' failed: {stderr}")]
    Failed { command: String, stderr: String },

    /// Command line was empty
    #[error("empty command")]
    Empty,
}

/// Errors related to git operations
#[derive(Error, Debug)]
pub enum GitError {
    /// git invocation failed
    #[error("git {args} failed: {message}")]
    CommandFailed { args: String, message: String },

    /// Remote URL could not be parsed
    #[error("invalid remote url '{url}': {message}")]
    InvalidRemote { url: String, message: String },
}

/// Errors related to the repository hosting service
#[derive(Error, Debug)]
pub enum ForgeError {
    /// API request failed
    #[error("{operation} failed: {message}")]
    Api { operation: String, message: String },

    /// Client could not be constructed
    #[error("failed to create client for {host}: {message}")]
    Client { host: String, message: String },
}

/// Errors related to configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Author email is not an email address
    #[error("invalid author email '{value}'")]
    InvalidEmail { value: String },

    /// A value required in execute mode is missing
    #[error("missing {name}: required when --execute is set")]
    MissingForExecute { name: &'static str },

    /// Unknown log level
    #[error("invalid log level '{value}': expected one of off, error, warn, info, debug, trace")]
    InvalidLogLevel { value: String },

    /// Invalid path
    #[error("invalid path '{path}': {message}")]
    InvalidPath { path: PathBuf, message: String },
}

impl ManifestError {
    /// Creates a new ReadError
    pub fn read_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ManifestError::ReadError {
            path: path.into(),
            source,
        }
    }

    /// Creates a new JsonParseError
    pub fn json_parse_error(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        ManifestError::JsonParseError {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl CommandError {
    /// Creates a new Failed error
    pub fn failed(command: impl Into<String>, stderr: impl Into<String>) -> Self {
        CommandError::Failed {
            command: command.into(),
            stderr: stderr.into(),
        }
    }
}

impl GitError {
    /// Creates a new CommandFailed error
    pub fn command_failed(args: &[&str], message: impl Into<String>) -> Self {
        GitError::CommandFailed {
            args: args.join(" "),
            message: message.into(),
        }
    }
}

impl ForgeError {
    /// Creates a new Api error
    pub fn api(operation: impl Into<String>, message: impl ToString) -> Self {
        ForgeError::Api {
            operation: operation.into(),
            message: message.to_string(),
        }
    }
}
