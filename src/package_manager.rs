//! Package manager integration
//!
//! This module provides:
//! - A command runner abstraction shared with git
//! - Detection of the installers a project uses (npm, yarn)
//! - Execution of the configured update command

use crate::error::CommandError;
use log::*;
use std::path::Path;
use std::process::Command;

/// Captured result of an external command
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommandOutput {
    /// Whether the command exited successfully
    pub success: bool,
    /// Standard output from the command
    pub stdout: String,
    /// Standard error from the command
    pub stderr: String,
}

impl CommandOutput {
    /// Create a successful output
    pub fn success(stdout: impl Into<String>) -> Self {
        Self {
            success: true,
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// Create a failed output
    pub fn failure(stderr: impl Into<String>) -> Self {
        Self {
            success: false,
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }
}

/// Trait for running external commands
pub trait CommandRunner: Send + Sync {
    /// Run `program` with `args` in `working_dir`
    fn run(
        &self,
        program: &str,
        args: &[String],
        working_dir: &Path,
    ) -> Result<CommandOutput, CommandError>;
}

/// Runner that executes real processes
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemCommandRunner;

impl SystemCommandRunner {
    /// Create a new system command runner
    pub fn new() -> Self {
        Self
    }
}

impl CommandRunner for SystemCommandRunner {
    fn run(
        &self,
        program: &str,
        args: &[String],
        working_dir: &Path,
    ) -> Result<CommandOutput, CommandError> {
        debug!("BEGIN {} {}", program, args.join(" "));
        let output = Command::new(program)
            .args(args)
            .current_dir(working_dir)
            .output()
            .map_err(|source| CommandError::Spawn {
                command: command_line(program, args),
                source,
            })?;
        debug!("END   {} {}", program, args.join(" "));

        Ok(CommandOutput {
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }
}

fn command_line(program: &str, args: &[String]) -> String {
    std::iter::once(program.to_string())
        .chain(args.iter().cloned())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Run a command and turn a non-zero exit into an error
pub fn run_checked<R: CommandRunner + ?Sized>(
    runner: &R,
    program: &str,
    args: &[String],
    working_dir: &Path,
) -> Result<CommandOutput, CommandError> {
    let output = runner.run(program, args, working_dir)?;
    if output.success {
        Ok(output)
    } else {
        Err(CommandError::failed(command_line(program, args), output.stderr))
    }
}

/// Install commands for the lockfiles present in `working_dir`
pub fn detect_installers(working_dir: &Path) -> Vec<(&'static str, Vec<String>)> {
    let mut installers = Vec::new();
    if working_dir.join("package-lock.json").exists() {
        installers.push(("npm", vec!["install".to_string()]));
    }
    if working_dir.join("yarn.lock").exists() {
        installers.push(("yarn", vec!["install".to_string()]));
    }
    installers
}

/// Run every detected installer in `working_dir`
pub fn run_installs<R: CommandRunner + ?Sized>(
    runner: &R,
    working_dir: &Path,
) -> Result<(), CommandError> {
    for (program, args) in detect_installers(working_dir) {
        info!("use {}", program);
        run_checked(runner, program, &args, working_dir)?;
    }
    Ok(())
}

/// Split a configured command line on whitespace
pub fn split_command(command_line: &str) -> Result<(String, Vec<String>), CommandError> {
    let mut parts = command_line.split_whitespace().map(str::to_string);
    let program = parts.next().ok_or(CommandError::Empty)?;
    Ok((program, parts.collect()))
}

/// Run the configured update command in `working_dir`
pub fn run_update<R: CommandRunner + ?Sized>(
    runner: &R,
    command_line: &str,
    working_dir: &Path,
) -> Result<CommandOutput, CommandError> {
    let (program, args) = split_command(command_line)?;
    info!("running update command: {}", command_line);
    run_checked(runner, &program, &args, working_dir)
}

#[cfg(test)]
pub(crate) mod mock {
    use super::*;
    use std::sync::Mutex;

    /// Records every command and answers from a queue of canned outputs
    #[derive(Default)]
    pub struct MockRunner {
        pub calls: Mutex<Vec<String>>,
        responses: Mutex<Vec<(String, CommandOutput)>>,
    }

    impl MockRunner {
        pub fn new() -> Self {
            Self::default()
        }

        /// Answer commands starting with `prefix` with `output`
        pub fn respond(self, prefix: &str, output: CommandOutput) -> Self {
            self.responses
                .lock()
                .unwrap()
                .push((prefix.to_string(), output));
            self
        }

        pub fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl CommandRunner for MockRunner {
        fn run(
            &self,
            program: &str,
            args: &[String],
            _working_dir: &Path,
        ) -> Result<CommandOutput, CommandError> {
            let line = command_line(program, args);
            self.calls.lock().unwrap().push(line.clone());
            let responses = self.responses.lock().unwrap();
            Ok(responses
                .iter()
                .find(|(prefix, _)| line.starts_with(prefix.as_str()))
                .map(|(_, output)| output.clone())
                .unwrap_or_else(|| CommandOutput::success("")))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::mock::MockRunner;
    use super::*;

    #[test]
    fn test_command_output_constructors() {
        assert!(CommandOutput::success("ok").success);
        let failed = CommandOutput::failure("boom");
        assert!(!failed.success);
        assert_eq!(failed.stderr, "boom");
    }

    #[test]
    fn test_split_command() {
        let (program, args) = split_command("npm-check-updates -u").unwrap();
        assert_eq!(program, "npm-check-updates");
        assert_eq!(args, vec!["-u"]);

        let (program, args) = split_command("  ncu  ").unwrap();
        assert_eq!(program, "ncu");
        assert!(args.is_empty());
    }

    #[test]
    fn test_split_command_empty() {
        assert!(matches!(split_command("   "), Err(CommandError::Empty)));
    }

    #[test]
    fn test_run_update_success() {
        let runner = MockRunner::new();
        run_update(&runner, "npm-check-updates -u", Path::new(".")).unwrap();
        assert_eq!(runner.calls(), vec!["npm-check-updates -u"]);
    }

    #[test]
    fn test_run_update_failure() {
        let runner =
            MockRunner::new().respond("npm-check-updates", CommandOutput::failure("registry down"));
        let err = run_update(&runner, "npm-check-updates -u", Path::new(".")).unwrap_err();
        assert!(err.to_string().contains("registry down"));
    }

    #[test]
    fn test_detect_installers_npm() {
        let temp_dir = tempfile::tempdir().unwrap();
        std::fs::write(temp_dir.path().join("package-lock.json"), "{}").unwrap();
        let names: Vec<_> = detect_installers(temp_dir.path())
            .into_iter()
            .map(|(p, _)| p)
            .collect();
        assert_eq!(names, vec!["npm"]);
    }

    #[test]
    fn test_detect_installers_both() {
        let temp_dir = tempfile::tempdir().unwrap();
        std::fs::write(temp_dir.path().join("package-lock.json"), "{}").unwrap();
        std::fs::write(temp_dir.path().join("yarn.lock"), "").unwrap();
        let names: Vec<_> = detect_installers(temp_dir.path())
            .into_iter()
            .map(|(p, _)| p)
            .collect();
        assert_eq!(names, vec!["npm", "yarn"]);
    }

    #[test]
    fn test_detect_installers_none() {
        let temp_dir = tempfile::tempdir().unwrap();
        assert!(detect_installers(temp_dir.path()).is_empty());
    }

    #[test]
    fn test_run_installs() {
        let temp_dir = tempfile::tempdir().unwrap();
        std::fs::write(temp_dir.path().join("yarn.lock"), "").unwrap();
        let runner = MockRunner::new();
        run_installs(&runner, temp_dir.path()).unwrap();
        assert_eq!(runner.calls(), vec!["yarn install"]);
    }

    #[test]
    fn test_system_runner_missing_program() {
        let runner = SystemCommandRunner::new();
        let err = runner
            .run("definitely-not-a-real-program-xyz", &[], Path::new("."))
            .unwrap_err();
        assert!(matches!(err, CommandError::Spawn { .. }));
    }
}
