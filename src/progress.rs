//! Spinner shown while installers and the update command run
//!
//! External commands block the run for minutes without output, so each one
//! is wrapped in an indicatif spinner naming the project it works on.

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Runs blocking work behind an optional spinner
#[derive(Debug, Clone, Copy)]
pub struct Progress {
    /// Off when stderr is not a terminal or log lines would interleave
    enabled: bool,
}

impl Progress {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    pub fn disabled() -> Self {
        Self::new(false)
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Run `work`, showing `message` next to a spinner until it returns
    pub fn while_running<T>(&self, message: impl Into<String>, work: impl FnOnce() -> T) -> T {
        let bar = self.enabled.then(|| spinner(message.into()));
        let result = work();
        if let Some(bar) = bar {
            bar.finish_and_clear();
        }
        result
    }
}

fn spinner(message: String) -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner()
        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
        .template("{spinner:.cyan} {msg} ({elapsed})")
    {
        bar.set_style(style);
    }
    bar.set_message(message);
    bar.enable_steady_tick(Duration::from_millis(80));
    bar
}

/// Spinner label for one step over one of several project directories,
/// e.g. `[2/3] install web`
pub fn step_message(step: &str, directory: &str, index: usize, total: usize) -> String {
    if total > 1 {
        format!("[{}/{}] {} {}", index + 1, total, step, directory)
    } else {
        format!("{} {}", step, directory)
    }
}
