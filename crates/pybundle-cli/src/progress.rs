//! Terminal spinner around long-running child processes.

use indicatif::{ProgressBar, ProgressStyle};
use pybundle_builder::RunError;
use pybundle_builder::runner::{Capture, CommandLine, CommandOutput, CommandRunner};
use std::time::Duration;

/// Shows a spinner while a captured invocation of `program` runs.
///
/// Inherited-stdio commands (pip) and other programs pass straight through.
pub struct SpinnerRunner<R> {
    inner: R,
    program: String,
}

impl<R: CommandRunner> SpinnerRunner<R> {
    pub fn new(inner: R, program: &str) -> Self {
        Self {
            inner,
            program: program.to_string(),
        }
    }
}

impl<R: CommandRunner> CommandRunner for SpinnerRunner<R> {
    fn run(&self, command: &CommandLine) -> Result<CommandOutput, RunError> {
        if command.capture == Capture::Inherit || command.program != self.program {
            return self.inner.run(command);
        }

        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg} [{elapsed}]")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        spinner.set_message(format!("Running {}...", self.program));
        spinner.enable_steady_tick(Duration::from_millis(120));

        let result = self.inner.run(command);
        spinner.finish_and_clear();
        result
    }
}
