//! Child-process execution.

use crate::error::RunError;
use std::fmt;
use std::process::Command;

/// How a child's standard streams are wired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capture {
    /// Share the parent's terminal (installer output is shown live).
    Inherit,
    /// Collect stdout/stderr into the [`CommandOutput`].
    Piped,
}

/// A program invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    pub program: String,
    pub args: Vec<String>,
    pub capture: Capture,
}

impl CommandLine {
    pub fn new(program: impl Into<String>, capture: Capture) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            capture,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// True if `flag` is immediately followed by `value`.
    pub fn has_pair(&self, flag: &str, value: &str) -> bool {
        self.args.windows(2).any(|w| w[0] == flag && w[1] == value)
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", quote(&self.program))?;
        for arg in &self.args {
            write!(f, " {}", quote(arg))?;
        }
        Ok(())
    }
}

fn quote(s: &str) -> String {
    if s.is_empty() || s.contains(char::is_whitespace) {
        format!("\"{s}\"")
    } else {
        s.to_string()
    }
}

/// What a finished child reported.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code; `None` if the process was killed by a signal.
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Runs child processes to completion.
pub trait CommandRunner {
    /// Run `command` synchronously. Errors only if the process could not be
    /// started; a non-zero exit is reported through [`CommandOutput::code`].
    fn run(&self, command: &CommandLine) -> Result<CommandOutput, RunError>;
}

/// [`CommandRunner`] backed by `std::process::Command`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, command: &CommandLine) -> Result<CommandOutput, RunError> {
        tracing::debug!("running {}", command);
        let mut cmd = Command::new(&command.program);
        cmd.args(&command.args);

        let spawn_error = |source| RunError::Spawn {
            program: command.program.clone(),
            source,
        };

        match command.capture {
            Capture::Inherit => {
                let status = cmd.status().map_err(spawn_error)?;
                Ok(CommandOutput {
                    code: status.code(),
                    ..Default::default()
                })
            }
            Capture::Piped => {
                let output = cmd.output().map_err(spawn_error)?;
                Ok(CommandOutput {
                    code: output.status.code(),
                    stdout: String::from_utf8_lossy(&output.stdout).to_string(),
                    stderr: String::from_utf8_lossy(&output.stderr).to_string(),
                })
            }
        }
    }
}
