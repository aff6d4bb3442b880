//! Errors from child processes and from the packaging pipeline.

use std::path::PathBuf;

/// A child process that could not be started or did not succeed.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error("failed to start `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("`{program}` exited unsuccessfully (code {code:?})")]
    Exit { program: String, code: Option<i32> },
}

/// Failures that abort a packaging run.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("could not install `{package}`; install it manually with `pip install {package}`")]
    CompilerSetup {
        package: String,
        #[source]
        source: RunError,
    },
    #[error("project dependencies were not installed")]
    Declined,
    #[error("packaging tool `{program}` not found; install it manually with `pip install {package}`")]
    PackagerMissing {
        program: String,
        package: String,
        #[source]
        source: std::io::Error,
    },
    #[error("packaging failed (exit code {code:?}):\n{stderr}")]
    PackagerFailed { code: Option<i32>, stderr: String },
    #[error("cannot derive an executable name from {}", path.display())]
    InvalidEntry { path: PathBuf },
}
