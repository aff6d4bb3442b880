//! Install orchestration and packaging-tool invocation.
//!
//! All child processes go through the [`runner::CommandRunner`] seam and all
//! questions to the user through [`prompt::Prompter`], so the whole pipeline
//! can be driven without a Python interpreter or a terminal.

pub mod error;
pub mod installer;
pub mod names;
pub mod packager;
pub mod prompt;
pub mod runner;

pub use error::{BuildError, RunError};
pub use installer::{InstallMode, InstallOrchestrator, InstallOutcome};
pub use packager::{BuildReport, PackagingInvoker};
