//! Non-fatal diagnostics for fail-soft scanning.
//!
//! Reading a sibling script or a manifest must never abort an analysis, so
//! those operations return a [`Scanned`] value: whatever could be collected,
//! plus the warnings raised along the way.

use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// A warning attached to a file that could not be fully read or parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub path: PathBuf,
    pub message: String,
}

impl Diagnostic {
    pub fn new(path: &Path, message: impl Into<String>) -> Self {
        Self {
            path: path.to_path_buf(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path.display(), self.message)
    }
}

/// A value produced by a fail-soft operation, with any diagnostics raised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scanned<T> {
    pub value: T,
    pub diagnostics: Vec<Diagnostic>,
}

impl<T> Scanned<T> {
    /// A result with no diagnostics.
    pub fn clean(value: T) -> Self {
        Self {
            value,
            diagnostics: Vec::new(),
        }
    }

    /// A (possibly partial) result carrying one diagnostic.
    pub fn with_diagnostic(value: T, diagnostic: Diagnostic) -> Self {
        Self {
            value,
            diagnostics: vec![diagnostic],
        }
    }

    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Drop the diagnostics, keeping only the value.
    pub fn into_value(self) -> T {
        self.value
    }
}

impl<T: Default> Default for Scanned<T> {
    fn default() -> Self {
        Self::clean(T::default())
    }
}
