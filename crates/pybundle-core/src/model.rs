//! Data model shared by the scanner, the orchestrator and the CLI.

use crate::diagnostic::Diagnostic;
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Result of analysing an entry point and its sibling modules.
///
/// Invariants: `all_imports` is the union of `entry_imports` and the imports of
/// every path in `local_modules`; `external_imports` is a subset of
/// `all_imports`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DependencyAnalysis {
    pub entry_imports: BTreeSet<String>,
    pub local_modules: Vec<PathBuf>,
    pub all_imports: BTreeSet<String>,
    pub external_imports: BTreeSet<String>,
    /// Warnings raised while scanning individual files.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<Diagnostic>,
}

impl DependencyAnalysis {
    /// File names of the local modules, for display.
    pub fn local_module_names(&self) -> Vec<String> {
        self.local_modules
            .iter()
            .filter_map(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .collect()
    }
}

/// Packages declared in a requirements manifest, in file order, with version
/// specifiers stripped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RequirementsManifest {
    pub packages: Vec<String>,
}

impl RequirementsManifest {
    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }

    /// Remove every entry equal to `name`, ignoring ASCII case.
    pub fn without(mut self, name: &str) -> Self {
        self.packages.retain(|p| !p.eq_ignore_ascii_case(name));
        self
    }
}

/// A single request to package a script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilationRequest {
    pub script: PathBuf,
    pub output_dir: Option<PathBuf>,
}

impl CompilationRequest {
    pub fn new(script: impl Into<PathBuf>) -> Self {
        Self {
            script: script.into(),
            output_dir: None,
        }
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    /// The explicit output directory, or the script's own directory.
    pub fn resolved_output_dir(&self) -> PathBuf {
        match &self.output_dir {
            Some(dir) => dir.clone(),
            None => script_dir(&self.script),
        }
    }
}

/// Directory containing `script`, `.` for a bare file name.
pub fn script_dir(script: &Path) -> PathBuf {
    match script.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}
