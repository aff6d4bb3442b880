//! Sibling-module lookup and entry-point discovery.

use pybundle_core::config::BundleConfig;
use pybundle_core::diagnostic::{Diagnostic, Scanned};
use pybundle_core::model::script_dir;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

/// Which directory entries count as source modules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleFilter {
    /// Extension without the dot, e.g. `py`.
    pub extension: String,
    /// Files whose name starts with this prefix are skipped.
    pub reserved_prefix: String,
}

impl Default for ModuleFilter {
    fn default() -> Self {
        Self::from_config(&BundleConfig::default())
    }
}

impl ModuleFilter {
    pub fn from_config(config: &BundleConfig) -> Self {
        Self {
            extension: config.source_extension.clone(),
            reserved_prefix: config.reserved_prefix.clone(),
        }
    }

    /// Whether a file name is an eligible source module.
    pub fn accepts(&self, file_name: &OsStr) -> bool {
        let Some(name) = file_name.to_str() else {
            return false;
        };
        let suffix = format!(".{}", self.extension);
        name.ends_with(&suffix)
            && name.len() > suffix.len()
            && (self.reserved_prefix.is_empty() || !name.starts_with(&self.reserved_prefix))
    }

    /// Eligible files directly inside `dir`, in directory-listing order,
    /// skipping `exclude` (a file name).
    pub fn list(&self, dir: &Path, exclude: Option<&OsStr>) -> Scanned<Vec<PathBuf>> {
        let entries = match std::fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                let diagnostic =
                    Diagnostic::new(dir, format!("could not list directory: {e}"));
                tracing::warn!("{}", diagnostic);
                return Scanned::with_diagnostic(Vec::new(), diagnostic);
            }
        };

        let mut found = Vec::new();
        for entry in entries.flatten() {
            let name = entry.file_name();
            if exclude.is_some_and(|ex| ex == name.as_os_str()) || !self.accepts(&name) {
                continue;
            }
            if entry.file_type().is_ok_and(|t| t.is_dir()) {
                continue;
            }
            found.push(absolute(&entry.path()));
        }
        Scanned::clean(found)
    }
}

/// Sibling source files of `entry`, excluding the entry point itself and any
/// file with the reserved prefix. Paths are absolute.
pub fn find_local_modules(entry: &Path, filter: &ModuleFilter) -> Scanned<Vec<PathBuf>> {
    let dir = absolute(&script_dir(entry));
    filter.list(&dir, entry.file_name())
}

/// Candidate entry points in `dir`, in the order they should be offered:
/// the configured primary entry point if present, then the first other
/// eligible source file.
pub fn discovery_candidates(dir: &Path, config: &BundleConfig) -> Vec<PathBuf> {
    let mut candidates = Vec::new();

    let primary = dir.join(&config.entry_point);
    if primary.is_file() {
        candidates.push(absolute(&primary));
    }

    let filter = ModuleFilter::from_config(config);
    let others = filter.list(dir, Some(OsStr::new(&config.entry_point)));
    if let Some(first) = others.value.into_iter().next() {
        candidates.push(first);
    }
    candidates
}

fn absolute(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}
