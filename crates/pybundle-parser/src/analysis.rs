//! Dependency-set construction for an entry point and its sibling modules.

use crate::discovery::{ModuleFilter, find_local_modules};
use crate::imports::extract_imports;
use pybundle_core::config::BundleConfig;
use pybundle_core::model::DependencyAnalysis;
use std::collections::BTreeSet;
use std::path::Path;

/// Builds a [`DependencyAnalysis`] from an injectable standard-library
/// allowlist and module filter.
#[derive(Debug, Clone)]
pub struct DependencySetBuilder {
    stdlib: BTreeSet<String>,
    filter: ModuleFilter,
}

impl Default for DependencySetBuilder {
    fn default() -> Self {
        Self::from_config(&BundleConfig::default())
    }
}

impl DependencySetBuilder {
    pub fn from_config(config: &BundleConfig) -> Self {
        Self {
            stdlib: config.stdlib_modules(),
            filter: ModuleFilter::from_config(config),
        }
    }

    /// Replace the standard-library allowlist.
    pub fn with_stdlib<I, S>(mut self, modules: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.stdlib = modules.into_iter().map(Into::into).collect();
        self
    }

    /// Scan the entry point and every sibling module, union their imports
    /// and subtract the allowlist.
    pub fn analyze(&self, entry: &Path) -> DependencyAnalysis {
        let mut analysis = DependencyAnalysis::default();

        let entry_scan = extract_imports(entry);
        analysis.diagnostics.extend(entry_scan.diagnostics);
        analysis.entry_imports = entry_scan.value;
        analysis.all_imports = analysis.entry_imports.clone();

        let modules = find_local_modules(entry, &self.filter);
        analysis.diagnostics.extend(modules.diagnostics);
        analysis.local_modules = modules.value;

        for module in &analysis.local_modules {
            let scan = extract_imports(module);
            analysis.diagnostics.extend(scan.diagnostics);
            analysis.all_imports.extend(scan.value);
        }

        analysis.external_imports = analysis
            .all_imports
            .iter()
            .filter(|name| !self.stdlib.contains(name.as_str()))
            .cloned()
            .collect();

        tracing::debug!(
            "analyzed {}: {} import(s), {} external, {} local module(s)",
            entry.display(),
            analysis.all_imports.len(),
            analysis.external_imports.len(),
            analysis.local_modules.len()
        );
        analysis
    }
}

/// Analyze `entry` using the allowlist and filter from `config`.
pub fn analyze(entry: &Path, config: &BundleConfig) -> DependencyAnalysis {
    DependencySetBuilder::from_config(config).analyze(entry)
}
