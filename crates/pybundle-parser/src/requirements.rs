//! Requirements manifest reading.
//!
//! Understands the `package[operator version]` one-per-line format. Comment
//! lines (`#`) and option lines (`-r`, `-e`, `--index-url`, ...) are skipped;
//! `>=`, `==` and `<=` specifiers are stripped.

use pybundle_core::config::BundleConfig;
use pybundle_core::diagnostic::{Diagnostic, Scanned};
use pybundle_core::model::{RequirementsManifest, script_dir};
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

const VERSION_OPERATORS: [&str; 3] = [">=", "==", "<="];

/// Path of the manifest next to `entry`, if it exists.
pub fn find_manifest(entry: &Path, config: &BundleConfig) -> Option<PathBuf> {
    let path = script_dir(entry).join(&config.manifest);
    path.is_file().then_some(path)
}

/// Bare package name from one manifest line, or `None` for lines that
/// declare nothing.
pub fn parse_requirement_line(line: &str) -> Option<String> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') || line.starts_with('-') {
        return None;
    }
    let name = VERSION_OPERATORS
        .iter()
        .fold(line, |acc, op| acc.split_once(*op).map_or(acc, |(head, _)| head))
        .trim();
    (!name.is_empty()).then(|| name.to_string())
}

/// Parse a manifest into its ordered package names.
///
/// A missing file is an empty manifest. A read error part-way through keeps
/// the packages collected so far and reports a diagnostic.
pub fn parse_requirements(path: &Path) -> Scanned<RequirementsManifest> {
    let file = match std::fs::File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::info!("no manifest at {}", path.display());
            return Scanned::default();
        }
        Err(e) => return unreadable(path, RequirementsManifest::default(), &e),
    };

    let mut manifest = RequirementsManifest::default();
    for line in BufReader::new(file).lines() {
        match line {
            Ok(line) => manifest.packages.extend(parse_requirement_line(&line)),
            Err(e) => return unreadable(path, manifest, &e),
        }
    }
    tracing::info!(
        "found {} package(s) in {}",
        manifest.len(),
        path.display()
    );
    Scanned::clean(manifest)
}

fn unreadable(
    path: &Path,
    partial: RequirementsManifest,
    error: &std::io::Error,
) -> Scanned<RequirementsManifest> {
    let diagnostic = Diagnostic::new(path, format!("error reading manifest: {error}"));
    tracing::warn!("{}", diagnostic);
    Scanned::with_diagnostic(partial, diagnostic)
}
