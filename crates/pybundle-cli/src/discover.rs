//! Zero-argument mode: pick a script from the working directory.
//!
//! The primary entry point is offered first, then any other eligible script,
//! then a manually entered path. Each candidate needs an explicit "yes".

use pybundle_builder::prompt::Prompter;
use pybundle_core::config::BundleConfig;
use pybundle_core::model::{CompilationRequest, script_dir};
use pybundle_parser::analysis::analyze;
use pybundle_parser::discovery::discovery_candidates;
use pybundle_parser::requirements::{find_manifest, parse_requirements};
use std::ffi::OsStr;
use std::path::Path;

/// Offer candidates from `dir` until one is accepted, then hand it to
/// `compile`. Returns false if nothing was selected.
pub fn run_discovery(
    dir: &Path,
    config: &BundleConfig,
    prompter: &dyn Prompter,
    mut compile: impl FnMut(CompilationRequest) -> bool,
) -> bool {
    eprintln!("{}", "=".repeat(50));
    eprintln!("pybundle: Python script to executable");
    eprintln!("Primary entry point: {}", config.entry_point);
    eprintln!("{}", "=".repeat(50));

    for candidate in discovery_candidates(dir, config) {
        describe(&candidate, config);
        if prompter.confirm("Compile this file?", false) {
            return compile(CompilationRequest::new(candidate).with_output_dir(dir));
        }
    }

    eprintln!("No script selected in {}", dir.display());
    if !prompter.confirm("Select file manually?", false) {
        eprintln!("Compilation canceled.");
        return false;
    }
    let Some(path) = prompter.ask_path("Path to the Python file to compile:") else {
        eprintln!("No file selected.");
        return false;
    };
    if !path.is_file() {
        eprintln!("Not a file: {}", path.display());
        return false;
    }
    let output_dir = script_dir(&path);
    compile(CompilationRequest::new(path).with_output_dir(output_dir))
}

fn describe(candidate: &Path, config: &BundleConfig) {
    let label = if candidate.file_name() == Some(OsStr::new(&config.entry_point)) {
        format!("{} (primary entry point)", config.entry_point)
    } else {
        candidate
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    };
    eprintln!("Found {label}: {}", candidate.display());

    let analysis = analyze(candidate, config);
    let manifest = find_manifest(candidate, config).map(|p| parse_requirements(&p));
    crate::print_analysis(&analysis, manifest.as_ref(), config);
}

#[cfg(test)]
mod tests {
    use super::*;
    use pybundle_builder::prompt::LinePrompter;
    use std::io::Cursor;
    use std::path::PathBuf;

    fn answers(input: &str) -> LinePrompter<Cursor<Vec<u8>>, Vec<u8>> {
        LinePrompter::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    #[test]
    fn test_accepting_primary_entry_point() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("main.py"), "import flask\n").unwrap();
        std::fs::write(tmp.path().join("other.py"), "").unwrap();

        let mut requests = Vec::new();
        let ok = run_discovery(tmp.path(), &BundleConfig::default(), &answers("y\n"), |r| {
            requests.push(r);
            true
        });
        assert!(ok);
        assert_eq!(requests.len(), 1);
        assert!(requests[0].script.ends_with("main.py"));
        assert_eq!(requests[0].output_dir.as_deref(), Some(tmp.path()));
    }

    #[test]
    fn test_second_candidate_after_declining_first() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("main.py"), "").unwrap();
        std::fs::write(tmp.path().join("tool.py"), "").unwrap();

        let mut chosen = None;
        let ok = run_discovery(tmp.path(), &BundleConfig::default(), &answers("n\ny\n"), |r| {
            chosen = Some(r.script);
            false
        });
        assert!(!ok);
        assert!(chosen.unwrap().ends_with("tool.py"));
    }

    #[test]
    fn test_declining_everything_compiles_nothing() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("main.py"), "").unwrap();

        let mut called = false;
        let ok = run_discovery(tmp.path(), &BundleConfig::default(), &answers("n\nn\n"), |_| {
            called = true;
            true
        });
        assert!(!ok);
        assert!(!called);
    }

    #[test]
    fn test_closed_input_cancels() {
        let tmp = tempfile::tempdir().unwrap();
        let ok = run_discovery(tmp.path(), &BundleConfig::default(), &answers(""), |_| true);
        assert!(!ok);
    }

    #[test]
    fn test_manual_selection() {
        let tmp = tempfile::tempdir().unwrap();
        let elsewhere = tmp.path().join("elsewhere");
        std::fs::create_dir(&elsewhere).unwrap();
        let script = elsewhere.join("app.py");
        std::fs::write(&script, "").unwrap();
        let empty = tmp.path().join("empty");
        std::fs::create_dir(&empty).unwrap();

        let input = format!("y\n{}\n", script.display());
        let mut requests = Vec::new();
        let ok = run_discovery(&empty, &BundleConfig::default(), &answers(&input), |r| {
            requests.push(r);
            true
        });
        assert!(ok);
        assert_eq!(requests[0].script, script);
        assert_eq!(requests[0].output_dir, Some(PathBuf::from(&elsewhere)));
    }

    #[test]
    fn test_manual_selection_of_missing_file() {
        let tmp = tempfile::tempdir().unwrap();
        let input = format!("y\n{}\n", tmp.path().join("nope.py").display());
        let ok = run_discovery(tmp.path(), &BundleConfig::default(), &answers(&input), |_| true);
        assert!(!ok);
    }
}
