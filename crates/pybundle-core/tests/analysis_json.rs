use pybundle_core::diagnostic::Diagnostic;
use pybundle_core::model::DependencyAnalysis;
use std::path::{Path, PathBuf};

fn sample() -> DependencyAnalysis {
    let mut analysis = DependencyAnalysis {
        local_modules: vec![PathBuf::from("/app/util.py")],
        ..Default::default()
    };
    analysis.entry_imports.insert("requests".into());
    analysis.entry_imports.insert("os".into());
    analysis.all_imports.extend(["requests".into(), "os".into(), "numpy".into()]);
    analysis.external_imports.extend(["requests".into(), "numpy".into()]);
    analysis
}

#[test]
fn test_json_uses_sorted_sets() {
    let json = serde_json::to_value(sample()).unwrap();
    let external: Vec<&str> = json["external_imports"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap())
        .collect();
    assert_eq!(external, vec!["numpy", "requests"]);
    assert_eq!(json["local_modules"][0], "/app/util.py");
}

#[test]
fn test_json_omits_empty_diagnostics() {
    let json = serde_json::to_value(sample()).unwrap();
    assert!(json.get("diagnostics").is_none());

    let mut with_warning = sample();
    with_warning
        .diagnostics
        .push(Diagnostic::new(Path::new("/app/broken.py"), "invalid syntax"));
    let json = serde_json::to_value(with_warning).unwrap();
    assert_eq!(json["diagnostics"][0]["message"], "invalid syntax");
}
