use pybundle_core::config::BundleConfig;
use pybundle_parser::requirements::{find_manifest, parse_requirements};
use std::fs;

#[test]
fn test_parse_mixed_manifest() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("requirements.txt");
    fs::write(
        &path,
        "# comment\n\nflask>=2.0\nrequests==2.31.0\n-e .\nclick\n",
    )
    .unwrap();

    let scanned = parse_requirements(&path);
    assert!(scanned.is_clean());
    assert_eq!(scanned.value.packages, vec!["flask", "requests", "click"]);
}

#[test]
fn test_missing_manifest_is_empty() {
    let tmp = tempfile::tempdir().unwrap();
    let scanned = parse_requirements(&tmp.path().join("requirements.txt"));
    assert!(scanned.is_clean());
    assert!(scanned.value.is_empty());
}

#[test]
fn test_unreadable_manifest_keeps_partial_result() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("requirements.txt");
    let mut bytes = b"flask\nrequests\n".to_vec();
    bytes.extend_from_slice(b"bad\xff\xfe\n");
    bytes.extend_from_slice(b"click\n");
    fs::write(&path, bytes).unwrap();

    let scanned = parse_requirements(&path);
    assert_eq!(scanned.value.packages, vec!["flask", "requests"]);
    assert_eq!(scanned.diagnostics.len(), 1);
}

#[test]
fn test_directory_in_place_of_manifest_is_a_diagnostic() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("requirements.txt");
    fs::create_dir(&path).unwrap();

    let scanned = parse_requirements(&path);
    assert!(scanned.value.is_empty());
    assert_eq!(scanned.diagnostics.len(), 1);
}

#[test]
fn test_find_manifest_next_to_entry() {
    let tmp = tempfile::tempdir().unwrap();
    let entry = tmp.path().join("main.py");
    fs::write(&entry, "print('hi')\n").unwrap();
    let config = BundleConfig::default();

    assert_eq!(find_manifest(&entry, &config), None);

    fs::write(tmp.path().join("requirements.txt"), "flask\n").unwrap();
    assert_eq!(
        find_manifest(&entry, &config),
        Some(tmp.path().join("requirements.txt"))
    );
}
