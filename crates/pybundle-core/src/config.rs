//! Configuration for dependency analysis and packaging.
//!
//! Load order: `pybundle.toml` in the project directory → environment
//! variables → defaults.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

/// Name of the optional config file looked up next to the entry point.
pub const CONFIG_FILE: &str = "pybundle.toml";

/// Modules treated as part of the standard distribution unless configured
/// otherwise. Deliberately small: anything missing here is classified as
/// external and gets an explicit hidden import.
pub const DEFAULT_STDLIB: [&str; 12] = [
    "os",
    "sys",
    "math",
    "json",
    "datetime",
    "time",
    "re",
    "random",
    "pathlib",
    "collections",
    "itertools",
    "functools",
];

/// Well-known packages whose import name differs from the normalized
/// package name.
pub const DEFAULT_IMPORT_NAMES: [(&str, &str); 7] = [
    ("pyinstaller", "PyInstaller"),
    ("pillow", "PIL"),
    ("beautifulsoup4", "bs4"),
    ("pyyaml", "yaml"),
    ("scikit-learn", "sklearn"),
    ("opencv-python", "cv2"),
    ("python-dateutil", "dateutil"),
];

/// Top-level pybundle configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BundleConfig {
    /// Interpreter used to probe for installed packages and to run pip.
    pub python: String,
    /// Packaging tool executable.
    pub packager: String,
    /// Installable package name of the packaging tool.
    pub packager_package: String,
    /// Manifest file name, looked up in the entry point's directory.
    pub manifest: String,
    /// Preferred entry point name in discovery mode.
    pub entry_point: String,
    /// Sibling files starting with this prefix are never treated as modules.
    pub reserved_prefix: String,
    /// Source file extension, without the dot.
    pub source_extension: String,
    /// Standard-library allowlist subtracted from the import set.
    pub stdlib: BTreeSet<String>,
    /// Extra modules unioned into `stdlib`.
    pub extra_stdlib: BTreeSet<String>,
    /// Package name → import name overrides (keys are lowercase after load).
    pub import_names: BTreeMap<String, String>,
}

impl Default for BundleConfig {
    fn default() -> Self {
        Self {
            python: default_python().to_string(),
            packager: "pyinstaller".to_string(),
            packager_package: "pyinstaller".to_string(),
            manifest: "requirements.txt".to_string(),
            entry_point: "main.py".to_string(),
            reserved_prefix: "compiler".to_string(),
            source_extension: "py".to_string(),
            stdlib: DEFAULT_STDLIB.iter().map(|s| (*s).to_string()).collect(),
            extra_stdlib: BTreeSet::new(),
            import_names: DEFAULT_IMPORT_NAMES
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect(),
        }
    }
}

fn default_python() -> &'static str {
    if cfg!(windows) { "python" } else { "python3" }
}

/// Helper to read a non-empty env var into a string field.
fn env_override(var: &str, target: &mut String) {
    if let Ok(v) = std::env::var(var)
        && !v.trim().is_empty()
    {
        *target = v.trim().to_string();
    }
}

impl BundleConfig {
    /// Load config from `pybundle.toml` in `project_dir`, with env var overrides.
    /// Falls back to defaults if no config file exists.
    pub fn load(project_dir: &Path) -> Result<Self> {
        let config_path = project_dir.join(CONFIG_FILE);

        let mut config = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)
                .with_context(|| format!("failed to read {}", config_path.display()))?;
            toml::from_str(&content)
                .with_context(|| format!("invalid config in {}", config_path.display()))?
        } else {
            Self::default()
        };

        // User entries are merged over the built-in table, keyed case-insensitively.
        let user_names = std::mem::take(&mut config.import_names);
        let mut import_names: BTreeMap<String, String> = DEFAULT_IMPORT_NAMES
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        import_names.extend(user_names.into_iter().map(|(k, v)| (k.to_lowercase(), v)));
        config.import_names = import_names;

        env_override("PYBUNDLE_PYTHON", &mut config.python);
        env_override("PYBUNDLE_PACKAGER", &mut config.packager);
        env_override("PYBUNDLE_MANIFEST", &mut config.manifest);

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.python.trim().is_empty() {
            anyhow::bail!("`python` must name an interpreter");
        }
        if self.packager.trim().is_empty() {
            anyhow::bail!("`packager` must name an executable");
        }
        if self.source_extension.starts_with('.') {
            anyhow::bail!(
                "`source_extension` must not start with a dot (got {:?})",
                self.source_extension
            );
        }
        Ok(())
    }

    /// The effective standard-library allowlist.
    pub fn stdlib_modules(&self) -> BTreeSet<String> {
        self.stdlib.union(&self.extra_stdlib).cloned().collect()
    }
}
