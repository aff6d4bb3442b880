//! Package name → importable module name.
//!
//! Distribution names and import names do not always agree (`Pillow`
//! imports as `PIL`). The default strategy lowercases and turns hyphens into
//! underscores; a lookup table covers the known exceptions.

use pybundle_core::config::BundleConfig;
use std::collections::BTreeMap;

/// Strategy for finding the module to probe for a package.
pub trait ImportNameResolver {
    fn import_name(&self, package: &str) -> String;
}

/// Lowercase + `-` → `_`.
pub fn normalize(package: &str) -> String {
    package.to_lowercase().replace('-', "_")
}

/// Table of overrides in front of [`normalize`].
#[derive(Debug, Clone, Default)]
pub struct ImportNameMap {
    overrides: BTreeMap<String, String>,
}

impl ImportNameMap {
    pub fn new(overrides: BTreeMap<String, String>) -> Self {
        Self {
            overrides: overrides
                .into_iter()
                .map(|(k, v)| (k.to_lowercase(), v))
                .collect(),
        }
    }

    pub fn from_config(config: &BundleConfig) -> Self {
        Self::new(config.import_names.clone())
    }
}

impl ImportNameResolver for ImportNameMap {
    fn import_name(&self, package: &str) -> String {
        self.overrides
            .get(&package.to_lowercase())
            .cloned()
            .unwrap_or_else(|| normalize(package))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("Flask-SQLAlchemy"), "flask_sqlalchemy");
        assert_eq!(normalize("requests"), "requests");
    }

    #[test]
    fn test_table_overrides_normalization() {
        let map = ImportNameMap::from_config(&BundleConfig::default());
        assert_eq!(map.import_name("Pillow"), "PIL");
        assert_eq!(map.import_name("pyinstaller"), "PyInstaller");
        assert_eq!(map.import_name("python-dotenv"), "python_dotenv");
    }

    #[test]
    fn test_empty_table_is_plain_normalization() {
        let map = ImportNameMap::default();
        assert_eq!(map.import_name("Pillow"), "pillow");
    }
}
