//! Missing-package detection and installation.
//!
//! Two categories are handled separately. The packaging tool itself is a
//! hard prerequisite and is installed without asking; project dependencies
//! declared in the manifest may need the user's consent, and a failed install
//! there only produces a warning (the packaging step will fail on its own if
//! the package was truly required).

use crate::error::{BuildError, RunError};
use crate::names::{ImportNameMap, ImportNameResolver};
use crate::prompt::Prompter;
use crate::runner::{Capture, CommandLine, CommandRunner};
use pybundle_core::config::BundleConfig;
use pybundle_core::diagnostic::Scanned;
use pybundle_core::model::RequirementsManifest;
use pybundle_parser::requirements::{find_manifest, parse_requirements};
use std::path::Path;

/// Exits 0 when the module named by `argv[1]` can be located.
const FIND_SPEC_PROBE: &str =
    "import importlib.util, sys; sys.exit(0 if importlib.util.find_spec(sys.argv[1]) else 1)";

/// Whether project-dependency installs need the user's consent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InstallMode {
    pub interactive: bool,
}

impl InstallMode {
    pub fn interactive() -> Self {
        Self { interactive: true }
    }

    pub fn batch() -> Self {
        Self { interactive: false }
    }
}

/// Terminal state of one dependency category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallOutcome {
    /// Nothing was missing.
    AllPresent,
    AllInstalled { installed: Vec<String> },
    PartiallyInstalled {
        installed: Vec<String>,
        failed: Vec<String>,
    },
}

impl InstallOutcome {
    fn from_attempts(installed: Vec<String>, failed: Vec<String>) -> Self {
        if failed.is_empty() {
            Self::AllInstalled { installed }
        } else {
            Self::PartiallyInstalled { installed, failed }
        }
    }
}

/// Checks for and installs missing packages with the configured interpreter.
pub struct InstallOrchestrator<'a> {
    config: &'a BundleConfig,
    runner: &'a dyn CommandRunner,
    prompter: &'a dyn Prompter,
    resolver: Box<dyn ImportNameResolver + 'a>,
    mode: InstallMode,
}

impl<'a> InstallOrchestrator<'a> {
    pub fn new(
        config: &'a BundleConfig,
        runner: &'a dyn CommandRunner,
        prompter: &'a dyn Prompter,
        mode: InstallMode,
    ) -> Self {
        Self {
            config,
            runner,
            prompter,
            resolver: Box::new(ImportNameMap::from_config(config)),
            mode,
        }
    }

    /// Replace the package → import name strategy.
    pub fn with_resolver(mut self, resolver: impl ImportNameResolver + 'a) -> Self {
        self.resolver = Box::new(resolver);
        self
    }

    /// Whether `package` is importable by the configured interpreter.
    ///
    /// Re-queried on every call. A probe that cannot start counts as "not
    /// installed".
    pub fn check_installed(&self, package: &str) -> bool {
        let import_name = self.resolver.import_name(package);
        let probe = CommandLine::new(&self.config.python, Capture::Piped)
            .args(["-c", FIND_SPEC_PROBE])
            .arg(&import_name);
        match self.runner.run(&probe) {
            Ok(output) => output.success(),
            Err(e) => {
                tracing::debug!("probe for `{import_name}` failed: {e}");
                false
            }
        }
    }

    /// Install one package with pip.
    pub fn install_package(&self, package: &str) -> Result<(), RunError> {
        tracing::info!("installing {package}...");
        let install = CommandLine::new(&self.config.python, Capture::Inherit)
            .args(["-m", "pip", "install", "--disable-pip-version-check"])
            .arg(package);
        let result = self.runner.run(&install).and_then(|output| {
            if output.success() {
                Ok(())
            } else {
                Err(RunError::Exit {
                    program: format!("{} -m pip", self.config.python),
                    code: output.code,
                })
            }
        });
        match &result {
            Ok(()) => tracing::info!("{package} installed"),
            Err(e) => tracing::error!("failed to install {package}: {e}"),
        }
        result
    }

    /// Packages from `packages` that are not importable, in order.
    pub fn missing(&self, packages: &[String]) -> Vec<String> {
        packages
            .iter()
            .filter(|p| !self.check_installed(p))
            .cloned()
            .collect()
    }

    /// Make sure the packaging tool is installed. Installs without asking;
    /// fails if any install attempt fails.
    pub fn ensure_compiler_dependencies(&self) -> Result<InstallOutcome, BuildError> {
        let required = [self.config.packager_package.clone()];
        let missing = self.missing(&required);
        if missing.is_empty() {
            return Ok(InstallOutcome::AllPresent);
        }

        tracing::warn!(
            "packaging dependencies required: {}; installing automatically",
            missing.join(", ")
        );
        for package in &missing {
            self.install_package(package)
                .map_err(|source| BuildError::CompilerSetup {
                    package: package.clone(),
                    source,
                })?;
        }
        Ok(InstallOutcome::AllInstalled { installed: missing })
    }

    /// Make sure the packages declared in the manifest next to `entry` are
    /// installed.
    ///
    /// In interactive mode the user is asked once before installing; a "no"
    /// (or a closed input) fails with [`BuildError::Declined`]. Individual
    /// install failures never fail the call. Warnings from reading the
    /// manifest travel with the outcome.
    pub fn ensure_project_dependencies(
        &self,
        entry: &Path,
    ) -> Result<Scanned<InstallOutcome>, BuildError> {
        let Some(manifest_path) = find_manifest(entry, self.config) else {
            tracing::info!(
                "no {} found; skipping project dependencies",
                self.config.manifest
            );
            return Ok(Scanned::clean(InstallOutcome::AllPresent));
        };

        let Scanned {
            value: declared,
            diagnostics,
        } = parse_requirements(&manifest_path);
        let outcome = self.install_declared(declared)?;
        Ok(Scanned {
            value: outcome,
            diagnostics,
        })
    }

    fn install_declared(
        &self,
        declared: RequirementsManifest,
    ) -> Result<InstallOutcome, BuildError> {
        if declared.is_empty() {
            return Ok(InstallOutcome::AllPresent);
        }
        let declared = declared.without(&self.config.packager_package);
        if declared.is_empty() {
            tracing::info!(
                "only {} declared in {}; already handled",
                self.config.packager_package,
                self.config.manifest
            );
            return Ok(InstallOutcome::AllPresent);
        }

        let missing = self.missing(&declared.packages);
        if missing.is_empty() {
            tracing::info!("all project dependencies are already installed");
            return Ok(InstallOutcome::AllPresent);
        }

        tracing::warn!("project dependencies required: {}", missing.join(", "));
        if self.mode.interactive
            && !self
                .prompter
                .confirm("Install project dependencies?", true)
        {
            tracing::warn!("project dependencies not installed; packaging aborted");
            return Err(BuildError::Declined);
        }

        let (installed, failed): (Vec<String>, Vec<String>) = missing
            .into_iter()
            .partition(|package| self.install_package(package).is_ok());

        if failed.is_empty() {
            tracing::info!("all project dependencies installed");
        } else {
            tracing::warn!(
                "only {}/{} packages installed ({} failed); packaging may fail",
                installed.len(),
                installed.len() + failed.len(),
                failed.join(", ")
            );
        }
        Ok(InstallOutcome::from_attempts(installed, failed))
    }
}
