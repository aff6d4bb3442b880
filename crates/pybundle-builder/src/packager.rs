//! Packaging-tool invocation.

use crate::error::{BuildError, RunError};
use crate::installer::{InstallMode, InstallOrchestrator};
use crate::prompt::Prompter;
use crate::runner::{Capture, CommandLine, CommandRunner};
use pybundle_core::config::BundleConfig;
use pybundle_core::diagnostic::Diagnostic;
use pybundle_core::model::{CompilationRequest, DependencyAnalysis};
use pybundle_parser::analysis::DependencySetBuilder;
use std::path::{Path, PathBuf};

/// Work directory the packaging tool is pointed at, relative to the output dir.
const BUILD_DIR: &str = "build";

/// What a packaging run produced.
#[derive(Debug, Clone)]
pub struct BuildReport {
    /// Executable base name (the entry point's file stem).
    pub name: String,
    pub output_dir: PathBuf,
    pub analysis: DependencyAnalysis,
    pub command: CommandLine,
    /// False for dry runs.
    pub executed: bool,
    /// Problems reading the requirements manifest.
    pub manifest_warnings: Vec<Diagnostic>,
    /// Intermediate artifacts that could not be removed.
    pub cleanup_warnings: Vec<Diagnostic>,
}

impl BuildReport {
    /// Expected location of the produced executable.
    pub fn executable_path(&self) -> PathBuf {
        self.output_dir
            .join(format!("{}{}", self.name, std::env::consts::EXE_SUFFIX))
    }
}

/// Compose the packaging command for `entry`.
///
/// One `--hidden-import` per external import, in the analysis' set order.
pub fn compose_command(
    config: &BundleConfig,
    entry: &Path,
    output_dir: &Path,
    name: &str,
    analysis: &DependencyAnalysis,
) -> CommandLine {
    let mut command = CommandLine::new(&config.packager, Capture::Piped)
        .args(["--onefile", "--console"])
        .arg("--distpath")
        .arg(output_dir.display().to_string())
        .arg("--workpath")
        .arg(output_dir.join(BUILD_DIR).display().to_string())
        .arg("--specpath")
        .arg(output_dir.display().to_string())
        .args(["--name", name, "--clean"]);
    for module in &analysis.external_imports {
        command = command.args(["--hidden-import", module.as_str()]);
    }
    command.arg(entry.display().to_string())
}

/// Remove the generated spec file and build directory. Failures are
/// returned as diagnostics, never as errors.
pub fn cleanup_artifacts(output_dir: &Path, name: &str) -> Vec<Diagnostic> {
    let mut warnings = Vec::new();

    let spec_file = output_dir.join(format!("{name}.spec"));
    if spec_file.exists()
        && let Err(e) = std::fs::remove_file(&spec_file)
    {
        warnings.push(Diagnostic::new(&spec_file, format!("could not remove: {e}")));
    }

    let build_dir = output_dir.join(BUILD_DIR);
    if build_dir.exists()
        && let Err(e) = std::fs::remove_dir_all(&build_dir)
    {
        warnings.push(Diagnostic::new(&build_dir, format!("could not remove: {e}")));
    }

    for warning in &warnings {
        tracing::warn!("could not clean up temporary files: {}", warning);
    }
    warnings
}

/// Runs the full pipeline: dependency setup, analysis, packaging, cleanup.
pub struct PackagingInvoker<'a> {
    config: &'a BundleConfig,
    runner: &'a dyn CommandRunner,
    installer: InstallOrchestrator<'a>,
    dry_run: bool,
}

impl<'a> PackagingInvoker<'a> {
    pub fn new(
        config: &'a BundleConfig,
        runner: &'a dyn CommandRunner,
        prompter: &'a dyn Prompter,
        mode: InstallMode,
    ) -> Self {
        Self {
            config,
            runner,
            installer: InstallOrchestrator::new(config, runner, prompter, mode),
            dry_run: false,
        }
    }

    /// Use a preconfigured orchestrator (e.g. with a custom name resolver).
    pub fn with_installer(mut self, installer: InstallOrchestrator<'a>) -> Self {
        self.installer = installer;
        self
    }

    /// Compose the command but do not run the packaging tool.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Package `request.script` into a single-file executable.
    ///
    /// Artifacts are cleaned up only after a successful build; a failed
    /// build leaves them for diagnosis.
    pub fn compile(&self, request: &CompilationRequest) -> Result<BuildReport, BuildError> {
        let entry = &request.script;

        self.installer.ensure_compiler_dependencies()?;
        let manifest_warnings = self.installer.ensure_project_dependencies(entry)?.diagnostics;

        tracing::info!("analyzing dependencies...");
        let analysis = DependencySetBuilder::from_config(self.config).analyze(entry);

        let name = entry
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| BuildError::InvalidEntry {
                path: entry.clone(),
            })?;
        let output_dir = request.resolved_output_dir();
        let command = compose_command(self.config, entry, &output_dir, &name, &analysis);

        tracing::info!("detected local modules: {:?}", analysis.local_module_names());
        tracing::info!("detected external imports: {:?}", analysis.external_imports);
        tracing::info!("command: {}", command);

        let mut report = BuildReport {
            name,
            output_dir,
            analysis,
            command,
            executed: false,
            manifest_warnings,
            cleanup_warnings: Vec::new(),
        };
        if self.dry_run {
            return Ok(report);
        }

        tracing::info!("packaging {}...", entry.display());
        let output = self.runner.run(&report.command).map_err(|e| match e {
            RunError::Spawn { program, source } => BuildError::PackagerMissing {
                program,
                package: self.config.packager_package.clone(),
                source,
            },
            RunError::Exit { code, .. } => BuildError::PackagerFailed {
                code,
                stderr: String::new(),
            },
        })?;
        if !output.success() {
            return Err(BuildError::PackagerFailed {
                code: output.code,
                stderr: output.stderr,
            });
        }

        tracing::info!("packaging completed");
        report.executed = true;
        report.cleanup_warnings = cleanup_artifacts(&report.output_dir, &report.name);
        Ok(report)
    }
}
