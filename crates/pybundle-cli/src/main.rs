//! CLI binary for pybundle: package a Python script into a standalone executable.

mod discover;
mod progress;

use anyhow::{Context, Result};
use clap::Parser;
use pybundle_builder::prompt::{AssumeYes, LinePrompter, Prompter};
use pybundle_builder::runner::SystemRunner;
use pybundle_builder::{BuildReport, InstallMode, PackagingInvoker};
use pybundle_core::config::BundleConfig;
use pybundle_core::diagnostic::Scanned;
use pybundle_core::model::{CompilationRequest, DependencyAnalysis, RequirementsManifest, script_dir};
use pybundle_parser::analysis::analyze;
use pybundle_parser::requirements::{find_manifest, parse_requirements};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser)]
#[command(
    name = "pybundle",
    version,
    about = "Package a Python script into a standalone executable"
)]
struct Cli {
    /// Script to package (discovers one in the current directory if omitted)
    script: Option<PathBuf>,

    /// Output directory (defaults to the script's directory)
    output_dir: Option<PathBuf>,

    /// Ask before installing missing project dependencies
    #[arg(long)]
    interactive: bool,

    /// Answer yes to every confirmation
    #[arg(short, long)]
    yes: bool,

    /// Print the dependency analysis and exit without installing or packaging
    #[arg(long, requires = "script")]
    analyze: bool,

    /// Emit the analysis as JSON on stdout (with --analyze)
    #[arg(long, requires = "analyze")]
    json: bool,

    /// Install dependencies and print the packaging command without running it
    #[arg(long)]
    dry_run: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    match run(&cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<bool> {
    let stdio;
    let prompter: &dyn Prompter = if cli.yes {
        &AssumeYes
    } else {
        stdio = LinePrompter::stdio();
        &stdio
    };

    let Some(script) = &cli.script else {
        let cwd = std::env::current_dir().context("failed to get current directory")?;
        let config = BundleConfig::load(&cwd)?;
        // Discovery always runs with a user at the terminal.
        let ok = discover::run_discovery(&cwd, &config, prompter, |request| {
            let config = BundleConfig::load(&script_dir(&request.script)).unwrap_or_else(|e| {
                tracing::warn!("ignoring config: {e:#}");
                config.clone()
            });
            compile(&config, &request, prompter, InstallMode::interactive(), cli.dry_run)
        });
        finish(ok);
        return Ok(ok);
    };

    if !script.is_file() {
        anyhow::bail!("script not found: {}", script.display());
    }
    let config = BundleConfig::load(&script_dir(script))?;

    if cli.analyze {
        return cmd_analyze(script, &config, cli.json);
    }

    let mut request = CompilationRequest::new(script);
    if let Some(dir) = &cli.output_dir {
        request = request.with_output_dir(dir);
    }
    let mode = InstallMode {
        interactive: cli.interactive,
    };
    let ok = compile(&config, &request, prompter, mode, cli.dry_run);
    finish(ok);
    Ok(ok)
}

fn finish(ok: bool) {
    if ok {
        eprintln!("Done.");
    } else {
        eprintln!("Packaging failed.");
    }
}

fn compile(
    config: &BundleConfig,
    request: &CompilationRequest,
    prompter: &dyn Prompter,
    mode: InstallMode,
    dry_run: bool,
) -> bool {
    let runner = progress::SpinnerRunner::new(SystemRunner, &config.packager);
    let invoker = PackagingInvoker::new(config, &runner, prompter, mode).dry_run(dry_run);

    eprintln!("Packaging {}...", request.script.display());
    match invoker.compile(request) {
        Ok(report) => {
            print_report(&report, config);
            true
        }
        Err(e) => {
            eprintln!("error: {e}");
            false
        }
    }
}

fn print_report(report: &BuildReport, config: &BundleConfig) {
    print_analysis(&report.analysis, None, config);
    if report.executed {
        eprintln!("Executable: {}", report.executable_path().display());
    } else {
        eprintln!("Dry run; packaging command:");
        println!("{}", report.command);
    }
    for warning in &report.manifest_warnings {
        eprintln!("  warning: {warning}");
    }
    for warning in &report.cleanup_warnings {
        eprintln!("warning: could not clean up {warning}");
    }
}

fn cmd_analyze(script: &Path, config: &BundleConfig, json: bool) -> Result<bool> {
    let analysis = analyze(script, config);
    if json {
        println!("{}", serde_json::to_string_pretty(&analysis)?);
    } else {
        let manifest = find_manifest(script, config).map(|p| parse_requirements(&p));
        print_analysis(&analysis, manifest.as_ref(), config);
    }
    Ok(true)
}

/// Human-readable summary of an analysis on stderr.
pub(crate) fn print_analysis(
    analysis: &DependencyAnalysis,
    manifest: Option<&Scanned<RequirementsManifest>>,
    config: &BundleConfig,
) {
    let modules = analysis.local_module_names();
    if !modules.is_empty() {
        eprintln!("  Local modules:    {}", modules.join(", "));
    }
    if !analysis.external_imports.is_empty() {
        let external: Vec<&str> = analysis.external_imports.iter().map(String::as_str).collect();
        eprintln!("  External imports: {}", external.join(", "));
    }
    if let Some(manifest) = manifest
        && !manifest.value.is_empty()
    {
        eprintln!(
            "  From {}: {}",
            config.manifest,
            manifest.value.packages.join(", ")
        );
    }
    let manifest_diagnostics = manifest.into_iter().flat_map(|m| &m.diagnostics);
    for diagnostic in analysis.diagnostics.iter().chain(manifest_diagnostics) {
        eprintln!("  warning: {diagnostic}");
    }
}
