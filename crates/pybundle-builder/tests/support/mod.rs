//! Recording stand-in for the interpreter, pip and the packaging tool.

#![allow(dead_code)]

use pybundle_builder::RunError;
use pybundle_builder::names::{ImportNameMap, ImportNameResolver};
use pybundle_builder::prompt::LinePrompter;
use pybundle_builder::runner::{CommandLine, CommandOutput, CommandRunner};
use pybundle_core::config::BundleConfig;
use std::cell::RefCell;
use std::collections::BTreeSet;
use std::io::Cursor;
use std::path::PathBuf;

pub enum Packager {
    Succeed,
    Fail { code: i32, stderr: &'static str },
    Missing,
}

pub struct FakeRunner {
    calls: RefCell<Vec<CommandLine>>,
    importable: RefCell<BTreeSet<String>>,
    failing_installs: BTreeSet<String>,
    packager: Packager,
    names: ImportNameMap,
}

impl FakeRunner {
    pub fn new() -> Self {
        Self {
            calls: RefCell::new(Vec::new()),
            importable: RefCell::new(BTreeSet::new()),
            failing_installs: BTreeSet::new(),
            packager: Packager::Succeed,
            names: ImportNameMap::from_config(&BundleConfig::default()),
        }
    }

    /// Mark import names as already importable.
    pub fn with_importable(self, names: &[&str]) -> Self {
        self.importable
            .borrow_mut()
            .extend(names.iter().map(|s| (*s).to_string()));
        self
    }

    pub fn failing_install(mut self, package: &str) -> Self {
        self.failing_installs.insert(package.to_string());
        self
    }

    pub fn with_packager(mut self, packager: Packager) -> Self {
        self.packager = packager;
        self
    }

    pub fn calls(&self) -> Vec<CommandLine> {
        self.calls.borrow().clone()
    }

    /// Import names probed, in order.
    pub fn probes(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|c| c.args.first().map(String::as_str) == Some("-c"))
            .filter_map(|c| c.args.last().cloned())
            .collect()
    }

    /// Packages passed to pip install, in order.
    pub fn installs(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|c| is_pip(c))
            .filter_map(|c| c.args.last().cloned())
            .collect()
    }

    pub fn packager_calls(&self) -> Vec<CommandLine> {
        self.calls()
            .into_iter()
            .filter(|c| c.program == "pyinstaller")
            .collect()
    }
}

fn is_pip(command: &CommandLine) -> bool {
    command.args.len() >= 3 && command.args[..3] == ["-m", "pip", "install"]
}

fn value_after(command: &CommandLine, flag: &str) -> Option<String> {
    command
        .args
        .windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].clone())
}

/// Write the artifacts the real packaging tool leaves behind.
fn write_artifacts(command: &CommandLine) {
    if let (Some(spec_dir), Some(name)) = (
        value_after(command, "--specpath"),
        value_after(command, "--name"),
    ) {
        std::fs::create_dir_all(&spec_dir).unwrap();
        std::fs::write(PathBuf::from(&spec_dir).join(format!("{name}.spec")), "# spec").unwrap();
    }
    if let Some(work) = value_after(command, "--workpath") {
        std::fs::create_dir_all(PathBuf::from(work).join("cache")).unwrap();
    }
}

impl CommandRunner for FakeRunner {
    fn run(&self, command: &CommandLine) -> Result<CommandOutput, RunError> {
        self.calls.borrow_mut().push(command.clone());

        let exit = |code: i32| -> Result<CommandOutput, RunError> {
            Ok(CommandOutput {
                code: Some(code),
                ..Default::default()
            })
        };

        if command.args.first().map(String::as_str) == Some("-c") {
            let name = command.args.last().cloned().unwrap_or_default();
            return exit(i32::from(!self.importable.borrow().contains(&name)));
        }

        if is_pip(command) {
            let package = command.args.last().cloned().unwrap_or_default();
            if self.failing_installs.contains(&package) {
                return exit(1);
            }
            self.importable
                .borrow_mut()
                .insert(self.names.import_name(&package));
            return exit(0);
        }

        match &self.packager {
            Packager::Succeed => {
                write_artifacts(command);
                exit(0)
            }
            Packager::Fail { code, stderr } => {
                write_artifacts(command);
                Ok(CommandOutput {
                    code: Some(*code),
                    stdout: String::new(),
                    stderr: (*stderr).to_string(),
                })
            }
            Packager::Missing => Err(RunError::Spawn {
                program: command.program.clone(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
            }),
        }
    }
}

/// Runner for which nothing can be started.
pub struct NothingRuns;

impl CommandRunner for NothingRuns {
    fn run(&self, command: &CommandLine) -> Result<CommandOutput, RunError> {
        Err(RunError::Spawn {
            program: command.program.clone(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        })
    }
}

pub type TestPrompter = LinePrompter<Cursor<Vec<u8>>, Vec<u8>>;

/// Prompter answering from `input`, one line per question.
pub fn answers(input: &str) -> TestPrompter {
    LinePrompter::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
}

/// Everything the prompter wrote.
pub fn asked(prompter: TestPrompter) -> String {
    let (_, out) = prompter.into_inner();
    String::from_utf8(out).unwrap()
}

/// Config with a fixed interpreter name so commands are predictable.
pub fn config() -> BundleConfig {
    BundleConfig {
        python: "python3".to_string(),
        ..Default::default()
    }
}
