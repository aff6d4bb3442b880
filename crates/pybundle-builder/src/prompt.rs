//! Yes/no and path questions to the user.
//!
//! A closed or failing input stream always counts as "no", so a pipeline
//! waiting on an answer still reaches a terminal state.

use std::cell::RefCell;
use std::io::{BufRead, Write};
use std::path::PathBuf;

/// Source of answers for consent and file-selection prompts.
pub trait Prompter {
    /// Ask a yes/no question. An empty answer selects `default`.
    fn confirm(&self, question: &str, default: bool) -> bool;

    /// Ask for a file path. `None` means the user cancelled.
    fn ask_path(&self, question: &str) -> Option<PathBuf>;
}

/// Prompter reading line answers from `R` and writing questions to `W`.
pub struct LinePrompter<R, W> {
    io: RefCell<(R, W)>,
}

impl LinePrompter<std::io::StdinLock<'static>, std::io::Stderr> {
    /// Prompt on the process's terminal. Questions go to stderr so stdout
    /// stays clean for command output.
    pub fn stdio() -> Self {
        Self::new(std::io::stdin().lock(), std::io::stderr())
    }
}

impl<R: BufRead, W: Write> LinePrompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            io: RefCell::new((input, output)),
        }
    }

    /// Give back the underlying streams (used to inspect written prompts).
    pub fn into_inner(self) -> (R, W) {
        self.io.into_inner()
    }

    /// Write `question`, read one line. `None` on EOF or I/O error.
    fn read_answer(&self, question: &str) -> Option<String> {
        let mut io = self.io.borrow_mut();
        let (input, output) = &mut *io;
        // A prompt that cannot be shown is still answerable.
        let _ = write!(output, "{question} ");
        let _ = output.flush();

        let mut line = String::new();
        match input.read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line.trim().to_string()),
        }
    }
}

impl<R: BufRead, W: Write> Prompter for LinePrompter<R, W> {
    fn confirm(&self, question: &str, default: bool) -> bool {
        let hint = if default { "[Y/n]" } else { "[y/N]" };
        match self.read_answer(&format!("{question} {hint}")) {
            None => false,
            Some(answer) if answer.is_empty() => default,
            Some(answer) => matches!(answer.to_lowercase().as_str(), "y" | "yes"),
        }
    }

    fn ask_path(&self, question: &str) -> Option<PathBuf> {
        let answer = self.read_answer(question)?;
        // Terminals quote dragged-in paths.
        let path = answer
            .trim_matches(|c: char| c == '"' || c == '\'')
            .trim();
        (!path.is_empty()).then(|| PathBuf::from(path))
    }
}

/// Prompter that accepts every confirmation and never selects a file.
#[derive(Debug, Clone, Copy, Default)]
pub struct AssumeYes;

impl Prompter for AssumeYes {
    fn confirm(&self, question: &str, _default: bool) -> bool {
        tracing::info!("{question} yes (assumed)");
        true
    }

    fn ask_path(&self, _question: &str) -> Option<PathBuf> {
        None
    }
}
