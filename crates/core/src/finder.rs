//! The external fuzzy finder that renders the entry list.

use std::io::ErrorKind;

use log::debug;

use crate::environment::ToolEnvironment;
use crate::error::{Error, Result};
use crate::execution::{run_with_input, split_command_line};

const KEY_LEGEND: &str = "\n  Enter: password    C-u: username    C-b: username⇥password    C-t: copy totp\n  Alt-p: copy password    Alt-u: copy username    Alt-s: sync\n ";

/// Builds the finder header: an optional folder line and the key legend.
pub fn build_header(folder: Option<&str>) -> String {
    match folder {
        Some(folder) => format!("\n  Folder: {folder}{KEY_LEGEND}"),
        None => KEY_LEGEND.to_string(),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FinderConfig {
    /// Comma separated keys that accept a selection
    pub expected_keys: String,
    pub header: String,
    pub height: String,
}

/// What the finder returned on acceptance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinderOutput {
    pub key: String,
    /// The raw selected line, id field included
    pub selection: String,
}

impl FinderOutput {
    /// Parses finder output: the pressed key, then the selected line.
    ///
    /// Fewer than two lines, or a blank second line, means the user cancelled.
    pub fn parse(output: &str) -> Option<Self> {
        let mut lines = output.lines();
        let key = lines.next()?;
        let selection = lines.next()?;

        if selection.trim().is_empty() {
            return None;
        }

        Some(Self {
            key: key.trim().to_string(),
            selection: selection.to_string(),
        })
    }
}

/// Presents lines to the user and returns the accepted selection.
pub trait Finder {
    /// Shows `lines` and waits for the user.
    ///
    /// Returns `Ok(None)` when the user cancelled.
    ///
    /// # Errors
    ///
    /// Returns [`Error::FinderUnavailable`] if the finder cannot be started.
    fn select(&self, lines: &[String], config: &FinderConfig) -> Result<Option<FinderOutput>>;
}

/// A [`Finder`] backed by `fzf`.
#[derive(Debug, Clone)]
pub struct FzfFinder {
    program: String,
    leading_args: Vec<String>,
    environment: ToolEnvironment,
}

impl FzfFinder {
    /// Creates a finder for `command_line`, a program optionally followed by
    /// whitespace separated arguments placed before the generated options.
    pub fn new(command_line: &str, environment: ToolEnvironment) -> Self {
        let (program, leading_args) = split_command_line(command_line);
        Self {
            program,
            leading_args,
            environment,
        }
    }

    /// The options passed to `fzf`: the id field is hidden but searchable.
    pub fn arguments(config: &FinderConfig) -> Vec<String> {
        vec![
            "--ansi".to_string(),
            "--delimiter=\t".to_string(),
            "--with-nth=2".to_string(),
            "--nth=1,2".to_string(),
            "--header".to_string(),
            config.header.clone(),
            "--expect".to_string(),
            config.expected_keys.clone(),
            "--layout=reverse".to_string(),
            format!("--height={}", config.height),
            "--min-height=20".to_string(),
            "--tiebreak=index".to_string(),
        ]
    }
}

impl Finder for FzfFinder {
    fn select(&self, lines: &[String], config: &FinderConfig) -> Result<Option<FinderOutput>> {
        let mut command = self.environment.command(&self.program);
        command
            .args(&self.leading_args)
            .args(Self::arguments(config));

        let output = run_with_input(command, &lines.join("\n")).map_err(|e| match e {
            Error::SubProcess(io_error) if io_error.kind() == ErrorKind::NotFound => {
                Error::FinderUnavailable(self.program.clone())
            }
            other => other,
        })?;

        let selection = FinderOutput::parse(&output);
        if selection.is_none() {
            debug!("Finder returned no selection");
        }
        Ok(selection)
    }
}
