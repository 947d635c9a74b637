//! Command-line argument parsing.
//!
//! This module defines the command-line interface structure and merges the
//! arguments over the settings file using the `clap` crate.

use clap::{Parser, ValueEnum};
use keycuts_core::config::Settings;

/// How the selected credential is written to standard output.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// The full payload as JSON, for a terminal integration to dispatch
    #[default]
    Json,
    /// Only the text to paste or copy
    Plain,
}

/// Command-line arguments for the keycuts CLI tool.
///
/// # Examples
///
/// ```rust
/// use clap::Parser;
/// use keycuts_cli::cli_args::Args;
///
/// let args = Args::parse_from(["kc", "work"]);
/// assert_eq!(args.folder, Some("work".to_string()));
/// ```
#[derive(Parser, Debug)] // requires `derive` feature
#[command(term_width = 0)] // Just to make testing across clap features easier
pub struct Args {
    /// Only list entries of this folder (case-insensitive).
    pub folder: Option<String>,

    /// Path to the settings file YAML.
    ///
    /// If not provided, defaults to `~/.keycuts/config.yml`.
    #[arg(long, short = 'c')]
    pub config_path: Option<String>,

    /// Path to the usage history file, overriding the settings file.
    #[arg(long, short = 'u')]
    pub usage_path: Option<String>,

    /// Number of most used entries listed first, overriding the settings file.
    #[arg(long = "top", short = 'n')]
    pub top_n: Option<usize>,

    /// Output format of the selected credential.
    #[arg(long, short = 'o', value_enum, default_value_t)]
    pub output: OutputFormat,
}

impl Args {
    /// Applies the argument overrides to `settings`.
    pub fn apply(&self, mut settings: Settings) -> Settings {
        if let Some(usage_path) = &self.usage_path {
            settings.usage_path.clone_from(usage_path);
        }

        if let Some(top_n) = self.top_n {
            settings.top_n = top_n;
        }

        settings
    }
}
