//! Configuration for keycuts.
//!
//! Settings are read from an optional YAML file. Every field has a default, so
//! a missing file (or a file that only sets some fields) is valid. Paths may use
//! shell expansions like `~`.

use std::fs::File;
use std::io::ErrorKind;

use log::debug;
use serde::Deserialize;

use crate::error::{Error, Result};

/// Default path for the settings file
const DEFAULT_CONFIG_PATH: &str = "~/.keycuts/config.yml";
/// Default path for the usage history document
const DEFAULT_USAGE_PATH: &str = "~/.local/share/keycuts/usage.json";

/// Number of most used entries shown above the separator
pub const DEFAULT_TOP_N: usize = 10;
pub const DEFAULT_VAULT_COMMAND: &str = "rbw";
pub const DEFAULT_FINDER_COMMAND: &str = "fzf";
pub const DEFAULT_FINDER_HEIGHT: &str = "60%";

/// Directories prepended to `PATH` for the external tools when missing.
pub const DEFAULT_SEARCH_PATH: [&str; 3] = ["~/.local/bin", "/usr/local/bin", "/usr/bin"];

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub top_n: usize,
    pub vault_command: String,
    pub finder_command: String,
    pub finder_height: String,
    pub usage_path: String,
    pub search_path: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            top_n: DEFAULT_TOP_N,
            vault_command: DEFAULT_VAULT_COMMAND.to_string(),
            finder_command: DEFAULT_FINDER_COMMAND.to_string(),
            finder_height: DEFAULT_FINDER_HEIGHT.to_string(),
            usage_path: DEFAULT_USAGE_PATH.to_string(),
            search_path: DEFAULT_SEARCH_PATH.iter().map(ToString::to_string).collect(),
        }
    }
}

impl Settings {
    /// Loads settings from the YAML file at `path`.
    ///
    /// A missing file yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or is not valid YAML.
    pub fn load(path: &str) -> Result<Self> {
        let reader = match File::open(path) {
            Ok(reader) => reader,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No settings file at `{path}`, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(Error::io_error("settings".to_string(), path.to_string(), e)),
        };

        serde_yaml::from_reader(reader).map_err(|e| {
            Error::yaml_error(
                "reading".to_string(),
                "settings".to_string(),
                path.to_string(),
                e,
            )
        })
    }

    /// The usage history path with shell expansions resolved.
    pub fn expanded_usage_path(&self) -> String {
        shellexpand::tilde(&self.usage_path).to_string()
    }

    /// The extra search directories with shell expansions resolved.
    pub fn expanded_search_path(&self) -> Vec<String> {
        self.search_path
            .iter()
            .map(|dir| shellexpand::tilde(dir).to_string())
            .collect()
    }
}

/// Resolves the settings file path.
///
/// If a custom path is provided, uses that path. Otherwise, uses the default
/// settings path. Shell expansions like `~` are resolved.
///
/// # Examples
///
/// ```
/// use keycuts_core::config::get_config_path;
///
/// let custom_path = get_config_path(&Some("/path/to/config.yml".to_string()));
/// assert_eq!(custom_path, "/path/to/config.yml");
/// ```
pub fn get_config_path(config_path_arg: &Option<String>) -> String {
    let config_path = match config_path_arg {
        Some(config_path) => config_path,
        None => DEFAULT_CONFIG_PATH,
    };

    shellexpand::tilde(config_path).to_string()
}
