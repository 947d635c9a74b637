//! Explicit environment for the external tools.
//!
//! The vault and finder binaries are often installed in directories that are
//! missing from `PATH` when keycuts is launched from a terminal keybinding. A
//! [`ToolEnvironment`] is built once per session and applied to every command
//! it creates; the process environment itself is never modified.

use std::collections::HashMap;
use std::env;
use std::path::PathBuf;
use std::process::Command;

use log::debug;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToolEnvironment {
    variables: HashMap<String, String>,
}

impl ToolEnvironment {
    /// Builds an environment from the current process `PATH`.
    pub fn from_process(search_path: &[String]) -> Self {
        Self::with_search_path(env::var("PATH").ok().as_deref(), search_path)
    }

    /// Builds an environment whose `PATH` is `current_path` with every
    /// directory of `search_path` that it lacks prepended, keeping the order of
    /// `search_path`.
    pub fn with_search_path(current_path: Option<&str>, search_path: &[String]) -> Self {
        let existing: Vec<PathBuf> = current_path
            .map(|path| env::split_paths(path).collect())
            .unwrap_or_default();

        let mut directories: Vec<PathBuf> = search_path
            .iter()
            .map(PathBuf::from)
            .filter(|dir| !existing.contains(dir))
            .collect();
        directories.dedup();
        directories.extend(existing);

        let mut variables = HashMap::new();
        if directories.is_empty() {
            return Self { variables };
        }

        match env::join_paths(&directories) {
            Ok(path) => {
                let path = path.to_string_lossy().to_string();
                debug!("Tool PATH: {path}");
                variables.insert("PATH".to_string(), path);
            }
            Err(e) => debug!("Keeping process PATH, could not join search path: {e}"),
        }

        Self { variables }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.variables.get(key).map(String::as_str)
    }

    /// Creates a command for `program` that runs with this environment.
    pub fn command(&self, program: &str) -> Command {
        let mut command = Command::new(program);
        command.envs(&self.variables);
        command
    }
}
