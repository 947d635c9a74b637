//! Access to the password vault through its command line client.

use log::debug;

use crate::entry::{parse_listing, Entry};
use crate::environment::ToolEnvironment;
use crate::error::{Error, Result};
use crate::execution::{capture_output, split_command_line};

/// Operations the selection loop needs from a vault.
pub trait Vault {
    /// Lists every entry of the vault.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ListingFailure`] if the vault cannot be enumerated.
    fn list(&self) -> Result<Vec<Entry>>;

    /// # Errors
    ///
    /// Returns an error if the password cannot be fetched.
    fn password(&self, id: &str) -> Result<String>;

    /// # Errors
    ///
    /// Returns an error if the username cannot be fetched.
    fn username(&self, id: &str) -> Result<String>;

    /// # Errors
    ///
    /// Returns an error if the entry has no TOTP or the code cannot be generated.
    fn totp(&self, id: &str) -> Result<String>;

    /// Synchronizes the local vault copy with the server.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SyncFailure`] if the sync fails.
    fn sync(&self) -> Result<()>;
}

/// A [`Vault`] backed by the `rbw` command line client.
#[derive(Debug, Clone)]
pub struct RbwVault {
    program: String,
    leading_args: Vec<String>,
    environment: ToolEnvironment,
}

fn strip_line_ending(mut value: String) -> String {
    while value.ends_with('\n') || value.ends_with('\r') {
        value.pop();
    }
    value
}

impl RbwVault {
    /// Creates a vault for `command_line`, a program optionally followed by
    /// whitespace separated arguments placed before every subcommand.
    pub fn new(command_line: &str, environment: ToolEnvironment) -> Self {
        let (program, leading_args) = split_command_line(command_line);
        Self {
            program,
            leading_args,
            environment,
        }
    }

    fn run(&self, args: &[&str]) -> Result<String> {
        let mut command = self.environment.command(&self.program);
        command.args(&self.leading_args).args(args);
        capture_output(command)
    }
}

impl Vault for RbwVault {
    fn list(&self) -> Result<Vec<Entry>> {
        let output = self
            .run(&["list", "--fields", "id,name,user,folder"])
            .map_err(|e| Error::ListingFailure(e.tool_message()))?;

        let entries = parse_listing(&output);
        debug!("Vault listed {} entries", entries.len());
        Ok(entries)
    }

    fn password(&self, id: &str) -> Result<String> {
        self.run(&["get", id]).map(strip_line_ending)
    }

    fn username(&self, id: &str) -> Result<String> {
        self.run(&["get", "--field", "username", id])
            .map(strip_line_ending)
    }

    fn totp(&self, id: &str) -> Result<String> {
        self.run(&["code", id]).map(strip_line_ending)
    }

    fn sync(&self) -> Result<()> {
        self.run(&["sync"])
            .map(|_| ())
            .map_err(|e| Error::SyncFailure(e.tool_message()))
    }
}
