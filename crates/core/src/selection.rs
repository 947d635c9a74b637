//! The interactive selection loop.
//!
//! Each round ranks the current entries, renders them into finder lines and
//! waits for the user. The pressed key decides what happens next:
//!
//! - the separator line re-renders the list,
//! - the sync key syncs the vault, lists it again and re-renders,
//! - any other key fetches the credentials it needs and ends the session.
//!
//! Failures while syncing or fetching are reported and the list is shown again,
//! so the user keeps their place. Only a failed listing, an unusable finder or a
//! cancelled finder end the session early.

use log::{debug, info, warn};

use crate::action::{Action, Payload};
use crate::config::{DEFAULT_FINDER_HEIGHT, DEFAULT_TOP_N};
use crate::entry::{filter_by_folder, Entry};
use crate::error::{Error, Result};
use crate::fetch::fetch_credentials;
use crate::finder::{build_header, Finder, FinderConfig, FinderOutput};
use crate::lines::{build_lines, extract_id};
use crate::ranking::rank;
use crate::usage::UsageStore;
use crate::vault::Vault;

/// Messages shown to the user between finder invocations.
pub trait Console {
    /// Shows a progress message.
    fn notify(&mut self, message: &str);

    /// Shows an error and waits until the user acknowledges it, so the list
    /// does not cover an unread message.
    fn report(&mut self, message: &str);
}

/// The interpretation of one finder result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    /// The separator (or another line without id) was chosen
    Separator,
    Sync,
    Fetch { action: Action, id: String },
    /// A key outside the expected set
    UnknownKey(String),
}

impl Dispatch {
    pub fn from_output(output: &FinderOutput) -> Self {
        let Some(id) = extract_id(&output.selection) else {
            return Dispatch::Separator;
        };

        match Action::from_token(&output.key) {
            Some(Action::Sync) => Dispatch::Sync,
            Some(action) => Dispatch::Fetch {
                action,
                id: id.to_string(),
            },
            None => Dispatch::UnknownKey(output.key.clone()),
        }
    }
}

pub struct SelectionLoop<V, F, C> {
    vault: V,
    finder: F,
    console: C,
    store: UsageStore,
    top_n: usize,
    folder: Option<String>,
    finder_height: String,
}

impl<V: Vault, F: Finder, C: Console> SelectionLoop<V, F, C> {
    pub fn new(vault: V, finder: F, console: C, store: UsageStore) -> Self {
        Self {
            vault,
            finder,
            console,
            store,
            top_n: DEFAULT_TOP_N,
            folder: None,
            finder_height: DEFAULT_FINDER_HEIGHT.to_string(),
        }
    }

    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }

    /// Restricts the list to one folder (case-insensitive).
    pub fn with_folder(mut self, folder: Option<String>) -> Self {
        self.folder = folder;
        self
    }

    pub fn with_finder_height(mut self, height: impl Into<String>) -> Self {
        self.finder_height = height.into();
        self
    }

    pub fn vault(&self) -> &V {
        &self.vault
    }

    pub fn finder(&self) -> &F {
        &self.finder
    }

    pub fn console(&self) -> &C {
        &self.console
    }

    /// Lists the vault and applies the folder filter.
    fn load_entries(&self) -> Result<Vec<Entry>> {
        let entries = filter_by_folder(self.vault.list()?, self.folder.as_deref());

        if entries.is_empty() {
            return Err(match &self.folder {
                Some(folder) => Error::EmptyFolder(folder.clone()),
                None => Error::EmptyVault,
            });
        }

        Ok(entries)
    }

    fn finder_config(&self) -> FinderConfig {
        FinderConfig {
            expected_keys: Action::expected_keys(),
            header: build_header(self.folder.as_deref()),
            height: self.finder_height.clone(),
        }
    }

    /// Runs the session until the user completes an action or cancels.
    ///
    /// Returns `Ok(None)` when the user cancelled.
    ///
    /// # Errors
    ///
    /// Returns an error if the vault cannot be listed (initially or after a
    /// sync), if the listing is empty, or if the finder cannot be run.
    pub fn run(&mut self) -> Result<Option<Payload>> {
        let mut entries = self.load_entries()?;
        let mut history = self.store.load();
        let config = self.finder_config();

        loop {
            let lines = build_lines(&rank(&entries, &history, self.top_n));

            let Some(output) = self.finder.select(&lines, &config)? else {
                info!("Selection cancelled");
                return Ok(None);
            };

            match Dispatch::from_output(&output) {
                Dispatch::Separator => {
                    debug!("Separator selected, showing the list again");
                }
                Dispatch::UnknownKey(key) => {
                    warn!("Ignoring unexpected finder key `{key}`");
                }
                Dispatch::Sync => {
                    self.console.notify("Syncing vault...");
                    match self.vault.sync() {
                        Ok(()) => {
                            self.console.notify("Synced.");
                            entries = self.load_entries()?;
                        }
                        Err(e) => self.console.report(&e.to_string()),
                    }
                }
                Dispatch::Fetch { action, id } => {
                    if let Some(entry) = entries.iter().find(|entry| entry.id == id) {
                        info!("Selected `{entry}` with {action}");
                    }

                    match fetch_credentials(&self.vault, action, &id) {
                        Ok(payload) => {
                            if let Err(e) = self.store.record(&mut history, &id) {
                                warn!("Could not save usage history: {e}");
                            }
                            return Ok(Some(payload));
                        }
                        Err(e) => self.console.report(&e.to_string()),
                    }
                }
            }
        }
    }
}
