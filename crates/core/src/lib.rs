//! Keycuts Core Library
//!
//! This crate provides the selection engine behind keycuts, a picker that lets
//! a user choose a password vault entry in an external fuzzy finder and hands
//! the requested credential to the host terminal.
//!
//! # Key Features
//!
//! - **Usage Ranking**: The most used entries are listed first, by count then recency
//! - **Finder Protocol**: Entries are rendered as `<id>\t<display>` lines for the finder
//! - **Selection Loop**: Interprets the pressed key, syncs the vault or fetches credentials
//! - **Usage History**: Per-entry counters persisted atomically with owner-only permissions
//! - **Tool Adapters**: `rbw` and `fzf` behind the [`vault::Vault`] and [`finder::Finder`] traits
//!
//! # Examples
//!
//! Running one selection session against `rbw` and `fzf`:
//!
//! ```no_run
//! use keycuts_core::config::Settings;
//! use keycuts_core::environment::ToolEnvironment;
//! use keycuts_core::finder::FzfFinder;
//! use keycuts_core::selection::{Console, SelectionLoop};
//! use keycuts_core::usage::UsageStore;
//! use keycuts_core::vault::RbwVault;
//!
//! struct Stderr;
//!
//! impl Console for Stderr {
//!     fn notify(&mut self, message: &str) {
//!         eprintln!("{message}");
//!     }
//!
//!     fn report(&mut self, message: &str) {
//!         eprintln!("{message}");
//!     }
//! }
//!
//! let settings = Settings::default();
//! let environment = ToolEnvironment::from_process(&settings.expanded_search_path());
//! let mut selection = SelectionLoop::new(
//!     RbwVault::new(&settings.vault_command, environment.clone()),
//!     FzfFinder::new(&settings.finder_command, environment),
//!     Stderr,
//!     UsageStore::new(settings.expanded_usage_path()),
//! );
//!
//! if let Some(payload) = selection.run()? {
//!     println!("{}", payload.action);
//! }
//! # Ok::<(), keycuts_core::error::Error>(())
//! ```

pub mod action;
pub mod config;
pub mod entry;
pub mod environment;
pub mod error;
pub mod execution;
pub mod fetch;
pub mod finder;
pub mod lines;
pub mod ranking;
pub mod selection;
pub mod usage;
pub mod vault;
