//! Integration tests for keycuts-core
//!
//! These tests drive complete selection sessions through fake vault, finder and
//! console implementations, checking what the user sees, which vault calls are
//! made and what ends up in the usage history.

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, VecDeque};

use keycuts_core::action::Action;
use keycuts_core::entry::Entry;
use keycuts_core::error::{Error, Result};
use keycuts_core::finder::{Finder, FinderConfig, FinderOutput};
use keycuts_core::lines::extract_id;
use keycuts_core::selection::{Console, SelectionLoop};
use keycuts_core::usage::{UsageHistory, UsageRecord, UsageStore};
use keycuts_core::vault::Vault;
use tempfile::TempDir;

fn entry(id: &str, name: &str, folder: &str) -> Entry {
    Entry {
        id: id.to_string(),
        name: name.to_string(),
        user: String::new(),
        folder: folder.to_string(),
    }
}

#[derive(Default)]
struct FakeVault {
    entries: RefCell<Vec<Entry>>,
    entries_after_sync: Option<Vec<Entry>>,
    sync_error: Option<String>,
    list_fails_after_sync: bool,
    synced: Cell<bool>,
    totp: HashMap<String, String>,
    totp_stderr: Option<&'static str>,
    calls: RefCell<Vec<String>>,
}

impl FakeVault {
    fn with_entries(entries: Vec<Entry>) -> Self {
        Self {
            entries: RefCell::new(entries),
            ..Self::default()
        }
    }

    fn credential_calls(&self) -> Vec<String> {
        self.calls
            .borrow()
            .iter()
            .filter(|call| *call != "list" && *call != "sync")
            .cloned()
            .collect()
    }
}

impl Vault for FakeVault {
    fn list(&self) -> Result<Vec<Entry>> {
        self.calls.borrow_mut().push("list".to_string());
        if self.synced.get() && self.list_fails_after_sync {
            return Err(Error::ListingFailure("rbw: agent is locked".to_string()));
        }
        Ok(self.entries.borrow().clone())
    }

    fn password(&self, id: &str) -> Result<String> {
        self.calls.borrow_mut().push(format!("password {id}"));
        Ok(format!("password-of-{id}"))
    }

    fn username(&self, id: &str) -> Result<String> {
        self.calls.borrow_mut().push(format!("username {id}"));
        Ok(format!("user-of-{id}"))
    }

    fn totp(&self, id: &str) -> Result<String> {
        self.calls.borrow_mut().push(format!("totp {id}"));
        self.totp
            .get(id)
            .cloned()
            .ok_or_else(|| {
                let stderr = self.totp_stderr.unwrap_or("rbw code: no totp secret");
                Error::sub_process_exit("rbw", stderr.as_bytes())
            })
    }

    fn sync(&self) -> Result<()> {
        self.calls.borrow_mut().push("sync".to_string());
        if let Some(message) = &self.sync_error {
            return Err(Error::SyncFailure(message.clone()));
        }
        self.synced.set(true);
        if let Some(entries) = &self.entries_after_sync {
            *self.entries.borrow_mut() = entries.clone();
        }
        Ok(())
    }
}

/// Answers each finder invocation with the next scripted output and keeps the
/// lines it was shown.
#[derive(Default)]
struct ScriptedFinder {
    outputs: RefCell<VecDeque<Option<FinderOutput>>>,
    unavailable: bool,
    shown: RefCell<Vec<Vec<String>>>,
    configs: RefCell<Vec<FinderConfig>>,
}

impl ScriptedFinder {
    fn answering(outputs: &[&[&str]]) -> Self {
        let outputs = outputs
            .iter()
            .map(|lines| FinderOutput::parse(&lines.join("\n")))
            .collect();
        Self {
            outputs: RefCell::new(outputs),
            ..Self::default()
        }
    }

    fn shown(&self) -> Vec<Vec<String>> {
        self.shown.borrow().clone()
    }
}

impl Finder for ScriptedFinder {
    fn select(&self, lines: &[String], config: &FinderConfig) -> Result<Option<FinderOutput>> {
        if self.unavailable {
            return Err(Error::FinderUnavailable("fzf".to_string()));
        }
        self.shown.borrow_mut().push(lines.to_vec());
        self.configs.borrow_mut().push(config.clone());
        // Running out of answers behaves like pressing escape
        Ok(self.outputs.borrow_mut().pop_front().flatten())
    }
}

#[derive(Default)]
struct RecordingConsole {
    notified: Vec<String>,
    reported: Vec<String>,
}

impl Console for RecordingConsole {
    fn notify(&mut self, message: &str) {
        self.notified.push(message.to_string());
    }

    fn report(&mut self, message: &str) {
        self.reported.push(message.to_string());
    }
}

fn bank_and_mail() -> Vec<Entry> {
    vec![entry("a", "Bank", "Finance"), entry("b", "Mail", "")]
}

fn ids_shown(lines: &[String]) -> Vec<Option<String>> {
    lines
        .iter()
        .map(|line| extract_id(line).map(ToString::to_string))
        .collect()
}

fn session(
    dir: &TempDir,
    vault: FakeVault,
    finder: ScriptedFinder,
) -> SelectionLoop<FakeVault, ScriptedFinder, RecordingConsole> {
    SelectionLoop::new(
        vault,
        finder,
        RecordingConsole::default(),
        UsageStore::new(dir.path().join("usage.json")),
    )
}

#[test]
fn test_accept_returns_password_and_records_usage() {
    let dir = TempDir::new().unwrap();
    let finder = ScriptedFinder::answering(&[&["enter", "a\tBank"]]);
    let mut selection = session(&dir, FakeVault::with_entries(bank_and_mail()), finder);

    let payload = selection.run().unwrap().unwrap();

    assert_eq!(payload.action, Action::Accept);
    assert_eq!(payload.id, "a");
    assert_eq!(payload.password.as_deref(), Some("password-of-a"));
    assert_eq!(payload.username, None);
    assert_eq!(selection.vault().credential_calls(), vec!["password a"]);

    let history = UsageStore::new(dir.path().join("usage.json")).load();
    assert_eq!(history.len(), 1);
    assert_eq!(history["a"].count, 1);
    assert!(history["a"].last > 0.0);
}

#[test]
fn test_first_render_without_history_keeps_vault_order() {
    let dir = TempDir::new().unwrap();
    let finder = ScriptedFinder::answering(&[]);
    let mut selection = session(&dir, FakeVault::with_entries(bank_and_mail()), finder);

    assert!(selection.run().unwrap().is_none());

    let shown = selection.finder().shown();
    assert_eq!(shown.len(), 1);
    assert_eq!(
        ids_shown(&shown[0]),
        vec![Some("a".to_string()), Some("b".to_string())]
    );
}

#[test]
fn test_history_puts_used_entries_first() {
    let dir = TempDir::new().unwrap();
    let store = UsageStore::new(dir.path().join("usage.json"));
    let mut history = UsageHistory::new();
    history.insert("b".to_string(), UsageRecord { count: 5, last: 100.0 });
    store.save(&history).unwrap();

    let finder = ScriptedFinder::answering(&[]);
    let mut selection = session(&dir, FakeVault::with_entries(bank_and_mail()), finder);
    selection.run().unwrap();

    let shown = selection.finder().shown();
    assert_eq!(
        ids_shown(&shown[0]),
        vec![Some("b".to_string()), None, Some("a".to_string())]
    );
}

#[test]
fn test_single_output_line_ends_session_without_vault_calls() {
    let dir = TempDir::new().unwrap();
    let finder = ScriptedFinder::answering(&[&["enter"]]);
    let mut selection = session(&dir, FakeVault::with_entries(bank_and_mail()), finder);

    assert!(selection.run().unwrap().is_none());
    assert!(selection.vault().credential_calls().is_empty());
    assert!(!dir.path().join("usage.json").exists());
}

#[test]
fn test_missing_totp_is_reported_and_list_is_shown_again() {
    let dir = TempDir::new().unwrap();
    let entries = vec![entry("a", "Bank", ""), entry("c", "Cloud", "")];
    let finder = ScriptedFinder::answering(&[&["ctrl-t", "c\tCloud"]]);
    let mut selection = session(&dir, FakeVault::with_entries(entries), finder);

    // The second render gets no answer, which cancels
    assert!(selection.run().unwrap().is_none());

    assert_eq!(
        selection.console().reported,
        vec!["This entry has no TOTP configured: rbw code: no totp secret"]
    );
    let shown = selection.finder().shown();
    assert_eq!(shown.len(), 2);
    assert_eq!(shown[0], shown[1]);
    assert!(!dir.path().join("usage.json").exists());
}

#[test]
fn test_locked_vault_on_totp_reports_the_vault_error() {
    let dir = TempDir::new().unwrap();
    let vault = FakeVault {
        totp_stderr: Some("rbw code: agent is locked"),
        ..FakeVault::with_entries(vec![entry("a", "Bank", "")])
    };
    let finder = ScriptedFinder::answering(&[&["ctrl-t", "a\tBank"]]);
    let mut selection = session(&dir, vault, finder);

    assert!(selection.run().unwrap().is_none());

    assert_eq!(
        selection.console().reported,
        vec!["Error fetching credentials: rbw code: agent is locked"]
    );
    assert_eq!(selection.finder().shown().len(), 2);
}

#[test]
fn test_totp_after_failed_attempt() {
    let dir = TempDir::new().unwrap();
    let mut vault = FakeVault::with_entries(vec![entry("a", "Bank", ""), entry("c", "Cloud", "")]);
    vault.totp.insert("a".to_string(), "123456".to_string());
    let finder = ScriptedFinder::answering(&[&["ctrl-t", "c\tCloud"], &["ctrl-t", "a\tBank"]]);
    let mut selection = session(&dir, vault, finder);

    let payload = selection.run().unwrap().unwrap();

    assert_eq!(payload.totp.as_deref(), Some("123456"));
    assert_eq!(selection.console().reported.len(), 1);
    assert_eq!(
        selection.vault().credential_calls(),
        vec!["totp c", "totp a"]
    );

    let history = UsageStore::new(dir.path().join("usage.json")).load();
    assert_eq!(history.keys().collect::<Vec<_>>(), vec!["a"]);
}

#[test]
fn test_separator_selection_renders_again() {
    let dir = TempDir::new().unwrap();
    let store = UsageStore::new(dir.path().join("usage.json"));
    let mut history = UsageHistory::new();
    history.insert("b".to_string(), UsageRecord { count: 1, last: 1.0 });
    store.save(&history).unwrap();

    let finder = ScriptedFinder::answering(&[&["enter", "\t────"], &["ctrl-u", "b\tMail"]]);
    let mut selection = session(&dir, FakeVault::with_entries(bank_and_mail()), finder);

    let payload = selection.run().unwrap().unwrap();

    assert_eq!(payload.username.as_deref(), Some("user-of-b"));
    assert_eq!(selection.finder().shown().len(), 2);
    assert_eq!(selection.vault().credential_calls(), vec!["username b"]);
    assert_eq!(store.load()["b"].count, 2);
}

#[test]
fn test_sync_replaces_entries() {
    let dir = TempDir::new().unwrap();
    let vault = FakeVault {
        entries_after_sync: Some(vec![
            entry("a", "Bank", ""),
            entry("b", "Mail", ""),
            entry("n", "New", ""),
        ]),
        ..FakeVault::with_entries(bank_and_mail())
    };
    let finder = ScriptedFinder::answering(&[&["alt-s", "a\tBank"], &["ctrl-b", "n\tNew"]]);
    let mut selection = session(&dir, vault, finder);

    let payload = selection.run().unwrap().unwrap();

    assert_eq!(payload.action, Action::PasteUsernameAndPassword);
    assert_eq!(payload.password.as_deref(), Some("password-of-n"));
    assert_eq!(payload.username.as_deref(), Some("user-of-n"));

    let shown = selection.finder().shown();
    assert_eq!(shown[0].len(), 2);
    assert_eq!(shown[1].len(), 3);
    assert_eq!(
        selection.console().notified,
        vec!["Syncing vault...", "Synced."]
    );
    assert!(selection.console().reported.is_empty());
    assert_eq!(
        *selection.vault().calls.borrow(),
        vec!["list", "sync", "list", "password n", "username n"]
    );
}

#[test]
fn test_sync_failure_is_reported_and_list_unchanged() {
    let dir = TempDir::new().unwrap();
    let vault = FakeVault {
        sync_error: Some("network unreachable".to_string()),
        ..FakeVault::with_entries(bank_and_mail())
    };
    let finder = ScriptedFinder::answering(&[&["alt-s", "a\tBank"]]);
    let mut selection = session(&dir, vault, finder);

    assert!(selection.run().unwrap().is_none());

    assert_eq!(
        selection.console().reported,
        vec!["Error syncing vault: network unreachable"]
    );
    let shown = selection.finder().shown();
    assert_eq!(shown.len(), 2);
    assert_eq!(shown[0], shown[1]);
    assert_eq!(*selection.vault().calls.borrow(), vec!["list", "sync"]);
}

#[test]
fn test_listing_failure_after_sync_ends_session() {
    let dir = TempDir::new().unwrap();
    let vault = FakeVault {
        list_fails_after_sync: true,
        ..FakeVault::with_entries(bank_and_mail())
    };
    let finder = ScriptedFinder::answering(&[&["alt-s", "a\tBank"], &["enter", "a\tBank"]]);
    let mut selection = session(&dir, vault, finder);

    let result = selection.run();

    assert!(matches!(result, Err(Error::ListingFailure(_))));
    assert_eq!(selection.finder().shown().len(), 1);
}

#[test]
fn test_initial_listing_failure() {
    let dir = TempDir::new().unwrap();
    let vault = FakeVault {
        list_fails_after_sync: true,
        ..FakeVault::with_entries(bank_and_mail())
    };
    vault.synced.set(true);
    let mut selection = session(&dir, vault, ScriptedFinder::answering(&[]));

    assert!(matches!(selection.run(), Err(Error::ListingFailure(_))));
    assert!(selection.finder().shown().is_empty());
}

#[test]
fn test_finder_unavailable_ends_session() {
    let dir = TempDir::new().unwrap();
    let finder = ScriptedFinder {
        unavailable: true,
        ..ScriptedFinder::default()
    };
    let mut selection = session(&dir, FakeVault::with_entries(bank_and_mail()), finder);

    assert!(matches!(selection.run(), Err(Error::FinderUnavailable(_))));
}

#[test]
fn test_empty_vault() {
    let dir = TempDir::new().unwrap();
    let mut selection = session(
        &dir,
        FakeVault::with_entries(vec![]),
        ScriptedFinder::answering(&[]),
    );

    assert!(matches!(selection.run(), Err(Error::EmptyVault)));
    assert!(selection.finder().shown().is_empty());
}

#[test]
fn test_folder_filter() {
    let dir = TempDir::new().unwrap();
    let finder = ScriptedFinder::answering(&[]);
    let mut selection = session(&dir, FakeVault::with_entries(bank_and_mail()), finder)
        .with_folder(Some("FINANCE".to_string()));

    assert!(selection.run().unwrap().is_none());

    let shown = selection.finder().shown();
    assert_eq!(ids_shown(&shown[0]), vec![Some("a".to_string())]);
    let configs = selection.finder().configs.borrow();
    assert!(configs[0].header.contains("Folder: FINANCE"));
    assert_eq!(configs[0].expected_keys, "enter,ctrl-u,ctrl-b,ctrl-t,alt-p,alt-u,alt-s");
}

#[test]
fn test_folder_without_entries() {
    let dir = TempDir::new().unwrap();
    let mut selection = session(
        &dir,
        FakeVault::with_entries(bank_and_mail()),
        ScriptedFinder::answering(&[]),
    )
    .with_folder(Some("Travel".to_string()));

    match selection.run() {
        Err(Error::EmptyFolder(folder)) => assert_eq!(folder, "Travel"),
        other => panic!("Expected EmptyFolder, got {other:?}"),
    }
}

#[test]
fn test_top_n_limits_the_head() {
    let dir = TempDir::new().unwrap();
    let store = UsageStore::new(dir.path().join("usage.json"));
    let mut history = UsageHistory::new();
    history.insert("a".to_string(), UsageRecord { count: 1, last: 1.0 });
    history.insert("b".to_string(), UsageRecord { count: 2, last: 1.0 });
    store.save(&history).unwrap();

    let finder = ScriptedFinder::answering(&[&["alt-p", "a\tBank"]]);
    let mut selection =
        session(&dir, FakeVault::with_entries(bank_and_mail()), finder).with_top_n(1);

    let payload = selection.run().unwrap().unwrap();
    assert_eq!(payload.action, Action::CopyPassword);

    let shown = selection.finder().shown();
    assert_eq!(
        ids_shown(&shown[0]),
        vec![Some("b".to_string()), None, Some("a".to_string())]
    );
    assert_eq!(store.load()["a"].count, 2);
}
