//! Finder keys, the credential fields they need and the resulting payload.

use std::fmt::{Display, Formatter};

use serde::Serialize;

/// The key pressed to accept a selection.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Paste the password
    #[serde(rename = "enter")]
    Accept,
    /// Paste the username
    #[serde(rename = "ctrl-u")]
    PasteUsername,
    /// Paste the username, a tab, then the password
    #[serde(rename = "ctrl-b")]
    PasteUsernameAndPassword,
    #[serde(rename = "ctrl-t")]
    CopyTotp,
    #[serde(rename = "alt-p")]
    CopyPassword,
    #[serde(rename = "alt-u")]
    CopyUsername,
    /// Sync the vault and list it again
    #[serde(rename = "alt-s")]
    Sync,
}

/// A credential field fetched from the vault.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Password,
    Username,
    Totp,
}

impl Action {
    pub const ALL: [Action; 7] = [
        Action::Accept,
        Action::PasteUsername,
        Action::PasteUsernameAndPassword,
        Action::CopyTotp,
        Action::CopyPassword,
        Action::CopyUsername,
        Action::Sync,
    ];

    pub fn token(self) -> &'static str {
        match self {
            Action::Accept => "enter",
            Action::PasteUsername => "ctrl-u",
            Action::PasteUsernameAndPassword => "ctrl-b",
            Action::CopyTotp => "ctrl-t",
            Action::CopyPassword => "alt-p",
            Action::CopyUsername => "alt-u",
            Action::Sync => "alt-s",
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|action| action.token() == token)
    }

    /// The fields to fetch, in fetch order. Sync needs none.
    pub fn required_fields(self) -> &'static [Field] {
        match self {
            Action::Accept | Action::CopyPassword => &[Field::Password],
            Action::PasteUsername | Action::CopyUsername => &[Field::Username],
            Action::PasteUsernameAndPassword => &[Field::Password, Field::Username],
            Action::CopyTotp => &[Field::Totp],
            Action::Sync => &[],
        }
    }

    /// Comma separated tokens for the finder's expected keys.
    pub fn expected_keys() -> String {
        Self::ALL.map(Action::token).join(",")
    }
}

impl Display for Action {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.token())
    }
}

/// The result of a completed selection, handed to the host terminal.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Payload {
    pub action: Action,
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub totp: Option<String>,
}

/// How the host terminal should deliver a payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    /// Paste into the target window
    Paste(String),
    /// Write to the system clipboard
    Clipboard(String),
}

impl Delivery {
    pub fn text(&self) -> &str {
        match self {
            Delivery::Paste(text) | Delivery::Clipboard(text) => text,
        }
    }
}

impl Payload {
    pub fn new(action: Action, id: impl Into<String>) -> Self {
        Self {
            action,
            id: id.into(),
            password: None,
            username: None,
            totp: None,
        }
    }

    pub fn set(&mut self, field: Field, value: String) {
        match field {
            Field::Password => self.password = Some(value),
            Field::Username => self.username = Some(value),
            Field::Totp => self.totp = Some(value),
        }
    }

    /// The delivery for this payload, or `None` for sync.
    pub fn delivery(&self) -> Option<Delivery> {
        let password = self.password.clone().unwrap_or_default();
        let username = self.username.clone().unwrap_or_default();

        match self.action {
            Action::Accept => Some(Delivery::Paste(password)),
            Action::PasteUsername => Some(Delivery::Paste(username)),
            Action::PasteUsernameAndPassword => {
                Some(Delivery::Paste(format!("{username}\t{password}")))
            }
            Action::CopyTotp => Some(Delivery::Clipboard(self.totp.clone().unwrap_or_default())),
            Action::CopyPassword => Some(Delivery::Clipboard(password)),
            Action::CopyUsername => Some(Delivery::Clipboard(username)),
            Action::Sync => None,
        }
    }
}
