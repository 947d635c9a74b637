use log::debug;

use crate::action::{Action, Field, Payload};
use crate::error::{Error, Result};
use crate::vault::Vault;

fn fetch_field<V: Vault + ?Sized>(vault: &V, field: Field, id: &str) -> Result<String> {
    match field {
        Field::Password => vault
            .password(id)
            .map_err(|e| Error::CredentialFetchFailure(e.tool_message())),
        Field::Username => vault
            .username(id)
            .map_err(|e| Error::CredentialFetchFailure(e.tool_message())),
        Field::Totp => vault.totp(id).map_err(classify_totp_failure),
    }
}

/// A failed `code` call means "no TOTP" when the tool says so, or when it exits
/// without saying anything. Any other message is a regular fetch failure.
fn classify_totp_failure(error: Error) -> Error {
    let missing_secret = match &error {
        Error::NoTotpConfigured(_) => true,
        Error::SubProcessExit { stderr, .. } => {
            stderr.is_empty() || stderr.to_lowercase().contains("totp")
        }
        _ => false,
    };

    match error {
        Error::NoTotpConfigured(_) => error,
        other if missing_secret => Error::NoTotpConfigured(other.tool_message()),
        other => Error::CredentialFetchFailure(other.tool_message()),
    }
}

/// Fetches every field `action` needs for entry `id`.
///
/// # Errors
///
/// Returns [`Error::NoTotpConfigured`] when a TOTP was requested for an entry
/// without one, and [`Error::CredentialFetchFailure`] for any other failed call.
/// Both carry the vault's own error text.
/// The first failure aborts the fetch.
pub fn fetch_credentials<V: Vault + ?Sized>(vault: &V, action: Action, id: &str) -> Result<Payload> {
    let mut payload = Payload::new(action, id);

    for &field in action.required_fields() {
        debug!("Fetching {field:?} for `{id}`");
        payload.set(field, fetch_field(vault, field, id)?);
    }

    Ok(payload)
}
