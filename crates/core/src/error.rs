use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("The sub process `{}` exited with non-success code: {}", .program, .stderr)]
    SubProcessExit { program: String, stderr: String },

    #[error("Error with sub process process: {}", _0)]
    SubProcess(#[from] std::io::Error),

    #[error("Error {} {} file at `{}`: {}", .action, .file_description, .path, .original)]
    Yaml {
        action: String,
        file_description: String,
        path: String,
        original: serde_yaml::Error,
    },

    #[error("Error {} {} file at `{}`: {}", .action, .file_description, .path, .original)]
    Json {
        action: String,
        file_description: String,
        path: String,
        original: serde_json::Error,
    },

    #[error("IO error with {} file at path `{}`: {}", .file_description, .path, .original)]
    Io {
        file_description: String,
        path: String,
        original: std::io::Error,
    },

    #[error("STDIO error: {}", .0)]
    Stdio(std::io::Error),

    #[error("Error listing vault entries: {}", .0)]
    ListingFailure(String),

    #[error("Finder `{}` was not found in PATH.", .0)]
    FinderUnavailable(String),

    #[error("Error syncing vault: {}", .0)]
    SyncFailure(String),

    #[error("Error fetching credentials: {}", .0)]
    CredentialFetchFailure(String),

    #[error("This entry has no TOTP configured: {}", .0)]
    NoTotpConfigured(String),

    #[error("The vault is empty or locked.")]
    EmptyVault,

    #[error("There are no entries in folder `{}`.", .0)]
    EmptyFolder(String),
}

impl Error {
    pub fn sub_process_exit(program: impl Into<String>, stderr: &[u8]) -> Self {
        Self::SubProcessExit {
            program: program.into(),
            stderr: String::from_utf8_lossy(stderr).trim().to_string(),
        }
    }

    pub fn yaml_error(
        action: String,
        file_description: String,
        path: String,
        original: serde_yaml::Error,
    ) -> Self {
        Self::Yaml {
            action,
            file_description,
            path,
            original,
        }
    }

    pub fn json_error(
        action: String,
        file_description: String,
        path: String,
        original: serde_json::Error,
    ) -> Self {
        Self::Json {
            action,
            file_description,
            path,
            original,
        }
    }

    pub fn io_error(file_description: String, path: String, original: std::io::Error) -> Self {
        Self::Io {
            file_description,
            path,
            original,
        }
    }

    /// The text shown to the user for a failed tool call: the tool's own
    /// stderr when it produced any, otherwise the full error.
    pub fn tool_message(&self) -> String {
        match self {
            Self::SubProcessExit { stderr, .. } if !stderr.is_empty() => stderr.clone(),
            other => other.to_string(),
        }
    }

    /// Whether this error ends the selection session instead of returning to the list.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::ListingFailure(_)
                | Self::FinderUnavailable(_)
                | Self::EmptyVault
                | Self::EmptyFolder(_)
        )
    }
}
