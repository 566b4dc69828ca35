//! # Dial Request Model
//!
//! Caller-supplied configuration for one dial attempt. A request is built
//! up front and handed to the engine by value; nothing mutates it once the
//! attempt starts.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Credentials for the remote entry.
///
/// The secret never appears in `Debug` output; requests get logged.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Everything the engine needs to run one attempt.
#[derive(Debug, Clone)]
pub struct DialRequest {
    /// Name of the phonebook entry to dial.
    pub entry_name: String,
    /// Phonebook to look the entry up in; `None` means the backend default.
    pub phonebook: Option<PathBuf>,
    pub credentials: Credentials,
    /// Upper bound on the whole attempt; `None` waits on the native layer
    /// indefinitely.
    pub timeout: Option<Duration>,
}

impl DialRequest {
    pub fn new(entry_name: impl Into<String>, credentials: Credentials) -> Self {
        Self {
            entry_name: entry_name.into(),
            phonebook: None,
            credentials,
            timeout: None,
        }
    }

    pub fn with_phonebook(mut self, path: PathBuf) -> Self {
        self.phonebook = Some(path);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_output_redacts_password() {
        let creds = Credentials::new("alice", "hunter2");
        let printed = format!("{creds:?}");
        assert!(printed.contains("alice"));
        assert!(!printed.contains("hunter2"));
        assert!(printed.contains("<redacted>"));
    }
}
