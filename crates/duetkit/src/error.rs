//! Error types for Duetkit
//!
//! This module provides error types for the pair-state engine with the
//! following design goals:
//! - Human-readable error messages for users
//! - Clear categorization for programmatic handling
//! - A stable exit-code mapping that wrapper scripts can branch on

use std::path::PathBuf;

use thiserror::Error;

/// Exit code reserved for unknown-initials lookups so wrapper scripts can
/// tell "bad initials" apart from generic failure.
pub const UNKNOWN_INITIALS_EXIT_CODE: i32 = 86;

/// Result type alias using Duetkit's Error.
pub type Result<T> = std::result::Result<T, Error>;

/// Duetkit error types.
///
/// All errors bubble to the binary boundary; there are no retries in the
/// core. "Nothing configured yet" is not an error and is modeled as
/// `Ok(None)` on the read paths instead.
#[derive(Error, Debug)]
pub enum Error {
    /// Environment-derived configuration could not be parsed.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// The authors file is missing or unparseable.
    #[error("cannot load authors file {path}: {reason}")]
    RegistryLoad { path: PathBuf, reason: String },

    /// Initials are not a key in the authors file.
    #[error("unknown initials {0}")]
    UnknownInitials(String),

    /// The external email lookup command failed.
    #[error("email lookup command failed: {0}")]
    EmailLookup(String),

    /// `git config` failed in a way the backend does not tolerate.
    #[error("git config failed: {0}")]
    GitConfig(String),

    /// No scope has an author configured.
    #[error("git-author not set")]
    AuthorNotConfigured,

    /// I/O error from filesystem or subprocess plumbing.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Exit code a binary should terminate with for this error.
    ///
    /// Unknown initials get the reserved code 86; everything else is a
    /// generic failure.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::UnknownInitials(_) => UNKNOWN_INITIALS_EXIT_CODE,
            _ => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_initials_exit_code_is_reserved() {
        let err = Error::UnknownInitials("zz".to_string());
        assert_eq!(err.exit_code(), 86);
    }

    #[test]
    fn test_other_errors_exit_one() {
        let err = Error::AuthorNotConfigured;
        assert_eq!(err.exit_code(), 1);
        let err = Error::Config("GIT_DUET_GLOBAL must be 0 or 1".to_string());
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_registry_load_message_names_path() {
        let err = Error::RegistryLoad {
            path: PathBuf::from("/home/user/.git-authors"),
            reason: "No such file or directory".to_string(),
        };
        assert!(err.to_string().contains(".git-authors"));
    }
}
