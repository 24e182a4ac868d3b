//! `git config` backend
//!
//! Shells out to the `git` binary. Two non-zero exits are expected in
//! normal operation and swallowed; the predicates below keep that set
//! explicit:
//! - reading an absent key exits 1 (`Ok(None)`)
//! - unsetting an absent key exits 5 (`Ok(())`)
//!
//! Every other non-zero exit is a fatal `Error::GitConfig`.

use std::process::Command;

use tracing::debug;

use super::traits::{ConfigBackend, Scope};
use crate::error::{Error, Result};

/// Exit status `git config <key>` uses for a key that is not set.
fn is_key_missing_exit(code: i32) -> bool {
    code == 1
}

/// Exit status `git config --unset-all <key>` uses for a key that is not
/// set.
fn is_unset_missing_exit(code: i32) -> bool {
    code == 5
}

/// Backend that persists keys via the `git config` command.
#[derive(Debug, Clone, Default)]
pub struct GitBackend;

impl GitBackend {
    /// Create a new git-config backend.
    pub fn new() -> Self {
        Self
    }

    fn command(scope: Scope, args: &[&str]) -> Command {
        let mut cmd = Command::new("git");
        cmd.arg("config");
        if let Some(flag) = scope.flag() {
            cmd.arg(flag);
        }
        cmd.args(args);
        cmd
    }

    fn run(mut cmd: Command, context: &str) -> Result<std::process::Output> {
        debug!(?cmd, "running git config");
        cmd.output().map_err(|e| {
            Error::GitConfig(format!("cannot invoke git for {context}: {e}"))
        })
    }

    fn failure(context: &str, output: &std::process::Output) -> Error {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let detail = stderr.trim();
        if detail.is_empty() {
            Error::GitConfig(format!("{context} exited with {}", output.status))
        } else {
            Error::GitConfig(format!("{context}: {detail}"))
        }
    }
}

impl ConfigBackend for GitBackend {
    fn get(&self, scope: Scope, key: &str) -> Result<Option<String>> {
        let output = Self::run(Self::command(scope, &[key]), key)?;

        match output.status.code() {
            Some(0) => {
                let value = String::from_utf8_lossy(&output.stdout).trim().to_string();
                Ok(Some(value))
            }
            Some(code) if is_key_missing_exit(code) => Ok(None),
            _ => Err(Self::failure(key, &output)),
        }
    }

    fn set(&self, scope: Scope, key: &str, value: &str) -> Result<()> {
        let output = Self::run(Self::command(scope, &[key, value]), key)?;

        if output.status.success() {
            Ok(())
        } else {
            Err(Self::failure(key, &output))
        }
    }

    fn unset_all(&self, scope: Scope, key: &str) -> Result<()> {
        let output = Self::run(Self::command(scope, &["--unset-all", key]), key)?;

        match output.status.code() {
            Some(0) => Ok(()),
            Some(code) if is_unset_missing_exit(code) => Ok(()),
            _ => Err(Self::failure(key, &output)),
        }
    }
}
