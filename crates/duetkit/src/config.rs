//! Environment-derived configuration
//!
//! Every `git-duet` binary starts by reading the same `GIT_DUET_*`
//! environment variables. Parsing failures are fatal; a typo'd cutoff or
//! boolean never silently falls back to a default.

use std::env;
use std::path::{Path, PathBuf};
use std::process::Command;

use chrono::TimeDelta;
use tracing::debug;

use crate::error::{Error, Result};
use crate::store::DEFAULT_NAMESPACE;

const AUTHORS_FILE_NAME: &str = ".git-authors";

/// Shared configuration for all duetkit commands, read from the
/// environment.
#[derive(Debug, Clone)]
pub struct Configuration {
    /// git config section holding the pair state.
    pub namespace: String,
    /// Path to the authors file.
    pub pairs_file: PathBuf,
    /// External email lookup command, if any.
    pub email_lookup: Option<String>,
    /// Pin all reads and writes to the global scope.
    pub global: bool,
    /// Age past which pair state counts as stale.
    pub stale_cutoff: TimeDelta,
    /// Rotate the author after each wrapped commit.
    pub rotate_author: bool,
    /// Record extra members as `Co-authored-by:` trailers.
    pub co_authored_by: bool,
    /// Mirror the author into `user.name` / `user.email`.
    pub set_user_config: bool,
}

impl Configuration {
    /// Read configuration from the environment.
    pub fn from_env() -> Result<Self> {
        let namespace = getenv_default("GIT_DUET_CONFIG_NAMESPACE", DEFAULT_NAMESPACE);
        let email_lookup = env::var("GIT_DUET_EMAIL_LOOKUP_COMMAND")
            .ok()
            .filter(|v| !v.is_empty());

        let cutoff_seconds: i64 = getenv_default("GIT_DUET_SECONDS_AGO_STALE", "1200")
            .parse()
            .map_err(|_| {
                Error::Config("GIT_DUET_SECONDS_AGO_STALE must be an integer".to_string())
            })?;

        let global = env_bool("GIT_DUET_GLOBAL", false)?;
        let rotate_author = env_bool("GIT_DUET_ROTATE_AUTHOR", false)?;
        let co_authored_by = env_bool("GIT_DUET_CO_AUTHORED_BY", false)?;
        // Trailer mode needs the real committer in user.*, so it flips
        // the mirror default on
        let set_user_config = env_bool("GIT_DUET_SET_GIT_USER_CONFIG", co_authored_by)?;

        Ok(Self {
            namespace,
            pairs_file: discover_pairs_file()?,
            email_lookup,
            global,
            stale_cutoff: TimeDelta::seconds(cutoff_seconds),
            rotate_author,
            co_authored_by,
            set_user_config,
        })
    }
}

fn getenv_default(key: &str, default: &str) -> String {
    match env::var(key) {
        Ok(value) if !value.is_empty() => value,
        _ => default.to_string(),
    }
}

/// Parse a boolean environment variable. Accepts `1/0`, `t/f`,
/// `true/false` in any case; anything else is a fatal configuration
/// error.
fn env_bool(key: &str, default: bool) -> Result<bool> {
    let raw = match env::var(key) {
        Ok(value) if !value.is_empty() => value,
        _ => return Ok(default),
    };

    match raw.to_lowercase().as_str() {
        "1" | "t" | "true" => Ok(true),
        "0" | "f" | "false" => Ok(false),
        _ => Err(Error::Config(format!("{key} must be a boolean, got '{raw}'"))),
    }
}

/// Locate the authors file.
///
/// `GIT_DUET_AUTHORS_FILE` wins when set. Otherwise a `.git-authors` at
/// the repository toplevel is used when one exists, falling back to
/// `$HOME/.git-authors`.
fn discover_pairs_file() -> Result<PathBuf> {
    if let Ok(path) = env::var("GIT_DUET_AUTHORS_FILE") {
        if !path.is_empty() {
            return Ok(PathBuf::from(path));
        }
    }

    let home_authors = Path::new(&env::var("HOME").unwrap_or_default()).join(AUTHORS_FILE_NAME);

    let output = match Command::new("git")
        .args(["rev-parse", "--show-toplevel"])
        .output()
    {
        Ok(output) => output,
        // git missing entirely; the home file is still usable
        Err(_) => return Ok(home_authors),
    };

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).to_lowercase();
        if stderr.contains("not a git repository") {
            return Ok(home_authors);
        }
        return Err(Error::GitConfig(format!(
            "git rev-parse --show-toplevel: {}",
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }

    let toplevel = String::from_utf8_lossy(&output.stdout).trim().to_string();
    let repo_authors = Path::new(&toplevel).join(AUTHORS_FILE_NAME);
    if repo_authors.exists() {
        debug!(path = %repo_authors.display(), "using repository authors file");
        return Ok(repo_authors);
    }

    Ok(home_authors)
}

#[cfg(test)]
mod tests {
    use serial_test::serial;

    use super::*;

    fn clear_duet_env() {
        for key in [
            "GIT_DUET_CONFIG_NAMESPACE",
            "GIT_DUET_AUTHORS_FILE",
            "GIT_DUET_EMAIL_LOOKUP_COMMAND",
            "GIT_DUET_GLOBAL",
            "GIT_DUET_SECONDS_AGO_STALE",
            "GIT_DUET_ROTATE_AUTHOR",
            "GIT_DUET_CO_AUTHORED_BY",
            "GIT_DUET_SET_GIT_USER_CONFIG",
        ] {
            env::remove_var(key);
        }
    }

    #[test]
    #[serial]
    fn test_defaults() {
        clear_duet_env();
        env::set_var("GIT_DUET_AUTHORS_FILE", "/tmp/.git-authors");

        let config = Configuration::from_env().unwrap();
        assert_eq!(config.namespace, "duet.env");
        assert_eq!(config.stale_cutoff, TimeDelta::seconds(1200));
        assert!(!config.global);
        assert!(!config.rotate_author);
        assert!(!config.co_authored_by);
        assert!(!config.set_user_config);
        assert_eq!(config.email_lookup, None);
    }

    #[test]
    #[serial]
    fn test_overrides() {
        clear_duet_env();
        env::set_var("GIT_DUET_AUTHORS_FILE", "/tmp/.authors");
        env::set_var("GIT_DUET_CONFIG_NAMESPACE", "mob.env");
        env::set_var("GIT_DUET_SECONDS_AGO_STALE", "60");
        env::set_var("GIT_DUET_GLOBAL", "1");
        env::set_var("GIT_DUET_ROTATE_AUTHOR", "true");

        let config = Configuration::from_env().unwrap();
        assert_eq!(config.namespace, "mob.env");
        assert_eq!(config.pairs_file, PathBuf::from("/tmp/.authors"));
        assert_eq!(config.stale_cutoff, TimeDelta::seconds(60));
        assert!(config.global);
        assert!(config.rotate_author);

        clear_duet_env();
    }

    #[test]
    #[serial]
    fn test_co_authored_by_implies_user_config_mirror() {
        clear_duet_env();
        env::set_var("GIT_DUET_AUTHORS_FILE", "/tmp/.authors");
        env::set_var("GIT_DUET_CO_AUTHORED_BY", "1");

        let config = Configuration::from_env().unwrap();
        assert!(config.co_authored_by);
        assert!(config.set_user_config);

        // An explicit override still wins
        env::set_var("GIT_DUET_SET_GIT_USER_CONFIG", "0");
        let config = Configuration::from_env().unwrap();
        assert!(!config.set_user_config);

        clear_duet_env();
    }

    #[test]
    #[serial]
    fn test_bad_cutoff_is_fatal() {
        clear_duet_env();
        env::set_var("GIT_DUET_AUTHORS_FILE", "/tmp/.authors");
        env::set_var("GIT_DUET_SECONDS_AGO_STALE", "soon");

        let err = Configuration::from_env().unwrap_err();
        assert!(matches!(err, Error::Config(_)));

        clear_duet_env();
    }

    #[test]
    #[serial]
    fn test_bad_boolean_is_fatal() {
        clear_duet_env();
        env::set_var("GIT_DUET_AUTHORS_FILE", "/tmp/.authors");
        env::set_var("GIT_DUET_GLOBAL", "yes please");

        let err = Configuration::from_env().unwrap_err();
        assert!(matches!(err, Error::Config(_)));

        clear_duet_env();
    }
}
