//! Authors file registry
//!
//! Parses the `.git-authors` YAML file and resolves initials to full
//! identities. File structure:
//!
//! ```yaml
//! pairs:
//!   jd: Jane Doe; jane
//!   fb: Frances Bar
//! email:
//!   domain: example.com
//! email_addresses:
//!   fb: frances@elsewhere.org
//! ```
//!
//! The top-level key `authors:` is accepted as a legacy alias for
//! `pairs:` and normalized before deserialization.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::email;
use crate::error::{Error, Result};

/// A single identity resolved from the authors file.
///
/// `email` is derived via the precedence chain in [`crate::email`] and may
/// be empty when no rule produced an address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Pair {
    /// Lookup key in the authors file.
    pub initials: String,
    /// Display name.
    pub name: String,
    /// Derived email address, possibly empty.
    pub email: String,
    /// Username from the entry, when the entry carries one.
    pub username: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct AuthorsFile {
    #[serde(default)]
    pairs: HashMap<String, String>,
    #[serde(default)]
    email: EmailSection,
    #[serde(default)]
    email_addresses: HashMap<String, String>,
    #[serde(default)]
    email_template: String,
}

#[derive(Debug, Deserialize, Default)]
struct EmailSection {
    #[serde(default)]
    domain: String,
}

/// The authors file plus the email-derivation policy around it.
///
/// Loaded once per invocation and read-only thereafter.
#[derive(Debug)]
pub struct Registry {
    file: AuthorsFile,
    email_lookup: Option<String>,
}

impl Registry {
    /// Parse the authors file at `path`.
    ///
    /// `email_lookup` is an external command consulted first when
    /// deriving emails (see [`crate::email`]). A missing or unparseable
    /// file is a fatal [`Error::RegistryLoad`].
    pub fn from_file(path: &Path, email_lookup: Option<String>) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| Error::RegistryLoad {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        Self::from_contents(&contents, email_lookup).map_err(|e| Error::RegistryLoad {
            path: path.to_path_buf(),
            reason: e,
        })
    }

    fn from_contents(
        contents: &str,
        email_lookup: Option<String>,
    ) -> std::result::Result<Self, String> {
        // Legacy files use `authors:` as the top-level map key
        let legacy_key = Regex::new(r"(?m)^authors:").expect("static regex");
        let normalized = legacy_key.replace(contents, "pairs:");

        let file: AuthorsFile =
            serde_yaml::from_str(&normalized).map_err(|e| e.to_string())?;

        debug!(pairs = file.pairs.len(), "loaded authors file");

        Ok(Self { file, email_lookup })
    }

    /// Resolve initials to a full identity.
    ///
    /// The email is the first non-empty result of:
    /// - the external lookup command, when configured
    /// - the `email_addresses` map
    /// - `{username}@{domain}` when the entry carries a username
    /// - an address synthesized from the name and domain
    pub fn by_initials(&self, initials: &str) -> Result<Pair> {
        let raw = self
            .file
            .pairs
            .get(initials)
            .ok_or_else(|| Error::UnknownInitials(initials.to_string()))?;

        let (name, username) = match raw.split_once(';') {
            Some((name, username)) => (name.trim(), Some(username.trim())),
            None => (raw.trim(), None),
        };
        let username = username.filter(|u| !u.is_empty());

        let email = email::resolve(
            &email::Policy {
                lookup_command: self.email_lookup.as_deref(),
                overrides: &self.file.email_addresses,
                domain: &self.file.email.domain,
            },
            initials,
            name,
            username.unwrap_or(""),
        )?;

        Ok(Pair {
            initials: initials.to_string(),
            name: name.to_string(),
            email,
            username: username.map(str::to_string),
        })
    }

    /// The reserved `email_template` field, when the file sets one.
    ///
    /// Parsed for forward compatibility; no derivation rule consumes it.
    pub fn email_template(&self) -> Option<&str> {
        if self.file.email_template.is_empty() {
            None
        } else {
            Some(&self.file.email_template)
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    const AUTHORS: &str = "\
pairs:
  jd: Jane Doe; jane
  fb: Frances Bar
  zp: Zubaz
email:
  domain: hamster.info
email_addresses:
  fb: frances@elsewhere.org
";

    fn registry(contents: &str) -> Registry {
        Registry::from_contents(contents, None).unwrap()
    }

    #[test]
    fn test_name_and_username_split_on_semicolon() {
        let pair = registry(AUTHORS).by_initials("jd").unwrap();
        assert_eq!(pair.name, "Jane Doe");
        assert_eq!(pair.username.as_deref(), Some("jane"));
    }

    #[test]
    fn test_entry_without_username() {
        let pair = registry(AUTHORS).by_initials("fb").unwrap();
        assert_eq!(pair.name, "Frances Bar");
        assert_eq!(pair.username, None);
    }

    #[test]
    fn test_unknown_initials() {
        let err = registry(AUTHORS).by_initials("zz").unwrap_err();
        assert!(matches!(err, Error::UnknownInitials(ref i) if i == "zz"));
    }

    #[test]
    fn test_email_from_username_and_domain() {
        let pair = registry(AUTHORS).by_initials("jd").unwrap();
        assert_eq!(pair.email, "jane@hamster.info");
    }

    #[test]
    fn test_email_override_beats_synthesis() {
        let pair = registry(AUTHORS).by_initials("fb").unwrap();
        assert_eq!(pair.email, "frances@elsewhere.org");
    }

    #[test]
    fn test_email_from_single_name() {
        let pair = registry(AUTHORS).by_initials("zp").unwrap();
        assert_eq!(pair.email, "zubaz@hamster.info");
    }

    #[test]
    fn test_legacy_authors_key() {
        let legacy = AUTHORS.replacen("pairs:", "authors:", 1);
        let pair = registry(&legacy).by_initials("jd").unwrap();
        assert_eq!(pair.name, "Jane Doe");
    }

    #[test]
    fn test_email_template_reserved() {
        let contents = format!("{AUTHORS}email_template: '{{initials}}@x.test'\n");
        let reg = registry(&contents);
        assert_eq!(reg.email_template(), Some("{initials}@x.test"));
        assert_eq!(registry(AUTHORS).email_template(), None);
    }

    #[test]
    fn test_unparseable_file_is_fatal() {
        let err = Registry::from_file(Path::new("/nonexistent/.git-authors"), None).unwrap_err();
        assert!(matches!(err, Error::RegistryLoad { .. }));
    }
}
