//! Email derivation
//!
//! Builds an email address for a pair from the authors-file policy. The
//! precedence is a strict contract: an explicit override must never be
//! shadowed by synthesis, and the external lookup is always consulted
//! first when configured, even if other data is available.

use std::collections::HashMap;
use std::process::Command;

use tracing::debug;

use crate::error::{Error, Result};

/// Email-derivation inputs taken from the authors file.
pub(crate) struct Policy<'a> {
    /// External lookup command, consulted before anything else.
    pub lookup_command: Option<&'a str>,
    /// Explicit per-initials overrides (`email_addresses`).
    pub overrides: &'a HashMap<String, String>,
    /// Domain used to synthesize addresses.
    pub domain: &'a str,
}

/// Derive an email address, first non-empty rule wins:
///
/// 1. external lookup command output
/// 2. explicit override for the initials
/// 3. `{username}@{domain}`
/// 4. address synthesized from the name and domain
///
/// Returns an empty string when no rule applies; the caller treats that
/// as "undetermined", not an error.
pub(crate) fn resolve(
    policy: &Policy<'_>,
    initials: &str,
    name: &str,
    username: &str,
) -> Result<String> {
    if let Some(command) = policy.lookup_command {
        let email = run_lookup(command, initials, name, username)?;
        if !email.is_empty() {
            return Ok(email);
        }
    }

    if let Some(email) = policy.overrides.get(initials) {
        return Ok(email.clone());
    }

    if !username.is_empty() {
        return Ok(format!("{}@{}", username.trim(), policy.domain));
    }

    Ok(from_name(name, policy.domain))
}

/// Invoke the external lookup as `<command> <initials> <name> <username>`
/// and return its trimmed stdout. A non-zero exit is fatal.
fn run_lookup(command: &str, initials: &str, name: &str, username: &str) -> Result<String> {
    debug!(command, initials, "running email lookup");

    let output = Command::new(command)
        .args([initials, name, username])
        .output()
        .map_err(|e| Error::EmailLookup(format!("cannot invoke {command}: {e}")))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let detail = stderr.trim();
        return Err(Error::EmailLookup(if detail.is_empty() {
            format!("{command} exited with {}", output.status)
        } else {
            format!("{command}: {detail}")
        }));
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// Synthesize an address from a display name.
///
/// Two name tokens give `{first initial}.{last}@{domain}`, a single token
/// gives `{token}@{domain}`, both lowercased. An empty name yields an
/// empty string (email undetermined).
fn from_name(name: &str, domain: &str) -> String {
    let mut tokens = name.trim().splitn(2, ' ');
    let first = tokens.next().unwrap_or("").trim().to_lowercase();
    if first.is_empty() {
        return String::new();
    }

    match tokens.next() {
        Some(last) => {
            let initial = first.chars().next().map(String::from).unwrap_or_default();
            format!("{}.{}@{}", initial, last.trim().to_lowercase(), domain)
        }
        None => format!("{first}@{domain}"),
    }
}
