//! In-memory backend implementation
//!
//! Mirrors git's scope semantics closely enough for the store tests:
//! `Default` reads fall through local-then-global and `Default` writes
//! land in the local map, matching what `git config` does without a
//! scope flag inside a repository.

use std::collections::HashMap;
use std::sync::RwLock;

use super::traits::{ConfigBackend, Scope};
use crate::error::Result;

/// In-memory configuration backend.
///
/// Stores local and global scopes as two separate maps.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    local: RwLock<HashMap<String, String>>,
    global: RwLock<HashMap<String, String>>,
}

impl MemoryBackend {
    /// Create a new empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    fn map(&self, scope: Scope) -> &RwLock<HashMap<String, String>> {
        match scope {
            Scope::Global => &self.global,
            // Default writes go local, same as flagless `git config`
            Scope::Default | Scope::Local => &self.local,
        }
    }

    fn read_one(&self, scope: Scope, key: &str) -> Option<String> {
        self.map(scope)
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(key)
            .cloned()
    }
}

impl ConfigBackend for MemoryBackend {
    fn get(&self, scope: Scope, key: &str) -> Result<Option<String>> {
        let value = match scope {
            Scope::Default => self
                .read_one(Scope::Local, key)
                .or_else(|| self.read_one(Scope::Global, key)),
            scope => self.read_one(scope, key),
        };
        Ok(value)
    }

    fn set(&self, scope: Scope, key: &str, value: &str) -> Result<()> {
        self.map(scope)
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn unset_all(&self, scope: Scope, key: &str) -> Result<()> {
        self.map(scope)
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .remove(key);
        Ok(())
    }
}
