//! Backend trait definitions

use crate::error::Result;

/// Which git configuration file a read or write targets.
///
/// `Default` carries git's own semantics: reads merge local over global
/// (first found wins) and writes land in the local repository config.
/// `Local` and `Global` pin both directions to one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Scope {
    /// No scope flag; git resolves reads local-then-global, writes local.
    #[default]
    Default,
    /// Repository config (`--local`).
    Local,
    /// User config (`--global`).
    Global,
}

impl Scope {
    /// The `git config` flag for this scope, if any.
    pub fn flag(self) -> Option<&'static str> {
        match self {
            Self::Default => None,
            Self::Local => Some("--local"),
            Self::Global => Some("--global"),
        }
    }
}

/// Key/value configuration backend.
///
/// All backend implementations must implement this trait. Keys are full
/// dotted git-config keys (e.g. `duet.env.git-author-name`); namespacing
/// is the caller's concern.
pub trait ConfigBackend: Send + Sync {
    /// Read a key. Returns `Ok(None)` when the key is not set in the
    /// given scope; any other backend failure is an error.
    fn get(&self, scope: Scope, key: &str) -> Result<Option<String>>;

    /// Write a key, creating it if absent.
    fn set(&self, scope: Scope, key: &str, value: &str) -> Result<()>;

    /// Remove all values for a key. Removing a key that does not exist
    /// succeeds.
    fn unset_all(&self, scope: Scope, key: &str) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_flags() {
        assert_eq!(Scope::Default.flag(), None);
        assert_eq!(Scope::Local.flag(), Some("--local"));
        assert_eq!(Scope::Global.flag(), Some("--global"));
    }
}
