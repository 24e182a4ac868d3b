//! Pair-state store
//!
//! Reads and writes the "current author/committers" state as namespaced
//! git config keys. Committer sub-fields are stored as three parallel
//! delimited lists (initials, names, emails) that stay index-aligned;
//! the delimiter is an encoding detail of this module and never escapes
//! it, so callers only ever see `Vec<Pair>`.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::backend::{ConfigBackend, Scope};
use crate::error::{Error, Result};
use crate::pairs::Pair;
use crate::rotate;

/// Default git config section for pair state.
pub const DEFAULT_NAMESPACE: &str = "duet.env";

/// Delimiter between members in the committer list values.
const DELIM: &str = ", ";

const AUTHOR_INITIALS: &str = "git-author-initials";
const AUTHOR_NAME: &str = "git-author-name";
const AUTHOR_EMAIL: &str = "git-author-email";
const COMMITTER_INITIALS: &str = "git-committer-initials";
const COMMITTER_NAME: &str = "git-committer-name";
const COMMITTER_EMAIL: &str = "git-committer-email";
const MTIME: &str = "mtime";

/// Namespaced, scoped view of the pair state in a configuration backend.
///
/// Reads and writes go through the injected [`ConfigBackend`], so tests
/// run against [`crate::backend::MemoryBackend`] while the binaries use
/// [`crate::backend::GitBackend`].
#[derive(Clone)]
pub struct PairStore {
    backend: Arc<dyn ConfigBackend>,
    namespace: String,
    scope: Scope,
    mirror_user_config: bool,
}

impl std::fmt::Debug for PairStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PairStore")
            .field("namespace", &self.namespace)
            .field("scope", &self.scope)
            .field("mirror_user_config", &self.mirror_user_config)
            .finish_non_exhaustive()
    }
}

impl PairStore {
    /// Create a store over `backend` for the given namespace and scope.
    pub fn new(backend: Arc<dyn ConfigBackend>, namespace: impl Into<String>, scope: Scope) -> Self {
        Self {
            backend,
            namespace: namespace.into(),
            scope,
            mirror_user_config: false,
        }
    }

    /// Also mirror the author into the un-namespaced `user.name` /
    /// `user.email` keys on every author write.
    pub fn mirror_user_config(mut self, mirror: bool) -> Self {
        self.mirror_user_config = mirror;
        self
    }

    /// The scope this store reads and writes.
    pub fn scope(&self) -> Scope {
        self.scope
    }

    /// Find the scope that actually holds a configured author.
    ///
    /// Probes Local first, then Global, and returns a store pinned to the
    /// first scope whose author is present. Fails with
    /// [`Error::AuthorNotConfigured`] when neither has one.
    pub fn author_config(
        backend: Arc<dyn ConfigBackend>,
        namespace: &str,
        mirror_user_config: bool,
    ) -> Result<Self> {
        for scope in [Scope::Local, Scope::Global] {
            let store = Self::new(Arc::clone(&backend), namespace, scope)
                .mirror_user_config(mirror_user_config);
            if store.get_author()?.is_some() {
                return Ok(store);
            }
        }

        Err(Error::AuthorNotConfigured)
    }

    /// The currently configured author, or `None` when any sub-field is
    /// unset. A partially written author never surfaces.
    pub fn get_author(&self) -> Result<Option<Pair>> {
        let initials = self.get_key(AUTHOR_INITIALS)?;
        let name = self.get_key(AUTHOR_NAME)?;
        let email = self.get_key(AUTHOR_EMAIL)?;

        if initials.is_empty() || name.is_empty() || email.is_empty() {
            return Ok(None);
        }

        Ok(Some(Pair {
            initials,
            name,
            email,
            username: None,
        }))
    }

    /// The currently configured committers in order, or `None` when any
    /// of the three list values is unset.
    pub fn get_committers(&self) -> Result<Option<Vec<Pair>>> {
        let initials = self.get_key(COMMITTER_INITIALS)?;
        let names = self.get_key(COMMITTER_NAME)?;
        let emails = self.get_key(COMMITTER_EMAIL)?;

        if initials.is_empty() || names.is_empty() || emails.is_empty() {
            return Ok(None);
        }

        let initials: Vec<&str> = initials.split(DELIM).collect();
        let names: Vec<&str> = names.split(DELIM).collect();
        let emails: Vec<&str> = emails.split(DELIM).collect();

        if initials.len() != names.len() || names.len() != emails.len() {
            // Misaligned lists mean the state was edited by hand; treat
            // the role as unset rather than invent pairings
            warn!(
                namespace = %self.namespace,
                "committer lists are not index-aligned, treating as unset"
            );
            return Ok(None);
        }

        let committers = initials
            .into_iter()
            .zip(names)
            .zip(emails)
            .map(|((initials, name), email)| Pair {
                initials: initials.to_string(),
                name: name.to_string(),
                email: email.to_string(),
                username: None,
            })
            .collect();

        Ok(Some(committers))
    }

    /// Set the author and refresh the state mtime.
    pub fn set_author(&self, author: &Pair) -> Result<()> {
        self.write_author(author)?;
        self.update_mtime()
    }

    /// Set the committer list and refresh the state mtime.
    pub fn set_committers(&self, committers: &[Pair]) -> Result<()> {
        self.write_committers(committers)?;
        self.update_mtime()
    }

    /// Remove the author keys and refresh the state mtime.
    pub fn clear_author(&self) -> Result<()> {
        self.unset_key(AUTHOR_INITIALS)?;
        self.unset_key(AUTHOR_NAME)?;
        self.unset_key(AUTHOR_EMAIL)?;
        self.update_mtime()
    }

    /// Remove the committer keys and refresh the state mtime.
    pub fn clear_committer(&self) -> Result<()> {
        self.unset_key(COMMITTER_INITIALS)?;
        self.unset_key(COMMITTER_NAME)?;
        self.unset_key(COMMITTER_EMAIL)?;
        self.update_mtime()
    }

    /// When the state was last written, or `None` if never.
    pub fn get_mtime(&self) -> Result<Option<DateTime<Utc>>> {
        let raw = self.get_key(MTIME)?;
        if raw.is_empty() {
            return Ok(None);
        }

        let seconds: i64 = raw
            .parse()
            .map_err(|_| Error::GitConfig(format!("invalid mtime value '{raw}'")))?;
        DateTime::from_timestamp(seconds, 0)
            .map(Some)
            .ok_or_else(|| Error::GitConfig(format!("invalid mtime value '{raw}'")))
    }

    /// Move the front committer into the author slot.
    ///
    /// The old author goes to the back of the committer list; order is
    /// otherwise preserved. No-op when no committer is configured. On a
    /// `Default`-scoped store the rotated state is written into whichever
    /// scope actually holds the author, so rotation never populates an
    /// empty scope while reading from another.
    pub fn rotate_author(&self) -> Result<()> {
        let target = if self.scope == Scope::Default {
            Self::author_config(
                Arc::clone(&self.backend),
                &self.namespace,
                self.mirror_user_config,
            )?
        } else {
            self.clone()
        };

        let author = self.get_author()?;
        let committers = self.get_committers()?;

        let (Some(author), Some(committers)) = (author, committers) else {
            return Ok(());
        };
        if committers.is_empty() {
            return Ok(());
        }

        let (new_author, new_committers) = rotate::rotated(author, committers);
        debug!(author = %new_author.initials, "rotating author");

        target.write_author(&new_author)?;
        target.write_committers(&new_committers)
    }

    /// Write an un-namespaced git config key (e.g. `trailer.ifexists`).
    pub fn set_unnamespaced_key(&self, key: &str, value: &str) -> Result<()> {
        self.backend.set(self.scope, key, value)
    }

    fn write_author(&self, author: &Pair) -> Result<()> {
        if self.mirror_user_config {
            self.set_unnamespaced_key("user.name", &author.name)?;
            self.set_unnamespaced_key("user.email", &author.email)?;
        }
        self.set_key(AUTHOR_INITIALS, &author.initials)?;
        self.set_key(AUTHOR_NAME, &author.name)?;
        self.set_key(AUTHOR_EMAIL, &author.email)
    }

    fn write_committers(&self, committers: &[Pair]) -> Result<()> {
        let join = |field: fn(&Pair) -> &str| -> String {
            committers.iter().map(field).collect::<Vec<_>>().join(DELIM)
        };

        self.set_key(COMMITTER_INITIALS, &join(|p| &p.initials))?;
        self.set_key(COMMITTER_NAME, &join(|p| &p.name))?;
        self.set_key(COMMITTER_EMAIL, &join(|p| &p.email))
    }

    fn update_mtime(&self) -> Result<()> {
        self.set_key(MTIME, &Utc::now().timestamp().to_string())
    }

    fn key(&self, leaf: &str) -> String {
        format!("{}.{}", self.namespace, leaf)
    }

    fn get_key(&self, leaf: &str) -> Result<String> {
        Ok(self
            .backend
            .get(self.scope, &self.key(leaf))?
            .unwrap_or_default())
    }

    fn set_key(&self, leaf: &str, value: &str) -> Result<()> {
        self.backend.set(self.scope, &self.key(leaf), value)
    }

    fn unset_key(&self, leaf: &str) -> Result<()> {
        self.backend.unset_all(self.scope, &self.key(leaf))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::backend::MemoryBackend;

    fn pair(initials: &str, name: &str, email: &str) -> Pair {
        Pair {
            initials: initials.to_string(),
            name: name.to_string(),
            email: email.to_string(),
            username: None,
        }
    }

    fn store() -> PairStore {
        PairStore::new(Arc::new(MemoryBackend::new()), DEFAULT_NAMESPACE, Scope::Local)
    }

    #[test]
    fn test_author_read_after_write() {
        let store = store();
        let jane = pair("jd", "Jane Doe", "jane@example.com");

        store.set_author(&jane).unwrap();
        assert_eq!(store.get_author().unwrap(), Some(jane));
    }

    #[test]
    fn test_partial_author_is_absent() {
        let backend: Arc<dyn ConfigBackend> = Arc::new(MemoryBackend::new());
        let store = PairStore::new(Arc::clone(&backend), "duet.env", Scope::Local);

        store
            .set_author(&pair("jd", "Jane Doe", "jane@example.com"))
            .unwrap();
        backend
            .unset_all(Scope::Local, "duet.env.git-author-email")
            .unwrap();

        assert_eq!(store.get_author().unwrap(), None);
    }

    #[test]
    fn test_committers_round_trip_preserves_order() {
        let store = store();
        let committers = vec![
            pair("fb", "Frances Bar", "f.bar@example.com"),
            pair("zp", "Zubaz", "zubaz@example.com"),
            pair("jd", "Jane Doe", "jane@example.com"),
        ];

        store.set_committers(&committers).unwrap();
        assert_eq!(store.get_committers().unwrap(), Some(committers));
    }

    #[test]
    fn test_misaligned_committer_lists_are_unset() {
        let backend: Arc<dyn ConfigBackend> = Arc::new(MemoryBackend::new());
        let store = PairStore::new(Arc::clone(&backend), "duet.env", Scope::Local);

        store
            .set_committers(&[
                pair("fb", "Frances Bar", "f.bar@example.com"),
                pair("zp", "Zubaz", "zubaz@example.com"),
            ])
            .unwrap();
        backend
            .set(Scope::Local, "duet.env.git-committer-email", "only-one@example.com")
            .unwrap();

        assert_eq!(store.get_committers().unwrap(), None);
    }

    #[test]
    fn test_clear_committer_leaves_author() {
        let store = store();
        store
            .set_author(&pair("jd", "Jane Doe", "jane@example.com"))
            .unwrap();
        store
            .set_committers(&[pair("fb", "Frances Bar", "f.bar@example.com")])
            .unwrap();

        store.clear_committer().unwrap();

        assert_eq!(store.get_committers().unwrap(), None);
        assert!(store.get_author().unwrap().is_some());
    }

    #[test]
    fn test_mutations_refresh_mtime() {
        let store = store();
        assert_eq!(store.get_mtime().unwrap(), None);

        store
            .set_author(&pair("jd", "Jane Doe", "jane@example.com"))
            .unwrap();
        let mtime = store.get_mtime().unwrap().expect("mtime set");
        assert!((Utc::now() - mtime).num_seconds() < 5);

        store.clear_author().unwrap();
        assert!(store.get_mtime().unwrap().is_some());
    }

    #[test]
    fn test_default_scope_sees_global_author() {
        let backend: Arc<dyn ConfigBackend> = Arc::new(MemoryBackend::new());
        let global = PairStore::new(Arc::clone(&backend), "duet.env", Scope::Global);
        let default = PairStore::new(Arc::clone(&backend), "duet.env", Scope::Default);

        global
            .set_author(&pair("jd", "Jane Doe", "jane@example.com"))
            .unwrap();

        assert_eq!(
            default.get_author().unwrap().map(|p| p.initials),
            Some("jd".to_string())
        );
    }

    #[test]
    fn test_author_config_prefers_local() {
        let backend: Arc<dyn ConfigBackend> = Arc::new(MemoryBackend::new());
        let local = PairStore::new(Arc::clone(&backend), "duet.env", Scope::Local);
        let global = PairStore::new(Arc::clone(&backend), "duet.env", Scope::Global);

        global
            .set_author(&pair("fb", "Frances Bar", "f.bar@example.com"))
            .unwrap();
        local
            .set_author(&pair("jd", "Jane Doe", "jane@example.com"))
            .unwrap();

        let found = PairStore::author_config(Arc::clone(&backend), "duet.env", false).unwrap();
        assert_eq!(found.scope(), Scope::Local);
        assert_eq!(
            found.get_author().unwrap().map(|p| p.initials),
            Some("jd".to_string())
        );
    }

    #[test]
    fn test_author_config_falls_back_to_global() {
        let backend: Arc<dyn ConfigBackend> = Arc::new(MemoryBackend::new());
        let global = PairStore::new(Arc::clone(&backend), "duet.env", Scope::Global);

        global
            .set_author(&pair("fb", "Frances Bar", "f.bar@example.com"))
            .unwrap();

        let found = PairStore::author_config(Arc::clone(&backend), "duet.env", false).unwrap();
        assert_eq!(found.scope(), Scope::Global);
    }

    #[test]
    fn test_author_config_fails_when_unset() {
        let backend: Arc<dyn ConfigBackend> = Arc::new(MemoryBackend::new());
        let err = PairStore::author_config(backend, "duet.env", false).unwrap_err();
        assert!(matches!(err, Error::AuthorNotConfigured));
    }

    #[test]
    fn test_mirror_user_config_writes_user_keys() {
        let backend: Arc<dyn ConfigBackend> = Arc::new(MemoryBackend::new());
        let store = PairStore::new(Arc::clone(&backend), "duet.env", Scope::Local)
            .mirror_user_config(true);

        store
            .set_author(&pair("jd", "Jane Doe", "jane@example.com"))
            .unwrap();

        assert_eq!(
            backend.get(Scope::Local, "user.name").unwrap().as_deref(),
            Some("Jane Doe")
        );
        assert_eq!(
            backend.get(Scope::Local, "user.email").unwrap().as_deref(),
            Some("jane@example.com")
        );
    }

    #[test]
    fn test_namespace_override() {
        let backend: Arc<dyn ConfigBackend> = Arc::new(MemoryBackend::new());
        let store = PairStore::new(Arc::clone(&backend), "mob.env", Scope::Local);

        store
            .set_author(&pair("jd", "Jane Doe", "jane@example.com"))
            .unwrap();

        assert_eq!(
            backend.get(Scope::Local, "mob.env.git-author-name").unwrap().as_deref(),
            Some("Jane Doe")
        );
        assert_eq!(backend.get(Scope::Local, "duet.env.git-author-name").unwrap(), None);
    }
}
