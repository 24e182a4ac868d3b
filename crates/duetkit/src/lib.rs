//! Duetkit - shared commit authorship for pair and mob programmers
//!
//! Resolves pair initials to identities via an authors file, keeps the
//! current author/committer assignment in git config, and rotates the
//! driver after commits. The `duetkit-cli` crate wraps this library in
//! the `git-duet` family of commands.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use duetkit::{MemoryBackend, Pair, PairStore, Scope};
//!
//! fn main() -> duetkit::Result<()> {
//!     let store = PairStore::new(Arc::new(MemoryBackend::new()), "duet.env", Scope::Local);
//!     store.set_author(&Pair {
//!         initials: "jd".to_string(),
//!         name: "Jane Doe".to_string(),
//!         email: "jane@example.com".to_string(),
//!         username: None,
//!     })?;
//!     assert!(store.get_author()?.is_some());
//!     Ok(())
//! }
//! ```

mod backend;
mod config;
mod email;
mod error;
mod pairs;
mod rotate;
mod stale;
mod store;

pub use backend::{ConfigBackend, GitBackend, MemoryBackend, Scope};
pub use config::Configuration;
pub use error::{Error, Result, UNKNOWN_INITIALS_EXIT_CODE};
pub use pairs::{Pair, Registry};
pub use rotate::rotated;
pub use stale::is_stale;
pub use store::{PairStore, DEFAULT_NAMESPACE};
