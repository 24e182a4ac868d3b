//! Configuration backend for Duetkit
//!
//! Provides a key/value trait over git-config-style storage and
//! implementations:
//! - `GitBackend`: shells out to `git config`
//! - `MemoryBackend`: in-memory fake with git's scope semantics, for tests

mod git;
mod memory;
mod traits;

pub use git::GitBackend;
pub use memory::MemoryBackend;
pub use traits::{ConfigBackend, Scope};
