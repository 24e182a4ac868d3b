//! Staleness detection
//!
//! Pair state left alone past the configured cutoff is considered stale;
//! the pre-commit hook refuses commits until the pair is re-declared.

use chrono::{DateTime, TimeDelta, Utc};

/// Whether pair state written at `mtime` is stale under `cutoff`.
///
/// State that was never written (`None`) is always stale.
pub fn is_stale(mtime: Option<DateTime<Utc>>, cutoff: TimeDelta) -> bool {
    is_stale_at(mtime, cutoff, Utc::now())
}

fn is_stale_at(mtime: Option<DateTime<Utc>>, cutoff: TimeDelta, now: DateTime<Utc>) -> bool {
    match mtime {
        Some(mtime) => mtime + cutoff < now,
        None => true,
    }
}
