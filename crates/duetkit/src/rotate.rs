//! Author rotation
//!
//! After each commit the front committer takes over as driver. The
//! transition works on decoded member lists, so a 2-person pair and an
//! N-person team are the same algorithm; the delimited storage encoding
//! is handled entirely by [`crate::store`].

use crate::pairs::Pair;

/// Compute the next assignment: the front committer becomes the author
/// and the old author joins the back of the committer list.
///
/// An empty committer list leaves the assignment unchanged.
pub fn rotated(author: Pair, mut committers: Vec<Pair>) -> (Pair, Vec<Pair>) {
    if committers.is_empty() {
        return (author, committers);
    }

    let new_author = committers.remove(0);
    committers.push(author);
    (new_author, committers)
}
