//! Greedy seed extension

use super::AlignmentSeed;
use crate::types::ExactMatch;
use crate::window::UnalignedPart;

/// Grow `seed` into a maximal exact match inside `part`.
///
/// Walks backward in lock-step while the preceding items are equal, then
/// forward while the following items are equal, never leaving the windows.
/// The result is in the coordinates of the full backing sequences.
pub fn expand_seed<T, F>(part: &UnalignedPart<'_, T>, seed: AlignmentSeed, eq: &F) -> ExactMatch
where
    F: Fn(&T, &T) -> bool,
{
    let reference = part.reference.as_slice();
    let query = part.query.as_slice();

    let mut reference_start = seed.reference_start;
    let mut query_start = seed.query_start;
    while reference_start > 0 && query_start > 0 && eq(&reference[reference_start - 1], &query[query_start - 1]) {
        reference_start -= 1;
        query_start -= 1;
    }

    // Exclusive ends
    let mut reference_end = seed.reference_start + seed.length;
    let mut query_end = seed.query_start + seed.length;
    while reference_end < reference.len() && query_end < query.len() && eq(&reference[reference_end], &query[query_end]) {
        reference_end += 1;
        query_end += 1;
    }

    ExactMatch::new(reference_start, query_start, reference_end - reference_start)
        .offset_by(part.reference.start_index(), part.query.start_index())
}
