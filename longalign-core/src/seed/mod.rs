//! Seeding for the long sequence aligner
//!
//! A seed is a short exact match between the two windows of an
//! [`UnalignedPart`](crate::window::UnalignedPart) that is unique in the longer
//! window. [`SeedFinder`] looks for one by random sampling with an adaptive
//! seed length, and [`expand_seed`] grows it into a maximal exact match.

pub mod expand;
pub mod finder;


pub use expand::expand_seed;
pub use finder::SeedFinder;

/// A seed position local to the windows it was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlignmentSeed {
    pub query_start: usize,
    pub reference_start: usize,
    pub length: usize,
}

impl AlignmentSeed {
    pub fn new(query_start: usize, reference_start: usize, length: usize) -> Self {
        Self {
            query_start,
            reference_start,
            length,
        }
    }
}
