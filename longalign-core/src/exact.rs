//! Exact alignment of short residual regions
//!
//! The long sequence aligner never runs dynamic programming itself. A
//! [`ShortRegionAligner`] can be handed to
//! [`LongSequenceAligner::align_detailed_with`](crate::LongSequenceAligner::align_detailed_with)
//! to place matches inside sub-problems that are too short or too divergent to
//! seed. [`LocalShortRegionAligner`] does this with `bio`'s local aligner.

use bio::alignment::pairwise::Aligner;
use bio::alignment::AlignmentOperation;

use crate::types::ExactMatch;

/// Exact aligner for short sequence pairs.
pub trait ShortRegionAligner<T> {
    /// Exact matches between `reference` and `query`, with coordinates
    /// relative to the two slices. Matches must be colinear and sorted.
    fn exact_align(&self, reference: &[T], query: &[T], eq: &dyn Fn(&T, &T) -> bool) -> Vec<ExactMatch>;

    /// Get the name/identifier of this aligner
    fn name(&self) -> &'static str;
}

/// Smith-Waterman local alignment of byte sequences via `bio`.
#[derive(Debug, Clone)]
pub struct LocalShortRegionAligner {
    pub match_score: i32,
    pub mismatch_score: i32,
    pub gap_open: i32,
    pub gap_extend: i32,
    /// Matched runs shorter than this are dropped
    pub min_match_length: usize,
}

impl Default for LocalShortRegionAligner {
    fn default() -> Self {
        Self {
            match_score: 1,
            mismatch_score: -1,
            gap_open: -5,
            gap_extend: -1,
            min_match_length: 1,
        }
    }
}

impl LocalShortRegionAligner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect the runs of `Match` operations of an alignment that starts at
    /// (`reference_start`, `query_start`).
    fn match_runs(&self, operations: &[AlignmentOperation], reference_start: usize, query_start: usize) -> Vec<ExactMatch> {
        let mut runs = Vec::new();
        let mut x = reference_start;
        let mut y = query_start;
        let mut run: Option<ExactMatch> = None;

        for op in operations {
            if *op != AlignmentOperation::Match {
                if let Some(m) = run.take() {
                    runs.push(m);
                }
            }
            match *op {
                AlignmentOperation::Match => {
                    match run.as_mut() {
                        Some(m) => m.length += 1,
                        None => run = Some(ExactMatch::new(x, y, 1)),
                    }
                    x += 1;
                    y += 1;
                }
                AlignmentOperation::Subst => {
                    x += 1;
                    y += 1;
                }
                AlignmentOperation::Ins => x += 1,
                AlignmentOperation::Del => y += 1,
                // Start offsets already account for leading clips
                AlignmentOperation::Xclip(_) | AlignmentOperation::Yclip(_) => {}
            }
        }
        if let Some(m) = run {
            runs.push(m);
        }

        runs.retain(|m| m.length >= self.min_match_length);
        runs
    }
}

impl ShortRegionAligner<u8> for LocalShortRegionAligner {
    fn exact_align(&self, reference: &[u8], query: &[u8], eq: &dyn Fn(&u8, &u8) -> bool) -> Vec<ExactMatch> {
        if reference.is_empty() || query.is_empty() {
            return Vec::new();
        }

        let (match_score, mismatch_score) = (self.match_score, self.mismatch_score);
        let score = |a: u8, b: u8| if eq(&a, &b) { match_score } else { mismatch_score };
        let mut aligner = Aligner::with_capacity(reference.len(), query.len(), self.gap_open, self.gap_extend, score);
        let alignment = aligner.local(reference, query);

        self.match_runs(&alignment.operations, alignment.xstart, alignment.ystart)
    }

    fn name(&self) -> &'static str {
        "bio-local"
    }
}
