//! Seed-and-extend alignment of long sequences
//!
//! [`LongSequenceAligner`] places a query against a reference without global
//! dynamic programming. A work queue of [`UnalignedPart`]s starts with the two
//! full sequences. Each popped part is seeded, the seed is expanded into a
//! maximal exact match, and the flanks on either side of the match are queued
//! again when both sequences have leftover there. Once the queue drains, the
//! gaps between consecutive matches are classified as inserts, deletions or
//! mismatches.
//!
//! Spans that never yield a match are not reported as regions: unseedable
//! parts, one-sided flanks and everything before the first or after the last
//! match. [`AlignmentReport`] lists the first two so callers can tell.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::ops::Range;
use thiserror::Error;

use crate::exact::ShortRegionAligner;
use crate::seed::{expand_seed, SeedFinder};
use crate::types::{AlignmentRegion, ExactMatch};
use crate::window::{UnalignedPart, WindowError};

/// Errors that can occur when setting up an alignment
#[derive(Debug, Error)]
pub enum AlignError {
    #[error("Empty {0} sequence")]
    EmptySequence(&'static str),

    #[error("Invalid parameters: {0}")]
    InvalidParams(String),

    #[error("Window error: {0}")]
    Window(#[from] WindowError),
}

pub type AlignResult<T> = Result<T, AlignError>;

/// Parameters for the long sequence aligner
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlignerParams {
    /// Initial seed length
    pub default_seed_length: usize,
    /// Random seed positions sampled per seed length
    pub maximum_seeding_tries: usize,
    /// Largest sub-problem handed to a short region aligner
    pub short_sequence_threshold: usize,
    /// Upper bound on work queue pops per alignment
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_iterations: Option<usize>,
    /// Seed for the position sampler; drawn from entropy when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rng_seed: Option<u64>,
}

impl Default for AlignerParams {
    fn default() -> Self {
        Self {
            default_seed_length: 20,
            maximum_seeding_tries: 30,
            short_sequence_threshold: 20,
            max_iterations: None,
            rng_seed: None,
        }
    }
}

impl AlignerParams {
    pub fn validate(&self) -> AlignResult<()> {
        if self.default_seed_length == 0 {
            return Err(AlignError::InvalidParams("default_seed_length must be at least 1".to_string()));
        }
        if self.maximum_seeding_tries == 0 {
            return Err(AlignError::InvalidParams("maximum_seeding_tries must be at least 1".to_string()));
        }
        Ok(())
    }
}

/// A reference/query span in full-sequence coordinates that produced no
/// region. Either range may be empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnalignedSpan {
    pub reference: Range<usize>,
    pub query: Range<usize>,
}

impl UnalignedSpan {
    fn of_part<T>(part: &UnalignedPart<'_, T>) -> Self {
        Self {
            reference: part.reference.start_index()..part.reference.end_index() + 1,
            query: part.query.start_index()..part.query.end_index() + 1,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlignmentStats {
    /// Work queue pops
    pub iterations: usize,
    /// Parts anchored by a seed
    pub seeded_parts: usize,
    /// Parts for which no unique seed was found
    pub unseedable_parts: usize,
    /// Parts resolved by a short region aligner
    pub fallback_parts: usize,
}

/// Full result of one alignment run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlignmentReport {
    /// Matches and gap regions, sorted by reference start
    pub regions: Vec<AlignmentRegion>,
    /// Sub-problems left without any match
    pub unaligned: Vec<UnalignedSpan>,
    /// Leftovers on one side of a match that were never queued
    pub discarded_flanks: Vec<UnalignedSpan>,
    pub stats: AlignmentStats,
}

impl AlignmentReport {
    pub fn matches(&self) -> impl Iterator<Item = &AlignmentRegion> {
        self.regions.iter().filter(|r| matches!(r, AlignmentRegion::Match { .. }))
    }
}

/// Seed-and-extend aligner for long sequences.
///
/// Owns the random source used for seed sampling; every call to an `align*`
/// method runs independently with its own queue.
pub struct LongSequenceAligner<R = StdRng> {
    params: AlignerParams,
    rng: R,
}

impl LongSequenceAligner<StdRng> {
    /// Create an aligner seeded from `params.rng_seed`, or from entropy.
    pub fn new(params: AlignerParams) -> AlignResult<Self> {
        let rng = match params.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(params, rng)
    }
}

impl<R: Rng> LongSequenceAligner<R> {
    /// Create an aligner drawing seed positions from `rng`.
    pub fn with_rng(params: AlignerParams, rng: R) -> AlignResult<Self> {
        params.validate()?;
        Ok(Self { params, rng })
    }

    pub fn params(&self) -> &AlignerParams {
        &self.params
    }

    /// Align `query` against `reference` using element equality.
    pub fn align<T: PartialEq>(&mut self, reference: &[T], query: &[T]) -> AlignResult<Vec<AlignmentRegion>> {
        self.align_by(reference, query, |a: &T, b: &T| a == b)
    }

    /// Align using `eq(reference_item, query_item)` as element equality.
    pub fn align_by<T, F>(&mut self, reference: &[T], query: &[T], eq: F) -> AlignResult<Vec<AlignmentRegion>>
    where
        F: Fn(&T, &T) -> bool,
    {
        Ok(self.run(reference, query, &eq, None)?.regions)
    }

    /// Like [`align_by`](Self::align_by), also reporting the spans that
    /// produced no region.
    pub fn align_detailed_by<T, F>(&mut self, reference: &[T], query: &[T], eq: F) -> AlignResult<AlignmentReport>
    where
        F: Fn(&T, &T) -> bool,
    {
        self.run(reference, query, &eq, None)
    }

    /// Like [`align_detailed_by`](Self::align_detailed_by), handing
    /// unseedable parts no longer than `short_sequence_threshold` on both
    /// sides to `fallback`.
    pub fn align_detailed_with<T, F>(
        &mut self,
        reference: &[T],
        query: &[T],
        eq: F,
        fallback: &dyn ShortRegionAligner<T>,
    ) -> AlignResult<AlignmentReport>
    where
        F: Fn(&T, &T) -> bool,
    {
        self.run(reference, query, &eq, Some(fallback))
    }

    fn run<T, F>(
        &mut self,
        reference: &[T],
        query: &[T],
        eq: &F,
        fallback: Option<&dyn ShortRegionAligner<T>>,
    ) -> AlignResult<AlignmentReport>
    where
        F: Fn(&T, &T) -> bool,
    {
        if reference.is_empty() {
            return Err(AlignError::EmptySequence("reference"));
        }
        if query.is_empty() {
            return Err(AlignError::EmptySequence("query"));
        }

        let mut report = AlignmentReport::default();
        let mut matches: Vec<ExactMatch> = Vec::new();
        let mut queue = VecDeque::new();
        queue.push_back(UnalignedPart::whole(reference, query)?);

        let params = &self.params;
        let mut finder = SeedFinder::new(&mut self.rng, params.default_seed_length, params.maximum_seeding_tries);

        while let Some(part) = queue.pop_front() {
            if params.max_iterations.is_some_and(|max| report.stats.iterations >= max) {
                log::warn!(
                    "Iteration budget of {} exhausted with {} parts pending",
                    report.stats.iterations,
                    queue.len() + 1
                );
                report.unaligned.push(UnalignedSpan::of_part(&part));
                report.unaligned.extend(queue.drain(..).map(|p| UnalignedSpan::of_part(&p)));
                break;
            }
            report.stats.iterations += 1;

            log::trace!(
                "Seeding query [{}, {}] against reference [{}, {}]",
                part.query.start_index(),
                part.query.end_index(),
                part.reference.start_index(),
                part.reference.end_index()
            );

            let Some(seed) = finder.find(&part, eq) else {
                report.stats.unseedable_parts += 1;
                let found = match fallback {
                    Some(aligner) if fits_short_threshold(params, &part) => fallback_matches(aligner, &part, eq),
                    _ => Vec::new(),
                };
                if found.is_empty() {
                    report.unaligned.push(UnalignedSpan::of_part(&part));
                } else {
                    report.stats.fallback_parts += 1;
                    matches.extend(found);
                }
                continue;
            };

            report.stats.seeded_parts += 1;
            let found = expand_seed(&part, seed, eq);
            matches.push(found);

            let (front, trailing) = split_flanks(&part, &found, &mut report.discarded_flanks)?;
            queue.extend(front);
            queue.extend(trailing);
        }

        matches.sort_by_key(|m| m.reference_start);
        let gaps = classify_gaps(&matches);

        let mut regions: Vec<AlignmentRegion> = matches.into_iter().map(AlignmentRegion::from).collect();
        regions.extend(gaps);
        sort_regions(&mut regions);

        log::debug!(
            "Aligned {} bp query to {} bp reference: {} regions, {} unaligned parts, {} iterations",
            query.len(),
            reference.len(),
            regions.len(),
            report.unaligned.len(),
            report.stats.iterations
        );

        report.regions = regions;
        Ok(report)
    }
}

fn fits_short_threshold<T>(params: &AlignerParams, part: &UnalignedPart<'_, T>) -> bool {
    part.query.length() <= params.short_sequence_threshold && part.reference.length() <= params.short_sequence_threshold
}

/// Run `aligner` on a part and translate its matches to full coordinates.
fn fallback_matches<T, F>(aligner: &dyn ShortRegionAligner<T>, part: &UnalignedPart<'_, T>, eq: &F) -> Vec<ExactMatch>
where
    F: Fn(&T, &T) -> bool,
{
    let reference = part.reference.as_slice();
    let query = part.query.as_slice();
    aligner
        .exact_align(reference, query, eq)
        .into_iter()
        .filter(|m| m.length > 0 && m.reference_end() < reference.len() && m.query_end() < query.len())
        .map(|m| m.offset_by(part.reference.start_index(), part.query.start_index()))
        .collect()
}

/// Sub-problems before and after `found` within `part`.
///
/// A flank is queued only when both sequences have leftover on that side;
/// one-sided leftovers are recorded in `discarded`.
fn split_flanks<'a, T>(
    part: &UnalignedPart<'a, T>,
    found: &ExactMatch,
    discarded: &mut Vec<UnalignedSpan>,
) -> AlignResult<(Option<UnalignedPart<'a, T>>, Option<UnalignedPart<'a, T>>)> {
    let query_before = found.query_start - part.query.start_index();
    let reference_before = found.reference_start - part.reference.start_index();

    let front = if query_before > 0 && reference_before > 0 {
        Some(UnalignedPart::new(
            part.query.substring_len(0, query_before)?,
            part.reference.substring_len(0, reference_before)?,
        ))
    } else {
        if query_before > 0 || reference_before > 0 {
            discarded.push(UnalignedSpan {
                reference: part.reference.start_index()..found.reference_start,
                query: part.query.start_index()..found.query_start,
            });
        }
        None
    };

    let query_after = query_before + found.length;
    let reference_after = reference_before + found.length;
    let query_left = query_after < part.query.length();
    let reference_left = reference_after < part.reference.length();

    let trailing = if query_left && reference_left {
        Some(UnalignedPart::new(
            part.query.substring(query_after)?,
            part.reference.substring(reference_after)?,
        ))
    } else {
        if query_left || reference_left {
            discarded.push(UnalignedSpan {
                reference: found.reference_end() + 1..part.reference.end_index() + 1,
                query: found.query_end() + 1..part.query.end_index() + 1,
            });
        }
        None
    };

    Ok((front, trailing))
}

/// Classify the gaps between consecutive matches, which must be sorted by
/// reference start. Nothing is emitted before the first or after the last
/// match.
pub fn classify_gaps(matches: &[ExactMatch]) -> Vec<AlignmentRegion> {
    let mut regions = Vec::new();

    for pair in matches.windows(2) {
        let (prev, next) = (&pair[0], &pair[1]);
        let (Some(gap_reference), Some(gap_query)) = (
            next.reference_start.checked_sub(prev.reference_end()),
            next.query_start.checked_sub(prev.query_end()),
        ) else {
            log::debug!("Skipping non-colinear matches {:?} and {:?}", prev, next);
            continue;
        };
        if gap_reference == 0 || gap_query == 0 {
            log::debug!("Skipping overlapping matches {:?} and {:?}", prev, next);
            continue;
        }

        let region = if gap_reference == 1 {
            if gap_query == 1 {
                // Adjacent on both sequences, nothing in between
                continue;
            }
            AlignmentRegion::Insert {
                reference_start: next.reference_start,
                query_start: prev.query_end() + 1,
                insert_length: gap_query - 1,
            }
        } else if gap_query == 1 {
            AlignmentRegion::Deletion {
                reference_start: prev.reference_end() + 1,
                deletion_length: gap_reference - 1,
            }
        } else {
            AlignmentRegion::Mismatch {
                reference_start: prev.reference_end() + 1,
                reference_end: next.reference_start - 1,
                query_start: prev.query_end() + 1,
                query_end: next.query_start - 1,
            }
        };
        regions.push(region);
    }

    regions
}

/// Sort by reference start, inserts first among equal starts. Stable.
pub fn sort_regions(regions: &mut [AlignmentRegion]) {
    regions.sort_by(|a, b| {
        a.reference_start()
            .cmp(&b.reference_start())
            .then_with(|| b.is_insert().cmp(&a.is_insert()))
    });
}
