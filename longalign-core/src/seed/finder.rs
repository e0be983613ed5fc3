//! Randomized seed search with adaptive seed length

use rand::Rng;
use std::collections::HashSet;

use super::AlignmentSeed;
use crate::window::UnalignedPart;

/// Samples seeds from the shorter window of a sub-problem and looks them up
/// in the longer one.
///
/// Each round draws up to `maximum_seeding_tries` random offsets for the
/// current seed length. The first seed that occurs exactly once in the longer
/// window wins; an overlapping second copy counts as a repeat, so on periodic
/// input the seed keeps growing until its only hit is its own copy. A round
/// without a winner grows the seed by one when ambiguous hits outnumber misses
/// and halves it otherwise. Revisiting a length ends the search.
pub struct SeedFinder<'r, R> {
    rng: &'r mut R,
    default_seed_length: usize,
    maximum_seeding_tries: usize,
    tried_lengths: Vec<usize>,
}

impl<'r, R: Rng> SeedFinder<'r, R> {
    pub fn new(rng: &'r mut R, default_seed_length: usize, maximum_seeding_tries: usize) -> Self {
        Self {
            rng,
            default_seed_length,
            maximum_seeding_tries,
            tried_lengths: Vec::new(),
        }
    }

    /// Seed lengths visited by the last call to [`find`](Self::find), in order.
    pub fn tried_lengths(&self) -> &[usize] {
        &self.tried_lengths
    }

    /// Find a unique seed in `part`, comparing `eq(reference_item, query_item)`.
    ///
    /// Returns `None` when the part is unseedable; that is an expected outcome
    /// for divergent regions.
    pub fn find<T, F>(&mut self, part: &UnalignedPart<'_, T>, eq: &F) -> Option<AlignmentSeed>
    where
        F: Fn(&T, &T) -> bool,
    {
        self.tried_lengths.clear();

        let query_is_short = part.query.length() <= part.reference.length();
        let (short, long) = if query_is_short {
            (part.query, part.reference)
        } else {
            (part.reference, part.query)
        };
        // Needle items come from `short`, haystack items from `long`
        let compare = |needle: &T, hay: &T| {
            if query_is_short {
                eq(hay, needle)
            } else {
                eq(needle, hay)
            }
        };

        let mut seen = HashSet::new();
        let mut seed_length = short.length().min(self.default_seed_length);

        while seed_length > 0 && seed_length <= short.length() && seen.insert(seed_length) {
            self.tried_lengths.push(seed_length);

            let positions = short.length() - seed_length + 1;
            let tries = positions.min(self.maximum_seeding_tries);
            let mut no_match_count = 0usize;
            let mut multiple_match_count = 0usize;

            for _ in 0..tries {
                let offset = self.rng.gen_range(0..positions);
                let seed = short.substring_len(offset, seed_length).ok()?;

                match long.index_of_by(&seed, 0, compare) {
                    None => no_match_count += 1,
                    Some(hit) => {
                        if long.index_of_by(&seed, hit + 1, compare).is_none() {
                            log::trace!(
                                "Unique seed of length {} at short offset {} / long offset {}",
                                seed_length,
                                offset,
                                hit
                            );
                            return Some(if query_is_short {
                                AlignmentSeed::new(offset, hit, seed_length)
                            } else {
                                AlignmentSeed::new(hit, offset, seed_length)
                            });
                        }
                        multiple_match_count += 1;
                    }
                }
            }

            log::trace!(
                "Seed length {}: {} misses, {} ambiguous hits",
                seed_length,
                no_match_count,
                multiple_match_count
            );

            if multiple_match_count > no_match_count {
                seed_length += 1;
            } else {
                seed_length /= 2;
            }
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::window::SequenceWindow;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn eq(a: &u8, b: &u8) -> bool {
        a == b
    }

    fn part<'a>(reference: &'a [u8], query: &'a [u8]) -> UnalignedPart<'a, u8> {
        UnalignedPart::whole(reference, query).unwrap()
    }

    #[test]
    fn test_whole_short_sequence_is_its_own_seed() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut finder = SeedFinder::new(&mut rng, 20, 30);
        let seed = finder.find(&part(b"GATTACA", b"GATTACA"), &eq).unwrap();
        assert_eq!(seed, AlignmentSeed::new(0, 0, 7));
        assert_eq!(finder.tried_lengths(), &[7]);
    }

    #[test]
    fn test_seed_positions_follow_roles() {
        // Query is the longer window here, so offsets are sampled from the reference
        let reference = b"CCGGTA";
        let query = b"TTTTCCGGTATTTT";
        let mut rng = StdRng::seed_from_u64(7);
        let mut finder = SeedFinder::new(&mut rng, 20, 30);
        let seed = finder.find(&part(reference, query), &eq).unwrap();
        assert_eq!(seed, AlignmentSeed::new(4, 0, 6));
    }

    #[test]
    fn test_no_shared_content_halves_to_zero() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut finder = SeedFinder::new(&mut rng, 20, 30);
        assert_eq!(finder.find(&part(b"ACGA", b"TTTTTT"), &eq), None);
        assert_eq!(finder.tried_lengths(), &[4, 2, 1]);
    }

    #[test]
    fn test_repeat_detection_terminates() {
        // Every short seed occurs many times, every long one is missing
        let reference = b"ATATATATATATATATATATATATATATATATATATATAT";
        let query = b"ATATATATATATATATATATGGATATATATATATATATAT";
        let mut rng = StdRng::seed_from_u64(11);
        let mut finder = SeedFinder::new(&mut rng, 4, 30);
        let _ = finder.find(&part(reference, query), &eq);

        let tried = finder.tried_lengths();
        assert!(!tried.is_empty());
        let unique: HashSet<_> = tried.iter().collect();
        assert_eq!(unique.len(), tried.len(), "a seed length was retried: {:?}", tried);
    }

    #[test]
    fn test_overlapping_repeat_is_ambiguous() {
        // Every proper substring of a homopolymer also occurs one base later
        let seq = [b'A'; 30];
        let mut rng = StdRng::seed_from_u64(0);
        let mut finder = SeedFinder::new(&mut rng, 20, 30);
        let seed = finder.find(&part(&seq, &seq), &eq).unwrap();
        assert_eq!(seed, AlignmentSeed::new(0, 0, 30));
        assert_eq!(finder.tried_lengths(), (20..=30).collect::<Vec<_>>().as_slice());
    }

    #[test]
    fn test_tandem_repeat_seed_stays_on_diagonal() {
        let seq = b"ACGTTGCAAC".repeat(4);
        for rng_seed in 0..5 {
            let mut rng = StdRng::seed_from_u64(rng_seed);
            let mut finder = SeedFinder::new(&mut rng, 8, 30);
            let seed = finder.find(&part(&seq, &seq), &eq).unwrap();
            assert_eq!(seed.reference_start, seed.query_start);
            assert!(seed.length > 30, "seed {:?} shorter than the period allows", seed);
        }
    }

    #[test]
    fn test_custom_equality_orientation() {
        // eq(reference, query) is only true for A (ref) against T (query)
        let reference = b"AAAAC";
        let query = b"GTTTTG";
        let one_way = |r: &u8, q: &u8| (*r == b'A' && *q == b'T') || (*r == b'C' && *q == b'G');
        let mut rng = StdRng::seed_from_u64(5);
        let mut finder = SeedFinder::new(&mut rng, 20, 30);
        let seed = finder.find(&part(reference, query), &one_way).unwrap();
        assert_eq!(seed, AlignmentSeed::new(1, 0, 5));
    }

    #[test]
    fn test_windows_are_local() {
        let reference = b"NNNNACGTACCA";
        let query = b"ACGTACCA";
        let part = UnalignedPart::new(
            SequenceWindow::full(&query[..]).unwrap(),
            SequenceWindow::new(&reference[..], 4, 11).unwrap(),
        );
        let mut rng = StdRng::seed_from_u64(9);
        let mut finder = SeedFinder::new(&mut rng, 20, 30);
        let seed = finder.find(&part, &eq).unwrap();
        assert_eq!(seed, AlignmentSeed::new(0, 0, 8));
    }
}
