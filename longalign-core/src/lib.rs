//! longalign Core Library
//!
//! Seed-and-extend alignment of long sequences: zero-copy sequence windows,
//! randomized adaptive seeding, greedy seed expansion, work-queue subdivision
//! of unaligned regions and classification of the gaps between matches.
//!
//! ```
//! use longalign_core::{AlignerParams, AlignmentRegion, LongSequenceAligner};
//!
//! let params = AlignerParams { rng_seed: Some(42), ..Default::default() };
//! let mut aligner = LongSequenceAligner::new(params).unwrap();
//! let regions = aligner.align(b"GATTACA", b"GATTACA").unwrap();
//! assert_eq!(regions, vec![AlignmentRegion::Match { reference_start: 0, query_start: 0, length: 7 }]);
//! ```

pub mod aligner;
pub mod exact;
pub mod io;
pub mod nucleotide;
pub mod seed;
pub mod types;
pub mod window;

// Re-export commonly used types and functions
pub use aligner::{
    AlignError, AlignResult, AlignerParams, AlignmentReport, AlignmentStats, LongSequenceAligner, UnalignedSpan,
};
pub use exact::{LocalShortRegionAligner, ShortRegionAligner};
pub use seed::{AlignmentSeed, SeedFinder};
pub use types::{AlignmentRegion, ExactMatch, RegionKind, Sequence};
pub use window::{SequenceWindow, UnalignedPart, WindowError};

/// Version information for the longalign core library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
