use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;

pub type Position = usize;

/// A named sequence record as loaded from FASTA/FASTQ.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sequence {
    pub id: String,
    pub description: Option<String>,
    pub data: Vec<u8>,
}

impl Sequence {
    pub fn new(id: String, data: Vec<u8>) -> Self {
        Self {
            id,
            description: None,
            data,
        }
    }

    pub fn with_description(mut self, description: String) -> Self {
        self.description = Some(description);
        self
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// An exact, gap-free match between reference and query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExactMatch {
    pub reference_start: Position,
    pub query_start: Position,
    pub length: usize,
}

impl ExactMatch {
    pub fn new(reference_start: Position, query_start: Position, length: usize) -> Self {
        Self {
            reference_start,
            query_start,
            length,
        }
    }

    /// Last matched reference position (inclusive)
    pub fn reference_end(&self) -> Position {
        self.reference_start + self.length - 1
    }

    /// Last matched query position (inclusive)
    pub fn query_end(&self) -> Position {
        self.query_start + self.length - 1
    }

    /// Shift both coordinates by the given offsets.
    pub fn offset_by(self, reference_offset: Position, query_offset: Position) -> Self {
        Self {
            reference_start: self.reference_start + reference_offset,
            query_start: self.query_start + query_offset,
            length: self.length,
        }
    }
}

impl From<ExactMatch> for AlignmentRegion {
    fn from(m: ExactMatch) -> Self {
        AlignmentRegion::Match {
            reference_start: m.reference_start,
            query_start: m.query_start,
            length: m.length,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegionKind {
    Match,
    Insert,
    Deletion,
    Mismatch,
}

impl fmt::Display for RegionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RegionKind::Match => "match",
            RegionKind::Insert => "insert",
            RegionKind::Deletion => "deletion",
            RegionKind::Mismatch => "mismatch",
        };
        f.write_str(name)
    }
}

/// One classified span of an alignment.
///
/// Coordinates are 0-based, inclusive and refer to the full reference and
/// query sequences passed to the aligner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AlignmentRegion {
    /// Identical run on both sequences
    Match {
        reference_start: Position,
        query_start: Position,
        length: usize,
    },
    /// Query run with no reference counterpart, anchored at the reference
    /// position following the gap
    Insert {
        reference_start: Position,
        query_start: Position,
        insert_length: usize,
    },
    /// Reference run absent from the query
    Deletion {
        reference_start: Position,
        deletion_length: usize,
    },
    /// Divergent span present on both sequences
    Mismatch {
        reference_start: Position,
        reference_end: Position,
        query_start: Position,
        query_end: Position,
    },
}

impl AlignmentRegion {
    pub fn kind(&self) -> RegionKind {
        match self {
            AlignmentRegion::Match { .. } => RegionKind::Match,
            AlignmentRegion::Insert { .. } => RegionKind::Insert,
            AlignmentRegion::Deletion { .. } => RegionKind::Deletion,
            AlignmentRegion::Mismatch { .. } => RegionKind::Mismatch,
        }
    }

    pub fn is_insert(&self) -> bool {
        matches!(self, AlignmentRegion::Insert { .. })
    }

    pub fn reference_start(&self) -> Position {
        match *self {
            AlignmentRegion::Match { reference_start, .. }
            | AlignmentRegion::Insert { reference_start, .. }
            | AlignmentRegion::Deletion { reference_start, .. }
            | AlignmentRegion::Mismatch { reference_start, .. } => reference_start,
        }
    }

    /// Last reference position covered, `None` for an insert.
    pub fn reference_end(&self) -> Option<Position> {
        match *self {
            AlignmentRegion::Match { reference_start, length, .. } => Some(reference_start + length - 1),
            AlignmentRegion::Deletion { reference_start, deletion_length } => {
                Some(reference_start + deletion_length - 1)
            }
            AlignmentRegion::Mismatch { reference_end, .. } => Some(reference_end),
            AlignmentRegion::Insert { .. } => None,
        }
    }

    /// First query position covered, `None` for a deletion.
    pub fn query_start(&self) -> Option<Position> {
        match *self {
            AlignmentRegion::Match { query_start, .. }
            | AlignmentRegion::Insert { query_start, .. }
            | AlignmentRegion::Mismatch { query_start, .. } => Some(query_start),
            AlignmentRegion::Deletion { .. } => None,
        }
    }

    /// Last query position covered, `None` for a deletion.
    pub fn query_end(&self) -> Option<Position> {
        match *self {
            AlignmentRegion::Match { query_start, length, .. } => Some(query_start + length - 1),
            AlignmentRegion::Insert { query_start, insert_length, .. } => Some(query_start + insert_length - 1),
            AlignmentRegion::Mismatch { query_end, .. } => Some(query_end),
            AlignmentRegion::Deletion { .. } => None,
        }
    }

    /// Half-open reference span. Inserts occupy an empty span at their anchor.
    pub fn reference_range(&self) -> Range<Position> {
        let start = self.reference_start();
        match self.reference_end() {
            Some(end) => start..end + 1,
            None => start..start,
        }
    }

    /// Half-open query span, `None` for a deletion.
    pub fn query_range(&self) -> Option<Range<Position>> {
        Some(self.query_start()?..self.query_end()? + 1)
    }

    /// Number of positions covered on the longer of the two axes.
    pub fn length(&self) -> usize {
        let reference = self.reference_range().len();
        let query = self.query_range().map_or(0, |r| r.len());
        reference.max(query)
    }
}

impl fmt::Display for AlignmentRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reference = self.reference_range();
        write!(f, "{} ref[{}..{})", self.kind(), reference.start, reference.end)?;
        if let Some(query) = self.query_range() {
            write!(f, " qry[{}..{})", query.start, query.end)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_coordinates() {
        let region: AlignmentRegion = ExactMatch::new(10, 4, 5).into();
        assert_eq!(region.kind(), RegionKind::Match);
        assert_eq!(region.reference_end(), Some(14));
        assert_eq!(region.query_end(), Some(8));
        assert_eq!(region.reference_range(), 10..15);
        assert_eq!(region.query_range(), Some(4..9));
        assert_eq!(region.length(), 5);
    }

    #[test]
    fn test_insert_has_empty_reference_span() {
        let region = AlignmentRegion::Insert {
            reference_start: 4,
            query_start: 4,
            insert_length: 2,
        };
        assert!(region.is_insert());
        assert_eq!(region.reference_end(), None);
        assert!(region.reference_range().is_empty());
        assert_eq!(region.query_range(), Some(4..6));
        assert_eq!(region.length(), 2);
    }

    #[test]
    fn test_deletion_has_no_query_span() {
        let region = AlignmentRegion::Deletion {
            reference_start: 4,
            deletion_length: 2,
        };
        assert_eq!(region.reference_end(), Some(5));
        assert_eq!(region.query_range(), None);
        assert_eq!(region.to_string(), "deletion ref[4..6)");
    }

    #[test]
    fn test_mismatch_length_takes_longer_axis() {
        let region = AlignmentRegion::Mismatch {
            reference_start: 40,
            reference_end: 42,
            query_start: 40,
            query_end: 44,
        };
        assert_eq!(region.length(), 5);
        assert_eq!(region.to_string(), "mismatch ref[40..43) qry[40..45)");
    }

    #[test]
    fn test_region_json_form() {
        let insert = AlignmentRegion::Insert {
            reference_start: 4,
            query_start: 4,
            insert_length: 2,
        };
        assert_eq!(
            serde_json::to_value(insert).unwrap(),
            serde_json::json!({
                "type": "insert",
                "reference_start": 4,
                "query_start": 4,
                "insert_length": 2
            })
        );

        let regions = vec![
            AlignmentRegion::Match {
                reference_start: 0,
                query_start: 0,
                length: 4,
            },
            insert,
            AlignmentRegion::Deletion {
                reference_start: 10,
                deletion_length: 3,
            },
            AlignmentRegion::Mismatch {
                reference_start: 40,
                reference_end: 42,
                query_start: 40,
                query_end: 44,
            },
        ];
        let json = serde_json::to_string(&regions).unwrap();
        assert!(json.contains(r#""type":"deletion""#));
        let parsed: Vec<AlignmentRegion> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, regions);
    }

    #[test]
    fn test_exact_match_offset() {
        let m = ExactMatch::new(1, 2, 3).offset_by(100, 200);
        assert_eq!(m, ExactMatch::new(101, 202, 3));
        assert_eq!(m.reference_end(), 103);
        assert_eq!(m.query_end(), 204);
    }
}
