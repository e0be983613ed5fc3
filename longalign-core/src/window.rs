//! Zero-copy windows over a backing sequence
//!
//! A [`SequenceWindow`] is an immutable, bounds-checked view of a contiguous
//! run of a borrowed sequence. Sub-windows share the same backing slice, so
//! splitting an alignment sub-problem never copies sequence data.

use std::ops::Index;
use thiserror::Error;

/// Errors raised when constructing or slicing a window
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WindowError {
    #[error("Window bounds {start}..={end} out of range for sequence of length {len}")]
    OutOfRange { start: usize, end: usize, len: usize },

    #[error("Invalid window length: {0}")]
    InvalidLength(usize),
}

pub type WindowResult<T> = Result<T, WindowError>;

/// Inclusive `[start_index, end_index]` view over a backing sequence.
///
/// Invariant: `start_index <= end_index < backing.len()`, so a window is
/// never empty.
#[derive(Debug)]
pub struct SequenceWindow<'a, T> {
    backing: &'a [T],
    start: usize,
    end: usize,
}

// Manual impls: the window is a pair of indices plus a shared reference, so
// it is `Copy` whatever `T` is.
impl<T> Clone for SequenceWindow<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for SequenceWindow<'_, T> {}

impl<'a, T> SequenceWindow<'a, T> {
    /// Create a window over `backing[start..=end]`.
    pub fn new(backing: &'a [T], start: usize, end: usize) -> WindowResult<Self> {
        if start >= backing.len() || end >= backing.len() || end < start {
            return Err(WindowError::OutOfRange {
                start,
                end,
                len: backing.len(),
            });
        }

        Ok(Self {
            backing,
            start,
            end,
        })
    }

    /// Window spanning the whole backing sequence.
    pub fn full(backing: &'a [T]) -> WindowResult<Self> {
        if backing.is_empty() {
            return Err(WindowError::InvalidLength(0));
        }
        Self::new(backing, 0, backing.len() - 1)
    }

    /// Offset of the first element in the backing sequence
    pub fn start_index(&self) -> usize {
        self.start
    }

    /// Offset of the last element in the backing sequence (inclusive)
    pub fn end_index(&self) -> usize {
        self.end
    }

    pub fn length(&self) -> usize {
        self.end - self.start + 1
    }

    /// Element at window offset `i`.
    pub fn get(&self, i: usize) -> WindowResult<&'a T> {
        if i >= self.length() {
            return Err(WindowError::OutOfRange {
                start: self.start + i,
                end: self.start + i,
                len: self.backing.len(),
            });
        }
        Ok(&self.backing[self.start + i])
    }

    /// The viewed elements as a slice of the backing sequence.
    pub fn as_slice(&self) -> &'a [T] {
        &self.backing[self.start..=self.end]
    }

    /// The full backing sequence this window was cut from.
    pub fn backing(&self) -> &'a [T] {
        self.backing
    }

    /// Window from `offset` to the end of this window.
    pub fn substring(&self, offset: usize) -> WindowResult<Self> {
        if offset >= self.length() {
            return Err(WindowError::OutOfRange {
                start: self.start + offset,
                end: self.end,
                len: self.backing.len(),
            });
        }
        Self::new(self.backing, self.start + offset, self.end)
    }

    /// Window of `len` elements starting at `offset`.
    pub fn substring_len(&self, offset: usize, len: usize) -> WindowResult<Self> {
        if len == 0 {
            return Err(WindowError::InvalidLength(len));
        }
        if offset + len > self.length() {
            return Err(WindowError::OutOfRange {
                start: self.start + offset,
                end: self.start + offset + len - 1,
                len: self.backing.len(),
            });
        }
        Self::new(self.backing, self.start + offset, self.start + offset + len - 1)
    }

    /// Lazily iterate over the viewed elements. Restartable: every call
    /// reads the backing sequence again.
    pub fn iter(&self) -> std::slice::Iter<'a, T> {
        self.as_slice().iter()
    }

    /// First offset at or after `from` where `needle` occurs, comparing
    /// `eq(needle_item, window_item)`.
    ///
    /// Naive scan, O(window length x needle length). Needles are seed-sized.
    pub fn index_of_by<F>(&self, needle: &SequenceWindow<'_, T>, from: usize, mut eq: F) -> Option<usize>
    where
        F: FnMut(&T, &T) -> bool,
    {
        let haystack = self.as_slice();
        let needle = needle.as_slice();
        if needle.len() > haystack.len() {
            return None;
        }

        let last = haystack.len() - needle.len();
        (from..=last).find(|&offset| {
            needle
                .iter()
                .zip(&haystack[offset..offset + needle.len()])
                .all(|(n, h)| eq(n, h))
        })
    }
}

impl<'a, T: PartialEq> SequenceWindow<'a, T> {
    /// First offset of `needle` within this window.
    pub fn index_of(&self, needle: &SequenceWindow<'_, T>) -> Option<usize> {
        self.index_of_by(needle, 0, |a, b| a == b)
    }
}

impl<T> Index<usize> for SequenceWindow<'_, T> {
    type Output = T;

    fn index(&self, i: usize) -> &T {
        assert!(i < self.length(), "window index {} out of range for length {}", i, self.length());
        &self.backing[self.start + i]
    }
}

impl<'a, T> IntoIterator for &SequenceWindow<'a, T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// A pending alignment sub-problem: a query window to be placed against a
/// reference window.
#[derive(Debug)]
pub struct UnalignedPart<'a, T> {
    pub query: SequenceWindow<'a, T>,
    pub reference: SequenceWindow<'a, T>,
}

impl<T> Clone for UnalignedPart<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for UnalignedPart<'_, T> {}

impl<'a, T> UnalignedPart<'a, T> {
    pub fn new(query: SequenceWindow<'a, T>, reference: SequenceWindow<'a, T>) -> Self {
        Self { query, reference }
    }

    /// The sub-problem covering both sequences end to end.
    pub fn whole(reference: &'a [T], query: &'a [T]) -> WindowResult<Self> {
        Ok(Self {
            query: SequenceWindow::full(query)?,
            reference: SequenceWindow::full(reference)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEQ: &[u8] = b"ACGTACGGTTCA";

    #[test]
    fn test_new_rejects_bad_bounds() {
        assert!(SequenceWindow::new(SEQ, 0, SEQ.len() - 1).is_ok());
        assert!(matches!(
            SequenceWindow::new(SEQ, 0, SEQ.len()),
            Err(WindowError::OutOfRange { .. })
        ));
        assert!(matches!(
            SequenceWindow::new(SEQ, SEQ.len(), SEQ.len()),
            Err(WindowError::OutOfRange { .. })
        ));
        assert!(matches!(SequenceWindow::new(SEQ, 5, 4), Err(WindowError::OutOfRange { .. })));
        assert!(SequenceWindow::<u8>::full(&[]).is_err());
    }

    #[test]
    fn test_indexing_is_relative() {
        let window = SequenceWindow::new(SEQ, 4, 7).unwrap();
        assert_eq!(window.length(), 4);
        assert_eq!(window[0], b'A');
        assert_eq!(*window.get(3).unwrap(), b'G');
        assert!(window.get(4).is_err());
        assert_eq!(window.as_slice(), b"ACGG");
    }

    #[test]
    fn test_substring_shares_backing() {
        let window = SequenceWindow::new(SEQ, 2, 9).unwrap();
        let sub = window.substring_len(2, 3).unwrap();
        assert_eq!(sub.start_index(), 4);
        assert_eq!(sub.end_index(), 6);
        assert_eq!(sub.as_slice(), b"ACG");
        assert!(std::ptr::eq(sub.backing(), window.backing()));

        let tail = window.substring(5).unwrap();
        assert_eq!(tail.as_slice(), b"GTT");

        assert!(matches!(window.substring_len(0, 0), Err(WindowError::InvalidLength(0))));
        assert!(window.substring_len(6, 3).is_err());
        assert!(window.substring(8).is_err());
    }

    #[test]
    fn test_index_of() {
        let window = SequenceWindow::full(SEQ).unwrap();
        let needle_seq = b"CGG";
        let needle = SequenceWindow::full(&needle_seq[..]).unwrap();
        assert_eq!(window.index_of(&needle), Some(5));

        let acg = SequenceWindow::new(SEQ, 0, 2).unwrap();
        assert_eq!(window.index_of(&acg), Some(0));
        assert_eq!(window.index_of_by(&acg, 1, |a, b| a == b), Some(4));
        assert_eq!(window.index_of_by(&acg, 5, |a, b| a == b), None);

        // Result is relative to the searched window
        let tail = window.substring(3).unwrap();
        assert_eq!(tail.index_of(&acg), Some(1));
    }

    #[test]
    fn test_index_of_longer_needle() {
        let short = SequenceWindow::new(SEQ, 0, 1).unwrap();
        let long = SequenceWindow::full(SEQ).unwrap();
        assert_eq!(short.index_of(&long), None);
    }

    #[test]
    fn test_iteration_is_restartable() {
        let window = SequenceWindow::new(SEQ, 8, 11).unwrap();
        let first: Vec<u8> = window.iter().copied().collect();
        let second: Vec<u8> = (&window).into_iter().copied().collect();
        assert_eq!(first, b"TTCA");
        assert_eq!(first, second);
    }
}
