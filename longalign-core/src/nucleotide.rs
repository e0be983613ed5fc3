//! Nucleotide helpers for aligning against the opposite strand

/// Get complement of a single nucleotide
pub fn complement_nucleotide(nucleotide: u8) -> u8 {
    match nucleotide.to_ascii_uppercase() {
        b'A' => b'T',
        b'T' => b'A',
        b'C' => b'G',
        b'G' => b'C',
        _ => nucleotide, // N and other symbols pair with themselves
    }
}

/// Generate reverse complement of a sequence
pub fn reverse_complement(sequence: &[u8]) -> Vec<u8> {
    sequence
        .iter()
        .rev()
        .map(|&nucleotide| complement_nucleotide(nucleotide))
        .collect()
}

/// Watson-Crick pairing, case-insensitive. Usable as the element equality
/// of [`crate::LongSequenceAligner::align_by`].
pub fn is_complement(a: &u8, b: &u8) -> bool {
    complement_nucleotide(*a) == b.to_ascii_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reverse_complement() {
        assert_eq!(reverse_complement(b"AACGTN"), b"NACGTT");
        assert_eq!(reverse_complement(b"acgt"), b"ACGT");
        assert!(reverse_complement(b"").is_empty());
    }

    #[test]
    fn test_is_complement() {
        assert!(is_complement(&b'A', &b'T'));
        assert!(is_complement(&b'g', &b'C'));
        assert!(!is_complement(&b'A', &b'A'));
        assert!(is_complement(&b'N', &b'N'));
    }
}
