//! Similarity metric for perceptual hashes.
//!
//! Perceptual hashes travel through the registry as bit strings (`"0110..."`).
//! Two hashes are compared position by position; the number of differing
//! positions is the Hamming distance. A small distance means visually similar
//! content.
//!
//! # Usage
//!
//! ```
//! use imprint_core::similarity::{hamming_distance, is_within};
//!
//! let distance = hamming_distance("1100", "1010").unwrap();
//! assert_eq!(distance, 2);
//!
//! // Strings of different length are never similar.
//! assert!(!is_within("1100", "110", 10));
//! ```

use crate::error::{RegistryError, Result};

/// Default maximum Hamming distance (in bits) for two hashes to count as the
/// same work. Tuned for 1024-bit descriptors.
pub const DEFAULT_SIMILARITY_THRESHOLD: u32 = 10;

/// Compute the Hamming distance between two equal-length bit strings.
///
/// Positions are characters, not bytes, so a multi-byte character counts as a
/// single position.
///
/// # Errors
///
/// Returns [`RegistryError::LengthMismatch`] when the strings differ in
/// character count or either one is empty. Callers treat that as "not
/// comparable", which is never a match.
pub fn hamming_distance(a: &str, b: &str) -> Result<u32> {
    let (left, right) = (a.chars().count(), b.chars().count());
    if left == 0 || right == 0 || left != right {
        return Err(RegistryError::LengthMismatch { left, right });
    }

    let distance = a
        .chars()
        .zip(b.chars())
        .filter(|(left, right)| left != right)
        .count();

    Ok(distance as u32)
}

/// Whether two hashes are within `threshold` of each other.
///
/// Incomparable hashes (length mismatch, empty input) are treated as
/// infinitely far apart.
pub fn is_within(a: &str, b: &str, threshold: u32) -> bool {
    hamming_distance(a, b).is_ok_and(|distance| distance <= threshold)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_threshold() {
        assert_eq!(DEFAULT_SIMILARITY_THRESHOLD, 10);
    }

    #[test]
    fn test_hamming_distance_identical() {
        assert_eq!(hamming_distance("10101010", "10101010"), Ok(0));
    }

    #[test]
    fn test_hamming_distance_all_different() {
        assert_eq!(hamming_distance("00000000", "11111111"), Ok(8));
    }

    #[test]
    fn test_hamming_distance_partial() {
        assert_eq!(hamming_distance("0000", "0100"), Ok(1));
        assert_eq!(hamming_distance("P1", "P3"), Ok(1));
    }

    #[test]
    fn test_hamming_distance_symmetric() {
        let pairs = [("0011", "0101"), ("1111", "0000"), ("1001", "1001")];
        for (a, b) in pairs {
            assert_eq!(hamming_distance(a, b), hamming_distance(b, a));
        }
    }

    #[test]
    fn test_hamming_distance_length_mismatch() {
        assert_eq!(
            hamming_distance("0000", "00000"),
            Err(RegistryError::LengthMismatch { left: 4, right: 5 })
        );
    }

    #[test]
    fn test_hamming_distance_counts_characters() {
        // "é0" and "000" are both three bytes long
        assert_eq!(
            hamming_distance("é0", "000"),
            Err(RegistryError::LengthMismatch { left: 2, right: 3 })
        );
        assert_eq!(hamming_distance("é0", "a0"), Ok(1));
        assert!(!is_within("é0", "000", u32::MAX));
    }

    #[test]
    fn test_hamming_distance_empty() {
        assert!(hamming_distance("", "").is_err());
        assert!(hamming_distance("", "01").is_err());
        assert!(hamming_distance("01", "").is_err());
    }

    #[test]
    fn test_is_within_boundary() {
        let base = "0".repeat(32);
        let at_threshold = format!("{}{}", "1".repeat(10), "0".repeat(22));
        let past_threshold = format!("{}{}", "1".repeat(11), "0".repeat(21));

        assert!(is_within(&base, &at_threshold, 10));
        assert!(!is_within(&base, &past_threshold, 10));
    }

    #[test]
    fn test_is_within_rejects_mismatch() {
        assert!(!is_within("0000", "000", u32::MAX));
    }
}
