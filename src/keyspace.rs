/// The fixed search alphabet: the 26 lowercase ASCII letters, in order.
pub const ALPHABET: &[u8; 26] = b"abcdefghijklmnopqrstuvwxyz";

/// Radix of the keyspace (alphabet size).
pub const RADIX: u128 = ALPHABET.len() as u128;

/// Total number of candidate strings of the given length: 26^length.
///
/// Returns a u128 because 26^14 already exceeds `u64::MAX`.
pub fn combinations(length: usize) -> u128 {
    RADIX.pow(length as u32)
}

/// Write the `index`-th candidate of the given length into `buf`.
///
/// Ordering convention: index 0 is the lexicographically-first string
/// ("aa...a"), and incrementing the index ticks the rightmost character
/// first, odometer style ("aaa", "aab", ..., "aaz", "aba", ...). The
/// partitioner and the GPU kernel both rely on this exact mapping.
///
/// `buf.len()` is the word length; `index` must be < 26^len.
#[inline(always)]
pub fn nth_into(buf: &mut [u8], index: u128) {
    debug_assert!(index < combinations(buf.len()));
    let mut rem = index;
    for slot in buf.iter_mut().rev() {
        *slot = ALPHABET[(rem % RADIX) as usize];
        rem /= RADIX;
    }
}

/// The `index`-th candidate string of the given length.
///
/// O(length) mixed-radix expansion; no iteration over prior candidates, so
/// any worker can start at an arbitrary offset.
pub fn nth(length: usize, index: u128) -> String {
    let mut buf = vec![0u8; length];
    nth_into(&mut buf, index);
    // The buffer only ever holds ASCII letters
    String::from_utf8(buf).expect("alphabet is ASCII")
}

/// Inverse of [`nth`]: recover the ordinal index of a candidate string.
///
/// Returns `None` if the word contains characters outside the alphabet.
pub fn index_of(word: &str) -> Option<u128> {
    let mut index: u128 = 0;
    for byte in word.bytes() {
        if !byte.is_ascii_lowercase() {
            return None;
        }
        index = index * RADIX + (byte - b'a') as u128;
    }
    Some(index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_combinations() {
        assert_eq!(combinations(0), 1);
        assert_eq!(combinations(1), 26);
        assert_eq!(combinations(3), 17_576);
        // 26^15 does not fit in u64; sanity-check it computes at all
        assert_eq!(combinations(15), 26u128.pow(15));
    }

    #[test]
    fn test_ordering_convention() {
        assert_eq!(nth(3, 0), "aaa");
        assert_eq!(nth(3, 1), "aab");
        assert_eq!(nth(3, 25), "aaz");
        assert_eq!(nth(3, 26), "aba");
        assert_eq!(nth(3, combinations(3) - 1), "zzz");
    }

    #[test]
    fn test_empty_word() {
        // Length 0 has exactly one candidate: the empty string at index 0
        assert_eq!(combinations(0), 1);
        assert_eq!(nth(0, 0), "");
        assert_eq!(index_of(""), Some(0));
    }

    #[test]
    fn test_uniqueness_and_inverse() {
        for length in 1usize..=3 {
            let mut seen = HashSet::new();
            for index in 0..combinations(length) {
                let word = nth(length, index);
                assert_eq!(word.len(), length);
                assert!(seen.insert(word.clone()), "duplicate candidate {word}");
                assert_eq!(index_of(&word), Some(index));
            }
        }
    }

    #[test]
    fn test_index_of_rejects_foreign_characters() {
        assert_eq!(index_of("caB"), None);
        assert_eq!(index_of("c-b"), None);
        assert_eq!(index_of("über"), None);
    }

    #[test]
    fn test_nth_matches_sequential_order() {
        // Candidates enumerated by index are in strict lexicographic order
        let mut prev = nth(2, 0);
        for index in 1..combinations(2) {
            let next = nth(2, index);
            assert!(prev < next);
            prev = next;
        }
    }
}
