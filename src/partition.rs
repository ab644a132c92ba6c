/// A contiguous slice of the keyspace assigned to one worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkRange {
    /// First ordinal index covered by this range.
    pub start: u128,
    /// Number of candidates in this range (may be zero).
    pub count: u128,
    /// Word length the indices refer to.
    pub word_length: usize,
}

impl WorkRange {
    /// One past the last index covered by this range.
    pub fn end(&self) -> u128 {
        self.start + self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

/// Split `total` combinations of `word_length` into `workers` contiguous
/// ranges.
///
/// Every range except possibly the last has size `ceil(total / workers)`;
/// the last is clipped to the remainder. Ranges are returned in increasing
/// `start` order and partition `[0, total)` exactly, with no gaps and no
/// overlap. When `total < workers`, trailing ranges are empty so that every
/// worker still receives a range.
pub fn partition(total: u128, workers: usize, word_length: usize) -> Vec<WorkRange> {
    assert!(workers > 0, "at least one worker required");

    let chunk = total.div_ceil(workers as u128);
    let mut ranges = Vec::with_capacity(workers);
    for i in 0..workers as u128 {
        let start = (i * chunk).min(total);
        let count = chunk.min(total - start);
        ranges.push(WorkRange {
            start,
            count,
            word_length,
        });
    }
    ranges
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Check the partition invariant: exact gap-free, overlap-free cover.
    fn assert_exact_cover(total: u128, workers: usize) {
        let ranges = partition(total, workers, 4);
        assert_eq!(ranges.len(), workers);

        let mut next = 0u128;
        for range in &ranges {
            assert_eq!(range.start, next.min(total));
            next = range.end();
        }
        assert_eq!(next, total, "ranges must cover [0, total) exactly");

        let sum: u128 = ranges.iter().map(|r| r.count).sum();
        assert_eq!(sum, total);
    }

    #[test]
    fn test_exact_cover() {
        for workers in 1..=13 {
            for total in [0u128, 1, 25, 26, 27, 100, 17_576, 456_976] {
                assert_exact_cover(total, workers);
            }
        }
    }

    #[test]
    fn test_even_split() {
        let ranges = partition(100, 4, 2);
        assert_eq!(ranges.len(), 4);
        for (i, range) in ranges.iter().enumerate() {
            assert_eq!(range.start, i as u128 * 25);
            assert_eq!(range.count, 25);
            assert_eq!(range.word_length, 2);
        }
    }

    #[test]
    fn test_last_range_clipped() {
        let ranges = partition(10, 3, 1);
        assert_eq!(ranges[0].count, 4);
        assert_eq!(ranges[1].count, 4);
        assert_eq!(ranges[2].count, 2);
    }

    #[test]
    fn test_fewer_combinations_than_workers() {
        let ranges = partition(3, 8, 1);
        assert_eq!(ranges.len(), 8);
        let sum: u128 = ranges.iter().map(|r| r.count).sum();
        assert_eq!(sum, 3);
        assert!(ranges[3..].iter().all(|r| r.is_empty()));
    }

    #[test]
    fn test_zero_total() {
        let ranges = partition(0, 4, 1);
        assert!(ranges.iter().all(|r| r.is_empty()));
    }

    #[test]
    fn test_huge_keyspace_does_not_overflow() {
        // 26^15 exceeds u64::MAX; the partitioner must stay in u128
        let total = 26u128.pow(15);
        let ranges = partition(total, 16, 15);
        let sum: u128 = ranges.iter().map(|r| r.count).sum();
        assert_eq!(sum, total);
        assert_eq!(ranges.last().unwrap().end(), total);
    }
}
