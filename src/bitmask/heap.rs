// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Heap-backed bitmask of any length.

use super::Bitmask;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct HeapBitmask {
    words: Vec<u64>,
}

impl HeapBitmask {
    fn word_count(len: usize) -> usize {
        len.div_ceil(64).max(1)
    }
}

impl Bitmask for HeapBitmask {
    fn with_len(len: usize) -> Self {
        Self {
            words: vec![0; Self::word_count(len)],
        }
    }

    fn get(&self, index: usize) -> bool {
        self.words
            .get(index / 64)
            .is_some_and(|w| (w >> (index % 64)) & 1 != 0)
    }

    fn set(&mut self, index: usize, value: bool) {
        let word = &mut self.words[index / 64];
        if value {
            *word |= 1 << (index % 64);
        } else {
            *word &= !(1 << (index % 64));
        }
    }

    fn union_assign(&mut self, other: &Self) {
        for (a, b) in self.words.iter_mut().zip(&other.words) {
            *a |= b;
        }
    }

    fn intersect_assign(&mut self, other: &Self) {
        for (a, b) in self.words.iter_mut().zip(&other.words) {
            *a &= b;
        }
    }

    fn is_subset_of(&self, other: &Self) -> bool {
        self.words
            .iter()
            .zip(&other.words)
            .all(|(a, b)| a & !b == 0)
    }

    fn count(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    fn union_meets_at_most_once(&self, other: &Self, mask: &Self) -> bool {
        let mut seen = 0;
        for ((a, b), m) in self.words.iter().zip(&other.words).zip(&mask.words) {
            seen += ((a | b) & m).count_ones();
            if seen > 1 {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_boundaries() {
        let mut b = HeapBitmask::with_len(130);
        for i in [0, 63, 64, 127, 128, 129] {
            b.set(i, true);
        }
        assert_eq!(b.count(), 6);
        assert!(b.get(64) && !b.get(65));
        assert!(!b.get(10_000));
    }
}
