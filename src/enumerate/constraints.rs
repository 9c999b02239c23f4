// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Validity constraints of the form "at most one of these coordinates is non-zero".
//!
//! Coordinates are laid out in `n_blocks` blocks of `block_size`. A local
//! pattern lists positions within a block and becomes one constraint per
//! block; a global pattern becomes a single constraint covering those
//! positions in every block at once.
//!
//! # Examples
//!
//! ```
//! use normal_kernel::bitmask::{Bitmask, Bitmask1};
//! use normal_kernel::enumerate::ValidityConstraints;
//!
//! // Quadrilateral constraints in standard coordinates on two tetrahedra.
//! let mut c = ValidityConstraints::new(7, 2);
//! c.add_local(&[4, 5, 6]);
//! let masks: Vec<Bitmask1> = c.bitmasks(14);
//! assert_eq!(masks.len(), 2);
//! assert_eq!(masks[1].ones(14), vec![11, 12, 13]);
//! ```

use crate::bitmask::Bitmask;
use crate::maths::Integer;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidityConstraints {
    block_size: usize,
    n_blocks: usize,
    local: Vec<Vec<usize>>,
    global: Vec<Vec<usize>>,
}

impl ValidityConstraints {
    pub fn new(block_size: usize, n_blocks: usize) -> Self {
        Self {
            block_size,
            n_blocks,
            local: Vec::new(),
            global: Vec::new(),
        }
    }

    /// No constraints at all.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn block_size(&self) -> usize {
        self.block_size
    }

    pub fn n_blocks(&self) -> usize {
        self.n_blocks
    }

    pub fn is_empty(&self) -> bool {
        self.local.is_empty() && self.global.is_empty()
    }

    /// Adds a pattern applied separately within every block.
    pub fn add_local(&mut self, positions: &[usize]) {
        debug_assert!(positions.iter().all(|&p| p < self.block_size));
        self.local.push(positions.to_vec());
    }

    /// Adds a pattern applied across all blocks together.
    pub fn add_global(&mut self, positions: &[usize]) {
        debug_assert!(positions.iter().all(|&p| p < self.block_size));
        self.global.push(positions.to_vec());
    }

    /// The number of constraints once patterns are expanded.
    pub fn count(&self) -> usize {
        self.local.len() * self.n_blocks + self.global.len()
    }

    /// One coordinate set per expanded constraint, local constraints first
    /// (block by block), then global. Positions at or beyond `len` are dropped;
    /// coordinates beyond the block model are never constrained.
    pub fn coordinate_sets(&self) -> Vec<Vec<usize>> {
        let mut sets = Vec::with_capacity(self.count());
        for pattern in &self.local {
            for block in 0..self.n_blocks {
                sets.push(
                    pattern
                        .iter()
                        .map(|p| block * self.block_size + p)
                        .collect(),
                );
            }
        }
        for pattern in &self.global {
            sets.push(
                (0..self.n_blocks)
                    .flat_map(|block| pattern.iter().map(move |p| block * self.block_size + p))
                    .collect(),
            );
        }
        sets
    }

    /// The constraints as bitmasks of length `len`.
    pub fn bitmasks<B: Bitmask>(&self, len: usize) -> Vec<B> {
        self.coordinate_sets()
            .into_iter()
            .map(|set| {
                let mut mask = B::with_len(len);
                for i in set.into_iter().filter(|&i| i < len) {
                    mask.set(i, true);
                }
                mask
            })
            .collect()
    }

    /// Whether `v` has at most one non-zero coordinate in every constraint.
    pub fn is_satisfied_by(&self, v: &[Integer]) -> bool {
        self.coordinate_sets().iter().all(|set| {
            set.iter()
                .filter(|&&i| v.get(i).is_some_and(|x| !x.is_zero()))
                .count()
                <= 1
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitmask::HeapBitmask;
    use crate::maths::vector::from_i64s;

    #[test]
    fn test_global_pattern() {
        let mut c = ValidityConstraints::new(3, 3);
        c.add_global(&[2]);
        assert_eq!(c.coordinate_sets(), vec![vec![2, 5, 8]]);
        assert!(c.is_satisfied_by(&from_i64s(&[1, 1, 0, 0, 0, 3, 0, 0, 0])));
        assert!(!c.is_satisfied_by(&from_i64s(&[0, 0, 1, 0, 0, 3, 0, 0, 0])));
    }

    #[test]
    fn test_extended_length() {
        let mut c = ValidityConstraints::new(2, 2);
        c.add_local(&[0, 1]);
        let masks: Vec<HeapBitmask> = c.bitmasks(5);
        assert_eq!(masks.len(), 2);
        assert_eq!(masks[1].ones(5), vec![2, 3]);
        assert!(!masks[1].get(4));
    }

    #[test]
    fn test_none() {
        let c = ValidityConstraints::none();
        assert!(c.is_empty());
        assert_eq!(c.count(), 0);
        assert!(c.is_satisfied_by(&from_i64s(&[1, 2, 3])));
    }
}
