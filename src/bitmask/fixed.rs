// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Fixed-width bitmasks of one and two machine words.

use super::Bitmask;

/// A bitmask of at most 64 bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Bitmask1(u64);

/// A bitmask of at most 128 bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Bitmask2(u128);

impl Bitmask1 {
    pub const WIDTH: usize = 64;

    pub const fn from_bits(bits: u64) -> Self {
        Self(bits)
    }

    pub fn bits(self) -> u64 {
        self.0
    }
}

impl Bitmask2 {
    pub const WIDTH: usize = 128;

    pub const fn from_bits(bits: u128) -> Self {
        Self(bits)
    }

    pub fn bits(self) -> u128 {
        self.0
    }
}

macro_rules! impl_fixed_bitmask {
    ($name:ident, $word:ty) => {
        impl Bitmask for $name {
            fn with_len(len: usize) -> Self {
                assert!(
                    len <= Self::WIDTH,
                    "{} cannot hold {} bits",
                    stringify!($name),
                    len
                );
                Self(0)
            }

            fn get(&self, index: usize) -> bool {
                (self.0 >> index) & 1 != 0
            }

            fn set(&mut self, index: usize, value: bool) {
                if value {
                    self.0 |= (1 as $word) << index;
                } else {
                    self.0 &= !((1 as $word) << index);
                }
            }

            fn union_assign(&mut self, other: &Self) {
                self.0 |= other.0;
            }

            fn intersect_assign(&mut self, other: &Self) {
                self.0 &= other.0;
            }

            fn is_subset_of(&self, other: &Self) -> bool {
                self.0 & !other.0 == 0
            }

            fn count(&self) -> usize {
                self.0.count_ones() as usize
            }

            fn is_empty(&self) -> bool {
                self.0 == 0
            }

            fn union_meets_at_most_once(&self, other: &Self, mask: &Self) -> bool {
                ((self.0 | other.0) & mask.0).count_ones() <= 1
            }
        }
    };
}

impl_fixed_bitmask!(Bitmask1, u64);
impl_fixed_bitmask!(Bitmask2, u128);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_high_bits() {
        let mut b = Bitmask2::with_len(128);
        b.set(127, true);
        b.set(64, true);
        assert_eq!(b.bits(), (1u128 << 127) | (1u128 << 64));
        b.set(127, false);
        assert_eq!(b.count(), 1);
    }

    #[test]
    #[should_panic(expected = "cannot hold")]
    fn test_too_wide() {
        let _ = Bitmask1::with_len(65);
    }

    #[test]
    fn test_from_bits() {
        let a = Bitmask1::from_bits(0b1010);
        let b = Bitmask1::from_bits(0b1110);
        assert!(a.is_subset_of(&b));
        assert_eq!(a.ones(4), vec![1, 3]);
    }
}
