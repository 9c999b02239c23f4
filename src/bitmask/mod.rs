// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Bitsets used as coordinate-support indicators.
//!
//! Bit i is set if coordinate i belongs to the set. There are three flavours
//! behind one trait: [`Bitmask1`] (one machine word), [`Bitmask2`] (two words)
//! and [`HeapBitmask`] (any length). Enumeration code is written generically
//! over [`Bitmask`] and the [`dispatch_bitmask!`] macro picks the smallest
//! flavour that holds the required number of bits at runtime.
//!
//! # Examples
//!
//! ```
//! use normal_kernel::bitmask::{Bitmask, Bitmask1};
//!
//! let mut a = Bitmask1::with_len(10);
//! a.set(2, true);
//! a.set(7, true);
//! let mut b = a.clone();
//! b.set(9, true);
//!
//! assert!(a.is_subset_of(&b));
//! assert!(!b.is_subset_of(&a));
//! assert_eq!(b.count(), 3);
//! ```

pub mod fixed;
pub mod heap;

pub use fixed::{Bitmask1, Bitmask2};
pub use heap::HeapBitmask;

use std::fmt::Debug;
use std::hash::Hash;

/// Common interface of all bitmask flavours.
pub trait Bitmask: Clone + Debug + PartialEq + Eq + Hash + Send + Sync {
    /// An empty mask able to hold `len` bits.
    ///
    /// # Panics
    ///
    /// Fixed-width flavours panic if `len` exceeds their width.
    fn with_len(len: usize) -> Self;

    fn get(&self, index: usize) -> bool;

    fn set(&mut self, index: usize, value: bool);

    /// In-place union.
    fn union_assign(&mut self, other: &Self);

    /// In-place intersection.
    fn intersect_assign(&mut self, other: &Self);

    /// `self ≤ other` in the subset order.
    fn is_subset_of(&self, other: &Self) -> bool;

    /// Population count.
    fn count(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.count() == 0
    }

    /// Whether `|(self ∪ other) ∩ mask| <= 1`.
    fn union_meets_at_most_once(&self, other: &Self, mask: &Self) -> bool {
        let mut u = self.clone();
        u.union_assign(other);
        u.intersect_assign(mask);
        u.count() <= 1
    }

    /// Indices of the set bits, ascending, below `len`.
    fn ones(&self, len: usize) -> Vec<usize> {
        (0..len).filter(|&i| self.get(i)).collect()
    }
}

/// Calls a function generic over [`Bitmask`] with the smallest flavour that
/// holds `len` bits.
///
/// ```
/// use normal_kernel::bitmask::Bitmask;
/// use normal_kernel::dispatch_bitmask;
///
/// fn width<B: Bitmask>(len: usize) -> usize {
///     let mut b = B::with_len(len);
///     b.set(len - 1, true);
///     b.count()
/// }
///
/// assert_eq!(dispatch_bitmask!(200, width(200)), 1);
/// ```
#[macro_export]
macro_rules! dispatch_bitmask {
    ($len:expr, $func:ident ( $($arg:expr),* $(,)? )) => {{
        let len: usize = $len;
        if len <= 64 {
            $func::<$crate::bitmask::Bitmask1>($($arg),*)
        } else if len <= 128 {
            $func::<$crate::bitmask::Bitmask2>($($arg),*)
        } else {
            $func::<$crate::bitmask::HeapBitmask>($($arg),*)
        }
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exercise<B: Bitmask>(len: usize) {
        let mut a = B::with_len(len);
        assert!(a.is_empty());
        a.set(0, true);
        a.set(len - 1, true);
        assert!(a.get(len - 1));
        assert_eq!(a.ones(len), vec![0, len - 1]);

        let mut b = B::with_len(len);
        b.set(len / 2, true);
        assert!(!b.is_subset_of(&a));
        let mut c = a.clone();
        c.union_assign(&b);
        assert!(a.is_subset_of(&c) && b.is_subset_of(&c));
        assert_eq!(c.count(), 3);

        let mut mask = B::with_len(len);
        mask.set(0, true);
        mask.set(len / 2, true);
        assert!(!a.union_meets_at_most_once(&b, &mask));
        assert!(a.union_meets_at_most_once(&a, &mask));

        c.intersect_assign(&mask);
        assert_eq!(c.count(), 2);
        c.set(0, false);
        assert_eq!(c.ones(len), vec![len / 2]);
    }

    #[test]
    fn test_all_flavours() {
        exercise::<Bitmask1>(64);
        exercise::<Bitmask2>(128);
        exercise::<HeapBitmask>(300);
        exercise::<HeapBitmask>(7);
    }

    fn flavour<B: Bitmask>() -> &'static str {
        std::any::type_name::<B>()
    }

    #[test]
    fn test_dispatch_picks_smallest() {
        assert!(dispatch_bitmask!(10, flavour()).ends_with("Bitmask1"));
        assert!(dispatch_bitmask!(65, flavour()).ends_with("Bitmask2"));
        assert!(dispatch_bitmask!(129, flavour()).ends_with("HeapBitmask"));
    }
}
