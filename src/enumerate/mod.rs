// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Enumeration over cones of the form (non-negative orthant) ∩ (linear subspace).
//!
//! The subspace is given as a matrix whose rows are hyperplane normals.
//! Validity constraints restrict which coordinates may be simultaneously
//! non-zero, and are enforced during enumeration rather than afterwards.
//!
//! ## Module Structure
//!
//! - `constraints`: "At most one non-zero coordinate" constraint sets
//! - `double_description`: Extreme rays by the double description method
//! - `hilbert_dual`: Hilbert bases by the dual (completion) method
//! - `progress`: Progress tracking and cancellation

pub mod constraints;
pub mod double_description;
pub mod hilbert_dual;
pub mod progress;

pub use constraints::ValidityConstraints;
pub use double_description::enumerate_extreme_rays;
pub use hilbert_dual::enumerate_hilbert_basis;
pub use progress::ProgressTracker;

use crate::bitmask::Bitmask;
use crate::maths::Integer;

/// Options shared by the enumeration algorithms.
#[derive(Debug, Clone, Default)]
pub struct EnumerationOptions {
    /// Number of leading hyperplanes to process in the order given before
    /// the remainder are processed in heuristic order.
    pub initial_rows: usize,
    /// Split pair combination across the rayon thread pool.
    pub parallel: bool,
}

/// The results of an enumeration, with whether it was cut short.
///
/// Every result present is valid. After cancellation the list holds only
/// what had been finalised before the request was observed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumerationOutcome<T> {
    pub results: Vec<T>,
    pub cancelled: bool,
}

impl<T> EnumerationOutcome<T> {
    pub fn complete(results: Vec<T>) -> Self {
        Self {
            results,
            cancelled: false,
        }
    }

    pub fn cancelled(results: Vec<T>) -> Self {
        Self {
            results,
            cancelled: true,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> EnumerationOutcome<U> {
        EnumerationOutcome {
            results: self.results.into_iter().map(f).collect(),
            cancelled: self.cancelled,
        }
    }
}

/// A lattice vector together with its support.
#[derive(Debug, Clone)]
pub(crate) struct Supported<B: Bitmask> {
    pub coords: Vec<Integer>,
    pub support: B,
}

impl<B: Bitmask> Supported<B> {
    pub fn new(coords: Vec<Integer>) -> Self {
        let mut support = B::with_len(coords.len());
        for (i, x) in coords.iter().enumerate() {
            if !x.is_zero() {
                support.set(i, true);
            }
        }
        Self { coords, support }
    }

    pub fn unit(dim: usize, i: usize) -> Self {
        let mut coords = vec![Integer::ZERO; dim];
        coords[i] = Integer::ONE;
        Self::new(coords)
    }
}

/// Whether the union of two supports meets every constraint at most once.
pub(crate) fn supports_compatible<B: Bitmask>(a: &B, b: &B, masks: &[B]) -> bool {
    masks.iter().all(|m| a.union_meets_at_most_once(b, m))
}

/// Indices of the non-zero rows of `subspace`, ordered so that the first
/// `initial_rows` rows come first in their given order.
pub(crate) fn hyperplane_rows(subspace: &crate::maths::MatrixInt, initial_rows: usize) -> (Vec<usize>, Vec<usize>) {
    let live: Vec<usize> = (0..subspace.rows())
        .filter(|&r| subspace.row(r).iter().any(|x| !x.is_zero()))
        .collect();
    let split = live.iter().take_while(|&&r| r < initial_rows).count();
    let (initial, rest) = live.split_at(split);
    (initial.to_vec(), rest.to_vec())
}
