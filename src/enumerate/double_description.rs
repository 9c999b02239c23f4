// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Extreme rays by the double description method.
//!
//! Starting from the unit rays of the orthant, hyperplanes are intersected
//! one at a time. Rays on the hyperplane survive; each adjacent pair of rays
//! on opposite sides is combined into a new ray on it. Two rays are adjacent
//! when no third ray has support inside the union of their supports, which
//! is a bitmask subset test. Pairs whose joint support breaks a validity
//! constraint are dropped at once, because supports only grow under
//! combination.
//!
//! # Examples
//!
//! ```
//! use normal_kernel::enumerate::{enumerate_extreme_rays, EnumerationOptions, ValidityConstraints};
//! use normal_kernel::maths::{Integer, MatrixInt};
//!
//! // x0 + x1 = x2 in the non-negative orthant of R^3.
//! let a = MatrixInt::from_rows(&[&[1, 1, -1]]).unwrap();
//! let rays = enumerate_extreme_rays(&a, &ValidityConstraints::none(), &EnumerationOptions::default(), None);
//! assert_eq!(rays.results.len(), 2);
//! assert!(rays.results.contains(&vec![Integer::new(1), Integer::new(0), Integer::new(1)]));
//! ```

use tracing::{debug, info, warn};

use super::progress::cancelled;
use super::{hyperplane_rows, supports_compatible, EnumerationOptions, EnumerationOutcome, Supported};
use super::{ProgressTracker, ValidityConstraints};
use crate::bitmask::Bitmask;
use crate::dispatch_bitmask;
use crate::maths::{scale_down, vector, Integer, MatrixInt};

#[cfg(parallel_enum)]
use rayon::prelude::*;

/// Enumerates the extreme rays of `{x >= 0 : subspace * x = 0}` that satisfy
/// every validity constraint. Each ray is returned as a primitive integer
/// vector; the list is sorted.
pub fn enumerate_extreme_rays(
    subspace: &MatrixInt,
    constraints: &ValidityConstraints,
    options: &EnumerationOptions,
    tracker: Option<&ProgressTracker>,
) -> EnumerationOutcome<Vec<Integer>> {
    dispatch_bitmask!(
        subspace.cols(),
        run_double_description(subspace, constraints, options, tracker)
    )
}

fn run_double_description<B: Bitmask>(
    subspace: &MatrixInt,
    constraints: &ValidityConstraints,
    options: &EnumerationOptions,
    tracker: Option<&ProgressTracker>,
) -> EnumerationOutcome<Vec<Integer>> {
    let dim = subspace.cols();
    let masks: Vec<B> = constraints.bitmasks(dim);
    let mut rays: Vec<Supported<B>> = (0..dim).map(|i| Supported::unit(dim, i)).collect();

    let (initial, mut remaining) = hyperplane_rows(subspace, options.initial_rows);
    let total = initial.len() + remaining.len();
    let mut initial = initial.into_iter();

    for step in 0..total {
        if cancelled(tracker) {
            warn!(step, total, "double description cancelled");
            return EnumerationOutcome::cancelled(Vec::new());
        }
        let row = match initial.next() {
            Some(r) => r,
            None => {
                let pick = best_hyperplane(subspace, &remaining, &rays);
                remaining.swap_remove(pick)
            }
        };
        rays = intersect_hyperplane(subspace.row(row), rays, &masks, options.parallel);
        debug!(step, row, rays = rays.len(), "processed hyperplane");
        if let Some(t) = tracker {
            t.set_fraction((step + 1) as f64 / total.max(1) as f64);
        }
    }

    let mut results: Vec<Vec<Integer>> = rays.into_iter().map(|r| r.coords).collect();
    results.sort();
    info!(dim, hyperplanes = total, rays = results.len(), "extreme ray enumeration complete");
    if let Some(t) = tracker {
        t.set_finished();
    }
    EnumerationOutcome::complete(results)
}

/// Signs of `h . r` over all current rays: (positive, negative, zero) counts.
fn sign_counts<B: Bitmask>(h: &[Integer], rays: &[Supported<B>]) -> (usize, usize, usize) {
    let mut counts = (0, 0, 0);
    for r in rays {
        match vector::dot(h, &r.coords).signum() {
            1 => counts.0 += 1,
            -1 => counts.1 += 1,
            _ => counts.2 += 1,
        }
    }
    counts
}

/// Index into `remaining` of the hyperplane creating the fewest candidate
/// pairs, preferring those that already contain many rays.
fn best_hyperplane<B: Bitmask>(subspace: &MatrixInt, remaining: &[usize], rays: &[Supported<B>]) -> usize {
    let mut best = 0;
    let mut best_key = (usize::MAX, 0usize, usize::MAX);
    for (i, &row) in remaining.iter().enumerate() {
        let (pos, neg, zero) = sign_counts(subspace.row(row), rays);
        let key = (pos * neg, usize::MAX - zero, row);
        if key < best_key {
            best_key = key;
            best = i;
        }
    }
    best
}

/// Whether no ray other than `a` and `b` has support inside `a ∪ b`.
fn adjacent<B: Bitmask>(a: usize, b: usize, rays: &[Supported<B>]) -> bool {
    let mut joint = rays[a].support.clone();
    joint.union_assign(&rays[b].support);
    !rays
        .iter()
        .enumerate()
        .any(|(i, r)| i != a && i != b && r.support.is_subset_of(&joint))
}

fn intersect_hyperplane<B: Bitmask>(
    h: &[Integer],
    rays: Vec<Supported<B>>,
    masks: &[B],
    parallel: bool,
) -> Vec<Supported<B>> {
    let values: Vec<Integer> = rays.iter().map(|r| vector::dot(h, &r.coords)).collect();
    let pos: Vec<usize> = (0..rays.len()).filter(|&i| values[i].is_positive()).collect();
    let neg: Vec<usize> = (0..rays.len()).filter(|&i| values[i].is_negative()).collect();

    let combine = |p: usize, n: usize| -> Option<Supported<B>> {
        if !supports_compatible(&rays[p].support, &rays[n].support, masks) {
            return None;
        }
        if !adjacent(p, n, &rays) {
            return None;
        }
        let mut coords = vector::combine(&values[n].abs(), &rays[p].coords, &values[p].abs(), &rays[n].coords);
        scale_down(&mut coords);
        Some(Supported::new(coords))
    };

    let created: Vec<Supported<B>> = combine_all(&pos, &neg, &combine, parallel);

    let mut next: Vec<Supported<B>> = rays
        .into_iter()
        .zip(values.iter())
        .filter(|(_, v)| v.is_zero())
        .map(|(r, _)| r)
        .collect();
    next.extend(created);
    next
}

/// Applies `combine` to every pair in `pos × neg`, keeping the successes.
#[cfg(parallel_enum)]
pub(crate) fn combine_all<T, F>(pos: &[usize], neg: &[usize], combine: &F, parallel: bool) -> Vec<T>
where
    T: Send,
    F: Fn(usize, usize) -> Option<T> + Sync,
{
    if parallel {
        pos.par_iter()
            .flat_map_iter(|&p| neg.iter().filter_map(move |&n| combine(p, n)))
            .collect()
    } else {
        combine_serial(pos, neg, combine)
    }
}

#[cfg(not(parallel_enum))]
pub(crate) fn combine_all<T, F>(pos: &[usize], neg: &[usize], combine: &F, _parallel: bool) -> Vec<T>
where
    T: Send,
    F: Fn(usize, usize) -> Option<T> + Sync,
{
    combine_serial(pos, neg, combine)
}

fn combine_serial<T, F>(pos: &[usize], neg: &[usize], combine: &F) -> Vec<T>
where
    F: Fn(usize, usize) -> Option<T>,
{
    pos.iter()
        .flat_map(|&p| neg.iter().filter_map(move |&n| combine(p, n)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maths::vector::from_i64s;

    fn rays_of(rows: &[&[i64]], constraints: &ValidityConstraints, parallel: bool) -> Vec<Vec<Integer>> {
        let a = MatrixInt::from_rows(rows).unwrap();
        let options = EnumerationOptions {
            initial_rows: 0,
            parallel,
        };
        let out = enumerate_extreme_rays(&a, constraints, &options, None);
        assert!(!out.cancelled);
        out.results
    }

    #[test]
    fn test_no_hyperplanes_gives_unit_rays() {
        let a = MatrixInt::new(0, 3);
        let out = enumerate_extreme_rays(&a, &ValidityConstraints::none(), &EnumerationOptions::default(), None);
        assert_eq!(out.results.len(), 3);
    }

    #[test]
    fn test_square_cone() {
        // x0 + x1 = x2 + x3: the cone over a square, four extreme rays.
        let rays = rays_of(&[&[1, 1, -1, -1]], &ValidityConstraints::none(), false);
        assert_eq!(
            rays,
            vec![
                from_i64s(&[0, 1, 0, 1]),
                from_i64s(&[0, 1, 1, 0]),
                from_i64s(&[1, 0, 0, 1]),
                from_i64s(&[1, 0, 1, 0]),
            ]
        );
    }

    #[test]
    fn test_rays_are_primitive() {
        let rays = rays_of(&[&[2, -3, 0], &[0, 2, -6]], &ValidityConstraints::none(), false);
        assert_eq!(rays, vec![from_i64s(&[9, 6, 2])]);
    }

    #[test]
    fn test_constraint_removes_rays() {
        let mut c = ValidityConstraints::new(4, 1);
        c.add_local(&[0, 1]);
        let rays = rays_of(&[&[1, 1, -1, -1]], &c, false);
        assert_eq!(rays.len(), 4);
        c.add_local(&[2, 3]);
        // Constraint sets {0,1} and {2,3} do not forbid any single ray above.
        assert_eq!(rays_of(&[&[1, 1, -1, -1]], &c, false).len(), 4);
        let mut c = ValidityConstraints::new(4, 1);
        c.add_local(&[0, 2]);
        let rays = rays_of(&[&[1, 1, -1, -1]], &c, false);
        assert!(!rays.contains(&from_i64s(&[1, 0, 1, 0])));
        assert_eq!(rays.len(), 3);
    }

    #[test]
    fn test_parallel_matches_serial() {
        let rows: &[&[i64]] = &[&[1, 1, -1, -1, 0, 0], &[0, 1, 1, 0, -1, -1]];
        assert_eq!(
            rays_of(rows, &ValidityConstraints::none(), false),
            rays_of(rows, &ValidityConstraints::none(), true)
        );
    }

    #[test]
    fn test_cancelled_before_start() {
        let a = MatrixInt::from_rows(&[&[1, -1]]).unwrap();
        let tracker = ProgressTracker::new();
        tracker.cancel();
        let out = enumerate_extreme_rays(&a, &ValidityConstraints::none(), &EnumerationOptions::default(), Some(&tracker));
        assert!(out.cancelled);
        assert!(out.results.is_empty());
    }
}
