// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Hilbert bases by the dual method.
//!
//! The Hilbert basis of the orthant is its unit vectors. Each hyperplane `h`
//! is then cut in by completion: the current basis is split by the sign of
//! `h . v`, and sums of opposite-sign elements are added whenever they cannot
//! be reduced by an element already present. A vector `w` reduces by `u` when
//! `u <= w` componentwise and `h . u` lies between zero and `h . w`. When no
//! new element appears, the elements on the hyperplane generate the lattice
//! points of the smaller cone, and the minimal ones among them form its
//! Hilbert basis.
//!
//! # Examples
//!
//! ```
//! use normal_kernel::enumerate::{enumerate_hilbert_basis, EnumerationOptions, ValidityConstraints};
//! use normal_kernel::maths::{Integer, MatrixInt};
//!
//! // 2 x0 = x1 + x2 has Hilbert basis (1,2,0), (1,1,1), (1,0,2).
//! let a = MatrixInt::from_rows(&[&[2, -1, -1]]).unwrap();
//! let basis = enumerate_hilbert_basis(&a, &ValidityConstraints::none(), &EnumerationOptions::default(), None);
//! assert_eq!(basis.results.len(), 3);
//! ```

use std::collections::VecDeque;

use tracing::{debug, info, warn};

use super::progress::cancelled;
use super::{hyperplane_rows, supports_compatible, EnumerationOptions, EnumerationOutcome, Supported};
use super::{ProgressTracker, ValidityConstraints};
use crate::bitmask::Bitmask;
use crate::dispatch_bitmask;
use crate::maths::{vector, Integer, MatrixInt};

/// How many candidate sums to examine between cancellation polls.
const POLL_INTERVAL: usize = 4096;

/// Enumerates the Hilbert basis of the lattice points of
/// `{x >= 0 : subspace * x = 0}` satisfying every validity constraint.
/// The list is sorted.
pub fn enumerate_hilbert_basis(
    subspace: &MatrixInt,
    constraints: &ValidityConstraints,
    options: &EnumerationOptions,
    tracker: Option<&ProgressTracker>,
) -> EnumerationOutcome<Vec<Integer>> {
    dispatch_bitmask!(
        subspace.cols(),
        run_hilbert_dual(subspace, constraints, options, tracker)
    )
}

#[derive(Debug, Clone)]
struct Element<B: Bitmask> {
    vec: Supported<B>,
    value: Integer,
}

fn run_hilbert_dual<B: Bitmask>(
    subspace: &MatrixInt,
    constraints: &ValidityConstraints,
    options: &EnumerationOptions,
    tracker: Option<&ProgressTracker>,
) -> EnumerationOutcome<Vec<Integer>> {
    let dim = subspace.cols();
    let masks: Vec<B> = constraints.bitmasks(dim);
    let mut basis: Vec<Supported<B>> = (0..dim).map(|i| Supported::unit(dim, i)).collect();

    let (initial, rest) = hyperplane_rows(subspace, options.initial_rows);
    let rows: Vec<usize> = initial.into_iter().chain(rest).collect();

    for (step, &row) in rows.iter().enumerate() {
        if cancelled(tracker) {
            warn!(step, total = rows.len(), "hilbert basis enumeration cancelled");
            return EnumerationOutcome::cancelled(Vec::new());
        }
        match complete_hyperplane(subspace.row(row), basis, &masks, tracker) {
            Some(next) => basis = next,
            None => {
                warn!(step, total = rows.len(), "hilbert basis enumeration cancelled");
                return EnumerationOutcome::cancelled(Vec::new());
            }
        }
        debug!(step, row, basis = basis.len(), "processed hyperplane");
        if let Some(t) = tracker {
            t.set_fraction((step + 1) as f64 / rows.len().max(1) as f64);
        }
    }

    let mut results: Vec<Vec<Integer>> = basis.into_iter().map(|v| v.coords).collect();
    results.sort();
    info!(dim, hyperplanes = rows.len(), basis = results.len(), "hilbert basis enumeration complete");
    if let Some(t) = tracker {
        t.set_finished();
    }
    EnumerationOutcome::complete(results)
}

/// `u <= w` in every coordinate.
fn dominated(u: &[Integer], w: &[Integer]) -> bool {
    u.iter().zip(w).all(|(a, b)| a <= b)
}

/// Whether `w` (with `h . w == value`) is reducible by some element of `list`.
fn reducible<B: Bitmask>(w: &Supported<B>, value: &Integer, list: &[Element<B>]) -> bool {
    list.iter().any(|u| {
        let in_range = match value.signum() {
            1 => !u.value.is_negative() && u.value <= *value,
            -1 => !u.value.is_positive() && u.value >= *value,
            _ => u.value.is_zero(),
        };
        in_range && u.vec.support.is_subset_of(&w.support) && dominated(&u.vec.coords, &w.coords)
    })
}

/// Runs completion for one hyperplane. Returns `None` if cancelled.
fn complete_hyperplane<B: Bitmask>(
    h: &[Integer],
    basis: Vec<Supported<B>>,
    masks: &[B],
    tracker: Option<&ProgressTracker>,
) -> Option<Vec<Supported<B>>> {
    let mut pos: Vec<Element<B>> = Vec::new();
    let mut neg: Vec<Element<B>> = Vec::new();
    let mut zero: Vec<Element<B>> = Vec::new();
    for v in basis {
        let value = vector::dot(h, &v.coords);
        let e = Element { vec: v, value };
        match e.value.signum() {
            1 => pos.push(e),
            -1 => neg.push(e),
            _ => zero.push(e),
        }
    }

    let mut queue: VecDeque<(usize, usize)> = (0..pos.len())
        .flat_map(|p| (0..neg.len()).map(move |n| (p, n)))
        .collect();
    let mut examined = 0usize;

    while let Some((p, n)) = queue.pop_front() {
        examined += 1;
        if examined % POLL_INTERVAL == 0 && cancelled(tracker) {
            return None;
        }
        if !supports_compatible(&pos[p].vec.support, &neg[n].vec.support, masks) {
            continue;
        }
        let coords: Vec<Integer> = pos[p]
            .vec
            .coords
            .iter()
            .zip(&neg[n].vec.coords)
            .map(|(a, b)| a + b)
            .collect();
        let value = &pos[p].value + &neg[n].value;
        let sum = Supported::new(coords);

        match value.signum() {
            1 => {
                if reducible(&sum, &value, &pos) || reducible(&sum, &value, &zero) {
                    continue;
                }
                let i = pos.len();
                queue.extend((0..neg.len()).map(|n| (i, n)));
                pos.push(Element { vec: sum, value });
            }
            -1 => {
                if reducible(&sum, &value, &neg) || reducible(&sum, &value, &zero) {
                    continue;
                }
                let j = neg.len();
                queue.extend((0..pos.len()).map(|p| (p, j)));
                neg.push(Element { vec: sum, value });
            }
            _ => {
                if reducible(&sum, &value, &zero) {
                    continue;
                }
                zero.push(Element { vec: sum, value });
            }
        }
    }

    Some(minimal_elements(zero))
}

/// Drops every element dominated by a different element of the list.
fn minimal_elements<B: Bitmask>(elements: Vec<Element<B>>) -> Vec<Supported<B>> {
    let keep: Vec<bool> = (0..elements.len())
        .map(|i| {
            !elements.iter().enumerate().any(|(j, u)| {
                j != i
                    && u.vec.support.is_subset_of(&elements[i].vec.support)
                    && dominated(&u.vec.coords, &elements[i].vec.coords)
                    && (u.vec.coords != elements[i].vec.coords || j < i)
            })
        })
        .collect();
    elements
        .into_iter()
        .zip(keep)
        .filter(|(_, k)| *k)
        .map(|(e, _)| e.vec)
        .collect()
}
