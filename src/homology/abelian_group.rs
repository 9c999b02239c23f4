// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Finitely generated abelian groups in canonical form.
//!
//! A group is stored as its rank together with its invariant factors
//! `d0 | d1 | ... | dn`, each greater than one. This form is unique for the
//! isomorphism type, so derived equality is isomorphism.
//!
//! # Examples
//!
//! ```
//! use normal_kernel::homology::AbelianGroup;
//! use normal_kernel::maths::{Integer, MatrixInt};
//!
//! // Two generators, relations 2a = 0 and 3b = 0.
//! let m = MatrixInt::from_rows(&[&[2, 0], &[0, 3]]).unwrap();
//! let g = AbelianGroup::from_presentation(&m);
//! assert!(g.is_zn(6));
//! assert_eq!(g.to_string(), "Z_6");
//! ```

use std::fmt;

use itertools::Itertools;
use tracing::debug;

use crate::error::{KernelError, Result};
use crate::maths::{Integer, MatrixInt};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct AbelianGroup {
    rank: usize,
    invariants: Vec<Integer>,
}

impl AbelianGroup {
    /// The trivial group.
    pub fn trivial() -> Self {
        Self::default()
    }

    /// The free abelian group of the given rank.
    pub fn free(rank: usize) -> Self {
        Self {
            rank,
            invariants: Vec::new(),
        }
    }

    /// A group from its rank and invariant factors.
    ///
    /// The factors must each exceed one and form a divisibility chain.
    pub fn from_invariants(rank: usize, invariants: Vec<Integer>) -> Result<Self> {
        for (i, d) in invariants.iter().enumerate() {
            if *d <= Integer::ONE || d.is_infinite() {
                return Err(KernelError::invalid_argument(format!(
                    "invariant factor {} must be a finite integer > 1",
                    d
                )));
            }
            if i > 0 && !d.is_divisible_by(&invariants[i - 1]) {
                return Err(KernelError::invalid_argument(format!(
                    "invariant factor {} does not divide {}",
                    invariants[i - 1],
                    d
                )));
            }
        }
        Ok(Self { rank, invariants })
    }

    /// The group with one generator per column of `m` and one relation per row.
    pub fn from_presentation(m: &MatrixInt) -> Self {
        let divisors = m.elementary_divisors();
        let rank = m.cols() - divisors.len();
        let invariants = divisors
            .into_iter()
            .filter(|d| *d > Integer::ONE)
            .collect();
        Self { rank, invariants }
    }

    /// The homology `ker(m) / im(n)` of the chain complex `--n--> --m-->`.
    ///
    /// The caller vouches that `m * n == 0`.
    pub fn from_chain_complex(m: &MatrixInt, n: &MatrixInt) -> Result<Self> {
        if m.cols() != n.rows() {
            return Err(KernelError::invalid_argument(format!(
                "chain complex size mismatch: {} columns against {} rows",
                m.cols(),
                n.rows()
            )));
        }
        let rank_m = m.rank();
        let divisors = n.elementary_divisors();
        let rank = m.cols() - rank_m - divisors.len();
        debug!(
            chain_rank = m.cols(),
            rank_m,
            rank_n = divisors.len(),
            "homology of chain complex"
        );
        let invariants = divisors
            .into_iter()
            .filter(|d| *d > Integer::ONE)
            .collect();
        Ok(Self { rank, invariants })
    }

    /// The homology `ker(m) / im(n)` with coefficients in `Z_p` for a prime `p`.
    ///
    /// The result is `(Z_p)^k`, stored as `k` invariant factors equal to `p`.
    pub fn from_chain_complex_mod(m: &MatrixInt, n: &MatrixInt, p: u64) -> Result<Self> {
        if m.cols() != n.rows() {
            return Err(KernelError::invalid_argument(format!(
                "chain complex size mismatch: {} columns against {} rows",
                m.cols(),
                n.rows()
            )));
        }
        if !is_prime(p) {
            return Err(KernelError::invalid_argument(format!("{} is not prime", p)));
        }
        let modulus = Integer::from(p as i64);
        let rank_mod = |x: &MatrixInt| {
            x.elementary_divisors()
                .iter()
                .filter(|d| !d.is_divisible_by(&modulus))
                .count()
        };
        let k = m.cols() - rank_mod(m) - rank_mod(n);
        Ok(Self {
            rank: 0,
            invariants: vec![modulus.clone(); k],
        })
    }

    pub fn rank(&self) -> usize {
        self.rank
    }

    /// The number of invariant factors divisible by `degree`.
    ///
    /// For a prime `degree` this is the rank of the `degree`-torsion.
    pub fn torsion_rank(&self, degree: &Integer) -> usize {
        self.invariants
            .iter()
            .filter(|d| d.is_divisible_by(degree))
            .count()
    }

    pub fn count_invariant_factors(&self) -> usize {
        self.invariants.len()
    }

    /// The `i`th invariant factor, smallest first.
    pub fn invariant_factor(&self, i: usize) -> &Integer {
        &self.invariants[i]
    }

    pub fn invariant_factors(&self) -> &[Integer] {
        &self.invariants
    }

    pub fn is_trivial(&self) -> bool {
        self.rank == 0 && self.invariants.is_empty()
    }

    pub fn is_z(&self) -> bool {
        self.rank == 1 && self.invariants.is_empty()
    }

    pub fn is_free(&self, rank: usize) -> bool {
        self.rank == rank && self.invariants.is_empty()
    }

    /// Whether this is `Z_n`. `Z_0` is `Z` and `Z_1` is trivial.
    pub fn is_zn(&self, n: u64) -> bool {
        match n {
            0 => self.is_z(),
            1 => self.is_trivial(),
            _ => {
                self.rank == 0
                    && self.invariants.len() == 1
                    && self.invariants[0] == Integer::from(n as i64)
            }
        }
    }

    pub fn add_rank(&mut self, extra: usize) {
        self.rank += extra;
    }

    /// Adds a summand `Z_d`. `d == 0` adds a free summand and `d == 1` is a no-op.
    pub fn add_torsion(&mut self, d: &Integer) -> Result<()> {
        if d.is_negative() || d.is_infinite() {
            return Err(KernelError::invalid_argument(format!(
                "cannot add torsion Z_{}",
                d
            )));
        }
        if d.is_zero() {
            self.rank += 1;
            return Ok(());
        }
        if *d == Integer::ONE {
            return Ok(());
        }
        let mut factors = self.invariants.clone();
        factors.push(d.clone());
        self.invariants = canonical_factors(&factors);
        Ok(())
    }

    /// Replaces this group by its direct sum with `other`.
    pub fn add_group(&mut self, other: &AbelianGroup) {
        self.rank += other.rank;
        if other.invariants.is_empty() {
            return;
        }
        let factors: Vec<Integer> = self
            .invariants
            .iter()
            .chain(other.invariants.iter())
            .cloned()
            .collect();
        self.invariants = canonical_factors(&factors);
    }
}

/// Invariant factors of `Z_f0 + Z_f1 + ...` for arbitrary positive `fi`.
fn canonical_factors(factors: &[Integer]) -> Vec<Integer> {
    let mut m = MatrixInt::new(factors.len(), factors.len());
    for (i, f) in factors.iter().enumerate() {
        m.set(i, i, f.clone());
    }
    m.elementary_divisors()
        .into_iter()
        .filter(|d| *d > Integer::ONE)
        .collect()
}

fn is_prime(p: u64) -> bool {
    p >= 2 && (2..).take_while(|&d| d <= p / d).all(|d| p % d != 0)
}

impl fmt::Display for AbelianGroup {
    /// Formats as `2 Z + Z_2 + 3 Z_6`, or `0` when trivial.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_trivial() {
            return write!(f, "0");
        }
        let mut parts = Vec::new();
        match self.rank {
            0 => {}
            1 => parts.push("Z".to_string()),
            r => parts.push(format!("{} Z", r)),
        }
        for (d, group) in &self.invariants.iter().chunk_by(|d| *d) {
            match group.count() {
                1 => parts.push(format!("Z_{}", d)),
                n => parts.push(format!("{} Z_{}", n, d)),
            }
        }
        write!(f, "{}", parts.join(" + "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn ints(values: &[i64]) -> Vec<Integer> {
        values.iter().map(|&v| Integer::new(v)).collect()
    }

    #[test]
    fn test_from_invariants_validates() {
        assert!(AbelianGroup::from_invariants(1, ints(&[2, 4])).is_ok());
        assert!(matches!(
            AbelianGroup::from_invariants(0, ints(&[2, 3])),
            Err(KernelError::InvalidArgument(_))
        ));
        assert!(AbelianGroup::from_invariants(0, ints(&[1])).is_err());
    }

    #[test]
    fn test_presentation_with_free_part() {
        let m = MatrixInt::from_rows(&[&[2, 0, 0], &[0, 4, 0]]).unwrap();
        let g = AbelianGroup::from_presentation(&m);
        assert_eq!(g.rank(), 1);
        assert_eq!(g.invariant_factors(), ints(&[2, 4]).as_slice());
        assert_eq!(g.torsion_rank(&Integer::new(2)), 2);
        assert_eq!(g.torsion_rank(&Integer::new(4)), 1);
        assert_eq!(g.to_string(), "Z + Z_2 + Z_4");
    }

    #[test]
    fn test_add_torsion_recanonicalises() {
        let mut g = AbelianGroup::from_invariants(0, ints(&[2])).unwrap();
        g.add_torsion(&Integer::new(3)).unwrap();
        assert!(g.is_zn(6));
        g.add_torsion(&Integer::new(2)).unwrap();
        assert_eq!(g.invariant_factors(), ints(&[2, 6]).as_slice());
        g.add_torsion(&Integer::ONE).unwrap();
        g.add_torsion(&Integer::ZERO).unwrap();
        assert_eq!(g.rank(), 1);
        assert!(g.add_torsion(&Integer::new(-2)).is_err());
    }

    #[test]
    fn test_add_group() {
        let mut g = AbelianGroup::from_invariants(1, ints(&[4])).unwrap();
        let h = AbelianGroup::from_invariants(2, ints(&[2, 2])).unwrap();
        g.add_group(&h);
        assert_eq!(g.rank(), 3);
        assert_eq!(g.invariant_factors(), ints(&[2, 2, 4]).as_slice());
        assert_eq!(g.to_string(), "3 Z + 2 Z_2 + Z_4");
    }

    #[test]
    fn test_chain_complex() {
        // Circle: one vertex, one edge with boundary zero.
        let d1 = MatrixInt::new(1, 1);
        let d2 = MatrixInt::new(1, 0);
        assert!(AbelianGroup::from_chain_complex(&d1, &d2).unwrap().is_z());

        // RP2 cellular chain complex: H1 = Z_2.
        let d1 = MatrixInt::new(1, 1);
        let d2 = MatrixInt::from_rows(&[&[2]]).unwrap();
        let g = AbelianGroup::from_chain_complex(&d1, &d2).unwrap();
        assert!(g.is_zn(2));
        let g2 = AbelianGroup::from_chain_complex_mod(&d1, &d2, 2).unwrap();
        assert!(g2.is_zn(2));
        let g3 = AbelianGroup::from_chain_complex_mod(&d1, &d2, 3).unwrap();
        assert!(g3.is_trivial());

        assert!(AbelianGroup::from_chain_complex(&MatrixInt::new(1, 2), &d2).is_err());
        assert!(AbelianGroup::from_chain_complex_mod(&d1, &d2, 4).is_err());
    }

    #[test]
    fn test_predicates() {
        assert!(AbelianGroup::trivial().is_zn(1));
        assert!(AbelianGroup::free(1).is_zn(0));
        assert!(AbelianGroup::free(3).is_free(3));
        assert_eq!(AbelianGroup::trivial().to_string(), "0");
    }

    #[test]
    fn test_is_prime_near_the_top_of_u64() {
        assert!(!is_prime(0));
        assert!(!is_prime(1));
        assert!(is_prime(2));
        assert!(!is_prime(91));
        assert!(is_prime(4_294_967_311));
        assert!(!is_prime(u64::MAX));
        assert!(!is_prime(u64::MAX - 1));
    }

    fn small_matrix() -> impl Strategy<Value = (usize, usize, Vec<i64>)> {
        (1usize..4, 1usize..4).prop_flat_map(|(r, c)| {
            (Just(r), Just(c), prop::collection::vec(-6i64..7, r * c))
        })
    }

    fn build(r: usize, c: usize, v: &[i64]) -> MatrixInt {
        let mut m = MatrixInt::new(r, c);
        for i in 0..r {
            for j in 0..c {
                m.set(i, j, Integer::new(v[i * c + j]));
            }
        }
        m
    }

    proptest! {
        #[test]
        fn prop_presentation_is_canonical((r, c, v) in small_matrix(), i in 0usize..4, j in 0usize..4) {
            let m = build(r, c, &v);
            let g = AbelianGroup::from_presentation(&m);

            let mut echelon = m.clone();
            echelon.row_echelon_form();
            prop_assert_eq!(&AbelianGroup::from_presentation(&echelon), &g);

            let mut swapped = m.clone();
            swapped.swap_cols(i % c, j % c);
            prop_assert_eq!(&AbelianGroup::from_presentation(&swapped), &g);

            let mut mixed = m.clone();
            if r > 1 {
                mixed.add_row(0, r - 1, &Integer::new(3));
            }
            prop_assert_eq!(&AbelianGroup::from_presentation(&mixed), &g);
        }
    }
}
