// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Smith normal form of integer matrices.

use crate::maths::{Integer, MatrixInt};

impl MatrixInt {
    /// Reduces in place to Smith normal form.
    ///
    /// Afterwards the matrix is `diag(d0, ..., dk, 0, ..., 0)` with every
    /// `di > 0` and `di | d(i+1)`. Only invertible integer row and column
    /// operations are used.
    ///
    /// Each pass moves the smallest remaining non-zero entry to the pivot
    /// and clears its row and column with Euclidean steps, so entries stay
    /// bounded by the pivot while the pass is repeated.
    pub fn smith_normal_form(&mut self) {
        let diag = self.rows().min(self.cols());
        for t in 0..diag {
            loop {
                let Some((r, c)) = self.smallest_from(t) else {
                    return;
                };
                self.swap_rows(t, r);
                self.swap_cols(t, c);

                let mut clean = true;
                for r in t + 1..self.rows() {
                    if self.entry(r, t).is_zero() {
                        continue;
                    }
                    let (q, rem) = self.entry(r, t).div_rem(self.entry(t, t));
                    self.add_row(t, r, &-q);
                    clean &= rem.is_zero();
                }
                for c in t + 1..self.cols() {
                    if self.entry(t, c).is_zero() {
                        continue;
                    }
                    let (q, rem) = self.entry(t, c).div_rem(self.entry(t, t));
                    self.add_col(t, c, &-q);
                    clean &= rem.is_zero();
                }
                if !clean {
                    continue;
                }

                match self.first_not_divisible(t) {
                    Some(r) => {
                        let one = Integer::ONE;
                        self.add_row(r, t, &one);
                    }
                    None => break,
                }
            }
            if self.entry(t, t).is_negative() {
                self.negate_row(t);
            }
        }
    }

    /// The non-zero entry of least absolute value in the lower-right block from `(t, t)`.
    fn smallest_from(&self, t: usize) -> Option<(usize, usize)> {
        let mut best: Option<((usize, usize), Integer)> = None;
        for r in t..self.rows() {
            for c in t..self.cols() {
                let v = self.entry(r, c);
                if v.is_zero() {
                    continue;
                }
                let a = v.abs();
                if best.as_ref().map_or(true, |(_, b)| a < *b) {
                    let is_unit = a == Integer::ONE;
                    best = Some(((r, c), a));
                    if is_unit {
                        return best.map(|(pos, _)| pos);
                    }
                }
            }
        }
        best.map(|(pos, _)| pos)
    }

    /// A row below `t` holding an entry not divisible by the pivot at `(t, t)`.
    fn first_not_divisible(&self, t: usize) -> Option<usize> {
        let pivot = self.entry(t, t);
        (t + 1..self.rows()).find(|&r| {
            (t + 1..self.cols()).any(|c| !self.entry(r, c).is_divisible_by(pivot))
        })
    }

    /// The non-zero diagonal entries after Smith normal form reduction of a copy.
    pub fn elementary_divisors(&self) -> Vec<Integer> {
        let mut m = self.clone();
        m.smith_normal_form();
        (0..m.rows().min(m.cols()))
            .map(|i| m.entry(i, i).clone())
            .take_while(|d| !d.is_zero())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn diagonal(m: &MatrixInt) -> Vec<i64> {
        (0..m.rows().min(m.cols()))
            .map(|i| m.entry(i, i).try_to_i64().unwrap())
            .collect()
    }

    #[test]
    fn test_snf_small() {
        let mut m = MatrixInt::from_rows(&[&[2, 4, 4], &[-6, 6, 12], &[10, -4, -16]]).unwrap();
        m.smith_normal_form();
        assert_eq!(diagonal(&m), vec![2, 6, 12]);
        for r in 0..3 {
            for c in 0..3 {
                if r != c {
                    assert!(m.entry(r, c).is_zero());
                }
            }
        }
    }

    #[test]
    fn test_snf_fixes_divisibility() {
        let mut m = MatrixInt::from_rows(&[&[2, 0], &[0, 3]]).unwrap();
        m.smith_normal_form();
        assert_eq!(diagonal(&m), vec![1, 6]);
    }

    #[test]
    fn test_snf_rectangular_with_zero_rows() {
        let m = MatrixInt::from_rows(&[&[0, 0, 0], &[0, 5, 0]]).unwrap();
        assert_eq!(m.elementary_divisors(), vec![Integer::new(5)]);
        assert!(MatrixInt::new(3, 2).elementary_divisors().is_empty());
    }
}
