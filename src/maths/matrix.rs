// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Dense row-major integer matrices.
//!
//! Row and column operations are the elementary moves used by echelon
//! reduction here and by Smith normal form in [`crate::homology`].

use std::fmt;

use super::Integer;
use crate::error::{KernelError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatrixInt {
    rows: usize,
    cols: usize,
    data: Vec<Integer>,
}

impl MatrixInt {
    /// The zero matrix.
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![Integer::ZERO; rows * cols],
        }
    }

    pub fn identity(size: usize) -> Self {
        let mut m = Self::new(size, size);
        for i in 0..size {
            m.data[i * size + i] = Integer::ONE;
        }
        m
    }

    /// Builds a matrix from rows of native integers. All rows must have the same length.
    pub fn from_rows(rows: &[&[i64]]) -> Result<Self> {
        let cols = rows.first().map_or(0, |r| r.len());
        if rows.iter().any(|r| r.len() != cols) {
            return Err(KernelError::invalid_argument("ragged matrix rows"));
        }
        let data = rows
            .iter()
            .flat_map(|r| r.iter().map(|&v| Integer::new(v)))
            .collect();
        Ok(Self {
            rows: rows.len(),
            cols,
            data,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn entry(&self, r: usize, c: usize) -> &Integer {
        &self.data[r * self.cols + c]
    }

    pub fn entry_mut(&mut self, r: usize, c: usize) -> &mut Integer {
        &mut self.data[r * self.cols + c]
    }

    pub fn set(&mut self, r: usize, c: usize, value: Integer) {
        self.data[r * self.cols + c] = value;
    }

    pub fn row(&self, r: usize) -> &[Integer] {
        &self.data[r * self.cols..(r + 1) * self.cols]
    }

    pub fn is_zero(&self) -> bool {
        self.data.iter().all(Integer::is_zero)
    }

    pub fn swap_rows(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        for c in 0..self.cols {
            self.data.swap(a * self.cols + c, b * self.cols + c);
        }
    }

    pub fn swap_cols(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        for r in 0..self.rows {
            self.data.swap(r * self.cols + a, r * self.cols + b);
        }
    }

    /// Row `dest` += `mult` * row `src`.
    pub fn add_row(&mut self, src: usize, dest: usize, mult: &Integer) {
        if mult.is_zero() {
            return;
        }
        for c in 0..self.cols {
            let delta = mult * self.entry(src, c);
            *self.entry_mut(dest, c) += delta;
        }
    }

    /// Column `dest` += `mult` * column `src`.
    pub fn add_col(&mut self, src: usize, dest: usize, mult: &Integer) {
        if mult.is_zero() {
            return;
        }
        for r in 0..self.rows {
            let delta = mult * self.entry(r, src);
            *self.entry_mut(r, dest) += delta;
        }
    }

    pub fn negate_row(&mut self, r: usize) {
        for c in 0..self.cols {
            let v = -self.entry(r, c);
            self.set(r, c, v);
        }
    }

    pub fn negate_col(&mut self, c: usize) {
        for r in 0..self.rows {
            let v = -self.entry(r, c);
            self.set(r, c, v);
        }
    }

    pub fn transpose(&self) -> MatrixInt {
        let mut t = MatrixInt::new(self.cols, self.rows);
        for r in 0..self.rows {
            for c in 0..self.cols {
                t.set(c, r, self.entry(r, c).clone());
            }
        }
        t
    }

    /// Matrix product `self * other`.
    pub fn multiply(&self, other: &MatrixInt) -> Result<MatrixInt> {
        if self.cols != other.rows {
            return Err(KernelError::invalid_argument(format!(
                "cannot multiply {}x{} by {}x{}",
                self.rows, self.cols, other.rows, other.cols
            )));
        }
        let mut out = MatrixInt::new(self.rows, other.cols);
        for r in 0..self.rows {
            for k in 0..self.cols {
                let a = self.entry(r, k);
                if a.is_zero() {
                    continue;
                }
                for c in 0..other.cols {
                    let delta = a * other.entry(k, c);
                    *out.entry_mut(r, c) += delta;
                }
            }
        }
        Ok(out)
    }

    /// Reduces in place to integer row echelon form and returns the rank.
    ///
    /// Only invertible integer row operations are used, so the row lattice
    /// is preserved. Pivots are made positive. Within each pivot column the
    /// smallest remaining entry is used as the Euclidean divisor, which keeps
    /// entry growth down.
    pub fn row_echelon_form(&mut self) -> usize {
        let mut pivot_row = 0;
        for c in 0..self.cols {
            if pivot_row == self.rows {
                break;
            }
            loop {
                let Some(best) = self.smallest_in_col(c, pivot_row) else {
                    break;
                };
                self.swap_rows(pivot_row, best);
                let mut done = true;
                for r in pivot_row + 1..self.rows {
                    if self.entry(r, c).is_zero() {
                        continue;
                    }
                    let (q, rem) = self.entry(r, c).div_rem(self.entry(pivot_row, c));
                    self.add_row(pivot_row, r, &-q);
                    if !rem.is_zero() {
                        done = false;
                    }
                }
                if done {
                    break;
                }
            }
            if self.entry(pivot_row, c).is_zero() {
                continue;
            }
            if self.entry(pivot_row, c).is_negative() {
                self.negate_row(pivot_row);
            }
            pivot_row += 1;
        }
        pivot_row
    }

    fn smallest_in_col(&self, c: usize, from_row: usize) -> Option<usize> {
        (from_row..self.rows)
            .filter(|&r| !self.entry(r, c).is_zero())
            .min_by_key(|&r| self.entry(r, c).abs())
    }

    /// Rank over the rationals.
    pub fn rank(&self) -> usize {
        self.clone().row_echelon_form()
    }
}

impl fmt::Display for MatrixInt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for r in 0..self.rows {
            let row: Vec<String> = self.row(r).iter().map(|x| x.to_string()).collect();
            writeln!(f, "[{}]", row.join(" "))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_ops() {
        let mut m = MatrixInt::from_rows(&[&[1, 2], &[3, 4]]).unwrap();
        m.add_row(0, 1, &Integer::new(-3));
        assert_eq!(m, MatrixInt::from_rows(&[&[1, 2], &[0, -2]]).unwrap());
        m.swap_cols(0, 1);
        assert_eq!(m, MatrixInt::from_rows(&[&[2, 1], &[-2, 0]]).unwrap());
        m.add_col(1, 0, &Integer::new(-2));
        assert_eq!(m, MatrixInt::from_rows(&[&[0, 1], &[-2, 0]]).unwrap());
    }

    #[test]
    fn test_ragged_rows_rejected() {
        assert!(matches!(
            MatrixInt::from_rows(&[&[1, 2], &[3]]),
            Err(KernelError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_row_echelon() {
        let mut m = MatrixInt::from_rows(&[&[2, 4, 6], &[3, 6, 9], &[1, 1, 1]]).unwrap();
        assert_eq!(m.row_echelon_form(), 2);
        for r in 0..3 {
            for c in 0..r.min(3) {
                assert!(m.entry(r, c).is_zero(), "entry ({}, {}) not cleared", r, c);
            }
        }
        assert!(m.row(2).iter().all(Integer::is_zero));
    }

    #[test]
    fn test_multiply() {
        let a = MatrixInt::from_rows(&[&[1, 2], &[0, 1]]).unwrap();
        let b = MatrixInt::from_rows(&[&[1, -2], &[0, 1]]).unwrap();
        assert_eq!(a.multiply(&b).unwrap(), MatrixInt::identity(2));
        assert!(a.multiply(&MatrixInt::new(3, 1)).is_err());
        assert_eq!(a.transpose().entry(1, 0), &Integer::new(2));
    }
}
