// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Permutations of a small fixed number of points.
//!
//! Gluings between tetrahedra are labelled by elements of S4; triangle
//! gluings by elements of S3. A permutation is stored as its image array.
//!
//! # Examples
//!
//! ```
//! use normal_kernel::maths::Perm4;
//!
//! let p = Perm4::new([1, 3, 0, 2]);
//! assert_eq!(p.apply(1), 3);
//! assert_eq!(p.inverse().apply(3), 1);
//! assert_eq!((p * p.inverse()), Perm4::identity());
//! assert_eq!(Perm4::from_index(p.index()), p);
//! ```

use itertools::Itertools;
use std::fmt;
use std::ops::Mul;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Perm<const N: usize> {
    image: [u8; N],
}

pub type Perm3 = Perm<3>;
pub type Perm4 = Perm<4>;

impl<const N: usize> Perm<N> {
    /// A permutation from its image array.
    ///
    /// # Panics
    ///
    /// Panics if `image` is not a permutation of `0..N`.
    pub fn new(image: [u8; N]) -> Self {
        let mut seen = [false; N];
        for &i in &image {
            assert!((i as usize) < N && !seen[i as usize], "not a permutation: {:?}", image);
            seen[i as usize] = true;
        }
        Self { image }
    }

    /// Like `new` but returns `None` instead of panicking.
    pub fn try_new(image: [u8; N]) -> Option<Self> {
        let mut seen = [false; N];
        for &i in &image {
            if (i as usize) >= N || seen[i as usize] {
                return None;
            }
            seen[i as usize] = true;
        }
        Some(Self { image })
    }

    pub fn identity() -> Self {
        let mut image = [0u8; N];
        for (i, v) in image.iter_mut().enumerate() {
            *v = i as u8;
        }
        Self { image }
    }

    /// The permutation swapping `a` and `b`.
    pub fn transposition(a: usize, b: usize) -> Self {
        let mut p = Self::identity();
        p.image.swap(a, b);
        p
    }

    pub fn apply(&self, i: usize) -> usize {
        self.image[i] as usize
    }

    /// The point mapped to `i`.
    pub fn pre_image(&self, i: usize) -> usize {
        self.image
            .iter()
            .position(|&v| v as usize == i)
            .unwrap_or(i)
    }

    pub fn images(&self) -> [u8; N] {
        self.image
    }

    pub fn inverse(&self) -> Self {
        let mut image = [0u8; N];
        for (i, &v) in self.image.iter().enumerate() {
            image[v as usize] = i as u8;
        }
        Self { image }
    }

    /// +1 for even permutations, -1 for odd.
    pub fn sign(&self) -> i32 {
        let mut inversions = 0;
        for i in 0..N {
            for j in i + 1..N {
                if self.image[i] > self.image[j] {
                    inversions += 1;
                }
            }
        }
        if inversions % 2 == 0 {
            1
        } else {
            -1
        }
    }

    pub fn is_identity(&self) -> bool {
        self.image.iter().enumerate().all(|(i, &v)| i == v as usize)
    }

    /// Position of this permutation in the lexicographic ordering of S_N.
    pub fn index(&self) -> usize {
        let mut index = 0;
        for i in 0..N {
            let smaller_later = (i + 1..N).filter(|&j| self.image[j] < self.image[i]).count();
            index = index * (N - i) + smaller_later;
        }
        index
    }

    /// Inverse of [`Perm::index`].
    ///
    /// # Panics
    ///
    /// Panics if `index >= N!`.
    pub fn from_index(index: usize) -> Self {
        let mut fact = vec![1usize; N + 1];
        for i in 1..=N {
            fact[i] = fact[i - 1] * i;
        }
        assert!(index < fact[N], "permutation index {} out of range", index);
        let mut remaining: Vec<u8> = (0..N as u8).collect();
        let mut image = [0u8; N];
        let mut rest = index;
        for (i, slot) in image.iter_mut().enumerate() {
            let f = fact[N - 1 - i];
            *slot = remaining.remove(rest / f);
            rest %= f;
        }
        Self { image }
    }

    /// All of S_N in lexicographic order, so that `all()[i].index() == i`.
    pub fn all() -> Vec<Self> {
        (0..N as u8)
            .permutations(N)
            .map(|v| {
                let mut image = [0u8; N];
                image.copy_from_slice(&v);
                Self { image }
            })
            .collect()
    }
}

impl Perm4 {
    /// The number of elements of S4.
    pub const COUNT: usize = 24;

    /// The pair `{a, b}` read as a 4-bit vertex mask.
    pub fn pair_mask(a: usize, b: usize) -> u8 {
        (1u8 << a) | (1u8 << b)
    }
}

/// Composition: `(p * q).apply(i) == p.apply(q.apply(i))`.
impl<const N: usize> Mul for Perm<N> {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        let mut image = [0u8; N];
        for (i, v) in image.iter_mut().enumerate() {
            *v = self.image[rhs.image[i] as usize];
        }
        Self { image }
    }
}

impl<const N: usize> Default for Perm<N> {
    fn default() -> Self {
        Self::identity()
    }
}

impl<const N: usize> fmt::Display for Perm<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &v in &self.image {
            write!(f, "{}", v)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_is_indexed_lexicographically() {
        let all = Perm4::all();
        assert_eq!(all.len(), Perm4::COUNT);
        for (i, p) in all.iter().enumerate() {
            assert_eq!(p.index(), i);
            assert_eq!(Perm4::from_index(i), *p);
        }
        assert!(all[0].is_identity());
        assert_eq!(Perm3::all().len(), 6);
    }

    #[test]
    fn test_composition_and_inverse() {
        let p = Perm4::new([1, 2, 3, 0]);
        let q = Perm4::transposition(0, 1);
        assert_eq!((p * q).apply(0), p.apply(q.apply(0)));
        assert_eq!(p * p.inverse(), Perm4::identity());
        assert_eq!(p.pre_image(0), 3);
    }

    #[test]
    fn test_sign() {
        assert_eq!(Perm4::identity().sign(), 1);
        assert_eq!(Perm4::transposition(1, 3).sign(), -1);
        assert_eq!(Perm4::new([1, 2, 3, 0]).sign(), -1);
        let even = Perm4::all().iter().filter(|p| p.sign() == 1).count();
        assert_eq!(even, 12);
    }

    #[test]
    fn test_try_new() {
        assert!(Perm4::try_new([0, 0, 1, 2]).is_none());
        assert!(Perm4::try_new([0, 1, 2, 4]).is_none());
        assert_eq!(Perm4::try_new([3, 2, 1, 0]).map(|p| p.apply(0)), Some(3));
    }

    #[test]
    fn test_display() {
        assert_eq!(Perm4::new([1, 3, 0, 2]).to_string(), "1302");
    }
}
