// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Operations on vectors of [`Integer`]s.
//!
//! Vectors are plain slices; there is no wrapper type.

use super::Integer;

/// Divides every finite entry through by the gcd of the finite entries.
///
/// Returns the gcd, which is positive unless every finite entry is zero, in
/// which case the vector is left alone and zero is returned. Infinite
/// entries are skipped.
pub fn scale_down(v: &mut [Integer]) -> Integer {
    let mut g = Integer::ZERO;
    for x in v.iter() {
        if x.is_infinite() || x.is_zero() {
            continue;
        }
        g = g.gcd(x);
        if g == Integer::ONE {
            return g;
        }
    }
    if g.is_zero() || g == Integer::ONE {
        return g;
    }
    for x in v.iter_mut() {
        if !x.is_infinite() && !x.is_zero() {
            *x = x.div_exact(&g);
        }
    }
    g
}

/// The gcd of the finite entries; zero for the zero vector.
pub fn gcd_of(v: &[Integer]) -> Integer {
    v.iter()
        .filter(|x| !x.is_infinite())
        .fold(Integer::ZERO, |g, x| g.gcd(x))
}

pub fn dot(a: &[Integer], b: &[Integer]) -> Integer {
    a.iter()
        .zip(b.iter())
        .filter(|(x, y)| !x.is_zero() && !y.is_zero())
        .map(|(x, y)| x * y)
        .sum()
}

pub fn is_zero_vector(v: &[Integer]) -> bool {
    v.iter().all(Integer::is_zero)
}

pub fn is_non_negative(v: &[Integer]) -> bool {
    v.iter().all(|x| !x.is_negative())
}

/// `a * x + b * y`, entrywise.
pub fn combine(a: &Integer, x: &[Integer], b: &Integer, y: &[Integer]) -> Vec<Integer> {
    x.iter().zip(y.iter()).map(|(p, q)| a * p + b * q).collect()
}

/// Builds a vector from native integers.
pub fn from_i64s(values: &[i64]) -> Vec<Integer> {
    values.iter().map(|&v| Integer::new(v)).collect()
}
