// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Exact rationals.
//!
//! Rationals are `num_rational::BigRational` values; this module only adds
//! the bridges from [`Integer`].

use num_bigint::BigInt;
use num_rational::BigRational;

use super::Integer;

pub type Rational = BigRational;

impl Integer {
    /// This integer as a rational, or `None` for infinity.
    pub fn to_rational(&self) -> Option<Rational> {
        self.to_bigint().map(BigRational::from_integer)
    }
}

/// The rational `num / den`, reduced. `None` if `den` is zero or either value is infinite.
pub fn ratio(num: &Integer, den: &Integer) -> Option<Rational> {
    if den.is_zero() {
        return None;
    }
    let n: BigInt = num.to_bigint()?;
    let d: BigInt = den.to_bigint()?;
    Some(BigRational::new(n, d))
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_traits::One;

    #[test]
    fn test_ratio_reduces() {
        let r = ratio(&Integer::new(6), &Integer::new(-4)).unwrap();
        assert_eq!(r, BigRational::new(BigInt::from(-3), BigInt::from(2)));
        assert!(ratio(&Integer::ONE, &Integer::ZERO).is_none());
        assert!(ratio(&Integer::INFINITY, &Integer::ONE).is_none());
        assert!(Integer::ONE.to_rational().unwrap().is_one());
    }
}
