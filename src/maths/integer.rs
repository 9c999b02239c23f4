// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Arbitrary-precision signed integers.
//!
//! An [`Integer`] keeps values that fit in an `i64` on a native fast path and
//! switches to a `BigInt` only when an operation overflows. Results are always
//! normalised, so a value that fits in a machine word is never stored large.
//! There is also a distinguished infinity value, used by normal surfaces in
//! non-compact coordinate systems.
//!
//! # Examples
//!
//! ```
//! use normal_kernel::maths::Integer;
//!
//! let big = Integer::from(i64::MAX) + Integer::from(1);
//! assert!(!big.is_native());
//! assert_eq!(big.to_string(), "9223372036854775808");
//! assert_eq!((big - Integer::from(1)).try_to_i64(), Some(i64::MAX));
//! ```

use num_bigint::BigInt;
use num_integer::Integer as _;
use num_traits::{One, Signed, ToPrimitive, Zero};
use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign};
use std::str::FromStr;

use crate::error::KernelError;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum Repr {
    Native(i64),
    Large(BigInt),
    Infinity,
}

/// A signed integer of unbounded size, or infinity.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Integer(Repr);

impl Integer {
    pub const ZERO: Integer = Integer(Repr::Native(0));
    pub const ONE: Integer = Integer(Repr::Native(1));
    pub const INFINITY: Integer = Integer(Repr::Infinity);

    pub const fn new(value: i64) -> Self {
        Integer(Repr::Native(value))
    }

    fn from_big(value: BigInt) -> Self {
        match value.to_i64() {
            Some(v) => Integer(Repr::Native(v)),
            None => Integer(Repr::Large(value)),
        }
    }

    /// Whether the value is held on the native fast path.
    pub fn is_native(&self) -> bool {
        matches!(self.0, Repr::Native(_))
    }

    pub fn is_infinite(&self) -> bool {
        matches!(self.0, Repr::Infinity)
    }

    pub fn is_zero(&self) -> bool {
        matches!(self.0, Repr::Native(0))
    }

    /// -1, 0 or 1. Infinity is positive.
    pub fn signum(&self) -> i32 {
        match &self.0 {
            Repr::Native(v) => v.signum() as i32,
            Repr::Large(b) => {
                if b.is_negative() {
                    -1
                } else {
                    1
                }
            }
            Repr::Infinity => 1,
        }
    }

    pub fn is_positive(&self) -> bool {
        self.signum() > 0
    }

    pub fn is_negative(&self) -> bool {
        self.signum() < 0
    }

    pub fn try_to_i64(&self) -> Option<i64> {
        match self.0 {
            Repr::Native(v) => Some(v),
            _ => None,
        }
    }

    /// The value as a `BigInt`, or `None` for infinity.
    pub fn to_bigint(&self) -> Option<BigInt> {
        match &self.0 {
            Repr::Native(v) => Some(BigInt::from(*v)),
            Repr::Large(b) => Some(b.clone()),
            Repr::Infinity => None,
        }
    }

    // Callers have already dealt with infinity.
    fn finite_big(&self) -> BigInt {
        self.to_bigint().unwrap_or_else(BigInt::zero)
    }

    pub fn abs(&self) -> Integer {
        match &self.0 {
            Repr::Native(v) => match v.checked_abs() {
                Some(a) => Integer::new(a),
                None => Integer::from_big(BigInt::from(*v).abs()),
            },
            Repr::Large(b) => Integer(Repr::Large(b.abs())),
            Repr::Infinity => Integer::INFINITY,
        }
    }

    /// Non-negative greatest common divisor. `gcd(0, 0) == 0`.
    /// Infinity is ignored, so `gcd(inf, x) == |x|`.
    pub fn gcd(&self, other: &Integer) -> Integer {
        match (&self.0, &other.0) {
            (Repr::Infinity, _) => other.abs(),
            (_, Repr::Infinity) => self.abs(),
            (Repr::Native(a), Repr::Native(b)) => {
                let g = a.unsigned_abs().gcd(&b.unsigned_abs());
                match i64::try_from(g) {
                    Ok(v) => Integer::new(v),
                    Err(_) => Integer::from_big(BigInt::from(g)),
                }
            }
            _ => Integer::from_big(self.finite_big().gcd(&other.finite_big())),
        }
    }

    /// Non-negative least common multiple.
    pub fn lcm(&self, other: &Integer) -> Integer {
        if self.is_zero() || other.is_zero() {
            return Integer::ZERO;
        }
        let g = self.gcd(other);
        (self.div_exact(&g) * other).abs()
    }

    /// Division where the caller guarantees that `other` divides `self` exactly.
    ///
    /// # Panics
    ///
    /// Panics if `other` is zero.
    pub fn div_exact(&self, other: &Integer) -> Integer {
        match (&self.0, &other.0) {
            (Repr::Infinity, _) => Integer::INFINITY,
            (_, Repr::Infinity) => Integer::ZERO,
            (Repr::Native(a), Repr::Native(b)) => match a.checked_div(*b) {
                Some(q) => Integer::new(q),
                None if *b == 0 => panic!("Integer::div_exact by zero"),
                None => Integer::from_big(BigInt::from(*a) / BigInt::from(*b)),
            },
            _ => Integer::from_big(self.finite_big() / other.finite_big()),
        }
    }

    /// Truncating division with remainder, as for `i64`.
    ///
    /// # Panics
    ///
    /// Panics if `other` is zero or either value is infinite.
    pub fn div_rem(&self, other: &Integer) -> (Integer, Integer) {
        assert!(
            !self.is_infinite() && !other.is_infinite(),
            "Integer::div_rem on infinity"
        );
        match (&self.0, &other.0) {
            (Repr::Native(a), Repr::Native(b)) => match (a.checked_div(*b), a.checked_rem(*b)) {
                (Some(q), Some(r)) => (Integer::new(q), Integer::new(r)),
                _ if *b == 0 => panic!("Integer::div_rem by zero"),
                _ => {
                    let (q, r) = BigInt::from(*a).div_rem(&BigInt::from(*b));
                    (Integer::from_big(q), Integer::from_big(r))
                }
            },
            _ => {
                let (q, r) = self.finite_big().div_rem(&other.finite_big());
                (Integer::from_big(q), Integer::from_big(r))
            }
        }
    }

    /// Whether `other` divides `self`. Zero divides only zero.
    pub fn is_divisible_by(&self, other: &Integer) -> bool {
        if other.is_zero() {
            return self.is_zero();
        }
        self.div_rem(other).1.is_zero()
    }
}

fn add_ref(a: &Integer, b: &Integer) -> Integer {
    match (&a.0, &b.0) {
        (Repr::Infinity, _) | (_, Repr::Infinity) => Integer::INFINITY,
        (Repr::Native(x), Repr::Native(y)) => match x.checked_add(*y) {
            Some(v) => Integer::new(v),
            None => Integer::from_big(BigInt::from(*x) + BigInt::from(*y)),
        },
        _ => Integer::from_big(a.finite_big() + b.finite_big()),
    }
}

fn sub_ref(a: &Integer, b: &Integer) -> Integer {
    match (&a.0, &b.0) {
        (Repr::Infinity, _) | (_, Repr::Infinity) => Integer::INFINITY,
        (Repr::Native(x), Repr::Native(y)) => match x.checked_sub(*y) {
            Some(v) => Integer::new(v),
            None => Integer::from_big(BigInt::from(*x) - BigInt::from(*y)),
        },
        _ => Integer::from_big(a.finite_big() - b.finite_big()),
    }
}

fn mul_ref(a: &Integer, b: &Integer) -> Integer {
    match (&a.0, &b.0) {
        (Repr::Infinity, _) | (_, Repr::Infinity) => Integer::INFINITY,
        (Repr::Native(x), Repr::Native(y)) => match x.checked_mul(*y) {
            Some(v) => Integer::new(v),
            None => Integer::from_big(BigInt::from(*x) * BigInt::from(*y)),
        },
        _ => Integer::from_big(a.finite_big() * b.finite_big()),
    }
}

macro_rules! forward_binop {
    ($trait:ident, $method:ident, $func:ident, $assign_trait:ident, $assign_method:ident) => {
        impl $trait<&Integer> for &Integer {
            type Output = Integer;
            fn $method(self, rhs: &Integer) -> Integer {
                $func(self, rhs)
            }
        }

        impl $trait<Integer> for Integer {
            type Output = Integer;
            fn $method(self, rhs: Integer) -> Integer {
                $func(&self, &rhs)
            }
        }

        impl $trait<&Integer> for Integer {
            type Output = Integer;
            fn $method(self, rhs: &Integer) -> Integer {
                $func(&self, rhs)
            }
        }

        impl $trait<i64> for &Integer {
            type Output = Integer;
            fn $method(self, rhs: i64) -> Integer {
                $func(self, &Integer::new(rhs))
            }
        }

        impl $assign_trait<&Integer> for Integer {
            fn $assign_method(&mut self, rhs: &Integer) {
                *self = $func(self, rhs);
            }
        }

        impl $assign_trait<Integer> for Integer {
            fn $assign_method(&mut self, rhs: Integer) {
                *self = $func(self, &rhs);
            }
        }
    };
}

forward_binop!(Add, add, add_ref, AddAssign, add_assign);
forward_binop!(Sub, sub, sub_ref, SubAssign, sub_assign);
forward_binop!(Mul, mul, mul_ref, MulAssign, mul_assign);

impl Neg for &Integer {
    type Output = Integer;
    fn neg(self) -> Integer {
        match &self.0 {
            Repr::Native(v) => match v.checked_neg() {
                Some(n) => Integer::new(n),
                None => Integer::from_big(-BigInt::from(*v)),
            },
            Repr::Large(b) => Integer::from_big(-b),
            Repr::Infinity => Integer::INFINITY,
        }
    }
}

impl Neg for Integer {
    type Output = Integer;
    fn neg(self) -> Integer {
        -&self
    }
}

impl Zero for Integer {
    fn zero() -> Self {
        Integer::ZERO
    }

    fn is_zero(&self) -> bool {
        Integer::is_zero(self)
    }
}

impl One for Integer {
    fn one() -> Self {
        Integer::ONE
    }
}

impl Ord for Integer {
    fn cmp(&self, other: &Self) -> Ordering {
        match (&self.0, &other.0) {
            (Repr::Infinity, Repr::Infinity) => Ordering::Equal,
            (Repr::Infinity, _) => Ordering::Greater,
            (_, Repr::Infinity) => Ordering::Less,
            (Repr::Native(a), Repr::Native(b)) => a.cmp(b),
            _ => self.finite_big().cmp(&other.finite_big()),
        }
    }
}

impl PartialOrd for Integer {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Default for Integer {
    fn default() -> Self {
        Integer::ZERO
    }
}

impl From<i64> for Integer {
    fn from(value: i64) -> Self {
        Integer::new(value)
    }
}

impl From<i32> for Integer {
    fn from(value: i32) -> Self {
        Integer::new(value as i64)
    }
}

impl From<usize> for Integer {
    fn from(value: usize) -> Self {
        match i64::try_from(value) {
            Ok(v) => Integer::new(v),
            Err(_) => Integer::from_big(BigInt::from(value)),
        }
    }
}

impl From<BigInt> for Integer {
    fn from(value: BigInt) -> Self {
        Integer::from_big(value)
    }
}

impl fmt::Display for Integer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Repr::Native(v) => write!(f, "{}", v),
            Repr::Large(b) => write!(f, "{}", b),
            Repr::Infinity => write!(f, "inf"),
        }
    }
}

impl FromStr for Integer {
    type Err = KernelError;

    /// Parses a decimal integer, or `inf`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s == "inf" {
            return Ok(Integer::INFINITY);
        }
        if let Ok(v) = s.parse::<i64>() {
            return Ok(Integer::new(v));
        }
        s.parse::<BigInt>()
            .map(Integer::from_big)
            .map_err(|_| KernelError::invalid_input(format!("not an integer: {:?}", s)))
    }
}

impl std::iter::Sum for Integer {
    fn sum<I: Iterator<Item = Integer>>(iter: I) -> Integer {
        iter.fold(Integer::ZERO, |acc, x| acc + x)
    }
}

impl<'a> std::iter::Sum<&'a Integer> for Integer {
    fn sum<I: Iterator<Item = &'a Integer>>(iter: I) -> Integer {
        iter.fold(Integer::ZERO, |acc, x| acc + x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_overflow_promotes_and_demotes() {
        let a = Integer::new(i64::MAX);
        let b = &a + 1;
        assert!(!b.is_native());
        assert!(b > a);
        let c = b - Integer::ONE;
        assert!(c.is_native());
        assert_eq!(c, a);
    }

    #[test]
    fn test_min_value_edge_cases() {
        let m = Integer::new(i64::MIN);
        assert!(!(-&m).is_native());
        assert!(!m.abs().is_native());
        assert_eq!(m.gcd(&Integer::ZERO).to_string(), "9223372036854775808");
        let q = m.div_exact(&Integer::new(-1));
        assert_eq!(q, -Integer::new(i64::MIN));
    }

    #[test]
    fn test_infinity() {
        let inf = Integer::INFINITY;
        assert!(inf.is_infinite());
        assert!(inf > Integer::new(i64::MAX) * Integer::new(4));
        assert!((&inf + 3).is_infinite());
        assert_eq!(inf.gcd(&Integer::new(-6)), Integer::new(6));
        assert_eq!(inf.to_string(), "inf");
        assert_eq!("inf".parse::<Integer>().unwrap(), inf);
    }

    #[test]
    fn test_gcd_lcm() {
        assert_eq!(Integer::new(12).gcd(&Integer::new(-18)), Integer::new(6));
        assert_eq!(Integer::ZERO.gcd(&Integer::ZERO), Integer::ZERO);
        assert_eq!(Integer::new(4).lcm(&Integer::new(6)), Integer::new(12));
        assert!(Integer::new(12).is_divisible_by(&Integer::new(-4)));
        assert!(!Integer::new(12).is_divisible_by(&Integer::new(5)));
    }

    #[test]
    fn test_parse() {
        let big: Integer = "123456789012345678901234567890".parse().unwrap();
        assert!(!big.is_native());
        assert_eq!(big.to_string(), "123456789012345678901234567890");
        assert!("12a".parse::<Integer>().is_err());
    }

    proptest! {
        #[test]
        fn prop_matches_i128(a in any::<i64>(), b in any::<i64>()) {
            let x = Integer::new(a);
            let y = Integer::new(b);
            prop_assert_eq!((&x + &y).to_string(), (a as i128 + b as i128).to_string());
            prop_assert_eq!((&x - &y).to_string(), (a as i128 - b as i128).to_string());
            prop_assert_eq!((&x * &y).to_string(), (a as i128 * b as i128).to_string());
            prop_assert_eq!(x.cmp(&y), a.cmp(&b));
        }

        #[test]
        fn prop_div_rem(a in any::<i64>(), b in any::<i64>().prop_filter("non-zero", |b| *b != 0)) {
            let x = Integer::new(a);
            let y = Integer::new(b);
            let (q, r) = x.div_rem(&y);
            prop_assert_eq!(&q * &y + &r, x);
            prop_assert!(r.abs() < y.abs());
        }
    }
}
