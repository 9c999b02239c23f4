// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Exact arithmetic: integers, rationals, vectors, matrices and small permutations.
//!
//! ## Module Structure
//!
//! - `integer`: Arbitrary-precision signed integers with a native fast path and infinity
//! - `rational`: Exact rationals built from integers
//! - `vector`: Operations on integer vectors (dot products, gcd scaling)
//! - `matrix`: Dense integer matrices with row/column operations and echelon form
//! - `perm`: Permutations of a small fixed number of points

pub mod integer;
pub mod matrix;
pub mod perm;
pub mod rational;
pub mod vector;

pub use integer::Integer;
pub use matrix::MatrixInt;
pub use perm::{Perm, Perm3, Perm4};
pub use rational::Rational;
pub use vector::{dot, scale_down};
