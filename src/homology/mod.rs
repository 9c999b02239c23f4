// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Homology: Smith normal form and finitely generated abelian groups.
//!
//! ## Module Structure
//!
//! - `smith`: Smith normal form of [`MatrixInt`](crate::maths::MatrixInt)
//! - `abelian_group`: Canonical invariant-factor form of abelian groups
//! - `tight`: Prefix-free printable encoding of naturals and groups

pub mod abelian_group;
pub mod smith;
pub mod tight;

pub use abelian_group::AbelianGroup;
pub use tight::{tight_decode, tight_encoding, TightEncode, TightReader};
