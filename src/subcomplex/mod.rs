// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Recognition of standard subcomplexes and Seifert fibred pieces.
//!
//! Recognisers work on a borrowed triangulation and report what they find
//! by tetrahedron index and vertex roles. A recogniser that does not
//! recognise its input returns `None`; only invalid requests are errors.
//!
//! ## Module Structure
//!
//! - `annulus`: Saturated annuli, their adjacency and joining maps
//! - `layered`: Layered solid tori and layered chains
//! - `trisolid`: The three-tetrahedron solid torus and its augmentations
//! - `blocks`: Saturated blocks bounded by rings of annuli
//! - `region`: Regions of joined blocks and their Seifert fibred spaces
//! - `sfs`: Seifert fibred space invariants
//! - `standard`: Whole-triangulation recognition across families

pub mod annulus;
pub mod blocks;
pub mod layered;
pub mod region;
pub mod sfs;
pub mod standard;
pub mod trisolid;

pub use annulus::{Matrix2, SatAnnulus};
pub use blocks::{Adjacency, MobiusPosition, SatBlock, SatBlockKind};
pub use layered::{LayeredChain, LayeredSolidTorus};
pub use region::SatRegion;
pub use sfs::SfsInvariants;
pub use standard::StandardTriangulation;
pub use trisolid::{AnnulusFiller, AugTriSolidTorus, TriSolidTorus};
