// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Normal and almost normal surfaces.
//!
//! ## Module Structure
//!
//! - `coords`: Coordinate systems and vector encodings
//! - `tables`: How each of the ten disc types meets edges and faces
//! - `matching`: Matching equations, validity constraints, reduced-vector lifting
//! - `normal_surface`: A single surface and its derived properties
//! - `discs`: Individual discs and navigation across normal arcs
//! - `octs`: Trading octagons for normal discs in a subdivided triangulation
//! - `list`: Enumerated lists of vertex and fundamental surfaces

pub mod coords;
pub mod discs;
pub mod list;
pub mod matching;
pub mod normal_surface;
pub mod octs;
pub mod tables;

pub use coords::{NormalCoords, NormalEncoding};
pub use discs::{ArcSpec, DiscSetSurface, DiscSetTet, DiscSpec};
pub use list::{NormalList, NormalSurfaces};
pub use matching::{matching_equations, validity_constraints};
pub use normal_surface::NormalSurface;
