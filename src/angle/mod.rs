// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Angle structures on triangulations.
//!
//! An angle structure assigns to each pair of opposite edges in each
//! tetrahedron an angle in `[0, π]`, such that the three angles in a
//! tetrahedron sum to `π` and the angles around each internal edge sum to
//! `2π`. Structures are stored as integer vectors with one extra scaling
//! coordinate `s`: an entry `x` stands for the angle `(x / s)·π`.
//!
//! Angle index `k` in a tetrahedron is the angle at edges `k` and `5 - k`.
//!
//! ## Module Structure
//!
//! - `equations`: Matching equations for angle coordinates
//! - `structure`: A single angle structure and its classification
//! - `list`: Enumeration of vertex angle structures

pub mod equations;
pub mod list;
pub mod structure;

pub use equations::{angle_equations, angle_index};
pub use list::AngleStructures;
pub use structure::AngleStructure;
