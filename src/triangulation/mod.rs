// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! 3-manifold triangulations.
//!
//! A [`Triangulation`] is an ordered list of tetrahedra whose faces are
//! either unmatched or glued in pairs by permutations in S4. Everything else
//! (vertices, edges, triangles, components, boundary components, vertex
//! links, orientability) is derived into a [`Skeleton`] on first use and
//! cached until the next mutation.
//!
//! ## Module Structure
//!
//! - `triangulation`: Tetrahedra, gluings, locks and the skeleton cache
//! - `skeleton`: Derived faces of every dimension and their properties
//! - `homology`: First homology through the dual 2-skeleton
//! - `isomorphism`: Combinatorial isomorphisms and their search
//! - `isosig`: Isomorphism signatures
//! - `construct`: Standard triangulations used throughout the kernel and tests
//! - `subdivide`: Splitting a tetrahedron into eight around a vertex pairing

pub mod construct;
pub mod homology;
pub mod isomorphism;
pub mod isosig;
pub mod skeleton;
pub mod subdivide;
#[allow(clippy::module_inception)]
pub mod triangulation;

pub use isomorphism::Isomorphism;
pub use skeleton::{Skeleton, VertexLink};
pub use triangulation::{FacetSpec, Tetrahedron, Triangulation};

/// Vertex pairs of the six edges of a tetrahedron, in edge-number order.
pub const EDGE_VERTICES: [[usize; 2]; 6] = [[0, 1], [0, 2], [0, 3], [1, 2], [1, 3], [2, 3]];

/// The edge number joining two distinct vertices of a tetrahedron.
pub const EDGE_NUMBER: [[usize; 4]; 4] = [
    [usize::MAX, 0, 1, 2],
    [0, usize::MAX, 3, 4],
    [1, 3, usize::MAX, 5],
    [2, 4, 5, usize::MAX],
];

/// The edge of a tetrahedron opposite the given edge.
pub fn opposite_edge(edge: usize) -> usize {
    5 - edge
}
