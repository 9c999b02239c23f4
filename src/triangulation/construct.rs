// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Standard triangulations: the figure-eight knot complement, layered solid
//! tori and layered lens spaces.
//!
//! # Layered solid tori
//!
//! The boundary of a layered solid torus is two triangles on its top
//! tetrahedron. Its shape is recorded as a [`LayeredTop`]: the tetrahedron
//! and a role permutation taking roles to vertices, with
//!
//! - the boundary triangles opposite roles 3 and 2,
//! - boundary edge class `X` = role edges {1,2} and {0,3},
//! - class `Y` = role edges {0,2} and {1,3},
//! - class `Z` = role edge {0,1}, shared by both triangles.
//!
//! Orienting `X` as 2→1 and 0→3, `Y` as 0→2 and 3→1, and `Z` as 0→1 gives
//! `Z = X + Y` in the boundary torus. The signed image of each class in
//! `H1 = Z` of the solid torus is kept alongside; its absolute value is the
//! number of times the meridian disc cuts that edge.

use num_integer::Integer as _;

use super::triangulation::Triangulation;
use crate::error::{KernelError, Result};
use crate::maths::Perm4;

/// The two boundary triangles of a layered solid torus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayeredTop {
    pub tet: usize,
    /// Role to vertex.
    pub roles: Perm4,
    /// Signed meridian images of the classes `X`, `Y`, `Z`.
    pub weights: [i64; 3],
}

/// Boundary edge classes of a [`LayeredTop`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TopEdge {
    X = 0,
    Y = 1,
    Z = 2,
}

impl TopEdge {
    pub const ALL: [TopEdge; 3] = [TopEdge::X, TopEdge::Y, TopEdge::Z];

    /// The two role edges of this class, oriented positively. `Z` repeats
    /// its only edge.
    pub fn role_edges(self) -> [[usize; 2]; 2] {
        match self {
            TopEdge::X => [[2, 1], [0, 3]],
            TopEdge::Y => [[0, 2], [3, 1]],
            TopEdge::Z => [[0, 1], [0, 1]],
        }
    }
}

/// How a new tetrahedron sits on top of a [`LayeredTop`] when layered over
/// one of its edge classes.
pub(crate) struct Layering {
    /// Role to vertex of the new tetrahedron, for the triangle opposite role 3.
    pub lower_a: [u8; 4],
    /// Likewise for the triangle opposite role 2.
    pub lower_b: [u8; 4],
    /// Roles of the new top, as vertices of the new tetrahedron.
    pub new_roles: [u8; 4],
}

pub(crate) const LAYERINGS: [Layering; 3] = [
    Layering {
        lower_a: [2, 1, 0, 3],
        lower_b: [0, 3, 2, 1],
        new_roles: [2, 3, 1, 0],
    },
    Layering {
        lower_a: [0, 2, 1, 3],
        lower_b: [3, 1, 2, 0],
        new_roles: [3, 2, 0, 1],
    },
    Layering {
        lower_a: [0, 1, 2, 3],
        lower_b: [0, 1, 2, 3],
        new_roles: [2, 3, 1, 0],
    },
];

/// Signed weights after layering over `edge`.
pub(crate) fn layered_weights(w: [i64; 3], edge: TopEdge) -> [i64; 3] {
    let [x, y, z] = w;
    match edge {
        TopEdge::X => [y, z, y + z],
        TopEdge::Y => [z, x, x + z],
        TopEdge::Z => [-y, x, x - y],
    }
}

/// Role permutation folding triangle A onto triangle B across `edge`.
pub(crate) fn fold_roles(edge: TopEdge) -> Perm4 {
    match edge {
        TopEdge::X => Perm4::new([1, 3, 0, 2]),
        TopEdge::Y => Perm4::new([3, 0, 1, 2]),
        TopEdge::Z => Perm4::new([0, 1, 3, 2]),
    }
}

/// Order of `H1` after folding the top triangles together across `edge`.
pub(crate) fn fold_order(w: [i64; 3], edge: TopEdge) -> u64 {
    let [x, y, z] = w;
    match edge {
        TopEdge::X => (y + z).unsigned_abs(),
        TopEdge::Y => (x + z).unsigned_abs(),
        TopEdge::Z => (x - y).unsigned_abs(),
    }
}

/// Role permutation of the one-tetrahedron base, whose face 3 is glued to
/// face 0 by 0→1, 1→2, 2→3.
pub(crate) const BASE_GLUING: [u8; 4] = [1, 2, 3, 0];
pub(crate) const BASE_ROLES: [u8; 4] = [0, 3, 2, 1];

impl LayeredTop {
    pub fn weight(&self, edge: TopEdge) -> i64 {
        self.weights[edge as usize]
    }

    /// Meridinal cuts in increasing order.
    pub fn cuts(&self) -> [u64; 3] {
        let mut c = self.weights.map(i64::unsigned_abs);
        c.sort_unstable();
        c
    }

    /// The edge class with the given number of cuts, preferring `X`, `Y`, `Z`
    /// in that order.
    pub fn edge_with_cuts(&self, cuts: u64) -> Option<TopEdge> {
        TopEdge::ALL.into_iter().find(|&e| self.weight(e).unsigned_abs() == cuts)
    }

    /// Face of the top tetrahedron opposite role 3, then role 2.
    pub fn faces(&self) -> [usize; 2] {
        [self.roles.apply(3), self.roles.apply(2)]
    }
}

/// Adds a layered solid torus with meridinal cuts
/// `(cuts0, cuts1, cuts0 + cuts1)` to `tri` and returns its top.
pub fn insert_layered_solid_torus(tri: &mut Triangulation, cuts0: u64, cuts1: u64) -> Result<LayeredTop> {
    let (a, b) = if cuts0 <= cuts1 { (cuts0, cuts1) } else { (cuts1, cuts0) };
    if b == 0 || a.gcd(&b) != 1 {
        return Err(KernelError::invalid_argument(format!(
            "layered solid torus needs coprime cuts, not ({}, {})",
            cuts0, cuts1
        )));
    }
    Ok(build_lst(tri, a, b))
}

fn build_lst(tri: &mut Triangulation, a: u64, b: u64) -> LayeredTop {
    match (a, b) {
        (1, 2) => {
            let tet = tri.new_tetrahedron();
            tri.glue_unchecked(tet, 3, tet, Perm4::new(BASE_GLUING));
            LayeredTop {
                tet,
                roles: Perm4::new(BASE_ROLES),
                weights: [1, 2, 3],
            }
        }
        (1, 1) => {
            let base = build_lst(tri, 1, 2);
            layer(tri, &base, TopEdge::Z)
        }
        (0, 1) => {
            let two = build_lst(tri, 1, 1);
            let edge = two.edge_with_cuts(2).unwrap_or(TopEdge::X);
            layer(tri, &two, edge)
        }
        _ => {
            let d = b - a;
            let below = build_lst(tri, a.min(d), a.max(d));
            let edge = if below.weight(TopEdge::X).unsigned_abs() == d {
                TopEdge::X
            } else {
                TopEdge::Y
            };
            layer(tri, &below, edge)
        }
    }
}

/// Layers a new tetrahedron over `edge` of `top`.
pub fn layer(tri: &mut Triangulation, top: &LayeredTop, edge: TopEdge) -> LayeredTop {
    let l = &LAYERINGS[edge as usize];
    let new = tri.new_tetrahedron();
    let inv = top.roles.inverse();
    let [face_a, face_b] = top.faces();
    tri.glue_unchecked(top.tet, face_a, new, Perm4::new(l.lower_a) * inv);
    tri.glue_unchecked(top.tet, face_b, new, Perm4::new(l.lower_b) * inv);
    LayeredTop {
        tet: new,
        roles: Perm4::new(l.new_roles),
        weights: layered_weights(top.weights, edge),
    }
}

/// Glues the two top triangles to each other across `edge`.
pub fn fold(tri: &mut Triangulation, top: &LayeredTop, edge: TopEdge) {
    let gluing = top.roles * fold_roles(edge) * top.roles.inverse();
    tri.glue_unchecked(top.tet, top.roles.apply(3), top.tet, gluing);
}

/// The layered solid torus `LST(cuts0, cuts1, cuts0 + cuts1)`.
pub fn layered_solid_torus(cuts0: u64, cuts1: u64) -> Result<Triangulation> {
    let mut tri = Triangulation::new();
    insert_layered_solid_torus(&mut tri, cuts0, cuts1)?;
    Ok(tri)
}

/// The layered lens space `L(p, q)`: a layered solid torus whose top
/// triangles are folded together so that `H1 = Z_p`.
pub fn layered_lens_space(p: u64, q: u64) -> Result<Triangulation> {
    if p == 0 || q.gcd(&p) != 1 {
        return Err(KernelError::invalid_argument(format!(
            "L({}, {}) needs p > 0 and gcd(p, q) = 1",
            p, q
        )));
    }
    let mut tri = Triangulation::new();
    if p == 1 {
        let top = build_lst(&mut tri, 1, 2);
        fold(&mut tri, &top, TopEdge::Z);
        return Ok(tri);
    }
    let q = (q % p).min(p - q % p);
    let (a, b) = (p - 2 * q, q);
    let top = build_lst(&mut tri, a.min(b), a.max(b));
    let edge = TopEdge::ALL
        .into_iter()
        .filter(|&e| fold_order(top.weights, e) == p)
        .min_by_key(|&e| top.weight(e).unsigned_abs() != a)
        .ok_or_else(|| KernelError::UnsolvedCase(format!("no fold of LST{:?} gives L({}, {})", top.cuts(), p, q)))?;
    fold(&mut tri, &top, edge);
    Ok(tri)
}

/// The two-tetrahedron figure-eight knot complement.
pub fn figure_eight() -> Triangulation {
    let mut tri = Triangulation::with_size(2);
    for (face, image) in [[1, 3, 0, 2], [2, 0, 3, 1], [0, 3, 2, 1], [2, 1, 0, 3]]
        .into_iter()
        .enumerate()
    {
        tri.glue_unchecked(0, face, 1, Perm4::new(image));
    }
    tri
}

/// The one-tetrahedron Gieseking manifold, non-orientable with one ideal
/// vertex.
pub fn gieseking() -> Triangulation {
    let mut tri = Triangulation::with_size(1);
    tri.glue_unchecked(0, 0, 0, Perm4::new([1, 2, 0, 3]));
    tri.glue_unchecked(0, 2, 0, Perm4::new([0, 2, 3, 1]));
    tri
}

impl Triangulation {
    /// `join` for constructions that only ever touch fresh faces.
    pub(crate) fn glue_unchecked(&mut self, tet: usize, face: usize, adj: usize, gluing: Perm4) {
        if let Err(e) = self.join(tet, face, adj, gluing) {
            debug_assert!(false, "construction gluing failed: {}", e);
        }
    }
}
