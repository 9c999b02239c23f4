// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Layered solid tori and layered chains.

use std::fmt;

use crate::maths::Perm4;
use crate::triangulation::construct::{layered_weights, LayeredTop, TopEdge, BASE_GLUING, BASE_ROLES, LAYERINGS};
use crate::triangulation::Triangulation;

/// A layered solid torus found inside a triangulation: a one-tetrahedron
/// base with two faces folded together, and a stack of tetrahedra each
/// layered over an edge of the boundary below it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayeredSolidTorus {
    /// Base first, top last.
    tetrahedra: Vec<usize>,
    top: LayeredTop,
}

impl LayeredSolidTorus {
    /// The largest layered solid torus with `tet` as its base, if `tet` has
    /// two faces folded together in the pattern of a base.
    pub fn recognise_from_base(tri: &Triangulation, tet: usize) -> Option<Self> {
        let gluing = Perm4::new(BASE_GLUING);
        let relabel = Perm4::all()
            .into_iter()
            .find(|&r| tri.adjacent(tet, r.apply(3)) == Some((tet, r * gluing * r.inverse())))?;
        let mut lst = Self {
            tetrahedra: vec![tet],
            top: LayeredTop {
                tet,
                roles: relabel * Perm4::new(BASE_ROLES),
                weights: [1, 2, 3],
            },
        };
        while let Some(next) = lst.layer_above(tri) {
            lst.tetrahedra.push(next.tet);
            lst.top = next;
        }
        Some(lst)
    }

    /// Every layered solid torus in the triangulation, one per base.
    pub fn find_all(tri: &Triangulation) -> Vec<Self> {
        (0..tri.size()).filter_map(|t| Self::recognise_from_base(tri, t)).collect()
    }

    /// The top of this torus after one more layering, if a single new
    /// tetrahedron is glued to both top triangles in a layering pattern.
    fn layer_above(&self, tri: &Triangulation) -> Option<LayeredTop> {
        let top = &self.top;
        let [face_a, face_b] = top.faces();
        let (next, ga) = tri.adjacent(top.tet, face_a)?;
        let (other, gb) = tri.adjacent(top.tet, face_b)?;
        if next != other || self.tetrahedra.contains(&next) {
            return None;
        }
        let inv = top.roles.inverse();
        TopEdge::ALL.into_iter().find_map(|edge| {
            let l = &LAYERINGS[edge as usize];
            let relabel = ga * top.roles * Perm4::new(l.lower_a).inverse();
            (gb == relabel * Perm4::new(l.lower_b) * inv).then(|| LayeredTop {
                tet: next,
                roles: relabel * Perm4::new(l.new_roles),
                weights: layered_weights(top.weights, edge),
            })
        })
    }

    pub fn size(&self) -> usize {
        self.tetrahedra.len()
    }

    pub fn tetrahedra(&self) -> &[usize] {
        &self.tetrahedra
    }

    pub fn base(&self) -> usize {
        self.tetrahedra[0]
    }

    pub fn top(&self) -> &LayeredTop {
        &self.top
    }

    /// The two boundary faces of the top tetrahedron.
    pub fn top_faces(&self) -> [usize; 2] {
        self.top.faces()
    }

    /// Meridinal cuts of the three boundary edges, in increasing order.
    pub fn cuts(&self) -> [u64; 3] {
        self.top.cuts()
    }

    /// Whether the top triangles are exactly the given faces of `tet`, in
    /// either order.
    pub fn has_top(&self, tet: usize, faces: [usize; 2]) -> bool {
        let [a, b] = self.top_faces();
        self.top.tet == tet && (faces == [a, b] || faces == [b, a])
    }
}

impl fmt::Display for LayeredSolidTorus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c] = self.cuts();
        write!(f, "LST({},{},{})", a, b, c)
    }
}

/// A chain of tetrahedra, each glued to the next along two faces.
///
/// In the bottom tetrahedron the faces opposite roles 1 and 2 face
/// downward; in the top tetrahedron the faces opposite roles 0 and 3 face
/// upward.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayeredChain {
    tetrahedra: Vec<usize>,
    bottom_roles: Perm4,
    top_roles: Perm4,
}

impl LayeredChain {
    /// A chain of one tetrahedron.
    pub fn new(tet: usize, roles: Perm4) -> Self {
        Self {
            tetrahedra: vec![tet],
            bottom_roles: roles,
            top_roles: roles,
        }
    }

    /// The next link beyond `(tet, roles)` through the faces opposite
    /// `faces`, if one exists that is not already in the chain.
    fn next_link(&self, tri: &Triangulation, tet: usize, roles: Perm4, faces: [usize; 2]) -> Option<(usize, Perm4)> {
        let (adj, g0) = tri.adjacent(tet, roles.apply(faces[0]))?;
        let (other, g1) = tri.adjacent(tet, roles.apply(faces[1]))?;
        if adj != other || self.tetrahedra.contains(&adj) {
            return None;
        }
        let adj_roles = g0 * roles * Perm4::transposition(0, 1);
        (adj_roles == g1 * roles * Perm4::transposition(2, 3)).then_some((adj, adj_roles))
    }

    /// Adds one tetrahedron above the top, if possible.
    pub fn extend_above(&mut self, tri: &Triangulation) -> bool {
        let top = self.top();
        match self.next_link(tri, top, self.top_roles, [0, 3]) {
            Some((tet, roles)) => {
                self.tetrahedra.push(tet);
                self.top_roles = roles;
                true
            }
            None => false,
        }
    }

    /// Adds one tetrahedron below the bottom, if possible.
    pub fn extend_below(&mut self, tri: &Triangulation) -> bool {
        let bottom = self.bottom();
        match self.next_link(tri, bottom, self.bottom_roles, [1, 2]) {
            Some((tet, roles)) => {
                self.tetrahedra.insert(0, tet);
                self.bottom_roles = roles;
                true
            }
            None => false,
        }
    }

    /// Extends in both directions as far as possible. Returns whether the
    /// chain grew.
    pub fn extend_maximal(&mut self, tri: &Triangulation) -> bool {
        let before = self.index();
        while self.extend_above(tri) {}
        while self.extend_below(tri) {}
        self.index() > before
    }

    /// Number of tetrahedra in the chain.
    pub fn index(&self) -> usize {
        self.tetrahedra.len()
    }

    pub fn tetrahedra(&self) -> &[usize] {
        &self.tetrahedra
    }

    pub fn bottom(&self) -> usize {
        self.tetrahedra[0]
    }

    pub fn top(&self) -> usize {
        self.tetrahedra[self.tetrahedra.len() - 1]
    }

    pub fn bottom_roles(&self) -> Perm4 {
        self.bottom_roles
    }

    pub fn top_roles(&self) -> Perm4 {
        self.top_roles
    }

    /// The faces of the bottom tetrahedron facing downward.
    pub fn bottom_faces(&self) -> [usize; 2] {
        [self.bottom_roles.apply(1), self.bottom_roles.apply(2)]
    }

    /// The faces of the top tetrahedron facing upward.
    pub fn top_faces(&self) -> [usize; 2] {
        [self.top_roles.apply(0), self.top_roles.apply(3)]
    }
}

impl fmt::Display for LayeredChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Chain({})", self.index())
    }
}
