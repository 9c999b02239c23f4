// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Saturated annuli.
//!
//! A saturated annulus is a square made of two triangles, each a face of
//! some tetrahedron. For each triangle a role permutation maps annulus
//! vertices 0-2 to tetrahedron vertices, and role 3 to the vertex opposite
//! the face:
//!
//! ```text
//!     0 *--------* 2 / 1
//!       |      / |
//!       |  F0 /  |
//!       |    / F1|
//!       |   /    |
//!     1 *--------* 0
//!     / 2
//! ```
//!
//! The first face `F0` has vertices 0 (top left), 1 (bottom left) and 2
//! (top right). The second face `F1` has vertices 0 (bottom right),
//! 1 (top right) and 2 (bottom left). The vertical sides are fibres, the
//! top and bottom are horizontal, and the faces meet along the diagonal.
//!
//! In homology of the closed-up torus, write `f` for the upward fibre and
//! `b` for the rightward horizontal edge; the diagonal is `f + b`.

use num_integer::Integer as _;

use crate::error::{KernelError, Result};
use crate::maths::Perm4;
use crate::triangulation::construct::{insert_layered_solid_torus, LayeredTop, TopEdge};
use crate::triangulation::Triangulation;

/// A 2x2 integer matrix, row-major.
pub type Matrix2 = [[i64; 2]; 2];

/// Positions of the vertices of `F0` as `(f, b)` coordinates.
const POSITION: [[i64; 2]; 3] = [[1, 0], [0, 0], [1, 1]];

/// The three edge classes of an annulus closed up into a torus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AnnulusEdge {
    Vertical,
    Horizontal,
    Diagonal,
}

impl AnnulusEdge {
    const ALL: [AnnulusEdge; 3] = [AnnulusEdge::Vertical, AnnulusEdge::Horizontal, AnnulusEdge::Diagonal];

    /// This edge, oriented upward or rightward, as annulus vertices of
    /// `F0` and then `F1`.
    fn oriented(self) -> [[usize; 2]; 2] {
        match self {
            AnnulusEdge::Vertical => [[1, 0], [0, 1]],
            AnnulusEdge::Horizontal => [[0, 2], [2, 0]],
            AnnulusEdge::Diagonal => [[1, 2], [2, 1]],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SatAnnulus {
    pub tet: [usize; 2],
    pub roles: [Perm4; 2],
}

impl SatAnnulus {
    pub fn new(tet0: usize, roles0: Perm4, tet1: usize, roles1: Perm4) -> Self {
        Self {
            tet: [tet0, tet1],
            roles: [roles0, roles1],
        }
    }

    /// The tetrahedron face holding triangle `which`.
    pub fn face(&self, which: usize) -> usize {
        self.roles[which].apply(3)
    }

    /// How many of the two triangles lie on the boundary.
    pub fn meets_boundary(&self, tri: &Triangulation) -> usize {
        (0..2).filter(|&i| tri.adjacent(self.tet[i], self.face(i)).is_none()).count()
    }

    /// The same annulus seen from the tetrahedra on its other side.
    pub fn switched(&self, tri: &Triangulation) -> Option<Self> {
        let (t0, g0) = tri.adjacent(self.tet[0], self.face(0))?;
        let (t1, g1) = tri.adjacent(self.tet[1], self.face(1))?;
        Some(Self::new(t0, g0 * self.roles[0], t1, g1 * self.roles[1]))
    }

    /// Moves to the other side of the annulus.
    pub fn switch_sides(&mut self, tri: &Triangulation) -> Result<()> {
        *self = self
            .switched(tri)
            .ok_or_else(|| KernelError::failed_precondition("annulus meets the boundary"))?;
        Ok(())
    }

    /// Reverses the fibre direction, keeping each triangle in place.
    pub fn reflect_vertical(&mut self) {
        let swap = Perm4::transposition(0, 1);
        self.roles = [self.roles[0] * swap, self.roles[1] * swap];
    }

    /// Reverses the horizontal direction, exchanging the two triangles.
    pub fn reflect_horizontal(&mut self) {
        let swap = Perm4::transposition(0, 1);
        self.tet.swap(0, 1);
        self.roles = [self.roles[1] * swap, self.roles[0] * swap];
    }

    /// Turns the square through 180 degrees, exchanging the two triangles.
    pub fn rotate_half_turn(&mut self) {
        self.tet.swap(0, 1);
        self.roles.swap(0, 1);
    }

    /// Whether `other` is this annulus seen from its other side, possibly
    /// after reflections. Returns `(vertical, horizontal)` reflections that
    /// carry the other side's coordinates to this one's.
    pub fn is_adjacent(&self, tri: &Triangulation, other: &SatAnnulus) -> Option<(bool, bool)> {
        let opposite = other.switched(tri)?;
        let swap = Perm4::transposition(0, 1);
        if opposite.tet == self.tet {
            if opposite.roles == self.roles {
                return Some((false, false));
            }
            if opposite.roles == [self.roles[0] * swap, self.roles[1] * swap] {
                return Some((true, false));
            }
        }
        if opposite.tet == [self.tet[1], self.tet[0]] {
            if opposite.roles == [self.roles[1] * swap, self.roles[0] * swap] {
                return Some((false, true));
            }
            if opposite.roles == [self.roles[1], self.roles[0]] {
                return Some((true, true));
            }
        }
        None
    }

    /// Whether `other` is glued to this annulus face to face, in any
    /// orientation. Returns the matrix whose rows express the other side's
    /// fibre and horizontal curves in terms of this annulus's.
    pub fn is_joined(&self, tri: &Triangulation, other: &SatAnnulus) -> Option<Matrix2> {
        let opposite = other.switched(tri)?;
        let faces = |a: &SatAnnulus, i: usize| (a.tet[i], a.face(i));
        let swap_faces = if faces(&opposite, 0) == faces(self, 0) && faces(&opposite, 1) == faces(self, 1) {
            false
        } else if faces(&opposite, 0) == faces(self, 1) && faces(&opposite, 1) == faces(self, 0) {
            true
        } else {
            return None;
        };
        let (mine0, mine1) = if swap_faces { (1, 0) } else { (0, 1) };
        let map = self.roles[mine0].inverse() * opposite.roles[0];
        if map != self.roles[mine1].inverse() * opposite.roles[1] {
            return None;
        }
        let p = |k: usize| POSITION[map.apply(k)];
        let sign = if swap_faces { -1 } else { 1 };
        let fibre = [sign * (p(0)[0] - p(1)[0]), sign * (p(0)[1] - p(1)[1])];
        let horizontal = [sign * (p(2)[0] - p(0)[0]), sign * (p(2)[1] - p(0)[1])];
        Some([fibre, horizontal])
    }

    /// Glues a new layered solid torus onto this annulus, whose two
    /// triangles must both be boundary. The meridian disc cuts the vertical
    /// edges `|alpha|` times, the horizontal edges `|beta|` times and the
    /// diagonal `|alpha - beta|` times.
    ///
    /// The case `(2, 1)` needs no tetrahedra: the two triangles are folded
    /// onto each other across the vertical edge.
    pub fn attach_lst(&self, tri: &mut Triangulation, alpha: i64, beta: i64) -> Result<()> {
        if alpha == 0 || alpha.gcd(&beta) != 1 {
            return Err(KernelError::invalid_argument(format!(
                "no layered solid torus has meridian ({}, {})",
                alpha, beta
            )));
        }
        if self.meets_boundary(tri) != 2 {
            return Err(KernelError::failed_precondition("annulus triangles are already glued"));
        }
        let (alpha, beta) = if alpha < 0 { (-alpha, -beta) } else { (alpha, beta) };
        if (alpha, beta) == (2, 1) {
            let fold = self.roles[1] * Perm4::transposition(0, 1) * self.roles[0].inverse();
            return tri.join(self.tet[0], self.face(0), self.tet[1], fold);
        }
        let mut cuts = [alpha.unsigned_abs(), beta.unsigned_abs(), (alpha - beta).unsigned_abs()];
        cuts.sort_unstable();
        let top = insert_layered_solid_torus(tri, cuts[0], cuts[1])?;
        let [p0, p1] = top_maps(&top)
            .into_iter()
            .find(|(_, m)| *m == (alpha, -beta) || *m == (-alpha, beta))
            .map(|(maps, _)| maps)
            .ok_or_else(|| KernelError::UnsolvedCase(format!("cannot place LST{:?} on an annulus", top.cuts())))?;
        for (i, p) in [p0, p1].into_iter().enumerate() {
            let gluing = top.roles * p * self.roles[i].inverse();
            tri.join(self.tet[i], self.face(i), top.tet, gluing)?;
        }
        Ok(())
    }
}

/// Classifies an oriented edge between two roles of a layered solid torus
/// top, returning the edge class and whether it runs with (+1) or against
/// (-1) the class orientation.
fn classify(from: usize, to: usize) -> Option<(TopEdge, i64)> {
    TopEdge::ALL.into_iter().find_map(|class| {
        class.role_edges().iter().find_map(|&[a, b]| {
            if [from, to] == [a, b] {
                Some((class, 1))
            } else if [from, to] == [b, a] {
                Some((class, -1))
            } else {
                None
            }
        })
    })
}

/// Signed meridian images of the vertical and horizontal edges when annulus
/// triangle `i` is placed on the top by the role map `maps[i]` (annulus
/// vertex to top role). `None` if the two maps do not agree on the torus.
pub(crate) fn meridian_under(top: &LayeredTop, maps: [Perm4; 2]) -> Option<(i64, i64)> {
    let mut images = [0i64; 3];
    for (slot, edge) in AnnulusEdge::ALL.into_iter().enumerate() {
        let [e0, e1] = edge.oriented();
        let c0 = classify(maps[0].apply(e0[0]), maps[0].apply(e0[1]))?;
        let c1 = classify(maps[1].apply(e1[0]), maps[1].apply(e1[1]))?;
        if c0 != c1 {
            return None;
        }
        images[slot] = c0.1 * top.weight(c0.0);
    }
    Some((images[0], images[1]))
}

/// Every consistent placement of an annulus on a layered solid torus top,
/// with the signed meridian images of the vertical and horizontal edges.
fn top_maps(top: &LayeredTop) -> Vec<([Perm4; 2], (i64, i64))> {
    let mut out = Vec::new();
    for (face0, face1) in [(3, 2), (2, 3)] {
        for p0 in Perm4::all().into_iter().filter(|p| p.apply(3) == face0) {
            for p1 in Perm4::all().into_iter().filter(|p| p.apply(3) == face1) {
                if let Some(m) = meridian_under(top, [p0, p1]) {
                    out.push(([p0, p1], m));
                }
            }
        }
    }
    out
}

/// The meridian of a layered solid torus whose top is the annulus `ann`
/// seen from inside, as `(alpha, beta)` with `alpha >= 0`: the meridian cuts
/// the vertical edges `alpha` times and the horizontal edges `|beta|` times.
pub(crate) fn lst_meridian(top: &LayeredTop, ann: &SatAnnulus) -> Option<(i64, i64)> {
    let inv = top.roles.inverse();
    let (v, h) = meridian_under(top, [inv * ann.roles[0], inv * ann.roles[1]])?;
    let (alpha, beta) = (v, -h);
    Some(if alpha < 0 { (-alpha, -beta) } else { (alpha, beta) })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Two tetrahedra with face 3 of tetrahedron 1 glued to face 0 of
    /// tetrahedron 0 by 0→1, 1→2, 2→3, 3→0.
    fn glued_pair() -> (Triangulation, Perm4) {
        let r = Perm4::new([1, 2, 3, 0]);
        let mut tri = Triangulation::with_size(2);
        tri.join(1, 3, 0, r).unwrap();
        (tri, r)
    }

    #[test]
    fn test_adjacency_after_vertical_reflection() {
        let (tri, r) = glued_pair();
        let a1 = SatAnnulus::new(0, r, 1, Perm4::identity());
        let mut a2 = SatAnnulus::new(1, Perm4::identity(), 0, r);
        assert_eq!(a1.meets_boundary(&tri), 0);
        assert_eq!(a1.is_adjacent(&tri, &a2), Some((false, false)));
        a2.reflect_vertical();
        assert_eq!(a1.is_adjacent(&tri, &a2), Some((true, false)));
    }

    #[test]
    fn test_joined_matrices() {
        let (tri, r) = glued_pair();
        let a1 = SatAnnulus::new(0, r, 1, Perm4::identity());
        let mut a2 = SatAnnulus::new(1, Perm4::identity(), 0, r);
        assert_eq!(a1.is_joined(&tri, &a2), Some([[1, 0], [0, 1]]));
        a2.reflect_vertical();
        assert_eq!(a1.is_joined(&tri, &a2), Some([[-1, 0], [1, 1]]));
        a2.reflect_vertical();
        a2.rotate_half_turn();
        let m = a1.is_joined(&tri, &a2).unwrap();
        assert_eq!(m, [[-1, 0], [0, -1]]);
        assert_eq!(a1.is_adjacent(&tri, &a2), Some((true, true)));
    }

    #[test]
    fn test_switch_sides_round_trip() {
        let (tri, r) = glued_pair();
        let a = SatAnnulus::new(0, r, 1, Perm4::identity());
        let mut b = a;
        b.switch_sides(&tri).unwrap();
        b.switch_sides(&tri).unwrap();
        assert_eq!(a, b);
        let lone = SatAnnulus::new(0, Perm4::identity(), 0, Perm4::new([0, 1, 3, 2]));
        assert_eq!(lone.meets_boundary(&tri), 2);
        assert!(lone.switched(&tri).is_none());
    }

    #[test]
    fn test_reflections_are_involutions() {
        let a = SatAnnulus::new(0, Perm4::new([1, 2, 3, 0]), 1, Perm4::new([0, 2, 1, 3]));
        let mut b = a;
        b.reflect_horizontal();
        assert_ne!(a, b);
        b.reflect_horizontal();
        assert_eq!(a, b);
        b.reflect_vertical();
        b.reflect_vertical();
        assert_eq!(a, b);
    }

    #[test]
    fn test_attach_rejects_bad_meridians() {
        let mut tri = Triangulation::with_size(2);
        let a = SatAnnulus::new(0, Perm4::identity(), 1, Perm4::identity());
        assert!(a.attach_lst(&mut tri, 0, 1).is_err());
        assert!(a.attach_lst(&mut tri, 4, 2).is_err());
        assert_eq!(tri.size(), 2);
    }

    #[test]
    fn test_every_lst_top_has_placements() {
        for (a, b) in [(1, 2), (2, 3), (1, 3)] {
            let mut tri = Triangulation::new();
            let top = insert_layered_solid_torus(&mut tri, a, b).unwrap();
            let maps = top_maps(&top);
            assert!(!maps.is_empty());
            for (_, (v, h)) in maps {
                let mut cuts = [v.unsigned_abs(), h.unsigned_abs(), (v + h).unsigned_abs()];
                cuts.sort_unstable();
                assert_eq!(cuts, top.cuts());
            }
        }
    }
}
