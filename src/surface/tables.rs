// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Fixed combinatorics of normal discs inside a single tetrahedron.
//!
//! Disc types are numbered 0-9: types 0-3 are the triangles cutting off
//! vertices 0-3, types 4-6 are the quadrilaterals of quad types 0-2, and
//! types 7-9 are the octagons of types 0-2. Quad type `q` separates the two
//! vertex pairs in `QUAD_DEFN[q]`. Octagon type `k` has the same two sides
//! as quad type `k`, but crosses each edge joining a side to itself twice.

/// The two sides of each quad type, as consecutive pairs.
pub const QUAD_DEFN: [[usize; 4]; 3] = [[0, 1, 2, 3], [0, 2, 1, 3], [0, 3, 1, 2]];

/// For each quad type, the vertex on the same side as each vertex.
pub const QUAD_PARTNER: [[usize; 4]; 3] = [[1, 0, 3, 2], [2, 3, 0, 1], [3, 2, 1, 0]];

/// The quad type that keeps two distinct vertices on the same side.
pub const VERTEX_SPLIT: [[usize; 4]; 4] = [
    [usize::MAX, 0, 1, 2],
    [0, usize::MAX, 2, 1],
    [1, 2, usize::MAX, 0],
    [2, 1, 0, usize::MAX],
];

pub const N_DISC_TYPES: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscKind {
    Triangle(usize),
    Quad(usize),
    Octagon(usize),
}

pub fn disc_kind(disc_type: usize) -> DiscKind {
    match disc_type {
        0..=3 => DiscKind::Triangle(disc_type),
        4..=6 => DiscKind::Quad(disc_type - 4),
        _ => DiscKind::Octagon(disc_type - 7),
    }
}

/// The two quad types that separate two distinct vertices.
pub fn split_meeting(a: usize, b: usize) -> [usize; 2] {
    let s = VERTEX_SPLIT[a][b];
    [(s + 1) % 3, (s + 2) % 3]
}

/// How many times a disc of the given type crosses the edge `ab`.
pub fn edge_crossings(disc_type: usize, a: usize, b: usize) -> usize {
    match disc_kind(disc_type) {
        DiscKind::Triangle(v) => usize::from(v == a || v == b),
        DiscKind::Quad(q) => usize::from(VERTEX_SPLIT[a][b] != q),
        DiscKind::Octagon(k) => {
            if VERTEX_SPLIT[a][b] == k {
                2
            } else {
                1
            }
        }
    }
}

/// Whether a disc of the given type has an arc in the face opposite `face`
/// cutting off the corner at `corner`.
pub fn has_arc(disc_type: usize, face: usize, corner: usize) -> bool {
    if face == corner {
        return false;
    }
    match disc_kind(disc_type) {
        DiscKind::Triangle(v) => v == corner,
        DiscKind::Quad(q) => VERTEX_SPLIT[face][corner] == q,
        DiscKind::Octagon(k) => VERTEX_SPLIT[face][corner] != k,
    }
}

/// The arcs on the boundary of a disc, as `(face, corner)` pairs.
pub fn disc_arcs(disc_type: usize) -> Vec<(usize, usize)> {
    let mut arcs = Vec::with_capacity(8);
    for face in 0..4 {
        for corner in 0..4 {
            if has_arc(disc_type, face, corner) {
                arcs.push((face, corner));
            }
        }
    }
    arcs
}

/// Whether the side of the disc on which its reference vertex lies contains
/// `vertex`. The reference vertex is the cut-off vertex for a triangle and
/// vertex 0 otherwise.
pub fn disc_side_contains(disc_type: usize, vertex: usize) -> bool {
    match disc_kind(disc_type) {
        DiscKind::Triangle(v) => v == vertex,
        DiscKind::Quad(q) | DiscKind::Octagon(q) => vertex == 0 || QUAD_PARTNER[q][vertex] == 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::triangulation::EDGE_VERTICES;

    #[test]
    fn test_quad_tables_agree() {
        for (q, defn) in QUAD_DEFN.iter().enumerate() {
            assert_eq!(VERTEX_SPLIT[defn[0]][defn[1]], q);
            assert_eq!(VERTEX_SPLIT[defn[2]][defn[3]], q);
            assert_eq!(QUAD_PARTNER[q][defn[0]], defn[1]);
            assert_eq!(QUAD_PARTNER[q][defn[3]], defn[2]);
        }
    }

    #[test]
    fn test_disc_degrees() {
        for t in 0..N_DISC_TYPES {
            let crossings: usize = EDGE_VERTICES.iter().map(|&[a, b]| edge_crossings(t, a, b)).sum();
            // A disc's boundary has one arc between consecutive edge crossings.
            assert_eq!(disc_arcs(t).len(), crossings);
            let expected = match disc_kind(t) {
                DiscKind::Triangle(_) => 3,
                DiscKind::Quad(_) => 4,
                DiscKind::Octagon(_) => 8,
            };
            assert_eq!(crossings, expected);
        }
        assert_eq!(split_meeting(0, 1), [1, 2]);
    }
}
