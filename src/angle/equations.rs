// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Linear equations satisfied by every angle structure.

use crate::maths::{Integer, MatrixInt};
use crate::triangulation::Triangulation;

/// The angle coordinate, within one tetrahedron, of the given edge.
pub fn angle_index(edge: usize) -> usize {
    edge.min(5 - edge)
}

/// One row per tetrahedron (`x0 + x1 + x2 - s = 0`) followed by one row per
/// internal edge (angles around the edge `- 2s = 0`).
///
/// The matrix has `3n + 1` columns, the last being the scaling coordinate.
/// Boundary edges carry no equation.
pub fn angle_equations(tri: &Triangulation) -> MatrixInt {
    let n = tri.size();
    let scale = 3 * n;
    let sk = tri.skeleton();
    let internal: Vec<_> = sk.edges().iter().filter(|e| !e.is_boundary()).collect();
    let mut m = MatrixInt::new(n + internal.len(), scale + 1);
    for tet in 0..n {
        for k in 0..3 {
            m.set(tet, 3 * tet + k, Integer::ONE);
        }
        m.set(tet, scale, Integer::new(-1));
    }
    for (i, edge) in internal.iter().enumerate() {
        let row = n + i;
        for emb in edge.embeddings() {
            *m.entry_mut(row, 3 * emb.tet + angle_index(emb.edge)) += Integer::ONE;
        }
        m.set(row, scale, Integer::new(-2));
    }
    m
}
