// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Matching equations, validity constraints, and lifting reduced vectors.
//!
//! In systems that store triangles the equations say that the normal arcs
//! on either side of every internal triangle agree. In reduced systems they
//! say that the quadrilaterals (and octagons) tilt consistently around every
//! internal edge. Closed reduced systems add, for every ideal vertex, the
//! equations that make triangle coordinates around its link finite.

use std::collections::VecDeque;

use super::coords::{NormalCoords, NormalEncoding};
use super::tables::{split_meeting, VERTEX_SPLIT};
use crate::enumerate::ValidityConstraints;
use crate::error::{KernelError, Result};
use crate::maths::{Integer, MatrixInt};
use crate::triangulation::homology::walk_around_edge;
use crate::triangulation::Triangulation;

/// Sparse row of coefficients, merged into a matrix at the end.
type Row = Vec<(usize, i64)>;

fn to_matrix(rows: Vec<Row>, cols: usize) -> MatrixInt {
    let rows: Vec<Row> = rows
        .into_iter()
        .filter(|row| {
            let mut dense = std::collections::BTreeMap::new();
            for &(c, v) in row {
                *dense.entry(c).or_insert(0i64) += v;
            }
            dense.values().any(|&v| v != 0)
        })
        .collect();
    let mut m = MatrixInt::new(rows.len(), cols);
    for (r, row) in rows.iter().enumerate() {
        for &(c, v) in row {
            *m.entry_mut(r, c) += Integer::new(v);
        }
    }
    m
}

/// Columns of the non-triangle discs with an arc at `corner` in the face
/// opposite `face`, for a block layout given by `enc`.
fn corner_columns(enc: NormalEncoding, tet: usize, face: usize, corner: usize) -> Vec<usize> {
    let base = tet * enc.block();
    let mut cols = vec![base + enc.quad_offset() + VERTEX_SPLIT[face][corner]];
    if enc.stores_octagons() {
        for k in split_meeting(face, corner) {
            cols.push(base + enc.oct_offset() + k);
        }
    }
    cols
}

/// The matching equations for `coords`, one row per equation.
pub fn matching_equations(tri: &Triangulation, coords: NormalCoords) -> Result<MatrixInt> {
    if !coords.is_enumerable() {
        return Err(KernelError::invalid_argument(format!(
            "{} coordinates have no matching equations",
            coords
        )));
    }
    let enc = NormalEncoding::new(coords);
    let cols = tri.size() * enc.block();
    let rows = if enc.stores_triangles() {
        triangle_equations(tri, enc)
    } else {
        let mut rows = edge_equations(tri, enc);
        if coords.is_closed_only() {
            rows.extend(compactness_equations(tri, enc));
        }
        rows
    };
    Ok(to_matrix(rows, cols))
}

fn triangle_equations(tri: &Triangulation, enc: NormalEncoding) -> Vec<Row> {
    let sk = tri.skeleton();
    let mut rows = Vec::new();
    for triangle in sk.triangles() {
        let [front, back] = match triangle.embeddings() {
            [a, b] => [*a, *b],
            _ => continue,
        };
        let Some((_, g)) = tri.adjacent(front.simp, front.facet) else {
            continue;
        };
        for corner in (0..4).filter(|&v| v != front.facet) {
            let mut row = Vec::new();
            row.push((front.simp * enc.block() + corner, 1));
            row.extend(corner_columns(enc, front.simp, front.facet, corner).into_iter().map(|c| (c, 1)));
            let other = g.apply(corner);
            row.push((back.simp * enc.block() + other, -1));
            row.extend(corner_columns(enc, back.simp, back.facet, other).into_iter().map(|c| (c, -1)));
            rows.push(row);
        }
    }
    rows
}

fn edge_equations(tri: &Triangulation, enc: NormalEncoding) -> Vec<Row> {
    let sk = tri.skeleton();
    let block = enc.block();
    let mut rows = Vec::new();
    for edge in sk.edges().iter().filter(|e| !e.is_boundary()) {
        let start = edge.embeddings()[0];
        let mut row = Vec::new();
        walk_around_edge(tri, start.tet, start.edge, |tet, roles| {
            let (a, c, d) = (roles.apply(0), roles.apply(2), roles.apply(3));
            row.push((tet * block + VERTEX_SPLIT[a][c], 1));
            row.push((tet * block + VERTEX_SPLIT[a][d], -1));
            if enc.stores_octagons() {
                row.push((tet * block + 3 + VERTEX_SPLIT[a][c], -1));
                row.push((tet * block + 3 + VERTEX_SPLIT[a][d], 1));
            }
        });
        rows.push(row);
    }
    rows
}

/// Triangle coordinates around a vertex link, each expressed as a linear
/// form in the reduced coordinates, found by walking the link from one
/// corner. Returns the forms and the adjacencies left off the walk's tree.
fn link_potentials(tri: &Triangulation, enc: NormalEncoding, vertex: usize) -> Vec<Row> {
    let sk = tri.skeleton();
    let corners = sk.vertices()[vertex].embeddings();
    let mut potential: Vec<Option<Row>> = vec![None; tri.size() * 4];
    let mut rows = Vec::new();
    let Some(&(t0, v0)) = corners.first() else {
        return rows;
    };
    potential[t0 * 4 + v0] = Some(Vec::new());
    let mut queue = VecDeque::from([(t0, v0)]);
    while let Some((t, v)) = queue.pop_front() {
        let here = potential[t * 4 + v].clone().unwrap_or_default();
        for face in (0..4).filter(|&f| f != v) {
            let Some((u, g)) = tri.adjacent(t, face) else {
                continue;
            };
            let w = g.apply(v);
            // tri(u, w) = tri(t, v) + arcs(t, face, v) - arcs(u, g(face), w)
            let mut there = here.clone();
            there.extend(corner_columns(enc, t, face, v).into_iter().map(|c| (c, 1)));
            there.extend(corner_columns(enc, u, g.apply(face), w).into_iter().map(|c| (c, -1)));
            match &potential[u * 4 + w] {
                None => {
                    potential[u * 4 + w] = Some(there);
                    queue.push_back((u, w));
                }
                Some(existing) => {
                    let mut row = there;
                    row.extend(existing.iter().map(|&(c, x)| (c, -x)));
                    rows.push(row);
                }
            }
        }
    }
    rows
}

fn compactness_equations(tri: &Triangulation, enc: NormalEncoding) -> Vec<Row> {
    let sk = tri.skeleton();
    (0..sk.vertices().len())
        .filter(|&v| sk.vertices()[v].is_ideal())
        .flat_map(|v| link_potentials(tri, enc, v))
        .collect()
}

/// The validity constraints for `coords`: at most one quad type per
/// tetrahedron, and for almost normal systems at most one octagon type in
/// the whole surface.
pub fn validity_constraints(tri: &Triangulation, coords: NormalCoords) -> Result<ValidityConstraints> {
    if !coords.is_enumerable() {
        return Err(KernelError::invalid_argument(format!(
            "{} coordinates have no validity constraints",
            coords
        )));
    }
    let enc = NormalEncoding::new(coords);
    let mut constraints = ValidityConstraints::new(enc.block(), tri.size());
    let q = enc.quad_offset();
    if enc.stores_octagons() {
        let o = enc.oct_offset();
        constraints.add_local(&[q, q + 1, q + 2, o, o + 1, o + 2]);
        constraints.add_global(&[o, o + 1, o + 2]);
    } else {
        constraints.add_local(&[q, q + 1, q + 2]);
    }
    Ok(constraints)
}

/// Recovers triangle coordinates for a reduced vector, giving the smallest
/// non-negative solution with no vertex-linking components. Where the
/// triangle coordinates around a vertex link cannot be made consistent the
/// surface is spun around that vertex, and those coordinates are infinite.
///
/// Returns the vector in the encoding `enc.with_triangles()`.
pub(crate) fn lift_reduced(tri: &Triangulation, enc: NormalEncoding, reduced: &[Integer]) -> Vec<Integer> {
    let n = tri.size();
    let block = enc.block();
    let lifted_enc = enc.with_triangles();
    let out_block = lifted_enc.block();
    let mut out = vec![Integer::ZERO; n * out_block];
    for t in 0..n {
        for i in 0..block {
            out[t * out_block + 4 + i] = reduced[t * block + i].clone();
        }
    }

    // Non-triangle arcs at a corner, read from the lifted layout.
    let arcs = |out: &[Integer], t: usize, face: usize, corner: usize| -> Integer {
        corner_columns(lifted_enc, t, face, corner)
            .into_iter()
            .map(|c| out[c].clone())
            .sum()
    };

    let sk = tri.skeleton();
    for vertex in sk.vertices() {
        let corners = vertex.embeddings();
        let Some(&(t0, v0)) = corners.first() else {
            continue;
        };
        let mut value: Vec<Option<Integer>> = vec![None; n * 4];
        value[t0 * 4 + v0] = Some(Integer::ZERO);
        let mut consistent = true;
        let mut queue = VecDeque::from([(t0, v0)]);
        while let Some((t, v)) = queue.pop_front() {
            let here = value[t * 4 + v].clone().unwrap_or_default();
            for face in (0..4).filter(|&f| f != v) {
                let Some((u, g)) = tri.adjacent(t, face) else {
                    continue;
                };
                let w = g.apply(v);
                let there = &here + &arcs(&out, t, face, v) - arcs(&out, u, g.apply(face), w);
                match &value[u * 4 + w] {
                    None => {
                        value[u * 4 + w] = Some(there);
                        queue.push_back((u, w));
                    }
                    Some(existing) => consistent &= *existing == there,
                }
            }
        }
        let min = corners
            .iter()
            .filter_map(|&(t, v)| value[t * 4 + v].clone())
            .min()
            .unwrap_or_default();
        for &(t, v) in corners {
            out[t * out_block + v] = if consistent {
                value[t * 4 + v].as_ref().map(|x| x - &min).unwrap_or_default()
            } else {
                Integer::INFINITY
            };
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maths::dot;
    use crate::maths::vector::from_i64s;
    use crate::triangulation::construct;

    fn satisfies(m: &MatrixInt, v: &[Integer]) -> bool {
        (0..m.rows()).all(|r| dot(m.row(r), v).is_zero())
    }

    #[test]
    fn test_vertex_links_satisfy_standard_equations() {
        let tri = construct::figure_eight();
        let m = matching_equations(&tri, NormalCoords::Standard).unwrap();
        assert_eq!(m.cols(), 14);
        let mut link = vec![Integer::ZERO; 14];
        for t in 0..2 {
            for v in 0..4 {
                link[t * 7 + v] = Integer::ONE;
            }
        }
        assert!(satisfies(&m, &link));
        link[0] = Integer::new(2);
        assert!(!satisfies(&m, &link));
    }

    #[test]
    fn test_quad_equations() {
        let tri = construct::figure_eight();
        let m = matching_equations(&tri, NormalCoords::Quad).unwrap();
        assert_eq!(m.cols(), 6);
        assert!(m.rows() <= tri.count_edges());
        assert!(satisfies(&m, &vec![Integer::ZERO; 6]));
        let qo = matching_equations(&tri, NormalCoords::QuadOct).unwrap();
        assert_eq!(qo.cols(), 12);
    }

    #[test]
    fn test_lift_of_zero_is_zero_on_closed() {
        let tri = construct::layered_lens_space(5, 2).unwrap();
        let lifted = lift_reduced(&tri, NormalEncoding::new(NormalCoords::Quad), &from_i64s(&[0, 0, 0]));
        assert_eq!(lifted, vec![Integer::ZERO; 7]);
    }

    #[test]
    fn test_constraints() {
        let tri = construct::figure_eight();
        let c = validity_constraints(&tri, NormalCoords::AlmostNormal).unwrap();
        assert_eq!(c.count(), 3);
        let c = validity_constraints(&tri, NormalCoords::Quad).unwrap();
        assert_eq!(c.count(), 2);
        assert!(validity_constraints(&tri, NormalCoords::Edge).is_err());
    }

    #[test]
    fn test_closed_quad_adds_cusp_equations() {
        let tri = construct::figure_eight();
        let open = matching_equations(&tri, NormalCoords::Quad).unwrap();
        let closed = matching_equations(&tri, NormalCoords::QuadClosed).unwrap();
        assert!(closed.rows() > open.rows());
        assert!(closed.rank() > open.rank());
    }
}
