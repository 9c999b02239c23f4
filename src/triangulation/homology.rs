// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! First homology through the dual 2-skeleton.
//!
//! Dual edges are internal triangles and dual 2-cells are internal edges.
//! Triangles on a maximal forest of the dual graph are contracted, the rest
//! generate, and walking once around each internal edge gives one relation.
//! The dual complex ignores vertices, so ideal vertices are treated as
//! truncated and real boundary contributes no relations.

use std::collections::VecDeque;

use super::skeleton::Skeleton;
use super::triangulation::{FacetSpec, Triangulation};
use super::EDGE_VERTICES;
use crate::homology::AbelianGroup;
use crate::maths::{Integer, MatrixInt, Perm4};

pub(crate) fn compute_h1(tri: &Triangulation) -> AbelianGroup {
    let sk = tri.skeleton();
    let forest = dual_forest(tri, sk);

    let mut generator: Vec<Option<usize>> = vec![None; sk.triangles().len()];
    let mut n_gens = 0;
    for (i, t) in sk.triangles().iter().enumerate() {
        if !t.is_boundary() && !forest[i] {
            generator[i] = Some(n_gens);
            n_gens += 1;
        }
    }

    let internal: Vec<usize> = (0..sk.edges().len())
        .filter(|&e| !sk.edges()[e].is_boundary())
        .collect();
    let mut relations = MatrixInt::new(internal.len(), n_gens);
    for (row, &e) in internal.iter().enumerate() {
        let start = sk.edges()[e].embeddings()[0];
        walk_around_edge(tri, start.tet, start.edge, |tet, roles| {
            let face = roles.apply(3);
            let triangle = sk.tet_triangle(tet, face);
            if let Some(col) = generator[triangle] {
                let forward = sk.triangles()[triangle].embeddings()[0] == FacetSpec::new(tet, face);
                let delta = if forward { Integer::ONE } else { Integer::new(-1) };
                let entry = relations.entry_mut(row, col);
                *entry += &delta;
            }
        });
    }
    AbelianGroup::from_presentation(&relations)
}

/// Marks the triangles on a spanning forest of the dual graph.
fn dual_forest(tri: &Triangulation, sk: &Skeleton) -> Vec<bool> {
    let mut in_forest = vec![false; sk.triangles().len()];
    let mut seen = vec![false; tri.size()];
    for root in 0..tri.size() {
        if seen[root] {
            continue;
        }
        seen[root] = true;
        let mut queue = VecDeque::from([root]);
        while let Some(t) = queue.pop_front() {
            for f in 0..4 {
                if let Some((u, _)) = tri.adjacent(t, f) {
                    if !seen[u] {
                        seen[u] = true;
                        in_forest[sk.tet_triangle(t, f)] = true;
                        queue.push_back(u);
                    }
                }
            }
        }
    }
    in_forest
}

/// Walks once around the edge numbered `edge` of `tet`, calling
/// `visit(tet, roles)` in each tetrahedron passed. `roles` maps 0 and 1 to
/// the ends of the edge, 2 to the vertex opposite the face entered through
/// and 3 to the vertex opposite the face about to be crossed. Stops early at
/// a boundary face.
pub(crate) fn walk_around_edge(tri: &Triangulation, tet: usize, edge: usize, mut visit: impl FnMut(usize, Perm4)) {
    let [a, b] = EDGE_VERTICES[edge];
    let mut rest = (0..4).filter(|&v| v != a && v != b);
    let (c, d) = match (rest.next(), rest.next()) {
        (Some(c), Some(d)) => (c, d),
        _ => return,
    };
    let start = (tet, Perm4::new([a as u8, b as u8, c as u8, d as u8]));
    let swap = Perm4::transposition(2, 3);
    let mut current = start;
    // Each tetrahedron edge is visited at most twice, once per direction.
    for _ in 0..=12 * tri.size() {
        let (t, roles) = current;
        visit(t, roles);
        let face = roles.apply(3);
        let Some((u, g)) = tri.adjacent(t, face) else {
            return;
        };
        current = (u, g * roles * swap);
        if current == start {
            return;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::triangulation::construct;

    #[test]
    fn test_figure_eight_h1_is_z() {
        let tri = construct::figure_eight();
        assert!(tri.homology_h1().is_z());
    }

    #[test]
    fn test_ball_and_sphere() {
        assert!(Triangulation::with_size(1).homology_h1().is_trivial());
        assert!(Triangulation::sphere().homology_h1().is_trivial());
    }

    #[test]
    fn test_lens_spaces() {
        for (p, q) in [(2, 1), (3, 1), (4, 1), (5, 1), (5, 2), (7, 3), (8, 3)] {
            let tri = construct::layered_lens_space(p, q).unwrap();
            assert!(tri.homology_h1().is_zn(p), "L({},{}) gave {}", p, q, tri.homology_h1());
            assert!(tri.is_orientable());
            if p > 2 {
                assert!(tri.is_closed());
                assert!(tri.is_valid());
                assert_eq!(tri.count_vertices(), 1);
            }
        }
    }

    #[test]
    fn test_layered_solid_torus_h1() {
        let tri = construct::layered_solid_torus(2, 3).unwrap();
        assert!(tri.homology_h1().is_z());
    }

    #[test]
    fn test_walk_visits_degree_faces() {
        let tri = construct::figure_eight();
        let mut steps = 0;
        walk_around_edge(&tri, 0, 0, |_, _| steps += 1);
        let sk = tri.skeleton();
        assert_eq!(steps, sk.edges()[sk.tet_edge(0, 0)].degree());
    }
}
