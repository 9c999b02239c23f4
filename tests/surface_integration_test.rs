// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Integration tests for normal surface enumeration.

mod common;

use std::sync::Arc;

use normal_kernel::enumerate::enumerate_extreme_rays;
use normal_kernel::surface::{matching_equations, validity_constraints, NormalEncoding, NormalList};
use normal_kernel::triangulation::construct;
use normal_kernel::{EnumerationOptions, Integer, NormalCoords, NormalSurfaces};
use proptest::prelude::*;

fn vertex_surfaces(coords: NormalCoords) -> NormalSurfaces {
    let tri = Arc::new(common::figure_eight_by_hand());
    NormalSurfaces::enumerate(tri, coords, NormalList::Vertex, &EnumerationOptions::default(), None).unwrap()
}

#[test]
fn test_figure_eight_vertex_surfaces() {
    let enc = NormalEncoding::new(NormalCoords::Standard);
    assert_eq!(enc.block(), 7);
    assert!(enc.stores_triangles());
    assert!(!enc.stores_octagons());

    let tri = common::figure_eight_by_hand();
    let equations = matching_equations(&tri, NormalCoords::Standard).unwrap();
    let constraints = validity_constraints(&tri, NormalCoords::Standard).unwrap();
    assert_eq!(constraints.coordinate_sets(), vec![vec![4, 5, 6], vec![11, 12, 13]]);
    let rays = enumerate_extreme_rays(&equations, &constraints, &EnumerationOptions::default(), None);
    assert!(!rays.cancelled);

    let list = vertex_surfaces(NormalCoords::Standard);
    assert!(!list.is_cancelled());
    assert_eq!(list.len(), rays.results.len());
    // Every quad solution here spins into the cusp, so only the cusp torus
    // survives as a closed vertex surface.
    assert_eq!(list.len(), 1);
    for s in &list {
        assert!(constraints.is_satisfied_by(s.vector()));
        for tet in 0..2 {
            let quads = (0..3).filter(|&q| !s.quads(tet, q).is_zero()).count();
            assert!(quads <= 1, "{} has {} quad types in tetrahedron {}", s, quads, tet);
        }
        for w in s.edge_weights() {
            assert!(!w.is_negative(), "{} has a negative edge weight", s);
        }
    }
    // The torus linking the cusp is always a vertex surface.
    assert!(list.iter().any(|s| s.is_vertex_link().is_some()));
}

#[test]
fn test_parallel_enumeration_agrees() {
    let tri = Arc::new(construct::layered_lens_space(7, 2).unwrap());
    let options = EnumerationOptions {
        parallel: true,
        ..EnumerationOptions::default()
    };
    let serial = NormalSurfaces::enumerate(
        Arc::clone(&tri),
        NormalCoords::Standard,
        NormalList::Vertex,
        &EnumerationOptions::default(),
        None,
    )
    .unwrap();
    let parallel =
        NormalSurfaces::enumerate(tri, NormalCoords::Standard, NormalList::Vertex, &options, None).unwrap();
    let mut a: Vec<_> = serial.iter().map(|s| s.vector().to_vec()).collect();
    let mut b: Vec<_> = parallel.iter().map(|s| s.vector().to_vec()).collect();
    a.sort();
    b.sort();
    assert_eq!(a, b);
}

#[test]
fn test_fundamental_contains_vertex() {
    let tri = Arc::new(construct::layered_lens_space(5, 2).unwrap());
    let options = EnumerationOptions::default();
    let vertex =
        NormalSurfaces::enumerate(Arc::clone(&tri), NormalCoords::Standard, NormalList::Vertex, &options, None)
            .unwrap();
    let fundamental =
        NormalSurfaces::enumerate(tri, NormalCoords::Standard, NormalList::Fundamental, &options, None).unwrap();
    assert!(fundamental.len() >= vertex.len());
    for s in &vertex {
        assert!(fundamental.iter().any(|f| f == s), "vertex surface {} is not fundamental", s);
    }
}

#[test]
fn test_sums_of_compatible_surfaces() {
    let list = vertex_surfaces(NormalCoords::Standard);
    let link = list.iter().find(|s| s.is_vertex_link().is_some()).unwrap();
    let doubled = link.sum(link).unwrap();
    assert_eq!(doubled.euler_char(), &link.euler_char() * 2);
    for (w2, w) in doubled.edge_weights().iter().zip(link.edge_weights()) {
        assert_eq!(*w2, &w + &w);
    }
}

fn lens_space_vertex_surfaces() -> NormalSurfaces {
    let tri = Arc::new(construct::layered_lens_space(5, 2).unwrap());
    NormalSurfaces::enumerate(tri, NormalCoords::Standard, NormalList::Vertex, &EnumerationOptions::default(), None)
        .unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Scaling distributes over sums, and Euler characteristic adds up.
    #[test]
    fn test_surface_arithmetic_is_linear(
        picks in (0usize..16, 0usize..16),
        weights in (0i64..5, 0i64..5),
        c in 0i64..6,
    ) {
        let list = lens_space_vertex_surfaces();
        prop_assume!(!list.is_empty());
        let all = list.surfaces();
        let s1 = &all[picks.0 % all.len()] * &Integer::new(weights.0);
        let s2 = &all[picks.1 % all.len()] * &Integer::new(weights.1);
        let c = Integer::new(c);

        let total = (&s1 + &s2).unwrap();
        let scaled_sum = &total * &c;
        let sum_scaled = (&(&s1 * &c) + &(&s2 * &c)).unwrap();
        prop_assert_eq!(&scaled_sum, &sum_scaled);

        prop_assert_eq!(total.euler_char(), &s1.euler_char() + &s2.euler_char());
        prop_assert_eq!(scaled_sum.euler_char(), &total.euler_char() * &c);
    }
}
