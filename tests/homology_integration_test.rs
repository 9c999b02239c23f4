// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Integration tests for first homology of constructed triangulations.

mod common;

use normal_kernel::homology::{tight_decode, tight_encoding};
use normal_kernel::triangulation::construct;
use normal_kernel::{AbelianGroup, Integer, MatrixInt};
use proptest::prelude::*;

#[test]
fn test_figure_eight_homology() {
    let tri = common::figure_eight_by_hand();
    assert_eq!(tri, construct::figure_eight());
    let h1 = tri.homology_h1();
    assert_eq!(h1.rank(), 1);
    assert_eq!(h1.count_invariant_factors(), 0);
    assert!(h1.is_z());

    let encoded = tight_encoding(h1).unwrap();
    let decoded: AbelianGroup = tight_decode(&encoded).unwrap();
    assert_eq!(&decoded, h1);
}

#[test]
fn test_lens_space_homology() {
    let tri = construct::layered_lens_space(5, 2).unwrap();
    assert!(tri.is_closed());
    assert!(tri.is_orientable());
    let h1 = tri.homology_h1();
    assert_eq!(h1.rank(), 0);
    assert_eq!(h1.invariant_factors(), &[Integer::new(5)]);
    assert!(h1.is_zn(5));
}

#[test]
fn test_lens_space_family() {
    for (p, q) in [(3, 1), (7, 2), (8, 3), (11, 3)] {
        let tri = construct::layered_lens_space(p, q).unwrap();
        assert!(tri.homology_h1().is_zn(p), "L({},{}) gave {}", p, q, tri.homology_h1());
    }
}

#[test]
fn test_gieseking_homology() {
    let tri = construct::gieseking();
    assert!(!tri.is_orientable());
    assert!(tri.homology_h1().is_z());
}

proptest! {
    /// Elementary row and column operations leave the presented group unchanged.
    #[test]
    fn test_presentation_invariant_under_elementary_operations(
        entries in prop::collection::vec(-6i64..=6, 9),
        ops in prop::collection::vec((0usize..3, 0usize..3, -3i64..=3, any::<bool>()), 0..8),
    ) {
        let rows: Vec<&[i64]> = entries.chunks(3).collect();
        let m = MatrixInt::from_rows(&rows).unwrap();
        let mut n = m.clone();
        for (a, b, k, on_rows) in ops {
            if a == b {
                continue;
            }
            if on_rows {
                n.add_row(a, b, &Integer::new(k));
            } else {
                n.add_col(a, b, &Integer::new(k));
            }
        }
        prop_assert_eq!(AbelianGroup::from_presentation(&m), AbelianGroup::from_presentation(&n));
    }
}
