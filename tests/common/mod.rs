// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Common test utilities shared across integration tests.

#![allow(dead_code)]

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use normal_kernel::census::{count_pairings, BoundaryMode, CensusOptions, FacetPairing, FacetPairingIsomorphism};
use normal_kernel::Triangulation;

/// The figure-eight knot complement, glued face by face from tetrahedron 0.
pub fn figure_eight_by_hand() -> Triangulation {
    Triangulation::from_gluings(
        2,
        &[
            (0, 0, 1, [1, 3, 0, 2]),
            (0, 1, 1, [2, 0, 3, 1]),
            (0, 2, 1, [0, 3, 2, 1]),
            (0, 3, 1, [2, 1, 0, 3]),
        ],
    )
    .unwrap()
}

/// Counts canonical pairings serially.
pub fn count(dimension: usize, size: usize, boundary: BoundaryMode) -> u64 {
    let options = CensusOptions {
        dimension,
        size,
        boundary,
        ..CensusOptions::default()
    };
    count_pairings(&options, None).unwrap().count
}

/// A relabelling of simplices and facets chosen by `rng`.
pub fn random_relabelling(pairing: &FacetPairing, rng: &mut StdRng) -> FacetPairingIsomorphism {
    let mut simp_image: Vec<usize> = (0..pairing.size()).collect();
    simp_image.shuffle(rng);
    let facet_perm = (0..pairing.size())
        .map(|_| {
            let mut images: Vec<usize> = (0..pairing.facets()).collect();
            images.shuffle(rng);
            images
        })
        .collect();
    FacetPairingIsomorphism::new(simp_image, facet_perm).unwrap()
}

pub fn seeded_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}
