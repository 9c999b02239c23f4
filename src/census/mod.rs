// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Census of facet pairings.
//!
//! A facet pairing records which facets of a collection of simplices are
//! glued together, ignoring how. Enumerating the canonical connected
//! pairings is the first stage of a census of triangulations: each pairing
//! is then realised by trying gluing permutations, and its automorphisms let
//! equivalent choices be skipped.
//!
//! ## Module Structure
//!
//! - `pairing`: Facet pairings, relabellings and canonical form
//! - `subgraphs`: Motifs that cannot occur in minimal triangulations
//! - `generate`: Orderly generation on the predicate engine

pub mod generate;
pub mod pairing;
pub mod subgraphs;

pub use generate::{count_pairings, enumerate_pairings, BoundaryMode, CensusOptions, CensusOutcome};
pub use pairing::{FacetPairing, FacetPairingIsomorphism};
