// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Exact enumeration and recognition kernel for normal surface theory.
//!
//! Given a triangulated 3-manifold, the kernel computes homology, enumerates
//! normal surfaces and angle structures as extreme rays or Hilbert bases of
//! rational cones, recognises standard pieces such as layered solid tori and
//! Seifert fibred regions, and generates the facet pairings that seed a
//! census of minimal triangulations.
//!
//! # Architecture
//!
//! Modules are layered leaves first:
//!
//! - `maths`, `bitmask`: exact integers and rationals, matrices,
//!   permutations, and coordinate-support masks
//! - `homology`: Smith normal form and finitely generated abelian groups
//! - `enumerate`: validity constraints, the double description method and
//!   the dual Hilbert basis method, with cooperative cancellation
//! - `triangulation`: gluings, skeleton, isomorphism signatures, standard
//!   constructions
//! - `surface`, `angle`: matching equations and the vectors the enumerators
//!   return, with their derived properties
//! - `subcomplex`: recognisers for standard subcomplexes
//! - `census`: orderly generation of canonical facet pairings, running on
//!   the predicate `engine` with a `trail` for backtracking
//!
//! # Data flow
//!
//! A triangulation yields a matrix of matching equations. The enumerator
//! intersects its kernel with the non-negative orthant under the validity
//! constraints, and each resulting vector becomes a normal surface or an
//! angle structure holding a shared snapshot of the triangulation.
//!
//! # Parallelization
//!
//! With the `parallel` feature (on by default), pair combination in the
//! enumerators and the top level of the census can be split across the
//! rayon thread pool. The choice is made per call through the options
//! structs; the default is single-threaded.
//!
//! # Logging
//!
//! The library logs through `tracing` and never installs a subscriber; the
//! `census` binary does.

pub mod angle;
pub mod bitmask;
pub mod census;
pub mod engine;
pub mod enumerate;
pub mod error;
pub mod homology;
pub mod maths;
pub mod statistics;
pub mod subcomplex;
pub mod surface;
pub mod trail;
pub mod triangulation;

// Re-export commonly used types
pub use angle::{AngleStructure, AngleStructures};
pub use census::{BoundaryMode, CensusOptions, FacetPairing};
pub use enumerate::{EnumerationOptions, EnumerationOutcome, ProgressTracker, ValidityConstraints};
pub use error::{KernelError, Result};
pub use homology::AbelianGroup;
pub use maths::{Integer, MatrixInt, Perm4, Rational};
pub use subcomplex::StandardTriangulation;
pub use surface::{NormalCoords, NormalSurface, NormalSurfaces};
pub use triangulation::Triangulation;
