// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Recognition of whole triangulations from the standard families.

use std::fmt;

use tracing::debug;

use super::layered::{LayeredChain, LayeredSolidTorus};
use super::region::SatRegion;
use super::sfs::SfsInvariants;
use super::trisolid::{AugTriSolidTorus, TriSolidTorus};
use crate::maths::Perm4;
use crate::triangulation::Triangulation;

/// A connected triangulation recognised as a member of a standard family.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StandardTriangulation {
    LayeredSolidTorus(LayeredSolidTorus),
    LayeredChain(LayeredChain),
    TriSolidTorus(TriSolidTorus),
    AugTriSolidTorus(AugTriSolidTorus),
    SatRegion(SatRegion),
}

impl StandardTriangulation {
    /// Tries each family in turn. The whole triangulation must be accounted
    /// for; a family that only covers part of it is not a match.
    pub fn recognise(tri: &Triangulation) -> Option<Self> {
        if tri.is_empty() || !tri.is_connected() {
            return None;
        }
        let found = Self::layered_solid_torus(tri)
            .or_else(|| Self::tri_solid_torus(tri))
            .or_else(|| Self::layered_chain(tri))
            .or_else(|| AugTriSolidTorus::recognise(tri).map(Self::AugTriSolidTorus))
            .or_else(|| SatRegion::find(tri).map(Self::SatRegion));
        if let Some(std) = &found {
            debug!(name = %std, size = tri.size(), "recognised standard triangulation");
        }
        found
    }

    fn layered_solid_torus(tri: &Triangulation) -> Option<Self> {
        LayeredSolidTorus::find_all(tri)
            .into_iter()
            .find(|lst| lst.size() == tri.size())
            .map(Self::LayeredSolidTorus)
    }

    fn tri_solid_torus(tri: &Triangulation) -> Option<Self> {
        if tri.size() != 3 {
            return None;
        }
        Perm4::all()
            .into_iter()
            .find_map(|roles| TriSolidTorus::recognise(tri, 0, roles))
            .map(Self::TriSolidTorus)
    }

    fn layered_chain(tri: &Triangulation) -> Option<Self> {
        if !tri.has_boundary_triangles() {
            return None;
        }
        Perm4::all().into_iter().find_map(|roles| {
            let mut chain = LayeredChain::new(0, roles);
            chain.extend_maximal(tri);
            (chain.index() == tri.size()).then_some(Self::LayeredChain(chain))
        })
    }

    /// The Seifert fibred space, where the family determines one.
    pub fn manifold(&self) -> Option<SfsInvariants> {
        match self {
            Self::AugTriSolidTorus(aug) => aug.manifold().cloned(),
            Self::SatRegion(region) => region.create_sfs(false),
            _ => None,
        }
    }

    /// A short name for the family member.
    pub fn name(&self) -> String {
        match self {
            Self::LayeredSolidTorus(lst) => lst.to_string(),
            Self::LayeredChain(chain) => chain.to_string(),
            Self::TriSolidTorus(core) => core.to_string(),
            Self::AugTriSolidTorus(aug) => aug.to_string(),
            Self::SatRegion(region) => format!("Region({})", region),
        }
    }
}

impl fmt::Display for StandardTriangulation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
