// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Three-tetrahedron solid tori and their augmented closures.
//!
//! A [`TriSolidTorus`] is three tetrahedra arranged cyclically around a
//! common axis. In each tetrahedron, the faces opposite roles 0 and 3 are
//! glued to the next and previous tetrahedra, and the faces opposite roles 1
//! and 2 form the boundary: a torus made of three saturated annuli whose
//! vertical edges are the role 0-3 edges.
//!
//! An [`AugTriSolidTorus`] fills each boundary annulus with a layered solid
//! torus or folds it shut, or runs a layered chain from one annulus to
//! another and fills the third.

use std::collections::HashSet;
use std::fmt;

use itertools::Itertools;
use tracing::debug;

use super::annulus::SatAnnulus;
use super::blocks::SatBlock;
use super::layered::{LayeredChain, LayeredSolidTorus};
use super::region::SatRegion;
use super::sfs::SfsInvariants;
use crate::maths::Perm4;
use crate::triangulation::Triangulation;

const NEXT: [u8; 4] = [1, 2, 3, 0];
const PREV: [u8; 4] = [3, 0, 1, 2];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriSolidTorus {
    tets: [usize; 3],
    roles: [Perm4; 3],
}

impl TriSolidTorus {
    /// Annulus roles on the face of the lower tetrahedron of an annulus.
    pub const LOWER_ROLES: [u8; 4] = [0, 3, 1, 2];
    /// Annulus roles on the face of the upper tetrahedron of an annulus.
    pub const UPPER_ROLES: [u8; 4] = [3, 0, 2, 1];

    /// The solid torus with `tet` as tetrahedron 0 under the given roles.
    pub fn recognise(tri: &Triangulation, tet: usize, roles: Perm4) -> Option<Self> {
        let (t1, g1) = tri.adjacent(tet, roles.apply(0))?;
        let (t2, g2) = tri.adjacent(tet, roles.apply(3))?;
        if t1 == tet || t2 == tet || t1 == t2 {
            return None;
        }
        let r1 = g1 * roles * Perm4::new(NEXT);
        let r2 = g2 * roles * Perm4::new(PREV);
        let (t, g) = tri.adjacent(t1, r1.apply(0))?;
        if t != t2 || g * r1 * Perm4::new(NEXT) != r2 {
            return None;
        }
        Some(Self {
            tets: [tet, t1, t2],
            roles: [roles, r1, r2],
        })
    }

    pub fn tetrahedra(&self) -> &[usize] {
        &self.tets
    }

    pub fn tetrahedron(&self, which: usize) -> usize {
        self.tets[which]
    }

    pub fn roles(&self, which: usize) -> Perm4 {
        self.roles[which]
    }

    /// Boundary annulus `i`, which avoids tetrahedron `i`. Its left edge is
    /// the axis edge of tetrahedron `i + 1` and its right edge that of
    /// tetrahedron `i + 2`, so the annuli run round the torus in order.
    pub fn annulus(&self, i: usize) -> SatAnnulus {
        let lower = (i + 1) % 3;
        let upper = (i + 2) % 3;
        SatAnnulus::new(
            self.tets[lower],
            self.roles[lower] * Perm4::new(Self::LOWER_ROLES),
            self.tets[upper],
            self.roles[upper] * Perm4::new(Self::UPPER_ROLES),
        )
    }

    /// If the two triangles of annulus `i` are glued to each other, the
    /// gluing as a map between annulus roles.
    pub fn is_annulus_self_identified(&self, tri: &Triangulation, i: usize) -> Option<Perm4> {
        let ann = self.annulus(i);
        let (adj, gluing) = tri.adjacent(ann.tet[0], ann.face(0))?;
        (adj == ann.tet[1] && gluing.apply(ann.face(0)) == ann.face(1))
            .then(|| ann.roles[1].inverse() * gluing * ann.roles[0])
    }

    /// The bare solid torus: three tetrahedra with identity roles.
    #[cfg(test)]
    pub(crate) fn test_core() -> Triangulation {
        let mut tri = Triangulation::with_size(3);
        for i in 0..3 {
            tri.join(i, 0, (i + 1) % 3, Perm4::new(PREV)).unwrap();
        }
        tri
    }
}

impl fmt::Display for TriSolidTorus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TST({})", self.tets.iter().join(","))
    }
}

/// What closes off one boundary annulus of an augmented solid torus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnnulusFiller {
    /// The two triangles are glued together by this map of annulus roles.
    Folded(Perm4),
    Layered(LayeredSolidTorus),
    /// One end of the layered chain.
    Chain,
}

impl fmt::Display for AnnulusFiller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnnulusFiller::Folded(_) => write!(f, "Fold"),
            AnnulusFiller::Layered(lst) => write!(f, "{}", lst),
            AnnulusFiller::Chain => write!(f, "Chain"),
        }
    }
}

/// A closed triangulation made from a [`TriSolidTorus`] by closing off its
/// boundary annuli.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AugTriSolidTorus {
    core: TriSolidTorus,
    fillers: [AnnulusFiller; 3],
    chain: Option<LayeredChain>,
    manifold: Option<SfsInvariants>,
}

impl AugTriSolidTorus {
    /// Recognises a connected orientable triangulation with no boundary
    /// triangles as an augmented solid torus, accounting for every
    /// tetrahedron.
    pub fn recognise(tri: &Triangulation) -> Option<Self> {
        if tri.size() < 3 || !tri.is_connected() || tri.has_boundary_triangles() || !tri.is_orientable() {
            return None;
        }
        let lsts = LayeredSolidTorus::find_all(tri);
        for tet in 0..tri.size() {
            for roles in Perm4::all() {
                let Some(core) = TriSolidTorus::recognise(tri, tet, roles) else {
                    continue;
                };
                if let Some(aug) = Self::around(tri, core, &lsts) {
                    debug!(name = %aug, "recognised augmented solid torus");
                    return Some(aug);
                }
            }
        }
        None
    }

    fn fill_annulus(
        tri: &Triangulation,
        core: &TriSolidTorus,
        lsts: &[LayeredSolidTorus],
        i: usize,
    ) -> Option<AnnulusFiller> {
        if let Some(map) = core.is_annulus_self_identified(tri, i) {
            return Some(AnnulusFiller::Folded(map));
        }
        let side = core.annulus(i).switched(tri)?;
        if side.tet[0] != side.tet[1] || core.tets.contains(&side.tet[0]) {
            return None;
        }
        lsts.iter()
            .find(|l| l.has_top(side.tet[0], [side.face(0), side.face(1)]))
            .cloned()
            .map(AnnulusFiller::Layered)
    }

    fn around(tri: &Triangulation, core: TriSolidTorus, lsts: &[LayeredSolidTorus]) -> Option<Self> {
        let found = [0, 1, 2].map(|i| Self::fill_annulus(tri, &core, lsts, i));
        let filled = found.iter().filter(|f| f.is_some()).count();
        match filled {
            3 => {
                let [a, b, c] = found;
                let fillers = [a?, b?, c?];
                let mut tets: Vec<usize> = core.tets.to_vec();
                for f in &fillers {
                    if let AnnulusFiller::Layered(lst) = f {
                        tets.extend_from_slice(lst.tetrahedra());
                    }
                }
                if !accounts_for(tri, &tets) {
                    return None;
                }
                let manifold = region_sfs(tri, &core);
                Some(Self {
                    core,
                    fillers,
                    chain: None,
                    manifold,
                })
            }
            1 => {
                let l = found.iter().position(Option::is_some)?;
                let third = found[l].clone()?;
                for (j, k) in [((l + 1) % 3, (l + 2) % 3), ((l + 2) % 3, (l + 1) % 3)] {
                    let Some(chain) = Self::chain_between(tri, &core, j, k) else {
                        continue;
                    };
                    let mut tets: Vec<usize> = core.tets.to_vec();
                    tets.extend_from_slice(chain.tetrahedra());
                    if let AnnulusFiller::Layered(lst) = &third {
                        tets.extend_from_slice(lst.tetrahedra());
                    }
                    if !accounts_for(tri, &tets) {
                        continue;
                    }
                    let mut fillers = [AnnulusFiller::Chain, AnnulusFiller::Chain, AnnulusFiller::Chain];
                    fillers[l] = third;
                    return Some(Self {
                        core,
                        fillers,
                        chain: Some(chain),
                        manifold: None,
                    });
                }
                None
            }
            _ => None,
        }
    }

    /// A layered chain whose bottom sits on annulus `j` and whose top sits
    /// on annulus `k`, matched face by face.
    fn chain_between(tri: &Triangulation, core: &TriSolidTorus, j: usize, k: usize) -> Option<LayeredChain> {
        let below = core.annulus(j).switched(tri)?;
        let above = core.annulus(k).switched(tri)?;
        if below.tet[0] != below.tet[1] || above.tet[0] != above.tet[1] {
            return None;
        }
        let below_faces = sorted([below.face(0), below.face(1)]);
        let above_faces = sorted([above.face(0), above.face(1)]);
        for roles in Perm4::all() {
            if sorted([roles.apply(1), roles.apply(2)]) != below_faces {
                continue;
            }
            let mut chain = LayeredChain::new(below.tet[0], roles);
            loop {
                if chain.top() == above.tet[0] && sorted(chain.top_faces()) == above_faces {
                    if chain.tetrahedra().iter().all(|t| !core.tets.contains(t)) {
                        return Some(chain);
                    }
                    break;
                }
                if !chain.extend_above(tri) {
                    break;
                }
            }
        }
        None
    }

    pub fn core(&self) -> &TriSolidTorus {
        &self.core
    }

    pub fn filler(&self, annulus: usize) -> &AnnulusFiller {
        &self.fillers[annulus]
    }

    pub fn chain(&self) -> Option<&LayeredChain> {
        self.chain.as_ref()
    }

    pub fn has_layered_chain(&self) -> bool {
        self.chain.is_some()
    }

    /// The Seifert fibred space, when every annulus is filled by a solid
    /// torus.
    pub fn manifold(&self) -> Option<&SfsInvariants> {
        self.manifold.as_ref()
    }
}

impl fmt::Display for AugTriSolidTorus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.chain {
            Some(chain) => {
                let third = self.fillers.iter().find(|x| **x != AnnulusFiller::Chain);
                match third {
                    Some(t) => write!(f, "A({}, {})", t, chain),
                    None => write!(f, "A({})", chain),
                }
            }
            None => write!(f, "A({})", self.fillers.iter().join(", ")),
        }
    }
}

fn sorted(mut pair: [usize; 2]) -> [usize; 2] {
    pair.sort_unstable();
    pair
}

/// Whether `tets` lists every tetrahedron of `tri` exactly once.
fn accounts_for(tri: &Triangulation, tets: &[usize]) -> bool {
    tets.len() == tri.size() && tets.iter().collect::<HashSet<_>>().len() == tets.len()
}

fn region_sfs(tri: &Triangulation, core: &TriSolidTorus) -> Option<SfsInvariants> {
    let mut region = SatRegion::new(SatBlock::from_core(core.clone()));
    if !region.expand(tri, true) {
        return None;
    }
    region.create_sfs(false)
}
