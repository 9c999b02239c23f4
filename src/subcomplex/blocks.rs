// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Saturated blocks: pieces of a Seifert fibred space whose boundary is a
//! ring of saturated annuli.
//!
//! Within a block the annuli are numbered around the ring, so that the
//! right-hand vertical edge of annulus `i` is the left-hand vertical edge of
//! annulus `i + 1`. Every block is recognised from one of its annuli, which
//! becomes annulus 0.

use std::collections::HashSet;
use std::fmt;

use super::annulus::{lst_meridian, SatAnnulus};
use super::layered::LayeredSolidTorus;
use super::sfs::SfsInvariants;
use super::trisolid::TriSolidTorus;
use crate::error::Result;
use crate::maths::Perm4;
use crate::triangulation::Triangulation;

/// The annulus edge along which a Möbius band is folded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MobiusPosition {
    Vertical,
    Horizontal,
    Diagonal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SatBlockKind {
    /// An annulus whose two triangles are glued to each other.
    Mobius { position: MobiusPosition },
    /// A layered solid torus whose top is the annulus. The meridian cuts
    /// the vertical edges `alpha` times.
    Lst { lst: LayeredSolidTorus, meridian: (i64, i64) },
    /// The three-tetrahedron solid torus, seen with the given fibre
    /// direction.
    TriPrism { core: TriSolidTorus, reflected: bool },
    /// A single tetrahedron layered over the annulus.
    Layering { tet: usize },
}

/// Where an annulus of a block is glued, and with which reflections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Adjacency {
    pub block: usize,
    pub annulus: usize,
    pub ref_vert: bool,
    pub ref_horiz: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SatBlock {
    kind: SatBlockKind,
    annuli: Vec<SatAnnulus>,
    adjacent: Vec<Option<Adjacency>>,
}

impl SatBlock {
    fn with_annuli(kind: SatBlockKind, annuli: Vec<SatAnnulus>) -> Self {
        let adjacent = vec![None; annuli.len()];
        Self { kind, annuli, adjacent }
    }

    /// The block with `ann` as annulus 0, avoiding tetrahedra already used
    /// elsewhere. Möbius blocks own no tetrahedra, so they may sit on used
    /// ones.
    pub fn recognise(tri: &Triangulation, ann: &SatAnnulus, avoid: &HashSet<usize>) -> Option<Self> {
        Self::mobius(tri, ann)
            .or_else(|| Self::lst(tri, ann, avoid))
            .or_else(|| Self::tri_prism(tri, ann, avoid))
            .or_else(|| Self::layering(tri, ann, avoid))
    }

    fn mobius(tri: &Triangulation, ann: &SatAnnulus) -> Option<Self> {
        let (adj, gluing) = tri.adjacent(ann.tet[0], ann.face(0))?;
        if adj != ann.tet[1] || gluing.apply(ann.face(0)) != ann.face(1) {
            return None;
        }
        let position = match (ann.roles[1].inverse() * gluing * ann.roles[0]).images() {
            [1, 0, 2, 3] => MobiusPosition::Vertical,
            [2, 1, 0, 3] => MobiusPosition::Horizontal,
            [0, 2, 1, 3] => MobiusPosition::Diagonal,
            _ => return None,
        };
        Some(Self::with_annuli(SatBlockKind::Mobius { position }, vec![*ann]))
    }

    fn lst(tri: &Triangulation, ann: &SatAnnulus, avoid: &HashSet<usize>) -> Option<Self> {
        if ann.tet[0] != ann.tet[1] {
            return None;
        }
        let lst = LayeredSolidTorus::find_all(tri)
            .into_iter()
            .find(|l| l.has_top(ann.tet[0], [ann.face(0), ann.face(1)]))?;
        if lst.tetrahedra().iter().any(|t| avoid.contains(t)) {
            return None;
        }
        let meridian = lst_meridian(lst.top(), ann)?;
        Some(Self::with_annuli(SatBlockKind::Lst { lst, meridian }, vec![*ann]))
    }

    /// The block made by a known three-tetrahedron solid torus, with its
    /// annulus 2 as annulus 0.
    ///
    /// Recognising from annulus 2 alone is not enough when that annulus is
    /// folded shut: the fold is then found first, as a Möbius block.
    pub fn from_core(core: TriSolidTorus) -> Self {
        let annuli = vec![core.annulus(2), core.annulus(0), core.annulus(1)];
        Self::with_annuli(SatBlockKind::TriPrism { core, reflected: false }, annuli)
    }

    fn tri_prism(tri: &Triangulation, ann: &SatAnnulus, avoid: &HashSet<usize>) -> Option<Self> {
        let fits = |a: &SatAnnulus| {
            let roles = a.roles[0] * Perm4::new(TriSolidTorus::LOWER_ROLES).inverse();
            let core = TriSolidTorus::recognise(tri, a.tet[0], roles)?;
            (core.annulus(2) == *a && core.tetrahedra().iter().all(|t| !avoid.contains(t))).then_some(core)
        };
        if let Some(core) = fits(ann) {
            return Some(Self::from_core(core));
        }
        let mut flipped = *ann;
        flipped.reflect_vertical();
        let core = fits(&flipped)?;
        let annuli = [core.annulus(2), core.annulus(0), core.annulus(1)]
            .into_iter()
            .map(|mut a| {
                a.reflect_vertical();
                a
            })
            .collect();
        Some(Self::with_annuli(SatBlockKind::TriPrism { core, reflected: true }, annuli))
    }

    fn layering(tri: &Triangulation, ann: &SatAnnulus, avoid: &HashSet<usize>) -> Option<Self> {
        let tet = ann.tet[0];
        let r0 = ann.roles[0];
        if avoid.contains(&tet) || ann.tet[1] != tet || ann.roles[1] != r0 * Perm4::new([3, 2, 1, 0]) {
            return None;
        }
        let other = SatAnnulus::new(tet, r0 * Perm4::new([2, 3, 0, 1]), tet, r0 * Perm4::new([1, 0, 3, 2]));
        if other.meets_boundary(tri) == 1 {
            return None;
        }
        Some(Self::with_annuli(SatBlockKind::Layering { tet }, vec![*ann, other]))
    }

    pub fn kind(&self) -> &SatBlockKind {
        &self.kind
    }

    pub fn count_annuli(&self) -> usize {
        self.annuli.len()
    }

    pub fn annulus(&self, which: usize) -> &SatAnnulus {
        &self.annuli[which]
    }

    pub fn annuli(&self) -> &[SatAnnulus] {
        &self.annuli
    }

    pub fn adjacent(&self, which: usize) -> Option<Adjacency> {
        self.adjacent[which]
    }

    pub fn has_adjacent(&self, which: usize) -> bool {
        self.adjacent[which].is_some()
    }

    pub(crate) fn set_adjacent(&mut self, which: usize, adj: Adjacency) {
        self.adjacent[which] = Some(adj);
    }

    /// Tetrahedra making up this block. Möbius blocks own none.
    pub fn tetrahedra(&self) -> Vec<usize> {
        match &self.kind {
            SatBlockKind::Mobius { .. } => Vec::new(),
            SatBlockKind::Lst { lst, .. } => lst.tetrahedra().to_vec(),
            SatBlockKind::TriPrism { core, .. } => core.tetrahedra().to_vec(),
            SatBlockKind::Layering { tet } => vec![*tet],
        }
    }

    /// Adds this block's exceptional fibres to `sfs`. With `reflect`, the
    /// fibre direction is reversed relative to the base.
    pub fn adjust_sfs(&self, sfs: &mut SfsInvariants, reflect: bool) -> Result<()> {
        let flip = |b: i64| if reflect { -b } else { b };
        match &self.kind {
            SatBlockKind::Mobius { position } => match position {
                MobiusPosition::Vertical => sfs.insert_fibre(2, flip(1)),
                MobiusPosition::Horizontal => sfs.insert_fibre(1, flip(2)),
                MobiusPosition::Diagonal => sfs.insert_fibre(1, flip(-1)),
            },
            SatBlockKind::Lst { meridian: (alpha, beta), .. } => sfs.insert_fibre(*alpha, flip(*beta)),
            SatBlockKind::TriPrism { reflected, .. } => sfs.insert_fibre(1, if *reflected { flip(1) } else { flip(-1) }),
            SatBlockKind::Layering { .. } => Ok(()),
        }
    }
}

impl SatBlockKind {
    /// Whether this block is a solid torus filling one annulus.
    pub fn is_filling(&self) -> bool {
        matches!(self, SatBlockKind::Mobius { .. } | SatBlockKind::Lst { .. })
    }
}

impl fmt::Display for SatBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            SatBlockKind::Mobius { position } => write!(f, "Mob({:?})", position),
            SatBlockKind::Lst { lst, .. } => write!(f, "Sat{}", lst),
            SatBlockKind::TriPrism { .. } => write!(f, "Tri"),
            SatBlockKind::Layering { .. } => write!(f, "Layer"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mobius_positions() {
        let mut tri = Triangulation::with_size(2);
        let ann = SatAnnulus::new(0, Perm4::identity(), 1, Perm4::identity());
        ann.attach_lst(&mut tri, 2, 1).unwrap();
        let block = SatBlock::recognise(&tri, &ann, &HashSet::new()).unwrap();
        assert_eq!(block.kind(), &SatBlockKind::Mobius { position: MobiusPosition::Vertical });
        assert!(block.tetrahedra().is_empty());
        let mut sfs = SfsInvariants::sphere();
        block.adjust_sfs(&mut sfs, false).unwrap();
        assert_eq!(sfs.fibres(), &[(2, 1)]);
    }

    #[test]
    fn test_lst_block_meridian() {
        let mut tri = Triangulation::with_size(2);
        let ann = SatAnnulus::new(0, Perm4::identity(), 1, Perm4::identity());
        ann.attach_lst(&mut tri, 3, 1).unwrap();
        let inside = ann.switched(&tri).unwrap();
        let block = SatBlock::recognise(&tri, &inside, &HashSet::new()).unwrap();
        match block.kind() {
            SatBlockKind::Lst { meridian, .. } => assert_eq!(meridian.0, 3),
            other => panic!("unexpected block {:?}", other),
        }
        assert_eq!(block.tetrahedra(), vec![2]);
        let avoid: HashSet<usize> = [2].into_iter().collect();
        assert!(SatBlock::recognise(&tri, &inside, &avoid).is_none());
    }

    #[test]
    fn test_prism_block_from_core() {
        let tri = TriSolidTorus::test_core();
        let core = TriSolidTorus::recognise(&tri, 0, Perm4::identity()).unwrap();
        for i in 0..3 {
            let block = SatBlock::recognise(&tri, &core.annulus(i), &HashSet::new()).unwrap();
            assert!(matches!(block.kind(), SatBlockKind::TriPrism { .. }));
            assert_eq!(block.count_annuli(), 3);
            assert_eq!(block.annulus(0), &core.annulus(i));
            let mut tets = block.tetrahedra();
            tets.sort_unstable();
            assert_eq!(tets, vec![0, 1, 2]);
        }
    }

    #[test]
    fn test_layering_block() {
        let tri = Triangulation::with_size(1);
        let ann = SatAnnulus::new(0, Perm4::identity(), 0, Perm4::new([3, 2, 1, 0]));
        let block = SatBlock::recognise(&tri, &ann, &HashSet::new()).unwrap();
        assert_eq!(block.kind(), &SatBlockKind::Layering { tet: 0 });
        assert_eq!(block.count_annuli(), 2);
        assert_eq!(block.annulus(1).face(0), 1);
        assert_eq!(block.annulus(1).face(1), 2);
    }
}
