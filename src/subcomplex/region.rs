// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Saturated regions: saturated blocks joined along their annuli.
//!
//! The base orbifold of a region is built from one polygon per block, with
//! one side per annulus. Gluing two annuli glues two sides, and the vertical
//! edges of the annuli become the polygon corners.

use std::collections::HashSet;
use std::fmt;

use itertools::Itertools;
use tracing::debug;

use super::blocks::{Adjacency, SatBlock};
use super::sfs::SfsInvariants;
use super::trisolid::TriSolidTorus;
use crate::maths::Perm4;
use crate::triangulation::Triangulation;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SatRegion {
    blocks: Vec<SatBlock>,
}

impl SatRegion {
    /// A region of one block with no joins.
    pub fn new(block: SatBlock) -> Self {
        Self { blocks: vec![block] }
    }

    pub fn blocks(&self) -> &[SatBlock] {
        &self.blocks
    }

    pub fn count_blocks(&self) -> usize {
        self.blocks.len()
    }

    /// Tetrahedra in the region, sorted.
    pub fn tetrahedra(&self) -> Vec<usize> {
        self.blocks.iter().flat_map(SatBlock::tetrahedra).sorted_unstable().collect()
    }

    fn join(&mut self, from: (usize, usize), to: (usize, usize), ref_vert: bool, ref_horiz: bool) {
        self.blocks[from.0].set_adjacent(
            from.1,
            Adjacency {
                block: to.0,
                annulus: to.1,
                ref_vert,
                ref_horiz,
            },
        );
        self.blocks[to.0].set_adjacent(
            to.1,
            Adjacency {
                block: from.0,
                annulus: from.1,
                ref_vert,
                ref_horiz,
            },
        );
    }

    fn unjoined(&self) -> Vec<(usize, usize)> {
        self.blocks
            .iter()
            .enumerate()
            .flat_map(|(b, block)| {
                (0..block.count_annuli())
                    .filter(move |&a| !block.has_adjacent(a))
                    .map(move |a| (b, a))
            })
            .collect()
    }

    /// Grows the region by joining annuli to each other or to newly
    /// recognised blocks, until no more growth is possible.
    ///
    /// Returns `true` if every annulus ends up joined. With
    /// `stop_if_bounded`, returns `false` as soon as some annulus can be
    /// neither joined nor extended.
    pub fn expand(&mut self, tri: &Triangulation, stop_if_bounded: bool) -> bool {
        let mut used: HashSet<usize> = self.blocks.iter().flat_map(SatBlock::tetrahedra).collect();
        let mut b = 0;
        while b < self.blocks.len() {
            for a in 0..self.blocks[b].count_annuli() {
                if self.blocks[b].has_adjacent(a) {
                    continue;
                }
                let ann = *self.blocks[b].annulus(a);
                let partner = self
                    .unjoined()
                    .into_iter()
                    .filter(|&other| other != (b, a))
                    .find_map(|(b2, a2)| {
                        ann.is_adjacent(tri, self.blocks[b2].annulus(a2))
                            .map(|(v, h)| ((b2, a2), v, h))
                    });
                if let Some((other, v, h)) = partner {
                    self.join((b, a), other, v, h);
                    continue;
                }
                let found = ann
                    .switched(tri)
                    .and_then(|side| SatBlock::recognise(tri, &side, &used));
                match found {
                    Some(block) => {
                        debug!(block = %block, from = b, "joining new saturated block");
                        used.extend(block.tetrahedra());
                        self.blocks.push(block);
                        let new = self.blocks.len() - 1;
                        self.join((b, a), (new, 0), false, false);
                    }
                    None if stop_if_bounded => return false,
                    None => {}
                }
            }
            b += 1;
        }
        self.unjoined().is_empty()
    }

    /// The saturated region grown from some three-tetrahedron solid torus
    /// that covers every tetrahedron of `tri`.
    pub fn find(tri: &Triangulation) -> Option<Self> {
        for tet in 0..tri.size() {
            for roles in Perm4::all() {
                let Some(core) = TriSolidTorus::recognise(tri, tet, roles) else {
                    continue;
                };
                let mut region = Self::new(SatBlock::from_core(core));
                region.expand(tri, false);
                if region.tetrahedra().len() == tri.size() {
                    return Some(region);
                }
            }
        }
        None
    }

    pub fn count_boundary_annuli(&self) -> usize {
        self.unjoined().len()
    }

    /// Unjoined annuli as `(block, annulus)` pairs.
    pub fn boundary_annuli(&self) -> Vec<(usize, usize)> {
        self.unjoined()
    }

    /// Walks around the region boundary from an unjoined annulus to the
    /// next unjoined annulus, in ring order or against it.
    ///
    /// Returns the block and annulus found, and whether its vertical and
    /// horizontal directions are reversed relative to the starting one.
    pub fn next_boundary_annulus(
        &self,
        block: usize,
        annulus: usize,
        follow_prev: bool,
    ) -> Option<(usize, usize, bool, bool)> {
        let total: usize = self.blocks.iter().map(SatBlock::count_annuli).sum();
        let (mut b, mut a) = (block, annulus);
        let mut backwards = follow_prev;
        let mut ref_v = false;
        for _ in 0..=2 * total {
            let k = self.blocks[b].count_annuli();
            a = if backwards { (a + k - 1) % k } else { (a + 1) % k };
            match self.blocks[b].adjacent(a) {
                None => return Some((b, a, ref_v, backwards != follow_prev)),
                Some(adj) => {
                    b = adj.block;
                    a = adj.annulus;
                    ref_v ^= adj.ref_vert;
                    if !adj.ref_horiz {
                        backwards = !backwards;
                    }
                }
            }
        }
        None
    }

    /// The Seifert fibred space this region describes, if its base is a
    /// surface. With `reflect`, every fibre is reversed.
    pub fn create_sfs(&self, reflect: bool) -> Option<SfsInvariants> {
        let offsets: Vec<usize> = self
            .blocks
            .iter()
            .scan(0, |acc, block| {
                let off = *acc;
                *acc += block.count_annuli();
                Some(off)
            })
            .collect();
        let total: usize = self.blocks.iter().map(SatBlock::count_annuli).sum();
        let left = |b: usize, a: usize| offsets[b] + a;
        let right = |b: usize, a: usize| offsets[b] + (a + 1) % self.blocks[b].count_annuli();

        let mut corners = UnionFind::new(total);
        let mut joins = 0;
        for (b, block) in self.blocks.iter().enumerate() {
            for a in 0..block.count_annuli() {
                let Some(adj) = block.adjacent(a) else {
                    continue;
                };
                if (adj.block, adj.annulus) < (b, a) {
                    continue;
                }
                joins += 1;
                if adj.ref_horiz {
                    corners.union(left(b, a), right(adj.block, adj.annulus));
                    corners.union(right(b, a), left(adj.block, adj.annulus));
                } else {
                    corners.union(left(b, a), left(adj.block, adj.annulus));
                    corners.union(right(b, a), right(adj.block, adj.annulus));
                }
            }
        }

        let boundary = self.unjoined();
        let mut arcs = UnionFind::new(total);
        for &(b, a) in &boundary {
            arcs.union(corners.find(left(b, a)), corners.find(right(b, a)));
        }
        let punctures = boundary
            .iter()
            .map(|&(b, a)| arcs.find(corners.find(left(b, a))))
            .unique()
            .count();

        let vertices = (0..total).map(|v| corners.find(v)).unique().count() as i64;
        let euler = vertices - (total - joins) as i64 + self.blocks.len() as i64;

        let (base_sign, fibre_sign, base_orientable, fibre_reversing) = self.orientations();
        let closed_euler = euler + punctures as i64;
        let genus = if base_orientable {
            if closed_euler > 2 || (2 - closed_euler) % 2 != 0 {
                return None;
            }
            ((2 - closed_euler) / 2) as u64
        } else {
            if closed_euler > 1 {
                return None;
            }
            (2 - closed_euler) as u64
        };

        let mut sfs = SfsInvariants::new(base_orientable, genus);
        sfs.add_punctures(punctures);
        sfs.set_fibre_reversing(fibre_reversing);
        for (b, block) in self.blocks.iter().enumerate() {
            let flipped = (base_sign[b] * fibre_sign[b] < 0) != reflect;
            block.adjust_sfs(&mut sfs, flipped).ok()?;
        }
        debug!(sfs = %sfs, blocks = self.blocks.len(), "region describes a Seifert fibred space");
        Some(sfs)
    }

    /// Relative base and fibre orientation of every block, and whether each
    /// is globally consistent.
    fn orientations(&self) -> (Vec<i8>, Vec<i8>, bool, bool) {
        let n = self.blocks.len();
        let mut base = vec![0i8; n];
        let mut fibre = vec![0i8; n];
        let mut base_ok = true;
        let mut fibre_ok = true;
        for start in 0..n {
            if base[start] != 0 {
                continue;
            }
            base[start] = 1;
            fibre[start] = 1;
            let mut stack = vec![start];
            while let Some(b) = stack.pop() {
                let block = &self.blocks[b];
                for adj in (0..block.count_annuli()).filter_map(|a| block.adjacent(a)) {
                    let want_base = if adj.ref_horiz { base[b] } else { -base[b] };
                    let want_fibre = if adj.ref_vert { -fibre[b] } else { fibre[b] };
                    if base[adj.block] == 0 {
                        base[adj.block] = want_base;
                        fibre[adj.block] = want_fibre;
                        stack.push(adj.block);
                    } else {
                        base_ok &= base[adj.block] == want_base;
                        fibre_ok &= fibre[adj.block] == want_fibre;
                    }
                }
            }
        }
        (base, fibre, base_ok, !fibre_ok)
    }
}

impl fmt::Display for SatRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.blocks.iter().join(" + "))
    }
}

/// Path-compressing union-find over `0..n`.
struct UnionFind {
    parent: Vec<usize>,
}

impl UnionFind {
    fn new(n: usize) -> Self {
        Self { parent: (0..n).collect() }
    }

    fn find(&mut self, x: usize) -> usize {
        let mut root = x;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        let mut at = x;
        while self.parent[at] != root {
            let next = self.parent[at];
            self.parent[at] = root;
            at = next;
        }
        root
    }

    fn union(&mut self, a: usize, b: usize) {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra != rb {
            self.parent[ra] = rb;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::subcomplex::annulus::SatAnnulus;

    fn prism_region(tri: &Triangulation) -> SatRegion {
        let core = TriSolidTorus::recognise(tri, 0, Perm4::identity()).unwrap();
        SatRegion::new(SatBlock::from_core(core))
    }

    #[test]
    fn test_bare_prism_is_a_disc() {
        let tri = TriSolidTorus::test_core();
        let mut region = prism_region(&tri);
        assert!(!region.expand(&tri, false));
        assert_eq!(region.count_blocks(), 1);
        assert_eq!(region.count_boundary_annuli(), 3);
        let sfs = region.create_sfs(false).unwrap();
        assert_eq!(sfs.base_name(), "D");
        assert!(sfs.fibres().is_empty());
        assert_eq!(sfs.obstruction(), -1);
        assert!(!region.clone().expand(&tri, true));
    }

    #[test]
    fn test_boundary_walk_goes_round_the_ring() {
        let tri = TriSolidTorus::test_core();
        let region = prism_region(&tri);
        assert_eq!(region.next_boundary_annulus(0, 0, false), Some((0, 1, false, false)));
        assert_eq!(region.next_boundary_annulus(0, 0, true), Some((0, 2, false, false)));
    }

    #[test]
    fn test_prism_with_two_folds_and_a_boundary() {
        let mut tri = TriSolidTorus::test_core();
        let core = TriSolidTorus::recognise(&tri, 0, Perm4::identity()).unwrap();
        core.annulus(0).attach_lst(&mut tri, 2, 1).unwrap();
        core.annulus(1).attach_lst(&mut tri, 3, 1).unwrap();
        let mut region = prism_region(&tri);
        assert!(!region.expand(&tri, false));
        assert_eq!(region.count_blocks(), 3);
        assert_eq!(region.boundary_annuli(), vec![(0, 0)]);
        assert!(region.blocks()[1].kind().is_filling());
        let sfs = region.create_sfs(false).unwrap();
        assert_eq!(sfs.base_name(), "D");
        let alphas: Vec<u64> = sfs.fibres().iter().map(|f| f.0).collect();
        assert_eq!(alphas, vec![2, 3]);
        assert_eq!(region.next_boundary_annulus(0, 0, false), Some((0, 0, false, false)));
    }

    #[test]
    fn test_lone_annulus_is_not_a_region() {
        let tri = Triangulation::with_size(2);
        let ann = SatAnnulus::new(0, Perm4::identity(), 1, Perm4::identity());
        assert!(SatBlock::recognise(&tri, &ann, &HashSet::new()).is_none());
        assert!(SatRegion::find(&tri).is_none());
    }
}
