// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Face-pairing graph motifs that rule out minimal triangulations.
//!
//! Each motif, found in a closed pairing of three or more tetrahedra, shows
//! that no triangulation with that pairing is a minimal triangulation of a
//! closed irreducible P²-irreducible 3-manifold.
//!
//! Most motifs are built from chains. A chain is a sequence of tetrahedra,
//! each joined to the next along two faces. A one-ended chain starts with a
//! tetrahedron that has two of its own faces glued together; its far end has
//! two exit faces leading to different places.

use super::pairing::FacetPairing;

/// A one-ended chain: the tetrahedra in order from the looped one, and
/// the two exit faces of the last.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Chain {
    tets: Vec<usize>,
    exits: [usize; 2],
}

impl Chain {
    fn end(&self) -> usize {
        self.tets[self.tets.len() - 1]
    }

    fn is_disjoint(&self, other: &Chain) -> bool {
        self.tets.iter().all(|t| !other.tets.contains(t))
    }
}

fn complement(faces: [usize; 2]) -> [usize; 2] {
    let mut rest = (0..4).filter(|f| !faces.contains(f));
    [rest.next().unwrap_or(0), rest.next().unwrap_or(0)]
}

impl FacetPairing {
    /// Follows a chain from `tet` through the faces `faces` for as long as
    /// both faces lead to the same new tetrahedron. Returns the last
    /// tetrahedron reached and its two faces pointing onwards.
    pub fn follow_chain(&self, tet: usize, faces: [usize; 2]) -> (usize, [usize; 2]) {
        let (tets, faces) = self.trace_chain(tet, faces);
        (tets[tets.len() - 1], faces)
    }

    fn trace_chain(&self, mut tet: usize, mut faces: [usize; 2]) -> (Vec<usize>, [usize; 2]) {
        let mut tets = vec![tet];
        // A cycle of double edges never ends on its own.
        for _ in 0..self.size() {
            let (Some(a), Some(b)) = (self.dest(tet, faces[0]), self.dest(tet, faces[1])) else {
                break;
            };
            if a.simp != b.simp || a.simp == tet || tets.contains(&a.simp) {
                break;
            }
            tet = a.simp;
            faces = complement([a.facet, b.facet]);
            tets.push(tet);
        }
        (tets, faces)
    }

    fn is_loop(&self, tet: usize, faces: [usize; 2]) -> bool {
        self.dest(tet, faces[0])
            .is_some_and(|d| d.simp == tet && d.facet == faces[1])
    }

    fn loop_faces(&self, tet: usize) -> Option<[usize; 2]> {
        (0..4).find_map(|f| {
            self.dest(tet, f)
                .filter(|d| d.simp == tet && d.facet > f)
                .map(|d| [f, d.facet])
        })
    }

    /// The one-ended chain starting at `tet`, if `tet` has a loop and the
    /// chain does not close up at its far end.
    fn chain_from(&self, tet: usize) -> Option<Chain> {
        let start = self.loop_faces(tet)?;
        let (tets, exits) = self.trace_chain(tet, complement(start));
        if self.is_loop(tets[tets.len() - 1], exits) {
            return None;
        }
        Some(Chain { tets, exits })
    }

    fn one_ended_chains(&self) -> Vec<Chain> {
        (0..self.size()).filter_map(|t| self.chain_from(t)).collect()
    }

    /// The tetrahedra reached through a chain's exits, if both exits are
    /// glued to tetrahedra outside the chain.
    fn exit_tets(&self, chain: &Chain) -> Option<[usize; 2]> {
        let a = self.dest(chain.end(), chain.exits[0])?.simp;
        let b = self.dest(chain.end(), chain.exits[1])?.simp;
        (!chain.tets.contains(&a) && !chain.tets.contains(&b)).then_some([a, b])
    }

    /// The faces of `tet` other than those glued to `others`.
    fn neighbours_except(&self, tet: usize, others: &[usize]) -> Vec<usize> {
        (0..4)
            .filter_map(|f| self.dest(tet, f))
            .map(|d| d.simp)
            .filter(|s| !others.contains(s))
            .collect()
    }

    /// Three gluings between the same two tetrahedra.
    pub fn has_triple_edge(&self) -> bool {
        (0..self.size()).any(|a| (a + 1..self.size()).any(|b| self.count_joins(a, b) >= 3))
    }

    /// Two one-ended chains whose ends are joined along a single face.
    pub fn has_broken_double_ended_chain(&self) -> bool {
        for first in self.one_ended_chains() {
            let end = first.end();
            for &exit in &first.exits {
                let Some(join) = self.dest(end, exit) else {
                    continue;
                };
                let x = join.simp;
                if first.tets.contains(&x) || self.count_joins(end, x) != 1 {
                    continue;
                }
                for other in (0..4).filter(|&h| h != join.facet) {
                    let (tets, faces) = self.trace_chain(x, complement([join.facet, other]));
                    if self.is_loop(tets[tets.len() - 1], faces) && tets.iter().all(|t| !first.tets.contains(t)) {
                        return true;
                    }
                }
            }
        }
        false
    }

    /// A one-ended chain whose exits lead to two tetrahedra that are joined
    /// to each other along two faces.
    pub fn has_one_ended_chain_with_double_handle(&self) -> bool {
        self.one_ended_chains().iter().any(|chain| {
            self.exit_tets(chain)
                .is_some_and(|[a, b]| a != b && self.count_joins(a, b) >= 2)
        })
    }

    /// Two disjoint one-ended chains whose exits both lead to the same two
    /// tetrahedra, which are joined to each other along a single face.
    pub fn has_wedged_double_ended_chain(&self) -> bool {
        let chains = self.one_ended_chains();
        for (i, first) in chains.iter().enumerate() {
            let Some(mut ends) = self.exit_tets(first) else {
                continue;
            };
            ends.sort_unstable();
            if ends[0] == ends[1] || self.count_joins(ends[0], ends[1]) != 1 {
                continue;
            }
            for second in &chains[i + 1..] {
                if !first.is_disjoint(second) || second.tets.iter().any(|t| ends.contains(t)) {
                    continue;
                }
                if let Some(mut other) = self.exit_tets(second) {
                    other.sort_unstable();
                    if other == ends {
                        return true;
                    }
                }
            }
        }
        false
    }

    /// A one-ended chain with one exit glued to a tetrahedron `x` that is
    /// joined along two faces to a further tetrahedron `y`.
    ///
    /// Three cases are excluded: the chain's other exit also reaching `x`
    /// or `y`; `y` continuing into a chain of its own (its two remaining
    /// faces lead to one tetrahedron); and the remaining face of `x` leading
    /// to the tetrahedron beyond the chain's other exit.
    pub fn has_one_ended_chain_with_stray_bigon(&self) -> bool {
        for chain in self.one_ended_chains() {
            let Some(exit_tets) = self.exit_tets(&chain) else {
                continue;
            };
            for (i, &x) in exit_tets.iter().enumerate() {
                let w = exit_tets[1 - i];
                if w == x {
                    continue;
                }
                for y in self.neighbours_except(x, &[x]) {
                    if y == chain.end() || chain.tets.contains(&y) || self.count_joins(x, y) != 2 {
                        continue;
                    }
                    if w == y {
                        continue;
                    }
                    let y_rest = self.neighbours_except(y, &[x]);
                    if y_rest.len() == 2 && y_rest[0] == y_rest[1] {
                        continue;
                    }
                    let x_rest = self.neighbours_except(x, &[y, chain.end()]);
                    if x_rest.contains(&w) {
                        continue;
                    }
                    return true;
                }
            }
        }
        false
    }

    /// Three disjoint one-ended chains, each with one exit to `x` and one to
    /// `y`, where `x` and `y` are joined along a single face.
    pub fn has_triple_one_ended_chain(&self) -> bool {
        let chains = self.one_ended_chains();
        let ends: Vec<Option<[usize; 2]>> = chains
            .iter()
            .map(|c| {
                self.exit_tets(c).map(|mut e| {
                    e.sort_unstable();
                    e
                })
            })
            .collect();
        for (i, a) in chains.iter().enumerate() {
            let Some(pair) = ends[i] else {
                continue;
            };
            if pair[0] == pair[1] || self.count_joins(pair[0], pair[1]) != 1 {
                continue;
            }
            let partners: Vec<&Chain> = chains
                .iter()
                .enumerate()
                .filter(|&(j, c)| j > i && ends[j] == Some(pair) && c.is_disjoint(a))
                .map(|(_, c)| c)
                .collect();
            for (k, b) in partners.iter().enumerate() {
                if partners[k + 1..].iter().any(|c| c.is_disjoint(b)) {
                    return true;
                }
            }
        }
        false
    }

    /// Two adjacent tetrahedra whose six other faces lead to six distinct
    /// tetrahedra.
    pub fn has_single_star(&self) -> bool {
        self.has_star(1, 6)
    }

    /// Two tetrahedra joined along two faces whose four other faces lead to
    /// four distinct tetrahedra.
    pub fn has_double_star(&self) -> bool {
        self.has_star(2, 4)
    }

    fn has_star(&self, joins: usize, arms: usize) -> bool {
        for a in 0..self.size() {
            for b in a + 1..self.size() {
                if self.count_joins(a, b) != joins {
                    continue;
                }
                let mut around = self.neighbours_except(a, &[a, b]);
                around.extend(self.neighbours_except(b, &[a, b]));
                if around.len() != arms {
                    continue;
                }
                around.sort_unstable();
                around.dedup();
                if around.len() == arms {
                    return true;
                }
            }
        }
        false
    }

    /// Four tetrahedra `a b c d` in a square where `a b` and `c d` are
    /// joined along two faces, and `b c` and `d a` along one.
    pub fn has_double_square(&self) -> bool {
        let n = self.size();
        for a in 0..n {
            for b in (0..n).filter(|&b| b != a && self.count_joins(a, b) == 2) {
                for c in (0..n).filter(|&c| c != a && c != b && self.count_joins(b, c) == 1) {
                    for d in (0..n).filter(|&d| d != a && d != b && d != c) {
                        if self.count_joins(c, d) == 2 && self.count_joins(d, a) == 1 {
                            return true;
                        }
                    }
                }
            }
        }
        false
    }

    /// Whether this closed pairing of three or more tetrahedra holds any of
    /// the motifs above.
    pub fn has_bad_subgraph(&self) -> bool {
        if self.dimension() != 3 || self.size() <= 2 || !self.is_closed() {
            return false;
        }
        self.has_triple_edge()
            || self.has_broken_double_ended_chain()
            || self.has_one_ended_chain_with_double_handle()
            || self.has_wedged_double_ended_chain()
            || self.has_one_ended_chain_with_stray_bigon()
            || self.has_triple_one_ended_chain()
            || self.has_single_star()
            || self.has_double_star()
            || self.has_double_square()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::triangulation::FacetSpec;

    fn closed(size: usize, pairs: &[(usize, usize, usize, usize)]) -> FacetPairing {
        let mut partners = vec![None; size * 4];
        for &(a, f, b, g) in pairs {
            partners[a * 4 + f] = Some(FacetSpec::new(b, g));
            partners[b * 4 + g] = Some(FacetSpec::new(a, f));
        }
        let p = FacetPairing::from_partners(3, size, &partners).unwrap();
        assert!(p.is_closed());
        p
    }

    #[test]
    fn test_double_ended_chain_is_good() {
        let p = closed(3, &[(0, 0, 0, 1), (0, 2, 1, 0), (0, 3, 1, 1), (1, 2, 2, 0), (1, 3, 2, 1), (2, 2, 2, 3)]);
        assert_eq!(p.follow_chain(0, [2, 3]), (2, [2, 3]));
        assert!(!p.has_bad_subgraph());
    }

    #[test]
    fn test_triple_edge() {
        let p = closed(3, &[(0, 0, 1, 0), (0, 1, 1, 1), (0, 2, 1, 2), (0, 3, 2, 0), (1, 3, 2, 1), (2, 2, 2, 3)]);
        assert!(p.has_triple_edge());
        assert!(p.has_bad_subgraph());
    }

    #[test]
    fn test_broken_double_ended_chain() {
        let p = closed(
            5,
            &[
                (0, 0, 0, 1),
                (0, 2, 1, 0),
                (0, 3, 1, 1),
                (1, 2, 2, 0),
                (1, 3, 4, 0),
                (2, 1, 4, 1),
                (2, 2, 3, 0),
                (2, 3, 3, 1),
                (3, 2, 3, 3),
                (4, 2, 4, 3),
            ],
        );
        assert!(p.has_broken_double_ended_chain());
        assert!(p.has_bad_subgraph());
    }

    #[test]
    fn test_chain_with_double_handle() {
        let p = closed(
            5,
            &[
                (0, 0, 0, 1),
                (0, 2, 1, 0),
                (0, 3, 1, 1),
                (1, 2, 2, 0),
                (1, 3, 3, 0),
                (2, 1, 3, 1),
                (2, 2, 3, 2),
                (2, 3, 4, 0),
                (3, 3, 4, 1),
                (4, 2, 4, 3),
            ],
        );
        assert!(p.has_one_ended_chain_with_double_handle());
    }

    #[test]
    fn test_wedged_double_ended_chain() {
        // Chains from 0 and 1 both exit to 2 and 3, which share one face.
        let p = closed(
            6,
            &[
                (0, 0, 0, 1),
                (0, 2, 2, 0),
                (0, 3, 3, 0),
                (1, 0, 1, 1),
                (1, 2, 2, 1),
                (1, 3, 3, 1),
                (2, 2, 3, 2),
                (2, 3, 4, 0),
                (3, 3, 5, 0),
                (4, 1, 4, 2),
                (4, 3, 5, 3),
                (5, 1, 5, 2),
            ],
        );
        assert!(p.has_wedged_double_ended_chain());
        assert!(!p.has_triple_one_ended_chain());
        assert!(p.has_bad_subgraph());
    }

    #[test]
    fn test_chains_to_unjoined_tetrahedra_are_not_wedged() {
        let p = closed(
            6,
            &[
                (0, 0, 0, 1),
                (0, 2, 2, 0),
                (0, 3, 3, 0),
                (1, 0, 1, 1),
                (1, 2, 2, 1),
                (1, 3, 3, 1),
                (2, 2, 4, 0),
                (2, 3, 5, 0),
                (3, 2, 4, 1),
                (3, 3, 5, 1),
                (4, 2, 5, 2),
                (4, 3, 5, 3),
            ],
        );
        assert!(!p.has_wedged_double_ended_chain());
    }

    #[test]
    fn test_chain_with_stray_bigon() {
        // The chain at 0 exits to 1 and 2; 1 is joined twice to 3.
        let p = closed(
            6,
            &[
                (0, 0, 0, 1),
                (0, 2, 1, 0),
                (0, 3, 2, 0),
                (1, 1, 3, 0),
                (1, 2, 3, 1),
                (1, 3, 4, 0),
                (3, 2, 5, 0),
                (3, 3, 4, 1),
                (2, 1, 4, 2),
                (2, 2, 5, 1),
                (2, 3, 5, 2),
                (4, 3, 5, 3),
            ],
        );
        assert!(p.has_one_ended_chain_with_stray_bigon());
        assert!(p.has_bad_subgraph());
    }

    #[test]
    fn test_bigon_reached_by_both_exits() {
        let p = closed(
            5,
            &[
                (0, 0, 0, 1),
                (0, 2, 1, 0),
                (0, 3, 3, 2),
                (1, 1, 3, 0),
                (1, 2, 3, 1),
                (1, 3, 4, 0),
                (3, 3, 4, 1),
                (4, 2, 4, 3),
            ],
        );
        assert!(!p.has_one_ended_chain_with_stray_bigon());
    }

    #[test]
    fn test_bigon_continuing_into_a_chain() {
        // Both remaining faces of 3 lead to 5.
        let p = closed(
            6,
            &[
                (0, 0, 0, 1),
                (0, 2, 1, 0),
                (0, 3, 2, 0),
                (1, 1, 3, 0),
                (1, 2, 3, 1),
                (1, 3, 4, 0),
                (3, 2, 5, 0),
                (3, 3, 5, 1),
                (2, 1, 2, 2),
                (2, 3, 4, 1),
                (4, 2, 5, 2),
                (4, 3, 5, 3),
            ],
        );
        assert!(!p.has_one_ended_chain_with_stray_bigon());
    }

    #[test]
    fn test_bigon_leading_back_to_the_other_exit() {
        // The last face of 1 leads to 2, the chain's other exit.
        let p = closed(
            6,
            &[
                (0, 0, 0, 1),
                (0, 2, 1, 0),
                (0, 3, 2, 0),
                (1, 1, 3, 0),
                (1, 2, 3, 1),
                (1, 3, 2, 1),
                (3, 2, 4, 0),
                (3, 3, 5, 0),
                (2, 2, 4, 1),
                (2, 3, 5, 1),
                (4, 2, 5, 2),
                (4, 3, 5, 3),
            ],
        );
        assert!(!p.has_one_ended_chain_with_stray_bigon());
    }

    #[test]
    fn test_triple_one_ended_chain() {
        let p = closed(
            5,
            &[
                (0, 0, 0, 1),
                (0, 2, 3, 0),
                (0, 3, 4, 0),
                (1, 0, 1, 1),
                (1, 2, 3, 1),
                (1, 3, 4, 1),
                (2, 0, 2, 1),
                (2, 2, 3, 2),
                (2, 3, 4, 2),
                (3, 3, 4, 3),
            ],
        );
        assert!(p.has_triple_one_ended_chain());
        assert!(p.has_bad_subgraph());
    }

    #[test]
    fn test_two_chains_are_not_a_triple() {
        let p = closed(
            4,
            &[
                (0, 0, 0, 1),
                (0, 2, 2, 0),
                (0, 3, 3, 0),
                (1, 0, 1, 1),
                (1, 2, 2, 1),
                (1, 3, 3, 1),
                (2, 2, 3, 2),
                (2, 3, 3, 3),
            ],
        );
        assert!(!p.has_triple_one_ended_chain());
    }

    #[test]
    fn test_single_star() {
        // 0 and 1 share a face; their other faces reach 2 to 7.
        let p = closed(
            8,
            &[
                (0, 0, 1, 0),
                (0, 1, 2, 0),
                (0, 2, 3, 0),
                (0, 3, 4, 0),
                (1, 1, 5, 0),
                (1, 2, 6, 0),
                (1, 3, 7, 0),
                (2, 1, 3, 1),
                (3, 2, 4, 1),
                (4, 2, 2, 2),
                (5, 1, 6, 1),
                (6, 2, 7, 1),
                (7, 2, 5, 2),
                (2, 3, 5, 3),
                (3, 3, 6, 3),
                (4, 3, 7, 3),
            ],
        );
        assert!(p.has_single_star());
        assert!(p.has_bad_subgraph());
    }

    #[test]
    fn test_star_with_shared_arm() {
        // Faces 0:3 and 1:3 both lead to 4.
        let p = closed(
            7,
            &[
                (0, 0, 1, 0),
                (0, 1, 2, 0),
                (0, 2, 3, 0),
                (0, 3, 4, 0),
                (1, 1, 5, 0),
                (1, 2, 6, 0),
                (1, 3, 4, 1),
                (2, 1, 3, 1),
                (3, 2, 5, 1),
                (5, 2, 2, 2),
                (2, 3, 6, 1),
                (6, 2, 3, 3),
                (5, 3, 4, 2),
                (6, 3, 4, 3),
            ],
        );
        assert!(!p.has_single_star());
    }

    #[test]
    fn test_double_star() {
        let p = closed(
            6,
            &[
                (0, 0, 1, 0),
                (0, 1, 1, 1),
                (0, 2, 2, 0),
                (0, 3, 3, 0),
                (1, 2, 4, 0),
                (1, 3, 5, 0),
                (2, 1, 3, 1),
                (2, 2, 4, 1),
                (2, 3, 5, 1),
                (3, 2, 4, 2),
                (3, 3, 5, 2),
                (4, 3, 5, 3),
            ],
        );
        assert!(p.has_double_star());
        assert!(!p.has_single_star());
    }

    #[test]
    fn test_double_square() {
        let p = closed(
            4,
            &[
                (0, 0, 1, 0),
                (0, 1, 1, 1),
                (2, 0, 3, 0),
                (2, 1, 3, 1),
                (1, 2, 2, 2),
                (3, 2, 0, 2),
                (0, 3, 2, 3),
                (1, 3, 3, 3),
            ],
        );
        assert!(p.has_double_square());
        assert!(p.has_bad_subgraph());
    }

    #[test]
    fn test_bounded_pairings_are_never_bad() {
        let mut partners = vec![None; 12];
        for (a, f, b, g) in [(0, 0, 1, 0), (0, 1, 1, 1), (0, 2, 1, 2)] {
            partners[a * 4 + f] = Some(FacetSpec::new(b, g));
            partners[b * 4 + g] = Some(FacetSpec::new(a, f));
        }
        let p = FacetPairing::from_partners(3, 3, &partners).unwrap();
        assert!(p.has_triple_edge());
        assert!(!p.has_bad_subgraph());
    }
}
