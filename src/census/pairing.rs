// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Facet pairings of simplices and their canonical form.
//!
//! A pairing on `n` simplices of dimension `d` has `n (d + 1)` slots. Slot
//! `s` holds the index of its partner slot, or `n (d + 1)` for a boundary
//! facet, so the flattened slot array is exactly the sequence compared when
//! deciding canonicity: boundary sorts after every real partner.
//!
//! The canonical form is the lexicographically smallest slot sequence over
//! every relabelling of the simplices and of the facets within each simplex.
//! It is found by building relabellings slot by slot in their new order:
//! once a facet's image is known, the image of its partner is forced (the
//! next unused simplex and facet 0 for a simplex not yet reached, the
//! smallest unused facet otherwise), so only ties branch.

use std::fmt;

use crate::error::{KernelError, Result};
use crate::triangulation::{FacetSpec, Triangulation};

/// Slot value for a facet whose partner has not been decided.
pub(crate) const UNMATCHED: usize = usize::MAX;
const UNSET: usize = usize::MAX;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FacetPairing {
    dimension: usize,
    size: usize,
    slots: Vec<usize>,
}

impl FacetPairing {
    /// A pairing with every facet undecided, as the generator starts from.
    pub(crate) fn undecided(dimension: usize, size: usize) -> Self {
        Self {
            dimension,
            size,
            slots: vec![UNMATCHED; size * (dimension + 1)],
        }
    }

    /// Builds a pairing from the partner of each facet, listed simplex by
    /// simplex; `None` marks a boundary facet.
    pub fn from_partners(dimension: usize, size: usize, partners: &[Option<FacetSpec>]) -> Result<Self> {
        let facets = dimension + 1;
        if partners.len() != size * facets {
            return Err(KernelError::invalid_argument(format!(
                "{} partners given for {} facets",
                partners.len(),
                size * facets
            )));
        }
        let boundary = size * facets;
        let mut slots = Vec::with_capacity(boundary);
        for partner in partners {
            slots.push(match partner {
                None => boundary,
                Some(spec) if spec.simp < size && spec.facet < facets => spec.simp * facets + spec.facet,
                Some(spec) => return Err(KernelError::invalid_argument(format!("no facet {}", spec))),
            });
        }
        for (s, &p) in slots.iter().enumerate() {
            if p != boundary && (p == s || slots[p] != s) {
                return Err(KernelError::invalid_argument(format!(
                    "facet {} is not paired symmetrically",
                    FacetSpec::new(s / facets, s % facets)
                )));
            }
        }
        Ok(Self {
            dimension,
            size,
            slots,
        })
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Facets per simplex.
    pub fn facets(&self) -> usize {
        self.dimension + 1
    }

    pub(crate) fn boundary_value(&self) -> usize {
        self.slots.len()
    }

    pub(crate) fn slots(&self) -> &[usize] {
        &self.slots
    }

    pub(crate) fn slots_mut(&mut self) -> &mut [usize] {
        &mut self.slots
    }

    fn spec(&self, slot: usize) -> FacetSpec {
        FacetSpec::new(slot / self.facets(), slot % self.facets())
    }

    /// The facet glued to the given one, or `None` on the boundary.
    pub fn dest(&self, simp: usize, facet: usize) -> Option<FacetSpec> {
        let value = self.slots[simp * self.facets() + facet];
        (value < self.boundary_value()).then(|| self.spec(value))
    }

    pub fn is_unmatched(&self, simp: usize, facet: usize) -> bool {
        self.slots[simp * self.facets() + facet] == self.boundary_value()
    }

    /// Whether every facet has been decided.
    pub fn is_complete(&self) -> bool {
        self.slots.iter().all(|&s| s != UNMATCHED)
    }

    pub fn is_closed(&self) -> bool {
        self.slots.iter().all(|&s| s < self.boundary_value())
    }

    pub fn count_boundary_facets(&self) -> usize {
        self.slots.iter().filter(|&&s| s == self.boundary_value()).count()
    }

    /// Number of facets of `simp` glued to some facet.
    pub fn dual_degree(&self, simp: usize) -> usize {
        let f = self.facets();
        self.slots[simp * f..(simp + 1) * f]
            .iter()
            .filter(|&&s| s < self.boundary_value())
            .count()
    }

    /// Number of gluings between two distinct simplices.
    pub fn count_joins(&self, a: usize, b: usize) -> usize {
        (0..self.facets())
            .filter(|&g| self.dest(a, g).is_some_and(|d| d.simp == b))
            .count()
    }

    pub fn is_connected(&self) -> bool {
        if self.size == 0 {
            return true;
        }
        let mut seen = vec![false; self.size];
        let mut stack = vec![0];
        seen[0] = true;
        while let Some(s) = stack.pop() {
            for g in 0..self.facets() {
                if let Some(d) = self.dest(s, g) {
                    if !seen[d.simp] {
                        seen[d.simp] = true;
                        stack.push(d.simp);
                    }
                }
            }
        }
        seen.into_iter().all(|s| s)
    }

    /// The image of this pairing under a relabelling.
    pub fn apply(&self, iso: &FacetPairingIsomorphism) -> Result<FacetPairing> {
        if iso.size() != self.size || iso.facets() != self.facets() {
            return Err(KernelError::invalid_argument("isomorphism does not match the pairing"));
        }
        let f = self.facets();
        let boundary = self.boundary_value();
        let mut slots = vec![UNMATCHED; boundary];
        for (s, &p) in self.slots.iter().enumerate() {
            let image = iso.slot_image(s);
            slots[image] = match p {
                UNMATCHED => UNMATCHED,
                p if p == boundary => boundary,
                p => iso.slot_image(p),
            };
        }
        debug_assert_eq!(slots.len(), self.size * f);
        Ok(FacetPairing {
            dimension: self.dimension,
            size: self.size,
            slots,
        })
    }

    /// Whether no relabelling gives a smaller slot sequence.
    pub fn is_canonical(&self) -> bool {
        let mut search = CanonicalSearch::new(self, Goal::Test);
        search.run();
        !search.smaller
    }

    /// Whether some relabelling makes the decided part of this partial
    /// pairing smaller. Only facets already decided are compared, so a
    /// `true` answer holds for every completion.
    pub(crate) fn is_beaten(&self) -> bool {
        let mut search = CanonicalSearch::new(self, Goal::Test);
        search.collect = false;
        search.run();
        search.smaller
    }

    /// Every automorphism, the identity included, if this pairing is
    /// canonical.
    pub fn automorphisms(&self) -> Option<Vec<FacetPairingIsomorphism>> {
        let mut search = CanonicalSearch::new(self, Goal::Test);
        search.run();
        (!search.smaller).then(|| search.found.iter().map(|r| r.to_isomorphism(self.facets())).collect())
    }

    /// The canonical form with one isomorphism onto it.
    pub fn canonical(&self) -> Result<(FacetPairing, FacetPairingIsomorphism)> {
        let (form, mut isos) = self.canonical_all()?;
        let iso = isos.pop().ok_or_else(|| KernelError::invalid_argument("pairing has no canonical form"))?;
        Ok((form, iso))
    }

    /// The canonical form with every isomorphism onto it. When the pairing
    /// is already canonical these are its automorphisms.
    pub fn canonical_all(&self) -> Result<(FacetPairing, Vec<FacetPairingIsomorphism>)> {
        if !self.is_complete() {
            return Err(KernelError::failed_precondition("pairing has undecided facets"));
        }
        let mut search = CanonicalSearch::new(self, Goal::Minimise);
        search.run();
        let form = FacetPairing {
            dimension: self.dimension,
            size: self.size,
            slots: search.best,
        };
        let isos = search.found.iter().map(|r| r.to_isomorphism(self.facets())).collect();
        Ok((form, isos))
    }
}

impl fmt::Display for FacetPairing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (s, &p) in self.slots.iter().enumerate() {
            if s > 0 {
                write!(f, " ")?;
            }
            match p {
                UNMATCHED => write!(f, "?")?,
                p if p == self.boundary_value() => write!(f, "bdry")?,
                p => write!(f, "{}", self.spec(p))?,
            }
        }
        Ok(())
    }
}

/// A relabelling of simplices and of the facets within each simplex.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FacetPairingIsomorphism {
    simp_image: Vec<usize>,
    facet_perm: Vec<Vec<usize>>,
}

impl FacetPairingIsomorphism {
    pub fn identity(facets: usize, size: usize) -> Self {
        Self {
            simp_image: (0..size).collect(),
            facet_perm: vec![(0..facets).collect(); size],
        }
    }

    /// Builds an isomorphism, checking that every part is a permutation.
    pub fn new(simp_image: Vec<usize>, facet_perm: Vec<Vec<usize>>) -> Result<Self> {
        fn is_perm(p: &[usize]) -> bool {
            let mut seen = vec![false; p.len()];
            p.iter().all(|&i| i < p.len() && !std::mem::replace(&mut seen[i], true))
        }
        let facets = facet_perm.first().map_or(0, Vec::len);
        if facet_perm.len() != simp_image.len()
            || !is_perm(&simp_image)
            || facet_perm.iter().any(|p| p.len() != facets || !is_perm(p))
        {
            return Err(KernelError::invalid_argument("not a relabelling"));
        }
        Ok(Self { simp_image, facet_perm })
    }

    pub fn size(&self) -> usize {
        self.simp_image.len()
    }

    pub fn facets(&self) -> usize {
        self.facet_perm.first().map_or(0, Vec::len)
    }

    pub fn simp_image(&self, simp: usize) -> usize {
        self.simp_image[simp]
    }

    pub fn facet_image(&self, simp: usize, facet: usize) -> usize {
        self.facet_perm[simp][facet]
    }

    fn slot_image(&self, slot: usize) -> usize {
        let f = self.facets();
        self.simp_image[slot / f] * f + self.facet_perm[slot / f][slot % f]
    }

    pub fn is_identity(&self) -> bool {
        self.simp_image.iter().enumerate().all(|(i, &j)| i == j)
            && self.facet_perm.iter().all(|p| p.iter().enumerate().all(|(i, &j)| i == j))
    }
}

impl Triangulation {
    /// The facet pairing underlying this triangulation's gluings.
    pub fn facet_pairing(&self) -> FacetPairing {
        let n = self.size();
        let boundary = n * 4;
        let slots = (0..n)
            .flat_map(|t| (0..4).map(move |f| (t, f)))
            .map(|(t, f)| {
                self.tetrahedron(t)
                    .adjacent(f)
                    .map_or(boundary, |(u, g)| u * 4 + g.apply(f))
            })
            .collect();
        FacetPairing {
            dimension: 3,
            size: n,
            slots,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Goal {
    /// Look for a relabelling smaller than the pairing itself.
    Test,
    /// Find the smallest image.
    Minimise,
}

/// A relabelling under construction, mapping both ways.
#[derive(Debug, Clone)]
struct Relabelling {
    old_simp: Vec<usize>,
    new_simp: Vec<usize>,
    /// New slot to old facet.
    old_facet: Vec<usize>,
    /// Old slot to new facet.
    new_facet: Vec<usize>,
    next_simp: usize,
}

impl Relabelling {
    fn new(size: usize, facets: usize) -> Self {
        Self {
            old_simp: vec![UNSET; size],
            new_simp: vec![UNSET; size],
            old_facet: vec![UNSET; size * facets],
            new_facet: vec![UNSET; size * facets],
            next_simp: 0,
        }
    }

    fn to_isomorphism(&self, facets: usize) -> FacetPairingIsomorphism {
        let facet_perm = self
            .new_facet
            .chunks(facets.max(1))
            .map(<[usize]>::to_vec)
            .collect();
        FacetPairingIsomorphism {
            simp_image: self.new_simp.clone(),
            facet_perm,
        }
    }
}

struct CanonicalSearch<'a> {
    pairing: &'a FacetPairing,
    goal: Goal,
    /// Sequence to beat: the pairing itself, or the best image so far.
    best: Vec<usize>,
    /// Positions of `best` that are settled.
    bound: usize,
    smaller: bool,
    collect: bool,
    found: Vec<Relabelling>,
}

impl<'a> CanonicalSearch<'a> {
    fn new(pairing: &'a FacetPairing, goal: Goal) -> Self {
        Self {
            pairing,
            goal,
            best: pairing.slots.clone(),
            bound: pairing.slots.len(),
            smaller: false,
            collect: true,
            found: Vec::new(),
        }
    }

    fn run(&mut self) {
        let start = Relabelling::new(self.pairing.size, self.pairing.facets());
        self.search(0, start);
    }

    fn search(&mut self, pos: usize, state: Relabelling) {
        if self.smaller {
            return;
        }
        let f = self.pairing.facets();
        let total = self.pairing.slots.len();
        if pos == total {
            if self.collect {
                self.found.push(state);
            }
            return;
        }
        let (k, h) = (pos / f, pos % f);
        if state.old_simp[k] == UNSET {
            // Simplex k is not reached from earlier simplices: try each
            // unused simplex in its place.
            for t in (0..self.pairing.size).filter(|&t| state.new_simp[t] == UNSET) {
                let mut next = state.clone();
                next.old_simp[k] = t;
                next.new_simp[t] = k;
                next.next_simp = k + 1;
                self.search(pos, next);
            }
            return;
        }
        if self.goal == Goal::Test && self.best[pos] == UNMATCHED {
            return;
        }

        let old = state.old_simp[k];
        let candidates: Vec<usize> = if state.old_facet[pos] != UNSET {
            vec![state.old_facet[pos]]
        } else {
            (0..f).filter(|&g| state.new_facet[old * f + g] == UNSET).collect()
        };
        let mut options: Vec<(usize, Relabelling)> = candidates
            .into_iter()
            .filter_map(|g| self.extend(&state, pos, old * f + g, h))
            .collect();
        options.sort_by_key(|(value, _)| *value);
        if !self.collect && options.first().is_some_and(|(v, _)| *v == self.pairing.boundary_value()) {
            // Boundary facets of one simplex are interchangeable.
            options.truncate(1);
        }

        for (value, next) in options {
            if pos >= self.bound {
                self.best[pos] = value;
                self.bound = pos + 1;
            } else if value < self.best[pos] {
                match self.goal {
                    Goal::Test => {
                        self.smaller = true;
                        return;
                    }
                    Goal::Minimise => {
                        self.best[pos] = value;
                        self.bound = pos + 1;
                        self.found.clear();
                    }
                }
            } else if value > self.best[pos] {
                break;
            }
            self.search(pos + 1, next);
            if self.smaller {
                return;
            }
        }
    }

    /// Maps old slot `slot` to new position `pos` (facet `h`), fixing the
    /// image of its partner. Returns the resulting value at `pos`, or `None`
    /// if the partner is undecided.
    fn extend(&self, state: &Relabelling, pos: usize, slot: usize, h: usize) -> Option<(usize, Relabelling)> {
        let f = self.pairing.facets();
        let partner = self.pairing.slots[slot];
        if partner == UNMATCHED {
            return None;
        }
        let mut next = state.clone();
        next.old_facet[pos] = slot % f;
        next.new_facet[slot] = h;
        if partner == self.pairing.boundary_value() {
            return Some((partner, next));
        }
        let partner_simp = partner / f;
        if next.new_simp[partner_simp] == UNSET {
            let m = next.next_simp;
            next.next_simp += 1;
            next.new_simp[partner_simp] = m;
            next.old_simp[m] = partner_simp;
        }
        let m = next.new_simp[partner_simp];
        if next.new_facet[partner] == UNSET {
            let label = (0..f).find(|&l| next.old_facet[m * f + l] == UNSET)?;
            next.new_facet[partner] = label;
            next.old_facet[m * f + label] = partner % f;
        }
        Some((m * f + next.new_facet[partner], next))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::triangulation::construct;

    fn pairing(dimension: usize, size: usize, pairs: &[(usize, usize, usize, usize)]) -> FacetPairing {
        let facets = dimension + 1;
        let mut partners = vec![None; size * facets];
        for &(a, f, b, g) in pairs {
            partners[a * facets + f] = Some(FacetSpec::new(b, g));
            partners[b * facets + g] = Some(FacetSpec::new(a, f));
        }
        FacetPairing::from_partners(dimension, size, &partners).unwrap()
    }

    #[test]
    fn test_rejects_asymmetric_partners() {
        let partners = vec![Some(FacetSpec::new(0, 1)), None, None, None];
        assert!(FacetPairing::from_partners(3, 1, &partners).is_err());
    }

    #[test]
    fn test_single_tetrahedron_forms() {
        let canonical = pairing(3, 1, &[(0, 0, 0, 1), (0, 2, 0, 3)]);
        assert!(canonical.is_canonical());
        let other = pairing(3, 1, &[(0, 0, 0, 2), (0, 1, 0, 3)]);
        assert!(!other.is_canonical());
        let (form, iso) = other.canonical().unwrap();
        assert_eq!(form, canonical);
        assert_eq!(other.apply(&iso).unwrap(), canonical);
        // Swapping within each pair and swapping the pairs: 8 automorphisms.
        assert_eq!(canonical.automorphisms().unwrap().len(), 8);
    }

    #[test]
    fn test_boundary_sorts_last() {
        let with_loop = pairing(3, 1, &[(0, 0, 0, 1)]);
        assert!(with_loop.is_canonical());
        let late_loop = pairing(3, 1, &[(0, 2, 0, 3)]);
        assert!(!late_loop.is_canonical());
        assert_eq!(late_loop.count_boundary_facets(), 2);
    }

    #[test]
    fn test_figure_eight_pairing() {
        let p = construct::figure_eight().facet_pairing();
        assert!(p.is_closed());
        assert!(p.is_connected());
        assert_eq!(p.count_joins(0, 1), 4);
        let (form, isos) = p.canonical_all().unwrap();
        assert!(form.is_canonical());
        for iso in &isos {
            assert_eq!(p.apply(iso).unwrap(), form);
        }
    }

    #[test]
    fn test_relabelled_pairings_share_a_form() {
        let p = pairing(3, 3, &[(0, 0, 1, 0), (0, 1, 1, 1), (0, 2, 2, 0), (0, 3, 2, 1), (1, 2, 2, 2), (1, 3, 2, 3)]);
        let iso = FacetPairingIsomorphism::new(
            vec![2, 0, 1],
            vec![vec![3, 1, 0, 2], vec![0, 2, 1, 3], vec![1, 0, 3, 2]],
        )
        .unwrap();
        let q = p.apply(&iso).unwrap();
        assert_eq!(p.canonical().unwrap().0, q.canonical().unwrap().0);
    }

    #[test]
    fn test_partial_pairings() {
        let mut p = FacetPairing::undecided(3, 2);
        // Slot 0:0 glued to 0:2 while 0:1 is still free cannot be canonical.
        p.slots_mut()[0] = 2;
        p.slots_mut()[2] = 0;
        assert!(!p.is_complete());
        assert!(p.is_beaten());
        let mut q = FacetPairing::undecided(3, 2);
        q.slots_mut()[0] = 4;
        q.slots_mut()[4] = 0;
        assert!(!q.is_beaten());
    }

    #[test]
    fn test_triangle_pairing() {
        let p = pairing(2, 2, &[(0, 0, 1, 0), (0, 1, 1, 1), (0, 2, 1, 2)]);
        assert!(p.is_canonical());
        assert_eq!(p.facets(), 3);
        assert_eq!(p.automorphisms().unwrap().len(), 12);
    }
}
