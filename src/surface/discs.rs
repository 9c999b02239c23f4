// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Individual normal discs of a compact surface, and navigation between them.
//!
//! Discs of one type in one tetrahedron are numbered outward: triangles from
//! the vertex they cut off, other discs from the side containing vertex 0.
//! Arcs at one corner of one face are numbered outward from the corner, so
//! the arc numbering is shared by the two tetrahedra either side of a face.
//! Everything is addressed by index; no disc holds a reference to another.

use std::collections::VecDeque;
use std::sync::Arc;

use super::normal_surface::NormalSurface;
use super::tables::{disc_arcs, disc_side_contains, has_arc, N_DISC_TYPES};
use crate::error::{KernelError, Result};
use crate::triangulation::Triangulation;

/// Disc sets larger than this are refused.
const MAX_DISCS: usize = 1 << 26;

/// One normal disc: its tetrahedron, its type (0-9) and its number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DiscSpec {
    pub tet: usize,
    pub disc_type: usize,
    pub number: usize,
}

impl DiscSpec {
    pub fn new(tet: usize, disc_type: usize, number: usize) -> Self {
        Self { tet, disc_type, number }
    }
}

/// A normal arc, given by the face it lies in (by opposite vertex) and the
/// vertex whose corner it cuts off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ArcSpec {
    pub face: usize,
    pub corner: usize,
}

/// Disc counts within one tetrahedron.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscSetTet {
    counts: [usize; N_DISC_TYPES],
}

impl DiscSetTet {
    /// At most one non-triangular type may be present.
    pub fn new(counts: [usize; N_DISC_TYPES]) -> Result<Self> {
        if counts[4..].iter().filter(|&&c| c > 0).count() > 1 {
            return Err(KernelError::failed_precondition(
                "discs of more than one non-triangular type share a tetrahedron",
            ));
        }
        Ok(Self { counts })
    }

    fn from_surface(surface: &NormalSurface, tet: usize) -> Result<Self> {
        let mut counts = [0usize; N_DISC_TYPES];
        for (d, count) in counts.iter_mut().enumerate() {
            let value = surface.disc_count(tet, d);
            if value.is_infinite() {
                return Err(KernelError::failed_precondition("surface is not compact"));
            }
            *count = value
                .try_to_i64()
                .and_then(|v| usize::try_from(v).ok())
                .filter(|&v| v <= MAX_DISCS)
                .ok_or_else(|| KernelError::failed_precondition(format!("cannot list {} discs", value)))?;
        }
        Self::new(counts)
    }

    pub fn n_discs(&self, disc_type: usize) -> usize {
        self.counts[disc_type]
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    /// Position of a disc among its parallel copies counted from `vertex`.
    fn outward(&self, disc_type: usize, number: usize, vertex: usize) -> usize {
        if disc_side_contains(disc_type, vertex) {
            number
        } else {
            self.counts[disc_type] - 1 - number
        }
    }

    /// The number of the arc at `arc` belonging to the given disc, or `None`
    /// if the disc has no such arc.
    pub fn arc_from_disc(&self, arc: ArcSpec, disc_type: usize, number: usize) -> Option<usize> {
        if number >= self.counts[disc_type] || !has_arc(disc_type, arc.face, arc.corner) {
            return None;
        }
        if disc_type < 4 {
            return Some(number);
        }
        Some(self.counts[arc.corner] + self.outward(disc_type, number, arc.corner))
    }

    /// The disc `(type, number)` owning the given arc, if there is one.
    pub fn disc_from_arc(&self, arc: ArcSpec, arc_number: usize) -> Option<(usize, usize)> {
        if arc.face == arc.corner {
            return None;
        }
        let triangles = self.counts[arc.corner];
        if arc_number < triangles {
            return Some((arc.corner, arc_number));
        }
        let rest = arc_number - triangles;
        (4..N_DISC_TYPES)
            .find(|&d| self.counts[d] > 0 && has_arc(d, arc.face, arc.corner))
            .filter(|&d| rest < self.counts[d])
            .map(|d| (d, self.outward(d, rest, arc.corner)))
    }
}

/// Every disc of a compact surface, tetrahedron by tetrahedron.
#[derive(Debug, Clone)]
pub struct DiscSetSurface {
    triangulation: Arc<Triangulation>,
    tets: Vec<DiscSetTet>,
    offsets: Vec<[usize; N_DISC_TYPES]>,
    total: usize,
}

/// Properties of a surface read off its discs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct DiscProperties {
    pub orientable: bool,
    pub two_sided: bool,
    pub components: usize,
}

impl DiscSetSurface {
    pub fn new(surface: &NormalSurface) -> Result<Self> {
        let triangulation = Arc::clone(surface.triangulation());
        let tets = (0..triangulation.size())
            .map(|t| DiscSetTet::from_surface(surface, t))
            .collect::<Result<Vec<_>>>()?;
        let mut offsets = Vec::with_capacity(tets.len());
        let mut total = 0usize;
        for tet in &tets {
            let mut row = [0; N_DISC_TYPES];
            for (d, slot) in row.iter_mut().enumerate() {
                *slot = total;
                total += tet.n_discs(d);
            }
            offsets.push(row);
        }
        if total > MAX_DISCS {
            return Err(KernelError::failed_precondition(format!("cannot list {} discs", total)));
        }
        Ok(Self {
            triangulation,
            tets,
            offsets,
            total,
        })
    }

    pub fn n_tets(&self) -> usize {
        self.tets.len()
    }

    pub fn tet_discs(&self, tet: usize) -> &DiscSetTet {
        &self.tets[tet]
    }

    pub fn n_discs(&self) -> usize {
        self.total
    }

    pub fn iter(&self) -> impl Iterator<Item = DiscSpec> + '_ {
        self.tets.iter().enumerate().flat_map(|(t, tet)| {
            (0..N_DISC_TYPES).flat_map(move |d| (0..tet.n_discs(d)).map(move |i| DiscSpec::new(t, d, i)))
        })
    }

    fn index(&self, disc: DiscSpec) -> usize {
        self.offsets[disc.tet][disc.disc_type] + disc.number
    }

    /// The disc across the given arc of `disc`, with the same arc as seen
    /// from that disc. `None` if the arc lies on boundary or is not an arc
    /// of `disc`.
    pub fn adjacent_disc(&self, disc: DiscSpec, arc: ArcSpec) -> Option<(DiscSpec, ArcSpec)> {
        let number = self.tets[disc.tet].arc_from_disc(arc, disc.disc_type, disc.number)?;
        let (u, g) = self.triangulation.adjacent(disc.tet, arc.face)?;
        let across = ArcSpec {
            face: g.apply(arc.face),
            corner: g.apply(arc.corner),
        };
        let (disc_type, n) = self.tets[u].disc_from_arc(across, number)?;
        Some((DiscSpec::new(u, disc_type, n), across))
    }

    /// Walks every disc once, tracking a transverse direction and a local
    /// orientation across each arc.
    pub(crate) fn properties(&self) -> DiscProperties {
        // (side, orientation) relative to the first disc of the component.
        let mut state: Vec<Option<(bool, bool)>> = vec![None; self.total];
        let mut props = DiscProperties {
            orientable: true,
            two_sided: true,
            components: 0,
        };
        for start in self.iter() {
            if state[self.index(start)].is_some() {
                continue;
            }
            props.components += 1;
            state[self.index(start)] = Some((false, false));
            let mut queue = VecDeque::from([start]);
            while let Some(disc) = queue.pop_front() {
                let (side, orient) = state[self.index(disc)].unwrap_or_default();
                for (face, corner) in disc_arcs(disc.disc_type) {
                    let arc = ArcSpec { face, corner };
                    let Some((next, across)) = self.adjacent_disc(disc, arc) else {
                        continue;
                    };
                    let Some(g) = self.triangulation.tetrahedron(disc.tet).adjacent_gluing(face) else {
                        continue;
                    };
                    let flip_side =
                        disc_side_contains(disc.disc_type, corner) != disc_side_contains(next.disc_type, across.corner);
                    // Tetrahedron orientations agree across odd gluings.
                    let flip_orient = flip_side ^ (g.sign() == 1);
                    let expected = (side ^ flip_side, orient ^ flip_orient);
                    match state[self.index(next)] {
                        None => {
                            state[self.index(next)] = Some(expected);
                            queue.push_back(next);
                        }
                        Some((s, o)) => {
                            props.two_sided &= s == expected.0;
                            props.orientable &= o == expected.1;
                        }
                    }
                }
            }
        }
        props
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arc_numbering() {
        // Two triangles at vertex 0 and three quads of type 1.
        let mut counts = [0; N_DISC_TYPES];
        counts[0] = 2;
        counts[5] = 3;
        let tet = DiscSetTet::new(counts).unwrap();
        // Quad type 1 pairs 0 with 2, so it has an arc at corner 0 of face 2.
        let arc = ArcSpec { face: 2, corner: 0 };
        assert_eq!(tet.arc_from_disc(arc, 0, 1), Some(1));
        assert_eq!(tet.arc_from_disc(arc, 5, 0), Some(2));
        assert_eq!(tet.arc_from_disc(arc, 5, 2), Some(4));
        // There are no triangles at vertex 1, and the quads are counted
        // from the far side.
        let far = ArcSpec { face: 3, corner: 1 };
        assert_eq!(tet.arc_from_disc(far, 5, 0), Some(2));
        assert_eq!(tet.disc_from_arc(far, 0), Some((5, 2)));
        assert_eq!(tet.disc_from_arc(far, 1), Some((5, 1)));
        assert_eq!(tet.disc_from_arc(far, 2), Some((5, 0)));
        assert_eq!(tet.disc_from_arc(far, 3), None);
        assert_eq!(tet.arc_from_disc(far, 0, 0), None);
        for n in 0..5 {
            let (d, i) = tet.disc_from_arc(arc, n).unwrap();
            assert_eq!(tet.arc_from_disc(arc, d, i), Some(n));
        }
    }

    #[test]
    fn test_rejects_mixed_types() {
        let mut counts = [0; N_DISC_TYPES];
        counts[4] = 1;
        counts[8] = 1;
        assert!(DiscSetTet::new(counts).is_err());
    }
}
