// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Tetrahedra, face gluings and the cached skeleton.
//!
//! Mutations go through `&mut self` and drop every cached derived value in
//! constant time. Recomputation is lazy, so a run of mutations costs one
//! skeleton rebuild at the next query however many gluings it changed.

use std::fmt;
use std::sync::OnceLock;

use tracing::trace;

use super::skeleton::Skeleton;
use crate::error::{KernelError, Result};
use crate::homology::AbelianGroup;
use crate::maths::Perm4;

/// A face of a tetrahedron, or a facet of a simplex in a facet pairing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FacetSpec {
    pub simp: usize,
    pub facet: usize,
}

impl FacetSpec {
    pub const fn new(simp: usize, facet: usize) -> Self {
        Self { simp, facet }
    }
}

impl fmt::Display for FacetSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.simp, self.facet)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tetrahedron {
    /// For each face, the adjacent tetrahedron and the gluing permutation
    /// taking vertices of this tetrahedron to vertices of that one.
    adj: [Option<(usize, Perm4)>; 4],
    description: String,
}

impl Tetrahedron {
    pub fn adjacent_tetrahedron(&self, face: usize) -> Option<usize> {
        self.adj[face].map(|(t, _)| t)
    }

    pub fn adjacent_gluing(&self, face: usize) -> Option<Perm4> {
        self.adj[face].map(|(_, p)| p)
    }

    /// The face of the adjacent tetrahedron glued to `face`.
    pub fn adjacent_face(&self, face: usize) -> Option<usize> {
        self.adj[face].map(|(_, p)| p.apply(face))
    }

    pub fn adjacent(&self, face: usize) -> Option<(usize, Perm4)> {
        self.adj[face]
    }

    pub fn is_boundary(&self, face: usize) -> bool {
        self.adj[face].is_none()
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Number of faces glued to something.
    pub fn degree(&self) -> usize {
        self.adj.iter().filter(|a| a.is_some()).count()
    }
}

const TET_LOCK: u8 = 1 << 4;

#[derive(Debug, Clone, Default)]
pub struct Triangulation {
    tets: Vec<Tetrahedron>,
    /// Bits 0..4 lock faces, bit 4 locks the tetrahedron itself.
    locks: Vec<u8>,
    skeleton: OnceLock<Skeleton>,
    h1: OnceLock<AbelianGroup>,
}

impl PartialEq for Triangulation {
    /// Identical gluings in identical labelling. For isomorphism use
    /// [`Triangulation::is_isomorphic_to`].
    fn eq(&self, other: &Self) -> bool {
        self.tets.len() == other.tets.len()
            && self.tets.iter().zip(&other.tets).all(|(a, b)| a.adj == b.adj)
    }
}

impl Eq for Triangulation {}

impl Triangulation {
    pub fn new() -> Self {
        Self::default()
    }

    /// `n` tetrahedra with no gluings.
    pub fn with_size(n: usize) -> Self {
        let mut tri = Self::new();
        tri.new_tetrahedra(n);
        tri
    }

    /// Builds a triangulation from a gluing list of
    /// `(tet, face, adjacent tet, gluing)` entries, each listed once.
    pub fn from_gluings(n: usize, gluings: &[(usize, usize, usize, [u8; 4])]) -> Result<Self> {
        let mut tri = Self::with_size(n);
        for &(t, f, u, image) in gluings {
            let perm = Perm4::try_new(image)
                .ok_or_else(|| KernelError::invalid_argument(format!("{:?} is not a permutation", image)))?;
            tri.join(t, f, u, perm)?;
        }
        Ok(tri)
    }

    pub fn size(&self) -> usize {
        self.tets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tets.is_empty()
    }

    pub fn tetrahedron(&self, index: usize) -> &Tetrahedron {
        &self.tets[index]
    }

    pub fn tetrahedra(&self) -> impl Iterator<Item = &Tetrahedron> {
        self.tets.iter()
    }

    /// The adjacent tetrahedron and gluing across `face` of `tet`.
    pub fn adjacent(&self, tet: usize, face: usize) -> Option<(usize, Perm4)> {
        self.tets[tet].adj[face]
    }

    pub fn skeleton(&self) -> &Skeleton {
        self.skeleton.get_or_init(|| {
            trace!(size = self.size(), "computing skeleton");
            Skeleton::compute(self)
        })
    }

    /// First homology, cached.
    pub fn homology_h1(&self) -> &AbelianGroup {
        self.h1.get_or_init(|| super::homology::compute_h1(self))
    }

    fn changed(&mut self) {
        self.skeleton.take();
        self.h1.take();
    }

    fn check_tet(&self, tet: usize) -> Result<()> {
        if tet >= self.tets.len() {
            return Err(KernelError::invalid_argument(format!(
                "tetrahedron {} out of range for a triangulation of size {}",
                tet,
                self.tets.len()
            )));
        }
        Ok(())
    }

    fn check_face(face: usize) -> Result<()> {
        if face >= 4 {
            return Err(KernelError::invalid_argument(format!("face {} out of range", face)));
        }
        Ok(())
    }

    fn check_unlocked_face(&self, tet: usize, face: usize) -> Result<()> {
        if self.locks[tet] & (1 << face) != 0 {
            return Err(KernelError::LockViolation(format!("face {} of tetrahedron {} is locked", face, tet)));
        }
        Ok(())
    }

    pub fn new_tetrahedron(&mut self) -> usize {
        self.tets.push(Tetrahedron::default());
        self.locks.push(0);
        self.changed();
        self.tets.len() - 1
    }

    pub fn new_tetrahedron_with_description(&mut self, description: &str) -> usize {
        let t = self.new_tetrahedron();
        self.tets[t].description = description.to_string();
        t
    }

    /// Appends `n` unglued tetrahedra, returning the index of the first.
    pub fn new_tetrahedra(&mut self, n: usize) -> usize {
        let first = self.tets.len();
        self.tets.resize_with(first + n, Tetrahedron::default);
        self.locks.resize(first + n, 0);
        self.changed();
        first
    }

    /// Glues `face` of `tet` to face `gluing(face)` of `adj`. The gluing maps
    /// vertices of `tet` to vertices of `adj`; the reverse gluing is recorded
    /// automatically.
    pub fn join(&mut self, tet: usize, face: usize, adj: usize, gluing: Perm4) -> Result<()> {
        self.check_tet(tet)?;
        self.check_tet(adj)?;
        Self::check_face(face)?;
        let adj_face = gluing.apply(face);
        if tet == adj && adj_face == face {
            return Err(KernelError::invalid_argument(format!(
                "cannot glue face {} of tetrahedron {} to itself",
                face, tet
            )));
        }
        if self.tets[tet].adj[face].is_some() {
            return Err(KernelError::invalid_argument(format!("face {} of tetrahedron {} is already glued", face, tet)));
        }
        if self.tets[adj].adj[adj_face].is_some() {
            return Err(KernelError::invalid_argument(format!(
                "face {} of tetrahedron {} is already glued",
                adj_face, adj
            )));
        }
        self.check_unlocked_face(tet, face)?;
        self.check_unlocked_face(adj, adj_face)?;
        self.tets[tet].adj[face] = Some((adj, gluing));
        self.tets[adj].adj[adj_face] = Some((tet, gluing.inverse()));
        self.changed();
        Ok(())
    }

    /// Unglues `face` of `tet`, returning what it was glued to.
    pub fn unjoin(&mut self, tet: usize, face: usize) -> Result<Option<(usize, Perm4)>> {
        self.check_tet(tet)?;
        Self::check_face(face)?;
        let Some((adj, gluing)) = self.tets[tet].adj[face] else {
            return Ok(None);
        };
        let adj_face = gluing.apply(face);
        self.check_unlocked_face(tet, face)?;
        self.check_unlocked_face(adj, adj_face)?;
        self.tets[tet].adj[face] = None;
        self.tets[adj].adj[adj_face] = None;
        self.changed();
        Ok(Some((adj, gluing)))
    }

    /// Unglues every face of `tet`.
    pub fn isolate(&mut self, tet: usize) -> Result<()> {
        for face in 0..4 {
            self.unjoin(tet, face)?;
        }
        Ok(())
    }

    /// Removes a tetrahedron, ungluing it first. Later tetrahedra shift down.
    pub fn remove_tetrahedron(&mut self, tet: usize) -> Result<()> {
        self.check_tet(tet)?;
        if self.locks[tet] & TET_LOCK != 0 {
            return Err(KernelError::LockViolation(format!("tetrahedron {} is locked", tet)));
        }
        self.isolate(tet)?;
        self.tets.remove(tet);
        self.locks.remove(tet);
        for t in &mut self.tets {
            for slot in t.adj.iter_mut().flatten() {
                if slot.0 > tet {
                    slot.0 -= 1;
                }
            }
        }
        self.changed();
        Ok(())
    }

    /// Copies every tetrahedron of `other` onto the end of this
    /// triangulation, returning the index of the first copy.
    pub fn insert_triangulation(&mut self, other: &Triangulation) -> usize {
        let offset = self.tets.len();
        for t in &other.tets {
            let mut copy = t.clone();
            for slot in copy.adj.iter_mut().flatten() {
                slot.0 += offset;
            }
            self.tets.push(copy);
            self.locks.push(0);
        }
        self.changed();
        offset
    }

    /// Locks a tetrahedron against removal.
    pub fn lock_tetrahedron(&mut self, tet: usize) -> Result<()> {
        self.check_tet(tet)?;
        self.locks[tet] |= TET_LOCK;
        Ok(())
    }

    pub fn unlock_tetrahedron(&mut self, tet: usize) -> Result<()> {
        self.check_tet(tet)?;
        self.locks[tet] &= !TET_LOCK;
        Ok(())
    }

    /// Locks a face, and the face glued to it, against gluing changes.
    pub fn lock_face(&mut self, tet: usize, face: usize) -> Result<()> {
        self.check_tet(tet)?;
        Self::check_face(face)?;
        self.locks[tet] |= 1 << face;
        if let Some((adj, gluing)) = self.tets[tet].adj[face] {
            self.locks[adj] |= 1 << gluing.apply(face);
        }
        Ok(())
    }

    pub fn unlock_face(&mut self, tet: usize, face: usize) -> Result<()> {
        self.check_tet(tet)?;
        Self::check_face(face)?;
        self.locks[tet] &= !(1 << face);
        if let Some((adj, gluing)) = self.tets[tet].adj[face] {
            self.locks[adj] &= !(1 << gluing.apply(face));
        }
        Ok(())
    }

    pub fn is_face_locked(&self, tet: usize, face: usize) -> bool {
        self.locks[tet] & (1 << face) != 0
    }

    pub fn is_tetrahedron_locked(&self, tet: usize) -> bool {
        self.locks[tet] & TET_LOCK != 0
    }

    pub fn unlock_all(&mut self) {
        self.locks.iter_mut().for_each(|l| *l = 0);
    }

    /// Number of face gluings, each counted once.
    pub fn count_gluings(&self) -> usize {
        self.tets.iter().map(Tetrahedron::degree).sum::<usize>() / 2
    }

    pub fn has_boundary_triangles(&self) -> bool {
        self.tets.iter().any(|t| t.adj.iter().any(Option::is_none))
    }

    /// Whether every tetrahedron can be oriented consistently, meaning every
    /// gluing between like-oriented tetrahedra is an odd permutation.
    pub fn is_orientable(&self) -> bool {
        self.skeleton().is_orientable()
    }

    pub fn is_connected(&self) -> bool {
        self.skeleton().count_components() <= 1
    }

    pub fn count_components(&self) -> usize {
        self.skeleton().count_components()
    }

    /// No boundary triangles and no ideal vertices.
    pub fn is_closed(&self) -> bool {
        !self.has_boundary_triangles() && !self.skeleton().is_ideal()
    }

    pub fn is_ideal(&self) -> bool {
        self.skeleton().is_ideal()
    }

    pub fn is_valid(&self) -> bool {
        self.skeleton().is_valid()
    }

    pub fn count_vertices(&self) -> usize {
        self.skeleton().vertices().len()
    }

    pub fn count_edges(&self) -> usize {
        self.skeleton().edges().len()
    }

    pub fn count_triangles(&self) -> usize {
        self.skeleton().triangles().len()
    }

    pub fn count_boundary_components(&self) -> usize {
        self.skeleton().count_boundary_components()
    }

    /// V - E + F - T over the cells of the triangulation itself.
    pub fn euler_char_tri(&self) -> i64 {
        self.count_vertices() as i64 - self.count_edges() as i64 + self.count_triangles() as i64
            - self.size() as i64
    }

    /// Euler characteristic of the compact manifold obtained by truncating
    /// ideal vertices.
    pub fn euler_char_manifold(&self) -> i64 {
        let sk = self.skeleton();
        let mut chi = self.euler_char_tri();
        for v in sk.vertices() {
            if v.is_ideal() {
                chi += v.link_euler_char() - 1;
            }
        }
        chi
    }

    /// Relabels vertices of `tet` by `perm`: old vertex `i` becomes `perm(i)`.
    pub fn relabel_vertices(&mut self, tet: usize, perm: Perm4) -> Result<()> {
        self.check_tet(tet)?;
        let old = self.tets[tet].adj;
        for face in 0..4 {
            if self.locks[tet] & (1 << face) != 0 && perm.apply(face) != face {
                return Err(KernelError::LockViolation(format!("face {} of tetrahedron {} is locked", face, tet)));
            }
        }
        let mut new = [None; 4];
        for (face, slot) in old.iter().enumerate() {
            if let Some((adj, gluing)) = *slot {
                if adj == tet {
                    new[perm.apply(face)] = Some((tet, perm * gluing * perm.inverse()));
                } else {
                    new[perm.apply(face)] = Some((adj, gluing * perm.inverse()));
                    let adj_face = gluing.apply(face);
                    self.tets[adj].adj[adj_face] = Some((tet, perm * gluing.inverse()));
                }
            }
        }
        self.tets[tet].adj = new;
        self.changed();
        Ok(())
    }

    /// The one-tetrahedron 3-sphere: faces 0 and 1 folded together across
    /// edge 23, then faces 2 and 3 folded together across edge 01.
    pub fn sphere() -> Self {
        let mut tri = Self::with_size(1);
        tri.tets[0].adj = [
            Some((0, Perm4::new([1, 0, 2, 3]))),
            Some((0, Perm4::new([1, 0, 2, 3]))),
            Some((0, Perm4::new([0, 1, 3, 2]))),
            Some((0, Perm4::new([0, 1, 3, 2]))),
        ];
        tri
    }
}

impl fmt::Display for Triangulation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Tet  |  glued to:   (012)     (013)     (023)     (123)")?;
        for (i, t) in self.tets.iter().enumerate() {
            write!(f, "{:4} |", i)?;
            for face in (0..4).rev() {
                match t.adj[face] {
                    None => write!(f, "  boundary")?,
                    Some((adj, gluing)) => {
                        let mut verts = String::new();
                        for v in 0..4 {
                            if v != face {
                                verts.push_str(&gluing.apply(v).to_string());
                            }
                        }
                        write!(f, " {:>4} ({})", adj, verts)?;
                    }
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_tets() -> Triangulation {
        Triangulation::with_size(2)
    }

    #[test]
    fn test_join_records_both_sides() {
        let mut tri = two_tets();
        let p = Perm4::new([1, 3, 0, 2]);
        tri.join(0, 0, 1, p).unwrap();
        assert_eq!(tri.adjacent(0, 0), Some((1, p)));
        assert_eq!(tri.adjacent(1, 1), Some((0, p.inverse())));
        assert_eq!(tri.count_gluings(), 1);
    }

    #[test]
    fn test_join_rejects_bad_input() {
        let mut tri = two_tets();
        assert!(matches!(
            tri.join(0, 0, 2, Perm4::identity()),
            Err(KernelError::InvalidArgument(_))
        ));
        assert!(tri.join(0, 1, 0, Perm4::identity()).is_err());
        tri.join(0, 0, 1, Perm4::identity()).unwrap();
        assert!(tri.join(0, 0, 1, Perm4::transposition(0, 1)).is_err());
    }

    #[test]
    fn test_locks() {
        let mut tri = two_tets();
        tri.join(0, 0, 1, Perm4::identity()).unwrap();
        tri.lock_face(0, 0).unwrap();
        assert!(tri.is_face_locked(1, 0));
        assert!(matches!(tri.unjoin(1, 0), Err(KernelError::LockViolation(_))));
        tri.lock_tetrahedron(1).unwrap();
        assert!(matches!(tri.remove_tetrahedron(1), Err(KernelError::LockViolation(_))));
        tri.unlock_all();
        assert_eq!(tri.unjoin(1, 0).unwrap(), Some((0, Perm4::identity())));
        tri.remove_tetrahedron(0).unwrap();
        assert_eq!(tri.size(), 1);
    }

    #[test]
    fn test_remove_shifts_indices() {
        let mut tri = Triangulation::with_size(3);
        tri.join(2, 1, 1, Perm4::identity()).unwrap();
        tri.remove_tetrahedron(0).unwrap();
        assert_eq!(tri.adjacent(1, 1), Some((0, Perm4::identity())));
    }

    #[test]
    fn test_sphere() {
        let tri = Triangulation::sphere();
        assert_eq!(tri.count_gluings(), 2);
        assert!(tri.is_closed());
        assert!(tri.is_valid());
        assert!(tri.is_orientable());
        assert!(tri.homology_h1().is_trivial());
        assert_eq!(tri.euler_char_manifold(), 0);
    }

    #[test]
    fn test_relabel_preserves_homology() {
        let mut tri = crate::triangulation::construct::figure_eight();
        let before = tri.homology_h1().clone();
        tri.relabel_vertices(0, Perm4::new([2, 0, 3, 1])).unwrap();
        tri.relabel_vertices(1, Perm4::new([3, 2, 1, 0])).unwrap();
        assert_eq!(*tri.homology_h1(), before);
        assert!(tri.is_orientable());
        assert_eq!(tri.count_gluings(), 4);
    }

    #[test]
    fn test_insert_triangulation() {
        let mut tri = Triangulation::sphere();
        let offset = tri.insert_triangulation(&Triangulation::sphere());
        assert_eq!(offset, 1);
        assert_eq!(tri.count_components(), 2);
        assert_eq!(tri.adjacent(1, 2).map(|(t, _)| t), Some(1));
    }
}
