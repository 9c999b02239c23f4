// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Combinatorial isomorphisms between triangulations.
//!
//! An isomorphism sends tetrahedron `t` to `tet_image(t)`, relabelling its
//! vertices by `face_perm(t)`. Applied to a gluing of face `f` of `t` to `u`
//! by `g`, the image glues face `face_perm(t)(f)` of `tet_image(t)` to
//! `tet_image(u)` by `face_perm(u) * g * face_perm(t)^-1`.

use std::collections::VecDeque;

use super::triangulation::Triangulation;
use crate::error::{KernelError, Result};
use crate::maths::Perm4;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Isomorphism {
    tet_image: Vec<usize>,
    face_perm: Vec<Perm4>,
}

impl Isomorphism {
    pub fn identity(n: usize) -> Self {
        Self {
            tet_image: (0..n).collect(),
            face_perm: vec![Perm4::identity(); n],
        }
    }

    pub fn new(tet_image: Vec<usize>, face_perm: Vec<Perm4>) -> Result<Self> {
        let n = tet_image.len();
        if face_perm.len() != n {
            return Err(KernelError::invalid_argument(format!(
                "{} tetrahedron images but {} permutations",
                n,
                face_perm.len()
            )));
        }
        let mut seen = vec![false; n];
        for &t in &tet_image {
            if t >= n || seen[t] {
                return Err(KernelError::invalid_argument("tetrahedron images are not a permutation"));
            }
            seen[t] = true;
        }
        Ok(Self { tet_image, face_perm })
    }

    pub fn size(&self) -> usize {
        self.tet_image.len()
    }

    pub fn tet_image(&self, tet: usize) -> usize {
        self.tet_image[tet]
    }

    pub fn face_perm(&self, tet: usize) -> Perm4 {
        self.face_perm[tet]
    }

    pub fn is_identity(&self) -> bool {
        self.tet_image.iter().enumerate().all(|(i, &t)| i == t) && self.face_perm.iter().all(Perm4::is_identity)
    }

    pub fn inverse(&self) -> Self {
        let n = self.size();
        let mut tet_image = vec![0; n];
        let mut face_perm = vec![Perm4::identity(); n];
        for t in 0..n {
            tet_image[self.tet_image[t]] = t;
            face_perm[self.tet_image[t]] = self.face_perm[t].inverse();
        }
        Self { tet_image, face_perm }
    }

    /// `self` after `first`.
    pub fn compose(&self, first: &Isomorphism) -> Self {
        let tet_image = first.tet_image.iter().map(|&t| self.tet_image[t]).collect();
        let face_perm = (0..first.size())
            .map(|t| self.face_perm[first.tet_image[t]] * first.face_perm[t])
            .collect();
        Self { tet_image, face_perm }
    }

    /// The image of `tri`, which must have the same size.
    pub fn apply(&self, tri: &Triangulation) -> Result<Triangulation> {
        if tri.size() != self.size() {
            return Err(KernelError::invalid_argument(format!(
                "isomorphism on {} tetrahedra applied to a triangulation of size {}",
                self.size(),
                tri.size()
            )));
        }
        let mut out = Triangulation::with_size(tri.size());
        for t in 0..tri.size() {
            for f in 0..4 {
                let Some((u, g)) = tri.adjacent(t, f) else {
                    continue;
                };
                if (u, g.apply(f)) < (t, f) {
                    continue;
                }
                let gluing = self.face_perm[u] * g * self.face_perm[t].inverse();
                out.join(self.tet_image[t], self.face_perm[t].apply(f), self.tet_image[u], gluing)?;
            }
        }
        Ok(out)
    }
}

impl Triangulation {
    /// The relabelled triangulation `iso(self)`.
    pub fn apply_isomorphism(&self, iso: &Isomorphism) -> Result<Triangulation> {
        iso.apply(self)
    }

    /// Every isomorphism from `self` onto `other`. Both must be connected.
    pub fn find_all_isomorphisms(&self, other: &Triangulation) -> Result<Vec<Isomorphism>> {
        if !self.is_connected() || !other.is_connected() {
            return Err(KernelError::failed_precondition(
                "isomorphism search needs connected triangulations",
            ));
        }
        if self.size() != other.size() {
            return Ok(Vec::new());
        }
        if self.is_empty() {
            return Ok(vec![Isomorphism::identity(0)]);
        }
        let mut found = Vec::new();
        for target in 0..other.size() {
            for perm in Perm4::all() {
                if let Some(iso) = extend_from(self, other, target, perm) {
                    found.push(iso);
                }
            }
        }
        Ok(found)
    }

    /// Automorphisms of a connected triangulation, the identity included.
    pub fn automorphisms(&self) -> Result<Vec<Isomorphism>> {
        self.find_all_isomorphisms(self)
    }
}

/// Extends `0 -> target` with vertex relabelling `perm` along gluings.
fn extend_from(src: &Triangulation, dest: &Triangulation, target: usize, perm: Perm4) -> Option<Isomorphism> {
    let n = src.size();
    let mut image = vec![usize::MAX; n];
    let mut used = vec![false; n];
    let mut perms = vec![Perm4::identity(); n];
    image[0] = target;
    used[target] = true;
    perms[0] = perm;
    let mut queue = VecDeque::from([0]);
    while let Some(t) = queue.pop_front() {
        for f in 0..4 {
            let face = perms[t].apply(f);
            match (src.adjacent(t, f), dest.adjacent(image[t], face)) {
                (None, None) => {}
                (Some((u, g)), Some((du, dg))) => {
                    let want = dg * perms[t] * g.inverse();
                    if image[u] == usize::MAX {
                        if used[du] {
                            return None;
                        }
                        image[u] = du;
                        used[du] = true;
                        perms[u] = want;
                        queue.push_back(u);
                    } else if image[u] != du || perms[u] != want {
                        return None;
                    }
                }
                _ => return None,
            }
        }
    }
    Some(Isomorphism {
        tet_image: image,
        face_perm: perms,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::triangulation::construct;

    #[test]
    fn test_apply_and_inverse() {
        let tri = construct::figure_eight();
        let iso = Isomorphism::new(vec![1, 0], vec![Perm4::new([2, 0, 3, 1]), Perm4::new([1, 0, 3, 2])]).unwrap();
        let image = iso.apply(&tri).unwrap();
        assert_eq!(iso.inverse().apply(&image).unwrap(), tri);
        assert!(iso.inverse().compose(&iso).is_identity());
        assert!(image.homology_h1().is_z());
    }

    #[test]
    fn test_find_isomorphisms() {
        let tri = construct::figure_eight();
        let iso = Isomorphism::new(vec![1, 0], vec![Perm4::new([3, 1, 0, 2]), Perm4::identity()]).unwrap();
        let image = iso.apply(&tri).unwrap();
        let found = tri.find_all_isomorphisms(&image).unwrap();
        assert!(found.contains(&iso));
        for f in &found {
            assert_eq!(f.apply(&tri).unwrap(), image);
        }
        let auts = tri.automorphisms().unwrap();
        assert_eq!(auts.len(), found.len());
        assert!(auts.iter().any(Isomorphism::is_identity));
    }

    #[test]
    fn test_rejects_bad_isomorphism() {
        assert!(Isomorphism::new(vec![0, 0], vec![Perm4::identity(); 2]).is_err());
        assert!(Isomorphism::new(vec![0], vec![]).is_err());
    }
}
