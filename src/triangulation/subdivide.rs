// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Splitting one tetrahedron into eight.
//!
//! Given a pairing `[p0, p1, q0, q1]` of the vertices of a tetrahedron, two
//! new vertices are added: `c` beside the middle of edge `p0 p1` and `d`
//! beside the middle of edge `q0 q1`. Each face of the old tetrahedron is
//! coned to `c` if it contains `p0 p1`, and to `d` otherwise. What remains
//! is an octahedron with antipodal pairs `(p0, p1)`, `(q0, q1)`, `(c, d)`,
//! which is cut into four around the axis `c d`.

use super::triangulation::Triangulation;
use crate::error::{KernelError, Result};
use crate::maths::Perm4;

/// Label of the new vertex beside edge `p0 p1`. Old vertices are 0-3.
pub(crate) const NEW_BESIDE_P: usize = 4;
/// Label of the new vertex beside edge `q0 q1`.
pub(crate) const NEW_BESIDE_Q: usize = 5;

/// Vertex labels of the eight pieces. Piece `y < 4` is the cone on the old
/// face opposite `y`, listing that face's vertices in order and then its
/// apex. Pieces 4-7 surround the axis.
pub(crate) fn split_labels(pairing: [usize; 4]) -> [[usize; 4]; 8] {
    let [p0, p1, q0, q1] = pairing;
    let mut labels = [[0; 4]; 8];
    for (y, piece) in labels.iter_mut().enumerate().take(4) {
        let apex = if y == q0 || y == q1 { NEW_BESIDE_P } else { NEW_BESIDE_Q };
        let mut face = (0..4).filter(|&v| v != y);
        for slot in piece.iter_mut().take(3) {
            *slot = face.next().unwrap_or_default();
        }
        piece[3] = apex;
    }
    for (i, [x, y]) in [[p0, q0], [q0, p1], [p1, q1], [q1, p0]].into_iter().enumerate() {
        labels[4 + i] = [NEW_BESIDE_P, NEW_BESIDE_Q, x, y];
    }
    labels
}

/// The gluing of face `i` of a piece labelled `a` onto the piece labelled
/// `b` whose face carries the same labels.
fn label_gluing(a: &[usize; 4], i: usize, b: &[usize; 4]) -> Option<Perm4> {
    let mut image = [0u8; 4];
    let mut used = [false; 4];
    for (l, &label) in a.iter().enumerate() {
        if l == i {
            continue;
        }
        let j = b.iter().position(|&x| x == label)?;
        image[l] = j as u8;
        used[j] = true;
    }
    let opposite = used.iter().position(|&u| !u)?;
    image[i] = opposite as u8;
    Perm4::try_new(image)
}

impl Triangulation {
    /// Replaces `tet` by eight tetrahedra around two new vertices, one
    /// beside the middle of each edge `p0 p1` and `q0 q1` of the pairing.
    ///
    /// The first piece takes the index `tet`; the other seven are appended.
    /// Returns the indices of the pieces in the order of their labels.
    pub fn split_tetrahedron(&mut self, tet: usize, pairing: [usize; 4]) -> Result<[usize; 8]> {
        if tet >= self.size() {
            return Err(KernelError::invalid_argument(format!("no tetrahedron {}", tet)));
        }
        let mut sorted = pairing;
        sorted.sort_unstable();
        if sorted != [0, 1, 2, 3] {
            return Err(KernelError::invalid_argument(format!("{:?} does not pair the vertices", pairing)));
        }
        if self.is_tetrahedron_locked(tet) || (0..4).any(|f| self.is_face_locked(tet, f)) {
            return Err(KernelError::LockViolation(format!("tetrahedron {} is locked", tet)));
        }
        let labels = split_labels(pairing);
        let old: Vec<Option<(usize, Perm4)>> = (0..4).map(|f| self.adjacent(tet, f)).collect();
        self.isolate(tet)?;
        let first = self.new_tetrahedra(7);
        let mut pieces = [tet; 8];
        for (i, piece) in pieces.iter_mut().enumerate().skip(1) {
            *piece = first + i - 1;
        }

        // Pieces among themselves.
        for a in 0..8 {
            for i in 0..4 {
                if self.adjacent(pieces[a], i).is_some() {
                    continue;
                }
                let face: Vec<usize> = (0..4).filter(|&l| l != i).map(|l| labels[a][l]).collect();
                if face.iter().all(|&l| l < 4) {
                    continue;
                }
                let partner = (0..8)
                    .filter(|&b| b != a)
                    .find(|&b| face.iter().all(|l| labels[b].contains(l)));
                let Some(b) = partner else {
                    continue;
                };
                let gluing = label_gluing(&labels[a], i, &labels[b])
                    .ok_or_else(|| KernelError::invalid_argument("pieces do not share a face"))?;
                self.join(pieces[a], i, pieces[b], gluing)?;
            }
        }

        // Old faces: piece y carries face y, with its apex at vertex 3.
        let to_old = |y: usize| {
            let mut image = [0u8; 4];
            for (l, slot) in image.iter_mut().enumerate().take(3) {
                *slot = labels[y][l] as u8;
            }
            image[3] = y as u8;
            Perm4::new(image)
        };
        for (y, slot) in old.iter().enumerate() {
            let Some((u, g)) = *slot else {
                continue;
            };
            let sigma = to_old(y);
            if u == tet {
                let y2 = g.apply(y);
                if y2 < y {
                    continue;
                }
                self.join(pieces[y], 3, pieces[y2], to_old(y2).inverse() * g * sigma)?;
            } else {
                self.join(pieces[y], 3, u, g * sigma)?;
            }
        }
        Ok(pieces)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::triangulation::construct;

    #[test]
    fn test_every_inner_face_pairs_once() {
        let labels = split_labels([0, 1, 2, 3]);
        for (a, piece) in labels.iter().enumerate() {
            for i in 0..4 {
                let face: Vec<usize> = (0..4).filter(|&l| l != i).map(|l| piece[l]).collect();
                let matches = labels
                    .iter()
                    .enumerate()
                    .filter(|&(b, other)| b != a && face.iter().all(|l| other.contains(l)))
                    .count();
                let outer = face.iter().all(|&l| l < 4);
                assert_eq!(matches, usize::from(!outer), "piece {} face {}", a, i);
            }
        }
    }

    #[test]
    fn test_split_preserves_lens_space() {
        let mut tri = construct::layered_lens_space(5, 2).unwrap();
        let before = tri.homology_h1().clone();
        let pieces = tri.split_tetrahedron(0, [0, 2, 1, 3]).unwrap();
        assert_eq!(pieces[0], 0);
        assert_eq!(tri.size(), 8);
        assert!(tri.is_valid());
        assert!(tri.is_closed());
        assert!(tri.is_orientable());
        assert_eq!(tri.count_vertices(), 3);
        assert_eq!(tri.homology_h1(), &before);
    }

    #[test]
    fn test_split_handles_self_gluings() {
        let mut tri = Triangulation::sphere();
        tri.split_tetrahedron(0, [0, 1, 2, 3]).unwrap();
        assert_eq!(tri.size(), 8);
        assert!(tri.is_closed());
        assert!(tri.homology_h1().is_trivial());
    }

    #[test]
    fn test_split_rejects_bad_pairings() {
        let mut tri = construct::figure_eight();
        assert!(tri.split_tetrahedron(0, [0, 0, 1, 2]).is_err());
        assert!(tri.split_tetrahedron(2, [0, 1, 2, 3]).is_err());
        tri.lock_face(1, 0).unwrap();
        assert!(matches!(
            tri.split_tetrahedron(0, [0, 1, 2, 3]),
            Err(KernelError::LockViolation(_))
        ));
    }
}
