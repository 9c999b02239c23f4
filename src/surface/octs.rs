// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Replacing an almost normal surface by an isotopic normal one.
//!
//! The octagonal tetrahedron is split into eight (see
//! [`Triangulation::split_tetrahedron`]) using the octagon's own vertex
//! pairing. Each octagon then becomes two triangles in each corner piece
//! that holds a doubly crossed edge, and one quadrilateral in each piece
//! around the new axis. Triangles of the old tetrahedron carry over to
//! every piece that contains their vertex.

use std::sync::Arc;

use super::coords::{NormalCoords, NormalEncoding};
use super::normal_surface::NormalSurface;
use super::tables::{QUAD_DEFN, VERTEX_SPLIT};
use crate::error::{KernelError, Result};
use crate::maths::Integer;
use crate::triangulation::subdivide::{split_labels, NEW_BESIDE_P, NEW_BESIDE_Q};
use crate::triangulation::Triangulation;

impl NormalSurface {
    /// An isotopic normal surface in a subdivided triangulation, together
    /// with that triangulation. Surfaces without octagons come back
    /// unchanged in standard coordinates.
    pub fn remove_octs(&self) -> Result<(NormalSurface, Arc<Triangulation>)> {
        let Some((tet, oct_type)) = self.oct_position() else {
            let vector = self.to_vector(NormalCoords::Standard)?;
            let surface = NormalSurface::from_parts(
                Arc::clone(self.triangulation()),
                NormalEncoding::new(NormalCoords::Standard),
                vector,
            );
            return Ok((surface, Arc::clone(self.triangulation())));
        };
        if !self.is_compact() {
            return Err(KernelError::failed_precondition("surface is not compact"));
        }
        let n = self.triangulation().size();
        let stray = (0..n)
            .flat_map(|t| (0..3).map(move |k| (t, k)))
            .any(|(t, k)| (t, k) != (tet, oct_type) && !self.octs(t, k).is_zero());
        if stray || (0..3).any(|q| !self.quads(tet, q).is_zero()) {
            return Err(KernelError::failed_precondition(
                "octagons must be of a single type with no quadrilaterals beside them",
            ));
        }

        let pairing = QUAD_DEFN[oct_type];
        let mut triangulation = Arc::clone(self.triangulation());
        let pieces = Arc::make_mut(&mut triangulation).split_tetrahedron(tet, pairing)?;

        let encoding = NormalEncoding::new(NormalCoords::Standard);
        let block = encoding.block();
        let mut vector = vec![Integer::ZERO; triangulation.size() * block];
        for t in (0..n).filter(|&t| t != tet) {
            for i in 0..block {
                vector[t * block + i] = self.disc_count(t, i).clone();
            }
        }

        let count = self.octs(tet, oct_type).clone();
        let [p0, p1, q0, q1] = pairing;
        for (labels, &piece) in split_labels(pairing).iter().zip(&pieces) {
            let base = piece * block;
            let position = |label: usize| labels.iter().position(|&l| l == label);
            for (i, &label) in labels.iter().enumerate() {
                if label < 4 {
                    vector[base + i] = self.triangles(tet, label).clone();
                }
            }
            for pair in [[p0, p1], [q0, q1]] {
                if let (Some(a), Some(b)) = (position(pair[0]), position(pair[1])) {
                    vector[base + a] += &count;
                    vector[base + b] += &count;
                }
            }
            // Around the axis the quad keeps the new vertex beside q0 q1
            // with the old p vertex.
            if let (Some(_), Some(d)) = (position(NEW_BESIDE_P), position(NEW_BESIDE_Q)) {
                if let Some(x) = position(p0).or_else(|| position(p1)) {
                    vector[base + 4 + VERTEX_SPLIT[d][x]] += &count;
                }
            }
        }
        let mut surface = NormalSurface::from_parts(Arc::clone(&triangulation), encoding, vector);
        surface.set_name(self.name());
        Ok((surface, triangulation))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maths::dot;
    use crate::maths::vector::from_i64s;
    use crate::surface::matching::matching_equations;

    fn is_normal(surface: &NormalSurface) -> bool {
        let m = matching_equations(surface.triangulation(), NormalCoords::Standard).unwrap();
        (0..m.rows()).all(|r| dot(m.row(r), surface.vector()).is_zero())
    }

    #[test]
    fn test_lone_octagon_becomes_normal() {
        let tri = Arc::new(Triangulation::with_size(1));
        let almost = NormalSurface::new(
            Arc::clone(&tri),
            NormalCoords::AlmostNormal,
            from_i64s(&[1, 0, 0, 0, 0, 0, 0, 0, 1, 0]),
        )
        .unwrap();
        let (normal, new_tri) = almost.remove_octs().unwrap();
        assert_eq!(new_tri.size(), 8);
        assert!(!normal.encoding().stores_octagons());
        assert!(is_normal(&normal));
        assert_eq!(normal.euler_char(), almost.euler_char());
        assert_eq!(normal.is_connected(), Ok(false));
        assert!(normal.has_real_boundary());
        // The original triangulation is untouched.
        assert_eq!(tri.size(), 1);
    }

    #[test]
    fn test_octagon_beside_triangles() {
        // Tetrahedron 0 holds an octagon of type 0, whose arcs on face 3 cut
        // off corners 0 and 1; tetrahedron 1 holds triangles at 0 and 1.
        let tri = Arc::new(Triangulation::from_gluings(2, &[(0, 3, 1, [0, 1, 2, 3])]).unwrap());
        let almost = NormalSurface::new(
            tri,
            NormalCoords::AlmostNormal,
            from_i64s(&[0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 1, 1, 0, 0, 0, 0, 0, 0, 0, 0]),
        )
        .unwrap();
        assert_eq!(almost.euler_char(), Integer::ONE);
        let (normal, new_tri) = almost.remove_octs().unwrap();
        assert_eq!(new_tri.size(), 9);
        assert!(is_normal(&normal));
        assert_eq!(normal.euler_char(), Integer::ONE);
        assert_eq!(normal.is_connected(), Ok(true));
        assert_eq!(normal.is_orientable(), Ok(true));
    }

    #[test]
    fn test_octagonal_sphere_in_closed_triangulation() {
        // A single octagon is a sphere in the one-tetrahedron 3-sphere.
        let tri = Arc::new(Triangulation::sphere());
        let almost = NormalSurface::new(
            Arc::clone(&tri),
            NormalCoords::AlmostNormal,
            from_i64s(&[0, 0, 0, 0, 0, 0, 0, 1, 0, 0]),
        )
        .unwrap();
        assert_eq!(almost.euler_char(), Integer::new(2));

        let (normal, new_tri) = almost.remove_octs().unwrap();
        assert_eq!(new_tri.size(), tri.size() + 7);
        assert!(new_tri.is_valid());
        assert!(new_tri.is_closed());
        assert!(new_tri.is_orientable());
        assert_eq!(new_tri.homology_h1(), tri.homology_h1());
        assert_eq!(new_tri.count_vertices(), tri.count_vertices() + 2);

        assert!(normal.oct_position().is_none());
        assert!(is_normal(&normal));
        assert!(normal.is_compact());
        assert_eq!(normal.euler_char(), Integer::new(2));
        assert_eq!(normal.is_connected(), Ok(true));
        assert_eq!(normal.is_orientable(), Ok(true));
    }

    #[test]
    fn test_without_octagons_is_unchanged() {
        let tri = Arc::new(Triangulation::with_size(1));
        let quad = NormalSurface::new(Arc::clone(&tri), NormalCoords::Standard, from_i64s(&[0, 0, 0, 0, 1, 0, 0])).unwrap();
        let (same, same_tri) = quad.remove_octs().unwrap();
        assert!(Arc::ptr_eq(&same_tri, &tri));
        assert_eq!(same, quad);
    }
}
