// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! A single normal or almost normal surface.
//!
//! A surface is a vector of disc counts over a shared triangulation. It is
//! always stored with triangle coordinates: vectors given in reduced
//! systems are lifted on construction. Mutating the triangulation a surface
//! was built from never affects the surface, since each surface holds its
//! own reference-counted snapshot and `Arc::make_mut` copies on write.

use std::fmt;
use std::ops::{Add, Mul};
use std::sync::{Arc, OnceLock};

use super::coords::{NormalCoords, NormalEncoding};
use super::discs::{DiscProperties, DiscSetSurface};
use super::matching::lift_reduced;
use super::tables::{edge_crossings, has_arc, N_DISC_TYPES, VERTEX_SPLIT};
use crate::error::{KernelError, Result};
use crate::maths::{scale_down, Integer};
use crate::triangulation::{Triangulation, EDGE_NUMBER, EDGE_VERTICES};

static ZERO: Integer = Integer::ZERO;

#[derive(Debug, Clone)]
pub struct NormalSurface {
    triangulation: Arc<Triangulation>,
    encoding: NormalEncoding,
    vector: Vec<Integer>,
    name: String,
    euler: OnceLock<Integer>,
    discs: OnceLock<Result<DiscProperties>>,
}

impl NormalSurface {
    /// A surface from a vector in the given coordinate system.
    ///
    /// Reduced vectors (quads, or quads and octagons) are lifted to the
    /// smallest compatible triangle coordinates; around a vertex whose link
    /// cannot be made consistent the triangle coordinates are infinite.
    pub fn new(triangulation: Arc<Triangulation>, coords: NormalCoords, vector: Vec<Integer>) -> Result<Self> {
        if !coords.is_enumerable() {
            return Err(KernelError::invalid_argument(format!(
                "{} coordinates cannot describe a surface",
                coords
            )));
        }
        let encoding = NormalEncoding::new(coords);
        let expected = triangulation.size() * encoding.block();
        if vector.len() != expected {
            return Err(KernelError::invalid_argument(format!(
                "{} coordinates need {} entries, not {}",
                coords,
                expected,
                vector.len()
            )));
        }
        if vector.iter().any(|x| x.is_negative() || x.is_infinite()) {
            return Err(KernelError::invalid_argument("coordinates must be finite and non-negative"));
        }
        if encoding.stores_triangles() {
            return Ok(Self::from_parts(triangulation, encoding, vector));
        }
        let lifted = lift_reduced(&triangulation, encoding, &vector);
        Ok(Self::from_parts(triangulation, encoding.with_triangles(), lifted))
    }

    /// The vector must already be laid out for an encoding storing triangles.
    pub(crate) fn from_parts(triangulation: Arc<Triangulation>, encoding: NormalEncoding, vector: Vec<Integer>) -> Self {
        debug_assert!(encoding.stores_triangles());
        debug_assert_eq!(vector.len(), triangulation.size() * encoding.block());
        Self {
            triangulation,
            encoding,
            vector,
            name: String::new(),
            euler: OnceLock::new(),
            discs: OnceLock::new(),
        }
    }

    /// The link of a vertex class: one triangle at every corner of it.
    pub fn vertex_link(triangulation: Arc<Triangulation>, vertex: usize) -> Result<Self> {
        let sk = triangulation.skeleton();
        let Some(v) = sk.vertices().get(vertex) else {
            return Err(KernelError::invalid_argument(format!("no vertex {}", vertex)));
        };
        let encoding = NormalEncoding::new(NormalCoords::Standard);
        let mut vector = vec![Integer::ZERO; triangulation.size() * encoding.block()];
        for &(t, corner) in v.embeddings() {
            vector[t * encoding.block() + corner] = Integer::ONE;
        }
        let mut surface = Self::from_parts(Arc::clone(&triangulation), encoding, vector);
        surface.name = format!("Link of vertex {}", vertex);
        Ok(surface)
    }

    pub fn triangulation(&self) -> &Arc<Triangulation> {
        &self.triangulation
    }

    pub fn encoding(&self) -> NormalEncoding {
        self.encoding
    }

    pub fn vector(&self) -> &[Integer] {
        &self.vector
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    fn base(&self, tet: usize) -> usize {
        tet * self.encoding.block()
    }

    pub fn triangles(&self, tet: usize, vertex: usize) -> &Integer {
        &self.vector[self.base(tet) + vertex]
    }

    pub fn quads(&self, tet: usize, quad_type: usize) -> &Integer {
        &self.vector[self.base(tet) + self.encoding.quad_offset() + quad_type]
    }

    /// Zero when the encoding stores no octagons.
    pub fn octs(&self, tet: usize, oct_type: usize) -> &Integer {
        if self.encoding.stores_octagons() {
            &self.vector[self.base(tet) + self.encoding.oct_offset() + oct_type]
        } else {
            &ZERO
        }
    }

    /// The number of discs of type 0-9 in a tetrahedron.
    pub fn disc_count(&self, tet: usize, disc_type: usize) -> &Integer {
        match disc_type {
            0..=3 => self.triangles(tet, disc_type),
            4..=6 => self.quads(tet, disc_type - 4),
            _ => self.octs(tet, disc_type - 7),
        }
    }

    fn tet_edge_weight(&self, tet: usize, a: usize, b: usize) -> Integer {
        (0..N_DISC_TYPES)
            .filter(|&d| edge_crossings(d, a, b) > 0)
            .map(|d| self.disc_count(tet, d) * edge_crossings(d, a, b) as i64)
            .sum()
    }

    fn tet_arcs(&self, tet: usize, face: usize, corner: usize) -> Integer {
        (0..N_DISC_TYPES)
            .filter(|&d| has_arc(d, face, corner))
            .map(|d| self.disc_count(tet, d).clone())
            .sum()
    }

    /// How many times the surface crosses an edge class.
    pub fn edge_weight(&self, edge: usize) -> Integer {
        let emb = self.triangulation.skeleton().edges()[edge].embeddings()[0];
        let [a, b] = EDGE_VERTICES[emb.edge];
        self.tet_edge_weight(emb.tet, a, b)
    }

    /// Arcs in a triangle class cutting off one corner. Corners 0-2 are the
    /// triangle's vertices in increasing order in its first embedding.
    pub fn arcs(&self, triangle: usize, corner: usize) -> Integer {
        let f = self.triangulation.skeleton().triangles()[triangle].embeddings()[0];
        match (0..4).filter(|&v| v != f.facet).nth(corner) {
            Some(vertex) => self.tet_arcs(f.simp, f.facet, vertex),
            None => Integer::ZERO,
        }
    }

    pub fn edge_weights(&self) -> Vec<Integer> {
        (0..self.triangulation.count_edges()).map(|e| self.edge_weight(e)).collect()
    }

    /// Three arc counts per triangle class.
    pub fn arc_counts(&self) -> Vec<Integer> {
        (0..self.triangulation.count_triangles())
            .flat_map(|t| (0..3).map(move |c| (t, c)))
            .map(|(t, c)| self.arcs(t, c))
            .collect()
    }

    /// V - E + F over the cell structure cut out by the discs. Infinite for
    /// non-compact surfaces.
    pub fn euler_char(&self) -> Integer {
        self.euler
            .get_or_init(|| {
                let sk = self.triangulation.skeleton();
                let mut chi = Integer::ZERO;
                for edge in sk.edges() {
                    let emb = edge.embeddings()[0];
                    let [a, b] = EDGE_VERTICES[emb.edge];
                    chi += self.tet_edge_weight(emb.tet, a, b);
                }
                for triangle in sk.triangles() {
                    let f = triangle.embeddings()[0];
                    for corner in (0..4).filter(|&v| v != f.facet) {
                        chi -= self.tet_arcs(f.simp, f.facet, corner);
                    }
                }
                for t in 0..self.triangulation.size() {
                    for d in 0..N_DISC_TYPES {
                        chi += self.disc_count(t, d);
                    }
                }
                chi
            })
            .clone()
    }

    pub fn is_compact(&self) -> bool {
        !self.vector.iter().any(Integer::is_infinite)
    }

    pub fn is_empty(&self) -> bool {
        self.vector.iter().all(Integer::is_zero)
    }

    /// Whether the surface meets a boundary triangle of the triangulation.
    pub fn has_real_boundary(&self) -> bool {
        (0..self.triangulation.size()).any(|t| {
            (0..4).any(|f| {
                self.triangulation.tetrahedron(t).is_boundary(f)
                    && (0..4).filter(|&v| v != f).any(|v| !self.tet_arcs(t, f, v).is_zero())
            })
        })
    }

    /// True if every disc is a triangle.
    pub fn is_vertex_linking(&self) -> bool {
        (0..self.triangulation.size()).all(|t| (4..N_DISC_TYPES).all(|d| self.disc_count(t, d).is_zero()))
    }

    /// The vertex class that some multiple of this surface links.
    pub fn is_vertex_link(&self) -> Option<usize> {
        if !self.is_vertex_linking() || !self.is_compact() {
            return None;
        }
        let n = self.triangulation.size();
        let sk = self.triangulation.skeleton();
        let (t0, v0) = (0..n)
            .flat_map(|t| (0..4).map(move |v| (t, v)))
            .find(|&(t, v)| !self.triangles(t, v).is_zero())?;
        let class = sk.tet_vertex(t0, v0);
        let value = self.triangles(t0, v0);
        let all_match = (0..n).all(|t| {
            (0..4).all(|v| {
                let expected = if sk.tet_vertex(t, v) == class { value } else { &ZERO };
                self.triangles(t, v) == expected
            })
        });
        all_match.then_some(class)
    }

    /// The normalised boundary of a thin regular neighbourhood of an edge
    /// class, if it is a normal surface.
    fn thin_edge_link_vector(&self, edge: usize) -> Option<Vec<Integer>> {
        let sk = self.triangulation.skeleton();
        let emb = sk.edges()[edge].embeddings()[0];
        let ends: Vec<usize> = EDGE_VERTICES[emb.edge]
            .iter()
            .map(|&v| sk.tet_vertex(emb.tet, v))
            .collect();
        let block = self.encoding.block();
        let mut v = vec![Integer::ZERO; self.vector.len()];
        for t in 0..self.triangulation.size() {
            let mut quad_type = None;
            for (j, &[a, b]) in EDGE_VERTICES.iter().enumerate() {
                if sk.tet_edge(t, j) != edge {
                    continue;
                }
                let q = VERTEX_SPLIT[a][b];
                if quad_type.is_some_and(|existing| existing != q) {
                    return None;
                }
                quad_type = Some(q);
                v[t * block + self.encoding.quad_offset() + q] += Integer::ONE;
            }
            for corner in 0..4 {
                let on_edge = (0..4)
                    .filter(|&w| w != corner)
                    .any(|w| sk.tet_edge(t, EDGE_NUMBER[corner][w]) == edge);
                if !on_edge && ends.contains(&sk.tet_vertex(t, corner)) {
                    v[t * block + corner] = Integer::ONE;
                }
            }
        }
        Some(v)
    }

    /// The edge classes (at most two) whose thin links are multiples of
    /// this surface.
    pub fn is_thin_edge_link(&self) -> Vec<usize> {
        if self.is_empty() || !self.is_compact() || (0..self.triangulation.size()).any(|t| self.has_octs_in(t)) {
            return Vec::new();
        }
        (0..self.triangulation.count_edges())
            .filter(|&e| self.thin_edge_link_vector(e).is_some_and(|link| self.is_multiple_of(&link)))
            .collect()
    }

    fn has_octs_in(&self, tet: usize) -> bool {
        (0..3).any(|k| !self.octs(tet, k).is_zero())
    }

    /// Whether `self` is a positive rational multiple of `other`, given in
    /// this surface's layout.
    fn is_multiple_of(&self, other: &[Integer]) -> bool {
        let Some(i) = other.iter().position(|x| !x.is_zero()) else {
            return false;
        };
        let (c, s) = (&other[i], &self.vector[i]);
        self.vector.iter().zip(other).all(|(x, y)| x * c == y * s)
    }

    /// Exactly one quadrilateral in every tetrahedron, and nothing else.
    pub fn is_splitting(&self) -> bool {
        (0..self.triangulation.size()).all(|t| {
            (0..4).all(|v| self.triangles(t, v).is_zero())
                && !self.has_octs_in(t)
                && (0..3).map(|q| self.quads(t, q).clone()).sum::<Integer>() == Integer::ONE
        })
    }

    /// If the surface meets every tetrahedron in at most one disc, the
    /// number of tetrahedra it meets.
    pub fn is_central(&self) -> Option<usize> {
        let mut met = 0;
        for t in 0..self.triangulation.size() {
            let total: Integer = (0..N_DISC_TYPES).map(|d| self.disc_count(t, d).clone()).sum();
            if total == Integer::ONE {
                met += 1;
            } else if !total.is_zero() {
                return None;
            }
        }
        (met > 0).then_some(met)
    }

    /// The first `(tetrahedron, octagon type)` with octagons.
    pub fn oct_position(&self) -> Option<(usize, usize)> {
        if !self.encoding.stores_octagons() {
            return None;
        }
        (0..self.triangulation.size())
            .flat_map(|t| (0..3).map(move |k| (t, k)))
            .find(|&(t, k)| !self.octs(t, k).is_zero())
    }

    pub fn has_multiple_oct_discs(&self) -> bool {
        (0..self.triangulation.size()).any(|t| (0..3).any(|k| *self.octs(t, k) > Integer::ONE))
    }

    /// Whether the two surfaces could be summed and still be embedded:
    /// at most one quad or octagon type per tetrahedron, and at most one
    /// octagon type overall.
    pub fn locally_compatible(&self, other: &NormalSurface) -> bool {
        if !self.same_triangulation(other) {
            return false;
        }
        let mut oct_types = Vec::new();
        for t in 0..self.triangulation.size() {
            let present: Vec<usize> = (4..N_DISC_TYPES)
                .filter(|&d| !self.disc_count(t, d).is_zero() || !other.disc_count(t, d).is_zero())
                .collect();
            if present.len() > 1 {
                return false;
            }
            oct_types.extend(present.into_iter().filter(|&d| d >= 7).map(|d| (t, d)));
        }
        oct_types.len() <= 1
    }

    fn disc_properties(&self) -> Result<DiscProperties> {
        self.discs
            .get_or_init(|| {
                if !self.is_compact() {
                    return Err(KernelError::failed_precondition("surface is not compact"));
                }
                Ok(DiscSetSurface::new(self)?.properties())
            })
            .clone()
    }

    /// Requires a compact surface.
    pub fn is_orientable(&self) -> Result<bool> {
        Ok(self.disc_properties()?.orientable)
    }

    /// Requires a compact surface.
    pub fn is_two_sided(&self) -> Result<bool> {
        Ok(self.disc_properties()?.two_sided)
    }

    /// Requires a compact surface. The empty surface is not connected.
    pub fn is_connected(&self) -> Result<bool> {
        Ok(self.disc_properties()?.components == 1)
    }

    fn same_triangulation(&self, other: &NormalSurface) -> bool {
        Arc::ptr_eq(&self.triangulation, &other.triangulation) || *self.triangulation == *other.triangulation
    }

    /// The vector laid out in a wider encoding storing triangles.
    fn in_encoding(&self, encoding: NormalEncoding) -> Vec<Integer> {
        let block = encoding.block();
        let mut out = vec![Integer::ZERO; self.triangulation.size() * block];
        for t in 0..self.triangulation.size() {
            for v in 0..4 {
                out[t * block + v] = self.triangles(t, v).clone();
            }
            for q in 0..3 {
                out[t * block + encoding.quad_offset() + q] = self.quads(t, q).clone();
            }
            if encoding.stores_octagons() {
                for k in 0..3 {
                    out[t * block + encoding.oct_offset() + k] = self.octs(t, k).clone();
                }
            }
        }
        out
    }

    /// The disc-by-disc sum. Both surfaces must live on the same
    /// triangulation.
    pub fn sum(&self, other: &NormalSurface) -> Result<NormalSurface> {
        if !self.same_triangulation(other) {
            return Err(KernelError::invalid_argument("surfaces lie in different triangulations"));
        }
        let encoding = self.encoding + other.encoding;
        let a = self.in_encoding(encoding);
        let b = other.in_encoding(encoding);
        let vector = a.iter().zip(&b).map(|(x, y)| x + y).collect();
        Ok(Self::from_parts(Arc::clone(&self.triangulation), encoding, vector))
    }

    /// Divides through by the gcd of the finite coordinates, returning it.
    pub fn scale_down(&mut self) -> Integer {
        let g = scale_down(&mut self.vector);
        if !g.is_zero() && g != Integer::ONE {
            self.euler = OnceLock::new();
            self.discs = OnceLock::new();
        }
        g
    }

    /// The surface in another coordinate system.
    ///
    /// Dropping triangles or octagons is refused when they are needed:
    /// octagons can only be dropped when there are none, and closed systems
    /// hold only compact surfaces.
    pub fn to_vector(&self, coords: NormalCoords) -> Result<Vec<Integer>> {
        let n = self.triangulation.size();
        let octs_present = self.oct_position().is_some();
        let need_compact = || {
            if self.is_compact() {
                Ok(())
            } else {
                Err(KernelError::failed_precondition("surface is not compact"))
            }
        };
        let no_octs = || {
            if octs_present {
                Err(KernelError::failed_precondition(format!(
                    "{} coordinates cannot hold octagons",
                    coords
                )))
            } else {
                Ok(())
            }
        };
        match coords {
            NormalCoords::Edge => Ok(self.edge_weights()),
            NormalCoords::Arc => Ok(self.arc_counts()),
            NormalCoords::Angle => Err(KernelError::invalid_argument("angle coordinates do not describe surfaces")),
            NormalCoords::Standard => {
                no_octs()?;
                Ok(self.in_encoding(NormalEncoding::new(coords)))
            }
            NormalCoords::AlmostNormal | NormalCoords::LegacyAlmostNormal => {
                Ok(self.in_encoding(NormalEncoding::new(coords)))
            }
            NormalCoords::Quad | NormalCoords::QuadClosed | NormalCoords::QuadOct | NormalCoords::QuadOctClosed => {
                if coords.is_closed_only() {
                    need_compact()?;
                }
                let encoding = NormalEncoding::new(coords);
                if !encoding.stores_octagons() {
                    no_octs()?;
                }
                let mut out = Vec::with_capacity(n * encoding.block());
                for t in 0..n {
                    out.extend((0..3).map(|q| self.quads(t, q).clone()));
                    if encoding.stores_octagons() {
                        out.extend((0..3).map(|k| self.octs(t, k).clone()));
                    }
                }
                Ok(out)
            }
        }
    }
}

impl PartialEq for NormalSurface {
    /// Same triangulation and the same disc counts, whatever the encodings.
    fn eq(&self, other: &Self) -> bool {
        if !self.same_triangulation(other) {
            return false;
        }
        let encoding = self.encoding + other.encoding;
        self.in_encoding(encoding) == other.in_encoding(encoding)
    }
}

impl Add for &NormalSurface {
    type Output = Result<NormalSurface>;

    fn add(self, rhs: &NormalSurface) -> Result<NormalSurface> {
        self.sum(rhs)
    }
}

impl Mul<&Integer> for &NormalSurface {
    type Output = NormalSurface;

    /// The scalar should be non-negative.
    fn mul(self, rhs: &Integer) -> NormalSurface {
        let vector = self.vector.iter().map(|x| x * rhs).collect();
        NormalSurface::from_parts(Arc::clone(&self.triangulation), self.encoding, vector)
    }
}

impl fmt::Display for NormalSurface {
    /// Non-zero tetrahedra as `tet: t0 t1 t2 t3 ; q0 q1 q2 [; k0 k1 k2]`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.name.is_empty() {
            write!(f, "{}: ", self.name)?;
        }
        let mut first = true;
        for t in 0..self.triangulation.size() {
            if (0..N_DISC_TYPES).all(|d| self.disc_count(t, d).is_zero()) {
                continue;
            }
            if !first {
                write!(f, " | ")?;
            }
            first = false;
            let join = |r: std::ops::Range<usize>| {
                r.map(|d| self.disc_count(t, d).to_string()).collect::<Vec<_>>().join(" ")
            };
            write!(f, "{}: {} ; {}", t, join(0..4), join(4..7))?;
            if self.encoding.stores_octagons() {
                write!(f, " ; {}", join(7..10))?;
            }
        }
        if first {
            write!(f, "empty")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maths::vector::from_i64s;
    use crate::triangulation::construct;

    fn single(coords: NormalCoords, values: &[i64]) -> NormalSurface {
        NormalSurface::new(Arc::new(Triangulation::with_size(1)), coords, from_i64s(values)).unwrap()
    }

    #[test]
    fn test_discs_in_a_lone_tetrahedron() {
        let triangle = single(NormalCoords::Standard, &[1, 0, 0, 0, 0, 0, 0]);
        assert_eq!(triangle.euler_char(), Integer::ONE);
        assert!(triangle.has_real_boundary());
        assert_eq!(triangle.is_vertex_link(), Some(triangle.triangulation().skeleton().tet_vertex(0, 0)));
        assert_eq!(triangle.is_orientable(), Ok(true));
        assert_eq!(triangle.is_connected(), Ok(true));

        let quad = single(NormalCoords::Standard, &[0, 0, 0, 0, 1, 0, 0]);
        assert_eq!(quad.euler_char(), Integer::ONE);
        assert!(quad.is_splitting());
        assert_eq!(quad.is_central(), Some(1));
        assert!(quad.is_vertex_link().is_none());

        let oct = single(NormalCoords::AlmostNormal, &[0, 0, 0, 0, 0, 0, 0, 0, 1, 0]);
        assert_eq!(oct.euler_char(), Integer::ONE);
        assert_eq!(oct.oct_position(), Some((0, 1)));
        assert!(!oct.has_multiple_oct_discs());
        assert!(!oct.locally_compatible(&quad));
        assert!(quad.locally_compatible(&triangle));
    }

    #[test]
    fn test_quad_is_link_of_two_opposite_edges() {
        let quad = single(NormalCoords::Standard, &[0, 0, 0, 0, 2, 0, 0]);
        let sk = quad.triangulation().skeleton();
        let mut expected = vec![sk.tet_edge(0, 0), sk.tet_edge(0, 5)];
        expected.sort();
        assert_eq!(quad.is_thin_edge_link(), expected);
    }

    #[test]
    fn test_figure_eight_vertex_link() {
        let tri = Arc::new(construct::figure_eight());
        let link = NormalSurface::vertex_link(Arc::clone(&tri), 0).unwrap();
        assert_eq!(link.euler_char(), Integer::ZERO);
        assert_eq!(link.is_vertex_link(), Some(0));
        assert!(link.is_compact());
        assert!(!link.has_real_boundary());
        assert_eq!(link.is_orientable(), Ok(true));
        assert_eq!(link.is_two_sided(), Ok(true));
        assert_eq!(link.is_connected(), Ok(true));
        assert!(link.edge_weights().iter().all(|w| *w == Integer::new(2)));

        let double = &link * &Integer::new(2);
        assert_eq!(double.euler_char(), Integer::ZERO);
        assert_eq!(double.is_connected(), Ok(false));
        let mut scaled = double.clone();
        assert_eq!(scaled.scale_down(), Integer::new(2));
        assert_eq!(scaled, link);
    }

    #[test]
    fn test_scale_down_forgets_cached_properties() {
        let tri = Arc::new(construct::figure_eight());
        let link = NormalSurface::vertex_link(Arc::clone(&tri), 0).unwrap();
        let mut double = &link * &Integer::new(2);
        assert_eq!(double.is_connected(), Ok(false));
        assert_eq!(double.euler_char(), Integer::ZERO);
        assert_eq!(double.scale_down(), Integer::new(2));
        assert_eq!(double.is_connected(), Ok(true));
        assert_eq!(double.is_orientable(), Ok(true));
        assert_eq!(double.is_two_sided(), Ok(true));

        let lens = Arc::new(construct::layered_lens_space(5, 2).unwrap());
        let sphere = NormalSurface::vertex_link(lens, 0).unwrap();
        let mut triple = &sphere * &Integer::new(3);
        assert_eq!(triple.euler_char(), Integer::new(6));
        assert_eq!(triple.is_connected(), Ok(false));
        assert_eq!(triple.scale_down(), Integer::new(3));
        assert_eq!(triple.euler_char(), Integer::new(2));
        assert_eq!(triple.is_connected(), Ok(true));
    }

    #[test]
    fn test_lens_space_vertex_link_is_a_sphere() {
        let tri = Arc::new(construct::layered_lens_space(5, 2).unwrap());
        let link = NormalSurface::vertex_link(tri, 0).unwrap();
        assert_eq!(link.euler_char(), Integer::new(2));
        assert_eq!(link.is_two_sided(), Ok(true));
    }

    #[test]
    fn test_sum_joins_encodings() {
        let quad = single(NormalCoords::Standard, &[1, 0, 0, 0, 1, 0, 0]);
        let oct = single(NormalCoords::AlmostNormal, &[0, 1, 0, 0, 0, 0, 0, 0, 0, 0]);
        let sum = (&quad + &oct).unwrap();
        assert!(sum.encoding().stores_octagons());
        assert_eq!(sum.triangles(0, 1), &Integer::ONE);
        assert_eq!(sum.euler_char(), quad.euler_char() + oct.euler_char());
        let other = NormalSurface::new(
            Arc::new(construct::figure_eight()),
            NormalCoords::Quad,
            from_i64s(&[0; 6]),
        )
        .unwrap();
        assert!(quad.sum(&other).is_err());
    }

    #[test]
    fn test_conversions() {
        let quad = single(NormalCoords::Standard, &[1, 0, 0, 0, 1, 0, 0]);
        assert_eq!(quad.to_vector(NormalCoords::Quad).unwrap(), from_i64s(&[1, 0, 0]));
        assert_eq!(
            quad.to_vector(NormalCoords::QuadOct).unwrap(),
            from_i64s(&[1, 0, 0, 0, 0, 0])
        );
        assert_eq!(quad.to_vector(NormalCoords::Edge).unwrap().len(), 6);
        assert!(quad.to_vector(NormalCoords::Angle).is_err());
        let oct = single(NormalCoords::AlmostNormal, &[0, 0, 0, 0, 0, 0, 0, 1, 0, 0]);
        assert!(oct.to_vector(NormalCoords::Standard).is_err());
    }

    #[test]
    fn test_rejects_bad_vectors() {
        let tri = Arc::new(Triangulation::with_size(1));
        assert!(NormalSurface::new(Arc::clone(&tri), NormalCoords::Standard, from_i64s(&[1, 0, 0])).is_err());
        assert!(NormalSurface::new(Arc::clone(&tri), NormalCoords::Standard, from_i64s(&[-1, 0, 0, 0, 0, 0, 0])).is_err());
        assert!(NormalSurface::new(tri, NormalCoords::Edge, from_i64s(&[0; 6])).is_err());
    }
}
