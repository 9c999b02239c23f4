// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! A single angle structure.
//!
//! Like normal surfaces, a structure holds a reference-counted snapshot of
//! its triangulation, so later edits to the original never invalidate it.

use std::fmt;
use std::sync::{Arc, OnceLock};

use num_traits::Zero;

use super::equations::{angle_equations, angle_index};
use crate::error::{KernelError, Result};
use crate::maths::rational::ratio;
use crate::maths::{dot, Integer, Rational};
use crate::triangulation::Triangulation;

/// Strictness and tautness, found together in one pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Shape {
    strict: bool,
    taut: bool,
}

#[derive(Debug, Clone)]
pub struct AngleStructure {
    triangulation: Arc<Triangulation>,
    vector: Vec<Integer>,
    shape: OnceLock<Shape>,
    veering: OnceLock<bool>,
}

impl AngleStructure {
    /// An angle structure from its `3n + 1` coordinates.
    ///
    /// The scaling coordinate must be positive, every angle non-negative,
    /// and the angle equations of the triangulation must hold.
    pub fn new(triangulation: Arc<Triangulation>, vector: Vec<Integer>) -> Result<Self> {
        let expected = 3 * triangulation.size() + 1;
        if vector.len() != expected {
            return Err(KernelError::invalid_argument(format!(
                "angle structures need {} entries, not {}",
                expected,
                vector.len()
            )));
        }
        if vector.iter().any(|x| x.is_negative() || x.is_infinite()) {
            return Err(KernelError::invalid_argument("angles must be finite and non-negative"));
        }
        if !vector[expected - 1].is_positive() {
            return Err(KernelError::invalid_argument("the scaling coordinate must be positive"));
        }
        let equations = angle_equations(&triangulation);
        if (0..equations.rows()).any(|r| !dot(equations.row(r), &vector).is_zero()) {
            return Err(KernelError::invalid_argument("angles do not satisfy the angle equations"));
        }
        Ok(Self::from_parts(triangulation, vector))
    }

    /// The vector must already satisfy the angle equations with `s > 0`.
    pub(crate) fn from_parts(triangulation: Arc<Triangulation>, vector: Vec<Integer>) -> Self {
        Self {
            triangulation,
            vector,
            shape: OnceLock::new(),
            veering: OnceLock::new(),
        }
    }

    pub fn triangulation(&self) -> &Arc<Triangulation> {
        &self.triangulation
    }

    pub fn vector(&self) -> &[Integer] {
        &self.vector
    }

    fn scale(&self) -> &Integer {
        &self.vector[self.vector.len() - 1]
    }

    fn raw(&self, tet: usize, pair: usize) -> &Integer {
        &self.vector[3 * tet + pair]
    }

    /// The angle at the edge pair `pair` (edges `pair` and `5 - pair`) of a
    /// tetrahedron, as a multiple of `π`.
    pub fn angle(&self, tet: usize, pair: usize) -> Rational {
        ratio(self.raw(tet, pair), self.scale()).unwrap_or_else(Rational::zero)
    }

    /// The angle at an edge of a tetrahedron, as a multiple of `π`.
    pub fn edge_angle(&self, tet: usize, edge: usize) -> Rational {
        self.angle(tet, angle_index(edge))
    }

    fn shape(&self) -> Shape {
        *self.shape.get_or_init(|| {
            let s = self.scale();
            let angles = &self.vector[..self.vector.len() - 1];
            Shape {
                strict: angles.iter().all(|x| x.is_positive() && x < s),
                taut: angles.iter().all(|x| x.is_zero() || x == s),
            }
        })
    }

    /// Every angle lies strictly between `0` and `π`.
    pub fn is_strict(&self) -> bool {
        self.shape().strict
    }

    /// Every angle is `0` or `π`.
    pub fn is_taut(&self) -> bool {
        self.shape().taut
    }

    /// Whether this is a taut structure whose edges can be coloured
    /// consistently.
    ///
    /// In a taut tetrahedron the two edges with angle `π` are left
    /// uncoloured. Of the other two pairs, the one following the `π` pair in
    /// the cyclic order `0, 1, 2` is coloured by the tetrahedron's
    /// orientation and the other by its negation. The structure is veering
    /// when every edge receives one colour from all of its tetrahedra.
    ///
    /// Always `false` on non-orientable triangulations.
    pub fn is_veering(&self) -> bool {
        *self.veering.get_or_init(|| self.compute_veering())
    }

    fn compute_veering(&self) -> bool {
        if !self.is_taut() || !self.triangulation.is_orientable() {
            return false;
        }
        let sk = self.triangulation.skeleton();
        let mut colour = vec![0i8; sk.edges().len()];
        for tet in 0..self.triangulation.size() {
            let Some(flat) = (0..3).find(|&k| self.raw(tet, k).is_positive()) else {
                return false;
            };
            let orient = sk.orientation(tet);
            for step in 1..3 {
                let pair = (flat + step) % 3;
                let want = if step == 1 { orient } else { -orient };
                for edge in [pair, 5 - pair] {
                    let class = sk.tet_edge(tet, edge);
                    if colour[class] == 0 {
                        colour[class] = want;
                    } else if colour[class] != want {
                        return false;
                    }
                }
            }
        }
        true
    }
}

impl PartialEq for AngleStructure {
    fn eq(&self, other: &Self) -> bool {
        self.vector == other.vector
            && (Arc::ptr_eq(&self.triangulation, &other.triangulation) || *self.triangulation == *other.triangulation)
    }
}

impl fmt::Display for AngleStructure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for tet in 0..self.triangulation.size() {
            if tet > 0 {
                write!(f, " ; ")?;
            }
            for k in 0..3 {
                if k > 0 {
                    write!(f, " ")?;
                }
                write!(f, "{}", self.angle(tet, k))?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maths::vector::from_i64s;
    use crate::triangulation::construct;
    use num_bigint::BigInt;

    fn figure_eight() -> Arc<Triangulation> {
        Arc::new(construct::figure_eight())
    }

    #[test]
    fn test_regular_structure_is_strict() {
        let a = AngleStructure::new(figure_eight(), from_i64s(&[1, 1, 1, 1, 1, 1, 3])).unwrap();
        assert!(a.is_strict());
        assert!(!a.is_taut());
        assert!(!a.is_veering());
        assert_eq!(a.angle(1, 2), Rational::new(BigInt::from(1), BigInt::from(3)));
        assert_eq!(a.edge_angle(0, 5), a.angle(0, 0));
        assert_eq!(a.to_string(), "1/3 1/3 1/3 ; 1/3 1/3 1/3");
    }

    #[test]
    fn test_rejects_bad_vectors() {
        let tri = figure_eight();
        assert!(AngleStructure::new(Arc::clone(&tri), from_i64s(&[1, 1, 1, 3])).is_err());
        assert!(AngleStructure::new(Arc::clone(&tri), from_i64s(&[0, 0, 0, 0, 0, 0, 0])).is_err());
        assert!(AngleStructure::new(Arc::clone(&tri), from_i64s(&[2, 2, -1, 1, 1, 1, 3])).is_err());
        // Tetrahedron sums are fine but the edges are not.
        assert!(AngleStructure::new(tri, from_i64s(&[2, 1, 0, 1, 1, 1, 3])).is_err());
    }

    #[test]
    fn test_survives_changes_to_the_original() {
        let mut tri = figure_eight();
        let a = AngleStructure::new(Arc::clone(&tri), from_i64s(&[1, 1, 1, 1, 1, 1, 3])).unwrap();
        Arc::make_mut(&mut tri).new_tetrahedron();
        assert_eq!(a.triangulation().size(), 2);
        assert!(a.is_strict());
    }
}
