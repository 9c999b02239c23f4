// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Vertex angle structures.

use std::sync::Arc;

use tracing::{info, warn};

use super::equations::angle_equations;
use super::structure::AngleStructure;
use crate::enumerate::{enumerate_extreme_rays, EnumerationOptions, ProgressTracker, ValidityConstraints};
use crate::error::Result;
use crate::triangulation::Triangulation;

/// The vertices of the polytope of angle structures, or of its taut face.
#[derive(Debug, Clone)]
pub struct AngleStructures {
    triangulation: Arc<Triangulation>,
    taut_only: bool,
    structures: Vec<AngleStructure>,
    cancelled: bool,
}

impl AngleStructures {
    /// Enumerates vertex angle structures.
    ///
    /// Extreme rays of the solution cone with a zero scaling coordinate are
    /// not angle structures and are dropped. With `taut_only`, at most one
    /// angle per tetrahedron may be non-zero, which leaves exactly the taut
    /// vertex structures.
    pub fn enumerate(
        triangulation: Arc<Triangulation>,
        taut_only: bool,
        options: &EnumerationOptions,
        tracker: Option<&ProgressTracker>,
    ) -> Result<Self> {
        let equations = angle_equations(&triangulation);
        let constraints = if taut_only {
            let mut c = ValidityConstraints::new(3, triangulation.size());
            c.add_local(&[0, 1, 2]);
            c
        } else {
            ValidityConstraints::none()
        };
        if let Some(t) = tracker {
            t.set_stage(if taut_only {
                "enumerating taut angle structures"
            } else {
                "enumerating vertex angle structures"
            });
        }
        let outcome = enumerate_extreme_rays(&equations, &constraints, options, tracker);
        let scale = 3 * triangulation.size();
        let structures: Vec<_> = outcome
            .results
            .into_iter()
            .filter(|v| v[scale].is_positive())
            .map(|v| AngleStructure::from_parts(Arc::clone(&triangulation), v))
            .collect();
        if outcome.cancelled {
            warn!(found = structures.len(), "angle structure enumeration cancelled");
        } else {
            info!(
                taut_only,
                size = triangulation.size(),
                structures = structures.len(),
                "angle structure enumeration complete"
            );
        }
        if let Some(t) = tracker {
            t.set_finished();
        }
        Ok(Self {
            triangulation,
            taut_only,
            structures,
            cancelled: outcome.cancelled,
        })
    }

    pub fn triangulation(&self) -> &Arc<Triangulation> {
        &self.triangulation
    }

    pub fn is_taut_only(&self) -> bool {
        self.taut_only
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    /// Whether some convex combination of these structures is strict, that
    /// is, every angle is non-zero in at least one of them.
    pub fn spans_strict(&self) -> bool {
        let Some(first) = self.structures.first() else {
            return false;
        };
        let angles = first.vector().len() - 1;
        (0..angles).all(|i| self.structures.iter().any(|s| !s.vector()[i].is_zero()))
    }

    /// Whether any of these structures is taut.
    pub fn spans_taut(&self) -> bool {
        self.structures.iter().any(AngleStructure::is_taut)
    }

    pub fn len(&self) -> usize {
        self.structures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.structures.is_empty()
    }

    pub fn structure(&self, index: usize) -> Option<&AngleStructure> {
        self.structures.get(index)
    }

    pub fn structures(&self) -> &[AngleStructure] {
        &self.structures
    }

    pub fn iter(&self) -> std::slice::Iter<'_, AngleStructure> {
        self.structures.iter()
    }
}

impl<'a> IntoIterator for &'a AngleStructures {
    type Item = &'a AngleStructure;
    type IntoIter = std::slice::Iter<'a, AngleStructure>;

    fn into_iter(self) -> Self::IntoIter {
        self.structures.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::triangulation::construct;

    fn structures(tri: Triangulation, taut_only: bool) -> AngleStructures {
        AngleStructures::enumerate(Arc::new(tri), taut_only, &EnumerationOptions::default(), None).unwrap()
    }

    #[test]
    fn test_figure_eight_spans_strict() {
        let list = structures(construct::figure_eight(), false);
        assert!(!list.is_empty());
        assert!(list.spans_strict());
        assert!(list.spans_taut());
        for a in &list {
            assert!(AngleStructure::new(Arc::clone(a.triangulation()), a.vector().to_vec()).is_ok());
        }
    }

    #[test]
    fn test_figure_eight_taut_structures() {
        let list = structures(construct::figure_eight(), true);
        assert!(list.is_taut_only());
        assert!(!list.is_empty());
        assert!(list.iter().all(AngleStructure::is_taut));
        assert!(list.iter().any(AngleStructure::is_veering));
    }

    #[test]
    fn test_non_orientable_is_never_veering() {
        let list = structures(construct::gieseking(), true);
        assert!(list.iter().all(|a| a.is_taut() && !a.is_veering()));
    }

    #[test]
    fn test_cancelled_before_starting() {
        let tracker = ProgressTracker::new();
        tracker.cancel();
        let list = AngleStructures::enumerate(
            Arc::new(construct::figure_eight()),
            false,
            &EnumerationOptions::default(),
            Some(&tracker),
        )
        .unwrap();
        assert!(list.is_cancelled());
        assert!(list.is_empty());
    }
}
