// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Lists of vertex or fundamental normal surfaces.

use std::sync::Arc;

use strum_macros::{EnumIter, IntoStaticStr};
use tracing::{info, warn};

use super::coords::NormalCoords;
use super::matching::{matching_equations, validity_constraints};
use super::normal_surface::NormalSurface;
use crate::enumerate::{enumerate_extreme_rays, enumerate_hilbert_basis, EnumerationOptions, ProgressTracker};
use crate::error::Result;
use crate::triangulation::Triangulation;

/// Which surfaces a list holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, IntoStaticStr)]
pub enum NormalList {
    /// Extreme rays of the solution cone, scaled to be primitive.
    Vertex,
    /// The Hilbert basis of the solution cone.
    Fundamental,
}

#[derive(Debug, Clone)]
pub struct NormalSurfaces {
    triangulation: Arc<Triangulation>,
    coords: NormalCoords,
    which: NormalList,
    surfaces: Vec<NormalSurface>,
    cancelled: bool,
}

impl NormalSurfaces {
    /// Enumerates the embedded surfaces of the given kind.
    ///
    /// Vectors found in reduced systems are lifted to triangle coordinates.
    /// If the tracker cancels the run the list holds whatever was complete,
    /// and [`NormalSurfaces::is_cancelled`] is set.
    pub fn enumerate(
        triangulation: Arc<Triangulation>,
        coords: NormalCoords,
        which: NormalList,
        options: &EnumerationOptions,
        tracker: Option<&ProgressTracker>,
    ) -> Result<Self> {
        let equations = matching_equations(&triangulation, coords)?;
        let constraints = validity_constraints(&triangulation, coords)?;
        if let Some(t) = tracker {
            t.set_stage(match which {
                NormalList::Vertex => "enumerating vertex surfaces",
                NormalList::Fundamental => "enumerating fundamental surfaces",
            });
        }
        let outcome = match which {
            NormalList::Vertex => enumerate_extreme_rays(&equations, &constraints, options, tracker),
            NormalList::Fundamental => enumerate_hilbert_basis(&equations, &constraints, options, tracker),
        };
        let surfaces = outcome
            .results
            .into_iter()
            .filter(|v| v.iter().any(|x| !x.is_zero()))
            .map(|v| NormalSurface::new(Arc::clone(&triangulation), coords, v))
            .collect::<Result<Vec<_>>>()?;
        if outcome.cancelled {
            warn!(coords = coords.name(), found = surfaces.len(), "surface enumeration cancelled");
        } else {
            info!(
                coords = coords.name(),
                which = <&'static str>::from(which),
                size = triangulation.size(),
                surfaces = surfaces.len(),
                "surface enumeration complete"
            );
        }
        if let Some(t) = tracker {
            t.set_finished();
        }
        Ok(Self {
            triangulation,
            coords,
            which,
            surfaces,
            cancelled: outcome.cancelled,
        })
    }

    pub fn triangulation(&self) -> &Arc<Triangulation> {
        &self.triangulation
    }

    pub fn coords(&self) -> NormalCoords {
        self.coords
    }

    pub fn which(&self) -> NormalList {
        self.which
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    pub fn len(&self) -> usize {
        self.surfaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.surfaces.is_empty()
    }

    pub fn surface(&self, index: usize) -> Option<&NormalSurface> {
        self.surfaces.get(index)
    }

    pub fn surfaces(&self) -> &[NormalSurface] {
        &self.surfaces
    }

    pub fn iter(&self) -> std::slice::Iter<'_, NormalSurface> {
        self.surfaces.iter()
    }
}

impl<'a> IntoIterator for &'a NormalSurfaces {
    type Item = &'a NormalSurface;
    type IntoIter = std::slice::Iter<'a, NormalSurface>;

    fn into_iter(self) -> Self::IntoIter {
        self.surfaces.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::triangulation::construct;

    fn vertex_surfaces(tri: Triangulation, coords: NormalCoords) -> NormalSurfaces {
        NormalSurfaces::enumerate(Arc::new(tri), coords, NormalList::Vertex, &EnumerationOptions::default(), None)
            .unwrap()
    }

    #[test]
    fn test_lens_space_standard() {
        let list = vertex_surfaces(construct::layered_lens_space(5, 2).unwrap(), NormalCoords::Standard);
        assert!(!list.is_empty());
        assert!(list.iter().any(|s| s.is_vertex_link().is_some()));
        for s in &list {
            assert!(s.is_compact());
            assert!(s.edge_weights().iter().all(|w| !w.is_negative()));
        }
    }

    #[test]
    fn test_figure_eight_quad_surfaces_are_spun() {
        let list = vertex_surfaces(construct::figure_eight(), NormalCoords::Quad);
        assert!(!list.is_empty());
        assert!(list.iter().any(|s| !s.is_compact()));
        let closed = vertex_surfaces(construct::figure_eight(), NormalCoords::QuadClosed);
        assert!(closed.iter().all(NormalSurface::is_compact));
    }

    #[test]
    fn test_cancelled_before_starting() {
        let tracker = ProgressTracker::new();
        tracker.cancel();
        let list = NormalSurfaces::enumerate(
            Arc::new(construct::figure_eight()),
            NormalCoords::Standard,
            NormalList::Vertex,
            &EnumerationOptions::default(),
            Some(&tracker),
        )
        .unwrap();
        assert!(list.is_cancelled());
        assert!(list.is_empty());
    }
}
