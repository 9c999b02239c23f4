// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Orderly generation of canonical facet pairings.
//!
//! Slots are filled in order. The next undecided slot is either declared
//! boundary or glued to a later slot; the partner is always the smallest
//! undecided facet of its simplex, and a simplex is reached for the first
//! time only through its facet 0. Every canonical connected pairing is built
//! this way, and partial pairings that some relabelling already beats are
//! cut as soon as they appear.
//!
//! The search runs on the predicate engine:
//!
//! 1. `ExtendPredicate` - one round per slot decision
//! 2. `BoundaryPredicate` - boundary requirement of the census
//! 3. `CanonicalPredicate` - full canonical test, keeping the automorphisms
//! 4. `BadSubgraphPredicate` - optional pruning for minimal triangulations
//! 5. a counting predicate, then `SuspendPredicate` to report the pairing

use std::sync::Mutex;

use strum_macros::{EnumIter, IntoStaticStr};
use tracing::{debug, info, trace, warn};

use super::pairing::{FacetPairing, FacetPairingIsomorphism, UNMATCHED};
use crate::engine::{Backtrack, Predicate, PredicateResult, SearchEngine};
use crate::enumerate::ProgressTracker;
use crate::error::{KernelError, Result};
use crate::statistics::{Counters, HasStatistics, Statistics};
use crate::trail::Trail;

#[cfg(parallel_enum)]
use rayon::prelude::*;

/// Which boundary facets the census allows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, EnumIter, IntoStaticStr)]
pub enum BoundaryMode {
    /// No boundary facets.
    #[default]
    Closed,
    /// At least one boundary facet.
    Bounded,
    /// Any number of boundary facets, including none.
    Any,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CensusOptions {
    /// Dimension of the simplices: 3 for tetrahedra, 2 for triangles.
    pub dimension: usize,
    /// Number of simplices.
    pub size: usize,
    pub boundary: BoundaryMode,
    /// Skip closed pairings holding a bad subgraph.
    pub prune_bad_subgraphs: bool,
    /// Split the search across the rayon thread pool.
    pub parallel: bool,
}

impl Default for CensusOptions {
    fn default() -> Self {
        Self {
            dimension: 3,
            size: 1,
            boundary: BoundaryMode::Closed,
            prune_bad_subgraphs: false,
            parallel: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CensusOutcome {
    /// Pairings reported.
    pub count: u64,
    pub cancelled: bool,
    pub statistics: Statistics,
}

/// Search state for one run of the engine.
#[derive(Debug)]
struct CensusContext {
    pairing: FacetPairing,
    trail: Trail,
    boundary: BoundaryMode,
    tracker: Option<ProgressTracker>,
    cancelled: bool,
    statistics: Statistics,
    automorphisms: Vec<FacetPairingIsomorphism>,
}

impl CensusContext {
    fn new(options: &CensusOptions, tracker: Option<&ProgressTracker>) -> Self {
        Self {
            pairing: FacetPairing::undecided(options.dimension, options.size),
            trail: Trail::new(),
            boundary: options.boundary,
            tracker: tracker.cloned(),
            cancelled: false,
            statistics: Statistics::new(),
            automorphisms: Vec::new(),
        }
    }

    /// Glues slot `slot` to `value` (a partner slot or the boundary value).
    fn decide(&mut self, slot: usize, value: usize) {
        let boundary = self.pairing.boundary_value();
        let slots = self.pairing.slots_mut();
        self.trail.assign(slots, slot, value);
        if value != boundary {
            self.trail.assign(slots, value, slot);
        }
    }

    /// The next undecided slot and the values it may take, partners first
    /// in increasing order and then the boundary.
    fn extensions(&self) -> Option<(usize, Vec<usize>)> {
        let slots = self.pairing.slots();
        let slot = slots.iter().position(|&s| s == UNMATCHED)?;
        let f = self.pairing.facets();
        let n = self.pairing.size();
        let boundary = self.pairing.boundary_value();
        let simp = slot / f;
        let reached = slots
            .iter()
            .filter(|&&s| s != UNMATCHED && s != boundary)
            .map(|&s| s / f)
            .max()
            .unwrap_or(0);
        if simp > reached {
            // Not connected to anything before it.
            return Some((slot, Vec::new()));
        }
        let mut values: Vec<usize> = (simp..=(reached + 1).min(n - 1))
            .filter_map(|j| {
                (0..f)
                    .map(|g| j * f + g)
                    .find(|&s| s > slot && slots[s] == UNMATCHED)
            })
            .collect();
        if self.boundary != BoundaryMode::Closed {
            values.push(boundary);
        }
        Some((slot, values))
    }
}

impl Backtrack for CensusContext {
    fn checkpoint(&self) -> usize {
        self.trail.len()
    }

    fn rewind_to(&mut self, checkpoint: usize) {
        self.trail.rewind_to(self.pairing.slots_mut(), checkpoint);
    }
}

impl HasStatistics for CensusContext {
    fn statistics_mut(&mut self) -> &mut Statistics {
        &mut self.statistics
    }
}

/// Decides one slot per round until the pairing is complete.
#[derive(Debug, Default)]
struct ExtendPredicate {
    /// Slot and candidate values for each round on the current path.
    frames: Vec<(usize, Vec<usize>)>,
}

impl Predicate<CensusContext> for ExtendPredicate {
    fn try_pred(&mut self, ctx: &mut CensusContext, round: usize) -> PredicateResult {
        if ctx.cancelled || ctx.tracker.as_ref().is_some_and(ProgressTracker::is_cancelled) {
            ctx.cancelled = true;
            return PredicateResult::Failure;
        }
        let Some((slot, values)) = ctx.extensions() else {
            return PredicateResult::Success;
        };
        if values.is_empty() {
            return PredicateResult::Failure;
        }
        self.frames.truncate(round);
        let n = values.len();
        self.frames.push((slot, values));
        PredicateResult::Choices(n)
    }

    fn retry_pred(&mut self, ctx: &mut CensusContext, round: usize, choice: usize) -> PredicateResult {
        if ctx.cancelled {
            return PredicateResult::Failure;
        }
        let Some(&(slot, ref values)) = self.frames.get(round) else {
            return PredicateResult::Failure;
        };
        ctx.decide(slot, values[choice]);
        ctx.statistics.increment(Counters::Extensions);
        if ctx.pairing.is_beaten() {
            ctx.statistics.increment(Counters::PartialNotCanonical);
            return PredicateResult::Failure;
        }
        PredicateResult::SuccessSamePredicate
    }
}

#[derive(Debug)]
struct BoundaryPredicate;

impl Predicate<CensusContext> for BoundaryPredicate {
    fn try_pred(&mut self, ctx: &mut CensusContext, _round: usize) -> PredicateResult {
        let ok = match ctx.boundary {
            BoundaryMode::Closed => ctx.pairing.is_closed(),
            BoundaryMode::Bounded => !ctx.pairing.is_closed(),
            BoundaryMode::Any => true,
        };
        if ok {
            PredicateResult::Success
        } else {
            ctx.statistics.increment(Counters::WrongBoundary);
            PredicateResult::Failure
        }
    }
}

#[derive(Debug)]
struct CanonicalPredicate;

impl Predicate<CensusContext> for CanonicalPredicate {
    fn try_pred(&mut self, ctx: &mut CensusContext, _round: usize) -> PredicateResult {
        match ctx.pairing.automorphisms() {
            Some(automorphisms) => {
                ctx.automorphisms = automorphisms;
                PredicateResult::Success
            }
            None => {
                ctx.statistics.increment(Counters::NotCanonical);
                PredicateResult::Failure
            }
        }
    }
}

#[derive(Debug)]
struct BadSubgraphPredicate;

impl Predicate<CensusContext> for BadSubgraphPredicate {
    fn try_pred(&mut self, ctx: &mut CensusContext, _round: usize) -> PredicateResult {
        if ctx.pairing.has_bad_subgraph() {
            ctx.statistics.increment(Counters::BadSubgraph);
            PredicateResult::Failure
        } else {
            PredicateResult::Success
        }
    }
}

#[derive(Debug)]
struct SuspendPredicate;

impl Predicate<CensusContext> for SuspendPredicate {
    fn try_pred(&mut self, _ctx: &mut CensusContext, _round: usize) -> PredicateResult {
        PredicateResult::Suspend
    }
}

fn program(options: &CensusOptions) -> Vec<Box<dyn Predicate<CensusContext> + Send>> {
    let mut predicates: Vec<Box<dyn Predicate<CensusContext> + Send>> = vec![
        Box::new(ExtendPredicate::default()),
        Box::new(BoundaryPredicate),
        Box::new(CanonicalPredicate),
    ];
    if options.prune_bad_subgraphs {
        predicates.push(Box::new(BadSubgraphPredicate));
    }
    predicates.push(Statistics::counting_predicate(Counters::Found, None));
    predicates.push(Box::new(SuspendPredicate));
    predicates
}

/// Runs the engine over every pairing whose first slot takes `first` (or
/// over everything), reporting each pairing with its non-trivial
/// automorphisms.
fn run_branch<F>(
    options: &CensusOptions,
    tracker: Option<&ProgressTracker>,
    first: Option<usize>,
    mut report: F,
) -> (Statistics, bool)
where
    F: FnMut(&FacetPairing, &[FacetPairingIsomorphism]),
{
    let mut ctx = CensusContext::new(options, tracker);
    if let Some(value) = first {
        ctx.decide(0, value);
        ctx.statistics.increment(Counters::Extensions);
        ctx.trail.freeze();
    }
    let mut engine = SearchEngine::new(program(options)).search(&mut ctx);
    while let Some(suspended) = engine {
        let nontrivial: Vec<FacetPairingIsomorphism> = ctx
            .automorphisms
            .iter()
            .filter(|iso| !iso.is_identity())
            .cloned()
            .collect();
        trace!(pairing = %ctx.pairing, automorphisms = nontrivial.len(), "found");
        report(&ctx.pairing, &nontrivial);
        engine = suspended.resume(&mut ctx);
    }
    debug!(first = ?first, found = ctx.statistics.get(Counters::Found), "census branch finished");
    (ctx.statistics, ctx.cancelled)
}

/// Enumerates every connected canonical facet pairing of the requested
/// size, calling `callback` with each pairing and its non-trivial
/// automorphisms.
///
/// With `parallel` set the search is split on the partner of the first
/// slot; results are then reported in the same order as a serial run.
pub fn enumerate_pairings<F>(
    options: &CensusOptions,
    tracker: Option<&ProgressTracker>,
    mut callback: F,
) -> Result<CensusOutcome>
where
    F: FnMut(&FacetPairing, &[FacetPairingIsomorphism]),
{
    if options.dimension == 0 {
        return Err(KernelError::invalid_argument("simplices must have dimension at least 1"));
    }
    if options.size == 0 {
        return Err(KernelError::invalid_argument("a census needs at least one simplex"));
    }
    if let Some(t) = tracker {
        t.set_stage("enumerating facet pairings");
    }

    let (statistics, cancelled) = if options.parallel {
        run_split(options, tracker, &mut callback)
    } else {
        run_branch(options, tracker, None, &mut callback)
    };

    let count = statistics.get(Counters::Found);
    if cancelled {
        warn!(size = options.size, found = count, "facet pairing census cancelled");
    } else {
        info!(
            dimension = options.dimension,
            size = options.size,
            boundary = <&'static str>::from(options.boundary),
            pairings = count,
            %statistics,
            "facet pairing census complete"
        );
    }
    if let Some(t) = tracker {
        t.set_fraction(1.0);
        t.set_finished();
    }
    Ok(CensusOutcome {
        count,
        cancelled,
        statistics,
    })
}

/// Counts the pairings [`enumerate_pairings`] would report.
pub fn count_pairings(options: &CensusOptions, tracker: Option<&ProgressTracker>) -> Result<CensusOutcome> {
    enumerate_pairings(options, tracker, |_, _| {})
}

type Found = (FacetPairing, Vec<FacetPairingIsomorphism>);

fn run_split<F>(options: &CensusOptions, tracker: Option<&ProgressTracker>, callback: &mut F) -> (Statistics, bool)
where
    F: FnMut(&FacetPairing, &[FacetPairingIsomorphism]),
{
    let ctx = CensusContext::new(options, tracker);
    let firsts = ctx.extensions().map(|(_, values)| values).unwrap_or_default();
    let found: Mutex<Vec<Found>> = Mutex::new(Vec::new());
    let done = Mutex::new(0usize);
    let branch = |&first: &usize| {
        let mut local = Vec::new();
        let result = run_branch(options, tracker, Some(first), |p, a| local.push((p.clone(), a.to_vec())));
        found
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .extend(local);
        let mut done = done.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        *done += 1;
        if let Some(t) = tracker {
            t.set_fraction(*done as f64 / firsts.len() as f64);
        }
        result
    };

    #[cfg(parallel_enum)]
    let results: Vec<(Statistics, bool)> = firsts.par_iter().map(branch).collect();
    #[cfg(not(parallel_enum))]
    let results: Vec<(Statistics, bool)> = firsts.iter().map(branch).collect();

    let mut statistics = Statistics::new();
    let mut cancelled = false;
    for (s, c) in &results {
        statistics.merge(s);
        cancelled |= c;
    }
    let mut found = found.into_inner().unwrap_or_else(|poisoned| poisoned.into_inner());
    found.sort_by(|a, b| a.0.cmp(&b.0));
    for (pairing, automorphisms) in &found {
        callback(pairing, automorphisms);
    }
    (statistics, cancelled)
}
