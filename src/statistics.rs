// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Statistics
//!
//! Counters are stored in the census context and incremented by the
//! predicates as the search runs, or by counting predicates placed in the
//! program.

use std::fmt;

use strum::{EnumCount, IntoEnumIterator};
use strum_macros::{EnumCount as EnumCountMacro, EnumIter, IntoStaticStr};

use crate::engine::{Backtrack, Predicate, PredicateResult};

#[derive(Debug, EnumCountMacro, EnumIter, IntoStaticStr, Copy, Clone, PartialEq, Eq)]
#[repr(u8)]
pub enum Counters {
    /// Slots given a partner or declared boundary.
    Extensions,
    /// Partial pairings cut because a relabelling makes them smaller.
    PartialNotCanonical,
    /// Complete pairings that are not canonical.
    NotCanonical,
    /// Complete pairings with the wrong boundary.
    WrongBoundary,
    /// Complete pairings holding a bad subgraph.
    BadSubgraph,
    /// Pairings reported.
    Found,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Statistics {
    stats: [u64; Counters::COUNT],
}

impl Statistics {
    pub fn new() -> Self {
        Statistics::default()
    }

    /// A predicate that increments the given counter whenever a condition
    /// holds (or always).
    pub fn counting_predicate<C: HasStatistics + 'static>(
        counter: Counters,
        filter: Option<fn(&C) -> bool>,
    ) -> Box<dyn Predicate<C> + Send> {
        Box::new(CountingPredicate {
            filter: filter.unwrap_or(|_ctx| true),
            counter,
        })
    }

    pub fn increment(&mut self, counter: Counters) {
        self.stats[counter as usize] += 1;
    }

    pub fn get(&self, counter: Counters) -> u64 {
        self.stats[counter as usize]
    }

    /// Adds another run's counters into this one.
    pub fn merge(&mut self, other: &Statistics) {
        for (mine, theirs) in self.stats.iter_mut().zip(other.stats.iter()) {
            *mine += theirs;
        }
    }
}

impl fmt::Display for Statistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, counter) in Counters::iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}={}", <&'static str>::from(counter), self.get(counter))?;
        }
        Ok(())
    }
}

/// Contexts that carry statistics.
pub trait HasStatistics: Backtrack {
    fn statistics_mut(&mut self) -> &mut Statistics;
}

struct CountingPredicate<C> {
    filter: fn(&C) -> bool,
    counter: Counters,
}

impl<C> fmt::Debug for CountingPredicate<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CountingPredicate").field("counter", &self.counter).finish()
    }
}

impl<C: HasStatistics> Predicate<C> for CountingPredicate<C> {
    fn try_pred(&mut self, ctx: &mut C, _round: usize) -> PredicateResult {
        if (self.filter)(ctx) {
            ctx.statistics_mut().increment(self.counter);
        }
        PredicateResult::Success
    }

    fn name(&self) -> &str {
        self.counter.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_and_display() {
        let mut a = Statistics::new();
        a.increment(Counters::Found);
        let mut b = Statistics::new();
        b.increment(Counters::Found);
        b.increment(Counters::Extensions);
        a.merge(&b);
        assert_eq!(a.get(Counters::Found), 2);
        assert_eq!(a.get(Counters::Extensions), 1);
        assert!(a.to_string().contains("Found=2"));
    }
}
