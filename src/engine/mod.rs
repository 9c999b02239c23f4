// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Non-deterministic search engine.
//!
//! This module implements a backtracking search engine that runs predicates
//! in sequence. The engine coordinates with the context's [`Backtrack`]
//! implementation (usually a [`crate::trail::Trail`]) to restore state on
//! backtracking.
//!
//! # Architecture
//!
//! The engine maintains a stack of predicate execution states. Each stack entry tracks:
//! - Which predicate is executing
//! - Current round number (for predicates that execute multiple times)
//! - Choice mode state (whether we're trying alternatives)
//! - Current choice index (when in choice mode)
//!
//! Execution follows a WAM-like model:
//! 1. Call try_pred(round) on each predicate
//! 2. If Success: advance to next predicate
//! 3. If SuccessSamePredicate: increment round, stay at same predicate
//! 4. If Choices(n): enter choice mode, call retry_pred(round, 0..n-1)
//! 5. If Failure: backtrack to previous stack entry
//! 6. If Suspend: pause and return control to caller
//!
//! A program that enumerates all solutions ends with [`FailPredicate`];
//! running off the end of the program also backtracks.

pub mod predicate;

pub use predicate::{Backtrack, FailPredicate, Predicate, PredicateResult};

use tracing::trace;

/// Stack entry tracking the state of one predicate execution.
#[derive(Debug)]
struct StackEntry {
    /// Index of the predicate in the predicates list.
    predicate_index: usize,

    /// Current round number (incremented by SuccessSamePredicate).
    round: usize,

    /// Whether we're in choice mode (exploring alternatives).
    in_choice_mode: bool,

    /// Current choice being tried (when in_choice_mode is true).
    current_choice: usize,

    /// Total number of choices (when in_choice_mode is true).
    num_choices: usize,

    /// Context checkpoint for this stack entry.
    checkpoint: usize,
}

/// Search engine that coordinates predicate execution and backtracking.
pub struct SearchEngine<C> {
    predicates: Vec<Box<dyn Predicate<C> + Send>>,
    stack: Vec<StackEntry>,
    try_count: u64,
    retry_count: u64,
}

impl<C: Backtrack> SearchEngine<C> {
    /// Create a new search engine with the given predicates, tried in order.
    pub fn new(predicates: Vec<Box<dyn Predicate<C> + Send>>) -> Self {
        Self {
            predicates,
            stack: Vec::new(),
            try_count: 0,
            retry_count: 0,
        }
    }

    /// Run the search from the start.
    ///
    /// Consumes the engine and returns:
    /// - `Some(engine)` if a predicate suspended; call [`SearchEngine::resume`] to continue
    /// - `None` once the search is exhausted
    ///
    /// Solutions are reported through side effects on `ctx`.
    pub fn search(mut self, ctx: &mut C) -> Option<Self> {
        self.stack.clear();
        self.try_count = 0;
        self.retry_count = 0;
        if self.predicates.is_empty() {
            return None;
        }
        self.stack.push(StackEntry {
            predicate_index: 0,
            round: 0,
            in_choice_mode: false,
            current_choice: 0,
            num_choices: 0,
            checkpoint: ctx.checkpoint(),
        });
        self.run(ctx)
    }

    /// Continue a suspended search, backtracking out of the suspension.
    pub fn resume(self, ctx: &mut C) -> Option<Self> {
        self.run(ctx)
    }

    fn run(mut self, ctx: &mut C) -> Option<Self> {
        loop {
            let entry = self.stack.last_mut()?;
            ctx.rewind_to(entry.checkpoint);

            let result = if !entry.in_choice_mode {
                self.try_count += 1;
                let result = self.predicates[entry.predicate_index].try_pred(ctx, entry.round);
                // Whatever happens next, backtracking into this entry fails
                // unless it offered choices.
                entry.in_choice_mode = true;
                entry.current_choice = 0;
                entry.num_choices = 0;
                if let PredicateResult::Choices(n) = result {
                    entry.num_choices = n;
                    entry.checkpoint = ctx.checkpoint();
                    continue;
                }
                result
            } else {
                if entry.current_choice >= entry.num_choices {
                    self.stack.pop();
                    continue;
                }
                let choice = entry.current_choice;
                entry.current_choice += 1;
                self.retry_count += 1;
                match self.predicates[entry.predicate_index].retry_pred(ctx, entry.round, choice) {
                    PredicateResult::Choices(_) | PredicateResult::Suspend => {
                        trace!(
                            predicate = self.predicates[entry.predicate_index].name(),
                            "retry_pred cannot branch or suspend; treated as failure"
                        );
                        PredicateResult::Failure
                    }
                    other => other,
                }
            };

            match result {
                PredicateResult::Success => self.push_next(ctx, 1),
                PredicateResult::SuccessSamePredicate => self.push_next(ctx, 0),
                PredicateResult::Suspend => return Some(self),
                PredicateResult::Failure | PredicateResult::Choices(_) => {}
            }
        }
    }

    /// Push a stack entry for the next predicate (`step == 1`) or the next
    /// round of the current one (`step == 0`). Running off the end of the
    /// program counts as failure.
    fn push_next(&mut self, ctx: &mut C, step: usize) {
        let Some(current) = self.stack.last() else {
            return;
        };
        let predicate_index = current.predicate_index + step;
        let round = if step == 0 { current.round + 1 } else { 0 };
        if predicate_index >= self.predicates.len() {
            return;
        }
        self.stack.push(StackEntry {
            predicate_index,
            round,
            in_choice_mode: false,
            current_choice: 0,
            num_choices: 0,
            checkpoint: ctx.checkpoint(),
        });
    }

    /// Returns (try_count, retry_count): how many times predicates were
    /// tried and retried.
    pub fn statistics(&self) -> (u64, u64) {
        (self.try_count, self.retry_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Records every complete pick sequence.
    #[derive(Debug, Default)]
    struct Picks {
        current: Vec<usize>,
        found: Vec<Vec<usize>>,
    }

    impl Backtrack for Picks {
        fn checkpoint(&self) -> usize {
            self.current.len()
        }

        fn rewind_to(&mut self, checkpoint: usize) {
            self.current.truncate(checkpoint);
        }
    }

    /// Chooses `0..width` on each of `depth` rounds.
    #[derive(Debug)]
    struct Choose {
        width: usize,
        depth: usize,
    }

    impl Predicate<Picks> for Choose {
        fn try_pred(&mut self, _ctx: &mut Picks, round: usize) -> PredicateResult {
            if round == self.depth {
                PredicateResult::Success
            } else {
                PredicateResult::Choices(self.width)
            }
        }

        fn retry_pred(&mut self, ctx: &mut Picks, _round: usize, choice: usize) -> PredicateResult {
            ctx.current.push(choice);
            PredicateResult::SuccessSamePredicate
        }
    }

    #[derive(Debug)]
    struct Record;

    impl Predicate<Picks> for Record {
        fn try_pred(&mut self, ctx: &mut Picks, _round: usize) -> PredicateResult {
            let picks = ctx.current.clone();
            ctx.found.push(picks);
            PredicateResult::Success
        }
    }

    #[derive(Debug)]
    struct Suspend;

    impl Predicate<Picks> for Suspend {
        fn try_pred(&mut self, _ctx: &mut Picks, _round: usize) -> PredicateResult {
            PredicateResult::Suspend
        }
    }

    #[test]
    fn test_enumerates_all_sequences_in_order() {
        let mut ctx = Picks::default();
        let engine: SearchEngine<Picks> = SearchEngine::new(vec![
            Box::new(Choose { width: 3, depth: 2 }),
            Box::new(Record),
            Box::new(FailPredicate),
        ]);
        assert!(engine.search(&mut ctx).is_none());
        assert_eq!(ctx.found.len(), 9);
        assert_eq!(ctx.found[0], vec![0, 0]);
        assert_eq!(ctx.found[8], vec![2, 2]);
        assert!(ctx.current.is_empty());
    }

    #[test]
    fn test_suspend_and_resume() {
        let mut ctx = Picks::default();
        let engine: SearchEngine<Picks> = SearchEngine::new(vec![
            Box::new(Choose { width: 2, depth: 1 }),
            Box::new(Suspend),
        ]);
        let engine = engine.search(&mut ctx).unwrap();
        assert_eq!(ctx.current, vec![0]);
        let engine = engine.resume(&mut ctx).unwrap();
        assert_eq!(ctx.current, vec![1]);
        assert!(engine.resume(&mut ctx).is_none());
    }

    #[test]
    fn test_immediate_failure() {
        let mut ctx = Picks::default();
        let engine: SearchEngine<Picks> = SearchEngine::new(vec![Box::new(FailPredicate)]);
        assert!(engine.search(&mut ctx).is_none());
    }

    #[test]
    fn test_running_off_the_end_backtracks() {
        let mut ctx = Picks::default();
        let engine: SearchEngine<Picks> = SearchEngine::new(vec![Box::new(Choose { width: 2, depth: 2 }), Box::new(Record)]);
        assert!(engine.search(&mut ctx).is_none());
        assert_eq!(ctx.found.len(), 4);
    }

    #[test]
    fn test_empty_predicates() {
        let mut ctx = Picks::default();
        let engine: SearchEngine<Picks> = SearchEngine::new(vec![]);
        assert!(engine.search(&mut ctx).is_none());
    }
}
