// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Predicate trait for non-deterministic search.
//!
//! The search engine works by trying predicates in sequence. Each predicate
//! represents a choice point in the search space. Predicates can succeed,
//! fail, or offer several alternatives.
//!
//! # Example
//!
//! ```
//! use normal_kernel::engine::{Backtrack, Predicate, PredicateResult};
//!
//! #[derive(Debug, Default)]
//! struct Picks(Vec<usize>);
//!
//! impl Backtrack for Picks {
//!     fn checkpoint(&self) -> usize {
//!         self.0.len()
//!     }
//!     fn rewind_to(&mut self, checkpoint: usize) {
//!         self.0.truncate(checkpoint);
//!     }
//! }
//!
//! #[derive(Debug)]
//! struct PickOne;
//!
//! impl Predicate<Picks> for PickOne {
//!     fn try_pred(&mut self, _ctx: &mut Picks, _round: usize) -> PredicateResult {
//!         PredicateResult::Choices(2)
//!     }
//!
//!     fn retry_pred(&mut self, ctx: &mut Picks, _round: usize, choice: usize) -> PredicateResult {
//!         ctx.0.push(choice);
//!         PredicateResult::Success
//!     }
//! }
//! ```

use std::fmt::Debug;

/// Result of attempting a predicate.
///
/// Predicates can return:
/// - `Success`: Move to next predicate in the sequence
/// - `SuccessSamePredicate`: Stay at same predicate, increment round (for iterative predicates)
/// - `Failure`: Backtrack to previous predicate
/// - `Choices(n)`: Predicate has n choices to explore via retry_pred
/// - `Suspend`: Pause execution for inspection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PredicateResult {
    /// Predicate succeeded. Move to next predicate in sequence.
    Success,

    /// Predicate succeeded but stay at same predicate with next round.
    /// Allows a single predicate to execute multiple times (e.g., once per slot).
    SuccessSamePredicate,

    /// Predicate has no (more) valid choices. Backtrack to previous predicate.
    Failure,

    /// Predicate has multiple choices to explore.
    /// Engine will call retry_pred(round, choice) for each choice in 0..n.
    Choices(usize),

    /// Suspend execution. Engine returns control with state preserved.
    Suspend,
}

/// State that the engine can checkpoint and restore.
///
/// The engine records a checkpoint before each predicate call and rewinds
/// to it before trying the next alternative.
pub trait Backtrack {
    fn checkpoint(&self) -> usize;
    fn rewind_to(&mut self, checkpoint: usize);
}

/// Trait for search predicates in the non-deterministic engine.
///
/// Each predicate represents a choice point in the search. The engine
/// calls `try_pred` to attempt the predicate for the first time, and
/// `retry_pred` on backtracking to try alternative choices.
///
/// # Lifecycle
///
/// 1. Engine calls `try_pred` when first encountering the predicate
/// 2. If Success: engine advances to next predicate
/// 3. If Failure: engine backtracks to previous predicate
/// 4. On backtrack: engine calls `retry_pred` to try next option
/// 5. Repeat until Success (advance) or Failure (backtrack)
pub trait Predicate<C>: Debug {
    /// Try this predicate for a given round.
    ///
    /// The round starts at 0 and increments each time the predicate returns
    /// `SuccessSamePredicate`.
    fn try_pred(&mut self, ctx: &mut C, round: usize) -> PredicateResult;

    /// Retry this predicate with a specific choice.
    ///
    /// Called after try_pred returns Choices(n), for each choice in 0..n,
    /// with the context already rewound to its state before the choice.
    /// Returning `Choices` or `Suspend` here is treated as `Failure`.
    fn retry_pred(&mut self, _ctx: &mut C, _round: usize, _choice: usize) -> PredicateResult {
        PredicateResult::Failure
    }

    /// Name for debugging output.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

/// A predicate that always fails, ending a program that enumerates every
/// solution by exhausting the search.
#[derive(Debug, Clone, Copy, Default)]
pub struct FailPredicate;

impl<C> Predicate<C> for FailPredicate {
    fn try_pred(&mut self, _ctx: &mut C, _round: usize) -> PredicateResult {
        PredicateResult::Failure
    }
}
