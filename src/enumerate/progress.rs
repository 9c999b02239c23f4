// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Progress reporting and cooperative cancellation for long enumerations.
//!
//! A [`ProgressTracker`] is a cheap cloneable handle. The enumerating thread
//! updates it; any number of observers may poll it or request cancellation.
//! Cancellation is checked at coarse intervals only.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Debug, Default)]
struct ProgressState {
    cancelled: AtomicBool,
    finished: AtomicBool,
    /// Completion in thousandths.
    permille: AtomicU32,
    stage: Mutex<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ProgressTracker {
    state: Arc<ProgressState>,
}

impl ProgressTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation. The enumeration stops at its next poll.
    pub fn cancel(&self) {
        self.state.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.state.cancelled.load(Ordering::Relaxed)
    }

    /// Records the completed fraction, clamped to `[0, 1]`.
    pub fn set_fraction(&self, fraction: f64) {
        let permille = (fraction.clamp(0.0, 1.0) * 1000.0).round() as u32;
        self.state.permille.store(permille, Ordering::Relaxed);
    }

    pub fn fraction(&self) -> f64 {
        self.state.permille.load(Ordering::Relaxed) as f64 / 1000.0
    }

    pub fn set_stage(&self, stage: &str) {
        let mut guard = self
            .state
            .stage
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        guard.clear();
        guard.push_str(stage);
    }

    pub fn stage(&self) -> String {
        self.state
            .stage
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn set_finished(&self) {
        self.set_fraction(1.0);
        self.state.finished.store(true, Ordering::Release);
    }

    pub fn is_finished(&self) -> bool {
        self.state.finished.load(Ordering::Acquire)
    }
}

/// Whether an optional tracker has been cancelled.
pub(crate) fn cancelled(tracker: Option<&ProgressTracker>) -> bool {
    tracker.is_some_and(ProgressTracker::is_cancelled)
}
