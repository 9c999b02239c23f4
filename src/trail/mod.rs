// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Trail-based backtracking over an array of slot values.
//!
//! Every assignment made through the trail records the slot's old value, so
//! rewinding to a checkpoint restores the array in time proportional to the
//! number of changes undone.

/// A single entry in the trail, recording one state change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct TrailEntry {
    /// Index of the slot that changed.
    slot: usize,
    /// The value before the change.
    old_value: usize,
}

/// The trail of changes made to a slot array.
#[derive(Debug, Clone, Default)]
pub struct Trail {
    /// All trail entries recorded so far
    entries: Vec<TrailEntry>,
    /// Entries below this position can never be undone
    frozen: usize,
}

impl Trail {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `values[slot]`, recording the old value.
    pub fn assign(&mut self, values: &mut [usize], slot: usize, value: usize) {
        self.entries.push(TrailEntry {
            slot,
            old_value: values[slot],
        });
        values[slot] = value;
    }

    /// Sets `values[slot]` only if it differs, returning whether it changed.
    pub fn maybe_assign(&mut self, values: &mut [usize], slot: usize, value: usize) -> bool {
        if values[slot] == value {
            return false;
        }
        self.assign(values, slot, value);
        true
    }

    /// Undoes every change recorded after `checkpoint`, never going below
    /// the frozen point.
    pub fn rewind_to(&mut self, values: &mut [usize], checkpoint: usize) {
        let target = checkpoint.max(self.frozen);
        while self.entries.len() > target {
            if let Some(entry) = self.entries.pop() {
                values[entry.slot] = entry.old_value;
            }
        }
    }

    /// Makes the current state permanent: later rewinds stop here.
    pub fn freeze(&mut self) {
        self.frozen = self.entries.len();
    }

    /// Current position, usable as a checkpoint.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trail_new() {
        let trail = Trail::new();
        assert_eq!(trail.len(), 0);
        assert!(trail.is_empty());
    }

    #[test]
    fn test_assign_and_rewind() {
        let mut values = vec![0; 4];
        let mut trail = Trail::new();
        trail.assign(&mut values, 1, 10);
        let checkpoint = trail.len();
        trail.assign(&mut values, 2, 20);
        trail.assign(&mut values, 1, 30);
        assert_eq!(values, vec![0, 30, 20, 0]);

        trail.rewind_to(&mut values, checkpoint);
        assert_eq!(values, vec![0, 10, 0, 0]);
        trail.rewind_to(&mut values, 0);
        assert_eq!(values, vec![0; 4]);
    }

    #[test]
    fn test_maybe_assign() {
        let mut values = vec![5; 2];
        let mut trail = Trail::new();
        assert!(!trail.maybe_assign(&mut values, 0, 5));
        assert!(trail.is_empty());
        assert!(trail.maybe_assign(&mut values, 0, 6));
        assert_eq!(trail.len(), 1);
    }

    #[test]
    fn test_freeze() {
        let mut values = vec![0; 3];
        let mut trail = Trail::new();
        trail.assign(&mut values, 0, 1);
        trail.freeze();
        trail.assign(&mut values, 1, 2);

        trail.rewind_to(&mut values, 0);
        assert_eq!(values, vec![1, 0, 0]);
        assert_eq!(trail.len(), 1);
    }
}
