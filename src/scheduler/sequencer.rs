//! Learning-unit sequencing.

use std::collections::HashMap;

use crate::models::{LuProgress, Subject};

/// Per-subject LU counters for one generation run.
///
/// Counters only grow while a schedule is being built. A run must start
/// from a zeroed table; [`ScheduleGenerator`](super::ScheduleGenerator)
/// resets any table it is handed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LuCounters {
    counts: HashMap<String, u32>,
}

impl LuCounters {
    /// Creates an empty counter table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Zeroes every counter.
    pub fn reset(&mut self) {
        self.counts.clear();
    }

    /// Current count for a subject (0 if never advanced).
    pub fn current(&self, subject_id: &str) -> u32 {
        self.counts.get(subject_id).copied().unwrap_or(0)
    }

    /// Increments a subject's counter and returns the new value.
    pub fn advance(&mut self, subject_id: &str) -> u32 {
        let count = self.counts.entry(subject_id.to_string()).or_insert(0);
        *count += 1;
        *count
    }

    /// Consumes one occupancy of `subject`.
    ///
    /// Untracked subjects never touch the counter. Tracked subjects receive
    /// the next LU number until `total_lus` is exhausted, then `Completed`.
    pub fn next_progress(&mut self, subject: &Subject) -> LuProgress {
        if !subject.is_tracked() {
            return LuProgress::Untracked;
        }
        let n = self.advance(&subject.id);
        if n <= subject.total_lus {
            LuProgress::Unit(n)
        } else {
            LuProgress::Completed
        }
    }
}
