//! Phase windowing.
//!
//! # Algorithm
//!
//! 1. The window runs from the cursor for `week_order` weeks, its end
//!    clamped to the term's last day.
//! 2. Collect the working days inside the half-open window.
//! 3. With `block = duration + event_days`:
//!    - enough working days: the last `block` days form the block; its first
//!      `duration` days are assessment days, the rest event days;
//!    - too few: the first `min(duration, available)` days are assessment
//!      days and whatever remains becomes event days.
//!
//! Assessment always wins over events when the window is short.

use std::collections::BTreeSet;

use chrono::{Days, NaiveDate};

use crate::models::Phase;

use super::materialize::DayClass;

/// Result of windowing one phase.
#[derive(Debug, Clone, PartialEq)]
pub struct PhaseWindow {
    /// First date of the window (inclusive).
    pub start: NaiveDate,
    /// End of the window (exclusive); the next phase's cursor.
    pub end: NaiveDate,
    /// Dates reserved for assessment.
    pub assessment_days: BTreeSet<NaiveDate>,
    /// Dates reserved for the event.
    pub event_days: BTreeSet<NaiveDate>,
}

impl PhaseWindow {
    /// Classification of a date inside this window.
    pub fn classify(&self, date: NaiveDate) -> DayClass {
        if self.assessment_days.contains(&date) {
            DayClass::Assessment
        } else if self.event_days.contains(&date) {
            DayClass::Event
        } else {
            DayClass::Regular
        }
    }

    /// Dates covered by the window, in order.
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> {
        let end = self.end;
        self.start.iter_days().take_while(move |d| *d < end)
    }
}

/// Computes the window of `phase` starting at `cursor`.
///
/// `is_working` must reject both inactive weekdays and holidays.
pub fn compute_window<F>(cursor: NaiveDate, phase: &Phase, term_end: NaiveDate, is_working: F) -> PhaseWindow
where
    F: Fn(NaiveDate) -> bool,
{
    let nominal_end = cursor
        .checked_add_days(Days::new(u64::from(phase.week_order) * 7))
        .unwrap_or(term_end);
    let end = nominal_end.min(term_end).max(cursor);

    let working: Vec<NaiveDate> = cursor
        .iter_days()
        .take_while(|d| *d < end)
        .filter(|d| is_working(*d))
        .collect();

    let duration = phase.duration as usize;
    let block = phase.block_len() as usize;

    let (assessment, event): (&[NaiveDate], &[NaiveDate]) = if working.len() >= block {
        let tail = &working[working.len() - block..];
        tail.split_at(duration.min(tail.len()))
    } else {
        working.split_at(duration.min(working.len()))
    };

    PhaseWindow {
        start: cursor,
        end,
        assessment_days: assessment.iter().copied().collect(),
        event_days: event.iter().copied().collect(),
    }
}
