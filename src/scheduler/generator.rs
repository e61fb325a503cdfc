//! Schedule assembly.
//!
//! # Algorithm
//!
//! 1. Resolve the configuration into a [`TermContext`]; degenerate input
//!    yields an empty schedule.
//! 2. Starting from the term start, window each phase in order and
//!    materialize every date of the window.
//! 3. Advance the cursor to the window end; stop windowing once the cursor
//!    reaches the term end.
//! 4. Materialize the remaining dates through term end as ordinary days.
//!
//! A ceiling on the number of generated days bounds runaway configurations.
//!
//! # Complexity
//! O(d * s) where d = days in the term, s = slots per day.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::calendar::format_date;
use crate::models::{Phase, Schedule, TermConfig};

use super::context::TermContext;
use super::materialize::{DayClass, DayMaterializer, DayPosition};
use super::sequencer::LuCounters;
use super::window::compute_window;

/// Default ceiling on generated days.
pub const DEFAULT_MAX_DAYS: usize = 5000;
/// Default maximum term span in years.
pub const DEFAULT_MAX_SPAN_YEARS: u32 = 5;

/// Anchor used for week and day-in-week numbering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NumberingPolicy {
    /// Weeks run continuously from the term start.
    #[default]
    Continuous,
    /// Weeks restart at each phase window and at the trailing block.
    PhaseAnchored,
}

/// Term schedule generator.
///
/// Generation is a pure function of the configuration: every call starts
/// from zeroed LU counters and produces the same schedule.
///
/// # Example
///
/// ```
/// use term_schedule::models::{Slot, Subject, TermConfig};
/// use term_schedule::scheduler::ScheduleGenerator;
///
/// let config = TermConfig::new("2025-01-06", "2025-01-10")
///     .with_slot(Slot::new("P1", "Period 1", "09:00", "10:30"))
///     .with_subject(Subject::new("A", "Subject A", "red").with_total_lus(3))
///     .with_pattern("Monday", "P1", "A");
///
/// let schedule = ScheduleGenerator::new().generate(&config);
/// assert_eq!(schedule.len(), 5);
/// assert_eq!(schedule.days[0].slot("P1").unwrap().lu(), Some(1));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScheduleGenerator {
    numbering: NumberingPolicy,
    max_days: usize,
    max_span_years: u32,
}

impl ScheduleGenerator {
    /// Creates a generator with default options.
    pub fn new() -> Self {
        Self {
            numbering: NumberingPolicy::Continuous,
            max_days: DEFAULT_MAX_DAYS,
            max_span_years: DEFAULT_MAX_SPAN_YEARS,
        }
    }

    /// Sets the numbering policy.
    pub fn with_numbering(mut self, numbering: NumberingPolicy) -> Self {
        self.numbering = numbering;
        self
    }

    /// Sets the ceiling on generated days.
    pub fn with_max_days(mut self, max_days: usize) -> Self {
        self.max_days = max_days;
        self
    }

    /// Sets the maximum accepted term span.
    pub fn with_max_span_years(mut self, years: u32) -> Self {
        self.max_span_years = years;
        self
    }

    /// Generates the schedule with a fresh counter table.
    pub fn generate(&self, config: &TermConfig) -> Schedule {
        let mut counters = LuCounters::new();
        self.generate_with(config, &mut counters)
    }

    /// Generates the schedule using a caller-owned counter table.
    ///
    /// The table is reset first; after return it holds the final count of
    /// every tracked subject.
    pub fn generate_with(&self, config: &TermConfig, counters: &mut LuCounters) -> Schedule {
        counters.reset();

        let Some(context) = TermContext::from_config(config, self.max_span_years) else {
            return Schedule::new();
        };

        let mut run = Assembly {
            materializer: DayMaterializer::new(config, &context),
            counters,
            schedule: Schedule::new(),
            numbering: self.numbering,
            term_start: context.start,
            max_days: self.max_days,
        };

        let mut cursor = context.start;
        let mut phases_done = 0;
        for phase in &config.phases {
            if cursor >= context.end || run.schedule.truncated {
                break;
            }
            let window = compute_window(cursor, phase, context.end, |d| context.is_working_day(d));
            debug!(
                phase = %phase.tag(),
                start = %format_date(window.start),
                end = %format_date(window.end),
                assessment_days = window.assessment_days.len(),
                event_days = window.event_days.len(),
                "phase window"
            );

            for date in window.dates() {
                if !run.emit(date, window.classify(date), Some(phase), window.start) {
                    break;
                }
            }
            cursor = window.end;
            phases_done += 1;
        }

        let trailing_start = cursor;
        if !run.schedule.truncated {
            for date in cursor.iter_days().take_while(|d| *d <= context.end) {
                if !run.emit(date, DayClass::Regular, None, trailing_start) {
                    break;
                }
            }
        }

        if run.schedule.truncated {
            warn!(
                max_days = self.max_days,
                last = ?run.schedule.days.last().map(|d| format_date(d.date)),
                "schedule generation hit the day ceiling; output truncated"
            );
        }
        info!(
            days = run.schedule.len(),
            phases = phases_done,
            "schedule generated"
        );
        run.schedule
    }
}

impl Default for ScheduleGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Mutable state of one generation pass.
struct Assembly<'a> {
    materializer: DayMaterializer<'a>,
    counters: &'a mut LuCounters,
    schedule: Schedule,
    numbering: NumberingPolicy,
    term_start: NaiveDate,
    max_days: usize,
}

impl Assembly<'_> {
    /// Appends one day; returns `false` once the ceiling is reached.
    fn emit(
        &mut self,
        date: NaiveDate,
        class: DayClass,
        phase: Option<&Phase>,
        block_start: NaiveDate,
    ) -> bool {
        if self.schedule.days.len() >= self.max_days {
            self.schedule.truncated = true;
            return false;
        }
        let anchor = match self.numbering {
            NumberingPolicy::Continuous => self.term_start,
            NumberingPolicy::PhaseAnchored => block_start,
        };
        let record = self.materializer.materialize(
            date,
            class,
            phase,
            DayPosition::relative_to(anchor, date),
            self.counters,
        );
        self.schedule.days.push(record);
        true
    }
}
