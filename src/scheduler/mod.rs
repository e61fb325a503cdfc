//! Schedule generation.
//!
//! Turns a [`TermConfig`](crate::models::TermConfig) into a day-by-day,
//! slot-by-slot [`Schedule`](crate::models::Schedule).
//!
//! # Pipeline
//!
//! - [`compute_window`]: carves each phase's window and picks its
//!   assessment and event days.
//! - [`DayMaterializer`]: resolves a single date's status and slots.
//! - [`LuCounters`]: per-subject learning-unit counters for one run.
//! - [`ScheduleGenerator`]: walks the term phase by phase, then fills the
//!   trailing instructional block.
//!
//! Generation is synchronous and deterministic; there is no state shared
//! between runs.

mod context;
mod generator;
mod materialize;
mod sequencer;
mod window;

pub use context::TermContext;
pub use generator::{NumberingPolicy, ScheduleGenerator, DEFAULT_MAX_DAYS, DEFAULT_MAX_SPAN_YEARS};
pub use materialize::{DayClass, DayMaterializer, DayPosition, DEFAULT_HOLIDAY_REASON, REST_DAY_REASON};
pub use sequencer::LuCounters;
pub use window::{compute_window, PhaseWindow};
