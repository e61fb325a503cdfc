//! Term planning domain models.
//!
//! Provides the input configuration of an academic term and the day-by-day
//! schedule generated from it.
//!
//! # Domain Mappings
//!
//! | term-schedule | Meaning |
//! |---------------|---------|
//! | Slot | Recurring daily period ("Period 1, 09:00–10:30") |
//! | Subject | Taught subject with a learning-unit budget |
//! | Module | Colored LU sub-range of a subject |
//! | Phase | Window of weeks ending in assessment/event days |
//! | DayRecord | One calendar date with every slot resolved |

mod schedule;
mod term;

pub use schedule::{
    DayRecord, DayStatus, LuProgress, OccupancyKind, Schedule, SlotOccupancy, ASSESSMENT_COLOR,
    COMPLETED_COLOR, EVENT_COLOR,
};
pub use term::{Holiday, Module, Phase, Slot, Subject, TermConfig, WeeklyPattern};
