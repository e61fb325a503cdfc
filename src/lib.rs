//! Academic term planner.
//!
//! Turns a term configuration (date range, working weekdays, period slots,
//! subjects with learning-unit budgets, a weekly pattern, holidays and
//! assessment phases) into a deterministic day-by-day, slot-by-slot
//! schedule, and derives statistics and spreadsheet exports from it.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `TermConfig`, `Subject`, `Slot`, `Phase`,
//!   `Schedule`, `DayRecord`, `SlotOccupancy`
//! - **`scheduler`**: Phase windowing, LU sequencing and day materialization
//! - **`stats`**: Program totals, subject utilization and phasing checkpoints
//! - **`export`**: Report and matrix workbooks
//! - **`import`**: Workbook import with header aliases
//! - **`calendar`**: Date formatting and lenient date parsing
//! - **`workbook`**: In-memory sheet/cell model shared by import and export
//! - **`validation`**: Input integrity checks (duplicate IDs, dangling references)
//!
//! # Example
//!
//! ```
//! use term_schedule::models::{Phase, Slot, Subject, TermConfig};
//! use term_schedule::scheduler::ScheduleGenerator;
//! use term_schedule::stats::ProgramTotals;
//!
//! let config = TermConfig::new("2025-01-06", "2025-03-28")
//!     .with_slot(Slot::new("P1", "Period 1", "09:00", "10:30"))
//!     .with_subject(Subject::new("MATH", "Mathematics", "#2563EB").with_total_lus(24))
//!     .with_pattern("Monday", "P1", "MATH")
//!     .with_phase(Phase::new("CA1", "CA 1", 6).with_duration(2));
//!
//! let schedule = ScheduleGenerator::new().generate(&config);
//! let totals = ProgramTotals::calculate(&schedule);
//! assert_eq!(totals.total_days, schedule.len());
//! assert_eq!(totals.assessment_days, 2);
//! ```

pub mod calendar;
pub mod error;
pub mod export;
pub mod import;
pub mod models;
pub mod scheduler;
pub mod stats;
pub mod validation;
pub mod workbook;

pub use error::{ConfigError, ImportError};
