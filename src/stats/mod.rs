//! Schedule statistics.
//!
//! Pure reducers over a generated [`Schedule`](crate::models::Schedule);
//! none of them mutate their input.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Program totals | Day counts per status, plus learning days |
//! | Utilization | Pattern slots available vs. slots delivering an LU |
//! | Phasing | Planned cumulative LUs per phase vs. LUs delivered before its first assessment day |
//!
//! "Completed" occupancies (past a subject's last LU) never count as
//! learning: they are excluded from learning days and utilization.

mod phasing;
mod totals;
mod utilization;

pub use phasing::{PhaseCheckpoint, SubjectPhasing};
pub use totals::ProgramTotals;
pub use utilization::SubjectUtilization;
