//! Per-subject slot utilization.

use chrono::Datelike;
use serde::{Deserialize, Serialize};

use crate::models::{DayStatus, Schedule, TermConfig};

/// Pattern slots available to a tracked subject vs. slots that delivered an LU.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectUtilization {
    /// Subject identifier.
    pub subject_id: String,
    /// Subject display name.
    pub subject_name: String,
    /// Slots the weekly pattern assigns to the subject on teaching days
    /// (working, assessment and event days).
    pub available: usize,
    /// Slots actually delivering an LU.
    pub utilized: usize,
    /// `available - utilized`, floored at zero.
    pub unutilized: usize,
}

impl SubjectUtilization {
    /// Computes utilization for every tracked subject, in roster order.
    pub fn calculate(config: &TermConfig, schedule: &Schedule) -> Vec<Self> {
        config
            .subjects
            .iter()
            .filter(|s| s.is_tracked())
            .map(|subject| {
                let mut available = 0;
                let mut utilized = 0;
                for day in schedule.iter() {
                    let teaching = match day.status {
                        DayStatus::Working | DayStatus::Ca | DayStatus::Event => true,
                        DayStatus::Holiday | DayStatus::Weekend | DayStatus::Blocked => false,
                    };
                    if !teaching {
                        continue;
                    }
                    let weekday = day.date.weekday();
                    available += config
                        .slots
                        .iter()
                        .filter(|slot| {
                            config.weekly_pattern.subject_for(weekday, &slot.id)
                                == Some(subject.id.as_str())
                        })
                        .count();
                    utilized += day
                        .slots
                        .values()
                        .filter(|occ| occ.is_subject(&subject.id) && occ.is_learning())
                        .count();
                }
                Self {
                    subject_id: subject.id.clone(),
                    subject_name: subject.name.clone(),
                    available,
                    utilized,
                    unutilized: available.saturating_sub(utilized),
                }
            })
            .collect()
    }

    /// Fraction of available slots utilized (0.0..1.0).
    pub fn rate(&self) -> f64 {
        if self.available == 0 {
            0.0
        } else {
            self.utilized as f64 / self.available as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Phase, Slot, Subject};
    use crate::scheduler::ScheduleGenerator;

    fn config() -> TermConfig {
        TermConfig::new("2025-01-06", "2025-01-17")
            .with_slot(Slot::new("P1", "Period 1", "09:00", "10:30"))
            .with_slot(Slot::new("P2", "Period 2", "10:45", "12:15"))
            .with_subject(Subject::new("A", "Alpha", "#f00").with_total_lus(3))
            .with_subject(Subject::new("B", "Beta", "#0f0").with_total_lus(50))
            .with_subject(Subject::new("PE", "Sport", "#00f"))
            .with_pattern("Monday", "P1", "A")
            .with_pattern("Wednesday", "P1", "A")
            .with_pattern("Friday", "P2", "B")
            .with_pattern("Tuesday", "P2", "PE")
    }

    #[test]
    fn test_utilization_with_overflow() {
        let cfg = config();
        let schedule = ScheduleGenerator::new().generate(&cfg);
        let util = SubjectUtilization::calculate(&cfg, &schedule);

        // Untracked PE is skipped
        assert_eq!(util.len(), 2);
        let a = &util[0];
        assert_eq!(a.subject_id, "A");
        assert_eq!(a.available, 4);
        assert_eq!(a.utilized, 3); // 4th occupancy is "completed"
        assert_eq!(a.unutilized, 1);
        assert!((a.rate() - 0.75).abs() < 1e-10);

        let b = &util[1];
        assert_eq!((b.available, b.utilized, b.unutilized), (2, 2, 0));
    }

    #[test]
    fn test_utilization_counts_assessment_losses() {
        let cfg = config().with_phase(Phase::new("CA1", "CA 1", 1).with_duration(1));
        let schedule = ScheduleGenerator::new().generate(&cfg);
        let util = SubjectUtilization::calculate(&cfg, &schedule);

        // Friday 10th is CA: B loses one slot
        let b = &util[1];
        assert_eq!((b.available, b.utilized, b.unutilized), (2, 1, 1));
        for u in &util {
            assert_eq!(u.utilized + u.unutilized, u.available);
        }
    }
}
