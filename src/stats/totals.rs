//! Program-level day counts.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::calendar::WEEKDAY_NAMES;
use crate::models::{DayStatus, Schedule};

/// Day counts across the whole term.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgramTotals {
    /// Every generated day.
    pub total_days: usize,
    /// Days on inactive weekdays.
    pub rest_days: usize,
    /// Rest days per weekday name (Monday first, non-zero only).
    pub rest_days_by_weekday: IndexMap<String, usize>,
    /// Holidays.
    pub holidays: usize,
    /// Blocked days.
    pub blocked_days: usize,
    /// Assessment days.
    pub assessment_days: usize,
    /// Event days.
    pub event_days: usize,
    /// Ordinary working days.
    pub working_days: usize,
    /// Working days with at least one lesson still delivering an LU (or an
    /// untracked subject).
    pub learning_days: usize,
}

impl ProgramTotals {
    /// Computes totals from a schedule.
    pub fn calculate(schedule: &Schedule) -> Self {
        let mut totals = Self {
            total_days: schedule.len(),
            ..Default::default()
        };
        let mut rest_by_day = [0usize; 7];

        for day in schedule.iter() {
            match day.status {
                DayStatus::Working => {
                    totals.working_days += 1;
                    if day.is_learning_day() {
                        totals.learning_days += 1;
                    }
                }
                DayStatus::Weekend => {
                    totals.rest_days += 1;
                    if let Some(idx) = WEEKDAY_NAMES.iter().position(|n| *n == day.weekday) {
                        rest_by_day[idx] += 1;
                    }
                }
                DayStatus::Holiday => totals.holidays += 1,
                DayStatus::Blocked => totals.blocked_days += 1,
                DayStatus::Ca => totals.assessment_days += 1,
                DayStatus::Event => totals.event_days += 1,
            }
        }

        totals.rest_days_by_weekday = WEEKDAY_NAMES
            .iter()
            .zip(rest_by_day)
            .filter(|(_, count)| *count > 0)
            .map(|(name, count)| (name.to_string(), count))
            .collect();
        totals
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Phase, Slot, Subject, TermConfig};
    use crate::scheduler::ScheduleGenerator;

    #[test]
    fn test_totals_basic() {
        let config = TermConfig::new("2025-01-06", "2025-01-19")
            .with_slot(Slot::new("P1", "Period 1", "09:00", "10:30"))
            .with_subject(Subject::new("A", "A", "#f00").with_total_lus(1))
            .with_pattern("Monday", "P1", "A")
            .with_pattern("Tuesday", "P1", "A")
            .with_holiday("2025-01-14", "Festival")
            .with_phase(Phase::new("CA1", "CA 1", 1).with_duration(1).with_event_days(1));
        let schedule = ScheduleGenerator::new().generate(&config);
        let totals = ProgramTotals::calculate(&schedule);

        assert_eq!(totals.total_days, 14);
        assert_eq!(totals.rest_days, 4);
        assert_eq!(totals.rest_days_by_weekday["Saturday"], 2);
        assert_eq!(totals.rest_days_by_weekday["Sunday"], 2);
        assert!(!totals.rest_days_by_weekday.contains_key("Monday"));
        assert_eq!(totals.holidays, 1);
        assert_eq!(totals.assessment_days, 1);
        assert_eq!(totals.event_days, 1);
        assert_eq!(totals.working_days, 7);
        // Mon 6 → LU 1; Tue 7 → completed; Mon 13 → completed; Tue 14 holiday
        assert_eq!(totals.learning_days, 1);
        assert_eq!(totals.blocked_days, 0);
    }

    #[test]
    fn test_totals_empty() {
        let totals = ProgramTotals::calculate(&Schedule::new());
        assert_eq!(totals, ProgramTotals::default());
    }
}
