//! Day materialization: one calendar date → one [`DayRecord`].
//!
//! # Precedence
//! 1. Holiday (always wins)
//! 2. Inactive weekday → weekend ("Rest Day")
//! 3. Assessment day → every slot is assessment
//! 4. Event day → every slot is event
//! 5. Ordinary working day → weekly pattern, with LU sequencing for
//!    tracked subjects

use chrono::{Datelike, NaiveDate};
use indexmap::IndexMap;

use crate::calendar::day_name;
use crate::models::{
    DayRecord, DayStatus, LuProgress, Phase, SlotOccupancy, Subject, TermConfig, COMPLETED_COLOR,
};

use super::context::TermContext;
use super::sequencer::LuCounters;

/// Reason shown for a holiday without a configured reason.
pub const DEFAULT_HOLIDAY_REASON: &str = "Holiday";
/// Reason shown on inactive weekdays.
pub const REST_DAY_REASON: &str = "Rest Day";

/// Classification of a date by the phase windower.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DayClass {
    /// Ordinary instructional date.
    #[default]
    Regular,
    /// Reserved for assessment.
    Assessment,
    /// Reserved for an event.
    Event,
}

/// Week/day-in-week position of a date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayPosition {
    /// Week number (1-based).
    pub week: u32,
    /// Day within the week (1..=7).
    pub day: u32,
}

impl DayPosition {
    /// Position of `date` counted from `anchor`.
    pub fn relative_to(anchor: NaiveDate, date: NaiveDate) -> Self {
        let offset = (date - anchor).num_days().max(0) as u32;
        Self {
            week: offset / 7 + 1,
            day: offset % 7 + 1,
        }
    }
}

/// Builds day records against one configuration.
#[derive(Debug, Clone, Copy)]
pub struct DayMaterializer<'a> {
    config: &'a TermConfig,
    context: &'a TermContext,
}

impl<'a> DayMaterializer<'a> {
    /// Creates a materializer.
    pub fn new(config: &'a TermConfig, context: &'a TermContext) -> Self {
        Self { config, context }
    }

    /// Materializes one date.
    ///
    /// `counters` advances once per tracked-subject occupancy on ordinary
    /// working days, in slot definition order.
    pub fn materialize(
        &self,
        date: NaiveDate,
        class: DayClass,
        phase: Option<&Phase>,
        position: DayPosition,
        counters: &mut LuCounters,
    ) -> DayRecord {
        let phase_label = phase.map(|p| p.label.as_str()).unwrap_or_default();

        let (status, reason, slots) = if let Some(reason) = self.context.holiday_reason(date) {
            let reason = if reason.trim().is_empty() {
                DEFAULT_HOLIDAY_REASON.to_string()
            } else {
                reason.to_string()
            };
            (DayStatus::Holiday, Some(reason), self.fill(SlotOccupancy::empty))
        } else if !self.context.is_active_weekday(date) {
            (
                DayStatus::Weekend,
                Some(REST_DAY_REASON.to_string()),
                self.fill(SlotOccupancy::empty),
            )
        } else {
            match class {
                DayClass::Assessment => (
                    DayStatus::Ca,
                    Some(phase_label.to_string()),
                    self.fill(|| SlotOccupancy::assessment(phase_label)),
                ),
                DayClass::Event => {
                    let reason = format!("Event ({phase_label})");
                    let slots = self.fill(|| SlotOccupancy::event(reason.as_str()));
                    (DayStatus::Event, Some(reason), slots)
                }
                DayClass::Regular => (DayStatus::Working, None, self.lessons(date, counters)),
            }
        };

        DayRecord {
            date,
            weekday: day_name(date).to_string(),
            week_number: position.week,
            day_in_week: position.day,
            phase_id: phase.map(|p| p.tag().to_string()),
            status,
            reason,
            slots,
        }
    }

    fn fill<F>(&self, make: F) -> IndexMap<String, SlotOccupancy>
    where
        F: Fn() -> SlotOccupancy,
    {
        self.config
            .slots
            .iter()
            .map(|slot| (slot.id.clone(), make()))
            .collect()
    }

    fn lessons(&self, date: NaiveDate, counters: &mut LuCounters) -> IndexMap<String, SlotOccupancy> {
        let weekday = date.weekday();
        self.config
            .slots
            .iter()
            .map(|slot| {
                let occupancy = self
                    .config
                    .weekly_pattern
                    .subject_for(weekday, &slot.id)
                    .and_then(|subject_id| self.config.subject(subject_id))
                    .map(|subject| lesson(subject, counters))
                    .unwrap_or_else(SlotOccupancy::empty);
                (slot.id.clone(), occupancy)
            })
            .collect()
    }
}

/// Occupancy for one lesson of `subject`, consuming an LU if tracked.
fn lesson(subject: &Subject, counters: &mut LuCounters) -> SlotOccupancy {
    match counters.next_progress(subject) {
        LuProgress::Untracked => SlotOccupancy::subject(
            &subject.id,
            &subject.name,
            &subject.color,
            LuProgress::Untracked,
        )
        .with_course_id(subject.course_id.clone()),
        LuProgress::Unit(n) => SlotOccupancy::subject(
            &subject.id,
            format!("{} - LU {n}", subject.name),
            subject.color_for_lu(n),
            LuProgress::Unit(n),
        )
        .with_course_id(subject.course_id_for_lu(n).map(str::to_string)),
        LuProgress::Completed => SlotOccupancy::subject(
            &subject.id,
            format!("{} - completed", subject.name),
            COMPLETED_COLOR,
            LuProgress::Completed,
        )
        .with_course_id(subject.course_id.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Module, OccupancyKind, Slot};

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn config() -> TermConfig {
        TermConfig::new("2025-01-06", "2025-01-31")
            .with_slot(Slot::new("P1", "Period 1", "09:00", "10:30"))
            .with_slot(Slot::new("P2", "Period 2", "10:45", "12:15"))
            .with_slot(Slot::new("P3", "Period 3", "13:00", "14:30"))
            .with_subject(
                Subject::new("MATH", "Math", "#00f")
                    .with_total_lus(2)
                    .with_module(Module::new("Numbers", 1, 1, "#f00"))
                    .with_course_id("C-MATH")
                    .with_lu_course_id(2, "C-MATH-2"),
            )
            .with_subject(Subject::new("PE", "Sport", "#0f0").with_course_id("C-PE"))
            .with_pattern("Monday", "P1", "MATH")
            .with_pattern("Monday", "P2", "MATH")
            .with_pattern("Monday", "P3", "PE")
            .with_pattern("Tuesday", "P1", "GHOST")
            .with_holiday("2025-01-07", "")
    }

    fn pos() -> DayPosition {
        DayPosition { week: 1, day: 1 }
    }

    #[test]
    fn test_working_day_lessons() {
        let cfg = config();
        let ctx = TermContext::from_config(&cfg, 5).unwrap();
        let m = DayMaterializer::new(&cfg, &ctx);
        let mut counters = LuCounters::new();

        let day = m.materialize(ymd(2025, 1, 6), DayClass::Regular, None, pos(), &mut counters);
        assert_eq!(day.status, DayStatus::Working);
        assert_eq!(day.weekday, "Monday");
        assert!(day.reason.is_none());

        let p1 = day.slot("P1").unwrap();
        assert_eq!(p1.label, "Math - LU 1");
        assert_eq!(p1.color.as_deref(), Some("#f00"));
        assert_eq!(p1.course_id.as_deref(), Some("C-MATH"));

        // LU 2 has no module → base color; per-LU course id
        let p2 = day.slot("P2").unwrap();
        assert_eq!(p2.lu(), Some(2));
        assert_eq!(p2.color.as_deref(), Some("#00f"));
        assert_eq!(p2.course_id.as_deref(), Some("C-MATH-2"));

        let p3 = day.slot("P3").unwrap();
        assert_eq!(p3.label, "Sport");
        assert_eq!(p3.progress, LuProgress::Untracked);
        assert_eq!(counters.current("PE"), 0);

        // Next Monday: MATH exhausted
        let next = m.materialize(ymd(2025, 1, 13), DayClass::Regular, None, pos(), &mut counters);
        let p1 = next.slot("P1").unwrap();
        assert_eq!(p1.label, "Math - completed");
        assert_eq!(p1.color.as_deref(), Some(COMPLETED_COLOR));
        assert!(p1.is_completed());
    }

    #[test]
    fn test_holiday_precedence() {
        let cfg = config();
        let ctx = TermContext::from_config(&cfg, 5).unwrap();
        let m = DayMaterializer::new(&cfg, &ctx);
        let mut counters = LuCounters::new();
        let phase = Phase::new("CA1", "CA 1", 1).with_duration(1);

        let day = m.materialize(ymd(2025, 1, 7), DayClass::Assessment, Some(&phase), pos(), &mut counters);
        assert_eq!(day.status, DayStatus::Holiday);
        assert_eq!(day.reason.as_deref(), Some(DEFAULT_HOLIDAY_REASON));
        assert_eq!(day.phase_id.as_deref(), Some("CA1"));
        assert!(day.slots.values().all(|o| o.kind == OccupancyKind::Empty));
        assert_eq!(day.slots.len(), 3);
    }

    #[test]
    fn test_weekend() {
        let cfg = config();
        let ctx = TermContext::from_config(&cfg, 5).unwrap();
        let m = DayMaterializer::new(&cfg, &ctx);
        let mut counters = LuCounters::new();

        let day = m.materialize(ymd(2025, 1, 11), DayClass::Event, None, pos(), &mut counters);
        assert_eq!(day.status, DayStatus::Weekend);
        assert_eq!(day.reason.as_deref(), Some(REST_DAY_REASON));
    }

    #[test]
    fn test_assessment_and_event_days() {
        let cfg = config();
        let ctx = TermContext::from_config(&cfg, 5).unwrap();
        let m = DayMaterializer::new(&cfg, &ctx);
        let mut counters = LuCounters::new();
        let phase = Phase::new("CA1", "CA 1", 1);

        let ca = m.materialize(ymd(2025, 1, 6), DayClass::Assessment, Some(&phase), pos(), &mut counters);
        assert_eq!(ca.status, DayStatus::Ca);
        assert_eq!(ca.reason.as_deref(), Some("CA 1"));
        assert!(ca.slots.values().all(|o| o.kind == OccupancyKind::Ca));

        let ev = m.materialize(ymd(2025, 1, 8), DayClass::Event, Some(&phase), pos(), &mut counters);
        assert_eq!(ev.status, DayStatus::Event);
        assert_eq!(ev.reason.as_deref(), Some("Event (CA 1)"));
        assert!(ev.slots.values().all(|o| o.kind == OccupancyKind::Event));

        // Assessment on a Monday consumes no LUs
        assert_eq!(counters.current("MATH"), 0);
    }

    #[test]
    fn test_dangling_subject_is_empty() {
        let mut cfg = config();
        cfg.holidays.clear();
        let ctx = TermContext::from_config(&cfg, 5).unwrap();
        let m = DayMaterializer::new(&cfg, &ctx);
        let mut counters = LuCounters::new();

        let day = m.materialize(ymd(2025, 1, 7), DayClass::Regular, None, pos(), &mut counters);
        assert_eq!(day.status, DayStatus::Working);
        assert!(day.slots.values().all(|o| o.kind == OccupancyKind::Empty));
    }

    #[test]
    fn test_day_position() {
        let anchor = ymd(2025, 1, 6);
        assert_eq!(DayPosition::relative_to(anchor, anchor), DayPosition { week: 1, day: 1 });
        assert_eq!(
            DayPosition::relative_to(anchor, ymd(2025, 1, 12)),
            DayPosition { week: 1, day: 7 }
        );
        assert_eq!(
            DayPosition::relative_to(anchor, ymd(2025, 1, 15)),
            DayPosition { week: 2, day: 3 }
        );
    }
}
