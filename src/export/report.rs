//! Human-readable schedule workbook.
//!
//! Sheet "Schedule": one row per date with phase position, date, weekday,
//! status, reason and one column per slot. Sheet "Statistics": program
//! totals, utilization and phasing tables.

use crate::calendar::format_date;
use crate::models::{Schedule, TermConfig};
use crate::stats::{ProgramTotals, SubjectPhasing, SubjectUtilization};
use crate::workbook::{Cell, Sheet, Workbook};

/// Name of the day-by-day sheet.
pub const SCHEDULE_SHEET: &str = "Schedule";
/// Name of the statistics sheet.
pub const STATISTICS_SHEET: &str = "Statistics";

/// Builds the two-sheet report workbook.
pub fn report_workbook(config: &TermConfig, schedule: &Schedule) -> Workbook {
    Workbook::new()
        .with_sheet(schedule_sheet(config, schedule))
        .with_sheet(statistics_sheet(config, schedule))
}

fn schedule_sheet(config: &TermConfig, schedule: &Schedule) -> Sheet {
    let mut sheet = Sheet::new(SCHEDULE_SHEET);

    let mut header: Vec<Cell> = ["Phase", "Week", "Day", "Date", "Weekday", "Status", "Reason"]
        .into_iter()
        .map(Cell::from)
        .collect();
    header.extend(config.slots.iter().map(|s| {
        if s.label.is_empty() {
            Cell::text(&s.id)
        } else {
            Cell::text(&s.label)
        }
    }));
    sheet.rows.push(header);

    for day in schedule.iter() {
        let phase = day
            .phase_id
            .as_deref()
            .map(|id| {
                config
                    .phases
                    .iter()
                    .find(|p| p.tag() == id)
                    .map_or(id, |p| p.label.as_str())
            })
            .unwrap_or_default();

        let mut row = vec![
            Cell::text(phase),
            Cell::from(day.week_number),
            Cell::from(day.day_in_week),
            Cell::text(format_date(day.date)),
            Cell::text(&day.weekday),
            Cell::text(day.status.as_str()),
            Cell::text(day.reason.clone().unwrap_or_default()),
        ];
        row.extend(config.slots.iter().map(|slot| {
            day.slot(&slot.id)
                .filter(|occ| !occ.label.is_empty())
                .map(|occ| Cell::text(&occ.label))
                .unwrap_or(Cell::Empty)
        }));
        sheet.rows.push(row);
    }
    sheet
}

fn statistics_sheet(config: &TermConfig, schedule: &Schedule) -> Sheet {
    let mut sheet = Sheet::new(STATISTICS_SHEET);

    let totals = ProgramTotals::calculate(schedule);
    sheet.push_row(["Program Totals"]);
    sheet.push_row([Cell::from("Total Days"), Cell::from(totals.total_days)]);
    sheet.push_row([Cell::from("Rest Days"), Cell::from(totals.rest_days)]);
    for (weekday, count) in &totals.rest_days_by_weekday {
        sheet.push_row([Cell::text(format!("Rest Days ({weekday})")), Cell::from(*count)]);
    }
    sheet.push_row([Cell::from("Holidays"), Cell::from(totals.holidays)]);
    sheet.push_row([Cell::from("Blocked Days"), Cell::from(totals.blocked_days)]);
    sheet.push_row([Cell::from("Assessment Days"), Cell::from(totals.assessment_days)]);
    sheet.push_row([Cell::from("Event Days"), Cell::from(totals.event_days)]);
    sheet.push_row([Cell::from("Working Days"), Cell::from(totals.working_days)]);
    sheet.push_row([Cell::from("Learning Days"), Cell::from(totals.learning_days)]);
    sheet.push_blank();

    sheet.push_row(["Utilization"]);
    sheet.push_row(["Subject", "Available", "Utilized", "Unutilized"]);
    for u in SubjectUtilization::calculate(config, schedule) {
        sheet.push_row([
            Cell::text(u.subject_name),
            Cell::from(u.available),
            Cell::from(u.utilized),
            Cell::from(u.unutilized),
        ]);
    }
    sheet.push_blank();

    sheet.push_row(["Phasing"]);
    sheet.push_row(["Subject", "Phase", "Planned LUs", "Actual LUs"]);
    for subject in SubjectPhasing::calculate(config, schedule) {
        for cp in &subject.checkpoints {
            sheet.push_row([
                Cell::text(&subject.subject_name),
                Cell::text(&cp.phase_label),
                cp.planned.map(Cell::from).unwrap_or_else(|| Cell::from("N/A")),
                cp.actual.map(Cell::from).unwrap_or_else(|| Cell::from("N/A")),
            ]);
        }
    }
    sheet
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Module, Phase, Slot, Subject};
    use crate::scheduler::ScheduleGenerator;

    fn config() -> TermConfig {
        TermConfig::new("2025-01-06", "2025-01-19")
            .with_slot(Slot::new("P1", "Period 1", "09:00", "10:30"))
            .with_slot(Slot::new("P2", "", "10:45", "12:15"))
            .with_subject(
                Subject::new("A", "Alpha", "#f00")
                    .with_total_lus(5)
                    .with_module(Module::new("M1", 1, 2, "#f00")),
            )
            .with_pattern("Monday", "P1", "A")
            .with_phase(Phase::new("CA1", "CA 1", 1).with_duration(1))
    }

    #[test]
    fn test_schedule_sheet_layout() {
        let cfg = config();
        let schedule = ScheduleGenerator::new().generate(&cfg);
        let wb = report_workbook(&cfg, &schedule);

        let sheet = wb.sheet(SCHEDULE_SHEET).unwrap();
        assert_eq!(sheet.rows.len(), 1 + 14);
        assert_eq!(sheet.cell(0, 7), &Cell::text("Period 1"));
        assert_eq!(sheet.cell(0, 8), &Cell::text("P2")); // blank label → id

        // First Monday
        assert_eq!(sheet.cell(1, 0), &Cell::text("CA 1"));
        assert_eq!(sheet.cell(1, 3), &Cell::text("2025-01-06"));
        assert_eq!(sheet.cell(1, 5), &Cell::text("working"));
        assert_eq!(sheet.cell(1, 7), &Cell::text("Alpha - LU 1"));
        assert_eq!(sheet.cell(1, 8), &Cell::Empty);

        // Friday CA
        assert_eq!(sheet.cell(5, 5), &Cell::text("ca"));
        assert_eq!(sheet.cell(5, 6), &Cell::text("CA 1"));

        // Trailing block has no phase
        assert_eq!(sheet.cell(8, 0), &Cell::text(""));
    }

    #[test]
    fn test_statistics_sheet() {
        let cfg = config();
        let schedule = ScheduleGenerator::new().generate(&cfg);
        let wb = report_workbook(&cfg, &schedule);
        let sheet = wb.sheet(STATISTICS_SHEET).unwrap();

        assert_eq!(sheet.cell(0, 0), &Cell::text("Program Totals"));
        assert_eq!(sheet.cell(1, 1), &Cell::Number(14.0));

        let phasing_row = sheet
            .rows
            .iter()
            .position(|r| r.first() == Some(&Cell::text("Phasing")))
            .unwrap();
        let row = &sheet.rows[phasing_row + 2];
        assert_eq!(row[0], Cell::text("Alpha"));
        assert_eq!(row[2], Cell::Number(2.0));
        assert_eq!(row[3], Cell::Number(1.0)); // only Mon 6 precedes the CA on Fri 10
    }
}
