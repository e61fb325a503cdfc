//! Structured matrix export.
//!
//! # Layout
//! - Row 1: the squad (cohort) identifier, whitespace removed.
//! - Row 2: `slot_number, date, from, to, course_id, lu_id, mentor_id`.
//! - One row per slot occupied by a subject, in date then slot order.
//!
//! Times are written as `HHmm`. The LU id comes from the subject's per-LU
//! map, then its default LU id, then a synthesized `LU_<n>`.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::calendar::{format_date, resolve_date};
use crate::error::ImportError;
use crate::import::normalize_header;
use crate::models::{OccupancyKind, Schedule, TermConfig};
use crate::workbook::{Cell, Sheet, Workbook};

/// Name of the matrix sheet.
pub const MATRIX_SHEET: &str = "Matrix";

/// Column header of the matrix sheet.
pub const MATRIX_HEADER: [&str; 7] = [
    "slot_number",
    "date",
    "from",
    "to",
    "course_id",
    "lu_id",
    "mentor_id",
];

/// One subject-occupied slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatrixRow {
    /// 1-based position of the slot in the configuration.
    pub slot_number: u32,
    /// Lesson date.
    pub date: NaiveDate,
    /// Start time, `HHmm`.
    pub from: String,
    /// End time, `HHmm`.
    pub to: String,
    /// External course identifier.
    pub course_id: String,
    /// External LU identifier.
    pub lu_id: String,
    /// External mentor identifier.
    pub mentor_id: String,
}

/// Derives matrix rows from a generated schedule.
///
/// Untracked and completed lessons carry the subject's default LU id, or an
/// empty one.
pub fn matrix_rows(config: &TermConfig, schedule: &Schedule) -> Vec<MatrixRow> {
    let mut rows = Vec::new();
    for day in schedule.iter() {
        for (idx, slot) in config.slots.iter().enumerate() {
            let Some(occ) = day.slot(&slot.id) else {
                continue;
            };
            if occ.kind != OccupancyKind::Subject {
                continue;
            }
            let subject = occ.subject_id.as_deref().and_then(|id| config.subject(id));
            let lu_id = match (subject, occ.lu()) {
                (Some(s), Some(n)) => s.lu_id_for(n),
                (Some(s), None) => s.default_lu_id.clone().unwrap_or_default(),
                (None, _) => String::new(),
            };
            rows.push(MatrixRow {
                slot_number: idx as u32 + 1,
                date: day.date,
                from: compact_time(&slot.start_time),
                to: compact_time(&slot.end_time),
                course_id: occ.course_id.clone().unwrap_or_default(),
                lu_id,
                mentor_id: subject
                    .and_then(|s| s.mentor_id.clone())
                    .unwrap_or_default(),
            });
        }
    }
    rows
}

/// Builds the matrix workbook.
pub fn matrix_workbook(squad_id: &str, rows: &[MatrixRow]) -> Workbook {
    let mut sheet = Sheet::new(MATRIX_SHEET);
    sheet.push_row([squad_id.split_whitespace().collect::<String>()]);
    sheet.push_row(MATRIX_HEADER);
    for row in rows {
        sheet.push_row([
            Cell::from(row.slot_number),
            Cell::text(format_date(row.date)),
            Cell::text(&row.from),
            Cell::text(&row.to),
            Cell::text(&row.course_id),
            Cell::text(&row.lu_id),
            Cell::text(&row.mentor_id),
        ]);
    }
    Workbook::new().with_sheet(sheet)
}

/// Generates the matrix workbook for a configuration.
pub fn export_matrix(config: &TermConfig, schedule: &Schedule) -> Workbook {
    let squad = config.squad_id.as_deref().unwrap_or_default();
    matrix_workbook(squad, &matrix_rows(config, schedule))
}

/// Reads a matrix workbook back into `(squad id, rows)`.
pub fn parse_matrix_workbook(workbook: &Workbook) -> Result<(String, Vec<MatrixRow>), ImportError> {
    let sheet = workbook
        .sheet(MATRIX_SHEET)
        .or_else(|| workbook.sheets.first())
        .ok_or_else(|| ImportError::MalformedMatrix {
            message: "workbook has no sheets".to_string(),
        })?;

    let squad = sheet.cell(0, 0).as_text();
    let header_ok = MATRIX_HEADER
        .iter()
        .enumerate()
        .all(|(col, name)| normalize_header(&sheet.cell(1, col).as_text()) == normalize_header(name));
    if !header_ok {
        return Err(ImportError::MalformedMatrix {
            message: "row 2 must be the matrix header".to_string(),
        });
    }

    let mut rows = Vec::new();
    for (idx, cells) in sheet.rows.iter().enumerate().skip(2) {
        if cells.iter().all(Cell::is_empty) {
            continue;
        }
        let row_no = idx + 1;
        let slot_number = sheet
            .cell(idx, 0)
            .as_u32()
            .ok_or_else(|| ImportError::invalid(&sheet.name, row_no, "slot_number is not a number"))?;
        let date = sheet
            .cell(idx, 1)
            .as_date_value()
            .and_then(|v| resolve_date(&v))
            .ok_or_else(|| ImportError::invalid(&sheet.name, row_no, "date is not a date"))?;
        rows.push(MatrixRow {
            slot_number,
            date,
            from: compact_time(&sheet.cell(idx, 2).as_time_text()),
            to: compact_time(&sheet.cell(idx, 3).as_time_text()),
            course_id: sheet.cell(idx, 4).as_text(),
            lu_id: sheet.cell(idx, 5).as_text(),
            mentor_id: sheet.cell(idx, 6).as_text(),
        });
    }
    Ok((squad, rows))
}

/// `09:30` → `0930`.
fn compact_time(time: &str) -> String {
    time.trim().replace(':', "")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Slot, Subject};
    use crate::scheduler::ScheduleGenerator;

    fn config() -> TermConfig {
        TermConfig::new("2025-01-06", "2025-01-10")
            .with_squad_id(" SQ 01 ")
            .with_slot(Slot::new("P1", "Period 1", "09:00", "10:30"))
            .with_slot(Slot::new("P2", "Period 2", "10:45", "12:15"))
            .with_subject(
                Subject::new("A", "Alpha", "#f00")
                    .with_total_lus(2)
                    .with_course_id("C-A")
                    .with_mentor_id("M-7")
                    .with_lu_id(1, "A-LU-ONE"),
            )
            .with_subject(Subject::new("PE", "Sport", "#0f0").with_default_lu_id("PE-LU"))
            .with_pattern("Monday", "P1", "A")
            .with_pattern("Monday", "P2", "PE")
            .with_pattern("Tuesday", "P2", "A")
            .with_pattern("Wednesday", "P1", "A")
    }

    #[test]
    fn test_matrix_rows() {
        let cfg = config();
        let schedule = ScheduleGenerator::new().generate(&cfg);
        let rows = matrix_rows(&cfg, &schedule);

        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0].slot_number, 1);
        assert_eq!(rows[0].from, "0900");
        assert_eq!(rows[0].to, "1030");
        assert_eq!(rows[0].course_id, "C-A");
        assert_eq!(rows[0].lu_id, "A-LU-ONE");
        assert_eq!(rows[0].mentor_id, "M-7");

        assert_eq!(rows[1].slot_number, 2);
        assert_eq!(rows[1].lu_id, "PE-LU");

        // Tuesday: LU 2 has no mapping → synthesized
        assert_eq!(rows[2].lu_id, "LU_2");
        // Wednesday: past the last LU
        assert_eq!(rows[3].lu_id, "");
    }

    #[test]
    fn test_matrix_workbook_layout() {
        let cfg = config();
        let schedule = ScheduleGenerator::new().generate(&cfg);
        let wb = export_matrix(&cfg, &schedule);
        let sheet = wb.sheet(MATRIX_SHEET).unwrap();

        assert_eq!(sheet.cell(0, 0), &Cell::text("SQ01"));
        assert_eq!(sheet.cell(1, 4), &Cell::text("course_id"));
        assert_eq!(sheet.cell(2, 1), &Cell::text("2025-01-06"));
        assert_eq!(sheet.rows.len(), 2 + 4);
    }

    #[test]
    fn test_matrix_round_trip() {
        let cfg = config();
        let schedule = ScheduleGenerator::new().generate(&cfg);
        let rows = matrix_rows(&cfg, &schedule);
        let (squad, parsed) = parse_matrix_workbook(&matrix_workbook("SQ01", &rows)).unwrap();
        assert_eq!(squad, "SQ01");
        assert_eq!(parsed, rows);
    }

    #[test]
    fn test_parse_matrix_rejects_bad_layout() {
        let mut sheet = Sheet::new(MATRIX_SHEET);
        sheet.push_row(["SQ"]);
        sheet.push_row(["date", "slot"]);
        let err = parse_matrix_workbook(&Workbook::new().with_sheet(sheet)).unwrap_err();
        assert!(matches!(err, ImportError::MalformedMatrix { .. }));

        assert!(parse_matrix_workbook(&Workbook::new()).is_err());
    }

    #[test]
    fn test_parse_matrix_serial_dates() {
        let mut sheet = Sheet::new("Export");
        sheet.push_row(["SQ"]);
        sheet.push_row(MATRIX_HEADER);
        sheet.push_row([
            Cell::Number(1.0),
            Cell::Number(45663.0),
            Cell::Number(0.375),
            Cell::text("10:30"),
            Cell::text("C"),
            Cell::text("L"),
            Cell::Empty,
        ]);
        let (_, rows) = parse_matrix_workbook(&Workbook::new().with_sheet(sheet)).unwrap();
        assert_eq!(rows[0].date, NaiveDate::from_ymd_opt(2025, 1, 6).unwrap());
        assert_eq!(rows[0].from, "0900");
        assert_eq!(rows[0].to, "1030");
        assert_eq!(rows[0].mentor_id, "");
    }
}
