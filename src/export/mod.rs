//! Spreadsheet exports of a generated schedule.
//!
//! - [`report_workbook`]: human-readable day-by-day sheet plus statistics.
//! - [`export_matrix`]: structured matrix of subject-occupied slots for
//!   downstream systems; [`parse_matrix_workbook`] reads it back.

mod matrix;
mod report;

pub use matrix::{
    export_matrix, matrix_rows, matrix_workbook, parse_matrix_workbook, MatrixRow, MATRIX_HEADER,
    MATRIX_SHEET,
};
pub use report::{report_workbook, SCHEDULE_SHEET, STATISTICS_SHEET};
