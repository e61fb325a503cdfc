//! In-memory spreadsheet model.
//!
//! Export builds a [`Workbook`]; import reads one. Writing or reading an
//! actual file format is left to the caller, which only has to map cells
//! to and from [`Cell`].

use serde::{Deserialize, Serialize};

use crate::calendar::DateValue;

/// A single spreadsheet cell.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    /// Blank cell.
    #[default]
    Empty,
    /// Boolean cell.
    Bool(bool),
    /// Numeric cell (also dates as serial days and times as day fractions).
    Number(f64),
    /// Text cell.
    Text(String),
}

impl Cell {
    /// Creates a text cell.
    pub fn text(value: impl Into<String>) -> Self {
        Cell::Text(value.into())
    }

    /// Whether the cell is blank or whitespace.
    pub fn is_empty(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.trim().is_empty(),
            Cell::Bool(_) | Cell::Number(_) => false,
        }
    }

    /// Cell content as trimmed text; whole numbers render without decimals.
    pub fn as_text(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Bool(b) => b.to_string(),
            Cell::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => format!("{}", *n as i64),
            Cell::Number(n) => n.to_string(),
            Cell::Text(s) => s.trim().to_string(),
        }
    }

    /// Cell content as a non-negative integer.
    pub fn as_u32(&self) -> Option<u32> {
        match self {
            Cell::Number(n) if n.is_finite() && *n >= 0.0 && *n <= u32::MAX as f64 => {
                Some(n.round() as u32)
            }
            Cell::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Cell content as a date value for the flexible parser.
    pub fn as_date_value(&self) -> Option<DateValue> {
        match self {
            Cell::Number(n) => Some(DateValue::Serial(*n)),
            Cell::Text(s) if !s.trim().is_empty() => Some(DateValue::Text(s.trim().to_string())),
            _ => None,
        }
    }

    /// Cell content as an `HH:mm` time.
    ///
    /// Numeric cells in `[0, 1)` are read as fractions of a day.
    pub fn as_time_text(&self) -> String {
        match self {
            Cell::Number(n) if (0.0..1.0).contains(n) => {
                let minutes = (n * 24.0 * 60.0).round() as u32;
                format!("{:02}:{:02}", minutes / 60 % 24, minutes % 60)
            }
            other => other.as_text(),
        }
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Cell::Text(value)
    }
}

impl From<u32> for Cell {
    fn from(value: u32) -> Self {
        Cell::Number(f64::from(value))
    }
}

impl From<usize> for Cell {
    fn from(value: usize) -> Self {
        Cell::Number(value as f64)
    }
}

impl From<Option<u32>> for Cell {
    fn from(value: Option<u32>) -> Self {
        value.map(Cell::from).unwrap_or(Cell::Empty)
    }
}

/// A named sheet of rows.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Sheet {
    /// Sheet name.
    pub name: String,
    /// Rows of cells; rows may differ in length.
    pub rows: Vec<Vec<Cell>>,
}

impl Sheet {
    /// Creates an empty sheet.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rows: Vec::new(),
        }
    }

    /// Appends a row.
    pub fn push_row<I, C>(&mut self, cells: I)
    where
        I: IntoIterator<Item = C>,
        C: Into<Cell>,
    {
        self.rows.push(cells.into_iter().map(Into::into).collect());
    }

    /// Appends a blank row.
    pub fn push_blank(&mut self) {
        self.rows.push(Vec::new());
    }

    /// Cell at `(row, col)`; missing cells read as empty.
    pub fn cell(&self, row: usize, col: usize) -> &Cell {
        const EMPTY: &Cell = &Cell::Empty;
        self.rows.get(row).and_then(|r| r.get(col)).unwrap_or(EMPTY)
    }
}

/// An ordered collection of sheets.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Workbook {
    /// Sheets in order.
    pub sheets: Vec<Sheet>,
}

impl Workbook {
    /// Creates an empty workbook.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a sheet.
    pub fn with_sheet(mut self, sheet: Sheet) -> Self {
        self.sheets.push(sheet);
        self
    }

    /// Finds a sheet by exact name.
    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|s| s.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_text() {
        assert_eq!(Cell::Number(3.0).as_text(), "3");
        assert_eq!(Cell::Number(2.5).as_text(), "2.5");
        assert_eq!(Cell::text("  hi ").as_text(), "hi");
        assert!(Cell::text("   ").is_empty());
        assert!(!Cell::Number(0.0).is_empty());
    }

    #[test]
    fn test_cell_numbers_and_times() {
        assert_eq!(Cell::Number(12.0).as_u32(), Some(12));
        assert_eq!(Cell::text(" 7 ").as_u32(), Some(7));
        assert_eq!(Cell::Number(-1.0).as_u32(), None);
        assert_eq!(Cell::text("x").as_u32(), None);
        assert_eq!(Cell::Number(0.375).as_time_text(), "09:00");
        assert_eq!(Cell::text("10:45").as_time_text(), "10:45");
    }

    #[test]
    fn test_sheet_cells() {
        let mut sheet = Sheet::new("S");
        sheet.push_row(["a", "b"]);
        sheet.push_blank();
        assert_eq!(sheet.cell(0, 1), &Cell::text("b"));
        assert_eq!(sheet.cell(0, 5), &Cell::Empty);
        assert_eq!(sheet.cell(9, 0), &Cell::Empty);
    }
}
