//! Header alias table.
//!
//! Each canonical field lists the header spellings it accepts. Headers are
//! compared after [`normalize_header`], so case, spaces and punctuation
//! never matter. A sheet resolves its header row once into a
//! [`ColumnMap`].

use std::collections::HashMap;

use crate::error::ImportError;
use crate::workbook::Cell;

/// Lowercases and drops everything but ASCII letters and digits.
pub fn normalize_header(header: &str) -> String {
    header
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Sheets understood by the importer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SheetKind {
    Settings,
    Subjects,
    Slots,
    WeeklyPattern,
    Holidays,
    Phases,
    Modules,
    IdMapping,
    LuIdMapping,
}

impl SheetKind {
    /// Every sheet kind.
    pub const ALL: [SheetKind; 9] = [
        SheetKind::Settings,
        SheetKind::Subjects,
        SheetKind::Slots,
        SheetKind::WeeklyPattern,
        SheetKind::Holidays,
        SheetKind::Phases,
        SheetKind::Modules,
        SheetKind::IdMapping,
        SheetKind::LuIdMapping,
    ];

    /// Accepted (normalised) sheet names.
    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            SheetKind::Settings => &["settings", "setting", "config", "configuration"],
            SheetKind::Subjects => &["subjects", "subject", "roster"],
            SheetKind::Slots => &["slots", "slot", "periods", "timeslots"],
            SheetKind::WeeklyPattern => &["weeklypattern", "pattern", "weekly", "timetable"],
            SheetKind::Holidays => &["holidays", "holiday"],
            SheetKind::Phases => &["assessmentphases", "phases", "caphases", "assessments"],
            SheetKind::Modules => &["modules", "module"],
            SheetKind::IdMapping => &["idmapping", "courseidmapping", "idmap", "courseids"],
            SheetKind::LuIdMapping => &["luidmapping", "luidmap", "luids"],
        }
    }

    /// Resolves a sheet name.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = normalize_header(name);
        Self::ALL.into_iter().find(|k| k.aliases().contains(&name.as_str()))
    }
}

/// Canonical fields read from sheet columns or settings keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Id,
    Name,
    Color,
    TotalLus,
    CourseId,
    MentorId,
    DefaultLuId,
    Label,
    StartTime,
    EndTime,
    Day,
    Slot,
    Subject,
    Date,
    Reason,
    WeekOrder,
    Duration,
    EventDays,
    StartLu,
    EndLu,
    Lu,
    LuId,
    StartDate,
    EndDate,
    WorkingDays,
    SquadId,
}

impl Field {
    /// Accepted (normalised) header spellings.
    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            Field::Id => &["id", "subjectid", "slotid", "phaseid", "code", "key"],
            Field::Name => &["name", "subjectname", "modulename", "title", "displayname"],
            Field::Color => &["color", "colour", "hex", "colorcode"],
            Field::TotalLus => &["totallus", "totallu", "lus", "lucount", "learningunits"],
            Field::CourseId => &["courseid", "course", "coursecode"],
            Field::MentorId => &["mentorid", "mentor", "teacherid"],
            Field::DefaultLuId => &["defaultluid", "luid"],
            Field::Label => &["label", "name", "slotname", "period", "title", "phase"],
            Field::StartTime => &["starttime", "start", "from", "begin"],
            Field::EndTime => &["endtime", "end", "to", "finish"],
            Field::Day => &["day", "weekday", "dayname", "dayofweek"],
            Field::Slot => &["slot", "slotid", "period", "periodid", "slotlabel"],
            Field::Subject => &["subject", "subjectid", "subjectcode", "subjectname"],
            Field::Date => &["date", "holidaydate", "day"],
            Field::Reason => &["reason", "description", "name", "holiday", "occasion"],
            Field::WeekOrder => &["weekorder", "weeks", "week", "windowweeks"],
            Field::Duration => &["duration", "cadays", "assessmentdays", "days"],
            Field::EventDays => &["eventdays", "events", "event"],
            Field::StartLu => &["startlu", "start", "from", "firstlu"],
            Field::EndLu => &["endlu", "end", "to", "lastlu"],
            Field::Lu => &["lu", "lunumber", "lunum", "sequence", "lusequence"],
            Field::LuId => &["luid", "externalluid"],
            Field::StartDate => &["startdate", "start", "termstart", "from"],
            Field::EndDate => &["enddate", "end", "termend", "to"],
            Field::WorkingDays => &["workingdays", "workdays", "activedays", "days"],
            Field::SquadId => &["squadid", "squad", "cohort", "cohortid"],
        }
    }

    /// Display name used in error messages.
    pub fn name(self) -> &'static str {
        self.aliases()[0]
    }

    /// Whether a raw header spells this field.
    pub fn matches(self, header: &str) -> bool {
        self.aliases().contains(&normalize_header(header).as_str())
    }

    /// First field in `fields` spelled by `header`.
    pub fn resolve(header: &str, fields: &[Field]) -> Option<Field> {
        let header = normalize_header(header);
        fields
            .iter()
            .copied()
            .find(|f| f.aliases().contains(&header.as_str()))
    }
}

/// Field → column index for one sheet.
#[derive(Debug, Clone, Default)]
pub struct ColumnMap {
    sheet: String,
    columns: HashMap<Field, usize>,
}

impl ColumnMap {
    /// Resolves a header row against the fields a sheet reads.
    ///
    /// Earlier fields in `fields` win when a header could spell several;
    /// the first column spelling a field wins.
    pub fn resolve(sheet: &str, header: &[Cell], fields: &[Field]) -> Self {
        let mut columns = HashMap::new();
        for (col, cell) in header.iter().enumerate() {
            let text = cell.as_text();
            let candidates: Vec<Field> = fields
                .iter()
                .copied()
                .filter(|f| !columns.contains_key(f))
                .collect();
            if let Some(field) = Field::resolve(&text, &candidates) {
                columns.insert(field, col);
            }
        }
        Self {
            sheet: sheet.to_string(),
            columns,
        }
    }

    /// Column of an optional field.
    pub fn get(&self, field: Field) -> Option<usize> {
        self.columns.get(&field).copied()
    }

    /// Column of a required field.
    pub fn require(&self, field: Field) -> Result<usize, ImportError> {
        self.get(field)
            .ok_or_else(|| ImportError::missing(&self.sheet, field.name()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_header() {
        assert_eq!(normalize_header("Total LUs"), "totallus");
        assert_eq!(normalize_header("course_id"), "courseid");
        assert_eq!(normalize_header(" Start-Time "), "starttime");
    }

    #[test]
    fn test_sheet_kind_from_name() {
        assert_eq!(SheetKind::from_name("Weekly Pattern"), Some(SheetKind::WeeklyPattern));
        assert_eq!(SheetKind::from_name("ID Mapping"), Some(SheetKind::IdMapping));
        assert_eq!(SheetKind::from_name("LU-ID Mapping"), Some(SheetKind::LuIdMapping));
        assert_eq!(SheetKind::from_name("Assessment Phases"), Some(SheetKind::Phases));
        assert_eq!(SheetKind::from_name("Notes"), None);
    }

    #[test]
    fn test_column_map_resolution() {
        let header = vec![Cell::text("Slot ID"), Cell::text("Name"), Cell::text("From"), Cell::text("To")];
        let map = ColumnMap::resolve(
            "Slots",
            &header,
            &[Field::Id, Field::Label, Field::StartTime, Field::EndTime],
        );
        assert_eq!(map.get(Field::Id), Some(0));
        assert_eq!(map.get(Field::Label), Some(1));
        assert_eq!(map.require(Field::StartTime).unwrap(), 2);
        assert_eq!(map.require(Field::EndTime).unwrap(), 3);
    }

    #[test]
    fn test_column_map_missing() {
        let map = ColumnMap::resolve("Holidays", &[Cell::text("When")], &[Field::Date]);
        assert_eq!(
            map.require(Field::Date).unwrap_err(),
            ImportError::MissingColumn {
                sheet: "Holidays".into(),
                field: "date".into()
            }
        );
    }

    #[test]
    fn test_field_matches() {
        assert!(Field::TotalLus.matches("Total LUs"));
        assert!(Field::SquadId.matches("Cohort"));
        assert!(!Field::Color.matches("colours"));
    }
}
