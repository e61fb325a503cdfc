//! Spreadsheet import of a term configuration.
//!
//! Reads up to nine named sheets (settings, subjects, slots, weekly
//! pattern, holidays, assessment phases, modules, course-id mapping and
//! LU-id mapping) into an [`ImportedConfig`]. Sheet names and column
//! headers are matched through the alias table in [`aliases`]; every date
//! passes through the flexible date parser.
//!
//! Import is all-or-nothing: any unreadable sheet fails the whole
//! operation with one [`ImportError`].

mod aliases;

pub use aliases::{normalize_header, ColumnMap, Field, SheetKind};

use tracing::debug;

use crate::calendar::{parse_flexible_date, weekday_from_name, WEEKDAY_NAMES};
use crate::error::ImportError;
use crate::models::{Holiday, Module, Phase, Slot, Subject, TermConfig, WeeklyPattern};
use crate::workbook::{Cell, Sheet, Workbook};

/// `(subject reference, LU number, identifier)` mapping entry.
pub type LuMapping = (String, u32, String);

/// Configuration sections recovered from a workbook.
///
/// `None` means the corresponding sheet (or setting) was absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportedConfig {
    /// Term start from the settings sheet, normalised to `YYYY-MM-DD`.
    pub start_date: Option<String>,
    /// Term end from the settings sheet, normalised to `YYYY-MM-DD`.
    pub end_date: Option<String>,
    /// Canonical weekday names ("Monday", ...).
    pub working_days: Option<Vec<String>>,
    /// Cohort identifier.
    pub squad_id: Option<String>,
    /// Subject roster, without modules or LU mappings.
    pub subjects: Option<Vec<Subject>>,
    /// Period slots in sheet order.
    pub slots: Option<Vec<Slot>>,
    /// Pattern as written; slot and subject cells may hold labels or names.
    pub weekly_pattern: Option<WeeklyPattern>,
    /// Holidays with normalised dates.
    pub holidays: Option<Vec<Holiday>>,
    /// Assessment phases in sheet order.
    pub phases: Option<Vec<Phase>>,
    /// `(subject reference, module)` rows.
    pub modules: Option<Vec<(String, Module)>>,
    /// Per-LU course ids.
    pub course_ids: Option<Vec<LuMapping>>,
    /// Per-LU external LU ids.
    pub lu_ids: Option<Vec<LuMapping>>,
}

impl ImportedConfig {
    /// Merges the imported sections into `config`, replacing each section
    /// that was present.
    ///
    /// Module and mapping rows attach to subjects by id or (case-insensitive)
    /// name; weekly-pattern references to slot labels or subject names are
    /// rewritten to ids.
    pub fn apply_to(self, config: &mut TermConfig) {
        if let Some(v) = self.start_date {
            config.start_date = v;
        }
        if let Some(v) = self.end_date {
            config.end_date = v;
        }
        if let Some(v) = self.working_days {
            config.working_days = v;
        }
        if let Some(v) = self.squad_id {
            config.squad_id = Some(v);
        }
        if let Some(v) = self.subjects {
            config.subjects = v;
        }
        if let Some(v) = self.slots {
            config.slots = v;
        }
        if let Some(v) = self.holidays {
            config.holidays = v;
        }
        if let Some(v) = self.phases {
            config.phases = v;
        }

        if let Some(modules) = self.modules {
            for subject in &mut config.subjects {
                subject.modules.clear();
            }
            for (subject_ref, module) in modules {
                if let Some(subject) = find_subject_mut(&mut config.subjects, &subject_ref) {
                    subject.modules.push(module);
                }
            }
            for subject in &mut config.subjects {
                subject.modules.sort_by_key(|m| m.start_lu);
            }
        }
        if let Some(course_ids) = self.course_ids {
            for subject in &mut config.subjects {
                subject.course_id_map.clear();
            }
            for (subject_ref, lu, id) in course_ids {
                if let Some(subject) = find_subject_mut(&mut config.subjects, &subject_ref) {
                    subject.course_id_map.insert(lu, id);
                }
            }
        }
        if let Some(lu_ids) = self.lu_ids {
            for subject in &mut config.subjects {
                subject.lu_id_map.clear();
            }
            for (subject_ref, lu, id) in lu_ids {
                if let Some(subject) = find_subject_mut(&mut config.subjects, &subject_ref) {
                    subject.lu_id_map.insert(lu, id);
                }
            }
        }

        if let Some(pattern) = self.weekly_pattern {
            let mut resolved = WeeklyPattern::new();
            for (day, slot_ref, subject_ref) in pattern.entries() {
                let slot_id = config
                    .slots
                    .iter()
                    .find(|s| s.id == slot_ref)
                    .or_else(|| {
                        config
                            .slots
                            .iter()
                            .find(|s| s.label.eq_ignore_ascii_case(slot_ref))
                    })
                    .map_or(slot_ref, |s| s.id.as_str());
                let subject_id = config
                    .subjects
                    .iter()
                    .find(|s| s.id == subject_ref)
                    .or_else(|| {
                        config
                            .subjects
                            .iter()
                            .find(|s| s.name.eq_ignore_ascii_case(subject_ref))
                    })
                    .map_or(subject_ref, |s| s.id.as_str());
                resolved.assign(day, slot_id, subject_id);
            }
            config.weekly_pattern = resolved;
        }
    }

    /// Builds a configuration from the imported sections alone.
    pub fn into_config(self) -> TermConfig {
        let mut config = TermConfig::default();
        self.apply_to(&mut config);
        config
    }
}

fn find_subject_mut<'a>(subjects: &'a mut [Subject], reference: &str) -> Option<&'a mut Subject> {
    let idx = subjects
        .iter()
        .position(|s| s.id == reference)
        .or_else(|| {
            subjects
                .iter()
                .position(|s| s.name.eq_ignore_ascii_case(reference))
        })?;
    subjects.get_mut(idx)
}

/// Parses every recognised sheet of a workbook.
pub fn import_workbook(workbook: &Workbook) -> Result<ImportedConfig, ImportError> {
    let mut imported = ImportedConfig::default();
    let mut recognised = 0;

    for sheet in &workbook.sheets {
        let Some(kind) = SheetKind::from_name(&sheet.name) else {
            debug!(sheet = %sheet.name, "ignoring unrecognised sheet");
            continue;
        };
        recognised += 1;
        match kind {
            SheetKind::Settings => read_settings(sheet, &mut imported)?,
            SheetKind::Subjects => imported.subjects = Some(read_subjects(sheet)?),
            SheetKind::Slots => imported.slots = Some(read_slots(sheet)?),
            SheetKind::WeeklyPattern => imported.weekly_pattern = Some(read_pattern(sheet)?),
            SheetKind::Holidays => imported.holidays = Some(read_holidays(sheet)?),
            SheetKind::Phases => imported.phases = Some(read_phases(sheet)?),
            SheetKind::Modules => imported.modules = Some(read_modules(sheet)?),
            SheetKind::IdMapping => {
                imported.course_ids = Some(read_mapping(sheet, Field::CourseId)?)
            }
            SheetKind::LuIdMapping => imported.lu_ids = Some(read_mapping(sheet, Field::LuId)?),
        }
    }

    if recognised == 0 {
        return Err(ImportError::EmptyWorkbook);
    }
    Ok(imported)
}

/// Header-driven view over a sheet's data rows.
struct Table<'a> {
    sheet: &'a Sheet,
    columns: ColumnMap,
}

impl<'a> Table<'a> {
    fn new(sheet: &'a Sheet, fields: &[Field]) -> Self {
        let header = sheet.rows.first().map(Vec::as_slice).unwrap_or_default();
        Self {
            sheet,
            columns: ColumnMap::resolve(&sheet.name, header, fields),
        }
    }

    /// Non-blank data rows as `(row index, 1-based row number)`.
    fn rows(&self) -> impl Iterator<Item = (usize, usize)> + 'a {
        self.sheet
            .rows
            .iter()
            .enumerate()
            .skip(1)
            .filter(|(_, cells)| !cells.iter().all(Cell::is_empty))
            .map(|(idx, _)| (idx, idx + 1))
    }

    fn cell(&self, row: usize, col: Option<usize>) -> &'a Cell {
        const EMPTY: &Cell = &Cell::Empty;
        match col {
            Some(col) => self.sheet.cell(row, col),
            None => EMPTY,
        }
    }

    fn text(&self, row: usize, col: Option<usize>) -> String {
        self.cell(row, col).as_text()
    }

    fn optional_text(&self, row: usize, col: Option<usize>) -> Option<String> {
        Some(self.text(row, col)).filter(|s| !s.is_empty())
    }

    fn number(&self, row: usize, row_no: usize, col: Option<usize>, field: Field) -> Result<u32, ImportError> {
        let cell = self.cell(row, col);
        if cell.is_empty() {
            return Ok(0);
        }
        cell.as_u32().ok_or_else(|| {
            ImportError::invalid(
                &self.sheet.name,
                row_no,
                format!("'{}' is not a whole number for {}", cell.as_text(), field.name()),
            )
        })
    }

    fn required_number(&self, row: usize, row_no: usize, field: Field) -> Result<u32, ImportError> {
        let col = self.columns.require(field)?;
        let cell = self.cell(row, Some(col));
        cell.as_u32().ok_or_else(|| {
            ImportError::invalid(
                &self.sheet.name,
                row_no,
                format!("'{}' is not a whole number for {}", cell.as_text(), field.name()),
            )
        })
    }
}

fn read_settings(sheet: &Sheet, imported: &mut ImportedConfig) -> Result<(), ImportError> {
    const KEYS: [Field; 4] = [Field::StartDate, Field::EndDate, Field::WorkingDays, Field::SquadId];

    for (idx, row) in sheet.rows.iter().enumerate() {
        let key = sheet.cell(idx, 0).as_text();
        let Some(field) = Field::resolve(&key, &KEYS) else {
            continue;
        };
        let value = sheet.cell(idx, 1);
        match field {
            Field::StartDate | Field::EndDate => {
                let Some(date) = value.as_date_value() else {
                    return Err(ImportError::invalid(&sheet.name, idx + 1, format!("{key} is blank")));
                };
                let date = parse_flexible_date(&date);
                if field == Field::StartDate {
                    imported.start_date = Some(date);
                } else {
                    imported.end_date = Some(date);
                }
            }
            Field::WorkingDays => {
                let days = parse_working_days(row.get(1..).unwrap_or_default());
                if days.is_empty() {
                    return Err(ImportError::invalid(
                        &sheet.name,
                        idx + 1,
                        "no recognised weekday in working days",
                    ));
                }
                imported.working_days = Some(days);
            }
            _ => imported.squad_id = Some(value.as_text()).filter(|s| !s.is_empty()),
        }
    }
    Ok(())
}

/// Weekday names from one or more cells ("Mon, Tue" or one day per cell).
fn parse_working_days(cells: &[Cell]) -> Vec<String> {
    let mut days: Vec<String> = Vec::new();
    for cell in cells {
        for part in cell.as_text().split([',', ';', '/', '|']) {
            if let Some(day) = weekday_from_name(part) {
                let name = WEEKDAY_NAMES[day.num_days_from_monday() as usize].to_string();
                if !days.contains(&name) {
                    days.push(name);
                }
            }
        }
    }
    days
}

fn read_subjects(sheet: &Sheet) -> Result<Vec<Subject>, ImportError> {
    let table = Table::new(
        sheet,
        &[
            Field::Id,
            Field::Name,
            Field::Color,
            Field::TotalLus,
            Field::CourseId,
            Field::MentorId,
            Field::DefaultLuId,
        ],
    );
    let c = &table.columns;
    let name_col = c.require(Field::Name)?;
    let (id, color, total, course, mentor, default_lu) = (
        c.get(Field::Id),
        c.get(Field::Color),
        c.get(Field::TotalLus),
        c.get(Field::CourseId),
        c.get(Field::MentorId),
        c.get(Field::DefaultLuId),
    );

    let mut subjects = Vec::new();
    for (row, row_no) in table.rows() {
        let name = table.text(row, Some(name_col));
        if name.is_empty() {
            return Err(ImportError::invalid(&sheet.name, row_no, "subject name is blank"));
        }
        let mut subject = Subject::new(
            table.optional_text(row, id).unwrap_or_else(|| name.clone()),
            name,
            table.text(row, color),
        )
        .with_total_lus(table.number(row, row_no, total, Field::TotalLus)?);
        subject.course_id = table.optional_text(row, course);
        subject.mentor_id = table.optional_text(row, mentor);
        subject.default_lu_id = table.optional_text(row, default_lu);
        subjects.push(subject);
    }
    Ok(subjects)
}

fn read_slots(sheet: &Sheet) -> Result<Vec<Slot>, ImportError> {
    let table = Table::new(sheet, &[Field::Id, Field::Label, Field::StartTime, Field::EndTime]);
    let start = table.columns.require(Field::StartTime)?;
    let end = table.columns.require(Field::EndTime)?;
    let (id, label) = (table.columns.get(Field::Id), table.columns.get(Field::Label));

    let mut slots = Vec::new();
    for (row, _) in table.rows() {
        let slot_id = table
            .optional_text(row, id)
            .unwrap_or_else(|| format!("P{}", slots.len() + 1));
        let slot_label = table.optional_text(row, label).unwrap_or_else(|| slot_id.clone());
        slots.push(Slot::new(
            slot_id,
            slot_label,
            table.cell(row, Some(start)).as_time_text(),
            table.cell(row, Some(end)).as_time_text(),
        ));
    }
    Ok(slots)
}

fn read_pattern(sheet: &Sheet) -> Result<WeeklyPattern, ImportError> {
    let table = Table::new(sheet, &[Field::Day, Field::Slot, Field::Subject]);
    let day = table.columns.require(Field::Day)?;
    let slot = table.columns.require(Field::Slot)?;
    let subject = table.columns.require(Field::Subject)?;

    let mut pattern = WeeklyPattern::new();
    for (row, row_no) in table.rows() {
        let day_text = table.text(row, Some(day));
        let Some(weekday) = weekday_from_name(&day_text) else {
            return Err(ImportError::invalid(
                &sheet.name,
                row_no,
                format!("'{day_text}' is not a weekday"),
            ));
        };
        let subject_ref = table.text(row, Some(subject));
        if subject_ref.is_empty() {
            continue;
        }
        pattern.assign(
            WEEKDAY_NAMES[weekday.num_days_from_monday() as usize],
            table.text(row, Some(slot)),
            subject_ref,
        );
    }
    Ok(pattern)
}

fn read_holidays(sheet: &Sheet) -> Result<Vec<Holiday>, ImportError> {
    let table = Table::new(sheet, &[Field::Date, Field::Reason]);
    let date = table.columns.require(Field::Date)?;
    let reason = table.columns.get(Field::Reason);

    let mut holidays = Vec::new();
    for (row, row_no) in table.rows() {
        let Some(value) = table.cell(row, Some(date)).as_date_value() else {
            return Err(ImportError::invalid(&sheet.name, row_no, "holiday date is blank"));
        };
        holidays.push(Holiday::new(parse_flexible_date(&value), table.text(row, reason)));
    }
    Ok(holidays)
}

fn read_phases(sheet: &Sheet) -> Result<Vec<Phase>, ImportError> {
    let table = Table::new(
        sheet,
        &[Field::Id, Field::Label, Field::WeekOrder, Field::Duration, Field::EventDays],
    );
    let (id, label) = (table.columns.get(Field::Id), table.columns.get(Field::Label));
    let (duration, events) = (table.columns.get(Field::Duration), table.columns.get(Field::EventDays));

    let mut phases = Vec::new();
    for (row, row_no) in table.rows() {
        let week_order = table.required_number(row, row_no, Field::WeekOrder)?;
        let n = phases.len() + 1;
        let phase_label = table.optional_text(row, label).unwrap_or_else(|| format!("CA {n}"));
        let phase_id = table.optional_text(row, id).unwrap_or_else(|| format!("phase-{n}"));
        phases.push(
            Phase::new(phase_id, phase_label, week_order)
                .with_duration(table.number(row, row_no, duration, Field::Duration)?)
                .with_event_days(table.number(row, row_no, events, Field::EventDays)?),
        );
    }
    Ok(phases)
}

fn read_modules(sheet: &Sheet) -> Result<Vec<(String, Module)>, ImportError> {
    let table = Table::new(
        sheet,
        &[Field::Subject, Field::Name, Field::StartLu, Field::EndLu, Field::Color],
    );
    let subject = table.columns.require(Field::Subject)?;
    let (name, color) = (table.columns.get(Field::Name), table.columns.get(Field::Color));

    let mut modules = Vec::new();
    for (row, row_no) in table.rows() {
        let start_lu = table.required_number(row, row_no, Field::StartLu)?;
        let end_lu = table.required_number(row, row_no, Field::EndLu)?;
        modules.push((
            table.text(row, Some(subject)),
            Module::new(table.text(row, name), start_lu, end_lu, table.text(row, color)),
        ));
    }
    Ok(modules)
}

fn read_mapping(sheet: &Sheet, target: Field) -> Result<Vec<LuMapping>, ImportError> {
    let table = Table::new(sheet, &[Field::Subject, Field::Lu, target]);
    let subject = table.columns.require(Field::Subject)?;
    let value = table.columns.require(target)?;

    let mut entries = Vec::new();
    for (row, row_no) in table.rows() {
        let lu = table.required_number(row, row_no, Field::Lu)?;
        let id = table.text(row, Some(value));
        if id.is_empty() {
            continue;
        }
        entries.push((table.text(row, Some(subject)), lu, id));
    }
    Ok(entries)
}
