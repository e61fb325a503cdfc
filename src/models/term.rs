//! Term configuration model.
//!
//! The configuration is the single input to schedule generation: date
//! range, working weekdays, period slots, subject roster, weekly pattern,
//! holidays and assessment phases. It is immutable for one generation run.
//!
//! # Serialization
//! Field names are camelCase on the wire (`startDate`, `totalLUs`,
//! `weekOrder`) so configurations produced by a form UI load unchanged.
//! Dates are kept as text and normalised at generation time.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use chrono::Weekday;
use serde::{Deserialize, Serialize};

use crate::calendar::weekday_from_name;
use crate::error::ConfigError;

/// Complete configuration of one academic term.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TermConfig {
    /// First day of the term (any accepted date encoding).
    pub start_date: String,
    /// Last day of the term, inclusive.
    pub end_date: String,
    /// Active weekday names ("Monday", ...).
    pub working_days: Vec<String>,
    /// Daily period slots, in display order.
    pub slots: Vec<Slot>,
    /// Subject roster.
    pub subjects: Vec<Subject>,
    /// Weekday → slot → subject assignment.
    pub weekly_pattern: WeeklyPattern,
    /// Non-teaching dates.
    pub holidays: Vec<Holiday>,
    /// Assessment/event cycles, in order.
    pub phases: Vec<Phase>,
    /// Cohort identifier written to the structured matrix export.
    pub squad_id: Option<String>,
}

impl TermConfig {
    /// Creates a configuration for the given date range with a Monday–Friday week.
    pub fn new(start_date: impl Into<String>, end_date: impl Into<String>) -> Self {
        Self {
            start_date: start_date.into(),
            end_date: end_date.into(),
            working_days: ["Monday", "Tuesday", "Wednesday", "Thursday", "Friday"]
                .iter()
                .map(|d| d.to_string())
                .collect(),
            ..Default::default()
        }
    }

    /// Parses a configuration from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Loads a configuration from a JSON file.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Serializes the configuration to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Replaces the set of working weekdays.
    pub fn with_working_days(mut self, days: &[&str]) -> Self {
        self.working_days = days.iter().map(|d| d.to_string()).collect();
        self
    }

    /// Adds a period slot.
    pub fn with_slot(mut self, slot: Slot) -> Self {
        self.slots.push(slot);
        self
    }

    /// Adds a subject.
    pub fn with_subject(mut self, subject: Subject) -> Self {
        self.subjects.push(subject);
        self
    }

    /// Assigns a subject to a slot on a weekday.
    pub fn with_pattern(
        mut self,
        weekday: impl Into<String>,
        slot_id: impl Into<String>,
        subject_id: impl Into<String>,
    ) -> Self {
        self.weekly_pattern.assign(weekday, slot_id, subject_id);
        self
    }

    /// Adds a holiday.
    pub fn with_holiday(mut self, date: impl Into<String>, reason: impl Into<String>) -> Self {
        self.holidays.push(Holiday::new(date, reason));
        self
    }

    /// Appends an assessment phase.
    pub fn with_phase(mut self, phase: Phase) -> Self {
        self.phases.push(phase);
        self
    }

    /// Sets the cohort identifier.
    pub fn with_squad_id(mut self, squad_id: impl Into<String>) -> Self {
        self.squad_id = Some(squad_id.into());
        self
    }

    /// Finds a subject by ID.
    pub fn subject(&self, id: &str) -> Option<&Subject> {
        self.subjects.iter().find(|s| s.id == id)
    }

    /// Finds a slot by ID.
    pub fn slot(&self, id: &str) -> Option<&Slot> {
        self.slots.iter().find(|s| s.id == id)
    }

    /// Active weekdays; unrecognised names are ignored.
    pub fn working_weekdays(&self) -> Vec<Weekday> {
        self.working_days
            .iter()
            .filter_map(|name| weekday_from_name(name))
            .collect()
    }
}

/// A recurring daily period.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Slot {
    /// Unique slot identifier.
    pub id: String,
    /// Display label ("Period 1").
    pub label: String,
    /// Start time, `HH:mm`.
    pub start_time: String,
    /// End time, `HH:mm`.
    pub end_time: String,
}

impl Slot {
    /// Creates a slot.
    pub fn new(
        id: impl Into<String>,
        label: impl Into<String>,
        start_time: impl Into<String>,
        end_time: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            start_time: start_time.into(),
            end_time: end_time.into(),
        }
    }
}

/// A contiguous, colored range of a subject's learning units.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Module {
    /// Display name.
    pub name: String,
    /// First LU number (inclusive, 1-based).
    #[serde(rename = "startLU")]
    pub start_lu: u32,
    /// Last LU number (inclusive).
    #[serde(rename = "endLU")]
    pub end_lu: u32,
    /// Highlight color.
    pub color: String,
}

impl Module {
    /// Creates a module covering `[start_lu, end_lu]`.
    pub fn new(name: impl Into<String>, start_lu: u32, end_lu: u32, color: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            start_lu,
            end_lu,
            color: color.into(),
        }
    }

    /// Whether the LU number falls inside this module.
    #[inline]
    pub fn contains(&self, lu: u32) -> bool {
        lu >= self.start_lu && lu <= self.end_lu
    }
}

/// A subject on the roster.
///
/// `total_lus == 0` marks an untracked subject: it occupies slots but never
/// consumes learning units.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Subject {
    /// Unique subject identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Base color.
    pub color: String,
    /// Number of learning units to deliver (0 = untracked).
    #[serde(rename = "totalLUs")]
    pub total_lus: u32,
    /// LU sub-ranges, in order.
    pub modules: Vec<Module>,
    /// Default external course identifier.
    pub course_id: Option<String>,
    /// External mentor identifier.
    pub mentor_id: Option<String>,
    /// Default external LU identifier.
    pub default_lu_id: Option<String>,
    /// External course identifier per LU number.
    pub course_id_map: BTreeMap<u32, String>,
    /// External LU identifier per LU number.
    pub lu_id_map: BTreeMap<u32, String>,
}

impl Subject {
    /// Creates an untracked subject.
    pub fn new(id: impl Into<String>, name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            color: color.into(),
            ..Default::default()
        }
    }

    /// Sets the number of learning units.
    pub fn with_total_lus(mut self, total_lus: u32) -> Self {
        self.total_lus = total_lus;
        self
    }

    /// Adds a module.
    pub fn with_module(mut self, module: Module) -> Self {
        self.modules.push(module);
        self
    }

    /// Sets the default course identifier.
    pub fn with_course_id(mut self, course_id: impl Into<String>) -> Self {
        self.course_id = Some(course_id.into());
        self
    }

    /// Sets the mentor identifier.
    pub fn with_mentor_id(mut self, mentor_id: impl Into<String>) -> Self {
        self.mentor_id = Some(mentor_id.into());
        self
    }

    /// Sets the default LU identifier.
    pub fn with_default_lu_id(mut self, lu_id: impl Into<String>) -> Self {
        self.default_lu_id = Some(lu_id.into());
        self
    }

    /// Maps one LU number to a course identifier.
    pub fn with_lu_course_id(mut self, lu: u32, course_id: impl Into<String>) -> Self {
        self.course_id_map.insert(lu, course_id.into());
        self
    }

    /// Maps one LU number to an external LU identifier.
    pub fn with_lu_id(mut self, lu: u32, lu_id: impl Into<String>) -> Self {
        self.lu_id_map.insert(lu, lu_id.into());
        self
    }

    /// Whether this subject consumes learning units.
    #[inline]
    pub fn is_tracked(&self) -> bool {
        self.total_lus > 0
    }

    /// The module whose range contains `lu`.
    pub fn module_for_lu(&self, lu: u32) -> Option<&Module> {
        self.modules.iter().find(|m| m.contains(lu))
    }

    /// Module color for `lu`, falling back to the subject color.
    pub fn color_for_lu(&self, lu: u32) -> &str {
        self.module_for_lu(lu)
            .map(|m| m.color.as_str())
            .unwrap_or(&self.color)
    }

    /// Course identifier for `lu`: per-LU map first, then the default.
    pub fn course_id_for_lu(&self, lu: u32) -> Option<&str> {
        self.course_id_map
            .get(&lu)
            .or(self.course_id.as_ref())
            .map(|s| s.as_str())
    }

    /// External LU identifier: per-LU map, then the default, then `LU_<n>`.
    pub fn lu_id_for(&self, lu: u32) -> String {
        self.lu_id_map
            .get(&lu)
            .or(self.default_lu_id.as_ref())
            .cloned()
            .unwrap_or_else(|| format!("LU_{lu}"))
    }
}

/// Weekday → slot → subject assignment.
///
/// Weekday keys are matched case-insensitively and may be abbreviated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeeklyPattern {
    days: BTreeMap<String, BTreeMap<String, String>>,
}

impl WeeklyPattern {
    /// Creates an empty pattern.
    pub fn new() -> Self {
        Self::default()
    }

    /// Assigns a subject to a slot on a weekday.
    pub fn assign(
        &mut self,
        weekday: impl Into<String>,
        slot_id: impl Into<String>,
        subject_id: impl Into<String>,
    ) {
        self.days
            .entry(weekday.into())
            .or_default()
            .insert(slot_id.into(), subject_id.into());
    }

    /// Subject scheduled in `slot_id` on `weekday`, if any.
    pub fn subject_for(&self, weekday: Weekday, slot_id: &str) -> Option<&str> {
        self.days
            .iter()
            .filter(|(name, _)| weekday_from_name(name) == Some(weekday))
            .find_map(|(_, slots)| slots.get(slot_id))
            .map(|s| s.as_str())
            .filter(|s| !s.is_empty())
    }

    /// All `(weekday key, slot id, subject id)` entries.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str, &str)> {
        self.days.iter().flat_map(|(day, slots)| {
            slots
                .iter()
                .map(move |(slot, subject)| (day.as_str(), slot.as_str(), subject.as_str()))
        })
    }

    /// Whether no assignment exists.
    pub fn is_empty(&self) -> bool {
        self.days.values().all(|slots| slots.is_empty())
    }
}

/// A non-teaching date.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Holiday {
    /// Date (any accepted encoding).
    pub date: String,
    /// Reason shown on the day record.
    pub reason: String,
}

impl Holiday {
    /// Creates a holiday.
    pub fn new(date: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            reason: reason.into(),
        }
    }
}

/// An assessment/event cycle.
///
/// The phase window spans `week_order` weeks from the end of the previous
/// window; its last working days hold `duration` assessment days followed
/// by `event_days` event days.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Phase {
    /// Unique phase identifier (tags day records).
    pub id: String,
    /// Display label ("CA 1").
    pub label: String,
    /// Window length in weeks.
    pub week_order: u32,
    /// Working days reserved for assessment.
    pub duration: u32,
    /// Working days reserved for an event.
    pub event_days: u32,
}

impl Phase {
    /// Creates a phase.
    pub fn new(id: impl Into<String>, label: impl Into<String>, week_order: u32) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            week_order,
            duration: 0,
            event_days: 0,
        }
    }

    /// Sets the number of assessment days.
    pub fn with_duration(mut self, duration: u32) -> Self {
        self.duration = duration;
        self
    }

    /// Sets the number of event days.
    pub fn with_event_days(mut self, event_days: u32) -> Self {
        self.event_days = event_days;
        self
    }

    /// Working days requested for the assessment + event block.
    #[inline]
    pub fn block_len(&self) -> u32 {
        self.duration.saturating_add(self.event_days)
    }

    /// Identifier used to tag day records (falls back to the label).
    pub fn tag(&self) -> &str {
        if self.id.is_empty() {
            &self.label
        } else {
            &self.id
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_subject() -> Subject {
        Subject::new("MATH", "Mathematics", "#0000ff")
            .with_total_lus(10)
            .with_module(Module::new("Algebra", 1, 4, "#ff0000"))
            .with_module(Module::new("Geometry", 5, 8, "#00ff00"))
            .with_course_id("C-MATH")
            .with_lu_course_id(2, "C-ALG-2")
            .with_lu_id(3, "LU-ALG-3")
    }

    #[test]
    fn test_module_lookup() {
        let s = sample_subject();
        assert_eq!(s.module_for_lu(1).unwrap().name, "Algebra");
        assert_eq!(s.module_for_lu(5).unwrap().name, "Geometry");
        assert!(s.module_for_lu(9).is_none());
        assert_eq!(s.color_for_lu(4), "#ff0000");
        assert_eq!(s.color_for_lu(9), "#0000ff"); // base color fallback
    }

    #[test]
    fn test_course_and_lu_ids() {
        let s = sample_subject();
        assert_eq!(s.course_id_for_lu(2), Some("C-ALG-2"));
        assert_eq!(s.course_id_for_lu(1), Some("C-MATH"));
        assert_eq!(s.lu_id_for(3), "LU-ALG-3");
        assert_eq!(s.lu_id_for(4), "LU_4");

        let with_default = s.with_default_lu_id("LU-DEFAULT");
        assert_eq!(with_default.lu_id_for(4), "LU-DEFAULT");
        assert_eq!(with_default.lu_id_for(3), "LU-ALG-3");
    }

    #[test]
    fn test_weekly_pattern_lookup() {
        let mut p = WeeklyPattern::new();
        p.assign("Monday", "P1", "MATH");
        p.assign("tue", "P2", "ENG");
        p.assign("Wednesday", "P1", "");

        assert_eq!(p.subject_for(Weekday::Mon, "P1"), Some("MATH"));
        assert_eq!(p.subject_for(Weekday::Tue, "P2"), Some("ENG"));
        assert_eq!(p.subject_for(Weekday::Mon, "P2"), None);
        assert_eq!(p.subject_for(Weekday::Wed, "P1"), None); // blank = empty
        assert_eq!(p.entries().count(), 3);
    }

    #[test]
    fn test_config_json_round_trip() {
        let config = TermConfig::new("2025-01-06", "2025-03-28")
            .with_slot(Slot::new("P1", "Period 1", "09:00", "10:30"))
            .with_subject(sample_subject())
            .with_pattern("Monday", "P1", "MATH")
            .with_holiday("2025-02-14", "Mid-term break")
            .with_phase(Phase::new("CA1", "CA 1", 4).with_duration(2).with_event_days(1));

        let json = config.to_json().unwrap();
        assert!(json.contains("\"totalLUs\": 10"));
        assert!(json.contains("\"weekOrder\": 4"));
        assert!(json.contains("\"startLU\": 1"));

        let back = TermConfig::from_json_str(&json).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn test_config_partial_json() {
        let config = TermConfig::from_json_str(
            r#"{"startDate": "2025-01-06", "endDate": "2025-01-10", "workingDays": ["Monday"]}"#,
        )
        .unwrap();
        assert_eq!(config.working_weekdays(), vec![Weekday::Mon]);
        assert!(config.slots.is_empty());
        assert!(config.weekly_pattern.is_empty());
    }

    #[test]
    fn test_config_invalid_json() {
        assert!(matches!(
            TermConfig::from_json_str("{not json"),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn test_phase_tag() {
        assert_eq!(Phase::new("CA1", "CA 1", 2).tag(), "CA1");
        assert_eq!(Phase::new("", "CA 2", 2).tag(), "CA 2");
        assert_eq!(Phase::new("X", "X", 1).with_duration(2).with_event_days(1).block_len(), 3);
    }
}
