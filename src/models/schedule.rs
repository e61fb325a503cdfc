//! Generated schedule model.
//!
//! A schedule is an ordered run of day records, one per calendar date of
//! the term, each resolving every period slot to an occupancy.

use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Fixed color of assessment slots.
pub const ASSESSMENT_COLOR: &str = "#F59E0B";
/// Fixed color of event slots.
pub const EVENT_COLOR: &str = "#8B5CF6";
/// Fixed color of occupancies past a subject's last LU.
pub const COMPLETED_COLOR: &str = "#9CA3AF";

/// Status of a calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayStatus {
    /// Ordinary instructional day.
    Working,
    /// Configured holiday.
    Holiday,
    /// Non-working weekday.
    Weekend,
    /// Reserved; never produced by generation.
    Blocked,
    /// Continuous assessment day.
    Ca,
    /// Event day.
    Event,
}

impl DayStatus {
    /// Lowercase status code.
    pub fn as_str(&self) -> &'static str {
        match self {
            DayStatus::Working => "working",
            DayStatus::Holiday => "holiday",
            DayStatus::Weekend => "weekend",
            DayStatus::Blocked => "blocked",
            DayStatus::Ca => "ca",
            DayStatus::Event => "event",
        }
    }
}

/// What occupies a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OccupancyKind {
    /// A subject lesson.
    Subject,
    /// Continuous assessment.
    Ca,
    /// Event.
    Event,
    /// Nothing scheduled.
    Empty,
}

/// Learning-unit state of a subject occupancy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LuProgress {
    /// Not a tracked subject lesson.
    Untracked,
    /// Consumes the given LU number.
    Unit(u32),
    /// Past the subject's last LU.
    Completed,
}

/// Resolved content of one slot on one day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotOccupancy {
    /// Occupancy kind.
    pub kind: OccupancyKind,
    /// Display label.
    pub label: String,
    /// Display color.
    pub color: Option<String>,
    /// Owning subject (kind = subject).
    pub subject_id: Option<String>,
    /// Learning-unit state (kind = subject).
    pub progress: LuProgress,
    /// Resolved external course identifier (kind = subject).
    pub course_id: Option<String>,
}

impl SlotOccupancy {
    /// An empty slot.
    pub fn empty() -> Self {
        Self {
            kind: OccupancyKind::Empty,
            label: String::new(),
            color: None,
            subject_id: None,
            progress: LuProgress::Untracked,
            course_id: None,
        }
    }

    /// An assessment slot.
    pub fn assessment(label: impl Into<String>) -> Self {
        Self {
            kind: OccupancyKind::Ca,
            label: label.into(),
            color: Some(ASSESSMENT_COLOR.to_string()),
            ..Self::empty()
        }
    }

    /// An event slot.
    pub fn event(label: impl Into<String>) -> Self {
        Self {
            kind: OccupancyKind::Event,
            label: label.into(),
            color: Some(EVENT_COLOR.to_string()),
            ..Self::empty()
        }
    }

    /// A subject lesson.
    pub fn subject(
        subject_id: impl Into<String>,
        label: impl Into<String>,
        color: impl Into<String>,
        progress: LuProgress,
    ) -> Self {
        Self {
            kind: OccupancyKind::Subject,
            label: label.into(),
            color: Some(color.into()),
            subject_id: Some(subject_id.into()),
            progress,
            course_id: None,
        }
    }

    /// Sets the course identifier.
    pub fn with_course_id(mut self, course_id: Option<String>) -> Self {
        self.course_id = course_id;
        self
    }

    /// LU number consumed by this occupancy.
    pub fn lu(&self) -> Option<u32> {
        match self.progress {
            LuProgress::Unit(n) => Some(n),
            LuProgress::Untracked | LuProgress::Completed => None,
        }
    }

    /// Whether this is a subject lesson past its last LU.
    pub fn is_completed(&self) -> bool {
        self.progress == LuProgress::Completed
    }

    /// Whether this is a subject lesson that still delivers content.
    pub fn is_learning(&self) -> bool {
        self.kind == OccupancyKind::Subject && !self.is_completed()
    }

    /// Whether the slot belongs to `subject_id`.
    pub fn is_subject(&self, subject_id: &str) -> bool {
        self.subject_id.as_deref() == Some(subject_id)
    }
}

/// One calendar date of the schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayRecord {
    /// Calendar date.
    pub date: NaiveDate,
    /// Weekday name.
    pub weekday: String,
    /// Week number (1-based) relative to the numbering anchor.
    pub week_number: u32,
    /// Day within the week (1..=7) relative to the numbering anchor.
    pub day_in_week: u32,
    /// Owning phase identifier, if inside a phase window.
    pub phase_id: Option<String>,
    /// Day status.
    pub status: DayStatus,
    /// Human-readable reason (holiday name, phase label).
    pub reason: Option<String>,
    /// Slot id → occupancy, in slot definition order.
    pub slots: IndexMap<String, SlotOccupancy>,
}

impl DayRecord {
    /// Occupancy of a slot.
    pub fn slot(&self, slot_id: &str) -> Option<&SlotOccupancy> {
        self.slots.get(slot_id)
    }

    /// Whether the day has at least one lesson that still delivers content.
    pub fn is_learning_day(&self) -> bool {
        self.status == DayStatus::Working && self.slots.values().any(|o| o.is_learning())
    }
}

/// A generated schedule.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    /// Day records in ascending date order.
    pub days: Vec<DayRecord>,
    /// Whether generation stopped at the iteration ceiling.
    pub truncated: bool,
}

impl Schedule {
    /// Creates an empty schedule.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of day records.
    pub fn len(&self) -> usize {
        self.days.len()
    }

    /// Whether no day was generated.
    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Iterates day records in date order.
    pub fn iter(&self) -> impl Iterator<Item = &DayRecord> {
        self.days.iter()
    }

    /// Finds the record for a date.
    pub fn day(&self, date: NaiveDate) -> Option<&DayRecord> {
        self.days
            .binary_search_by_key(&date, |d| d.date)
            .ok()
            .map(|idx| &self.days[idx])
    }

    /// First date with the given status and phase tag.
    pub fn first_date_with(&self, status: DayStatus, phase_id: &str) -> Option<NaiveDate> {
        self.days
            .iter()
            .find(|d| d.status == status && d.phase_id.as_deref() == Some(phase_id))
            .map(|d| d.date)
    }

    /// All occupancies of a subject as `(day, slot id, occupancy)`, in order.
    pub fn occupancies_of<'a>(
        &'a self,
        subject_id: &'a str,
    ) -> impl Iterator<Item = (&'a DayRecord, &'a str, &'a SlotOccupancy)> + 'a {
        self.days.iter().flat_map(move |day| {
            day.slots
                .iter()
                .filter(move |(_, occ)| occ.is_subject(subject_id))
                .map(move |(slot_id, occ)| (day, slot_id.as_str(), occ))
        })
    }
}
