//! Input validation for term configurations.
//!
//! Checks structural integrity of a [`TermConfig`] before generation.
//! Detects:
//! - Unparseable or inverted term dates
//! - Unknown weekday names
//! - Duplicate subject, slot and phase IDs
//! - Weekly-pattern references to missing slots or subjects
//! - Module LU ranges that are inverted or exceed the subject's LU budget
//! - Unparseable holiday dates
//!
//! Generation never requires validation: the generator tolerates every
//! one of these problems (skipping or degrading). Validation exists so a
//! caller can report them up front.

use std::collections::HashSet;

use chrono::NaiveDate;

use crate::calendar::{parse_date, weekday_from_name};
use crate::models::TermConfig;

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two entities share the same ID.
    DuplicateId,
    /// A date does not parse.
    InvalidDate,
    /// The term ends before it starts.
    InvertedRange,
    /// A weekday name is not recognised.
    UnknownWeekday,
    /// The weekly pattern references a slot that doesn't exist.
    InvalidSlotReference,
    /// The weekly pattern references a subject that doesn't exist.
    InvalidSubjectReference,
    /// A module's LU range is inverted or beyond the subject's LU count.
    InvalidModuleRange,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates a term configuration.
///
/// Checks:
/// 1. Start and end dates parse, and start ≤ end
/// 2. Working-day names are weekdays
/// 3. No duplicate subject, slot or phase IDs
/// 4. Weekly-pattern weekdays, slots and subjects all resolve
/// 5. Module ranges satisfy `1 ≤ start ≤ end ≤ total LUs`
/// 6. Holiday dates parse
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_config(config: &TermConfig) -> ValidationResult {
    let mut errors = Vec::new();

    check_term_dates(config, &mut errors);

    for day in &config.working_days {
        if weekday_from_name(day).is_none() {
            errors.push(ValidationError::new(
                ValidationErrorKind::UnknownWeekday,
                format!("Unknown working day: {day}"),
            ));
        }
    }

    check_unique("subject", config.subjects.iter().map(|s| s.id.as_str()), &mut errors);
    check_unique("slot", config.slots.iter().map(|s| s.id.as_str()), &mut errors);
    check_unique("phase", config.phases.iter().map(|p| p.tag()), &mut errors);

    // Weekly pattern references
    let slot_ids: HashSet<&str> = config.slots.iter().map(|s| s.id.as_str()).collect();
    let subject_ids: HashSet<&str> = config.subjects.iter().map(|s| s.id.as_str()).collect();
    for (day, slot, subject) in config.weekly_pattern.entries() {
        if weekday_from_name(day).is_none() {
            errors.push(ValidationError::new(
                ValidationErrorKind::UnknownWeekday,
                format!("Weekly pattern uses unknown weekday '{day}'"),
            ));
        }
        if !slot_ids.contains(slot) {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidSlotReference,
                format!("Weekly pattern on {day} references unknown slot '{slot}'"),
            ));
        }
        if !subject.is_empty() && !subject_ids.contains(subject) {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidSubjectReference,
                format!("Weekly pattern on {day}/{slot} references unknown subject '{subject}'"),
            ));
        }
    }

    for subject in &config.subjects {
        for module in &subject.modules {
            let inverted = module.start_lu == 0 || module.start_lu > module.end_lu;
            let overflow = subject.is_tracked() && module.end_lu > subject.total_lus;
            if inverted || overflow {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidModuleRange,
                    format!(
                        "Module '{}' of subject '{}' spans LU {}..={} (subject has {})",
                        module.name, subject.id, module.start_lu, module.end_lu, subject.total_lus
                    ),
                ));
            }
        }
    }

    for holiday in &config.holidays {
        if parse_date(&holiday.date).is_none() {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidDate,
                format!("Holiday '{}' has invalid date '{}'", holiday.reason, holiday.date),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_term_dates(config: &TermConfig, errors: &mut Vec<ValidationError>) {
    let start = parse_term_date("start", &config.start_date, errors);
    let end = parse_term_date("end", &config.end_date, errors);
    if let (Some(start), Some(end)) = (start, end) {
        if start > end {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvertedRange,
                format!("Term ends ({end}) before it starts ({start})"),
            ));
        }
    }
}

fn parse_term_date(
    label: &str,
    text: &str,
    errors: &mut Vec<ValidationError>,
) -> Option<NaiveDate> {
    let date = parse_date(text);
    if date.is_none() {
        errors.push(ValidationError::new(
            ValidationErrorKind::InvalidDate,
            format!("Invalid {label} date: '{text}'"),
        ));
    }
    date
}

fn check_unique<'a>(
    entity: &str,
    ids: impl Iterator<Item = &'a str>,
    errors: &mut Vec<ValidationError>,
) {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate {entity} ID: {id}"),
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Module, Phase, Slot, Subject};

    fn sample_config() -> TermConfig {
        TermConfig::new("2025-01-06", "2025-03-28")
            .with_slot(Slot::new("P1", "Period 1", "09:00", "10:30"))
            .with_slot(Slot::new("P2", "Period 2", "10:45", "12:15"))
            .with_subject(
                Subject::new("MATH", "Mathematics", "#2563EB")
                    .with_total_lus(20)
                    .with_module(Module::new("Algebra", 1, 10, "#1D4ED8")),
            )
            .with_subject(Subject::new("PE", "Sport", "#16A34A"))
            .with_pattern("Monday", "P1", "MATH")
            .with_pattern("Tue", "P2", "PE")
            .with_holiday("2025-02-17", "Mid-term")
            .with_phase(Phase::new("CA1", "CA 1", 6).with_duration(2))
    }

    fn kinds(config: &TermConfig) -> Vec<ValidationErrorKind> {
        validate_config(config)
            .unwrap_err()
            .into_iter()
            .map(|e| e.kind)
            .collect()
    }

    #[test]
    fn test_valid_config() {
        assert!(validate_config(&sample_config()).is_ok());
    }

    #[test]
    fn test_invalid_and_inverted_dates() {
        let mut config = sample_config();
        config.start_date = "someday".into();
        assert_eq!(kinds(&config), vec![ValidationErrorKind::InvalidDate]);

        config.start_date = "2025-04-01".into();
        assert_eq!(kinds(&config), vec![ValidationErrorKind::InvertedRange]);
    }

    #[test]
    fn test_duplicate_ids() {
        let config = sample_config()
            .with_slot(Slot::new("P1", "Again", "13:00", "14:00"))
            .with_phase(Phase::new("CA1", "CA 2", 6));

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors.iter().all(|e| e.kind == ValidationErrorKind::DuplicateId));
        assert!(errors.iter().any(|e| e.message.contains("slot")));
        assert!(errors.iter().any(|e| e.message.contains("phase")));
    }

    #[test]
    fn test_pattern_references() {
        let config = sample_config()
            .with_pattern("Wednesday", "P9", "MATH")
            .with_pattern("Thursday", "P1", "GHOST")
            .with_pattern("Caturday", "P2", "PE");

        let found = kinds(&config);
        assert!(found.contains(&ValidationErrorKind::InvalidSlotReference));
        assert!(found.contains(&ValidationErrorKind::InvalidSubjectReference));
        assert!(found.contains(&ValidationErrorKind::UnknownWeekday));
    }

    #[test]
    fn test_blank_pattern_cell_is_not_a_reference() {
        let config = sample_config().with_pattern("Friday", "P1", "");
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_module_ranges() {
        let config = sample_config().with_subject(
            Subject::new("SCI", "Science", "#f00")
                .with_total_lus(5)
                .with_module(Module::new("Late", 4, 8, "#f00"))
                .with_module(Module::new("Backwards", 3, 2, "#f00")),
        );
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors
            .iter()
            .all(|e| e.kind == ValidationErrorKind::InvalidModuleRange));
    }

    #[test]
    fn test_unknown_working_day_and_bad_holiday() {
        let config = sample_config()
            .with_working_days(&["Monday", "Moonday"])
            .with_holiday("next week", "Fair");

        let found = kinds(&config);
        assert_eq!(
            found,
            vec![ValidationErrorKind::UnknownWeekday, ValidationErrorKind::InvalidDate]
        );
    }

    #[test]
    fn test_multiple_errors() {
        let mut config = sample_config().with_pattern("Monday", "P2", "NOPE");
        config.end_date = String::new();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.len() >= 2);
    }
}
