//! Resolved calendar context for one generation run.

use std::collections::{HashMap, HashSet};

use chrono::{Datelike, Months, NaiveDate, Weekday};
use tracing::warn;

use crate::calendar::{format_date, parse_date};
use crate::models::TermConfig;

/// Parsed term boundaries, working weekdays and holiday calendar.
///
/// Built once per generation from the textual configuration. Holidays
/// override everything else; a date is a working day iff its weekday is
/// active AND it is not a holiday.
#[derive(Debug, Clone)]
pub struct TermContext {
    /// First day of the term.
    pub start: NaiveDate,
    /// Last day of the term (inclusive).
    pub end: NaiveDate,
    working_days: HashSet<Weekday>,
    holidays: HashMap<NaiveDate, String>,
}

impl TermContext {
    /// Resolves a configuration.
    ///
    /// Returns `None` for a missing or unparsable date, an inverted range, or
    /// a term longer than `max_span_years`.
    pub fn from_config(config: &TermConfig, max_span_years: u32) -> Option<Self> {
        let Some(start) = parse_date(&config.start_date) else {
            warn!(start_date = %config.start_date, "term start date is missing or unparsable");
            return None;
        };
        let Some(end) = parse_date(&config.end_date) else {
            warn!(end_date = %config.end_date, "term end date is missing or unparsable");
            return None;
        };
        if start > end {
            warn!(start = %format_date(start), end = %format_date(end), "term start is after term end");
            return None;
        }
        let limit = start.checked_add_months(Months::new(max_span_years.saturating_mul(12)));
        if limit.map_or(true, |limit| end > limit) {
            warn!(
                start = %format_date(start),
                end = %format_date(end),
                max_span_years,
                "term spans too many years"
            );
            return None;
        }

        let mut holidays = HashMap::new();
        for holiday in &config.holidays {
            match parse_date(&holiday.date) {
                Some(date) => {
                    holidays.insert(date, holiday.reason.clone());
                }
                None => warn!(date = %holiday.date, "skipping holiday with unparsable date"),
            }
        }

        Some(Self {
            start,
            end,
            working_days: config.working_weekdays().into_iter().collect(),
            holidays,
        })
    }

    /// Whether the date is a configured holiday.
    pub fn is_holiday(&self, date: NaiveDate) -> bool {
        self.holidays.contains_key(&date)
    }

    /// Configured reason of a holiday.
    pub fn holiday_reason(&self, date: NaiveDate) -> Option<&str> {
        self.holidays.get(&date).map(|s| s.as_str())
    }

    /// Whether the date falls on an active weekday.
    pub fn is_active_weekday(&self, date: NaiveDate) -> bool {
        self.working_days.contains(&date.weekday())
    }

    /// Whether lessons can take place on the date.
    pub fn is_working_day(&self, date: NaiveDate) -> bool {
        self.is_active_weekday(date) && !self.is_holiday(date)
    }
}
