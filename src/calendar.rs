//! Calendar utilities: canonical date formatting, weekday names and
//! lenient date parsing.
//!
//! # Canonical Form
//! Dates are exchanged as `YYYY-MM-DD` strings. Internally the crate works
//! with [`chrono::NaiveDate`]; text only appears at the configuration and
//! spreadsheet boundaries.
//!
//! # Lenient Parsing
//! [`parse_flexible_date`] accepts every encoding a spreadsheet round trip
//! tends to produce:
//! - native dates and date-times,
//! - spreadsheet serial day numbers (epoch 1899-12-30),
//! - `YYYY-MM-DD`-prefixed strings (including ISO date-times),
//! - `D/M/YYYY` and `D-M-YYYY` strings,
//! - RFC 3339 / RFC 2822 timestamps.
//!
//! Anything else is returned unchanged; the parser never fails.

use std::sync::OnceLock;

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, Weekday};
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Sentinel returned by [`format_date_value`] for unparseable input.
pub const INVALID_DATE: &str = "Invalid Date";

/// Weekday names, Monday first.
pub const WEEKDAY_NAMES: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// Fractional-day threshold (20:00) at which a serial timestamp rolls to the
/// next calendar day. Serials written from a timezone east of UTC land a few
/// hours before midnight of the intended date.
const SERIAL_ROLLOVER_HOURS: f64 = 20.0;

/// Serial day numbers beyond this magnitude are not treated as dates.
const MAX_SERIAL_DAYS: f64 = 2_958_465.0;

/// A date as it arrives from a configuration source or a spreadsheet cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DateValue {
    /// A calendar date.
    Date(NaiveDate),
    /// A date-time; only the date part is kept.
    DateTime(NaiveDateTime),
    /// A spreadsheet serial day number.
    Serial(f64),
    /// Free text in one of the accepted encodings.
    Text(String),
}

impl From<NaiveDate> for DateValue {
    fn from(date: NaiveDate) -> Self {
        DateValue::Date(date)
    }
}

impl From<f64> for DateValue {
    fn from(serial: f64) -> Self {
        DateValue::Serial(serial)
    }
}

impl From<&str> for DateValue {
    fn from(text: &str) -> Self {
        DateValue::Text(text.to_string())
    }
}

impl From<String> for DateValue {
    fn from(text: String) -> Self {
        DateValue::Text(text)
    }
}

/// Formats a date as `YYYY-MM-DD`.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Formats any date encoding as `YYYY-MM-DD`.
///
/// Returns [`INVALID_DATE`] instead of failing when the value cannot be
/// interpreted.
pub fn format_date_value(value: &DateValue) -> String {
    resolve_date(value)
        .map(format_date)
        .unwrap_or_else(|| INVALID_DATE.to_string())
}

/// English weekday name for a date ("Monday" .. "Sunday").
pub fn day_name(date: NaiveDate) -> &'static str {
    WEEKDAY_NAMES[date.weekday().num_days_from_monday() as usize]
}

/// Resolves a weekday name, case-insensitively.
///
/// Accepts full names and any prefix of at least three letters ("mon",
/// "Tues", "Thurs", "Wed."). Three letters already identify a weekday.
pub fn weekday_from_name(name: &str) -> Option<Weekday> {
    let name = name.trim().trim_end_matches('.').to_ascii_lowercase();
    if name.len() < 3 {
        return None;
    }
    WEEKDAY_NAMES
        .iter()
        .position(|full| full.to_ascii_lowercase().starts_with(&name))
        .and_then(|idx| Weekday::try_from(idx as u8).ok())
}

/// Normalises a date value to `YYYY-MM-DD`.
///
/// Unrecognised input is returned unchanged (best effort, never fails).
pub fn parse_flexible_date(value: &DateValue) -> String {
    match resolve_date(value) {
        Some(date) => format_date(date),
        None => match value {
            DateValue::Text(text) => text.clone(),
            DateValue::Serial(serial) => serial.to_string(),
            // Date variants always resolve.
            DateValue::Date(d) => format_date(*d),
            DateValue::DateTime(dt) => format_date(dt.date()),
        },
    }
}

/// Parses text in any accepted encoding into a date.
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    resolve_text(text)
}

/// Resolves a date value to a calendar date.
pub fn resolve_date(value: &DateValue) -> Option<NaiveDate> {
    match value {
        DateValue::Date(date) => Some(*date),
        DateValue::DateTime(dt) => Some(dt.date()),
        DateValue::Serial(serial) => from_serial(*serial),
        DateValue::Text(text) => resolve_text(text),
    }
}

/// Converts a spreadsheet serial day number to a date.
///
/// Whole part counts days from 1899-12-30; a fractional part at or past
/// 20:00 rolls forward to the next day.
pub fn from_serial(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || serial.abs() > MAX_SERIAL_DAYS {
        return None;
    }
    let whole = serial.floor();
    let hours = (serial - whole) * 24.0;
    let mut days = whole as i64;
    if hours >= SERIAL_ROLLOVER_HOURS {
        days += 1;
    }
    serial_epoch().checked_add_signed(Duration::days(days))
}

/// Converts a date to its spreadsheet serial day number.
pub fn to_serial(date: NaiveDate) -> f64 {
    (date - serial_epoch()).num_days() as f64
}

fn serial_epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(1899, 12, 30).unwrap_or(NaiveDate::MIN)
}

fn resolve_text(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    if let Some(caps) = iso_prefix().captures(text) {
        let year = caps[1].parse().ok()?;
        let month = caps[2].parse().ok()?;
        let day = caps[3].parse().ok()?;
        return NaiveDate::from_ymd_opt(year, month, day);
    }

    if let Some(caps) = day_month_year().captures(text) {
        let day = caps[1].parse().ok()?;
        let month = caps[2].parse().ok()?;
        let year = caps[3].parse().ok()?;
        return NaiveDate::from_ymd_opt(year, month, day);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(text) {
        return Some(dt.date_naive());
    }

    None
}

fn iso_prefix() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\d{4})-(\d{2})-(\d{2})").expect("static pattern"))
}

fn day_month_year() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(\d{1,2})[/-](\d{1,2})[/-](\d{4})$").expect("static pattern")
    })
}
