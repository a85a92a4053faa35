//! Day and time cell parsers.
//!
//! Timetables are typed by hand, so the same weekday shows up as `Mon`,
//! `monday `, `MON.` or `Thurs`, and times arrive either as native
//! spreadsheet times or as text like `8.30` or `08:30:00`.

use classgrid_core::{CellValue, FieldError, TimeOfDay, Weekday};
use regex::Regex;
use std::sync::OnceLock;

/// Accepted day spellings after lowercasing and stripping non-letters
const DAY_ALIASES: &[(&str, Weekday)] = &[
    ("mon", Weekday::Monday),
    ("monday", Weekday::Monday),
    ("tue", Weekday::Tuesday),
    ("tues", Weekday::Tuesday),
    ("tuesday", Weekday::Tuesday),
    ("wed", Weekday::Wednesday),
    ("weds", Weekday::Wednesday),
    ("wednesday", Weekday::Wednesday),
    ("thu", Weekday::Thursday),
    ("thur", Weekday::Thursday),
    ("thurs", Weekday::Thursday),
    ("thursday", Weekday::Thursday),
    ("fri", Weekday::Friday),
    ("friday", Weekday::Friday),
    ("sat", Weekday::Saturday),
    ("saturday", Weekday::Saturday),
    ("sun", Weekday::Sunday),
    ("sunday", Weekday::Sunday),
];

fn lookup_alias(token: &str) -> Option<Weekday> {
    DAY_ALIASES
        .iter()
        .find(|(alias, _)| *alias == token)
        .map(|(_, day)| *day)
}

/// Normalize a free-form day token to a [`Weekday`].
///
/// Exact alias matches win; otherwise the first three letters are tried
/// against the three-letter aliases, so `Mondays` and `Wedn.` still resolve.
pub fn normalize_day(raw: &str) -> Result<Weekday, FieldError> {
    let token: String = raw
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase())
        .collect();

    if let Some(day) = lookup_alias(&token) {
        return Ok(day);
    }
    if token.len() >= 3 {
        if let Some(day) = lookup_alias(&token[..3]) {
            return Ok(day);
        }
    }
    Err(FieldError::UnrecognizedDay(raw.to_string()))
}

fn time_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^\s*(\d{1,2}):(\d{2})(?::(\d{2}))?\s*$").expect("static time pattern")
    })
}

/// Parse `H:MM`, `HH:MM` or `HH:MM:SS`; `.` is accepted as separator.
pub fn parse_time_str(raw: &str) -> Result<TimeOfDay, FieldError> {
    let unrecognized = || FieldError::UnrecognizedTime(raw.to_string());

    let normalized = raw.trim().replace('.', ":");
    let caps = time_pattern().captures(&normalized).ok_or_else(unrecognized)?;

    let hour: u32 = caps[1].parse().map_err(|_| unrecognized())?;
    let minute: u32 = caps[2].parse().map_err(|_| unrecognized())?;
    if let Some(second) = caps.get(3) {
        let second: u32 = second.as_str().parse().map_err(|_| unrecognized())?;
        if second > 59 {
            return Err(unrecognized());
        }
    }
    TimeOfDay::new(hour, minute).ok_or_else(unrecognized)
}

/// Parse a time cell.
///
/// Empty cells yield `Ok(None)`. Native date-times contribute their time
/// component. Every other scalar goes through [`parse_time_str`].
pub fn parse_time(cell: &CellValue) -> Result<Option<TimeOfDay>, FieldError> {
    match cell {
        c if c.is_empty() => Ok(None),
        CellValue::DateTime(dt) => Ok(Some(TimeOfDay::from(dt.time()))),
        CellValue::Time(t) => Ok(Some(TimeOfDay::from(*t))),
        other => parse_time_str(&other.to_label()).map(Some),
    }
}
