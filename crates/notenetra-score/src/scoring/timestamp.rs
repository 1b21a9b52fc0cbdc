use std::fmt;

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, NaiveDateTime, Offset, Utc};
use serde::Serialize;

const NAIVE_DATE_TIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

const OFFSET_DATE_TIME_FORMATS: [&str; 2] =
    ["%Y-%m-%d %H:%M:%S%.f%:z", "%Y-%m-%d %H:%M:%S%.f%z"];

const DAY_FIRST_DATE_TIME_FORMATS: [&str; 2] = ["%d-%m-%Y %H:%M:%S", "%d-%m-%Y %H:%M"];

const SLASH_DATE_TIME_FORMATS: [&str; 2] = ["%Y/%m/%d %H:%M:%S", "%Y/%m/%d %H:%M"];

const MIN_EPOCH_MILLIS_DIGITS: usize = 10;

/// Calendar year-month bucket key. Orders chronologically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub fn of(date_time: &NaiveDateTime) -> Self {
        Self {
            year: date_time.year(),
            month: date_time.month(),
        }
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

pub fn utc() -> FixedOffset {
    Utc.fix()
}

/// Parses feed timestamp text into a wall-clock date-time in `timezone`.
///
/// Offset-bearing timestamps are converted into `timezone`; naive ones are
/// taken as already being wall-clock time there. Returns `None` for anything
/// unrecognised, which callers treat as a skippable record.
pub fn parse_timestamp(value: &str, timezone: &FixedOffset) -> Option<NaiveDateTime> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Some(millis) = epoch_millis(trimmed) {
        return DateTime::from_timestamp_millis(millis)
            .map(|instant| instant.with_timezone(timezone).naive_local());
    }

    match leading_field_width(trimmed) {
        4 => parse_year_first(trimmed, timezone),
        2 => parse_day_first(trimmed),
        _ => None,
    }
}

/// Parses `Z`, `UTC`, `+HH:MM`, `-HH:MM`, `+HHMM` or `+HH` into an offset.
pub fn parse_utc_offset(value: &str) -> Option<FixedOffset> {
    let trimmed = value.trim();
    if trimmed.eq_ignore_ascii_case("z") || trimmed.eq_ignore_ascii_case("utc") {
        return Some(utc());
    }

    let (sign, rest) = match trimmed.as_bytes().first() {
        Some(b'+') => (1, &trimmed[1..]),
        Some(b'-') => (-1, &trimmed[1..]),
        _ => return None,
    };

    let digits = rest.replace(':', "");
    if digits.is_empty() || !digits.chars().all(|character| character.is_ascii_digit()) {
        return None;
    }
    let (hours, minutes) = match digits.len() {
        2 => (digits.parse::<i32>().ok()?, 0),
        4 => (
            digits[..2].parse::<i32>().ok()?,
            digits[2..].parse::<i32>().ok()?,
        ),
        _ => return None,
    };
    if hours > 23 || minutes > 59 {
        return None;
    }

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

pub fn format_iso_date(date: &NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub fn format_offset(offset: &FixedOffset) -> String {
    let seconds = offset.local_minus_utc();
    if seconds == 0 {
        return "UTC".to_string();
    }
    let sign = if seconds < 0 { '-' } else { '+' };
    let total_minutes = seconds.abs() / 60;
    format!("{sign}{:02}:{:02}", total_minutes / 60, total_minutes % 60)
}

fn parse_year_first(value: &str, timezone: &FixedOffset) -> Option<NaiveDateTime> {
    if value.as_bytes().get(4) == Some(&b'/') {
        for format in SLASH_DATE_TIME_FORMATS {
            if let Ok(parsed) = NaiveDateTime::parse_from_str(value, format) {
                return Some(parsed);
            }
        }
        return midnight(NaiveDate::parse_from_str(value, "%Y/%m/%d").ok()?);
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.with_timezone(timezone).naive_local());
    }
    for format in OFFSET_DATE_TIME_FORMATS {
        if let Ok(parsed) = DateTime::parse_from_str(value, format) {
            return Some(parsed.with_timezone(timezone).naive_local());
        }
    }
    for format in NAIVE_DATE_TIME_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(value, format) {
            return Some(parsed);
        }
    }
    midnight(NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()?)
}

fn parse_day_first(value: &str) -> Option<NaiveDateTime> {
    if !looks_like_day_first(value) {
        return None;
    }
    for format in DAY_FIRST_DATE_TIME_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(value, format) {
            return Some(parsed);
        }
    }
    midnight(NaiveDate::parse_from_str(value, "%d-%m-%Y").ok()?)
}

fn looks_like_day_first(value: &str) -> bool {
    let bytes = value.as_bytes();
    if bytes.len() < 10 || bytes[2] != b'-' || bytes[5] != b'-' {
        return false;
    }
    [0usize, 1, 3, 4, 6, 7, 8, 9]
        .iter()
        .all(|index| bytes[*index].is_ascii_digit())
}

fn midnight(date: NaiveDate) -> Option<NaiveDateTime> {
    date.and_hms_opt(0, 0, 0)
}

fn epoch_millis(value: &str) -> Option<i64> {
    if value.len() < MIN_EPOCH_MILLIS_DIGITS
        || !value.chars().all(|character| character.is_ascii_digit())
    {
        return None;
    }
    value.parse::<i64>().ok()
}

fn leading_field_width(value: &str) -> usize {
    value
        .chars()
        .take_while(|character| character.is_ascii_digit())
        .count()
}
