//! Presentation helpers: zh-TW calendar dates and market style tags.

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, NaiveDateTime};

/// Placeholder for a missing date.
pub const EMPTY_DATE: &str = "-";
/// What an unparseable date renders as.
pub const INVALID_DATE: &str = "Invalid Date";

const NAIVE_DATETIME_FORMATS: [&str; 6] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
];

const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%Y/%m/%d"];

/// A parsed date-like value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateValue {
    /// Carried an explicit offset
    Zoned(DateTime<FixedOffset>),
    /// Date or wall-clock time without an offset
    Naive(NaiveDateTime),
}

impl DateValue {
    /// Milliseconds since the Unix epoch. Naive values are read as UTC.
    pub fn epoch_millis(&self) -> i64 {
        match self {
            DateValue::Zoned(dt) => dt.timestamp_millis(),
            DateValue::Naive(dt) => dt.and_utc().timestamp_millis(),
        }
    }

    /// Calendar date as seen from `offset`. Naive values keep their written date.
    pub fn calendar_date(&self, offset: FixedOffset) -> NaiveDate {
        match self {
            DateValue::Zoned(dt) => dt.with_timezone(&offset).date_naive(),
            DateValue::Naive(dt) => dt.date(),
        }
    }
}

/// Parse a date-like string. Returns `None` when no known layout matches.
pub fn parse_date(raw: &str) -> Option<DateValue> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(DateValue::Zoned(dt));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(DateValue::Zoned(dt));
    }
    for fmt in NAIVE_DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(DateValue::Naive(dt));
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(DateValue::Naive(d.and_hms_opt(0, 0, 0)?));
        }
    }
    None
}

/// Epoch milliseconds of a date-like string, `None` if it does not parse.
pub fn date_millis(raw: &str) -> Option<i64> {
    parse_date(raw).map(|d| d.epoch_millis())
}

/// Format as a zh-TW short date (`2024/1/5`).
///
/// `-` for a missing or empty value, `Invalid Date` when it cannot be parsed.
pub fn format_date(value: Option<&str>, offset: FixedOffset) -> String {
    let raw = match value {
        Some(v) if !v.is_empty() => v,
        _ => return EMPTY_DATE.to_string(),
    };
    match parse_date(raw) {
        Some(parsed) => {
            let d = parsed.calendar_date(offset);
            format!("{}/{}/{}", d.year(), d.month(), d.day())
        }
        None => INVALID_DATE.to_string(),
    }
}

/// Style tag for a market name: lowercase, whitespace collapsed to `-`.
/// Records without a market get `unknown`.
pub fn market_tag(market: Option<&str>) -> String {
    match market.map(str::trim) {
        Some(m) if !m.is_empty() => m
            .split_whitespace()
            .collect::<Vec<_>>()
            .join("-")
            .to_lowercase(),
        _ => "unknown".to_string(),
    }
}
