use std::cmp::Ordering;

use crate::models::disposition::{DispositionRecord, SortDirection, SortKind, SortState};
use crate::utils::format::date_millis;

/// Comparable projection of one record field.
///
/// `None` stands for a value that does not coerce (NaN for numbers and
/// dates). Those form one equivalence class ordered after every real value,
/// so the comparator stays a total order.
#[derive(Debug, Clone, PartialEq)]
enum SortValue {
    Number(Option<f64>),
    Date(Option<i64>),
    Text(String),
}

impl SortValue {
    fn of(record: &DispositionRecord, state: &SortState) -> Option<Self> {
        let key = state.key?;
        // null fields compare as the empty string
        let raw = record.field(key).unwrap_or("");
        Some(match key.kind() {
            SortKind::Numeric => SortValue::Number(to_number(raw)),
            SortKind::Date => SortValue::Date(date_millis(raw)),
            SortKind::Text => SortValue::Text(raw.to_lowercase()),
        })
    }

    fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (SortValue::Number(a), SortValue::Number(b)) => {
                nan_last(*a, *b, |x, y| x.partial_cmp(y).unwrap_or(Ordering::Equal))
            }
            (SortValue::Date(a), SortValue::Date(b)) => nan_last(*a, *b, |x, y| x.cmp(y)),
            (SortValue::Text(a), SortValue::Text(b)) => a.cmp(b),
            // A single sort pass never mixes kinds
            _ => Ordering::Equal,
        }
    }
}

fn nan_last<T>(a: Option<T>, b: Option<T>, cmp: impl Fn(&T, &T) -> Ordering) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => cmp(&x, &y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Numeric coercion for symbol codes: blank is zero, anything that is not a
/// decimal literal (or `Infinity`) does not coerce.
pub fn to_number(raw: &str) -> Option<f64> {
    let s = raw.trim();
    if s.is_empty() {
        return Some(0.0);
    }
    match s {
        "Infinity" | "+Infinity" => return Some(f64::INFINITY),
        "-Infinity" => return Some(f64::NEG_INFINITY),
        _ => {}
    }
    // Rust also accepts "inf" and "nan" spellings
    if s.chars().any(|c| c.is_ascii_alphabetic() && c != 'e' && c != 'E') {
        return None;
    }
    s.parse::<f64>().ok().filter(|n| !n.is_nan())
}

/// Order records for display without touching the source slice.
///
/// A `None` key returns the fetched order as is. The sort is stable in both
/// directions: records that compare equal keep their relative input order.
pub fn sort_records<'a>(
    records: &'a [DispositionRecord],
    state: &SortState,
) -> Vec<&'a DispositionRecord> {
    if state.key.is_none() {
        return records.iter().collect();
    }

    let mut keyed: Vec<(Option<SortValue>, &DispositionRecord)> = records
        .iter()
        .map(|r| (SortValue::of(r, state), r))
        .collect();

    keyed.sort_by(|(a, _), (b, _)| {
        let ord = match (a, b) {
            (Some(a), Some(b)) => a.compare(b),
            _ => Ordering::Equal,
        };
        match state.direction {
            SortDirection::Asc => ord,
            SortDirection::Desc => ord.reverse(),
        }
    });

    keyed.into_iter().map(|(_, r)| r).collect()
}
