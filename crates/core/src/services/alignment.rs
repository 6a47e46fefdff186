use chrono::{Duration, NaiveDate, NaiveDateTime};

use crate::models::measurement::Dated;

/// Truncate an ISO-8601 timestamp to its leading `YYYY-MM-DD`.
///
/// Anything that does not start with that pattern is returned unchanged,
/// so callers must tolerate non-date strings flowing through.
pub fn extract_date(timestamp: &str) -> String {
    let b = timestamp.as_bytes();
    let is_digits = |range: std::ops::Range<usize>| b[range].iter().all(u8::is_ascii_digit);

    if b.len() >= 10 && is_digits(0..4) && b[4] == b'-' && is_digits(5..7) && b[7] == b'-' && is_digits(8..10)
    {
        timestamp[..10].to_string()
    } else {
        timestamp.to_string()
    }
}

/// Parse the aligned day of a record, if it is a real calendar date.
pub fn aligned_day<T: Dated>(record: &T) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(&record.aligned_date(), "%Y-%m-%d").ok()
}

/// First record (in the given order) whose aligned date is `date`.
pub fn select_for_date<T: Dated>(records: &[T], date: NaiveDate) -> Option<&T> {
    let target = date.format("%Y-%m-%d").to_string();
    records.iter().find(|r| r.aligned_date() == target)
}

/// Record with the latest aligned date; ties keep the first seen.
/// Records without a parseable date are ignored.
pub fn newest<T: Dated>(records: &[T]) -> Option<&T> {
    records
        .iter()
        .filter_map(|r| aligned_day(r).map(|d| (d, r)))
        .fold(None, |best: Option<(NaiveDate, &T)>, (d, r)| match best {
            Some((bd, _)) if bd >= d => best,
            _ => Some((d, r)),
        })
        .map(|(_, r)| r)
}

/// Record with the earliest aligned date; ties keep the first seen.
pub fn oldest<T: Dated>(records: &[T]) -> Option<&T> {
    records
        .iter()
        .filter_map(|r| aligned_day(r).map(|d| (d, r)))
        .fold(None, |best: Option<(NaiveDate, &T)>, (d, r)| match best {
            Some((bd, _)) if bd <= d => best,
            _ => Some((d, r)),
        })
        .map(|(_, r)| r)
}

/// Arithmetic mean of `field` over the `window_days` calendar days ending at `end`.
///
/// The window runs from 00:00:00 of `end − (window_days − 1)` to 23:59:59 of
/// `end`, and every record is placed at noon of its aligned day, so a record
/// is counted exactly when its day lies inside the window. Input order does
/// not matter. Returns `None` when nothing falls inside the window.
pub fn trend<T, F>(records: &[T], end: NaiveDate, window_days: u32, field: F) -> Option<f64>
where
    T: Dated,
    F: Fn(&T) -> Option<f64>,
{
    if window_days == 0 {
        return None;
    }

    let start_day = end - Duration::days(i64::from(window_days) - 1);
    let window_start = start_day.and_hms_opt(0, 0, 0)?;
    let window_end = end.and_hms_opt(23, 59, 59)?;

    let (sum, count) = records
        .iter()
        .filter_map(|r| {
            let at: NaiveDateTime = aligned_day(r)?.and_hms_opt(12, 0, 0)?;
            if at < window_start || at > window_end {
                return None;
            }
            field(r)
        })
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));

    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}
