//! UTC calendar-day helpers.

use chrono::{DateTime, Days, NaiveDate, NaiveTime, TimeZone, Utc};

use crate::error::{Result, StatsError};

/// Parses a `YYYY-MM-DD` day.
///
/// # Errors
///
/// Returns [`StatsError::InvalidDate`] when the input is not a calendar date.
pub fn parse_day(input: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
        .map_err(|e| StatsError::InvalidDate(format!("{input}: {e}")))
}

/// Rejects ranges whose start is after their end.
///
/// # Errors
///
/// Returns [`StatsError::InvalidRange`] when `from > to`.
pub fn check_range(from: NaiveDate, to: NaiveDate) -> Result<()> {
    if from > to {
        return Err(StatsError::InvalidRange { from: from.to_string(), to: to.to_string() });
    }
    Ok(())
}

/// Every calendar day in `[from, to]`, ascending. Empty when `from > to`.
#[must_use]
pub fn each_day(from: NaiveDate, to: NaiveDate) -> Vec<NaiveDate> {
    let mut days = Vec::new();
    let mut cur = from;
    while cur <= to {
        days.push(cur);
        match cur.checked_add_days(Days::new(1)) {
            Some(next) => cur = next,
            None => break,
        }
    }
    days
}

/// `from` at 00:00:00 UTC.
#[must_use]
pub fn start_of(day: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&day.and_time(NaiveTime::MIN))
}

/// `to` at 23:59:59 UTC, the inclusive upper bound used for commit windows.
#[must_use]
pub fn end_of(day: NaiveDate) -> DateTime<Utc> {
    let last_second = NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(NaiveTime::MIN);
    Utc.from_utc_datetime(&day.and_time(last_second))
}

/// Formats a timestamp the way the GitHub API expects (`2024-03-01T00:00:00Z`).
#[must_use]
pub fn api_timestamp(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(s: &str) -> NaiveDate {
        parse_day(s).unwrap()
    }

    #[test]
    fn each_day_crosses_month_boundary() {
        let days: Vec<String> =
            each_day(day("2024-01-30"), day("2024-02-02")).iter().map(ToString::to_string).collect();
        assert_eq!(days, vec!["2024-01-30", "2024-01-31", "2024-02-01", "2024-02-02"]);
    }

    #[test]
    fn each_day_handles_leap_day_and_single_day() {
        assert_eq!(each_day(day("2024-02-28"), day("2024-03-01")).len(), 3);
        assert_eq!(each_day(day("2024-03-01"), day("2024-03-01")), vec![day("2024-03-01")]);
    }

    #[test]
    fn each_day_is_empty_for_backwards_range() {
        assert!(each_day(day("2024-03-02"), day("2024-03-01")).is_empty());
        assert!(check_range(day("2024-03-02"), day("2024-03-01")).is_err());
        assert!(check_range(day("2024-03-01"), day("2024-03-01")).is_ok());
    }

    #[test]
    fn parse_day_rejects_garbage() {
        assert!(matches!(parse_day("2024-13-01"), Err(StatsError::InvalidDate(_))));
        assert!(parse_day("yesterday").is_err());
        assert_eq!(parse_day(" 2024-03-01 ").unwrap(), day("2024-03-01"));
    }

    #[test]
    fn window_bounds_cover_whole_days() {
        assert_eq!(api_timestamp(start_of(day("2024-03-01"))), "2024-03-01T00:00:00Z");
        assert_eq!(api_timestamp(end_of(day("2024-03-05"))), "2024-03-05T23:59:59Z");
    }
}
