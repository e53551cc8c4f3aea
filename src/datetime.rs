//! Date and time helpers.
//!
//! UTC-aware "now" and timestamp conversions, readable formatting, parsing,
//! and conversion to a fixed GMT+1 offset (no daylight saving).

use std::fmt::{self, Write as _};

use chrono::{
    DateTime, Datelike, FixedOffset, Month, NaiveDateTime, Offset, TimeDelta, TimeZone, Utc,
};

/// Default pattern for [`format_datetime`]: `2024-01-31 13:45:00`.
pub const DEFAULT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const GMT_PLUS_1_SECS: i32 = 3600;

/// The current time in UTC.
pub fn aware_utc_now() -> DateTime<Utc> {
    Utc::now()
}

/// The current UTC time without a timezone attached.
pub fn naive_utc_now() -> NaiveDateTime {
    Utc::now().naive_utc()
}

/// Convert a POSIX timestamp in (fractional) seconds to a UTC datetime.
///
/// Returns `None` for non-finite or out-of-range timestamps.
///
/// ```rust
/// use quas_utils::datetime::aware_utc_from_timestamp;
///
/// let dt = aware_utc_from_timestamp(1_700_000_000.5).unwrap();
/// assert_eq!(dt.to_rfc3339(), "2023-11-14T22:13:20.500+00:00");
/// assert!(aware_utc_from_timestamp(f64::NAN).is_none());
/// ```
pub fn aware_utc_from_timestamp(timestamp: f64) -> Option<DateTime<Utc>> {
    if !timestamp.is_finite() {
        return None;
    }
    let secs = timestamp.floor();
    if secs < i64::MIN as f64 || secs > i64::MAX as f64 {
        return None;
    }
    let nanos = ((timestamp - secs) * 1e9).round().min(999_999_999.0) as u32;
    DateTime::from_timestamp(secs as i64, nanos)
}

/// Like [`aware_utc_from_timestamp`], without the timezone.
pub fn naive_utc_from_timestamp(timestamp: f64) -> Option<NaiveDateTime> {
    aware_utc_from_timestamp(timestamp).map(|dt| dt.naive_utc())
}

/// Format the day and month of a date, e.g. `"1st January"`.
///
/// ```rust
/// use chrono::NaiveDate;
/// use quas_utils::datetime::format_date_readable;
///
/// let date = NaiveDate::from_ymd_opt(2024, 6, 22).unwrap();
/// assert_eq!(format_date_readable(&date), "22nd June");
/// ```
pub fn format_date_readable<D: Datelike>(date: &D) -> String {
    let day = date.day();
    let month = u8::try_from(date.month())
        .ok()
        .and_then(|m| Month::try_from(m).ok())
        .map_or("", |m| m.name());
    format!("{}{} {}", day, ordinal_suffix(day), month)
}

fn ordinal_suffix(day: u32) -> &'static str {
    if (11..=13).contains(&(day % 100)) {
        return "th";
    }
    match day % 10 {
        1 => "st",
        2 => "nd",
        3 => "rd",
        _ => "th",
    }
}

/// Format a datetime with a strftime-style pattern.
///
/// Fails instead of panicking when the pattern contains an invalid
/// specifier.
///
/// ```rust
/// use chrono::{TimeZone, Utc};
/// use quas_utils::datetime::{format_datetime, DEFAULT_FORMAT};
///
/// let dt = Utc.with_ymd_and_hms(2024, 1, 31, 13, 45, 0).unwrap();
/// assert_eq!(format_datetime(&dt, DEFAULT_FORMAT).unwrap(), "2024-01-31 13:45:00");
/// assert!(format_datetime(&dt, "%Q").is_err());
/// ```
pub fn format_datetime<Tz>(dt: &DateTime<Tz>, fmt: &str) -> Result<String, fmt::Error>
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    let mut out = String::new();
    write!(out, "{}", dt.format(fmt))?;
    Ok(out)
}

/// [`format_datetime`] for naive datetimes.
pub fn format_naive(dt: &NaiveDateTime, fmt: &str) -> Result<String, fmt::Error> {
    let mut out = String::new();
    write!(out, "{}", dt.format(fmt))?;
    Ok(out)
}

/// Parse a naive datetime with a strftime-style pattern.
///
/// ```rust
/// use quas_utils::datetime::{parse_datetime, DEFAULT_FORMAT};
///
/// let dt = parse_datetime("2024-01-31 13:45:00", DEFAULT_FORMAT).unwrap();
/// assert_eq!(dt.to_string(), "2024-01-31 13:45:00");
/// assert!(parse_datetime("yesterday", DEFAULT_FORMAT).is_err());
/// ```
pub fn parse_datetime(s: &str, fmt: &str) -> Result<NaiveDateTime, chrono::ParseError> {
    NaiveDateTime::parse_from_str(s, fmt)
}

/// The fixed +01:00 offset.
pub fn gmt_plus_1() -> FixedOffset {
    FixedOffset::east_opt(GMT_PLUS_1_SECS).unwrap_or_else(|| Utc.fix())
}

/// Express a UTC datetime at a fixed +01:00 offset.
///
/// ```rust
/// use chrono::{TimeZone, Utc};
/// use quas_utils::datetime::to_gmt_plus_1;
///
/// let dt = Utc.with_ymd_and_hms(2024, 12, 31, 23, 30, 0).unwrap();
/// assert_eq!(to_gmt_plus_1(dt).to_rfc3339(), "2025-01-01T00:30:00+01:00");
/// ```
pub fn to_gmt_plus_1(dt: DateTime<Utc>) -> DateTime<FixedOffset> {
    dt.with_timezone(&gmt_plus_1())
}

/// [`to_gmt_plus_1`] over an optional value.
pub fn to_gmt_plus_1_or_none(dt: Option<DateTime<Utc>>) -> Option<DateTime<FixedOffset>> {
    dt.map(to_gmt_plus_1)
}

/// Shift a naive UTC datetime forward one hour.
///
/// Returns `None` on overflow at the end of the representable range.
pub fn shift_naive_to_gmt_plus_1(dt: NaiveDateTime) -> Option<NaiveDateTime> {
    dt.checked_add_signed(TimeDelta::seconds(i64::from(GMT_PLUS_1_SECS)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Timelike};

    #[test]
    fn test_ordinal_suffixes() {
        let cases = [
            (1, "st"),
            (2, "nd"),
            (3, "rd"),
            (4, "th"),
            (11, "th"),
            (12, "th"),
            (13, "th"),
            (21, "st"),
            (22, "nd"),
            (23, "rd"),
            (30, "th"),
            (31, "st"),
        ];
        for (day, suffix) in cases {
            assert_eq!(ordinal_suffix(day), suffix, "day {}", day);
        }
    }

    #[test]
    fn test_format_date_readable() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert_eq!(format_date_readable(&date), "1st January");

        let date = NaiveDate::from_ymd_opt(2024, 5, 11).unwrap();
        assert_eq!(format_date_readable(&date), "11th May");

        let dt = Utc.with_ymd_and_hms(2024, 3, 3, 0, 0, 0).unwrap();
        assert_eq!(format_date_readable(&dt), "3rd March");
    }

    #[test]
    fn test_timestamp_roundtrip_whole_seconds() {
        let dt = aware_utc_from_timestamp(0.0).unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(1970, 1, 1, 0, 0, 0).unwrap());
        let naive = naive_utc_from_timestamp(86_400.0).unwrap();
        assert_eq!(naive.date(), NaiveDate::from_ymd_opt(1970, 1, 2).unwrap());
    }

    #[test]
    fn test_negative_fractional_timestamp() {
        let dt = aware_utc_from_timestamp(-0.25).unwrap();
        assert_eq!(dt.timestamp(), -1);
        assert_eq!(dt.nanosecond(), 750_000_000);
    }

    #[test]
    fn test_out_of_range_timestamps() {
        assert!(aware_utc_from_timestamp(f64::INFINITY).is_none());
        assert!(aware_utc_from_timestamp(1e20).is_none());
        assert!(naive_utc_from_timestamp(-1e20).is_none());
    }

    #[test]
    fn test_now_helpers_agree() {
        let aware = aware_utc_now();
        let naive = naive_utc_now();
        let drift = naive - aware.naive_utc();
        assert!(drift.num_seconds().abs() < 5);
    }

    #[test]
    fn test_gmt_plus_1_keeps_instant() {
        let dt = Utc.with_ymd_and_hms(2024, 7, 1, 12, 0, 0).unwrap();
        let shifted = to_gmt_plus_1(dt);
        assert_eq!(shifted, dt);
        assert_eq!(shifted.hour(), 13);
        assert_eq!(shifted.offset().local_minus_utc(), 3600);
    }

    #[test]
    fn test_gmt_plus_1_or_none() {
        assert!(to_gmt_plus_1_or_none(None).is_none());
        let dt = Utc.with_ymd_and_hms(2024, 7, 1, 12, 0, 0).unwrap();
        assert_eq!(to_gmt_plus_1_or_none(Some(dt)).map(|d| d.hour()), Some(13));
    }

    #[test]
    fn test_shift_naive() {
        let dt = parse_datetime("2024-02-29 23:15:00", DEFAULT_FORMAT).unwrap();
        let shifted = shift_naive_to_gmt_plus_1(dt).unwrap();
        assert_eq!(format_naive(&shifted, DEFAULT_FORMAT).unwrap(), "2024-03-01 00:15:00");
        assert!(shift_naive_to_gmt_plus_1(NaiveDateTime::MAX).is_none());
    }

    #[test]
    fn test_format_naive_rejects_bad_pattern() {
        let dt = naive_utc_now();
        assert!(format_naive(&dt, "%Q").is_err());
    }
}
