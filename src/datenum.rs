//! Date-number conversion
//!
//! A date number is a continuous day count on the proleptic Gregorian calendar
//! where 0001-01-01 is day 1. Unix time maps onto it as
//! `seconds / 86400 + EPOCH_ORDINAL`.

use crate::errors::{PierDataError, Result};
use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

/// Seconds per day
pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// Date number of 1970-01-01
pub const EPOCH_ORDINAL: f64 = 719_163.0;

/// Ordinal of a calendar date (0001-01-01 is 1)
pub fn ordinal(date: NaiveDate) -> i64 {
    i64::from(date.num_days_from_ce())
}

/// Converts seconds since 1970-01-01 to a date number.
pub fn seconds_to_datenum(seconds: f64) -> f64 {
    seconds / SECONDS_PER_DAY + EPOCH_ORDINAL
}

/// Date number of midnight on `date`.
pub fn datenum_from_date(date: NaiveDate) -> f64 {
    ordinal(date) as f64
}

/// Date number of a naive (UTC) timestamp, fractional days included.
pub fn datenum_from_datetime(dt: NaiveDateTime) -> f64 {
    datenum_from_date(dt.date()) + seconds_into_day(dt.time()) / SECONDS_PER_DAY
}

fn seconds_into_day(time: NaiveTime) -> f64 {
    f64::from(time.num_seconds_from_midnight()) + f64::from(time.nanosecond()) / 1e9
}

/// Inverse of [`datenum_from_datetime`], to millisecond precision.
///
/// Returns `None` for non-finite input or dates outside chrono's range.
pub fn datenum_to_datetime(dnum: f64) -> Option<NaiveDateTime> {
    if !dnum.is_finite() {
        return None;
    }
    let days = dnum.floor();
    let millis = ((dnum - days) * SECONDS_PER_DAY * 1000.0).round() as i64;
    let date = NaiveDate::from_num_days_from_ce_opt(i32::try_from(days as i64).ok()?)?;
    date.and_hms_opt(0, 0, 0)?
        .checked_add_signed(Duration::milliseconds(millis))
}

/// Parses a date bound given as `YYYY-MM-DD`, `YYYY-MM-DDTHH:MM:SS`
/// (a space separator is also accepted) or a bare date number.
pub fn parse_datenum(s: &str) -> Result<f64> {
    let s = s.trim();
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S"))
    {
        return Ok(datenum_from_datetime(dt));
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(datenum_from_date(date));
    }
    match s.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(PierDataError::InvalidDate(format!(
            "'{}' is neither YYYY-MM-DD[THH:MM:SS] nor a date number",
            s
        ))),
    }
}

/// CF time units of the form `<unit> since <reference>`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeUnits {
    /// Seconds per unit step
    pub scale: f64,
    /// Reference instant as seconds since 1970-01-01
    pub offset: f64,
}

impl TimeUnits {
    /// Plain Unix seconds
    pub const UNIX_SECONDS: TimeUnits = TimeUnits {
        scale: 1.0,
        offset: 0.0,
    };

    /// Converts a raw value in these units to seconds since 1970-01-01.
    pub fn to_epoch_seconds(&self, value: f64) -> f64 {
        value * self.scale + self.offset
    }
}

/// Parses a CF `units` string such as `seconds since 1970-01-01 00:00:00 UTC`.
///
/// Returns `None` if the string is not understood.
pub fn parse_time_units(units: &str) -> Option<TimeUnits> {
    let lowered = units.trim().to_ascii_lowercase();
    let (unit, reference) = lowered.split_once(" since ")?;

    let scale = match unit.trim() {
        "seconds" | "second" | "secs" | "sec" | "s" => 1.0,
        "minutes" | "minute" | "mins" | "min" => 60.0,
        "hours" | "hour" | "hrs" | "hr" | "h" => 3_600.0,
        "days" | "day" | "d" => SECONDS_PER_DAY,
        _ => return None,
    };

    let reference = reference
        .trim()
        .trim_end_matches("utc")
        .trim_end_matches('z')
        .trim();
    let reference = reference.replace('t', " ");
    let mut parts = reference.split_whitespace();
    let date = NaiveDate::parse_from_str(parts.next()?, "%Y-%m-%d").ok()?;
    let time = match parts.next() {
        Some(t) => NaiveTime::parse_from_str(t, "%H:%M:%S%.f")
            .or_else(|_| NaiveTime::parse_from_str(t, "%H:%M"))
            .ok()?,
        None => NaiveTime::from_hms_opt(0, 0, 0)?,
    };
    let utc_offset = match parts.next() {
        Some(zone) => parse_utc_offset(zone)?,
        None => 0.0,
    };
    if parts.next().is_some() {
        return None;
    }

    let offset = (datenum_from_date(date) - EPOCH_ORDINAL) * SECONDS_PER_DAY
        + seconds_into_day(time)
        - utc_offset;
    Some(TimeUnits { scale, offset })
}

/// Seconds east of UTC for `+HH:MM`, `-HHMM`, `+H` style zone designators
fn parse_utc_offset(zone: &str) -> Option<f64> {
    let (sign, digits) = match zone.as_bytes().first()? {
        b'+' => (1.0, &zone[1..]),
        b'-' => (-1.0, &zone[1..]),
        _ => return None,
    };
    let (hours, minutes) = match digits.split_once(':') {
        Some((h, m)) => (h, m),
        None if digits.len() == 4 => digits.split_at(2),
        None => (digits, "0"),
    };
    let hours: u32 = hours.parse().ok()?;
    let minutes: u32 = minutes.parse().ok()?;
    if hours > 14 || minutes > 59 {
        return None;
    }
    Some(sign * f64::from(hours * 3_600 + minutes * 60))
}
