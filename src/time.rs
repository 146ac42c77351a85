//! Two-part Julian dates.
//!
//! An epoch is carried as a whole Julian day plus a fraction of day, exactly
//! like the reference SGP4 implementation does. Summing the two parts into a
//! single `f64` costs roughly 20 µs of resolution in the current era, so they
//! are only ever combined part by part.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, Timelike, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::constants::{DAYS_PER_JULIAN_YEAR, JD_J2000, MINUTES_PER_DAY, SECONDS_PER_DAY};

/// Julian date of the Unix epoch (1970-01-01 00:00 UTC)
const JD_UNIX_EPOCH: f64 = 2_440_587.5;

/// 1970-01-01 counted from 0001-01-01 (day 1), proleptic Gregorian
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum EpochError {
    #[error("invalid calendar date {year:04}-{month:02}-{day:02}")]
    InvalidDate { year: i32, month: u32, day: u32 },
    #[error("invalid time of day {hour:02}:{minute:02}:{second}")]
    InvalidTime { hour: u32, minute: u32, second: f64 },
    #[error("cannot parse epoch '{0}'")]
    Parse(String),
    #[error("julian date {0} is outside the representable calendar range")]
    OutOfRange(f64),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct JulianDate {
    day: f64,
    fraction: f64,
}

impl JulianDate {
    /// Builds a julian date from its two parts. The fraction is normalised
    /// into [0, 1), moving whole days into the day part.
    pub fn new(day: f64, fraction: f64) -> Self {
        let carry = fraction.floor();
        Self {
            day: day + carry,
            fraction: fraction - carry,
        }
    }

    /// Calendar (UTC) to julian date, proleptic Gregorian.
    pub fn from_calendar(
        year: i32,
        month: u32,
        day: u32,
        hour: u32,
        minute: u32,
        second: f64,
    ) -> Result<Self, EpochError> {
        let Some(date) = NaiveDate::from_ymd_opt(year, month, day) else {
            return Err(EpochError::InvalidDate { year, month, day });
        };
        // 60.x is allowed for leap seconds
        if hour > 23 || minute > 59 || !(0.0..61.0).contains(&second) {
            return Err(EpochError::InvalidTime {
                hour,
                minute,
                second,
            });
        }

        let jd = julian_day(&date);
        let fr = (second + minute as f64 * 60.0 + hour as f64 * 3600.0) / SECONDS_PER_DAY;

        Ok(Self::new(jd, fr))
    }

    pub fn from_datetime(datetime: &NaiveDateTime) -> Self {
        let seconds = datetime.second() as f64 + datetime.nanosecond() as f64 * 1e-9;
        let jd = julian_day(&datetime.date());
        let fr = (seconds + datetime.minute() as f64 * 60.0 + datetime.hour() as f64 * 3600.0)
            / SECONDS_PER_DAY;
        Self::new(jd, fr)
    }

    pub fn from_utc(datetime: &DateTime<Utc>) -> Self {
        Self::from_datetime(&datetime.naive_utc())
    }

    /// Parses an ISO-8601 timestamp. Inputs without an offset are taken as
    /// UTC, a bare date means midnight.
    pub fn parse(s: &str) -> Result<Self, EpochError> {
        let s = s.trim();

        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Ok(Self::from_utc(&dt.with_timezone(&Utc)));
        }

        for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
            if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
                return Ok(Self::from_datetime(&naive));
            }
        }

        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|naive| Self::from_datetime(&naive))
            .ok_or_else(|| EpochError::Parse(s.to_string()))
    }

    pub fn day(&self) -> f64 {
        self.day
    }

    pub fn fraction(&self) -> f64 {
        self.fraction
    }

    /// Elapsed minutes from `earlier` to `self`.
    pub fn minutes_since(&self, earlier: &JulianDate) -> f64 {
        (self.day - earlier.day) * MINUTES_PER_DAY
            + (self.fraction - earlier.fraction) * MINUTES_PER_DAY
    }

    pub fn add_seconds(&self, seconds: f64) -> Self {
        Self::new(self.day, self.fraction + seconds / SECONDS_PER_DAY)
    }

    pub fn add_duration(&self, duration: Duration) -> Self {
        let seconds = duration
            .num_nanoseconds()
            .map(|ns| ns as f64 * 1e-9)
            .unwrap_or_else(|| duration.num_milliseconds() as f64 / 1000.0);
        self.add_seconds(seconds)
    }

    /// Julian years elapsed since J2000.0, the time argument of the sidereal
    /// time model and of `sgp4::Constants`.
    pub fn julian_years_since_j2000(&self) -> f64 {
        ((self.day - JD_J2000) + self.fraction) / DAYS_PER_JULIAN_YEAR
    }

    pub fn to_datetime(&self) -> Result<NaiveDateTime, EpochError> {
        let out_of_range = EpochError::OutOfRange(self.day + self.fraction);
        let offset = self.day - JD_UNIX_EPOCH;
        let whole_days = offset.floor();
        if !whole_days.is_finite() || whole_days.abs() >= i64::MAX as f64 {
            return Err(out_of_range);
        }
        let rest = (offset - whole_days) + self.fraction;
        let nanos = (rest * SECONDS_PER_DAY * 1e9).round();

        (whole_days as i64)
            .checked_mul(SECONDS_PER_DAY as i64)
            .and_then(|seconds| DateTime::from_timestamp(seconds, 0))
            .and_then(|base| {
                base.naive_utc()
                    .checked_add_signed(Duration::nanoseconds(nanos as i64))
            })
            .ok_or(out_of_range)
    }

    /// (year, day of year) with the day counted from 1.0 at January 1st
    /// 00:00, as found in the TLE epoch field.
    pub fn year_and_day_of_year(&self) -> Result<(i32, f64), EpochError> {
        let year = self.to_datetime()?.year();
        let january_first = Self::from_calendar(year, 1, 1, 0, 0, 0.0)?;
        let days = (self.day - january_first.day) + (self.fraction - january_first.fraction);
        Ok((year, days + 1.0))
    }
}

/// Julian day number at 00:00 of the given calendar day (ends in .5).
fn julian_day(date: &NaiveDate) -> f64 {
    (date.num_days_from_ce() - UNIX_EPOCH_DAYS_FROM_CE) as f64 + JD_UNIX_EPOCH
}
