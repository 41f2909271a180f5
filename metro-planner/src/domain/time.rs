//! Clock time handling for the metro timetable.
//!
//! Riders give times as "HH:MM" strings and the schedule counts minutes
//! since midnight. Travel times are fractional (a half-minute dwell is
//! common), so a `ClockTime` stores milliseconds since midnight and only
//! rounds to whole minutes for display.

use std::fmt;
use std::ops::Add;

use chrono::{Duration, NaiveTime, Timelike};

const MILLIS_PER_MINUTE: i64 = 60_000;
const MINUTES_PER_DAY: i64 = 24 * 60;

/// Error returned when parsing an invalid time string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid time: {reason}")]
pub struct TimeError {
    reason: &'static str,
}

impl TimeError {
    fn new(reason: &'static str) -> Self {
        Self { reason }
    }
}

/// A time of day on the service day.
///
/// Values past midnight are allowed (a train leaving at 23:00 arrives after
/// 23:00); they display wrapped to the 24-hour clock.
///
/// # Examples
///
/// ```
/// use metro_planner::domain::ClockTime;
///
/// let time = ClockTime::parse_hhmm("09:18").unwrap();
/// assert_eq!(time.to_string(), "09:18");
/// assert_eq!(time.as_minutes(), 558.0);
/// ```
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClockTime {
    millis: i64,
}

impl ClockTime {
    /// Create a time from whole minutes since midnight.
    pub const fn from_minutes(minutes: i64) -> Self {
        Self {
            millis: minutes * MILLIS_PER_MINUTE,
        }
    }

    /// Create a time from an hour (0-23) and minute (0-59).
    pub fn from_hm(hour: u32, minute: u32) -> Result<Self, TimeError> {
        if hour > 23 {
            return Err(TimeError::new("hour must be 0-23"));
        }
        if minute > 59 {
            return Err(TimeError::new("minute must be 0-59"));
        }
        Ok(Self::from_minutes(i64::from(hour * 60 + minute)))
    }

    /// Parse a time from "HH:MM" format. A single-digit hour is accepted.
    ///
    /// # Examples
    ///
    /// ```
    /// use metro_planner::domain::ClockTime;
    ///
    /// assert!(ClockTime::parse_hhmm("00:00").is_ok());
    /// assert!(ClockTime::parse_hhmm("9:05").is_ok());
    /// assert!(ClockTime::parse_hhmm(" 23:59 ").is_ok());
    ///
    /// assert!(ClockTime::parse_hhmm("0930").is_err());
    /// assert!(ClockTime::parse_hhmm("09:5").is_err());
    /// assert!(ClockTime::parse_hhmm("24:00").is_err());
    /// ```
    pub fn parse_hhmm(s: &str) -> Result<Self, TimeError> {
        let s = s.trim();
        let (hours, minutes) = s
            .split_once(':')
            .ok_or_else(|| TimeError::new("expected HH:MM format"))?;

        if hours.is_empty() || hours.len() > 2 {
            return Err(TimeError::new("expected one or two hour digits"));
        }
        if minutes.len() != 2 {
            return Err(TimeError::new("expected two minute digits"));
        }

        let hour = parse_digits(hours).ok_or_else(|| TimeError::new("invalid hour digits"))?;
        let minute =
            parse_digits(minutes).ok_or_else(|| TimeError::new("invalid minute digits"))?;

        Self::from_hm(hour, minute)
    }

    /// Minutes since midnight, including any fractional part.
    pub fn as_minutes(&self) -> f64 {
        self.millis as f64 / MILLIS_PER_MINUTE as f64
    }

    /// Minutes since midnight rounded to the nearest whole minute
    /// (halves round up).
    pub fn whole_minutes(&self) -> i64 {
        round_minutes(self.millis)
    }

    /// Returns the duration between two times.
    ///
    /// Returns a negative duration if `other` is after `self`.
    pub fn signed_duration_since(&self, other: Self) -> Duration {
        Duration::milliseconds(self.millis - other.millis)
    }

    /// The wall-clock time this value shows, wrapped to the 24-hour day.
    pub fn to_naive_time(&self) -> NaiveTime {
        let minute_of_day = self.whole_minutes().rem_euclid(MINUTES_PER_DAY);
        // Both components are in range after the rem_euclid above.
        NaiveTime::from_hms_opt((minute_of_day / 60) as u32, (minute_of_day % 60) as u32, 0)
            .unwrap_or(NaiveTime::MIN)
    }

    /// Format as a 12-hour clock time, e.g. "06:00 AM".
    pub fn to_12h_string(&self) -> String {
        let time = self.to_naive_time();
        let (is_pm, hour) = time.hour12();
        let suffix = if is_pm { "PM" } else { "AM" };
        format!("{:02}:{:02} {suffix}", hour, time.minute())
    }
}

impl Add<Duration> for ClockTime {
    type Output = Self;

    fn add(self, rhs: Duration) -> Self::Output {
        Self {
            millis: self.millis.saturating_add(rhs.num_milliseconds()),
        }
    }
}

impl fmt::Debug for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ClockTime({} min)", self.as_minutes())
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let time = self.to_naive_time();
        write!(f, "{:02}:{:02}", time.hour(), time.minute())
    }
}

impl TryFrom<String> for ClockTime {
    type Error = TimeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse_hhmm(&value)
    }
}

impl serde::Serialize for ClockTime {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> serde::Deserialize<'de> for ClockTime {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::try_from(s).map_err(serde::de::Error::custom)
    }
}

/// Convert fractional minutes into a duration, at millisecond precision.
///
/// Negative and non-finite inputs yield a zero duration.
pub fn minutes(value: f64) -> Duration {
    if !value.is_finite() || value <= 0.0 {
        return Duration::zero();
    }
    Duration::milliseconds((value * MILLIS_PER_MINUTE as f64).round() as i64)
}

/// Round a duration to whole minutes (halves away from zero).
pub fn whole_minutes(duration: Duration) -> i64 {
    round_minutes(duration.num_milliseconds())
}

/// A duration as fractional minutes.
pub fn as_minutes(duration: Duration) -> f64 {
    duration.num_milliseconds() as f64 / MILLIS_PER_MINUTE as f64
}

fn round_minutes(millis: i64) -> i64 {
    (millis as f64 / MILLIS_PER_MINUTE as f64).round() as i64
}

fn parse_digits(s: &str) -> Option<u32> {
    if !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}
