//! Clock-time codec.
//!
//! Time logs carry a wall-clock string `HH:MM:SS[.mmm]`. Everything
//! downstream works in integer milliseconds since midnight.

use chrono::{NaiveTime, Timelike};
use thiserror::Error;

const MS_PER_SECOND: i64 = 1000;

/// A clock string that does not match `HH:MM:SS[.mmm]`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("malformed clock time {input:?}: {reason}")]
pub struct ClockError {
    pub input: String,
    pub reason: &'static str,
}

impl ClockError {
    fn new(input: &str, reason: &'static str) -> Self {
        Self {
            input: input.to_string(),
            reason,
        }
    }
}

fn parse_field(input: &str, field: &str, reason: &'static str) -> Result<i64, ClockError> {
    if field.is_empty() || !field.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ClockError::new(input, reason));
    }
    field.parse().map_err(|_| ClockError::new(input, reason))
}

/// Parses `HH:MM:SS[.mmm]` into milliseconds since midnight.
///
/// The fractional part is read as a decimal fraction of a second, so
/// `.5` and `.500` are both 500 ms. Digits past the third are ignored.
/// Hours are not bounded to a day.
pub fn parse_clock_time(s: &str) -> Result<i64, ClockError> {
    let mut parts = s.trim().split(':');
    let (Some(h), Some(m), Some(rest), None) = (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(ClockError::new(s, "expected HH:MM:SS"));
    };

    let (sec, frac) = rest.split_once('.').unwrap_or((rest, ""));

    let hours = parse_field(s, h, "invalid hours")?;
    let minutes = parse_field(s, m, "invalid minutes")?;
    let seconds = parse_field(s, sec, "invalid seconds")?;

    let millis = if frac.is_empty() {
        if rest.ends_with('.') {
            return Err(ClockError::new(s, "empty fraction"));
        }
        0
    } else {
        if !frac.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ClockError::new(s, "invalid fraction"));
        }
        let digits: String = frac.chars().chain("00".chars()).take(3).collect();
        parse_field(s, &digits, "invalid fraction")?
    };

    hours
        .checked_mul(60)
        .and_then(|h| h.checked_add(minutes))
        .and_then(|m| m.checked_mul(60))
        .and_then(|m| m.checked_add(seconds))
        .and_then(|secs| secs.checked_mul(MS_PER_SECOND))
        .and_then(|ms| ms.checked_add(millis))
        .ok_or_else(|| ClockError::new(s, "out of range"))
}

/// Formats a millisecond count as `MM:SS:mmm`.
///
/// Minutes are not wrapped into hours. Negative counts keep a leading `-`.
pub fn format_duration(ms: i64) -> String {
    let sign = if ms < 0 { "-" } else { "" };
    let ms = ms.unsigned_abs();
    let minutes = ms / 60_000;
    let seconds = (ms % 60_000) / 1000;
    let millis = ms % 1000;
    format!("{sign}{minutes:02}:{seconds:02}:{millis:03}")
}

/// Signed difference `end - start` in milliseconds.
///
/// No day rollover is applied: an end before the start yields a negative value.
pub fn duration_between(start: &str, end: &str) -> Result<i64, ClockError> {
    Ok(parse_clock_time(end)? - parse_clock_time(start)?)
}

/// Milliseconds as fractional seconds.
#[allow(clippy::cast_precision_loss)]
pub fn millis_to_seconds(ms: i64) -> f64 {
    ms as f64 / MS_PER_SECOND as f64
}

/// Seconds rendered with `precision` decimal digits.
///
/// A negative precision renders the floored whole number of seconds.
pub fn format_seconds(ms: i64, precision: i32) -> String {
    let seconds = millis_to_seconds(ms);
    match usize::try_from(precision) {
        Ok(digits) => format!("{seconds:.digits$}"),
        Err(_) => format!("{}", seconds.floor()),
    }
}

/// Revolutions per minute for a fixed revolution count over `duration_ms`.
///
/// A zero duration yields infinity.
pub fn rpm_from_duration(duration_ms: i64, revolutions: u32) -> f64 {
    f64::from(revolutions) / millis_to_seconds(duration_ms) * 60.0
}

/// Renders a wall-clock instant the way judges' devices stamp time logs.
pub fn clock_time_string(time: NaiveTime) -> String {
    format!(
        "{:02}:{:02}:{:02}.{:03}",
        time.hour(),
        time.minute(),
        time.second(),
        (time.nanosecond() / 1_000_000).min(999)
    )
}

/// Seconds since midnight for a wall-clock instant.
pub fn seconds_since_midnight(time: NaiveTime) -> f64 {
    f64::from(time.num_seconds_from_midnight()) + f64::from(time.nanosecond()) / 1e9
}
