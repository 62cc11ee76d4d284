//! Activity kinds as the single source of truth for activity keys.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Canonical timed activities of a heat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ActivityKind {
    Beer,
    Sail,
    Spin,
}

impl ActivityKind {
    /// All kinds in radar axis order.
    pub const ALL: [Self; 3] = [Self::Beer, Self::Spin, Self::Sail];

    /// Canonical key as stored on the activity type record.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Beer => "Beer",
            Self::Sail => "Sail",
            Self::Spin => "Spin",
        }
    }

    /// Fixed calibration used by the radar comparison.
    #[must_use]
    pub const fn scale(&self) -> PerformanceScale {
        match self {
            Self::Beer => PerformanceScale::new(2.0, 20.0),
            Self::Sail => PerformanceScale::new(10.0, 60.0),
            Self::Spin => PerformanceScale::new(5.0, 30.0),
        }
    }
}

impl fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActivityKind {
    type Err = UnknownActivityKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "beer" => Ok(Self::Beer),
            "sail" => Ok(Self::Sail),
            "spin" => Ok(Self::Spin),
            _ => Err(UnknownActivityKind(s.to_string())),
        }
    }
}

impl Serialize for ActivityKind {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ActivityKind {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Error type for unknown activity key strings.
#[derive(Debug, Clone)]
pub struct UnknownActivityKind(String);

impl fmt::Display for UnknownActivityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown activity kind: {}", self.0)
    }
}

impl std::error::Error for UnknownActivityKind {}

/// Best/worst calibration for one activity, in seconds.
///
/// Times at or under `min_seconds` score 100, times at or over
/// `max_seconds` score 0, and everything between is linear.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PerformanceScale {
    pub min_seconds: f64,
    pub max_seconds: f64,
}

impl PerformanceScale {
    #[must_use]
    pub const fn new(min_seconds: f64, max_seconds: f64) -> Self {
        Self {
            min_seconds,
            max_seconds,
        }
    }

    /// Looks up the calibration for an activity key.
    ///
    /// Returns `None` for keys outside the table.
    pub fn for_key(key: &str) -> Option<Self> {
        key.parse::<ActivityKind>().ok().map(|kind| kind.scale())
    }

    /// Maps a duration onto a 0–100 performance score.
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
    pub fn score(&self, duration_ms: i64) -> u8 {
        if duration_ms <= 0 {
            return 0;
        }
        let seconds = duration_ms as f64 / 1000.0;
        if seconds <= self.min_seconds {
            return 100;
        }
        if seconds >= self.max_seconds {
            return 0;
        }
        let span = self.max_seconds - self.min_seconds;
        let score = (100.0 - (seconds - self.min_seconds) / span * 100.0).round();
        // Strictly between min and max, so the value is within 0..=100
        score.clamp(0.0, 100.0) as u8
    }
}

/// Scores a duration for an activity key, falling back to 0 for unknown keys.
pub fn performance_score(key: &str, duration_ms: i64) -> u8 {
    PerformanceScale::for_key(key).map_or(0, |scale| scale.score(duration_ms))
}
