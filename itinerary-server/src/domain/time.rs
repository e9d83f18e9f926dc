//! Timestamps for itinerary legs.
//!
//! Itinerary data carries departure and arrival times as `YYYY-MM-DDTHHMM`
//! strings with no timezone. This module wraps them in a type that orders,
//! subtracts and (de)serializes in that format.

use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Wire format of a timestamp, e.g. `2024-05-01T1000`.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H%M";

/// Date format used inside identity keys.
const KEY_DATE_FORMAT: &str = "%m-%d-%Y";

/// Error returned when parsing an invalid timestamp string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid timestamp {input:?}: expected YYYY-MM-DDTHHMM")]
pub struct TimeError {
    input: String,
}

/// A departure or arrival time of a leg.
///
/// # Examples
///
/// ```
/// use itinerary_server::domain::Timestamp;
///
/// let t = Timestamp::parse("2024-05-01T1000").unwrap();
/// assert_eq!(t.to_string(), "2024-05-01T1000");
/// assert_eq!(t.date_key(), "05-01-2024");
///
/// assert!(Timestamp::parse("2024-05-01 10:00").is_err());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(NaiveDateTime);

impl Timestamp {
    /// Wrap an existing date-time.
    pub fn new(datetime: NaiveDateTime) -> Self {
        Self(datetime)
    }

    /// Parse a timestamp from `YYYY-MM-DDTHHMM`.
    pub fn parse(s: &str) -> Result<Self, TimeError> {
        NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT)
            .map(Self)
            .map_err(|_| TimeError {
                input: s.to_string(),
            })
    }

    /// Returns the departure date as used in leg identity keys (`MM-DD-YYYY`).
    pub fn date_key(&self) -> String {
        self.0.format(KEY_DATE_FORMAT).to_string()
    }

    /// Add a duration, returning `None` on overflow.
    pub fn checked_add(&self, duration: Duration) -> Option<Self> {
        self.0.checked_add_signed(duration).map(Self)
    }

    /// Returns the duration between two times.
    ///
    /// Returns a negative duration if `other` is after `self`.
    pub fn signed_duration_since(&self, other: Self) -> Duration {
        self.0.signed_duration_since(other.0)
    }
}

#[cfg(test)]
impl std::ops::Add<Duration> for Timestamp {
    type Output = Self;

    fn add(self, rhs: Duration) -> Self::Output {
        self.checked_add(rhs).expect("timestamp overflow")
    }
}

impl fmt::Debug for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Timestamp({})", self)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(TIMESTAMP_FORMAT))
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Timestamp::parse(&s).map_err(serde::de::Error::custom)
    }
}
