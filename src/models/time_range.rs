use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::RangeError;

/// Fixed request format understood by both feeds.
pub const WIRE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// A validated, immutable `[start, end)` wall-clock window.
///
/// Endpoints carry no zone; they are rendered to epoch millis as UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "UncheckedRange")]
pub struct TimeRange {
    start_time: NaiveDateTime,
    end_time: NaiveDateTime,
}

/// Deserialized endpoints before the ordering check.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UncheckedRange {
    start_time: NaiveDateTime,
    end_time: NaiveDateTime,
}

impl TryFrom<UncheckedRange> for TimeRange {
    type Error = RangeError;

    fn try_from(raw: UncheckedRange) -> Result<Self, Self::Error> {
        Self::new(raw.start_time, raw.end_time)
    }
}

impl TimeRange {
    pub fn new(start_time: NaiveDateTime, end_time: NaiveDateTime) -> Result<Self, RangeError> {
        if start_time >= end_time {
            return Err(RangeError::Inverted {
                start: start_time.format(WIRE_FORMAT).to_string(),
                end: end_time.format(WIRE_FORMAT).to_string(),
            });
        }

        Ok(Self {
            start_time,
            end_time,
        })
    }

    pub fn start_time(&self) -> NaiveDateTime {
        self.start_time
    }

    pub fn end_time(&self) -> NaiveDateTime {
        self.end_time
    }

    pub fn start_millis(&self) -> i64 {
        self.start_time.and_utc().timestamp_millis()
    }

    pub fn end_millis(&self) -> i64 {
        self.end_time.and_utc().timestamp_millis()
    }

    pub fn duration_secs(&self) -> u64 {
        (self.end_time - self.start_time).num_seconds().max(0) as u64
    }

    pub fn start_wire(&self) -> String {
        self.start_time.format(WIRE_FORMAT).to_string()
    }

    pub fn end_wire(&self) -> String {
        self.end_time.format(WIRE_FORMAT).to_string()
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start_wire(), self.end_wire())
    }
}
