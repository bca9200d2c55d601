use chrono::{NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::error::RangeError;
use crate::models::TimeRange;

/// Accepted user inputs; pickers often stop at minute resolution.
const INPUT_FORMATS: [&str; 6] = [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// A candidate range as typed by the user, not yet validated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeRangeQuery {
    pub start_time: String,
    pub end_time: String,
}

impl TimeRangeQuery {
    pub fn new(start_time: impl Into<String>, end_time: impl Into<String>) -> Self {
        Self {
            start_time: start_time.into(),
            end_time: end_time.into(),
        }
    }

    /// Parse both endpoints and require `start < end`.
    pub fn validate(&self) -> Result<TimeRange, RangeError> {
        let start = parse_timestamp("start", &self.start_time)?;
        let end = parse_timestamp("end", &self.end_time)?;
        TimeRange::new(start, end)
    }
}

/// Parse one endpoint to second resolution. Sub-second input is truncated.
pub fn parse_timestamp(field: &'static str, raw: &str) -> Result<NaiveDateTime, RangeError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(RangeError::Missing { field });
    }

    INPUT_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
        .and_then(|parsed| parsed.with_nanosecond(0))
        .ok_or_else(|| RangeError::Unparseable {
            field,
            value: trimmed.to_string(),
        })
}

/// Validate a `(start, end)` pair in one call.
pub fn validate_range(start_time: &str, end_time: &str) -> Result<TimeRange, RangeError> {
    TimeRangeQuery::new(start_time, end_time).validate()
}
