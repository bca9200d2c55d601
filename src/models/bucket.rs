use serde::{Deserialize, Serialize};

/// One boolean per elapsed second, index 0 at the range start.
pub type ActivitySignal = Vec<bool>;

/// A contiguous span of seconds collapsed into one chart bar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartBucket {
    pub start_millis: i64,
    pub end_millis: i64,
    pub active_count: u64,
    pub inactive_count: u64,
    /// Seconds covered; the final bucket may be narrower than the interval.
    pub width: u64,
    /// `HH:MM:SS - HH:MM:SS`, rendered in UTC.
    pub label: String,
}
