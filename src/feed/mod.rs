//! Collaborators that supply a range's activity signal and position tracks.

pub mod http;
pub mod payload;

use std::future::Future;

use serde_json::Value;

use crate::error::ReviewResult;
use crate::models::TimeRange;

pub use http::HttpFeed;
pub use payload::{normalize_activity, CoordinatePayload};

/// Name of the per-second activity feed, as it appears in warnings and errors.
pub const ACTIVITY_FEED: &str = "activity-data";
/// Name of the per-camera coordinate feed.
pub const COORDINATE_FEED: &str = "coordinate-data";

/// Source of raw JSON bodies for a validated range.
///
/// `Ok(None)` means the feed has no data for the range, which is reported but
/// not treated as a failure.
pub trait ReviewFeed: Send + Sync {
    fn fetch_activity(
        &self,
        range: &TimeRange,
    ) -> impl Future<Output = ReviewResult<Option<Value>>> + Send;

    fn fetch_coordinates(
        &self,
        range: &TimeRange,
    ) -> impl Future<Output = ReviewResult<Option<Value>>> + Send;
}
