use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::error::DataShapeWarning;
use crate::models::{ActivitySignal, ChartBucket, TimeRange};
use crate::tracking::TrackDataset;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum ReviewStatus {
    #[default]
    Idle,
    Loading,
    Ready,
    Failed,
}

/// Everything one resolved range produced. Never mutated after publication.
#[derive(Debug, Clone)]
pub struct ReviewSnapshot {
    pub request_id: Uuid,
    pub range: TimeRange,
    pub activity: ActivitySignal,
    pub buckets: Vec<ChartBucket>,
    pub axis_max: u64,
    pub dataset: TrackDataset,
    pub warnings: Vec<DataShapeWarning>,
    /// Feed failures that left part of the snapshot empty.
    pub feed_errors: Vec<String>,
}

/// A second range's activity chart, built alongside the current snapshot.
#[derive(Debug, Clone)]
pub struct ActivityComparison {
    pub range: TimeRange,
    pub buckets: Vec<ChartBucket>,
    pub axis_max: u64,
    pub warnings: Vec<DataShapeWarning>,
}

/// Serializable view of the controller for a status line.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReviewStatusReport {
    pub status: ReviewStatus,
    pub range: Option<TimeRange>,
    pub playback_offset_secs: u64,
    pub last_error: Option<String>,
}

#[derive(Debug, Default)]
pub struct ReviewState {
    pub status: ReviewStatus,
    /// Bumped by every submission and reset; only the latest may publish.
    pub generation: u64,
    pub pending_range: Option<TimeRange>,
    pub snapshot: Option<Arc<ReviewSnapshot>>,
    pub playback_offset_secs: u64,
    pub last_error: Option<String>,
    in_flight: Option<CancellationToken>,
}

impl ReviewState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new request: cancel the previous one and drop its data.
    pub fn begin_request(&mut self, range: TimeRange) -> (u64, CancellationToken) {
        self.cancel_in_flight();
        self.generation = self.generation.wrapping_add(1);

        let token = CancellationToken::new();
        self.in_flight = Some(token.clone());
        self.status = ReviewStatus::Loading;
        self.pending_range = Some(range);
        self.snapshot = None;
        self.playback_offset_secs = 0;
        self.last_error = None;

        (self.generation, token)
    }

    pub fn is_current(&self, generation: u64) -> bool {
        self.generation == generation
    }

    /// Returns false, leaving state untouched, if `generation` is stale.
    pub fn publish(&mut self, generation: u64, snapshot: Arc<ReviewSnapshot>) -> bool {
        if !self.is_current(generation) {
            return false;
        }

        self.last_error = snapshot.feed_errors.first().cloned();
        self.snapshot = Some(snapshot);
        self.status = ReviewStatus::Ready;
        self.pending_range = None;
        self.in_flight = None;
        true
    }

    pub fn fail(&mut self, generation: u64, message: String) -> bool {
        if !self.is_current(generation) {
            return false;
        }

        self.status = ReviewStatus::Failed;
        self.last_error = Some(message);
        self.in_flight = None;
        true
    }

    /// Back to idle: no range, no data, offset zero.
    pub fn reset(&mut self) {
        self.cancel_in_flight();
        self.generation = self.generation.wrapping_add(1);
        self.status = ReviewStatus::Idle;
        self.pending_range = None;
        self.snapshot = None;
        self.playback_offset_secs = 0;
        self.last_error = None;
    }

    pub fn report(&self) -> ReviewStatusReport {
        ReviewStatusReport {
            status: self.status,
            range: self
                .snapshot
                .as_ref()
                .map(|snapshot| snapshot.range)
                .or(self.pending_range),
            playback_offset_secs: self.playback_offset_secs,
            last_error: self.last_error.clone(),
        }
    }

    fn cancel_in_flight(&mut self) {
        if let Some(token) = self.in_flight.take() {
            token.cancel();
        }
    }
}
