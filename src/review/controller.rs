use std::{sync::Arc, time::Duration};

use serde_json::Value;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::{
    activity::{axis_max, bucket_activity, bucket_signal, BucketingConfig},
    error::{DataShapeWarning, ReviewError, ReviewResult},
    feed::{normalize_activity, CoordinatePayload, ReviewFeed, ACTIVITY_FEED, COORDINATE_FEED},
    models::{ActivitySignal, FrameSize, HeatmapPoint, PositionSample, TimeRange},
    query::validate_range,
    settings::ReviewSettings,
    tracking::{PlaybackSynchronizer, SampleRateClock, TrackDataset},
};

use super::state::{ActivityComparison, ReviewSnapshot, ReviewState, ReviewStatusReport};

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_error, log_info, log_warn};

/// Owns the current range's data and answers playback queries against it.
///
/// Submissions and playback updates arrive independently. Every read takes
/// whatever snapshot is current at that moment; a submission never mutates a
/// published snapshot, it replaces it.
pub struct ReviewController<F: ReviewFeed> {
    feed: Arc<F>,
    state: Arc<Mutex<ReviewState>>,
    bucketing: BucketingConfig,
    synchronizer: PlaybackSynchronizer,
    default_clock: SampleRateClock,
    default_frame: FrameSize,
    fetch_timeout: Duration,
}

impl<F: ReviewFeed> Clone for ReviewController<F> {
    fn clone(&self) -> Self {
        Self {
            feed: Arc::clone(&self.feed),
            state: Arc::clone(&self.state),
            bucketing: self.bucketing.clone(),
            synchronizer: self.synchronizer,
            default_clock: self.default_clock,
            default_frame: self.default_frame,
            fetch_timeout: self.fetch_timeout,
        }
    }
}

impl<F: ReviewFeed> ReviewController<F> {
    pub fn new(feed: F, settings: &ReviewSettings) -> Self {
        Self {
            feed: Arc::new(feed),
            state: Arc::new(Mutex::new(ReviewState::new())),
            bucketing: BucketingConfig::default(),
            synchronizer: PlaybackSynchronizer::new(),
            default_clock: SampleRateClock::new(settings.sample_rate_hz()),
            default_frame: settings.reference_frame,
            fetch_timeout: settings.fetch_timeout(),
        }
    }

    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    pub fn with_bucketing(mut self, bucketing: BucketingConfig) -> Self {
        self.bucketing = bucketing;
        self
    }

    /// Validate a range, fetch both feeds and publish the result.
    ///
    /// A malformed range fails before any request and leaves state untouched.
    /// A later submission or `reset` makes this call return `Superseded`, and
    /// its data is discarded.
    pub async fn submit_range(&self, start: &str, end: &str) -> ReviewResult<Arc<ReviewSnapshot>> {
        let range = validate_range(start, end).map_err(|err| {
            log_warn!("rejected range {start:?}..{end:?}: {err}");
            ReviewError::from(err)
        })?;

        let request_id = Uuid::new_v4();
        let (generation, token) = self.state.lock().await.begin_request(range);
        log_info!("request {request_id} (gen {generation}) submitted for {range}");

        let fetch = async {
            tokio::join!(
                self.feed.fetch_activity(&range),
                self.feed.fetch_coordinates(&range)
            )
        };

        let outcome = tokio::select! {
            _ = token.cancelled() => {
                log_info!("request {request_id} superseded while fetching {range}");
                return Err(ReviewError::Superseded { range: range.to_string() });
            }
            outcome = tokio::time::timeout(self.fetch_timeout, fetch) => outcome,
        };

        let (activity_result, coordinate_result) = match outcome {
            Ok(results) => results,
            Err(_) => {
                let err = ReviewError::feed(
                    "review feeds",
                    format!("no response within {:?}", self.fetch_timeout),
                );
                return Err(self.fail(generation, range, err).await);
            }
        };

        let mut warnings = Vec::new();
        let mut feed_errors = Vec::new();

        let activity = match activity_result {
            Ok(body) => Some(self.activity_from(body, &mut warnings)),
            Err(err) => {
                log_error!("request {request_id}: {err}");
                feed_errors.push(err);
                None
            }
        };

        let dataset = match coordinate_result {
            Ok(body) => Some(self.dataset_from(&range, body, &mut warnings)),
            Err(err) => {
                log_error!("request {request_id}: {err}");
                feed_errors.push(err);
                None
            }
        };

        if activity.is_none() && dataset.is_none() {
            let err = feed_errors
                .into_iter()
                .next()
                .unwrap_or_else(|| ReviewError::feed("review feeds", "no data"));
            return Err(self.fail(generation, range, err).await);
        }

        let activity = activity.unwrap_or_default();
        let buckets = bucket_activity(
            &activity,
            range.start_millis(),
            activity.len() as u64,
            &self.bucketing,
        );
        let dataset = dataset.unwrap_or_else(|| {
            TrackDataset::empty(range.start_millis(), self.default_clock, self.default_frame)
        });

        for warning in &warnings {
            log_warn!("request {request_id}: {warning}");
        }

        let snapshot = Arc::new(ReviewSnapshot {
            request_id,
            range,
            axis_max: axis_max(&buckets, &self.bucketing),
            buckets,
            activity,
            dataset,
            warnings,
            feed_errors: feed_errors.iter().map(ToString::to_string).collect(),
        });

        if !self.state.lock().await.publish(generation, Arc::clone(&snapshot)) {
            log_info!("request {request_id} finished after being superseded; discarded");
            return Err(ReviewError::Superseded {
                range: range.to_string(),
            });
        }

        log_info!(
            "request {request_id} published: {} bucket(s), {} camera(s)",
            snapshot.buckets.len(),
            snapshot.dataset.cameras().count()
        );
        for camera in snapshot.dataset.cameras() {
            log_debug!("  {camera}: {} sample(s)", snapshot.dataset.track_len(camera));
        }

        Ok(snapshot)
    }

    /// Chart another range's activity next to the current one.
    ///
    /// Only the activity feed is read. The published snapshot, status and
    /// playback offset are left as they are, and a later submission does not
    /// cancel a comparison.
    pub async fn compare_activity(&self, start: &str, end: &str) -> ReviewResult<ActivityComparison> {
        let range = validate_range(start, end).map_err(|err| {
            log_warn!("rejected comparison range {start:?}..{end:?}: {err}");
            ReviewError::from(err)
        })?;
        log_info!("comparing activity for {range}");

        let body = tokio::time::timeout(self.fetch_timeout, self.feed.fetch_activity(&range))
            .await
            .map_err(|_| {
                ReviewError::feed(
                    ACTIVITY_FEED,
                    format!("no response within {:?}", self.fetch_timeout),
                )
            })??;

        let mut warnings = Vec::new();
        let activity = self.activity_from(body, &mut warnings);
        let buckets = bucket_signal(&activity, range.start_millis(), &self.bucketing);
        for warning in &warnings {
            log_warn!("comparison {range}: {warning}");
        }

        Ok(ActivityComparison {
            range,
            axis_max: axis_max(&buckets, &self.bucketing),
            buckets,
            warnings,
        })
    }

    fn activity_from(&self, body: Option<Value>, warnings: &mut Vec<DataShapeWarning>) -> ActivitySignal {
        match body {
            Some(body) => {
                let (signal, found) = normalize_activity(&body);
                warnings.extend(found);
                signal
            }
            None => {
                warnings.push(DataShapeWarning::NoData {
                    feed: ACTIVITY_FEED.into(),
                });
                Vec::new()
            }
        }
    }

    fn dataset_from(
        &self,
        range: &TimeRange,
        body: Option<Value>,
        warnings: &mut Vec<DataShapeWarning>,
    ) -> TrackDataset {
        let Some(body) = body else {
            warnings.push(DataShapeWarning::NoData {
                feed: COORDINATE_FEED.into(),
            });
            return TrackDataset::empty(range.start_millis(), self.default_clock, self.default_frame);
        };

        let payload = CoordinatePayload::from_body(&body);
        let clock = payload
            .sample_rate_hz
            .map(SampleRateClock::new)
            .unwrap_or(self.default_clock);
        let frame = payload.frame.unwrap_or(self.default_frame);

        let (dataset, report) =
            TrackDataset::ingest(range.start_millis(), clock, frame, &payload.coordinates);
        warnings.extend(payload.warnings);
        warnings.extend(report.warnings);
        dataset
    }

    async fn fail(&self, generation: u64, range: TimeRange, err: ReviewError) -> ReviewError {
        if self.state.lock().await.fail(generation, err.to_string()) {
            log_error!("range {range} failed: {err}");
            err
        } else {
            ReviewError::Superseded {
                range: range.to_string(),
            }
        }
    }

    /// Forget the current range ("choose new date").
    pub async fn reset(&self) {
        self.state.lock().await.reset();
        log_info!("review state reset");
    }

    /// Record the player's elapsed whole seconds. Returns whether it changed.
    pub async fn set_playback_offset(&self, offset_secs: u64) -> bool {
        let mut state = self.state.lock().await;
        if state.playback_offset_secs == offset_secs {
            return false;
        }
        state.playback_offset_secs = offset_secs;
        log_debug!("playback offset -> {offset_secs}s");
        true
    }

    pub async fn playback_offset(&self) -> u64 {
        self.state.lock().await.playback_offset_secs
    }

    pub async fn snapshot(&self) -> Option<Arc<ReviewSnapshot>> {
        self.state.lock().await.snapshot.clone()
    }

    pub async fn status(&self) -> ReviewStatusReport {
        self.state.lock().await.report()
    }

    async fn current(&self) -> (Option<Arc<ReviewSnapshot>>, u64) {
        let state = self.state.lock().await;
        (state.snapshot.clone(), state.playback_offset_secs)
    }

    /// Samples of `camera` revealed at the current playback offset.
    pub async fn visible_positions(&self, camera: &str) -> Vec<PositionSample> {
        match self.current().await {
            (Some(snapshot), offset) => self
                .synchronizer
                .visible_positions(&snapshot.dataset, camera, offset)
                .to_vec(),
            (None, _) => Vec::new(),
        }
    }

    /// Heat-map points for `camera` at the current offset, scaled to `target`.
    pub async fn visible_heatmap(&self, camera: &str, target: FrameSize) -> Vec<HeatmapPoint> {
        match self.current().await {
            (Some(snapshot), offset) => {
                self.synchronizer
                    .visible_heatmap(&snapshot.dataset, camera, offset, target)
            }
            (None, _) => Vec::new(),
        }
    }
}
