mod activity;
mod error;
mod feed;
mod models;
mod query;
mod review;
mod settings;
mod tracking;
mod utils;

pub use activity::{axis_max, bucket_activity, bucket_signal, BucketingConfig};
pub use error::{DataShapeWarning, RangeError, ReviewError, ReviewResult};
pub use feed::{
    normalize_activity, CoordinatePayload, HttpFeed, ReviewFeed, ACTIVITY_FEED, COORDINATE_FEED,
};
pub use models::{
    ActivitySignal, ChartBucket, FrameSize, HeatmapPoint, PositionSample, ProjectedPoint,
    TimeRange, WIRE_FORMAT,
};
pub use query::{parse_timestamp, validate_range, TimeRangeQuery};
pub use review::{
    ActivityComparison, ReviewController, ReviewSnapshot, ReviewState, ReviewStatus,
    ReviewStatusReport,
};
pub use settings::{ReviewSettings, SettingsStore};
pub use tracking::{
    camera_name, canonical_camera_name, heatmap_points, project, sample_index_for_offset,
    IngestReport, PlaybackSynchronizer, SampleRateClock, TrackDataset, DEFAULT_SAMPLE_RATE_HZ,
};

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use serde::Serialize;

#[derive(Parser, Debug)]
#[command(
    name = "lemur-review",
    about = "Fetch a recorded range and report activity buckets and tracked positions"
)]
pub struct Cli {
    /// Range start, YYYY-MM-DDTHH:MM[:SS]
    #[arg(long)]
    pub start: String,

    /// Range end, YYYY-MM-DDTHH:MM[:SS]
    #[arg(long)]
    pub end: String,

    #[arg(long, default_value = "Camera1")]
    pub camera: String,

    /// Elapsed playback seconds to report positions for
    #[arg(long, default_value_t = 0)]
    pub offset: u64,

    /// Render heat-map points at this width/height instead of raw positions
    #[arg(long, num_args = 2, value_names = ["WIDTH", "HEIGHT"])]
    pub heatmap: Option<Vec<f64>>,

    #[arg(long, default_value = "lemur_review_settings.json")]
    pub settings: PathBuf,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RangeReport {
    range: TimeRange,
    camera: String,
    video_url: String,
    playback_offset_secs: u64,
    axis_max: u64,
    buckets: Vec<ChartBucket>,
    #[serde(skip_serializing_if = "Option::is_none")]
    positions: Option<Vec<PositionSample>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    heatmap: Option<Vec<HeatmapPoint>>,
    warnings: Vec<String>,
    feed_errors: Vec<String>,
}

pub fn run() -> anyhow::Result<()> {
    // Initialize logging (reads RUST_LOG env var)
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let cli = Cli::parse();
    log::info!("lemur-review starting up...");

    let settings = SettingsStore::new(cli.settings.clone())?.get();
    let feed = HttpFeed::from_settings(&settings)?;
    let controller = ReviewController::new(feed.clone(), &settings);

    let runtime = tokio::runtime::Runtime::new().context("failed to start async runtime")?;
    let report = runtime.block_on(async {
        let snapshot = controller.submit_range(&cli.start, &cli.end).await?;
        controller.set_playback_offset(cli.offset).await;

        let camera = canonical_camera_name(&cli.camera);
        let (positions, heatmap) = match cli.heatmap.as_deref() {
            Some([width, height]) => (
                None,
                Some(
                    controller
                        .visible_heatmap(&camera, FrameSize::new(*width, *height))
                        .await,
                ),
            ),
            _ => (Some(controller.visible_positions(&camera).await), None),
        };

        Ok::<_, ReviewError>(RangeReport {
            range: snapshot.range,
            video_url: feed.stitched_video_url(&snapshot.range, &camera)?.to_string(),
            camera,
            playback_offset_secs: cli.offset,
            axis_max: snapshot.axis_max,
            buckets: snapshot.buckets.clone(),
            positions,
            heatmap,
            warnings: snapshot.warnings.iter().map(ToString::to_string).collect(),
            feed_errors: snapshot.feed_errors.clone(),
        })
    })?;

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
