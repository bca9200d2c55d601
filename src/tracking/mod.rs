pub mod clock;
pub mod dataset;
pub mod synchronizer;

pub use clock::{sample_index_for_offset, SampleRateClock, DEFAULT_SAMPLE_RATE_HZ};
pub use dataset::{camera_name, canonical_camera_name, IngestReport, TrackDataset};
pub use synchronizer::{heatmap_points, project, PlaybackSynchronizer};
