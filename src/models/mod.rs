mod bucket;
mod position;
mod time_range;

pub use bucket::{ActivitySignal, ChartBucket};
pub use position::{FrameSize, HeatmapPoint, PositionSample, ProjectedPoint};
pub use time_range::{TimeRange, WIRE_FORMAT};
