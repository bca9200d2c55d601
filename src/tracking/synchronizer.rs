use crate::models::{FrameSize, HeatmapPoint, PositionSample, ProjectedPoint};
use crate::tracking::dataset::TrackDataset;

/// Maps a playback offset to the samples revealed so far.
///
/// Holds no dataset of its own: callers hand in whichever snapshot is current
/// at the moment of the call.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaybackSynchronizer;

impl PlaybackSynchronizer {
    pub fn new() -> Self {
        Self
    }

    /// Samples of `camera` covering the first `offset_secs` of playback.
    ///
    /// Offset zero means the video has not started and reveals nothing.
    pub fn visible_positions<'a>(
        &self,
        dataset: &'a TrackDataset,
        camera: &str,
        offset_secs: u64,
    ) -> &'a [PositionSample] {
        if offset_secs == 0 {
            return &[];
        }

        let upto = dataset
            .clock()
            .index_for(offset_secs as f64, dataset.track_len(camera));
        dataset.prefix(camera, upto)
    }

    /// Visible samples rescaled from the dataset's reference frame to `target`.
    /// Samples without both coordinates are dropped.
    pub fn visible_projected(
        &self,
        dataset: &TrackDataset,
        camera: &str,
        offset_secs: u64,
        target: FrameSize,
    ) -> Vec<ProjectedPoint> {
        project(
            self.visible_positions(dataset, camera, offset_secs),
            dataset.reference_frame(),
            target,
        )
    }

    pub fn visible_heatmap(
        &self,
        dataset: &TrackDataset,
        camera: &str,
        offset_secs: u64,
        target: FrameSize,
    ) -> Vec<HeatmapPoint> {
        heatmap_points(&self.visible_projected(dataset, camera, offset_secs, target))
    }
}

/// `x' = x * target.width / reference.width`, likewise for `y`.
pub fn project(
    samples: &[PositionSample],
    reference: FrameSize,
    target: FrameSize,
) -> Vec<ProjectedPoint> {
    if !reference.is_usable() || !target.is_usable() {
        return Vec::new();
    }

    let scale_x = target.width / reference.width;
    let scale_y = target.height / reference.height;

    samples
        .iter()
        .filter_map(PositionSample::coordinates)
        .map(|(x, y)| ProjectedPoint {
            x: x * scale_x,
            y: y * scale_y,
        })
        .collect()
}

/// Round projected points to whole pixels, each with weight 1.
pub fn heatmap_points(points: &[ProjectedPoint]) -> Vec<HeatmapPoint> {
    points
        .iter()
        .map(|point| HeatmapPoint {
            x: point.x.round() as i64,
            y: point.y.round() as i64,
            value: 1,
        })
        .collect()
}
