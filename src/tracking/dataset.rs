use std::collections::BTreeMap;

use serde_json::Value;

use crate::error::DataShapeWarning;
use crate::models::{FrameSize, PositionSample};
use crate::tracking::clock::SampleRateClock;

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_warn};

/// Display name of the camera at zero-based `index`.
pub fn camera_name(index: usize) -> String {
    format!("Camera{}", index + 1)
}

/// `" camera2 "` and `"CAMERA2"` both resolve to `"Camera2"`. Names that are
/// not `camera<digits>` are only trimmed.
pub fn canonical_camera_name(raw: &str) -> String {
    let trimmed = raw.trim();
    let lowered = trimmed.to_ascii_lowercase();

    match lowered.strip_prefix("camera") {
        Some(digits) if !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()) => {
            match digits.parse::<usize>() {
                Ok(number) => format!("Camera{number}"),
                Err(_) => trimmed.to_string(),
            }
        }
        _ => trimmed.to_string(),
    }
}

/// Warnings gathered while normalizing a coordinate payload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestReport {
    pub warnings: Vec<DataShapeWarning>,
}

impl IngestReport {
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }

    fn push(&mut self, warning: DataShapeWarning) {
        log_debug!("coordinate payload: {warning}");
        self.warnings.push(warning);
    }
}

/// Per-camera position samples for one queried range.
///
/// Every track shares the range start and the sample rate: sample `i` sits at
/// `i / sample_rate` seconds into the range. A published dataset is never
/// mutated; a new query builds a new one.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackDataset {
    start_millis: i64,
    clock: SampleRateClock,
    reference_frame: FrameSize,
    tracks: BTreeMap<String, Vec<PositionSample>>,
}

impl TrackDataset {
    pub fn empty(start_millis: i64, clock: SampleRateClock, reference_frame: FrameSize) -> Self {
        Self {
            start_millis,
            clock,
            reference_frame,
            tracks: BTreeMap::new(),
        }
    }

    pub fn from_tracks<I>(
        start_millis: i64,
        clock: SampleRateClock,
        reference_frame: FrameSize,
        tracks: I,
    ) -> Self
    where
        I: IntoIterator<Item = (String, Vec<PositionSample>)>,
    {
        let tracks = tracks
            .into_iter()
            .map(|(name, samples)| (canonical_camera_name(&name), samples))
            .collect();

        Self {
            start_millis,
            clock,
            reference_frame,
            tracks,
        }
    }

    /// Build a dataset from the raw `coordinates` value of the coordinate feed.
    ///
    /// Accepts a list of single-camera objects (`[{"Camera1": [...]}, ...]`) or
    /// a plain map (`{"Camera1": [...]}`). Nothing in the payload is fatal: a
    /// sample missing `x`/`y` becomes a no-detection sample in place, a track
    /// that is not an array becomes empty, anything else unrecognizable yields
    /// an empty dataset.
    pub fn ingest(
        start_millis: i64,
        clock: SampleRateClock,
        reference_frame: FrameSize,
        payload: &Value,
    ) -> (Self, IngestReport) {
        let mut dataset = Self::empty(start_millis, clock, reference_frame);
        let mut report = IngestReport::default();

        match payload {
            Value::Array(entries) => {
                for (entry_idx, entry) in entries.iter().enumerate() {
                    match entry {
                        Value::Object(cameras) if !cameras.is_empty() => {
                            for (name, samples) in cameras {
                                dataset.insert_track(name, samples, &mut report);
                            }
                        }
                        _ => report.push(DataShapeWarning::MalformedEntry { index: entry_idx }),
                    }
                }
            }
            Value::Object(cameras) => {
                for (name, samples) in cameras {
                    dataset.insert_track(name, samples, &mut report);
                }
            }
            Value::Null => {}
            other => report.push(DataShapeWarning::UnexpectedPayload {
                detail: format!("expected a camera list or map, got {}", json_kind(other)),
            }),
        }

        if !report.is_clean() {
            log_warn!(
                "coordinate payload normalized with {} warning(s) across {} camera(s)",
                report.warnings.len(),
                dataset.tracks.len()
            );
        }

        (dataset, report)
    }

    fn insert_track(&mut self, raw_name: &str, samples: &Value, report: &mut IngestReport) {
        let camera = canonical_camera_name(raw_name);

        let track = match samples {
            Value::Array(items) => items
                .iter()
                .enumerate()
                .map(|(index, item)| parse_sample(&camera, index, item, report))
                .collect(),
            Value::Null => Vec::new(),
            _ => {
                report.push(DataShapeWarning::MalformedTrack {
                    camera: camera.clone(),
                });
                Vec::new()
            }
        };

        if self.tracks.insert(camera.clone(), track).is_some() {
            report.push(DataShapeWarning::DuplicateCamera { camera });
        }
    }

    pub fn start_millis(&self) -> i64 {
        self.start_millis
    }

    pub fn clock(&self) -> SampleRateClock {
        self.clock
    }

    pub fn reference_frame(&self) -> FrameSize {
        self.reference_frame
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.values().all(|track| track.is_empty())
    }

    /// Camera names in canonical order.
    pub fn cameras(&self) -> impl Iterator<Item = &str> {
        self.tracks.keys().map(String::as_str)
    }

    /// Full track for `camera`; empty for a camera the feed never mentioned.
    pub fn track(&self, camera: &str) -> &[PositionSample] {
        self.tracks
            .get(camera)
            .or_else(|| self.tracks.get(&canonical_camera_name(camera)))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn track_len(&self, camera: &str) -> usize {
        self.track(camera).len()
    }

    /// The first `upto` samples of `camera`, or the whole track if shorter.
    pub fn prefix(&self, camera: &str, upto: usize) -> &[PositionSample] {
        let track = self.track(camera);
        &track[..upto.min(track.len())]
    }
}

fn parse_sample(
    camera: &str,
    index: usize,
    item: &Value,
    report: &mut IngestReport,
) -> PositionSample {
    match item {
        Value::Object(fields) => {
            let x = coordinate(fields.get("x"));
            let y = coordinate(fields.get("y"));

            match (x, y) {
                (Ok(x), Ok(y)) => PositionSample { x, y },
                _ => {
                    report.push(DataShapeWarning::MissingCoordinate {
                        camera: camera.to_string(),
                        index,
                    });
                    PositionSample::missing()
                }
            }
        }
        Value::Null => PositionSample::missing(),
        _ => {
            report.push(DataShapeWarning::MalformedSample {
                camera: camera.to_string(),
                index,
            });
            PositionSample::missing()
        }
    }
}

/// `Ok(None)` for an explicit null, `Err` for an absent or non-numeric field.
fn coordinate(value: Option<&Value>) -> Result<Option<f64>, ()> {
    match value {
        Some(Value::Null) => Ok(None),
        Some(Value::Number(number)) => Ok(number.as_f64()),
        _ => Err(()),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ingest(payload: Value) -> (TrackDataset, IngestReport) {
        TrackDataset::ingest(0, SampleRateClock::default(), FrameSize::REFERENCE, &payload)
    }

    #[test]
    fn test_camera_names() {
        assert_eq!(camera_name(0), "Camera1");
        assert_eq!(camera_name(2), "Camera3");
        assert_eq!(canonical_camera_name(" camera2 "), "Camera2");
        assert_eq!(canonical_camera_name("CAMERA03"), "Camera3");
        assert_eq!(canonical_camera_name("Overhead"), "Overhead");
        assert_eq!(canonical_camera_name("camera"), "camera");
    }

    #[test]
    fn test_ingest_list_of_camera_objects() {
        let (dataset, report) = ingest(json!([
            {"Camera2": [{"x": 1.0, "y": 2.0}]},
            {"Camera1": [{"x": 10, "y": 20}, {"x": null, "y": null}]},
        ]));

        assert!(report.is_clean());
        assert_eq!(dataset.cameras().collect::<Vec<_>>(), vec!["Camera1", "Camera2"]);
        assert_eq!(
            dataset.track("Camera1"),
            &[PositionSample::new(10.0, 20.0), PositionSample::missing()]
        );
        assert_eq!(dataset.track_len("Camera2"), 1);
    }

    #[test]
    fn test_ingest_plain_map() {
        let (dataset, report) = ingest(json!({"camera3": [{"x": 5, "y": 6}]}));
        assert!(report.is_clean());
        assert_eq!(dataset.track("Camera3"), &[PositionSample::new(5.0, 6.0)]);
    }

    #[test]
    fn test_missing_camera_yields_empty_track() {
        let (dataset, _) = ingest(json!([{"Camera1": [{"x": 1, "y": 1}]}]));
        assert!(dataset.prefix("Camera3", 100).is_empty());
        assert!(dataset.track("NoSuchCamera").is_empty());
    }

    #[test]
    fn test_malformed_samples_keep_their_slot() {
        let (dataset, report) = ingest(json!([{"Camera1": [
            {"x": 1, "y": 1},
            {"x": 2},
            "garbage",
            {"x": "3", "y": 3},
            {"x": 4, "y": 4},
        ]}]));

        let track = dataset.track("Camera1");
        assert_eq!(track.len(), 5);
        assert_eq!(track[1], PositionSample::missing());
        assert_eq!(track[2], PositionSample::missing());
        assert_eq!(track[3], PositionSample::missing());
        assert_eq!(track[4], PositionSample::new(4.0, 4.0));
        assert_eq!(
            report.warnings,
            vec![
                DataShapeWarning::MissingCoordinate {
                    camera: "Camera1".into(),
                    index: 1
                },
                DataShapeWarning::MalformedSample {
                    camera: "Camera1".into(),
                    index: 2
                },
                DataShapeWarning::MissingCoordinate {
                    camera: "Camera1".into(),
                    index: 3
                },
            ]
        );
    }

    #[test]
    fn test_malformed_tracks_and_entries() {
        let (dataset, report) = ingest(json!([
            {"Camera1": "not a list"},
            42,
            {},
            {"Camera2": [{"x": 1, "y": 1}]},
            {"camera2": [{"x": 9, "y": 9}]},
        ]));

        assert!(dataset.track("Camera1").is_empty());
        assert_eq!(dataset.track("Camera2"), &[PositionSample::new(9.0, 9.0)]);
        assert_eq!(report.warnings.len(), 4);
        assert!(report
            .warnings
            .contains(&DataShapeWarning::DuplicateCamera { camera: "Camera2".into() }));
    }

    #[test]
    fn test_empty_payloads() {
        for payload in [json!([]), json!({}), Value::Null] {
            let (dataset, report) = ingest(payload);
            assert!(dataset.is_empty());
            assert!(report.is_clean());
        }

        let (dataset, report) = ingest(json!("nope"));
        assert!(dataset.is_empty());
        assert_eq!(report.warnings.len(), 1);
    }

    #[test]
    fn test_prefix_is_bounded_and_repeatable() {
        let samples: Vec<PositionSample> =
            (0..30).map(|i| PositionSample::new(i as f64, 0.0)).collect();
        let dataset = TrackDataset::from_tracks(
            0,
            SampleRateClock::default(),
            FrameSize::REFERENCE,
            vec![("Camera1".to_string(), samples)],
        );

        assert_eq!(dataset.prefix("Camera1", 0).len(), 0);
        assert_eq!(dataset.prefix("Camera1", 10).len(), 10);
        assert_eq!(dataset.prefix("Camera1", 10)[9], PositionSample::new(9.0, 0.0));
        assert_eq!(dataset.prefix("Camera1", 500).len(), 30);
        assert_eq!(dataset.prefix("camera1", 12), dataset.prefix("Camera1", 12));
    }
}
