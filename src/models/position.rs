use serde::{Deserialize, Serialize};

/// A tracker detection in the reference frame. `None` means "not detected".
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PositionSample {
    pub x: Option<f64>,
    pub y: Option<f64>,
}

impl PositionSample {
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
        }
    }

    pub fn missing() -> Self {
        Self::default()
    }

    /// Both coordinates, or `None` if either is absent.
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        match (self.x, self.y) {
            (Some(x), Some(y)) => Some((x, y)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrameSize {
    pub width: f64,
    pub height: f64,
}

impl FrameSize {
    /// Image space the upstream tracker reports coordinates in.
    pub const REFERENCE: FrameSize = FrameSize {
        width: 640.0,
        height: 480.0,
    };

    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn is_usable(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

impl Default for FrameSize {
    fn default() -> Self {
        Self::REFERENCE
    }
}

/// A sample rescaled into a render target.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectedPoint {
    pub x: f64,
    pub y: f64,
}

/// Integer pixel with a weight, as consumed by a heat-map renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeatmapPoint {
    pub x: i64,
    pub y: i64,
    pub value: u32,
}
