use serde::Deserialize;
use serde_json::Value;

use crate::error::DataShapeWarning;
use crate::models::{ActivitySignal, FrameSize};

/// Activity from `{"activity": [bool, ...]}` or a bare array.
///
/// Non-boolean entries count as inactive so each index still maps to its
/// second.
pub fn normalize_activity(body: &Value) -> (ActivitySignal, Vec<DataShapeWarning>) {
    let mut warnings = Vec::new();

    let entries = match body {
        Value::Array(entries) => entries,
        Value::Object(fields) => match fields.get("activity") {
            Some(Value::Array(entries)) => entries,
            Some(Value::Null) | None => {
                warnings.push(DataShapeWarning::UnexpectedPayload {
                    detail: "activity response has no `activity` list".into(),
                });
                return (Vec::new(), warnings);
            }
            Some(_) => {
                warnings.push(DataShapeWarning::UnexpectedPayload {
                    detail: "`activity` is not a list".into(),
                });
                return (Vec::new(), warnings);
            }
        },
        Value::Null => return (Vec::new(), warnings),
        _ => {
            warnings.push(DataShapeWarning::UnexpectedPayload {
                detail: "activity response is not an object".into(),
            });
            return (Vec::new(), warnings);
        }
    };

    let signal = entries
        .iter()
        .enumerate()
        .map(|(index, entry)| match entry {
            Value::Bool(active) => *active,
            _ => {
                warnings.push(DataShapeWarning::NonBooleanActivity { index });
                false
            }
        })
        .collect();

    (signal, warnings)
}

#[derive(Debug, Default, Deserialize)]
struct CoordinateEnvelope {
    #[serde(default)]
    coordinates: Value,
    #[serde(default)]
    sample_rate: Option<u32>,
    #[serde(default)]
    frame: Option<FrameSize>,
}

/// The coordinate feed's body split into the camera collection and the
/// optional tracker parameters reported alongside it.
#[derive(Debug, Clone, PartialEq)]
pub struct CoordinatePayload {
    pub coordinates: Value,
    pub sample_rate_hz: Option<u32>,
    pub frame: Option<FrameSize>,
    pub warnings: Vec<DataShapeWarning>,
}

impl CoordinatePayload {
    pub fn from_body(body: &Value) -> Self {
        match body {
            Value::Object(_) => match CoordinateEnvelope::deserialize(body) {
                Ok(envelope) => Self {
                    coordinates: envelope.coordinates,
                    sample_rate_hz: envelope.sample_rate.filter(|rate| *rate > 0),
                    frame: envelope.frame.filter(FrameSize::is_usable),
                    warnings: Vec::new(),
                },
                Err(err) => Self::unusable(format!("coordinate envelope: {err}")),
            },
            Value::Array(_) => Self {
                coordinates: body.clone(),
                sample_rate_hz: None,
                frame: None,
                warnings: Vec::new(),
            },
            Value::Null => Self::unusable("empty coordinate response".into()),
            _ => Self::unusable("coordinate response is not an object".into()),
        }
    }

    fn unusable(detail: String) -> Self {
        Self {
            coordinates: Value::Null,
            sample_rate_hz: None,
            frame: None,
            warnings: vec![DataShapeWarning::UnexpectedPayload { detail }],
        }
    }
}
