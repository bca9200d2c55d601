use thiserror::Error;

/// Why a candidate time range was rejected before any feed was contacted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RangeError {
    #[error("{field} time is missing")]
    Missing { field: &'static str },

    #[error("{field} time '{value}' is not a valid YYYY-MM-DDTHH:MM[:SS] timestamp")]
    Unparseable { field: &'static str, value: String },

    #[error("start time {start} must be strictly before end time {end}")]
    Inverted { start: String, end: String },
}

#[derive(Debug, Error)]
pub enum ReviewError {
    /// Malformed or inverted range. Never retried.
    #[error("invalid time range: {0}")]
    InputValidation(#[from] RangeError),

    /// Transport failure, timeout or non-success status from a feed.
    #[error("{endpoint} unavailable: {reason}")]
    FeedUnavailable { endpoint: String, reason: String },

    /// A newer range selection replaced this one before its data arrived.
    #[error("request for {range} was superseded by a newer selection")]
    Superseded { range: String },
}

impl ReviewError {
    pub fn feed(endpoint: impl Into<String>, reason: impl ToString) -> Self {
        ReviewError::FeedUnavailable {
            endpoint: endpoint.into(),
            reason: reason.to_string(),
        }
    }

    pub fn is_superseded(&self) -> bool {
        matches!(self, ReviewError::Superseded { .. })
    }
}

pub type ReviewResult<T> = std::result::Result<T, ReviewError>;

/// A malformed but usable piece of a feed payload.
///
/// Never escalated: the offending entry is normalized to a safe default
/// (no detection, empty track, inactive second) so index-to-time alignment
/// holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataShapeWarning {
    /// The payload had no recognizable camera collection.
    UnexpectedPayload { detail: String },
    /// An element of the camera list was not a `{name: samples}` object.
    MalformedEntry { index: usize },
    /// A camera's samples were not an array; treated as an empty track.
    MalformedTrack { camera: String },
    /// The same camera appeared twice; the later occurrence wins.
    DuplicateCamera { camera: String },
    /// A sample was not an object; treated as no detection.
    MalformedSample { camera: String, index: usize },
    /// A sample lacked a numeric `x` or `y`; treated as no detection.
    MissingCoordinate { camera: String, index: usize },
    /// An activity entry was not a boolean; treated as inactive.
    NonBooleanActivity { index: usize },
    /// The feed has nothing recorded for the requested range.
    NoData { feed: String },
}

impl std::fmt::Display for DataShapeWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataShapeWarning::UnexpectedPayload { detail } => {
                write!(f, "unexpected payload shape: {detail}")
            }
            DataShapeWarning::MalformedEntry { index } => {
                write!(f, "camera entry {index} is not an object")
            }
            DataShapeWarning::MalformedTrack { camera } => {
                write!(f, "{camera}: samples are not an array")
            }
            DataShapeWarning::DuplicateCamera { camera } => {
                write!(f, "{camera}: duplicate camera, keeping the later track")
            }
            DataShapeWarning::MalformedSample { camera, index } => {
                write!(f, "{camera}[{index}]: sample is not an object")
            }
            DataShapeWarning::MissingCoordinate { camera, index } => {
                write!(f, "{camera}[{index}]: missing x/y coordinate")
            }
            DataShapeWarning::NonBooleanActivity { index } => {
                write!(f, "activity[{index}] is not a boolean")
            }
            DataShapeWarning::NoData { feed } => {
                write!(f, "{feed}: no data for this range")
            }
        }
    }
}
