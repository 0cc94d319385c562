use std::fmt::Display;

/// Errors raised while processing the hit data of a single event.
///
/// A precondition violation aborts the event; no partial candidate list
/// is considered valid after one of these is returned.
#[derive(Debug, Clone, PartialEq)]
pub enum DataProcessingError {
    ExpectedSlicesSameLength {
        expected: usize,
        other: usize,
        context: String,
    },
    ExpectedNonEmptyData {
        context: Option<String>,
    },
    ExpectedSortedData {
        context: String,
    },
    IndexOutOfBounds {
        index: usize,
        len: usize,
        context: String,
    },
    UnknownSensorId {
        id: i32,
        num_sensors: usize,
    },
    ExpectedSetField {
        field: &'static str,
    },
}

impl DataProcessingError {
    pub fn append_to_context(mut self, extra: &str) -> Self {
        match &mut self {
            DataProcessingError::ExpectedSlicesSameLength { context, .. } => {
                context.push_str(extra);
            }
            DataProcessingError::ExpectedNonEmptyData { context } => match context {
                Some(x) => x.push_str(extra),
                None => *context = Some(extra.to_string()),
            },
            DataProcessingError::ExpectedSortedData { context } => {
                context.push_str(extra);
            }
            DataProcessingError::IndexOutOfBounds { context, .. } => {
                context.push_str(extra);
            }
            DataProcessingError::UnknownSensorId { .. } => {}
            DataProcessingError::ExpectedSetField { .. } => {}
        }
        self
    }
}

/// Errors raised while validating a search configuration, before any
/// event is processed.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    InvertedCountBounds {
        min: usize,
        max: usize,
    },
    NonPositiveWindow {
        field: &'static str,
        value: f32,
    },
    InvertedTimeBounds {
        floor: f32,
        ceiling: f32,
    },
    NonPositiveLightSpeed {
        value: f32,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum CapseekError {
    DataProcessingError(DataProcessingError),
    ConfigError(ConfigError),
    ParseError { msg: String },
}

impl Display for CapseekError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl std::error::Error for CapseekError {}

pub type Result<T> = std::result::Result<T, CapseekError>;

impl From<DataProcessingError> for CapseekError {
    fn from(x: DataProcessingError) -> Self {
        Self::DataProcessingError(x)
    }
}

impl From<ConfigError> for CapseekError {
    fn from(x: ConfigError) -> Self {
        Self::ConfigError(x)
    }
}

impl From<serde_json::Error> for CapseekError {
    fn from(val: serde_json::Error) -> Self {
        CapseekError::ParseError {
            msg: val.to_string(),
        }
    }
}
