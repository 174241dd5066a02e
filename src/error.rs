use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum MetricsError {
    #[error("No assigned records provided for aggregation")]
    EmptyRecords,

    #[error("Record {key} has invalid point value {value}")]
    InvalidPoints { key: String, value: f64 },

    #[error("Expected {expected} base windows, got {actual}")]
    WindowCount { expected: usize, actual: usize },

    #[error("Rolling span {span} must be between 1 and {windows} (exclusive)")]
    RollingSpan { span: usize, windows: usize },

    #[error("{field} must be between 0 and {max}, got {value}")]
    OutOfRange {
        field: &'static str,
        value: i64,
        max: i64,
    },
}
