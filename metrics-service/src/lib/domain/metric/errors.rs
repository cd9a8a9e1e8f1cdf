use thiserror::Error;

use crate::team::errors::TeamIdError;

/// Error type for MetricName validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MetricNameError {
    #[error("Metric name is empty")]
    Empty,

    #[error("Metric name too long: maximum {max} characters, got {actual}")]
    TooLong { max: usize, actual: usize },
}

/// Error type for MetricValue validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MetricValueError {
    #[error("Metric value is not a number: {0}")]
    NotANumber(String),

    #[error("Metric value must be finite")]
    NotFinite,
}

/// Top-level error type for all metric-related operations
#[derive(Debug, Clone, Error)]
pub enum MetricError {
    #[error("Invalid metric name: {0}")]
    InvalidMetricName(#[from] MetricNameError),

    #[error("Invalid metric value: {0}")]
    InvalidMetricValue(#[from] MetricValueError),

    #[error("Invalid team ID: {0}")]
    InvalidTeamId(#[from] TeamIdError),

    #[error("Team not found: {0}")]
    TeamNotFound(String),

    #[error("Invalid CSV: {0}")]
    InvalidCsv(String),

    #[error("Row {row}: {reason}")]
    InvalidRow { row: usize, reason: String },

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}
