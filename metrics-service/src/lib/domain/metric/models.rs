use std::fmt;

use chrono::DateTime;
use chrono::Utc;
use uuid::Uuid;

use crate::metric::errors::MetricNameError;
use crate::metric::errors::MetricValueError;
use crate::team::models::TeamId;

/// A single health metric reading attached to a team.
#[derive(Debug, Clone, PartialEq)]
pub struct Metric {
    pub id: MetricId,
    pub name: MetricName,
    pub value: MetricValue,
    pub team_id: TeamId,
    pub recorded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MetricId(pub Uuid);

impl MetricId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for MetricId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for MetricId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Metric name, 1-100 characters after trimming.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricName(String);

impl MetricName {
    const MAX_LENGTH: usize = 100;

    pub fn new(name: String) -> Result<Self, MetricNameError> {
        let name = name.trim().to_string();
        let length = name.chars().count();

        if length == 0 {
            Err(MetricNameError::Empty)
        } else if length > Self::MAX_LENGTH {
            Err(MetricNameError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            })
        } else {
            Ok(Self(name))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Finite metric value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricValue(f64);

impl MetricValue {
    /// # Errors
    /// * `NotFinite` - Value is NaN or infinite
    pub fn new(value: f64) -> Result<Self, MetricValueError> {
        if value.is_finite() {
            Ok(Self(value))
        } else {
            Err(MetricValueError::NotFinite)
        }
    }

    /// Parse a value from text, as found in uploaded files.
    ///
    /// # Errors
    /// * `NotANumber` - Text is not a decimal number
    /// * `NotFinite` - Text parses to NaN or infinity
    pub fn parse(raw: &str) -> Result<Self, MetricValueError> {
        let value = raw
            .trim()
            .parse::<f64>()
            .map_err(|_| MetricValueError::NotANumber(raw.to_string()))?;
        Self::new(value)
    }

    pub fn get(&self) -> f64 {
        self.0
    }
}

#[derive(Debug, Clone)]
pub struct CreateMetricCommand {
    pub name: MetricName,
    pub value: MetricValue,
    pub team_id: TeamId,
}
