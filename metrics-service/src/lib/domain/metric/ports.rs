use async_trait::async_trait;

use crate::metric::errors::MetricError;
use crate::metric::models::CreateMetricCommand;
use crate::metric::models::Metric;
use crate::team::models::TeamId;

/// Port for metric domain service operations.
#[async_trait]
pub trait MetricServicePort: Send + Sync + 'static {
    /// Record one metric for an existing team.
    ///
    /// # Errors
    /// * `TeamNotFound` - Team does not exist
    /// * `DatabaseError` - Database operation failed
    async fn create_metric(&self, command: CreateMetricCommand) -> Result<Metric, MetricError>;

    /// List every metric, most recent first.
    async fn list_metrics(&self) -> Result<Vec<Metric>, MetricError>;

    /// List the metrics of one team, most recent first.
    ///
    /// # Errors
    /// * `TeamNotFound` - Team does not exist
    async fn list_team_metrics(&self, team_id: &TeamId) -> Result<Vec<Metric>, MetricError>;

    /// Record a batch of metrics atomically.
    ///
    /// Every referenced team is checked before anything is written; either
    /// all rows are stored or none are.
    ///
    /// # Returns
    /// Number of metrics stored
    ///
    /// # Errors
    /// * `InvalidRow` - A row references a missing team (1-based row number)
    /// * `DatabaseError` - Database operation failed
    async fn import_metrics(&self, commands: Vec<CreateMetricCommand>)
        -> Result<usize, MetricError>;
}

/// Persistence operations for metrics.
#[async_trait]
pub trait MetricRepository: Send + Sync + 'static {
    async fn create(&self, metric: Metric) -> Result<Metric, MetricError>;

    async fn list_all(&self) -> Result<Vec<Metric>, MetricError>;

    async fn list_by_team(&self, team_id: &TeamId) -> Result<Vec<Metric>, MetricError>;

    /// Insert all metrics in a single transaction.
    ///
    /// # Returns
    /// Number of rows inserted
    async fn create_many(&self, metrics: Vec<Metric>) -> Result<usize, MetricError>;
}
