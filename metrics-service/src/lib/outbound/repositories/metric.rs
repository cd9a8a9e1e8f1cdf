use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::FromRow;
use sqlx::PgPool;
use uuid::Uuid;

use crate::metric::errors::MetricError;
use crate::metric::models::Metric;
use crate::metric::models::MetricId;
use crate::metric::models::MetricName;
use crate::metric::models::MetricValue;
use crate::metric::ports::MetricRepository;
use crate::team::models::TeamId;

pub struct PostgresMetricRepository {
    pool: PgPool,
}

impl PostgresMetricRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct MetricRow {
    id: Uuid,
    name: String,
    value: f64,
    team_id: Uuid,
    recorded_at: DateTime<Utc>,
}

impl TryFrom<MetricRow> for Metric {
    type Error = MetricError;

    fn try_from(r: MetricRow) -> Result<Self, Self::Error> {
        Ok(Metric {
            id: MetricId(r.id),
            name: MetricName::new(r.name)?,
            value: MetricValue::new(r.value)?,
            team_id: TeamId(r.team_id),
            recorded_at: r.recorded_at,
        })
    }
}

fn write_error(e: sqlx::Error, metric: &Metric) -> MetricError {
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_foreign_key_violation() {
            return MetricError::TeamNotFound(metric.team_id.to_string());
        }
    }
    MetricError::DatabaseError(e.to_string())
}

const INSERT_METRIC: &str = r#"
    INSERT INTO metrics (id, name, value, team_id, recorded_at)
    VALUES ($1, $2, $3, $4, $5)
"#;

#[async_trait]
impl MetricRepository for PostgresMetricRepository {
    async fn create(&self, metric: Metric) -> Result<Metric, MetricError> {
        sqlx::query(INSERT_METRIC)
            .bind(metric.id.0)
            .bind(metric.name.as_str())
            .bind(metric.value.get())
            .bind(metric.team_id.0)
            .bind(metric.recorded_at)
            .execute(&self.pool)
            .await
            .map_err(|e| write_error(e, &metric))?;

        Ok(metric)
    }

    async fn list_all(&self) -> Result<Vec<Metric>, MetricError> {
        let rows = sqlx::query_as::<_, MetricRow>(
            r#"
            SELECT id, name, value, team_id, recorded_at
            FROM metrics
            ORDER BY recorded_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| MetricError::DatabaseError(e.to_string()))?;

        rows.into_iter().map(Metric::try_from).collect()
    }

    async fn list_by_team(&self, team_id: &TeamId) -> Result<Vec<Metric>, MetricError> {
        let rows = sqlx::query_as::<_, MetricRow>(
            r#"
            SELECT id, name, value, team_id, recorded_at
            FROM metrics
            WHERE team_id = $1
            ORDER BY recorded_at DESC
            "#,
        )
        .bind(team_id.0)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| MetricError::DatabaseError(e.to_string()))?;

        rows.into_iter().map(Metric::try_from).collect()
    }

    async fn create_many(&self, metrics: Vec<Metric>) -> Result<usize, MetricError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| MetricError::DatabaseError(e.to_string()))?;

        for metric in &metrics {
            sqlx::query(INSERT_METRIC)
                .bind(metric.id.0)
                .bind(metric.name.as_str())
                .bind(metric.value.get())
                .bind(metric.team_id.0)
                .bind(metric.recorded_at)
                .execute(&mut *tx)
                .await
                .map_err(|e| write_error(e, metric))?;
        }

        // Dropping the transaction on an early return rolls it back.
        tx.commit()
            .await
            .map_err(|e| MetricError::DatabaseError(e.to_string()))?;

        Ok(metrics.len())
    }
}
