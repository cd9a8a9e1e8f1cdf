use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use crate::metric::errors::MetricError;
use crate::metric::models::CreateMetricCommand;
use crate::metric::models::Metric;
use crate::metric::models::MetricId;
use crate::metric::ports::MetricRepository;
use crate::metric::ports::MetricServicePort;
use crate::team::models::TeamId;
use crate::team::ports::TeamRepository;

/// Domain service implementation for metric operations.
pub struct MetricService<MR, TR>
where
    MR: MetricRepository,
    TR: TeamRepository,
{
    repository: Arc<MR>,
    team_repository: Arc<TR>,
}

impl<MR, TR> MetricService<MR, TR>
where
    MR: MetricRepository,
    TR: TeamRepository,
{
    pub fn new(repository: Arc<MR>, team_repository: Arc<TR>) -> Self {
        Self {
            repository,
            team_repository,
        }
    }

    async fn team_exists(&self, team_id: &TeamId) -> Result<bool, MetricError> {
        self.team_repository
            .find_by_id(team_id)
            .await
            .map(|team| team.is_some())
            .map_err(|e| MetricError::DatabaseError(e.to_string()))
    }
}

fn new_metric(command: CreateMetricCommand) -> Metric {
    Metric {
        id: MetricId::new(),
        name: command.name,
        value: command.value,
        team_id: command.team_id,
        recorded_at: Utc::now(),
    }
}

#[async_trait]
impl<MR, TR> MetricServicePort for MetricService<MR, TR>
where
    MR: MetricRepository,
    TR: TeamRepository,
{
    async fn create_metric(&self, command: CreateMetricCommand) -> Result<Metric, MetricError> {
        if !self.team_exists(&command.team_id).await? {
            return Err(MetricError::TeamNotFound(command.team_id.to_string()));
        }

        self.repository.create(new_metric(command)).await
    }

    async fn list_metrics(&self) -> Result<Vec<Metric>, MetricError> {
        self.repository.list_all().await
    }

    async fn list_team_metrics(&self, team_id: &TeamId) -> Result<Vec<Metric>, MetricError> {
        if !self.team_exists(team_id).await? {
            return Err(MetricError::TeamNotFound(team_id.to_string()));
        }

        self.repository.list_by_team(team_id).await
    }

    async fn import_metrics(
        &self,
        commands: Vec<CreateMetricCommand>,
    ) -> Result<usize, MetricError> {
        let mut known_teams: HashSet<TeamId> = HashSet::new();

        for (index, command) in commands.iter().enumerate() {
            if known_teams.contains(&command.team_id) {
                continue;
            }
            if !self.team_exists(&command.team_id).await? {
                return Err(MetricError::InvalidRow {
                    row: index + 1,
                    reason: format!("team not found: {}", command.team_id),
                });
            }
            known_teams.insert(command.team_id);
        }

        if commands.is_empty() {
            return Ok(0);
        }

        let metrics = commands.into_iter().map(new_metric).collect();
        let imported = self.repository.create_many(metrics).await?;
        tracing::info!(
            imported,
            teams = known_teams.len(),
            "Metrics imported"
        );

        Ok(imported)
    }
}

#[cfg(test)]
mod tests {
    use mockall::mock;

    use super::*;
    use crate::metric::models::MetricName;
    use crate::metric::models::MetricValue;
    use crate::team::errors::TeamError;
    use crate::team::models::Team;
    use crate::team::models::TeamName;

    mock! {
        pub TestMetricRepository {}

        #[async_trait]
        impl MetricRepository for TestMetricRepository {
            async fn create(&self, metric: Metric) -> Result<Metric, MetricError>;
            async fn list_all(&self) -> Result<Vec<Metric>, MetricError>;
            async fn list_by_team(&self, team_id: &TeamId) -> Result<Vec<Metric>, MetricError>;
            async fn create_many(&self, metrics: Vec<Metric>) -> Result<usize, MetricError>;
        }
    }

    mock! {
        pub TestTeamRepository {}

        #[async_trait]
        impl TeamRepository for TestTeamRepository {
            async fn create(&self, team: Team) -> Result<Team, TeamError>;
            async fn find_by_id(&self, id: &TeamId) -> Result<Option<Team>, TeamError>;
            async fn list_all(&self) -> Result<Vec<Team>, TeamError>;
            async fn update(&self, team: Team) -> Result<Team, TeamError>;
        }
    }

    fn team(id: TeamId) -> Team {
        Team {
            id,
            name: TeamName::new("Support".to_string()).unwrap(),
            leader_id: None,
            created_at: Utc::now(),
        }
    }

    fn command(name: &str, value: f64, team_id: TeamId) -> CreateMetricCommand {
        CreateMetricCommand {
            name: MetricName::new(name.to_string()).unwrap(),
            value: MetricValue::new(value).unwrap(),
            team_id,
        }
    }

    #[tokio::test]
    async fn test_create_metric_for_existing_team() {
        let mut repository = MockTestMetricRepository::new();
        let mut team_repository = MockTestTeamRepository::new();

        let team_id = TeamId::new();
        team_repository
            .expect_find_by_id()
            .times(1)
            .returning(|id| Ok(Some(team(*id))));
        repository
            .expect_create()
            .withf(move |m| m.name.as_str() == "tmo" && m.team_id == team_id)
            .times(1)
            .returning(|m| Ok(m));

        let service = MetricService::new(Arc::new(repository), Arc::new(team_repository));

        let metric = service
            .create_metric(command("tmo", 312.5, team_id))
            .await
            .unwrap();
        assert_eq!(metric.value.get(), 312.5);
    }

    #[tokio::test]
    async fn test_create_metric_for_unknown_team() {
        let mut repository = MockTestMetricRepository::new();
        let mut team_repository = MockTestTeamRepository::new();

        team_repository
            .expect_find_by_id()
            .times(1)
            .returning(|_| Ok(None));
        repository.expect_create().times(0);

        let service = MetricService::new(Arc::new(repository), Arc::new(team_repository));

        let result = service.create_metric(command("tmo", 1.0, TeamId::new())).await;
        assert!(matches!(result, Err(MetricError::TeamNotFound(_))));
    }

    #[tokio::test]
    async fn test_list_team_metrics_unknown_team() {
        let mut repository = MockTestMetricRepository::new();
        let mut team_repository = MockTestTeamRepository::new();

        team_repository
            .expect_find_by_id()
            .times(1)
            .returning(|_| Ok(None));
        repository.expect_list_by_team().times(0);

        let service = MetricService::new(Arc::new(repository), Arc::new(team_repository));

        let result = service.list_team_metrics(&TeamId::new()).await;
        assert!(matches!(result, Err(MetricError::TeamNotFound(_))));
    }

    #[tokio::test]
    async fn test_import_checks_each_team_once() {
        let mut repository = MockTestMetricRepository::new();
        let mut team_repository = MockTestTeamRepository::new();

        let first = TeamId::new();
        let second = TeamId::new();
        team_repository
            .expect_find_by_id()
            .times(2)
            .returning(|id| Ok(Some(team(*id))));
        repository
            .expect_create_many()
            .withf(|metrics| metrics.len() == 3)
            .times(1)
            .returning(|metrics| Ok(metrics.len()));

        let service = MetricService::new(Arc::new(repository), Arc::new(team_repository));

        let imported = service
            .import_metrics(vec![
                command("tmo", 300.0, first),
                command("nps", 71.0, first),
                command("tmo", 280.0, second),
            ])
            .await
            .unwrap();
        assert_eq!(imported, 3);
    }

    #[tokio::test]
    async fn test_import_unknown_team_writes_nothing() {
        let mut repository = MockTestMetricRepository::new();
        let mut team_repository = MockTestTeamRepository::new();

        let known = TeamId::new();
        team_repository
            .expect_find_by_id()
            .returning(move |id| Ok((*id == known).then(|| team(*id))));
        repository.expect_create_many().times(0);

        let service = MetricService::new(Arc::new(repository), Arc::new(team_repository));

        let result = service
            .import_metrics(vec![
                command("tmo", 300.0, known),
                command("tmo", 280.0, TeamId::new()),
            ])
            .await;

        assert!(matches!(result, Err(MetricError::InvalidRow { row: 2, .. })));
    }

    #[tokio::test]
    async fn test_import_empty_batch() {
        let mut repository = MockTestMetricRepository::new();
        let team_repository = MockTestTeamRepository::new();

        repository.expect_create_many().times(0);

        let service = MetricService::new(Arc::new(repository), Arc::new(team_repository));

        assert_eq!(service.import_metrics(Vec::new()).await.unwrap(), 0);
    }
}
