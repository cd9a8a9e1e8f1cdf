pub mod metric;
pub mod team;
pub mod user;

pub use metric::PostgresMetricRepository;
pub use team::PostgresTeamRepository;
pub use user::PostgresUserRepository;
