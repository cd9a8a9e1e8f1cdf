pub mod authentication;
pub mod clock;
pub mod metric;
pub mod team;
pub mod user;
