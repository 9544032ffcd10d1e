//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`*Repository`) are implemented by the persistence adapters.
//! Driving ports (`*Command`, `*Query`) are implemented by domain services and
//! consumed by the HTTP adapter.

mod macros;
pub(crate) use macros::define_port_error;

mod pull_request_command;
mod pull_request_repository;
mod review_query;
mod team_command;
mod team_query;
mod team_repository;
mod user_activity_command;
mod user_repository;

#[cfg(test)]
pub use pull_request_command::MockPullRequestCommand;
pub use pull_request_command::{
    CreatePullRequestRequest, PullRequestCommand, ReassignReviewerRequest,
    ReassignReviewerResponse,
};
#[cfg(test)]
pub use pull_request_repository::MockPullRequestRepository;
pub use pull_request_repository::{PullRequestRepository, PullRequestRepositoryError};
#[cfg(test)]
pub use review_query::MockReviewQuery;
pub use review_query::ReviewQuery;
#[cfg(test)]
pub use team_command::MockTeamCommand;
pub use team_command::TeamCommand;
#[cfg(test)]
pub use team_query::MockTeamQuery;
pub use team_query::TeamQuery;
#[cfg(test)]
pub use team_repository::MockTeamRepository;
pub use team_repository::{TeamCreation, TeamRepository, TeamRepositoryError};
#[cfg(test)]
pub use user_activity_command::MockUserActivityCommand;
pub use user_activity_command::{SetUserActiveRequest, UserActivityCommand};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserRepository, UserRepositoryError};
