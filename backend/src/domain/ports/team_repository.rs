//! Port for team persistence and roster reads.

use async_trait::async_trait;

use crate::domain::{Team, TeamName};

use super::define_port_error;

define_port_error! {
    /// Errors raised by team repository adapters.
    pub enum TeamRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "team repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "team repository query failed: {message}",
    }
}

/// Outcome of [`TeamRepository::create_with_members`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TeamCreation {
    /// The team row and every member were written.
    Created,
    /// A team with that name already existed; nothing was written.
    AlreadyExists,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TeamRepository: Send + Sync {
    /// Insert the team and upsert each member as a user of it, atomically.
    ///
    /// Existing users listed as members are moved to this team with the
    /// submitted username and activity flag.
    async fn create_with_members(&self, team: &Team) -> Result<TeamCreation, TeamRepositoryError>;

    /// Load a team with its current member list.
    async fn find_by_name(&self, name: &TeamName) -> Result<Option<Team>, TeamRepositoryError>;
}
