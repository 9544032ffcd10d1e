//! Driving port for team registration.

use async_trait::async_trait;

use crate::domain::{Error, Team};

/// Register teams and their members.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TeamCommand: Send + Sync {
    /// Create `team` and upsert its members. Returns the team as submitted.
    async fn add_team(&self, team: Team) -> Result<Team, Error>;
}
