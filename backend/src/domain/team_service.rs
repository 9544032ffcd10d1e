//! Team and user registry services.
//!
//! Implements [`TeamCommand`], [`TeamQuery`], and [`UserActivityCommand`] on
//! top of the team and user repositories.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, info, warn};

use crate::domain::ports::{
    SetUserActiveRequest, TeamCommand, TeamCreation, TeamQuery, TeamRepository,
    TeamRepositoryError, UserActivityCommand, UserRepository, UserRepositoryError,
};
use crate::domain::{Error, Team, TeamName, User};

fn map_team_error(error: TeamRepositoryError) -> Error {
    match error {
        TeamRepositoryError::Connection { message } => {
            error!(%message, "team repository unavailable");
            Error::service_unavailable(format!("team repository unavailable: {message}"))
        }
        TeamRepositoryError::Query { message } => {
            error!(%message, "team repository query failed");
            Error::internal(format!("team repository error: {message}"))
        }
    }
}

fn map_user_error(error: UserRepositoryError) -> Error {
    match error {
        UserRepositoryError::Connection { message } => {
            error!(%message, "user repository unavailable");
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserRepositoryError::Query { message } => {
            error!(%message, "user repository query failed");
            Error::internal(format!("user repository error: {message}"))
        }
        UserRepositoryError::NotFound { user_id } => {
            Error::not_found(format!("user {user_id} not found"))
        }
    }
}

/// Registry service for teams and their members.
#[derive(Clone)]
pub struct TeamService<T, U> {
    team_repo: Arc<T>,
    user_repo: Arc<U>,
}

impl<T, U> TeamService<T, U> {
    /// Build the service over the team and user repositories.
    pub fn new(team_repo: Arc<T>, user_repo: Arc<U>) -> Self {
        Self {
            team_repo,
            user_repo,
        }
    }
}

#[async_trait]
impl<T, U> TeamCommand for TeamService<T, U>
where
    T: TeamRepository,
    U: UserRepository,
{
    async fn add_team(&self, team: Team) -> Result<Team, Error> {
        let outcome = self
            .team_repo
            .create_with_members(&team)
            .await
            .map_err(map_team_error)?;

        match outcome {
            TeamCreation::Created => {
                info!(
                    team_name = %team.name(),
                    members = team.members().len(),
                    "team created"
                );
                Ok(team)
            }
            TeamCreation::AlreadyExists => {
                warn!(team_name = %team.name(), "team already exists");
                Err(Error::team_exists(format!(
                    "team {} already exists",
                    team.name()
                )))
            }
        }
    }
}

#[async_trait]
impl<T, U> TeamQuery for TeamService<T, U>
where
    T: TeamRepository,
    U: UserRepository,
{
    async fn get_team(&self, name: &TeamName) -> Result<Team, Error> {
        self.team_repo
            .find_by_name(name)
            .await
            .map_err(map_team_error)?
            .ok_or_else(|| Error::not_found(format!("team {name} not found")))
    }
}

#[async_trait]
impl<T, U> UserActivityCommand for TeamService<T, U>
where
    T: TeamRepository,
    U: UserRepository,
{
    async fn set_is_active(&self, request: SetUserActiveRequest) -> Result<User, Error> {
        let SetUserActiveRequest { user_id, is_active } = request;
        let mut user = self
            .user_repo
            .find_by_id(&user_id)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| Error::not_found(format!("user {user_id} not found")))?;

        user.set_active(is_active);
        self.user_repo
            .update(&user)
            .await
            .map_err(map_user_error)?;

        info!(user_id = %user.id(), is_active, "user activity updated");
        Ok(user)
    }
}

#[cfg(test)]
#[path = "team_service_tests.rs"]
mod tests;
