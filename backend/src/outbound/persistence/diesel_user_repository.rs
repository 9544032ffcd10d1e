//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{UserRepository, UserRepositoryError};
use crate::domain::{TeamName, User, UserId, Username};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{UserRow, UserUpdate};
use super::pool::{DbPool, PoolError};
use super::schema::users;

/// Diesel-backed implementation of the user repository port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a repository backed by `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> UserRepositoryError {
    map_basic_pool_error(error, |message| UserRepositoryError::connection(message))
}

fn map_diesel_error(error: diesel::result::Error) -> UserRepositoryError {
    map_basic_diesel_error(
        error,
        |message| UserRepositoryError::query(message),
        |message| UserRepositoryError::connection(message),
    )
}

pub(crate) fn row_to_user(row: UserRow) -> Result<User, String> {
    let id = UserId::new(row.user_id).map_err(|err| format!("stored user id: {err}"))?;
    let username = Username::new(row.username).map_err(|err| format!("stored username: {err}"))?;
    let team_name =
        TeamName::new(row.team_name).map_err(|err| format!("stored team name: {err}"))?;
    Ok(User::new(id, username, team_name, row.is_active))
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        users::table
            .find(id.as_str())
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?
            .map(row_to_user)
            .transpose()
            .map_err(UserRepositoryError::query)
    }

    async fn update(&self, user: &User) -> Result<(), UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let changes = UserUpdate {
            username: user.username().as_str(),
            team_name: user.team_name().as_str(),
            is_active: user.is_active(),
        };

        let updated = diesel::update(users::table.find(user.id().as_str()))
            .set(&changes)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        if updated == 0 {
            return Err(UserRepositoryError::not_found(user.id().as_str()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn row_to_user_round_trips_fields() {
        let user = row_to_user(UserRow {
            user_id: "u2".to_owned(),
            username: "Bob".to_owned(),
            team_name: "payments".to_owned(),
            is_active: true,
        })
        .expect("valid row");

        assert_eq!(user.id().as_str(), "u2");
        assert_eq!(user.team_name().as_str(), "payments");
        assert!(user.is_active());
    }

    #[rstest]
    fn row_to_user_reports_corrupt_team_reference() {
        let err = row_to_user(UserRow {
            user_id: "u2".to_owned(),
            username: "Bob".to_owned(),
            team_name: String::new(),
            is_active: true,
        })
        .expect_err("blank team");

        assert!(err.contains("team name"));
    }
}
