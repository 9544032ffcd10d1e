//! PostgreSQL-backed `TeamRepository` implementation using Diesel ORM.
//!
//! Team creation inserts the team row and upserts every member inside one
//! transaction, so a failure part way leaves no trace.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::upsert::excluded;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};
use tracing::debug;

use crate::domain::ports::{TeamCreation, TeamRepository, TeamRepositoryError};
use crate::domain::{Team, TeamMember, TeamName, UserId, Username};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{NewTeamRow, NewUserRow, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::{teams, users};

/// Diesel-backed implementation of the team repository port.
#[derive(Clone)]
pub struct DieselTeamRepository {
    pool: DbPool,
}

impl DieselTeamRepository {
    /// Create a repository backed by `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> TeamRepositoryError {
    map_basic_pool_error(error, |message| TeamRepositoryError::connection(message))
}

fn map_diesel_error(error: diesel::result::Error) -> TeamRepositoryError {
    map_basic_diesel_error(
        error,
        |message| TeamRepositoryError::query(message),
        |message| TeamRepositoryError::connection(message),
    )
}

fn row_to_member(row: UserRow) -> Result<TeamMember, TeamRepositoryError> {
    let user_id = UserId::new(row.user_id)
        .map_err(|err| TeamRepositoryError::query(format!("stored user id: {err}")))?;
    let username = Username::new(row.username)
        .map_err(|err| TeamRepositoryError::query(format!("stored username: {err}")))?;
    Ok(TeamMember {
        user_id,
        username,
        is_active: row.is_active,
    })
}

#[async_trait]
impl TeamRepository for DieselTeamRepository {
    async fn create_with_members(&self, team: &Team) -> Result<TeamCreation, TeamRepositoryError> {
        let team_name = team.name().as_str();
        let user_rows: Vec<NewUserRow<'_>> = team
            .members()
            .iter()
            .map(|member| NewUserRow {
                user_id: member.user_id.as_str(),
                username: member.username.as_str(),
                team_name,
                is_active: member.is_active,
            })
            .collect();
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        conn.transaction::<_, diesel::result::Error, _>(|conn| {
            async move {
                let inserted = diesel::insert_into(teams::table)
                    .values(&NewTeamRow { team_name })
                    .on_conflict(teams::team_name)
                    .do_nothing()
                    .execute(conn)
                    .await?;

                if inserted == 0 {
                    return Ok(TeamCreation::AlreadyExists);
                }

                if !user_rows.is_empty() {
                    diesel::insert_into(users::table)
                        .values(&user_rows)
                        .on_conflict(users::user_id)
                        .do_update()
                        .set((
                            users::username.eq(excluded(users::username)),
                            users::team_name.eq(excluded(users::team_name)),
                            users::is_active.eq(excluded(users::is_active)),
                        ))
                        .execute(conn)
                        .await?;
                }

                debug!(team_name, members = user_rows.len(), "team rows written");
                Ok(TeamCreation::Created)
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }

    async fn find_by_name(&self, name: &TeamName) -> Result<Option<Team>, TeamRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let exists = teams::table
            .find(name.as_str())
            .select(teams::team_name)
            .first::<String>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        if exists.is_none() {
            return Ok(None);
        }

        let rows = users::table
            .filter(users::team_name.eq(name.as_str()))
            .order(users::user_id.asc())
            .select(UserRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let members = rows
            .into_iter()
            .map(row_to_member)
            .collect::<Result<Vec<_>, _>>()?;
        Team::new(name.clone(), members)
            .map(Some)
            .map_err(|err| TeamRepositoryError::query(format!("stored team: {err}")))
    }
}

#[cfg(test)]
mod tests {
    //! Row conversion coverage; database behaviour is exercised against the
    //! in-memory adapter.
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn row_to_member_copies_fields() {
        let member = row_to_member(UserRow {
            user_id: "u1".to_owned(),
            username: "Alice".to_owned(),
            team_name: "core".to_owned(),
            is_active: false,
        })
        .expect("valid row");

        assert_eq!(member.user_id.as_str(), "u1");
        assert_eq!(member.username.as_str(), "Alice");
        assert!(!member.is_active);
    }

    #[rstest]
    fn row_to_member_rejects_blank_ids() {
        let err = row_to_member(UserRow {
            user_id: " ".to_owned(),
            username: "Alice".to_owned(),
            team_name: "core".to_owned(),
            is_active: true,
        })
        .expect_err("blank id");

        assert!(matches!(err, TeamRepositoryError::Query { .. }));
    }
}
