//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain.

use chrono::{DateTime, Utc};
use diesel::prelude::*;

use super::schema::{pull_request_reviewers, pull_requests, teams, users};

/// Insertable struct for creating team records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = teams)]
pub(crate) struct NewTeamRow<'a> {
    pub team_name: &'a str,
}

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub user_id: String,
    pub username: String,
    pub team_name: String,
    pub is_active: bool,
}

/// Insertable struct for creating or upserting user records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub user_id: &'a str,
    pub username: &'a str,
    pub team_name: &'a str,
    pub is_active: bool,
}

/// Changeset struct for overwriting an existing user record.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = users)]
pub(crate) struct UserUpdate<'a> {
    pub username: &'a str,
    pub team_name: &'a str,
    pub is_active: bool,
}

/// Row struct for reading from the pull_requests table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = pull_requests)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct PullRequestRow {
    pub pull_request_id: String,
    pub pull_request_name: String,
    pub author_id: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub merged_at: Option<DateTime<Utc>>,
    pub revision: i64,
}

/// Insertable struct for creating pull request records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = pull_requests)]
pub(crate) struct NewPullRequestRow<'a> {
    pub pull_request_id: &'a str,
    pub pull_request_name: &'a str,
    pub author_id: &'a str,
    pub status: &'a str,
    pub created_at: DateTime<Utc>,
    pub merged_at: Option<DateTime<Utc>>,
    pub revision: i64,
}

/// Changeset applied by revision-guarded pull request updates.
///
/// `merged_at` is written as-is, so a `None` clears the column.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = pull_requests)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct PullRequestUpdate<'a> {
    pub pull_request_name: &'a str,
    pub status: &'a str,
    pub merged_at: Option<DateTime<Utc>>,
    pub revision: i64,
}

/// Row struct for reading reviewer slots.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = pull_request_reviewers)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ReviewerRow {
    #[expect(dead_code, reason = "reviewer rows are always loaded filtered by pull request")]
    pub pull_request_id: String,
    pub slot: i16,
    pub user_id: String,
}

/// Insertable struct for reviewer slots.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = pull_request_reviewers)]
pub(crate) struct NewReviewerRow<'a> {
    pub pull_request_id: &'a str,
    pub slot: i16,
    pub user_id: &'a str,
}
