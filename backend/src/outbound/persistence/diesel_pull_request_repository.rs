//! PostgreSQL-backed `PullRequestRepository` implementation using Diesel ORM.
//!
//! Pull request rows and their reviewer slots are always written together in
//! one transaction. Updates are conditional on the stored revision: the
//! `UPDATE ... WHERE revision = expected` either touches one row or the
//! transaction rolls back and reports why.

use std::collections::BTreeMap;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};
use tracing::debug;

use crate::domain::ports::{PullRequestRepository, PullRequestRepositoryError};
use crate::domain::{
    PullRequest, PullRequestId, PullRequestName, PullRequestShort, PullRequestSnapshot,
    PullRequestStatus, ReviewerStats, UserId,
};

use super::diesel_basic_error_mapping::{
    is_unique_violation, map_basic_diesel_error, map_basic_pool_error,
};
use super::models::{
    NewPullRequestRow, NewReviewerRow, PullRequestRow, PullRequestUpdate, ReviewerRow,
};
use super::pool::{DbPool, PoolError};
use super::schema::{pull_request_reviewers, pull_requests};

/// Diesel-backed implementation of the pull request repository port.
#[derive(Clone)]
pub struct DieselPullRequestRepository {
    pool: DbPool,
}

impl DieselPullRequestRepository {
    /// Create a repository backed by `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Select one pull request row under a shared lock.
///
/// Writers update the row before touching reviewer slots, so holding the
/// lock keeps a following reviewer read consistent with the row.
macro_rules! locked_pull_request_row {
    ($id:expr) => {
        pull_requests::table
            .find($id)
            .select(PullRequestRow::as_select())
            .for_share()
    };
}

/// Failures raised inside a write transaction; any of them rolls it back.
#[derive(Debug)]
enum TxError {
    Diesel(diesel::result::Error),
    Duplicate,
    NotFound,
    RevisionMismatch,
}

impl From<diesel::result::Error> for TxError {
    fn from(value: diesel::result::Error) -> Self {
        Self::Diesel(value)
    }
}

fn map_pool_error(error: PoolError) -> PullRequestRepositoryError {
    map_basic_pool_error(error, |message| {
        PullRequestRepositoryError::connection(message)
    })
}

fn map_diesel_error(error: diesel::result::Error) -> PullRequestRepositoryError {
    map_basic_diesel_error(
        error,
        |message| PullRequestRepositoryError::query(message),
        |message| PullRequestRepositoryError::connection(message),
    )
}

fn map_tx_error(error: TxError, pr: &PullRequest, expected: i64) -> PullRequestRepositoryError {
    let id = pr.id().as_str();
    match error {
        TxError::Diesel(err) if is_unique_violation(&err) => {
            PullRequestRepositoryError::duplicate(id)
        }
        TxError::Diesel(err) => map_diesel_error(err),
        TxError::Duplicate => PullRequestRepositoryError::duplicate(id),
        TxError::NotFound => PullRequestRepositoryError::not_found(id),
        TxError::RevisionMismatch => PullRequestRepositoryError::revision_mismatch(id, expected),
    }
}

fn corrupt(context: &str, err: impl std::fmt::Display) -> PullRequestRepositoryError {
    PullRequestRepositoryError::query(format!("stored {context}: {err}"))
}

fn reviewer_rows(pr: &PullRequest) -> Result<Vec<NewReviewerRow<'_>>, PullRequestRepositoryError> {
    let pull_request_id = pr.id().as_str();
    pr.reviewers()
        .slots()
        .map(|(slot, user_id)| {
            let slot = i16::try_from(slot).map_err(|err| corrupt("reviewer slot", err))?;
            Ok(NewReviewerRow {
                pull_request_id,
                slot,
                user_id: user_id.as_str(),
            })
        })
        .collect()
}

fn row_to_short(row: PullRequestRow) -> Result<PullRequestShort, PullRequestRepositoryError> {
    Ok(PullRequestShort {
        id: PullRequestId::new(row.pull_request_id).map_err(|err| corrupt("id", err))?,
        name: PullRequestName::new(row.pull_request_name).map_err(|err| corrupt("name", err))?,
        author_id: UserId::new(row.author_id).map_err(|err| corrupt("author id", err))?,
        status: row
            .status
            .parse::<PullRequestStatus>()
            .map_err(|err| corrupt("status", err))?,
    })
}

fn rows_to_pull_request(
    row: PullRequestRow,
    mut reviewers: Vec<ReviewerRow>,
) -> Result<PullRequest, PullRequestRepositoryError> {
    reviewers.sort_by_key(|reviewer| reviewer.slot);
    let reviewers = reviewers
        .into_iter()
        .map(|reviewer| UserId::new(reviewer.user_id).map_err(|err| corrupt("reviewer id", err)))
        .collect::<Result<Vec<_>, _>>()?;
    let created_at = row.created_at;
    let merged_at = row.merged_at;
    let revision = row.revision;
    let short = row_to_short(row)?;

    PullRequest::from_snapshot(PullRequestSnapshot {
        id: short.id,
        name: short.name,
        author_id: short.author_id,
        status: short.status,
        reviewers,
        created_at,
        merged_at,
        revision,
    })
    .map_err(|err| corrupt("pull request", err))
}

async fn insert_reviewers(
    conn: &mut AsyncPgConnection,
    rows: &[NewReviewerRow<'_>],
) -> Result<(), diesel::result::Error> {
    if rows.is_empty() {
        return Ok(());
    }
    diesel::insert_into(pull_request_reviewers::table)
        .values(rows)
        .execute(conn)
        .await
        .map(|_| ())
}

/// Tally `(reviewer, status)` pairs into per-reviewer counts, ordered by id.
fn tally_reviews(
    pairs: Vec<(String, String)>,
) -> Result<Vec<ReviewerStats>, PullRequestRepositoryError> {
    let mut counts: BTreeMap<String, (u64, u64)> = BTreeMap::new();
    for (user_id, status) in pairs {
        let status = status
            .parse::<PullRequestStatus>()
            .map_err(|err| corrupt("status", err))?;
        let entry = counts.entry(user_id).or_default();
        entry.0 += 1;
        if status == PullRequestStatus::Open {
            entry.1 += 1;
        }
    }

    counts
        .into_iter()
        .map(|(user_id, (assigned_reviews, open_reviews))| {
            Ok(ReviewerStats {
                user_id: UserId::new(user_id).map_err(|err| corrupt("reviewer id", err))?,
                assigned_reviews,
                open_reviews,
            })
        })
        .collect()
}

#[async_trait]
impl PullRequestRepository for DieselPullRequestRepository {
    async fn create(&self, pr: &PullRequest) -> Result<(), PullRequestRepositoryError> {
        let new_row = NewPullRequestRow {
            pull_request_id: pr.id().as_str(),
            pull_request_name: pr.name().as_str(),
            author_id: pr.author_id().as_str(),
            status: pr.status().as_str(),
            created_at: pr.created_at(),
            merged_at: pr.merged_at(),
            revision: pr.revision(),
        };
        let reviewers = reviewer_rows(pr)?;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        conn.transaction::<_, TxError, _>(|conn| {
            async move {
                let inserted = diesel::insert_into(pull_requests::table)
                    .values(&new_row)
                    .on_conflict(pull_requests::pull_request_id)
                    .do_nothing()
                    .execute(conn)
                    .await?;
                if inserted == 0 {
                    return Err(TxError::Duplicate);
                }
                insert_reviewers(conn, &reviewers).await?;
                Ok(())
            }
            .scope_boxed()
        })
        .await
        .map_err(|err| map_tx_error(err, pr, pr.revision()))
    }

    async fn find_by_id(
        &self,
        id: &PullRequestId,
    ) -> Result<Option<PullRequest>, PullRequestRepositoryError> {
        let id = id.as_str();
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let loaded = conn
            .transaction::<_, diesel::result::Error, _>(|conn| {
                async move {
                    let Some(row) = locked_pull_request_row!(id)
                        .first(conn)
                        .await
                        .optional()?
                    else {
                        return Ok(None);
                    };
                    let reviewers = pull_request_reviewers::table
                        .filter(pull_request_reviewers::pull_request_id.eq(id))
                        .order(pull_request_reviewers::slot.asc())
                        .select(ReviewerRow::as_select())
                        .load(conn)
                        .await?;
                    Ok(Some((row, reviewers)))
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;

        loaded
            .map(|(row, reviewers)| rows_to_pull_request(row, reviewers))
            .transpose()
    }

    async fn update(
        &self,
        pr: &PullRequest,
        expected_revision: i64,
    ) -> Result<(), PullRequestRepositoryError> {
        let id = pr.id().as_str();
        let changes = PullRequestUpdate {
            pull_request_name: pr.name().as_str(),
            status: pr.status().as_str(),
            merged_at: pr.merged_at(),
            revision: expected_revision + 1,
        };
        let reviewers = reviewer_rows(pr)?;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        conn.transaction::<_, TxError, _>(|conn| {
            async move {
                let updated = diesel::update(
                    pull_requests::table
                        .find(id)
                        .filter(pull_requests::revision.eq(expected_revision)),
                )
                .set(&changes)
                .execute(conn)
                .await?;

                if updated == 0 {
                    let current = pull_requests::table
                        .find(id)
                        .select(pull_requests::revision)
                        .first::<i64>(conn)
                        .await
                        .optional()?;
                    debug!(pull_request_id = id, ?current, expected_revision, "conditional update missed");
                    return Err(match current {
                        Some(_) => TxError::RevisionMismatch,
                        None => TxError::NotFound,
                    });
                }

                diesel::delete(
                    pull_request_reviewers::table
                        .filter(pull_request_reviewers::pull_request_id.eq(id)),
                )
                .execute(conn)
                .await?;
                insert_reviewers(conn, &reviewers).await?;
                Ok(())
            }
            .scope_boxed()
        })
        .await
        .map_err(|err| map_tx_error(err, pr, expected_revision))
    }

    async fn list_by_reviewer(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<PullRequestShort>, PullRequestRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows = pull_request_reviewers::table
            .inner_join(pull_requests::table)
            .filter(pull_request_reviewers::user_id.eq(user_id.as_str()))
            .order((
                pull_requests::created_at.asc(),
                pull_requests::pull_request_id.asc(),
            ))
            .select(PullRequestRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(row_to_short).collect()
    }

    async fn reviewer_assignment_counts(
        &self,
    ) -> Result<Vec<ReviewerStats>, PullRequestRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let pairs = pull_request_reviewers::table
            .inner_join(pull_requests::table)
            .select((pull_request_reviewers::user_id, pull_requests::status))
            .load::<(String, String)>(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        tally_reviews(pairs)
    }
}
