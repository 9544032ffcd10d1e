//! Pull request lifecycle service.
//!
//! Creation assigns up to two reviewers from the author's team. Merge and
//! reassign are read-validate-write cycles guarded by the pull request
//! revision: a write that loses the race re-runs the whole cycle against
//! fresh state, up to [`MAX_UPDATE_ATTEMPTS`] times.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{debug, error, info, warn};

use crate::domain::ports::{
    CreatePullRequestRequest, PullRequestCommand, PullRequestRepository,
    PullRequestRepositoryError, ReassignReviewerRequest, ReassignReviewerResponse,
    TeamRepository, TeamRepositoryError, UserRepository, UserRepositoryError,
};
use crate::domain::{
    Error, MergeOutcome, PullRequest, PullRequestId, ReviewerChangeError, ReviewerPicker, Team,
    User, UserId, candidate_pool, select_initial, select_replacement,
};

/// Attempts made for a revision-guarded mutation before giving up.
pub const MAX_UPDATE_ATTEMPTS: usize = 3;

fn map_pr_error(error: PullRequestRepositoryError) -> Error {
    match error {
        PullRequestRepositoryError::Connection { message } => {
            error!(%message, "pull request repository unavailable");
            Error::service_unavailable(format!("pull request repository unavailable: {message}"))
        }
        PullRequestRepositoryError::Query { message } => {
            error!(%message, "pull request repository query failed");
            Error::internal(format!("pull request repository error: {message}"))
        }
        PullRequestRepositoryError::Duplicate { pull_request_id } => {
            Error::pr_exists(format!("pull request {pull_request_id} already exists"))
        }
        PullRequestRepositoryError::NotFound { pull_request_id } => {
            Error::not_found(format!("pull request {pull_request_id} not found"))
        }
        PullRequestRepositoryError::RevisionMismatch {
            pull_request_id, ..
        } => Error::concurrent_update(format!(
            "pull request {pull_request_id} was modified concurrently"
        )),
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

fn map_change_error(error: ReviewerChangeError) -> Error {
    match error {
        ReviewerChangeError::Merged => Error::pr_merged("cannot reassign on merged pull request"),
        ReviewerChangeError::NotAssigned { user_id } => {
            Error::not_assigned(format!("reviewer {user_id} is not assigned to this pull request"))
        }
        ReviewerChangeError::Invalid(err) => {
            error!(error = %err, "reviewer swap violated pull request invariants");
            Error::internal(format!("invalid reviewer swap: {err}"))
        }
    }
}

fn rejected(error: Error) -> Error {
    warn!(code = ?error.code(), message = error.message(), "pull request operation rejected");
    error
}

/// One pass of a revision-guarded mutation.
enum Attempt<T> {
    Done(T),
    Retry,
}

/// Pull request lifecycle service implementing [`PullRequestCommand`].
#[derive(Clone)]
pub struct PullRequestService<P, U, T> {
    pr_repo: Arc<P>,
    user_repo: Arc<U>,
    team_repo: Arc<T>,
    picker: Arc<dyn ReviewerPicker>,
    clock: Arc<dyn Clock>,
}

impl<P, U, T> PullRequestService<P, U, T>
where
    P: PullRequestRepository,
    U: UserRepository,
    T: TeamRepository,
{
    /// Wire the service to its repositories, reviewer picker and clock.
    pub fn new(
        pr_repo: Arc<P>,
        user_repo: Arc<U>,
        team_repo: Arc<T>,
        picker: Arc<dyn ReviewerPicker>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            pr_repo,
            user_repo,
            team_repo,
            picker,
            clock,
        }
    }

    async fn load(&self, id: &PullRequestId) -> Result<PullRequest, Error> {
        self.pr_repo
            .find_by_id(id)
            .await
            .map_err(map_pr_error)?
            .ok_or_else(|| rejected(Error::not_found(format!("pull request {id} not found"))))
    }

    async fn load_user(&self, id: &UserId) -> Result<User, Error> {
        self.user_repo
            .find_by_id(id)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| rejected(Error::not_found(format!("user {id} not found"))))
    }

    async fn load_team_of(&self, user: &User) -> Result<Team, Error> {
        self.team_repo
            .find_by_name(user.team_name())
            .await
            .map_err(map_team_error)?
            .ok_or_else(|| {
                rejected(Error::not_found(format!(
                    "team {} not found",
                    user.team_name()
                )))
            })
    }

    /// Conditionally write `pr`; a stale revision asks the caller to retry.
    async fn commit(&self, pr: &mut PullRequest) -> Result<Attempt<()>, Error> {
        match self.pr_repo.update(pr, pr.revision()).await {
            Ok(()) => {
                pr.advance_revision();
                Ok(Attempt::Done(()))
            }
            Err(PullRequestRepositoryError::RevisionMismatch { .. }) => Ok(Attempt::Retry),
            Err(other) => Err(map_pr_error(other)),
        }
    }

    fn exhausted(id: &PullRequestId) -> Error {
        rejected(Error::concurrent_update(format!(
            "pull request {id} kept changing; gave up after {MAX_UPDATE_ATTEMPTS} attempts"
        )))
    }

    async fn try_merge(&self, id: &PullRequestId) -> Result<Attempt<PullRequest>, Error> {
        let mut pr = self.load(id).await?;
        if pr.merge(self.clock.utc()) == MergeOutcome::AlreadyMerged {
            debug!(pull_request_id = %id, "pull request already merged");
            return Ok(Attempt::Done(pr));
        }

        match self.commit(&mut pr).await? {
            Attempt::Done(()) => {
                info!(pull_request_id = %id, "pull request merged");
                Ok(Attempt::Done(pr))
            }
            Attempt::Retry => Ok(Attempt::Retry),
        }
    }

    async fn try_reassign(
        &self,
        request: &ReassignReviewerRequest,
    ) -> Result<Attempt<ReassignReviewerResponse>, Error> {
        let ReassignReviewerRequest {
            pull_request_id,
            old_reviewer_id,
        } = request;

        let mut pr = self.load(pull_request_id).await?;
        if pr.is_merged() {
            return Err(rejected(Error::pr_merged(
                "cannot reassign on merged pull request",
            )));
        }
        if !pr.reviewers().contains(old_reviewer_id) {
            return Err(rejected(Error::not_assigned(format!(
                "reviewer {old_reviewer_id} is not assigned to this pull request"
            ))));
        }

        let old_reviewer = self.load_user(old_reviewer_id).await?;
        let team = self.load_team_of(&old_reviewer).await?;

        let mut excluded: Vec<&UserId> = vec![pr.author_id(), old_reviewer_id];
        excluded.extend(pr.reviewers().as_slice());
        let pool = candidate_pool(team.members(), &excluded);
        debug!(pull_request_id = %pull_request_id, pool = pool.len(), "replacement pool built");

        let replacement = select_replacement(self.picker.as_ref(), pool).ok_or_else(|| {
            rejected(Error::no_candidate(format!(
                "no active replacement candidate in team {}",
                team.name()
            )))
        })?;

        let slot = pr
            .replace_reviewer(old_reviewer_id, replacement.clone())
            .map_err(map_change_error)?;

        match self.commit(&mut pr).await? {
            Attempt::Done(()) => {
                info!(
                    pull_request_id = %pull_request_id,
                    old_reviewer = %old_reviewer_id,
                    new_reviewer = %replacement,
                    slot,
                    "reviewer reassigned"
                );
                Ok(Attempt::Done(ReassignReviewerResponse {
                    pull_request: pr,
                    replaced_by: replacement,
                }))
            }
            Attempt::Retry => Ok(Attempt::Retry),
        }
    }
}

#[async_trait]
impl<P, U, T> PullRequestCommand for PullRequestService<P, U, T>
where
    P: PullRequestRepository,
    U: UserRepository,
    T: TeamRepository,
{
    async fn create(&self, request: CreatePullRequestRequest) -> Result<PullRequest, Error> {
        let CreatePullRequestRequest {
            pull_request_id,
            pull_request_name,
            author_id,
        } = request;

        let existing = self
            .pr_repo
            .find_by_id(&pull_request_id)
            .await
            .map_err(map_pr_error)?;
        if existing.is_some() {
            return Err(rejected(Error::pr_exists(format!(
                "pull request {pull_request_id} already exists"
            ))));
        }

        let author = self.load_user(&author_id).await?;
        let team = self.load_team_of(&author).await?;

        let pool = candidate_pool(team.members(), &[author.id()]);
        debug!(pull_request_id = %pull_request_id, pool = pool.len(), "reviewer pool built");
        let reviewers = select_initial(self.picker.as_ref(), pool);

        let pr = PullRequest::open(
            pull_request_id,
            pull_request_name,
            author_id,
            reviewers,
            self.clock.utc(),
        )
        .map_err(|err| {
            error!(error = %err, "selected reviewers violate pull request invariants");
            Error::internal(format!("invalid pull request: {err}"))
        })?;

        self.pr_repo.create(&pr).await.map_err(|err| match err {
            PullRequestRepositoryError::Duplicate { .. } => rejected(map_pr_error(err)),
            other => map_pr_error(other),
        })?;

        info!(
            pull_request_id = %pr.id(),
            author_id = %pr.author_id(),
            reviewers = pr.reviewers().len(),
            "pull request created"
        );
        Ok(pr)
    }

    async fn merge(&self, id: &PullRequestId) -> Result<PullRequest, Error> {
        for attempt in 1..=MAX_UPDATE_ATTEMPTS {
            if let Attempt::Done(pr) = self.try_merge(id).await? {
                return Ok(pr);
            }
            debug!(pull_request_id = %id, attempt, "revision moved during merge; retrying");
        }
        Err(Self::exhausted(id))
    }

    async fn reassign(
        &self,
        request: ReassignReviewerRequest,
    ) -> Result<ReassignReviewerResponse, Error> {
        for attempt in 1..=MAX_UPDATE_ATTEMPTS {
            if let Attempt::Done(response) = self.try_reassign(&request).await? {
                return Ok(response);
            }
            debug!(
                pull_request_id = %request.pull_request_id,
                attempt,
                "revision moved during reassign; retrying"
            );
        }
        Err(Self::exhausted(&request.pull_request_id))
    }
}

#[cfg(test)]
#[path = "pull_request_service_tests.rs"]
mod tests;
