//! Reviewer-centric read services.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::error;

use crate::domain::ports::{PullRequestRepository, PullRequestRepositoryError, ReviewQuery};
use crate::domain::{Error, PullRequestShort, ReviewerStats, UserId};

fn map_repository_error(error: PullRequestRepositoryError) -> Error {
    match error {
        PullRequestRepositoryError::Connection { message } => {
            error!(%message, "pull request repository unavailable");
            Error::service_unavailable(format!("pull request repository unavailable: {message}"))
        }
        other => {
            error!(error = %other, "pull request repository read failed");
            Error::internal(format!("pull request repository error: {other}"))
        }
    }
}

/// Read service implementing [`ReviewQuery`].
#[derive(Clone)]
pub struct ReviewQueryService<P> {
    pr_repo: Arc<P>,
}

impl<P> ReviewQueryService<P> {
    /// Build the query service over the pull request repository.
    pub fn new(pr_repo: Arc<P>) -> Self {
        Self { pr_repo }
    }
}

#[async_trait]
impl<P> ReviewQuery for ReviewQueryService<P>
where
    P: PullRequestRepository,
{
    async fn reviews_for_user(&self, user_id: &UserId) -> Result<Vec<PullRequestShort>, Error> {
        self.pr_repo
            .list_by_reviewer(user_id)
            .await
            .map_err(map_repository_error)
    }

    async fn reviewer_stats(&self) -> Result<Vec<ReviewerStats>, Error> {
        self.pr_repo
            .reviewer_assignment_counts()
            .await
            .map_err(map_repository_error)
    }
}
