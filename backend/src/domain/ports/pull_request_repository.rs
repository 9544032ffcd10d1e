//! Port for pull request persistence, reviewer links, and review listings.

use async_trait::async_trait;

use crate::domain::{PullRequest, PullRequestId, PullRequestShort, ReviewerStats, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by pull request repository adapters.
    pub enum PullRequestRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "pull request repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "pull request repository query failed: {message}",
        /// A pull request with the same id already exists.
        Duplicate { pull_request_id: String } =>
            "pull request {pull_request_id} already exists",
        /// The pull request to update does not exist.
        NotFound { pull_request_id: String } =>
            "pull request {pull_request_id} not found",
        /// The stored revision moved on since the caller loaded it.
        RevisionMismatch { pull_request_id: String, expected: i64 } =>
            "pull request {pull_request_id} is no longer at revision {expected}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PullRequestRepository: Send + Sync {
    /// Persist a new pull request together with its reviewer links.
    async fn create(&self, pr: &PullRequest) -> Result<(), PullRequestRepositoryError>;

    /// Load a pull request with reviewers in slot order.
    async fn find_by_id(
        &self,
        id: &PullRequestId,
    ) -> Result<Option<PullRequest>, PullRequestRepositoryError>;

    /// Write `pr` if the stored revision still equals `expected_revision`.
    ///
    /// The reviewer set is replaced in the same unit of work and the stored
    /// revision becomes `expected_revision + 1`.
    async fn update(
        &self,
        pr: &PullRequest,
        expected_revision: i64,
    ) -> Result<(), PullRequestRepositoryError>;

    /// Summaries of every pull request `user_id` is assigned to review.
    async fn list_by_reviewer(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<PullRequestShort>, PullRequestRepositoryError>;

    /// Review load per reviewer, ordered by user id.
    async fn reviewer_assignment_counts(
        &self,
    ) -> Result<Vec<ReviewerStats>, PullRequestRepositoryError>;
}
