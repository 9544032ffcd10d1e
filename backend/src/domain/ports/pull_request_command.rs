//! Driving port for the pull request lifecycle.
//!
//! Covers creation with initial reviewer assignment, merging, and swapping a
//! single reviewer.

use async_trait::async_trait;

use crate::domain::{Error, PullRequest, PullRequestId, PullRequestName, UserId};

/// Request to open a pull request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatePullRequestRequest {
    pub pull_request_id: PullRequestId,
    pub pull_request_name: PullRequestName,
    pub author_id: UserId,
}

/// Request to replace one reviewer of an open pull request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReassignReviewerRequest {
    pub pull_request_id: PullRequestId,
    pub old_reviewer_id: UserId,
}

/// Result of a successful reassignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReassignReviewerResponse {
    pub pull_request: PullRequest,
    pub replaced_by: UserId,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PullRequestCommand: Send + Sync {
    /// Open a pull request and assign up to two reviewers.
    async fn create(&self, request: CreatePullRequestRequest) -> Result<PullRequest, Error>;

    /// Merge a pull request. Merging an already merged pull request is a no-op.
    async fn merge(&self, id: &PullRequestId) -> Result<PullRequest, Error>;

    /// Replace one reviewer with a random eligible teammate.
    async fn reassign(
        &self,
        request: ReassignReviewerRequest,
    ) -> Result<ReassignReviewerResponse, Error>;
}
