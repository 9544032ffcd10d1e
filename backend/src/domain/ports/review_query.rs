//! Driving port for reviewer-centric reads.

use async_trait::async_trait;

use crate::domain::{Error, PullRequestShort, ReviewerStats, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReviewQuery: Send + Sync {
    /// Pull requests `user_id` is assigned to review. Unknown users get an empty list.
    async fn reviews_for_user(&self, user_id: &UserId) -> Result<Vec<PullRequestShort>, Error>;

    /// Assigned and open review counts per reviewer.
    async fn reviewer_stats(&self) -> Result<Vec<ReviewerStats>, Error>;
}
