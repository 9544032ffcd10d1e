//! Driving port for toggling user activity.

use async_trait::async_trait;

use crate::domain::{Error, User, UserId};

/// Request to change a user's activity flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetUserActiveRequest {
    pub user_id: UserId,
    pub is_active: bool,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserActivityCommand: Send + Sync {
    /// Update only the activity flag and return the stored user.
    async fn set_is_active(&self, request: SetUserActiveRequest) -> Result<User, Error>;
}
