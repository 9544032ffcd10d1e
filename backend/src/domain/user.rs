//! User record as stored by the registry.

use super::identifier::string_newtype;
use super::team::TeamName;

string_newtype!(
    /// Stable, caller-supplied user identifier.
    UserId,
    "user_id"
);

string_newtype!(
    /// Human readable display name.
    Username,
    "username"
);

/// A registered user.
///
/// Users are created implicitly by team creation and belong to exactly one
/// team, referenced by name. Only the activity flag changes afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id: UserId,
    username: Username,
    team_name: TeamName,
    is_active: bool,
}

impl User {
    pub fn new(id: UserId, username: Username, team_name: TeamName, is_active: bool) -> Self {
        Self {
            id,
            username,
            team_name,
            is_active,
        }
    }

    pub fn id(&self) -> &UserId {
        &self.id
    }

    pub fn username(&self) -> &Username {
        &self.username
    }

    pub fn team_name(&self) -> &TeamName {
        &self.team_name
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    /// Flip the activity flag, leaving every other field untouched.
    pub fn set_active(&mut self, is_active: bool) {
        self.is_active = is_active;
    }
}
