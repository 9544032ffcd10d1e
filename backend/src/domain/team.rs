//! Team aggregate and its member roster.

use std::collections::HashSet;

use thiserror::Error;

use super::identifier::string_newtype;
use super::user::{User, UserId, Username};

string_newtype!(
    /// Globally unique team name.
    TeamName,
    "team_name"
);

/// A user as listed on a team roster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamMember {
    pub user_id: UserId,
    pub username: Username,
    pub is_active: bool,
}

impl TeamMember {
    /// Project this member into a full user record owned by `team`.
    pub fn to_user(&self, team: &TeamName) -> User {
        User::new(
            self.user_id.clone(),
            self.username.clone(),
            team.clone(),
            self.is_active,
        )
    }
}

impl From<&User> for TeamMember {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.id().clone(),
            username: user.username().clone(),
            is_active: user.is_active(),
        }
    }
}

/// Validation errors returned by [`Team::new`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TeamValidationError {
    #[error("member {user_id} is listed more than once")]
    DuplicateMember { user_id: String },
}

/// A named team and its members.
///
/// ## Invariants
/// - Member user ids are unique within the team.
/// - Member order is preserved; reviewer pools follow it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Team {
    name: TeamName,
    members: Vec<TeamMember>,
}

impl Team {
    /// Build a team, rejecting rosters that list a user twice.
    ///
    /// # Examples
    /// ```
    /// use backend::domain::{Team, TeamMember, TeamName, UserId, Username};
    ///
    /// let member = TeamMember {
    ///     user_id: UserId::new("u1").expect("valid id"),
    ///     username: Username::new("Alice").expect("valid name"),
    ///     is_active: true,
    /// };
    /// let team = Team::new(TeamName::new("core").expect("valid name"), vec![member])
    ///     .expect("unique members");
    /// assert_eq!(team.members().len(), 1);
    /// ```
    pub fn new(name: TeamName, members: Vec<TeamMember>) -> Result<Self, TeamValidationError> {
        let mut seen = HashSet::with_capacity(members.len());
        for member in &members {
            if !seen.insert(member.user_id.as_str()) {
                return Err(TeamValidationError::DuplicateMember {
                    user_id: member.user_id.to_string(),
                });
            }
        }
        Ok(Self { name, members })
    }

    pub fn name(&self) -> &TeamName {
        &self.name
    }

    pub fn members(&self) -> &[TeamMember] {
        &self.members
    }

    /// Full user records for every member, as persisted by team creation.
    pub fn users(&self) -> Vec<User> {
        self.members
            .iter()
            .map(|member| member.to_user(&self.name))
            .collect()
    }
}
