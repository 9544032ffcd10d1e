//! In-memory implementation of the team, user, and pull request repositories.
//!
//! All tables sit behind one `RwLock`, so every port call is atomic with
//! respect to every other. Ordering and revision semantics match the Diesel
//! adapters. State is lost on restart.

use std::collections::{BTreeMap, BTreeSet};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::ports::{
    PullRequestRepository, PullRequestRepositoryError, TeamCreation, TeamRepository,
    TeamRepositoryError, UserRepository, UserRepositoryError,
};
use crate::domain::{
    PullRequest, PullRequestId, PullRequestShort, PullRequestStatus, ReviewerStats, Team,
    TeamMember, TeamName, User, UserId,
};

#[derive(Debug, Default)]
struct Tables {
    teams: BTreeSet<TeamName>,
    users: BTreeMap<UserId, User>,
    pull_requests: BTreeMap<PullRequestId, PullRequest>,
}

/// Shared in-memory store implementing every repository port.
///
/// Wrap it in an `Arc` and hand the same instance to each service.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TeamRepository for InMemoryStore {
    async fn create_with_members(&self, team: &Team) -> Result<TeamCreation, TeamRepositoryError> {
        let mut tables = self.tables.write().await;
        if !tables.teams.insert(team.name().clone()) {
            return Ok(TeamCreation::AlreadyExists);
        }
        for user in team.users() {
            tables.users.insert(user.id().clone(), user);
        }
        Ok(TeamCreation::Created)
    }

    async fn find_by_name(&self, name: &TeamName) -> Result<Option<Team>, TeamRepositoryError> {
        let tables = self.tables.read().await;
        if !tables.teams.contains(name) {
            return Ok(None);
        }
        let members = tables
            .users
            .values()
            .filter(|user| user.team_name() == name)
            .map(TeamMember::from)
            .collect();
        Team::new(name.clone(), members)
            .map(Some)
            .map_err(|err| TeamRepositoryError::query(err.to_string()))
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserRepositoryError> {
        Ok(self.tables.read().await.users.get(id).cloned())
    }

    async fn update(&self, user: &User) -> Result<(), UserRepositoryError> {
        let mut tables = self.tables.write().await;
        match tables.users.get_mut(user.id()) {
            Some(stored) => {
                *stored = user.clone();
                Ok(())
            }
            None => Err(UserRepositoryError::not_found(user.id().as_str())),
        }
    }
}

#[async_trait]
impl PullRequestRepository for InMemoryStore {
    async fn create(&self, pr: &PullRequest) -> Result<(), PullRequestRepositoryError> {
        let mut tables = self.tables.write().await;
        if tables.pull_requests.contains_key(pr.id()) {
            return Err(PullRequestRepositoryError::duplicate(pr.id().as_str()));
        }
        let unknown = std::iter::once(pr.author_id())
            .chain(pr.reviewers().as_slice())
            .find(|user_id| !tables.users.contains_key(*user_id));
        if let Some(user_id) = unknown {
            return Err(PullRequestRepositoryError::query(format!(
                "user {user_id} does not exist"
            )));
        }
        tables.pull_requests.insert(pr.id().clone(), pr.clone());
        Ok(())
    }

    async fn find_by_id(
        &self,
        id: &PullRequestId,
    ) -> Result<Option<PullRequest>, PullRequestRepositoryError> {
        Ok(self.tables.read().await.pull_requests.get(id).cloned())
    }

    async fn update(
        &self,
        pr: &PullRequest,
        expected_revision: i64,
    ) -> Result<(), PullRequestRepositoryError> {
        let mut tables = self.tables.write().await;
        let Some(stored) = tables.pull_requests.get_mut(pr.id()) else {
            return Err(PullRequestRepositoryError::not_found(pr.id().as_str()));
        };
        if stored.revision() != expected_revision {
            return Err(PullRequestRepositoryError::revision_mismatch(
                pr.id().as_str(),
                expected_revision,
            ));
        }
        *stored = pr.clone().with_revision(expected_revision + 1);
        Ok(())
    }

    async fn list_by_reviewer(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<PullRequestShort>, PullRequestRepositoryError> {
        let tables = self.tables.read().await;
        let mut assigned: Vec<&PullRequest> = tables
            .pull_requests
            .values()
            .filter(|pr| pr.reviewers().contains(user_id))
            .collect();
        assigned.sort_by(|a, b| (a.created_at(), a.id()).cmp(&(b.created_at(), b.id())));
        Ok(assigned.into_iter().map(PullRequest::to_short).collect())
    }

    async fn reviewer_assignment_counts(
        &self,
    ) -> Result<Vec<ReviewerStats>, PullRequestRepositoryError> {
        let tables = self.tables.read().await;
        let mut counts: BTreeMap<&UserId, (u64, u64)> = BTreeMap::new();
        for pr in tables.pull_requests.values() {
            for reviewer in pr.reviewers().as_slice() {
                let entry = counts.entry(reviewer).or_default();
                entry.0 += 1;
                if pr.status() == PullRequestStatus::Open {
                    entry.1 += 1;
                }
            }
        }
        Ok(counts
            .into_iter()
            .map(|(user_id, (assigned_reviews, open_reviews))| ReviewerStats {
                user_id: user_id.clone(),
                assigned_reviews,
                open_reviews,
            })
            .collect())
    }
}

#[cfg(test)]
#[path = "memory_tests.rs"]
mod tests;
