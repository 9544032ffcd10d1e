//! Pull request aggregate and its reviewer state machine.
//!
//! A pull request starts `OPEN` and may transition once to `MERGED`. While
//! open, its reviewers can be swapped slot by slot; once merged it is frozen.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::identifier::string_newtype;
use super::user::UserId;

/// Maximum number of reviewers attached to a pull request.
pub const MAX_REVIEWERS: usize = 2;

string_newtype!(
    /// Caller-supplied pull request identifier.
    PullRequestId,
    "pull_request_id"
);

string_newtype!(
    /// Pull request title.
    PullRequestName,
    "pull_request_name"
);

/// Lifecycle state of a pull request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PullRequestStatus {
    Open,
    Merged,
}

impl PullRequestStatus {
    /// Wire and storage representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Open => "OPEN",
            Self::Merged => "MERGED",
        }
    }
}

impl std::fmt::Display for PullRequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a stored status string is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown pull request status: {0}")]
pub struct UnknownStatus(pub String);

impl std::str::FromStr for PullRequestStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "OPEN" => Ok(Self::Open),
            "MERGED" => Ok(Self::Merged),
            other => Err(UnknownStatus(other.to_owned())),
        }
    }
}

/// Invariant violations detected while building a pull request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PullRequestValidationError {
    #[error("a pull request holds at most {max} reviewers")]
    TooManyReviewers { max: usize },
    #[error("reviewer {user_id} is assigned more than once")]
    DuplicateReviewer { user_id: String },
    #[error("author {user_id} cannot review their own pull request")]
    AuthorIsReviewer { user_id: String },
    #[error("merge timestamp must be present exactly when the pull request is merged")]
    MergedAtMismatch,
}

/// Reasons a reviewer swap is refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReviewerChangeError {
    #[error("pull request is merged")]
    Merged,
    #[error("reviewer {user_id} is not assigned")]
    NotAssigned { user_id: String },
    #[error(transparent)]
    Invalid(#[from] PullRequestValidationError),
}

/// Ordered reviewer slots of a pull request.
///
/// ## Invariants
/// - At most [`MAX_REVIEWERS`] entries.
/// - No duplicate user ids.
/// - Position in the vector is the persisted slot number.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReviewerSet(Vec<UserId>);

impl ReviewerSet {
    /// Validate size and uniqueness; order becomes slot order.
    ///
    /// ```
    /// use backend::domain::{ReviewerSet, UserId};
    ///
    /// let b = UserId::new("b").unwrap();
    /// let c = UserId::new("c").unwrap();
    /// let set = ReviewerSet::new(vec![c.clone(), b.clone()]).unwrap();
    /// assert_eq!(set.as_slice(), [c.clone(), b.clone()].as_slice());
    /// assert_eq!(set.slot_of(&b), Some(1));
    ///
    /// assert!(ReviewerSet::new(vec![b.clone(), b]).is_err());
    /// ```
    pub fn new(reviewers: Vec<UserId>) -> Result<Self, PullRequestValidationError> {
        if reviewers.len() > MAX_REVIEWERS {
            return Err(PullRequestValidationError::TooManyReviewers { max: MAX_REVIEWERS });
        }
        let mut seen = HashSet::with_capacity(reviewers.len());
        for reviewer in &reviewers {
            if !seen.insert(reviewer.as_str()) {
                return Err(PullRequestValidationError::DuplicateReviewer {
                    user_id: reviewer.to_string(),
                });
            }
        }
        Ok(Self(reviewers))
    }

    /// Reviewers in slot order.
    pub fn as_slice(&self) -> &[UserId] {
        &self.0
    }

    /// Number of occupied slots.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when no reviewer is assigned.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether `user_id` holds any slot.
    pub fn contains(&self, user_id: &UserId) -> bool {
        self.0.contains(user_id)
    }

    /// Slot currently held by `user_id`.
    pub fn slot_of(&self, user_id: &UserId) -> Option<usize> {
        self.0.iter().position(|reviewer| reviewer == user_id)
    }

    /// Iterate `(slot, reviewer)` pairs in slot order.
    pub fn slots(&self) -> impl Iterator<Item = (usize, &UserId)> {
        self.0.iter().enumerate()
    }
}

/// Raw pull request fields as loaded from storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestSnapshot {
    pub id: PullRequestId,
    pub name: PullRequestName,
    pub author_id: UserId,
    pub status: PullRequestStatus,
    pub reviewers: Vec<UserId>,
    pub created_at: DateTime<Utc>,
    pub merged_at: Option<DateTime<Utc>>,
    pub revision: i64,
}

/// Result of [`PullRequest::merge`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    /// The pull request moved from `OPEN` to `MERGED`.
    Merged,
    /// The pull request was already merged; nothing changed.
    AlreadyMerged,
}

/// Pull request aggregate.
///
/// ## Invariants
/// - The author never appears among the reviewers.
/// - `merged_at` is present exactly when `status` is `MERGED` and is never
///   rewritten once set.
/// - `revision` is the optimistic concurrency token observed at load time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequest {
    id: PullRequestId,
    name: PullRequestName,
    author_id: UserId,
    status: PullRequestStatus,
    reviewers: ReviewerSet,
    created_at: DateTime<Utc>,
    merged_at: Option<DateTime<Utc>>,
    revision: i64,
}

impl PullRequest {
    /// Open a new pull request with its initial reviewers.
    pub fn open(
        id: PullRequestId,
        name: PullRequestName,
        author_id: UserId,
        reviewers: Vec<UserId>,
        created_at: DateTime<Utc>,
    ) -> Result<Self, PullRequestValidationError> {
        Self::from_snapshot(PullRequestSnapshot {
            id,
            name,
            author_id,
            status: PullRequestStatus::Open,
            reviewers,
            created_at,
            merged_at: None,
            revision: 0,
        })
    }

    /// Rebuild an aggregate from stored fields, re-checking invariants.
    pub fn from_snapshot(snapshot: PullRequestSnapshot) -> Result<Self, PullRequestValidationError> {
        let PullRequestSnapshot {
            id,
            name,
            author_id,
            status,
            reviewers,
            created_at,
            merged_at,
            revision,
        } = snapshot;

        let reviewers = ReviewerSet::new(reviewers)?;
        if reviewers.contains(&author_id) {
            return Err(PullRequestValidationError::AuthorIsReviewer {
                user_id: author_id.to_string(),
            });
        }
        if (status == PullRequestStatus::Merged) != merged_at.is_some() {
            return Err(PullRequestValidationError::MergedAtMismatch);
        }

        Ok(Self {
            id,
            name,
            author_id,
            status,
            reviewers,
            created_at,
            merged_at,
            revision,
        })
    }

    /// Pull request identifier.
    pub fn id(&self) -> &PullRequestId {
        &self.id
    }

    /// Title as submitted.
    pub fn name(&self) -> &PullRequestName {
        &self.name
    }

    /// Author; never one of the reviewers.
    pub fn author_id(&self) -> &UserId {
        &self.author_id
    }

    /// Current lifecycle state.
    pub fn status(&self) -> PullRequestStatus {
        self.status
    }

    /// True once the pull request reached `MERGED`.
    pub fn is_merged(&self) -> bool {
        self.status == PullRequestStatus::Merged
    }

    /// Assigned reviewers in slot order.
    pub fn reviewers(&self) -> &ReviewerSet {
        &self.reviewers
    }

    /// Creation timestamp (UTC).
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Merge timestamp; present exactly when merged.
    pub fn merged_at(&self) -> Option<DateTime<Utc>> {
        self.merged_at
    }

    /// Optimistic concurrency token of the loaded state.
    pub fn revision(&self) -> i64 {
        self.revision
    }

    /// Record that a conditional write at the current revision succeeded.
    pub fn advance_revision(&mut self) {
        self.revision += 1;
    }

    /// Copy of this pull request stamped with `revision`.
    pub fn with_revision(mut self, revision: i64) -> Self {
        self.revision = revision;
        self
    }

    /// Transition to `MERGED`, stamping `now`. Merging twice is a no-op.
    ///
    /// # Examples
    /// ```
    /// use backend::domain::{MergeOutcome, PullRequest, PullRequestId, PullRequestName, UserId};
    /// use chrono::{TimeZone, Utc};
    ///
    /// let created = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
    /// let mut pr = PullRequest::open(
    ///     PullRequestId::new("pr-1").unwrap(),
    ///     PullRequestName::new("fix").unwrap(),
    ///     UserId::new("u1").unwrap(),
    ///     Vec::new(),
    ///     created,
    /// )
    /// .unwrap();
    /// let first = Utc.with_ymd_and_hms(2025, 1, 2, 0, 0, 0).unwrap();
    /// assert_eq!(pr.merge(first), MergeOutcome::Merged);
    /// assert_eq!(pr.merge(Utc::now()), MergeOutcome::AlreadyMerged);
    /// assert_eq!(pr.merged_at(), Some(first));
    /// ```
    pub fn merge(&mut self, now: DateTime<Utc>) -> MergeOutcome {
        if self.is_merged() {
            return MergeOutcome::AlreadyMerged;
        }
        self.status = PullRequestStatus::Merged;
        self.merged_at = Some(now);
        MergeOutcome::Merged
    }

    /// Replace `old` with `new` in the slot `old` occupies.
    ///
    /// Returns the slot that changed. The other slot is left as is.
    pub fn replace_reviewer(
        &mut self,
        old: &UserId,
        new: UserId,
    ) -> Result<usize, ReviewerChangeError> {
        if self.is_merged() {
            return Err(ReviewerChangeError::Merged);
        }
        let slot = self
            .reviewers
            .slot_of(old)
            .ok_or_else(|| ReviewerChangeError::NotAssigned {
                user_id: old.to_string(),
            })?;
        if new == self.author_id {
            return Err(PullRequestValidationError::AuthorIsReviewer {
                user_id: new.to_string(),
            }
            .into());
        }

        let mut next = self.reviewers.as_slice().to_vec();
        next[slot] = new;
        self.reviewers = ReviewerSet::new(next)?;
        Ok(slot)
    }

    /// Summary projection used by reviewer listings.
    pub fn to_short(&self) -> PullRequestShort {
        PullRequestShort {
            id: self.id.clone(),
            name: self.name.clone(),
            author_id: self.author_id.clone(),
            status: self.status,
        }
    }
}

/// Summary of a pull request without reviewers or timestamps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestShort {
    pub id: PullRequestId,
    pub name: PullRequestName,
    pub author_id: UserId,
    pub status: PullRequestStatus,
}

/// Review load for a single reviewer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewerStats {
    pub user_id: UserId,
    /// Pull requests the user is assigned to, in any state.
    pub assigned_reviews: u64,
    /// Subset of `assigned_reviews` still open.
    pub open_reviews: u64,
}

#[cfg(test)]
#[path = "pull_request_tests.rs"]
mod tests;
