//! Domain primitives, aggregates, and services.
//!
//! Purpose: model teams, users, and pull requests with their reviewer
//! assignment rules. Types here know nothing about HTTP or SQL; adapters
//! reach them through the traits in [`ports`].
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failure payload.
//! - Team, User, PullRequest: aggregates with their identifiers.
//! - Reviewer selection helpers and the [`ReviewerPicker`] randomness port.
//! - Services implementing the driving ports.

pub mod error;
pub(crate) mod identifier;
pub mod ports;
pub mod pull_request;
pub mod pull_request_service;
pub mod review_query_service;
pub mod reviewer_selection;
pub mod team;
pub mod team_service;
pub mod trace_id;
pub mod user;

pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::identifier::{IDENTIFIER_MAX, IdentifierValidationError};
pub use self::pull_request::{
    MAX_REVIEWERS, MergeOutcome, PullRequest, PullRequestId, PullRequestName, PullRequestShort,
    PullRequestSnapshot, PullRequestStatus, PullRequestValidationError, ReviewerChangeError,
    ReviewerSet, ReviewerStats, UnknownStatus,
};
pub use self::pull_request_service::{MAX_UPDATE_ATTEMPTS, PullRequestService};
pub use self::review_query_service::ReviewQueryService;
pub use self::reviewer_selection::{
    RandomReviewerPicker, ReviewerPicker, candidate_pool, select_initial, select_replacement,
};
pub use self::team::{Team, TeamMember, TeamName, TeamValidationError};
pub use self::team_service::TeamService;
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{User, UserId, Username};
