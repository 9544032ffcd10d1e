//! Domain-level error types.
//!
//! These errors are transport agnostic. The HTTP adapter maps each
//! [`ErrorCode`] to a status class and wraps the payload in an envelope.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::TraceId;

/// Stable machine-readable error code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// The request is malformed or fails validation.
    InvalidRequest,
    /// A team with the requested name already exists.
    TeamExists,
    /// A pull request with the requested identifier already exists.
    PrExists,
    /// The pull request is merged and can no longer change reviewers.
    PrMerged,
    /// The reviewer is not assigned to the pull request.
    NotAssigned,
    /// No active teammate is eligible as a replacement reviewer.
    NoCandidate,
    /// A referenced entity does not exist.
    NotFound,
    /// Concurrent writers kept winning the race for the same pull request.
    ConcurrentUpdate,
    /// The backing store is unreachable.
    ServiceUnavailable,
    /// An unexpected error occurred inside the domain.
    InternalError,
}

impl ErrorCode {
    /// Conflict-style codes share a single status class at the transport.
    pub fn is_conflict(self) -> bool {
        matches!(
            self,
            Self::TeamExists
                | Self::PrExists
                | Self::PrMerged
                | Self::NotAssigned
                | Self::NoCandidate
                | Self::ConcurrentUpdate
        )
    }
}

/// Domain error payload.
///
/// ## Invariants
/// - `message` is non-empty once trimmed.
/// - `trace_id` is captured from the ambient [`TraceId`] at construction.
///
/// # Examples
/// ```
/// use backend::domain::{Error, ErrorCode};
///
/// let err = Error::not_found("pull request pr-1 not found");
/// assert_eq!(err.code(), ErrorCode::NotFound);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Error {
    code: ErrorCode,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    trace_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
}

/// Validation errors emitted by [`Error::try_new`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ErrorValidationError {
    #[error("error message must not be empty")]
    EmptyMessage,
}

impl Error {
    /// Create a new error, panicking if the message is blank.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        match Self::try_new(code, message) {
            Ok(value) => value,
            Err(err) => panic!("error messages must satisfy validation: {err}"),
        }
    }

    /// Fallible constructor that validates the message content.
    pub fn try_new(code: ErrorCode, message: impl Into<String>) -> Result<Self, ErrorValidationError> {
        let message = message.into();
        if message.trim().is_empty() {
            return Err(ErrorValidationError::EmptyMessage);
        }
        Ok(Self {
            code,
            message,
            trace_id: TraceId::current().map(|id| id.to_string()),
            details: None,
        })
    }

    pub fn code(&self) -> ErrorCode {
        self.code
    }

    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    pub fn trace_id(&self) -> Option<&str> {
        self.trace_id.as_deref()
    }

    pub fn details(&self) -> Option<&Value> {
        self.details.as_ref()
    }

    /// Attach a trace identifier explicitly.
    pub fn with_trace_id(mut self, trace_id: impl Into<String>) -> Self {
        self.trace_id = Some(trace_id.into());
        self
    }

    /// Attach structured details to the error.
    ///
    /// # Examples
    /// ```
    /// use backend::domain::Error;
    /// use serde_json::json;
    ///
    /// let err = Error::invalid_request("bad").with_details(json!({ "field": "team_name" }));
    /// assert!(err.details().is_some());
    /// ```
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidRequest, message)
    }

    pub fn team_exists(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::TeamExists, message)
    }

    pub fn pr_exists(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::PrExists, message)
    }

    pub fn pr_merged(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::PrMerged, message)
    }

    pub fn not_assigned(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotAssigned, message)
    }

    pub fn no_candidate(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NoCandidate, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, message)
    }

    pub fn concurrent_update(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConcurrentUpdate, message)
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ServiceUnavailable, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde_json::json;

    use super::*;

    #[rstest]
    #[case(ErrorCode::TeamExists, "\"TEAM_EXISTS\"")]
    #[case(ErrorCode::PrExists, "\"PR_EXISTS\"")]
    #[case(ErrorCode::PrMerged, "\"PR_MERGED\"")]
    #[case(ErrorCode::NotAssigned, "\"NOT_ASSIGNED\"")]
    #[case(ErrorCode::NoCandidate, "\"NO_CANDIDATE\"")]
    #[case(ErrorCode::NotFound, "\"NOT_FOUND\"")]
    #[case(ErrorCode::InvalidRequest, "\"INVALID_REQUEST\"")]
    fn codes_serialise_to_wire_vocabulary(#[case] code: ErrorCode, #[case] expected: &str) {
        let encoded = serde_json::to_string(&code).expect("serialise code");
        assert_eq!(encoded, expected);
    }

    #[rstest]
    fn try_new_rejects_blank_messages() {
        let result = Error::try_new(ErrorCode::NotFound, "   ");
        assert_eq!(result, Err(ErrorValidationError::EmptyMessage));
    }

    #[rstest]
    fn conflict_family_excludes_not_found() {
        assert!(ErrorCode::NoCandidate.is_conflict());
        assert!(ErrorCode::ConcurrentUpdate.is_conflict());
        assert!(!ErrorCode::NotFound.is_conflict());
        assert!(!ErrorCode::InternalError.is_conflict());
    }

    #[rstest]
    fn serialises_camel_case_and_skips_empty_fields() {
        let err = Error::not_assigned("reviewer u2 is not assigned");
        let value = serde_json::to_value(&err).expect("serialise error");
        assert_eq!(
            value,
            json!({ "code": "NOT_ASSIGNED", "message": "reviewer u2 is not assigned" })
        );
    }

    #[tokio::test]
    async fn captures_trace_id_in_scope() {
        let trace_id: TraceId = "00000000-0000-0000-0000-000000000001"
            .parse()
            .expect("valid UUID");
        let err = TraceId::scope(trace_id, async { Error::internal("boom") }).await;
        assert_eq!(err.trace_id(), Some("00000000-0000-0000-0000-000000000001"));
    }
}
