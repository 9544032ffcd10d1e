//! OpenAPI schema definitions for domain types.
//!
//! Domain types remain framework-agnostic by not deriving `ToSchema`. The
//! wrappers here mirror their serialised shape and register under the domain
//! type's path via `#[schema(as = ...)]`.

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    /// The request is malformed or fails validation.
    #[schema(rename = "INVALID_REQUEST")]
    InvalidRequest,
    #[schema(rename = "TEAM_EXISTS")]
    TeamExists,
    #[schema(rename = "PR_EXISTS")]
    PrExists,
    /// The pull request is merged; reviewers are frozen.
    #[schema(rename = "PR_MERGED")]
    PrMerged,
    #[schema(rename = "NOT_ASSIGNED")]
    NotAssigned,
    /// No eligible replacement reviewer exists.
    #[schema(rename = "NO_CANDIDATE")]
    NoCandidate,
    #[schema(rename = "NOT_FOUND")]
    NotFound,
    /// Concurrent writers exhausted the retry budget.
    #[schema(rename = "CONCURRENT_UPDATE")]
    ConcurrentUpdate,
    #[schema(rename = "SERVICE_UNAVAILABLE")]
    ServiceUnavailable,
    #[schema(rename = "INTERNAL_ERROR")]
    InternalError,
}

/// OpenAPI schema for [`crate::domain::Error`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Error, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ErrorSchema {
    /// Stable machine-readable error code.
    #[schema(example = "NOT_FOUND")]
    code: ErrorCodeSchema,
    /// Human-readable message returned to clients.
    #[schema(example = "pull request pr-1 not found")]
    message: String,
    /// Correlation identifier matching the `trace-id` response header.
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    trace_id: Option<String>,
    /// Supplementary error details such as the offending field.
    details: Option<serde_json::Value>,
}

/// Error envelope returned for every non-2xx response.
#[derive(ToSchema)]
#[schema(as = crate::inbound::http::error::ErrorEnvelope)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ErrorEnvelopeSchema {
    error: ErrorSchema,
}
