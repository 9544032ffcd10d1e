//! Pull request lifecycle HTTP handlers.
//!
//! ```text
//! POST /pullRequest/create
//! POST /pullRequest/merge
//! POST /pullRequest/reassign
//! ```

use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::{CreatePullRequestRequest, ReassignReviewerRequest};
use crate::domain::{PullRequest, PullRequestId, PullRequestName, PullRequestShort, UserId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorEnvelopeSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_identifier};

/// Request payload for opening a pull request.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct CreatePullRequestBody {
    pub pull_request_id: String,
    pub pull_request_name: String,
    pub author_id: String,
}

/// Request payload for merging a pull request.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct MergePullRequestBody {
    pub pull_request_id: String,
}

/// Request payload for swapping one reviewer.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct ReassignReviewerBody {
    pub pull_request_id: String,
    pub old_user_id: String,
}

/// Full pull request representation.
///
/// Timestamps keep the camelCase names existing clients expect.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, ToSchema)]
pub struct PullRequestBody {
    pub pull_request_id: String,
    pub pull_request_name: String,
    pub author_id: String,
    #[schema(example = "OPEN")]
    pub status: String,
    pub assigned_reviewers: Vec<String>,
    #[serde(rename = "createdAt")]
    #[schema(format = "date-time")]
    pub created_at: String,
    #[serde(rename = "mergedAt", default, skip_serializing_if = "Option::is_none")]
    #[schema(format = "date-time")]
    pub merged_at: Option<String>,
}

/// Pull request summary used in reviewer listings.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, ToSchema)]
pub struct PullRequestShortBody {
    pub pull_request_id: String,
    pub pull_request_name: String,
    pub author_id: String,
    #[schema(example = "OPEN")]
    pub status: String,
}

/// Response wrapper for create and merge.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct PullRequestResponse {
    pub pr: PullRequestBody,
}

/// Response payload for a reassignment.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct ReassignReviewerResponseBody {
    pub pr: PullRequestBody,
    pub replaced_by: String,
}

impl From<&PullRequest> for PullRequestBody {
    fn from(pr: &PullRequest) -> Self {
        Self {
            pull_request_id: pr.id().to_string(),
            pull_request_name: pr.name().to_string(),
            author_id: pr.author_id().to_string(),
            status: pr.status().to_string(),
            assigned_reviewers: pr
                .reviewers()
                .as_slice()
                .iter()
                .map(ToString::to_string)
                .collect(),
            created_at: pr.created_at().to_rfc3339(),
            merged_at: pr.merged_at().map(|at| at.to_rfc3339()),
        }
    }
}

impl From<PullRequestShort> for PullRequestShortBody {
    fn from(value: PullRequestShort) -> Self {
        Self {
            pull_request_id: value.id.into(),
            pull_request_name: value.name.into(),
            author_id: value.author_id.into(),
            status: value.status.to_string(),
        }
    }
}

fn pull_request_id(raw: String) -> ApiResult<PullRequestId> {
    parse_identifier(raw, FieldName::new("pull_request_id"), PullRequestId::new)
}

/// Open a pull request and assign up to two reviewers from the author's team.
#[utoipa::path(
    post,
    path = "/pullRequest/create",
    request_body = CreatePullRequestBody,
    responses(
        (status = 201, description = "Pull request created", body = PullRequestResponse),
        (status = 400, description = "Invalid request", body = ErrorEnvelopeSchema),
        (status = 404, description = "Author or team not found", body = ErrorEnvelopeSchema),
        (status = 409, description = "Pull request already exists", body = ErrorEnvelopeSchema)
    ),
    tags = ["pullRequests"],
    operation_id = "createPullRequest"
)]
#[post("/pullRequest/create")]
pub async fn create_pull_request(
    state: web::Data<HttpState>,
    payload: web::Json<CreatePullRequestBody>,
) -> ApiResult<HttpResponse> {
    let payload = payload.into_inner();
    let request = CreatePullRequestRequest {
        pull_request_id: pull_request_id(payload.pull_request_id)?,
        pull_request_name: parse_identifier(
            payload.pull_request_name,
            FieldName::new("pull_request_name"),
            PullRequestName::new,
        )?,
        author_id: parse_identifier(payload.author_id, FieldName::new("author_id"), UserId::new)?,
    };
    let created = state.pull_requests.create(request).await?;
    Ok(HttpResponse::Created().json(PullRequestResponse {
        pr: PullRequestBody::from(&created),
    }))
}

/// Merge a pull request. Repeating the call returns the stored merge.
#[utoipa::path(
    post,
    path = "/pullRequest/merge",
    request_body = MergePullRequestBody,
    responses(
        (status = 200, description = "Pull request merged", body = PullRequestResponse),
        (status = 400, description = "Invalid request", body = ErrorEnvelopeSchema),
        (status = 404, description = "Pull request not found", body = ErrorEnvelopeSchema),
        (status = 409, description = "Concurrent update", body = ErrorEnvelopeSchema)
    ),
    tags = ["pullRequests"],
    operation_id = "mergePullRequest"
)]
#[post("/pullRequest/merge")]
pub async fn merge_pull_request(
    state: web::Data<HttpState>,
    payload: web::Json<MergePullRequestBody>,
) -> ApiResult<web::Json<PullRequestResponse>> {
    let id = pull_request_id(payload.into_inner().pull_request_id)?;
    let merged = state.pull_requests.merge(&id).await?;
    Ok(web::Json(PullRequestResponse {
        pr: PullRequestBody::from(&merged),
    }))
}

/// Replace one reviewer with a random active teammate of the old reviewer.
#[utoipa::path(
    post,
    path = "/pullRequest/reassign",
    request_body = ReassignReviewerBody,
    responses(
        (status = 200, description = "Reviewer replaced", body = ReassignReviewerResponseBody),
        (status = 400, description = "Invalid request", body = ErrorEnvelopeSchema),
        (status = 404, description = "Pull request or user not found", body = ErrorEnvelopeSchema),
        (status = 409, description = "Merged, not assigned, or no candidate", body = ErrorEnvelopeSchema)
    ),
    tags = ["pullRequests"],
    operation_id = "reassignReviewer"
)]
#[post("/pullRequest/reassign")]
pub async fn reassign_reviewer(
    state: web::Data<HttpState>,
    payload: web::Json<ReassignReviewerBody>,
) -> ApiResult<web::Json<ReassignReviewerResponseBody>> {
    let payload = payload.into_inner();
    let request = ReassignReviewerRequest {
        pull_request_id: pull_request_id(payload.pull_request_id)?,
        old_reviewer_id: parse_identifier(
            payload.old_user_id,
            FieldName::new("old_user_id"),
            UserId::new,
        )?,
    };
    let outcome = state.pull_requests.reassign(request).await?;
    Ok(web::Json(ReassignReviewerResponseBody {
        pr: PullRequestBody::from(&outcome.pull_request),
        replaced_by: outcome.replaced_by.into(),
    }))
}

#[cfg(test)]
#[path = "pull_requests_tests.rs"]
mod tests;
