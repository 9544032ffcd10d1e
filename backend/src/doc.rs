//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every handler from the inbound layer plus the error
//! schema wrappers that keep domain types free of utoipa. The document backs
//! Swagger UI in debug builds and `cargo run --bin openapi-dump`.

use crate::inbound::http::pull_requests::{
    CreatePullRequestBody, MergePullRequestBody, PullRequestBody, PullRequestResponse,
    PullRequestShortBody, ReassignReviewerBody, ReassignReviewerResponseBody,
};
use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorEnvelopeSchema, ErrorSchema};
use crate::inbound::http::stats::{ReviewerStatsBody, UserStatsResponse};
use crate::inbound::http::teams::{TeamBody, TeamMemberBody, TeamResponse};
use crate::inbound::http::users::{SetIsActiveBody, UserBody, UserResponse, UserReviewsResponse};
use utoipa::OpenApi;

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Review assignment API",
        description = "Team registry and automatic pull request reviewer assignment."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::teams::add_team,
        crate::inbound::http::teams::get_team,
        crate::inbound::http::users::set_is_active,
        crate::inbound::http::users::get_review,
        crate::inbound::http::pull_requests::create_pull_request,
        crate::inbound::http::pull_requests::merge_pull_request,
        crate::inbound::http::pull_requests::reassign_reviewer,
        crate::inbound::http::stats::user_stats,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        ErrorEnvelopeSchema,
        TeamBody,
        TeamMemberBody,
        TeamResponse,
        SetIsActiveBody,
        UserBody,
        UserResponse,
        UserReviewsResponse,
        CreatePullRequestBody,
        MergePullRequestBody,
        ReassignReviewerBody,
        PullRequestBody,
        PullRequestShortBody,
        PullRequestResponse,
        ReassignReviewerResponseBody,
        ReviewerStatsBody,
        UserStatsResponse,
    )),
    tags(
        (name = "teams", description = "Team registry"),
        (name = "users", description = "User activity and review listings"),
        (name = "pullRequests", description = "Pull request lifecycle"),
        (name = "stats", description = "Reviewer load statistics"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    // utoipa replaces :: with . in schema names
    const ERROR_SCHEMA_NAME: &str = "crate.domain.Error";

    fn assert_object_schema_has_field(schema: &RefOr<Schema>, field: &str) {
        match schema {
            RefOr::T(Schema::Object(obj)) => {
                assert!(
                    obj.properties.contains_key(field),
                    "schema should have field '{field}'"
                );
            }
            _ => panic!("expected Object schema"),
        }
    }

    #[test]
    fn error_schema_uses_wire_field_names() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let error_schema = schemas.get(ERROR_SCHEMA_NAME).expect("Error schema");

        assert_object_schema_has_field(error_schema, "code");
        assert_object_schema_has_field(error_schema, "message");
        assert_object_schema_has_field(error_schema, "traceId");
    }

    #[test]
    fn pull_request_schema_keeps_camel_case_timestamps() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let pr_schema = schemas.get("PullRequestBody").expect("PullRequestBody schema");

        assert_object_schema_has_field(pr_schema, "assigned_reviewers");
        assert_object_schema_has_field(pr_schema, "createdAt");
        assert_object_schema_has_field(pr_schema, "mergedAt");
    }

    #[test]
    fn every_endpoint_is_documented() {
        let doc = ApiDoc::openapi();
        for path in [
            "/team/add",
            "/team/get",
            "/users/setIsActive",
            "/users/getReview",
            "/pullRequest/create",
            "/pullRequest/merge",
            "/pullRequest/reassign",
            "/stats/users",
            "/health/ready",
            "/health/live",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing path {path}");
        }
    }
}
