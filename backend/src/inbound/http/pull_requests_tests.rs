//! Tests for pull request HTTP handlers.

use actix_web::http::StatusCode;
use actix_web::test as actix_test;
use chrono::{DateTime, TimeZone, Utc};
use mockall::predicate::eq;
use rstest::{fixture, rstest};
use serde_json::{Value, json};

use super::*;
use crate::domain::Error;
use crate::domain::ports::ReassignReviewerResponse;
use crate::inbound::http::test_utils::{MockPorts, test_app};

fn uid(raw: &str) -> UserId {
    UserId::new(raw).expect("valid user id")
}

fn at(hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 4, 1, hour, 0, 0)
        .single()
        .expect("valid timestamp")
}

#[fixture]
fn open_pr() -> PullRequest {
    PullRequest::open(
        PullRequestId::new("pr-1").expect("valid id"),
        PullRequestName::new("fix").expect("valid name"),
        uid("u1"),
        vec![uid("u2"), uid("u3")],
        at(9),
    )
    .expect("valid pull request")
}

async fn post(ports: MockPorts, uri: &str, payload: Value) -> (StatusCode, Value) {
    let app = actix_test::init_service(test_app(ports.into_state())).await;
    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri(uri)
            .set_json(payload)
            .to_request(),
    )
    .await;
    let status = res.status();
    (status, actix_test::read_body_json(res).await)
}

#[rstest]
#[actix_web::test]
async fn create_returns_created_pull_request(open_pr: PullRequest) {
    let mut ports = MockPorts::default();
    ports
        .pull_requests
        .expect_create()
        .with(eq(CreatePullRequestRequest {
            pull_request_id: PullRequestId::new("pr-1").expect("valid id"),
            pull_request_name: PullRequestName::new("fix").expect("valid name"),
            author_id: uid("u1"),
        }))
        .times(1)
        .return_once(move |_| Ok(open_pr));

    let (status, body) = post(
        ports,
        "/pullRequest/create",
        json!({"pull_request_id": "pr-1", "pull_request_name": "fix", "author_id": "u1"}),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(
        body,
        json!({"pr": {
            "pull_request_id": "pr-1",
            "pull_request_name": "fix",
            "author_id": "u1",
            "status": "OPEN",
            "assigned_reviewers": ["u2", "u3"],
            "createdAt": "2025-04-01T09:00:00+00:00"
        }})
    );
}

#[rstest]
#[case(Error::pr_exists("pull request pr-1 already exists"), StatusCode::CONFLICT, "PR_EXISTS")]
#[case(Error::not_found("user u1 not found"), StatusCode::NOT_FOUND, "NOT_FOUND")]
#[actix_web::test]
async fn create_maps_domain_failures(
    #[case] error: Error,
    #[case] status: StatusCode,
    #[case] code: &str,
) {
    let mut ports = MockPorts::default();
    ports
        .pull_requests
        .expect_create()
        .return_once(move |_| Err(error));

    let (actual, body) = post(
        ports,
        "/pullRequest/create",
        json!({"pull_request_id": "pr-1", "pull_request_name": "fix", "author_id": "u1"}),
    )
    .await;

    assert_eq!(actual, status);
    assert_eq!(body["error"]["code"], code);
}

#[rstest]
#[actix_web::test]
async fn create_rejects_blank_name() {
    let (status, body) = post(
        MockPorts::default(),
        "/pullRequest/create",
        json!({"pull_request_id": "pr-1", "pull_request_name": "  ", "author_id": "u1"}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["error"]["details"],
        json!({"field": "pull_request_name", "code": "empty"})
    );
}

#[rstest]
#[actix_web::test]
async fn merge_includes_merged_at(mut open_pr: PullRequest) {
    open_pr.merge(at(11));
    let mut ports = MockPorts::default();
    ports
        .pull_requests
        .expect_merge()
        .with(eq(PullRequestId::new("pr-1").expect("valid id")))
        .times(1)
        .return_once(move |_| Ok(open_pr));

    let (status, body) = post(ports, "/pullRequest/merge", json!({"pull_request_id": "pr-1"})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["pr"]["status"], "MERGED");
    assert_eq!(body["pr"]["mergedAt"], "2025-04-01T11:00:00+00:00");
}

#[rstest]
#[actix_web::test]
async fn reassign_returns_replacement(mut open_pr: PullRequest) {
    open_pr
        .replace_reviewer(&uid("u2"), uid("u4"))
        .expect("reviewer replaced");
    let mut ports = MockPorts::default();
    ports
        .pull_requests
        .expect_reassign()
        .with(eq(ReassignReviewerRequest {
            pull_request_id: PullRequestId::new("pr-1").expect("valid id"),
            old_reviewer_id: uid("u2"),
        }))
        .times(1)
        .return_once(move |_| {
            Ok(ReassignReviewerResponse {
                pull_request: open_pr,
                replaced_by: uid("u4"),
            })
        });

    let (status, body) = post(
        ports,
        "/pullRequest/reassign",
        json!({"pull_request_id": "pr-1", "old_user_id": "u2"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["replaced_by"], "u4");
    assert_eq!(body["pr"]["assigned_reviewers"], json!(["u4", "u3"]));
}

#[rstest]
#[case(Error::pr_merged("pull request pr-1 is merged"), "PR_MERGED")]
#[case(Error::not_assigned("u9 is not assigned"), "NOT_ASSIGNED")]
#[case(Error::no_candidate("no active replacement"), "NO_CANDIDATE")]
#[case(Error::concurrent_update("pull request pr-1 kept changing"), "CONCURRENT_UPDATE")]
#[actix_web::test]
async fn reassign_conflicts_share_status(#[case] error: Error, #[case] code: &str) {
    let mut ports = MockPorts::default();
    ports
        .pull_requests
        .expect_reassign()
        .return_once(move |_| Err(error));

    let (status, body) = post(
        ports,
        "/pullRequest/reassign",
        json!({"pull_request_id": "pr-1", "old_user_id": "u9"}),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], code);
}

#[rstest]
#[actix_web::test]
async fn reassign_requires_old_user_id() {
    let (status, body) = post(
        MockPorts::default(),
        "/pullRequest/reassign",
        json!({"pull_request_id": "pr-1", "old_reviewer_id": "u2"}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "INVALID_REQUEST");
}
