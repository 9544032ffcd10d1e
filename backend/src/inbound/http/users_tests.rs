//! Tests for user HTTP handlers.

use actix_web::http::StatusCode;
use actix_web::test as actix_test;
use mockall::predicate::eq;
use rstest::rstest;
use serde_json::{Value, json};

use super::*;
use crate::domain::{
    Error, PullRequestId, PullRequestName, PullRequestShort, PullRequestStatus, TeamName,
    Username,
};
use crate::inbound::http::test_utils::{MockPorts, test_app};

fn uid(raw: &str) -> UserId {
    UserId::new(raw).expect("valid user id")
}

#[rstest]
#[actix_web::test]
async fn set_is_active_returns_updated_user() {
    let mut ports = MockPorts::default();
    ports
        .user_activity
        .expect_set_is_active()
        .with(eq(SetUserActiveRequest {
            user_id: uid("u2"),
            is_active: false,
        }))
        .times(1)
        .returning(|request| {
            Ok(User::new(
                request.user_id,
                Username::new("Bob").expect("valid username"),
                TeamName::new("core").expect("valid team"),
                request.is_active,
            ))
        });
    let app = actix_test::init_service(test_app(ports.into_state())).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/users/setIsActive")
            .set_json(json!({"user_id": "u2", "is_active": false}))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(
        body,
        json!({"user": {"user_id": "u2", "username": "Bob", "team_name": "core", "is_active": false}})
    );
}

#[rstest]
#[actix_web::test]
async fn set_is_active_for_unknown_user_is_not_found() {
    let mut ports = MockPorts::default();
    ports
        .user_activity
        .expect_set_is_active()
        .returning(|_| Err(Error::not_found("user ghost not found")));
    let app = actix_test::init_service(test_app(ports.into_state())).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/users/setIsActive")
            .set_json(json!({"user_id": "ghost", "is_active": true}))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[rstest]
#[actix_web::test]
async fn set_is_active_rejects_non_boolean_flag() {
    let app = actix_test::init_service(test_app(MockPorts::default().into_state())).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/users/setIsActive")
            .set_json(json!({"user_id": "u1", "is_active": "yes"}))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[rstest]
#[actix_web::test]
async fn get_review_lists_short_pull_requests() {
    let mut ports = MockPorts::default();
    ports
        .reviews
        .expect_reviews_for_user()
        .with(eq(uid("u2")))
        .times(1)
        .returning(|_| {
            Ok(vec![PullRequestShort {
                id: PullRequestId::new("pr-1").expect("valid id"),
                name: PullRequestName::new("fix").expect("valid name"),
                author_id: uid("u1"),
                status: PullRequestStatus::Merged,
            }])
        });
    let app = actix_test::init_service(test_app(ports.into_state())).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/users/getReview?user_id=u2")
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(
        body,
        json!({
            "user_id": "u2",
            "pull_requests": [{
                "pull_request_id": "pr-1",
                "pull_request_name": "fix",
                "author_id": "u1",
                "status": "MERGED"
            }]
        })
    );
}

#[rstest]
#[actix_web::test]
async fn get_review_rejects_blank_user_id() {
    let app = actix_test::init_service(test_app(MockPorts::default().into_state())).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/users/getReview?user_id=")
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["error"]["details"]["field"], "user_id");
}
