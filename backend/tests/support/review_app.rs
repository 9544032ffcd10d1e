//! Shared harness driving the full HTTP surface against the in-memory store.

use std::sync::Arc;

use actix_http::Request;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{App, test as actix_test, web};
use mockable::DefaultClock;
use serde_json::{Value, json};

use backend::Trace;
use backend::domain::{PullRequestService, RandomReviewerPicker, ReviewQueryService, TeamService};
use backend::inbound::http;
use backend::inbound::http::state::{HttpState, HttpStatePorts};
use backend::outbound::memory::InMemoryStore;

/// Build HTTP state over a fresh store with a seeded picker.
pub fn memory_state(seed: u64) -> HttpState {
    let store = Arc::new(InMemoryStore::new());
    let teams = Arc::new(TeamService::new(store.clone(), store.clone()));
    HttpState::new(HttpStatePorts {
        teams: teams.clone(),
        teams_query: teams.clone(),
        user_activity: teams,
        pull_requests: Arc::new(PullRequestService::new(
            store.clone(),
            store.clone(),
            store.clone(),
            Arc::new(RandomReviewerPicker::seeded(seed)),
            Arc::new(DefaultClock),
        )),
        reviews: Arc::new(ReviewQueryService::new(store)),
    })
}

/// Initialise the service under test.
pub async fn init(
    seed: u64,
) -> impl Service<Request, Response = ServiceResponse, Error = actix_web::Error> {
    actix_test::init_service(
        App::new()
            .app_data(web::Data::new(memory_state(seed)))
            .wrap(Trace)
            .configure(http::configure),
    )
    .await
}

pub async fn post<S>(app: &S, uri: &str, body: Value) -> (StatusCode, Value)
where
    S: Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let res = actix_test::call_service(
        app,
        actix_test::TestRequest::post()
            .uri(uri)
            .set_json(body)
            .to_request(),
    )
    .await;
    let status = res.status();
    (status, actix_test::read_body_json(res).await)
}

pub async fn get<S>(app: &S, uri: &str) -> (StatusCode, Value)
where
    S: Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let res = actix_test::call_service(app, actix_test::TestRequest::get().uri(uri).to_request())
        .await;
    let status = res.status();
    (status, actix_test::read_body_json(res).await)
}

/// Team payload; members are `(user_id, is_active)` pairs.
pub fn team_body(name: &str, members: &[(&str, bool)]) -> Value {
    json!({
        "team_name": name,
        "members": members
            .iter()
            .map(|(id, active)| json!({
                "user_id": id,
                "username": format!("{id} name"),
                "is_active": active,
            }))
            .collect::<Vec<_>>(),
    })
}

pub async fn add_team<S>(app: &S, name: &str, members: &[(&str, bool)])
where
    S: Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let (status, body) = post(app, "/team/add", team_body(name, members)).await;
    assert_eq!(status, StatusCode::CREATED, "team creation failed: {body}");
}

pub async fn create_pr<S>(app: &S, id: &str, author: &str) -> (StatusCode, Value)
where
    S: Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    post(
        app,
        "/pullRequest/create",
        json!({
            "pull_request_id": id,
            "pull_request_name": format!("{id} title"),
            "author_id": author,
        }),
    )
    .await
}

pub fn reviewers(pr: &Value) -> Vec<String> {
    pr["assigned_reviewers"]
        .as_array()
        .expect("assigned_reviewers array")
        .iter()
        .map(|v| v.as_str().expect("reviewer id string").to_owned())
        .collect()
}

pub fn error_code(body: &Value) -> &str {
    body["error"]["code"].as_str().expect("error code string")
}
