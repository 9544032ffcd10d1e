//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, web};

use crate::domain::ports::{
    MockPullRequestCommand, MockReviewQuery, MockTeamCommand, MockTeamQuery,
    MockUserActivityCommand,
};
use crate::inbound::http::state::{HttpState, HttpStatePorts};
use crate::middleware::Trace;

/// Driving-port mocks with no expectations set.
///
/// Tests configure the mock they exercise; any unexpected call on another
/// port panics.
#[derive(Default)]
pub struct MockPorts {
    pub teams: MockTeamCommand,
    pub teams_query: MockTeamQuery,
    pub user_activity: MockUserActivityCommand,
    pub pull_requests: MockPullRequestCommand,
    pub reviews: MockReviewQuery,
}

impl MockPorts {
    pub fn into_state(self) -> HttpState {
        HttpState::new(HttpStatePorts {
            teams: Arc::new(self.teams),
            teams_query: Arc::new(self.teams_query),
            user_activity: Arc::new(self.user_activity),
            pull_requests: Arc::new(self.pull_requests),
            reviews: Arc::new(self.reviews),
        })
    }
}

/// Build an app serving every API route against `state`.
pub fn test_app(
    state: HttpState,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(state))
        .wrap(Trace)
        .configure(crate::inbound::http::configure)
}
