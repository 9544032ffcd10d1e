//! HTTP inbound adapter exposing REST endpoints.

use actix_web::web;

pub mod error;
pub mod health;
pub mod pull_requests;
pub mod schemas;
pub mod state;
pub mod stats;
pub mod teams;
#[cfg(test)]
pub mod test_utils;
pub mod users;
pub mod validation;

pub use error::ApiResult;

/// Register every API handler and the extractor error policies.
///
/// Shared by the server and the integration tests so both serve the same
/// surface. Health probes are registered separately because they carry their
/// own state.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(validation::json_config())
        .app_data(validation::query_config())
        .service(teams::add_team)
        .service(teams::get_team)
        .service(users::set_is_active)
        .service(users::get_review)
        .service(pull_requests::create_pull_request)
        .service(pull_requests::merge_pull_request)
        .service(pull_requests::reassign_reviewer)
        .service(stats::user_stats);
}
