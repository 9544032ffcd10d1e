//! Reviewer statistics handler.
//!
//! ```text
//! GET /stats/users
//! ```

use actix_web::{get, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ReviewerStats;
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorEnvelopeSchema;
use crate::inbound::http::state::HttpState;

/// Review load of a single user.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
pub struct ReviewerStatsBody {
    pub user_id: String,
    pub assigned_reviews: u64,
    pub open_reviews: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct UserStatsResponse {
    pub users: Vec<ReviewerStatsBody>,
}

impl From<ReviewerStats> for ReviewerStatsBody {
    fn from(value: ReviewerStats) -> Self {
        Self {
            user_id: value.user_id.into(),
            assigned_reviews: value.assigned_reviews,
            open_reviews: value.open_reviews,
        }
    }
}

/// Assigned and open review counts per reviewer, sorted by user id.
#[utoipa::path(
    get,
    path = "/stats/users",
    responses(
        (status = 200, description = "Reviewer statistics", body = UserStatsResponse),
        (status = 503, description = "Store unavailable", body = ErrorEnvelopeSchema)
    ),
    tags = ["stats"],
    operation_id = "getUserStats"
)]
#[get("/stats/users")]
pub async fn user_stats(state: web::Data<HttpState>) -> ApiResult<web::Json<UserStatsResponse>> {
    let stats = state.reviews.reviewer_stats().await?;
    Ok(web::Json(UserStatsResponse {
        users: stats.into_iter().map(ReviewerStatsBody::from).collect(),
    }))
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use rstest::rstest;
    use serde_json::{Value, json};

    use crate::domain::{Error, UserId};
    use crate::inbound::http::test_utils::{MockPorts, test_app};

    #[rstest]
    #[actix_web::test]
    async fn returns_counts_per_reviewer() {
        let mut ports = MockPorts::default();
        ports.reviews.expect_reviewer_stats().times(1).returning(|| {
            Ok(vec![crate::domain::ReviewerStats {
                user_id: UserId::new("u2").expect("valid id"),
                assigned_reviews: 3,
                open_reviews: 1,
            }])
        });
        let app = actix_test::init_service(test_app(ports.into_state())).await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::get().uri("/stats/users").to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = actix_test::read_body_json(res).await;
        assert_eq!(
            body,
            json!({"users": [{"user_id": "u2", "assigned_reviews": 3, "open_reviews": 1}]})
        );
    }

    #[rstest]
    #[actix_web::test]
    async fn store_outage_is_service_unavailable() {
        let mut ports = MockPorts::default();
        ports
            .reviews
            .expect_reviewer_stats()
            .returning(|| Err(Error::service_unavailable("database unavailable")));
        let app = actix_test::init_service(test_app(ports.into_state())).await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::get().uri("/stats/users").to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
        let body: Value = actix_test::read_body_json(res).await;
        assert_eq!(body["error"]["code"], "SERVICE_UNAVAILABLE");
    }
}
