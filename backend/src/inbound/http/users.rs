//! User HTTP handlers.
//!
//! ```text
//! POST /users/setIsActive
//! GET  /users/getReview?user_id=u1
//! ```

use actix_web::{get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::User;
use crate::domain::UserId;
use crate::domain::ports::SetUserActiveRequest;
use crate::inbound::http::ApiResult;
use crate::inbound::http::pull_requests::PullRequestShortBody;
use crate::inbound::http::schemas::ErrorEnvelopeSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_identifier};

/// Request payload for toggling a user's activity flag.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct SetIsActiveBody {
    pub user_id: String,
    pub is_active: bool,
}

/// User representation including team membership.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, ToSchema)]
pub struct UserBody {
    pub user_id: String,
    pub username: String,
    pub team_name: String,
    pub is_active: bool,
}

/// Response wrapper for `POST /users/setIsActive`.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct UserResponse {
    pub user: UserBody,
}

/// Query string for `GET /users/getReview`.
#[derive(Debug, Deserialize, IntoParams)]
pub struct GetReviewQuery {
    pub user_id: String,
}

/// Pull requests a user is assigned to review.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct UserReviewsResponse {
    pub user_id: String,
    pub pull_requests: Vec<PullRequestShortBody>,
}

impl From<&User> for UserBody {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.id().to_string(),
            username: user.username().to_string(),
            team_name: user.team_name().to_string(),
            is_active: user.is_active(),
        }
    }
}

/// Set whether a user can be picked as a reviewer.
#[utoipa::path(
    post,
    path = "/users/setIsActive",
    request_body = SetIsActiveBody,
    responses(
        (status = 200, description = "User updated", body = UserResponse),
        (status = 400, description = "Invalid request", body = ErrorEnvelopeSchema),
        (status = 404, description = "User not found", body = ErrorEnvelopeSchema)
    ),
    tags = ["users"],
    operation_id = "setUserIsActive"
)]
#[post("/users/setIsActive")]
pub async fn set_is_active(
    state: web::Data<HttpState>,
    payload: web::Json<SetIsActiveBody>,
) -> ApiResult<web::Json<UserResponse>> {
    let SetIsActiveBody { user_id, is_active } = payload.into_inner();
    let request = SetUserActiveRequest {
        user_id: parse_identifier(user_id, FieldName::new("user_id"), UserId::new)?,
        is_active,
    };
    let user = state.user_activity.set_is_active(request).await?;
    Ok(web::Json(UserResponse {
        user: UserBody::from(&user),
    }))
}

/// List pull requests assigned to a reviewer. Unknown users get an empty list.
#[utoipa::path(
    get,
    path = "/users/getReview",
    params(GetReviewQuery),
    responses(
        (status = 200, description = "Assigned pull requests", body = UserReviewsResponse),
        (status = 400, description = "Invalid request", body = ErrorEnvelopeSchema)
    ),
    tags = ["users"],
    operation_id = "getUserReviews"
)]
#[get("/users/getReview")]
pub async fn get_review(
    state: web::Data<HttpState>,
    query: web::Query<GetReviewQuery>,
) -> ApiResult<web::Json<UserReviewsResponse>> {
    let user_id = parse_identifier(
        query.into_inner().user_id,
        FieldName::new("user_id"),
        UserId::new,
    )?;
    let reviews = state.reviews.reviews_for_user(&user_id).await?;
    Ok(web::Json(UserReviewsResponse {
        user_id: user_id.into(),
        pull_requests: reviews.into_iter().map(PullRequestShortBody::from).collect(),
    }))
}

#[cfg(test)]
#[path = "users_tests.rs"]
mod tests;
