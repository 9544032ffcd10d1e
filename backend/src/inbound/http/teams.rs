//! Team registry HTTP handlers.
//!
//! ```text
//! POST /team/add
//! GET  /team/get?team_name=core
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{Error, Team, TeamMember, TeamName, UserId, Username};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorEnvelopeSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, parse_identifier, parse_indexed_identifier, team_validation_error,
};

/// Team member as sent and returned on the wire.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct TeamMemberBody {
    pub user_id: String,
    pub username: String,
    pub is_active: bool,
}

/// Team payload with its members.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct TeamBody {
    pub team_name: String,
    pub members: Vec<TeamMemberBody>,
}

/// Response wrapper for team endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TeamResponse {
    pub team: TeamBody,
}

/// Query string for `GET /team/get`.
#[derive(Debug, Deserialize, IntoParams)]
pub struct GetTeamQuery {
    pub team_name: String,
}

impl From<&Team> for TeamBody {
    fn from(team: &Team) -> Self {
        Self {
            team_name: team.name().to_string(),
            members: team
                .members()
                .iter()
                .map(|member| TeamMemberBody {
                    user_id: member.user_id.to_string(),
                    username: member.username.to_string(),
                    is_active: member.is_active,
                })
                .collect(),
        }
    }
}

fn parse_team(payload: TeamBody) -> Result<Team, Error> {
    let name = parse_identifier(payload.team_name, FieldName::new("team_name"), TeamName::new)?;
    let members = payload
        .members
        .into_iter()
        .enumerate()
        .map(|(index, member)| {
            Ok(TeamMember {
                user_id: parse_indexed_identifier(
                    member.user_id,
                    FieldName::new("members.user_id"),
                    index,
                    UserId::new,
                )?,
                username: parse_indexed_identifier(
                    member.username,
                    FieldName::new("members.username"),
                    index,
                    Username::new,
                )?,
                is_active: member.is_active,
            })
        })
        .collect::<Result<Vec<_>, Error>>()?;
    Team::new(name, members).map_err(team_validation_error)
}

/// Create a team and upsert its members.
#[utoipa::path(
    post,
    path = "/team/add",
    request_body = TeamBody,
    responses(
        (status = 201, description = "Team created", body = TeamResponse),
        (status = 400, description = "Invalid request", body = ErrorEnvelopeSchema),
        (status = 409, description = "Team already exists", body = ErrorEnvelopeSchema),
        (status = 500, description = "Internal server error", body = ErrorEnvelopeSchema)
    ),
    tags = ["teams"],
    operation_id = "addTeam"
)]
#[post("/team/add")]
pub async fn add_team(
    state: web::Data<HttpState>,
    payload: web::Json<TeamBody>,
) -> ApiResult<HttpResponse> {
    let team = parse_team(payload.into_inner())?;
    let created = state.teams.add_team(team).await?;
    Ok(HttpResponse::Created().json(TeamResponse {
        team: TeamBody::from(&created),
    }))
}

/// Fetch a team with its current members.
#[utoipa::path(
    get,
    path = "/team/get",
    params(GetTeamQuery),
    responses(
        (status = 200, description = "Team found", body = TeamResponse),
        (status = 400, description = "Invalid request", body = ErrorEnvelopeSchema),
        (status = 404, description = "Team not found", body = ErrorEnvelopeSchema)
    ),
    tags = ["teams"],
    operation_id = "getTeam"
)]
#[get("/team/get")]
pub async fn get_team(
    state: web::Data<HttpState>,
    query: web::Query<GetTeamQuery>,
) -> ApiResult<web::Json<TeamResponse>> {
    let name = parse_identifier(
        query.into_inner().team_name,
        FieldName::new("team_name"),
        TeamName::new,
    )?;
    let team = state.teams_query.get_team(&name).await?;
    Ok(web::Json(TeamResponse {
        team: TeamBody::from(&team),
    }))
}

#[cfg(test)]
#[path = "teams_tests.rs"]
mod tests;
