//! Tests for the team registry service.

use std::sync::Arc;

use rstest::{fixture, rstest};

use super::*;
use crate::domain::ports::{MockTeamRepository, MockUserRepository};
use crate::domain::{ErrorCode, TeamMember, UserId, Username};

fn member(id: &str, active: bool) -> TeamMember {
    TeamMember {
        user_id: UserId::new(id).expect("valid id"),
        username: Username::new(format!("user {id}")).expect("valid username"),
        is_active: active,
    }
}

#[fixture]
fn core_team() -> Team {
    Team::new(
        TeamName::new("core").expect("valid team"),
        vec![member("u1", true), member("u2", false)],
    )
    .expect("valid team")
}

fn stored_user(active: bool) -> User {
    User::new(
        UserId::new("u1").expect("valid id"),
        Username::new("Alice").expect("valid username"),
        TeamName::new("core").expect("valid team"),
        active,
    )
}

fn service(
    team_repo: MockTeamRepository,
    user_repo: MockUserRepository,
) -> TeamService<MockTeamRepository, MockUserRepository> {
    TeamService::new(Arc::new(team_repo), Arc::new(user_repo))
}

#[rstest]
#[tokio::test]
async fn add_team_returns_submitted_team(core_team: Team) {
    let mut team_repo = MockTeamRepository::new();
    team_repo
        .expect_create_with_members()
        .times(1)
        .returning(|_| Ok(TeamCreation::Created));

    let created = service(team_repo, MockUserRepository::new())
        .add_team(core_team.clone())
        .await
        .expect("team created");

    assert_eq!(created, core_team);
}

#[rstest]
#[tokio::test]
async fn add_team_reports_existing_name(core_team: Team) {
    let mut team_repo = MockTeamRepository::new();
    team_repo
        .expect_create_with_members()
        .returning(|_| Ok(TeamCreation::AlreadyExists));

    let err = service(team_repo, MockUserRepository::new())
        .add_team(core_team)
        .await
        .expect_err("duplicate team");

    assert_eq!(err.code(), ErrorCode::TeamExists);
}

#[rstest]
#[case(TeamRepositoryError::connection("refused"), ErrorCode::ServiceUnavailable)]
#[case(TeamRepositoryError::query("syntax"), ErrorCode::InternalError)]
#[tokio::test]
async fn add_team_maps_repository_failures(
    core_team: Team,
    #[case] failure: TeamRepositoryError,
    #[case] expected: ErrorCode,
) {
    let mut team_repo = MockTeamRepository::new();
    team_repo
        .expect_create_with_members()
        .return_once(move |_| Err(failure));

    let err = service(team_repo, MockUserRepository::new())
        .add_team(core_team)
        .await
        .expect_err("repository failure");

    assert_eq!(err.code(), expected);
}

#[rstest]
#[tokio::test]
async fn get_team_reports_missing_team() {
    let mut team_repo = MockTeamRepository::new();
    team_repo.expect_find_by_name().returning(|_| Ok(None));

    let err = service(team_repo, MockUserRepository::new())
        .get_team(&TeamName::new("ghost").expect("valid team"))
        .await
        .expect_err("missing team");

    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn get_team_returns_live_roster(core_team: Team) {
    let stored = core_team.clone();
    let mut team_repo = MockTeamRepository::new();
    team_repo
        .expect_find_by_name()
        .withf(|name| name.as_str() == "core")
        .return_once(move |_| Ok(Some(stored)));

    let team = service(team_repo, MockUserRepository::new())
        .get_team(core_team.name())
        .await
        .expect("team found");

    assert_eq!(team, core_team);
}

#[rstest]
#[tokio::test]
async fn set_is_active_updates_only_the_flag() {
    let mut user_repo = MockUserRepository::new();
    user_repo
        .expect_find_by_id()
        .return_once(|_| Ok(Some(stored_user(true))));
    user_repo
        .expect_update()
        .withf(|user| !user.is_active() && user.username().as_str() == "Alice")
        .times(1)
        .returning(|_| Ok(()));

    let user = service(MockTeamRepository::new(), user_repo)
        .set_is_active(SetUserActiveRequest {
            user_id: UserId::new("u1").expect("valid id"),
            is_active: false,
        })
        .await
        .expect("user updated");

    assert!(!user.is_active());
    assert_eq!(user.team_name().as_str(), "core");
}

#[rstest]
#[tokio::test]
async fn set_is_active_reports_unknown_user() {
    let mut user_repo = MockUserRepository::new();
    user_repo.expect_find_by_id().returning(|_| Ok(None));
    user_repo.expect_update().never();

    let err = service(MockTeamRepository::new(), user_repo)
        .set_is_active(SetUserActiveRequest {
            user_id: UserId::new("ghost").expect("valid id"),
            is_active: true,
        })
        .await
        .expect_err("unknown user");

    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn set_is_active_maps_vanished_user_to_not_found() {
    let mut user_repo = MockUserRepository::new();
    user_repo
        .expect_find_by_id()
        .return_once(|_| Ok(Some(stored_user(false))));
    user_repo
        .expect_update()
        .return_once(|_| Err(UserRepositoryError::not_found("u1")));

    let err = service(MockTeamRepository::new(), user_repo)
        .set_is_active(SetUserActiveRequest {
            user_id: UserId::new("u1").expect("valid id"),
            is_active: true,
        })
        .await
        .expect_err("user vanished");

    assert_eq!(err.code(), ErrorCode::NotFound);
}
