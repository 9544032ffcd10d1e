//! Builders wiring repositories, services, and HTTP state.

use std::sync::Arc;

use mockable::{Clock, DefaultClock};
use tracing::{debug, info};

use backend::domain::ports::{PullRequestRepository, TeamRepository, UserRepository};
use backend::domain::{
    PullRequestService, RandomReviewerPicker, ReviewQueryService, ReviewerPicker, TeamService,
};
use backend::inbound::http::state::{HttpState, HttpStatePorts};
use backend::outbound::memory::InMemoryStore;
use backend::outbound::persistence::{
    DbPool, DieselPullRequestRepository, DieselTeamRepository, DieselUserRepository, PoolConfig,
    run_pending_migrations,
};

use super::ServerSettings;

fn build_picker(seed: Option<u64>) -> Arc<dyn ReviewerPicker> {
    match seed {
        Some(seed) => {
            info!(seed, "using seeded reviewer picker");
            Arc::new(RandomReviewerPicker::seeded(seed))
        }
        None => Arc::new(RandomReviewerPicker::from_os_rng()),
    }
}

/// Bundle the services over one set of repositories.
fn wire<T, U, P>(
    team_repo: Arc<T>,
    user_repo: Arc<U>,
    pr_repo: Arc<P>,
    picker: Arc<dyn ReviewerPicker>,
    clock: Arc<dyn Clock>,
) -> HttpState
where
    T: TeamRepository + 'static,
    U: UserRepository + 'static,
    P: PullRequestRepository + 'static,
{
    let teams = Arc::new(TeamService::new(team_repo.clone(), user_repo.clone()));
    HttpState::new(HttpStatePorts {
        teams: teams.clone(),
        teams_query: teams.clone(),
        user_activity: teams,
        pull_requests: Arc::new(PullRequestService::new(
            pr_repo.clone(),
            user_repo,
            team_repo,
            picker,
            clock,
        )),
        reviews: Arc::new(ReviewQueryService::new(pr_repo)),
    })
}

async fn connect(database_url: &str, max_size: u32) -> std::io::Result<DbPool> {
    run_pending_migrations(database_url)
        .await
        .map_err(|err| std::io::Error::other(err.to_string()))?;
    let pool = DbPool::new(PoolConfig::new(database_url).with_max_size(max_size))
        .await
        .map_err(|err| std::io::Error::other(err.into_message()))?;
    debug!(max_size, "database pool ready");
    Ok(pool)
}

/// Build HTTP state backed by PostgreSQL when a URL is configured, otherwise
/// by the in-memory store.
///
/// # Errors
/// Returns [`std::io::Error`] when migrations or pool construction fail.
pub(crate) async fn build_http_state(settings: &ServerSettings) -> std::io::Result<HttpState> {
    let picker = build_picker(settings.reviewer_seed);
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);

    match settings.database_url() {
        Some(url) => {
            let pool = connect(&url, settings.pool_max_size()).await?;
            info!("using PostgreSQL repositories");
            Ok(wire(
                Arc::new(DieselTeamRepository::new(pool.clone())),
                Arc::new(DieselUserRepository::new(pool.clone())),
                Arc::new(DieselPullRequestRepository::new(pool)),
                picker,
                clock,
            ))
        }
        None => {
            info!("no database configured; using in-memory repositories");
            let store = Arc::new(InMemoryStore::new());
            Ok(wire(store.clone(), store.clone(), store, picker, clock))
        }
    }
}
