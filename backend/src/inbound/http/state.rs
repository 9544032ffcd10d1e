//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    PullRequestCommand, ReviewQuery, TeamCommand, TeamQuery, UserActivityCommand,
};

/// Parameter object bundling all port implementations for HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub teams: Arc<dyn TeamCommand>,
    pub teams_query: Arc<dyn TeamQuery>,
    pub user_activity: Arc<dyn UserActivityCommand>,
    pub pull_requests: Arc<dyn PullRequestCommand>,
    pub reviews: Arc<dyn ReviewQuery>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub teams: Arc<dyn TeamCommand>,
    pub teams_query: Arc<dyn TeamQuery>,
    pub user_activity: Arc<dyn UserActivityCommand>,
    pub pull_requests: Arc<dyn PullRequestCommand>,
    pub reviews: Arc<dyn ReviewQuery>,
}

impl From<HttpStatePorts> for HttpState {
    fn from(ports: HttpStatePorts) -> Self {
        Self::new(ports)
    }
}

impl HttpState {
    /// Construct state from a ports bundle.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use backend::domain::{RandomReviewerPicker, PullRequestService, ReviewQueryService, TeamService};
    /// use backend::inbound::http::state::{HttpState, HttpStatePorts};
    /// use backend::outbound::memory::InMemoryStore;
    /// use mockable::DefaultClock;
    ///
    /// let store = Arc::new(InMemoryStore::new());
    /// let teams = Arc::new(TeamService::new(store.clone(), store.clone()));
    /// let state = HttpState::new(HttpStatePorts {
    ///     teams: teams.clone(),
    ///     teams_query: teams.clone(),
    ///     user_activity: teams,
    ///     pull_requests: Arc::new(PullRequestService::new(
    ///         store.clone(),
    ///         store.clone(),
    ///         store.clone(),
    ///         Arc::new(RandomReviewerPicker::seeded(7)),
    ///         Arc::new(DefaultClock),
    ///     )),
    ///     reviews: Arc::new(ReviewQueryService::new(store)),
    /// });
    /// let _teams = state.teams.clone();
    /// ```
    pub fn new(ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            teams,
            teams_query,
            user_activity,
            pull_requests,
            reviews,
        } = ports;
        Self {
            teams,
            teams_query,
            user_activity,
            pull_requests,
            reviews,
        }
    }
}
