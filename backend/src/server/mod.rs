//! Server construction and middleware wiring.

mod config;
mod state_builders;

pub use config::ServerSettings;

use state_builders::build_http_state;

use std::time::Duration;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
use tracing::{info, warn};

use backend::Trace;
#[cfg(debug_assertions)]
use backend::doc::ApiDoc;
use backend::inbound::http;
use backend::inbound::http::health::{HealthState, live, ready};
use backend::inbound::http::state::HttpState;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(30);

fn build_app(
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(Trace)
        .configure(http::configure)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));
    #[cfg(not(debug_assertions))]
    let app = app;

    app
}

/// Resolve once Ctrl-C arrives, failing probes before the server drains.
async fn shutdown_signal(health_state: web::Data<HealthState>) {
    if let Err(error) = actix_web::rt::signal::ctrl_c().await {
        warn!(%error, "failed to listen for shutdown signal");
        return;
    }
    info!("shutdown requested; marking service unhealthy");
    health_state.mark_unhealthy();
}

/// Construct an Actix HTTP server from the supplied settings.
///
/// # Errors
/// Propagates [`std::io::Error`] when the store cannot be prepared or the
/// socket cannot be bound.
pub async fn create_server(
    health_state: web::Data<HealthState>,
    settings: &ServerSettings,
) -> std::io::Result<Server> {
    let http_state = web::Data::new(build_http_state(settings).await?);
    let server_health_state = health_state.clone();

    let server = HttpServer::new(move || {
        build_app(server_health_state.clone(), http_state.clone())
    })
    .shutdown_signal(shutdown_signal(health_state.clone()))
    .shutdown_timeout(SHUTDOWN_TIMEOUT.as_secs())
    .bind((settings.host(), settings.port()))?
    .run();

    info!(host = settings.host(), port = settings.port(), "server listening");
    health_state.mark_ready();
    Ok(server)
}
