#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for the crime dashboard.
//!
//! Serves the selector options, the trend and comparison chart series,
//! and model predictions as JSON. The dataset is loaded at startup; a
//! missing model only disables predictions.

mod handlers;
pub mod interactive;

use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware, web};
use crime_dash_analytics::Dashboard;
use crime_dash_config::DashboardConfig;

/// Shared application state.
pub struct AppState {
    /// Dataset, model, and year policy behind every request.
    pub dashboard: Dashboard,
}

/// Registers the `/api` routes.
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(handlers::health))
            .route("/options", web::get().to(handlers::options))
            .route("/dashboard", web::get().to(handlers::dashboard))
            .route("/predict", web::post().to(handlers::predict))
            .route("/trend", web::get().to(handlers::trend))
            .route("/comparison", web::get().to(handlers::comparison)),
    );
}

/// Starts the crime dashboard API server.
///
/// Loads the dataset and model from the configured paths, then starts the
/// Actix-Web HTTP server. This is a regular async function: the caller is
/// responsible for providing the async runtime (e.g. via
/// `#[actix_web::main]`) and for initializing logging.
///
/// # Errors
///
/// Returns an `std::io::Result` error if the dataset cannot be loaded, or
/// if the HTTP server fails to bind or encounters a runtime error.
#[allow(clippy::future_not_send)]
pub async fn run_server(config: DashboardConfig) -> std::io::Result<()> {
    if let Ok(cwd) = std::env::current_dir() {
        log::info!("Working directory: {}", cwd.display());
    }

    let dashboard = Dashboard::from_config(&config);

    dashboard.dataset().load().map_err(|e| {
        std::io::Error::other(format!(
            "Failed to load crime data from {}: {e}",
            crime_dash_config::paths::display_path(dashboard.dataset().path()).display()
        ))
    })?;

    if let Err(e) = dashboard.model().load() {
        log::warn!(
            "Predictions unavailable ({}): {e}",
            crime_dash_config::paths::display_path(dashboard.model().path()).display()
        );
    }

    let state = web::Data::new(AppState { dashboard });
    let bind_addr = config.server.bind_addr;
    let port = config.server.port;

    log::info!("Starting server on {bind_addr}:{port}");

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(routes)
    })
    .bind((bind_addr, port))?
    .run()
    .await
}
