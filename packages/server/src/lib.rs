#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for street traffic lookups.
//!
//! Serves street classification, street search, dataset statistics, and
//! route travel-time adjustment over a shared [`EngineHandle`]. The
//! handle can be rebuilt from disk while the server is running via
//! `POST /api/traffic/reload`.

mod handlers;

use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware, web};
use std::sync::Arc;
use street_traffic::EngineHandle;

/// Default number of search results.
pub const DEFAULT_SEARCH_LIMIT: usize = 10;

/// Shared application state.
pub struct AppState {
    /// Engine shared with every worker.
    pub engine: Arc<EngineHandle>,
}

/// Registers the `/api` routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(handlers::health))
            .route("/traffic/level", web::get().to(handlers::street_level))
            .route("/traffic/search", web::get().to(handlers::search))
            .route("/traffic/stats", web::get().to(handlers::stats))
            .route("/traffic/adjust", web::post().to(handlers::adjust))
            .route("/traffic/reload", web::post().to(handlers::reload)),
    );
}

/// Starts the street traffic API server over `engine`.
///
/// Binds to `BIND_ADDR` (default `127.0.0.1`) and `PORT` (default
/// `8080`). The caller is responsible for initializing logging and
/// providing the async runtime (e.g. via `#[actix_web::main]`).
///
/// # Errors
///
/// Returns an `std::io::Result` error if the HTTP server fails to bind or
/// encounters a runtime error.
pub async fn run_server(engine: Arc<EngineHandle>) -> std::io::Result<()> {
    let state = web::Data::new(AppState { engine });

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);

    log::info!("Starting server on {bind_addr}:{port}");

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(configure)
    })
    .bind((bind_addr, port))?
    .run()
    .await
}
