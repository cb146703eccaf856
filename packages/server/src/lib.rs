#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for the flood watch application.
//!
//! Serves the flood analysis endpoint, the read-only history page, and
//! the static map frontend. The imagery-service session is established
//! once at startup and shared read-only across requests; each request
//! runs its own pipeline, so no locking is needed.

mod handlers;

use std::sync::Arc;

use actix_cors::Cors;
use actix_files::Files;
use actix_web::{App, HttpServer, middleware, web};
use flood_watch_geography::CityBoundaryTable;
use flood_watch_raster::{HttpImageryService, ImageryService, ImageryServiceConfig};

/// Shared application state.
pub struct AppState {
    /// City boundary table, read-only after startup.
    pub boundary_table: CityBoundaryTable,
    /// Imagery service session.
    pub imagery: Arc<dyn ImageryService>,
}

/// Starts the flood watch API server.
///
/// Reads the imagery-service config from the environment, performs the
/// startup handshake, and binds the HTTP server. This is a regular async
/// function; the caller provides the runtime (e.g. via
/// `#[actix_web::main]`).
///
/// # Errors
///
/// Returns an `std::io::Result` error if the HTTP server fails to bind
/// or encounters a runtime error.
///
/// # Panics
///
/// Panics if the imagery service cannot be configured or rejects the
/// startup handshake. The server must not come up without a working
/// imagery session.
#[allow(clippy::future_not_send)]
pub async fn run_server() -> std::io::Result<()> {
    pretty_env_logger::init_custom_env("RUST_LOG");

    log::info!("Loading city boundary table...");
    let boundary_table = CityBoundaryTable::builtin();
    log::info!("{} cities supported", boundary_table.len());

    log::info!("Initializing imagery service session...");
    let config = ImageryServiceConfig::from_env().expect("Imagery service is not configured");
    let imagery =
        HttpImageryService::new(config).expect("Failed to build imagery service client");
    imagery
        .init()
        .await
        .expect("Failed to initialize imagery service");

    let state = web::Data::new(AppState {
        boundary_table,
        imagery: Arc::new(imagery),
    });

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
            .service(web::scope("/api").route("/health", web::get().to(handlers::health)))
            .route("/analyze_flood", web::post().to(handlers::analyze_flood))
            .route("/history", web::get().to(handlers::history))
            // Serve the map frontend
            .service(Files::new("/", "static").index_file("index.html"))
    })
    .bind((bind_addr, port))?
    .run()
    .await
}
