// src/main.rs

use std::env;

use axum::{
    routing::{get, patch, post},
    Router,
};
use sqlx::{Pool, Postgres};
use tokio::net::TcpListener;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::EnvFilter;

mod db;
mod models;
mod pricing;
mod routes;
mod scheduling;

#[derive(Clone)]
pub struct AppState {
    pub pool: Pool<Postgres>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment from .env if present
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("shinebook_api=debug,tower_http=info")),
        )
        .init();

    // Initialize DB pool
    let pool = db::connect().await?;
    let state = AppState { pool };

    // Very permissive CORS for local dev (tighten for prod)
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Root API router
    let api = Router::new()
        // health
        .route("/health", get(routes::health::health))
        // estimates (stateless, what the wizard polls while the user types)
        .route("/api/v1/estimates", post(routes::estimates::create_estimate))
        // quotes (persisted estimate snapshots)
        .route(
            "/api/v1/quotes",
            post(routes::quotes::create_quote).get(routes::quotes::list_quotes),
        )
        .route("/api/v1/quotes/:id", get(routes::quotes::get_quote))
        // availability
        .route("/api/v1/availability/slots", get(routes::availability::list_slots))
        .route(
            "/api/v1/availability/providers",
            get(routes::availability::list_available_providers),
        )
        // providers (+ working windows)
        .route(
            "/api/v1/providers",
            post(routes::providers::create_provider).get(routes::providers::list_providers),
        )
        .route(
            "/api/v1/providers/:id",
            get(routes::providers::get_provider)
                .patch(routes::providers::patch_provider)
                .delete(routes::providers::delete_provider),
        )
        .route(
            "/api/v1/providers/:id/windows",
            get(routes::providers::list_windows),
        )
        .route(
            "/api/v1/providers/:id/windows/bulk",
            post(routes::providers::bulk_upsert_windows),
        )
        // add-on catalog
        .route(
            "/api/v1/extras",
            post(routes::extras::create_extra).get(routes::extras::list_extras),
        )
        .route(
            "/api/v1/extras/:id",
            patch(routes::extras::patch_extra).delete(routes::extras::delete_extra),
        )
        // bookings
        .route(
            "/api/v1/bookings",
            post(routes::bookings::create_booking).get(routes::bookings::list_bookings),
        )
        .route(
            "/api/v1/bookings/:id",
            get(routes::bookings::get_booking)
                .patch(routes::bookings::patch_booking)
                .delete(routes::bookings::delete_booking),
        )
        // state & middleware
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    // Port (axum 0.7 style)
    let port: u16 = env::var("PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(8080); // default 8080

    let addr = format!("0.0.0.0:{port}");
    let listener = TcpListener::bind(&addr).await?;

    let api_base = format!("http://127.0.0.1:{port}");
    println!("✅ PORT={}, using {}", port, addr);
    println!("🚀 API listening on {api_base}");

    axum::serve(listener, api.into_make_service()).await?;
    Ok(())
}
