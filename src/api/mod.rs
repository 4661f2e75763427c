//! HTTP API, an axum server over the storage layer
//!
//! Serves the coin catalog, login, and collection management as JSON.

mod error;
pub mod routes;

pub use error::ApiError;
pub use routes::{ApiState, AppState};

use crate::config::ServerConfig;
use crate::CoinError;
use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post, put},
    Router,
};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

/// Builds the CORS layer from the configured origins
///
/// `*` anywhere in the list allows every origin.
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE]);

    if origins.iter().any(|origin| origin == "*") {
        return cors.allow_origin(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    cors.allow_origin(AllowOrigin::list(allowed))
}

/// Build the axum router with all routes and middleware
pub fn build_router(state: AppState, cors_origins: &[String]) -> Router {
    Router::new()
        .route("/api/auth/login", post(routes::login))
        .route("/api/coins", get(routes::list_coins))
        .route("/api/coins/:coin_id", get(routes::get_coin))
        .route("/api/countries", get(routes::list_countries))
        .route("/api/years", get(routes::list_years))
        .route("/api/collection", get(routes::get_collection))
        .route("/api/collection/add", post(routes::add_to_collection))
        .route("/api/collection/stats", get(routes::collection_stats))
        .route(
            "/api/collection/:item_id",
            put(routes::update_collection_item).delete(routes::remove_from_collection),
        )
        .route("/health", get(routes::health))
        .layer(cors_layer(cors_origins))
        .with_state(state)
}

/// Binds the configured address and serves the API until shutdown
pub async fn serve(config: &ServerConfig, state: AppState) -> Result<(), CoinError> {
    let app = build_router(state, &config.cors_origins);

    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    tracing::info!("API listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
