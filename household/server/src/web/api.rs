pub mod v1;

use crate::config::Config;
use crate::web::AppState;
use crate::web::middleware::JsonContentTypeLayer;
use axum::{
    Router,
    http::{HeaderValue, Method, header},
    routing::get,
};
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;

/// Creates the JSON API routes for every entity kind, plus the OpenAPI
/// document.
pub fn create_api_router(state: &AppState, config: &Config) -> anyhow::Result<Router> {
    let allowed_origin: HeaderValue = config.allowed_origin.parse()?;
    let cors = CorsLayer::new()
        .allow_origin(allowed_origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::ACCEPT, header::CONTENT_TYPE])
        .max_age(Duration::from_secs(300));

    let router = Router::new()
        .merge(v1::resource_router(state.tasks.clone()))
        .merge(v1::resource_router(state.projects.clone()))
        .merge(v1::resource_router(state.notes.clone()))
        .merge(v1::resource_router(state.wishlists.clone()))
        .merge(v1::resource_router(state.shopping.clone()))
        .route("/api/openapi.json", get(v1::openapi_handler))
        .layer(
            ServiceBuilder::new()
                .layer(cors)
                .layer(JsonContentTypeLayer::new()),
        );
    Ok(router)
}
