pub mod config;
pub mod database;
pub mod entity;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod models;
pub mod repository;
pub mod routes;
pub mod seed;
pub mod state;

use std::time::Duration;

use axum::http::HeaderValue;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable as ScalarServable};

use crate::config::CorsConfig;
use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Marketplace Listing API",
        version = "1.0.0",
        description = "Submit items with an image, then list, fetch or search them"
    ),
    paths(
        handlers::root::hello,
        handlers::item::add_item,
        handlers::item::list_items,
        handlers::item::get_item,
        handlers::item::search_items,
        handlers::image::get_image,
    ),
    components(schemas(
        models::item::MessageResponse,
        models::item::ItemResponse,
        models::item::ItemListResponse,
        error::ErrorBody,
    )),
    tags(
        (name = "Health", description = "Liveness check"),
        (name = "Items", description = "Item creation, listing and search"),
        (name = "Images", description = "Content-addressed item images"),
    ),
)]
pub struct ApiDoc;

/// Cross-origin policy: listed origins only, any method and header, no credentials.
pub fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .allow_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin.trim()) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {origin:?}");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
        .allow_credentials(false)
        .max_age(Duration::from_secs(config.max_age))
}

/// Build the application router.
pub fn build_router(state: AppState) -> axum::Router {
    let cors = cors_layer(&state.config.server.cors);

    routes::routes(&state.config)
        .with_state(state)
        .route(
            "/api-docs/openapi.json",
            axum::routing::get(|| async { axum::Json(ApiDoc::openapi()) }),
        )
        .merge(Scalar::with_url("/scalar", ApiDoc::openapi()))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
