use axum::{
    Router,
    routing::{get, post},
};

use crate::config::AppConfig;
use crate::handlers;
use crate::state::AppState;

pub fn routes(config: &AppConfig) -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::root::hello))
        .merge(item_routes(config))
        .route("/search", get(handlers::item::search_items))
        .merge(image_routes())
}

fn item_routes(config: &AppConfig) -> Router<AppState> {
    let upload = post(handlers::item::add_item).layer(handlers::item::add_item_body_limit(
        config.storage.max_image_size,
    ));

    Router::new()
        .route("/items", upload.get(handlers::item::list_items))
        .route("/items/{id}", get(handlers::item::get_item))
}

fn image_routes() -> Router<AppState> {
    Router::new()
        .route("/images/{name}", get(handlers::image::get_image))
        // Singular alias kept for older front-ends.
        .route("/image/{name}", get(handlers::image::get_image))
}
