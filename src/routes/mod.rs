use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

pub mod health;
pub mod links;
pub mod redirect;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/links", post(links::create_link).get(links::list_links))
        .route(
            "/links/{slug}",
            get(links::get_link).delete(links::delete_link),
        )
        .route("/links/{slug}/clicks", get(links::get_clicks))
        .route("/{slug}", get(redirect::access_link))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
