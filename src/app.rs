use axum::Router;
use tower_http::cors::{Any, CorsLayer};

use crate::routes::{admin, health, predictions, prices, products};
use crate::state::AppState;

pub fn create_app(state: AppState) -> Router {
    // The dashboard frontend is served from a different origin.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::<AppState>::new()
        .nest("/health", health::router())
        .nest("/api/products", products::router())
        .nest("/api/prices", prices::router())
        .nest("/api/predictions", predictions::router())
        .nest("/api/admin", admin::router())
        .layer(cors)
        .with_state(state)
}
