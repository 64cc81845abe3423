use axum::Router;
use tower_http::cors::{Any, CorsLayer};

use crate::routes::{analysis, health, orders, portfolios, positions, recommendations, stocks, sync};
use crate::state::AppState;

pub fn create_app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::<AppState>::new()
        .nest("/health", health::router())
        .nest("/api/portfolios", portfolios::router())
        .nest("/api/positions", positions::router())
        .nest("/api/orders", orders::router())
        .nest("/api/stocks", stocks::router())
        .nest("/api/analysis", analysis::router())
        .nest("/api/recommendations", recommendations::router())
        .nest("/api/sync", sync::router())
        .layer(cors)
        .with_state(state)
}
