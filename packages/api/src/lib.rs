use axum::{Router, middleware::from_fn_with_state};
use middleware::jwt::jwt_middleware;
use state::AppState;
use tower::ServiceBuilder;
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

pub mod entity;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod state;
pub mod store;
pub mod webhook;

pub use sea_orm;

pub fn construct_router(state: AppState) -> Router {
    let v2 = Router::new()
        .nest("/webhooks", routes::webhook::routes())
        .layer(from_fn_with_state(state.clone(), jwt_middleware));

    Router::new()
        .nest("/health", routes::health::routes())
        .nest("/api/v2", v2)
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new()),
        )
}
