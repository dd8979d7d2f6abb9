use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

mod dashboard;
mod family;
mod health;
mod kids;
mod metrics;
mod signup;

pub use dashboard::dashboard_handler;
pub use family::create_family_handler;
pub use health::health_handler;
pub use kids::{create_kid_handler, list_kids_handler};
pub use metrics::metrics_handler;
pub use signup::{method_not_allowed, signup_handler};

//creating the router with routes
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/metrics", get(metrics_handler))
        .route("/api/signup", post(signup_handler).fallback(method_not_allowed))
        .route("/api/dashboard", get(dashboard_handler))
        .route("/api/onboarding/family", post(create_family_handler))
        .route("/api/kids", get(list_kids_handler).post(create_kid_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
