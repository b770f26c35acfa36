use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{handlers, state::ApiState};

pub fn create_router(state: ApiState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health::health_check))

        // Assignment endpoints
        .route(
            "/projects/:project_id/auto-assign-all",
            post(handlers::assign::auto_assign_all),
        )
        .route(
            "/tasks/:task_id/auto-assign",
            post(handlers::assign::auto_assign_single),
        )

        // Workload analysis
        .route("/workload-analysis", get(handlers::workload::workload_analysis))

        // Add state
        .with_state(state)

        // Request tracing + CORS for the browser frontend
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
