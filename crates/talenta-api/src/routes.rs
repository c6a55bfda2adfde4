//! API routes.

use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::limit::RequestBodyLimitLayer;

use crate::handlers::applications::applications_screen;
use crate::handlers::auth::{login, logout, session};
use crate::handlers::candidates::{candidate_detail, candidates_screen, update_candidate_status};
use crate::handlers::documents::upload_document;
use crate::handlers::postings::{
    create_posting, delete_posting, edit_screen, list_screen, toggle_posting_status,
    update_posting,
};
use crate::handlers::{health, ready};
use crate::metrics::metrics_middleware;
use crate::middleware::{cors_layer, request_id, request_logging, security_headers};
use crate::state::AppState;

/// Create the API router.
pub fn create_router(state: AppState, metrics_handle: Option<PrometheusHandle>) -> Router {
    let auth_routes = Router::new()
        .route("/auth/login", post(login))
        .route("/auth/session", get(session))
        .route("/auth/logout", post(logout));

    let dashboard_routes = Router::new()
        // Postings list screen and actions
        .route("/dashboard/list", get(list_screen))
        .route("/dashboard/postings", post(create_posting))
        .route(
            "/dashboard/postings/:id",
            get(edit_screen).patch(update_posting).delete(delete_posting),
        )
        .route("/dashboard/postings/:id/toggle", post(toggle_posting_status))
        // Applications screen (postings overview / per-job / per-applicant)
        .route("/dashboard/applications", get(applications_screen))
        // Candidates report and detail
        .route("/dashboard/candidates", get(candidates_screen))
        .route("/dashboard/candidates/:id", get(candidate_detail))
        .route(
            "/dashboard/candidates/:id/status",
            post(update_candidate_status),
        );

    let file_routes = Router::new().route("/files", post(upload_document));

    let health_routes = Router::new()
        .route("/health", get(health))
        .route("/healthz", get(health))
        .route("/ready", get(ready));

    // Metrics endpoint (if enabled)
    let metrics_routes = if let Some(handle) = metrics_handle {
        Router::new().route("/metrics", get(move || async move { handle.render() }))
    } else {
        Router::new()
    };

    Router::new()
        .merge(auth_routes)
        .merge(dashboard_routes)
        .merge(file_routes)
        .merge(health_routes)
        .merge(metrics_routes)
        .layer(RequestBodyLimitLayer::new(state.config.max_body_size))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(security_headers))
        .layer(middleware::from_fn(request_id))
        .layer(middleware::from_fn(request_logging))
        .layer(cors_layer(&state.config.cors_origins))
        .with_state(state)
}
