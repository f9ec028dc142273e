use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

use crate::presentation::api::handlers::*;
use crate::presentation::api::middleware;

/// Public routes: no `auth_middleware` layer, reachable before a token exists.
pub fn public_router() -> Router<Arc<super::AppState>> {
    Router::new()
        .route("/health", get(health_check))
        .route("/auth/login", post(login))
        .route("/api/setup/status", get(check_setup_status))
        .route("/api/setup/initialize", post(initialize_setup))
}

/// Authenticated routes. `main.rs` layers `auth_middleware` on top of this router;
/// each handler enforces tenant/provider scope itself (§4.7) rather than going through
/// a generic permission-string gate.
pub fn protected_router() -> Router<Arc<super::AppState>> {
    Router::new()
        .route("/auth/logout", post(logout))
        .route("/auth/token", post(refresh_token))
        .route("/auth/userinfo", get(userinfo))
        .route("/api/jobs/batch-sync", post(enqueue_batch_sync))
        .route("/api/jobs/prep-sheets", post(enqueue_prep_sheets))
        .route("/api/jobs/{job_id}", get(get_job))
        .route("/api/jobs/{job_id}/cancel", post(cancel_job))
        .route("/api/screenings", get(list_screenings))
        .route("/api/patients/{patient_id}/prep-sheet", get(get_prep_sheet))
}

pub fn create_router(state: Arc<super::AppState>) -> Router {
    public_router()
        .merge(
            protected_router().route_layer(axum::middleware::from_fn_with_state(
                state.clone(),
                middleware::auth_middleware,
            )),
        )
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}
