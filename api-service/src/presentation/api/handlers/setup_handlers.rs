use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Deserialize;

use super::super::AppState;

pub async fn check_setup_status(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match state.setup_repository.is_setup_completed().await {
        Ok(completed) => {
            (StatusCode::OK, Json(serde_json::json!({ "completed": completed }))).into_response()
        }
        Err(e) => {
            (StatusCode::INTERNAL_SERVER_ERROR, Json(serde_json::json!({"error": e.to_string()})))
                .into_response()
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct InitializeSetupRequest {
    pub email: String,
    pub username: String,
    pub password: String,
}

/// Creates the single root admin account (§3 "User: Root admins are tenant-less").
/// Tenants are onboarded afterwards through the `setup` CLI tool, not this endpoint —
/// they're a recurring lifecycle event, not a one-time bootstrap step.
pub async fn initialize_setup(
    State(state): State<Arc<AppState>>,
    Json(request): Json<InitializeSetupRequest>,
) -> impl IntoResponse {
    match state
        .create_super_admin_use_case
        .execute(&request.email, &request.username, &request.password)
        .await
    {
        Ok(user) => (
            StatusCode::CREATED,
            Json(serde_json::json!({
                "id": user.id,
                "email": user.email,
                "username": user.username,
            })),
        )
            .into_response(),
        Err(e) => {
            let status = match e {
                shared::AppError::Validation(_) => StatusCode::BAD_REQUEST,
                shared::AppError::Conflict(_) => StatusCode::CONFLICT,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            };
            (status, Json(serde_json::json!({"error": e.to_string()}))).into_response()
        }
    }
}
