use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use uuid::Uuid;

use shared::RequestContext;

use super::super::AppState;

/// Bearer-token-only authentication (§3 "User": every request carries a tenant scope
/// on its JWT, `None` for tenant-less root admins). Every downstream handler reads the
/// `RequestContext` this inserts rather than reaching back into the token.
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, (StatusCode, axum::Json<serde_json::Value>)> {
    let request_id = request
        .extensions()
        .get::<String>()
        .cloned()
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let auth_header = request
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| {
            (
                StatusCode::UNAUTHORIZED,
                axum::Json(serde_json::json!({ "error": "Missing Authorization header" })),
            )
        })?;

    let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
        (
            StatusCode::UNAUTHORIZED,
            axum::Json(serde_json::json!({ "error": "Invalid Authorization header format" })),
        )
    })?;

    let claims = state.token_manager.validate_token(token).map_err(|e| {
        (
            StatusCode::UNAUTHORIZED,
            axum::Json(serde_json::json!({ "error": format!("Token validation failed: {}", e) })),
        )
    })?;

    let user_id = Uuid::parse_str(&claims.sub).map_err(|_| {
        (
            StatusCode::UNAUTHORIZED,
            axum::Json(serde_json::json!({ "error": "Invalid user ID in token" })),
        )
    })?;

    let tenant_id = claims
        .tenant_id
        .as_deref()
        .map(Uuid::parse_str)
        .transpose()
        .map_err(|_| {
            (
                StatusCode::UNAUTHORIZED,
                axum::Json(serde_json::json!({ "error": "Invalid tenant ID in token" })),
            )
        })?;

    let context = RequestContext::new(
        request_id,
        user_id,
        claims.email,
        claims.role,
        claims.permissions.unwrap_or_default(),
    )
    .with_tenant(tenant_id);

    request.extensions_mut().insert(context);
    Ok(next.run(request).await)
}
