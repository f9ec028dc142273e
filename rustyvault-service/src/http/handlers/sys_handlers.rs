//! System operation handlers

use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use base64::Engine;
use crate::http::routes::AppState;
use crate::modules::auth::CreateTokenRequest;

/// Health check endpoint
pub async fn health_check() -> Result<Json<Value>, StatusCode> {
    Ok(Json(json!({
        "initialized": false,
        "sealed": true,
        "standby": false,
        "performance_standby": false,
        "replication_performance_mode": "disabled",
        "replication_dr_mode": "disabled",
        "server_time_utc": chrono::Utc::now().timestamp(),
        "version": "0.1.0",
        "cluster_name": "",
        "cluster_id": ""
    })))
}

/// Health check endpoint reflecting the core's actual init/seal state
pub async fn health_check_with_state(
    state: Arc<AppState>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let initialized = state.core.inited().await.unwrap_or(false);
    let sealed = state.core.is_sealed();

    Ok(Json(json!({
        "initialized": initialized,
        "sealed": sealed,
        "standby": false,
        "performance_standby": false,
        "replication_performance_mode": "disabled",
        "replication_dr_mode": "disabled",
        "server_time_utc": chrono::Utc::now().timestamp(),
        "version": "0.1.0",
        "cluster_name": "",
        "cluster_id": ""
    })))
}

/// Seal status endpoint (with State extractor)
pub async fn seal_status(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    seal_status_with_state(state).await
}

/// Seal status endpoint (direct state parameter)
pub async fn seal_status_with_state(
    state: Arc<AppState>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let sealed = state.core.is_sealed();
    let seal_config = state.core.seal_config()
        .unwrap_or(crate::core::SealConfig {
            secret_shares: 5,
            secret_threshold: 3,
        });
    
    Ok(Json(json!({
        "sealed": sealed,
        "t": seal_config.secret_threshold,
        "n": seal_config.secret_shares,
        "progress": 0,
        "nonce": "",
        "version": "0.1.0",
        "cluster_name": "",
        "cluster_id": "",
        "recovery_seal": false,
        "storage_type": "file"
    })))
}

/// Seal endpoint (with State extractor)
pub async fn seal(
    State(state): State<Arc<AppState>>,
) -> Result<StatusCode, (StatusCode, Json<Value>)> {
    seal_with_state(state).await
}

/// Seal endpoint (direct state parameter)
pub async fn seal_with_state(
    state: Arc<AppState>,
) -> Result<StatusCode, (StatusCode, Json<Value>)> {
    state.core.seal().await
        .map_err(|e| (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"error": e.to_string()})),
        ))?;
    Ok(StatusCode::NO_CONTENT)
}

/// Unseal endpoint (with State extractor)
pub async fn unseal(
    State(state): State<Arc<AppState>>,
    payload: axum::extract::Json<Value>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    unseal_with_state(state, payload).await
}

/// Unseal endpoint (direct state parameter)
pub async fn unseal_with_state(
    state: Arc<AppState>,
    payload: axum::extract::Json<Value>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let key_str = payload.get("key")
        .and_then(|v| v.as_str())
        .ok_or_else(|| (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "Missing 'key' field"})),
        ))?;

    let key = base64::engine::general_purpose::STANDARD.decode(key_str)
        .map_err(|_| (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "Invalid base64 key"})),
        ))?;

    let unsealed = state.core.unseal(&key).await
        .map_err(|e| (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"error": e.to_string()})),
        ))?;

    Ok(Json(json!({
        "sealed": !unsealed,
    })))
}

/// Initialize endpoint (with State extractor)
pub async fn init(
    State(state): State<Arc<AppState>>,
    payload: axum::extract::Json<Value>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    init_with_state(state, payload).await
}

/// Initialize endpoint (direct state parameter)
pub async fn init_with_state(
    state: Arc<AppState>,
    payload: axum::extract::Json<Value>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let secret_shares = payload.get("secret_shares")
        .and_then(|v| v.as_u64())
        .map(|v| v as u8)
        .unwrap_or(5);
    
    let secret_threshold = payload.get("secret_threshold")
        .and_then(|v| v.as_u64())
        .map(|v| v as u8)
        .unwrap_or(3);

    let seal_config = crate::core::SealConfig {
        secret_shares,
        secret_threshold,
    };

    let result = state.core.init(&seal_config).await
        .map_err(|e| (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"error": e.to_string()})),
        ))?;

    // Convert keys to base64
    let keys: Vec<String> = result.secret_shares.iter()
        .map(|k| base64::engine::general_purpose::STANDARD.encode(k.as_slice()))
        .collect();

    // Create root token in token store (vault is unsealed at this point)
    let root_token = if let Some(token_store) = &state.token_store {
        match token_store.create_root_token().await {
            Ok(stored_root_token) => stored_root_token,
            Err(_) => result.root_token.clone(),
        }
    } else {
        result.root_token.clone()
    };

    // Stash a copy behind a one-time download token so the keys can also be
    // retrieved out-of-band (e.g. by an operator fetching keys.txt).
    let download_token = state.key_storage.store_keys(
        keys.clone(),
        root_token.clone(),
        secret_shares,
        secret_threshold,
        24,
        true,
    ).await;

    Ok(Json(json!({
        "keys": keys,
        "keys_base64": keys,
        "root_token": root_token,
        "download_token": download_token,
    })))
}

/// Download initialization keys as a plain-text file via a one-time download token
pub async fn download_keys_file_with_state(
    state: Arc<AppState>,
    query: HashMap<String, String>,
) -> Result<String, (StatusCode, Json<Value>)> {
    let token = query.get("token").ok_or_else(|| {
        (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "token query parameter is required" })),
        )
    })?;

    let stored = state.key_storage.get_keys(token).await.ok_or_else(|| {
        (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "invalid or expired download token" })),
        )
    })?;

    let mut out = String::new();
    out.push_str("RustyVault Initialization Keys\n");
    out.push_str("===============================\n\n");
    out.push_str(&format!(
        "Unseal threshold: {} of {}\n\n",
        stored.secret_threshold, stored.secret_shares
    ));
    for (i, key) in stored.keys_base64.iter().enumerate() {
        out.push_str(&format!("Unseal Key {}: {}\n", i + 1, key));
    }
    out.push_str(&format!("\nRoot Token: {}\n", stored.root_token));

    Ok(out)
}

/// Retrieve initialization keys as JSON via a one-time download token (authenticated route)
pub async fn get_keys_authenticated_with_state(
    state: Arc<AppState>,
    query: HashMap<String, String>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let token = query.get("token").ok_or_else(|| {
        (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "token query parameter is required" })),
        )
    })?;

    let stored = state.key_storage.get_keys(token).await.ok_or_else(|| {
        (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "invalid or expired download token" })),
        )
    })?;

    Ok(Json(json!({
        "keys": stored.keys_base64,
        "keys_base64": stored.keys_base64,
        "root_token": stored.root_token,
        "secret_shares": stored.secret_shares,
        "secret_threshold": stored.secret_threshold,
    })))
}

