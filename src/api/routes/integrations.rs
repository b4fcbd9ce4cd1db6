use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde_json::{json, Value};

use crate::api::models::UpsertIntegrationRequest;
use crate::api::AppState;
use crate::db::AccountRow;
use crate::models::{Integration, Provider};

const LOG_PAGE_SIZE: usize = 100;

fn integration_json(integration: &Integration) -> Value {
    json!({
        "id": integration.id,
        "provider": integration.provider.as_str(),
        "status": integration.status.as_str(),
        "connection_id": integration.connection_id,
        "field_mappings": integration.field_mappings,
        "last_synced_at": integration.last_synced_at,
    })
}

fn parse_provider(raw: &str) -> Result<Provider, (StatusCode, Json<Value>)> {
    Provider::parse(raw).map_err(|_| {
        (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": format!("Unknown provider: {}", raw)})),
        )
    })
}

pub async fn list_integrations(
    State(state): State<AppState>,
    Extension(account): Extension<AccountRow>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let integrations = state
        .db
        .list_integrations(&account.id)
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({"error": e.to_string()}))))?;
    let integrations: Vec<Value> = integrations.iter().map(integration_json).collect();
    Ok(Json(json!({ "integrations": integrations })))
}

pub async fn upsert_integration(
    State(state): State<AppState>,
    Extension(account): Extension<AccountRow>,
    Path(provider): Path<String>,
    Json(req): Json<UpsertIntegrationRequest>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let provider = parse_provider(&provider)?;
    if req.connection_id.trim().is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "connection_id is required"})),
        ));
    }
    let integration = state
        .db
        .upsert_integration(&account.id, provider, req.connection_id.trim(), &req.field_mappings)
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({"error": e.to_string()}))))?;
    Ok(Json(integration_json(&integration)))
}

pub async fn disconnect_integration(
    State(state): State<AppState>,
    Extension(account): Extension<AccountRow>,
    Path(provider): Path<String>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let provider = parse_provider(&provider)?;
    match state.db.disconnect_integration(&account.id, provider) {
        Ok(true) => Ok(Json(json!({"provider": provider.as_str(), "status": "disconnected"}))),
        Ok(false) => Err((StatusCode::NOT_FOUND, Json(json!({"error": "Integration not found"})))),
        Err(e) => Err((StatusCode::INTERNAL_SERVER_ERROR, Json(json!({"error": e.to_string()})))),
    }
}

pub async fn integration_logs(
    State(state): State<AppState>,
    Extension(account): Extension<AccountRow>,
    Path(provider): Path<String>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let provider = parse_provider(&provider)?;
    let integration = state
        .db
        .get_integration(&account.id, provider)
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({"error": e.to_string()}))))?
        .ok_or_else(|| (StatusCode::NOT_FOUND, Json(json!({"error": "Integration not found"}))))?;
    let logs = state
        .db
        .list_integration_logs(&integration.id, LOG_PAGE_SIZE)
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({"error": e.to_string()}))))?;
    Ok(Json(json!({
        "provider": provider.as_str(),
        "logs": logs,
    })))
}
