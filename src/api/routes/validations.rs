use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde_json::{json, Value};

use crate::api::models::ListQuery;
use crate::api::AppState;
use crate::db::AccountRow;
use crate::models::ValidationStatus;

const DEFAULT_PAGE_SIZE: usize = 50;
const MAX_PAGE_SIZE: usize = 200;

pub async fn list_validations(
    State(state): State<AppState>,
    Extension(account): Extension<AccountRow>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let limit = query.limit.unwrap_or(DEFAULT_PAGE_SIZE).min(MAX_PAGE_SIZE);
    let offset = query.offset.unwrap_or(0);

    // Reject unknown status filters up front rather than silently matching nothing.
    let status = match query.status.as_deref() {
        Some(raw) => Some(
            ValidationStatus::parse(raw)
                .map_err(|_| {
                    (
                        StatusCode::BAD_REQUEST,
                        Json(json!({"error": format!("Unknown status filter: {}", raw)})),
                    )
                })?
                .as_str(),
        ),
        None => None,
    };

    let validations = state
        .db
        .list_validations(&account.id, limit, offset, status)
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({"error": e.to_string()}))))?;
    let count = validations.len();
    Ok(Json(json!({
        "validations": validations,
        "count": count,
        "limit": limit,
        "offset": offset,
    })))
}

pub async fn get_validation(
    State(state): State<AppState>,
    Extension(account): Extension<AccountRow>,
    Path(id): Path<String>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    match state.db.get_validation(&account.id, &id) {
        Ok(Some(validation)) => Ok(Json(validation)),
        Ok(None) => Err((StatusCode::NOT_FOUND, Json(json!({"error": "Validation not found"})))),
        Err(e) => Err((StatusCode::INTERNAL_SERVER_ERROR, Json(json!({"error": e.to_string()})))),
    }
}

pub async fn override_validation(
    State(state): State<AppState>,
    Extension(account): Extension<AccountRow>,
    Path(id): Path<String>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    match state.db.override_validation(&account.id, &id) {
        Ok(true) => Ok(Json(json!({
            "id": id,
            "status": ValidationStatus::Passed.as_str(),
            "manually_passed": true,
        }))),
        Ok(false) => Err((StatusCode::NOT_FOUND, Json(json!({"error": "Validation not found"})))),
        Err(e) => Err((StatusCode::INTERNAL_SERVER_ERROR, Json(json!({"error": e.to_string()})))),
    }
}
