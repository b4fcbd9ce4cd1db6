use axum::{extract::State, http::StatusCode, Extension, Json};
use serde_json::{json, Value};

use crate::api::models::UpdateSettingsRequest;
use crate::api::AppState;
use crate::db::AccountRow;
use crate::errors::BouncerError;
use crate::models::ScoringThresholds;

fn settings_json(account: &AccountRow) -> Value {
    json!({
        "email": account.email,
        "plan": account.plan.as_str(),
        "monthly_limit": account.monthly_limit,
        "validations_used": account.validations_used,
        "passed_min": account.thresholds.passed_min,
        "borderline_min": account.thresholds.borderline_min,
        "block_rejected": account.block_rejected,
        "rejection_message": account.rejection_message,
    })
}

pub async fn get_settings(
    Extension(account): Extension<AccountRow>,
) -> Json<Value> {
    Json(settings_json(&account))
}

pub async fn update_settings(
    State(state): State<AppState>,
    Extension(account): Extension<AccountRow>,
    Json(req): Json<UpdateSettingsRequest>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let thresholds = ScoringThresholds {
        passed_min: req.passed_min,
        borderline_min: req.borderline_min,
    };
    match state.db.update_account_settings(
        &account.id,
        &thresholds,
        req.block_rejected,
        req.rejection_message.as_deref(),
    ) {
        Ok(()) => {}
        Err(BouncerError::InvalidInput(msg)) => {
            return Err((StatusCode::BAD_REQUEST, Json(json!({"error": msg}))));
        }
        Err(e) => {
            return Err((StatusCode::INTERNAL_SERVER_ERROR, Json(json!({"error": e.to_string()}))));
        }
    }
    // Re-read so the response reflects the stored row, not the request.
    let updated = state
        .db
        .get_account(&account.id)
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({"error": e.to_string()}))))?
        .ok_or_else(|| (StatusCode::NOT_FOUND, Json(json!({"error": "Account not found"}))))?;
    Ok(Json(settings_json(&updated)))
}
