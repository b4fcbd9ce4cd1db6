use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde_json::{json, Value};

use crate::api::models::{CreateFormRequest, UpdateFormRequest};
use crate::api::AppState;
use crate::db::{AccountRow, FormRow};

fn form_json(form: &FormRow) -> Value {
    json!({
        "id": form.id,
        "name": form.name,
        "form_key": form.form_key,
        "is_active": form.is_active,
        "validation_count": form.validation_count,
        "passed_count": form.passed_count,
        "avg_score": form.avg_score,
        "pass_rate": form.pass_rate,
    })
}

pub async fn create_form(
    State(state): State<AppState>,
    Extension(account): Extension<AccountRow>,
    Json(req): Json<CreateFormRequest>,
) -> Result<(StatusCode, Json<Value>), (StatusCode, Json<Value>)> {
    if req.name.trim().is_empty() {
        return Err((StatusCode::BAD_REQUEST, Json(json!({"error": "Form name is required"}))));
    }
    let form = state
        .db
        .create_form(&account.id, req.name.trim())
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({"error": e.to_string()}))))?;
    Ok((StatusCode::CREATED, Json(form_json(&form))))
}

pub async fn list_forms(
    State(state): State<AppState>,
    Extension(account): Extension<AccountRow>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let forms = state
        .db
        .list_forms(&account.id)
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({"error": e.to_string()}))))?;
    let forms: Vec<Value> = forms.iter().map(form_json).collect();
    let total = forms.len();
    Ok(Json(json!({ "forms": forms, "total": total })))
}

pub async fn get_form(
    State(state): State<AppState>,
    Extension(account): Extension<AccountRow>,
    Path(id): Path<String>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    match state.db.get_form(&account.id, &id) {
        Ok(Some(form)) => Ok(Json(form_json(&form))),
        Ok(None) => Err((StatusCode::NOT_FOUND, Json(json!({"error": "Form not found"})))),
        Err(e) => Err((StatusCode::INTERNAL_SERVER_ERROR, Json(json!({"error": e.to_string()})))),
    }
}

pub async fn update_form(
    State(state): State<AppState>,
    Extension(account): Extension<AccountRow>,
    Path(id): Path<String>,
    Json(req): Json<UpdateFormRequest>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    match state.db.set_form_active(&account.id, &id, req.is_active) {
        Ok(true) => Ok(Json(json!({"updated": true, "is_active": req.is_active}))),
        Ok(false) => Err((StatusCode::NOT_FOUND, Json(json!({"error": "Form not found"})))),
        Err(e) => Err((StatusCode::INTERNAL_SERVER_ERROR, Json(json!({"error": e.to_string()})))),
    }
}
