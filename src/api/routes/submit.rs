use axum::{
    extract::{rejection::JsonRejection, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use chrono::Utc;
use serde_json::{json, Value};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::api::models::SubmitRequest;
use crate::api::AppState;
use crate::crm::push_lead_to_all_crms;
use crate::db::NewValidation;
use crate::engine::{classify, derive_company_domain, ValidationInput};
use crate::errors::BouncerError;
use crate::models::{LeadPayload, ValidationStatus};

const DEFAULT_REJECTION_MESSAGE: &str = "This submission could not be accepted.";

/// Plain OPTIONS no-op. Real CORS preflights are answered by the layer;
/// anything else lands here.
pub async fn preflight() -> StatusCode {
    StatusCode::NO_CONTENT
}

/// Public, unauthenticated submission endpoint. Validates, scores,
/// persists, updates aggregates, responds. CRM distribution is detached
/// and never delays the response. Error bodies are produced by the
/// `IntoResponse` impl on `BouncerError`.
pub async fn submit(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<SubmitRequest>, JsonRejection>,
) -> Result<Json<Value>, BouncerError> {
    let Json(req) =
        payload.map_err(|_| BouncerError::InvalidInput("Invalid JSON body".to_string()))?;

    let form_key = req
        .form_key
        .filter(|v| !v.is_empty())
        .ok_or_else(|| BouncerError::InvalidInput("form_key is required".to_string()))?;
    let email = req
        .email
        .filter(|v| !v.is_empty())
        .ok_or_else(|| BouncerError::InvalidInput("email is required".to_string()))?;

    let ip = req
        .ip
        .filter(|v| !v.is_empty())
        .or_else(|| forwarded_for(&headers));

    let form = state
        .db
        .get_form_by_key(&form_key)
        .map_err(|e| {
            error!(error = %e, "Form lookup failed");
            BouncerError::Internal("Internal error".to_string())
        })?
        .filter(|form| form.is_active)
        .ok_or_else(|| BouncerError::Forbidden("Invalid form key".to_string()))?;

    let account = state
        .db
        .get_account(&form.account_id)
        .map_err(|e| {
            error!(error = %e, "Account lookup failed");
            BouncerError::Internal("Internal error".to_string())
        })?
        .ok_or_else(|| BouncerError::Forbidden("Account not found".to_string()))?;

    if account.validations_used >= account.monthly_limit {
        return Err(BouncerError::Quota(
            "Monthly validation limit reached".to_string(),
        ));
    }

    let input = ValidationInput {
        email: email.clone(),
        phone: req.phone.clone(),
        company_domain: derive_company_domain(req.company.as_deref(), &email),
        ip: ip.clone(),
    };

    let outcome = state.engine.run(&input, account.plan).await.map_err(|e| match e {
        BouncerError::Config(_) => {
            error!(error = %e, "Validation engine not configured");
            BouncerError::Internal("Validation service not configured".to_string())
        }
        other => {
            error!(error = %other, "Validation engine failed");
            BouncerError::Internal("Validation failed".to_string())
        }
    })?;

    let status = classify(outcome.overall_score, &account.thresholds);
    let validation_id = Uuid::new_v4().to_string();
    let signals_json = serde_json::to_string(&outcome.signals)
        .map_err(|_| BouncerError::Internal("Internal error".to_string()))?;

    state
        .db
        .insert_validation(&NewValidation {
            id: &validation_id,
            form_id: &form.id,
            account_id: &account.id,
            email: &email,
            phone: req.phone.as_deref(),
            company: req.company.as_deref(),
            ip: ip.as_deref(),
            score: outcome.overall_score,
            status,
            signals_json: &signals_json,
        })
        .map_err(|e| {
            error!(error = %e, "Failed to persist validation");
            BouncerError::Internal("Failed to store validation".to_string())
        })?;

    info!(
        validation_id = %validation_id,
        form_id = %form.id,
        score = outcome.overall_score,
        status = status.as_str(),
        "Validation persisted"
    );

    // Rolling aggregates and the usage counter run concurrently, but both
    // must land before the response is final for billing accuracy. Failures
    // here are not rolled back; the validation row already exists.
    let stats_db = state.db.clone();
    let stats_form_id = form.id.clone();
    let score = outcome.overall_score;
    let passed = status == ValidationStatus::Passed;
    let stats_task = tokio::task::spawn_blocking(move || {
        stats_db.record_validation_stats(&stats_form_id, score, passed)
    });

    let usage_db = state.db.clone();
    let usage_account_id = account.id.clone();
    let usage_task = tokio::task::spawn_blocking(move || usage_db.increment_usage(&usage_account_id));

    let (stats_res, usage_res) = tokio::join!(stats_task, usage_task);
    match stats_res {
        Ok(Err(e)) => warn!(error = %e, "Stats update failed"),
        Err(e) => warn!(error = %e, "Stats task panicked"),
        Ok(Ok(())) => {}
    }
    match usage_res {
        Ok(Err(e)) => warn!(error = %e, "Usage increment failed"),
        Err(e) => warn!(error = %e, "Usage task panicked"),
        Ok(Ok(())) => {}
    }

    // Detached distribution: owns its own copies of everything it needs and
    // adds no latency to the synchronous response. The task is spawned just
    // before the handler returns, so it may start before the response bytes
    // are flushed; it shares no state with the request and never observes
    // the response, so the relative ordering is unobservable.
    let lead = LeadPayload {
        validation_id: validation_id.clone(),
        email,
        phone: req.phone,
        company: req.company,
        ip,
        score: outcome.overall_score,
        status,
        signals: outcome.signals.clone(),
        timestamp: Utc::now(),
    };
    tokio::spawn(push_lead_to_all_crms(
        state.db.clone(),
        state.sink.clone(),
        account.id.clone(),
        lead,
        account.block_rejected,
    ));

    if status == ValidationStatus::Rejected && account.block_rejected {
        // Score and per-signal detail are withheld from a blocked submitter.
        let message = account
            .rejection_message
            .unwrap_or_else(|| DEFAULT_REJECTION_MESSAGE.to_string());
        return Ok(Json(json!({
            "status": "Rejected",
            "blocked": true,
            "message": message,
        })));
    }

    Ok(Json(json!({
        "id": validation_id,
        "score": outcome.overall_score,
        "status": status.as_str(),
        "signals": outcome.signals,
        "blocked": false,
    })))
}

fn forwarded_for(headers: &HeaderMap) -> Option<String> {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forwarded_for_takes_first_entry() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", "203.0.113.7, 10.0.0.1".parse().unwrap());
        assert_eq!(forwarded_for(&headers), Some("203.0.113.7".to_string()));
    }

    #[test]
    fn test_forwarded_for_absent() {
        assert_eq!(forwarded_for(&HeaderMap::new()), None);
    }
}
