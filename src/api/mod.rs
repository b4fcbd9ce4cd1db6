pub mod routes;
pub mod models;
pub mod errors;
pub mod auth;

use std::sync::Arc;
use std::time::Duration;

use axum::http::{header, Method};
use axum::{middleware, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::crm::{AdapterDispatch, LeadSink};
use crate::db::Database;
use crate::engine::ValidationEngine;
use crate::errors::BouncerError;
use crate::signals::SignalClient;

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub engine: Arc<ValidationEngine>,
    pub sink: Arc<dyn LeadSink>,
}

pub fn create_app_state(db_path: &str, config: Config) -> Result<AppState, BouncerError> {
    let db = Database::new(db_path)?;
    let sink = Arc::new(AdapterDispatch::new(&config));
    let engine = Arc::new(ValidationEngine::new(SignalClient::new(config)));
    Ok(AppState { db, engine, sink })
}

pub fn build_router(state: AppState) -> Router {
    // Public embed endpoint, called from arbitrary third-party sites.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
        .max_age(Duration::from_secs(86400));

    let public = Router::new()
        .route(
            "/api/v1/submit",
            axum::routing::post(routes::submit::submit).options(routes::submit::preflight),
        )
        .layer(cors);

    let dashboard = Router::new()
        .route(
            "/api/v1/forms",
            axum::routing::post(routes::forms::create_form).get(routes::forms::list_forms),
        )
        .route(
            "/api/v1/forms/:id",
            axum::routing::get(routes::forms::get_form).put(routes::forms::update_form),
        )
        .route("/api/v1/validations", axum::routing::get(routes::validations::list_validations))
        .route("/api/v1/validations/:id", axum::routing::get(routes::validations::get_validation))
        .route(
            "/api/v1/validations/:id/override",
            axum::routing::post(routes::validations::override_validation),
        )
        .route("/api/v1/integrations", axum::routing::get(routes::integrations::list_integrations))
        .route(
            "/api/v1/integrations/:provider",
            axum::routing::put(routes::integrations::upsert_integration)
                .delete(routes::integrations::disconnect_integration),
        )
        .route(
            "/api/v1/integrations/:provider/logs",
            axum::routing::get(routes::integrations::integration_logs),
        )
        .route(
            "/api/v1/settings",
            axum::routing::get(routes::settings::get_settings).put(routes::settings::update_settings),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::require_account));

    Router::new()
        .route("/api/v1/health", axum::routing::get(routes::health::health_check))
        .merge(public)
        .merge(dashboard)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
