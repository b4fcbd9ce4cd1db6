use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use crate::errors::BouncerError;

/// Client-addressable variants carry their message verbatim; everything
/// else collapses to a 500 with the display form.
impl IntoResponse for BouncerError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            BouncerError::InvalidInput(m) => (StatusCode::BAD_REQUEST, m),
            BouncerError::Forbidden(m) => (StatusCode::FORBIDDEN, m),
            BouncerError::Quota(m) => (StatusCode::TOO_MANY_REQUESTS, m),
            BouncerError::Internal(m) => (StatusCode::INTERNAL_SERVER_ERROR, m),
            other => (StatusCode::INTERNAL_SERVER_ERROR, other.to_string()),
        };

        (status, Json(json!({"error": message}))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_status_mapping() {
        let cases = [
            (BouncerError::InvalidInput("x".into()), StatusCode::BAD_REQUEST),
            (BouncerError::Forbidden("x".into()), StatusCode::FORBIDDEN),
            (BouncerError::Quota("x".into()), StatusCode::TOO_MANY_REQUESTS),
            (BouncerError::Internal("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
            (BouncerError::Database("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (error, expected) in cases {
            assert_eq!(error.into_response().status(), expected);
        }
    }

    #[tokio::test]
    async fn test_client_variants_carry_message_verbatim() {
        let response = BouncerError::Quota("Monthly validation limit reached".into()).into_response();
        let body = body_json(response).await;
        assert_eq!(body["error"], "Monthly validation limit reached");
    }

    #[tokio::test]
    async fn test_server_variants_use_display_form() {
        let response = BouncerError::Database("no such table".into()).into_response();
        let body = body_json(response).await;
        assert_eq!(body["error"], "Database error: no such table");
    }
}
