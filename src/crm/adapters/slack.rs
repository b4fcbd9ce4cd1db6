use reqwest::Method;
use serde_json::{json, Value};

use crate::crm::broker::BrokerClient;
use crate::errors::BouncerError;
use crate::models::{LeadPayload, PushOutcome, ValidationStatus};

const PROVIDER_KEY: &str = "slack";

/// Notification target rather than a record store: ignores the mapped
/// fields and posts a human-readable message composed from the raw lead.
pub struct SlackAdapter {
    broker: BrokerClient,
    connection_id: String,
}

fn status_glyph(status: ValidationStatus) -> &'static str {
    match status {
        ValidationStatus::Passed => "✅",
        ValidationStatus::Borderline => "⚠️",
        ValidationStatus::Rejected => "🚫",
    }
}

fn compose_message(lead: &LeadPayload) -> String {
    format!(
        "{} New lead: {} scored {}/100 — {}",
        status_glyph(lead.status),
        lead.email,
        lead.score,
        lead.status.as_str()
    )
}

impl SlackAdapter {
    pub fn new(broker: BrokerClient, connection_id: &str) -> Self {
        Self {
            broker,
            connection_id: connection_id.to_string(),
        }
    }

    pub async fn push(&self, lead: &LeadPayload) -> PushOutcome {
        let body = json!({
            "channel": "#leads",
            "text": compose_message(lead),
        });
        match self.post_message(&body).await {
            Ok(()) => PushOutcome::ok(None),
            Err(e) => PushOutcome::fail(format!("slack: {}", e)),
        }
    }

    async fn post_message(&self, body: &Value) -> Result<(), BouncerError> {
        let resp = self
            .broker
            .send(
                Method::POST,
                "/proxy/api/chat.postMessage",
                &self.connection_id,
                PROVIDER_KEY,
                Some(body),
            )
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(BouncerError::CrmPush(format!("Slack returned {}", status)));
        }
        // Slack reports errors inside a 200 body.
        let data: Value = resp
            .json()
            .await
            .map_err(|e| BouncerError::CrmPush(format!("Failed to parse Slack response: {}", e)))?;
        if data["ok"].as_bool() == Some(false) {
            let err = data["error"].as_str().unwrap_or("unknown error");
            return Err(BouncerError::CrmPush(format!("Slack API error: {}", err)));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn lead(status: ValidationStatus, score: u8) -> LeadPayload {
        LeadPayload {
            validation_id: "v1".to_string(),
            email: "lead@acme.com".to_string(),
            phone: None,
            company: None,
            ip: None,
            score,
            status,
            signals: Vec::new(),
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn test_glyph_by_status() {
        assert_eq!(status_glyph(ValidationStatus::Passed), "✅");
        assert_eq!(status_glyph(ValidationStatus::Borderline), "⚠️");
        assert_eq!(status_glyph(ValidationStatus::Rejected), "🚫");
    }

    #[test]
    fn test_message_composition() {
        let message = compose_message(&lead(ValidationStatus::Passed, 91));
        assert_eq!(message, "✅ New lead: lead@acme.com scored 91/100 — Passed");
    }
}
