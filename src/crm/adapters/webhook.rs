use chrono::Utc;
use reqwest::Client;
use serde_json::json;

use crate::models::{LeadPayload, MappedLead, PushOutcome};
use super::mapped_to_json;

/// Generic webhook target (also serves Zapier). Posts the mapped fields
/// plus the full raw lead to a user-supplied URL; no broker involved.
pub struct WebhookAdapter {
    http: Client,
}

impl WebhookAdapter {
    pub fn new(http: Client) -> Self {
        Self { http }
    }

    pub async fn push(&self, url: &str, mapped: &MappedLead, lead: &LeadPayload) -> PushOutcome {
        let mut data = mapped_to_json(mapped);
        data["raw"] = serde_json::to_value(lead).unwrap_or_default();
        let envelope = json!({
            "event": "lead.validated",
            "data": data,
            "timestamp": Utc::now().to_rfc3339(),
        });

        match self.http.post(url).json(&envelope).send().await {
            Ok(resp) => {
                let status = resp.status();
                if status.is_success() {
                    PushOutcome::ok(None)
                } else {
                    PushOutcome::fail(format!("Webhook returned {}", status))
                }
            }
            Err(e) => PushOutcome::fail(format!("Webhook request failed: {}", e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ValidationStatus;

    #[tokio::test]
    async fn test_unreachable_url_is_failure_not_panic() {
        let adapter = WebhookAdapter::new(Client::new());
        let lead = LeadPayload {
            validation_id: "v1".to_string(),
            email: "a@b.com".to_string(),
            phone: None,
            company: None,
            ip: None,
            score: 50,
            status: ValidationStatus::Borderline,
            signals: Vec::new(),
            timestamp: Utc::now(),
        };
        let outcome = adapter.push("http://127.0.0.1:9/hook", &Vec::new(), &lead).await;
        assert!(!outcome.success);
        assert!(outcome.error.is_some());
    }
}
