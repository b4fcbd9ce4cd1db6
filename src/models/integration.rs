use serde::{Deserialize, Serialize};

use crate::errors::BouncerError;
use super::lead::FieldMapping;

/// Closed set of supported downstream providers. Unknown provider strings
/// are rejected at the persistence boundary as a configuration error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Hubspot,
    Pipedrive,
    Salesforce,
    Slack,
    Webhook,
    Zapier,
}

impl Provider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Hubspot => "hubspot",
            Provider::Pipedrive => "pipedrive",
            Provider::Salesforce => "salesforce",
            Provider::Slack => "slack",
            Provider::Webhook => "webhook",
            Provider::Zapier => "zapier",
        }
    }

    pub fn parse(s: &str) -> Result<Self, BouncerError> {
        match s {
            "hubspot" => Ok(Provider::Hubspot),
            "pipedrive" => Ok(Provider::Pipedrive),
            "salesforce" => Ok(Provider::Salesforce),
            "slack" => Ok(Provider::Slack),
            "webhook" => Ok(Provider::Webhook),
            "zapier" => Ok(Provider::Zapier),
            other => Err(BouncerError::Config(format!("Unknown CRM provider: {}", other))),
        }
    }

    /// Webhook-style providers store a literal target URL in `connection_id`
    /// instead of a broker connection handle.
    pub fn is_webhook_style(&self) -> bool {
        matches!(self, Provider::Webhook | Provider::Zapier)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntegrationStatus {
    Connected,
    Disconnected,
}

impl IntegrationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            IntegrationStatus::Connected => "connected",
            IntegrationStatus::Disconnected => "disconnected",
        }
    }

    pub fn parse(s: &str) -> Result<Self, BouncerError> {
        match s {
            "connected" => Ok(IntegrationStatus::Connected),
            "disconnected" => Ok(IntegrationStatus::Disconnected),
            other => Err(BouncerError::Config(format!(
                "Unknown integration status: {}",
                other
            ))),
        }
    }
}

/// One configured connection from an account to a downstream provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Integration {
    pub id: String,
    pub account_id: String,
    pub provider: Provider,
    pub status: IntegrationStatus,
    pub connection_id: Option<String>,
    pub field_mappings: Vec<FieldMapping>,
    pub last_synced_at: Option<String>,
}

/// Result of one push attempt against one provider. Adapters never error
/// upward; any failure is folded into this shape.
#[derive(Debug, Clone, Serialize)]
pub struct PushOutcome {
    pub success: bool,
    pub external_id: Option<String>,
    pub error: Option<String>,
}

impl PushOutcome {
    pub fn ok(external_id: Option<String>) -> Self {
        Self {
            success: true,
            external_id,
            error: None,
        }
    }

    pub fn fail(error: impl Into<String>) -> Self {
        Self {
            success: false,
            external_id: None,
            error: Some(error.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_parse_round_trip() {
        for provider in [
            Provider::Hubspot,
            Provider::Pipedrive,
            Provider::Salesforce,
            Provider::Slack,
            Provider::Webhook,
            Provider::Zapier,
        ] {
            assert_eq!(Provider::parse(provider.as_str()).unwrap(), provider);
        }
    }

    #[test]
    fn test_unknown_provider_is_config_error() {
        let err = Provider::parse("notion").unwrap_err();
        assert!(matches!(err, BouncerError::Config(_)));
    }

    #[test]
    fn test_webhook_style_providers() {
        assert!(Provider::Webhook.is_webhook_style());
        assert!(Provider::Zapier.is_webhook_style());
        assert!(!Provider::Hubspot.is_webhook_style());
        assert!(!Provider::Slack.is_webhook_style());
    }
}
