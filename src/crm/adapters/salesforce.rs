use async_trait::async_trait;
use reqwest::Method;
use serde_json::Value;

use crate::crm::broker::BrokerClient;
use crate::errors::BouncerError;
use crate::models::MappedLead;
use super::{CreateResult, ObjectStore};

const PROVIDER_KEY: &str = "salesforce";
const LEAD_PATH: &str = "/proxy/services/data/v59.0/sobjects/Lead";

/// Canonical mapped keys renamed to Salesforce Lead schema names. Keys not
/// in the table pass through unchanged (custom fields configured by the
/// user already carry their API names).
const FIELD_TRANSLATION: &[(&str, &str)] = &[
    ("email", "Email"),
    ("phone", "Phone"),
    ("company", "Company"),
    ("lead score", "Lead_Score__c"),
    ("validation status", "Validation_Status__c"),
];

fn translate_key(key: &str) -> String {
    let lower = key.to_ascii_lowercase();
    FIELD_TRANSLATION
        .iter()
        .find(|(from, _)| *from == lower)
        .map(|(_, to)| to.to_string())
        .unwrap_or_else(|| key.to_string())
}

fn lead_fields(mapped: &MappedLead) -> serde_json::Map<String, Value> {
    let mut obj = serde_json::Map::new();
    for (key, value) in mapped {
        obj.insert(translate_key(key), Value::String(value.clone()));
    }
    obj
}

/// Salesforce Lead objects. Lead requires LastName and Company on create;
/// duplicates surface as DUPLICATES_DETECTED, normalized here to a
/// conflict for the shared upsert.
pub struct SalesforceAdapter {
    broker: BrokerClient,
    connection_id: String,
}

impl SalesforceAdapter {
    pub fn new(broker: BrokerClient, connection_id: &str) -> Self {
        Self {
            broker,
            connection_id: connection_id.to_string(),
        }
    }
}

#[async_trait]
impl ObjectStore for SalesforceAdapter {
    fn provider_name(&self) -> &'static str {
        "salesforce"
    }

    async fn create(&self, mapped: &MappedLead) -> Result<CreateResult, BouncerError> {
        let mut fields = lead_fields(mapped);
        if !fields.contains_key("LastName") {
            let fallback = fields
                .get("Email")
                .and_then(Value::as_str)
                .and_then(|email| email.split('@').next())
                .unwrap_or("Lead")
                .to_string();
            fields.insert("LastName".to_string(), Value::String(fallback));
        }
        if !fields.contains_key("Company") {
            fields.insert("Company".to_string(), Value::String("Unknown".to_string()));
        }

        let body = Value::Object(fields);
        let resp = self
            .broker
            .send(Method::POST, LEAD_PATH, &self.connection_id, PROVIDER_KEY, Some(&body))
            .await?;

        let status = resp.status();
        if status.as_u16() == 409 {
            return Ok(CreateResult::Conflict);
        }
        let text = resp
            .text()
            .await
            .map_err(|e| BouncerError::CrmPush(format!("Failed to read Salesforce response: {}", e)))?;
        if !status.is_success() {
            if text.contains("DUPLICATES_DETECTED") {
                return Ok(CreateResult::Conflict);
            }
            return Err(BouncerError::CrmPush(format!("Salesforce create returned {}", status)));
        }
        let data: Value = serde_json::from_str(&text)
            .map_err(|e| BouncerError::CrmPush(format!("Failed to parse Salesforce response: {}", e)))?;
        Ok(CreateResult::Created(data["id"].as_str().map(String::from)))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<String>, BouncerError> {
        let escaped = email.replace('\'', "\\'");
        let path = format!(
            "/proxy/services/data/v59.0/query?q=SELECT+Id+FROM+Lead+WHERE+Email='{}'+LIMIT+1",
            escaped.replace('@', "%40").replace('+', "%2B")
        );
        let resp = self
            .broker
            .send(Method::GET, &path, &self.connection_id, PROVIDER_KEY, None)
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(BouncerError::CrmPush(format!("Salesforce query returned {}", status)));
        }
        let data: Value = resp
            .json()
            .await
            .map_err(|e| BouncerError::CrmPush(format!("Failed to parse Salesforce query: {}", e)))?;
        Ok(data["records"][0]["Id"].as_str().map(String::from))
    }

    async fn update(&self, external_id: &str, mapped: &MappedLead) -> Result<(), BouncerError> {
        let body = Value::Object(lead_fields(mapped));
        let resp = self
            .broker
            .send(
                Method::PATCH,
                &format!("{}/{}", LEAD_PATH, external_id),
                &self.connection_id,
                PROVIDER_KEY,
                Some(&body),
            )
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(BouncerError::CrmPush(format!("Salesforce update returned {}", status)));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translate_known_keys_case_insensitive() {
        assert_eq!(translate_key("email"), "Email");
        assert_eq!(translate_key("Lead Score"), "Lead_Score__c");
        assert_eq!(translate_key("Validation Status"), "Validation_Status__c");
    }

    #[test]
    fn test_unknown_keys_pass_through() {
        assert_eq!(translate_key("Custom_Field__c"), "Custom_Field__c");
    }

    #[test]
    fn test_lead_fields_translation() {
        let mapped = vec![
            ("email".to_string(), "a@b.com".to_string()),
            ("lead score".to_string(), "82".to_string()),
        ];
        let fields = lead_fields(&mapped);
        assert_eq!(fields["Email"], "a@b.com");
        assert_eq!(fields["Lead_Score__c"], "82");
    }
}
