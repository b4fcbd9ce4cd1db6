use async_trait::async_trait;
use reqwest::Method;
use serde_json::{json, Value};

use crate::crm::broker::BrokerClient;
use crate::errors::BouncerError;
use crate::models::MappedLead;
use super::{mapped_to_json, CreateResult, ObjectStore};

const PROVIDER_KEY: &str = "hubspot";

/// HubSpot contacts, addressed through the connection broker. Reports an
/// existing contact as HTTP 409, which the shared upsert turns into a
/// search-then-patch.
pub struct HubspotAdapter {
    broker: BrokerClient,
    connection_id: String,
}

impl HubspotAdapter {
    pub fn new(broker: BrokerClient, connection_id: &str) -> Self {
        Self {
            broker,
            connection_id: connection_id.to_string(),
        }
    }
}

#[async_trait]
impl ObjectStore for HubspotAdapter {
    fn provider_name(&self) -> &'static str {
        "hubspot"
    }

    async fn create(&self, mapped: &MappedLead) -> Result<CreateResult, BouncerError> {
        let body = json!({ "properties": mapped_to_json(mapped) });
        let resp = self
            .broker
            .send(
                Method::POST,
                "/proxy/crm/v3/objects/contacts",
                &self.connection_id,
                PROVIDER_KEY,
                Some(&body),
            )
            .await?;

        let status = resp.status();
        if status.as_u16() == 409 {
            return Ok(CreateResult::Conflict);
        }
        if !status.is_success() {
            return Err(BouncerError::CrmPush(format!("HubSpot create returned {}", status)));
        }
        let data: Value = resp
            .json()
            .await
            .map_err(|e| BouncerError::CrmPush(format!("Failed to parse HubSpot response: {}", e)))?;
        Ok(CreateResult::Created(data["id"].as_str().map(String::from)))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<String>, BouncerError> {
        let body = json!({
            "filterGroups": [{
                "filters": [{"propertyName": "email", "operator": "EQ", "value": email}]
            }],
            "limit": 1
        });
        let resp = self
            .broker
            .send(
                Method::POST,
                "/proxy/crm/v3/objects/contacts/search",
                &self.connection_id,
                PROVIDER_KEY,
                Some(&body),
            )
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(BouncerError::CrmPush(format!("HubSpot search returned {}", status)));
        }
        let data: Value = resp
            .json()
            .await
            .map_err(|e| BouncerError::CrmPush(format!("Failed to parse HubSpot search: {}", e)))?;
        Ok(data["results"][0]["id"].as_str().map(String::from))
    }

    async fn update(&self, external_id: &str, mapped: &MappedLead) -> Result<(), BouncerError> {
        let body = json!({ "properties": mapped_to_json(mapped) });
        let resp = self
            .broker
            .send(
                Method::PATCH,
                &format!("/proxy/crm/v3/objects/contacts/{}", external_id),
                &self.connection_id,
                PROVIDER_KEY,
                Some(&body),
            )
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(BouncerError::CrmPush(format!("HubSpot update returned {}", status)));
        }
        Ok(())
    }
}
