use async_trait::async_trait;
use reqwest::Method;
use serde_json::Value;

use crate::crm::broker::BrokerClient;
use crate::errors::BouncerError;
use crate::models::MappedLead;
use super::{mapped_to_json, CreateResult, ObjectStore};

const PROVIDER_KEY: &str = "pipedrive";

/// Pipedrive persons. Fields land top-level on the person record; the
/// person needs a `name`, which falls back to the mapped email.
pub struct PipedriveAdapter {
    broker: BrokerClient,
    connection_id: String,
}

impl PipedriveAdapter {
    pub fn new(broker: BrokerClient, connection_id: &str) -> Self {
        Self {
            broker,
            connection_id: connection_id.to_string(),
        }
    }

    fn person_body(mapped: &MappedLead) -> Value {
        let mut body = mapped_to_json(mapped);
        if body.get("name").is_none() {
            let fallback = mapped
                .iter()
                .find(|(k, _)| k.eq_ignore_ascii_case("email"))
                .map(|(_, v)| v.clone())
                .unwrap_or_else(|| "Unknown lead".to_string());
            body["name"] = Value::String(fallback);
        }
        body
    }
}

#[async_trait]
impl ObjectStore for PipedriveAdapter {
    fn provider_name(&self) -> &'static str {
        "pipedrive"
    }

    async fn create(&self, mapped: &MappedLead) -> Result<CreateResult, BouncerError> {
        let body = Self::person_body(mapped);
        let resp = self
            .broker
            .send(
                Method::POST,
                "/proxy/v1/persons",
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
            return Err(BouncerError::CrmPush(format!("Pipedrive create returned {}", status)));
        }
        let data: Value = resp
            .json()
            .await
            .map_err(|e| BouncerError::CrmPush(format!("Failed to parse Pipedrive response: {}", e)))?;
        let id = data["data"]["id"].as_i64().map(|id| id.to_string());
        Ok(CreateResult::Created(id))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<String>, BouncerError> {
        let path = format!(
            "/proxy/v1/persons/search?term={}&fields=email&exact_match=true",
            urlencode(email)
        );
        let resp = self
            .broker
            .send(Method::GET, &path, &self.connection_id, PROVIDER_KEY, None)
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(BouncerError::CrmPush(format!("Pipedrive search returned {}", status)));
        }
        let data: Value = resp
            .json()
            .await
            .map_err(|e| BouncerError::CrmPush(format!("Failed to parse Pipedrive search: {}", e)))?;
        Ok(data["data"]["items"][0]["item"]["id"]
            .as_i64()
            .map(|id| id.to_string()))
    }

    async fn update(&self, external_id: &str, mapped: &MappedLead) -> Result<(), BouncerError> {
        let body = mapped_to_json(mapped);
        let resp = self
            .broker
            .send(
                Method::PUT,
                &format!("/proxy/v1/persons/{}", external_id),
                &self.connection_id,
                PROVIDER_KEY,
                Some(&body),
            )
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(BouncerError::CrmPush(format!("Pipedrive update returned {}", status)));
        }
        Ok(())
    }
}

// Percent-encodes per UTF-8 byte; multi-byte characters become one escape
// per byte.
fn urlencode(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for byte in value.bytes() {
        match byte {
            b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}
