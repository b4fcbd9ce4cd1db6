pub mod mapper;
pub mod fanout;
pub mod broker;
pub mod adapters;

pub use mapper::apply_field_mappings;
pub use fanout::push_lead_to_all_crms;
pub use broker::BrokerClient;

use async_trait::async_trait;
use reqwest::Client;

use crate::config::Config;
use crate::models::{Integration, LeadPayload, MappedLead, Provider, PushOutcome};
use adapters::hubspot::HubspotAdapter;
use adapters::pipedrive::PipedriveAdapter;
use adapters::salesforce::SalesforceAdapter;
use adapters::slack::SlackAdapter;
use adapters::webhook::WebhookAdapter;

/// Delivery seam between the fan-out engine and the provider adapters.
/// Implementations never error; any failure is folded into the outcome.
#[async_trait]
pub trait LeadSink: Send + Sync {
    async fn deliver(
        &self,
        integration: &Integration,
        mapped: &MappedLead,
        lead: &LeadPayload,
    ) -> PushOutcome;
}

/// Production sink: routes each integration to its adapter over the closed
/// provider enum. Exhaustive by construction; there is no runtime lookup
/// that can miss.
pub struct AdapterDispatch {
    broker: Option<BrokerClient>,
    http: Client,
}

impl AdapterDispatch {
    pub fn new(config: &Config) -> Self {
        Self {
            broker: BrokerClient::from_config(config),
            http: Client::new(),
        }
    }
}

#[async_trait]
impl LeadSink for AdapterDispatch {
    async fn deliver(
        &self,
        integration: &Integration,
        mapped: &MappedLead,
        lead: &LeadPayload,
    ) -> PushOutcome {
        let Some(connection_id) = integration.connection_id.as_deref() else {
            return PushOutcome::fail("Integration has no connection handle");
        };

        if integration.provider.is_webhook_style() {
            // connection_id holds the target URL for these providers.
            return WebhookAdapter::new(self.http.clone())
                .push(connection_id, mapped, lead)
                .await;
        }

        let Some(broker) = &self.broker else {
            return PushOutcome::fail("Connection broker not configured");
        };

        match integration.provider {
            Provider::Hubspot => {
                adapters::upsert(&HubspotAdapter::new(broker.clone(), connection_id), mapped, &lead.email).await
            }
            Provider::Pipedrive => {
                adapters::upsert(&PipedriveAdapter::new(broker.clone(), connection_id), mapped, &lead.email).await
            }
            Provider::Salesforce => {
                adapters::upsert(&SalesforceAdapter::new(broker.clone(), connection_id), mapped, &lead.email).await
            }
            Provider::Slack => SlackAdapter::new(broker.clone(), connection_id).push(lead).await,
            // Handled above; unreachable through the early return.
            Provider::Webhook | Provider::Zapier => {
                WebhookAdapter::new(self.http.clone()).push(connection_id, mapped, lead).await
            }
        }
    }
}
