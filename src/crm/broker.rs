use reqwest::{Client, Method, Response};
use serde_json::Value;

use crate::config::Config;
use crate::errors::BouncerError;

/// Client for the connection-broker proxy. The broker owns the OAuth
/// lifecycle; adapters address the upstream CRM API through it using the
/// opaque per-account connection handle.
#[derive(Clone)]
pub struct BrokerClient {
    http: Client,
    base_url: String,
    secret: String,
}

impl BrokerClient {
    pub fn new(base_url: &str, secret: &str) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            secret: secret.to_string(),
        }
    }

    pub fn from_config(config: &Config) -> Option<Self> {
        match (&config.broker_url, &config.broker_secret) {
            (Some(url), Some(secret)) => Some(Self::new(url, secret)),
            _ => None,
        }
    }

    pub async fn send(
        &self,
        method: Method,
        path: &str,
        connection_id: &str,
        provider_key: &str,
        body: Option<&Value>,
    ) -> Result<Response, BouncerError> {
        let mut req = self
            .http
            .request(method, format!("{}{}", self.base_url, path))
            .bearer_auth(&self.secret)
            .header("Connection-Id", connection_id)
            .header("Provider-Config-Key", provider_key);
        if let Some(body) = body {
            req = req.json(body);
        }
        req.send()
            .await
            .map_err(|e| BouncerError::Network(format!("Broker request to {} failed: {}", path, e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let broker = BrokerClient::new("https://broker.test/", "secret");
        assert_eq!(broker.base_url, "https://broker.test");
    }

    #[test]
    fn test_from_config_requires_url_and_secret() {
        let mut config = Config::from_env();
        config.broker_url = Some("https://broker.test".to_string());
        config.broker_secret = None;
        assert!(BrokerClient::from_config(&config).is_none());

        config.broker_secret = Some("s".to_string());
        assert!(BrokerClient::from_config(&config).is_some());
    }
}
