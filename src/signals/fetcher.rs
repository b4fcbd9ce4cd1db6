use std::time::Duration;

use reqwest::Client;
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::Config;
use crate::errors::BouncerError;
use crate::models::{SignalResult, SignalType};
use crate::scoring;

/// HTTP client for the four external signal providers. Every failure path
/// (timeout, non-2xx, unreadable body) collapses to the neutral fallback;
/// a flaky provider must never fail the validation run.
pub struct SignalClient {
    http: Client,
    config: Config,
}

impl SignalClient {
    pub fn new(config: Config) -> Self {
        Self {
            http: Client::new(),
            config,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Fetch one provider document and score it. Resolves to the neutral
    /// signal instead of erroring; the in-flight request is dropped on
    /// timeout, nothing is left pending.
    pub async fn fetch_and_score(&self, signal: SignalType, query: &str, api_key: &str) -> SignalResult {
        let timeout = Duration::from_millis(self.config.signal_timeout_ms);
        match tokio::time::timeout(timeout, self.fetch_raw(signal, query, api_key)).await {
            Ok(Ok(raw)) => {
                let result = scoring::score_signal(signal, &raw);
                debug!(signal = signal.as_str(), score = result.score, "Signal scored");
                result
            }
            Ok(Err(e)) => {
                warn!(signal = signal.as_str(), error = %e, "Signal provider call failed, scoring as neutral");
                SignalResult::neutral(signal)
            }
            Err(_) => {
                warn!(
                    signal = signal.as_str(),
                    timeout_ms = self.config.signal_timeout_ms,
                    "Signal provider timed out, scoring as neutral"
                );
                SignalResult::neutral(signal)
            }
        }
    }

    async fn fetch_raw(&self, signal: SignalType, query: &str, api_key: &str) -> Result<Value, BouncerError> {
        let base_url = &self.config.provider(signal).base_url;
        let param = query_param(signal);

        let resp = self
            .http
            .get(base_url)
            .query(&[("api_key", api_key), (param, query)])
            .send()
            .await
            .map_err(|e| BouncerError::Network(format!("{} provider request failed: {}", signal.as_str(), e)))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(BouncerError::SignalProvider(format!(
                "{} provider returned {}",
                signal.as_str(),
                status
            )));
        }

        resp.json().await.map_err(|e| {
            BouncerError::SignalProvider(format!(
                "Failed to parse {} provider response: {}",
                signal.as_str(),
                e
            ))
        })
    }
}

fn query_param(signal: SignalType) -> &'static str {
    match signal {
        SignalType::Email => "email",
        SignalType::Phone => "phone",
        SignalType::Ip => "ip_address",
        SignalType::Company => "domain",
    }
}
