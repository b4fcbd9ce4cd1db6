pub mod credentials;

pub use credentials::resolve_credential;

use crate::models::SignalType;

pub const DEFAULT_SIGNAL_TIMEOUT_MS: u64 = 3000;

const DEFAULT_EMAIL_BASE_URL: &str = "https://emailvalidation.abstractapi.com/v1";
const DEFAULT_PHONE_BASE_URL: &str = "https://phonevalidation.abstractapi.com/v1";
const DEFAULT_IP_BASE_URL: &str = "https://ipgeolocation.abstractapi.com/v1";
const DEFAULT_COMPANY_BASE_URL: &str = "https://companyenrichment.abstractapi.com/v1";

/// Credentials and endpoint for one external signal provider.
#[derive(Debug, Clone)]
pub struct SignalProviderConfig {
    pub api_key: Option<String>,
    pub base_url: String,
}

impl SignalProviderConfig {
    fn from_env(key_var: &str, url_var: &str, default_url: &str) -> Self {
        let api_key = std::env::var(key_var)
            .ok()
            .filter(|v| !v.is_empty())
            .map(|v| resolve_credential(&v));
        let base_url = std::env::var(url_var)
            .ok()
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| default_url.to_string());
        Self { api_key, base_url }
    }
}

/// Runtime configuration, resolved once from the environment at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub email: SignalProviderConfig,
    pub phone: SignalProviderConfig,
    pub ip: SignalProviderConfig,
    pub company: SignalProviderConfig,
    /// Connection-broker proxy for OAuth-backed CRM providers.
    pub broker_url: Option<String>,
    pub broker_secret: Option<String>,
    pub signal_timeout_ms: u64,
}

impl Config {
    pub fn from_env() -> Self {
        let signal_timeout_ms = std::env::var("BOUNCER_SIGNAL_TIMEOUT_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_SIGNAL_TIMEOUT_MS);

        Self {
            email: SignalProviderConfig::from_env(
                "BOUNCER_EMAIL_API_KEY",
                "BOUNCER_EMAIL_BASE_URL",
                DEFAULT_EMAIL_BASE_URL,
            ),
            phone: SignalProviderConfig::from_env(
                "BOUNCER_PHONE_API_KEY",
                "BOUNCER_PHONE_BASE_URL",
                DEFAULT_PHONE_BASE_URL,
            ),
            ip: SignalProviderConfig::from_env(
                "BOUNCER_IP_API_KEY",
                "BOUNCER_IP_BASE_URL",
                DEFAULT_IP_BASE_URL,
            ),
            company: SignalProviderConfig::from_env(
                "BOUNCER_COMPANY_API_KEY",
                "BOUNCER_COMPANY_BASE_URL",
                DEFAULT_COMPANY_BASE_URL,
            ),
            broker_url: std::env::var("BOUNCER_BROKER_URL").ok().filter(|v| !v.is_empty()),
            broker_secret: std::env::var("BOUNCER_BROKER_SECRET")
                .ok()
                .filter(|v| !v.is_empty())
                .map(|v| resolve_credential(&v)),
            signal_timeout_ms,
        }
    }

    pub fn provider(&self, signal: SignalType) -> &SignalProviderConfig {
        match signal {
            SignalType::Email => &self.email,
            SignalType::Phone => &self.phone,
            SignalType::Ip => &self.ip,
            SignalType::Company => &self.company,
        }
    }

    pub fn credential_for(&self, signal: SignalType) -> Option<&str> {
        self.provider(signal).api_key.as_deref()
    }
}
