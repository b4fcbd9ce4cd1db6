use futures::future::join_all;
use tracing::{debug, info};

use crate::errors::BouncerError;
use crate::models::signal::NEUTRAL_SCORE;
use crate::models::{
    PlanTier, ScoringThresholds, SignalResult, SignalType, ValidationOutcome, ValidationStatus,
};
use crate::signals::SignalClient;

/// Canonical signal weights. Renormalized over whichever signals are
/// actually present in a run.
fn signal_weight(signal: SignalType) -> f64 {
    match signal {
        SignalType::Email => 0.40,
        SignalType::Company => 0.25,
        SignalType::Phone => 0.20,
        SignalType::Ip => 0.15,
    }
}

/// Plan gate: free tier validates email only; every paid tier gets all four
/// signals regardless of which inputs were supplied.
pub fn available_signals(plan: PlanTier) -> Vec<SignalType> {
    match plan {
        PlanTier::Free => vec![SignalType::Email],
        _ => SignalType::ALL.to_vec(),
    }
}

/// Weighted overall score over the signals present. Empty set scores
/// neutral instead of dividing by zero.
pub fn compute_overall_score(signals: &[SignalResult]) -> u8 {
    if signals.is_empty() {
        return NEUTRAL_SCORE;
    }
    let weighted: f64 = signals
        .iter()
        .map(|s| s.score as f64 * signal_weight(s.signal_type))
        .sum();
    let weight_sum: f64 = signals.iter().map(|s| signal_weight(s.signal_type)).sum();
    (weighted / weight_sum).round() as u8
}

pub fn classify(score: u8, thresholds: &ScoringThresholds) -> ValidationStatus {
    if score >= thresholds.passed_min {
        ValidationStatus::Passed
    } else if score >= thresholds.borderline_min {
        ValidationStatus::Borderline
    } else {
        ValidationStatus::Rejected
    }
}

/// Company domain for the enrichment lookup: the supplied company string if
/// it already looks like a domain, otherwise the email's domain part.
pub fn derive_company_domain(company: Option<&str>, email: &str) -> Option<String> {
    if let Some(company) = company {
        let trimmed = company
            .trim()
            .trim_start_matches("https://")
            .trim_start_matches("http://")
            .trim_start_matches("www.");
        let domain = trimmed.split('/').next().unwrap_or(trimmed);
        if !domain.is_empty() && domain.contains('.') && !domain.contains(' ') {
            return Some(domain.to_ascii_lowercase());
        }
    }
    email.split('@').nth(1).map(str::to_ascii_lowercase)
}

pub struct ValidationInput {
    pub email: String,
    pub phone: Option<String>,
    pub company_domain: Option<String>,
    pub ip: Option<String>,
}

pub struct ValidationEngine {
    signals: SignalClient,
}

impl ValidationEngine {
    pub fn new(signals: SignalClient) -> Self {
        Self { signals }
    }

    /// Run every plan-available signal whose input datum is present and
    /// whose provider credential is configured. Fetches run concurrently;
    /// total latency is bounded by the slowest single provider call.
    pub async fn run(&self, input: &ValidationInput, plan: PlanTier) -> Result<ValidationOutcome, BouncerError> {
        let config = self.signals.config();

        let mut scheduled: Vec<(SignalType, String, String)> = Vec::new();
        let mut candidates = 0usize;
        for signal in available_signals(plan) {
            let query = match signal {
                SignalType::Email => Some(input.email.as_str()),
                SignalType::Phone => input.phone.as_deref(),
                SignalType::Ip => input.ip.as_deref(),
                SignalType::Company => input.company_domain.as_deref(),
            };
            let Some(query) = query else { continue };
            candidates += 1;
            match config.credential_for(signal) {
                Some(key) => scheduled.push((signal, query.to_string(), key.to_string())),
                None => debug!(signal = signal.as_str(), "No provider credential configured, skipping signal"),
            }
        }

        if scheduled.is_empty() {
            if candidates > 0 {
                return Err(BouncerError::Config(
                    "No signal providers configured".to_string(),
                ));
            }
            return Ok(ValidationOutcome {
                overall_score: NEUTRAL_SCORE,
                signals: Vec::new(),
            });
        }

        let fetches = scheduled
            .iter()
            .map(|(signal, query, key)| self.signals.fetch_and_score(*signal, query, key));
        let signals = join_all(fetches).await;

        let overall_score = compute_overall_score(&signals);
        info!(
            plan = plan.as_str(),
            signals = signals.len(),
            overall_score,
            "Validation run complete"
        );

        Ok(ValidationOutcome {
            overall_score,
            signals,
        })
    }
}
